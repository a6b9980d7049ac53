use crate::{
    blend::BlendMode,
    error::OrogenResult,
    graph::node::{Node, ResultSlot, SharedNode},
    map::HeightMap,
    schema::{GraphCapture, NodeRecord},
};

/// Combines two dependency results with a pluggable [`BlendMode`].
///
/// The strategy is selected by capability; the node never inspects the
/// concrete blend type.
pub struct BlendNode {
    mode: Box<dyn BlendMode>,
    left: SharedNode,
    right: SharedNode,
    slot: ResultSlot,
}

impl BlendNode {
    pub fn new(mode: Box<dyn BlendMode>, left: SharedNode, right: SharedNode) -> Self {
        Self {
            mode,
            left,
            right,
            slot: ResultSlot::new(),
        }
    }
}

impl Node for BlendNode {
    fn dependencies(&self) -> Vec<SharedNode> {
        vec![self.left.clone(), self.right.clone()]
    }

    fn produce(&self) -> OrogenResult<HeightMap> {
        let left = self.left.execute()?;
        let right = self.right.execute()?;
        Ok(self.mode.blend(left, right))
    }

    fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    fn capture(&self, capture: &mut GraphCapture) -> NodeRecord {
        NodeRecord::Blend {
            mode: self.mode.record(),
            left: capture.reference(&self.left),
            right: capture.reference(&self.right),
        }
    }
}
