use crate::{
    error::OrogenResult,
    graph::node::{Node, ResultSlot, SharedNode},
    map::{HeightMap, Map},
    schema::{GraphCapture, NodeRecord},
};

/// Leaf node producing a constant-valued height map of a fixed size.
pub struct ConstantNode {
    height: usize,
    width: usize,
    value: f64,
    slot: ResultSlot,
}

impl ConstantNode {
    pub fn new(height: usize, width: usize, value: f64) -> Self {
        Self {
            height,
            width,
            value,
            slot: ResultSlot::new(),
        }
    }
}

impl Node for ConstantNode {
    fn dependencies(&self) -> Vec<SharedNode> {
        Vec::new()
    }

    fn produce(&self) -> OrogenResult<HeightMap> {
        Map::filled(self.height, self.width, self.value)
    }

    fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    fn capture(&self, _capture: &mut GraphCapture) -> NodeRecord {
        NodeRecord::Constant {
            height: self.height,
            width: self.width,
            value: self.value,
        }
    }
}
