use std::{collections::HashMap, sync::Arc};

use crate::{
    blend::{self, BlendRecord},
    effect::{self, EffectRecord},
    error::{OrogenError, OrogenResult},
    graph::{BlendNode, ConstantNode, EffectChainNode, MixNode, Node, SharedNode},
};

/// A captured graph: post-order record list, the last record is the root.
///
/// Node references are backward indices into `nodes`, so shared (diamond)
/// dependencies serialize once and restore as shared nodes, and a document
/// cannot encode a cycle.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GraphDoc {
    pub nodes: Vec<NodeRecord>,
}

/// Stable identifier of a node within a [`GraphDoc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NodeRef(pub u32);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeRecord {
    Constant {
        height: usize,
        width: usize,
        value: f64,
    },
    Mix {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<[usize; 2]>,
        inputs: Vec<WeightedRef>,
    },
    EffectChain {
        source: NodeRef,
        effects: Vec<EffectRecord>,
    },
    Blend {
        mode: BlendRecord,
        left: NodeRef,
        right: NodeRef,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WeightedRef {
    pub node: NodeRef,
    pub weight: f64,
}

/// Accumulates node records while walking a graph, deduplicating shared
/// nodes by identity.
#[derive(Default)]
pub struct GraphCapture {
    records: Vec<NodeRecord>,
    seen: HashMap<usize, NodeRef>,
}

impl GraphCapture {
    /// Record `node` (once per instance) and return its reference. Dependency
    /// records land before their users, giving a post-order list.
    pub fn reference(&mut self, node: &SharedNode) -> NodeRef {
        let identity = Arc::as_ptr(node).cast::<()>() as usize;
        if let Some(&existing) = self.seen.get(&identity) {
            return existing;
        }
        let record = node.capture(self);
        let reference = NodeRef(self.records.len() as u32);
        self.records.push(record);
        self.seen.insert(identity, reference);
        reference
    }
}

/// Capture the graph reachable from `root` into a flat document.
///
/// Does not execute anything. Like execution, does not terminate on a cyclic
/// graph.
#[tracing::instrument(skip(root))]
pub fn capture_graph(root: &SharedNode) -> GraphDoc {
    let mut capture = GraphCapture::default();
    capture.reference(root);
    GraphDoc {
        nodes: capture.records,
    }
}

/// Rebuild the graph described by `doc` and return its root.
///
/// Shared references resolve to shared nodes; no production step runs, so
/// every restored node starts unexecuted.
#[tracing::instrument(skip(doc), fields(nodes = doc.nodes.len()))]
pub fn restore_graph(doc: &GraphDoc) -> OrogenResult<SharedNode> {
    let mut built: Vec<SharedNode> = Vec::with_capacity(doc.nodes.len());
    for record in &doc.nodes {
        let node = restore_node(record, &built)?;
        built.push(node);
    }
    built
        .pop()
        .ok_or_else(|| OrogenError::schema("graph document has no nodes"))
}

fn resolve(reference: NodeRef, built: &[SharedNode]) -> OrogenResult<SharedNode> {
    built.get(reference.0 as usize).cloned().ok_or_else(|| {
        OrogenError::schema(format!(
            "node reference {} is not declared before its user",
            reference.0
        ))
    })
}

fn restore_node(record: &NodeRecord, built: &[SharedNode]) -> OrogenResult<SharedNode> {
    match record {
        NodeRecord::Constant {
            height,
            width,
            value,
        } => {
            let node: SharedNode = Arc::new(ConstantNode::new(*height, *width, *value));
            Ok(node)
        }
        NodeRecord::Mix { size, inputs } => {
            let node = match size {
                Some([height, width]) => MixNode::with_size(*height, *width),
                None => MixNode::new(),
            };
            for input in inputs {
                node.add_dependency(resolve(input.node, built)?, input.weight);
            }
            let node: SharedNode = Arc::new(node);
            Ok(node)
        }
        NodeRecord::EffectChain { source, effects } => {
            let node = EffectChainNode::new(resolve(*source, built)?);
            for record in effects {
                node.add_effect(effect::from_record(record)?);
            }
            let node: SharedNode = Arc::new(node);
            Ok(node)
        }
        NodeRecord::Blend { mode, left, right } => {
            let node: SharedNode = Arc::new(BlendNode::new(
                blend::from_record(mode)?,
                resolve(*left, built)?,
                resolve(*right, built)?,
            ));
            Ok(node)
        }
    }
}
