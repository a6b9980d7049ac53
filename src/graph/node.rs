use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    error::OrogenResult,
    map::HeightMap,
    schema::{GraphCapture, NodeRecord},
};

/// A node of the computation graph, shared between any number of parents.
pub type SharedNode = Arc<dyn Node>;

/// Write-once home for a node's computed height map.
///
/// The cell can only be populated through [`Node::execute`]; a failed
/// production leaves it empty, so a partially computed grid is never
/// observable.
#[derive(Debug, Default)]
pub struct ResultSlot {
    cell: OnceCell<HeightMap>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&HeightMap> {
        self.cell.get()
    }
}

/// A unit of the computation graph producing one height map from zero or
/// more upstream maps.
///
/// Implementors supply the dependency set, the production step and a result
/// slot; the execution driver is the provided [`execute`](Node::execute)
/// method and is the only entry point that produces a result.
pub trait Node: Send + Sync {
    /// Upstream nodes, in order. A snapshot; callers never see the live list.
    fn dependencies(&self) -> Vec<SharedNode>;

    /// The node's own production logic. Invoked by [`execute`](Node::execute)
    /// after every dependency has a result; not meant to be called directly.
    fn produce(&self) -> OrogenResult<HeightMap>;

    fn result_slot(&self) -> &ResultSlot;

    /// Capture this node into a flat record, registering dependencies with
    /// `capture` so shared nodes serialize once.
    fn capture(&self, capture: &mut GraphCapture) -> NodeRecord;

    /// Execute the node, first executing every dependency that has not yet
    /// produced a result.
    ///
    /// Production runs at most once per node instance, no matter how many
    /// times `execute` is called or from how many parents this node is
    /// reached; later calls observe the cached map. A failing dependency's
    /// error propagates unchanged and nothing is cached. Cycles in the graph
    /// are not detected and do not terminate.
    fn execute(&self) -> OrogenResult<&HeightMap> {
        self.result_slot().cell.get_or_try_init(|| {
            for dep in self.dependencies() {
                if dep.result().is_none() {
                    dep.execute()?;
                }
            }
            tracing::trace!("producing node result");
            self.produce()
        })
    }

    /// The cached result, if the node has been executed.
    fn result(&self) -> Option<&HeightMap> {
        self.result_slot().get()
    }
}
