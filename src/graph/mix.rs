use std::sync::{Mutex, PoisonError};

use crate::{
    error::{OrogenError, OrogenResult},
    graph::node::{Node, ResultSlot, SharedNode},
    map::{HeightMap, Map},
    math,
    schema::{GraphCapture, NodeRecord, WeightedRef},
};

/// Mixes the height maps of its dependencies, each scaled by a weight, in the
/// order they were added.
///
/// Every fold step clamps the running value to `[0, 1]`, so the outcome is
/// path-dependent on insertion order, not just on the final linear
/// combination.
pub struct MixNode {
    size: Option<(usize, usize)>,
    deps: Mutex<Vec<WeightedDep>>,
    slot: ResultSlot,
}

#[derive(Clone)]
struct WeightedDep {
    node: SharedNode,
    weight: f64,
}

impl MixNode {
    /// The result takes the dimensions of the first added dependency.
    pub fn new() -> Self {
        Self {
            size: None,
            deps: Mutex::new(Vec::new()),
            slot: ResultSlot::new(),
        }
    }

    /// The result has the given fixed dimensions, starting from a zero base.
    pub fn with_size(height: usize, width: usize) -> Self {
        Self {
            size: Some((height, width)),
            ..Self::new()
        }
    }

    /// Append a dependency with a weight (the fraction of the dependency
    /// added into the mix; not bounded to `[0, 1]`).
    ///
    /// Valid until first execution; appending afterwards has no effect on the
    /// already-cached result and is a caller error.
    pub fn add_dependency(&self, node: SharedNode, weight: f64) {
        self.deps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(WeightedDep { node, weight });
    }

    pub fn dependency_count(&self) -> usize {
        self.deps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn snapshot(&self) -> Vec<WeightedDep> {
        self.deps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn base_map(&self, deps: &[WeightedDep]) -> OrogenResult<HeightMap> {
        match self.size {
            Some((height, width)) => Map::new(height, width),
            None => {
                let first = deps[0].node.execute()?;
                Map::new(first.height(), first.width())
            }
        }
    }
}

impl Default for MixNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for MixNode {
    fn dependencies(&self) -> Vec<SharedNode> {
        self.snapshot().into_iter().map(|d| d.node).collect()
    }

    fn produce(&self) -> OrogenResult<HeightMap> {
        let deps = self.snapshot();
        if deps.is_empty() {
            return Err(OrogenError::invalid_operation(
                "cannot execute a mix node without any dependencies",
            ));
        }

        let mut base = self.base_map(&deps)?;
        for dep in &deps {
            let mix = dep.node.execute()?;
            base.for_each_mut(|row, col, cell| {
                if let Some(&v) = mix.cell(row, col) {
                    *cell = math::clamp01(*cell + v * dep.weight);
                }
            });
        }
        Ok(base)
    }

    fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    fn capture(&self, capture: &mut GraphCapture) -> NodeRecord {
        let inputs = self
            .snapshot()
            .iter()
            .map(|dep| WeightedRef {
                node: capture.reference(&dep.node),
                weight: dep.weight,
            })
            .collect();
        NodeRecord::Mix {
            size: self.size.map(|(h, w)| [h, w]),
            inputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::constant::ConstantNode;

    fn constant(height: usize, width: usize, value: f64) -> SharedNode {
        Arc::new(ConstantNode::new(height, width, value))
    }

    #[test]
    fn no_dependencies_is_invalid_and_caches_nothing() {
        let node = MixNode::new();
        assert!(matches!(
            node.execute(),
            Err(OrogenError::InvalidOperation(_))
        ));
        assert!(node.result().is_none());
    }

    #[test]
    fn clamps_after_every_fold_step() {
        let node = MixNode::new();
        node.add_dependency(constant(2, 2, 0.6), 1.0);
        node.add_dependency(constant(2, 2, 0.6), 1.0);

        let map = node.execute().unwrap();
        map.for_each(|_, _, &v| assert_eq!(v, 1.0));
    }

    #[test]
    fn insertion_order_changes_the_outcome() {
        // With per-step clamping, folding a negative weight before or after
        // a positive one gives different results.
        let forward = MixNode::new();
        forward.add_dependency(constant(1, 1, 0.8), 1.0);
        forward.add_dependency(constant(1, 1, 0.6), -1.0);
        assert!((forward.execute().unwrap().get(0, 0).unwrap() - 0.2).abs() < 1e-12);

        let reversed = MixNode::new();
        reversed.add_dependency(constant(1, 1, 0.6), -1.0);
        reversed.add_dependency(constant(1, 1, 0.8), 1.0);
        assert!((reversed.execute().unwrap().get(0, 0).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn sizes_from_first_dependency_by_default() {
        let node = MixNode::new();
        node.add_dependency(constant(3, 4, 0.25), 1.0);
        node.add_dependency(constant(9, 9, 0.25), 1.0);

        let map = node.execute().unwrap();
        assert_eq!((map.height(), map.width()), (3, 4));
        map.for_each(|_, _, &v| assert_eq!(v, 0.5));
    }

    #[test]
    fn fixed_size_leaves_uncovered_cells_at_zero() {
        let node = MixNode::with_size(3, 3);
        node.add_dependency(constant(2, 2, 0.4), 0.5);

        let map = node.execute().unwrap();
        map.for_each(|row, col, &v| {
            if row < 2 && col < 2 {
                assert!((v - 0.2).abs() < 1e-12);
            } else {
                assert_eq!(v, 0.0);
            }
        });
    }

    #[test]
    fn weights_scale_contributions() {
        let node = MixNode::new();
        node.add_dependency(constant(1, 1, 0.5), 0.5);
        node.add_dependency(constant(1, 1, 0.5), 0.2);

        let map = node.execute().unwrap();
        assert!((map.get(0, 0).unwrap() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let node = MixNode::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        node.add_dependency(constant(1, 1, 0.1), 0.1);
                    }
                });
            }
        });
        assert_eq!(node.dependency_count(), 200);
    }
}
