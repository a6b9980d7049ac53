use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use orogen::{
    BlendNode, ConstantNode, Darken, EffectChainNode, HeightMap, Map, MixNode, Node, OrogenResult,
    ResultSlot, SharedNode,
    effect::{Normalize, Offset, Scale},
    schema::{GraphCapture, NodeRecord},
};

/// Counts production runs; used to observe exactly-once execution through a
/// full pipeline.
struct CountingSource {
    value: f64,
    calls: AtomicUsize,
    slot: ResultSlot,
}

impl CountingSource {
    fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
            slot: ResultSlot::new(),
        }
    }
}

impl Node for CountingSource {
    fn dependencies(&self) -> Vec<SharedNode> {
        Vec::new()
    }

    fn produce(&self) -> OrogenResult<HeightMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Map::filled(4, 4, self.value)
    }

    fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    fn capture(&self, _capture: &mut GraphCapture) -> NodeRecord {
        NodeRecord::Constant {
            height: 4,
            width: 4,
            value: self.value,
        }
    }
}

#[test]
fn full_pipeline_produces_expected_heights() {
    // two constants -> weighted mix -> effect chain -> darken against a cap
    let low: SharedNode = Arc::new(ConstantNode::new(4, 4, 0.2));
    let high: SharedNode = Arc::new(ConstantNode::new(4, 4, 0.8));

    let mix = MixNode::new();
    mix.add_dependency(low, 0.5); // 0.1
    mix.add_dependency(high, 0.5); // 0.5
    let mix: SharedNode = Arc::new(mix);

    let chain: SharedNode = Arc::new(EffectChainNode::with_effects(
        mix,
        vec![
            Box::new(Scale { factor: 2.0 }),  // 1.0
            Box::new(Offset { delta: -0.3 }), // 0.7
        ],
    ));

    let cap: SharedNode = Arc::new(ConstantNode::new(4, 4, 0.6));
    let root = BlendNode::new(Box::new(Darken), chain, cap);

    let map = root.execute().unwrap();
    assert_eq!((map.height(), map.width()), (4, 4));
    map.for_each(|_, _, &v| assert!((v - 0.6).abs() < 1e-12));
}

#[test]
fn diamond_graph_runs_shared_node_once() {
    let source = Arc::new(CountingSource::new(0.5));
    let shared: SharedNode = source.clone();

    let left: SharedNode = Arc::new(EffectChainNode::with_effects(
        shared.clone(),
        vec![Box::new(Offset { delta: 0.2 })],
    ));
    let right: SharedNode = Arc::new(EffectChainNode::with_effects(
        shared,
        vec![Box::new(Scale { factor: 0.5 })],
    ));

    let mix = MixNode::new();
    mix.add_dependency(left, 1.0); // 0.7
    mix.add_dependency(right, 1.0); // + 0.25 = 0.95

    let map = mix.execute().unwrap();
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    map.for_each(|_, _, &v| assert!((v - 0.95).abs() < 1e-12));
}

#[test]
fn repeated_execution_observes_the_same_map() {
    let source = Arc::new(CountingSource::new(0.3));
    let shared: SharedNode = source.clone();
    let chain = EffectChainNode::with_effects(shared, vec![Box::new(Normalize)]);

    let first = chain.execute().unwrap().clone();
    let second = chain.execute().unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_execution_still_produces_once() {
    let source = Arc::new(CountingSource::new(0.4));
    let shared: SharedNode = source.clone();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let node = shared.clone();
            scope.spawn(move || {
                node.execute().unwrap();
            });
        }
    });

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}
