use std::sync::{Mutex, PoisonError};

use crate::{
    effect::Effect,
    error::OrogenResult,
    graph::node::{Node, ResultSlot, SharedNode},
    map::HeightMap,
    schema::{GraphCapture, NodeRecord},
};

/// Applies an ordered chain of effects to one source node's result.
///
/// Each effect consumes the previous effect's output (or the source result
/// for the first); with zero effects the result has exactly the source's
/// values.
pub struct EffectChainNode {
    source: SharedNode,
    effects: Mutex<Vec<Box<dyn Effect>>>,
    slot: ResultSlot,
}

impl EffectChainNode {
    pub fn new(source: SharedNode) -> Self {
        Self::with_effects(source, Vec::new())
    }

    pub fn with_effects(source: SharedNode, effects: Vec<Box<dyn Effect>>) -> Self {
        Self {
            source,
            effects: Mutex::new(effects),
            slot: ResultSlot::new(),
        }
    }

    /// Append an effect to the end of the chain. Valid until first execution.
    pub fn add_effect(&self, effect: Box<dyn Effect>) {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }

    pub fn source(&self) -> &SharedNode {
        &self.source
    }

    pub fn effect_count(&self) -> usize {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Node for EffectChainNode {
    fn dependencies(&self) -> Vec<SharedNode> {
        vec![self.source.clone()]
    }

    fn produce(&self) -> OrogenResult<HeightMap> {
        let mut map = self.source.execute()?.clone();
        let effects = self.effects.lock().unwrap_or_else(PoisonError::into_inner);
        for effect in effects.iter() {
            map = effect.apply(&map);
        }
        Ok(map)
    }

    fn result_slot(&self) -> &ResultSlot {
        &self.slot
    }

    fn capture(&self, capture: &mut GraphCapture) -> NodeRecord {
        let source = capture.reference(&self.source);
        let effects = self
            .effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.record())
            .collect();
        NodeRecord::EffectChain { source, effects }
    }
}
