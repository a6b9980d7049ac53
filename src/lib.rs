#![forbid(unsafe_code)]

pub mod blend;
pub mod effect;
pub mod error;
pub mod export;
pub mod graph;
pub mod map;
pub mod math;
pub mod schema;

pub use blend::{BlendMode, Darken, Lighten, Multiply, Screen};
pub use effect::Effect;
pub use error::{OrogenError, OrogenResult};
pub use graph::{BlendNode, ConstantNode, EffectChainNode, MixNode, Node, ResultSlot, SharedNode};
pub use map::{HeightMap, Map};
pub use schema::{GraphDoc, capture_graph, restore_graph};
