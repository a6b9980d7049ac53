mod blend;
mod constant;
mod effects;
mod mix;
mod node;

pub use blend::BlendNode;
pub use constant::ConstantNode;
pub use effects::EffectChainNode;
pub use mix::MixNode;
pub use node::{Node, ResultSlot, SharedNode};
