//! The game tree: node variants, their wire format, lazy references into
//! persisted trees, per-decision-point policies, and the passes that grow,
//! walk, prune, and persist trees.
pub mod chance;
pub mod decoder;
pub mod discard;
pub mod draw;
pub mod expand;
pub mod file;
pub mod generate;
pub mod kind;
pub mod node;
pub mod player;
pub mod policies;
pub mod reference;
pub mod root;
pub mod runes;
pub mod slot;
pub mod terminal;
pub mod visit;

pub use chance::*;
pub use decoder::*;
pub use discard::*;
pub use draw::*;
pub use expand::*;
pub use file::*;
pub use generate::*;
pub use kind::*;
pub use node::*;
pub use player::*;
pub use policies::*;
pub use reference::*;
pub use root::*;
pub use runes::*;
pub use slot::*;
pub use terminal::*;
pub use visit::*;
