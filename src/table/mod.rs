//! Betting-rules collaborator and the value types trees snapshot.
pub mod action;
pub mod holdem;
pub mod params;
pub mod pot;
pub mod rules;
pub mod seat;
pub mod state;
pub mod street;

pub use action::*;
pub use holdem::*;
pub use params::*;
pub use pot::*;
pub use rules::*;
pub use seat::*;
pub use state::*;
pub use street::*;
