//! Little-endian, fixed-width primitives shared by every persisted type.
//!
//! Optional fields are written as a length prefix of some fixed width
//! followed by that many bytes of body. An absent field is written as the
//! all-ones value of the prefix width; readers also accept a zero length.
pub mod counter;
pub mod prefix;
pub mod wire;

pub use counter::*;
pub use prefix::*;
pub use wire::*;
