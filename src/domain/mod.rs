//! Domain layer - pure assistant logic.
//!
//! Nothing in here performs I/O. Remote calls are described as effects and
//! carried out by the application layer.

pub mod actions;
pub mod conversation;
pub mod foundation;
pub mod marketplace;
pub mod routing;
pub mod tone;
pub mod wizard;
