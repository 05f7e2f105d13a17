//! Narrow world-store services the command executors call into.
//!
//! None of these advance time; they answer questions about the current world
//! or apply one bookkeeping change.

pub mod economy;
pub mod events;
pub mod military;
pub mod nations;
pub mod politics;
pub mod provinces;
pub mod rebels;
