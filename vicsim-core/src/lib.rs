//! # Victoria Simulation Core
//!
//! Command validation and execution for a deterministic grand-strategy
//! simulation.
//!
//! Players never mutate the world directly. Every action is submitted as a
//! small payload, queued, and applied by the simulation thread at the start of
//! the next tick. Peers running the same command stream on the same world end
//! up bit-identical, which [`WorldState::checksum`] lets them verify.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────────────┐
//! │  UI / AI /  │────▶│ CommandQueue │────▶│ process_pending_commands │
//! │  wire::recv │     │ (bounded)    │     │ (re-validate, apply)     │
//! └─────────────┘     └──────────────┘     └────────────┬─────────────┘
//!                                                       │
//!                     ┌──────────────┐     ┌────────────▼─────────────┐
//!                     │  Renderer    │◀────│ WorldState               │
//!                     │ (state flag) │     │ (mutated in place)       │
//!                     └──────────────┘     └──────────────────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`WorldState`] | Nations, provinces, wars, relations and pending constructions |
//! | [`Command`] | One player intent (research, influence, construction, ...) |
//! | [`Payload`] | A command plus the nation issuing it |
//! | [`CommandQueue`] | Bounded multi-producer FIFO between submitters and the tick |
//! | [`process_pending_commands`] | Drains the queue and applies each command |
//!
//! ## Commands
//!
//! Actions live in [`commands`], grouped by area. Each has a submission
//! function, a `can_*` predicate and an `execute_*` effect; an executor whose
//! predicate fails is a silent no-op. [`step::can_execute`] exposes the
//! predicate for any payload.

pub mod colonization;
pub mod commands;
pub mod config;
pub mod diplomacy;
pub mod fixed;
pub mod influence;
pub mod input;
pub mod queue;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;
pub mod wire;

pub use config::SimConfig;
pub use fixed::Fixed;
pub use input::{Command, CommandKind, Payload};
pub use queue::CommandQueue;
pub use state::WorldState;
pub use step::{can_execute, process_pending_commands};
