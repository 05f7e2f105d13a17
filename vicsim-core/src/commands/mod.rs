//! Player commands: submission, eligibility and effect.
//!
//! Every action comes as a triple:
//!
//! - a submission function named after the action, which builds a
//!   [`Payload`] and enqueues it without validating anything;
//! - `can_<action>`, a pure predicate over the current world;
//! - `execute_<action>`, which re-checks the predicate against the world as
//!   it is *now* and silently does nothing when it no longer holds.
//!
//! A command may have been legal on the submitting peer and illegal by the time
//! the tick runs it, so the re-check is what keeps every peer identical.

pub mod colonial;
pub mod diplomacy;
pub mod domestic;
pub mod economy;
pub mod influence;
pub mod military;

use crate::input::{Command, Payload};
use crate::state::{NationId, WorldState};

fn submit(state: &WorldState, source: NationId, command: Command) -> bool {
    state.incoming_commands.enqueue(Payload::new(source, command))
}
