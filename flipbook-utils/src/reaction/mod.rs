//! Reaction filtering and consumption primitives.

mod consume;
mod filter;
mod monitor;

pub use consume::{ConsumptionSession, REMOVAL_PACE};
pub use filter::{ReactionConstraint, ReactionFilter};
pub use monitor::SerialReactionMonitor;
