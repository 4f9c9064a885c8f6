#![forbid(unsafe_code)]

pub mod attempt;
pub mod error;
pub mod guard;
pub mod model;
pub mod time;

pub use attempt::{Attempt, AttemptError, AttemptPhase, TickOutcome};
pub use error::Error;
pub use guard::{RouteGuardDecision, evaluate};
pub use time::Clock;
