//! Pure trade-outcome calculation core. Operates on immutable settings
//! snapshots; never touches the database or the clock.

pub mod feedback;
pub mod multi_close;
pub mod outcome;

pub use feedback::{classify, Feedback, FeedbackTier};
pub use multi_close::calculate_multi_close;
pub use outcome::{calculate_outcome, manual_outcome, TradeOutcome};
