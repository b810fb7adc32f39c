pub mod schedule;
pub mod ordering;
pub mod payout;
pub mod lifecycle;

pub use lifecycle::{LifecycleEvent, GRACE_PERIOD_DAYS};
pub use ordering::QueueView;
pub use payout::PayoutBreakdown;
