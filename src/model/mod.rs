pub mod ids;
pub mod account;
pub mod plan;
pub mod pod;
pub mod membership;
pub mod notification;

// Re-exports for convenience
pub use account::Account;
pub use ids::Id;
pub use membership::{GoalType, Membership};
pub use notification::Notification;
pub use plan::Plan;
pub use pod::{Cadence, Pod, PodStatus, PodType};
