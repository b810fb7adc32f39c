use thiserror::Error;

#[derive(Debug, Error)]
pub enum AjoError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be positive")]
    NonPositive { field: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("Pod is full ({capacity} members)")]
    PodFull { capacity: i32 },

    #[error("Pod is no longer accepting members")]
    JoinClosed,

    #[error("Account is already a member of this pod")]
    AlreadyMember,

    #[error("A goal note is required for this goal type")]
    GoalNoteRequired,

    #[error("Invalid invite code: {0}")]
    InvalidInviteCode(String),

    #[error("Expected member count cannot exceed pod capacity")]
    ExpectedCountExceedsCapacity,

    #[error("Payout order has already been finalized")]
    OrderAlreadyFinalized,

    #[error("Pod is completed and cannot be modified")]
    PodCompleted,

    #[error("Pod is not active")]
    PodNotActive,

    #[error("Membership has already been paid out")]
    AlreadyPaidOut,

    #[error("Payout is not due yet")]
    PayoutNotDue,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type AjoResult<T> = Result<T, AjoError>;
