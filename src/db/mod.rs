pub mod schema;
pub mod account_repo;
pub mod plan_repo;
pub mod pod_repo;
pub mod membership_repo;
pub mod notification_repo;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{AjoError, AjoResult};
use crate::model::Id;

/// Parse a stored UUID string into a typed id.
pub(crate) fn parse_id<T>(s: &str) -> AjoResult<Id<T>> {
    Ok(Id::new(Uuid::parse_str(s).map_err(|e| {
        AjoError::Other(format!("Invalid UUID: {}", e))
    })?))
}

pub(crate) fn parse_opt_id<T>(s: Option<String>) -> AjoResult<Option<Id<T>>> {
    match s {
        Some(s) => parse_id(&s).map(Some),
        None => Ok(None),
    }
}

/// Dates are stored as ISO `YYYY-MM-DD` text.
pub(crate) fn parse_date(s: &str) -> AjoResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| AjoError::Other(format!("Invalid date '{}': {}", s, e)))
}

pub(crate) fn parse_opt_date(s: Option<String>) -> AjoResult<Option<NaiveDate>> {
    match s {
        Some(s) => parse_date(&s).map(Some),
        None => Ok(None),
    }
}
