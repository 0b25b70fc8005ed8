//! Errors raised by the climate store.
//!
//! Variants say what went wrong from the caller's side; the attached
//! [`ErrorContext`] records where it happened and only ever reaches the logs.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where in the store a failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository operation, e.g. `fetch_precipitation`.
    pub operation: Option<&'static str>,
    /// Table(s) the operation reads.
    pub table: Option<&'static str>,
    /// Free-form detail such as a file path.
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation: Some(operation),
            ..Default::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none() && self.table.is_none() && self.details.is_none()
    }
}

/// Renders as ` [operation=.., table=.., details=..]`, or nothing when empty,
/// so it can trail an error message directly.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let fields = [
            ("operation", self.operation.map(str::to_string)),
            ("table", self.table.map(str::to_string)),
            ("details", self.details.clone()),
        ];
        let parts: Vec<String> = fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
            .collect();
        write!(f, " [{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store could not be reached: the pool had no connection to hand
    /// out or the database file could not be opened.
    #[error("store unavailable: {message}{context}")]
    Unavailable {
        message: String,
        context: ErrorContext,
    },

    /// Another connection holds a lock on the database.
    #[error("store busy: {message}{context}")]
    Busy {
        message: String,
        context: ErrorContext,
    },

    /// The statement itself failed, e.g. a missing table or column.
    #[error("query failed: {message}{context}")]
    Query {
        message: String,
        context: ErrorContext,
    },

    /// Stored or seeded rows did not decode into the expected types.
    #[error("invalid data: {message}{context}")]
    InvalidData {
        message: String,
        context: ErrorContext,
    },

    /// Settings are missing or point at something that is not a climate store.
    #[error("configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// A blocking task did not run to completion.
    #[error("internal error: {message}{context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Replace the attached context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        *self.context_mut() = context;
        self
    }

    /// Record the operation and table, keeping any details already attached.
    pub fn in_operation(mut self, operation: &'static str, table: &'static str) -> Self {
        let context = self.context_mut();
        context.operation = Some(operation);
        context.table = Some(table);
        self
    }

    /// Whether the same read may succeed if issued again later. The service
    /// never retries; this only feeds logs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Busy { .. })
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Unavailable { context, .. }
            | Self::Busy { context, .. }
            | Self::Query { context, .. }
            | Self::InvalidData { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Unavailable { context, .. }
            | Self::Busy { context, .. }
            | Self::Query { context, .. }
            | Self::InvalidData { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }
}

/// SQLite reports `SQLITE_BUSY` and `SQLITE_LOCKED` through diesel only as
/// message text under `DatabaseErrorKind::Unknown`.
#[cfg(feature = "sqlite-repo")]
fn is_lock_contention(message: &str) -> bool {
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("database schema is locked")
}

#[cfg(feature = "sqlite-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error;

        match err {
            Error::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                if is_lock_contention(&message) {
                    RepositoryError::busy(message)
                } else {
                    RepositoryError::query(message).with_context(
                        ErrorContext::default().with_details(format!("kind={:?}", kind)),
                    )
                }
            }
            Error::DeserializationError(e) => RepositoryError::invalid_data(e.to_string()),
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(feature = "sqlite-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display_lists_set_fields() {
        let ctx = ErrorContext {
            operation: Some("fetch_precipitation"),
            table: Some("measurement"),
            details: Some("date >= 2016-08-23".to_string()),
        };
        assert_eq!(
            ctx.to_string(),
            " [operation=fetch_precipitation, table=measurement, details=date >= 2016-08-23]"
        );
    }

    #[test]
    fn test_empty_context_adds_nothing_to_message() {
        assert_eq!(ErrorContext::default().to_string(), "");
        assert_eq!(
            RepositoryError::query("no such table: station").to_string(),
            "query failed: no such table: station"
        );
    }

    #[test]
    fn test_only_unavailable_and_busy_are_retryable() {
        assert!(RepositoryError::unavailable("pool timed out").is_retryable());
        assert!(RepositoryError::busy("database is locked").is_retryable());
        assert!(!RepositoryError::query("no such column: tobs").is_retryable());
        assert!(!RepositoryError::invalid_data("bad date").is_retryable());
        assert!(!RepositoryError::configuration("missing url").is_retryable());
    }

    #[test]
    fn test_in_operation_keeps_details() {
        let err = RepositoryError::query("no such table: measurement")
            .with_context(ErrorContext::default().with_details("kind=Unknown"))
            .in_operation("aggregate_temperature", "measurement");
        let ctx = err.context();
        assert_eq!(ctx.operation, Some("aggregate_temperature"));
        assert_eq!(ctx.table, Some("measurement"));
        assert_eq!(ctx.details.as_deref(), Some("kind=Unknown"));
        assert!(err.to_string().ends_with("table=measurement, details=kind=Unknown]"));
    }

    #[cfg(feature = "sqlite-repo")]
    #[test]
    fn test_sqlite_lock_messages_map_to_busy() {
        use diesel::result::{DatabaseErrorKind, Error};

        let locked = Error::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database is locked".to_string()),
        );
        let err = RepositoryError::from(locked);
        assert!(matches!(err, RepositoryError::Busy { .. }));
        assert!(err.is_retryable());

        let missing = Error::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("no such table: station".to_string()),
        );
        let err = RepositoryError::from(missing);
        assert!(matches!(err, RepositoryError::Query { .. }));
        assert!(!err.is_retryable());
    }
}
