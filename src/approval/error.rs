use sea_orm::DbErr;

/// Approval pipeline errors.
#[derive(Debug)]
pub enum ApprovalError {
    /// Referenced approval log entry or blog does not exist
    NotFound { kind: &'static str, id: i32 },
    /// Entry is not pending, or the requested outcome is not a valid code
    InvalidStateTransition(String),
    /// Persistence failure, passed through unchanged
    Database(DbErr),
}

impl ApprovalError {
    pub(crate) fn log_not_found(id: i32) -> Self {
        ApprovalError::NotFound {
            kind: "approval log",
            id,
        }
    }

    pub(crate) fn blog_not_found(id: i32) -> Self {
        ApprovalError::NotFound { kind: "blog", id }
    }
}

impl std::fmt::Display for ApprovalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalError::NotFound { kind, id } => write!(f, "Not found: {} #{}", kind, id),
            ApprovalError::InvalidStateTransition(msg) => {
                write!(f, "Invalid state transition: {}", msg)
            }
            ApprovalError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ApprovalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApprovalError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbErr> for ApprovalError {
    fn from(e: DbErr) -> Self {
        ApprovalError::Database(e)
    }
}
