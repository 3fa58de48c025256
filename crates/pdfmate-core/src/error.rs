use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfMateError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("{0} is password protected. Please remove the password first.")]
    PasswordProtected(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Free plan limit reached: {0}")]
    LimitExceeded(String),
}

impl PdfMateError {
    /// True for the load failure that a user can fix by removing a password.
    pub fn is_password_protected(&self) -> bool {
        matches!(self, PdfMateError::PasswordProtected(_))
    }
}
