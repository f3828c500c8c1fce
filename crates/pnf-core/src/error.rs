use thiserror::Error;

/// Errors that abort a whole filter run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input document is not a list of clients.
    #[error("input root must be an array of clients, found {found}")]
    RootNotArray { found: &'static str },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::RootNotArray { found: "object" };
        assert_eq!(
            err.to_string(),
            "input root must be an array of clients, found object"
        );
    }
}
