use std::error::Error;

/// An error raised by a [PathGraph](crate::PathGraph) while answering a query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StorageError {
    /// Builds an error from a printable error message.
    pub fn msg(msg: impl Into<String>) -> Self {
        Self::Other(msg.into().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_displayed() {
        let error = StorageError::msg("graph unavailable");
        assert_eq!(error.to_string(), "graph unavailable");
        assert!(error.source().is_some());
    }
}
