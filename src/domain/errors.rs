use derive_more::Display;

/// Failure of one fetch attempt or of a whole fetch cycle
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FetchError {
    /// Another fetch (or its retry wait) is still outstanding; the request was dropped.
    #[display(fmt = "fetch already in flight")]
    InFlight,
    #[display(fmt = "transport error: {}", _0)]
    Transport(String),
    #[display(fmt = "HTTP error! status: {} {}", code, text)]
    Status { code: u16, text: String },
    #[display(fmt = "failed to decode payload: {}", _0)]
    Decode(String),
    #[display(fmt = "gave up after {} attempts: {}", attempts, last_error)]
    Exhausted { attempts: u32, last_error: String },
}

impl FetchError {
    /// Errors worth another attempt within the same cycle
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. } | FetchError::Decode(_))
    }
}

impl std::error::Error for FetchError {}

/// Rejected comparison intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SelectionError {
    #[display(fmt = "You can only compare up to {} cryptocurrencies at a time.", max)]
    CapacityExceeded { max: usize },
}

impl std::error::Error for SelectionError {}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StorageError {
    #[display(fmt = "storage unavailable: {}", _0)]
    Unavailable(String),
    #[display(fmt = "failed to write '{}': {}", key, reason)]
    Write { key: String, reason: String },
}

impl std::error::Error for StorageError {}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_limit() {
        let err = SelectionError::CapacityExceeded { max: 5 };
        assert_eq!(err.to_string(), "You can only compare up to 5 cryptocurrencies at a time.");
    }

    #[test]
    fn in_flight_is_not_retryable() {
        assert!(!FetchError::InFlight.is_retryable());
        assert!(FetchError::Status { code: 429, text: "Too Many Requests".into() }.is_retryable());
        assert!(FetchError::Decode("eof".into()).is_retryable());
    }
}
