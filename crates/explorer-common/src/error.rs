use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_display_includes_context() {
        let e = Error::Config("unknown network".into());
        assert_eq!(e.to_string(), "configuration error: unknown network");

        let e = Error::Storage("lock poisoned".into());
        assert_eq!(e.to_string(), "storage error: lock poisoned");
    }

    #[test]
    fn serde_errors_convert() {
        let err = serde_json::from_str::<bool>("nope").unwrap_err();
        let e: Error = err.into();
        assert!(matches!(e, Error::Serialization(_)));
        assert!(e.to_string().starts_with("serialization error:"));
    }
}
