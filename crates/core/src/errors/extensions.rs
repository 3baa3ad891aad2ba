//! Extension traits for error handling

use super::types::{Error, Result};

/// Shorthands for turning foreign results into cellar errors
pub trait ResultExt<T> {
    /// Attach the stored key a decode error came from
    fn with_key(self, key: &str) -> Result<T>;

    /// Report the failure as a configuration error, prefixed with a lazy message
    fn config_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_key(self, key: &str) -> Result<T> {
        self.map_err(|e| e.into().for_key(key))
    }

    fn config_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::configuration(format!("{}: {}", f(), e.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_key_marks_decode_errors() {
        let result: Result<()> = Err(Error::decode("truncated"));
        match result.with_key("cellar_tasks_v3") {
            Err(Error::Decode { key: Some(key), .. }) => assert_eq!(key, "cellar_tasks_v3"),
            other => panic!("expected keyed decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_context_wraps_json_errors() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err = parsed
            .config_context(|| "invalid config file 'cellar.json'".to_string())
            .unwrap_err();
        match err {
            Error::Configuration { message } => {
                assert!(message.starts_with("invalid config file 'cellar.json': "));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}
