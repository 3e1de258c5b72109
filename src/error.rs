/// Error type for cache operations.
///
/// A missing key is not an error: reads return `Ok(None)` instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The backing store could not serve a primitive operation.
    #[error("[{tier}] store unavailable for key '{key}': {message}")]
    StoreUnavailable {
        tier: String,
        key: String,
        message: String,
    },
    /// A converter could not interpret the raw stored value.
    #[error("cannot convert value stored at '{key}': {message}")]
    Conversion { key: String, message: String },
    /// The external fetch capability failed for a resource.
    #[error("fetch failed for '{resource}': {message}")]
    Fetch { resource: String, message: String },
    /// Serialization or deserialization of a report failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Create a new store-unavailable error.
    pub fn unavailable(
        tier: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CacheError::StoreUnavailable {
            tier: tier.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new conversion error.
    pub fn conversion(key: impl Into<String>, message: impl Into<String>) -> Self {
        CacheError::Conversion {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new fetch error.
    pub fn fetch(resource: impl Into<String>, message: impl Into<String>) -> Self {
        CacheError::Fetch {
            resource: resource.into(),
            message: message.into(),
        }
    }
}
