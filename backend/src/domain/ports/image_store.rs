//! Port for publishing hotel images to object storage.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The backing storage could not be reached.
        Unavailable { message: String } => "image store unavailable: {message}",
        /// Writing the object failed.
        Write { message: String } => "image store write failed: {message}",
    }
}

/// Object key for an uploaded image: `<unix-millis>-<sanitised file name>`.
///
/// # Examples
/// ```
/// use backend::domain::ports::ImageKey;
/// use chrono::DateTime;
///
/// let at = DateTime::from_timestamp_millis(1_700_000_000_123).expect("timestamp");
/// let key = ImageKey::new(at, "../My Hotel (front).JPG");
/// assert_eq!(key.as_str(), "1700000000123-My-Hotel--front-.JPG");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageKey(String);

impl ImageKey {
    /// Build the key for a file uploaded at `uploaded_at`.
    ///
    /// Directory components are dropped and every character outside
    /// `[A-Za-z0-9._-]` becomes `-`, so the key is always a single flat name.
    pub fn new(uploaded_at: DateTime<Utc>, file_name: &str) -> Self {
        let base = file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        let sanitised: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let sanitised = sanitised.trim_start_matches('.');
        let name = if sanitised.is_empty() { "image" } else { sanitised };
        Self(format!("{}-{name}", uploaded_at.timestamp_millis()))
    }

    /// Accept a previously issued key, rejecting anything that is not a
    /// single flat file name.
    pub fn parse(raw: &str) -> Option<Self> {
        let flat = !raw.is_empty()
            && !raw.starts_with('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        flat.then(|| Self(raw.to_owned()))
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Port for storing image bytes and returning their public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `key` and return the URL clients load it from.
    async fn upload(&self, key: &ImageKey, bytes: &[u8]) -> Result<String, ImageStoreError>;

    /// Read a stored image, or `None` when nothing is stored under `key`.
    async fn fetch(&self, key: &ImageKey) -> Result<Option<Vec<u8>>, ImageStoreError>;
}
