//! Shared WebSocket adapter state.
//!
//! The change socket depends on ports only: the profile query resolves the
//! caller's role and the change feed supplies events.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{ChangeFeed, ProfileQuery};

/// Origins permitted to open the change socket.
///
/// `http://localhost:<port>` with an explicit non-zero port is always
/// accepted for local front-end development.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Vec<Url>,
}

impl OriginAllowList {
    /// Allow exactly the given origins plus local development hosts.
    pub fn new(origins: impl IntoIterator<Item = Url>) -> Self {
        Self {
            origins: origins.into_iter().collect(),
        }
    }

    /// Parse origins such as `https://hotel.example`.
    pub fn parse<I, S>(raw: I) -> Result<Self, url::ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = raw
            .into_iter()
            .map(|value| Url::parse(value.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(origins))
    }

    /// Whether a parsed `Origin` header is permitted.
    pub fn allows(&self, origin: &Url) -> bool {
        if origin.scheme() == "http" && origin.host_str() == Some("localhost") {
            return matches!(origin.port(), Some(port) if port != 0);
        }
        let requested = origin.origin();
        self.origins
            .iter()
            .any(|allowed| allowed.origin() == requested)
    }
}

/// Dependency bundle for the change socket.
#[derive(Clone)]
pub struct WsState {
    pub profiles: Arc<dyn ProfileQuery>,
    pub changes: Arc<dyn ChangeFeed>,
    pub origins: OriginAllowList,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        profiles: Arc<dyn ProfileQuery>,
        changes: Arc<dyn ChangeFeed>,
        origins: OriginAllowList,
    ) -> Self {
        Self {
            profiles,
            changes,
            origins,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:4000", true)]
    #[case("http://localhost:0", false)]
    #[case("http://localhost", false)]
    #[case("https://hotel.example", true)]
    #[case("https://hotel.example:443", true)]
    #[case("http://hotel.example", false)]
    #[case("https://admin.hotel.example", false)]
    #[case("https://hotel.example.evil.com", false)]
    fn evaluates_allow_list(#[case] origin: &str, #[case] expected: bool) {
        let allow = OriginAllowList::parse(["https://hotel.example"]).expect("valid origins");
        let parsed = Url::parse(origin).expect("url should parse");
        assert_eq!(allow.allows(&parsed), expected);
    }

    #[rstest]
    fn rejects_unparsable_configuration() {
        assert!(OriginAllowList::parse(["not a url"]).is_err());
    }
}
