//! Social network accounts
//!
//! Each supported network has a username format and a profile URL
//! template. The profile URL is built once, at validation time.
//!
//! # Examples
//!
//! ```
//! use rendercv_model::social::{SocialNetwork, SocialNetworkName};
//! use rendercv_model::validation::FieldPath;
//!
//! let account =
//!     SocialNetwork::new(SocialNetworkName::Mastodon, "@jane@fosstodon.org", &FieldPath::root())
//!         .unwrap();
//! assert_eq!(account.url(), "https://fosstodon.org/@jane");
//! ```

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

use crate::validation::{Collector, FieldPath, Record, ValidationError, ValidationErrors};

/// Letters, digits, `.`, `_` and `-`, starting with a letter or digit.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HANDLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

/// `@user` or `@user@instance`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MASTODON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z0-9_]+)(?:@([A-Za-z0-9][A-Za-z0-9.-]*\.[A-Za-z]{2,}))?$")
        .expect("valid regex")
});

/// `<numeric id>/<display name>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STACKOVERFLOW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+/[^/\s]+$").expect("valid regex"));

/// Instance used for Mastodon handles without one.
const DEFAULT_MASTODON_INSTANCE: &str = "mastodon.social";

const SOCIAL_NETWORK_FIELDS: [&str; 2] = ["network", "username"];

/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SocialNetworkName {
    LinkedIn,
    GitHub,
    GitLab,
    Instagram,
    Orcid,
    Mastodon,
    Twitter,
    X,
    StackOverflow,
    ResearchGate,
    YouTube,
}

impl SocialNetworkName {
    pub const ALL: [SocialNetworkName; 11] = [
        SocialNetworkName::LinkedIn,
        SocialNetworkName::GitHub,
        SocialNetworkName::GitLab,
        SocialNetworkName::Instagram,
        SocialNetworkName::Orcid,
        SocialNetworkName::Mastodon,
        SocialNetworkName::Twitter,
        SocialNetworkName::X,
        SocialNetworkName::StackOverflow,
        SocialNetworkName::ResearchGate,
        SocialNetworkName::YouTube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::GitHub => "GitHub",
            Self::GitLab => "GitLab",
            Self::Instagram => "Instagram",
            Self::Orcid => "Orcid",
            Self::Mastodon => "Mastodon",
            Self::Twitter => "Twitter",
            Self::X => "X",
            Self::StackOverflow => "StackOverflow",
            Self::ResearchGate => "ResearchGate",
            Self::YouTube => "YouTube",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == name)
    }

    /// Profile URL prefix; the username (or its path form) follows it.
    fn url_prefix(&self) -> &'static str {
        match self {
            Self::LinkedIn => "https://linkedin.com/in/",
            Self::GitHub => "https://github.com/",
            Self::GitLab => "https://gitlab.com/",
            Self::Instagram => "https://instagram.com/",
            Self::Orcid => "https://orcid.org/",
            Self::Mastodon => "https://",
            Self::Twitter => "https://twitter.com/",
            Self::X => "https://x.com/",
            Self::StackOverflow => "https://stackoverflow.com/users/",
            Self::ResearchGate => "https://researchgate.net/profile/",
            Self::YouTube => "https://youtube.com/@",
        }
    }

    fn username_hint(&self) -> &'static str {
        match self {
            Self::Mastodon => "@user or @user@instance",
            Self::StackOverflow => "<user id>/<name>",
            _ => "letters, digits, '.', '_' or '-'",
        }
    }
}

impl fmt::Display for SocialNetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated account on a supported network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialNetwork {
    network: SocialNetworkName,
    username: String,
    url: String,
}

impl SocialNetwork {
    /// Validate `username` for `network` and build its profile URL.
    pub fn new(
        network: SocialNetworkName,
        username: &str,
        path: &FieldPath,
    ) -> Result<Self, ValidationError> {
        let username_path = path.key("username");
        let invalid = || {
            ValidationError::parse(
                username_path.clone(),
                format!(
                    "'{username}' is not a valid {network} username; expected {}",
                    network.username_hint()
                ),
            )
            .with_input(username)
        };

        let tail = match network {
            SocialNetworkName::Mastodon => {
                let captures = MASTODON_PATTERN.captures(username).ok_or_else(invalid)?;
                let user = captures.get(1).map_or("", |m| m.as_str());
                let instance = captures
                    .get(2)
                    .map_or(DEFAULT_MASTODON_INSTANCE, |m| m.as_str());
                format!("{instance}/@{user}")
            }
            SocialNetworkName::StackOverflow if STACKOVERFLOW_PATTERN.is_match(username) => {
                username.to_string()
            }
            SocialNetworkName::StackOverflow => return Err(invalid()),
            _ if HANDLE_PATTERN.is_match(username) => username.to_string(),
            _ => return Err(invalid()),
        };

        let raw_url = format!("{}{tail}", network.url_prefix());
        let url = url::Url::parse(&raw_url).map_err(|e| {
            ValidationError::parse(
                username_path.clone(),
                format!("'{username}' does not form a valid {network} URL: {e}"),
            )
            .with_input(username)
        })?;

        Ok(Self {
            network,
            username: username.to_string(),
            url: url.to_string(),
        })
    }

    /// Validate a raw `{network, username}` mapping.
    pub fn validate(value: &Value, path: &FieldPath) -> Result<Self, ValidationErrors> {
        let record = Record::from_value(value, path, "SocialNetwork")?;
        let mut collector = Collector::new();

        collector.field(record.reject_unknown(&SOCIAL_NETWORK_FIELDS));
        let network = collector.field(record.required_string("network").and_then(|name| {
            SocialNetworkName::from_name(&name).ok_or_else(|| {
                let expected: Vec<&str> =
                    SocialNetworkName::ALL.iter().map(|n| n.as_str()).collect();
                ValidationError::parse(
                    record.field_path("network"),
                    format!(
                        "'{name}' is not a supported network; expected one of {}",
                        expected.join(", ")
                    ),
                )
                .with_input(name.clone())
            })
        }));
        let username = collector.field(record.required_string("username"));

        let (Some(network), Some(username)) = (network, username) else {
            return Err(collector.into_errors());
        };
        let account = collector.field(Self::new(network, &username, path));
        match account {
            Some(account) => collector.finish(account),
            None => Err(collector.into_errors()),
        }
    }

    pub fn network(&self) -> SocialNetworkName {
        self.network
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Profile URL, e.g. `https://github.com/jane`.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_social_network_urls() {
        let cases = [
            ("LinkedIn", "myusername", "https://linkedin.com/in/myusername"),
            ("GitHub", "myusername", "https://github.com/myusername"),
            ("Instagram", "myusername", "https://instagram.com/myusername"),
            ("Orcid", "myusername", "https://orcid.org/myusername"),
            ("Twitter", "myusername", "https://twitter.com/myusername"),
            ("Mastodon", "@myusername", "https://mastodon.social/@myusername"),
            ("GitLab", "myusername", "https://gitlab.com/myusername"),
            ("X", "myusername", "https://x.com/myusername"),
            ("StackOverflow", "4567/jane", "https://stackoverflow.com/users/4567/jane"),
            ("ResearchGate", "Jane-Doe", "https://researchgate.net/profile/Jane-Doe"),
            ("YouTube", "myusername", "https://youtube.com/@myusername"),
        ];
        for (network, username, expected) in cases {
            let value = json!({"network": network, "username": username});
            let account = SocialNetwork::validate(&value, &FieldPath::root())
                .unwrap_or_else(|e| panic!("{network} {username}: {e}"));
            assert_eq!(account.url(), expected);
        }
    }

    #[test]
    fn test_mastodon_with_instance() {
        let account = SocialNetwork::new(
            SocialNetworkName::Mastodon,
            "@jane@fosstodon.org",
            &FieldPath::root(),
        )
        .unwrap();
        assert_eq!(account.url(), "https://fosstodon.org/@jane");
        assert_eq!(account.username(), "@jane@fosstodon.org");
    }

    #[test]
    fn test_invalid_usernames() {
        let cases = [
            (SocialNetworkName::Mastodon, "invalidmastodon"),
            (SocialNetworkName::Mastodon, "@inva@l@id"),
            (SocialNetworkName::StackOverflow, "jane"),
            (SocialNetworkName::GitHub, "has space"),
            (SocialNetworkName::GitHub, ""),
        ];
        for (network, username) in cases {
            let error = SocialNetwork::new(network, username, &FieldPath::root().key("social"))
                .expect_err(&format!("{network} {username:?} should be rejected"));
            assert_eq!(error.kind, ErrorKind::Parse);
            assert_eq!(error.path.to_string(), "social.username");
        }
    }

    #[test]
    fn test_network_names_are_case_sensitive() {
        assert_eq!(SocialNetworkName::from_name("GitHub"), Some(SocialNetworkName::GitHub));
        assert_eq!(SocialNetworkName::from_name("github"), None);

        let value = json!({"network": "Facebook", "username": "jane"});
        let errors = SocialNetwork::validate(&value, &FieldPath::root()).unwrap_err();
        assert!(errors.has_error_at("network"));
    }

    #[test]
    fn test_missing_fields() {
        let errors = SocialNetwork::validate(&json!({}), &FieldPath::root()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
