//! Endpoint catalog for the Quantum API.
//!
//! Every remote operation is a GET against a path template with a fixed
//! set of accepted query parameters. The catalog holds those templates as
//! data; the typed wrapper methods on [`QuantumClient`](crate::QuantumClient)
//! in [`projects`] and [`analytics`] are thin shells over it.

mod analytics;
mod catalog;
mod projects;

use std::fmt;
use std::str::FromStr;

use crate::error::{QuantumError, Result};
use crate::params::Params;

pub use analytics::{PostsQuery, StatQuery};
pub use catalog::*;

/// HTTP methods known to the API interface.
///
/// Only [`Method::Get`] is implemented by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Social networks tracked by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Facebook,
    Twitter,
    Instagram,
    YouTube,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Network; 4] = [
        Network::Facebook,
        Network::Twitter,
        Network::Instagram,
        Network::YouTube,
    ];

    /// Path segment naming the network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::YouTube => "youtube",
        }
    }

    /// Path segment naming the network's audience (fans, followers...).
    pub fn audience(&self) -> &'static str {
        match self {
            Self::Facebook => "fans",
            Self::Twitter | Self::Instagram => "followers",
            Self::YouTube => "subscribers",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown network name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown network '{0}': expected facebook, twitter, instagram or youtube")]
pub struct ParseNetworkError(String);

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNetworkError(s.to_string()))
    }
}

/// Values for the placeholders of a path template.
///
/// The account placeholder is always filled from the client's session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    pub project: Option<String>,
    pub profile: Option<String>,
    pub network: Option<Network>,
}

impl PathArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn project(mut self, project: impl ToString) -> Self {
        self.project = Some(project.to_string());
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: impl ToString) -> Self {
        self.profile = Some(profile.to_string());
        self
    }

    #[must_use]
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }
}

/// One remote operation: method, path template and accepted parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Logical operation name.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template relative to the versioned API root.
    pub template: &'static str,
    /// Query parameter names the endpoint accepts.
    pub params: &'static [&'static str],
    /// Whether responses carry a `paging.next` cursor.
    pub paginated: bool,
}

impl Endpoint {
    /// Fill the path template.
    ///
    /// Placeholder values are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the template needs a value `args` does not carry.
    pub fn path(&self, account_id: &str, args: &PathArgs) -> Result<String> {
        let mut path = String::with_capacity(self.template.len() + 16);

        for segment in self.template.split('/').filter(|s| !s.is_empty()) {
            path.push('/');

            let Some(name) = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            else {
                path.push_str(segment);
                continue;
            };

            let value = match name {
                "account" => Some(account_id),
                "project" => args.project.as_deref(),
                "profile" => args.profile.as_deref(),
                "network" => args.network.map(|n| n.as_str()),
                "audience" => args.network.map(|n| n.audience()),
                _ => None,
            };

            let value = value.ok_or_else(|| QuantumError::MissingPathArgument {
                endpoint: self.name,
                name: name.to_string(),
            })?;
            path.push_str(&urlencoding::encode(value));
        }

        Ok(path)
    }

    /// Reject parameters the endpoint does not accept.
    ///
    /// Parameters holding `null` are ignored, they are never transmitted.
    ///
    /// # Errors
    ///
    /// Returns [`QuantumError::InvalidParameter`] for the first unknown name.
    pub fn check_params(&self, params: &Params) -> Result<()> {
        let unknown = params
            .names()
            .filter(|name| params.get(name).is_some_and(|v| !v.is_null()))
            .find(|name| !self.params.iter().any(|accepted| accepted == name));

        match unknown {
            Some(name) => Err(QuantumError::InvalidParameter {
                endpoint: self.name,
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_fills_placeholders() {
        let args = PathArgs::new().project(2).profile("3").network(Network::Facebook);
        assert_eq!(
            POSTS.path("1", &args).unwrap(),
            "/accounts/1/projects/2/facebook/profiles/3/posts"
        );
    }

    #[test]
    fn test_path_audience_segment() {
        let args = PathArgs::new().project(4).network(Network::YouTube);
        assert_eq!(
            AUDIENCE_COUNT_BY_DATE.path("741", &args).unwrap(),
            "/accounts/741/projects/4/youtube/subscribers/count/date"
        );
    }

    #[test]
    fn test_path_encodes_values() {
        let args = PathArgs::new().project("a/b c");
        assert_eq!(
            PROJECT.path("1", &args).unwrap(),
            "/accounts/1/projects/a%2Fb%20c"
        );
    }

    #[test]
    fn test_path_missing_argument() {
        let err = STAT_SUMMARY.path("1", &PathArgs::new().project(2)).unwrap_err();
        assert!(matches!(
            err,
            QuantumError::MissingPathArgument { endpoint: "stat_summary", ref name } if name == "network"
        ));
    }

    #[test]
    fn test_check_params() {
        let ok = Params::new().with("since", "2015-01-01").with("owner", serde_json::Value::Null);
        assert!(STAT_SUMMARY.check_params(&ok).is_ok());

        let bad = Params::new().with("owner", "admin");
        assert!(matches!(
            STAT_SUMMARY.check_params(&bad),
            Err(QuantumError::InvalidParameter { name, .. }) if name == "owner"
        ));
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("YouTube".parse::<Network>().unwrap(), Network::YouTube);
        assert_eq!("twitter".parse::<Network>().unwrap(), Network::Twitter);
        assert!("myspace".parse::<Network>().is_err());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
