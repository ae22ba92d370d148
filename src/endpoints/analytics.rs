//! Profile statistics and post listings.

use chrono::NaiveDate;
use serde::Serialize;

use super::{
    Endpoint, Network, PathArgs, AUDIENCE_COUNT_BY_DATE, ENGAGEMENT_RATE_BY_DATE,
    FACEBOOK_FANS_TOTAL_BY_COUNTRY, FACEBOOK_POSTS_INTERACTIONS_BY_DATE,
    INTERACTIONS_COUNT_BY_DATE, POSTS, POSTS_COUNT_BY_DATE, STAT_SUMMARY,
};
use crate::client::QuantumClient;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::pagination::Paginator;
use crate::params::Params;

const DEFAULT_TIMEZONE: &str = "UTC";

/// Date range and profile selection shared by the statistics endpoints.
///
/// `owner` and `post_type` are only accepted by
/// [`QuantumClient::posts_count_by_date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatQuery {
    pub since: NaiveDate,
    pub until: NaiveDate,
    /// Profile ids to restrict to; all of the project's profiles when `None`.
    pub ids: Option<Vec<String>>,
    pub timezone: String,
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
}

impl StatQuery {
    /// Query the inclusive range `since..=until` in UTC.
    #[must_use]
    pub fn new(since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            since,
            until,
            ids: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            owner: None,
            post_type: None,
        }
    }

    #[must_use]
    pub fn ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.ids = Some(ids.into_iter().map(|id| id.to_string()).collect());
        self
    }

    #[must_use]
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = Some(post_type.into());
        self
    }
}

/// Filters for a profile's post listing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostsQuery {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    /// Page size requested from the server.
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub timezone: Option<String>,
}

impl QuantumClient {
    async fn stat(
        &self,
        endpoint: &Endpoint,
        args: PathArgs,
        query: &StatQuery,
    ) -> Result<Envelope> {
        self.call(endpoint, &args, Params::from_serialize(query)?)
            .await
    }

    /// Summary statistics for a project's profiles on one network.
    pub async fn stat_summary(
        &self,
        network: Network,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().network(network).project(project_id);
        self.stat(&STAT_SUMMARY, args, query).await
    }

    /// Audience size (fans, followers, subscribers) per day.
    pub async fn audience_count_by_date(
        &self,
        network: Network,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().network(network).project(project_id);
        self.stat(&AUDIENCE_COUNT_BY_DATE, args, query).await
    }

    /// Interactions on the profiles per day.
    pub async fn interactions_count_by_date(
        &self,
        network: Network,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().network(network).project(project_id);
        self.stat(&INTERACTIONS_COUNT_BY_DATE, args, query).await
    }

    /// Number of posts per day, optionally by owner and post type.
    pub async fn posts_count_by_date(
        &self,
        network: Network,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().network(network).project(project_id);
        self.stat(&POSTS_COUNT_BY_DATE, args, query).await
    }

    /// Engagement rate per day.
    pub async fn engagement_rate_by_date(
        &self,
        network: Network,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().network(network).project(project_id);
        self.stat(&ENGAGEMENT_RATE_BY_DATE, args, query).await
    }

    /// Facebook fans of the project's pages, totalled per country.
    pub async fn facebook_fans_total_by_country(
        &self,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().project(project_id);
        self.stat(&FACEBOOK_FANS_TOTAL_BY_COUNTRY, args, query).await
    }

    /// Interactions on Facebook posts per day.
    pub async fn facebook_posts_interactions_by_date(
        &self,
        project_id: impl ToString,
        query: &StatQuery,
    ) -> Result<Envelope> {
        let args = PathArgs::new().project(project_id);
        self.stat(&FACEBOOK_POSTS_INTERACTIONS_BY_DATE, args, query).await
    }

    /// A profile's posts, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be turned into parameters.
    /// Request failures surface from the returned [`Paginator`].
    pub fn posts(
        &self,
        network: Network,
        project_id: impl ToString,
        profile_id: impl ToString,
        query: &PostsQuery,
    ) -> Result<Paginator<'_>> {
        let args = PathArgs::new()
            .network(network)
            .project(project_id)
            .profile(profile_id);
        self.paginate(&POSTS, &args, Params::from_serialize(query)?)
    }
}
