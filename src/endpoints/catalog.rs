//! The remote operations exposed by the Quantum API.

use super::{Endpoint, Method};

const DATE_RANGE: &[&str] = &["since", "until", "ids", "timezone"];

pub const PROJECTS: Endpoint = Endpoint {
    name: "projects",
    method: Method::Get,
    template: "accounts/{account}/projects",
    params: &[],
    paginated: false,
};

pub const PROJECT: Endpoint = Endpoint {
    name: "project",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}",
    params: &[],
    paginated: false,
};

pub const PROFILES: Endpoint = Endpoint {
    name: "profiles",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles",
    params: &[],
    paginated: false,
};

pub const PROFILE: Endpoint = Endpoint {
    name: "profile",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles/{profile}",
    params: &[],
    paginated: false,
};

pub const STAT_SUMMARY: Endpoint = Endpoint {
    name: "stat_summary",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles/stat-summary",
    params: DATE_RANGE,
    paginated: false,
};

pub const AUDIENCE_COUNT_BY_DATE: Endpoint = Endpoint {
    name: "audience_count_by_date",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/{audience}/count/date",
    params: DATE_RANGE,
    paginated: false,
};

pub const INTERACTIONS_COUNT_BY_DATE: Endpoint = Endpoint {
    name: "interactions_count_by_date",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles/interactions/count/date",
    params: DATE_RANGE,
    paginated: false,
};

pub const POSTS_COUNT_BY_DATE: Endpoint = Endpoint {
    name: "posts_count_by_date",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles/posts/count/date",
    params: &["since", "until", "ids", "owner", "type", "timezone"],
    paginated: false,
};

pub const ENGAGEMENT_RATE_BY_DATE: Endpoint = Endpoint {
    name: "engagement_rate_by_date",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles/engagement-rate/date",
    params: DATE_RANGE,
    paginated: false,
};

pub const POSTS: Endpoint = Endpoint {
    name: "posts",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/{network}/profiles/{profile}/posts",
    params: &[
        "since", "until", "limit", "sort", "owner", "type", "timezone", "page",
    ],
    paginated: true,
};

pub const FACEBOOK_FANS_TOTAL_BY_COUNTRY: Endpoint = Endpoint {
    name: "facebook_fans_total_by_country",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/facebook/fans/total/country",
    params: DATE_RANGE,
    paginated: false,
};

pub const FACEBOOK_POSTS_INTERACTIONS_BY_DATE: Endpoint = Endpoint {
    name: "facebook_posts_interactions_by_date",
    method: Method::Get,
    template: "accounts/{account}/projects/{project}/facebook/profiles/posts-interactions/count/date",
    params: DATE_RANGE,
    paginated: false,
};

/// Every catalogued endpoint.
pub static CATALOG: &[Endpoint] = &[
    PROJECTS,
    PROJECT,
    PROFILES,
    PROFILE,
    STAT_SUMMARY,
    AUDIENCE_COUNT_BY_DATE,
    INTERACTIONS_COUNT_BY_DATE,
    POSTS_COUNT_BY_DATE,
    ENGAGEMENT_RATE_BY_DATE,
    POSTS,
    FACEBOOK_FANS_TOTAL_BY_COUNTRY,
    FACEBOOK_POSTS_INTERACTIONS_BY_DATE,
];

/// Look up an endpoint by its logical name.
pub fn find_endpoint(name: &str) -> Option<&'static Endpoint> {
    CATALOG.iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_all_endpoints_are_get() {
        assert!(CATALOG.iter().all(|e| e.method == Method::Get));
    }

    #[test]
    fn test_find_endpoint() {
        assert_eq!(find_endpoint("posts"), Some(&POSTS));
        assert!(find_endpoint("posts").unwrap().paginated);
        assert!(find_endpoint("nope").is_none());
    }
}
