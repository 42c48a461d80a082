//! Route tables and requests shared by the router benchmarks.

/// A route table and the request paths run against it.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    routes: &'static [&'static str],
    paths: &'static [&'static str],
}

impl TestCase {
    pub const fn new(
        name: &'static str,
        group: TestGroup,
        routes: &'static [&'static str],
        paths: &'static [&'static str],
    ) -> Self {
        Self { name, group, routes, paths }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    /// Path templates, registered for `GET`.
    pub fn routes(&self) -> &'static [&'static str] {
        self.routes
    }

    pub fn paths(&self) -> &'static [&'static str] {
        self.paths
    }
}

/// Table size class; each class is reported as its own criterion group.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Large,
}

impl TestGroup {
    pub fn name(self) -> &'static str {
        match self {
            TestGroup::Small => "small",
            TestGroup::Large => "large",
        }
    }
}

const SMALL_ROUTES: &[&str] =
    &["/", "/users", "/users/me", "/users/{id}", "/users/{id}/orders", "/orders/{id}", "/report/{year}/{month}"];

const SMALL_PATHS: &[&str] = &["/", "/users/me", "/users/42", "/users/42/orders", "/report/2024/03", "/missing"];

const GITHUB_ROUTES: &[&str] = &[
    "/authorizations",
    "/authorizations/{id}",
    "/applications/{client_id}/tokens/{access_token}",
    "/events",
    "/repos/{owner}/{repo}/events",
    "/networks/{owner}/{repo}/events",
    "/orgs/{org}/events",
    "/users/{user}/received_events",
    "/users/{user}/received_events/public",
    "/users/{user}/events",
    "/users/{user}/events/public",
    "/users/{user}/events/orgs/{org}",
    "/feeds",
    "/notifications",
    "/repos/{owner}/{repo}/notifications",
    "/notifications/threads/{id}",
    "/notifications/threads/{id}/subscription",
    "/repos/{owner}/{repo}/stargazers",
    "/users/{user}/starred",
    "/user/starred",
    "/user/starred/{owner}/{repo}",
    "/repos/{owner}/{repo}/subscribers",
    "/users/{user}/subscriptions",
    "/user/subscriptions",
    "/repos/{owner}/{repo}/subscription",
    "/user/subscriptions/{owner}/{repo}",
    "/users/{user}/gists",
    "/gists",
    "/gists/{id}",
    "/gists/{id}/star",
    "/repos/{owner}/{repo}/git/blobs/{sha}",
    "/repos/{owner}/{repo}/git/commits/{sha}",
    "/repos/{owner}/{repo}/git/refs",
    "/repos/{owner}/{repo}/git/tags/{sha}",
    "/repos/{owner}/{repo}/git/trees/{sha}",
    "/issues",
    "/user/issues",
    "/orgs/{org}/issues",
    "/repos/{owner}/{repo}/issues",
    "/repos/{owner}/{repo}/issues/{number}",
    "/repos/{owner}/{repo}/assignees",
    "/repos/{owner}/{repo}/assignees/{assignee}",
    "/repos/{owner}/{repo}/issues/{number}/comments",
    "/repos/{owner}/{repo}/issues/{number}/events",
    "/repos/{owner}/{repo}/labels",
    "/repos/{owner}/{repo}/labels/{name}",
    "/repos/{owner}/{repo}/issues/{number}/labels",
    "/repos/{owner}/{repo}/milestones/{number}/labels",
    "/repos/{owner}/{repo}/milestones",
    "/repos/{owner}/{repo}/milestones/{number}",
    "/emojis",
    "/gitignore/templates",
    "/gitignore/templates/{name}",
    "/meta",
    "/rate_limit",
    "/users/{user}/orgs",
    "/user/orgs",
    "/orgs/{org}",
    "/orgs/{org}/members",
    "/orgs/{org}/members/{user}",
];

const GITHUB_PATHS: &[&str] = &[
    "/authorizations",
    "/user/repos",
    "/repos/rust-lang/rust/stargazers",
    "/orgs/rust-lang/public_members/nikomatsakis",
    "/repos/rust-lang/rust/git/trees/abcdef",
    "/user/starred/rust-lang/rust",
    "/gitignore/templates/Rust",
    "/repos/rust-lang/rust/issues/42/labels",
    "/users/octocat/events/orgs/github",
    "/rate_limit",
];

pub fn test_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("small", TestGroup::Small, SMALL_ROUTES, SMALL_PATHS),
        TestCase::new("github", TestGroup::Large, GITHUB_ROUTES, GITHUB_PATHS),
    ]
}
