use watch::OrgName;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Configuration for [`crate::GithubFetcher`].
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Organization whose repositories are listed.
    pub organization: OrgName,
    /// API root without a trailing slash. Point at a GitHub Enterprise host or
    /// a mock server to redirect all requests.
    pub api_url: String,
    /// Personal access token. Unauthenticated requests work but share a much
    /// smaller rate limit.
    pub token: Option<String>,
    /// Upper bound on pages fetched per listing (100 items per page).
    pub max_pages: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl GithubConfig {
    pub fn new(organization: OrgName) -> Self {
        Self {
            organization,
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            max_pages: 10,
            timeout_secs: 30,
            user_agent: concat!("org-watch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the token; blank tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}
