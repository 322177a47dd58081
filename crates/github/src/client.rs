use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use watch::{FetchError, Fetcher, Release, RepoName, Repository, Tag, Timestamp};

use crate::config::GithubConfig;
use crate::models::{ReleaseResponse, RepoResponse, TagResponse};

/// Items requested per page; the API maximum.
pub const PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// Reads repositories, releases, and tags of one organization over the GitHub
/// REST API.
pub struct GithubFetcher {
    config: GithubConfig,
    client: reqwest::Client,
}

impl GithubFetcher {
    pub fn new(config: GithubConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    /// Fetches every page of a list endpoint, stopping at the first short page
    /// or at the configured page cap.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let url = format!("{}{path}", self.config.api_url);
        let mut items = Vec::new();

        for page in 1..=self.config.max_pages {
            let batch: Vec<T> = self.get_page(&url, page).await?;
            let len = batch.len();
            items.extend(batch);
            if len < PER_PAGE {
                return Ok(items);
            }
        }

        warn!(
            url = %url,
            max_pages = self.config.max_pages,
            "Page cap reached; listing may be incomplete"
        );
        Ok(items)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        page: u32,
    ) -> Result<Vec<T>, FetchError> {
        let page_url = format!("{url}?per_page={PER_PAGE}&page={page}");
        debug!(url = %page_url, "GET");

        let mut request = self
            .client
            .get(&page_url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if is_rate_limited(status, response.headers()) {
            return Err(FetchError::RateLimited {
                url: url.to_string(),
                reset_at: rate_limit_reset(response.headers()),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for GithubFetcher {
    async fn list_repositories(&self) -> Result<Vec<Repository>, FetchError> {
        let path = format!("/orgs/{}/repos", self.config.organization);
        let repos: Vec<RepoResponse> = self.get_all(&path).await?;
        Ok(repos.into_iter().filter_map(RepoResponse::into_domain).collect())
    }

    async fn list_releases(&self, repo: &RepoName) -> Result<Vec<Release>, FetchError> {
        let path = format!("/repos/{}/{repo}/releases", self.config.organization);
        let releases: Vec<ReleaseResponse> = self.get_all(&path).await?;
        Ok(releases
            .into_iter()
            .filter(|r| !r.draft)
            .filter_map(|r| r.into_domain(repo))
            .collect())
    }

    async fn list_tags(&self, repo: &RepoName) -> Result<Vec<Tag>, FetchError> {
        let path = format!("/repos/{}/{repo}/tags", self.config.organization);
        let tags: Vec<TagResponse> = self.get_all(&path).await?;
        Ok(tags.into_iter().filter_map(|t| t.into_domain(repo)).collect())
    }
}

/// GitHub signals an exhausted primary limit with 403 or 429 and
/// `x-ratelimit-remaining: 0`; secondary limits use 429 or `retry-after`.
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN
        && (header_i64(headers, "x-ratelimit-remaining") == Some(0)
            || headers.contains_key(RETRY_AFTER))
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<Timestamp> {
    if let Some(secs) = header_i64(headers, RETRY_AFTER.as_str()) {
        return TimeDelta::try_seconds(secs)
            .map(|delay| Timestamp::from_utc(Utc::now() + delay));
    }
    header_i64(headers, "x-ratelimit-reset").and_then(Timestamp::from_unix_seconds)
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use watch::OrgName;

    fn repo_json(name: &str) -> Value {
        json!({
            "id": 1,
            "name": name,
            "full_name": format!("deepseek-ai/{name}"),
            "description": null,
            "language": "Python",
            "html_url": format!("https://github.com/deepseek-ai/{name}"),
            "created_at": "2024-12-26T03:04:05Z",
        })
    }

    fn fetcher(server: &MockServer) -> GithubFetcher {
        let config = GithubConfig::new(OrgName::new("deepseek-ai").unwrap())
            .with_api_url(server.uri())
            .with_token(Some("t0ken".into()));
        GithubFetcher::new(config).unwrap()
    }

    fn repo(name: &str) -> RepoName {
        RepoName::new(name).unwrap()
    }

    #[tokio::test]
    async fn lists_repositories_across_pages() {
        let server = MockServer::start().await;
        let first: Vec<Value> = (0..PER_PAGE).map(|i| repo_json(&format!("repo-{i}"))).collect();

        Mock::given(method("GET"))
            .and(path("/orgs/deepseek-ai/repos"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Bearer t0ken"))
            .and(header("x-github-api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(first))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/orgs/deepseek-ai/repos"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(vec![repo_json("DeepSeek-V3")]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let repos = fetcher(&server).list_repositories().await.unwrap();

        assert_eq!(repos.len(), PER_PAGE + 1);
        let last = repos.last().unwrap();
        assert_eq!(last.name.as_str(), "DeepSeek-V3");
        assert_eq!(last.full_name, "deepseek-ai/DeepSeek-V3");
        assert_eq!(last.description, None);
        assert_eq!(last.created_at.to_string(), "2024-12-26T03:04:05Z");
    }

    #[tokio::test]
    async fn stops_at_page_cap() {
        let server = MockServer::start().await;
        let full: Vec<Value> = (0..PER_PAGE).map(|i| repo_json(&format!("repo-{i}"))).collect();
        Mock::given(method("GET"))
            .and(path("/orgs/deepseek-ai/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full))
            .expect(2)
            .mount(&server)
            .await;

        let config = GithubConfig::new(OrgName::new("deepseek-ai").unwrap())
            .with_api_url(server.uri())
            .with_max_pages(2);
        let repos = GithubFetcher::new(config)
            .unwrap()
            .list_repositories()
            .await
            .unwrap();

        assert_eq!(repos.len(), 2 * PER_PAGE);
    }

    #[tokio::test]
    async fn releases_skip_drafts_and_keep_notes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/deepseek-ai/DeepSeek-V3/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 2,
                    "tag_name": "v3.0.1",
                    "name": "",
                    "html_url": "https://github.com/deepseek-ai/DeepSeek-V3/releases/tag/v3.0.1",
                    "published_at": "2025-01-20T10:00:00Z",
                    "body": "Weights updated",
                    "draft": false
                },
                {
                    "id": 3,
                    "tag_name": "v3.1",
                    "name": "Draft",
                    "html_url": "https://github.com/deepseek-ai/DeepSeek-V3/releases/tag/untagged",
                    "published_at": null,
                    "body": null,
                    "draft": true
                }
            ])))
            .mount(&server)
            .await;

        let releases = fetcher(&server)
            .list_releases(&repo("DeepSeek-V3"))
            .await
            .unwrap();

        assert_eq!(releases.len(), 1);
        let release = &releases[0];
        assert_eq!(release.tag.as_str(), "v3.0.1");
        assert_eq!(release.title, None);
        assert_eq!(release.notes.as_deref(), Some("Weights updated"));
        assert_eq!(release.repo.as_str(), "DeepSeek-V3");
        assert!(release.published_at.is_some());
    }

    #[tokio::test]
    async fn tags_carry_commit_reference() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/deepseek-ai/DeepEP/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "name": "v1.0.0",
                    "zipball_url": "https://api.github.com/repos/deepseek-ai/DeepEP/zipball/v1.0.0",
                    "commit": {
                        "sha": "c0ffee0123456789",
                        "url": "https://api.github.com/repos/deepseek-ai/DeepEP/commits/c0ffee0123456789"
                    }
                }
            ])))
            .mount(&server)
            .await;

        let tags = fetcher(&server).list_tags(&repo("DeepEP")).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name.as_str(), "v1.0.0");
        assert_eq!(tags[0].commit_sha, "c0ffee0123456789");
        assert_eq!(tags[0].created_at, None);
    }

    #[tokio::test]
    async fn exhausted_rate_limit_is_reported_with_reset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/deepseek-ai/DeepEP/tags"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1735689600")
                    .set_body_string("API rate limit exceeded"),
            )
            .mount(&server)
            .await;

        let err = fetcher(&server).list_tags(&repo("DeepEP")).await.unwrap_err();

        match err {
            FetchError::RateLimited { reset_at, .. } => {
                assert_eq!(reset_at, Timestamp::from_unix_seconds(1_735_689_600));
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn forbidden_without_rate_limit_headers_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/deepseek-ai/repos"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = fetcher(&server).list_repositories().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn missing_repository_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/deepseek-ai/gone/releases"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher(&server).list_releases(&repo("gone")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/deepseek-ai/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\": \"nope\"}"))
            .mount(&server)
            .await;

        let err = fetcher(&server).list_repositories().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
