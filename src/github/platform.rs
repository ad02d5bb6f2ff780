//! Github Platform
use super::{GITHUB_API_HEADER, GITHUB_API_VERSION};
use crate::{
    errors::{MirrorMoverError, MirrorMoverErrorKind},
    github::repo::{RepoGithub, TopicsGithub},
    platform::{PlatformFuture, PlatformType, RepoDestination},
    utils::{DestinationRepository, NewRepository},
};
use log::{debug, warn};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::RequestBuilder;
use url::Url;
use urlencoding::encode;

/// Github Platform
#[derive(Debug, Clone)]
pub struct GithubPlatform {
    /// API URL, without trailing slash
    url: String,

    /// Organization owning the repositories, empty for the token's user
    org: String,

    /// Github token
    token: String,

    /// Repositories per page
    per_page: u8,

    /// Reqwest client
    client: reqwest::Client,
}

impl GithubPlatform {
    /// Create a new GithubPlatform
    pub(crate) fn new(url: String, org: String, token: String, per_page: u8) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            org,
            token,
            per_page,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint listing (GET) and creating (POST) the repositories
    fn repos_endpoint(&self) -> String {
        if self.org.is_empty() {
            format!("{}/user/repos", self.url)
        } else {
            format!("{}/orgs/{}/repos", self.url, encode(&self.org))
        }
    }

    /// Add the headers every GitHub call needs
    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
    }

    /// Replace the topics of a freshly created repository
    async fn set_topics(&self, full_name: &str, topics: &[String]) -> Result<(), MirrorMoverError> {
        let (owner, name) = full_name.split_once('/').unwrap_or((full_name, ""));
        let url = format!("{}/repos/{}/{}/topics", self.url, encode(owner), encode(name));
        let response = self
            .with_headers(self.client.put(&url))
            .json(&TopicsGithub { names: topics })
            .send()
            .await?;
        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(MirrorMoverError::new(MirrorMoverErrorKind::Create)
                .with_platform(PlatformType::Github)
                .with_text(&text));
        }
        Ok(())
    }
}

/// Page number of the `rel="next"` link, `None` on the last page
fn next_page(headers: &HeaderMap) -> Option<u32> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        if !parts.any(|param| param.trim() == r#"rel="next""#) {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

impl RepoDestination for GithubPlatform {
    fn get_owner(&self) -> &str {
        &self.org
    }

    fn get_remote_url(&self) -> &str {
        &self.url
    }

    fn list_repos(&self) -> PlatformFuture<'_, Vec<DestinationRepository>> {
        let url = self.repos_endpoint();
        let per_page = self.per_page.to_string();
        let owner_filter = self.org.is_empty();
        Box::pin(async move {
            let fetch_error = |e: MirrorMoverError| {
                e.with_kind(MirrorMoverErrorKind::Fetch)
                    .with_platform(PlatformType::Github)
            };
            let mut page: u32 = 1;
            let mut all_repos = vec![];
            loop {
                let mut query = vec![("per_page", per_page.clone()), ("page", page.to_string())];
                if owner_filter {
                    query.push(("type", "owner".to_string()));
                }
                let request = self.with_headers(self.client.get(&url)).query(&query).send();
                let response = request.await.map_err(|e| fetch_error(e.into()))?;
                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.map_err(|e| fetch_error(e.into()))?;
                    return Err(MirrorMoverError::new(MirrorMoverErrorKind::Fetch)
                        .with_platform(PlatformType::Github)
                        .with_text(&format!("{status} - {text}")));
                }
                let next = next_page(response.headers());
                let text = response.text().await.map_err(|e| fetch_error(e.into()))?;
                let repos: Vec<RepoGithub> =
                    serde_json::from_str(&text).map_err(|e| fetch_error(e.into()))?;
                debug!("Requested github (page {}): {}", page, repos.len());
                all_repos.extend(repos.into_iter().map(DestinationRepository::from));
                match next {
                    Some(next) => page = next,
                    None => break,
                }
            }
            Ok(all_repos)
        })
    }

    fn create_repo(&self, repo: NewRepository) -> PlatformFuture<'_, DestinationRepository> {
        let url = self.repos_endpoint();
        Box::pin(async move {
            let request = self.with_headers(self.client.post(&url)).json(&repo).send();
            let response = request.await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await?;
                return Err(MirrorMoverError::new(MirrorMoverErrorKind::Create)
                    .with_platform(PlatformType::Github)
                    .with_text(&format!("{status} - {text}")));
            }
            let text = response.text().await?;
            let created: RepoGithub = serde_json::from_str(&text)?;
            if !repo.topics.is_empty() {
                if let Err(e) = self.set_topics(&created.full_name, &repo.topics).await {
                    warn!("{}: unable to set topics: {e}", created.name);
                }
            }
            Ok(created.into())
        })
    }
}
