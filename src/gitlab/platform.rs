//! Gitlab Platform
use super::{GITLAB_API_PATH, GITLAB_NEXT_PAGE_HEADER, GITLAB_TOKEN_HEADER};
use crate::{
    errors::{MirrorMoverError, MirrorMoverErrorKind},
    gitlab::repo::GitlabProject,
    platform::{PlatformFuture, PlatformType, ProjectSource},
    utils::SourceProject,
};
use log::debug;
use reqwest::header::{HeaderMap, ACCEPT};
use urlencoding::encode;

/// Gitlab Platform
#[derive(Debug, Clone)]
pub struct GitlabPlatform {
    /// Instance URL, without trailing slash
    url: String,

    /// Group to list, empty for the projects owned by the token's user
    group: String,

    /// Gitlab token
    token: String,

    /// Projects per page
    per_page: u8,

    /// Reqwest client
    client: reqwest::Client,
}

impl GitlabPlatform {
    /// Create a new GitlabPlatform
    pub(crate) fn new(url: String, group: String, token: String, per_page: u8) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            group,
            token,
            per_page,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint listing the projects, with its fixed query parameters
    fn projects_endpoint(&self) -> (String, Vec<(&'static str, String)>) {
        if self.group.is_empty() {
            (
                format!("{}/{GITLAB_API_PATH}/projects", self.url),
                vec![("owned", "true".to_string())],
            )
        } else {
            (
                format!(
                    "{}/{GITLAB_API_PATH}/groups/{}/projects",
                    self.url,
                    encode(&self.group)
                ),
                vec![("include_subgroups", "true".to_string())],
            )
        }
    }
}

/// Next page announced by the response, `None` on the last page
fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(GITLAB_NEXT_PAGE_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

impl ProjectSource for GitlabPlatform {
    fn get_owner(&self) -> &str {
        &self.group
    }

    fn get_remote_url(&self) -> &str {
        &self.url
    }

    fn list_projects(&self) -> PlatformFuture<'_, Vec<SourceProject>> {
        let token = self.token.clone();
        let client = self.client.clone();
        let (url, fixed_query) = self.projects_endpoint();
        let per_page = self.per_page.to_string();
        Box::pin(async move {
            let fetch_error = |e: MirrorMoverError| {
                e.with_kind(MirrorMoverErrorKind::Fetch)
                    .with_platform(PlatformType::Gitlab)
            };
            let mut page: u32 = 1;
            let mut all_projects = vec![];
            loop {
                let mut query = fixed_query.clone();
                query.push(("per_page", per_page.clone()));
                query.push(("page", page.to_string()));
                let request = client
                    .get(&url)
                    .header(GITLAB_TOKEN_HEADER, &token)
                    .header(ACCEPT, "application/json")
                    .query(&query)
                    .send();

                let response = request.await.map_err(|e| fetch_error(e.into()))?;
                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.map_err(|e| fetch_error(e.into()))?;
                    return Err(MirrorMoverError::new(MirrorMoverErrorKind::Fetch)
                        .with_platform(PlatformType::Gitlab)
                        .with_text(&format!("{status} - {text}")));
                }
                let next = next_page(response.headers());
                let text = response.text().await.map_err(|e| fetch_error(e.into()))?;
                let projects: Vec<GitlabProject> =
                    serde_json::from_str(&text).map_err(|e| fetch_error(e.into()))?;
                debug!("Requested gitlab (page {}): {}", page, projects.len());
                all_projects.extend(projects.into_iter().map(SourceProject::from));
                match next {
                    Some(next) => page = next,
                    None => break,
                }
            }
            Ok(all_projects)
        })
    }
}
