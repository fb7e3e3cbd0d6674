//! Hosting provider REST clients
//!
//! Covers the three calls init/bootstrap need: who owns this token, does a
//! repository exist, create a repository. Calls are made once; failures are
//! surfaced with the response body and never retried.

use crate::error::ScaffoldError;
use crate::hosting::Driver;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosting API boundary
pub trait HostingClient: Send + Sync {
    /// Login of the user owning the access token
    fn current_user(&self) -> Result<String, ScaffoldError>;

    /// Does `owner/name` already exist?
    fn repo_exists(&self, owner: &str, name: &str) -> Result<bool, ScaffoldError>;

    /// Create a private repository; `org` of `None` creates under the
    /// authenticated user.
    fn create_repo(
        &self,
        org: Option<&str>,
        name: &str,
        description: &str,
    ) -> Result<(), ScaffoldError>;
}

/// Connect to the hosting API for a driver and host
///
/// # Errors
///
/// Fails when the underlying HTTP client cannot be constructed.
pub fn connect(
    driver: Driver,
    host: &str,
    token: &str,
) -> Result<Box<dyn HostingClient>, ScaffoldError> {
    let http = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("gitopsmith/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ScaffoldError::hosting(format!("failed to build HTTP client: {e}")))?;
    Ok(Box::new(ApiClient::new(driver, host, token, http)))
}

/// REST client for the GitHub and GitLab APIs
pub struct ApiClient {
    driver: Driver,
    base: String,
    token: String,
    http: Client,
}

impl ApiClient {
    /// Build a client for a driver/host pair. Public hosts use the hosted
    /// API endpoints; any other host is assumed to be a self-managed
    /// instance of the same product.
    #[must_use]
    pub fn new(driver: Driver, host: &str, token: &str, http: Client) -> Self {
        let base = match driver {
            Driver::Github if host == "github.com" => "https://api.github.com".to_owned(),
            Driver::Github => format!("https://{host}/api/v3"),
            Driver::Gitlab => format!("https://{host}/api/v4"),
        };
        Self {
            driver,
            base,
            token: token.to_owned(),
            http,
        }
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response, ScaffoldError> {
        let request = self.http.get(format!("{}{path}", self.base));
        let request = match self.driver {
            Driver::Github => request.bearer_auth(&self.token),
            Driver::Gitlab => request.header("PRIVATE-TOKEN", &self.token),
        };
        request
            .send()
            .map_err(|e| ScaffoldError::hosting(format!("request to {path} failed: {e}")))
    }

    fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::blocking::Response, ScaffoldError> {
        let request = self.http.post(format!("{}{path}", self.base)).json(body);
        let request = match self.driver {
            Driver::Github => request.bearer_auth(&self.token),
            Driver::Gitlab => request.header("PRIVATE-TOKEN", &self.token),
        };
        request
            .send()
            .map_err(|e| ScaffoldError::hosting(format!("request to {path} failed: {e}")))
    }
}

#[derive(Deserialize)]
struct GithubUser {
    login: String,
}

#[derive(Deserialize)]
struct GitlabUser {
    username: String,
}

impl HostingClient for ApiClient {
    fn current_user(&self) -> Result<String, ScaffoldError> {
        match self.driver {
            Driver::Github => {
                let response = self.get("/user")?;
                if !response.status().is_success() {
                    return Err(ScaffoldError::hosting(format!(
                        "failed to get the user with their auth token: HTTP {}",
                        response.status()
                    )));
                }
                let user: GithubUser = response.json().map_err(|e| {
                    ScaffoldError::hosting(format!("failed to decode user response: {e}"))
                })?;
                Ok(user.login)
            }
            Driver::Gitlab => {
                let response = self.get("/user")?;
                if !response.status().is_success() {
                    return Err(ScaffoldError::hosting(format!(
                        "failed to get the user with their auth token: HTTP {}",
                        response.status()
                    )));
                }
                let user: GitlabUser = response.json().map_err(|e| {
                    ScaffoldError::hosting(format!("failed to decode user response: {e}"))
                })?;
                Ok(user.username)
            }
        }
    }

    fn repo_exists(&self, owner: &str, name: &str) -> Result<bool, ScaffoldError> {
        let path = match self.driver {
            Driver::Github => format!("/repos/{owner}/{name}"),
            Driver::Gitlab => {
                // GitLab addresses projects by URL-encoded full path.
                format!("/projects/{owner}%2F{name}")
            }
        };
        let response = self.get(&path)?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ScaffoldError::hosting(format!(
                "failed to check repository {owner}/{name}: HTTP {status}"
            ))),
        }
    }

    fn create_repo(
        &self,
        org: Option<&str>,
        name: &str,
        description: &str,
    ) -> Result<(), ScaffoldError> {
        let (path, body) = match self.driver {
            Driver::Github => {
                let path = org.map_or_else(
                    || "/user/repos".to_owned(),
                    |org| format!("/orgs/{org}/repos"),
                );
                let body = json!({
                    "name": name,
                    "description": description,
                    "private": true,
                });
                (path, body)
            }
            Driver::Gitlab => {
                let mut body = json!({
                    "name": name,
                    "description": description,
                    "visibility": "private",
                });
                if let Some(org) = org {
                    body["namespace_path"] = json!(org);
                }
                ("/projects".to_owned(), body)
            }
        };
        let response = self.post(&path, &body)?;
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let detail = response.text().unwrap_or_default();
        Err(ScaffoldError::hosting(format!(
            "failed to create repository {name:?} in namespace {:?}: HTTP {status}: {detail}",
            org.unwrap_or_default()
        )))
    }
}

/// In-memory hosting fake for tests
#[derive(Default)]
pub struct MockHosting {
    user: String,
    existing: Mutex<Vec<String>>,
    created: Mutex<Vec<String>>,
}

impl MockHosting {
    /// Fake with the given authenticated user
    #[must_use]
    pub fn with_user(user: &str) -> Self {
        Self {
            user: user.to_owned(),
            existing: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Seed an existing repository (builder pattern)
    #[must_use]
    pub fn with_existing_repo(self, owner: &str, name: &str) -> Self {
        self.existing
            .lock()
            .expect("mock hosting lock poisoned")
            .push(format!("{owner}/{name}"));
        self
    }

    /// Repositories created through this fake, as `owner/name`
    #[must_use]
    pub fn created_repos(&self) -> Vec<String> {
        self.created
            .lock()
            .expect("mock hosting lock poisoned")
            .clone()
    }
}

impl HostingClient for MockHosting {
    fn current_user(&self) -> Result<String, ScaffoldError> {
        Ok(self.user.clone())
    }

    fn repo_exists(&self, owner: &str, name: &str) -> Result<bool, ScaffoldError> {
        Ok(self
            .existing
            .lock()
            .expect("mock hosting lock poisoned")
            .contains(&format!("{owner}/{name}")))
    }

    fn create_repo(
        &self,
        org: Option<&str>,
        name: &str,
        _description: &str,
    ) -> Result<(), ScaffoldError> {
        let owner = org.unwrap_or(&self.user);
        let full = format!("{owner}/{name}");
        let mut existing = self.existing.lock().expect("mock hosting lock poisoned");
        if existing.contains(&full) {
            return Err(ScaffoldError::hosting(
                "failed to create repository, repo already exists".to_owned(),
            ));
        }
        existing.push(full.clone());
        drop(existing);
        self.created
            .lock()
            .expect("mock hosting lock poisoned")
            .push(full);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_urls() {
        let http = Client::new();
        let github = ApiClient::new(Driver::Github, "github.com", "t", http.clone());
        assert_eq!(github.base, "https://api.github.com");
        let ghe = ApiClient::new(Driver::Github, "git.corp.example", "t", http.clone());
        assert_eq!(ghe.base, "https://git.corp.example/api/v3");
        let gitlab = ApiClient::new(Driver::Gitlab, "gitlab.com", "t", http);
        assert_eq!(gitlab.base, "https://gitlab.com/api/v4");
    }

    #[test]
    fn test_mock_hosting_tracks_creations() {
        let hosting = MockHosting::with_user("octocat");
        assert!(!hosting.repo_exists("octocat", "gitops").unwrap());
        hosting.create_repo(None, "gitops", "test").unwrap();
        assert!(hosting.repo_exists("octocat", "gitops").unwrap());
        assert_eq!(hosting.created_repos(), vec!["octocat/gitops"]);
    }

    #[test]
    fn test_mock_hosting_rejects_duplicate_creation() {
        let hosting = MockHosting::with_user("octocat").with_existing_repo("acme", "gitops");
        let err = hosting.create_repo(Some("acme"), "gitops", "test").unwrap_err();
        assert!(err.to_string().contains("repo already exists"));
    }
}
