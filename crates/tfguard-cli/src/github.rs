//! GitHub REST implementation of the issue tracker seam.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use tfguard_app::{IssueError, IssueTracker, RepoIdentity, TrackedIssue};
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;
/// Upper bound on pages scanned when looking for an open issue by title.
const MAX_PAGES: u32 = 10;

pub struct GitHubIssues {
    client: Client,
    api_url: String,
    repo: RepoIdentity,
    token: String,
}

impl GitHubIssues {
    /// Client for `repo`. The API root honours `GITHUB_API_URL` (set on GitHub Enterprise runners).
    pub fn new(repo: RepoIdentity, token: String) -> anyhow::Result<Self> {
        let api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let client = Client::builder()
            .user_agent(concat!("tfguard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
            token,
        })
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_url, self.repo.owner, self.repo.name
        )
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, IssueError> {
        let response = request
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .map_err(|e| IssueError::Request(e.to_string()))?;
        read_json(response)
    }
}

fn read_json(response: Response) -> Result<Value, IssueError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(IssueError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json::<Value>()
        .map_err(|e| IssueError::Response(e.to_string()))
}

fn issue_number(value: &Value) -> Result<u64, IssueError> {
    value
        .get("number")
        .and_then(Value::as_u64)
        .ok_or_else(|| IssueError::Response("issue without a number".to_string()))
}

impl IssueTracker for GitHubIssues {
    fn find_open_issue(&self, title: &str) -> Result<Option<TrackedIssue>, IssueError> {
        for page in 1..=MAX_PAGES {
            let request = self.client.get(format!(
                "{}?state=open&per_page={PER_PAGE}&page={page}",
                self.issues_url()
            ));
            let value = self.send(request)?;
            let issues = value
                .as_array()
                .ok_or_else(|| IssueError::Response("expected a list of issues".to_string()))?;
            debug!(page, count = issues.len(), "listed open issues");

            // The issues endpoint also returns pull requests.
            let hit = issues.iter().find(|issue| {
                issue.get("pull_request").is_none()
                    && issue.get("title").and_then(Value::as_str) == Some(title)
            });
            if let Some(issue) = hit {
                return Ok(Some(TrackedIssue {
                    number: issue_number(issue)?,
                    body: issue
                        .get("body")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                }));
            }
            if issues.len() < PER_PAGE as usize {
                break;
            }
        }
        Ok(None)
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<u64, IssueError> {
        let request = self
            .client
            .post(self.issues_url())
            .json(&json!({ "title": title, "body": body }));
        issue_number(&self.send(request)?)
    }

    fn update_issue(&self, number: u64, body: &str) -> Result<(), IssueError> {
        let request = self
            .client
            .patch(format!("{}/{}", self.issues_url(), number))
            .json(&json!({ "body": body }));
        self.send(request)?;
        Ok(())
    }
}
