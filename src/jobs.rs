use awc::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dom::Element;

pub const LOADING_STATUS: &str = "Loading jobs...";
pub const EMPTY_STATUS: &str = "No jobs found.";
pub const FAILED_STATUS: &str = "Failed to load jobs.";

/// One record from the job tracker API. Every field is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct JobRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed ({0})")]
    HttpStatus(u16),

    #[error("Invalid jobs payload: {0}")]
    Decode(String),
}

/// Single-shot reader for `GET {api_base}/jobs`. Requests never retry, never
/// time out and are never cancelled.
pub struct JobsClient {
    api_base: String,
    client: Client,
}

impl JobsClient {
    pub fn new(api_base: &str) -> Self {
        JobsClient {
            api_base: api_base.trim_end_matches('/').to_string(),
            client: Client::builder().disable_timeout().finish(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/jobs", self.api_base)
    }

    pub async fn load_jobs(&self) -> Result<Vec<JobRecord>, JobsError> {
        let url = self.endpoint();
        debug!(%url, "requesting jobs");

        let mut response = self.client.get(&url).send().await.map_err(|err| {
            warn!("jobs request to {} failed: {}", url, err);
            JobsError::Network(err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("jobs request to {} returned {}", url, status);
            return Err(JobsError::HttpStatus(status.as_u16()));
        }

        let body = response
            .body()
            .await
            .map_err(|err| JobsError::Network(err.to_string()))?;
        let jobs = serde_json::from_slice::<Vec<JobRecord>>(&body)
            .map_err(|err| JobsError::Decode(err.to_string()))?;
        debug!(count = jobs.len(), "jobs loaded");
        Ok(jobs)
    }
}

/// A job record with its display fallbacks applied.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct JobLine {
    pub title: String,
    pub description: String,
    pub status: String,
}

impl From<&JobRecord> for JobLine {
    fn from(job: &JobRecord) -> Self {
        JobLine {
            title: job.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            description: job.description.clone().unwrap_or_default(),
            status: job.status.clone().unwrap_or_else(|| "n/a".to_string()),
        }
    }
}

impl JobLine {
    fn to_element(&self) -> Element {
        let mut item = Element::new("div").with_class("job");
        item.append_child(Element::new("strong").with_text(&self.title));
        item.append_child(Element::new("span").with_text(&self.description));
        item.append_child(Element::new("small").with_text(&format!("Status: {}", self.status)));
        item
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobsView {
    Loading,
    Loaded { status: String, items: Vec<JobLine> },
    Failed { status: String, error: String },
}

impl JobsView {
    pub fn from_result(result: &Result<Vec<JobRecord>, JobsError>) -> Self {
        match result {
            Ok(jobs) => {
                let status = if jobs.is_empty() {
                    EMPTY_STATUS.to_string()
                } else {
                    format!("Loaded {} job(s).", jobs.len())
                };
                JobsView::Loaded {
                    status,
                    items: jobs.iter().map(JobLine::from).collect(),
                }
            }
            Err(err) => JobsView::Failed {
                status: FAILED_STATUS.to_string(),
                error: err.to_string(),
            },
        }
    }

    pub fn status(&self) -> &str {
        match self {
            JobsView::Loading => LOADING_STATUS,
            JobsView::Loaded { status, .. } | JobsView::Failed { status, .. } => status,
        }
    }

    pub fn render_status(&self, status_el: &mut Element) {
        status_el.set_text(self.status());
    }

    /// Replaces the whole list contents.
    pub fn render_list(&self, list_el: &mut Element) {
        list_el.clear_children();
        list_el.set_text("");
        match self {
            JobsView::Loading => {}
            JobsView::Loaded { items, .. } => {
                for line in items {
                    list_el.append_child(line.to_element());
                }
            }
            JobsView::Failed { error, .. } => list_el.set_text(error),
        }
    }
}
