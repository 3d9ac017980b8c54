//! Course catalog lookup
//!
//! Queries the external course-catalog service by exact code when the query
//! contains one, otherwise by free-text search. The wire shape (an untyped
//! `{status, payload}` envelope with partially absent fields) is normalized
//! into [`CourseRecord`] in one explicit step so nothing downstream handles
//! external shapes.
//!
//! Failures are returned as [`CatalogError`]; the orchestrator decides to
//! treat them as "no course data". Course information is supplementary, not
//! essential, to answering a query.

use async_trait::async_trait;
use campusai_core::CatalogConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

/// Letters, optional whitespace, then exactly three digits.
static COURSE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]+)\s*([0-9]{3})\b").expect("course code pattern")
});

/// A normalized course record. Every field is optional on the wire; rendering
/// fills documented defaults, never errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseRecord {
    pub subject: Option<String>,
    pub catalog_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
    pub credits: Option<String>,
    pub department: Option<String>,
    pub terms_offered: Vec<String>,
}

impl CourseRecord {
    /// Course identifier as subject + catalog number ("COMP352").
    pub fn identifier(&self) -> String {
        format!(
            "{}{}",
            self.subject.as_deref().unwrap_or(""),
            self.catalog_number.as_deref().unwrap_or("")
        )
    }
}

/// Course record as the external service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCourse {
    pub subject: Option<String>,
    #[serde(alias = "catalogNumber")]
    pub catalog: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
    /// Sometimes a number, sometimes a string
    pub credits: Option<serde_json::Value>,
    pub department: Option<String>,
    #[serde(alias = "termsOffered")]
    pub terms: Option<Vec<String>>,
}

impl RawCourse {
    /// Normalize the external shape into the internal model.
    pub fn normalize(self) -> CourseRecord {
        let credits = self.credits.map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        CourseRecord {
            subject: self.subject.filter(|s| !s.is_empty()),
            catalog_number: self.catalog.filter(|s| !s.is_empty()),
            title: self.title.filter(|s| !s.is_empty()),
            description: self.description.filter(|s| !s.is_empty()),
            prerequisites: self.prerequisites.filter(|s| !s.is_empty()),
            credits,
            department: self.department.filter(|s| !s.is_empty()),
            terms_offered: self.terms.unwrap_or_default(),
        }
    }
}

/// `{status, payload}` envelope wrapping catalog responses.
#[derive(Debug, Deserialize)]
struct CatalogEnvelope<T> {
    status: Option<String>,
    payload: Option<T>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog transport error: {0}")]
    Transport(String),
    #[error("catalog returned status {0}")]
    Status(u16),
    #[error("malformed catalog response: {0}")]
    Shape(String),
}

/// Parse a course code from free text and normalize it to LETTERS+DIGITS:
/// "comp 352" -> "COMP352". Free text without a code yields `None`.
pub fn parse_course_code(query: &str) -> Option<String> {
    COURSE_CODE.captures(query).map(|caps| {
        format!(
            "{}{}",
            caps.get(1).expect("letters group").as_str().to_uppercase(),
            caps.get(2).expect("digits group").as_str()
        )
    })
}

/// Transport seam over the two catalog endpoints, so lookup logic is testable
/// without a network and round-trips can be counted.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Exact lookup by normalized code. `None` means no match.
    async fn get_course(&self, code: &str) -> Result<Option<RawCourse>, CatalogError>;

    /// Free-text search, returning records in service order.
    async fn search_courses(&self, query: &str, limit: usize)
        -> Result<Vec<RawCourse>, CatalogError>;
}

/// HTTP transport against an OK/payload-enveloped catalog service.
pub struct HttpCatalogTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogTransport {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CatalogTransport for HttpCatalogTransport {
    async fn get_course(&self, code: &str) -> Result<Option<RawCourse>, CatalogError> {
        let url = format!("{}/api/v1/courses/{}", self.base_url, code);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let envelope: CatalogEnvelope<RawCourse> = response
            .json()
            .await
            .map_err(|e| CatalogError::Shape(e.to_string()))?;

        if envelope.status.as_deref() != Some("OK") {
            return Ok(None);
        }
        Ok(envelope.payload)
    }

    async fn search_courses(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawCourse>, CatalogError> {
        let url = format!("{}/api/v1/search/course", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let envelope: CatalogEnvelope<Vec<RawCourse>> = response
            .json()
            .await
            .map_err(|e| CatalogError::Shape(e.to_string()))?;

        match (envelope.status.as_deref(), envelope.payload) {
            (Some("OK"), Some(courses)) => Ok(courses),
            (status, _) => Err(CatalogError::Shape(format!(
                "unexpected search response (status: {:?})",
                status
            ))),
        }
    }
}

/// Course lookup over any transport.
pub struct CourseCatalog {
    transport: Arc<dyn CatalogTransport>,
}

impl CourseCatalog {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    pub fn over_http(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(Arc::new(HttpCatalogTransport::new(config)?)))
    }

    /// Look up courses for a query. A parsed course code goes to the exact
    /// endpoint first; a hit answers with that single record and general
    /// search is never invoked. Otherwise free-text search runs with the
    /// limit, preserving service order.
    pub async fn lookup(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CourseRecord>, CatalogError> {
        if let Some(code) = parse_course_code(query) {
            debug!(code = %code, "parsed course code, trying exact lookup");
            if let Some(raw) = self.transport.get_course(&code).await? {
                return Ok(vec![raw.normalize()]);
            }
        }

        let raws = self.transport.search_courses(query, limit).await?;
        Ok(raws
            .into_iter()
            .take(limit)
            .map(RawCourse::normalize)
            .collect())
    }
}
