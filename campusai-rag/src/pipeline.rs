//! Query pipeline
//!
//! The end-to-end path for one authenticated query: retrieve passages and
//! course records concurrently, assemble the context, build the prompt, and
//! generate the answer.
//!
//! Retrieval and catalog lookup are supplementary. Either failing degrades
//! the query to less context with a warning; only completion failures
//! surface to the caller.

use crate::catalog::{CourseCatalog, CourseRecord};
use crate::completion::ChatCompletion;
use crate::context::assemble;
use crate::prompt::build_messages;
use async_trait::async_trait;
use campusai_core::{AssistantError, CoreResult, Identity, RetrievalConfig};
use campusai_index::{PassageRetriever, RetrievedPassage};
use std::sync::Arc;
use tracing::{info, warn};

/// Seam over passage retrieval.
#[async_trait]
pub trait PassageSource: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> CoreResult<Vec<RetrievedPassage>>;
}

#[async_trait]
impl PassageSource for PassageRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> CoreResult<Vec<RetrievedPassage>> {
        self.search(query, k).await
    }
}

/// Seam over course lookup.
#[async_trait]
pub trait CourseSource: Send + Sync {
    async fn lookup(&self, query: &str, limit: usize) -> CoreResult<Vec<CourseRecord>>;
}

#[async_trait]
impl CourseSource for CourseCatalog {
    async fn lookup(&self, query: &str, limit: usize) -> CoreResult<Vec<CourseRecord>> {
        CourseCatalog::lookup(self, query, limit)
            .await
            .map_err(|e| AssistantError::upstream("catalog", e.to_string()))
    }
}

pub struct QueryPipeline {
    passages: Arc<dyn PassageSource>,
    courses: Arc<dyn CourseSource>,
    completion: Arc<dyn ChatCompletion>,
    retrieval: RetrievalConfig,
    catalog_limit: usize,
}

impl QueryPipeline {
    pub fn new(
        passages: Arc<dyn PassageSource>,
        courses: Arc<dyn CourseSource>,
        completion: Arc<dyn ChatCompletion>,
        retrieval: RetrievalConfig,
        catalog_limit: usize,
    ) -> Self {
        Self {
            passages,
            courses,
            completion,
            retrieval,
            catalog_limit,
        }
    }

    /// Answer one query on behalf of an authenticated caller.
    ///
    /// An empty or whitespace-only query is the caller's fault. Retrieval
    /// and catalog failures degrade to an answer with less context; a
    /// completion failure is the only upstream error that propagates.
    pub async fn answer(&self, identity: &Identity, query: &str) -> CoreResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistantError::bad_request("query must not be empty"));
        }

        let (passages, courses) = tokio::join!(
            self.passages.retrieve(query, self.retrieval.top_k),
            self.courses.lookup(query, self.catalog_limit),
        );

        let passages = match passages {
            Ok(passages) => passages,
            Err(e) => {
                warn!(error = %e, "passage retrieval failed, answering without passages");
                Vec::new()
            }
        };
        let courses = match courses {
            Ok(courses) => courses,
            Err(e) => {
                warn!(error = %e, "course lookup failed, answering without course data");
                Vec::new()
            }
        };

        let context = assemble(&passages, &courses, self.retrieval.max_context_chars);
        let messages = build_messages(identity, &context, query);

        info!(
            email = %identity.email,
            passages = passages.len(),
            courses = courses.len(),
            context_chars = context.len(),
            "generating answer"
        );

        self.completion.complete(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptMessage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubPassages {
        result: CoreResult<Vec<RetrievedPassage>>,
        calls: AtomicUsize,
    }

    impl StubPassages {
        fn ok(texts: &[&str]) -> Self {
            Self {
                result: Ok(texts
                    .iter()
                    .map(|t| RetrievedPassage {
                        text: t.to_string(),
                        source_url: "https://northgate.edu/about".to_string(),
                        score: 0.8,
                    })
                    .collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(AssistantError::degraded("index unavailable")),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PassageSource for StubPassages {
        async fn retrieve(&self, _query: &str, _k: usize) -> CoreResult<Vec<RetrievedPassage>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(passages) => Ok(passages.clone()),
                Err(_) => Err(AssistantError::degraded("index unavailable")),
            }
        }
    }

    struct StubCourses {
        fail: bool,
    }

    #[async_trait]
    impl CourseSource for StubCourses {
        async fn lookup(&self, _query: &str, _limit: usize) -> CoreResult<Vec<CourseRecord>> {
            if self.fail {
                Err(AssistantError::upstream("catalog", "503"))
            } else {
                Ok(vec![CourseRecord {
                    subject: Some("COMP".to_string()),
                    catalog_number: Some("352".to_string()),
                    title: Some("Data Structures".to_string()),
                    ..Default::default()
                }])
            }
        }
    }

    /// Records the prompt it was handed.
    struct RecordingCompletion {
        seen: Mutex<Vec<PromptMessage>>,
    }

    impl RecordingCompletion {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for RecordingCompletion {
        async fn complete(&self, messages: &[PromptMessage]) -> CoreResult<String> {
            *self.seen.lock().unwrap() = messages.to_vec();
            Ok("an answer".to_string())
        }
    }

    fn identity() -> Identity {
        Identity::new("maya@northgate.edu", "Maya", "Laurent", "student")
    }

    fn pipeline(
        passages: Arc<dyn PassageSource>,
        courses: Arc<dyn CourseSource>,
        completion: Arc<dyn ChatCompletion>,
    ) -> QueryPipeline {
        QueryPipeline::new(passages, courses, completion, RetrievalConfig::default(), 5)
    }

    #[tokio::test]
    async fn happy_path_weaves_passages_and_courses_into_prompt() {
        let completion = Arc::new(RecordingCompletion::new());
        let pipeline = pipeline(
            Arc::new(StubPassages::ok(&["Northgate was founded in 1962."])),
            Arc::new(StubCourses { fail: false }),
            completion.clone(),
        );

        let answer = pipeline
            .answer(&identity(), "tell me about comp 352")
            .await
            .unwrap();
        assert_eq!(answer, "an answer");

        let seen = completion.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].content.contains("Northgate was founded in 1962."));
        assert!(seen[1].content.contains("COMP352 - Data Structures"));
        assert!(seen[1].content.contains("Question: tell me about comp 352"));
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_work() {
        let passages = Arc::new(StubPassages::ok(&[]));
        let pipeline = pipeline(
            passages.clone(),
            Arc::new(StubCourses { fail: false }),
            Arc::new(RecordingCompletion::new()),
        );

        let err = pipeline.answer(&identity(), "   ").await.unwrap_err();
        assert!(matches!(err, AssistantError::BadRequest { .. }));
        assert_eq!(passages.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn retrieval_failure_degrades_to_empty_context() {
        let completion = Arc::new(RecordingCompletion::new());
        let pipeline = pipeline(
            Arc::new(StubPassages::failing()),
            Arc::new(StubCourses { fail: true }),
            completion.clone(),
        );

        let answer = pipeline
            .answer(&identity(), "when is tuition due?")
            .await
            .unwrap();
        assert_eq!(answer, "an answer");

        let seen = completion.seen.lock().unwrap();
        assert!(seen[1]
            .content
            .starts_with("Context about Northgate University:\n\n"));
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        struct FailingCompletion;

        #[async_trait]
        impl ChatCompletion for FailingCompletion {
            async fn complete(&self, _messages: &[PromptMessage]) -> CoreResult<String> {
                Err(AssistantError::upstream("completion", "HTTP 500"))
            }
        }

        let pipeline = pipeline(
            Arc::new(StubPassages::ok(&["passage"])),
            Arc::new(StubCourses { fail: false }),
            Arc::new(FailingCompletion),
        );

        let err = pipeline.answer(&identity(), "hello").await.unwrap_err();
        assert!(matches!(err, AssistantError::Upstream { .. }));
    }
}
