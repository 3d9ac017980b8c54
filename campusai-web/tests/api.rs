//! Router-level API tests with doubled collaborators.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use campusai_core::{CoreResult, RetrievalConfig};
use campusai_index::RetrievedPassage;
use campusai_rag::{
    ChatCompletion, CourseRecord, CourseSource, PassageSource, PromptMessage, QueryPipeline,
};
use campusai_web::{auth::UserStore, create_app, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct FixedPassages;

#[async_trait]
impl PassageSource for FixedPassages {
    async fn retrieve(&self, _query: &str, _k: usize) -> CoreResult<Vec<RetrievedPassage>> {
        Ok(vec![RetrievedPassage {
            text: "Northgate's computer science department is in the Norris wing.".to_string(),
            source_url: "https://northgate.edu/cs".to_string(),
            score: 0.91,
        }])
    }
}

struct FixedCourses;

#[async_trait]
impl CourseSource for FixedCourses {
    async fn lookup(&self, query: &str, _limit: usize) -> CoreResult<Vec<CourseRecord>> {
        if query.to_lowercase().contains("comp") {
            Ok(vec![CourseRecord {
                subject: Some("COMP".to_string()),
                catalog_number: Some("352".to_string()),
                title: Some("Data Structures and Algorithms".to_string()),
                prerequisites: Some("COMP 249".to_string()),
                ..Default::default()
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Counts invocations and records the prompt it was handed.
struct CountingCompletion {
    calls: AtomicUsize,
    last_prompt: Mutex<Vec<PromptMessage>>,
}

impl CountingCompletion {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatCompletion for CountingCompletion {
    async fn complete(&self, messages: &[PromptMessage]) -> CoreResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = messages.to_vec();
        Ok("COMP 352 covers data structures. Its prerequisite is COMP 249.".to_string())
    }
}

fn test_app(completion: Arc<CountingCompletion>) -> Router {
    let pipeline = QueryPipeline::new(
        Arc::new(FixedPassages),
        Arc::new(FixedCourses),
        completion,
        RetrievalConfig::default(),
        5,
    );
    create_app(AppState::from_parts(pipeline, UserStore::new()))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "hunter22",
        "firstName": "Maya",
        "lastName": "Laurent",
        "role": "student",
    })
}

/// Sign up and log in, returning a bearer token.
async fn obtain_token(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/api/auth/signup", signup_body(email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user"]["firstName"], "Maya");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let app = test_app(Arc::new(CountingCompletion::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = test_app(Arc::new(CountingCompletion::new()));

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/signup", signup_body("maya@northgate.edu")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json("/api/auth/signup", signup_body("maya@northgate.edu")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app(Arc::new(CountingCompletion::new()));
    obtain_token(&app, "maya@northgate.edu").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": "maya@northgate.edu", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_returns_the_account_behind_the_token() {
    let app = test_app(Arc::new(CountingCompletion::new()));
    let token = obtain_token(&app, "maya@northgate.edu").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/verify")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "maya@northgate.edu");
    assert_eq!(body["user"]["role"], "student");
}

#[tokio::test]
async fn verify_without_token_is_unauthorized() {
    let app = test_app(Arc::new(CountingCompletion::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/verify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unauthenticated_query_gets_refusal_and_no_completion_call() {
    let completion = Arc::new(CountingCompletion::new());
    let app = test_app(completion.clone());

    let response = app
        .oneshot(post_json("/api/query", json!({ "query": "when is tuition due?" })))
        .await
        .unwrap();

    // Refusal rides inside a normal chat response, not an HTTP error
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["response"],
        "I apologize, but you need to sign in to use CampusAI."
    );
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_query_is_a_bad_request() {
    let completion = Arc::new(CountingCompletion::new());
    let app = test_app(completion.clone());
    let token = obtain_token(&app, "maya@northgate.edu").await;

    let mut request = post_json("/api/query", json!({ "query": "   " }));
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("query"));
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn course_question_flows_end_to_end() {
    let completion = Arc::new(CountingCompletion::new());
    let app = test_app(completion.clone());
    let token = obtain_token(&app, "maya@northgate.edu").await;

    let mut request = post_json(
        "/api/query",
        json!({ "query": "What are the prerequisites for COMP 352?" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["response"].as_str().unwrap().contains("COMP 352"));
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);

    // The model saw the retrieved passage, the course record, and the caller
    let prompt = completion.last_prompt.lock().unwrap();
    assert_eq!(prompt.len(), 2);
    assert!(prompt[0].content.contains("Maya"));
    assert!(prompt[1].content.contains("Norris wing"));
    assert!(prompt[1].content.contains("COMP352 - Data Structures and Algorithms"));
    assert!(prompt[1].content.contains("Prerequisites: COMP 249"));
}
