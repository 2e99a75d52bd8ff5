use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use promptforge::tests::util::test_router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROQ_PATH: &str = "/groq/v1/chat/completions";
const OPENAI_PATH: &str = "/openai/v1/chat/completions";

fn chat_response(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "content": content } }]
    }))
}

fn optimize_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/optimize-prompt")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn router_for(server: &MockServer) -> axum::Router {
    test_router(
        &format!("{}{}", server.uri(), GROQ_PATH),
        &format!("{}{}", server.uri(), OPENAI_PATH),
    )
}

#[tokio::test]
async fn groq_failure_falls_back_to_openai() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GROQ_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(chat_response("Saved by the fallback."))
        .expect(1)
        .mount(&server)
        .await;

    let app = router_for(&server);
    let response = app
        .oneshot(optimize_request(
            json!({ "input": "draw a cat", "category": "creative" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload["optimizedPrompt"], "Saved by the fallback.");
    assert_eq!(payload["metadata"]["model"], "openai");
    assert_eq!(payload["metadata"]["attempts"], 2);
}

#[tokio::test]
async fn openai_quota_failure_switches_to_groq() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string(
            "You exceeded your current quota, please check your plan and billing details.",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GROQ_PATH))
        .respond_with(chat_response("Groq to the rescue."))
        .expect(1)
        .mount(&server)
        .await;

    let app = router_for(&server);
    let response = app
        .oneshot(optimize_request(json!({
            "input": "draw a cat",
            "category": "creative",
            "model": "openai",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload["metadata"]["model"], "groq");
    assert_eq!(payload["metadata"]["attempts"], 2);
    // The client asked for OpenAI explicitly, even though Groq answered.
    assert_eq!(payload["metadata"]["optimization"], "manual");
}

#[tokio::test]
async fn both_providers_failing_returns_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GROQ_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let app = router_for(&server);
    let response = app
        .clone()
        .oneshot(optimize_request(
            json!({ "input": "draw a cat", "category": "creative" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = json_body(response).await;
    assert_eq!(
        payload["error"],
        "Failed to optimize prompt after multiple attempts. Please try again."
    );

    // The failure is debited to the provider that was selected when the
    // loop gave up.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/optimize-prompt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let payload = json_body(response).await;
    assert_eq!(payload["metrics"]["openai"]["totalRequests"], 1);
    assert_eq!(payload["metrics"]["openai"]["successRate"], 0);
    assert!(payload["metrics"].get("groq").is_none());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let payload = json_body(response).await;
    assert_eq!(payload["totalRequests"], 1);
    assert_eq!(payload["failedRequests"], 1);
    assert_eq!(payload["modelUsage"]["openai"], 1);
}

#[tokio::test]
async fn exhausted_quotas_on_both_providers_return_503() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GROQ_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota reached for today"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota reached for today"))
        .expect(1)
        .mount(&server)
        .await;

    let app = router_for(&server);
    let response = app
        .oneshot(optimize_request(
            json!({ "input": "draw a cat", "category": "creative" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let payload = json_body(response).await;
    assert_eq!(
        payload["error"],
        "AI service quota exceeded. Please try again later or contact support."
    );
}

#[tokio::test]
async fn openai_retries_once_on_transient_failure() {
    let server = MockServer::start().await;
    // First call fails with a non-quota error, the retry succeeds.
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("flaky"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(chat_response("Second try."))
        .expect(1)
        .mount(&server)
        .await;

    let app = router_for(&server);
    let response = app
        .oneshot(optimize_request(json!({
            "input": "draw a cat",
            "category": "creative",
            "model": "openai",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload["metadata"]["model"], "openai");
    assert_eq!(payload["metadata"]["attempts"], 2);
}
