pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::extraction::handlers;
use crate::extraction::remote::EXTRACT_PATH;
use crate::render::handlers as page;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Server-rendered page
        .route("/", get(page::handle_page))
        .route("/refetch", post(page::handle_refetch_form))
        // View model API
        .route("/api/v1/resume", get(handlers::handle_get_snapshot))
        .route("/api/v1/resume/resource", get(handlers::handle_get_resource))
        .route("/api/v1/resume/settled", get(handlers::handle_wait_settled))
        .route("/api/v1/resume/input", put(handlers::handle_set_input))
        .route("/api/v1/resume/refetch", post(handlers::handle_refetch))
        // Boundary RPC into the gateway
        .route(EXTRACT_PATH, post(handlers::handle_extract))
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::test_support::{spawn_server, test_state};
    use super::*;
    use crate::extraction::error::ExtractionError;
    use crate::extraction::gateway::fakes::{sample_resume, FixedExtractor};
    use crate::extraction::gateway::ResumeExtractionGateway;
    use crate::extraction::observer::recording::RecordingObserver;
    use crate::extraction::view_model::{FetchMode, SAMPLE_RESUME_TEXT};

    fn state_with(extractor: FixedExtractor) -> AppState {
        let observer = Arc::new(RecordingObserver::default());
        test_state(ResumeExtractionGateway::new(Arc::new(extractor), observer))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state_with(FixedExtractor::ok(sample_resume())));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_returns_resume() {
        let app = build_router(state_with(FixedExtractor::ok(sample_resume())));
        let response = app
            .oneshot(json_request("POST", EXTRACT_PATH, json!({"text": "Vaibhav Gupta"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::to_value(sample_resume()).unwrap());
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_text() {
        let app = build_router(state_with(FixedExtractor::ok(sample_resume())));
        let response = app
            .oneshot(json_request("POST", EXTRACT_PATH, json!({"text": "  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_extract_surfaces_gateway_error() {
        let app = build_router(state_with(FixedExtractor::err(ExtractionError::Transport(
            "network down".into(),
        ))));
        let response = app
            .oneshot(json_request("POST", EXTRACT_PATH, json!({"text": "Vaibhav Gupta"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");
        assert_eq!(body["error"]["message"], "network down");
    }

    #[tokio::test]
    async fn test_snapshot_starts_idle_with_sample_text() {
        let app = build_router(state_with(FixedExtractor::ok(sample_resume())));
        let response = app
            .oneshot(Request::get("/api/v1/resume").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["resource"]["state"], "idle");
        assert_eq!(body["fetch_mode"], "server_initiated");
        assert!(body["input_text"].as_str().unwrap().contains("Vaibhav Gupta"));
    }

    #[tokio::test]
    async fn test_set_input_then_refetch_settles_ready() {
        let state = state_with(FixedExtractor::ok(sample_resume()));
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/resume/input",
                json!({"text": "Vaibhav Gupta, Rust"}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["input_text"], "Vaibhav Gupta, Rust");
        assert_eq!(body["resource"]["state"], "idle");

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/resume/refetch",
                json!({"mode": "client_initiated"}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["resource"]["state"], "pending");
        assert_eq!(body["fetch_mode"], "client_initiated");

        let snapshot = tokio::time::timeout(Duration::from_secs(5), state.view_model.settled())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.resource.value(), Some(&sample_resume()));
    }

    #[tokio::test]
    async fn test_form_refetch_redirects_and_page_renders_result() {
        let state = state_with(FixedExtractor::ok(sample_resume()));
        let app = build_router(state.clone());

        let request = Request::post("/refetch")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("mode=server_initiated&text=Vaibhav+Gupta"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        tokio::time::timeout(Duration::from_secs(5), state.view_model.settled())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.view_model.snapshot().input_text, "Vaibhav Gupta");

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("<h3>Vaibhav Gupta</h3>"));
        assert!(html.contains("Extraction succeeded (server-side)"));
    }

    #[tokio::test]
    async fn test_resource_reports_loading_flags_and_latest_value() {
        let state = state_with(FixedExtractor::ok(sample_resume()));
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/resume/resource").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["resource"]["state"], "idle");
        assert_eq!(body["loading"], false);
        assert_eq!(body["latest_value"], Value::Null);

        state.view_model.refetch(FetchMode::ServerInitiated).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), state.view_model.settled())
            .await
            .unwrap()
            .unwrap();

        let response = app
            .oneshot(Request::get("/api/v1/resume/resource").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["resource"]["state"], "ready");
        assert_eq!(body["stale"], false);
        assert_eq!(body["latest_value"]["name"], "Vaibhav Gupta");
        assert_eq!(body["error"], Value::Null);
    }

    #[tokio::test]
    async fn test_settled_waits_for_extraction_outcome() {
        let state = state_with(FixedExtractor::err(ExtractionError::Transport(
            "network down".into(),
        )));
        let app = build_router(state.clone());
        state.view_model.refetch(FetchMode::ClientInitiated).await.unwrap();

        let response = tokio::time::timeout(
            Duration::from_secs(5),
            app.oneshot(Request::get("/api/v1/resume/settled").body(Body::empty()).unwrap()),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["resource"]["state"], "failed");
        assert_eq!(body["resource"]["data"]["message"], "network down");
    }

    #[tokio::test]
    async fn test_page_form_posts_back_the_stored_text_unchanged() {
        let state = state_with(FixedExtractor::ok(sample_resume()));
        let base = spawn_server(build_router(state.clone())).await;
        let client = reqwest::Client::new();

        let page = client.get(&base).send().await.unwrap().text().await.unwrap();
        let start = page.find("cols=\"60\">").unwrap() + "cols=\"60\">".len();
        let end = page.find("</textarea>").unwrap();
        // a browser drops the newline that opens the textarea body
        let submitted = page[start..end].strip_prefix('\n').unwrap().to_string();

        let response = client
            .post(format!("{base}/refetch"))
            .form(&[("mode", "server_initiated"), ("text", submitted.as_str())])
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        assert_eq!(submitted, SAMPLE_RESUME_TEXT);
        assert_eq!(state.view_model.snapshot().input_text, SAMPLE_RESUME_TEXT);
    }
}
