pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers::handle_export;
use crate::extraction::handlers::handle_parse_file;
use crate::state::AppState;
use crate::tailoring::handlers::handle_tailor;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction
        .route(
            "/api/v1/parse-file",
            post(handle_parse_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Export
        .route("/api/v1/export/:format", post(handle_export))
        // Tailoring
        .route("/api/v1/tailor", post(handle_tailor))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::export::{ExportFormat, Exporter};
    use crate::tailoring::{ResumeTailor, TailorError, TailorResult};

    const BOUNDARY: &str = "tailor-test-boundary";

    struct StubTailor {
        fail: bool,
    }

    #[async_trait]
    impl ResumeTailor for StubTailor {
        async fn tailor(
            &self,
            resume_text: &str,
            job_description: &str,
        ) -> Result<TailorResult, TailorError> {
            if self.fail {
                return Err(TailorError::Incomplete("cover_letter"));
            }
            Ok(TailorResult {
                tailored_resume: format!("{resume_text} for {job_description}"),
                cover_letter: "Dear team".to_string(),
                resume_match_explanation: "fits".to_string(),
                cover_letter_explanation: "warm".to_string(),
            })
        }
    }

    fn app(tailor: Option<Arc<dyn ResumeTailor>>) -> Router {
        build_router(AppState {
            config: Config::default(),
            exporter: Arc::new(Exporter::default()),
            tailor,
        })
    }

    fn multipart_request(field: &str, filename: &str, content_type: &str, body: &[u8]) -> Request<Body> {
        let mut payload = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        payload.extend_from_slice(body);
        payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/parse-file")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["service"], "tailor-api");
    }

    #[tokio::test]
    async fn test_parse_plain_text_upload() {
        let request = multipart_request("file", "resume.txt", "text/plain", b"Jane Doe\nRust engineer\n");
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["text"], "Jane Doe\nRust engineer");
    }

    #[tokio::test]
    async fn test_parse_rtf_by_extension() {
        let request = multipart_request(
            "file",
            "resume.rtf",
            "application/octet-stream",
            br"{\rtf1\ansi {\b Jane} Doe\par Engineer}",
        );
        let response = app(None).oneshot(request).await.unwrap();
        let body = read_json(response).await;
        let text = body["text"].as_str().unwrap();
        assert!(text.contains("Jane Doe"), "{text}");
        assert!(text.contains("Engineer"), "{text}");
    }

    #[tokio::test]
    async fn test_binary_of_unknown_type_gets_placeholder() {
        let request = multipart_request("file", "photo.png", "image/png", b"\x89PNG\r\n");
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(
            body["text"],
            "Could not extract text from file of type image/png"
        );
    }

    #[tokio::test]
    async fn test_parse_without_file_part_is_rejected() {
        let request = multipart_request("attachment", "resume.txt", "text/plain", b"hello");
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["message"], "No file provided");
    }

    #[tokio::test]
    async fn test_export_headers_for_every_format() {
        for format in ExportFormat::ALL {
            let request = json_request(
                &format!("/api/v1/export/{format}"),
                json!({ "content": "Jane Doe\n\nEXPERIENCE\n- Rust", "filename": "jane" }),
            );
            let response = app(None).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{format}");
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                format.mime_type(),
                "{format}"
            );
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                format!("attachment; filename=\"jane.{}\"", format.extension()).as_str(),
            );
        }
    }

    #[tokio::test]
    async fn test_export_text_strips_markdown() {
        let request = json_request(
            "/api/v1/export/text",
            json!({ "content": "## Skills\n**Rust**" }),
        );
        let response = app(None).oneshot(request).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Skills\nRust");
    }

    #[tokio::test]
    async fn test_unknown_export_format_is_rejected() {
        let request = json_request("/api/v1/export/odt", json!({ "content": "x" }));
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tailor_without_backend_is_not_implemented() {
        let request = json_request(
            "/api/v1/tailor",
            json!({ "resume_text": "R", "job_description": "J" }),
        );
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_tailor_requires_both_inputs() {
        let tailor: Arc<dyn ResumeTailor> = Arc::new(StubTailor { fail: false });
        let request = json_request("/api/v1/tailor", json!({ "resumeText": "R" }));
        let response = app(Some(tailor)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(
            body["error"]["message"],
            "Both resume text and job description are required"
        );
    }

    #[tokio::test]
    async fn test_tailor_success() {
        let tailor: Arc<dyn ResumeTailor> = Arc::new(StubTailor { fail: false });
        let request = json_request(
            "/api/v1/tailor",
            json!({ "resumeText": "R", "jobDescription": "J" }),
        );
        let response = app(Some(tailor)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["tailored_resume"], "R for J");
        assert_eq!(body["cover_letter"], "Dear team");
    }

    #[tokio::test]
    async fn test_tailor_failure_is_friendly() {
        let tailor: Arc<dyn ResumeTailor> = Arc::new(StubTailor { fail: true });
        let request = json_request(
            "/api/v1/tailor",
            json!({ "resume_text": "R", "job_description": "J" }),
        );
        let response = app(Some(tailor)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["error"], true);
        assert_eq!(
            body["friendly_message"],
            crate::tailoring::handlers::FRIENDLY_FAILURE_MESSAGE
        );
    }
}
