//! Axum route handlers for the document-generation pipeline.

use axum::{
    body::Body,
    extract::{Host, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::docgen::poller::poll_until_complete;
use crate::docgen::template::build_job_descriptor;
use crate::errors::AppError;
use crate::models::{ContactRecord, OpportunityRecord};
use crate::state::AppState;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub contact: Option<ContactRecord>,
    pub opportunity: Option<OpportunityRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentResponse {
    pub success: bool,
    pub message: String,
    pub download_url: String,
    pub request_id: String,
    pub file_id: i64,
    pub personalized_for: String,
    pub opportunity_name: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-document
///
/// Full pipeline: validate → build payload → submit → poll until complete →
/// respond with a download reference served by this service. The handler
/// holds the request open for the duration of the poll loop (contract
/// parity with the original service); the job itself is never persisted, so
/// the returned `(requestId, fileId)` pair is the caller's only handle on
/// the generated file.
pub async fn handle_generate_document(
    State(state): State<AppState>,
    Host(host): Host,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<Json<GenerateDocumentResponse>, AppError> {
    let (contact, opportunity) = match (request.contact, request.opportunity) {
        (Some(contact), Some(opportunity)) => (contact, opportunity),
        _ => {
            return Err(AppError::Validation(
                "Missing contact or opportunity data".to_string(),
            ))
        }
    };

    info!(
        "Received document generation request for '{}' / '{}'",
        contact.display_name(),
        opportunity.display_name()
    );

    let payload = build_job_descriptor(&contact, &opportunity);

    let request_id = state.ndaq.submit(payload).await?;
    info!("Document submitted with request id {request_id}");

    let file_id = poll_until_complete(
        state.config.poll_max_attempts,
        state.config.poll_interval,
        || state.ndaq.fetch_status(&request_id),
    )
    .await?;
    info!("Document completed with file id {file_id}");

    let download_url = format!("https://{host}/download/{request_id}/{file_id}");

    Ok(Json(GenerateDocumentResponse {
        success: true,
        message: "Document generated successfully".to_string(),
        download_url,
        request_id,
        file_id,
        personalized_for: contact.display_name().to_string(),
        opportunity_name: opportunity.display_name().to_string(),
    }))
}

/// GET /download/:request_id/:file_id
///
/// Proxies the finished artifact from upstream, streaming the body through
/// without buffering it. The identifier pair is taken at face value: there
/// is no record of which jobs this service created, so no ownership check
/// is possible (known limitation, inherited from the original service).
pub async fn handle_download(
    State(state): State<AppState>,
    Path((request_id, file_id)): Path<(String, i64)>,
) -> Result<Response, AppError> {
    info!("Proxying download for request {request_id}, file {file_id}");

    let upstream = state
        .ndaq
        .download(&request_id, file_id)
        .await
        .map_err(|e| AppError::Download(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"Personalized_Document_{request_id}.docx\""),
        ),
    ];

    Ok((headers, Body::from_stream(upstream.bytes_stream())).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Config;
    use crate::ndaq_client::NdaqClient;
    use crate::routes::build_router;

    fn test_state(server: &MockServer) -> AppState {
        let config = Config {
            ndaq_username: "user".to_string(),
            ndaq_password: "secret".to_string(),
            ndaq_submit_url: format!("{}/submit?m=cpack", server.uri()),
            ndaq_status_url: format!("{}/status?m=getfifr", server.uri()),
            ndaq_download_url: format!("{}/download?mode=dnld", server.uri()),
            port: 0,
            rust_log: "info".to_string(),
            poll_max_attempts: 30,
            poll_interval: Duration::from_millis(1),
        };
        AppState {
            ndaq: NdaqClient::new(&config),
            config,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let app = build_router(test_state(&server));
        let response = app
            .oneshot(
                Request::post("/generate-document")
                    .header("host", "bridge.example.com")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing contact or opportunity data");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_generate_document_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "files": [{ "requestid": "R1" }] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Two pending polls, then completion.
        Mock::given(method("GET"))
            .and(path("/status"))
            .and(query_param("rid", "R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "Failed": false, "Complete": false, "FileId": 0 }
            ])))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .and(query_param("rid", "R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "Failed": false, "Complete": true, "FileId": 42 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let request_body = serde_json::json!({
            "contact": {
                "fullName": "Michael Moore",
                "companyName": "Canadian National Railway",
                "industry": "Transportation"
            },
            "opportunity": { "name": "CN Railroad", "stage": "Discovery" }
        });

        let app = build_router(test_state(&server));
        let response = app
            .oneshot(
                Request::post("/generate-document")
                    .header("host", "bridge.example.com")
                    .header("content-type", "application/json")
                    .body(Body::from(request_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["requestId"], "R1");
        assert_eq!(body["fileId"], 42);
        assert_eq!(body["personalizedFor"], "Michael Moore");
        assert_eq!(body["opportunityName"], "CN Railroad");
        assert_eq!(
            body["downloadUrl"],
            "https://bridge.example.com/download/R1/42"
        );
    }

    #[tokio::test]
    async fn test_generate_document_surfaces_upstream_failure_flag() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "files": [{ "requestid": "R2" }] }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "Failed": true, "Complete": false, "FileId": 0 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let request_body = serde_json::json!({
            "contact": { "fullName": "Jane Doe" },
            "opportunity": { "name": "Acme Deal" }
        });

        let app = build_router(test_state(&server));
        let response = app
            .oneshot(
                Request::post("/generate-document")
                    .header("host", "bridge.example.com")
                    .header("content-type", "application/json")
                    .body(Body::from(request_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Document generation failed");
    }

    #[tokio::test]
    async fn test_download_streams_with_docx_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download"))
            .and(query_param("fid", "42"))
            .and(query_param("rid", "R1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"docx bytes".to_vec()))
            .mount(&server)
            .await;

        let app = build_router(test_state(&server));
        let response = app
            .oneshot(Request::get("/download/R1/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            DOCX_CONTENT_TYPE
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Personalized_Document_R1.docx\""
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"docx bytes");
    }

    #[tokio::test]
    async fn test_download_failure_hides_upstream_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = build_router(test_state(&server));
        let response = app
            .oneshot(Request::get("/download/R1/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains(&server.uri()), "upstream URL leaked");
        assert!(!text.contains("secret"), "credentials leaked");
        assert!(!text.contains("dXNlcjpzZWNyZXQ="), "auth header leaked");

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["error"], "Failed to download document");
        assert!(body["message"].is_string());
    }
}
