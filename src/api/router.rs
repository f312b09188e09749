//! HTTP router: the verify endpoint under `/api`, generated reports served
//! statically under `/reports`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// BREF PDFs run to tens of megabytes; allow a permit plus several BREFs.
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Build the application router.
pub fn api_router(ctx: ApiContext) -> Router {
    let reports_dir = ctx.reports_dir().to_path_buf();

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/verify", post(endpoints::verify::verify))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .nest_service("/reports", ServeDir::new(reports_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::pipeline::compliance::MockLlmClient;
    use crate::testpdf::pdf_with_pages;

    struct TestEnv {
        _tmp: tempfile::TempDir,
        ctx: ApiContext,
    }

    fn test_env(llm: MockLlmClient) -> TestEnv {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(
            tmp.path().join("kb.db"),
            tmp.path().join("uploads"),
            tmp.path().join("reports"),
            Arc::new(llm),
        );
        TestEnv { _tmp: tmp, ctx }
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
        let boundary = "batcheck-test-boundary";
        let mut body = Vec::new();
        for (name, filename, bytes) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    fn permit_pdf() -> Vec<u8> {
        pdf_with_pages(&[
            "De aanvraag betreft het houden van 85 000 vleeskuikens in zes stallen.\n\
             3.1.1 Een luchtwassysteem is verplicht op alle stallen.",
        ])
    }

    fn batc_pdf() -> Vec<u8> {
        pdf_with_pages(&[
            "1. TOEPASSINGSGEBIED\nDeze BBT-conclusies hebben betrekking op de intensieve \
             pluimveehouderij.",
            "BBT 1. Ter vermindering van ammoniakemissies is de BBT het toepassen van een \
             luchtwassysteem met voldoende capaciteit.",
        ])
    }

    #[tokio::test]
    async fn health_reports_version() {
        let env = test_env(MockLlmClient::new(""));
        let app = api_router(env.ctx.clone());

        let req = Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::config::APP_VERSION);
        assert!(json["llm_configured"].is_boolean());
    }

    #[tokio::test]
    async fn verify_without_permit_part_returns_400() {
        let env = test_env(MockLlmClient::new(""));
        let app = api_router(env.ctx.clone());

        let (content_type, body) = multipart_body(&[("bref_files", "irpp.pdf", &batc_pdf())]);
        let req = Request::builder()
            .method("POST")
            .uri("/api/verify")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("permit file"));
    }

    #[tokio::test]
    async fn verify_with_invalid_permit_returns_422() {
        let env = test_env(MockLlmClient::new(""));
        let app = api_router(env.ctx.clone());

        let (content_type, body) =
            multipart_body(&[("permit_file", "permit.pdf", b"this is not a pdf")]);
        let req = Request::builder()
            .method("POST")
            .uri("/api/verify")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn verify_full_flow_returns_results_and_report_urls() {
        let applicability = r#"{"bref_id": "IRPP", "applicability": "Likely Applicable", "justification": "poultry"}"#;
        let compliance = r#"{"bat_id": "IRPP-BAT-1", "compliance_status": "Partially Compliant", "detailed_findings": "Air scrubber present, monitoring unclear."}"#;
        let env = test_env(MockLlmClient::with_sequence(vec![
            Ok(applicability.into()),
            Ok(compliance.into()),
        ]));
        let app = api_router(env.ctx.clone());

        let (content_type, body) = multipart_body(&[
            ("permit_file", "solidus_vergunning.pdf", &permit_pdf()),
            ("bref_files", "irpp.pdf", &batc_pdf()),
        ]);
        let req = Request::builder()
            .method("POST")
            .uri("/api/verify")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["message"], "Verification process completed.");
        assert_eq!(json["permit_id"], "UPLOADED_PERMIT_solidus_vergunning");
        assert_eq!(json["applicable_brefs_analysis"][0]["bref_id"], "IRPP");
        assert_eq!(
            json["bat_compliance_results"][0]["status"],
            "partially_compliant"
        );
        assert_eq!(json["failures"].as_array().unwrap().len(), 0);

        // Report artifacts exist and are served under /reports
        let report_id = json["report_id"].as_str().unwrap().to_string();
        for ext in ["md", "html", "pdf"] {
            let path = env.ctx.reports_dir().join(format!("{report_id}.{ext}"));
            assert!(path.exists(), "missing report artifact {ext}");
        }

        let app2 = api_router(env.ctx.clone());
        let req = Request::builder()
            .method("GET")
            .uri(format!("/reports/{report_id}.html"))
            .body(Body::empty())
            .unwrap();
        let response = app2.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn verify_records_bref_extraction_failure() {
        let applicability_unused = r#"{"bref_id": "X", "applicability": "Not Applicable", "justification": ""}"#;
        let env = test_env(MockLlmClient::new(applicability_unused));
        let app = api_router(env.ctx.clone());

        let (content_type, body) = multipart_body(&[
            ("permit_file", "permit.pdf", &permit_pdf()),
            ("bref_files", "broken.pdf", b"garbage bytes"),
        ]);
        let req = Request::builder()
            .method("POST")
            .uri("/api/verify")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let failures = json["failures"].as_array().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0]["stage"], "bref_extraction");
        assert_eq!(failures[0]["subject"], "broken.pdf");
        assert!(json["bat_compliance_results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let env = test_env(MockLlmClient::new(""));
        let app = api_router(env.ctx.clone());

        let req = Request::builder()
            .method("GET")
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
