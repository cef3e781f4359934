#[cfg(test)]
mod intake_api_tests {
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode};
    use axum::Router;
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use leadserver::core::config::{AppConfig, Environment};
    use leadserver::core::shared::models::{CaseTypeStatus, NewLead};
    use leadserver::core::shared::state::AppState;
    use leadserver::intake::store::{LeadStore, MemoryLeadStore};
    use leadserver::main_module::build_router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        store: Arc<MemoryLeadStore>,
        roundup_id: i64,
    }

    async fn test_app_with(config: AppConfig) -> TestApp {
        let store = Arc::new(MemoryLeadStore::new());
        let brand = store
            .seed_brand("peoples-justice", "People's Justice", "peoplesjustice.com", true)
            .await;
        store
            .seed_brand("retired", "Retired Brand", "retired.example", false)
            .await;
        let roundup = store
            .seed_case_type(brand.id, "roundup", "Roundup", CaseTypeStatus::Active)
            .await;
        let state = Arc::new(AppState::new(config, store.clone()));
        TestApp {
            router: build_router(state),
            store,
            roundup_id: roundup.id,
        }
    }

    async fn test_app() -> TestApp {
        test_app_with(AppConfig::default()).await
    }

    async fn post_lead(
        app: &TestApp,
        host: &str,
        body: impl Into<Body>,
        extra: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/intake/lead")
            .header("host", host)
            .header("content-type", "application/json");
        for (name, value) in extra {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body.into()).unwrap();
        send(app, request).await
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    fn roundup_submission() -> Value {
        json!({
            "contact": {"phone": "5551234567", "email": "a@b.com"},
            "consent": {"checked": true},
            "caseSlug": "roundup"
        })
    }

    async fn assert_nothing_written(app: &TestApp) {
        assert!(app.store.leads().await.is_empty());
        assert!(app.store.audit_log().await.is_empty());
    }

    #[tokio::test]
    async fn test_valid_submission_creates_lead() {
        let app = test_app().await;
        let (status, _, body) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "Thank you! An attorney will contact you within 24 hours."
        );

        let leads = app.store.leads().await;
        assert_eq!(leads.len(), 1);
        assert_eq!(body["leadId"], leads[0].id);
        assert_eq!(leads[0].status, "new");
        assert_eq!(leads[0].phone, "5551234567");
        assert_eq!(leads[0].case_type_id, Some(app.roundup_id));

        let audit = app.store.audit_log().await;
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].event_type, "created");
    }

    #[tokio::test]
    async fn test_missing_contact_is_rejected() {
        let app = test_app().await;
        for body in [
            json!({"contact": {"email": "a@b.com"}, "consent": {"checked": true}}),
            json!({"contact": {"phone": "5551234567"}, "consent": {"checked": true}}),
            json!({"contact": {"phone": "   ", "email": "a@b.com"}, "consent": {"checked": true}}),
            json!({"consent": {"checked": true}}),
        ] {
            let (status, _, response) =
                post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "Phone and email are required");
        }
        assert_nothing_written(&app).await;
    }

    #[tokio::test]
    async fn test_falsy_consent_is_rejected() {
        let app = test_app().await;
        for checked in [json!(false), json!(null), json!(0), json!("")] {
            let mut body = roundup_submission();
            body["consent"]["checked"] = checked;
            let (status, _, response) =
                post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "TCPA consent is required");
        }

        let mut body = roundup_submission();
        body.as_object_mut().unwrap().remove("consent");
        let (status, _, _) = post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_nothing_written(&app).await;
    }

    #[tokio::test]
    async fn test_unknown_or_inactive_domain_is_rejected() {
        let app = test_app().await;
        for host in ["evil.example", "retired.example"] {
            let (status, _, response) =
                post_lead(&app, host, roundup_submission().to_string(), &[]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "Invalid domain");
        }
        assert_nothing_written(&app).await;
    }

    #[tokio::test]
    async fn test_host_matching_ignores_case() {
        let app = test_app().await;
        let (status, _, _) = post_lead(
            &app,
            "PeoplesJustice.COM",
            roundup_submission().to_string(),
            &[],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test_app().await;
        for body in ["{not json", "null", "\"lead\""] {
            let (status, _, response) =
                post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "Invalid request body");
        }
        assert_nothing_written(&app).await;
    }

    #[tokio::test]
    async fn test_oversized_free_form_field_is_rejected() {
        let app = test_app().await;
        let mut body = roundup_submission();
        body["qualifiers"] = json!({"notes": "x".repeat(9 * 1024)});
        let (status, _, response) =
            post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Submission contains oversized fields");
        assert_nothing_written(&app).await;
    }

    #[tokio::test]
    async fn test_text_longer_than_column_is_bad_request() {
        let app = test_app().await;
        let mut long_phone = roundup_submission();
        long_phone["contact"]["phone"] = json!("5".repeat(60));
        let mut long_name = roundup_submission();
        long_name["contact"]["firstName"] = json!("A".repeat(101));
        let mut long_source = roundup_submission();
        long_source["source"] = json!("s".repeat(51));

        for body in [long_phone, long_name, long_source] {
            let (status, _, response) =
                post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "Submission contains oversized fields");
        }
        assert_nothing_written(&app).await;
    }

    #[tokio::test]
    async fn test_forwarded_value_that_is_not_an_ip_is_ignored() {
        let app = test_app().await;
        let spoofed = "x".repeat(60);
        let (status, _, body) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[("x-forwarded-for", spoofed.as_str())],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let leads = app.store.leads().await;
        assert_eq!(leads[0].consent_snapshot["ipAddress"], Value::Null);
        let audit = app.store.audit_log().await;
        assert_eq!(audit[0].ip_address, None);

        let (status, _, _) = post_lead(
            &app,
            "peoplesjustice.com",
            json!({
                "contact": {"phone": "5559876543", "email": "c@d.com"},
                "consent": {"checked": true}
            })
            .to_string(),
            &[("x-forwarded-for", "unknown"), ("x-real-ip", "198.51.100.4")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let leads = app.store.leads().await;
        assert_eq!(leads[1].consent_snapshot["ipAddress"], "198.51.100.4");
    }

    #[tokio::test]
    async fn test_snapshot_ip_comes_from_forwarded_header_not_body() {
        let app = test_app().await;
        let mut body = roundup_submission();
        body["ipAddress"] = json!("6.6.6.6");
        body["consent"]["ipAddress"] = json!("6.6.6.6");
        body["consent"]["timestamp"] = json!("1999-01-01T00:00:00.000Z");

        let (status, _, _) = post_lead(
            &app,
            "peoplesjustice.com",
            body.to_string(),
            &[
                ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
                ("x-real-ip", "10.0.0.9"),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let leads = app.store.leads().await;
        let snapshot = &leads[0].consent_snapshot;
        assert_eq!(snapshot["ipAddress"], "203.0.113.7");
        assert_ne!(snapshot["timestamp"], "1999-01-01T00:00:00.000Z");
        assert_eq!(snapshot["checkboxChecked"], true);
        assert_eq!(snapshot["text"], "Consent text not provided");

        let audit = app.store.audit_log().await;
        assert_eq!(audit[0].ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn test_repeat_within_window_returns_same_lead() {
        let app = test_app().await;
        let (_, _, first) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[],
        )
        .await;
        let (status, _, second) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["success"], true);
        assert_eq!(second["leadId"], first["leadId"]);
        assert_eq!(second["message"], "Your information has been received.");

        assert_eq!(app.store.leads().await.len(), 1);
        let events: Vec<String> = app
            .store
            .audit_log()
            .await
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(events, vec!["created", "duplicate_submission"]);
    }

    #[tokio::test]
    async fn test_repeat_after_window_creates_new_lead() {
        let app = test_app().await;
        let old = Utc::now() - Duration::hours(25);
        let earlier = app
            .store
            .create_lead(NewLead {
                brand_id: 1,
                source: "web_form".to_string(),
                case_type_id: Some(app.roundup_id),
                injury_id: None,
                geo_id: None,
                phone: "5551234567".to_string(),
                email: "a@b.com".to_string(),
                first_name: None,
                last_name: None,
                zip_code: None,
                qualifiers: json!({}),
                payload: json!({}),
                consent_snapshot: json!({"checkboxChecked": true}),
                user_agent: None,
                fingerprint_data: json!({}),
                page_context: json!({}),
                session_id: None,
                status: "new".to_string(),
                form_provider: "native".to_string(),
                form_version: "1.0.0".to_string(),
                created_at: old,
                updated_at: old,
            })
            .await
            .unwrap();

        let (status, _, body) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["leadId"], earlier.id);
        assert_eq!(app.store.leads().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unresolved_case_slug_still_succeeds() {
        let app = test_app().await;
        let mut body = roundup_submission();
        body["caseSlug"] = json!("does-not-exist");

        let (first_status, _, first) =
            post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;
        let (second_status, _, second) =
            post_lead(&app, "peoplesjustice.com", body.to_string(), &[]).await;

        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(second_status, StatusCode::OK);
        assert_ne!(first["leadId"], second["leadId"]);
        let leads = app.store.leads().await;
        assert_eq!(leads.len(), 2);
        assert!(leads.iter().all(|l| l.case_type_id.is_none()));
    }

    #[tokio::test]
    async fn test_store_failure_returns_generic_error() {
        let app = test_app().await;
        app.store.fail_writes(true);
        let (status, _, body) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[],
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "An error occurred while processing your request. Please try again."
        );
    }

    #[tokio::test]
    async fn test_intake_liveness_probe() {
        let app = test_app().await;
        let request = Request::builder()
            .uri("/api/intake/lead")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "lead-intake");
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_health_reports_store_reachable() {
        let app = test_app().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], true);
    }

    #[tokio::test]
    async fn test_security_headers_follow_environment() {
        let app = test_app().await;
        let (_, headers, _) = post_lead(
            &app,
            "peoplesjustice.com",
            roundup_submission().to_string(),
            &[],
        )
        .await;
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert!(headers.get("strict-transport-security").is_none());

        let mut config = AppConfig::default();
        config.server.environment = Environment::Production;
        let prod = test_app_with(config).await;
        let request = Request::builder()
            .uri("/api/intake/lead")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(&prod, request).await;
        assert_eq!(
            headers["strict-transport-security"],
            "max-age=31536000; includeSubDomains"
        );
    }
}
