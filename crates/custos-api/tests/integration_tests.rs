//! End-to-end tests over the assembled router, driven through
//! `tower::ServiceExt::oneshot` against the in-memory backends.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use custos_core::{demo_org_id, Membership, OrgId, Organization, UserId, UserProfile};
use custos_store::demo::DEMO_USER_ID;
use custos_store::{DemoStore, Store};
use custos_api::{app, AppState};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as_user(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_probes_answer_without_auth() {
    let mut state = AppState::demo();
    state.config.auth_token = Some("secret".into());

    let (status, body) = send(app(state.clone()), get("/health/liveness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));

    let (status, body) = send(app(state), get("/health/readiness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ready".into()));
}

#[tokio::test]
async fn v1_routes_require_the_bearer_token_when_configured() {
    let mut state = AppState::demo();
    state.config.auth_token = Some("secret".into());

    let (status, _) = send(app(state.clone()), get("/v1/context?demo=true")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/v1/context?demo=true")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(state), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn demo_context_resolves_to_the_fixture_organization() {
    let (status, body) = send(app(AppState::demo()), get("/v1/context?demo=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["organization_id"],
        json!(demo_org_id().to_string()),
    );
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn anonymous_non_demo_data_requests_are_unauthorized() {
    let (status, _) = send(app(AppState::demo()), get("/v1/records/suppliers")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_in_user_lists_seeded_records() {
    let app = app(AppState::demo());
    let (status, body) = send(app, get_as_user("/v1/records/suppliers", DEMO_USER_ID)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table"], json!("suppliers"));
    assert_eq!(body["total"], json!(2));
}

#[tokio::test]
async fn record_crud_round_trip() {
    let state = AppState::demo();

    let created = post_json(
        "/v1/records/incidents?demo=true",
        json!({ "fields": {
            "title": "Phishing mail reported",
            "severity": "medium",
            "status": "open",
            "occurred_at": "2026-08-20"
        }}),
    );
    let (status, body) = send(app(state.clone()), created).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app(state.clone()),
        get(&format!("/v1/records/incidents/{id}?demo=true")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"]["title"], json!("Phishing mail reported"));

    let update = Request::builder()
        .method("PUT")
        .uri(format!("/v1/records/incidents/{id}?demo=true"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "fields": {
                "title": "Phishing mail reported",
                "status": "resolved",
                "occurred_at": "2026-08-20",
                "resolved_at": "2026-08-21"
            }})
            .to_string(),
        ))
        .unwrap();
    let (status, body) = send(app(state.clone()), update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"]["status"], json!("resolved"));

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/records/incidents/{id}?demo=true"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(state.clone()), delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        app(state),
        get(&format!("/v1/records/incidents/{id}?demo=true")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_record_is_rejected_without_touching_the_store() {
    let state = AppState::demo();

    // Missing the required supplier name.
    let request = post_json(
        "/v1/records/suppliers?demo=true",
        json!({ "fields": { "country": "SI" } }),
    );
    let (status, body) = send(app(state.clone()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert!(body["error"]["details"]["name"].is_string());

    // The seeded supplier count is unchanged: nothing was inserted.
    let (status, body) = send(app(state), get("/v1/records/suppliers?demo=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(2));
}

#[tokio::test]
async fn date_order_violation_is_a_field_error() {
    let request = post_json(
        "/v1/records/incidents?demo=true",
        json!({ "fields": {
            "title": "Backdated",
            "occurred_at": "2026-08-20",
            "resolved_at": "2026-08-10"
        }}),
    );
    let (status, body) = send(app(AppState::demo()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["details"]["occurred_at"].is_string());
}

#[tokio::test]
async fn unknown_table_is_not_found_for_every_verb() {
    let state = AppState::demo();
    let (status, _) = send(app(state.clone()), get("/v1/records/nonsense?demo=true")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        app(state),
        post_json("/v1/records/nonsense?demo=true", json!({ "fields": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn record_search_filters_rows() {
    let (status, body) = send(
        app(AppState::demo()),
        get("/v1/records/suppliers?demo=true&q=nimbus"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(body["total"], json!(2));
    assert_eq!(records[0]["fields"]["name"], json!("Nimbus Hosting d.o.o."));
}

#[tokio::test]
async fn schema_endpoint_drives_the_form() {
    let (status, body) = send(
        app(AppState::demo()),
        get("/v1/records/suppliers/schema"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table"], json!("suppliers"));
    let fields = body["fields"].as_array().unwrap();
    assert!(fields.iter().any(|f| f["key"] == json!("name") && f["required"] == json!(true)));
}

#[tokio::test]
async fn dashboard_metrics_aggregate_the_seeded_rows() {
    let (status, body) = send(
        app(AppState::demo()),
        get("/v1/metrics/dashboard?demo=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supplier_total"], json!(2));
    // One of the two seeded suppliers is fully compliant.
    assert_eq!(body["supplier_compliance_rate"], json!(50));
    assert_eq!(body["documents"]["total"], json!(2));
    assert_eq!(body["documents"]["needs_update"], json!(1));
    // The one seeded incident is resolved.
    assert_eq!(body["open_incidents"], json!(0));
    assert_eq!(body["total_incidents"], json!(1));
}

#[tokio::test]
async fn soc_inventory_and_scan_journaling() {
    let state = AppState::demo();

    let (status, body) = send(app(state.clone()), get("/v1/soc/endpoints?demo=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let scan = Request::builder()
        .method("POST")
        .uri("/v1/soc/endpoints/ep-demo-01/scan?demo=true")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(state.clone()), scan).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body["scan_id"].is_string());

    let (status, body) = send(app(state), get("/v1/soc/scan-tasks?demo=true")).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["fields"]["endpoint_id"], json!("ep-demo-01"));
}

#[tokio::test]
async fn demo_soc_requests_never_reach_a_configured_vendor() {
    use custos_sentinel::{HttpSentinelClient, SentinelClient, SentinelConfig};

    // A live vendor is configured but unreachable; the demo flag must
    // substitute fixtures instead of proxying.
    let mut state = AppState::demo();
    let config = SentinelConfig::new("http://127.0.0.1:9", "key", "ws-1");
    state.sentinel = SentinelClient::Http(HttpSentinelClient::new(config).unwrap());

    let (status, body) = send(app(state.clone()), get("/v1/soc/endpoints?demo=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let scan = Request::builder()
        .method("POST")
        .uri("/v1/soc/endpoints/ep-demo-01/scan?demo=true")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(state), scan).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn report_download_sets_the_attachment_disposition() {
    let response = app(AppState::demo())
        .oneshot(get("/v1/reports/compliance?demo=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"compliance-report-"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Demo d.o.o."));
}

#[tokio::test]
async fn report_mailto_targets_the_authority() {
    let (status, body) = send(
        app(AppState::demo()),
        get("/v1/reports/compliance/mailto?demo=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["mailto"]
        .as_str()
        .unwrap()
        .starts_with("mailto:gp.ip@ip-rs.si?"));
}

#[tokio::test]
async fn attachment_upload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::demo();
    state.config.attachments_dir = dir.path().to_path_buf();
    state.attachments = custos_store::AttachmentStore::new(dir.path());

    let (_, body) = send(
        app(state.clone()),
        get("/v1/records/compliance_documents?demo=true"),
    )
    .await;
    let id = body["records"][0]["id"].as_str().unwrap().to_string();

    let upload = Request::builder()
        .method("POST")
        .uri(format!(
            "/v1/records/compliance_documents/{id}/attachments?demo=true"
        ))
        .body(Body::from(&b"policy body"[..]))
        .unwrap();
    let (status, body) = send(app(state.clone()), upload).await;
    assert_eq!(status, StatusCode::OK);
    let digest = body["digest"].as_str().unwrap().to_string();
    assert_eq!(digest.len(), 64);

    // Digest was written back to the record.
    let (_, body) = send(
        app(state.clone()),
        get(&format!("/v1/records/compliance_documents/{id}?demo=true")),
    )
    .await;
    assert_eq!(body["fields"]["file_digest"], json!(digest));

    let response = app(state)
        .oneshot(get(&format!("/v1/attachments/{digest}?demo=true")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"policy body");
}

#[tokio::test]
async fn organization_switch_returns_the_fresh_context() {
    let demo = DemoStore::empty();
    let user = UserId::new();
    let home = OrgId::new();
    let target = OrgId::new();
    demo.put_organization(Organization {
        id: home,
        name: "Home d.o.o.".into(),
        is_active: true,
        logo_url: None,
    });
    demo.put_organization(Organization {
        id: target,
        name: "Target d.o.o.".into(),
        is_active: true,
        logo_url: None,
    });
    demo.put_profile(UserProfile {
        id: user,
        organization_id: Some(home),
        role: "admin".into(),
        full_name: "Ana Novak".into(),
        email: "ana@example.org".into(),
    });
    demo.put_memberships(
        user,
        vec![
            Membership {
                user_id: user,
                organization_id: home,
                role: "admin".into(),
                is_primary: true,
            },
            Membership {
                user_id: user,
                organization_id: target,
                role: "member".into(),
                is_primary: false,
            },
        ],
    );
    let state = AppState::with_store(Store::Demo(demo));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/context/switch")
        .header("x-user-id", user.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "organization_id": target.to_string() }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(app(state.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization_id"], json!(target.to_string()));

    // The switch is durable: a later resolution lands on the target too.
    let (_, body) = send(
        app(state),
        get_as_user("/v1/context", &user.to_string()),
    )
    .await;
    assert_eq!(body["organization_id"], json!(target.to_string()));
}
