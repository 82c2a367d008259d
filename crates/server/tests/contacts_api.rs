use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use models::Contact;
use serde_json::{json, Value};
use service::enrich::{ContactEnricher, EnrichError, NoopEnricher};
use service::serializer::SerializedStorage;
use service::storage::{file::FileStorage, memory::MemoryStorage};
use tower::ServiceExt;

use server::routes;
use server::state::ServerState;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

/// Pretends every name belongs to a woman from Norway.
struct FixedEnricher;

#[async_trait::async_trait]
impl ContactEnricher for FixedEnricher {
    async fn fill_missing(&self, contact: &mut Contact) -> Result<(), EnrichError> {
        if contact.gender.is_empty() {
            contact.gender = "female".into();
        }
        if contact.country.is_empty() {
            contact.country = "NO".into();
        }
        Ok(())
    }
}

fn memory_app() -> Router {
    let state = ServerState::new(SerializedStorage::new(MemoryStorage::new()), Arc::new(NoopEnricher));
    routes::build_router(state, cors())
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method("GET").uri(uri).body(Body::empty())?)
}

fn post(uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?)
}

async fn add_alice(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        post("/api/add", json!({"name": "Alice", "phone": "+71234567890", "gender": "female", "country": "US"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"][0]["id"].as_str().expect("id").to_string())
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let (status, body) = send(&memory_app(), get("/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn add_assigns_id_and_lists() -> anyhow::Result<()> {
    let app = memory_app();
    let id = add_alice(&app).await?;
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let (status, body) = send(&app, get("/api/list")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Full list of contacts");
    assert_eq!(
        body["data"],
        json!([{"id": id, "name": "Alice", "phone": "+71234567890", "gender": "female", "country": "US", "favorite": false}])
    );
    Ok(())
}

#[tokio::test]
async fn add_rejects_invalid_phone() -> anyhow::Result<()> {
    let app = memory_app();
    let (status, body) = send(&app, post("/api/add", json!({"name": "Alice", "phone": "12345"}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap_or_default().contains("+7"));
    Ok(())
}

#[tokio::test]
async fn add_fills_missing_fields_from_enricher() -> anyhow::Result<()> {
    let state = ServerState::new(SerializedStorage::new(MemoryStorage::new()), Arc::new(FixedEnricher));
    let app = routes::build_router(state, cors());
    let (status, body) = send(&app, post("/api/add", json!({"name": "Ingrid", "phone": "+70000000001"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["gender"], "female");
    assert_eq!(body["data"][0]["country"], "NO");
    Ok(())
}

#[tokio::test]
async fn favorites_flow() -> anyhow::Result<()> {
    let app = memory_app();
    let id = add_alice(&app).await?;

    let (_, body) = send(&app, get("/api/list-favs")?).await?;
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, get(&format!("/api/change-fav?id={id}&action=add"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], format!("Contact \"{id}\" added to favorites"));

    let (status, _) = send(&app, get(&format!("/api/change-fav?id={id}&action=add"))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, get("/api/list-favs")?).await?;
    assert_eq!(body["data"][0]["id"], id);
    assert_eq!(body["data"][0]["favorite"], true);

    let (status, _) = send(&app, get(&format!("/api/change-fav?id={id}&action=maybe"))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn change_fav_requires_both_params() -> anyhow::Result<()> {
    let (status, body) = send(&memory_app(), get("/api/change-fav?id=1")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap_or_default().contains("action="));
    Ok(())
}

#[tokio::test]
async fn edit_and_delete() -> anyhow::Result<()> {
    let app = memory_app();
    let id = add_alice(&app).await?;

    let (status, body) = send(&app, post("/api/edit", json!({"id": id, "country": "CA"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["country"], "CA");
    assert_eq!(body["data"][0]["name"], "Alice");

    let (status, _) = send(&app, get(&format!("/api/delete?id={id}"))?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get(&format!("/api/delete?id={id}"))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap_or_default().contains("not found"));

    let (status, _) = send(&app, post("/api/edit", json!({"id": "missing", "name": "Nobody"}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn filter_endpoint() -> anyhow::Result<()> {
    let app = memory_app();
    add_alice(&app).await?;

    let (status, body) = send(&app, post("/api/filter", json!({"field": "name", "value": "lic"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));

    let (status, _) = send(&app, post("/api/filter", json!({"field": "country", "value": "US"}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_get_error_envelope() -> anyhow::Result<()> {
    let app = memory_app();
    for uri in ["/api/add", "/api/edit", "/api/filter"] {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from("{not json"))?;
        let (status, body) = send(&app, req).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()), "{uri}: {body}");
    }

    let req = Request::builder().method("POST").uri("/api/add").body(Body::from("{}"))?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"]["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn file_backend_persists_across_routers() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("contacts.json");
    let build = || {
        let state = ServerState::new(SerializedStorage::new(FileStorage::new(&path)), Arc::new(NoopEnricher));
        routes::build_router(state, cors())
    };

    let id = add_alice(&build()).await?;
    let (_, body) = send(&build(), get("/api/list")?).await?;
    assert_eq!(body["data"][0]["id"], id);
    Ok(())
}
