use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, AppState};
use service::record::{store::mock::MemoryRecordStore, RecordService};

struct TestApp {
    base_url: String,
}

/// Serve the real router over an ephemeral port, backed by the in-memory
/// store so no external Redis is needed.
async fn start_server() -> anyhow::Result<TestApp> {
    let store = Arc::new(MemoryRecordStore::default());
    let state = AppState {
        records: Arc::new(RecordService::new(store)),
    };
    let app: Router = routes::build_router(state, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn ann() -> serde_json::Value {
    json!({ "name": "Ann", "email": "a@x.com", "about": "hi", "secret": "p1" })
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_record_crud_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // create
    let res = c
        .post(format!("{}/records", app.base_url))
        .json(&ann())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    let id = created["id"].as_str().expect("id present").to_string();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "Ann");
    assert_eq!(created["email"], "a@x.com");
    assert_eq!(created["about"], "hi");
    assert_eq!(created["secret"], "p1");

    // read back
    let res = c.get(format!("{}/records/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched = res.json::<serde_json::Value>().await?;
    assert_eq!(fetched, created);

    // update replaces every field
    let res = c
        .put(format!("{}/records/{}", app.base_url, id))
        .json(&json!({ "name": "Ann2", "email": "a@x.com", "about": "hi", "secret": "p1" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Ann2");

    // list contains exactly this record
    let res = c.get(format!("{}/records", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let all = res.json::<serde_json::Value>().await?;
    let map = all.as_object().expect("map body");
    assert_eq!(map.len(), 1);
    assert_eq!(map[&id]["name"], "Ann2");

    // delete, then the record is gone
    let res = c.delete(format!("{}/records/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let confirmation = res.json::<serde_json::Value>().await?;
    assert_eq!(confirmation["deleted"], id.as_str());

    let res = c.get(format!("{}/records/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_create_ignores_client_supplied_id() -> anyhow::Result<()> {
    let app = start_server().await?;

    let mut body = ann();
    body["id"] = json!("client-pick");
    let res = client()
        .post(format!("{}/records", app.base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_ne!(created["id"], "client-pick");
    Ok(())
}

#[tokio::test]
async fn e2e_get_missing_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .get(format!("{}/records/never-created", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn e2e_update_missing_is_404_and_creates_nothing() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .put(format!("{}/records/ghost", app.base_url))
        .json(&ann())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.get(format!("{}/records", app.base_url)).send().await?;
    let all = res.json::<serde_json::Value>().await?;
    assert!(all.as_object().expect("map body").is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_delete_is_idempotent() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .delete(format!("{}/records/never-created", app.base_url))
        .send()
        .await?;
    // absent ids delete silently, same as existing ones
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}
