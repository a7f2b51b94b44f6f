use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::RedisConfig;
use service::record::{repo::redis::RedisRecordStore, RecordService};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Store settings come from the same config file; REDIS_HOST/REDIS_PORT
/// override it, and suffice on their own when no file is present.
fn load_redis_config() -> RedisConfig {
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.redis.normalize_from_env();
            cfg.redis
        }
        Err(_) => RedisConfig::from_env(),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let redis_cfg = load_redis_config();
    redis_cfg.validate()?;
    let store = RedisRecordStore::connect(&redis_cfg).await?;

    let state = AppState {
        records: Arc::new(RecordService::new(Arc::new(store))),
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr()?;
    info!(%addr, "starting record api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
