mod config;
mod error;
mod query;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::routing::get;
use axum::serve;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

use crate::config::ApiConfig;
use crate::query::query_handler;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = ApiConfig::from_env()?;
    let loader_config = config.clone();
    let router = tokio::task::spawn_blocking(move || loader_config.load_router()).await??;

    info!(
        "Serving {} routes over {} nodes",
        router.mode(),
        router.graph().node_count()
    );

    let state = Arc::new(AppState { router });

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Cannot bind {}", config.bind))?;
    info!("Listening on {}", config.bind);

    serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> axum::Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any)
        .allow_headers(Any);

    axum::Router::new()
        .route("/", get(|| async { "waypost" }))
        .route("/query", get(query_handler))
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use waypost_routing::osm::map_data::MapData;
    use waypost_routing::router::Router;
    use waypost_routing::transport_mode::TransportMode;

    use super::*;

    const STREET: &str = r#"[
        {"type": "node", "data": {"id": 1, "lat": 0.0, "lon": 0.0}},
        {"type": "node", "data": {"id": 2, "lat": 0.0, "lon": 0.001}},
        {"type": "node", "data": {"id": 3, "lat": 0.0, "lon": 0.002}},
        {"type": "way", "data": {"id": 10, "nd": [1, 2, 3], "tag": {"highway": "residential", "oneway": "yes"}}}
    ]"#;

    fn test_app() -> axum::Router {
        let data = MapData::from_json_str(STREET).unwrap();
        let router = Router::from_map_data(&data, TransportMode::Car);
        app(Arc::new(AppState { router }))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn index_answers() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"waypost");
    }

    #[tokio::test]
    async fn query_returns_coordinates() {
        let (status, body) =
            get_json("/query?curr_lat=0.0&curr_lng=0.0&dest_lat=0.0&dest_lng=0.002").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "coords": [[0.0, 0.0], [0.0, 0.001], [0.0, 0.002]],
                "status": "success"
            })
        );
    }

    #[tokio::test]
    async fn failed_search_returns_an_empty_result_with_a_reason() {
        // the street is oneway, so its end has no way out by car
        let (status, body) =
            get_json("/query?curr_lat=0.0&curr_lng=0.002&dest_lat=0.0&dest_lng=0.0").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coords"], json!([]));
        assert_eq!(body["status"], "no_such_node");
        assert!(body["reason"].is_string());
    }

    #[tokio::test]
    async fn missing_parameters_default_to_zero() {
        let (status, body) = get_json("/query").await;

        // both ends snap to node 1, which has a way out
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["coords"], json!([[0.0, 0.0]]));
    }

    #[tokio::test]
    async fn invalid_parameters_are_rejected() {
        let (status, _) = get_json("/query?curr_lat=north").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/query?alpha=NaN").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
