//! JSON-RPC over HTTP.
//!
//! Requests are POSTed to `/` and answered with the framed JSON-RPC
//! response. Notifications get `204 No Content`.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use super::server::ApiServer;
use crate::api_client::types::StatHr;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "viner API",
        description = "JSON-RPC telemetry and control for a mining farm. \
            Methods: viner_getstat1, viner_getstathr, viner_restart, viner_reboot."
    ),
    components(schemas(StatHr)),
    tags(
        (name = "health", description = "Health check"),
        (name = "rpc", description = "JSON-RPC endpoint"),
    )
)]
struct ApiDoc;

/// Build the HTTP router for `server`.
pub fn router(server: Arc<ApiServer>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health))
        .routes(routes!(json_rpc))
        .with_state(server)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = OK, description = "Server is running", body = String),
    ),
)]
async fn health() -> &'static str {
    "OK"
}

/// Handle a JSON-RPC request or batch.
#[utoipa::path(
    post,
    path = "/",
    tag = "rpc",
    request_body(
        content = String,
        content_type = "application/json",
        description = "JSON-RPC 1.0 or 2.0 request, or a 2.0 batch"
    ),
    responses(
        (status = OK, description = "JSON-RPC response", body = String, content_type = "application/json"),
        (status = NO_CONTENT, description = "Request was a notification"),
    ),
)]
async fn json_rpc(State(server): State<Arc<ApiServer>>, body: String) -> Response {
    match server.handle(&body) {
        Some(response) => ([(header::CONTENT_TYPE, "application/json")], response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::{Farm, FarmError, ProgressDetail, SolutionStats, WorkingProgress};
    use crate::rpc::ProtocolVersion;
    use axum::body::Body;
    use http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::time::Instant;
    use tower::ServiceExt;

    struct FixedFarm(Instant);

    impl Farm for FixedFarm {
        fn solution_stats(&self) -> Result<SolutionStats, FarmError> {
            Ok(SolutionStats {
                accepts: 5,
                rejects: 1,
                failures: 0,
            })
        }

        fn progress(&self, _detail: ProgressDetail) -> Result<WorkingProgress, FarmError> {
            Ok(WorkingProgress {
                rate: 2_000,
                device_rates: vec![2_000],
                monitors: vec![],
            })
        }

        fn launch_time(&self) -> Instant {
            self.0
        }

        fn pool_addresses(&self) -> Result<String, FarmError> {
            Ok("pool.example:4444".into())
        }

        fn restart(&self) -> Result<(), FarmError> {
            Ok(())
        }
    }

    fn app() -> Router {
        let server =
            ApiServer::new(ProtocolVersion::V2, Arc::new(FixedFarm(Instant::now())), true).unwrap();
        router(Arc::new(server))
    }

    async fn post(app: Router, body: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_post_stat1() {
        let (status, body) = post(
            app(),
            r#"{"jsonrpc":"2.0","method":"viner_getstat1","params":{},"id":1}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["result"][2], json!("2;5;1"));
        assert_eq!(response["result"][7], json!("pool.example:4444"));
    }

    #[tokio::test]
    async fn test_notification_no_content() {
        let (status, body) =
            post(app(), r#"{"jsonrpc":"2.0","method":"viner_getstathr"}"#).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_readonly_restart_not_found() {
        let (status, body) =
            post(app(), r#"{"jsonrpc":"2.0","method":"viner_restart","id":9}"#).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["error"]["code"], json!(-32601));
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
