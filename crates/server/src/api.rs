//! HTTP surface and server bootstrap.

use crate::AppResources;
use crate::authorize::{self, AuthorizeState};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

const MISC_TAG: &str = "Misc";

#[utoipa::path(
    method(get, head),
    path = "/healthz",
    tag = MISC_TAG,
    operation_id = "Health Check",
    responses(
        (status = OK, description = "Ok", body = str, content_type = "text/plain", example = "ok")
    )
)]
async fn health() -> &'static str {
    "ok"
}

pub async fn start_webserver(resources: AppResources) -> color_eyre::Result<()> {
    let authorize_state = AuthorizeState::new(resources.db.clone(), resources.config.clone());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health))
        .split_for_parts();

    // The authorize routes render HTML and redirects; they stay outside the
    // OpenAPI document.
    let router = router
        .merge(authorize::router(authorize_state))
        .merge(Redoc::with_url("/api-docs", api))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    info!("Server running on http://0.0.0.0:8080");
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Authgate API",
        version = "1.0.0",
        description = "Authorization endpoint of a multi-tenant OAuth2/OIDC identity provider."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints")
    )
)]
struct ApiDoc;
