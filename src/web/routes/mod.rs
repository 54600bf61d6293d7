use crate::web::{AppState, doc::ApiDoc};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod levels;
pub mod runs;

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState, docs: bool) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/v1/levels", levels::routes(state.clone()))
        .nest("/api/v1/runs", runs::routes(state.clone()))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if docs {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}
