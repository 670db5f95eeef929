use crate::web::handlers;
use crate::web::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router(app: AppState) -> Router {
    let files = ServeDir::new(&app.root);

    Router::new()
        .route("/", get(handlers::index))
        .route("/material", get(handlers::materials))
        .route("/print", post(handlers::add_print))
        .route(
            "/print/:name",
            get(handlers::print)
                .put(handlers::update_print)
                .delete(handlers::delete_print),
        )
        .route("/print/:name/history", post(handlers::append_history))
        .route(
            "/print/:name/history/:number",
            delete(handlers::delete_history),
        )
        .route("/print/:name/source_link", post(handlers::append_source_link))
        .route(
            "/print/:name/source_link/:number",
            delete(handlers::delete_source_link),
        )
        .nest_service("/files", files)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
