//! Dashboard asset routes

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Directory under the asset root served at `/flotr`
pub const FLOTR_DIR: &str = "flotr";

/// Page served at `/`
pub const INDEX_FILE: &str = "index.html";

/// Routes serving `/` as the index page and `/flotr/*` from the asset root
///
/// Nothing else under the asset root is reachable.
pub fn static_routes<S>(root: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route_service("/", ServeFile::new(root.join(INDEX_FILE)))
        .nest_service(
            &format!("/{}", FLOTR_DIR),
            ServeDir::new(root.join(FLOTR_DIR)),
        )
}
