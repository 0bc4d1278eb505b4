//! Route handlers

pub mod admin;
pub mod api;
pub mod health;
pub mod pages;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::table::{RouteTable, RouteTarget};

/// Build the HTTP router from the route table, entry by entry in table order
pub fn build_router(table: &RouteTable) -> Router<AppState> {
    let mut app = Router::new();
    for entry in table.entries() {
        app = match &entry.target {
            RouteTarget::Landing => app.route(&entry.pattern, get(pages::landing)),
            RouteTarget::ChatPage => app.route(&entry.pattern, get(pages::chat_page)),
            RouteTarget::Admin => app.nest(nest_path(&entry.pattern), admin::router()),
            RouteTarget::Api => app.nest(nest_path(&entry.pattern), api::router()),
            RouteTarget::Static { dir } => {
                app.nest_service(nest_path(&entry.pattern), ServeDir::new(dir))
            }
        };
    }
    app
}

/// Nested routers take the prefix without its trailing slash
fn nest_path(pattern: &str) -> &str {
    pattern.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nest_path_strips_trailing_slash() {
        assert_eq!(nest_path("/admin/"), "/admin");
        assert_eq!(nest_path("/api/"), "/api");
        assert_eq!(nest_path("/static/"), "/static");
    }
}
