//! Template pages
//!
//! The landing and chat shell pages are static templates embedded in the
//! binary and served as-is.

use axum::response::Html;

const LANDING_TEMPLATE: &str = include_str!("../../templates/landing.html");
const CHAT_TEMPLATE: &str = include_str!("../../templates/chat.html");

/// GET / - landing page
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_TEMPLATE)
}

/// GET /chat/ - chat shell page
pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_not_empty() {
        assert!(LANDING_TEMPLATE.contains("<html"));
        assert!(CHAT_TEMPLATE.contains("<html"));
    }

    #[test]
    fn test_landing_links_to_chat() {
        assert!(LANDING_TEMPLATE.contains("/chat/"));
    }

    #[test]
    fn test_chat_shell_connects_to_the_socket() {
        assert!(CHAT_TEMPLATE.contains("/ws/chat/"));
    }
}
