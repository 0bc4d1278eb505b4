//! The URL route table
//!
//! An ordered, immutable list of route entries built once at startup. The
//! table is the single source of truth for top-level dispatch: the HTTP
//! router is constructed from it entry by entry, and named entries support
//! reverse lookup.

use std::path::PathBuf;

use crate::config::ServerConfig;

/// What a route entry dispatches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Landing page template
    Landing,
    /// Chat shell page template
    ChatPage,
    /// Admin sub-application
    Admin,
    /// API sub-application (its own route table)
    Api,
    /// Static file service rooted at `dir`
    Static { dir: PathBuf },
}

/// How a pattern matches request paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The path must equal the pattern
    Exact,
    /// Any path under the pattern matches
    Prefix,
}

/// One route-to-handler association
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub name: Option<&'static str>,
    pub pattern: String,
    pub kind: MatchKind,
    pub target: RouteTarget,
}

impl RouteEntry {
    fn matches(&self, path: &str) -> bool {
        match self.kind {
            MatchKind::Exact => path == self.pattern,
            MatchKind::Prefix => {
                path.starts_with(self.pattern.as_str())
                    || format!("{}/", path) == self.pattern
            }
        }
    }
}

/// The ordered route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build the table from server configuration.
    ///
    /// Always yields the four base entries, in order: landing page, chat
    /// page, admin sub-application, API sub-application. Static entries are
    /// appended only when the debug flag is set.
    pub fn new(config: &ServerConfig) -> Self {
        let mut entries = vec![
            RouteEntry {
                name: Some("landing"),
                pattern: "/".to_string(),
                kind: MatchKind::Exact,
                target: RouteTarget::Landing,
            },
            RouteEntry {
                name: Some("chat"),
                pattern: "/chat/".to_string(),
                kind: MatchKind::Exact,
                target: RouteTarget::ChatPage,
            },
            RouteEntry {
                name: None,
                pattern: "/admin/".to_string(),
                kind: MatchKind::Prefix,
                target: RouteTarget::Admin,
            },
            RouteEntry {
                name: None,
                pattern: "/api/".to_string(),
                kind: MatchKind::Prefix,
                target: RouteTarget::Api,
            },
        ];

        if config.debug {
            entries.extend(static_routes(&config.static_url, config.static_root()));
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a request path, first match wins.
    ///
    /// Unmatched paths return `None`; the server answers those with 404.
    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.matches(path))
    }

    /// Look up the pattern registered under a route name
    pub fn reverse(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == Some(name))
            .map(|entry| entry.pattern.as_str())
    }
}

/// Static-file route entries for a static-URL/document-root pair.
///
/// One prefix entry per pair; an empty prefix yields none. Callers gate this
/// on the debug flag.
pub fn static_routes(static_url: &str, doc_root: PathBuf) -> Vec<RouteEntry> {
    if static_url.is_empty() {
        return Vec::new();
    }
    vec![RouteEntry {
        name: None,
        pattern: format!("{}/", static_url),
        kind: MatchKind::Prefix,
        target: RouteTarget::Static { dir: doc_root },
    }]
}
