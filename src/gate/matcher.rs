//! Route matching and gate decisions

use serde::Serialize;

/// Path prefixes (after the leading `/`) that never reach the gate
pub const EXCLUDED_PREFIXES: &[&str] = &["api", "_next/static", "_next/image", "favicon.ico"];

/// Pages reachable without a session, matched exactly
pub const PUBLIC_PATHS: &[&str] = &["/login"];

/// Path prefixes reachable without a session
pub const PUBLIC_PREFIXES: &[&str] = &["/auth"];

/// Decides which request paths the gate looks at.
///
/// Exclusion is a plain prefix test on the path without its leading slash,
/// so `/apiary` is excluded as well as `/api/emails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatcher {
    excluded: Vec<String>,
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new(EXCLUDED_PREFIXES.iter().copied())
    }
}

impl RouteMatcher {
    /// Matcher excluding the given prefixes
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the gate should run for this path
    pub fn matches(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        !self.excluded.iter().any(|prefix| rest.starts_with(prefix.as_str()))
    }
}

/// Outcome of running the gate on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Path is outside the gate (assets, API routes)
    Skipped,
    /// Login or auth-flow page, always allowed
    Public,
    /// Any other page, forwarded without enforcement
    Passthrough,
}

/// Navigation gate placed in front of the UI.
///
/// This only classifies. Access control for pages happens client-side, so
/// a missing token never changes the outcome.
#[derive(Debug, Clone)]
pub struct RouteGate {
    matcher: RouteMatcher,
    public_paths: Vec<String>,
    public_prefixes: Vec<String>,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self {
            matcher: RouteMatcher::default(),
            public_paths: PUBLIC_PATHS.iter().map(|p| (*p).to_string()).collect(),
            public_prefixes: PUBLIC_PREFIXES.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

impl RouteGate {
    /// Gate with the default matcher and allow-list
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the path is on the allow-list
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
            || self
                .public_prefixes
                .iter()
                .any(|p| path.starts_with(p.as_str()))
    }

    /// Classify a navigation to `path`. The token is observed only.
    pub fn evaluate(&self, path: &str, _token: Option<&str>) -> GateDecision {
        if !self.matcher.matches(path) {
            GateDecision::Skipped
        } else if self.is_public(path) {
            GateDecision::Public
        } else {
            GateDecision::Passthrough
        }
    }
}
