//! Route gate module
//!
//! Classifies UI navigations before they are served. API routes and static
//! assets are skipped, login and auth-flow pages are public, and everything
//! else passes through. No decision blocks or redirects. The gate is a
//! placeholder for checks that currently live in the browser.

mod matcher;
mod middleware;

pub use matcher::{
    GateDecision, RouteGate, RouteMatcher, EXCLUDED_PREFIXES, PUBLIC_PATHS, PUBLIC_PREFIXES,
};
pub use middleware::{bearer_token, extract_token, route_gate};
