//! HTTP surface for gproxy: the downstream-facing proxy routes and the
//! operator-facing admin API, both built on axum.

pub mod admin;
pub mod proxy;

pub use admin::{AdminState, admin_router};
pub use proxy::{ProxyState, proxy_router};
