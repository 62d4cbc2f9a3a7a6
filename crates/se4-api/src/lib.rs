//! se4-api — HTTP surface for SE4 service health.
//!
//! Serves build metadata, live status, and healthcheck views to load
//! balancers and autoscaling controllers.
//!
//! # Routes
//!
//! | Method | Path | Body | Status |
//! |---|---|---|---|
//! | GET | `/service/config` | build info (JSON) | 200 |
//! | GET | `/service/status` | build info + system snapshot (JSON) | 200 |
//! | GET | `/service/healthcheck` | full report (JSON) | 200 / 500 if failed |
//! | GET | `/service/healthcheck/gtg` | `"OK"` / `"Bad"` (text) | 200 / 500 |
//! | GET | `/service/healthcheck/asg` | `"OK"` / `"Bad"` (text) | 200 / 500 |
//!
//! Any other path answers 404 and any other verb 405, both with a JSON
//! `{"status","message"}` body.

pub mod context;
pub mod encode;
pub mod error;
pub mod handlers;
pub mod route;

use axum::Router;
use axum::routing::any;

pub use context::ServiceContext;
pub use error::ApiError;
pub use route::Route;

/// Router answering every path through the SE4 dispatcher.
pub fn router(ctx: ServiceContext) -> Router {
    Router::new().fallback(handlers::dispatch).with_state(ctx)
}

/// Put SE4 in front of an application: `/service/` and everything below it
/// is answered by the dispatcher, everything else by `app`.
pub fn mount(app: Router, ctx: ServiceContext) -> Router {
    let se4 = any(handlers::dispatch).with_state(ctx);
    // The catch-all does not match an empty remainder.
    app.route("/service/", se4.clone())
        .route("/service/{*rest}", se4)
}
