//! The SE4 request handler.
//!
//! Every request lands in [`dispatch`], which resolves a [`Route`] and
//! executes it. Headers are attached in one place, [`respond`], so every
//! response (errors included) carries the same cross-origin headers.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use se4_health::ReportMode;
use tracing::debug;

use crate::ServiceContext;
use crate::encode::{encode_json, encode_report, encode_token};
use crate::error::{ApiError, mime};
use crate::route::Route;

/// Fallback handler for every SE4 request.
pub async fn dispatch(State(ctx): State<ServiceContext>, method: Method, uri: Uri) -> Response {
    let path = uri.path();

    let response = match Route::resolve(&method, path) {
        Ok(route) => execute(&ctx, route).await.unwrap_or_else(IntoResponse::into_response),
        Err(e) => e.into_response(),
    };

    debug!(%method, %path, status = %response.status(), "se4 request");
    response
}

async fn execute(ctx: &ServiceContext, route: Route) -> Result<Response, ApiError> {
    match route {
        Route::Config => {
            let body = encode_json(ctx.build())?;
            Ok(respond(StatusCode::OK, mime::JSON, Body::from(body)))
        }
        Route::Status => {
            let body = encode_json(&ctx.status())?;
            Ok(respond(StatusCode::OK, mime::JSON, Body::from(body)))
        }
        Route::Healthcheck => {
            let report = ctx.report(ReportMode::All).await;
            let body = encode_report(&report)?;
            Ok(respond(health_status(report.failed()), mime::JSON, Body::from(body)))
        }
        Route::Token(mode) => {
            let failed = ctx.report(mode).await.failed();
            Ok(respond(
                health_status(failed),
                mime::TEXT,
                Body::from(encode_token(failed)),
            ))
        }
    }
}

fn health_status(failed: bool) -> StatusCode {
    if failed {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// Assemble a response with the content type and cross-origin headers.
pub(crate) fn respond(status: StatusCode, content_type: &'static str, body: Body) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, content_type),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "GET"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
        body,
    )
        .into_response()
}
