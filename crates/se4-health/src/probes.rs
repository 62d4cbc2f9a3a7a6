//! Built-in network probes.
//!
//! Ready-made async probes for the common cases of "is my dependency
//! reachable". They carry no timeout of their own; the [`Runner`] bounds
//! every invocation.
//!
//! [`Runner`]: crate::Runner

use bytes::Bytes;
use http::header::{HOST, USER_AGENT};
use http::{Request, StatusCode};
use http_body_util::Empty;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::debug;

use crate::definition::Probe;

const USER_AGENT_VALUE: &str = concat!("se4-health/", env!("CARGO_PKG_VERSION"));

/// Probe that passes when a TCP connection to `address` succeeds.
pub fn tcp(address: impl Into<String>) -> Probe {
    let address = address.into();
    Probe::from_async(move || tcp_probe(address.clone()))
}

/// Probe that passes when `GET http://{address}{path}` answers 2xx.
pub fn http(address: impl Into<String>, path: impl Into<String>) -> Probe {
    let address = address.into();
    let path = path.into();
    Probe::from_async(move || http_probe(address.clone(), path.clone()))
}

/// Attempt a TCP connection.
pub async fn tcp_probe(address: String) -> bool {
    match TcpStream::connect(&address).await {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, %address, "tcp probe connection failed");
            false
        }
    }
}

/// Perform an HTTP/1 GET and report whether the response is 2xx.
pub async fn http_probe(address: String, path: String) -> bool {
    match get_status(&address, &path).await {
        Ok(status) if status.is_success() => true,
        Ok(status) => {
            debug!(%status, %address, %path, "dependency answered non-2xx");
            false
        }
        Err(e) => {
            debug!(error = %e, %address, %path, "dependency unreachable");
            false
        }
    }
}

/// Ways a dependency GET can fail before a status line arrives.
#[derive(Debug, Error)]
enum DependencyError {
    #[error("connect: {0}")]
    Connect(#[from] std::io::Error),

    #[error("handshake: {0}")]
    Handshake(#[source] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("send: {0}")]
    Send(#[source] hyper::Error),
}

/// One GET over a fresh HTTP/1 connection; only the status is kept.
async fn get_status(address: &str, path: &str) -> Result<StatusCode, DependencyError> {
    let req = dependency_request(address, path)?;

    let stream = TcpStream::connect(address).await?;
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .map_err(DependencyError::Handshake)?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "dependency connection closed with error");
        }
    });

    let resp = sender.send_request(req).await.map_err(DependencyError::Send)?;
    Ok(resp.status())
}

fn dependency_request(address: &str, path: &str) -> Result<Request<Empty<Bytes>>, DependencyError> {
    let req = Request::get(format!("http://{address}{path}"))
        .header(HOST, address)
        .header(USER_AGENT, USER_AGENT_VALUE)
        .body(Empty::new())?;
    Ok(req)
}
