//! End-to-end route tests.
//!
//! Drives the SE4 router in-process and checks status codes, bodies, and
//! headers for every route.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::get;
use http_body_util::BodyExt;
use tower::ServiceExt;

use se4_api::{ServiceContext, mount, router};
use se4_health::{Probe, Runner, TestDefinition};
use se4_status::{BuildInfo, StaticSystem, SystemSnapshot};

const EMPTY_CONFIG: &str = r#"{"artifact_id":"","build_number":"","build_machine":"","built_by":"","built_when":"0001-01-01T00:00:00Z","compiler_version":"","git_sha1":"","runbook_uri":"","version":""}"#;

fn empty_context() -> ServiceContext {
    ServiceContext::new(BuildInfo::default())
}

fn failing(name: &str) -> TestDefinition {
    TestDefinition::new(name, Probe::blocking(|| false))
}

fn passing(name: &str) -> TestDefinition {
    TestDefinition::new(name, Probe::blocking(|| true))
}

async fn send(router: Router, method: Method, path: &str) -> (StatusCode, HeaderMap, String) {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn content_type(headers: &HeaderMap) -> &str {
    headers["content-type"].to_str().unwrap()
}

#[tokio::test]
async fn config_on_empty_build_info() {
    let (status, headers, body) = send(router(empty_context()), Method::GET, "/service/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "application/json");
    assert_eq!(body, EMPTY_CONFIG);
}

#[tokio::test]
async fn status_merges_build_and_system() {
    let ctx = ServiceContext::new(BuildInfo {
        artifact_id: "orders".to_string(),
        ..Default::default()
    })
    .with_system(StaticSystem(SystemSnapshot {
        machine_name: "box-1".to_string(),
        os_arch: "x86_64".to_string(),
        ..Default::default()
    }));

    let (status, headers, body) = send(router(ctx), Method::GET, "/service/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "application/json");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["artifact_id"], "orders");
    assert_eq!(json["machine_name"], "box-1");
    assert_eq!(json["os_arch"], "x86_64");
}

#[tokio::test]
async fn status_on_real_host() {
    let (status, _, body) = send(router(empty_context()), Method::GET, "/service/status").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["os_arch"], std::env::consts::ARCH);
    assert!(json["up_since"].is_string());
}

#[tokio::test]
async fn healthcheck_on_empty_registry() {
    let (status, headers, body) = send(router(empty_context()), Method::GET, "/service/healthcheck").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "application/json");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["tests"], serde_json::json!([]));
}

#[tokio::test]
async fn healthcheck_failure_still_returns_report() {
    let ctx = empty_context()
        .with_test(failing("db").asg(true).gtg(true))
        .with_test(passing("cache"));

    let (status, headers, body) = send(router(ctx), Method::GET, "/service/healthcheck").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&headers), "application/json");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let tests = json["tests"].as_array().unwrap();
    assert_eq!(tests.len(), 2);
    assert_eq!(tests[0]["test_name"], "db");
    assert_eq!(tests[0]["test_result"], "failed");
    assert_eq!(tests[1]["test_result"], "passed");
}

#[tokio::test]
async fn healthcheck_ignores_silent_failures() {
    let ctx = empty_context().with_test(failing("diagnostic").silent(true));

    let (status, _, body) = send(router(ctx), Method::GET, "/service/healthcheck").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""test_result":"failed""#));
}

#[tokio::test]
async fn asg_on_empty_registry() {
    let (status, headers, body) = send(router(empty_context()), Method::GET, "/service/healthcheck/asg").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "text/plain");
    assert_eq!(body, r#""OK""#);
}

#[tokio::test]
async fn gtg_on_empty_registry() {
    let (status, headers, body) = send(router(empty_context()), Method::GET, "/service/healthcheck/gtg").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "text/plain");
    assert_eq!(body, r#""OK""#);
}

#[tokio::test]
async fn asg_with_failing_test() {
    let ctx = empty_context().with_test(failing("broken").asg(true));

    let (status, headers, body) = send(router(ctx), Method::GET, "/service/healthcheck/asg").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&headers), "text/plain");
    assert_eq!(body, r#""Bad""#);
}

#[tokio::test]
async fn gtg_with_failing_test() {
    let ctx = empty_context().with_test(failing("warming-up").gtg(true));

    let (status, _, body) = send(router(ctx.clone()), Method::GET, "/service/healthcheck/gtg").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#""Bad""#);

    // Not in the ASG view, so the instance is not considered broken.
    let (status, _, body) = send(router(ctx), Method::GET, "/service/healthcheck/asg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#""OK""#);
}

#[tokio::test]
async fn hanging_probe_fails_after_timeout() {
    let ctx = empty_context()
        .with_runner(Runner::new().with_timeout(Duration::from_millis(100)))
        .with_test(
            TestDefinition::new(
                "hang",
                Probe::from_async(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    true
                }),
            )
            .asg(true),
        );

    let started = std::time::Instant::now();
    let (status, _, body) = send(router(ctx), Method::GET, "/service/healthcheck/asg").await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#""Bad""#);
}

#[tokio::test]
async fn post_is_not_allowed() {
    let (status, headers, body) = send(router(empty_context()), Method::POST, "/service/config").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(content_type(&headers), "application/json");
    assert_eq!(body, r#"{"status":405,"message":"Method \"POST\" not allowed"}"#);
}

#[tokio::test]
async fn non_get_on_unknown_path_is_405() {
    let (status, _, body) = send(router(empty_context()), Method::DELETE, "/service/nope").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, r#"{"status":405,"message":"Method \"DELETE\" not allowed"}"#);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, headers, body) = send(router(empty_context()), Method::GET, "/service/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type(&headers), "application/json");
    assert_eq!(body, r#"{"status":404,"message":"No such route \"/service/nope\""}"#);
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let cases = [
        (Method::GET, "/service/config"),
        (Method::GET, "/service/healthcheck/gtg"),
        (Method::GET, "/service/nope"),
        (Method::PUT, "/service/config"),
    ];

    for (method, path) in cases {
        let (_, headers, _) = send(router(empty_context()), method, path).await;
        assert_eq!(headers["access-control-allow-origin"], "*", "{path}");
        assert_eq!(headers["access-control-allow-methods"], "GET", "{path}");
        assert!(headers.contains_key("access-control-allow-headers"), "{path}");
    }
}

#[tokio::test]
async fn tests_registered_after_start_are_picked_up() {
    let ctx = empty_context();
    let app = router(ctx.clone());

    let (status, _, _) = send(app.clone(), Method::GET, "/service/healthcheck/asg").await;
    assert_eq!(status, StatusCode::OK);

    ctx.register(failing("late").asg(true));

    let (status, _, _) = send(app, Method::GET, "/service/healthcheck/asg").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn concurrent_requests_get_independent_reports() {
    let ctx = empty_context()
        .with_test(passing("a").asg(true).gtg(true))
        .with_test(failing("b").gtg(true));
    let app = router(ctx);

    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        let path = if i % 2 == 0 {
            "/service/healthcheck/asg"
        } else {
            "/service/healthcheck/gtg"
        };
        handles.push(tokio::spawn(async move { (path, send(app, Method::GET, path).await) }));
    }

    for handle in handles {
        let (path, (status, _, _)) = handle.await.unwrap();
        let expected = if path.ends_with("asg") {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        assert_eq!(status, expected, "{path}");
    }
}

#[tokio::test]
async fn mount_routes_service_prefix_only() {
    let app = Router::new().route("/", get(|| async { "hello, world!" }));
    let router = mount(app, empty_context());

    let (status, _, body) = send(router.clone(), Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "hello, world!");

    let (status, _, body) = send(router.clone(), Method::GET, "/service/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, EMPTY_CONFIG);

    let (status, _, _) = send(router.clone(), Method::GET, "/service/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, headers, body) = send(router, Method::GET, "/service/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type(&headers), "application/json");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(body, r#"{"status":404,"message":"No such route \"/service/\""}"#);
}
