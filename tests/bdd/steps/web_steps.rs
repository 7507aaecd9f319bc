use cucumber::{given, then, when};

use crate::TaskgateWorld;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Start an in-process axum test server using the world's temp database.
/// Binds to a random free port (port 0), stores the port and task handle
/// in the world for later use.
pub async fn start_test_server(world: &mut TaskgateWorld) -> u16 {
    let db = world.open_db();
    db.migrate().expect("failed to create tables");
    let app = taskgate::web::create_router(taskgate::web::AppState::new(db));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to ephemeral port");
    let port = listener
        .local_addr()
        .expect("failed to get local addr")
        .port();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("web server error in test");
    });

    world.server_port = Some(port);
    world.server_handle = Some(handle);

    // Poll until the server accepts connections (up to 20 tries).
    for _ in 0..20 {
        if world
            .http_client
            .get(format!("http://127.0.0.1:{port}/login"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    port
}

fn url(world: &TaskgateWorld, path: &str) -> String {
    let port = world
        .server_port
        .expect("server not started — add 'Given the web server is running'");
    format!("http://127.0.0.1:{port}{path}")
}

/// Store status, `Location` header and body of a response on the world.
async fn record(world: &mut TaskgateWorld, resp: reqwest::Response) -> u16 {
    let status = resp.status().as_u16();
    world.last_response_location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| panic!("failed to read response body: {e}"));
    world.last_response_status = Some(status);
    world.last_response_body = Some(body);
    status
}

/// Perform a GET request against the running test server.
pub async fn http_get(world: &mut TaskgateWorld, path: &str) -> u16 {
    let url = url(world, path);
    let resp = world
        .http_client
        .get(&url)
        .send()
        .await
        .unwrap_or_else(|e| panic!("GET {url} failed: {e}"));
    record(world, resp).await
}

/// Perform a form-encoded POST against the running test server.
pub async fn http_post_form(world: &mut TaskgateWorld, path: &str, form: &[(&str, &str)]) -> u16 {
    let url = url(world, path);
    let resp = world
        .http_client
        .post(&url)
        .form(form)
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {url} failed: {e}"));
    record(world, resp).await
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

/// Start the in-process web server backed by the world's temp database.
#[given("the web server is running")]
async fn the_web_server_is_running(world: &mut TaskgateWorld) {
    start_test_server(world).await;
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when(expr = "I GET {string}")]
async fn i_get_path(world: &mut TaskgateWorld, path: String) {
    http_get(world, &path).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then(expr = "the response status is {int}")]
async fn the_response_status_is(world: &mut TaskgateWorld, expected: u16) {
    let actual = world
        .last_response_status
        .expect("no HTTP response recorded — did you make a request?");
    assert_eq!(
        actual, expected,
        "expected HTTP status {expected} but got {actual}"
    );
}

/// Assert a 303 redirect to the given location.
#[then(expr = "I am redirected to {string}")]
async fn i_am_redirected_to(world: &mut TaskgateWorld, expected: String) {
    let status = world
        .last_response_status
        .expect("no HTTP response recorded — did you make a request?");
    assert_eq!(status, 303, "expected a 303 redirect but got {status}");
    assert_eq!(
        world.last_response_location.as_deref(),
        Some(expected.as_str()),
        "unexpected redirect target"
    );
}

#[then(expr = "the response body contains {string}")]
async fn the_response_body_contains(world: &mut TaskgateWorld, expected: String) {
    let body = world
        .last_response_body
        .as_deref()
        .expect("no HTTP response body recorded — did you make a request?");
    assert!(
        body.contains(&expected),
        "expected response body to contain {expected:?}, but body was:\n{body}"
    );
}
