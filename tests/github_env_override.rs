mod support;

use multidoc::github::{latest_release_tag, ENV_GITHUB_URL, ENV_LATEST_TAG};

use support::{http_response, OneShotServer};

// Both cases share process-wide env vars, so they run in one test.
#[test]
fn test_latest_tag_env_override_then_host_lookup() {
    // A host nobody listens on: any lookup would fail.
    std::env::set_var(ENV_GITHUB_URL, "http://127.0.0.1:9");
    std::env::set_var(ENV_LATEST_TAG, " v3.1.4 ");
    let tag = latest_release_tag("acme", "widgets").expect("tag from env");
    assert_eq!(tag, "v3.1.4");

    // Blank value falls through to the host lookup.
    let server = OneShotServer::bind();
    let base = server.base_url.clone();
    let location = format!("{base}/acme/widgets/releases/tag/v2.0.0");
    let handle = server.respond(http_response("302 Found", &[("Location", &location)], ""));
    std::env::set_var(ENV_GITHUB_URL, format!("{base}/"));
    std::env::set_var(ENV_LATEST_TAG, "  ");

    let tag = latest_release_tag("acme", "widgets").expect("tag from host");
    assert_eq!(tag, "v2.0.0");
    let request = handle.join().expect("server thread");
    assert!(
        request.starts_with("GET /acme/widgets/releases/latest "),
        "unexpected request: {request}"
    );

    std::env::remove_var(ENV_LATEST_TAG);
    std::env::remove_var(ENV_GITHUB_URL);
}
