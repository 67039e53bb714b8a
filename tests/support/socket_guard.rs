use std::future::Future;
use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_SOCKET_TESTS_ENV: &str = "COVERS_REQUIRE_SOCKET_TESTS";

#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_SOCKET_TESTS_ENV)
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] cannot bind localhost socket at {}:{}; wiremock-based test cannot run in this environment",
        location.file(),
        location.line()
    );
    assert!(
        !socket_tests_required(),
        "{message}. Set {REQUIRE_SOCKET_TESTS_ENV}=0 to allow local skip behavior."
    );

    eprintln!("{message}. Skipping test. Set {REQUIRE_SOCKET_TESTS_ENV}=1 to fail-fast instead.");
    true
}

/// Starts a mock server, or resolves to `None` when localhost sockets are unavailable.
///
/// The socket check runs before the returned future is polled so the skip
/// message names the calling test.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let skip = should_skip_socket_bound_test();
    async move {
        if skip {
            None
        } else {
            Some(MockServer::start().await)
        }
    }
}
