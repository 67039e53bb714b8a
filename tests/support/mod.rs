#![allow(dead_code)]

pub mod socket_guard;

/// Matches requests whose whole `User-Agent` header equals the given value.
pub struct UserAgentIs(pub &'static str);

impl wiremock::Match for UserAgentIs {
    fn matches(&self, request: &wiremock::Request) -> bool {
        request
            .headers
            .get("user-agent")
            .and_then(|value| value.to_str().ok())
            == Some(self.0)
    }
}
