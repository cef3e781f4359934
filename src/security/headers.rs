use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::core::config::Environment;

/// Headers stamped onto every response. `None` leaves the header off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityHeadersConfig {
    pub x_frame_options: Option<String>,
    pub x_content_type_options: Option<String>,
    pub referrer_policy: Option<String>,
    pub permissions_policy: Option<String>,
    pub strict_transport_security: Option<String>,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            x_frame_options: Some("DENY".to_string()),
            x_content_type_options: Some("nosniff".to_string()),
            referrer_policy: Some("strict-origin-when-cross-origin".to_string()),
            permissions_policy: Some("camera=(), microphone=(), geolocation=()".to_string()),
            strict_transport_security: None,
        }
    }
}

impl SecurityHeadersConfig {
    /// HSTS is only sent in production; development runs over plain HTTP.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::default().with_hsts(31_536_000, true),
            Environment::Development => Self::default(),
        }
    }

    pub fn with_hsts(mut self, max_age: u64, include_subdomains: bool) -> Self {
        let mut value = format!("max-age={}", max_age);
        if include_subdomains {
            value.push_str("; includeSubDomains");
        }
        self.strict_transport_security = Some(value);
        self
    }

    fn pairs(&self) -> [(&'static str, Option<&String>); 5] {
        [
            ("x-frame-options", self.x_frame_options.as_ref()),
            ("x-content-type-options", self.x_content_type_options.as_ref()),
            ("referrer-policy", self.referrer_policy.as_ref()),
            ("permissions-policy", self.permissions_policy.as_ref()),
            (
                "strict-transport-security",
                self.strict_transport_security.as_ref(),
            ),
        ]
    }
}

pub async fn security_headers_middleware(
    axum::Extension(config): axum::Extension<SecurityHeadersConfig>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(&mut response, &config);
    response
}

fn apply_security_headers(response: &mut Response, config: &SecurityHeadersConfig) {
    let headers = response.headers_mut();
    for (name, value) in config.pairs() {
        if let Some(value) = value {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
    }
}

pub fn create_security_headers_layer(
    config: SecurityHeadersConfig,
) -> axum::Extension<SecurityHeadersConfig> {
    axum::Extension(config)
}
