use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<Method>,
    pub allowed_headers: Vec<header::HeaderName>,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allowed_methods: vec![Method::GET, Method::POST, Method::OPTIONS],
            allowed_headers: vec![header::CONTENT_TYPE, header::ACCEPT],
            max_age_secs: 7200,
        }
    }
}

impl CorsConfig {
    pub fn with_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// An empty origin list means development mode: any origin is allowed.
    pub fn build(self) -> CorsLayer {
        let mut cors = CorsLayer::new()
            .allow_methods(self.allowed_methods)
            .allow_headers(self.allowed_headers)
            .max_age(std::time::Duration::from_secs(self.max_age_secs));

        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring unparseable CORS origin: {}", o);
                    None
                }
            })
            .collect();

        cors = if origins.is_empty() {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(origins)
        };
        cors
    }
}

pub fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        info!("Creating CORS layer with development defaults (no origins configured)");
    } else {
        info!(
            "CORS configured with {} allowed origins",
            allowed_origins.len()
        );
    }
    CorsConfig::default()
        .with_origins(allowed_origins.to_vec())
        .build()
}
