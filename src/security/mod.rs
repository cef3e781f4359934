pub mod cors;
pub mod headers;

pub use cors::{create_cors_layer, CorsConfig};
pub use headers::{
    create_security_headers_layer, security_headers_middleware, SecurityHeadersConfig,
};
