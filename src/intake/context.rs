//! Everything one intake request needs, captured once at the edge.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use std::net::IpAddr;

use super::types::{non_empty, LeadSubmission};

/// The inbound headers the intake pipeline consumes.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    pub host: Option<String>,
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub cf_connecting_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub origin: Option<String>,
}

impl RequestHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        Self {
            host: trimmed_header(headers, "host"),
            forwarded_for: trimmed_header(headers, "x-forwarded-for"),
            real_ip: trimmed_header(headers, "x-real-ip"),
            cf_connecting_ip: trimmed_header(headers, "cf-connecting-ip"),
            user_agent: headers
                .get("user-agent")
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned()),
            referer: trimmed_header(headers, "referer"),
            origin: trimmed_header(headers, "origin"),
        }
    }

    /// Proxy-chain precedence: X-Forwarded-For (first hop), X-Real-IP,
    /// CF-Connecting-IP. A candidate that is not an IP address is skipped.
    pub fn client_ip(&self) -> Option<String> {
        let first_hop = self
            .forwarded_for
            .as_deref()
            .and_then(|v| v.split(',').next());
        [first_hop, self.real_ip.as_deref(), self.cf_connecting_ip.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|candidate| candidate.trim().parse::<IpAddr>().ok())
            .map(|ip| ip.to_string())
    }

    /// Lower-cased host with the port kept, so `localhost:3002` and
    /// `localhost:3003` can map to different brands.
    pub fn normalized_host(&self, default_domain: &str) -> String {
        self.host
            .as_deref()
            .unwrap_or(default_domain)
            .trim()
            .trim_end_matches('.')
            .to_ascii_lowercase()
    }
}

fn trimmed_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Immutable view of a single submission: headers, parsed body and the
/// server clock reading taken when the request arrived.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub headers: RequestHeaders,
    pub body: LeadSubmission,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(headers: RequestHeaders, body: LeadSubmission, received_at: DateTime<Utc>) -> Self {
        Self {
            headers,
            body,
            received_at,
        }
    }

    /// Declared page URL, then the referer, then empty.
    pub fn page_url(&self) -> String {
        non_empty(&self.body.page_url)
            .or(self.headers.referer.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}
