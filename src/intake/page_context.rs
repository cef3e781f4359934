use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::consent::{form_provider, form_version};
use super::context::RequestContext;
use super::types::non_empty;

pub const DEFAULT_PAGE_TYPE: &str = "T1";

/// Where on the site the submission came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub url: String,
    pub path: String,
    pub pillar_slug: Option<String>,
    pub injury_slug: Option<String>,
    pub state_slug: Option<String>,
    pub city_slug: Option<String>,
    pub page_type: String,
    pub page_title: String,
    pub scroll_depth: Value,
    pub time_on_page: Value,
    pub clicks_before_submit: Value,
    pub form_provider: String,
    pub form_version: String,
}

/// `client` is the already size-checked `pageContext` object from the body.
pub fn build_page_context(ctx: &RequestContext, client: &Value) -> PageContext {
    let url = ctx.page_url();
    let path = non_empty(&ctx.body.page_path)
        .map(|p| p.to_string())
        .unwrap_or_else(|| url_path(&url));

    PageContext {
        pillar_slug: string_field(client, "pillarSlug")
            .or_else(|| non_empty(&ctx.body.case_slug).map(|s| s.to_string())),
        injury_slug: string_field(client, "injurySlug"),
        state_slug: string_field(client, "stateSlug"),
        city_slug: string_field(client, "citySlug"),
        page_type: string_field(client, "pageType").unwrap_or_else(|| DEFAULT_PAGE_TYPE.to_string()),
        page_title: string_field(client, "pageTitle").unwrap_or_default(),
        scroll_depth: number_field(client, "scrollDepth"),
        time_on_page: number_field(client, "timeOnPage"),
        clicks_before_submit: number_field(client, "clicksBeforeSubmit"),
        form_provider: form_provider(ctx),
        form_version: form_version(ctx),
        url,
        path,
    }
}

/// Path component of an absolute URL; `/` when there is none.
pub fn url_path(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) if !parsed.path().is_empty() => parsed.path().to_string(),
        _ => "/".to_string(),
    }
}

fn string_field(object: &Value, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn number_field(object: &Value, key: &str) -> Value {
    object
        .get(key)
        .filter(|v| v.is_number())
        .cloned()
        .unwrap_or_else(|| Value::from(0))
}
