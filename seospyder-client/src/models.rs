use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Signed-in Google account as reported by `/api/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// Result of an auth-aware call: either the payload, or an OAuth URL the
/// user has to visit before the backend will answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome<T> {
    Ready(T),
    AuthRequired { auth_url: String },
}

impl<T> AuthOutcome<T> {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, AuthOutcome::AuthRequired { .. })
    }

    pub fn ready(self) -> Option<T> {
        match self {
            AuthOutcome::Ready(value) => Some(value),
            AuthOutcome::AuthRequired { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AuthOutcome<U> {
        match self {
            AuthOutcome::Ready(value) => AuthOutcome::Ready(f(value)),
            AuthOutcome::AuthRequired { auth_url } => AuthOutcome::AuthRequired { auth_url },
        }
    }
}

/// A Search Console property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteEntry {
    pub site_url: String,
    #[serde(default)]
    pub permission_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteList {
    pub sites: Vec<WebsiteEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One per-query or per-country metric line inside a report's details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub position: f64,
}

impl MetricRow {
    pub fn term(&self) -> Option<&str> {
        self.keys.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDetails {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub countries: Vec<MetricRow>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub queries: Vec<MetricRow>,
}

/// Per-page performance row from `/api/consolereport`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub page_url: String,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub position: f64,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ReportDetails>,
}

/// Mapping from a public page URL to the backend's internal page id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageIdMapping {
    #[serde(alias = "webpageUrl", alias = "pageUrl")]
    pub url: String,
    #[serde(deserialize_with = "required_id")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// A WordPress page as returned by the REST API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WpPage {
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
}

impl WpPage {
    pub fn title(&self) -> &str {
        &self.title.rendered
    }

    pub fn content_html(&self) -> &str {
        &self.content.rendered
    }
}

/// Outcome of `/api/wordpress/getwebpage`.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFetch {
    Page(Box<WpPage>),
    CredentialsRequired { message: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WpLoginReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreSignedUrl {
    #[serde(alias = "uploadUrl", alias = "signedUrl", alias = "preSignedUrl")]
    pub url: String,
}

/// Reply of `/api/get-prompt`, tagged by the field it was taken from.
///
/// The backend has answered with the generated text under `content`, `data`
/// or `result`, or as a bare object; the first truthy field in that order
/// wins and anything else is kept verbatim as `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptReply {
    Content(Value),
    Data(Value),
    Result(Value),
    Raw(Value),
}

impl PromptReply {
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(ref map) = value {
            for key in ["content", "data", "result"] {
                if let Some(field) = map.get(key)
                    && is_truthy(field)
                {
                    let field = field.clone();
                    return match key {
                        "content" => PromptReply::Content(field),
                        "data" => PromptReply::Data(field),
                        _ => PromptReply::Result(field),
                    };
                }
            }
        }
        PromptReply::Raw(value)
    }

    pub fn value(&self) -> &Value {
        match self {
            PromptReply::Content(v)
            | PromptReply::Data(v)
            | PromptReply::Result(v)
            | PromptReply::Raw(v) => v,
        }
    }

    /// Text suitable for display: strings as-is, objects searched for a text
    /// field, anything else pretty-printed.
    pub fn to_text(&self) -> String {
        match self.value() {
            Value::String(s) => s.clone(),
            Value::Object(map) => {
                for key in ["content", "data", "result", "text", "message"] {
                    if let Some(Value::String(s)) = map.get(key)
                        && !s.is_empty()
                    {
                        return s.clone();
                    }
                }
                serde_json::to_string_pretty(self.value()).unwrap_or_default()
            }
            Value::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePromptReply {
    #[serde(default, rename = "aiModel")]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub prompt: Option<Value>,
}

impl ImagePromptReply {
    /// Image prompts, only when the backend echoed the model and sent a
    /// non-empty list.
    pub fn prompts(&self) -> Option<Vec<String>> {
        self.ai_model.as_deref().filter(|m| !m.is_empty())?;
        let list = self.prompt.as_ref()?.as_array()?;
        let prompts: Vec<String> = list
            .iter()
            .filter_map(|p| p.as_str().map(str::to_string))
            .collect();
        if prompts.is_empty() { None } else { Some(prompts) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageReply {
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub display_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoStrategy {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub related_keywords: Vec<String>,
    #[serde(default)]
    pub ai_strategy: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StrategyReply {
    #[serde(default)]
    pub data: Option<StrategyData>,
    #[serde(default)]
    pub ai_strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StrategyData {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub related_keywords: Vec<String>,
}

impl StrategyReply {
    pub(crate) fn into_strategy(self) -> Option<SeoStrategy> {
        let data = self.data?;
        let ai_strategy = self.ai_strategy.filter(|s| !s.is_empty())?;
        Some(SeoStrategy {
            results: data.results,
            related_keywords: data.related_keywords,
            ai_strategy,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileReply {
    #[serde(default, rename = "authUrl")]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub user: Option<Profile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthReply {
    #[serde(default, rename = "authUrl")]
    pub auth_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SitesReply {
    #[serde(default, rename = "authUrl")]
    pub auth_url: Option<String>,
    #[serde(default, alias = "siteEntry", alias = "data", deserialize_with = "null_as_empty")]
    pub sites: Vec<WebsiteEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

/// List payloads arrive either bare or wrapped in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListReply<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new", alias = "rows", alias = "result")]
        data: Vec<T>,
    },
}

impl<T> ListReply<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            ListReply::Bare(items) | ListReply::Wrapped { data: items } => items,
        }
    }
}

/// JavaScript truthiness, which is what the backend contract was written
/// against.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_reply_prefers_content() {
        let reply = PromptReply::from_value(json!({"content": "X", "data": "Y"}));
        assert_eq!(reply, PromptReply::Content(json!("X")));
        assert_eq!(reply.to_text(), "X");
    }

    #[test]
    fn test_prompt_reply_skips_falsy_fields() {
        let reply = PromptReply::from_value(json!({"content": "", "data": null, "result": "R"}));
        assert_eq!(reply, PromptReply::Result(json!("R")));
    }

    #[test]
    fn test_prompt_reply_empty_object_falls_through() {
        let reply = PromptReply::from_value(json!({}));
        assert_eq!(reply, PromptReply::Raw(json!({})));
        assert_eq!(reply.to_text(), "{}");
    }

    #[test]
    fn test_prompt_reply_nested_text() {
        let reply = PromptReply::from_value(json!({"data": {"text": "nested"}}));
        assert_eq!(reply.to_text(), "nested");
    }

    #[test]
    fn test_report_row_accepts_numeric_id_and_missing_details() {
        let row: ReportRow = serde_json::from_value(json!({
            "pageUrl": "https://example.com/a",
            "clicks": 3,
            "impressions": 40,
            "ctr": 7.5,
            "position": 4.2,
            "id": 17
        }))
        .unwrap();
        assert_eq!(row.id.as_deref(), Some("17"));
        assert!(row.details.is_none());
    }

    #[test]
    fn test_report_details_null_arrays_are_empty() {
        let details: ReportDetails =
            serde_json::from_value(json!({"countries": null})).unwrap();
        assert!(details.countries.is_empty());
        assert!(details.queries.is_empty());
    }

    #[test]
    fn test_image_prompts_require_model_echo() {
        let reply: ImagePromptReply =
            serde_json::from_value(json!({"prompt": ["a cat"]})).unwrap();
        assert!(reply.prompts().is_none());

        let reply: ImagePromptReply =
            serde_json::from_value(json!({"aiModel": "gpt", "prompt": ["a cat"]})).unwrap();
        assert_eq!(reply.prompts(), Some(vec!["a cat".to_string()]));

        let reply: ImagePromptReply =
            serde_json::from_value(json!({"aiModel": "gpt", "prompt": []})).unwrap();
        assert!(reply.prompts().is_none());
    }

    #[test]
    fn test_list_reply_shapes() {
        let bare: ListReply<PageIdMapping> =
            serde_json::from_value(json!([{"url": "u", "id": 1}])).unwrap();
        assert_eq!(bare.into_items()[0].id, "1");

        let wrapped: ListReply<PageIdMapping> =
            serde_json::from_value(json!({"data": [{"url": "u", "id": "x"}]})).unwrap();
        assert_eq!(wrapped.into_items()[0].id, "x");
    }
}
