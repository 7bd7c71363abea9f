use crate::error::{ClientError, Result};
use crate::models::{
    AuthOutcome, AuthReply, ImagePromptReply, ImageReply, ListReply, PageFetch, PageIdMapping,
    PreSignedUrl, Profile, ProfileReply, PromptReply, ReportRow, SeoStrategy, SiteList,
    SitesReply, StrategyReply, WpLoginReply, WpPage,
};
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub type LoadingCallback = Arc<dyn Fn(bool) + Send + Sync>;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Lowers the loading flag when the exchange ends, however it ends.
struct LoadingGuard {
    callback: Option<LoadingCallback>,
}

impl LoadingGuard {
    fn raise(callback: Option<LoadingCallback>) -> Self {
        if let Some(ref cb) = callback {
            cb(true);
        }
        Self { callback }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(ref cb) = self.callback {
            cb(false);
        }
    }
}

/// Client for the SeoSpyder backend.
///
/// Every method is a single request/response exchange: no retry, no backoff.
/// Cookies set by the backend are kept for the lifetime of the client.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
    loading_callback: Option<LoadingCallback>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// `timeout_secs == 0` disables the request timeout.
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                base_url,
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder()
            .user_agent(concat!("SeoSpyder/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5));
        if timeout_secs > 0 {
            builder = builder
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: None,
            loading_callback: None,
        })
    }

    /// Send `xid=<id>` with every backend request.
    pub fn with_session_cookie(mut self, xid: impl Into<String>) -> Self {
        self.session_cookie = Some(xid.into());
        self
    }

    pub fn with_loading_callback(mut self, callback: LoadingCallback) -> Self {
        self.loading_callback = Some(callback);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(ref xid) = self.session_cookie {
            builder = builder.header(COOKIE, format!("xid={}", xid));
        }
        Ok(builder)
    }

    /// Send the request and read the body as JSON, whatever the status.
    ///
    /// Bodies that are not JSON are a parse error on success statuses and a
    /// status error otherwise.
    async fn exchange(&self, builder: RequestBuilder, path: &str) -> Result<(u16, Value)> {
        let _loading = LoadingGuard::raise(self.loading_callback.clone());
        debug!("Requesting {}", path);

        let outcome = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            debug!("{} -> {} ({} bytes)", path, status.as_u16(), body.len());

            match serde_json::from_str::<Value>(&body) {
                Ok(value) => Ok((status.as_u16(), value)),
                Err(e) if status.is_success() => {
                    Err(ClientError::ParseError(format!("{}: {}", path, e)))
                }
                Err(_) => Err(ClientError::StatusError {
                    endpoint: path.to_string(),
                    status: status.as_u16(),
                }),
            }
        }
        .await;

        if let Err(ref e) = outcome {
            warn!("Request to {} failed: {}", path, e);
        }
        outcome
    }

    /// Non-2xx replies are errors even when the body parses as JSON.
    fn require_success(path: &str, status: u16) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        warn!("{} returned status {}", path, status);
        Err(ClientError::StatusError {
            endpoint: path.to_string(),
            status,
        })
    }

    async fn get_json(&self, path: &str) -> Result<(u16, Value)> {
        let builder = self.request(Method::GET, path)?;
        self.exchange(builder, path).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(u16, Value)> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.exchange(builder, path).await
    }

    /// `GET /api/profile`
    pub async fn profile(&self) -> Result<AuthOutcome<Option<Profile>>> {
        let (_, value) = self.get_json("/api/profile").await?;
        let reply: ProfileReply = serde_json::from_value(value)?;
        if let Some(auth_url) = reply.auth_url.filter(|u| !u.is_empty()) {
            return Ok(AuthOutcome::AuthRequired { auth_url });
        }
        Ok(AuthOutcome::Ready(reply.user))
    }

    /// `GET /api/auth/v1`: basic sign-in scopes.
    pub async fn login(&self) -> Result<AuthOutcome<()>> {
        self.auth("/api/auth/v1").await
    }

    /// `GET /api/auth/v2`: Search Console and Analytics scopes.
    pub async fn advance_login(&self) -> Result<AuthOutcome<()>> {
        self.auth("/api/auth/v2").await
    }

    async fn auth(&self, path: &str) -> Result<AuthOutcome<()>> {
        let (_, value) = self.get_json(path).await?;
        let reply: AuthReply = serde_json::from_value(value)?;
        Ok(match reply.auth_url.filter(|u| !u.is_empty()) {
            Some(auth_url) => AuthOutcome::AuthRequired { auth_url },
            None => AuthOutcome::Ready(()),
        })
    }

    /// `GET /api/googledata`: connected Search Console properties.
    pub async fn google_data(&self) -> Result<AuthOutcome<SiteList>> {
        let (_, value) = self.get_json("/api/googledata").await?;
        let reply: SitesReply = serde_json::from_value(value)?;
        if let Some(auth_url) = reply.auth_url.filter(|u| !u.is_empty()) {
            return Ok(AuthOutcome::AuthRequired { auth_url });
        }
        info!("Fetched {} Search Console properties", reply.sites.len());
        Ok(AuthOutcome::Ready(SiteList {
            sites: reply.sites,
            message: reply.message,
        }))
    }

    /// `POST /api/consolereport`: per-page performance rows for a property.
    pub async fn console_report(&self, selected_domain: &str) -> Result<AuthOutcome<Vec<ReportRow>>> {
        let path = "/api/consolereport";
        let (status, value) = self
            .post_json(path, &json!({ "selectedDomain": selected_domain }))
            .await?;
        // An auth redirect may arrive with any status.
        if let Some(auth_url) = value
            .get("authUrl")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
        {
            return Ok(AuthOutcome::AuthRequired {
                auth_url: auth_url.to_string(),
            });
        }
        Self::require_success(path, status)?;
        let reply: ListReply<ReportRow> = serde_json::from_value(value)?;
        let rows = reply.into_items();
        info!("Fetched {} report rows for {}", rows.len(), selected_domain);
        Ok(AuthOutcome::Ready(rows))
    }

    /// `POST /api/get-webpage-url`: internal page ids for public URLs.
    pub async fn webpage_ids(
        &self,
        website_url: &str,
        webpage_urls: &[String],
    ) -> Result<Vec<PageIdMapping>> {
        let (_, value) = self
            .post_json(
                "/api/get-webpage-url",
                &json!({ "websiteUrl": website_url, "webpageUrls": webpage_urls }),
            )
            .await?;
        let reply: ListReply<PageIdMapping> = serde_json::from_value(value)?;
        Ok(reply.into_items())
    }

    /// `POST /api/wordpress/getwebpage`
    ///
    /// A 401/403, or a 2xx body without page content, means the site needs a
    /// WordPress application password first. Any other failure status is a
    /// `StatusError`.
    pub async fn wordpress_page(&self, wp_url: &str, selected_domain: &str) -> Result<PageFetch> {
        let (status, value) = self
            .post_json(
                "/api/wordpress/getwebpage",
                &json!({ "wpUrl": wp_url, "selectedDomain": selected_domain }),
            )
            .await?;

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        if status == 401 || status == 403 {
            return Ok(PageFetch::CredentialsRequired { message });
        }
        Self::require_success("/api/wordpress/getwebpage", status)?;

        let page_value = match value {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            Value::Object(ref map) if map.get("data").is_some_and(Value::is_object) => {
                map["data"].clone()
            }
            Value::Object(ref map) if map.get("data").is_some_and(Value::is_array) => {
                map["data"].get(0).cloned().unwrap_or(Value::Null)
            }
            other => other,
        };

        if page_value.get("content").is_none() {
            debug!("No page content for {}, credentials required", wp_url);
            return Ok(PageFetch::CredentialsRequired { message });
        }

        let page: WpPage = serde_json::from_value(page_value)?;
        Ok(PageFetch::Page(Box::new(page)))
    }

    /// `POST /api/wordpress/login`: store an application password.
    pub async fn wordpress_login(
        &self,
        name: &str,
        password: &str,
        selected_domain: &str,
    ) -> Result<WpLoginReply> {
        let (status, value) = self
            .post_json(
                "/api/wordpress/login",
                &json!({ "wName": name, "wPassword": password, "selectedDomain": selected_domain }),
            )
            .await?;
        // Without an explicit `success` field the status decides.
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or((200..300).contains(&status));
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        if !success {
            warn!("WordPress login rejected for {}", selected_domain);
        }
        Ok(WpLoginReply { success, message })
    }

    /// `POST /api/get-pre-signed-url`: upload target for extracted page text.
    pub async fn pre_signed_url(&self, id: &str) -> Result<PreSignedUrl> {
        let (_, value) = self
            .post_json("/api/get-pre-signed-url", &json!({ "id": id }))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// PUT plain text to a pre-signed object storage URL.
    pub async fn upload_text(&self, upload_url: &str, text: &str) -> Result<()> {
        let url = Url::parse(upload_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", upload_url, e)))?;
        let _loading = LoadingGuard::raise(self.loading_callback.clone());

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Upload to pre-signed URL failed with {}", status);
            return Err(ClientError::StatusError {
                endpoint: "pre-signed upload".to_string(),
                status: status.as_u16(),
            });
        }
        debug!("Uploaded {} bytes of page text", text.len());
        Ok(())
    }

    /// `POST /api/get-prompt`: submit an assembled prompt.
    pub async fn get_prompt_data(
        &self,
        website_url: &str,
        website_page_url: &str,
        prompt: &str,
        id: &str,
    ) -> Result<PromptReply> {
        debug!("Submitting prompt ({} chars) for {}", prompt.chars().count(), website_page_url);
        let path = "/api/get-prompt";
        let (status, value) = self
            .post_json(
                path,
                &json!({
                    "websiteUrl": website_url,
                    "websitePageUrl": website_page_url,
                    "prompt": prompt,
                    "id": id,
                }),
            )
            .await?;
        Self::require_success(path, status)?;
        Ok(PromptReply::from_value(value))
    }

    /// `POST /api/get-img-prompts`: first step of image generation.
    pub async fn image_prompts(
        &self,
        prompt: &str,
        content_data: &str,
        ai_model: &str,
    ) -> Result<ImagePromptReply> {
        let (_, value) = self
            .post_json(
                "/api/get-img-prompts",
                &json!({ "prompt": prompt, "contentData": content_data, "aiModel": ai_model }),
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// `POST /api/image-generation`: render one image prompt.
    pub async fn generate_image(&self, prompt: &str, title: &str, ai_model: &str) -> Result<ImageReply> {
        let (_, value) = self
            .post_json(
                "/api/image-generation",
                &json!({ "prompt": prompt, "title": title, "aiModel": ai_model }),
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// `POST /api/searched-seo`: keyword research plus AI strategy text.
    ///
    /// Returns `None` when the reply lacks either part.
    pub async fn searched_seo(
        &self,
        keyword: &str,
        location: &str,
        country_code: &str,
    ) -> Result<Option<SeoStrategy>> {
        let path = "/api/searched-seo";
        let (status, value) = self
            .post_json(
                path,
                &json!({
                    "keyword": keyword.trim(),
                    "location": location,
                    "country_code": country_code,
                }),
            )
            .await?;
        Self::require_success(path, status)?;
        let reply: StrategyReply = serde_json::from_value(value)?;
        Ok(reply.into_strategy())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session_cookie", &self.session_cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
