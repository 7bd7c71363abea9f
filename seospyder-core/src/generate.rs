// Generation workflows: compose, submit, and hand results back to the store

use crate::countries::Country;
use crate::error::{CoreError, Result};
use crate::metrics::{self, MetricCategory};
use crate::prompt::{self, FragmentOptions, GeneratorKind};
use crate::state::{Action, PromptSlot, attach_page_ids};
use futures::future::join_all;
use seospyder_client::extract::extract_text;
use seospyder_client::models::SeoStrategy;
use seospyder_client::{
    ApiClient, AuthOutcome, ClientError, PageFetch, PromptReply, ReportRow, TaskScope, WpPage,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const NO_PROMPTS_MESSAGE: &str = "No prompts generated.";
pub const NO_IMAGES_MESSAGE: &str = "No images generated. Try a different prompt.";
pub const STRATEGY_INPUT_MESSAGE: &str = "Please enter both keyword and select a country";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiModel {
    #[default]
    Gemini,
    Gpt,
}

impl AiModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiModel::Gemini => "gemini",
            AiModel::Gpt => "gpt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Some(AiModel::Gemini),
            "gpt" | "openai" => Some(AiModel::Gpt),
            _ => None,
        }
    }
}

/// The report row and WordPress page a generator works on.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub domain: String,
    pub report: ReportRow,
    pub page: WpPage,
}

impl PageContext {
    pub fn new(domain: impl Into<String>, report: ReportRow, page: WpPage) -> Self {
        Self {
            domain: domain.into(),
            report,
            page,
        }
    }

    /// Public link of the page: the fetched WordPress link, then the row's
    /// link, then the Search Console URL.
    pub fn page_url(&self) -> &str {
        Some(self.page.link.as_str())
            .filter(|l| !l.is_empty())
            .or_else(|| self.report.link.as_deref().filter(|l| !l.is_empty()))
            .unwrap_or(&self.report.page_url)
    }

    pub fn page_id(&self) -> &str {
        self.report
            .id
            .as_deref()
            .or(self.page.id.as_deref())
            .unwrap_or_default()
    }
}

/// A generator reply, addressed to its output slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub slot: PromptSlot,
    pub prompt: String,
    pub reply: PromptReply,
}

impl Generated {
    pub fn text(&self) -> String {
        self.reply.to_text()
    }

    pub fn into_action(self) -> Action {
        Action::PromptGenerated {
            slot: self.slot,
            text: self.reply.to_text(),
        }
    }
}

/// Runs the dashboard workflows against one client inside one scope.
///
/// Cancelling the scope abandons whatever is in flight; nothing is returned
/// for the store to apply.
#[derive(Debug, Clone)]
pub struct Generator {
    client: ApiClient,
    scope: TaskScope,
}

impl Generator {
    pub fn new(client: ApiClient, scope: TaskScope) -> Self {
        Self { client, scope }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    async fn submit(&self, slot: PromptSlot, prompt: String, ctx: &PageContext) -> Result<Generated> {
        let reply = self
            .scope
            .run(self.client.get_prompt_data(
                &ctx.domain,
                ctx.page_url(),
                &prompt,
                ctx.page_id(),
            ))
            .await?;
        info!("Generated {:?} content for {}", slot, ctx.page_url());
        Ok(Generated {
            slot,
            prompt,
            reply,
        })
    }

    /// FAQ, table, bullet, table of contents and numbered list generators.
    pub async fn run(
        &self,
        kind: GeneratorKind,
        ctx: &PageContext,
        options: &FragmentOptions,
    ) -> Result<Generated> {
        let prompt = prompt::compose(kind, &ctx.page, options).ok_or_else(|| {
            CoreError::Validation(format!("{} is not a fragment generator", kind.label()))
        })?;
        self.submit(kind.slot(), prompt, ctx).await
    }

    pub async fn run_data(&self, category: MetricCategory, ctx: &PageContext) -> Result<Generated> {
        let rows = metrics::select(category, ctx.report.details.as_ref());
        debug!("{} rows feed the {} prompt", rows.len(), category.label());
        let prompt = prompt::compose_data_prompt(category, &rows, &ctx.page);
        self.submit(GeneratorKind::DataBased.slot(), prompt, ctx).await
    }

    pub async fn run_single(&self, keyword: &str, ctx: &PageContext) -> Result<Generated> {
        let prompt = prompt::compose_single_keyword(keyword);
        self.submit(GeneratorKind::SingleKeyword.slot(), prompt, ctx).await
    }

    /// Two-step image flow: ask for image prompts, then render each one
    /// concurrently. Failed renders are skipped.
    pub async fn generate_images(
        &self,
        user_prompt: &str,
        ctx: &PageContext,
        model: AiModel,
    ) -> Result<Vec<String>> {
        let reply = match self
            .scope
            .run(self.client.image_prompts(user_prompt, ctx.page.content_html(), model.as_str()))
            .await
        {
            Ok(reply) => reply,
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled.into()),
            Err(e) => {
                warn!("Image prompt request failed: {}", e);
                return Err(CoreError::Empty(NO_PROMPTS_MESSAGE.to_string()));
            }
        };
        let prompts = reply
            .prompts()
            .ok_or_else(|| CoreError::Empty(NO_PROMPTS_MESSAGE.to_string()))?;
        info!("Rendering {} image prompts with {}", prompts.len(), model.as_str());

        let title = ctx.page.title();
        let renders = prompts.iter().map(|p| {
            self.scope
                .run(self.client.generate_image(p, title, model.as_str()))
        });

        let mut images = Vec::new();
        for outcome in join_all(renders).await {
            match outcome {
                Ok(reply) => images.extend(reply.images.unwrap_or_default()),
                Err(ClientError::Cancelled) => return Err(ClientError::Cancelled.into()),
                Err(e) => warn!("Image render failed: {}", e),
            }
        }

        if images.is_empty() {
            return Err(CoreError::Empty(NO_IMAGES_MESSAGE.to_string()));
        }
        Ok(images)
    }

    /// Report rows for a property, with page ids attached where the lookup
    /// knows them.
    pub async fn fetch_report(&self, domain: &str) -> Result<AuthOutcome<Vec<ReportRow>>> {
        let mut rows = match self.scope.run(self.client.console_report(domain)).await? {
            AuthOutcome::Ready(rows) => rows,
            AuthOutcome::AuthRequired { auth_url } => {
                return Ok(AuthOutcome::AuthRequired { auth_url });
            }
        };
        if rows.is_empty() {
            return Ok(AuthOutcome::Ready(rows));
        }

        let urls: Vec<String> = rows.iter().map(|r| r.page_url.clone()).collect();
        match self.scope.run(self.client.webpage_ids(domain, &urls)).await {
            Ok(mappings) => attach_page_ids(&mut rows, &mappings),
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled.into()),
            Err(e) => warn!("Page id lookup failed, rows keep no id: {}", e),
        }
        Ok(AuthOutcome::Ready(rows))
    }

    /// Fetch the WordPress page behind a report row.
    ///
    /// The row gains its page id when it did not have one yet.
    pub async fn resolve_page(&self, domain: &str, report: &mut ReportRow) -> Result<PageFetch> {
        if report.id.is_none() {
            let urls = vec![report.page_url.clone()];
            let mappings = self.scope.run(self.client.webpage_ids(domain, &urls)).await?;
            attach_page_ids(std::slice::from_mut(report), &mappings);
        }
        let wp_url = report
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&report.page_url)
            .to_string();
        let fetch = self.scope.run(self.client.wordpress_page(&wp_url, domain)).await?;
        if let PageFetch::CredentialsRequired { .. } = fetch {
            info!("{} needs WordPress credentials", domain);
        }
        Ok(fetch)
    }

    /// Store the page's plain text where the backend's generators read it.
    pub async fn upload_page_text(&self, id: &str, page: &WpPage) -> Result<()> {
        if id.is_empty() {
            return Err(CoreError::Validation("Page has no id to upload against".to_string()));
        }
        let target = self.scope.run(self.client.pre_signed_url(id)).await?;
        let text = extract_text(page.content_html());
        self.scope
            .run(self.client.upload_text(&target.url, &text))
            .await?;
        info!("Uploaded {} chars of page text for {}", text.chars().count(), id);
        Ok(())
    }

    pub async fn search_strategy(
        &self,
        keyword: &str,
        country: Option<&Country>,
    ) -> Result<Option<SeoStrategy>> {
        let country = match country {
            Some(c) if !keyword.trim().is_empty() => c,
            _ => return Err(CoreError::Validation(STRATEGY_INPUT_MESSAGE.to_string())),
        };
        let strategy = self
            .scope
            .run(self.client.searched_seo(keyword, country.name, country.code))
            .await?;
        if strategy.is_none() {
            debug!("Strategy reply for {} lacked data or aiStrategy", keyword);
        }
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seospyder_client::models::Rendered;

    fn page_ctx(page_link: &str, link: Option<&str>, id: Option<&str>) -> PageContext {
        PageContext::new(
            "https://example.com/",
            ReportRow {
                page_url: "https://example.com/post".to_string(),
                link: link.map(str::to_string),
                id: id.map(str::to_string),
                ..Default::default()
            },
            WpPage {
                id: Some("wp-9".to_string()),
                link: page_link.to_string(),
                title: Rendered::default(),
                content: Rendered::default(),
            },
        )
    }

    fn ctx(link: Option<&str>, id: Option<&str>) -> PageContext {
        page_ctx("", link, id)
    }

    #[test]
    fn test_page_url_prefers_link() {
        assert_eq!(ctx(Some("https://example.com/?p=1"), None).page_url(), "https://example.com/?p=1");
        assert_eq!(ctx(Some(""), None).page_url(), "https://example.com/post");
        assert_eq!(ctx(None, None).page_url(), "https://example.com/post");
    }

    #[test]
    fn test_page_url_prefers_wordpress_link() {
        let c = page_ctx("https://example.com/?p=7", Some("https://example.com/?p=1"), None);
        assert_eq!(c.page_url(), "https://example.com/?p=7");
        let c = page_ctx("", Some("https://example.com/?p=1"), None);
        assert_eq!(c.page_url(), "https://example.com/?p=1");
    }

    #[test]
    fn test_page_id_prefers_report() {
        assert_eq!(ctx(None, Some("42")).page_id(), "42");
        assert_eq!(ctx(None, None).page_id(), "wp-9");
    }

    #[test]
    fn test_ai_model() {
        assert_eq!(AiModel::default(), AiModel::Gemini);
        assert_eq!(AiModel::from_str("GPT"), Some(AiModel::Gpt));
        assert_eq!(AiModel::from_str("claude"), None);
    }

    #[test]
    fn test_generated_into_action() {
        let generated = Generated {
            slot: PromptSlot::Faq,
            prompt: "p".to_string(),
            reply: PromptReply::Content(serde_json::json!("X")),
        };
        match generated.into_action() {
            Action::PromptGenerated { slot, text } => {
                assert_eq!(slot, PromptSlot::Faq);
                assert_eq!(text, "X");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
