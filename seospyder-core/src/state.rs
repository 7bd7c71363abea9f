// Application state for one dashboard session

use seospyder_client::models::{PageIdMapping, Profile, SeoStrategy, WebsiteEntry};
use seospyder_client::{ReportRow, WpPage};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const INITIAL_MESSAGE: &str = "Click the button above to fetch your data.";
pub const ERROR_BANNER_TTL: Duration = Duration::from_secs(2);

/// One of the seven generator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptSlot {
    Faq,
    Table,
    Bullet,
    TableOfContents,
    NumberedList,
    BasedOnData,
    SingleKeyword,
}

impl PromptSlot {
    pub const ALL: [PromptSlot; 7] = [
        PromptSlot::Faq,
        PromptSlot::Table,
        PromptSlot::Bullet,
        PromptSlot::TableOfContents,
        PromptSlot::NumberedList,
        PromptSlot::BasedOnData,
        PromptSlot::SingleKeyword,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOutputs {
    pub faq: String,
    pub table: String,
    pub bullet: String,
    pub table_of_contents: String,
    pub numbered_list: String,
    pub based_on_data: String,
    pub single_keyword: String,
}

impl PromptOutputs {
    pub fn get(&self, slot: PromptSlot) -> &str {
        match slot {
            PromptSlot::Faq => &self.faq,
            PromptSlot::Table => &self.table,
            PromptSlot::Bullet => &self.bullet,
            PromptSlot::TableOfContents => &self.table_of_contents,
            PromptSlot::NumberedList => &self.numbered_list,
            PromptSlot::BasedOnData => &self.based_on_data,
            PromptSlot::SingleKeyword => &self.single_keyword,
        }
    }

    pub fn set(&mut self, slot: PromptSlot, value: String) {
        let target = match slot {
            PromptSlot::Faq => &mut self.faq,
            PromptSlot::Table => &mut self.table,
            PromptSlot::Bullet => &mut self.bullet,
            PromptSlot::TableOfContents => &mut self.table_of_contents,
            PromptSlot::NumberedList => &mut self.numbered_list,
            PromptSlot::BasedOnData => &mut self.based_on_data,
            PromptSlot::SingleKeyword => &mut self.single_keyword,
        };
        *target = value;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        PromptSlot::ALL.iter().all(|s| self.get(*s).is_empty())
    }
}

/// Informational line shown in place of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoMessage {
    pub message: String,
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub raised_at: Instant,
}

#[derive(Debug, Clone)]
pub enum Action {
    SetLoading(bool),
    SetProfile(Option<Profile>),
    AuthRequired(String),
    SitesLoaded {
        sites: Vec<WebsiteEntry>,
        message: Option<String>,
    },
    SelectDomain(String),
    ReportLoaded(Vec<ReportRow>),
    PageIdsResolved(Vec<PageIdMapping>),
    SelectReport(ReportRow),
    CloseReport,
    PageFetched(WpPage),
    PromptGenerated {
        slot: PromptSlot,
        text: String,
    },
    ImagesGenerated(Vec<String>),
    StrategyLoaded(SeoStrategy),
    ShowMessage(Option<InfoMessage>),
    RaiseError {
        message: String,
        at: Instant,
    },
    DismissError,
    Tick(Instant),
}

/// Everything the dashboard shows, mutated only through [`AppState::apply`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub base_url: String,
    pub profile: Option<Profile>,
    pub auth_url: Option<String>,
    pub website_list: Vec<WebsiteEntry>,
    pub selected_domain: Option<String>,
    pub report_rows: Vec<ReportRow>,
    pub selected_report: Option<ReportRow>,
    pub current_page: Option<WpPage>,
    pub message: Option<InfoMessage>,
    pub error: Option<ErrorBanner>,
    pub loading: bool,
    pub prompts: PromptOutputs,
    pub images: Vec<String>,
    pub strategy: Option<SeoStrategy>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl AppState {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            profile: None,
            auth_url: None,
            website_list: Vec::new(),
            selected_domain: None,
            report_rows: Vec::new(),
            selected_report: None,
            current_page: None,
            message: Some(InfoMessage {
                message: INITIAL_MESSAGE.to_string(),
                status: true,
            }),
            error: None,
            loading: false,
            prompts: PromptOutputs::default(),
            images: Vec::new(),
            strategy: None,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetLoading(loading) => self.loading = loading,
            Action::SetProfile(profile) => {
                if profile.is_some() {
                    self.auth_url = None;
                }
                self.profile = profile;
            }
            Action::AuthRequired(url) => self.auth_url = Some(url),
            Action::SitesLoaded { sites, message } => {
                self.message = match message {
                    Some(message) if !message.is_empty() => Some(InfoMessage {
                        message,
                        status: sites.is_empty(),
                    }),
                    _ => None,
                };
                self.website_list = sites;
            }
            Action::SelectDomain(domain) => {
                self.selected_domain = Some(domain);
                self.reset_selection();
                self.report_rows.clear();
            }
            Action::ReportLoaded(rows) => {
                self.report_rows = rows;
                self.reset_selection();
            }
            Action::PageIdsResolved(mappings) => {
                attach_page_ids(&mut self.report_rows, &mappings);
            }
            Action::SelectReport(row) => {
                self.reset_selection();
                self.selected_report = Some(row);
            }
            Action::CloseReport => self.reset_selection(),
            Action::PageFetched(page) => self.current_page = Some(page),
            Action::PromptGenerated { slot, text } => self.prompts.set(slot, text),
            Action::ImagesGenerated(mut images) => {
                images.append(&mut self.images);
                self.images = images;
            }
            Action::StrategyLoaded(strategy) => self.strategy = Some(strategy),
            Action::ShowMessage(message) => self.message = message,
            Action::RaiseError { message, at } => {
                self.error = Some(ErrorBanner {
                    message,
                    raised_at: at,
                });
            }
            Action::DismissError => self.error = None,
            Action::Tick(now) => {
                if self.visible_error(now).is_none() {
                    self.error = None;
                }
            }
        }
    }

    fn reset_selection(&mut self) {
        self.selected_report = None;
        self.current_page = None;
        self.prompts.clear();
        self.images.clear();
        debug!("Selection reset, prompt outputs cleared");
    }

    /// The error banner text, unless it has been up for two seconds.
    pub fn visible_error(&self, now: Instant) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| now.saturating_duration_since(e.raised_at) < ERROR_BANNER_TTL)
            .map(|e| e.message.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.profile.is_some()
    }
}

/// Copy matched page ids onto report rows by page URL.
///
/// Rows without a match keep the id they had.
pub fn attach_page_ids(rows: &mut [ReportRow], mappings: &[PageIdMapping]) {
    for row in rows.iter_mut() {
        if let Some(mapping) = mappings.iter().find(|m| m.url == row.page_url) {
            row.id = Some(mapping.id.clone());
        }
    }
}
