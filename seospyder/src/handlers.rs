use crate::config::Config;
use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use seospyder_client::extract::extract_headings;
use seospyder_client::models::PageIdMapping;
use seospyder_client::{ApiClient, AuthOutcome, LoadingCallback, PageFetch, ReportRow, TaskScope};
use seospyder_core::audit::AuditReport;
use seospyder_core::countries;
use seospyder_core::generate::{AiModel, Generated, Generator, PageContext};
use seospyder_core::metrics::MetricCategory;
use seospyder_core::prompt::{FragmentOptions, GeneratorKind};
use seospyder_core::report::{self, ReportFormat};
use seospyder_core::session::{self, POLL_INTERVAL, PopupMessage};
use seospyder_core::site;
use seospyder_core::state::{Action, AppState, InfoMessage};
use seospyder_core::CoreError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Spinner shown while any request is in flight.
///
/// Overlapping requests share one spinner; it clears when the last one
/// finishes.
pub fn spinner_callback(message: &str, enabled: bool) -> LoadingCallback {
    let message = message.to_string();
    let active: Arc<Mutex<(usize, Option<ProgressBar>)>> = Arc::new(Mutex::new((0, None)));
    Arc::new(move |loading: bool| {
        let Ok(mut guard) = active.lock() else {
            return;
        };
        let (ref mut depth, ref mut bar) = *guard;
        if loading {
            *depth += 1;
            if *depth == 1 && enabled {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.enable_steady_tick(Duration::from_millis(100));
                pb.set_message(message.clone());
                *bar = Some(pb);
            }
        } else {
            *depth = depth.saturating_sub(1);
            if *depth == 0
                && let Some(pb) = bar.take()
            {
                pb.finish_and_clear();
            }
        }
    })
}

/// Resolve configuration: flag > environment > file > defaults.
pub fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::locate(matches.get_one::<String>("config").map(String::as_str))?;
    config.drop_expired_session(Utc::now());
    config.apply_env(|key| std::env::var(key).ok());
    config.apply_overrides(
        matches.get_one::<String>("base-url").map(String::as_str),
        matches.get_one::<String>("xid").map(String::as_str),
    );
    Ok(config)
}

pub fn build_client(config: &Config, callback: LoadingCallback) -> Result<ApiClient> {
    let mut client = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)
        .with_context(|| format!("--base-url: cannot use {}", config.backend.base_url))?
        .with_loading_callback(callback);
    if let Some(ref xid) = config.session.xid {
        client = client.with_session_cookie(xid.clone());
    }
    Ok(client)
}

/// One CLI invocation: the store, the workflows, and where output goes.
pub struct Dashboard {
    pub state: AppState,
    pub generator: Generator,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
}

impl Dashboard {
    pub fn new(client: ApiClient, scope: TaskScope, matches: &ArgMatches) -> Self {
        let format = matches
            .get_one::<String>("format")
            .and_then(|f| ReportFormat::from_str(f))
            .unwrap_or_default();
        Self {
            state: AppState::new(client.base_url()),
            generator: Generator::new(client, scope),
            format,
            output: matches.get_one::<PathBuf>("output").cloned(),
        }
    }

    fn client(&self) -> &ApiClient {
        self.generator.client()
    }

    /// Send `xid` as the session cookie from now on.
    pub fn use_session(&mut self, xid: &str) {
        let client = self.client().clone().with_session_cookie(xid);
        self.generator = Generator::new(client, self.generator.scope().clone());
    }

    fn emit(&self, content: &str) -> Result<()> {
        match self.output {
            Some(ref path) => {
                report::save_report(content, path)
                    .with_context(|| format!("--output: cannot write {}", path.display()))?;
                print_success(&format!("Saved to {}", path.display()));
            }
            None => print!("{}", content),
        }
        Ok(())
    }

    fn auth_required(&mut self, auth_url: String) {
        println!("{}", "Sign-in required".yellow().bold());
        println!("Open this URL in your browser:");
        println!("  {}", auth_url.bright_white());
        self.state.apply(Action::AuthRequired(auth_url));
    }

    /// Record a failure in the store and return the banner text.
    ///
    /// The banner is printed once by the caller, so it is dismissed here.
    fn raise(&mut self, message: &str) -> String {
        let now = Instant::now();
        self.state.apply(Action::RaiseError {
            message: message.to_string(),
            at: now,
        });
        let banner = self
            .state
            .visible_error(now)
            .unwrap_or(message)
            .to_string();
        self.state.apply(Action::DismissError);
        banner
    }

    /// Report rows, selection and WordPress page for one page URL.
    async fn open_page(&mut self, domain: &str, url: &str) -> Result<PageContext> {
        let rows = match self.generator.fetch_report(domain).await? {
            AuthOutcome::Ready(rows) => rows,
            AuthOutcome::AuthRequired { auth_url } => {
                self.auth_required(auth_url);
                bail!("Sign in with `seospyder login --advanced` first");
            }
        };
        self.state.apply(Action::SelectDomain(domain.to_string()));
        self.state.apply(Action::ReportLoaded(rows));

        let mut row = self
            .state
            .report_rows
            .iter()
            .find(|r| r.page_url == url || r.link.as_deref() == Some(url))
            .cloned()
            .unwrap_or_else(|| {
                debug!("{} not in the report, using it as given", url);
                ReportRow {
                    page_url: url.to_string(),
                    ..Default::default()
                }
            });

        let fetch = self.generator.resolve_page(domain, &mut row).await?;
        if let Some(ref id) = row.id {
            self.state.apply(Action::PageIdsResolved(vec![PageIdMapping {
                url: row.page_url.clone(),
                id: id.clone(),
            }]));
        }
        self.state.apply(Action::SelectReport(row.clone()));
        match fetch {
            PageFetch::Page(page) => {
                self.state.apply(Action::PageFetched((*page).clone()));
                Ok(PageContext::new(domain, row, *page))
            }
            PageFetch::CredentialsRequired { message } => {
                if let Some(message) = message {
                    print_info(&message);
                }
                Err(CoreError::CredentialsRequired(format!(
                    "run `seospyder wp-login --domain {} --name <USERNAME> --password <PASSWORD>`",
                    domain
                ))
                .into())
            }
        }
    }

    fn show_generated(&mut self, generated: Generated) -> Result<()> {
        let slot = generated.slot;
        self.state.apply(generated.into_action());
        let text = self.state.prompts.get(slot).to_string();
        if text.is_empty() {
            print_info("The backend returned no content.");
            return Ok(());
        }
        self.emit(&format!("{}\n", text))
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("--{} is required", name))
}

/// Apply the message the sign-in popup posted back.
///
/// A session id becomes the client's cookie and is stored, with its expiry,
/// in the config file at `config_path`.
pub fn apply_popup_payload(
    dashboard: &mut Dashboard,
    raw: &str,
    config_path: &Path,
) -> Result<PopupMessage> {
    let payload: Value = serde_json::from_str(raw).context("--payload: not valid JSON")?;
    let message = PopupMessage::parse(&payload)
        .ok_or_else(|| anyhow!("--payload: expected {{\"xid\": \"...\"}} or {{\"xindex\": 0}}"))?;

    if let PopupMessage::SessionId(ref xid) = message {
        dashboard.use_session(xid);
        let mut stored = if config_path.exists() {
            Config::load(config_path)?
        } else {
            Config::default()
        };
        stored.store_session(xid, Utc::now());
        stored.save(config_path)?;
        print_success(&format!("Session saved to {}", config_path.display()));
    }
    Ok(message)
}

async fn finish_sign_in(dashboard: &mut Dashboard, attempts: u32) -> Result<()> {
    let profile = session::wait_for_profile(
        dashboard.client(),
        dashboard.generator.scope(),
        attempts,
        POLL_INTERVAL,
    )
    .await?;
    match profile {
        Some(profile) => {
            print_success(&format!("Signed in as {}", profile.name.bright_white()));
            dashboard.state.apply(Action::SetProfile(Some(profile)));
            Ok(())
        }
        None => bail!("Sign-in did not complete after {} profile checks", attempts),
    }
}

pub async fn handle_login(
    dashboard: &mut Dashboard,
    args: &ArgMatches,
    config_path: &Path,
) -> Result<()> {
    let attempts = args.get_one::<u32>("attempts").copied().unwrap_or(120);
    let wait = args.get_flag("wait");

    if let Some(raw) = args.get_one::<String>("payload") {
        apply_popup_payload(dashboard, raw, config_path)?;
        return finish_sign_in(dashboard, if wait { attempts } else { 1 }).await;
    }

    let outcome = if args.get_flag("advanced") {
        dashboard.client().advance_login().await?
    } else {
        dashboard.client().login().await?
    };

    match outcome {
        AuthOutcome::AuthRequired { auth_url } => dashboard.auth_required(auth_url),
        AuthOutcome::Ready(()) => {
            print_success("Already signed in");
            return Ok(());
        }
    }

    if !wait {
        print_info("After signing in, run `seospyder login --payload '<popup message>'` to keep the session.");
        return Ok(());
    }
    finish_sign_in(dashboard, attempts).await
}

pub async fn handle_profile(dashboard: &mut Dashboard) -> Result<()> {
    match dashboard.client().profile().await? {
        AuthOutcome::Ready(Some(profile)) => {
            print_divider();
            println!("  {}", profile.name.bright_white().bold());
            if !profile.picture.is_empty() {
                println!("  {}", profile.picture);
            }
            print_divider();
            dashboard.state.apply(Action::SetProfile(Some(profile)));
        }
        AuthOutcome::Ready(None) => print_info("Not signed in. Run `seospyder login`."),
        AuthOutcome::AuthRequired { auth_url } => dashboard.auth_required(auth_url),
    }
    Ok(())
}

pub async fn handle_sites(dashboard: &mut Dashboard) -> Result<()> {
    let list = match dashboard.client().google_data().await? {
        AuthOutcome::Ready(list) => list,
        AuthOutcome::AuthRequired { auth_url } => {
            dashboard.auth_required(auth_url);
            return Ok(());
        }
    };
    dashboard.state.apply(Action::SitesLoaded {
        sites: list.sites,
        message: list.message,
    });

    if let Some(ref message) = dashboard.state.message {
        print_info(&message.message);
    }
    if dashboard.state.website_list.is_empty() {
        return Ok(());
    }
    let rendered = report::render_sites(&dashboard.state.website_list, dashboard.format)?;
    dashboard.emit(&rendered)
}

pub async fn handle_report(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let domain = required(args, "domain")?;
    match dashboard.generator.fetch_report(domain).await? {
        AuthOutcome::Ready(rows) => {
            dashboard.state.apply(Action::SelectDomain(domain.to_string()));
            dashboard.state.apply(Action::ReportLoaded(rows));
        }
        AuthOutcome::AuthRequired { auth_url } => {
            dashboard.auth_required(auth_url);
            return Ok(());
        }
    }
    if dashboard.state.report_rows.is_empty() {
        dashboard.state.apply(Action::ShowMessage(Some(InfoMessage {
            message: format!("No Search Console data for {} yet.", site::display_domain(domain)),
            status: true,
        })));
        if let Some(ref message) = dashboard.state.message {
            print_info(&message.message);
        }
        return Ok(());
    }
    let rendered = report::render_rows(domain, &dashboard.state.report_rows, dashboard.format)?;
    dashboard.emit(&rendered)
}

pub async fn handle_page(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let domain = required(args, "domain")?;
    let url = required(args, "url")?;
    let ctx = dashboard.open_page(domain, url).await?;

    print_divider();
    println!("  {}", ctx.page.title().bright_white().bold());
    print_divider();
    println!("{} {}", "Link:".blue(), ctx.page.link);
    println!("{} {}", "Page id:".blue(), ctx.page_id());
    let headings = extract_headings(ctx.page.content_html());
    if !headings.is_empty() {
        println!("{}", "Headings:".blue());
        for line in headings.lines() {
            println!("  {}", line);
        }
    }

    if args.get_flag("upload") {
        dashboard
            .generator
            .upload_page_text(ctx.page_id(), &ctx.page)
            .await?;
        print_success("Page text uploaded");
    }
    Ok(())
}

pub async fn handle_wp_login(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let domain = required(args, "domain")?;
    let name = required(args, "name")?;
    let password = required(args, "password")?;

    let reply = dashboard.client().wordpress_login(name, password, domain).await?;
    if reply.success {
        print_success(&reply.message.unwrap_or_else(|| "WordPress credentials saved".to_string()));
        Ok(())
    } else {
        let message = reply
            .message
            .unwrap_or_else(|| "WordPress rejected the credentials".to_string());
        bail!(dashboard.raise(&message))
    }
}

pub async fn handle_generate(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let kind_arg = required(args, "KIND")?;
    let kind = GeneratorKind::from_str(kind_arg)
        .filter(|k| k.template().is_some())
        .ok_or_else(|| anyhow!("KIND: unsupported generator '{}'", kind_arg))?;
    let options = FragmentOptions {
        article_content: args.get_flag("content"),
        article_title: args.get_flag("title"),
        headings: args.get_flag("headings"),
        focused_keyword: None,
    }
    .with_focused_keyword(args.get_one::<String>("keyword").cloned());

    let domain = required(args, "domain")?;
    let url = required(args, "url")?;
    let ctx = dashboard.open_page(domain, url).await?;
    let generated = dashboard.generator.run(kind, &ctx, &options).await?;
    dashboard.show_generated(generated)
}

pub async fn handle_data(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let category_arg = required(args, "category")?;
    let category = MetricCategory::from_str(category_arg)
        .ok_or_else(|| anyhow!("--category: unknown category '{}'", category_arg))?;
    let domain = required(args, "domain")?;
    let url = required(args, "url")?;

    let ctx = dashboard.open_page(domain, url).await?;
    let generated = dashboard.generator.run_data(category, &ctx).await?;
    dashboard.show_generated(generated)
}

pub async fn handle_single(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let keyword = required(args, "keyword")?;
    let domain = required(args, "domain")?;
    let url = required(args, "url")?;

    let ctx = dashboard.open_page(domain, url).await?;
    let generated = dashboard.generator.run_single(keyword, &ctx).await?;
    dashboard.show_generated(generated)
}

pub async fn handle_images(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let prompt = required(args, "prompt")?;
    let model_arg = args.get_one::<String>("model").map(String::as_str).unwrap_or("gemini");
    let model = AiModel::from_str(model_arg)
        .ok_or_else(|| anyhow!("--model: unknown model '{}'", model_arg))?;
    let domain = required(args, "domain")?;
    let url = required(args, "url")?;

    let ctx = dashboard.open_page(domain, url).await?;
    match dashboard.generator.generate_images(prompt, &ctx, model).await {
        Ok(images) => {
            dashboard.state.apply(Action::ImagesGenerated(images));
            let listing: String = dashboard
                .state
                .images
                .iter()
                .map(|img| format!("{}\n", img))
                .collect();
            dashboard.emit(&listing)
        }
        Err(CoreError::Empty(message)) => {
            print_info(&dashboard.raise(&message));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn handle_strategy(dashboard: &mut Dashboard, args: &ArgMatches) -> Result<()> {
    let keyword = required(args, "keyword")?;
    let country_arg = required(args, "country")?;
    let country = countries::find(country_arg);
    if country.is_none() {
        bail!("--country: unknown country '{}', see `seospyder countries`", country_arg);
    }

    let strategy = match dashboard.generator.search_strategy(keyword, country).await {
        Ok(strategy) => strategy,
        Err(CoreError::Validation(message)) => bail!(message),
        Err(e) => {
            debug!("Strategy search failed: {}", e);
            bail!(dashboard.raise("Failed to fetch SEO strategy. Please try again."))
        }
    };

    match strategy {
        Some(strategy) => {
            let rendered = report::render_strategy(keyword, &strategy, dashboard.format)?;
            dashboard.state.apply(Action::StrategyLoaded(strategy));
            dashboard.emit(&rendered)
        }
        None => {
            print_info(&format!("No strategy returned for '{}'", keyword));
            Ok(())
        }
    }
}

pub fn handle_audit(dashboard: &Dashboard, args: &ArgMatches) -> Result<()> {
    let url = required(args, "URL")?;
    let target = site::validate_site_url(url).map_err(|msg| anyhow!("URL: {}", msg))?;
    println!("{} {}", "Audit target:".blue(), site::format_url_for_display(url));

    let Some(path) = args.get_one::<PathBuf>("results") else {
        print_info("No audit results supplied; pass --results FILE to render them.");
        return Ok(());
    };
    let audit = AuditReport::load(path).with_context(|| format!("--results: {}", path.display()))?;
    if audit.url.trim_end_matches('/') != target.as_str().trim_end_matches('/') {
        debug!("Audit results are for {}, not {}", audit.url, target);
    }
    let rendered = report::render_audit(&audit, dashboard.format)?;
    dashboard.emit(&rendered)
}

pub fn handle_countries(dashboard: &Dashboard, args: &ArgMatches) -> Result<()> {
    let filter = args.get_one::<String>("FILTER").map(String::as_str).unwrap_or("");
    let hits = countries::search(filter);
    let rendered = report::render_countries(&hits, dashboard.format)?;
    dashboard.emit(&rendered)
}
