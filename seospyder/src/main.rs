use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use seospyder::Config;
use seospyder::handlers::{self, Dashboard};
use seospyder::logging::init_logging;
use seospyder_client::TaskScope;
use seospyder_core::print_banner;
use tracing::warn;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    if let Err(e) = run(&chosen_command, quiet).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let config = handlers::resolve_config(matches)?;
    init_logging(
        matches.get_one::<String>("log-level").map(String::as_str),
        &config.logging,
    )?;

    let scope = TaskScope::new();
    let _guard = scope.guard();
    let interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight requests");
            interrupt.cancel();
        }
    });

    let callback = handlers::spinner_callback("Talking to the backend...", !quiet);
    let client = handlers::build_client(&config, callback)?;
    let mut dashboard = Dashboard::new(client, scope, matches);

    match matches.subcommand() {
        Some(("login", args)) => {
            let config_path = Config::path_for(matches.get_one::<String>("config").map(String::as_str));
            handlers::handle_login(&mut dashboard, args, &config_path).await
        }
        Some(("profile", _)) => handlers::handle_profile(&mut dashboard).await,
        Some(("sites", _)) => handlers::handle_sites(&mut dashboard).await,
        Some(("report", args)) => handlers::handle_report(&mut dashboard, args).await,
        Some(("page", args)) => handlers::handle_page(&mut dashboard, args).await,
        Some(("wp-login", args)) => handlers::handle_wp_login(&mut dashboard, args).await,
        Some(("generate", args)) => handlers::handle_generate(&mut dashboard, args).await,
        Some(("data", args)) => handlers::handle_data(&mut dashboard, args).await,
        Some(("single", args)) => handlers::handle_single(&mut dashboard, args).await,
        Some(("images", args)) => handlers::handle_images(&mut dashboard, args).await,
        Some(("strategy", args)) => handlers::handle_strategy(&mut dashboard, args).await,
        Some(("audit", args)) => handlers::handle_audit(&dashboard, args),
        Some(("countries", args)) => handlers::handle_countries(&dashboard, args),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
