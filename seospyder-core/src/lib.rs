pub mod audit;
pub mod countries;
pub mod error;
pub mod generate;
pub mod metrics;
pub mod prompt;
pub mod report;
pub mod session;
pub mod site;
pub mod state;

use colored::Colorize;

pub use error::{CoreError, Result};
pub use generate::{AiModel, Generated, Generator, PageContext};
pub use metrics::MetricCategory;
pub use prompt::{FragmentOptions, GeneratorKind};
pub use state::{Action, AppState, PromptSlot};

const BANNER: &str = r#"
    ╔════════════════════════════════════════════════════════╗
    ║                                                        ║
    ║     S  E  O     S  P  Y  D  E  R                       ║
    ║     ─────────────────────────────                      ║
    ║     metrics in, better pages out                       ║
    ║                                                        ║
    ╚════════════════════════════════════════════════════════╝"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_green().bold());
    println!(
        "    {} {}\n",
        "Search Console driven content for WordPress".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
