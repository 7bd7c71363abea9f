use crate::CLAP_STYLING;
use clap::{arg, command};
use seospyder_core::metrics::MetricCategory;

fn domain_arg() -> clap::Arg {
    arg!(-d --"domain" <DOMAIN>)
        .required(true)
        .help("Search Console property, as listed by `sites`")
}

fn page_arg() -> clap::Arg {
    arg!(-u --"url" <URL>)
        .required(true)
        .help("Page URL from the property's report")
}

pub(crate) fn command_argument_builder() -> clap::Command {
    let categories: Vec<&'static str> = MetricCategory::ALL.iter().map(|c| c.id()).collect();

    clap::Command::new("seospyder")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("seospyder")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(--"config" <PATH>)
                .required(false)
                .global(true)
                .help("Config file (default: ~/.config/seospyder/config.toml)"),
        )
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .global(true)
                .help("Backend base URL, overrides config and SEOSPYDER_BASE_URL"),
        )
        .arg(
            arg!(--"xid" <SESSION_ID>)
                .required(false)
                .global(true)
                .help("Session id issued after Google sign-in, overrides config and SEOSPYDER_XID"),
        )
        .arg(
            arg!(--"log-level" <LEVEL>)
                .required(false)
                .global(true)
                .help("Override log level (trace/debug/info/warn/error)"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .global(true)
                .help("Output format: text, json, csv, markdown")
                .value_parser(["text", "json", "csv", "markdown"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .global(true)
                .help("Save output to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .subcommand_required(false)
        .subcommand(
            command!("login")
                .about("Start Google sign-in and print the URL to open")
                .arg(
                    arg!(--"advanced")
                        .required(false)
                        .help("Request Search Console and Analytics access")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"wait")
                        .required(false)
                        .help("Poll until the sign-in completes")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"payload" <JSON>)
                        .required(false)
                        .help("Message posted by the sign-in popup, e.g. '{\"xid\":\"...\"}'"),
                )
                .arg(
                    arg!(--"attempts" <COUNT>)
                        .required(false)
                        .help("Seconds to wait for sign-in with --wait")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("120"),
                ),
        )
        .subcommand(command!("profile").about("Show the signed-in Google profile"))
        .subcommand(command!("sites").about("List connected Search Console properties"))
        .subcommand(
            command!("report")
                .about("Per-page performance for a property")
                .arg(domain_arg()),
        )
        .subcommand(
            command!("page")
                .about("Fetch the WordPress page behind a report row")
                .arg(domain_arg())
                .arg(page_arg())
                .arg(
                    arg!(--"upload")
                        .required(false)
                        .help("Upload the page's plain text for the generators")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("wp-login")
                .about("Store WordPress application credentials for a property")
                .arg(domain_arg())
                .arg(arg!(-n --"name" <USERNAME>).required(true).help("WordPress username"))
                .arg(
                    arg!(-p --"password" <PASSWORD>)
                        .required(true)
                        .help("WordPress application password"),
                ),
        )
        .subcommand(
            command!("generate")
                .about("Generate FAQ, table, bullet, table of contents or numbered list content")
                .arg(
                    arg!(<KIND>)
                        .help("What to generate")
                        .value_parser(["faq", "table", "bullet", "toc", "numbered-list"]),
                )
                .arg(domain_arg())
                .arg(page_arg())
                .arg(
                    arg!(--"content")
                        .required(false)
                        .help("Include the article content")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"title")
                        .required(false)
                        .help("Include the article title")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"headings")
                        .required(false)
                        .help("Include the article headings")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-k --"keyword" <KEYWORD>)
                        .required(false)
                        .help("Focus keyword"),
                ),
        )
        .subcommand(
            command!("data")
                .about("Generate content driven by the page's Search Console metrics")
                .arg(
                    arg!(-c --"category" <CATEGORY>)
                        .required(true)
                        .help("Metric category")
                        .value_parser(categories),
                )
                .arg(domain_arg())
                .arg(page_arg()),
        )
        .subcommand(
            command!("single")
                .about("Rewrite the page around one focus keyword")
                .arg(arg!(-k --"keyword" <KEYWORD>).required(true).help("Focus keyword"))
                .arg(domain_arg())
                .arg(page_arg()),
        )
        .subcommand(
            command!("images")
                .about("Generate images for the page")
                .arg(domain_arg())
                .arg(page_arg())
                .arg(
                    arg!(-p --"prompt" <PROMPT>)
                        .required(true)
                        .help("What the images should show"),
                )
                .arg(
                    arg!(-m --"model" <MODEL>)
                        .required(false)
                        .help("Image model")
                        .value_parser(["gemini", "gpt"])
                        .default_value("gemini"),
                ),
        )
        .subcommand(
            command!("strategy")
                .about("Keyword research and an AI content strategy")
                .arg(arg!(-k --"keyword" <KEYWORD>).required(true).help("Keyword to research"))
                .arg(
                    arg!(-c --"country" <COUNTRY>)
                        .required(true)
                        .help("Country code or name, see `countries`"),
                ),
        )
        .subcommand(
            command!("audit")
                .about("Validate a site URL and render SEO audit results")
                .arg(arg!(<URL>).help("Website to audit"))
                .arg(
                    arg!(-r --"results" <FILE>)
                        .required(false)
                        .help("Audit results JSON to render")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("countries")
                .about("List countries available to `strategy`")
                .arg(arg!([FILTER]).help("Only names containing this text")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_consistent() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let matches = command_argument_builder()
            .try_get_matches_from([
                "seospyder", "generate", "faq", "--domain", "https://example.com/", "--url",
                "https://example.com/post", "--title", "-k", "rust",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        assert_eq!(sub.get_one::<String>("KIND").unwrap(), "faq");
        assert!(sub.get_flag("title"));
        assert!(!sub.get_flag("content"));
        assert_eq!(sub.get_one::<String>("keyword").unwrap(), "rust");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = command_argument_builder().try_get_matches_from([
            "seospyder", "data", "-c", "best", "-d", "x.com", "-u", "https://x.com/a",
        ]);
        assert!(result.is_err());
    }
}
