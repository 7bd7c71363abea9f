// Website URL checks for the audit form and display helpers

use url::Url;

pub const INVALID_URL_MESSAGE: &str =
    "Please enter a valid website URL (e.g., example.com or https://example.com)";
pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid website URL";

fn with_scheme(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

/// Whether `input` names a plausible public website.
pub fn is_valid_site_url(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }
    match Url::parse(&with_scheme(trimmed)) {
        Ok(url) => match url.host_str() {
            Some(host) => host.len() >= 3 && host.contains('.'),
            None => false,
        },
        Err(_) => false,
    }
}

/// Validate and normalize a website URL, returning the message to show on
/// failure.
pub fn validate_site_url(input: &str) -> Result<Url, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EMPTY_URL_MESSAGE);
    }
    if !is_valid_site_url(trimmed) {
        return Err(INVALID_URL_MESSAGE);
    }
    Url::parse(&with_scheme(trimmed)).map_err(|_| INVALID_URL_MESSAGE)
}

/// Normalized form of `input`, or `input` verbatim when it cannot be parsed.
pub fn format_url_for_display(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    match Url::parse(&with_scheme(input.trim())) {
        Ok(url) => url.to_string(),
        Err(_) => input.to_string(),
    }
}

/// Search Console property URL without scheme and trailing slash.
pub fn display_domain(site_url: &str) -> &str {
    let stripped = site_url
        .strip_prefix("https://")
        .or_else(|| site_url.strip_prefix("http://"))
        .unwrap_or(site_url);
    stripped.strip_suffix('/').unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bare_domains() {
        assert!(is_valid_site_url("example.com"));
        assert!(is_valid_site_url("  https://blog.example.com/path "));
        assert!(is_valid_site_url("http://a.io"));
    }

    #[test]
    fn test_rejects_hosts_without_dot() {
        assert!(!is_valid_site_url("localhost"));
        assert!(!is_valid_site_url("ab"));
        assert!(!is_valid_site_url(""));
        assert!(!is_valid_site_url("https://"));
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(validate_site_url("   ").unwrap_err(), EMPTY_URL_MESSAGE);
        assert_eq!(validate_site_url("nodot").unwrap_err(), INVALID_URL_MESSAGE);
        assert_eq!(
            validate_site_url("example.com").unwrap().as_str(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_format_for_display() {
        assert_eq!(format_url_for_display("example.com"), "https://example.com/");
        assert_eq!(format_url_for_display(""), "");
        assert_eq!(format_url_for_display("http://[bad"), "http://[bad");
    }

    #[test]
    fn test_display_domain() {
        assert_eq!(display_domain("https://example.com/"), "example.com");
        assert_eq!(display_domain("http://example.com/blog/"), "example.com/blog");
        assert_eq!(display_domain("sc-domain:example.com"), "sc-domain:example.com");
    }
}
