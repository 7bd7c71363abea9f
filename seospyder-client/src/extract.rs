// Text extraction from WordPress rendered HTML

use scraper::{ElementRef, Html, Node, Selector};

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Collect heading text from rendered page content.
///
/// Headings are grouped by level (all `h1` first, then `h2`, ...), each
/// trimmed and followed by `",\n"`; the whole string is trimmed at the end,
/// so the last heading keeps its trailing comma.
pub fn extract_headings(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut headings = String::new();

    for tag in HEADING_TAGS {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        for element in document.select(&selector) {
            let text: String = element.text().collect();
            headings.push_str(text.trim());
            headings.push_str(",\n");
        }
    }

    headings.trim().to_string()
}

/// Flatten rendered content to plain text, one block per line.
///
/// Script and style bodies are dropped; runs of whitespace inside a text
/// node collapse to a single space.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut lines = Vec::new();
    collect_text(document.root_element(), &mut lines);
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !collapsed.is_empty() {
                    lines.push(collapsed);
                }
            }
            Node::Element(el) if matches!(el.name(), "script" | "style") => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, lines);
                }
            }
            _ => {}
        }
    }
}
