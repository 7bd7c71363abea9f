// Prompt composition for the content generators

use crate::metrics::{self, MetricCategory};
use crate::state::PromptSlot;
use seospyder_client::extract::extract_headings;
use seospyder_client::models::{MetricRow, WpPage};
use serde::{Deserialize, Serialize};

/// Character cap for article content spliced into fragment prompts.
pub const CONTENT_CAP: usize = 30_000;
/// Character cap for the article description in data-driven prompts.
pub const DATA_CONTENT_CAP: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    Faq,
    Table,
    Bullet,
    TableOfContents,
    NumberedList,
    DataBased,
    SingleKeyword,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 7] = [
        GeneratorKind::Faq,
        GeneratorKind::Table,
        GeneratorKind::Bullet,
        GeneratorKind::TableOfContents,
        GeneratorKind::NumberedList,
        GeneratorKind::DataBased,
        GeneratorKind::SingleKeyword,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            GeneratorKind::Faq => "faq",
            GeneratorKind::Table => "table",
            GeneratorKind::Bullet => "bullet",
            GeneratorKind::TableOfContents => "toc",
            GeneratorKind::NumberedList => "numbered-list",
            GeneratorKind::DataBased => "data",
            GeneratorKind::SingleKeyword => "single-keyword",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GeneratorKind::Faq => "FAQ",
            GeneratorKind::Table => "Table",
            GeneratorKind::Bullet => "Bullet Points",
            GeneratorKind::TableOfContents => "Table of Contents",
            GeneratorKind::NumberedList => "Numbered List",
            GeneratorKind::DataBased => "Based on Data",
            GeneratorKind::SingleKeyword => "Single Focused Keyword",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        match needle.as_str() {
            "table-of-contents" | "tableofcontents" => return Some(GeneratorKind::TableOfContents),
            "numbered" | "numberedlist" | "list" => return Some(GeneratorKind::NumberedList),
            "single" => return Some(GeneratorKind::SingleKeyword),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|k| k.id() == needle || k.label().to_lowercase() == needle)
    }

    pub fn slot(&self) -> PromptSlot {
        match self {
            GeneratorKind::Faq => PromptSlot::Faq,
            GeneratorKind::Table => PromptSlot::Table,
            GeneratorKind::Bullet => PromptSlot::Bullet,
            GeneratorKind::TableOfContents => PromptSlot::TableOfContents,
            GeneratorKind::NumberedList => PromptSlot::NumberedList,
            GeneratorKind::DataBased => PromptSlot::BasedOnData,
            GeneratorKind::SingleKeyword => PromptSlot::SingleKeyword,
        }
    }

    /// Template for the fragment-driven generators; `None` for the data and
    /// single-keyword variants, which have their own composers.
    pub fn template(&self) -> Option<&'static PromptTemplate> {
        match self {
            GeneratorKind::Faq => Some(&FAQ_TEMPLATE),
            GeneratorKind::Table => Some(&TABLE_TEMPLATE),
            GeneratorKind::Bullet => Some(&BULLET_TEMPLATE),
            GeneratorKind::TableOfContents => Some(&TOC_TEMPLATE),
            GeneratorKind::NumberedList => Some(&NUMBERED_LIST_TEMPLATE),
            GeneratorKind::DataBased | GeneratorKind::SingleKeyword => None,
        }
    }
}

/// One fragment-driven generator: the instruction text around the topic
/// line and how much article content it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub preamble: &'static str,
    pub topic_label: &'static str,
    pub closing: &'static str,
    pub content_cap: usize,
}

pub const FAQ_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: concat!(
        "You are an SEO content strategist. When enriching the content, avoid referencing source links or related sources as tooltips, ",
        "and ensure all information is unique and not reused from other websites. ",
        "Based on the content of the following blog post, generate a set of frequently asked questions (FAQs) along with their answers. ",
        "Your goal is to enhance the SEO value of the post by addressing real user queries related to the topic. ",
        "Guidelines: 1. Extract relevant, natural-sounding questions that readers may search on Google. ",
        "2. Provide concise and informative answers in a tone that matches the original article. ",
        "3. Include at least 4–6 FAQs covering a mix of beginner and advanced-level concerns. ",
        "4. Use keywords from the article context where appropriate without stuffing. ",
        "5. Ensure each FAQ can be directly inserted into the blog post as a standalone section."
    ),
    topic_label: "Assume this is the blog's title: ",
    closing: " . Generate only the new FAQ content that can be added to the existing article.",
    content_cap: CONTENT_CAP,
};

pub const TABLE_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: concat!(
        "You are an expert in content formatting and SEO. Present the resulting table in HTML format. ",
        "Also, avoid referencing source links, related sources as tooltips, or reusing content from other sites; ",
        "ensure the information is unique and original. ",
        "Based on the article provided, generate one or more SEO-optimized tables that summarize key points, comparisons, ",
        "or structured data relevant to the blog content. ",
        "Guidelines: 1. Tables should add value—use them for comparisons, summaries, data highlights, checklists, etc. ",
        "2. Make the headings clear and aligned with the blog's topic. ",
        "3. Use concise rows and columns that improve readability and visual clarity. ",
        "4. Format tables as markdown or HTML, ready for insertion into a CMS. ",
        "5. Match the tone and theme of the original article."
    ),
    topic_label: "Topic of the blog: ",
    closing: ", Only generate tables that would meaningfully enhance this article for both users and search engines.",
    content_cap: CONTENT_CAP,
};

pub const BULLET_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: concat!(
        "You are an SEO content enhancer. When enriching the content, avoid referencing source links or related sources as tooltips, ",
        "and ensure all information is unique and not reused from other websites. ",
        "Review the article and extract or generate relevant content that can be converted into clear, well-structured bullet points. ",
        "Guidelines: 1. Focus on key insights, benefits, features, or steps discussed in the article. ",
        "2. Bullet points should be short, scannable, and keyword-rich. ",
        "3. Use natural language and active voice. ",
        "4. Avoid repeating full paragraphs—summarize or simplify for easier reading. ",
        "5. Ensure the bullet points could be inserted under existing subheadings or used as a quick summary section."
    ),
    topic_label: "Topic of the blog: title: ",
    closing: ". Output only new bullet point content that enhances the blog post.",
    content_cap: CONTENT_CAP,
};

pub const TOC_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: concat!(
        "You are a content structure expert. Present the resulting table in HTML format. ",
        "Also, avoid referencing source links, related sources as tooltips, or reusing content from other sites; ",
        "ensure the information is unique and original. ",
        "Based on the article, generate a clean, SEO-friendly table of contents (TOC) that outlines all major headings and sections. ",
        "Guidelines: 1. The TOC should reflect the actual structure of the article (including any new content). ",
        "2. Use anchor-style section headings (e.g., Introduction, Benefits of X, How to Use X, FAQs). ",
        "3. Each item should be short and descriptive. ",
        "4. The TOC should improve reader navigation and help with featured snippet eligibility. ",
        "5. Match the order and tone of the article's sections."
    ),
    topic_label: "Topic of the blog: title : ",
    closing: ". Return only the new Table of Contents to be added at the beginning of the blog.",
    content_cap: CONTENT_CAP,
};

pub const NUMBERED_LIST_TEMPLATE: PromptTemplate = PromptTemplate {
    preamble: concat!(
        "You are an SEO content specialist. When enriching the content, avoid referencing source links or related sources as tooltips, ",
        "and ensure all information is unique and not reused from other websites. ",
        "Based on the article content, generate one or more informative numbered lists that provide step-by-step guides, ",
        "ordered tips, or ranked information relevant to the blog's subject. ",
        "Guidelines: 1. Focus on processes, steps, tips, or stages mentioned in the article. ",
        "2. Numbered lists must have a logical order. ",
        "3. Use concise, direct language in each item. ",
        "4. Lists should contain at least 5–7 points, or more if relevant. ",
        "5. Ensure the tone and format match the article for seamless insertion."
    ),
    topic_label: "Topic of the blog: title: ",
    closing: ". Return only the new numbered list content that should be added to the blog.",
    content_cap: CONTENT_CAP,
};

const DATA_PREAMBLE: &str = concat!(
    "You are an expert SEO content strategist. When enriching the content, avoid referencing source links or related sources as tooltips, ",
    "and ensure all information is unique and not reused from other websites. ",
    "You will be given structured data and a blog article. ",
    "Your task is to generate new, additional content to improve the article's performance in search rankings based on the provided SEO insights. ",
    "Use the following data for optimization: - Optimization Focus: "
);

const DATA_INSTRUCTIONS: &str = concat!(
    ". Do not rewrite the existing article. ",
    "Instead, generate new sections or content blocks that can be inserted into the article to improve SEO for the given focus. ",
    "Your output must: 1. Expand on the blog's topic naturally without repeating existing content. ",
    "2. Integrate the provided SEO elements (keywords, locations, queries, etc.) seamlessly. ",
    "3. Match the tone, structure, and style of the original blog article. ",
    "4. Use relevant subheadings if needed, short paragraphs, and clear language. ",
    "5. Only output the new content that should be inserted into the blog—do not summarize or rewrite the full article. ",
    "Assume the original article was about: "
);

const DATA_CLOSING: &str =
    "Now write additional blog content that enhances the article for the given SEO focus.";

/// Which optional context goes into a fragment prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentOptions {
    pub article_content: bool,
    pub article_title: bool,
    pub headings: bool,
    pub focused_keyword: Option<String>,
}

impl FragmentOptions {
    /// Clearing the keyword box and unticking it are the same thing.
    pub fn with_focused_keyword(mut self, keyword: Option<String>) -> Self {
        self.focused_keyword = keyword.filter(|k| !k.is_empty());
        self
    }
}

/// First `cap` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, cap: usize) -> &str {
    match s.char_indices().nth(cap) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Context fragments in the order they are spliced into the prompt.
pub fn fragments(page: &WpPage, options: &FragmentOptions, content_cap: usize) -> Vec<String> {
    let mut selected = Vec::new();

    if options.article_content {
        selected.push("article content".to_string());
    }
    if options.article_title {
        selected.push(format!("article title:{{{}}}", page.title()));
    }
    if options.headings {
        let headings = extract_headings(page.content_html());
        selected.push(format!("headings :{{{}}},", headings));
    }
    if let Some(keyword) = options.focused_keyword.as_deref().filter(|k| !k.is_empty()) {
        selected.push(format!("focused keyword: {}", keyword));
    }
    if options.article_content {
        selected.push(format!(
            "article content: {}",
            truncate_chars(page.content_html(), content_cap)
        ));
    }

    selected
}

pub fn compose_with(template: &PromptTemplate, page: &WpPage, options: &FragmentOptions) -> String {
    let fragments = fragments(page, options, template.content_cap);
    format!(
        "{} {}{}, {}{}",
        template.preamble,
        template.topic_label,
        page.title(),
        fragments.join(", "),
        template.closing
    )
}

/// Prompt for one of the fragment-driven generators.
///
/// Returns `None` for [`GeneratorKind::DataBased`] and
/// [`GeneratorKind::SingleKeyword`].
pub fn compose(kind: GeneratorKind, page: &WpPage, options: &FragmentOptions) -> Option<String> {
    kind.template().map(|t| compose_with(t, page, options))
}

pub fn compose_single_keyword(keyword: &str) -> String {
    format!(
        "Optimize the existing content by focusing on this keyword: {{{}}}. Then provide me the entire updated content.",
        keyword
    )
}

fn article_description(page: &WpPage) -> String {
    if page.title().is_empty() {
        format!(
            "page content : {}",
            truncate_chars(page.content_html(), DATA_CONTENT_CAP)
        )
    } else {
        format!("title : {}", page.title())
    }
}

/// Prompt for the data-driven generator, from rows already picked by
/// [`metrics::select`].
pub fn compose_data_prompt(category: MetricCategory, rows: &[MetricRow], page: &WpPage) -> String {
    let (focus, separator) = match category {
        MetricCategory::TopLocation | MetricCategory::LowCtrLocation => (
            format!("Locations - Data Insights: {}", metrics::simple_terms(rows)),
            ". ",
        ),
        MetricCategory::TopKeywords | MetricCategory::LsiKeywords => (
            format!("Keywords - Data Insights: {}", metrics::simple_terms(rows)),
            " . ",
        ),
        MetricCategory::HighCtrKeywords | MetricCategory::LowCtrKeywords => (
            format!(
                "CTR - Target Elements: High CTR, Low CTR - Data Insights: Keywords,clicks and impressions -{}",
                metrics::ctr_lines(rows)
            ),
            ". ",
        ),
        MetricCategory::Position5To10Keywords | MetricCategory::Position10To20Keywords => (
            format!("Position - Data Insights: {}", metrics::simple_terms(rows)),
            ". ",
        ),
    };

    format!(
        "{}{}{}{}{}{}",
        DATA_PREAMBLE,
        focus,
        DATA_INSTRUCTIONS,
        article_description(page),
        separator,
        DATA_CLOSING
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use seospyder_client::models::Rendered;

    fn page(title: &str, content: &str) -> WpPage {
        WpPage {
            id: Some("7".to_string()),
            link: "https://example.com/post".to_string(),
            title: Rendered {
                rendered: title.to_string(),
            },
            content: Rendered {
                rendered: content.to_string(),
            },
        }
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_fragment_order() {
        let p = page("Rust Tips", "<h2>Intro</h2><p>Body</p>");
        let options = FragmentOptions {
            article_content: true,
            article_title: true,
            headings: true,
            focused_keyword: Some("borrow checker".to_string()),
        };
        let parts = fragments(&p, &options, CONTENT_CAP);
        assert_eq!(
            parts,
            vec![
                "article content".to_string(),
                "article title:{Rust Tips}".to_string(),
                "headings :{Intro,},".to_string(),
                "focused keyword: borrow checker".to_string(),
                "article content: <h2>Intro</h2><p>Body</p>".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_keyword_is_ignored() {
        let options = FragmentOptions::default().with_focused_keyword(Some(String::new()));
        assert_eq!(options.focused_keyword, None);
        assert!(fragments(&page("T", ""), &options, CONTENT_CAP).is_empty());
    }

    #[test]
    fn test_bullet_prompt_shape() {
        let p = page("Rust Tips", "");
        let options = FragmentOptions {
            article_title: true,
            ..Default::default()
        };
        let prompt = compose(GeneratorKind::Bullet, &p, &options).unwrap();
        assert!(prompt.starts_with("You are an SEO content enhancer."));
        assert!(prompt.ends_with(
            "Topic of the blog: title: Rust Tips, article title:{Rust Tips}. Output only new bullet point content that enhances the blog post."
        ));
    }

    #[test]
    fn test_content_is_capped() {
        let long = "x".repeat(CONTENT_CAP + 500);
        let p = page("T", &long);
        let options = FragmentOptions {
            article_content: true,
            ..Default::default()
        };
        let prompt = compose(GeneratorKind::Faq, &p, &options).unwrap();
        let expected = format!("article content: {} .", "x".repeat(CONTENT_CAP));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"x".repeat(CONTENT_CAP + 1)));
    }

    #[test]
    fn test_data_and_single_have_no_template() {
        let p = page("T", "");
        assert!(compose(GeneratorKind::DataBased, &p, &FragmentOptions::default()).is_none());
        assert!(compose(GeneratorKind::SingleKeyword, &p, &FragmentOptions::default()).is_none());
    }

    #[test]
    fn test_single_keyword_prompt() {
        assert_eq!(
            compose_single_keyword("rust"),
            "Optimize the existing content by focusing on this keyword: {rust}. Then provide me the entire updated content."
        );
    }

    #[test]
    fn test_data_prompt_uses_content_without_title() {
        let long = "y".repeat(DATA_CONTENT_CAP + 10);
        let p = page("", &long);
        let prompt = compose_data_prompt(MetricCategory::TopKeywords, &[], &p);
        let expected = format!("page content : {} . Now write", "y".repeat(DATA_CONTENT_CAP));
        assert!(prompt.contains(&expected));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(GeneratorKind::from_str("faq"), Some(GeneratorKind::Faq));
        assert_eq!(GeneratorKind::from_str("TOC"), Some(GeneratorKind::TableOfContents));
        assert_eq!(
            GeneratorKind::from_str("numbered-list"),
            Some(GeneratorKind::NumberedList)
        );
        assert_eq!(GeneratorKind::from_str("poem"), None);
    }
}
