//! Text filter pipeline for block attribute values.
//!
//! Two formats reach the renderers:
//! - plain strings (titles, labels, captions): HTML-escaped
//! - rich text (`richtext` attributes): Markdown rendered to HTML, then
//!   sanitized with ammonia

/// A single text transformation step.
pub trait TextFilter: Send + Sync {
    /// Filter name for debugging.
    fn name(&self) -> &str;

    fn process(&self, input: &str) -> String;
}

/// Filters applied in sequence.
pub struct FilterPipeline {
    filters: Vec<Box<dyn TextFilter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn add<F: TextFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Escape everything; newlines become `<br>`.
    pub fn plain_text() -> Self {
        Self::new().add(HtmlEscapeFilter).add(NewlineFilter)
    }

    /// Markdown to sanitized HTML.
    pub fn rich_text() -> Self {
        Self::new().add(MarkdownFilter::new()).add(SanitizeFilter)
    }

    pub fn process(&self, input: &str) -> String {
        self.filters
            .iter()
            .fold(input.to_string(), |acc, filter| filter.process(&acc))
    }

    /// Names of the filters in application order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::plain_text()
    }
}

/// Escape the five HTML-significant characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render a rich-text attribute to safe HTML.
pub fn rich_text(input: &str) -> String {
    FilterPipeline::rich_text().process(input)
}

pub struct HtmlEscapeFilter;

impl TextFilter for HtmlEscapeFilter {
    fn name(&self) -> &str {
        "html_escape"
    }

    fn process(&self, input: &str) -> String {
        html_escape(input)
    }
}

pub struct NewlineFilter;

impl TextFilter for NewlineFilter {
    fn name(&self) -> &str {
        "newline"
    }

    fn process(&self, input: &str) -> String {
        input.replace('\n', "<br>\n")
    }
}

/// CommonMark with tables and strikethrough.
pub struct MarkdownFilter {
    options: pulldown_cmark::Options,
}

impl MarkdownFilter {
    pub fn new() -> Self {
        let mut options = pulldown_cmark::Options::empty();
        options.insert(pulldown_cmark::Options::ENABLE_TABLES);
        options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
        Self { options }
    }
}

impl Default for MarkdownFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFilter for MarkdownFilter {
    fn name(&self) -> &str {
        "markdown"
    }

    fn process(&self, input: &str) -> String {
        let parser = pulldown_cmark::Parser::new_ext(input, self.options);
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, parser);
        html
    }
}

/// Strips dangerous tags and attributes, keeping basic formatting.
pub struct SanitizeFilter;

impl TextFilter for SanitizeFilter {
    fn name(&self) -> &str {
        "sanitize"
    }

    fn process(&self, input: &str) -> String {
        ammonia::clean(input)
    }
}
