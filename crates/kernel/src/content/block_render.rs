//! Server-side rendering of page blocks.
//!
//! Each `blocks.*` type has a renderer that turns its typed view into
//! semantic HTML. Renderers are looked up by type identifier in a
//! [`RendererRegistry`]; the typed view is built from the resolved
//! attribute map at dispatch time, so a renderer only ever sees values of
//! the declared shape.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use showcase_schema::Attributes;

use super::blocks::{
    Button, Chart, CtaSection, FaqSection, FeatureGrid, HeroSection, ImageGallery, SplitContent,
    StatsSection, TeamSection, TextBlock, Testimonials, Timeline, VideoEmbed,
};
use super::filter::{FilterPipeline, html_escape, rich_text};
use super::model::{MediaRef, resolve_media_url};

/// Per-render inputs shared by every renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Base address relative media URLs are joined onto. Empty keeps them
    /// site-relative.
    pub media_base: String,
}

impl RenderContext {
    pub fn new(media_base: impl Into<String>) -> Self {
        Self {
            media_base: media_base.into(),
        }
    }

    pub fn media_url(&self, media: Option<&MediaRef>) -> Option<String> {
        resolve_media_url(&self.media_base, media)
    }
}

type RenderFn =
    Box<dyn Fn(&Attributes, &RenderContext) -> Result<String, serde_json::Error> + Send + Sync>;

/// Renderers keyed by block type identifier.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, RenderFn>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderers for every standard page section.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("blocks.hero-section", render_hero);
        registry.register("blocks.text-block", render_text_block);
        registry.register("blocks.feature-grid", render_feature_grid);
        registry.register("blocks.image-gallery", render_image_gallery);
        registry.register("blocks.chart", render_chart);
        registry.register("blocks.cta-section", render_cta);
        registry.register("blocks.testimonials", render_testimonials);
        registry.register("blocks.stats-section", render_stats);
        registry.register("blocks.team-section", render_team);
        registry.register("blocks.faq-section", render_faq);
        registry.register("blocks.video-embed", render_video);
        registry.register("blocks.timeline", render_timeline);
        registry.register("blocks.split-content", render_split_content);
        registry
    }

    /// Register a renderer over the typed view `T`, replacing any previous
    /// renderer for `type_id`.
    pub fn register<T, F>(&mut self, type_id: &str, render: F)
    where
        T: DeserializeOwned + 'static,
        F: Fn(&T, &RenderContext) -> String + Send + Sync + 'static,
    {
        self.renderers.insert(
            type_id.to_string(),
            Box::new(move |attributes, ctx| {
                let view: T = serde_json::from_value(Value::Object(attributes.clone()))?;
                Ok(render(&view, ctx))
            }),
        );
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.renderers.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Render one block.
    ///
    /// `None` when no renderer is registered for `type_id`; `Some(Err)` when
    /// the attributes do not form the renderer's typed view.
    pub fn render(
        &self,
        type_id: &str,
        attributes: &Attributes,
        ctx: &RenderContext,
    ) -> Option<Result<String, serde_json::Error>> {
        let renderer = self.renderers.get(type_id)?;
        Some(renderer(attributes, ctx))
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.renderers.keys().collect();
        ids.sort();
        f.debug_struct("RendererRegistry")
            .field("renderers", &ids)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Whether a link target is safe to emit in an `href`.
///
/// Site-relative paths, fragments, `http(s)`, `mailto:` and `tel:` pass.
pub(crate) fn is_safe_link(url: &str) -> bool {
    let trimmed = url.trim();
    (trimmed.starts_with('/') && !trimmed.starts_with("//"))
        || trimmed.starts_with('#')
        || is_safe_url(trimmed)
        || trimmed.starts_with("mailto:")
        || trimmed.starts_with("tel:")
}

/// Validate that a URL uses a safe scheme (http or https).
fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    trimmed.starts_with("https://") || trimmed.starts_with("http://")
}

fn safe_href(url: &str) -> String {
    if is_safe_link(url) {
        html_escape(url.trim())
    } else {
        "#".to_string()
    }
}

fn heading(tag: &str, text: Option<&str>) -> String {
    match text.filter(|t| !t.is_empty()) {
        Some(t) => format!("<{tag}>{}</{tag}>", html_escape(t)),
        None => String::new(),
    }
}

fn paragraph(class: &str, text: Option<&str>) -> String {
    match text.filter(|t| !t.is_empty()) {
        Some(t) => format!(
            "<p class=\"{class}\">{}</p>",
            FilterPipeline::plain_text().process(t)
        ),
        None => String::new(),
    }
}

fn image(ctx: &RenderContext, media: Option<&MediaRef>, alt: Option<&str>, class: &str) -> String {
    let Some(src) = ctx.media_url(media) else {
        return String::new();
    };
    if !is_safe_link(&src) {
        return String::new();
    }
    let alt = alt
        .or_else(|| media.and_then(MediaRef::alt))
        .unwrap_or("");
    format!(
        "<img class=\"{class}\" src=\"{}\" alt=\"{}\" loading=\"lazy\">",
        html_escape(&src),
        html_escape(alt)
    )
}

fn render_buttons(buttons: &[Button]) -> String {
    if buttons.is_empty() {
        return String::new();
    }
    let mut html = String::from("<div class=\"buttons\">");
    for button in buttons {
        let target = if button.open_in_new_tab {
            " target=\"_blank\" rel=\"noopener\""
        } else {
            ""
        };
        html.push_str(&format!(
            "<a class=\"btn btn-{}\" href=\"{}\"{target}>{}</a>",
            html_escape(&button.variant),
            safe_href(&button.url),
            html_escape(&button.label)
        ));
    }
    html.push_str("</div>");
    html
}

// ---------------------------------------------------------------------------
// Block renderers
// ---------------------------------------------------------------------------

fn render_hero(hero: &HeroSection, ctx: &RenderContext) -> String {
    let mut classes = format!(
        "block block-hero text-{} height-{}",
        html_escape(&hero.text_alignment),
        html_escape(&hero.height)
    );
    if hero.overlay {
        classes.push_str(" has-overlay");
    }

    let style = ctx
        .media_url(hero.background_image.as_ref())
        .filter(|src| is_safe_link(src))
        .map(|src| format!(" style=\"background-image: url('{}')\"", html_escape(&src)))
        .unwrap_or_default();

    format!(
        "<section class=\"{classes}\"{style}><div class=\"hero-content\">{}{}{}</div></section>",
        heading("h1", Some(&hero.title)),
        paragraph("subtitle", hero.subtitle.as_deref()),
        render_buttons(&hero.buttons)
    )
}

fn render_text_block(block: &TextBlock, _ctx: &RenderContext) -> String {
    format!(
        "<section class=\"block block-text text-{} padding-{} width-{}\"><div class=\"prose\">{}</div></section>",
        html_escape(&block.text_alignment),
        html_escape(&block.padding),
        html_escape(&block.max_width),
        rich_text(&block.content)
    )
}

fn render_feature_grid(grid: &FeatureGrid, _ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-features\">{}{}<div class=\"grid cols-{}\">",
        heading("h2", grid.title.as_deref()),
        paragraph("subtitle", grid.subtitle.as_deref()),
        grid.columns
    );
    for feature in &grid.features {
        let icon = feature
            .icon
            .as_deref()
            .map(|i| format!("<span class=\"icon icon-{}\"></span>", html_escape(i)))
            .unwrap_or_default();
        let title = match feature.link.as_deref() {
            Some(link) => format!(
                "<h3><a href=\"{}\">{}</a></h3>",
                safe_href(link),
                html_escape(&feature.title)
            ),
            None => heading("h3", Some(&feature.title)),
        };
        html.push_str(&format!(
            "<div class=\"feature\">{icon}{title}{}</div>",
            paragraph("description", feature.description.as_deref())
        ));
    }
    html.push_str("</div></section>");
    html
}

fn render_image_gallery(gallery: &ImageGallery, ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-gallery layout-{}\">{}<div class=\"grid cols-{}\">",
        html_escape(&gallery.layout),
        heading("h2", gallery.title.as_deref()),
        gallery.columns
    );
    for item in &gallery.images {
        let img = image(ctx, Some(&item.image), item.alt.as_deref(), "gallery-image");
        if img.is_empty() {
            continue;
        }
        let caption = item
            .caption
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| format!("<figcaption>{}</figcaption>", html_escape(c)))
            .unwrap_or_default();
        html.push_str(&format!("<figure>{img}{caption}</figure>"));
    }
    html.push_str("</div></section>");
    html
}

fn render_chart(chart: &Chart, _ctx: &RenderContext) -> String {
    let unit = chart.unit.as_deref().unwrap_or("");
    let max = chart
        .data_points
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);

    let mut html = format!(
        "<section class=\"block block-chart chart-{}\">{}{}<ul class=\"chart-data\">",
        html_escape(&chart.chart_type),
        heading("h2", chart.title.as_deref()),
        paragraph("description", chart.description.as_deref())
    );
    for point in &chart.data_points {
        let share = if max > 0.0 {
            (point.value / max * 100.0).round()
        } else {
            0.0
        };
        let color = point
            .color
            .as_deref()
            .map(|c| format!("; --color: {}", html_escape(c)))
            .unwrap_or_default();
        html.push_str(&format!(
            "<li data-value=\"{}\" style=\"--share: {share}%{color}\"><span class=\"label\">{}</span> <span class=\"value\">{}{}</span></li>",
            point.value,
            html_escape(&point.label),
            point.value,
            html_escape(unit)
        ));
    }
    html.push_str("</ul>");

    if chart.show_legend && !chart.data_points.is_empty() {
        html.push_str("<ul class=\"chart-legend\">");
        for point in &chart.data_points {
            html.push_str(&format!("<li>{}</li>", html_escape(&point.label)));
        }
        html.push_str("</ul>");
    }
    html.push_str("</section>");
    html
}

fn render_cta(cta: &CtaSection, _ctx: &RenderContext) -> String {
    format!(
        "<section class=\"block block-cta bg-{}\">{}{}{}</section>",
        html_escape(&cta.background),
        heading("h2", Some(&cta.title)),
        paragraph("description", cta.description.as_deref()),
        render_buttons(&cta.buttons)
    )
}

fn render_testimonials(section: &Testimonials, ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-testimonials layout-{}\">{}",
        html_escape(&section.layout),
        heading("h2", section.title.as_deref())
    );
    for t in &section.testimonials {
        let byline: Vec<&str> = [t.role.as_deref(), t.company.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        let byline = if byline.is_empty() {
            String::new()
        } else {
            format!("<span class=\"byline\">{}</span>", html_escape(&byline.join(", ")))
        };
        let stars = t.rating.clamp(0, 5) as usize;
        html.push_str(&format!(
            "<blockquote class=\"testimonial\" data-rating=\"{}\"><p>{}</p><footer>{}<cite>{}</cite>{byline}<span class=\"rating\">{}</span></footer></blockquote>",
            t.rating,
            html_escape(&t.quote),
            image(ctx, t.avatar.as_ref(), Some(&t.author), "avatar"),
            html_escape(&t.author),
            "\u{2605}".repeat(stars)
        ));
    }
    html.push_str("</section>");
    html
}

fn render_stats(section: &StatsSection, _ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-stats\">{}{}<dl class=\"stats\">",
        heading("h2", section.title.as_deref()),
        paragraph("description", section.description.as_deref())
    );
    for stat in &section.stats {
        html.push_str(&format!(
            "<div class=\"stat\"><dt>{}</dt><dd>{}{}{}</dd></div>",
            html_escape(&stat.label),
            html_escape(stat.prefix.as_deref().unwrap_or("")),
            html_escape(&stat.value),
            html_escape(stat.suffix.as_deref().unwrap_or(""))
        ));
    }
    html.push_str("</dl></section>");
    html
}

fn render_team(section: &TeamSection, ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-team\">{}{}<div class=\"grid cols-{}\">",
        heading("h2", section.title.as_deref()),
        paragraph("description", section.description.as_deref()),
        section.columns
    );
    for member in &section.members {
        let linkedin = member
            .linkedin
            .as_deref()
            .filter(|url| is_safe_url(url))
            .map(|url| {
                format!(
                    "<a class=\"linkedin\" href=\"{}\" rel=\"noopener\">LinkedIn</a>",
                    html_escape(url)
                )
            })
            .unwrap_or_default();
        html.push_str(&format!(
            "<div class=\"member\">{}{}{}{}{linkedin}</div>",
            image(ctx, member.photo.as_ref(), Some(&member.name), "photo"),
            heading("h3", Some(&member.name)),
            paragraph("role", member.role.as_deref()),
            paragraph("bio", member.bio.as_deref())
        ));
    }
    html.push_str("</div></section>");
    html
}

fn render_faq(section: &FaqSection, _ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-faq\">{}",
        heading("h2", Some(&section.title))
    );
    for item in &section.items {
        html.push_str(&format!(
            "<details class=\"faq-item\"><summary>{}</summary><div class=\"answer\">{}</div></details>",
            html_escape(&item.question),
            rich_text(&item.answer)
        ));
    }
    html.push_str("</section>");
    html
}

fn render_video(video: &VideoEmbed, _ctx: &RenderContext) -> String {
    let url = video.url.trim();
    let ratio = html_escape(&video.aspect_ratio.replace(':', "x"));
    let title = video.title.as_deref().unwrap_or("Video");

    let body = if is_whitelisted_embed(url) {
        let mut src = embed_src(url);
        if video.autoplay {
            src.push(if src.contains('?') { '&' } else { '?' });
            src.push_str("autoplay=1&mute=1");
        }
        format!(
            "<div class=\"embed-responsive ratio-{ratio}\"><iframe src=\"{}\" title=\"{}\" frameborder=\"0\" allow=\"autoplay; fullscreen\" allowfullscreen></iframe></div>",
            html_escape(&src),
            html_escape(title)
        )
    } else if is_safe_url(url) {
        let escaped = html_escape(url);
        format!("<a href=\"{escaped}\">{escaped}</a>")
    } else {
        format!("<span>{}</span>", html_escape(url))
    };

    format!(
        "<section class=\"block block-video\">{}{body}</section>",
        heading("h2", video.title.as_deref())
    )
}

fn render_timeline(timeline: &Timeline, _ctx: &RenderContext) -> String {
    let mut html = format!(
        "<section class=\"block block-timeline orientation-{}\">{}<ol class=\"timeline\">",
        html_escape(&timeline.orientation),
        heading("h2", timeline.title.as_deref())
    );
    for event in &timeline.events {
        html.push_str(&format!(
            "<li><time>{}</time>{}{}</li>",
            html_escape(&event.date),
            heading("h3", Some(&event.title)),
            paragraph("description", event.description.as_deref())
        ));
    }
    html.push_str("</ol></section>");
    html
}

fn render_split_content(split: &SplitContent, ctx: &RenderContext) -> String {
    format!(
        "<section class=\"block block-split image-{}\"><div class=\"split-text\">{}<div class=\"prose\">{}</div>{}</div><div class=\"split-media\">{}</div></section>",
        html_escape(&split.image_position),
        heading("h2", split.title.as_deref()),
        rich_text(&split.content),
        render_buttons(&split.buttons),
        image(ctx, split.image.as_ref(), split.title.as_deref(), "split-image")
    )
}

// ---------------------------------------------------------------------------
// Embed whitelist
// ---------------------------------------------------------------------------

/// Whitelisted embed URL patterns.
const EMBED_WHITELIST: &[&str] = &[
    "youtube.com/watch",
    "youtube.com/embed/",
    "youtu.be/",
    "vimeo.com/",
    "player.vimeo.com/",
];

fn normalise_embed(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
}

fn is_whitelisted_embed(url: &str) -> bool {
    if !is_safe_url(url) {
        return false;
    }
    let normalised = normalise_embed(url);
    EMBED_WHITELIST
        .iter()
        .any(|pattern| normalised.starts_with(pattern))
}

/// Player URL for a whitelisted video page URL.
fn embed_src(url: &str) -> String {
    let normalised = normalise_embed(url);

    if let Some(query) = normalised.strip_prefix("youtube.com/watch?")
        && let Some(id) = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
    {
        return format!("https://www.youtube.com/embed/{id}");
    }
    if let Some(id) = normalised.strip_prefix("youtu.be/") {
        let id = id.split(['?', '&']).next().unwrap_or(id);
        return format!("https://www.youtube.com/embed/{id}");
    }
    if let Some(id) = normalised.strip_prefix("vimeo.com/")
        && id.chars().next().is_some_and(|c| c.is_ascii_digit())
    {
        return format!("https://player.vimeo.com/video/{id}");
    }
    url.to_string()
}
