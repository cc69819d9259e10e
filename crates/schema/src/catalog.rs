//! The compiled block catalog.
//!
//! 13 page sections (`blocks.*`), 9 nested elements (`elements.*`) and 3
//! page-level metadata fragments (`shared.*`). Attribute names follow the
//! content service's camelCase field names.

use crate::registry::SchemaRegistry;
use crate::types::{AttributeDefinition as Attr, BlockType};

const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const SPACING: &[&str] = &["none", "small", "medium", "large"];
const WIDTHS: &[&str] = &["small", "medium", "large", "full"];

/// Register every standard type into `registry`.
pub fn register_standard_types(registry: &mut SchemaRegistry) {
    for block_type in blocks().into_iter().chain(elements()).chain(shared()) {
        registry.register(block_type);
    }
}

fn blocks() -> Vec<BlockType> {
    vec![
        BlockType::new("blocks.hero-section", "Hero Section")
            .attribute(Attr::string("title").required().max_length(120))
            .attribute(Attr::text("subtitle").max_length(300))
            .attribute(Attr::media("backgroundImage"))
            .attribute(Attr::enumeration("textAlignment", ALIGNMENTS).default_value("center"))
            .attribute(
                Attr::enumeration("height", &["small", "medium", "large", "full"])
                    .default_value("large"),
            )
            .attribute(Attr::boolean("overlay").default_value(true))
            .attribute(Attr::repeatable("buttons", "elements.button")),
        BlockType::new("blocks.text-block", "Text Block")
            .attribute(Attr::rich_text("content").required())
            .attribute(Attr::enumeration("textAlignment", ALIGNMENTS).default_value("left"))
            .attribute(Attr::enumeration("padding", SPACING).default_value("medium"))
            .attribute(Attr::enumeration("maxWidth", WIDTHS).default_value("large")),
        BlockType::new("blocks.feature-grid", "Feature Grid")
            .attribute(Attr::string("title").max_length(120))
            .attribute(Attr::text("subtitle"))
            .attribute(Attr::integer("columns").default_value(3).range(1.0, 4.0))
            .attribute(Attr::repeatable("features", "elements.feature")),
        BlockType::new("blocks.image-gallery", "Image Gallery")
            .attribute(Attr::string("title"))
            .attribute(
                Attr::enumeration("layout", &["grid", "masonry", "carousel"]).default_value("grid"),
            )
            .attribute(Attr::integer("columns").default_value(3).range(2.0, 6.0))
            .attribute(Attr::repeatable("images", "elements.gallery-image")),
        BlockType::new("blocks.chart", "Chart")
            .attribute(Attr::string("title"))
            .attribute(Attr::text("description"))
            .attribute(
                Attr::enumeration("chartType", &["bar", "line", "pie", "doughnut"])
                    .default_value("bar"),
            )
            .attribute(Attr::string("unit").max_length(16))
            .attribute(Attr::boolean("showLegend").default_value(true))
            .attribute(Attr::repeatable("dataPoints", "elements.chart-data-point")),
        BlockType::new("blocks.cta-section", "Call to Action")
            .attribute(Attr::string("title").required().max_length(120))
            .attribute(Attr::text("description"))
            .attribute(
                Attr::enumeration("background", &["primary", "secondary", "dark", "light"])
                    .default_value("primary"),
            )
            .attribute(Attr::repeatable("buttons", "elements.button")),
        BlockType::new("blocks.testimonials", "Testimonials")
            .attribute(Attr::string("title"))
            .attribute(
                Attr::enumeration("layout", &["grid", "carousel"]).default_value("grid"),
            )
            .attribute(Attr::repeatable("testimonials", "elements.testimonial")),
        BlockType::new("blocks.stats-section", "Statistics")
            .attribute(Attr::string("title"))
            .attribute(Attr::text("description"))
            .attribute(Attr::repeatable("stats", "elements.stat")),
        BlockType::new("blocks.team-section", "Team")
            .attribute(Attr::string("title"))
            .attribute(Attr::text("description"))
            .attribute(Attr::integer("columns").default_value(4).range(2.0, 6.0))
            .attribute(Attr::repeatable("members", "elements.team-member")),
        BlockType::new("blocks.faq-section", "FAQ")
            .attribute(Attr::string("title").default_value("Frequently Asked Questions"))
            .attribute(Attr::repeatable("items", "elements.faq-item")),
        BlockType::new("blocks.video-embed", "Video")
            .attribute(Attr::string("url").required())
            .attribute(Attr::string("title"))
            .attribute(
                Attr::enumeration("aspectRatio", &["16:9", "4:3", "1:1"]).default_value("16:9"),
            )
            .attribute(Attr::boolean("autoplay").default_value(false)),
        BlockType::new("blocks.timeline", "Timeline")
            .attribute(Attr::string("title"))
            .attribute(
                Attr::enumeration("orientation", &["vertical", "horizontal"])
                    .default_value("vertical"),
            )
            .attribute(Attr::repeatable("events", "elements.timeline-event")),
        BlockType::new("blocks.split-content", "Split Content")
            .attribute(Attr::string("title"))
            .attribute(Attr::rich_text("content").required())
            .attribute(Attr::media("image"))
            .attribute(
                Attr::enumeration("imagePosition", &["left", "right"]).default_value("right"),
            )
            .attribute(Attr::repeatable("buttons", "elements.button")),
    ]
}

fn elements() -> Vec<BlockType> {
    vec![
        BlockType::new("elements.button", "Button")
            .attribute(Attr::string("label").required().max_length(50))
            .attribute(Attr::string("url").required())
            .attribute(
                Attr::enumeration("variant", &["primary", "secondary", "outline", "ghost"])
                    .default_value("primary"),
            )
            .attribute(Attr::boolean("openInNewTab").default_value(false))
            .attribute(Attr::relation("page", "api::page.page")),
        BlockType::new("elements.feature", "Feature")
            .attribute(Attr::string("title").required().max_length(80))
            .attribute(Attr::text("description").max_length(400))
            .attribute(Attr::string("icon"))
            .attribute(Attr::string("link")),
        BlockType::new("elements.gallery-image", "Gallery Image")
            .attribute(Attr::media("image").required())
            .attribute(Attr::string("caption"))
            .attribute(Attr::string("alt")),
        BlockType::new("elements.chart-data-point", "Data Point")
            .attribute(Attr::string("label").required())
            .attribute(Attr::decimal("value").required())
            .attribute(Attr::string("color")),
        BlockType::new("elements.testimonial", "Testimonial")
            .attribute(Attr::text("quote").required())
            .attribute(Attr::string("author").required())
            .attribute(Attr::string("role"))
            .attribute(Attr::string("company"))
            .attribute(Attr::media("avatar"))
            .attribute(Attr::integer("rating").default_value(5).range(1.0, 5.0)),
        BlockType::new("elements.stat", "Statistic")
            .attribute(Attr::string("value").required())
            .attribute(Attr::string("label").required())
            .attribute(Attr::string("prefix"))
            .attribute(Attr::string("suffix")),
        BlockType::new("elements.team-member", "Team Member")
            .attribute(Attr::string("name").required())
            .attribute(Attr::string("role"))
            .attribute(Attr::text("bio").max_length(600))
            .attribute(Attr::media("photo"))
            .attribute(Attr::string("linkedin")),
        BlockType::new("elements.faq-item", "FAQ Item")
            .attribute(Attr::string("question").required())
            .attribute(Attr::rich_text("answer").required()),
        BlockType::new("elements.timeline-event", "Timeline Event")
            .attribute(Attr::string("date").required())
            .attribute(Attr::string("title").required())
            .attribute(Attr::text("description")),
    ]
}

fn shared() -> Vec<BlockType> {
    vec![
        BlockType::new("shared.seo", "SEO")
            .attribute(Attr::string("metaTitle").max_length(60))
            .attribute(Attr::text("metaDescription").min_length(50).max_length(160))
            .attribute(Attr::text("keywords"))
            .attribute(Attr::string("canonicalURL"))
            .attribute(Attr::media("metaImage"))
            .attribute(Attr::boolean("preventIndexing").default_value(false)),
        BlockType::new("shared.nav-link", "Navigation Link")
            .attribute(Attr::string("label").required())
            .attribute(Attr::string("url").required())
            .attribute(Attr::boolean("isExternal").default_value(false)),
        BlockType::new("shared.social-link", "Social Link")
            .attribute(
                Attr::enumeration(
                    "platform",
                    &["twitter", "linkedin", "github", "facebook", "instagram", "youtube"],
                )
                .required(),
            )
            .attribute(Attr::string("url").required()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::Value;

    use crate::registry::SchemaRegistry;

    #[test]
    fn enum_defaults_are_allowed_values() {
        let registry = SchemaRegistry::standard();
        for id in registry.type_ids() {
            for def in &registry.lookup(id).unwrap().attributes {
                if let (Some(allowed), Some(Value::String(default))) =
                    (def.allowed_values(), &def.default)
                {
                    assert!(
                        allowed.contains(default),
                        "{id}.{}: default '{default}' not in {allowed:?}",
                        def.name
                    );
                }
            }
        }
    }

    #[test]
    fn defaults_satisfy_their_own_constraints() {
        let registry = SchemaRegistry::standard();
        for id in registry.type_ids() {
            let defaults = registry.defaults_for(id).unwrap();
            let violations = registry.validate(id, &defaults);
            // Only missing required values are acceptable for a bare default map.
            assert!(
                violations.iter().all(|v| matches!(
                    v.kind,
                    crate::violation::ViolationKind::MissingRequired
                )),
                "{id}: {violations:?}"
            );
        }
    }
}
