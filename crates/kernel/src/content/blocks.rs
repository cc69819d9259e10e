//! Typed views of resolved block attributes.
//!
//! One struct per `blocks.*` type and per nested `elements.*` type. They are
//! built from an attribute map that has already been merged over the
//! registry defaults, so defaulted fields are plain values and only
//! attributes without a default are `Option`. Enumerations stay `String`:
//! out-of-set values are reported by the resolver, not rejected here.

use serde::Deserialize;
use serde_json::Value;

use super::model::MediaRef;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub title: String,
    pub subtitle: Option<String>,
    pub background_image: Option<MediaRef>,
    pub text_alignment: String,
    pub height: String,
    pub overlay: bool,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub content: String,
    pub text_alignment: String,
    pub padding: String,
    pub max_width: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGrid {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub columns: i64,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGallery {
    pub title: Option<String>,
    pub layout: String,
    pub columns: i64,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub title: Option<String>,
    pub description: Option<String>,
    pub chart_type: String,
    pub unit: Option<String>,
    pub show_legend: bool,
    pub data_points: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaSection {
    pub title: String,
    pub description: Option<String>,
    pub background: String,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonials {
    pub title: Option<String>,
    pub layout: String,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSection {
    pub title: Option<String>,
    pub description: Option<String>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSection {
    pub title: Option<String>,
    pub description: Option<String>,
    pub columns: i64,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqSection {
    pub title: String,
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEmbed {
    pub url: String,
    pub title: Option<String>,
    pub aspect_ratio: String,
    pub autoplay: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub title: Option<String>,
    pub orientation: String,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitContent {
    pub title: Option<String>,
    pub content: String,
    pub image: Option<MediaRef>,
    pub image_position: String,
    pub buttons: Vec<Button>,
}

// Nested elements

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub label: String,
    pub url: String,
    pub variant: String,
    pub open_in_new_tab: bool,
    /// Related page record, when the button links to one.
    pub page: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub image: MediaRef,
    pub caption: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub avatar: Option<MediaRef>,
    pub rating: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub value: String,
    pub label: String,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<MediaRef>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    pub description: Option<String>,
}
