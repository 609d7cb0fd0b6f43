use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Catalog category. Serialized as its display name, e.g. "Text & Writing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    #[serde(rename = "Text & Writing")]
    TextWriting,
    #[serde(rename = "Image & Design")]
    ImageDesign,
    #[serde(rename = "Video & Media")]
    VideoMedia,
    #[serde(rename = "Development")]
    Development,
    #[serde(rename = "Productivity")]
    Productivity,
    #[serde(rename = "Music & Audio")]
    MusicAudio,
    #[serde(rename = "Research & Analysis")]
    ResearchAnalysis,
    #[serde(rename = "Business & Marketing")]
    BusinessMarketing,
    #[serde(rename = "Education & Learning")]
    EducationLearning,
    #[serde(rename = "Health & Wellness")]
    HealthWellness,
    #[serde(rename = "Finance & Trading")]
    FinanceTrading,
    #[serde(rename = "Customer Service")]
    CustomerService,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Analytics")]
    Analytics,
}

impl Category {
    /// Filter panel order.
    pub const ALL: [Category; 14] = [
        Category::TextWriting,
        Category::ImageDesign,
        Category::VideoMedia,
        Category::Development,
        Category::Productivity,
        Category::MusicAudio,
        Category::ResearchAnalysis,
        Category::BusinessMarketing,
        Category::EducationLearning,
        Category::HealthWellness,
        Category::FinanceTrading,
        Category::CustomerService,
        Category::Marketing,
        Category::Analytics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::TextWriting => "Text & Writing",
            Category::ImageDesign => "Image & Design",
            Category::VideoMedia => "Video & Media",
            Category::Development => "Development",
            Category::Productivity => "Productivity",
            Category::MusicAudio => "Music & Audio",
            Category::ResearchAnalysis => "Research & Analysis",
            Category::BusinessMarketing => "Business & Marketing",
            Category::EducationLearning => "Education & Learning",
            Category::HealthWellness => "Health & Wellness",
            Category::FinanceTrading => "Finance & Trading",
            Category::CustomerService => "Customer Service",
            Category::Marketing => "Marketing",
            Category::Analytics => "Analytics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category: '{wanted}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    Free,
    Freemium,
    Paid,
    Enterprise,
}

impl PricingType {
    pub const ALL: [PricingType; 4] = [
        PricingType::Free,
        PricingType::Freemium,
        PricingType::Paid,
        PricingType::Enterprise,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PricingType::Free => "free",
            PricingType::Freemium => "freemium",
            PricingType::Paid => "paid",
            PricingType::Enterprise => "enterprise",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PricingType::Free => "Free",
            PricingType::Freemium => "Freemium",
            PricingType::Paid => "Paid",
            PricingType::Enterprise => "Enterprise",
        }
    }

    /// Whether a starting price is meaningful for this tier.
    pub fn carries_price(self) -> bool {
        matches!(self, PricingType::Paid | PricingType::Freemium)
    }
}

impl FromStr for PricingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PricingType::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown pricing type: '{wanted}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BillingPeriod {
    OneTime,
    #[default]
    Monthly,
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Mobile,
    Api,
    Desktop,
}

impl Platform {
    /// Filter panel order.
    pub const ALL: [Platform; 4] = [Platform::Web, Platform::Mobile, Platform::Desktop, Platform::Api];

    pub fn id(self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Mobile => "mobile",
            Platform::Api => "api",
            Platform::Desktop => "desktop",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Web => "Web",
            Platform::Mobile => "Mobile",
            Platform::Api => "API",
            Platform::Desktop => "Desktop",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown platform: '{wanted}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    Name,
    Price,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" => Ok(SortKey::Popularity),
            "rating" => Ok(SortKey::Rating),
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            other => Err(format!("unknown sort key: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Pricing tier; `type` on the wire.
    #[serde(rename = "type")]
    pub kind: PricingType,
    /// Lowest paid price. Only freemium and paid tiers carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<f64>,
    /// ISO currency code (default "USD").
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub billing_period: BillingPeriod,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A catalog record. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique slug, e.g. "chatgpt" (unique ignoring ASCII case).
    pub id: String,
    /// Display name (e.g. "ChatGPT").
    pub name: String,
    /// Full description shown on detail views.
    pub description: String,
    /// One-line summary used on cards and in comparisons.
    pub short_description: String,
    pub category: Category,
    /// Free-form refinement of the category (e.g. "Code Assistant").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// External homepage; the card click-through target.
    pub website: String,
    pub pricing: Pricing,
    /// Feature bullets, most important first.
    #[serde(default)]
    pub features: Vec<String>,
    /// Supported platforms.
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Average user rating in [0, 5].
    pub rating: f64,
    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    /// Search keywords.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Editor's "popular" flag; weighs 10 in the popularity score.
    #[serde(default)]
    pub is_popular: bool,
    /// Editor's "trending" flag; weighs 5 and wins the card ribbon.
    #[serde(default)]
    pub is_trending: bool,
}

impl Tool {
    /// 10 for popular, 5 for trending, plus one point per thousand reviews.
    pub fn popularity_score(&self) -> f64 {
        let popular = if self.is_popular { 10.0 } else { 0.0 };
        let trending = if self.is_trending { 5.0 } else { 0.0 };
        popular + trending + f64::from(self.review_count) / 1000.0
    }

    pub fn starting_price_or_zero(&self) -> f64 {
        self.pricing.starting_price.unwrap_or(0.0)
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_display_name() {
        let json = serde_json::to_string(&Category::TextWriting).unwrap();
        assert_eq!(json, "\"Text & Writing\"");
        assert_eq!("text & writing".parse::<Category>().unwrap(), Category::TextWriting);
        assert!("Audio".parse::<Category>().is_err());
    }

    #[test]
    fn pricing_uses_wire_names() {
        let pricing: Pricing = serde_json::from_str(
            r#"{"type":"paid","startingPrice":19,"currency":"USD","billingPeriod":"one-time"}"#,
        )
        .unwrap();
        assert_eq!(pricing.kind, PricingType::Paid);
        assert_eq!(pricing.starting_price, Some(19.0));
        assert_eq!(pricing.billing_period, BillingPeriod::OneTime);
    }

    #[test]
    fn popularity_score_weights_flags_and_reviews() {
        let tool: Tool = serde_json::from_str(
            r#"{
                "id": "x", "name": "X", "description": "", "shortDescription": "",
                "category": "Development", "website": "https://x.dev",
                "pricing": {"type": "free"}, "rating": 4.0, "reviewCount": 2500,
                "isPopular": true
            }"#,
        )
        .unwrap();
        assert!((tool.popularity_score() - 12.5).abs() < f64::EPSILON);
        assert!(!tool.is_trending);
        assert_eq!(tool.starting_price_or_zero(), 0.0);
    }
}
