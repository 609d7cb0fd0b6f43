/// "Submit a tool" form.
///
/// Submissions are validated and acknowledged but never stored; the catalog
/// is static.
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{BillingPeriod, Category, Platform, PricingType};

pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 2000;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Creator,
    Employee,
    User,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Submission {
    pub name: String,
    pub website: String,
    pub short_description: String,
    pub description: String,
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub pricing_type: Option<PricingType>,
    /// Free-form, as typed into the form.
    pub starting_price: Option<String>,
    pub currency: Currency,
    pub billing_period: BillingPeriod,
    pub features: Vec<String>,
    pub platforms: Vec<Platform>,
    pub tags: Vec<String>,
    pub use_cases: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub submitter_name: String,
    pub submitter_email: String,
    pub relationship: Option<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Receipt {
    pub title: String,
    pub description: String,
    pub tool_name: String,
    pub features: usize,
}

impl Submission {
    /// All problems at once, in form order. Empty means valid.
    ///
    /// Category and pricing type are optional selects.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let required = [
            ("name", &self.name),
            ("website", &self.website),
            ("short_description", &self.short_description),
            ("description", &self.description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, format!("{field} is required")));
            }
        }
        if !self.website.trim().is_empty() && !URL_RE.is_match(self.website.trim()) {
            errors.push(FieldError::new("website", "website must be an http(s) URL"));
        }
        if let Some(raw) = self.starting_price.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => {}
                _ => errors.push(FieldError::new(
                    "starting_price",
                    "starting_price must be a non-negative number",
                )),
            }
        }
        if self.submitter_name.trim().is_empty() {
            errors.push(FieldError::new("submitter_name", "submitter_name is required"));
        }
        let email = self.submitter_email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("submitter_email", "submitter_email is required"));
        } else if !EMAIL_RE.is_match(email) {
            errors.push(FieldError::new("submitter_email", "submitter_email is not a valid address"));
        }
        errors
    }

    /// Non-blank feature entries.
    pub fn features(&self) -> Vec<&str> {
        non_blank(&self.features)
    }
}

fn non_blank(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validates, waits out the simulated review delay and acknowledges.
pub async fn submit(submission: &Submission, delay: Duration) -> Result<Receipt, Vec<FieldError>> {
    let errors = submission.validate();
    if !errors.is_empty() {
        return Err(errors);
    }
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    info!(
        tool = submission.name.trim(),
        features = submission.features().len(),
        "tool submission acknowledged (not persisted)"
    );
    Ok(Receipt {
        title: "Tool Submitted Successfully!".to_string(),
        description: "Thank you for your submission. We'll review it and add it to our database soon."
            .to_string(),
        tool_name: submission.name.trim().to_string(),
        features: submission.features().len(),
    })
}
