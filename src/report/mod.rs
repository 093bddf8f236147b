//! Readiness reports.
//!
//! Buckets readiness records into display lines and assembles the per-category
//! line lists, together with the farm's coin figures and delivery order
//! summaries, into a [`FarmReport`].

mod bucket;
mod orders;

pub use bucket::*;
pub use orders::*;

use serde::Serialize;
use serde_json::Value;

use crate::calculate::Calculator;
use crate::catalog::Catalog;
use crate::models::{Category, FarmDocument, UnknownKindWarning};
use crate::validate::{validate, ValidationError};

/// Placeholder shown for a category with no lines.
pub const EMPTY_SECTION: &str = "None";

/// Everything the presentation layer needs for one farm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmReport {
    pub coins: f64,
    pub balance: String,
    pub crops: Vec<String>,
    pub resources: Vec<String>,
    pub fruits: Vec<String>,
    pub flowers: Vec<String>,
    pub coin_orders: Vec<String>,
    pub sfl_orders: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<UnknownKindWarning>,
}

impl FarmReport {
    /// Build a report with the global catalog and default policy.
    pub fn build(doc: &FarmDocument, now_ms: i64) -> Self {
        Self::build_with(doc, &Calculator::new(Catalog::global()), Catalog::global(), now_ms)
    }

    /// Build a report with an explicit calculator and icon catalog.
    pub fn build_with(
        doc: &FarmDocument,
        calculator: &Calculator<'_>,
        catalog: &Catalog,
        now_ms: i64,
    ) -> Self {
        let readiness = calculator.compute(doc, now_ms);
        let lines = |category| format_records_with(&readiness.category(category), catalog);

        Self {
            coins: doc.coins,
            balance: doc.balance.clone(),
            crops: lines(Category::Crops),
            resources: lines(Category::Resources),
            fruits: lines(Category::Fruits),
            flowers: lines(Category::Flowers),
            coin_orders: coin_reward_lines(&doc.delivery_orders),
            sfl_orders: sfl_reward_lines(&doc.delivery_orders),
            warnings: readiness.warnings,
        }
    }

    /// Lines of one category.
    pub fn section(&self, category: Category) -> &[String] {
        match category {
            Category::Crops => &self.crops,
            Category::Resources => &self.resources,
            Category::Fruits => &self.fruits,
            Category::Flowers => &self.flowers,
        }
    }

    /// One category joined by newlines, or [`EMPTY_SECTION`].
    pub fn section_text(&self, category: Category) -> String {
        let lines = self.section(category);
        if lines.is_empty() {
            EMPTY_SECTION.to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self, farm_id: &str) -> String {
        let mut out = format!("🌾 Farm Status: {}\n", farm_id);
        out.push_str(&format!("Coins: {}  Balance: {} SFL\n", self.coins, self.balance));

        for category in Category::ALL {
            out.push_str(&format!("\n{}\n", category.title()));
            out.push_str(&self.section_text(category));
            out.push('\n');
        }

        for orders in [&self.coin_orders, &self.sfl_orders] {
            if !orders.is_empty() {
                out.push('\n');
                out.push_str(&orders.join("\n"));
                out.push('\n');
            }
        }

        out
    }
}

/// Validate a raw document and build its report in one step.
pub fn report_from_value(raw: &Value, now_ms: i64) -> Result<FarmReport, ValidationError> {
    let doc = validate(raw)?;
    Ok(FarmReport::build(&doc, now_ms))
}
