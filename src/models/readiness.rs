//! Readiness records produced by the calculator.

use serde::{Deserialize, Serialize};

/// Activity category a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crops,
    Resources,
    Fruits,
    Flowers,
}

impl Category {
    /// Every category, in report order.
    pub const ALL: [Category; 4] = [
        Category::Crops,
        Category::Resources,
        Category::Fruits,
        Category::Flowers,
    ];

    /// Icon used when a kind has no icon of its own.
    pub fn fallback_icon(&self) -> &'static str {
        match self {
            Category::Crops => "🌱",
            Category::Resources => "⛏️",
            Category::Fruits => "🍉",
            Category::Flowers => "🌸",
        }
    }

    /// Section title used by the presentation layer.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Crops => "Crops",
            Category::Resources => "Resources",
            Category::Fruits => "Fruits",
            Category::Flowers => "Flowers",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Crops => write!(f, "crops"),
            Category::Resources => write!(f, "resources"),
            Category::Fruits => write!(f, "fruits"),
            Category::Flowers => write!(f, "flowers"),
        }
    }
}

/// Remaining time for one occupied plot, patch or bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessRecord {
    pub category: Category,

    /// Item kind, e.g. "Sunflower" or "Iron"
    pub kind: String,

    /// Whole seconds until ready; zero or negative means ready
    pub seconds_remaining: i64,
}

impl ReadinessRecord {
    pub fn new(category: Category, kind: impl Into<String>, seconds_remaining: i64) -> Self {
        Self {
            category,
            kind: kind.into(),
            seconds_remaining,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.seconds_remaining <= 0
    }
}

/// A kind missing from the duration catalog.
///
/// Non-fatal: the calculator resolves it through the category's
/// [`UnknownKindPolicy`](crate::calculate::UnknownKindPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownKindWarning {
    pub category: Category,
    pub kind: String,
}

impl std::fmt::Display for UnknownKindWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} kind: {}", self.category, self.kind)
    }
}
