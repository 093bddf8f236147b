//! Static duration and icon tables.
//!
//! Maps every known item kind to the number of seconds it takes to become
//! ready again: crops from planting, resources from mining, fruit from
//! planting or the last harvest, flowers from planting. The global catalog is
//! built once on first use and never mutated afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::Category;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

const CROP_TIMES: &[(&str, u64)] = &[
    ("Sunflower", MINUTE),
    ("Potato", 5 * MINUTE),
    ("Rhubarb", 10 * MINUTE),
    ("Pumpkin", 30 * MINUTE),
    ("Zucchini", 30 * MINUTE),
    ("Carrot", HOUR),
    ("Yam", HOUR),
    ("Cabbage", 2 * HOUR),
    ("Broccoli", 2 * HOUR),
    ("Soybean", 3 * HOUR),
    ("Beetroot", 4 * HOUR),
    ("Pepper", 4 * HOUR),
    ("Cauliflower", 8 * HOUR),
    ("Parsnip", 12 * HOUR),
    ("Eggplant", 16 * HOUR),
    ("Corn", 20 * HOUR),
    ("Onion", 20 * HOUR),
    ("Radish", DAY),
    ("Wheat", DAY),
    ("Turnip", DAY),
    ("Kale", 36 * HOUR),
    ("Artichoke", 36 * HOUR),
    ("Barley", 2 * DAY),
];

const RESOURCE_TIMES: &[(&str, u64)] = &[("Stone", 4 * HOUR), ("Iron", 8 * HOUR), ("Gold", DAY)];

const FRUIT_TIMES: &[(&str, u64)] = &[
    ("Tomato", 2 * HOUR),
    ("Lemon", 4 * HOUR),
    ("Blueberry", 6 * HOUR),
    ("Orange", 8 * HOUR),
    ("Apple", 12 * HOUR),
    ("Banana", 12 * HOUR),
    ("Celestine", 6 * HOUR),
    ("Lunara", 12 * HOUR),
    ("Duskberry", DAY),
];

const FLOWER_COLOURS: &[&str] = &["Red", "Yellow", "Purple", "White", "Blue"];

/// Flower species grouped by the seed they grow from.
const FLOWER_SPECIES: &[(&str, u64)] = &[
    ("Pansy", DAY),
    ("Cosmos", DAY),
    ("Balloon Flower", 2 * DAY),
    ("Daffodil", 2 * DAY),
    ("Carnation", 2 * DAY),
    ("Lotus", 5 * DAY),
    ("Edelweiss", 5 * DAY),
    ("Gladiolus", 5 * DAY),
    ("Lavender", 5 * DAY),
    ("Clover", 5 * DAY),
];

const ICONS: &[(&str, &str)] = &[
    ("Tree", "🌳"),
    ("Stone", "🪨"),
    ("Iron", "🛠️"),
    ("Gold", "🪙"),
    ("Crimstone", "💎"),
    ("Sunstone", "🏵️"),
    ("Oil", "🛢️"),
    ("Sunflower", "🌻"),
    ("Potato", "🥔"),
    ("Pumpkin", "🎃"),
    ("Carrot", "🥕"),
    ("Corn", "🌽"),
    ("Wheat", "🌾"),
    ("Cabbage", "🥬"),
    ("Broccoli", "🥦"),
    ("Eggplant", "🍆"),
    ("Pepper", "🌶️"),
    ("Tomato", "🍅"),
    ("Apple", "🍎"),
    ("Banana", "🍌"),
    ("Orange", "🍊"),
    ("Lemon", "🍋"),
    ("Blueberry", "🫐"),
    ("Red Lotus", "🪷"),
    ("White Lotus", "🪷"),
    ("Red Carnation", "🌺"),
];

/// Read-only lookup of readiness durations and display icons.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    crops: HashMap<String, u64>,
    resources: HashMap<String, u64>,
    fruits: HashMap<String, u64>,
    flowers: HashMap<String, u64>,
    icons: HashMap<String, String>,
}

impl Catalog {
    /// The process-wide catalog with the game's built-in tables.
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::builtin)
    }

    /// Build a catalog from the built-in tables.
    pub fn builtin() -> Self {
        let flowers = FLOWER_COLOURS
            .iter()
            .flat_map(|colour| {
                FLOWER_SPECIES
                    .iter()
                    .map(move |(species, secs)| (format!("{} {}", colour, species), *secs))
            })
            .collect();

        Self {
            crops: to_table(CROP_TIMES),
            resources: to_table(RESOURCE_TIMES),
            fruits: to_table(FRUIT_TIMES),
            flowers,
            icons: ICONS
                .iter()
                .map(|(kind, icon)| (kind.to_string(), icon.to_string()))
                .collect(),
        }
    }

    /// Add or replace a duration entry. Zero durations are ignored.
    pub fn with_duration(mut self, category: Category, kind: &str, seconds: u64) -> Self {
        if seconds > 0 {
            self.table_mut(category).insert(kind.to_string(), seconds);
        }
        self
    }

    /// Add or replace an icon entry.
    pub fn with_icon(mut self, kind: &str, icon: &str) -> Self {
        self.icons.insert(kind.to_string(), icon.to_string());
        self
    }

    /// Duration in seconds for a kind in the given category.
    pub fn duration(&self, category: Category, kind: &str) -> Option<u64> {
        self.table(category).get(kind).copied()
    }

    /// Display icon for a kind, falling back to the category's generic icon.
    pub fn icon(&self, category: Category, kind: &str) -> &str {
        self.icons
            .get(kind)
            .map(String::as_str)
            .unwrap_or_else(|| category.fallback_icon())
    }

    /// Number of duration entries in a category.
    pub fn len(&self, category: Category) -> usize {
        self.table(category).len()
    }

    fn table(&self, category: Category) -> &HashMap<String, u64> {
        match category {
            Category::Crops => &self.crops,
            Category::Resources => &self.resources,
            Category::Fruits => &self.fruits,
            Category::Flowers => &self.flowers,
        }
    }

    fn table_mut(&mut self, category: Category) -> &mut HashMap<String, u64> {
        match category {
            Category::Crops => &mut self.crops,
            Category::Resources => &mut self.resources,
            Category::Fruits => &mut self.fruits,
            Category::Flowers => &mut self.flowers,
        }
    }
}

fn to_table(entries: &[(&str, u64)]) -> HashMap<String, u64> {
    entries
        .iter()
        .map(|(kind, secs)| (kind.to_string(), *secs))
        .collect()
}
