//! Typed farm document.
//!
//! Produced by [`crate::validate::validate`]; every numeric field has already
//! been coerced and every default applied. Fields the validator does not know
//! about are kept in `extra` untouched.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Collection, Order};

/// Unrecognised fields carried through validation.
pub type Extra = Map<String, Value>;

/// Grid position of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Footprint of a placed item in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub height: f64,
    pub width: f64,
}

impl Footprint {
    /// Crop and resource plots.
    pub const PLOT: Footprint = Footprint {
        height: 1.0,
        width: 1.0,
    };

    pub const FRUIT_PATCH: Footprint = Footprint {
        height: 2.0,
        width: 2.0,
    };

    pub const FLOWER_BED: Footprint = Footprint {
        height: 1.0,
        width: 3.0,
    };
}

/// A placed slot, optionally occupied by an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plot<A> {
    pub position: Position,
    pub size: Footprint,

    /// Placement timestamp in epoch millis (0 when unknown)
    pub created_at: f64,

    /// None for an empty slot
    pub activity: Option<A>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl<A> Plot<A> {
    pub fn is_occupied(&self) -> bool {
        self.activity.is_some()
    }
}

/// A growing crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CultivationActivity {
    pub name: String,

    /// Epoch millis
    pub planted_at: f64,

    pub id: Option<String>,
    pub amount: Option<f64>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A mined resource node recovering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionActivity {
    /// Epoch millis
    pub mined_at: f64,

    pub amount: Option<f64>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A fruit tree or bush.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FruitActivity {
    pub name: String,
    pub planted_at: f64,
    pub harvested_at: Option<f64>,
    pub amount: Option<f64>,
    pub harvests_left: Option<f64>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl FruitActivity {
    /// Timestamp the regrowth timer runs from: the later of planting and the
    /// last harvest.
    pub fn anchor(&self) -> f64 {
        match self.harvested_at {
            Some(harvested_at) => self.planted_at.max(harvested_at),
            None => self.planted_at,
        }
    }
}

/// A growing flower.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowerActivity {
    pub name: String,
    pub planted_at: f64,
    pub amount: Option<f64>,

    #[serde(flatten)]
    pub extra: Extra,
}

pub type CropPlot = Plot<CultivationActivity>;
pub type ResourcePlot = Plot<ExtractionActivity>;
pub type FruitPatch = Plot<FruitActivity>;
pub type FlowerBed = Plot<FlowerActivity>;

/// Mineable resource families. The family of a node is decided by the
/// collection it is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    Stones,
    Iron,
    Gold,
}

impl ResourceFamily {
    /// Families in report order.
    pub const ALL: [ResourceFamily; 3] =
        [ResourceFamily::Stones, ResourceFamily::Iron, ResourceFamily::Gold];

    /// Key of the collection in the raw document.
    pub fn collection_key(&self) -> &'static str {
        match self {
            ResourceFamily::Stones => "stones",
            ResourceFamily::Iron => "iron",
            ResourceFamily::Gold => "gold",
        }
    }

    /// Catalog kind the family's nodes report as.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceFamily::Stones => "Stone",
            ResourceFamily::Iron => "Iron",
            ResourceFamily::Gold => "Gold",
        }
    }
}

/// Validated farm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmDocument {
    pub coins: f64,
    pub balance: String,
    pub crops: Collection<CropPlot>,
    pub stones: Collection<ResourcePlot>,
    pub iron: Collection<ResourcePlot>,
    pub gold: Collection<ResourcePlot>,
    pub fruit_patches: Collection<FruitPatch>,
    pub flower_beds: Collection<FlowerBed>,
    pub delivery_orders: Vec<Order>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl FarmDocument {
    /// Resource collection for a family.
    pub fn resources(&self, family: ResourceFamily) -> &Collection<ResourcePlot> {
        match family {
            ResourceFamily::Stones => &self.stones,
            ResourceFamily::Iron => &self.iron,
            ResourceFamily::Gold => &self.gold,
        }
    }
}
