//! Farm document validation.
//!
//! Turns the untrusted JSON returned by the community API into a
//! [`FarmDocument`]. The parse is schema-driven: each object has a fixed set
//! of known fields with explicit coercion and default rules, and everything
//! else is carried through in the object's `extra` map.
//!
//! Defaults:
//! - plot `createdAt` is 0, `x`/`y` are 0
//! - crop and resource plots are 1x1, fruit patches 2x2, flower beds 1x3
//! - `stones`, `iron`, `gold`, `fruitPatches`, `flowers.flowerBeds` and
//!   `delivery.orders` are empty when absent; `crops` is required

mod coerce;
mod reader;

pub use coerce::{coerce_number, coerce_text};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    CultivationActivity, ExtractionActivity, FarmDocument, FlowerActivity, Footprint,
    FruitActivity, Order, OrderReward, Plot, Position, ResourceFamily,
};
use reader::ObjectReader;

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("required field is missing")]
    Missing,

    #[error("expected an object, got {0}")]
    ExpectedObject(String),

    #[error("expected an array, got {0}")]
    ExpectedArray(String),

    #[error("expected a string, got {0}")]
    ExpectedString(String),

    #[error("expected a number or numeric string, got {0}")]
    NotNumeric(String),
}

/// The document does not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid farm data at `{path}`: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `farm.crops.1.crop.plantedAt`
    pub path: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

const FARM_FIELDS: &[&str] = &[
    "coins",
    "balance",
    "crops",
    "stones",
    "iron",
    "gold",
    "fruitPatches",
    "flowers",
    "delivery",
];
const PLOT_FIELDS: &[&str] = &["createdAt", "x", "y", "height", "width"];
const CROP_FIELDS: &[&str] = &["name", "plantedAt", "id", "amount"];
const STONE_FIELDS: &[&str] = &["minedAt", "amount"];
const FRUIT_FIELDS: &[&str] = &["name", "plantedAt", "harvestedAt", "amount", "harvestsLeft"];
const FLOWER_FIELDS: &[&str] = &["name", "plantedAt", "amount"];
const ORDER_FIELDS: &[&str] = &["id", "from", "items", "reward", "createdAt", "readyAt", "completedAt"];
const REWARD_FIELDS: &[&str] = &["coins", "sfl"];

/// Validate a raw `{ "farm": { ... } }` document.
pub fn validate(raw: &Value) -> Result<FarmDocument, ValidationError> {
    let root = ObjectReader::new(raw, String::new())?;
    let farm = root.object("farm")?;

    let coins = farm.number("coins")?;
    let balance = farm.text("balance")?;

    let crops = farm.collection("crops", |plot| {
        parse_plot(plot, Footprint::PLOT, "crop", parse_crop)
    })?;

    let resources = |family: ResourceFamily| {
        farm.optional_collection(family.collection_key(), |plot| {
            parse_plot(plot, Footprint::PLOT, "stone", parse_stone)
        })
    };
    let stones = resources(ResourceFamily::Stones)?;
    let iron = resources(ResourceFamily::Iron)?;
    let gold = resources(ResourceFamily::Gold)?;

    let fruit_patches = farm.optional_collection("fruitPatches", |patch| {
        parse_plot(patch, Footprint::FRUIT_PATCH, "fruit", parse_fruit)
    })?;

    let flower_beds = match farm.optional_object("flowers")? {
        Some(flowers) => flowers.optional_collection("flowerBeds", |bed| {
            parse_plot(bed, Footprint::FLOWER_BED, "flower", parse_flower)
        })?,
        None => Default::default(),
    };

    let delivery_orders = match farm.optional_object("delivery")? {
        Some(delivery) => delivery.optional_array("orders", parse_order)?,
        None => Vec::new(),
    };

    let document = FarmDocument {
        coins,
        balance,
        crops,
        stones,
        iron,
        gold,
        fruit_patches,
        flower_beds,
        delivery_orders,
        extra: farm.extra(FARM_FIELDS),
    };

    debug!(
        crops = document.crops.len(),
        stones = document.stones.len(),
        iron = document.iron.len(),
        gold = document.gold.len(),
        fruit_patches = document.fruit_patches.len(),
        flower_beds = document.flower_beds.len(),
        orders = document.delivery_orders.len(),
        "Validated farm document"
    );

    Ok(document)
}

fn parse_plot<'a, A, F>(
    plot: &ObjectReader<'a>,
    default_size: Footprint,
    activity_key: &str,
    parse_activity: F,
) -> Result<Plot<A>, ValidationError>
where
    F: Fn(&ObjectReader<'a>) -> Result<A, ValidationError>,
{
    let activity = plot
        .optional_object(activity_key)?
        .map(|activity| parse_activity(&activity))
        .transpose()?;

    let mut known = PLOT_FIELDS.to_vec();
    known.push(activity_key);

    Ok(Plot {
        position: Position {
            x: plot.number_or("x", 0.0)?,
            y: plot.number_or("y", 0.0)?,
        },
        size: Footprint {
            height: plot.number_or("height", default_size.height)?,
            width: plot.number_or("width", default_size.width)?,
        },
        created_at: plot.number_or("createdAt", 0.0)?,
        activity,
        extra: plot.extra(&known),
    })
}

fn parse_crop(crop: &ObjectReader<'_>) -> Result<CultivationActivity, ValidationError> {
    Ok(CultivationActivity {
        name: crop.string("name")?,
        planted_at: crop.number("plantedAt")?,
        id: crop.optional_string("id")?,
        amount: crop.optional_number("amount")?,
        extra: crop.extra(CROP_FIELDS),
    })
}

fn parse_stone(stone: &ObjectReader<'_>) -> Result<ExtractionActivity, ValidationError> {
    Ok(ExtractionActivity {
        mined_at: stone.number("minedAt")?,
        amount: stone.optional_number("amount")?,
        extra: stone.extra(STONE_FIELDS),
    })
}

fn parse_fruit(fruit: &ObjectReader<'_>) -> Result<FruitActivity, ValidationError> {
    Ok(FruitActivity {
        name: fruit.string("name")?,
        planted_at: fruit.number("plantedAt")?,
        harvested_at: fruit.optional_number("harvestedAt")?,
        amount: fruit.optional_number("amount")?,
        harvests_left: fruit.optional_number("harvestsLeft")?,
        extra: fruit.extra(FRUIT_FIELDS),
    })
}

fn parse_flower(flower: &ObjectReader<'_>) -> Result<FlowerActivity, ValidationError> {
    Ok(FlowerActivity {
        name: flower.string("name")?,
        planted_at: flower.number("plantedAt")?,
        amount: flower.optional_number("amount")?,
        extra: flower.extra(FLOWER_FIELDS),
    })
}

fn parse_order(order: &ObjectReader<'_>) -> Result<Order, ValidationError> {
    let items = match order.optional_object("items")? {
        Some(items) => items.numeric_entries()?,
        None => Default::default(),
    };

    let reward = match order.optional_object("reward")? {
        Some(reward) => OrderReward {
            coins: reward.optional_number("coins")?,
            sfl: reward.optional_number("sfl")?,
            extra: reward.extra(REWARD_FIELDS),
        },
        None => OrderReward::default(),
    };

    Ok(Order {
        id: order.text("id")?,
        from: order.string("from")?,
        items,
        reward,
        created_at: order.number("createdAt")?,
        ready_at: order.number("readyAt")?,
        completed_at: order.optional_number("completedAt")?,
        extra: order.extra(ORDER_FIELDS),
    })
}
