//! Readiness calculation engine.
//!
//! Computes how many seconds each occupied plot, patch or bed has left:
//! - Crops count down from `plantedAt`
//! - Resource nodes count down from `minedAt`, with the duration picked by the
//!   collection the node is listed under
//! - Fruit counts down from the later of `plantedAt` and `harvestedAt`, and
//!   never reports less than zero
//! - Flowers count down from `plantedAt`
//!
//! Records come out in category order (crops, resources, fruit, flowers) and,
//! within a category, in document order. The caller samples `now` once and
//! every record is computed against that instant.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Catalog;
use crate::models::{
    Category, Collection, FarmDocument, Plot, ReadinessRecord, ResourceFamily,
    UnknownKindWarning,
};

/// What to do with a kind that has no catalog duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKindPolicy {
    /// Treat the duration as zero, so the item reports as ready.
    ZeroDuration,
    /// Leave the item out of the report.
    Skip,
}

/// Unknown-kind policy per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    pub crops: UnknownKindPolicy,
    pub resources: UnknownKindPolicy,
    pub fruits: UnknownKindPolicy,
    pub flowers: UnknownKindPolicy,
}

impl Default for ReadinessPolicy {
    /// Unknown crops report as ready; unknown fruit and flowers are dropped.
    fn default() -> Self {
        Self {
            crops: UnknownKindPolicy::ZeroDuration,
            resources: UnknownKindPolicy::ZeroDuration,
            fruits: UnknownKindPolicy::Skip,
            flowers: UnknownKindPolicy::Skip,
        }
    }
}

impl ReadinessPolicy {
    pub fn for_category(&self, category: Category) -> UnknownKindPolicy {
        match category {
            Category::Crops => self.crops,
            Category::Resources => self.resources,
            Category::Fruits => self.fruits,
            Category::Flowers => self.flowers,
        }
    }
}

/// Result of one readiness pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readiness {
    pub records: Vec<ReadinessRecord>,
    pub warnings: Vec<UnknownKindWarning>,
}

impl Readiness {
    /// Records of one category, in order.
    pub fn category(&self, category: Category) -> Vec<ReadinessRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }
}

/// Whole seconds from `now_ms` until `anchor_ms + duration_secs`, rounded
/// towards negative infinity.
pub fn seconds_until(anchor_ms: f64, duration_secs: u64, now_ms: i64) -> i64 {
    let ready_at = anchor_ms + duration_secs as f64 * 1000.0;
    ((ready_at - now_ms as f64) / 1000.0).floor() as i64
}

/// Compute readiness records with the global catalog and default policy.
pub fn compute_readiness(doc: &FarmDocument, now_ms: i64) -> Vec<ReadinessRecord> {
    Calculator::new(Catalog::global()).compute(doc, now_ms).records
}

/// Readiness calculator bound to a catalog and policy.
#[derive(Debug, Clone, Copy)]
pub struct Calculator<'a> {
    catalog: &'a Catalog,
    policy: ReadinessPolicy,
}

impl<'a> Calculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            policy: ReadinessPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compute every category.
    pub fn compute(&self, doc: &FarmDocument, now_ms: i64) -> Readiness {
        let mut out = Readiness::default();
        self.crops(doc, now_ms, &mut out);
        self.resources(doc, now_ms, &mut out);
        self.fruits(doc, now_ms, &mut out);
        self.flowers(doc, now_ms, &mut out);
        out
    }

    fn crops(&self, doc: &FarmDocument, now_ms: i64, out: &mut Readiness) {
        for crop in activities(&doc.crops) {
            if let Some(duration) = self.duration(Category::Crops, &crop.name, out) {
                let secs = seconds_until(crop.planted_at, duration, now_ms);
                out.records
                    .push(ReadinessRecord::new(Category::Crops, &crop.name, secs));
            }
        }
    }

    fn resources(&self, doc: &FarmDocument, now_ms: i64, out: &mut Readiness) {
        for family in ResourceFamily::ALL {
            let kind = family.kind();
            for node in activities(doc.resources(family)) {
                if let Some(duration) = self.duration(Category::Resources, kind, out) {
                    let secs = seconds_until(node.mined_at, duration, now_ms);
                    out.records
                        .push(ReadinessRecord::new(Category::Resources, kind, secs));
                }
            }
        }
    }

    fn fruits(&self, doc: &FarmDocument, now_ms: i64, out: &mut Readiness) {
        for fruit in activities(&doc.fruit_patches) {
            if let Some(duration) = self.duration(Category::Fruits, &fruit.name, out) {
                let secs = seconds_until(fruit.anchor(), duration, now_ms).max(0);
                out.records
                    .push(ReadinessRecord::new(Category::Fruits, &fruit.name, secs));
            }
        }
    }

    fn flowers(&self, doc: &FarmDocument, now_ms: i64, out: &mut Readiness) {
        for flower in activities(&doc.flower_beds) {
            if let Some(duration) = self.duration(Category::Flowers, &flower.name, out) {
                let secs = seconds_until(flower.planted_at, duration, now_ms);
                out.records
                    .push(ReadinessRecord::new(Category::Flowers, &flower.name, secs));
            }
        }
    }

    /// Catalog duration, or the policy's answer for an unknown kind.
    fn duration(&self, category: Category, kind: &str, out: &mut Readiness) -> Option<u64> {
        if let Some(duration) = self.catalog.duration(category, kind) {
            return Some(duration);
        }

        let policy = self.policy.for_category(category);
        warn!(%category, kind, ?policy, "No duration known for kind");
        out.warnings.push(UnknownKindWarning {
            category,
            kind: kind.to_string(),
        });

        match policy {
            UnknownKindPolicy::ZeroDuration => Some(0),
            UnknownKindPolicy::Skip => None,
        }
    }
}

/// Activities of occupied slots, in document order.
fn activities<A>(slots: &Collection<Plot<A>>) -> impl Iterator<Item = &A> {
    slots.values().filter_map(|slot| slot.activity.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use serde_json::{json, Value};

    const NOW: i64 = 1_700_000_000_000;

    fn farm(extra: Value) -> FarmDocument {
        let mut raw = json!({ "farm": { "coins": 0, "balance": "0", "crops": {} } });
        if let Value::Object(fields) = extra {
            for (key, value) in fields {
                raw["farm"][key.as_str()] = value;
            }
        }
        validate(&raw).unwrap()
    }

    fn crop_farm(crops: &[(&str, i64)]) -> FarmDocument {
        let plots: serde_json::Map<String, Value> = crops
            .iter()
            .enumerate()
            .map(|(i, (name, planted_at))| {
                (
                    i.to_string(),
                    json!({ "x": i, "y": 0, "crop": { "name": name, "plantedAt": planted_at } }),
                )
            })
            .collect();
        farm(json!({ "crops": plots }))
    }

    #[test]
    fn test_seconds_until() {
        assert_eq!(seconds_until(0.0, 60, 30_000), 30);
        assert_eq!(seconds_until(0.0, 60, 60_000), 0);
        assert_eq!(seconds_until(0.0, 60, 90_000), -30);
        // floor, not truncation, on the negative side
        assert_eq!(seconds_until(0.0, 0, 1), -1);
        assert_eq!(seconds_until(0.0, 1, 1), 0);
    }

    #[test]
    fn test_crop_readiness() {
        let doc = crop_farm(&[("Sunflower", NOW - 30_000)]);
        let records = compute_readiness(&doc, NOW);

        assert_eq!(
            records,
            vec![ReadinessRecord::new(Category::Crops, "Sunflower", 30)]
        );
    }

    #[test]
    fn test_crop_can_go_negative() {
        let doc = crop_farm(&[("Sunflower", NOW - 90_000)]);
        let records = compute_readiness(&doc, NOW);
        assert_eq!(records[0].seconds_remaining, -30);
    }

    #[test]
    fn test_unknown_crop_uses_zero_duration() {
        let planted_at = NOW - 4_500;
        let doc = crop_farm(&[("Unobtainium", planted_at)]);
        let readiness = Calculator::new(Catalog::global()).compute(&doc, NOW);

        assert_eq!(readiness.records.len(), 1);
        assert_eq!(
            readiness.records[0].seconds_remaining,
            ((planted_at - NOW) as f64 / 1000.0).floor() as i64
        );
        assert_eq!(
            readiness.warnings,
            vec![UnknownKindWarning {
                category: Category::Crops,
                kind: "Unobtainium".to_string()
            }]
        );
    }

    #[test]
    fn test_crop_readiness_decreases_with_time() {
        let doc = crop_farm(&[("Barley", NOW)]);
        let mut previous = i64::MAX;
        for step in 0..50 {
            let now = NOW + step * 1_000;
            let secs = compute_readiness(&doc, now)[0].seconds_remaining;
            assert!(secs < previous);
            previous = secs;
        }
    }

    #[test]
    fn test_empty_plots_yield_nothing() {
        let doc = farm(json!({
            "crops": { "1": { "x": 0, "y": 0 } },
            "stones": { "s": { "x": 0, "y": 0 } },
            "fruitPatches": { "f": { "x": 0, "y": 0 } },
            "flowers": { "flowerBeds": { "b": { "x": 0, "y": 0 } } }
        }));
        assert!(compute_readiness(&doc, NOW).is_empty());
    }

    #[test]
    fn test_resource_duration_follows_collection() {
        let mined_at = NOW - 3_600_000;
        let node = json!({ "x": 0, "y": 0, "stone": { "minedAt": mined_at } });
        let doc = farm(json!({
            "stones": { "a": node.clone() },
            "iron": { "b": node.clone() },
            "gold": { "c": node }
        }));
        let records = compute_readiness(&doc, NOW);

        assert_eq!(
            records,
            vec![
                ReadinessRecord::new(Category::Resources, "Stone", 3 * 3600),
                ReadinessRecord::new(Category::Resources, "Iron", 7 * 3600),
                ReadinessRecord::new(Category::Resources, "Gold", 23 * 3600),
            ]
        );
    }

    #[test]
    fn test_fruit_uses_harvest_anchor() {
        // 3600s fruit planted at 0 and harvested at 1000ms
        let catalog = Catalog::default().with_duration(Category::Fruits, "Test Fruit", 3600);
        let doc = farm(json!({ "fruitPatches": { "p": { "fruit": {
            "name": "Test Fruit", "plantedAt": 0, "harvestedAt": 1000
        } } } }));
        let readiness = Calculator::new(&catalog).compute(&doc, 0);

        assert_eq!(readiness.records[0].seconds_remaining, 3601);
    }

    #[test]
    fn test_fruit_clamped_at_zero() {
        let doc = farm(json!({ "fruitPatches": { "p": { "fruit": {
            "name": "Tomato", "plantedAt": NOW - 10 * 3_600_000
        } } } }));
        let records = compute_readiness(&doc, NOW);

        assert_eq!(records[0].seconds_remaining, 0);
    }

    #[test]
    fn test_fruit_not_yet_ready() {
        let doc = farm(json!({ "fruitPatches": { "p": { "fruit": {
            "name": "Tomato", "plantedAt": 0, "harvestedAt": NOW - 3_600_000
        } } } }));
        let records = compute_readiness(&doc, NOW);

        assert_eq!(records[0].seconds_remaining, 3600);
    }

    #[test]
    fn test_unknown_fruit_and_flower_skipped() {
        let doc = farm(json!({
            "fruitPatches": { "p": { "fruit": { "name": "Durian", "plantedAt": 0 } } },
            "flowers": { "flowerBeds": { "b": { "flower": { "name": "Corpse Lily", "plantedAt": 0 } } } }
        }));
        let readiness = Calculator::new(Catalog::global()).compute(&doc, NOW);

        assert!(readiness.records.is_empty());
        assert_eq!(readiness.warnings.len(), 2);
    }

    #[test]
    fn test_policy_switch() {
        let doc = farm(json!({
            "crops": { "1": { "crop": { "name": "Unobtainium", "plantedAt": NOW } } },
            "fruitPatches": { "p": { "fruit": { "name": "Durian", "plantedAt": NOW } } }
        }));
        let policy = ReadinessPolicy {
            crops: UnknownKindPolicy::Skip,
            fruits: UnknownKindPolicy::ZeroDuration,
            ..Default::default()
        };
        let readiness = Calculator::new(Catalog::global())
            .with_policy(policy)
            .compute(&doc, NOW);

        assert_eq!(
            readiness.records,
            vec![ReadinessRecord::new(Category::Fruits, "Durian", 0)]
        );
    }

    #[test]
    fn test_flowers_not_clamped() {
        let doc = farm(json!({ "flowers": { "flowerBeds": { "b": { "flower": {
            "name": "Red Pansy", "plantedAt": NOW - 2 * 86_400_000
        } } } } }));
        let records = compute_readiness(&doc, NOW);

        assert_eq!(
            records,
            vec![ReadinessRecord::new(Category::Flowers, "Red Pansy", -86_400)]
        );
    }

    #[test]
    fn test_category_order_and_document_order() {
        let doc = farm(json!({
            "flowers": { "flowerBeds": { "b": { "flower": { "name": "Red Pansy", "plantedAt": NOW } } } },
            "fruitPatches": { "p": { "fruit": { "name": "Apple", "plantedAt": NOW } } },
            "gold": { "g": { "stone": { "minedAt": NOW } } },
            "stones": { "s": { "stone": { "minedAt": NOW } } },
            "crops": {
                "2": { "crop": { "name": "Potato", "plantedAt": NOW } },
                "1": { "crop": { "name": "Carrot", "plantedAt": NOW } }
            }
        }));
        let readiness = Calculator::new(Catalog::global()).compute(&doc, NOW);
        let kinds: Vec<_> = readiness.records.iter().map(|r| r.kind.as_str()).collect();

        assert_eq!(
            kinds,
            vec!["Potato", "Carrot", "Stone", "Gold", "Apple", "Red Pansy"]
        );
        assert_eq!(readiness.category(Category::Resources).len(), 2);
    }
}
