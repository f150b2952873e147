//! Weighted progress items tracked against a parent skill.
//!
//! # Responsibility
//! - Validate weightage against the fixed story-point scale.
//! - Define the persisted item and its weighted read projection.
//! - Compute an item's share of its siblings' total weight.
//!
//! # Invariants
//! - A persisted item always carries a weightage from `ALLOWED_WEIGHTAGES`.
//! - `weight_percent` exists only on `WeightedProgressItem`.

use crate::model::skill::SkillId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ProgressItemId = Uuid;

/// Every weightage a progress item may carry.
pub const ALLOWED_WEIGHTAGES: [i64; 6] = [1, 3, 5, 8, 13, 21];

/// Weightage outside `ALLOWED_WEIGHTAGES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWeightage {
    pub value: i64,
}

impl Display for InvalidWeightage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "weightage must be one of: 1, 3, 5, 8, 13, 21 (got {})",
            self.value
        )
    }
}

impl Error for InvalidWeightage {}

/// Checks `value` against the allowed weightage scale.
pub fn validate_weightage(value: i64) -> Result<Weightage, InvalidWeightage> {
    if ALLOWED_WEIGHTAGES.contains(&value) {
        Ok(Weightage(value))
    } else {
        Err(InvalidWeightage { value })
    }
}

/// Weightage proven to be on the allowed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Weightage(i64);

impl Weightage {
    pub fn new(value: i64) -> Result<Self, InvalidWeightage> {
        validate_weightage(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Weightage {
    type Error = InvalidWeightage;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weightage> for i64 {
    fn from(value: Weightage) -> Self {
        value.0
    }
}

/// Persisted progress item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressItem {
    pub id: ProgressItemId,
    pub parent_skill_id: SkillId,
    pub name: String,
    pub achieved: bool,
    pub weightage: Weightage,
    pub comments: String,
}

/// Mutable progress item fields accepted on create and update.
///
/// `weightage` stays a raw integer here so that an off-scale value is
/// reported as a validation failure rather than a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressItemDraft {
    pub name: String,
    pub achieved: bool,
    pub weightage: i64,
    pub comments: String,
}

impl ProgressItemDraft {
    /// Returns the validated weightage of this draft.
    pub fn validate(&self) -> Result<Weightage, InvalidWeightage> {
        Weightage::new(self.weightage)
    }
}

/// Create request: a draft bound to exactly one parent skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgressItem {
    pub parent_skill_id: SkillId,
    #[serde(flatten)]
    pub draft: ProgressItemDraft,
}

/// Progress item annotated with its share of the parent skill's weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedProgressItem {
    #[serde(flatten)]
    pub item: ProgressItem,
    /// Percentage in `0.0..=100.0`, unrounded.
    pub weight_percent: f64,
}

/// Returns `weight` as a percentage of `total_weight`.
///
/// A non-positive total yields `0.0` instead of NaN/inf; validation keeps
/// that case unreachable for stored data.
pub fn weight_percent(weight: i64, total_weight: i64) -> f64 {
    if total_weight <= 0 {
        return 0.0;
    }
    (weight as f64 / total_weight as f64) * 100.0
}
