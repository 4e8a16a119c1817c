//! Domain DTOs for the workout API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently of
//! the mock-server crate; the integration tests catch any drift between the
//! two. Ids are server-assigned integers — the client never invents one.

use serde::{Deserialize, Serialize};

/// A muscle-group / body-part grouping that exercises can belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// An exercise, optionally filed under one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// One logged workout entry.
///
/// `exercise_name` and `volume` (weight × reps × sets) are computed
/// server-side at creation time; `memo` may be absent in older responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: i64,
    pub date: String,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub volume: f64,
}

/// Dashboard aggregate computed server-side from records. `total_workouts`
/// counts distinct workout dates, not individual records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total_workouts: u64,
    pub total_volume: i64,
    pub max_weight: f64,
}

/// The authenticated account, as returned by registration and the
/// who-am-I probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// Request payload for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// Request payload for creating an exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Foreign-key update for an exercise. `category_id: None` serializes as an
/// explicit null and detaches the exercise from its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryChange {
    pub category_id: Option<i64>,
}

/// Request payload for creating a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub date: String,
    pub exercise_id: i64,
    pub weight: f64,
    pub reps: u32,
    #[serde(default = "default_sets")]
    pub sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

fn default_sets() -> u32 {
    1
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Raw per-row input from a recording form, before validation.
///
/// Numeric fields arrive exactly as the user typed them. [`Self::coerce`]
/// applies the submission rules: a row whose reps field does not parse to a
/// positive integer is dropped entirely, unparsable weight becomes 0,
/// unparsable sets becomes 1, and a blank memo becomes absent.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub weight: String,
    pub reps: String,
    pub sets: String,
    pub memo: String,
}

impl RecordDraft {
    /// Turn this row into a submittable payload, or `None` when the row
    /// fails the reps rule and must not produce a request at all.
    pub fn coerce(&self, date: &str, exercise_id: i64) -> Option<NewRecord> {
        let reps = self.reps.trim().parse::<u32>().ok().filter(|r| *r > 0)?;

        let weight = match self.weight.trim().parse::<f64>() {
            Ok(w) if w.is_finite() && w >= 0.0 => w,
            _ => 0.0,
        };
        let sets = self
            .sets
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(1);
        let memo = self.memo.trim();
        let memo = (!memo.is_empty()).then(|| memo.to_string());

        Some(NewRecord {
            date: date.to_string(),
            exercise_id,
            weight,
            reps,
            sets,
            memo,
        })
    }
}
