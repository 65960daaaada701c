// ABOUTME: Static registry of exercise metrics-template contracts
// ABOUTME: Single source of truth for required/optional fields per template type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Metrics Template Catalog
//!
//! Every exercise in a REBLD plan carries a `metrics_template` object that
//! declares how its performance target is measured: sets and reps with
//! weight, a plain duration, a distance, an interval format, and so on.
//!
//! This module is the single source of truth for those shapes. The plan
//! validator enforces them, and the prompt builders render them into the
//! generation prompt, so the AI, the validator, and the persistence schema
//! can never drift apart.
//!
//! The catalog is populated once from a literal table and is read-only for
//! the lifetime of the process.
//!
//! ## Example
//!
//! ```rust
//! use rebld_plan_engine::plan::templates::{lookup, TemplateKind};
//!
//! let descriptor = lookup("sets_reps_weight").expect("known template");
//! assert_eq!(descriptor.kind, TemplateKind::SetsRepsWeight);
//! assert!(descriptor.required_fields.contains(&"target_sets"));
//!
//! // Unknown identifiers are a lookup miss, never a panic.
//! assert!(lookup("treadmill").is_none());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

// ============================================================================
// Template Kind
// ============================================================================

/// The fixed set of metrics-template type identifiers.
///
/// Variant order matches the catalog table below; error messages list the
/// identifiers in this order so repeated validation output is byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Standard strength training with weights
    SetsRepsWeight,
    /// Bodyweight exercises without added weight
    SetsReps,
    /// Cardio measured by time only
    DurationOnly,
    /// Cardio with a specific distance target
    DistanceTime,
    /// Interval training with work/rest periods
    SetsDurationRest,
    /// Distance-based interval training
    SetsDistanceRest,
    /// Timed holds or isometric exercises
    SetsDuration,
    /// Weighted carries or holds
    SetsDurationWeight,
    /// Controlled tempo exercises
    Tempo,
}

impl TemplateKind {
    /// All template kinds in catalog order
    pub const ALL: [Self; 9] = [
        Self::SetsRepsWeight,
        Self::SetsReps,
        Self::DurationOnly,
        Self::DistanceTime,
        Self::SetsDurationRest,
        Self::SetsDistanceRest,
        Self::SetsDuration,
        Self::SetsDurationWeight,
        Self::Tempo,
    ];

    /// Wire-format identifier for this template kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetsRepsWeight => "sets_reps_weight",
            Self::SetsReps => "sets_reps",
            Self::DurationOnly => "duration_only",
            Self::DistanceTime => "distance_time",
            Self::SetsDurationRest => "sets_duration_rest",
            Self::SetsDistanceRest => "sets_distance_rest",
            Self::SetsDuration => "sets_duration",
            Self::SetsDurationWeight => "sets_duration_weight",
            Self::Tempo => "tempo",
        }
    }

    /// Parse a wire-format identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sets_reps_weight" => Some(Self::SetsRepsWeight),
            "sets_reps" => Some(Self::SetsReps),
            "duration_only" => Some(Self::DurationOnly),
            "distance_time" => Some(Self::DistanceTime),
            "sets_duration_rest" => Some(Self::SetsDurationRest),
            "sets_distance_rest" => Some(Self::SetsDistanceRest),
            "sets_duration" => Some(Self::SetsDuration),
            "sets_duration_weight" => Some(Self::SetsDurationWeight),
            "tempo" => Some(Self::Tempo),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Descriptor Table
// ============================================================================

/// Field contract for one metrics-template type.
///
/// `required_fields` are enforced as present-and-non-null by the validator.
/// Several templates accept alternate spellings of the same semantic value;
/// those aliases live in `optional_fields` and the validator resolves them
/// with first-present-wins semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateDescriptor {
    /// Template kind this descriptor belongs to
    pub kind: TemplateKind,
    /// One-line description of the template
    pub description: &'static str,
    /// When a coach would reach for this template
    pub use_case: &'static str,
    /// Representative exercise names
    pub examples: &'static [&'static str],
    /// Fields that must be present and non-null
    pub required_fields: &'static [&'static str],
    /// Fields that may be present (including accepted aliases)
    pub optional_fields: &'static [&'static str],
}

impl TemplateDescriptor {
    /// A canonical JSON example of this template, suitable for prompts
    #[must_use]
    pub fn json_example(&self) -> Value {
        match self.kind {
            TemplateKind::SetsRepsWeight => json!({
                "type": "sets_reps_weight",
                "target_sets": 4,
                "target_reps": "8-10",
                "target_weight": 80,
                "weight_unit": "kg",
                "rest_period_s": 90,
                "rpe": 7,
            }),
            TemplateKind::SetsReps => json!({
                "type": "sets_reps",
                "target_sets": 3,
                "target_reps": 15,
                "rest_period_s": 60,
                "rpe": 6,
            }),
            TemplateKind::DurationOnly => json!({
                "type": "duration_only",
                "duration_minutes": 45,
                "rpe": 6,
                "notes": "Zone 2 cardio - conversational pace",
            }),
            TemplateKind::DistanceTime => json!({
                "type": "distance_time",
                "distance_km": 5,
                "target_time_s": 1800,
                "rpe": 7,
            }),
            TemplateKind::SetsDurationRest => json!({
                "type": "sets_duration_rest",
                "sets": 8,
                "duration_seconds": 30,
                "rest_seconds": 90,
                "rpe": 9,
            }),
            TemplateKind::SetsDistanceRest => json!({
                "type": "sets_distance_rest",
                "sets": 8,
                "distance_m": 400,
                "rest_seconds": 90,
                "rpe": 8,
            }),
            TemplateKind::SetsDuration => json!({
                "type": "sets_duration",
                "target_sets": 3,
                "duration_seconds": 60,
                "rest_period_s": 60,
                "rpe": 7,
            }),
            TemplateKind::SetsDurationWeight => json!({
                "type": "sets_duration_weight",
                "target_sets": 3,
                "duration_seconds": 45,
                "target_weight": 32,
                "weight_unit": "kg",
                "rest_period_s": 90,
                "rpe": 7,
            }),
            TemplateKind::Tempo => json!({
                "type": "tempo",
                "target_sets": 4,
                "target_reps": 6,
                "tempo_eccentric": 3,
                "tempo_pause": 1,
                "tempo_concentric": 1,
                "tempo_top": 0,
                "target_weight": 70,
                "rest_period_s": 120,
                "rpe": 8,
            }),
        }
    }
}

/// The catalog, in `TemplateKind::ALL` order (indexed by discriminant).
static CATALOG: [TemplateDescriptor; 9] = [
    // Strength training (most common)
    TemplateDescriptor {
        kind: TemplateKind::SetsRepsWeight,
        description: "Standard strength training with weights",
        use_case: "Barbell, dumbbell, machine exercises with resistance",
        examples: &[
            "Barbell Bench Press",
            "Barbell Back Squat",
            "Dumbbell Row",
            "Leg Press",
            "Cable Fly",
        ],
        required_fields: &["type", "target_sets", "target_reps"],
        optional_fields: &[
            "target_weight",
            "weight_unit",
            "one_rep_max_percentage",
            "rest_period_s",
            "rpe",
        ],
    },
    // Bodyweight exercises
    TemplateDescriptor {
        kind: TemplateKind::SetsReps,
        description: "Bodyweight exercises without added weight",
        use_case: "Push-ups, pull-ups, air squats, burpees",
        examples: &["Push-ups", "Pull-ups", "Air Squats", "Burpees", "Sit-ups"],
        required_fields: &["type", "target_sets", "target_reps"],
        optional_fields: &["rest_period_s", "rpe"],
    },
    // Cardio - duration based (most common for machines)
    TemplateDescriptor {
        kind: TemplateKind::DurationOnly,
        description: "Cardio exercises measured by time only",
        use_case: "Treadmill, bike, elliptical - focus on duration not distance",
        examples: &[
            "Treadmill Run (30 min)",
            "Stationary Bike (45 min)",
            "Elliptical (60 min)",
            "StairMaster (40 min)",
            "Rowing Machine (30 min)",
        ],
        required_fields: &["type", "duration_minutes"],
        optional_fields: &["rpe", "notes"],
    },
    // Cardio - distance based
    TemplateDescriptor {
        kind: TemplateKind::DistanceTime,
        description: "Cardio with specific distance target",
        use_case: "Running, cycling, rowing with distance goals",
        examples: &["5km Run", "10km Bike", "2000m Row", "400m Sprint"],
        required_fields: &["type"],
        optional_fields: &["distance_km", "distance_m", "target_time_s", "rpe"],
    },
    // Interval training
    // Validator accepts alternative field names (sets/target_sets,
    // duration_seconds/work_duration_s, rest_seconds/rest_duration_s)
    TemplateDescriptor {
        kind: TemplateKind::SetsDurationRest,
        description: "Interval training with work/rest periods",
        use_case: "HIIT, sprint intervals, bike sprints",
        examples: &[
            "8 x 30s Sprint (90s rest)",
            "10 x 1min Bike Sprint (60s rest)",
            "Tabata (20s work / 10s rest)",
        ],
        required_fields: &["type"],
        optional_fields: &[
            "sets",
            "target_sets",
            "duration_seconds",
            "work_duration_s",
            "rest_seconds",
            "rest_duration_s",
            "rpe",
        ],
    },
    TemplateDescriptor {
        kind: TemplateKind::SetsDistanceRest,
        description: "Distance-based interval training",
        use_case: "Track sprints, rowing intervals",
        examples: &["8 x 400m (90s rest)", "5 x 1000m Row (2min rest)"],
        required_fields: &["type", "sets", "rest_seconds"],
        optional_fields: &["distance_km", "distance_m", "rpe"],
    },
    // Timed holds
    // Validator accepts alternative field names (duration_seconds/target_duration_s)
    TemplateDescriptor {
        kind: TemplateKind::SetsDuration,
        description: "Timed holds or isometric exercises",
        use_case: "Planks, wall sits, dead hangs",
        examples: &["Plank Hold", "Wall Sit", "Dead Hang", "L-Sit Hold"],
        required_fields: &["type", "target_sets"],
        optional_fields: &["duration_seconds", "target_duration_s", "rest_period_s", "rpe"],
    },
    // Weighted carries
    TemplateDescriptor {
        kind: TemplateKind::SetsDurationWeight,
        description: "Weighted carries or holds",
        use_case: "Farmer carries, suitcase carries, overhead walks",
        examples: &["Farmer Carry", "Suitcase Carry", "Overhead Walk", "Waiter Walk"],
        required_fields: &["type", "target_sets", "duration_seconds"],
        optional_fields: &["target_weight", "weight_unit", "rest_period_s", "rpe"],
    },
    // Tempo training
    TemplateDescriptor {
        kind: TemplateKind::Tempo,
        description: "Controlled tempo exercises",
        use_case: "Eccentric-focused, paused lifts",
        examples: &[
            "Tempo Squat (3-1-1-0)",
            "Paused Bench Press",
            "Slow Eccentric Deadlift",
        ],
        required_fields: &[
            "type",
            "target_sets",
            "target_reps",
            "tempo_eccentric",
            "tempo_pause",
            "tempo_concentric",
            "tempo_top",
        ],
        optional_fields: &["target_weight", "rest_period_s", "rpe"],
    },
];

// ============================================================================
// Lookup
// ============================================================================

/// Get the descriptor for a template kind
#[must_use]
pub fn descriptor(kind: TemplateKind) -> &'static TemplateDescriptor {
    &CATALOG[kind as usize]
}

/// Look up a template descriptor by its wire-format identifier.
///
/// An unknown identifier is a lookup miss, not a failure: callers treat it as
/// a validation finding ("invalid template type") and keep going.
#[must_use]
pub fn lookup(type_name: &str) -> Option<&'static TemplateDescriptor> {
    TemplateKind::parse(type_name).map(descriptor)
}

/// Comma-separated list of all valid template identifiers, in catalog order
#[must_use]
pub fn valid_type_list() -> String {
    TemplateKind::ALL
        .iter()
        .map(TemplateKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
