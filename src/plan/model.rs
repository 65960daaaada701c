// ABOUTME: Canonical typed model of a weekly workout plan
// ABOUTME: The persistence-facing shape shared by the tracker, parser, and AI generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Plan Model
//!
//! Typed representation of a validated weekly workout plan. The JSON shape of
//! these types is the wire format persisted to the document store, so the
//! shapes here and the rules in [`validator`](super::validator) must be kept
//! in lock-step: any new template type or field alias is added to both (and
//! to the [`templates`](super::templates) catalog) simultaneously.
//!
//! The plan tree is owned exclusively by its caller; nothing here holds
//! shared state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::validator::{first_embedded_integer, is_rest_day_focus};
use super::templates::TemplateKind;
use crate::errors::{AppError, AppResult};

// ============================================================================
// String Enums
// ============================================================================

/// Execution mode of a block of exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Standard straight sets
    Single,
    /// 2-4 exercises performed back-to-back, repeated for rounds
    Superset,
    /// As Many Rounds As Possible within a time cap
    Amrap,
    /// 4+ exercises with minimal rest, repeated for rounds
    Circuit,
    /// Every Minute On the Minute
    Emom,
}

impl BlockType {
    /// Wire-format identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Superset => "superset",
            Self::Amrap => "amrap",
            Self::Circuit => "circuit",
            Self::Emom => "emom",
        }
    }

    /// Parse a wire-format identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "superset" => Some(Self::Superset),
            "amrap" => Some(Self::Amrap),
            "circuit" => Some(Self::Circuit),
            "emom" => Some(Self::Emom),
            _ => None,
        }
    }

    /// Round-based blocks must declare `rounds`
    #[must_use]
    pub const fn requires_rounds(&self) -> bool {
        matches!(self, Self::Superset | Self::Circuit)
    }

    /// Time-capped blocks must declare `duration_minutes`
    #[must_use]
    pub const fn requires_duration(&self) -> bool {
        matches!(self, Self::Amrap | Self::Emom)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an exercise sits in the session flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    /// Preparation work before the main block
    Warmup,
    /// The working portion of the session
    Main,
    /// Wind-down and mobility work
    Cooldown,
}

impl ExerciseCategory {
    /// Wire-format identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Main => "main",
            Self::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training window on twice-daily training days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// AM session
    Morning,
    /// PM session
    Evening,
}

impl TimeOfDay {
    /// Wire-format identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
        }
    }

    /// Parse a wire-format identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(Self::Morning),
            "evening" => Some(Self::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit attached to a weight target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms
    Kg,
    /// Pounds
    Lbs,
}

/// Periodization phase of a multi-week program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodizationPhase {
    /// Foundation, technique, general fitness
    Base,
    /// Sport-specific, progressive overload
    Build,
    /// Competition simulation, highest intensity
    Peak,
    /// Reduced volume and intensity before the goal date
    Taper,
    /// Dedicated recovery
    Recovery,
}

// ============================================================================
// Flexible Scalars
// ============================================================================

/// A rep target: a plain count or a range string like `"8-10"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepTarget {
    /// Fixed rep count
    Count(f64),
    /// Range or annotated text ("8-10", "15 per side")
    Range(String),
}

impl RepTarget {
    /// Lowest rep count this target asks for, when one can be read
    #[must_use]
    pub fn minimum(&self) -> Option<f64> {
        match self {
            Self::Count(count) => Some(*count),
            Self::Range(text) => first_embedded_integer(text),
        }
    }
}

/// A duration that may arrive as a number or annotated text
/// (`45` or `"45 min easy"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    /// Plain numeric duration
    Number(f64),
    /// Annotated text; the first embedded integer is the value
    Text(String),
}

impl DurationValue {
    /// Numeric reading of the duration, if one can be extracted
    #[must_use]
    pub fn resolve(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => first_embedded_integer(text),
        }
    }
}

// ============================================================================
// Metrics Templates
// ============================================================================

/// How an exercise's performance target is measured.
///
/// Tagged by the `type` field on the wire; the variant set mirrors the
/// [`templates`](super::templates) catalog. Aliased fields (e.g. `sets` vs
/// `target_sets` on intervals) are modeled as separate optional fields with a
/// resolving accessor, so a payload carrying both spellings still
/// deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricsTemplate {
    /// Standard strength training with weights
    SetsRepsWeight {
        /// Working set count
        target_sets: f64,
        /// Rep count or range
        target_reps: RepTarget,
        /// Load target
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_weight: Option<f64>,
        /// Unit for `target_weight`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight_unit: Option<WeightUnit>,
        /// Load expressed as a percentage of one-rep max
        #[serde(default, skip_serializing_if = "Option::is_none")]
        one_rep_max_percentage: Option<f64>,
        /// Rest between sets in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_period_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Bodyweight exercises without added weight
    SetsReps {
        /// Working set count
        target_sets: f64,
        /// Rep count or range
        target_reps: RepTarget,
        /// Rest between sets in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_period_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Cardio measured by time only
    DurationOnly {
        /// Duration target; rest entries may carry symbolic text here
        duration_minutes: DurationValue,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
        /// Coaching notes ("Zone 2 cardio")
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    /// Cardio with a specific distance target; exactly one of the distance
    /// fields should be set
    DistanceTime {
        /// Distance in kilometers
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance_km: Option<f64>,
        /// Distance in meters
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance_m: Option<f64>,
        /// Optional target time in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_time_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Interval training with work/rest periods
    SetsDurationRest {
        /// Interval count
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sets: Option<f64>,
        /// Accepted alias for `sets`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_sets: Option<f64>,
        /// Work period in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_seconds: Option<f64>,
        /// Accepted alias for `duration_seconds`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        work_duration_s: Option<f64>,
        /// Rest period in seconds; zero is a legitimate value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_seconds: Option<f64>,
        /// Accepted alias for `rest_seconds`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_duration_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Distance-based interval training
    SetsDistanceRest {
        /// Interval count
        sets: f64,
        /// Rest period in seconds
        rest_seconds: f64,
        /// Distance in kilometers
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance_km: Option<f64>,
        /// Distance in meters
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance_m: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Timed holds or isometric exercises
    SetsDuration {
        /// Hold count
        target_sets: f64,
        /// Hold duration in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_seconds: Option<DurationValue>,
        /// Accepted alias for `duration_seconds`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_duration_s: Option<DurationValue>,
        /// Accepted alias for `duration_seconds`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_duration_seconds: Option<DurationValue>,
        /// Accepted alias for `duration_seconds`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hold_seconds: Option<DurationValue>,
        /// Rest between holds in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_period_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Weighted carries or holds
    SetsDurationWeight {
        /// Carry count
        target_sets: f64,
        /// Carry duration in seconds
        duration_seconds: DurationValue,
        /// Load target
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_weight: Option<f64>,
        /// Unit for `target_weight`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight_unit: Option<WeightUnit>,
        /// Rest between carries in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_period_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
    /// Controlled tempo exercises (eccentric-pause-concentric-top seconds)
    Tempo {
        /// Working set count
        target_sets: f64,
        /// Rep count or range
        target_reps: RepTarget,
        /// Seconds lowering
        tempo_eccentric: f64,
        /// Seconds paused at the bottom
        tempo_pause: f64,
        /// Seconds lifting
        tempo_concentric: f64,
        /// Seconds paused at the top
        tempo_top: f64,
        /// Load target
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_weight: Option<f64>,
        /// Rest between sets in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_period_s: Option<f64>,
        /// Rate of Perceived Exertion, 1-10
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rpe: Option<f64>,
    },
}

impl MetricsTemplate {
    /// The catalog kind of this template
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        match self {
            Self::SetsRepsWeight { .. } => TemplateKind::SetsRepsWeight,
            Self::SetsReps { .. } => TemplateKind::SetsReps,
            Self::DurationOnly { .. } => TemplateKind::DurationOnly,
            Self::DistanceTime { .. } => TemplateKind::DistanceTime,
            Self::SetsDurationRest { .. } => TemplateKind::SetsDurationRest,
            Self::SetsDistanceRest { .. } => TemplateKind::SetsDistanceRest,
            Self::SetsDuration { .. } => TemplateKind::SetsDuration,
            Self::SetsDurationWeight { .. } => TemplateKind::SetsDurationWeight,
            Self::Tempo { .. } => TemplateKind::Tempo,
        }
    }

    /// Working set count, resolved across accepted aliases where they exist
    #[must_use]
    pub fn set_count(&self) -> Option<f64> {
        match self {
            Self::SetsRepsWeight { target_sets, .. }
            | Self::SetsReps { target_sets, .. }
            | Self::SetsDuration { target_sets, .. }
            | Self::SetsDurationWeight { target_sets, .. }
            | Self::Tempo { target_sets, .. } => Some(*target_sets),
            Self::SetsDurationRest {
                sets, target_sets, ..
            } => sets.or(*target_sets),
            Self::SetsDistanceRest { sets, .. } => Some(*sets),
            Self::DurationOnly { .. } | Self::DistanceTime { .. } => None,
        }
    }

    /// Hold/work duration in seconds, resolved across accepted aliases
    #[must_use]
    pub fn work_seconds(&self) -> Option<f64> {
        match self {
            Self::SetsDuration {
                duration_seconds,
                target_duration_s,
                target_duration_seconds,
                hold_seconds,
                ..
            } => [
                duration_seconds,
                target_duration_s,
                target_duration_seconds,
                hold_seconds,
            ]
            .into_iter()
            .find_map(|field| field.as_ref().and_then(DurationValue::resolve)),
            Self::SetsDurationRest {
                duration_seconds,
                work_duration_s,
                ..
            } => duration_seconds.or(*work_duration_s),
            Self::SetsDurationWeight {
                duration_seconds, ..
            } => duration_seconds.resolve(),
            _ => None,
        }
    }

    /// Rest period between intervals in seconds, resolved across aliases
    #[must_use]
    pub fn interval_rest_seconds(&self) -> Option<f64> {
        match self {
            Self::SetsDurationRest {
                rest_seconds,
                rest_duration_s,
                ..
            } => rest_seconds.or(*rest_duration_s),
            Self::SetsDistanceRest { rest_seconds, .. } => Some(*rest_seconds),
            _ => None,
        }
    }

    /// Duration target in minutes for duration-only cardio
    #[must_use]
    pub fn target_minutes(&self) -> Option<f64> {
        match self {
            Self::DurationOnly {
                duration_minutes, ..
            } => duration_minutes.resolve(),
            _ => None,
        }
    }
}

// ============================================================================
// Plan Tree
// ============================================================================

/// One exercise inside a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Display name ("Barbell Back Squat")
    pub exercise_name: String,
    /// Session-flow category
    pub category: ExerciseCategory,
    /// How the target is measured; mandatory, never null
    pub metrics_template: MetricsTemplate,
    /// Rest after this exercise in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<f64>,
    /// Rate of Perceived Exertion, 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    /// Exercise-specific notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A group of exercises sharing an execution mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutBlock {
    /// Execution mode
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Exercises in this block; never empty in a valid plan
    pub exercises: Vec<PlannedExercise>,
    /// Round count; required for superset/circuit blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<f64>,
    /// Time cap in minutes; required for amrap/emom blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    /// Rest between rounds in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_between_rounds: Option<f64>,
    /// Block notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One of two training windows on a twice-daily day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Display name ("AM Cardio")
    pub session_name: String,
    /// "morning" or "evening"; unrecognized values survive as-is because
    /// they only feed display logic downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Estimated session length in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<f64>,
    /// Blocks in this session; never empty in a valid plan
    pub blocks: Vec<WorkoutBlock>,
}

impl TrainingSession {
    /// The parsed training window, when `time_of_day` is recognized
    #[must_use]
    pub fn parsed_time_of_day(&self) -> Option<TimeOfDay> {
        self.time_of_day.as_deref().and_then(TimeOfDay::parse)
    }
}

/// One day of the weekly plan. Carries exactly one of `blocks` or
/// `sessions`, unless it is a rest day with neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    /// Focus text ("Upper Body", "Rest"); rest days are inferred from it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// Day notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Blocks for single-session days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<WorkoutBlock>>,
    /// Sessions for twice-daily days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<TrainingSession>>,
    /// Estimated workout length in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<f64>,
}

impl PlanDay {
    /// Whether this day carries any training content
    #[must_use]
    pub fn has_training(&self) -> bool {
        self.blocks.as_ref().is_some_and(|b| !b.is_empty())
            || self.sessions.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Rest days are inferred from the focus text, not a declared field
    #[must_use]
    pub fn is_rest_day(&self) -> bool {
        !self.has_training() && is_rest_day_focus(self.focus.as_deref())
    }
}

/// Periodization metadata for plans built toward a target date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Periodization {
    /// Program length in weeks
    pub total_weeks: u32,
    /// Week the athlete is currently in
    pub current_week: u32,
    /// Current phase
    pub phase: PeriodizationPhase,
    /// Short description of the current phase focus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_description: Option<String>,
    /// Length of the current phase in weeks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks_in_phase: Option<u32>,
    /// Week number at which the current phase ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_end_week: Option<u32>,
}

/// A full weekly workout program, the root validated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Plan display name
    pub name: String,
    /// Short plan description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Periodization metadata when the plan targets a date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodization: Option<Periodization>,
    /// Exactly 7 days in a valid plan
    #[serde(rename = "weeklyPlan")]
    pub weekly_plan: Vec<PlanDay>,
}

impl WorkoutPlan {
    /// Convert a validated JSON plan into the canonical typed shape.
    ///
    /// # Errors
    ///
    /// Returns an error when the value does not match the canonical schema.
    /// For plans that already passed [`validate_workout_plan`]
    /// (super::validator::validate_workout_plan) this indicates an invariant
    /// breach between validator and schema, not a user-facing condition.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        serde_json::from_value(value.clone()).map_err(|e| {
            AppError::invalid_format(format!("plan does not match the canonical schema: {e}"))
        })
    }

    /// Serialize back to the wire-format JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
