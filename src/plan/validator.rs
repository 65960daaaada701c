// ABOUTME: Runtime validation of AI-generated workout plans before persistence
// ABOUTME: Walks the plan tree (days, sessions, blocks, exercises) and reports every finding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Plan Validator
//!
//! Deterministic, side-effect-free validation of a candidate workout plan.
//! This is the single authoritative gate before an AI-generated plan is
//! persisted or surfaced to a user.
//!
//! The validator walks raw JSON rather than a typed model: its whole job is
//! deciding whether untyped model output conforms, so malformation is data to
//! report, never a reason to fail. Every finding across every level of the
//! tree is collected into one flat, ordered report so a single call surfaces
//! the complete list of problems - that list is what the retry loop feeds
//! back to the model and what a user sees when generation keeps failing.
//!
//! Findings are appended in a fixed traversal order (day, then
//! session-or-block, then exercise, then template field), so validating the
//! same input twice yields byte-identical output. Retry prompts rely on that
//! stability.
//!
//! ## Example
//!
//! ```rust
//! use rebld_plan_engine::plan::validate_workout_plan;
//! use serde_json::json;
//!
//! let plan = json!({ "name": "Test Plan", "weeklyPlan": [] });
//! let result = validate_workout_plan(&plan);
//! assert!(!result.valid);
//! assert_eq!(result.errors, vec!["weeklyPlan cannot be empty"]);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::templates::{self, TemplateKind};

/// Block types recognized by the tracker, in error-message order
const VALID_BLOCK_TYPES: &[&str] = &["single", "superset", "amrap", "circuit", "emom"];

/// Exercise categories recognized by the tracker, in error-message order
const VALID_CATEGORIES: &[&str] = &["warmup", "main", "cooldown"];

/// Focus keywords that mark a day as a rest day
const REST_DAY_KEYWORDS: &[&str] = &["rest", "recovery", "off"];

/// First run of digits in a free-text metric value ("30 each side" -> 30).
/// Stored as Option to handle compilation failures gracefully (should never
/// fail for a static pattern).
static FIRST_INTEGER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+").ok());

// ============================================================================
// Validation Result
// ============================================================================

/// Outcome of validating a plan: every error and warning found, in traversal
/// order. Warnings never affect validity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no errors were found
    pub valid: bool,
    /// Hard failures; a plan with any error is never persisted
    pub errors: Vec<String>,
    /// Advisory findings; the plan is still usable
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Render the result as a numbered human-readable report.
    ///
    /// The same text is appended to retry prompts as corrective feedback, so
    /// it has to be stable across calls for identical input.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.valid {
            return "Plan validation passed. All exercises have correct metrics templates."
                .to_owned();
        }

        let mut message = String::from("PLAN VALIDATION FAILED\n\n");
        message.push_str(&format!("Found {} error(s):\n\n", self.errors.len()));
        for (index, error) in self.errors.iter().enumerate() {
            message.push_str(&format!("{}. {error}\n", index + 1));
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n{} warning(s):\n\n", self.warnings.len()));
            for (index, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("{}. {warning}\n", index + 1));
            }
        }

        message
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Validate a complete workout plan.
///
/// Never fails for malformed input - malformation becomes entries in
/// `errors`. The single early return is a `weeklyPlan` that is missing, not
/// an array, or empty: nothing downstream can be safely inspected.
#[must_use]
pub fn validate_workout_plan(plan: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Basic structure validation
    let has_name = plan
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        errors.push("Plan must have a name".to_owned());
    }

    let Some(days) = plan.get("weeklyPlan").and_then(Value::as_array) else {
        errors.push("Plan must have weeklyPlan array".to_owned());
        return ValidationResult::from_findings(errors, warnings);
    };

    if days.is_empty() {
        errors.push("weeklyPlan cannot be empty".to_owned());
        return ValidationResult::from_findings(errors, warnings);
    }

    if days.len() != 7 {
        errors.push(format!(
            "weeklyPlan must have exactly 7 days (found {})",
            days.len()
        ));
    }

    // Each present day is validated regardless of the count above
    for (day_index, day) in days.iter().enumerate() {
        validate_day(day, day_index, &mut errors, &mut warnings);
    }

    ValidationResult::from_findings(errors, warnings)
}

// ============================================================================
// Per-Level Validation
// ============================================================================

fn validate_day(day: &Value, day_index: usize, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let focus = day.get("focus").and_then(Value::as_str);
    let day_label = format!(
        "Day {} ({})",
        day_index + 1,
        focus.filter(|f| !f.is_empty()).unwrap_or("unnamed")
    );

    let day_of_week_ok = day
        .get("day_of_week")
        .and_then(Value::as_i64)
        .is_some_and(|d| (1..=7).contains(&d));
    if !day_of_week_ok {
        errors.push(format!(
            "{day_label}: day_of_week must be 1-7 (found: {})",
            display_value(day.get("day_of_week"))
        ));
    }

    if focus.is_none_or(|f| f.trim().is_empty()) {
        warnings.push(format!("{day_label}: Missing focus description"));
    }

    let blocks = day.get("blocks").and_then(Value::as_array);
    let sessions = day.get("sessions").and_then(Value::as_array);
    let has_blocks = blocks.is_some_and(|b| !b.is_empty());
    let has_sessions = sessions.is_some_and(|s| !s.is_empty());

    if !has_blocks && !has_sessions {
        // Only an error if this is not semantically a rest day
        if !is_rest_day_focus(focus) {
            errors.push(format!(
                "{day_label}: Must have either 'blocks' or 'sessions' array (not a rest day)"
            ));
        }
        return;
    }

    if has_blocks && has_sessions {
        // Flag the conflict, but still validate both collections
        errors.push(format!(
            "{day_label}: Cannot have BOTH 'blocks' and 'sessions' - use one or the other"
        ));
    }

    if let Some(blocks) = blocks.filter(|b| !b.is_empty()) {
        for (block_index, block) in blocks.iter().enumerate() {
            validate_block(block, block_index, &day_label, errors, warnings);
        }
    }

    if let Some(sessions) = sessions.filter(|s| !s.is_empty()) {
        if sessions.len() != 2 {
            warnings.push(format!(
                "{day_label}: sessions array should have exactly 2 sessions for twice-daily training (found {})",
                sessions.len()
            ));
        }

        for (session_index, session) in sessions.iter().enumerate() {
            validate_session(session, session_index, &day_label, errors, warnings);
        }
    }
}

fn validate_session(
    session: &Value,
    session_index: usize,
    day_label: &str,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let session_label = format!("{day_label} > Session {}", session_index + 1);

    let has_name = session
        .get("session_name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        errors.push(format!("{session_label}: Missing session_name"));
    }

    // time_of_day only feeds display logic downstream, so both missing and
    // unrecognized values are warnings rather than hard errors
    match session.get("time_of_day") {
        None | Some(Value::Null) => {
            warnings.push(format!("{session_label}: Missing time_of_day"));
        }
        Some(value) => {
            let recognized = value
                .as_str()
                .is_some_and(|t| t == "morning" || t == "evening");
            if !recognized {
                warnings.push(format!(
                    "{session_label}: time_of_day should be 'morning' or 'evening' (found: {})",
                    display_value(Some(value))
                ));
            }
        }
    }

    let Some(blocks) = session
        .get("blocks")
        .and_then(Value::as_array)
        .filter(|b| !b.is_empty())
    else {
        errors.push(format!(
            "{session_label}: Must have blocks array with at least one block"
        ));
        return;
    };

    for (block_index, block) in blocks.iter().enumerate() {
        validate_block(block, block_index, &session_label, errors, warnings);
    }
}

fn validate_block(
    block: &Value,
    block_index: usize,
    parent_label: &str,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let block_label = format!("{parent_label} > Block {}", block_index + 1);

    let block_type = block.get("type").and_then(Value::as_str);
    match block.get("type") {
        None | Some(Value::Null) => {
            errors.push(format!("{block_label}: Missing 'type' field"));
        }
        Some(value) => {
            if !block_type.is_some_and(|t| VALID_BLOCK_TYPES.contains(&t)) {
                errors.push(format!(
                    "{block_label}: Invalid block type '{}' (must be: {})",
                    display_value(Some(value)),
                    VALID_BLOCK_TYPES.join(", ")
                ));
            }
        }
    }

    // Exercises and the type-conditional fields are orthogonal: an empty
    // exercises array only skips exercise-level checks
    match block
        .get("exercises")
        .and_then(Value::as_array)
        .filter(|e| !e.is_empty())
    {
        Some(exercises) => {
            for (exercise_index, exercise) in exercises.iter().enumerate() {
                validate_exercise(exercise, exercise_index, &block_label, errors, warnings);
            }
        }
        None => {
            errors.push(format!(
                "{block_label}: Must have exercises array with at least one exercise"
            ));
        }
    }

    if matches!(block_type, Some("superset" | "circuit")) {
        let rounds_ok = block
            .get("rounds")
            .and_then(Value::as_f64)
            .is_some_and(|r| r >= 1.0);
        if !rounds_ok {
            // block_type is Some here by the matches! above
            let type_name = block_type.unwrap_or_default();
            errors.push(format!(
                "{block_label}: {type_name} must have 'rounds' field (number >= 1)"
            ));
        }
    }

    if matches!(block_type, Some("amrap" | "emom")) {
        let duration_ok = block
            .get("duration_minutes")
            .and_then(Value::as_f64)
            .is_some_and(|d| d >= 1.0);
        if !duration_ok {
            let type_name = block_type.unwrap_or_default();
            errors.push(format!(
                "{block_label}: {type_name} must have 'duration_minutes' field (number >= 1)"
            ));
        }
    }
}

fn validate_exercise(
    exercise: &Value,
    exercise_index: usize,
    block_label: &str,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let exercise_name = exercise.get("exercise_name").and_then(Value::as_str);
    let exercise_label = format!(
        "{block_label} > Exercise {} ({})",
        exercise_index + 1,
        exercise_name.filter(|n| !n.is_empty()).unwrap_or("unnamed")
    );

    if exercise_name.is_none_or(|name| name.trim().is_empty()) {
        errors.push(format!("{exercise_label}: Missing exercise_name"));
    }

    match exercise.get("category") {
        None | Some(Value::Null) => {
            errors.push(format!("{exercise_label}: Missing 'category' field"));
        }
        Some(value) => {
            let recognized = value
                .as_str()
                .is_some_and(|c| VALID_CATEGORIES.contains(&c));
            if !recognized {
                errors.push(format!(
                    "{exercise_label}: Invalid category '{}' (must be: {})",
                    display_value(Some(value)),
                    VALID_CATEGORIES.join(", ")
                ));
            }
        }
    }

    // Metrics template validation - the most critical layer
    let template_value = exercise.get("metrics_template");
    if template_value.is_none_or(Value::is_null) {
        errors.push(format!(
            "{exercise_label}: MISSING metrics_template - this is MANDATORY!"
        ));
        return;
    }
    let Some(template) = template_value.and_then(Value::as_object) else {
        errors.push(format!("{exercise_label}: metrics_template must be an object"));
        return;
    };

    let type_value = template.get("type");
    if type_value.is_none_or(Value::is_null) {
        errors.push(format!(
            "{exercise_label}: metrics_template missing 'type' field - MUST specify template type!"
        ));
        return;
    }
    let Some(kind) = type_value
        .and_then(Value::as_str)
        .and_then(TemplateKind::parse)
    else {
        errors.push(format!(
            "{exercise_label}: Invalid metrics template type '{}'. Must be one of: {}",
            display_value(type_value),
            templates::valid_type_list()
        ));
        return;
    };

    // Required fields: one error per missing field, each independently
    // actionable for the model on retry
    let descriptor = templates::descriptor(kind);
    for field in descriptor.required_fields {
        if template.get(*field).is_none_or(Value::is_null) {
            errors.push(format!(
                "{exercise_label}: metrics_template type '{kind}' requires field '{field}' (currently missing or null)"
            ));
        }
    }

    validate_template_fields(kind, template, exercise_name, &exercise_label, errors, warnings);
}

/// Type-specific rules layered on top of the generic required-field check.
/// Several templates accept aliased field names or numbers embedded in text.
fn validate_template_fields(
    kind: TemplateKind,
    template: &Map<String, Value>,
    exercise_name: Option<&str>,
    exercise_label: &str,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    match kind {
        TemplateKind::DurationOnly => {
            let minutes = resolve_field(template, &["duration_minutes", "target_duration_minutes"])
                .and_then(number_with_text_fallback);
            // Rest/recovery exercises may carry a symbolic duration
            if !is_rest_exercise(exercise_name) && !minutes.is_some_and(|m| m > 0.0) {
                errors.push(format!(
                    "{exercise_label}: duration_only requires duration_minutes to be a positive number"
                ));
            }
        }
        TemplateKind::SetsRepsWeight | TemplateKind::SetsReps => {
            let sets_ok = template
                .get("target_sets")
                .and_then(Value::as_f64)
                .is_some_and(|s| s > 0.0);
            if !sets_ok {
                errors.push(format!(
                    "{exercise_label}: {kind} requires target_sets to be a positive number"
                ));
            }
            // target_reps can be a number or a range string like "8-10"
            if template.get("target_reps").is_none_or(Value::is_null) {
                errors.push(format!("{exercise_label}: {kind} requires target_reps"));
            }
        }
        TemplateKind::SetsDuration => {
            let sets_ok = template
                .get("target_sets")
                .and_then(Value::as_f64)
                .is_some_and(|s| s > 0.0);
            if !sets_ok {
                errors.push(format!(
                    "{exercise_label}: sets_duration requires target_sets to be a positive number"
                ));
            }
            let seconds = resolve_field(
                template,
                &[
                    "duration_seconds",
                    "target_duration_s",
                    "target_duration_seconds",
                    "hold_seconds",
                ],
            )
            .and_then(number_with_text_fallback);
            if !seconds.is_some_and(|s| s > 0.0) {
                errors.push(format!(
                    "{exercise_label}: sets_duration requires duration_seconds to be a positive number"
                ));
            }
        }
        TemplateKind::SetsDurationRest => {
            let sets = resolve_field(template, &["sets", "target_sets"]).and_then(Value::as_f64);
            if !sets.is_some_and(|s| s > 0.0) {
                errors.push(format!(
                    "{exercise_label}: sets_duration_rest requires sets to be a positive number"
                ));
            }
            let work = resolve_field(template, &["duration_seconds", "work_duration_s"])
                .and_then(Value::as_f64);
            if !work.is_some_and(|s| s > 0.0) {
                errors.push(format!(
                    "{exercise_label}: sets_duration_rest requires duration_seconds to be a positive number"
                ));
            }
            // Zero rest is valid: consecutive-exercise supersets use it
            let rest = resolve_field(template, &["rest_seconds", "rest_duration_s"])
                .and_then(Value::as_f64);
            if !rest.is_some_and(|s| s >= 0.0) {
                errors.push(format!(
                    "{exercise_label}: sets_duration_rest requires rest_seconds to be a non-negative number"
                ));
            }
        }
        TemplateKind::DistanceTime => {
            let has_km = template.get("distance_km").is_some_and(|v| !v.is_null());
            let has_meters = template.get("distance_m").is_some_and(|v| !v.is_null());

            if !has_km && !has_meters {
                errors.push(format!(
                    "{exercise_label}: distance_time requires either distance_km OR distance_m"
                ));
            }
            if has_km && has_meters {
                warnings.push(format!(
                    "{exercise_label}: distance_time has BOTH distance_km and distance_m - use only one"
                ));
            }
        }
        // Covered entirely by the required-field contract
        TemplateKind::SetsDistanceRest | TemplateKind::SetsDurationWeight | TemplateKind::Tempo => {}
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// First present, non-null value among the accepted spellings of a field.
fn resolve_field<'a>(template: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| template.get(*name).filter(|v| !v.is_null()))
}

/// Numeric reading of a metric value. Strings fall back to the first embedded
/// integer ("30 each side" -> 30, "45 min easy" -> 45).
fn number_with_text_fallback(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => first_embedded_integer(s),
        _ => None,
    }
}

/// Extract the first run of digits from free text as a number.
pub(crate) fn first_embedded_integer(text: &str) -> Option<f64> {
    FIRST_INTEGER
        .as_ref()?
        .find(text)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(|n| n as f64)
}

/// Rest days are inferred from the focus text, not a declared field.
pub(crate) fn is_rest_day_focus(focus: Option<&str>) -> bool {
    focus.is_some_and(|f| {
        let lower = f.to_lowercase();
        REST_DAY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    })
}

/// "Complete Rest" style entries are exempt from duration requirements.
fn is_rest_exercise(exercise_name: Option<&str>) -> bool {
    exercise_name.is_some_and(|name| {
        let lower = name.to_lowercase();
        lower.contains("rest") || lower.contains("recovery")
    })
}

/// Render an optional JSON value for an error message.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "missing".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
