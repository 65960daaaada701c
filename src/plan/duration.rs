// ABOUTME: Heuristic workout duration estimation for generated plans
// ABOUTME: Annotates days and sessions with estimated_duration minutes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Duration Estimation
//!
//! Rough per-day and per-session duration estimates, written onto the plan
//! as `estimated_duration` so the tracker UI can show session length without
//! recomputing it. The numbers are deliberately conservative heuristics, not
//! a simulation.

use super::model::{
    ExerciseCategory, MetricsTemplate, PlanDay, TrainingSession, WorkoutBlock, WorkoutPlan,
};

/// Assumed working time per strength set, in seconds
const WORK_SECONDS_PER_SET: f64 = 30.0;

/// Default rest between strength sets when the exercise does not declare one
const DEFAULT_REST_SECONDS: f64 = 120.0;

/// Warmup and cooldown entries count as one minute each
const ACCESSORY_MINUTES: f64 = 1.0;

/// Fallback estimate for anything the heuristics do not cover
const FALLBACK_MINUTES: f64 = 2.0;

/// Default AMRAP cap when the block does not declare one
const DEFAULT_AMRAP_MINUTES: f64 = 10.0;

/// Estimate the total minutes for a slice of blocks
fn estimate_blocks_minutes(blocks: &[WorkoutBlock]) -> f64 {
    let mut total_minutes = 0.0;

    for block in blocks {
        for exercise in &block.exercises {
            total_minutes += match (&exercise.category, &exercise.metrics_template) {
                // Warmup/cooldown: ~1 min per exercise
                (ExerciseCategory::Warmup | ExerciseCategory::Cooldown, _) => ACCESSORY_MINUTES,
                // Main work - strength
                (
                    _,
                    MetricsTemplate::SetsRepsWeight { target_sets, .. }
                    | MetricsTemplate::SetsReps { target_sets, .. },
                ) => {
                    let rest = exercise.rest_seconds.unwrap_or(DEFAULT_REST_SECONDS);
                    target_sets * (WORK_SECONDS_PER_SET + rest) / 60.0
                }
                // Cardio at face value
                (_, MetricsTemplate::DurationOnly { .. }) => exercise
                    .metrics_template
                    .target_minutes()
                    .unwrap_or(0.0),
                // Distance work with a declared target time
                (
                    _,
                    MetricsTemplate::DistanceTime {
                        target_time_s: Some(seconds),
                        ..
                    },
                ) => seconds / 60.0,
                // Time-capped blocks contribute their cap
                _ if block.block_type.requires_duration() => {
                    block.duration_minutes.unwrap_or(DEFAULT_AMRAP_MINUTES)
                }
                _ => FALLBACK_MINUTES,
            };
        }
    }

    total_minutes
}

/// Estimate a day's total workout duration in minutes, covering both
/// single-session (`blocks`) and twice-daily (`sessions`) days.
#[must_use]
pub fn estimate_day_duration(day: &PlanDay) -> f64 {
    let mut total_minutes = 0.0;

    if let Some(blocks) = &day.blocks {
        total_minutes += estimate_blocks_minutes(blocks);
    }
    if let Some(sessions) = &day.sessions {
        for session in sessions {
            total_minutes += estimate_blocks_minutes(&session.blocks);
        }
    }

    total_minutes.round()
}

/// Estimate one session's duration in minutes
#[must_use]
pub fn estimate_session_duration(session: &TrainingSession) -> f64 {
    estimate_blocks_minutes(&session.blocks).round()
}

/// Write `estimated_duration` onto every day and session of the plan.
/// Single-session days get a day-level estimate; twice-daily days get one
/// per session.
pub fn annotate_duration_estimates(plan: &mut WorkoutPlan) {
    for day in &mut plan.weekly_plan {
        if day.blocks.is_some() {
            day.estimated_duration = Some(estimate_day_duration(day));
        }

        if let Some(sessions) = &mut day.sessions {
            for session in sessions {
                session.estimated_duration = Some(estimate_session_duration(session));
            }
        }
    }
}
