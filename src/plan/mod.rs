// ABOUTME: Plan domain module: typed model, template catalog, validator, estimation
// ABOUTME: The core decision logic gating AI-generated plans before persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Plan Domain
//!
//! Everything that describes and judges a weekly workout plan:
//!
//! - [`templates`] - the static catalog of metrics-template field contracts
//! - [`validator`] - structural and semantic validation of candidate plans
//! - [`model`] - the canonical typed plan tree used after validation
//! - [`duration`] - heuristic duration estimates written onto plans
//!
//! The validator and catalog perform no I/O and mutate no shared state; they
//! are pure functions over in-memory trees and may be called freely from any
//! task without synchronization.

/// Heuristic workout duration estimation
pub mod duration;

/// Canonical typed plan model
pub mod model;

/// Static metrics-template catalog
pub mod templates;

/// Plan validation
pub mod validator;

pub use model::{
    BlockType, DurationValue, ExerciseCategory, MetricsTemplate, Periodization,
    PeriodizationPhase, PlanDay, PlannedExercise, RepTarget, TimeOfDay, TrainingSession,
    WeightUnit, WorkoutBlock, WorkoutPlan,
};
pub use templates::{lookup, TemplateDescriptor, TemplateKind};
pub use validator::{validate_workout_plan, ValidationResult};
