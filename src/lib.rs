// ABOUTME: Main library entry point for the REBLD plan engine
// ABOUTME: Validates AI-generated workout plans and orchestrates generation retries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

#![deny(unsafe_code)]

//! # REBLD Plan Engine
//!
//! The decision core of the REBLD coaching app: given a candidate weekly
//! workout plan produced by an LLM, decide whether it is well-formed before
//! it is persisted or shown to a user - and when it is not, drive the model
//! to fix it.
//!
//! ## Components
//!
//! - **Template catalog** ([`plan::templates`]): the static registry of
//!   metrics-template field contracts (sets/reps/weight, duration-only,
//!   distance-time, intervals, ...).
//! - **Plan validator** ([`plan::validator`]): walks a candidate plan tree
//!   (days, sessions, blocks, exercises) and reports every structural and
//!   template-level finding as data - never as an exception.
//! - **Retry orchestrator** ([`generation`]): wraps a provider call, feeds
//!   validator errors back into the next attempt as corrective feedback, and
//!   bounds attempts.
//! - **LLM providers** ([`llm`]): the provider contract and the Gemini
//!   implementation REBLD ships with.
//!
//! ## Example
//!
//! ```rust
//! use rebld_plan_engine::plan::validate_workout_plan;
//! use serde_json::json;
//!
//! let candidate = json!({
//!     "name": "Hypertrophy Block",
//!     "weeklyPlan": [{ "day_of_week": 1, "focus": "Rest" }],
//! });
//!
//! let result = validate_workout_plan(&candidate);
//! assert!(!result.valid); // a weekly plan needs exactly 7 days
//! ```
//!
//! ## Concurrency
//!
//! The catalog and validator are pure functions over in-memory trees: no
//! I/O, no locks, no shared state. The one suspension point in the whole
//! engine is the provider call inside the generation loop.

/// Unified error handling system with standard error codes
pub mod errors;

/// Retry orchestration for AI plan generation
pub mod generation;

/// LLM provider abstraction and the Gemini implementation
pub mod llm;

/// Plan domain: typed model, template catalog, validator, estimation
pub mod plan;
