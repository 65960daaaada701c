// ABOUTME: Shared test utilities for plan engine integration tests
// ABOUTME: Provides quiet logging setup, a scripted LLM provider, and plan fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `rebld_plan_engine`
//!
//! This module provides common test setup to reduce duplication across
//! integration tests.

use std::collections::VecDeque;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use serde_json::{json, Value};

use rebld_plan_engine::errors::AppError;
use rebld_plan_engine::llm::{ChatRequest, ChatResponse, LlmProvider};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Scripted LLM provider: returns canned responses (or failures) in order
/// and records every request it receives.
pub struct TestLlmProvider {
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl TestLlmProvider {
    /// Provider that returns the given response texts in order
    pub fn with_responses(responses: &[&str]) -> Self {
        Self::scripted(responses.iter().map(|r| Ok((*r).to_string())).collect())
    }

    /// Provider with a full script of successes and failures
    pub fn scripted(script: Vec<Result<String, String>>) -> Self {
        init_test_logging();
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request the provider has received, in order
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for TestLlmProvider {
    fn name(&self) -> &'static str {
        "test"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(ChatResponse {
                content,
                model: "test-model".to_string(),
                usage: None,
                finish_reason: Some("stop".to_string()),
            }),
            Some(Err(message)) => Err(AppError::external_service("test", message)),
            None => Err(AppError::internal("test provider script exhausted")),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// A fully valid 7-day plan exercising every metrics-template type:
/// strength, bodyweight, cardio, intervals, holds, carries, and tempo work,
/// plus one twice-daily day and two rest days.
pub fn sample_valid_plan() -> Value {
    json!({
        "name": "Hypertrophy Block A",
        "description": "Four training days, one conditioning double, two rest days",
        "weeklyPlan": [
            {
                "day_of_week": 1,
                "focus": "Upper Body Strength",
                "blocks": [
                    {
                        "type": "single",
                        "exercises": [
                            {
                                "exercise_name": "Arm Circles",
                                "category": "warmup",
                                "metrics_template": { "type": "sets_reps", "target_sets": 2, "target_reps": 15 },
                            },
                            {
                                "exercise_name": "Barbell Bench Press",
                                "category": "main",
                                "metrics_template": {
                                    "type": "sets_reps_weight",
                                    "target_sets": 4,
                                    "target_reps": "8-10",
                                    "target_weight": 80,
                                    "weight_unit": "kg",
                                    "rest_period_s": 90,
                                    "rpe": 7,
                                },
                            },
                        ],
                    },
                    {
                        "type": "superset",
                        "rounds": 3,
                        "exercises": [
                            {
                                "exercise_name": "Dumbbell Row",
                                "category": "main",
                                "metrics_template": { "type": "sets_reps_weight", "target_sets": 3, "target_reps": 10 },
                            },
                            {
                                "exercise_name": "Push-ups",
                                "category": "main",
                                "metrics_template": { "type": "sets_reps", "target_sets": 3, "target_reps": 12 },
                            },
                        ],
                    },
                    {
                        "type": "single",
                        "exercises": [
                            {
                                "exercise_name": "Chest Stretch",
                                "category": "cooldown",
                                "metrics_template": { "type": "sets_duration", "target_sets": 1, "duration_seconds": 30 },
                            },
                        ],
                    },
                ],
            },
            {
                "day_of_week": 2,
                "focus": "Conditioning Double",
                "sessions": [
                    {
                        "session_name": "AM Cardio",
                        "time_of_day": "morning",
                        "blocks": [
                            {
                                "type": "single",
                                "exercises": [
                                    {
                                        "exercise_name": "Treadmill Run",
                                        "category": "main",
                                        "metrics_template": {
                                            "type": "duration_only",
                                            "duration_minutes": 45,
                                            "rpe": 6,
                                            "notes": "Zone 2 cardio - conversational pace",
                                        },
                                    },
                                ],
                            },
                        ],
                    },
                    {
                        "session_name": "PM Strength",
                        "time_of_day": "evening",
                        "blocks": [
                            {
                                "type": "single",
                                "exercises": [
                                    {
                                        "exercise_name": "Barbell Back Squat",
                                        "category": "main",
                                        "metrics_template": { "type": "sets_reps_weight", "target_sets": 5, "target_reps": 5 },
                                    },
                                ],
                            },
                        ],
                    },
                ],
            },
            {
                "day_of_week": 3,
                "focus": "Rest",
            },
            {
                "day_of_week": 4,
                "focus": "Lower Body Strength",
                "blocks": [
                    {
                        "type": "single",
                        "exercises": [
                            {
                                "exercise_name": "Leg Swings",
                                "category": "warmup",
                                "metrics_template": { "type": "sets_reps", "target_sets": 2, "target_reps": 10 },
                            },
                            {
                                "exercise_name": "Tempo Squat",
                                "category": "main",
                                "metrics_template": {
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
                                },
                            },
                            {
                                "exercise_name": "Farmer Carry",
                                "category": "main",
                                "metrics_template": {
                                    "type": "sets_duration_weight",
                                    "target_sets": 3,
                                    "duration_seconds": 45,
                                    "target_weight": 32,
                                    "weight_unit": "kg",
                                },
                            },
                            {
                                "exercise_name": "Plank Hold",
                                "category": "cooldown",
                                "metrics_template": { "type": "sets_duration", "target_sets": 3, "hold_seconds": "30 each side" },
                            },
                        ],
                    },
                ],
            },
            {
                "day_of_week": 5,
                "focus": "Intervals",
                "blocks": [
                    {
                        "type": "amrap",
                        "duration_minutes": 12,
                        "exercises": [
                            {
                                "exercise_name": "Burpees",
                                "category": "main",
                                "metrics_template": { "type": "sets_reps", "target_sets": 1, "target_reps": 10 },
                            },
                        ],
                    },
                    {
                        "type": "emom",
                        "duration_minutes": 10,
                        "exercises": [
                            {
                                "exercise_name": "Kettlebell Swings",
                                "category": "main",
                                "metrics_template": { "type": "sets_reps", "target_sets": 1, "target_reps": 15 },
                            },
                        ],
                    },
                    {
                        "type": "single",
                        "exercises": [
                            {
                                "exercise_name": "Bike Sprints",
                                "category": "main",
                                "metrics_template": {
                                    "type": "sets_duration_rest",
                                    "sets": 8,
                                    "duration_seconds": 30,
                                    "rest_seconds": 90,
                                    "rpe": 9,
                                },
                            },
                        ],
                    },
                ],
            },
            {
                "day_of_week": 6,
                "focus": "Distance Work",
                "blocks": [
                    {
                        "type": "single",
                        "exercises": [
                            {
                                "exercise_name": "5km Run",
                                "category": "main",
                                "metrics_template": { "type": "distance_time", "distance_km": 5, "rpe": 7 },
                            },
                            {
                                "exercise_name": "Track Sprints",
                                "category": "main",
                                "metrics_template": { "type": "sets_distance_rest", "sets": 6, "distance_m": 400, "rest_seconds": 90 },
                            },
                        ],
                    },
                ],
            },
            {
                "day_of_week": 7,
                "focus": "Active Recovery",
            },
        ],
    })
}

/// A 7-day plan whose only training content is a single main exercise with
/// the given metrics template; the other six days are rest days.
pub fn plan_with_template(template: Value) -> Value {
    let mut days = vec![json!({
        "day_of_week": 1,
        "focus": "Main Work",
        "blocks": [{
            "type": "single",
            "exercises": [{
                "exercise_name": "Main Lift",
                "category": "main",
                "metrics_template": template,
            }],
        }],
    })];
    for day_of_week in 2..=7 {
        days.push(json!({ "day_of_week": day_of_week, "focus": "Rest" }));
    }

    json!({ "name": "Single Template Plan", "weeklyPlan": days })
}
