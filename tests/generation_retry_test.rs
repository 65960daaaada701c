// ABOUTME: Integration tests for the generation retry orchestrator
// ABOUTME: Covers feedback propagation, JSON repair, attempt logs, and exhaustion errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod common;

use common::{sample_valid_plan, TestLlmProvider};
use rebld_plan_engine::errors::ErrorCode;
use rebld_plan_engine::generation::{
    generate_validated_plan, generate_with_retry, ValidateFn, DEFAULT_MAX_ATTEMPTS,
};
use rebld_plan_engine::llm::{ChatMessage, ChatRequest, MessageRole};
use rebld_plan_engine::plan::validate_workout_plan;
use serde_json::json;

fn plan_request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are the REBLD coaching engine."),
        ChatMessage::user("Generate a 7-day hypertrophy plan."),
    ])
}

fn invalid_plan_text() -> String {
    // Parses fine, fails validation (no name, wrong day count)
    json!({ "weeklyPlan": [{ "day_of_week": 1, "focus": "Rest" }] }).to_string()
}

// ============================================================================
// Success Paths
// ============================================================================

#[tokio::test]
async fn test_succeeds_on_third_attempt_after_two_invalid_plans() {
    let valid = sample_valid_plan().to_string();
    let provider =
        TestLlmProvider::with_responses(&[&invalid_plan_text(), &invalid_plan_text(), &valid]);

    let validate: &ValidateFn = &|plan| validate_workout_plan(plan);
    let outcome = generate_with_retry(&provider, &plan_request(), Some(validate), 3)
        .await
        .expect("attempt 3 produces a valid plan");

    assert_eq!(outcome.plan["name"], "Hypertrophy Block A");
    assert_eq!(outcome.attempts.len(), 3);
    assert!(!outcome.attempts[0].validation_errors.is_empty());
    assert!(!outcome.attempts[1].validation_errors.is_empty());
    assert!(outcome.attempts[2].validation_errors.is_empty());
}

#[tokio::test]
async fn test_feedback_block_reaches_second_attempt() {
    let valid = sample_valid_plan().to_string();
    let provider = TestLlmProvider::with_responses(&[&invalid_plan_text(), &valid]);

    let validate: &ValidateFn = &|plan| validate_workout_plan(plan);
    generate_with_retry(&provider, &plan_request(), Some(validate), 3)
        .await
        .expect("attempt 2 succeeds");

    let requests = provider.recorded_requests();
    assert_eq!(requests.len(), 2);

    // First request is the caller's prompt, untouched
    assert_eq!(requests[0].messages.len(), 2);

    // Second request carries the previous attempt's errors, numbered
    let feedback = requests[1]
        .messages
        .last()
        .expect("feedback message appended");
    assert_eq!(feedback.role, MessageRole::User);
    assert!(feedback.content.contains("PREVIOUS ATTEMPT HAD ERRORS"));
    assert!(feedback.content.contains("1. Plan must have a name"));
    assert!(feedback
        .content
        .contains("weeklyPlan must have exactly 7 days (found 1)"));
}

#[tokio::test]
async fn test_no_validator_returns_first_parse() {
    let provider = TestLlmProvider::with_responses(&[
        "Here is your plan:\n```json\n{\"name\": \"Quick Plan\", \"weeklyPlan\": []}\n```",
    ]);

    let outcome = generate_with_retry(&provider, &plan_request(), None, DEFAULT_MAX_ATTEMPTS)
        .await
        .expect("no-validation mode returns the parsed object unconditionally");

    assert_eq!(outcome.plan["name"], "Quick Plan");
    assert_eq!(outcome.attempts.len(), 1);
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn test_repairs_trailing_commas_in_model_output() {
    let provider =
        TestLlmProvider::with_responses(&["{\"name\": \"Plan\", \"weeklyPlan\": [1, 2, ], }"]);

    let outcome = generate_with_retry(&provider, &plan_request(), None, 1)
        .await
        .expect("repairable JSON parses");
    assert_eq!(outcome.plan["weeklyPlan"], json!([1, 2]));
}

#[tokio::test]
async fn test_valid_plan_with_warnings_passes_them_through() {
    let mut plan = sample_valid_plan();
    plan["weeklyPlan"][1]["sessions"][0]["time_of_day"] = json!("noon");
    let provider = TestLlmProvider::with_responses(&[&plan.to_string()]);

    let validate: &ValidateFn = &|plan| validate_workout_plan(plan);
    let outcome = generate_with_retry(&provider, &plan_request(), Some(validate), 3)
        .await
        .expect("warnings never block a plan");

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("time_of_day"));
}

// ============================================================================
// Failure Paths
// ============================================================================

#[tokio::test]
async fn test_exhausted_validation_attempts_raise_generation_exhausted() {
    let invalid = invalid_plan_text();
    let provider = TestLlmProvider::with_responses(&[&invalid, &invalid, &invalid]);

    let validate: &ValidateFn = &|plan| validate_workout_plan(plan);
    let error = generate_with_retry(&provider, &plan_request(), Some(validate), 3)
        .await
        .expect_err("three invalid plans exhaust the budget");

    assert_eq!(error.code, ErrorCode::GenerationExhausted);
    assert!(error
        .to_string()
        .contains("Plan validation failed after 3 attempts"));
    assert_eq!(error.details["attempts"], 3);
    assert!(!error.details["last_validation_errors"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_provider_failures_raise_generation_failed() {
    let provider = TestLlmProvider::scripted(vec![
        Err("rate limited".to_string()),
        Err("rate limited".to_string()),
    ]);

    let error = generate_with_retry(&provider, &plan_request(), None, 2)
        .await
        .expect_err("provider never recovers");

    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(error.to_string().contains("after 2 attempts"));
    assert_eq!(error.details["attempts"], 2);
}

#[tokio::test]
async fn test_unparseable_output_counts_as_operational_failure() {
    let valid = sample_valid_plan().to_string();
    let provider =
        TestLlmProvider::with_responses(&["Sorry, I cannot generate a plan today.", &valid]);

    let validate: &ValidateFn = &|plan| validate_workout_plan(plan);
    let outcome = generate_with_retry(&provider, &plan_request(), Some(validate), 2)
        .await
        .expect("second attempt recovers from the parse failure");

    assert_eq!(outcome.attempts.len(), 2);
    // Parse failures carry no validation errors in the log
    assert!(outcome.attempts[0].validation_errors.is_empty());
}

// ============================================================================
// Validated End-to-End Path
// ============================================================================

#[tokio::test]
async fn test_generate_validated_plan_returns_typed_plan_with_estimates() {
    let provider = TestLlmProvider::with_responses(&[&sample_valid_plan().to_string()]);

    let validated = generate_validated_plan(&provider, &plan_request(), 3)
        .await
        .expect("sample plan converts to the canonical model");

    assert_eq!(validated.plan.name, "Hypertrophy Block A");
    assert_eq!(validated.plan.weekly_plan.len(), 7);

    // Single-session days get day-level estimates
    let day1 = &validated.plan.weekly_plan[0];
    assert!(day1.estimated_duration.is_some());

    // Twice-daily days get per-session estimates instead
    let day2 = &validated.plan.weekly_plan[1];
    assert!(day2.estimated_duration.is_none());
    for session in day2.sessions.as_ref().unwrap() {
        assert!(session.estimated_duration.is_some());
    }

    // Rest days keep no estimate
    assert!(validated.plan.weekly_plan[2].estimated_duration.is_none());
    assert_eq!(validated.outcome.attempts.len(), 1);
}
