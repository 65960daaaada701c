// ABOUTME: Retry orchestration for AI plan generation with validator feedback
// ABOUTME: Extracts JSON from model output, validates, and retries with corrective prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Generation Orchestrator
//!
//! Drives an LLM-backed generation call until it produces output that both
//! parses as JSON and passes plan validation, feeding the validator's errors
//! back into the next attempt as corrective feedback.
//!
//! Two failure universes are kept deliberately separate (and never mixed):
//!
//! - **Validation findings** are data. An invalid plan is not an error here;
//!   it consumes an attempt and its complete error list becomes feedback for
//!   the next prompt.
//! - **Operational failures** (the provider call dying, JSON that cannot be
//!   repaired, the attempt budget running out) are [`AppError`]s with enough
//!   context - attempt count, last error list - to diagnose.
//!
//! The orchestrator holds no state across calls and has no side effects
//! beyond `tracing` events; every outcome carries a structured
//! [`AttemptRecord`] log instead.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use rand::Rng;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, ChatMessage, ChatRequest, LlmProvider};
use crate::plan::duration::annotate_duration_estimates;
use crate::plan::{validate_workout_plan, ValidationResult, WorkoutPlan};

/// Default attempt budget for plan generation
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay before retrying after an operational failure
const RETRY_DELAY_BASE_MS: u64 = 300;

/// Random jitter added to the retry delay to avoid hammering the provider
/// in lockstep
const RETRY_DELAY_JITTER_MS: u64 = 200;

/// Validator callback: judges a parsed candidate and returns the complete
/// list of findings
pub type ValidateFn = dyn Fn(&Value) -> ValidationResult + Send + Sync;

// ============================================================================
// Outcome Types
// ============================================================================

/// What happened on one generation attempt
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u32,
    /// Wall-clock time spent on the attempt in milliseconds
    pub duration_ms: u64,
    /// Validator errors when the attempt produced an invalid plan; empty for
    /// successful attempts and operational failures
    pub validation_errors: Vec<String>,
}

/// A successful generation: the parsed plan plus the attempt log
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// The parsed (and, when a validator was supplied, validated) plan JSON
    pub plan: Value,
    /// Warnings from the accepted plan's validation pass
    pub warnings: Vec<String>,
    /// One record per attempt, in order
    pub attempts: Vec<AttemptRecord>,
}

/// A validated plan in canonical typed form, with the generation log
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    /// The typed plan, with duration estimates annotated
    pub plan: WorkoutPlan,
    /// The raw generation outcome
    pub outcome: GenerationOutcome,
}

// ============================================================================
// JSON Extraction
// ============================================================================

/// Extract and parse a JSON object from raw model output.
///
/// Markdown code fences are stripped, the text is sliced from the first `{`
/// to the last `}`, and parsed. On a parse failure a small set of textual
/// repairs is applied (trailing commas removed, newlines and tabs collapsed
/// to spaces) and the parse is retried once before giving up.
///
/// # Errors
///
/// Returns an `INVALID_FORMAT` error when no JSON object can be located or
/// the candidate still fails to parse after repair.
pub fn extract_and_parse_json(text: &str) -> AppResult<Value> {
    let cleaned = text.replace("```json", "").replace("```", "");

    let start = cleaned
        .find('{')
        .ok_or_else(|| AppError::invalid_format("no JSON object found in model response"))?;
    let end = cleaned
        .rfind('}')
        .filter(|&end| end >= start)
        .ok_or_else(|| AppError::invalid_format("no JSON object found in model response"))?;

    let candidate = &cleaned[start..=end];
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(_) => {
            let repaired = repair_json(candidate);
            serde_json::from_str(&repaired).map_err(|e| {
                AppError::invalid_format(format!(
                    "model response is not valid JSON even after repair: {e}"
                ))
            })
        }
    }
}

/// Trailing comma before a closing bracket: ", }" or ", ]".
/// Stored as Option to handle compilation failures gracefully (should never
/// fail for a static pattern).
static TRAILING_COMMA: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").ok());

/// Fix the JSON mistakes models actually make: trailing commas before
/// closing brackets, and literal newlines/tabs inside the payload.
fn repair_json(text: &str) -> String {
    let mut repaired = text.replace('\n', " ").replace('\t', " ");
    if let Some(pattern) = TRAILING_COMMA.as_ref() {
        repaired = pattern.replace_all(&repaired, "$1").into_owned();
    }
    repaired
}

// ============================================================================
// Retry Loop
// ============================================================================

/// Generate content with retry logic and validation.
///
/// Attempts up to `max_attempts` times. Each attempt calls the provider,
/// extracts a JSON object from the response, and (when `validate` is
/// supplied) runs validation:
///
/// - A valid plan returns immediately.
/// - An invalid plan consumes the attempt; its errors are appended to the
///   next attempt's prompt as a numbered feedback block. No delay - the
///   failure is data, not an outage.
/// - An operational failure (provider error, unparseable output) is logged
///   and retried after a short jittered delay.
///
/// Without a validator, the first parseable response is returned as-is.
///
/// # Errors
///
/// Returns `GENERATION_EXHAUSTED` when every attempt produced an invalid
/// plan, or `GENERATION_FAILED` when the final attempt failed operationally.
/// Both carry the attempt log and last error list in their details.
pub async fn generate_with_retry(
    provider: &dyn LlmProvider,
    request: &ChatRequest,
    validate: Option<&ValidateFn>,
    max_attempts: u32,
) -> AppResult<GenerationOutcome> {
    let max_attempts = max_attempts.max(1);
    let mut attempts: Vec<AttemptRecord> = Vec::new();
    let mut validation_errors: Vec<String> = Vec::new();

    for attempt in 1..=max_attempts {
        debug!(attempt, max_attempts, "generating plan candidate");
        let started = Instant::now();

        // Later attempts carry the previous attempt's validator errors
        // verbatim so the model can fix them
        let mut attempt_request = request.clone();
        if attempt > 1 && !validation_errors.is_empty() {
            attempt_request
                .messages
                .push(ChatMessage::user(prompts::feedback_block(
                    &validation_errors,
                )));
        }

        match run_attempt(provider, &attempt_request).await {
            Ok(parsed) => {
                let duration_ms = elapsed_ms(started);

                let Some(validate) = validate else {
                    attempts.push(AttemptRecord {
                        attempt,
                        duration_ms,
                        validation_errors: Vec::new(),
                    });
                    return Ok(GenerationOutcome {
                        plan: parsed,
                        warnings: Vec::new(),
                        attempts,
                    });
                };

                let result = validate(&parsed);
                if result.valid {
                    debug!(attempt, "valid plan generated");
                    if !result.warnings.is_empty() {
                        warn!(
                            attempt,
                            warnings = result.warnings.len(),
                            "plan accepted with warnings"
                        );
                    }
                    attempts.push(AttemptRecord {
                        attempt,
                        duration_ms,
                        validation_errors: Vec::new(),
                    });
                    return Ok(GenerationOutcome {
                        plan: parsed,
                        warnings: result.warnings,
                        attempts,
                    });
                }

                warn!(
                    attempt,
                    errors = result.errors.len(),
                    "generated plan failed validation"
                );
                validation_errors.clone_from(&result.errors);
                attempts.push(AttemptRecord {
                    attempt,
                    duration_ms,
                    validation_errors: result.errors,
                });

                if attempt == max_attempts {
                    return Err(AppError::generation_exhausted(format!(
                        "Plan validation failed after {max_attempts} attempts: {}",
                        validation_errors.join(", ")
                    ))
                    .with_details(attempt_details(&attempts, &validation_errors)));
                }
                // Validation failure feeds the next prompt immediately
            }
            Err(error) => {
                let duration_ms = elapsed_ms(started);
                warn!(attempt, error = %error, "generation attempt failed");
                attempts.push(AttemptRecord {
                    attempt,
                    duration_ms,
                    validation_errors: Vec::new(),
                });

                if attempt == max_attempts {
                    return Err(AppError::generation_failed(format!(
                        "Generation failed after {max_attempts} attempts: {error}"
                    ))
                    .with_details(attempt_details(&attempts, &validation_errors))
                    .with_source(error));
                }

                tokio::time::sleep(retry_delay()).await;
            }
        }
    }

    // The loop always returns from its final iteration
    Err(AppError::internal("generation loop ended without outcome"))
}

/// Generate a plan and gate it through the workout-plan validator, returning
/// the canonical typed plan with duration estimates annotated.
///
/// # Errors
///
/// Returns the same errors as [`generate_with_retry`], plus an internal
/// error if a validator-accepted plan fails canonical conversion (an
/// invariant breach between validator and schema).
pub async fn generate_validated_plan(
    provider: &dyn LlmProvider,
    request: &ChatRequest,
    max_attempts: u32,
) -> AppResult<ValidatedPlan> {
    let validate: &ValidateFn = &|plan| validate_workout_plan(plan);
    let outcome = generate_with_retry(provider, request, Some(validate), max_attempts).await?;

    let mut plan = WorkoutPlan::from_value(&outcome.plan)
        .map_err(|e| AppError::internal(format!("validated plan failed conversion: {e}")))?;
    annotate_duration_estimates(&mut plan);

    Ok(ValidatedPlan { plan, outcome })
}

async fn run_attempt(provider: &dyn LlmProvider, request: &ChatRequest) -> AppResult<Value> {
    let response = provider.complete(request).await?;
    extract_and_parse_json(&response.content)
}

fn attempt_details(attempts: &[AttemptRecord], validation_errors: &[String]) -> Value {
    serde_json::json!({
        "attempts": attempts.len(),
        "last_validation_errors": validation_errors,
        "attempt_log": attempts,
    })
}

fn retry_delay() -> Duration {
    let jitter = rand::thread_rng().gen_range(0..RETRY_DELAY_JITTER_MS);
    Duration::from_millis(RETRY_DELAY_BASE_MS + jitter)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
