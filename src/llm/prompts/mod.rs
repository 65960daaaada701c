// ABOUTME: Prompt text for plan generation, loaded at compile time or rendered from the catalog
// ABOUTME: Keeps the generation prompt and the validator's contracts in lock-step
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # Generation Prompts
//!
//! The plan-generation system prompt is loaded at compile time from a
//! markdown file for easy maintenance. The metrics-template section is
//! rendered at runtime from the [`templates`](crate::plan::templates)
//! catalog, so the contract the model is told about and the contract the
//! validator enforces can never drift apart.

use crate::plan::templates::{self, TemplateKind};

/// REBLD plan-generation system prompt
///
/// Contains the structural contract for generated plans: the 7-day shape,
/// blocks-or-sessions rule, block-type obligations, and output format.
pub const PLAN_SYSTEM_PROMPT: &str = include_str!("plan_system.md");

/// Get the system prompt for plan generation
#[must_use]
pub const fn get_plan_system_prompt() -> &'static str {
    PLAN_SYSTEM_PROMPT
}

/// Render the metrics-template reference section of the prompt from the
/// catalog. Every template type is listed with its required and optional
/// fields and a canonical JSON example.
#[must_use]
pub fn metrics_template_prompt() -> String {
    let mut prompt = String::from(
        "**METRICS TEMPLATE REFERENCE - MANDATORY COMPLIANCE**\n\n\
         You MUST use these EXACT metric templates for ALL exercises. \
         Never invent a custom metric format, and always include a \"type\" \
         field matching a template name exactly.\n",
    );

    for kind in TemplateKind::ALL {
        let descriptor = templates::descriptor(kind);
        prompt.push_str(&format!("\n### {kind}\n"));
        prompt.push_str(&format!("{}\n", descriptor.description));
        prompt.push_str(&format!("Use for: {}\n", descriptor.use_case));
        prompt.push_str(&format!("Examples: {}\n", descriptor.examples.join(", ")));
        prompt.push_str(&format!(
            "Required: {}\n",
            descriptor.required_fields.join(", ")
        ));
        prompt.push_str(&format!(
            "Optional: {}\n",
            descriptor.optional_fields.join(", ")
        ));
        prompt.push_str(&format!("JSON: {}\n", descriptor.json_example()));
    }

    prompt.push_str(
        "\nCommon mistakes to avoid:\n\
         - WRONG: { \"type\": \"cardio\", \"minutes\": 45 } -> CORRECT: { \"type\": \"duration_only\", \"duration_minutes\": 45 }\n\
         - WRONG: { \"type\": \"treadmill\", \"time\": 30 } -> CORRECT: { \"type\": \"duration_only\", \"duration_minutes\": 30 }\n\
         - WRONG: leaving metrics_template empty or null -> CORRECT: always provide a complete metrics_template object\n",
    );

    prompt
}

/// Build the corrective feedback block appended to the prompt on retry
/// attempts: the previous attempt's validator errors, verbatim and numbered.
#[must_use]
pub fn feedback_block(errors: &[String]) -> String {
    let error_list = errors
        .iter()
        .enumerate()
        .map(|(index, error)| format!("{}. {error}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "PREVIOUS ATTEMPT HAD ERRORS - FIX THESE:\n{error_list}\n\nRegenerate with these fixes applied."
    )
}
