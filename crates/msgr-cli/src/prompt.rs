//! Prompt helpers for the interactive session.
//!
//! Thin wrappers over dialoguer so the driver reads one value per call.
//! Numeric prompts re-prompt on unparseable input instead of failing, so
//! bad input can never end the session.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a non-empty line of text.
pub fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(value.trim().to_string())
}

/// Prompt for a line of text, allowing an empty answer.
pub fn prompt_optional_text(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Prompt for a password without echoing it.
pub fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Prompt for a numeric menu choice. Dialoguer re-prompts until the input
/// parses as an integer; choice validity is the driver's concern.
pub fn prompt_choice(prompt: &str) -> Result<u32> {
    Ok(Input::<u32>::new().with_prompt(prompt).interact_text()?)
}

/// Prompt for an identifier (chat id, message id).
pub fn prompt_id(prompt: &str) -> Result<i64> {
    Ok(Input::<i64>::new().with_prompt(prompt).interact_text()?)
}

/// Yes/no confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
