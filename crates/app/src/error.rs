//! Helpers shared by the service error types.

use validator::ValidationErrors;

/// Flattens validator output into one human-readable message.
///
/// A single failure yields its own message; several yield a count plus
/// the individual messages.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .collect();
    messages.sort();

    match messages.len() {
        0 => "Invalid input".to_string(),
        1 => messages.remove(0),
        n => format!("{} validation errors: {}", n, messages.join("; ")),
    }
}
