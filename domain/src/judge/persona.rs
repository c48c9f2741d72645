//! Persona text helpers.

use crate::core::string::take_chars;

/// Markers that introduce the one-line core trait inside a persona block.
const CORE_TRAIT_MARKERS: &[&str] = &[
    "**Core trait**:",
    "Core trait:",
    "核心性格**：",
    "核心特质：",
];

const FALLBACK_CHARS: usize = 50;
const PLACEHOLDER_TRAIT: &str = "strong personality";

/// Extract the core trait summary from persona text.
///
/// Returns the rest of the line after the first known marker; otherwise the
/// first 50 characters of the persona followed by `...`.
pub fn core_trait(persona: &str) -> String {
    for marker in CORE_TRAIT_MARKERS {
        if let Some((_, rest)) = persona.split_once(marker) {
            let line = rest.lines().next().unwrap_or_default().trim();
            if !line.is_empty() {
                return line.to_string();
            }
        }
    }

    let trimmed = persona.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_TRAIT.to_string();
    }
    format!("{}...", take_chars(trimmed, FALLBACK_CHARS))
}
