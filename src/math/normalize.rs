//! Spoken expression normalizer
//!
//! Rewrites spoken operators into symbols, then drops everything outside the
//! symbolic alphabet. Substitution always runs before filtering: the filter
//! would otherwise delete the very words the substitutions look for.

use std::sync::LazyLock;

use regex::Regex;

use super::eval::EvalError;
use super::numerals::spoken_numerals_to_digits;
use crate::text::fold;

/// Reserved token marking a square root in a normalized expression
pub const SQRT_MARKER: &str = "sqrt";

/// Whole-word substitutions, applied in order
///
/// Multi-word phrases sit before their single-word substrings inside each
/// alternation, and "multiplicado por" is consumed before the division rule
/// can see its "por".
static SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(raiz quadrada de|raiz quadrada da|raiz quadrada|raiz de|raiz da|raiz)\b", SQRT_MARKER),
        (r"\bao quadrado\b", "^2"),
        (r"\bao cubo\b", "^3"),
        (r"\b(elevado ao|elevado a|elevado)\b", "^"),
        (r"\b(multiplicado por|vezes|x)\b", "*"),
        (r"\bmais\b", "+"),
        (r"\bmenos\b", "-"),
        (r"\b(dividido por|dividido|por)\b", "/"),
        (r"\bvirgula\b", "."),
    ]
    .into_iter()
    .map(|(pattern, symbol)| {
        // Patterns are literals above; a failure here is a typo caught by the tests
        #[allow(clippy::expect_used)]
        let regex = Regex::new(pattern).expect("valid substitution pattern");
        (regex, symbol)
    })
    .collect()
});

const OPERATORS: &[char] = &['+', '-', '*', '/', '^'];

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || OPERATORS.contains(&c) || matches!(c, '(' | ')' | '.')
}

/// Keep only the symbolic alphabet and the square-root marker
fn filter(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with(SQRT_MARKER) {
            out.push_str(SQRT_MARKER);
            rest = &rest[SQRT_MARKER.len()..];
            continue;
        }
        if is_allowed(c) {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Substitute and filter without validating the outcome
fn rewrite(utterance: &str) -> String {
    let mut text = spoken_numerals_to_digits(&fold(utterance));

    for (regex, symbol) in SUBSTITUTIONS.iter() {
        text = regex.replace_all(&text, *symbol).into_owned();
    }

    filter(&text.replace(',', "."))
}

/// Normalize a spoken utterance into a symbolic arithmetic expression
///
/// `"2 vezes 3 mais 4"` becomes `"2*3+4"`. Applying this to its own output
/// returns the same string.
///
/// # Errors
///
/// Returns [`EvalError::NoExpression`] when nothing symbolic survives the
/// filter and [`EvalError::MissingOperator`] for a bare number, which is not
/// a calculation request.
pub fn normalize(utterance: &str) -> Result<String, EvalError> {
    let normalized = rewrite(utterance);

    if normalized.is_empty() {
        return Err(EvalError::NoExpression);
    }

    if !normalized.contains(OPERATORS) && !normalized.contains(SQRT_MARKER) {
        return Err(EvalError::MissingOperator(normalized));
    }

    tracing::debug!(utterance, normalized = %normalized, "normalized expression");
    Ok(normalized)
}
