//! First and second degree equation solving
//!
//! Coefficients arrive one at a time from spoken prompts, so an
//! [`EquationRequest`] is filled incrementally and refuses a zero leading
//! coefficient as soon as it is given.

use thiserror::Error;

use super::numerals::spoken_numerals_to_digits;
use crate::text::fold;

/// Polynomial degree of a requested equation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
    /// `a·x + b = 0`
    First,
    /// `a·x² + b·x + c = 0`
    Second,
}

impl Degree {
    /// Pick the degree named in a command, if any
    #[must_use]
    pub fn detect(command: &str) -> Option<Self> {
        let folded = fold(command);
        let names = |words: &[&str]| words.iter().any(|w| folded.contains(w));

        if names(&["primeiro grau", "1o grau", "1º grau", "1° grau", "linear"]) {
            Some(Self::First)
        } else if names(&["segundo grau", "2o grau", "2º grau", "2° grau", "quadratica"]) {
            Some(Self::Second)
        } else {
            None
        }
    }

    /// Coefficient names in prompt order
    #[must_use]
    pub const fn coefficients(self) -> &'static [char] {
        match self {
            Self::First => &['A', 'B'],
            Self::Second => &['A', 'B', 'C'],
        }
    }
}

/// Why an equation request ended without a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquationError {
    /// Leading coefficient `a` was zero
    #[error("leading coefficient cannot be zero in a {0:?} degree equation")]
    ZeroLeadingCoefficient(Degree),

    /// The configured prompt limit ran out before a number was heard
    #[error("no valid value heard for coefficient {0}")]
    RetriesExhausted(char),
}

/// Real roots of a quadratic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadraticRoots {
    /// Negative discriminant
    None { discriminant: f64 },
    /// Zero discriminant
    One(f64),
    /// Positive discriminant, larger root first
    Two(f64, f64),
}

/// Outcome of a completed request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solution {
    Linear(f64),
    Quadratic(QuadraticRoots),
}

/// Equation being assembled from coefficient prompts
#[derive(Debug, Clone)]
pub struct EquationRequest {
    degree: Degree,
    coefficients: Vec<f64>,
}

impl EquationRequest {
    #[must_use]
    pub const fn new(degree: Degree) -> Self {
        Self {
            degree,
            coefficients: Vec::new(),
        }
    }

    #[must_use]
    pub const fn degree(&self) -> Degree {
        self.degree
    }

    /// Name of the next coefficient to ask for, `None` once complete
    #[must_use]
    pub fn next_coefficient(&self) -> Option<char> {
        self.degree.coefficients().get(self.coefficients.len()).copied()
    }

    /// Record the value for [`Self::next_coefficient`]
    ///
    /// # Errors
    ///
    /// Returns [`EquationError::ZeroLeadingCoefficient`] when `a` is zero;
    /// the request must then be abandoned
    pub fn push(&mut self, value: f64) -> Result<(), EquationError> {
        if self.coefficients.is_empty() && value == 0.0 {
            return Err(EquationError::ZeroLeadingCoefficient(self.degree));
        }
        if self.next_coefficient().is_some() {
            self.coefficients.push(value);
        }
        Ok(())
    }

    /// Solve once every coefficient is known
    #[must_use]
    pub fn solve(&self) -> Option<Solution> {
        match (self.degree, self.coefficients.as_slice()) {
            (Degree::First, &[a, b]) => solve_linear(a, b).ok().map(Solution::Linear),
            (Degree::Second, &[a, b, c]) => solve_quadratic(a, b, c).ok().map(Solution::Quadratic),
            _ => None,
        }
    }
}

/// Root of `a·x + b = 0`
///
/// # Errors
///
/// Returns [`EquationError::ZeroLeadingCoefficient`] when `a` is zero
pub fn solve_linear(a: f64, b: f64) -> Result<f64, EquationError> {
    if a == 0.0 {
        return Err(EquationError::ZeroLeadingCoefficient(Degree::First));
    }
    Ok(-b / a)
}

/// Real roots of `a·x² + b·x + c = 0`
///
/// # Errors
///
/// Returns [`EquationError::ZeroLeadingCoefficient`] when `a` is zero
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Result<QuadraticRoots, EquationError> {
    if a == 0.0 {
        return Err(EquationError::ZeroLeadingCoefficient(Degree::Second));
    }

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return Ok(QuadraticRoots::None { discriminant });
    }
    if discriminant == 0.0 {
        return Ok(QuadraticRoots::One(-b / (2.0 * a)));
    }

    let root = discriminant.sqrt();
    let x1 = (-b + root) / (2.0 * a);
    let x2 = (-b - root) / (2.0 * a);
    Ok(QuadraticRoots::Two(x1.max(x2), x1.min(x2)))
}

/// Digits with an optional sign and at most one decimal separator
fn is_numeric_literal(token: &str) -> bool {
    let unsigned = token.strip_prefix(['-', '+']).unwrap_or(token);
    let separators = unsigned.chars().filter(|c| matches!(c, '.' | ',')).count();

    separators <= 1
        && unsigned.chars().any(|c| c.is_ascii_digit())
        && unsigned.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
}

/// Read a spoken coefficient: one number in digits or words, optional
/// "menos", decimal comma or "vírgula"
///
/// Any other word, a second number or a non-finite value gives `None`.
#[must_use]
pub fn parse_coefficient(utterance: &str) -> Option<f64> {
    let digits = spoken_numerals_to_digits(&fold(utterance));

    let mut negative = false;
    let mut whole: Option<String> = None;
    let mut fraction: Option<&str> = None;
    let mut after_comma = false;

    for token in digits.split_whitespace() {
        let token = token.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        match token {
            "" => {}
            "menos" | "negativo" if whole.is_none() && !negative => negative = true,
            "virgula" if whole.is_some() && !after_comma => after_comma = true,
            _ if after_comma && fraction.is_none() && token.chars().all(|c| c.is_ascii_digit()) => {
                fraction = Some(token);
            }
            _ if whole.is_none() && !after_comma && is_numeric_literal(token) => {
                whole = Some(token.replace(',', "."));
            }
            _ => return None,
        }
    }

    let whole = whole?;
    let literal = match (after_comma, fraction) {
        (false, _) => whole,
        (true, Some(fraction)) if !whole.contains('.') => format!("{whole}.{fraction}"),
        (true, _) => return None,
    };

    let value: f64 = literal.parse().ok()?;
    let value = if negative { -value } else { value };
    value.is_finite().then_some(value)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_degree() {
        assert_eq!(Degree::detect("resolver equação de primeiro grau"), Some(Degree::First));
        assert_eq!(Degree::detect("equacao do 2º grau"), Some(Degree::Second));
        assert_eq!(Degree::detect("resolver equação"), None);
    }

    #[test]
    fn test_linear() {
        assert_eq!(solve_linear(2.0, -4.0).unwrap(), 2.0);
        assert_eq!(
            solve_linear(0.0, 3.0),
            Err(EquationError::ZeroLeadingCoefficient(Degree::First))
        );
    }

    #[test]
    fn test_quadratic_two_roots_larger_first() {
        assert_eq!(solve_quadratic(1.0, -3.0, 2.0).unwrap(), QuadraticRoots::Two(2.0, 1.0));
        assert_eq!(solve_quadratic(-1.0, 3.0, -2.0).unwrap(), QuadraticRoots::Two(2.0, 1.0));
    }

    #[test]
    fn test_quadratic_single_root() {
        assert_eq!(solve_quadratic(1.0, -4.0, 4.0).unwrap(), QuadraticRoots::One(2.0));
    }

    #[test]
    fn test_quadratic_no_real_roots() {
        assert_eq!(
            solve_quadratic(1.0, 2.0, 5.0).unwrap(),
            QuadraticRoots::None { discriminant: -16.0 }
        );
    }

    #[test]
    fn test_request_rejects_zero_leading_coefficient() {
        let mut request = EquationRequest::new(Degree::Second);
        assert_eq!(request.next_coefficient(), Some('A'));
        assert_eq!(
            request.push(0.0),
            Err(EquationError::ZeroLeadingCoefficient(Degree::Second))
        );
        assert_eq!(request.next_coefficient(), Some('A'));
    }

    #[test]
    fn test_request_fills_in_order() {
        let mut request = EquationRequest::new(Degree::First);
        request.push(4.0).unwrap();
        assert_eq!(request.next_coefficient(), Some('B'));
        assert_eq!(request.solve(), None);
        request.push(2.0).unwrap();
        assert_eq!(request.next_coefficient(), None);
        assert_eq!(request.solve(), Some(Solution::Linear(-0.5)));
    }

    #[test]
    fn test_parse_coefficient() {
        assert_eq!(parse_coefficient("5"), Some(5.0));
        assert_eq!(parse_coefficient("-3"), Some(-3.0));
        assert_eq!(parse_coefficient("menos três"), Some(-3.0));
        assert_eq!(parse_coefficient("2,5"), Some(2.5));
        assert_eq!(parse_coefficient("dois vírgula cinco"), Some(2.5));
        assert_eq!(parse_coefficient("vinte e um."), Some(21.0));
        assert_eq!(parse_coefficient("não sei"), None);
        assert_eq!(parse_coefficient(""), None);
    }

    #[test]
    fn test_parse_coefficient_rejects_extra_words() {
        assert_eq!(parse_coefficient("três ou quatro"), None);
        assert_eq!(parse_coefficient("acho que 2 ou 3"), None);
        assert_eq!(parse_coefficient("dez e meio"), None);
        assert_eq!(parse_coefficient("ano 2024 e 5"), None);
        assert_eq!(parse_coefficient("dois três"), None);
        assert_eq!(parse_coefficient("dois vírgula"), None);
        assert_eq!(parse_coefficient("menos"), None);
    }

    #[test]
    fn test_parse_coefficient_rejects_overflow() {
        assert_eq!(parse_coefficient(&"9".repeat(400)), None);
        assert_eq!(parse_coefficient("inf"), None);
        assert_eq!(parse_coefficient("NaN"), None);
    }
}
