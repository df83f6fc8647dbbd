//! Spoken arithmetic
//!
//! Turns loosely structured spoken Portuguese into a symbolic expression,
//! parses it under a restricted grammar and folds it to a number. Also holds
//! the closed-form solvers for first and second degree equations.
//!
//! ```text
//! "dois vezes três mais quatro"
//!        │ normalize
//!        ▼
//!     "2*3+4" ──parse──▶ Expr ──evaluate──▶ 10.0
//! ```

mod equation;
mod eval;
mod normalize;
mod numerals;
mod parser;

pub use equation::{
    Degree, EquationError, EquationRequest, QuadraticRoots, Solution, parse_coefficient,
    solve_linear, solve_quadratic,
};
pub use eval::{EvalError, calculate, evaluate, format_number};
pub use normalize::{SQRT_MARKER, normalize};
pub use numerals::spoken_numerals_to_digits;
pub use parser::{BinaryOp, Expr, parse};
