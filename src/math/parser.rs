//! Restricted expression parser
//!
//! Accepts numbers, `+ - * / ^`, parentheses, unary minus and the `sqrt`
//! prefix. Names, calls and anything else are rejected.
//!
//! Precedence, loosest first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | power
//! power   := primary ('^' unary)?        right-associative
//! primary := number | '(' expr ')' | 'sqrt' root
//! root    := '-' root | primary
//! ```

use super::eval::EvalError;
use super::normalize::SQRT_MARKER;

/// Binary operators accepted by the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Symbol used in normalized expressions
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
        }
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    BinaryOp(BinaryOp, Box<Expr>, Box<Expr>),
    UnaryMinus(Box<Expr>),
    SquareRoot(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(BinaryOp),
    LParen,
    RParen,
    Sqrt,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if input[i..].starts_with(SQRT_MARKER) {
            tokens.push(Token::Sqrt);
            i += SQRT_MARKER.len();
            continue;
        }

        if c.is_ascii_digit() || c == b'.' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            let literal = &input[start..i];
            let value = literal
                .parse::<f64>()
                .map_err(|_| EvalError::Parse(format!("invalid number '{literal}'")))?;
            tokens.push(Token::Number(value));
            continue;
        }

        let token = match c {
            b'+' => Token::Op(BinaryOp::Add),
            b'-' => Token::Op(BinaryOp::Sub),
            // "**" is accepted as a power for typed input
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Token::Op(BinaryOp::Pow)
            }
            b'*' => Token::Op(BinaryOp::Mul),
            b'/' => Token::Op(BinaryOp::Div),
            b'^' => Token::Op(BinaryOp::Pow),
            b'(' => Token::LParen,
            b')' => Token::RParen,
            _ => {
                let unexpected = input[i..].chars().next().unwrap_or_default();
                return Err(EvalError::Parse(format!("unexpected character '{unexpected}'")));
            }
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses, minus signs and roots accepted
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Run a nested rule, refusing input deeper than [`MAX_DEPTH`]
    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<Expr, EvalError>,
    ) -> Result<Expr, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::Parse("expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_op(&mut self, ops: &[BinaryOp]) -> Option<BinaryOp> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(&op) => {
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        while let Some(op) = self.eat_op(&[BinaryOp::Add, BinaryOp::Sub]) {
            let right = self.term()?;
            left = Expr::BinaryOp(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.unary()?;
        while let Some(op) = self.eat_op(&[BinaryOp::Mul, BinaryOp::Div]) {
            let right = self.unary()?;
            left = Expr::BinaryOp(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        if self.eat_op(&[BinaryOp::Sub]).is_some() {
            return Ok(Expr::UnaryMinus(Box::new(self.nested(Self::unary)?)));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.eat_op(&[BinaryOp::Pow]).is_some() {
            let exponent = self.nested(Self::unary)?;
            return Ok(Expr::BinaryOp(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn root(&mut self) -> Result<Expr, EvalError> {
        if self.eat_op(&[BinaryOp::Sub]).is_some() {
            return Ok(Expr::UnaryMinus(Box::new(self.nested(Self::root)?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Sqrt) => Ok(Expr::SquareRoot(Box::new(self.nested(Self::root)?))),
            Some(Token::LParen) => {
                let inner = self.nested(Self::expr)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(EvalError::Parse("unbalanced parentheses".to_string())),
                }
            }
            Some(Token::RParen) => Err(EvalError::Parse("unbalanced parentheses".to_string())),
            Some(Token::Op(op)) => Err(EvalError::Parse(format!(
                "unexpected operator '{}'",
                op.symbol()
            ))),
            None => Err(EvalError::Parse("unexpected end of expression".to_string())),
        }
    }
}

/// Parse a normalized expression into a tree
///
/// # Errors
///
/// Returns [`EvalError::Parse`] for any construct outside the grammar
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Parse("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;

    if let Some(token) = parser.peek() {
        return Err(EvalError::Parse(format!("unexpected trailing input {token:?}")));
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Box<Expr> {
        Box::new(Expr::Number(value))
    }

    #[test]
    fn test_precedence() {
        let tree = parse("2*3+4").unwrap();
        assert_eq!(
            tree,
            Expr::BinaryOp(
                BinaryOp::Add,
                Box::new(Expr::BinaryOp(BinaryOp::Mul, num(2.0), num(3.0))),
                num(4.0),
            )
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        let tree = parse("2^3^2").unwrap();
        assert_eq!(
            tree,
            Expr::BinaryOp(
                BinaryOp::Pow,
                num(2.0),
                Box::new(Expr::BinaryOp(BinaryOp::Pow, num(3.0), num(2.0))),
            )
        );
    }

    #[test]
    fn test_unary_minus_wraps_power() {
        let tree = parse("-2^2").unwrap();
        assert_eq!(
            tree,
            Expr::UnaryMinus(Box::new(Expr::BinaryOp(BinaryOp::Pow, num(2.0), num(2.0))))
        );
    }

    #[test]
    fn test_square_root_binds_tightest() {
        let tree = parse("sqrt16+9").unwrap();
        assert_eq!(
            tree,
            Expr::BinaryOp(BinaryOp::Add, Box::new(Expr::SquareRoot(num(16.0))), num(9.0))
        );
        assert_eq!(
            parse("sqrt(16+9)").unwrap(),
            Expr::SquareRoot(Box::new(Expr::BinaryOp(BinaryOp::Add, num(16.0), num(9.0))))
        );
    }

    #[test]
    fn test_double_star_is_power() {
        assert_eq!(
            parse("2**3").unwrap(),
            Expr::BinaryOp(BinaryOp::Pow, num(2.0), num(3.0))
        );
    }

    #[test]
    fn test_rejects_unsupported_constructs() {
        assert!(matches!(parse("1.2.3+1"), Err(EvalError::Parse(_))));
        assert!(matches!(parse("abs(2)"), Err(EvalError::Parse(_))));
        assert!(matches!(parse("(2+3"), Err(EvalError::Parse(_))));
        assert!(matches!(parse("2+3)"), Err(EvalError::Parse(_))));
        assert!(matches!(parse("2+"), Err(EvalError::Parse(_))));
        assert!(matches!(parse("+2"), Err(EvalError::Parse(_))));
        assert!(matches!(parse("2 3"), Err(EvalError::Parse(_))));
        assert!(matches!(parse(""), Err(EvalError::Parse(_))));
    }

    #[test]
    fn test_nesting_limit() {
        let within = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&within).unwrap(), Expr::Number(1.0));

        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse(&parens), Err(EvalError::Parse(_))));

        let minuses = format!("{}1", "-".repeat(10_000));
        assert!(matches!(parse(&minuses), Err(EvalError::Parse(_))));

        let roots = format!("{}4", "sqrt".repeat(10_000));
        assert!(matches!(parse(&roots), Err(EvalError::Parse(_))));
    }
}
