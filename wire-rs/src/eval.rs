//! Arithmetic expression evaluator.
//!
//! Recursive descent over the raw input, computing as it parses:
//!
//! ```text
//! Summand := Factor (('+' | '-') Factor)*
//! Factor  := Atom (('*' | '/') Atom)*
//! Atom    := ['-'] ['+'] ( '(' Summand ')' | Number )
//! Number  := ['-' | '+'] digits [. digits] [e [sign] digits]
//! ```
//!
//! Both binary levels are left-associative.  Spaces and tabs may appear
//! before any atom, operator or parenthesis; a number may also be preceded by
//! newlines and other ASCII whitespace.  A number carries its own optional
//! sign, so `--5` is `5` and `+-5` is `-5`.  Parentheses nest at most
//! [`MAX_NESTING`] deep.  Results are `f64` with the usual IEEE semantics; the
//! only arithmetic check is an exact-zero divisor.

use std::fmt;

/// Deepest parenthesis nesting accepted; the `(` past it is reported as a
/// [`EvalErrorKind::ParenthesisMismatch`].
pub const MAX_NESTING: usize = 256;

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// Unclosed `(`, stray `)`, or nesting deeper than [`MAX_NESTING`].
    ParenthesisMismatch,
    /// A number or `(` was expected, or input continues after a complete
    /// expression.
    WrongCharacter,
    /// The right operand of `/` is exactly zero.
    DivideByZero,
}

impl EvalErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            EvalErrorKind::ParenthesisMismatch => "parentheses don't match",
            EvalErrorKind::WrongCharacter => "invalid character",
            EvalErrorKind::DivideByZero => "division by zero",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// An evaluation failure and the byte offset in the input where it was
/// detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub offset: usize,
}

impl EvalError {
    fn new(kind: EvalErrorKind, offset: usize) -> Self {
        EvalError { kind, offset }
    }
}

/// Evaluate an arithmetic expression.
///
/// ```rust
/// use wire::eval::{evaluate, EvalErrorKind};
///
/// assert_eq!(evaluate("5*(4+4+1)"), Ok(45.0));
/// assert_eq!(evaluate("1/0").unwrap_err().kind, EvalErrorKind::DivideByZero);
/// ```
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let mut parser = Parser::new(expression);
    let result = parser.parse_summands().and_then(|value| parser.finish(value));
    if let Err(err) = &result {
        tracing::debug!(expression, offset = err.offset, "evaluation failed: {}", err.kind);
    }
    result
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    /// Currently open parentheses.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src: src.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn error(&self, kind: EvalErrorKind) -> EvalError {
        EvalError::new(kind, self.pos)
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    /// Whatever follows a complete top-level expression must be the end.
    fn finish(&mut self, value: f64) -> Result<f64, EvalError> {
        self.skip_ws();
        match self.peek() {
            None => Ok(value),
            Some(b')') => Err(self.error(EvalErrorKind::ParenthesisMismatch)),
            Some(_) => Err(self.error(EvalErrorKind::WrongCharacter)),
        }
    }

    fn parse_summands(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.parse_factors()?;
        loop {
            self.skip_ws();
            let op = match self.peek() {
                Some(op @ (b'+' | b'-')) => op,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_factors()?;
            if op == b'+' {
                lhs += rhs;
            } else {
                lhs -= rhs;
            }
        }
    }

    fn parse_factors(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.parse_atom()?;
        loop {
            self.skip_ws();
            let op_pos = self.pos;
            let op = match self.peek() {
                Some(op @ (b'*' | b'/')) => op,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_atom()?;
            if op == b'*' {
                lhs *= rhs;
            } else if rhs == 0.0 {
                return Err(EvalError::new(EvalErrorKind::DivideByZero, op_pos));
            } else {
                lhs /= rhs;
            }
        }
    }

    fn parse_atom(&mut self) -> Result<f64, EvalError> {
        self.skip_ws();
        let negative = self.eat(b'-');
        self.eat(b'+');
        self.skip_ws();

        let value = if self.peek() == Some(b'(') {
            if self.depth >= MAX_NESTING {
                return Err(self.error(EvalErrorKind::ParenthesisMismatch));
            }
            self.pos += 1;
            self.depth += 1;
            let inner = self.parse_summands()?;
            self.skip_ws();
            if !self.eat(b')') {
                return Err(self.error(EvalErrorKind::ParenthesisMismatch));
            }
            self.depth -= 1;
            inner
        } else {
            self.read_number()?
        };

        Ok(if negative { -value } else { value })
    }

    /// `[sign] digits [. digits] [e [sign] digits]`, with at least one
    /// mantissa digit on either side of the point.  Leading ASCII whitespace
    /// is skipped; on failure the error points at the first skipped byte.
    fn read_number(&mut self) -> Result<f64, EvalError> {
        let mut start = self.pos;
        while matches!(self.src.get(start), Some(b) if b.is_ascii_whitespace()) {
            start += 1;
        }
        let digits_from = |mut i: usize| {
            while matches!(self.src.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            i
        };

        let int_start = match self.src.get(start) {
            Some(b'+' | b'-') => start + 1,
            _ => start,
        };
        let mut end = digits_from(int_start);
        let mut mantissa_digits = end - int_start;
        if self.src.get(end) == Some(&b'.') {
            let frac_end = digits_from(end + 1);
            mantissa_digits += frac_end - (end + 1);
            end = frac_end;
        }
        if mantissa_digits == 0 {
            return Err(self.error(EvalErrorKind::WrongCharacter));
        }

        if matches!(self.src.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(self.src.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_end = digits_from(exp);
            if exp_end > exp {
                end = exp_end;
            }
        }

        // The scanned range is ASCII digits, '.', 'e' and signs only.
        let text = std::str::from_utf8(&self.src[start..end])
            .map_err(|_| self.error(EvalErrorKind::WrongCharacter))?;
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error(EvalErrorKind::WrongCharacter))?;
        self.pos = end;
        Ok(value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
