//! Positional parameters and client-side interpolation.
//!
//! The engine accepts plain SQL text only, so `?` placeholders are replaced
//! with ClickHouse literals before execution.

use crate::error::QueryError;

/// Parameter value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// NULL value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed integer value
    Integer(i64),
    /// Unsigned integer value
    UInt(u64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Binary data
    Binary(Vec<u8>),
}

impl Parameter {
    /// Render the parameter as a ClickHouse SQL literal.
    ///
    /// # Errors
    /// Returns `QueryError::ParameterBindingError` for NaN or infinite floats
    pub fn to_sql_literal(&self) -> Result<String, QueryError> {
        match self {
            Parameter::Null => Ok("NULL".to_string()),
            Parameter::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Parameter::Integer(i) => Ok(i.to_string()),
            Parameter::UInt(u) => Ok(u.to_string()),
            Parameter::Float(f) => {
                if f.is_finite() {
                    Ok(f.to_string())
                } else {
                    Err(QueryError::ParameterBindingError {
                        index: 0,
                        message: "NaN and Infinity are not supported".to_string(),
                    })
                }
            }
            Parameter::String(s) => Ok(quote_string(s)),
            Parameter::Binary(b) => Ok(format!("unhex('{}')", hex::encode_upper(b))),
        }
    }
}

fn quote_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\0' => quoted.push_str("\\0"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter::Boolean(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Integer(i64::from(value))
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Integer(value)
    }
}

impl From<u32> for Parameter {
    fn from(value: u32) -> Self {
        Parameter::UInt(u64::from(value))
    }
}

impl From<u64> for Parameter {
    fn from(value: u64) -> Self {
        Parameter::UInt(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Float(value)
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::String(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(value: Vec<u8>) -> Self {
        Parameter::Binary(value)
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        value.map_or(Parameter::Null, Into::into)
    }
}

/// Lexical context of the scanner.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Replace each `?` placeholder in `sql` with the next parameter's literal.
///
/// Question marks inside string literals, quoted identifiers and comments are
/// left alone. With no parameters the query is returned unchanged.
///
/// # Errors
/// Returns `QueryError::ParameterBindingError` if the number of placeholders
/// differs from the number of parameters, or a parameter cannot be rendered
///
/// # Example
///
/// ```
/// use chdb_cursor::query::{interpolate, Parameter};
///
/// let sql = interpolate("SELECT ? AS n, '?' AS q", &[Parameter::Integer(7)]).unwrap();
/// assert_eq!(sql, "SELECT 7 AS n, '?' AS q");
/// ```
pub fn interpolate(sql: &str, params: &[Parameter]) -> Result<String, QueryError> {
    if params.is_empty() {
        return Ok(sql.to_string());
    }

    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut context = Context::Code;
    let mut index = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match context {
            Context::Code => match c {
                '?' => {
                    let param = params.get(index).ok_or_else(|| {
                        QueryError::ParameterBindingError {
                            index,
                            message: format!(
                                "query has more placeholders than the {} parameters given",
                                params.len()
                            ),
                        }
                    })?;
                    let literal = param.to_sql_literal().map_err(|e| match e {
                        QueryError::ParameterBindingError { message, .. } => {
                            QueryError::ParameterBindingError { index, message }
                        }
                        other => other,
                    })?;
                    out.push_str(&literal);
                    index += 1;
                    continue;
                }
                '\'' | '"' | '`' => context = Context::Quoted(c),
                '-' if chars.peek() == Some(&'-') => context = Context::LineComment,
                '/' if chars.peek() == Some(&'*') => {
                    out.push(c);
                    if let Some(star) = chars.next() {
                        out.push(star);
                    }
                    context = Context::BlockComment;
                    continue;
                }
                _ => {}
            },
            Context::Quoted(quote) => {
                if c == '\\' {
                    out.push(c);
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                    continue;
                }
                if c == quote {
                    context = Context::Code;
                }
            }
            Context::LineComment => {
                if c == '\n' {
                    context = Context::Code;
                }
            }
            Context::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    out.push(c);
                    if let Some(slash) = chars.next() {
                        out.push(slash);
                    }
                    context = Context::Code;
                    continue;
                }
            }
        }
        out.push(c);
    }

    if index != params.len() {
        return Err(QueryError::ParameterBindingError {
            index,
            message: format!(
                "query has {} placeholders but {} parameters were given",
                index,
                params.len()
            ),
        });
    }

    Ok(out)
}
