//! Generic coercion between primitive value shapes.

use crate::error::ConversionError;
use crate::property::{TypeInfo, TypeKind};
use crate::value::{Number, NumericKind, Value};

/// Converts `value` into the shape of `target`.
///
/// Failures are always recoverable; the caller substitutes the target's zero value.
pub(crate) fn coerce(value: Value, target: &TypeInfo) -> Result<Value, ConversionError> {
  match (value, target.kind()) {
    (Value::Number(n), TypeKind::Numeric(kind)) => n.cast(*kind).map(Value::Number),
    (Value::String(s), TypeKind::Numeric(kind)) => Number::parse(&s, *kind).map(Value::Number),
    (Value::Number(n), TypeKind::String) => Ok(Value::String(n.to_string())),

    (Value::Bool(b), TypeKind::Numeric(kind)) => Number::U8(b as u8).cast(*kind).map(Value::Number),
    (Value::Number(n), TypeKind::Bool) => Ok(Value::Bool(!n.is_zero())),
    (Value::Bool(b), TypeKind::String) => Ok(Value::String(b.to_string())),
    (Value::String(s), TypeKind::Bool) => parse_bool(&s),

    (Value::Char(c), TypeKind::String) => Ok(Value::String(c.to_string())),
    (Value::String(s), TypeKind::Char) => single_char(&s),
    (Value::Char(c), TypeKind::Numeric(kind)) if !kind.is_float() => {
      Number::U32(c as u32).cast(*kind).map(Value::Number)
    }
    (Value::Number(n), TypeKind::Char) if !n.kind().is_float() => code_point(n),

    (value @ Value::Bool(_), TypeKind::Bool)
    | (value @ Value::Char(_), TypeKind::Char)
    | (value @ Value::String(_), TypeKind::String) => Ok(value),

    (value, _) => Err(ConversionError::Incompatible {
      found: value.describe(),
      target: target.name(),
    }),
  }
}

fn parse_bool(text: &str) -> Result<Value, ConversionError> {
  let trimmed = text.trim();
  if trimmed.eq_ignore_ascii_case("true") {
    Ok(Value::Bool(true))
  } else if trimmed.eq_ignore_ascii_case("false") {
    Ok(Value::Bool(false))
  } else {
    Err(ConversionError::Parse {
      text: text.to_owned(),
      target: "bool",
    })
  }
}

fn single_char(text: &str) -> Result<Value, ConversionError> {
  let mut chars = text.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) => Ok(Value::Char(c)),
    _ => Err(ConversionError::Parse {
      text: text.to_owned(),
      target: "char",
    }),
  }
}

fn code_point(n: Number) -> Result<Value, ConversionError> {
  match n.cast(NumericKind::U32)? {
    Number::U32(v) => char::from_u32(v)
      .map(Value::Char)
      .ok_or(ConversionError::Overflow { target: "char" }),
    _ => Err(ConversionError::Overflow { target: "char" }),
  }
}
