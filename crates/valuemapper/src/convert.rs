//! Resolution of the conversion applied between a source field type and a destination field type.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use log::trace;

use crate::coerce::coerce;
use crate::error::{ConversionError, MapError};
use crate::property::{EnumVariant, TypeInfo, TypeKind};
use crate::value::{Number, NumericKind, Value};

/// The rule a [`Converter`] was resolved from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRule {
  Identity,
  Nullable,
  EnumFromText,
  EnumToText,
  EnumFromNumber,
  EnumToNumber,
  Numeric,
  Coerce,
  SequenceCopy,
}

type ConvertFn = dyn Fn(Value) -> Result<Value, ConversionError> + Send + Sync;

/// A single-argument conversion into one destination type.
#[derive(Clone)]
pub struct Converter {
  rule: ConversionRule,
  target: TypeInfo,
  func: Arc<ConvertFn>,
}

impl Converter {
  fn new<F>(rule: ConversionRule, target: &TypeInfo, func: F) -> Self
  where
    F: Fn(Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
  {
    Self {
      rule,
      target: target.clone(),
      func: Arc::new(func),
    }
  }

  fn identity(target: &TypeInfo) -> Self {
    Self::new(ConversionRule::Identity, target, |value| Ok(value))
  }

  /// Moves a sequence of identical element type into another container shape.
  pub(crate) fn sequence_copy(target: &TypeInfo) -> Self {
    Self::new(ConversionRule::SequenceCopy, target, |value| Ok(value))
  }

  pub fn rule(&self) -> ConversionRule {
    self.rule
  }

  pub fn target(&self) -> &TypeInfo {
    &self.target
  }

  /// Runs the conversion.
  ///
  /// Recoverable failures yield the target's zero value; only fatal ones are returned.
  pub fn convert(&self, value: Value) -> Result<Value, MapError> {
    match (self.func)(value) {
      Ok(value) => Ok(value),
      Err(ConversionError::Fatal(err)) => Err(err),
      Err(err) => {
        trace!("{}; using the zero value of `{}`", err, self.target.name());
        Ok(self.target.zero_value())
      }
    }
  }
}

impl fmt::Debug for Converter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Converter")
      .field("rule", &self.rule)
      .field("target", &self.target.name())
      .finish()
  }
}

/// Resolves and memoizes converters per (source type, destination type).
#[derive(Default)]
pub struct ConversionResolver {
  cache: DashMap<(TypeId, TypeId), Option<Converter>>,
}

impl ConversionResolver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns `None` when no rule can produce a value of the destination type.
  pub fn resolve(&self, source: &TypeInfo, target: &TypeInfo) -> Option<Converter> {
    let key = (source.id(), target.id());
    if let Some(cached) = self.cache.get(&key) {
      return cached.value().clone();
    }

    let resolved = self.build(source, target);
    self.cache.entry(key).or_insert(resolved).clone()
  }

  pub fn clear(&self) {
    self.cache.clear();
  }

  fn build(&self, source: &TypeInfo, target: &TypeInfo) -> Option<Converter> {
    use ConversionRule::*;

    if source.id() == target.id() {
      return Some(Converter::identity(target));
    }

    if let TypeKind::Nullable(inner) = target.kind() {
      let inner = self.resolve(source, inner)?;
      return Some(Converter::new(Nullable, target, pass_null(inner)));
    }

    if let TypeKind::Nullable(inner) = source.kind() {
      let inner = self.resolve(inner, target)?;
      if inner.rule() == EnumFromText {
        return Some(inner);
      }
      return Some(Converter::new(Nullable, target, pass_null(inner)));
    }

    let converter = match (source.kind(), target.kind()) {
      (TypeKind::String, TypeKind::Enum(variants)) => {
        let (info, variants) = (target.clone(), *variants);
        Converter::new(EnumFromText, target, move |value| match value {
          Value::Null => Ok(info.zero_value()),
          Value::String(text) => parse_enum(&info, variants, text),
          other => Err(incompatible(&other, &info)),
        })
      }
      (TypeKind::Enum(_), TypeKind::String) => {
        let info = target.clone();
        Converter::new(EnumToText, target, move |value| match value {
          Value::Enum(member) => Ok(Value::String(member.name.to_owned())),
          other => Err(incompatible(&other, &info)),
        })
      }
      (TypeKind::Numeric(_), TypeKind::Enum(variants)) => {
        let (info, variants) = (target.clone(), *variants);
        Converter::new(EnumFromNumber, target, move |value| match value {
          Value::Number(n) => from_discriminant(&info, variants, n),
          other => Err(incompatible(&other, &info)),
        })
      }
      (TypeKind::Enum(_), TypeKind::Numeric(kind)) => {
        let (info, kind) = (target.clone(), *kind);
        Converter::new(EnumToNumber, target, move |value| match value {
          Value::Enum(member) => Number::I128(member.discriminant)
            .cast(kind)
            .map(Value::Number),
          other => Err(incompatible(&other, &info)),
        })
      }
      (TypeKind::Numeric(_), TypeKind::Numeric(_))
      | (TypeKind::String, TypeKind::Numeric(_))
      | (TypeKind::Numeric(_), TypeKind::String) => {
        let info = target.clone();
        Converter::new(Numeric, target, move |value| coerce(value, &info))
      }
      (_, TypeKind::Sequence { .. }) | (_, TypeKind::Opaque) => return None,
      _ => {
        let info = target.clone();
        Converter::new(Coerce, target, move |value| coerce(value, &info))
      }
    };
    Some(converter)
  }
}

fn pass_null(inner: Converter) -> impl Fn(Value) -> Result<Value, ConversionError> {
  move |value| {
    if value.is_null() {
      Ok(Value::Null)
    } else {
      inner.convert(value).map_err(ConversionError::Fatal)
    }
  }
}

fn incompatible(value: &Value, target: &TypeInfo) -> ConversionError {
  ConversionError::Incompatible {
    found: value.describe(),
    target: target.name(),
  }
}

/// Case-insensitive member lookup. Blank text is the zero member; unknown text is fatal.
fn parse_enum(
  info: &TypeInfo,
  variants: &'static [EnumVariant],
  text: String,
) -> Result<Value, ConversionError> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Ok(info.zero_value());
  }

  let by_discriminant = |d: i128| variants.iter().find(|v| v.discriminant == d);
  variants
    .iter()
    .find(|v| v.name.eq_ignore_ascii_case(trimmed))
    .or_else(|| trimmed.parse::<i128>().ok().and_then(by_discriminant))
    .map(|v| Value::Enum(info.enum_value(v)))
    .ok_or_else(|| {
      ConversionError::Fatal(MapError::UnknownEnumMember {
        enum_name: info.name(),
        value: text.clone(),
      })
    })
}

fn from_discriminant(
  info: &TypeInfo,
  variants: &'static [EnumVariant],
  n: Number,
) -> Result<Value, ConversionError> {
  let discriminant = match n.cast(NumericKind::I128)? {
    Number::I128(d) => d,
    _ => return Err(ConversionError::Overflow { target: info.name() }),
  };
  variants
    .iter()
    .find(|v| v.discriminant == discriminant)
    .map(|v| Value::Enum(info.enum_value(v)))
    .ok_or(ConversionError::Overflow { target: info.name() })
}
