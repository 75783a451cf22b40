//! Dynamic values exchanged between getters, converters and setters.

use std::any::Any;
use std::fmt;

use crate::error::ConversionError;

/// A field value with its static type erased.
pub enum Value {
  /// No value, produced by `None` fields.
  Null,
  Bool(bool),
  Char(char),
  Number(Number),
  String(String),
  Enum(EnumValue),
  /// A sequence normalized to a boxed `Vec<T>`.
  Sequence(Box<dyn Any + Send>),
  Opaque(Box<dyn Any + Send>),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// Short name of the value's shape, used in error messages.
  pub fn describe(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::Bool(_) => "bool",
      Value::Char(_) => "char",
      Value::Number(n) => n.kind().type_name(),
      Value::String(_) => "String",
      Value::Enum(e) => e.enum_name,
      Value::Sequence(_) => "sequence",
      Value::Opaque(_) => "opaque value",
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.write_str("Null"),
      Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
      Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
      Value::Number(v) => f.debug_tuple("Number").field(v).finish(),
      Value::String(v) => f.debug_tuple("String").field(v).finish(),
      Value::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
      Value::Sequence(_) => f.write_str("Sequence(..)"),
      Value::Opaque(_) => f.write_str("Opaque(..)"),
    }
  }
}

/// A member of a derived fieldless enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
  pub enum_name: &'static str,
  pub name: &'static str,
  pub discriminant: i128,
}

/// Widest lossless view of a number, used as the pivot for casts.
#[derive(Debug, Clone, Copy)]
enum Wide {
  Signed(i128),
  Unsigned(u128),
  Float(f64),
}

impl Wide {
  /// Integral view; floats are rounded half to even and rejected when out of range.
  fn integral(self) -> Option<Wide> {
    match self {
      Wide::Float(v) => {
        let r = v.round_ties_even();
        if !r.is_finite() {
          None
        } else if r >= 0.0 {
          (r < u128::MAX as f64).then(|| Wide::Unsigned(r as u128))
        } else {
          (r >= i128::MIN as f64).then(|| Wide::Signed(r as i128))
        }
      }
      other => Some(other),
    }
  }
}

trait Narrow: Sized {
  fn narrow(wide: Wide) -> Option<Self>;
}

macro_rules! narrow_int {
  ($($ty:ty),*) => {
    $(
      impl Narrow for $ty {
        fn narrow(wide: Wide) -> Option<Self> {
          match wide.integral()? {
            Wide::Signed(v) => <$ty>::try_from(v).ok(),
            Wide::Unsigned(v) => <$ty>::try_from(v).ok(),
            Wide::Float(_) => None,
          }
        }
      }
    )*
  };
}

macro_rules! narrow_float {
  ($($ty:ty),*) => {
    $(
      impl Narrow for $ty {
        fn narrow(wide: Wide) -> Option<Self> {
          Some(match wide {
            Wide::Signed(v) => v as $ty,
            Wide::Unsigned(v) => v as $ty,
            Wide::Float(v) => v as $ty,
          })
        }
      }
    )*
  };
}

narrow_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
narrow_float!(f32, f64);

macro_rules! numbers {
  ($($variant:ident => $ty:ty : $wide:ident),* $(,)?) => {
    /// Primitive numeric types understood by the coercion rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum NumericKind {
      $($variant),*
    }

    impl NumericKind {
      pub fn type_name(self) -> &'static str {
        match self {
          $(NumericKind::$variant => stringify!($ty)),*
        }
      }
    }

    /// A primitive number tagged with its exact type.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Number {
      $($variant($ty)),*
    }

    impl Number {
      pub fn kind(&self) -> NumericKind {
        match self {
          $(Number::$variant(_) => NumericKind::$variant),*
        }
      }

      pub fn zero(kind: NumericKind) -> Number {
        match kind {
          $(NumericKind::$variant => Number::$variant(0 as $ty)),*
        }
      }

      fn widen(self) -> Wide {
        match self {
          $(Number::$variant(v) => Wide::$wide(v as _)),*
        }
      }

      /// Converts to another numeric type.
      ///
      /// Integer targets are range checked, float sources are rounded half to even.
      pub fn cast(self, kind: NumericKind) -> Result<Number, ConversionError> {
        let wide = self.widen();
        let cast = match kind {
          $(NumericKind::$variant => <$ty as Narrow>::narrow(wide).map(Number::$variant)),*
        };
        cast.ok_or(ConversionError::Overflow { target: kind.type_name() })
      }

      /// Parses text the way the numeric type's `FromStr` does, ignoring surrounding whitespace.
      pub fn parse(text: &str, kind: NumericKind) -> Result<Number, ConversionError> {
        let trimmed = text.trim();
        let parsed = match kind {
          $(NumericKind::$variant => trimmed.parse::<$ty>().ok().map(Number::$variant)),*
        };
        parsed.ok_or_else(|| ConversionError::Parse {
          text: text.to_owned(),
          target: kind.type_name(),
        })
      }
    }

    impl fmt::Display for Number {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
          $(Number::$variant(v) => fmt::Display::fmt(v, f)),*
        }
      }
    }
  };
}

numbers! {
  I8 => i8 : Signed,
  I16 => i16 : Signed,
  I32 => i32 : Signed,
  I64 => i64 : Signed,
  I128 => i128 : Signed,
  Isize => isize : Signed,
  U8 => u8 : Unsigned,
  U16 => u16 : Unsigned,
  U32 => u32 : Unsigned,
  U64 => u64 : Unsigned,
  U128 => u128 : Unsigned,
  Usize => usize : Unsigned,
  F32 => f32 : Float,
  F64 => f64 : Float,
}

impl NumericKind {
  pub fn is_float(self) -> bool {
    matches!(self, NumericKind::F32 | NumericKind::F64)
  }
}

impl Number {
  pub fn is_zero(self) -> bool {
    match self.widen() {
      Wide::Signed(v) => v == 0,
      Wide::Unsigned(v) => v == 0,
      Wide::Float(v) => v == 0.0,
    }
  }
}
