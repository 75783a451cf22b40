//! Static type metadata and the [`Property`] trait implemented by every mappable field type.

use std::any::{type_name, TypeId};
use std::collections::VecDeque;

use crate::value::{EnumValue, Number, NumericKind, Value};

/// Declared type of a field.
#[derive(Debug, Clone)]
pub struct TypeInfo {
  id: TypeId,
  name: &'static str,
  kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
  Bool,
  Char,
  Numeric(NumericKind),
  String,
  Enum(&'static [EnumVariant]),
  /// `Option<T>`.
  Nullable(Box<TypeInfo>),
  Sequence {
    element: TypeId,
    shape: SequenceShape,
  },
  /// Any other type, copied only onto the identical type.
  Opaque,
}

/// Container shapes that take part in same-element sequence copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceShape {
  Vec,
  VecDeque,
  BoxedSlice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
  pub name: &'static str,
  pub discriminant: i128,
}

impl TypeInfo {
  pub fn of<T: 'static>(kind: TypeKind) -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: type_name::<T>(),
      kind,
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn kind(&self) -> &TypeKind {
    &self.kind
  }

  /// Whether a field of this type can hold "no value".
  pub fn accepts_absent(&self) -> bool {
    matches!(self.kind, TypeKind::Nullable(_))
  }

  /// The member standing in for zero: discriminant 0, else the first declared variant.
  pub fn enum_zero(&self) -> Option<EnumValue> {
    match self.kind {
      TypeKind::Enum(variants) => variants
        .iter()
        .find(|v| v.discriminant == 0)
        .or_else(|| variants.first())
        .map(|v| self.enum_value(v)),
      _ => None,
    }
  }

  pub(crate) fn enum_value(&self, variant: &EnumVariant) -> EnumValue {
    EnumValue {
      enum_name: self.name,
      name: variant.name,
      discriminant: variant.discriminant,
    }
  }

  /// The value substituted when a conversion into this type fails.
  pub fn zero_value(&self) -> Value {
    match self.kind {
      TypeKind::Bool => Value::Bool(false),
      TypeKind::Char => Value::Char('\0'),
      TypeKind::Numeric(kind) => Value::Number(Number::zero(kind)),
      TypeKind::String => Value::String(String::new()),
      TypeKind::Enum(_) => self.enum_zero().map(Value::Enum).unwrap_or(Value::Null),
      TypeKind::Nullable(_) | TypeKind::Sequence { .. } | TypeKind::Opaque => Value::Null,
    }
  }
}

/// A field type that can cross the type-erased boundary of a mapping plan.
///
/// `from_value` only accepts the exact shape `to_value` produces; all coercion happens in the
/// converters before a value reaches a setter.
pub trait Property: Sized + Send + Sync + 'static {
  fn type_info() -> TypeInfo;
  fn to_value(&self) -> Value;
  fn from_value(value: Value) -> Option<Self>;
}

impl Property for bool {
  fn type_info() -> TypeInfo {
    TypeInfo::of::<Self>(TypeKind::Bool)
  }

  fn to_value(&self) -> Value {
    Value::Bool(*self)
  }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Bool(v) => Some(v),
      _ => None,
    }
  }
}

impl Property for char {
  fn type_info() -> TypeInfo {
    TypeInfo::of::<Self>(TypeKind::Char)
  }

  fn to_value(&self) -> Value {
    Value::Char(*self)
  }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Char(v) => Some(v),
      _ => None,
    }
  }
}

impl Property for String {
  fn type_info() -> TypeInfo {
    TypeInfo::of::<Self>(TypeKind::String)
  }

  fn to_value(&self) -> Value {
    Value::String(self.clone())
  }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::String(v) => Some(v),
      _ => None,
    }
  }
}

macro_rules! numeric_property {
  ($($ty:ty => $variant:ident),* $(,)?) => {
    $(
      impl Property for $ty {
        fn type_info() -> TypeInfo {
          TypeInfo::of::<Self>(TypeKind::Numeric(NumericKind::$variant))
        }

        fn to_value(&self) -> Value {
          Value::Number(Number::$variant(*self))
        }

        fn from_value(value: Value) -> Option<Self> {
          match value {
            Value::Number(Number::$variant(v)) => Some(v),
            _ => None,
          }
        }
      }
    )*
  };
}

numeric_property! {
  i8 => I8,
  i16 => I16,
  i32 => I32,
  i64 => I64,
  i128 => I128,
  isize => Isize,
  u8 => U8,
  u16 => U16,
  u32 => U32,
  u64 => U64,
  u128 => U128,
  usize => Usize,
  f32 => F32,
  f64 => F64,
}

impl<T: Property> Property for Option<T> {
  fn type_info() -> TypeInfo {
    TypeInfo::of::<Self>(TypeKind::Nullable(Box::new(T::type_info())))
  }

  fn to_value(&self) -> Value {
    match self {
      Some(v) => v.to_value(),
      None => Value::Null,
    }
  }

  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Null => Some(None),
      value => T::from_value(value).map(Some),
    }
  }
}

fn sequence_info<S: 'static, T: 'static>(shape: SequenceShape) -> TypeInfo {
  TypeInfo::of::<S>(TypeKind::Sequence {
    element: TypeId::of::<T>(),
    shape,
  })
}

fn take_items<T: 'static>(value: Value) -> Option<Vec<T>> {
  match value {
    Value::Sequence(items) => items.downcast::<Vec<T>>().ok().map(|items| *items),
    _ => None,
  }
}

impl<T: Clone + Send + Sync + 'static> Property for Vec<T> {
  fn type_info() -> TypeInfo {
    sequence_info::<Self, T>(SequenceShape::Vec)
  }

  fn to_value(&self) -> Value {
    Value::Sequence(Box::new(self.clone()))
  }

  fn from_value(value: Value) -> Option<Self> {
    take_items(value)
  }
}

impl<T: Clone + Send + Sync + 'static> Property for VecDeque<T> {
  fn type_info() -> TypeInfo {
    sequence_info::<Self, T>(SequenceShape::VecDeque)
  }

  fn to_value(&self) -> Value {
    Value::Sequence(Box::new(self.iter().cloned().collect::<Vec<T>>()))
  }

  fn from_value(value: Value) -> Option<Self> {
    take_items(value).map(VecDeque::from)
  }
}

impl<T: Clone + Send + Sync + 'static> Property for Box<[T]> {
  fn type_info() -> TypeInfo {
    sequence_info::<Self, T>(SequenceShape::BoxedSlice)
  }

  fn to_value(&self) -> Value {
    Value::Sequence(Box::new(self.to_vec()))
  }

  fn from_value(value: Value) -> Option<Self> {
    take_items::<T>(value).map(Vec::into_boxed_slice)
  }
}

/// Implements [`Property`] for types that are copied as a whole onto fields of the same type.
///
/// ```
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Point { x: i32, y: i32 }
///
/// valuemapper::impl_opaque_property!(Point);
/// ```
#[macro_export]
macro_rules! impl_opaque_property {
  ($($ty:ty),+ $(,)?) => {
    $(
      impl $crate::Property for $ty {
        fn type_info() -> $crate::TypeInfo {
          $crate::TypeInfo::of::<Self>($crate::TypeKind::Opaque)
        }

        fn to_value(&self) -> $crate::Value {
          $crate::Value::Opaque(::std::boxed::Box::new(::std::clone::Clone::clone(self)))
        }

        fn from_value(value: $crate::Value) -> ::std::option::Option<Self> {
          match value {
            $crate::Value::Opaque(v) => v.downcast::<Self>().ok().map(|v| *v),
            _ => ::std::option::Option::None,
          }
        }
      }
    )+
  };
}
