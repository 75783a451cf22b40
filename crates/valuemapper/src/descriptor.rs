//! Per-type property listings, normally emitted by `#[derive(Mappable)]`.

use std::fmt;

use crate::property::TypeInfo;
use crate::value::Value;

pub type Getter<T> = fn(&T) -> Value;
/// Returns `false` when the value does not have the field's exact shape.
pub type Setter<T> = fn(&mut T, Value) -> bool;

/// A struct whose fields can be read and written through a [`TypeDescriptor`].
///
/// Implement it with `#[derive(Mappable)]`:
///
/// ```
/// use valuemapper::Mappable;
///
/// #[derive(Default, Mappable)]
/// pub struct User {
///   pub name: String,
///   #[value_mapper(rename = "years")]
///   pub age: u32,
///   #[value_mapper(ignore)]
///   pub password_hash: String,
/// }
/// ```
pub trait Mappable: Sized + Send + Sync + 'static {
  fn describe() -> TypeDescriptor<Self>;
}

pub struct PropertyDescriptor<T> {
  name: &'static str,
  type_info: TypeInfo,
  rename: Option<&'static str>,
  ignored: bool,
  getter: Option<Getter<T>>,
  setter: Option<Setter<T>>,
}

impl<T> PropertyDescriptor<T> {
  /// A property with neither accessor.
  pub fn new(name: &'static str, type_info: TypeInfo) -> Self {
    Self {
      name,
      type_info,
      rename: None,
      ignored: false,
      getter: None,
      setter: None,
    }
  }

  pub fn with_getter(mut self, getter: Getter<T>) -> Self {
    self.getter = Some(getter);
    self
  }

  pub fn with_setter(mut self, setter: Setter<T>) -> Self {
    self.setter = Some(setter);
    self
  }

  /// Names the counterpart property on the other side of a mapping.
  pub fn rename(mut self, counterpart: &'static str) -> Self {
    self.rename = Some(counterpart);
    self
  }

  /// Excludes the property from every plan that targets this type.
  pub fn ignore(mut self) -> Self {
    self.ignored = true;
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn type_info(&self) -> &TypeInfo {
    &self.type_info
  }

  pub fn renamed(&self) -> Option<&'static str> {
    self.rename
  }

  pub fn is_ignored(&self) -> bool {
    self.ignored
  }

  pub fn getter(&self) -> Option<Getter<T>> {
    self.getter
  }

  pub fn setter(&self) -> Option<Setter<T>> {
    self.setter
  }

  pub fn is_readable(&self) -> bool {
    self.getter.is_some()
  }

  pub fn is_writable(&self) -> bool {
    self.setter.is_some()
  }
}

impl<T> fmt::Debug for PropertyDescriptor<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PropertyDescriptor")
      .field("name", &self.name)
      .field("type", &self.type_info.name())
      .field("rename", &self.rename)
      .field("ignored", &self.ignored)
      .field("readable", &self.is_readable())
      .field("writable", &self.is_writable())
      .finish()
  }
}

pub struct TypeDescriptor<T> {
  name: &'static str,
  properties: Vec<PropertyDescriptor<T>>,
}

impl<T> TypeDescriptor<T> {
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      properties: Vec::new(),
    }
  }

  pub fn property(mut self, property: PropertyDescriptor<T>) -> Self {
    self.properties.push(property);
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Properties in declaration order.
  pub fn properties(&self) -> &[PropertyDescriptor<T>] {
    &self.properties
  }

  pub fn find(&self, name: &str) -> Option<&PropertyDescriptor<T>> {
    self.properties.iter().find(|p| p.name == name)
  }

  /// Names of properties carrying the ignore annotation.
  pub(crate) fn ignored_names(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.properties.iter().filter(|p| p.ignored).map(|p| p.name)
  }

  /// Drops properties missing either accessor.
  pub(crate) fn into_accessible(mut self) -> Self {
    self.properties.retain(|p| p.is_readable() && p.is_writable());
    self
  }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("properties", &self.properties)
      .finish()
  }
}
