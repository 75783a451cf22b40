use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::descriptor::{Mappable, TypeDescriptor};

type ErasedDescriptor = Arc<dyn Any + Send + Sync>;

/// Memoizes the accessible properties and the ignored names of each type.
#[derive(Default)]
pub struct Introspector {
  properties: DashMap<TypeId, ErasedDescriptor>,
  ignored: DashMap<TypeId, Arc<HashSet<&'static str>>>,
}

impl Introspector {
  pub fn new() -> Self {
    Self::default()
  }

  /// Readable and writable properties of `T`, in declaration order.
  pub fn properties<T: Mappable>(&self) -> Arc<TypeDescriptor<T>> {
    let key = TypeId::of::<T>();
    let cached = self
      .properties
      .get(&key)
      .and_then(|entry| entry.value().clone().downcast::<TypeDescriptor<T>>().ok());
    if let Some(descriptor) = cached {
      return descriptor;
    }

    let descriptor = Arc::new(T::describe().into_accessible());
    debug!(
      "described `{}`: {} accessible properties",
      descriptor.name(),
      descriptor.properties().len()
    );
    let published: ErasedDescriptor = self
      .properties
      .entry(key)
      .or_insert_with(|| descriptor.clone() as ErasedDescriptor)
      .clone();
    published.downcast::<TypeDescriptor<T>>().unwrap_or(descriptor)
  }

  /// Properties of `T` that are never assigned by a plan.
  pub fn ignored_names<T: Mappable>(&self) -> Arc<HashSet<&'static str>> {
    let key = TypeId::of::<T>();
    if let Some(names) = self.ignored.get(&key) {
      return names.value().clone();
    }

    let names: Arc<HashSet<_>> = Arc::new(T::describe().ignored_names().collect());
    self.ignored.entry(key).or_insert(names).clone()
  }

  pub fn clear(&self) {
    self.properties.clear();
    self.ignored.clear();
  }
}
