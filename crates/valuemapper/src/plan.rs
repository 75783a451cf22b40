//! Compilation and execution of per-pair mapping plans.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::convert::{ConversionResolver, ConversionRule, Converter};
use crate::descriptor::{Getter, Mappable, PropertyDescriptor, Setter, TypeDescriptor};
use crate::error::Result;
use crate::introspect::Introspector;
use crate::property::{TypeInfo, TypeKind};

/// One get/convert/set operation targeting a single destination property.
pub struct MappingStep<S, D> {
  name: &'static str,
  getter: Getter<S>,
  converter: Converter,
  setter: Setter<D>,
  accepts_absent: bool,
}

impl<S, D> MappingStep<S, D> {
  /// Name of the destination property.
  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn rule(&self) -> ConversionRule {
    self.converter.rule()
  }

  pub fn accepts_absent(&self) -> bool {
    self.accepts_absent
  }

  fn apply(&self, source: &S, target: &mut D) -> Result<()> {
    let value = self.converter.convert((self.getter)(source))?;
    if value.is_null() && !self.accepts_absent {
      return Ok(());
    }
    if !(self.setter)(target, value) {
      trace!("`{}` rejected the converted value", self.name);
    }
    Ok(())
  }
}

impl<S, D> fmt::Debug for MappingStep<S, D> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MappingStep")
      .field("name", &self.name)
      .field("rule", &self.rule())
      .field("accepts_absent", &self.accepts_absent)
      .finish()
  }
}

/// The immutable step list for one (source, destination) pair.
pub struct MappingPlan<S, D> {
  steps: Box<[MappingStep<S, D>]>,
}

impl<S: Mappable, D: Mappable> MappingPlan<S, D> {
  pub fn compile(introspector: &Introspector, resolver: &ConversionResolver) -> Self {
    let source = introspector.properties::<S>();
    let target = introspector.properties::<D>();
    let ignored = introspector.ignored_names::<D>();

    let mut by_name = HashMap::with_capacity(source.properties().len());
    for property in source.properties() {
      by_name
        .entry(property.name().to_lowercase())
        .or_insert(property);
    }

    let mut steps = Vec::with_capacity(target.properties().len());
    for property in target.properties() {
      if ignored.contains(property.name()) {
        continue;
      }
      let setter = match property.setter() {
        Some(setter) => setter,
        None => continue,
      };
      let bound = match property.renamed() {
        Some(counterpart) => source.find(counterpart),
        None => by_name
          .get(&property.name().to_lowercase())
          .copied()
          .or_else(|| renamed_to(&source, property.name())),
      };
      let counterpart = match bound.and_then(|p| p.getter().map(|g| (p, g))) {
        Some(bound) => bound,
        None => {
          debug!(
            "`{}::{}` has no source in `{}`",
            target.name(),
            property.name(),
            source.name()
          );
          continue;
        }
      };
      let (source_property, getter) = counterpart;

      let converter = match sequence_copy(source_property.type_info(), property.type_info()) {
        Some(copy) => copy,
        None => match resolver.resolve(source_property.type_info(), property.type_info()) {
          Some(converter) => converter,
          None => {
            debug!(
              "no conversion from `{}` to `{}` for `{}::{}`",
              source_property.type_info().name(),
              property.type_info().name(),
              target.name(),
              property.name()
            );
            continue;
          }
        },
      };

      steps.push(MappingStep {
        name: property.name(),
        getter,
        converter,
        setter,
        accepts_absent: property.type_info().accepts_absent(),
      });
    }

    debug!(
      "compiled plan `{}` -> `{}` with {} steps",
      source.name(),
      target.name(),
      steps.len()
    );
    Self {
      steps: steps.into_boxed_slice(),
    }
  }
}

impl<S, D> MappingPlan<S, D> {
  pub fn steps(&self) -> &[MappingStep<S, D>] {
    &self.steps
  }

  pub fn step_names(&self) -> Vec<&'static str> {
    self.steps.iter().map(|s| s.name).collect()
  }

  pub fn step(&self, name: &str) -> Option<&MappingStep<S, D>> {
    self.steps.iter().find(|s| s.name == name)
  }

  /// Maps one instance, skipping the destination properties named in `ignored`.
  pub fn execute(&self, source: &S, ignored: &[&str]) -> Result<D>
  where
    D: Default,
  {
    let mut target = D::default();
    for step in self.steps.iter() {
      if ignored.contains(&step.name) {
        continue;
      }
      step.apply(source, &mut target)?;
    }
    Ok(target)
  }
}

impl<S, D> fmt::Debug for MappingPlan<S, D> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.steps.iter()).finish()
  }
}

/// First source property whose rename annotation names `target` (case-insensitive).
fn renamed_to<'a, S>(
  source: &'a TypeDescriptor<S>,
  target: &str,
) -> Option<&'a PropertyDescriptor<S>> {
  source.properties().iter().find(|p| {
    p.renamed()
      .map_or(false, |counterpart| counterpart.to_lowercase() == target.to_lowercase())
  })
}

/// Same-element sequences are copied without conversion, with or without an `Option` around
/// either side; other sequence pairs map to nothing.
fn sequence_copy(source: &TypeInfo, target: &TypeInfo) -> Option<Converter> {
  let element = sequence_element(source)?;
  if sequence_element(target)? != element {
    return None;
  }
  Some(Converter::sequence_copy(target))
}

fn sequence_element(info: &TypeInfo) -> Option<TypeId> {
  match info.kind() {
    TypeKind::Sequence { element, .. } => Some(*element),
    TypeKind::Nullable(inner) => match inner.kind() {
      TypeKind::Sequence { element, .. } => Some(*element),
      _ => None,
    },
    _ => None,
  }
}
