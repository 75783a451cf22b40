//! # ValueMapper
//!
//! Copies field values between two struct types by name.
//!
//! The first time a pair of types is mapped, the fields of both sides are matched (by name,
//! case-insensitively, or through `rename` annotations) and a plan of get/convert/set steps is
//! compiled and cached. Later calls for the same pair only run the plan.
//!
//! Primitive values are coerced when the field types differ: numbers are widened, narrowed or
//! parsed, enums are converted to and from their member names and discriminants, and `Option`
//! fields are unwrapped or wrapped. A value that cannot be converted becomes the destination's
//! zero value, except for text naming no member of a destination enum, which is an error.
//!
//! Sources are passed as `&S` or `Option<&S>`, batches as a slice `&[S]` or `Option<&[S]>`
//! (`vec.as_slice()` or `&vec[..]` for a `Vec`); `None` is rejected with
//! [`MapError::NullArgument`].
//!
//! # Example
//! ```
//!   use valuemapper::Mappable;
//!
//!   #[derive(Debug, Default, PartialEq, Mappable)]
//!   pub enum Status {
//!     #[default]
//!     Unknown,
//!     Active,
//!     Closed,
//!   }
//!
//!   #[derive(Default, Mappable)]
//!   pub struct Account {
//!     pub id: i32,
//!     pub status: String,
//!     pub owner: Option<String>,
//!     pub balance: f64,
//!   }
//!
//!   #[derive(Debug, Default, Mappable)]
//!   pub struct AccountView {
//!     pub id: i64,
//!     pub status: Status,
//!     #[value_mapper(rename = "owner")]
//!     pub holder: Option<String>,
//!     #[value_mapper(ignore)]
//!     pub balance: f64,
//!   }
//!
//!   let account = Account {
//!     id: 42,
//!     status: "active".to_owned(),
//!     owner: Some("ada".to_owned()),
//!     balance: 10.0,
//!   };
//!
//!   let view: AccountView = valuemapper::map::<Account, AccountView>(&account).unwrap();
//!   assert_eq!(view.id, 42);
//!   assert_eq!(view.status, Status::Active);
//!   assert_eq!(view.holder.as_deref(), Some("ada"));
//!   assert_eq!(view.balance, 0.0);
//! ```

use std::sync::OnceLock;

mod cache;
mod coerce;
mod convert;
mod descriptor;
mod error;
mod introspect;
mod mapper;
mod plan;
mod property;
mod value;

pub use convert::{ConversionResolver, ConversionRule, Converter};
pub use descriptor::{Getter, Mappable, PropertyDescriptor, Setter, TypeDescriptor};
pub use error::{ConversionError, MapError, Result};
pub use introspect::Introspector;
pub use mapper::{Mapper, MapperConfig, DEFAULT_MAX_PARALLELISM, DEFAULT_PARALLEL_THRESHOLD};
pub use plan::{MappingPlan, MappingStep};
pub use property::{EnumVariant, Property, SequenceShape, TypeInfo, TypeKind};
pub use value::{EnumValue, Number, NumericKind, Value};
pub use valuemapper_codegen::Mappable;

static GLOBAL: OnceLock<Mapper> = OnceLock::new();

/// The process-wide mapper used by the free functions of this crate.
pub fn global() -> &'static Mapper {
  GLOBAL.get_or_init(Mapper::default)
}

pub fn map<'a, S, D>(source: impl Into<Option<&'a S>>) -> Result<D>
where
  S: Mappable,
  D: Mappable + Default,
{
  global().map(source)
}

pub fn map_ignoring<'a, S, D>(source: impl Into<Option<&'a S>>, ignored: &[&str]) -> Result<D>
where
  S: Mappable,
  D: Mappable + Default,
{
  global().map_ignoring(source, ignored)
}

pub fn map_list<'a, S, D>(sources: impl Into<Option<&'a [S]>>) -> Result<Vec<D>>
where
  S: Mappable,
  D: Mappable + Default,
{
  global().map_list(sources)
}

pub fn map_list_ignoring<'a, S, D>(
  sources: impl Into<Option<&'a [S]>>,
  ignored: &[&str],
) -> Result<Vec<D>>
where
  S: Mappable,
  D: Mappable + Default,
{
  global().map_list_ignoring(sources, ignored)
}

pub fn pre_warm<S: Mappable, D: Mappable>() {
  global().pre_warm::<S, D>()
}

pub fn clear<S: Mappable, D: Mappable>() {
  global().clear::<S, D>()
}

pub fn clear_caches() {
  global().clear_caches()
}
