extern crate proc_macro;

use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod derive;

use derive::Derive;

/// Implements `valuemapper::Mappable` for a struct with named fields, or
/// `valuemapper::Property` for an enum with unit variants only.
///
/// Field options, in `#[value_mapper(...)]`:
/// - `rename = "name"`: the counterpart field on the other side of a mapping.
/// - `ignore`: never assigned when this type is the destination.
/// - `readonly`: exposes no setter, which leaves the field out of every mapping.
#[proc_macro_derive(Mappable, attributes(value_mapper))]
#[proc_macro_error::proc_macro_error]
pub fn derive_mappable(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
  let input = parse_macro_input!(tokens as DeriveInput);
  let derive: Derive = Derive::from_derive_input(&input);
  let tokens = quote!(#derive);
  tokens.into()
}
