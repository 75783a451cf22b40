use proc_macro_error::{abort, diagnostic, Level, ResultExt};
use quote::ToTokens;
use syn::{Attribute, Lit, LitStr, Meta, NestedMeta, Path};
use thiserror::Error;

pub const ATTR_NAME: &str = "value_mapper";

#[derive(Debug, Clone, Error)]
pub enum Error {
  #[error("Unknown option: {0}")]
  UnknownOption(String),
  #[error("Option `{0}` expects a string literal")]
  ExpectedString(String),
  #[error("Option `{0}` is specified more than once")]
  Duplicate(&'static str),
  #[error("`rename` needs a field name")]
  EmptyName,
}

/// Options of `#[value_mapper(...)]` on a struct field.
#[derive(Debug, Default)]
pub struct FieldOpts {
  pub rename: Option<LitStr>,
  pub ignore: bool,
  pub readonly: bool,
}

impl FieldOpts {
  pub fn from_attrs(attrs: &[Attribute]) -> Self {
    let mut opts = Self::default();
    for attr in attrs.iter().filter(|attr| attr.path.is_ident(ATTR_NAME)) {
      match attr.parse_meta().unwrap_or_abort() {
        // #[value_mapper(...)]
        Meta::List(ref list) => {
          for nested in list.nested.iter() {
            opts
              .apply(nested)
              .map_err(|err| diagnostic!(nested, Level::Error, err))
              .expect_or_abort("Invalid `value_mapper` option");
          }
        }
        ref meta => abort!(meta, "Expected `#[value_mapper(...)]`"),
      }
    }
    opts
  }

  fn apply(&mut self, nested: &NestedMeta) -> Result<(), Error> {
    match nested {
      // ignore, readonly
      NestedMeta::Meta(Meta::Path(ref path)) => match path_name(path).as_str() {
        "ignore" => set_flag(&mut self.ignore, "ignore"),
        "readonly" => set_flag(&mut self.readonly, "readonly"),
        other => Err(Error::UnknownOption(other.to_owned())),
      },
      // rename = ".."
      NestedMeta::Meta(Meta::NameValue(ref v)) => {
        let name = path_name(&v.path);
        if name != "rename" {
          return Err(Error::UnknownOption(name));
        }
        if self.rename.is_some() {
          return Err(Error::Duplicate("rename"));
        }
        match v.lit {
          Lit::Str(ref lit) if lit.value().trim().is_empty() => Err(Error::EmptyName),
          Lit::Str(ref lit) => {
            self.rename = Some(lit.clone());
            Ok(())
          }
          _ => Err(Error::ExpectedString(name)),
        }
      }
      other => Err(Error::UnknownOption(other.to_token_stream().to_string())),
    }
  }
}

fn set_flag(flag: &mut bool, name: &'static str) -> Result<(), Error> {
  if *flag {
    return Err(Error::Duplicate(name));
  }
  *flag = true;
  Ok(())
}

fn path_name(path: &Path) -> String {
  path.to_token_stream().to_string()
}

#[test]
fn test_field_opts() {
  let input: syn::DeriveInput = syn::parse_quote! {
    struct Person {
      #[value_mapper(rename = "full_name", readonly)]
      #[doc = "ignored"]
      pub name: String,
    }
  };
  let field = match input.data {
    syn::Data::Struct(ref data) => data.fields.iter().next().unwrap(),
    _ => unreachable!(),
  };
  let opts = FieldOpts::from_attrs(&field.attrs);
  assert_eq!(opts.rename.map(|v| v.value()).as_deref(), Some("full_name"));
  assert!(opts.readonly);
  assert!(!opts.ignore);
}

#[test]
fn test_apply_errors() {
  let mut opts = FieldOpts::default();
  let unknown: NestedMeta = syn::parse_quote!(skip);
  assert!(matches!(opts.apply(&unknown), Err(Error::UnknownOption(ref v)) if v == "skip"));

  let ignore: NestedMeta = syn::parse_quote!(ignore);
  assert!(opts.apply(&ignore).is_ok());
  assert!(matches!(opts.apply(&ignore), Err(Error::Duplicate("ignore"))));

  let number: NestedMeta = syn::parse_quote!(rename = 3);
  assert!(matches!(opts.apply(&number), Err(Error::ExpectedString(_))));

  let empty: NestedMeta = syn::parse_quote!(rename = " ");
  assert!(matches!(opts.apply(&empty), Err(Error::EmptyName)));
}
