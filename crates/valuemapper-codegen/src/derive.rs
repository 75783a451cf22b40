use crate::attrs::FieldOpts;
use proc_macro2::TokenStream;
use proc_macro_error::{abort, abort_call_site};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_quote, Data, DeriveInput, Fields, Visibility};

#[derive(Debug)]
pub struct Derive {
  ident: syn::Ident,
  generics: syn::Generics,
  data: TypeData,
}

impl Derive {
  pub fn from_derive_input(input: &DeriveInput) -> Self {
    if let Some(param) = input.generics.lifetimes().next() {
      abort!(param, "Mapped types must be 'static, lifetime parameters are not supported.");
    }

    let data = match input.data {
      Data::Struct(ref data) => TypeData::Struct(match data.fields {
        Fields::Named(ref fields) => fields
          .named
          .iter()
          .map(|field| {
            let ident = field.ident.clone().unwrap();
            StructField {
              name: ident.unraw().to_string(),
              ident,
              ty: field.ty.clone(),
              public: matches!(field.vis, Visibility::Public(_)),
              opts: FieldOpts::from_attrs(&field.attrs),
            }
          })
          .collect(),
        Fields::Unit => Vec::new(),
        _ => abort!(data.fields, "Only support named fields."),
      }),
      Data::Enum(ref data) => {
        if data.variants.is_empty() {
          abort_call_site!("Enum needs at least one variant.");
        }
        if !input.generics.params.is_empty() {
          abort!(input.generics, "Only support enums without generic parameters.");
        }
        TypeData::Enum(data.variants.iter().map(|v| {
          if let syn::Fields::Unit = v.fields {
            v.ident.clone()
          } else {
            abort!(v, "Only support unit variant.")
          }
        }).collect())
      }
      _ => {
        abort_call_site!("Only support struct and enum.");
      }
    };

    Self {
      ident: input.ident.clone(),
      generics: input.generics.clone(),
      data,
    }
  }
}

impl ToTokens for Derive {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let item = match self.data {
      TypeData::Struct(ref fields) => self.get_struct_tokens(fields),
      TypeData::Enum(ref variants) => self.get_enum_tokens(variants),
    };
    tokens.extend(item);
  }
}

#[derive(Debug)]
enum TypeData {
  Struct(Vec<StructField>),
  Enum(Vec<syn::Ident>),
}

#[derive(Debug)]
struct StructField {
  ident: syn::Ident,
  name: String,
  ty: syn::Type,
  public: bool,
  opts: FieldOpts,
}

impl StructField {
  // PropertyDescriptor::new(..).with_getter(..).with_setter(..)
  fn get_descriptor_tokens(&self) -> TokenStream {
    let ident = &self.ident;
    let name = &self.name;
    let ty = &self.ty;

    let mut tokens = quote! {
      ::valuemapper::PropertyDescriptor::new(
        #name,
        <#ty as ::valuemapper::Property>::type_info(),
      )
    };

    // Only `pub` fields are readable and writable from outside the type.
    if self.public {
      tokens.extend(quote! {
        .with_getter(|__obj: &Self| {
          <#ty as ::valuemapper::Property>::to_value(&__obj.#ident)
        })
      });
      if !self.opts.readonly {
        tokens.extend(quote! {
          .with_setter(|__obj: &mut Self, __value: ::valuemapper::Value| {
            match <#ty as ::valuemapper::Property>::from_value(__value) {
              ::core::option::Option::Some(__value) => {
                __obj.#ident = __value;
                true
              }
              ::core::option::Option::None => false,
            }
          })
        });
      }
    }

    if let Some(ref counterpart) = self.opts.rename {
      tokens.extend(quote! { .rename(#counterpart) });
    }
    if self.opts.ignore {
      tokens.extend(quote! { .ignore() });
    }
    tokens
  }
}

impl Derive {
  fn get_struct_tokens(&self, fields: &[StructField]) -> TokenStream {
    let self_ident = &self.ident;
    let generics = self.bounded_generics(fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let properties: Vec<_> = fields
      .iter()
      .map(StructField::get_descriptor_tokens)
      .collect();

    quote! {
      impl #impl_generics ::valuemapper::Mappable for #self_ident #ty_generics #where_clause {
        fn describe() -> ::valuemapper::TypeDescriptor<Self> {
          ::valuemapper::TypeDescriptor::new(::core::any::type_name::<Self>())
            #(.property(#properties))*
        }
      }
    }
  }

  // T: Send + Sync + 'static for every type parameter, Property for every field type.
  fn bounded_generics(&self, fields: &[StructField]) -> syn::Generics {
    let mut generics = self.generics.clone();
    if generics.type_params().next().is_none() {
      return generics;
    }

    let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
      where_clause.predicates.push(parse_quote! {
        #param: ::core::marker::Send + ::core::marker::Sync + 'static
      });
    }
    for field in fields {
      let ty = &field.ty;
      where_clause
        .predicates
        .push(parse_quote! { #ty: ::valuemapper::Property });
    }
    generics
  }

  fn get_enum_tokens(&self, variants: &[syn::Ident]) -> TokenStream {
    let self_ident = &self.ident;
    let names: Vec<_> = variants.iter().map(|v| v.unraw().to_string()).collect();

    quote! {
      impl ::valuemapper::Property for #self_ident {
        fn type_info() -> ::valuemapper::TypeInfo {
          const VARIANTS: &[::valuemapper::EnumVariant] = &[
            #(::valuemapper::EnumVariant {
              name: #names,
              discriminant: #self_ident::#variants as i128,
            }),*
          ];
          ::valuemapper::TypeInfo::of::<Self>(::valuemapper::TypeKind::Enum(VARIANTS))
        }

        fn to_value(&self) -> ::valuemapper::Value {
          let (name, discriminant) = match self {
            #(#self_ident::#variants => (#names, #self_ident::#variants as i128)),*
          };
          ::valuemapper::Value::Enum(::valuemapper::EnumValue {
            enum_name: ::core::any::type_name::<Self>(),
            name,
            discriminant,
          })
        }

        fn from_value(value: ::valuemapper::Value) -> ::core::option::Option<Self> {
          match value {
            ::valuemapper::Value::Enum(member)
              if member.enum_name == ::core::any::type_name::<Self>() =>
            {
              #(
                if member.discriminant == #self_ident::#variants as i128 {
                  return ::core::option::Option::Some(#self_ident::#variants);
                }
              )*
              ::core::option::Option::None
            }
            _ => ::core::option::Option::None,
          }
        }
      }
    }
  }
}

#[test]
fn test_generic_bounds() {
  let input: DeriveInput = parse_quote! {
    struct Wrapper<T> {
      pub value: T,
      pub label: String,
    }
  };
  let derive = Derive::from_derive_input(&input);
  let fields = match derive.data {
    TypeData::Struct(ref fields) => fields,
    _ => unreachable!(),
  };
  let generics = derive.bounded_generics(fields);
  let where_clause = generics.where_clause.as_ref().unwrap();
  assert_eq!(where_clause.predicates.len(), 3);
  assert!(derive.to_token_stream().to_string().contains("Send"));

  let input: DeriveInput = parse_quote! {
    struct Plain {
      pub value: i32,
    }
  };
  let derive = Derive::from_derive_input(&input);
  assert!(derive.generics.where_clause.is_none());
  assert!(derive.bounded_generics(&[]).where_clause.is_none());
}
