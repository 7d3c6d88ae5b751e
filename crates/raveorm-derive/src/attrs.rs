//! Attribute parsing shared by the derives.
//!
//! Handles struct-level `#[orm(table = "...", entity = "...")]` and
//! field-level `#[orm(id, column = "...", skip)]`.

use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, Result, Token};

/// Field-level `#[orm(...)]` contents.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub is_id: bool,
    pub skip: bool,
    pub column: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "id" {
                attr.is_id = true;
            } else if ident == "skip" {
                attr.skip = true;
            } else if ident == "column" {
                let _: Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    &ident,
                    format!("unknown orm field attribute `{ident}`"),
                ));
            }

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// A named field with its resolved column.
pub(crate) struct FieldInfo<'a> {
    pub ident: &'a syn::Ident,
    pub column: String,
    pub attr: FieldAttr,
}

/// Merge every `#[orm(...)]` on a field.
pub(crate) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        merged.is_id |= parsed.is_id;
        merged.skip |= parsed.skip;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }
    Ok(merged)
}

/// Named fields of a struct, or an error naming the derive.
pub(crate) fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<Vec<FieldInfo<'a>>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    format!("{derive} can only be derived for structs with named fields"),
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs"),
            ));
        }
    };

    fields
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| (field, ident)))
        .map(|(field, ident)| {
            let attr = field_attr(field)?;
            let column = attr.column.clone().unwrap_or_else(|| ident.to_string());
            Ok(FieldInfo {
                ident,
                column,
                attr,
            })
        })
        .collect()
}

/// Struct-level `#[orm(...)]` contents.
#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<syn::LitStr>,
    pub entity: Option<syn::LitStr>,
}

/// Parse struct-level `#[orm(key = "value", ...)]`.
pub(crate) fn struct_attr(input: &DeriveInput) -> Result<StructAttr> {
    let mut out = StructAttr::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let pairs = attr.parse_args_with(Punctuated::<syn::MetaNameValue, Token![,]>::parse_terminated)?;
        for pair in pairs {
            let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = &pair.value
            else {
                return Err(syn::Error::new_spanned(&pair.value, "expected a string literal"));
            };
            if pair.path.is_ident("table") {
                out.table = Some(lit.clone());
            } else if pair.path.is_ident("entity") {
                out.entity = Some(lit.clone());
            } else {
                return Err(syn::Error::new_spanned(&pair.path, "unknown orm attribute"));
            }
        }
    }
    Ok(out)
}
