//! Model derive macro implementation

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs::struct_attr;

const MODEL_SUFFIX: &str = "Model";
const ENTITY_SUFFIX: &str = "Entity";

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    match &input.data {
        Data::Struct(data) if matches!(data.fields, Fields::Unit) => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for unit structs",
            ));
        }
    }

    let attr = struct_attr(&input)?;
    let type_name = name.to_string();

    let table = match &attr.table {
        Some(lit) => lit.value(),
        None => type_name
            .strip_suffix(MODEL_SUFFIX)
            .unwrap_or(&type_name)
            .to_snake_case(),
    };
    if table.trim().is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "Model needs a table name: add #[orm(table = \"table_name\")]",
        ));
    }

    let entity: syn::Path = match &attr.entity {
        Some(lit) => lit.parse()?,
        None if type_name.contains(MODEL_SUFFIX) => {
            let entity_name = type_name.replace(MODEL_SUFFIX, ENTITY_SUFFIX);
            syn::Ident::new(&entity_name, name.span()).into()
        }
        None => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model needs an entity type: add #[orm(entity = \"EntityType\")]",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics raveorm::Model for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            type Entity = #entity;
        }
    })
}
