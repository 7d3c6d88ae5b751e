//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::named_fields;

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = named_fields(&input, "Entity")?;
    let columns: Vec<_> = fields
        .iter()
        .filter(|field| !field.attr.skip)
        .map(|field| {
            let ident = field.ident;
            let column = &field.column;
            quote! {
                (#column, raveorm::Value::from(::std::clone::Clone::clone(&self.#ident)))
            }
        })
        .collect();
    let primary_keys: Vec<_> = fields
        .iter()
        .filter(|field| field.attr.is_id && !field.attr.skip)
        .map(|field| &field.column)
        .collect();

    Ok(quote! {
        impl #impl_generics raveorm::Entity for #name #ty_generics #where_clause {
            fn columns(&self) -> ::std::vec::Vec<(&'static str, raveorm::Value)> {
                ::std::vec![#(#columns),*]
            }

            fn primary_keys(&self) -> &'static [&'static str] {
                &[#(#primary_keys),*]
            }
        }
    })
}
