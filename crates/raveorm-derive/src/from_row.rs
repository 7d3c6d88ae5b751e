//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::named_fields;

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_extracts: Vec<_> = named_fields(&input, "FromRow")?
        .iter()
        .map(|field| {
            let ident = field.ident;
            let column = &field.column;
            if field.attr.skip {
                quote! { #ident: ::std::default::Default::default() }
            } else {
                quote! { #ident: row.try_get(#column)? }
            }
        })
        .collect();

    Ok(quote! {
        impl #impl_generics raveorm::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &raveorm::Row) -> raveorm::OrmResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
