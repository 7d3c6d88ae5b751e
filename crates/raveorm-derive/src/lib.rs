//! Derive macros for raveorm
//!
//! Provides `#[derive(Entity)]`, `#[derive(FromRow)]` and `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod from_row;
mod model;

/// Derive `Entity` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use raveorm::Entity;
///
/// #[derive(Entity)]
/// struct ArticleEntity {
///     #[orm(id)]
///     id: Option<i64>,
///     title: String,
///     #[orm(column = "body")]
///     content: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `fn columns(&self)` - `(column, value)` pairs in field order
/// - `fn primary_keys(&self)` - columns of the `#[orm(id)]` fields
///
/// # Attributes
///
/// - `#[orm(id)]` - Mark field as (part of) the primary key
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave the field out of the column list
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use raveorm::FromRow;
///
/// #[derive(FromRow)]
/// struct ArticleEntity {
///     id: Option<i64>,
///     title: String,
///     #[orm(column = "body")]
///     content: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Fill the field with `Default::default()`
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Model` for a unit struct.
///
/// # Example
///
/// ```ignore
/// use raveorm::Model;
///
/// #[derive(Model)]
/// #[orm(table = "articles", entity = "ArticleEntity")]
/// struct ArticleModel;
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name. Defaults to the struct name
///   without its `Model` suffix, in snake case (`BlogPostModel` -> `blog_post`)
/// - `#[orm(entity = "Path")]` - Entity type. Defaults to the struct name
///   with `Model` replaced by `Entity` (`ArticleModel` -> `ArticleEntity`)
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
