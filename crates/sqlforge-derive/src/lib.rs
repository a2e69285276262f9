//! Derive macros for sqlforge
//!
//! Provides `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_row;

/// Derive `FromRow` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use sqlforge::FromRow;
///
/// #[derive(FromRow)]
/// struct Item {
///     #[sqlforge(column = "c1")]
///     id: i64,
///     #[sqlforge(column = "c2")]
///     label: Option<String>,
///     created_at: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[sqlforge(column = "name")]` - Read the field from a differently named column
/// - `#[sqlforge(default)]` - Use `Default::default()` when the column is absent
#[proc_macro_derive(FromRow, attributes(sqlforge))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
