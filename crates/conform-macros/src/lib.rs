mod derive;

use proc_macro::TokenStream;

/// Derive `conform::Conform` and `conform::Record` for a struct.
///
/// Field attributes:
/// - `#[conform("trim, lower")]` runs the listed transforms, in order, on a
///   text field. `#[conform = "trim"]` is accepted as well, and several
///   attributes on one field concatenate.
/// - `#[conform(skip)]` excludes the field from traversal entirely.
///
/// Every other field is walked if it is a record (or a pointer / sequence of
/// records) and left alone otherwise.
#[proc_macro_derive(Conform, attributes(conform))]
pub fn derive_conform(input: TokenStream) -> TokenStream {
    derive::expand_entry(input)
}
