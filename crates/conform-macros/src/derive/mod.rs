//! `#[derive(Conform)]`.
//!
//! The macro pipeline is strictly staged:
//!
//!   parse → validate → expand
//!
//! Transform identifiers are only checked for shape here. Whether they name
//! a registered transform is a runtime question, since the registry can be
//! extended after compilation.

mod expand;
mod parse;
mod validate;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Name of the field attribute.
pub const ATTRIBUTE: &str = "conform";

/// Annotation delimiter; keep in sync with `conform::annotation::DELIMITER`.
pub const DELIMITER: char = ',';

pub fn expand_entry(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // ---------------------------------------------------------------------
    // Parse phase (attribute syntax only)
    // ---------------------------------------------------------------------

    let parsed = match parse::parse_input(input) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };

    // ---------------------------------------------------------------------
    // Validate phase (structural invariants only)
    // ---------------------------------------------------------------------

    let validated = match validate::validate(parsed) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };

    // ---------------------------------------------------------------------
    // Expansion phase (code generation)
    // ---------------------------------------------------------------------

    expand::expand(validated).into()
}
