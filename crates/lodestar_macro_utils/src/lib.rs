//! Shared utilities for Lodestar procedural macro crates.
//!
//! Resolves the path generated code should use to reach a Lodestar crate,
//! whether the consumer depends on it directly, under a renamed key, or only
//! through the `lodestar` umbrella crate.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Name of the umbrella crate that re-exports every Lodestar crate.
const UMBRELLA: &str = "lodestar";

/// A Lodestar crate that macro-generated code may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodestarCrate {
    /// `lodestar_tools`
    Tools,
}

impl LodestarCrate {
    /// Returns the `Cargo.toml` package name for this crate.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tools => "lodestar_tools",
        }
    }
}

/// Returns a [`TokenStream`] path for the given Lodestar crate.
///
/// Resolution order:
/// 1. The crate itself, or a direct dependency (possibly renamed).
/// 2. The `lodestar` umbrella crate (`lodestar::<name>`).
/// 3. The literal crate name, so the compile error names the missing
///    dependency.
#[must_use]
pub fn resolve_crate_path(krate: LodestarCrate) -> TokenStream {
    let name = krate.as_str();

    match crate_name(name) {
        // Library code refers to itself through `extern crate self as <name>`.
        Ok(FoundCrate::Itself) => {
            let ident = format_ident!("{}", name);
            quote!(::#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(::#ident)
        }
        Err(_) => match crate_name(UMBRELLA) {
            Ok(FoundCrate::Name(found)) => {
                let umbrella = format_ident!("{}", found);
                let ident = format_ident!("{}", name);
                quote!(::#umbrella::#ident)
            }
            Ok(FoundCrate::Itself) => {
                let ident = format_ident!("{}", name);
                quote!(crate::#ident)
            }
            Err(_) => {
                let ident = format_ident!("{}", name);
                quote!(::#ident)
            }
        },
    }
}
