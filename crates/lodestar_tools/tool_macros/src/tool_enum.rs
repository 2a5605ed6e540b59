//! Code generation for `#[derive(ToolEnum)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

use lodestar_macro_utils::{LodestarCrate, resolve_crate_path};

/// Case conventions accepted by `#[tool_enum(rename_all = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Snake,
    ScreamingSnake,
    Kebab,
    Camel,
    Pascal,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "camelCase" => Ok(Self::Camel),
            "PascalCase" => Ok(Self::Pascal),
            _ => Err(syn::Error::new_spanned(
                lit,
                "unknown rename rule; expected one of lowercase, UPPERCASE, snake_case, \
                 SCREAMING_SNAKE_CASE, kebab-case, camelCase, PascalCase",
            )),
        }
    }

    /// Applies the rule to a `PascalCase` variant name.
    fn apply(self, variant: &str) -> String {
        let words = split_words(variant);
        match self {
            Self::Lower => variant.to_lowercase(),
            Self::Upper => variant.to_uppercase(),
            Self::Snake => words.join("_").to_lowercase(),
            Self::ScreamingSnake => words.join("_").to_uppercase(),
            Self::Kebab => words.join("-").to_lowercase(),
            Self::Pascal => variant.to_string(),
            Self::Camel => {
                let mut chars = variant.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_lowercase().chain(chars).collect()
                })
            }
        }
    }
}

/// Splits `PascalCase` into words, keeping digits with the preceding word.
fn split_words(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for c in name.chars() {
        if c == '_' {
            words.push(String::new());
            continue;
        }
        match words.last_mut() {
            Some(word) if !(c.is_uppercase() && !word.is_empty()) => word.push(c),
            _ => words.push(c.to_string()),
        }
    }
    words.retain(|word| !word.is_empty());
    words
}

/// Parses `rename_all` or `rename` out of `#[tool_enum(...)]` attributes.
fn parse_rename(attrs: &[Attribute], key: &str) -> syn::Result<Option<LitStr>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("tool_enum")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                found = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error(format!("unsupported #[tool_enum] option; expected `{key}`")))
            }
        })?;
    }
    Ok(found)
}

/// Generates `ToolEnum`, `FromArgument` and `From<E> for TypedValue` impls.
pub(crate) fn generate_tool_enum(input: &DeriveInput) -> syn::Result<TokenStream> {
    let lt = resolve_crate_path(LodestarCrate::Tools);

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ToolEnum can only be derived for enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "ToolEnum cannot be derived for generic enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ToolEnum requires at least one variant",
        ));
    }

    let rule = parse_rename(&input.attrs, "rename_all")?
        .map(|lit| RenameRule::parse(&lit))
        .transpose()?;

    let mut idents = Vec::with_capacity(data.variants.len());
    let mut cases = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "ToolEnum variants must be unit variants",
            ));
        }
        let name = variant.ident.to_string();
        let case = match parse_rename(&variant.attrs, "rename")? {
            Some(lit) => lit.value(),
            None => rule.map_or_else(|| name.clone(), |rule| rule.apply(&name)),
        };
        if cases.contains(&case) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate ToolEnum case `{case}`"),
            ));
        }
        idents.push(&variant.ident);
        cases.push(case);
    }

    let ident = &input.ident;

    Ok(quote! {
        impl #lt::ToolEnum for #ident {
            const CASES: &'static [&'static str] = &[#(#cases),*];

            fn from_case(case: &str) -> ::core::option::Option<Self> {
                match case {
                    #(#cases => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn case_name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #cases,)*
                }
            }
        }

        impl #lt::FromArgument for #ident {
            const SCHEMA_TYPE: #lt::SchemaType = #lt::SchemaType::String;

            fn from_argument(value: #lt::TypedValue) -> ::core::option::Option<Self> {
                match value {
                    #lt::TypedValue::String(case) => <Self as #lt::ToolEnum>::from_case(&case),
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::convert::From<#ident> for #lt::TypedValue {
            fn from(value: #ident) -> Self {
                #lt::TypedValue::String(
                    ::std::string::ToString::to_string(
                        <#ident as #lt::ToolEnum>::case_name(&value),
                    ),
                )
            }
        }
    })
}
