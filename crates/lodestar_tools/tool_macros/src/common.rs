//! Shared utilities for tool macro code generation.

use lodestar_schema::{DeclaredType, EnumTable, Enumeration, TypeMapper};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Attribute, Expr, ExprLit, FnArg, GenericArgument, Ident, Lit, LitStr, Meta, Pat, PatType,
    PathArguments, ReturnType, Signature, Type,
};

/// Validates that a function signature is suitable for `#[tool]`.
///
/// Rejects non-async, generic, unsafe, variadic and extern functions.
pub(crate) fn validate_tool_signature(sig: &Signature) -> syn::Result<()> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            sig.fn_token,
            "#[tool] requires an async function",
        ));
    }

    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new_spanned(
            unsafety,
            "#[tool] cannot be applied to unsafe functions",
        ));
    }

    if let Some(abi) = &sig.abi {
        return Err(syn::Error::new_spanned(
            abi,
            "#[tool] cannot be applied to extern functions",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[tool] does not support generic parameters",
        ));
    }

    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new_spanned(
            variadic,
            "#[tool] does not support variadic functions",
        ));
    }

    Ok(())
}

/// Validates that a standalone `#[tool]` function has no receiver.
pub(crate) fn validate_standalone_tool(sig: &Signature) -> syn::Result<()> {
    if let Some(FnArg::Receiver(receiver)) = sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            receiver,
            "#[tool] standalone functions cannot have a `self` receiver; \
             use #[toolset] on an impl block instead",
        ));
    }
    Ok(())
}

/// Validates that a `#[tool]` method inside a `#[toolset]` takes `&self`.
pub(crate) fn validate_toolset_method(sig: &Signature) -> syn::Result<()> {
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => {
            if receiver.mutability.is_some() || receiver.reference.is_none() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "#[tool] methods must take `&self`; \
                     toolsets are shared through an Arc and only hand out shared references",
                ));
            }
            Ok(())
        }
        _ => Err(syn::Error::new_spanned(
            sig.fn_token,
            "#[tool] methods in a #[toolset] must take `&self` as the first parameter",
        )),
    }
}

/// Options of the `#[tool(...)]` attribute.
#[derive(Debug, Default)]
pub(crate) struct ToolArgs {
    /// Overridden tool name from `name = "..."`.
    pub name: Option<LitStr>,
}

impl ToolArgs {
    /// Parses the contents of `#[tool(...)]`.
    pub fn parse(tokens: TokenStream) -> syn::Result<Self> {
        let mut args = Self::default();
        if tokens.is_empty() {
            return Ok(args);
        }
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("name") {
                args.name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported #[tool] option; expected `name = \"...\"`"))
            }
        });
        syn::parse::Parser::parse2(parser, tokens)?;
        Ok(args)
    }

    /// Parses the options of a `#[tool]` attribute found on a method.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            Meta::List(list) => Self::parse(list.tokens.clone()),
            Meta::NameValue(meta) => Err(syn::Error::new_spanned(
                meta,
                "expected #[tool] or #[tool(name = \"...\")]",
            )),
        }
    }
}

/// Parsed information about a single tool parameter.
#[derive(Debug, Clone)]
pub(crate) struct ParamInfo {
    /// Binding identifier.
    pub ident: Ident,
    /// Parameter name as exposed to the model.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Declared type as the schema layer parses it.
    pub declared: DeclaredType,
    /// Type to contribute to the enum catalog, for deferred enum parameters.
    pub deferred_enum: Option<(Type, String)>,
    /// Description from the parameter's own doc comment.
    pub description: Option<String>,
    /// Default value expression from `#[default(expr)]`.
    pub default_expr: Option<TokenStream>,
}

/// Returns the string values of all `#[doc]` attributes.
fn doc_values(attrs: &[Attribute]) -> impl Iterator<Item = String> + '_ {
    attrs.iter().filter_map(|attr| {
        if attr.path().is_ident("doc")
            && let Meta::NameValue(meta) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) = &meta.value
        {
            Some(lit_str.value())
        } else {
            None
        }
    })
}

/// Rebuilds the raw doc-comment text of an item, one string per region.
///
/// A region is a run of consecutive `#[doc]` attributes; other attributes
/// split regions. Multi-line values come from `/** */` blocks.
pub(crate) fn doc_regions(attrs: &[Attribute]) -> Vec<String> {
    let mut regions = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for attr in attrs {
        let value = doc_values(core::slice::from_ref(attr)).next();
        match value {
            Some(value) if value.contains('\n') => current.push(format!("/**{value}*/")),
            Some(value) => current.push(format!("///{value}")),
            None if !current.is_empty() => regions.push(core::mem::take(&mut current).join("\n")),
            None => {}
        }
    }
    if !current.is_empty() {
        regions.push(current.join("\n"));
    }
    regions
}

/// Joins a parameter's own doc comment into a single description.
fn param_description(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = doc_values(attrs)
        .flat_map(|value| {
            value
                .lines()
                .map(|line| line.trim().trim_start_matches('*').trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|line| !line.is_empty())
        .collect();
    (!lines.is_empty()).then(|| lines.join(" "))
}

/// Extracts the default value from `#[default(expr)]`.
fn extract_default_expr(attrs: &[Attribute]) -> syn::Result<Option<TokenStream>> {
    for attr in attrs {
        if attr.path().is_ident("default") {
            let expr = attr.parse_args::<Expr>().map_err(|err| {
                syn::Error::new(err.span(), "#[default(...)] requires a valid expression")
            })?;
            return Ok(Some(expr.into_token_stream()));
        }
    }
    Ok(None)
}

/// Parses a typed function parameter and checks that its type is supported.
pub(crate) fn parse_param(pat_type: &PatType) -> syn::Result<ParamInfo> {
    let Pat::Ident(pat_ident) = &*pat_type.pat else {
        return Err(syn::Error::new_spanned(
            &pat_type.pat,
            "#[tool] parameters must be plain identifiers",
        ));
    };
    let ident = pat_ident.ident.clone();
    let name = ident.unraw().to_string();

    let ty = (*pat_type.ty).clone();
    let declared = DeclaredType::parse(&ty.to_token_stream().to_string());
    let scope = EnumTable::new();
    let mapped = TypeMapper::new(&scope)
        .map(&declared)
        .map_err(|err| syn::Error::new(ty.span(), err.to_string()))?;

    let deferred_enum = match mapped.enumeration {
        Some(Enumeration::Deferred(key)) => Some((innermost_option(&ty).clone(), key)),
        _ => None,
    };

    Ok(ParamInfo {
        ident,
        name,
        ty,
        declared,
        deferred_enum,
        description: param_description(&pat_type.attrs),
        default_expr: extract_default_expr(&pat_type.attrs)?,
    })
}

/// Parses every typed parameter of a signature, skipping the receiver.
pub(crate) fn parse_params(sig: &Signature) -> syn::Result<Vec<ParamInfo>> {
    sig.inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(parse_param(pat_type)),
            FnArg::Receiver(_) => None,
        })
        .collect()
}

/// Removes the attributes `#[tool]` consumes from a signature's parameters.
pub(crate) fn strip_param_attrs(sig: &mut Signature) {
    for input in &mut sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            pat_type
                .attrs
                .retain(|attr| !attr.path().is_ident("doc") && !attr.path().is_ident("default"));
        }
    }
}

/// Strips every `Option<...>` layer from a type.
fn innermost_option(ty: &Type) -> &Type {
    let mut ty = ty;
    while let Some(inner) = unwrap_option_inner(ty) {
        ty = inner;
    }
    ty
}

/// Extracts `T` from `Option<T>`, returning `None` if the type is not `Option`.
fn unwrap_option_inner(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Option"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && args.args.len() == 1
        && let GenericArgument::Type(inner) = &args.args[0]
    {
        Some(inner)
    } else {
        None
    }
}

/// Checks if a return type is `Result<T, E>`.
pub(crate) fn is_result_type(return_type: &ReturnType) -> bool {
    if let ReturnType::Type(_, ty) = return_type
        && let Type::Path(type_path) = ty.as_ref()
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == "Result";
    }
    false
}

/// Generates the `ToolBuilder` chain that declares a tool, without the
/// final `.handler(...)` call.
pub(crate) fn generate_builder(
    tool_name: &str,
    attrs: &[Attribute],
    params: &[ParamInfo],
    lt: &TokenStream,
) -> TokenStream {
    let docs = doc_regions(attrs);

    let declarations = params.iter().map(|param| {
        let name = &param.name;
        let ty_text = param.declared.to_string();
        let ty = &param.ty;

        let describe = param
            .description
            .as_ref()
            .map(|description| quote! { .describe(#name, #description) });

        let default = param.default_expr.as_ref().map(|expr| {
            quote! {
                .default_value(#name, {
                    let __default: #ty = #expr;
                    __default
                })
            }
        });

        let enum_type = param
            .deferred_enum
            .as_ref()
            .map(|(inner, key)| quote! { .enum_type::<#inner>(#key) });

        quote! {
            .param(#name, #ty_text)
            #describe
            #default
            #enum_type
        }
    });

    quote! {
        #lt::ToolBuilder::new(#tool_name)
            #(.doc(#docs))*
            #(#declarations)*
    }
}

/// Generates the closure parameter list `a: A, b: B` and the call arguments `a, b`.
pub(crate) fn closure_params(params: &[ParamInfo]) -> (Vec<TokenStream>, Vec<&Ident>) {
    let typed = params
        .iter()
        .map(|param| {
            let ident = &param.ident;
            let ty = &param.ty;
            quote! { #ident: #ty }
        })
        .collect();
    let idents = params.iter().map(|param| &param.ident).collect();
    (typed, idents)
}

/// Wraps an awaited call so it always yields a `Result`.
pub(crate) fn wrap_output(call: TokenStream, return_type: &ReturnType) -> TokenStream {
    if is_result_type(return_type) {
        call
    } else {
        quote! { ::core::result::Result::<_, ::core::convert::Infallible>::Ok(#call) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn doc_regions_rebuild_line_and_block_comments() {
        let item: syn::ItemFn = parse_quote! {
            /// Get forecast
            #[inline]
            /** - Parameter city: City name
             */
            async fn forecast(city: String) {}
        };
        let regions = doc_regions(&item.attrs);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], "/// Get forecast");
        assert!(regions[1].starts_with("/**"));
        assert!(regions[1].ends_with("*/"));
    }

    #[test]
    fn unsupported_param_type_is_an_error() {
        let pat: PatType = parse_quote!(names: Vec<String>);
        let err = parse_param(&pat).unwrap_err();
        assert!(err.to_string().contains("Vec<String>"), "got: {err}");
    }

    #[test]
    fn deferred_enum_uses_inner_type() {
        let pat: PatType = parse_quote!(units: Option<Units>);
        let param = parse_param(&pat).unwrap();
        let (inner, key) = param.deferred_enum.unwrap();
        assert_eq!(key, "Units");
        assert_eq!(inner.to_token_stream().to_string(), "Units");
        assert_eq!(param.declared.to_string(), "Option<Units>");
    }

    #[test]
    fn raw_identifiers_are_unraw() {
        let pat: PatType = parse_quote!(r#type: String);
        assert_eq!(parse_param(&pat).unwrap().name, "type");
    }
}
