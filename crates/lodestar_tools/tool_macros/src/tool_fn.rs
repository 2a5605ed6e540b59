//! Code generation for `#[tool]` on standalone async functions.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemFn;

use crate::common::{
    ToolArgs, closure_params, generate_builder, is_result_type, parse_params, strip_param_attrs,
    validate_standalone_tool, validate_tool_signature, wrap_output,
};
use lodestar_macro_utils::{LodestarCrate, resolve_crate_path};

/// Generates the tool constructor for a standalone `#[tool]` async function.
///
/// The macro consumes the original function and generates:
/// - A private `__tool_impl_<name>` async function with the original body
/// - A constructor `fn <name>() -> Result<FunctionTool, RegistryError>`
pub(crate) fn generate_tool_fn(args: ToolArgs, input: &ItemFn) -> syn::Result<TokenStream> {
    validate_tool_signature(&input.sig)?;
    validate_standalone_tool(&input.sig)?;

    let lt = resolve_crate_path(LodestarCrate::Tools);

    let fn_name = &input.sig.ident;
    let tool_name = args
        .name
        .map_or_else(|| fn_name.to_string(), |name| name.value());
    let impl_fn_name = format_ident!("__tool_impl_{}", fn_name);

    let params = parse_params(&input.sig)?;
    let builder = generate_builder(&tool_name, &input.attrs, &params, &lt);

    let handler = if is_result_type(&input.sig.output) {
        quote! { #impl_fn_name }
    } else {
        let (typed, idents) = closure_params(&params);
        let output = wrap_output(quote! { #impl_fn_name(#(#idents),*).await }, &input.sig.output);
        quote! { |#(#typed),*| async move { #output } }
    };

    let mut impl_fn = input.clone();
    impl_fn.sig.ident = impl_fn_name;
    impl_fn.vis = syn::Visibility::Inherited;
    impl_fn.attrs.retain(|attr| !attr.path().is_ident("doc"));
    strip_param_attrs(&mut impl_fn.sig);

    let vis = &input.vis;
    let constructor_doc = format!(" Builds the `{tool_name}` tool.");

    Ok(quote! {
        #impl_fn

        #[doc = #constructor_doc]
        #vis fn #fn_name() -> ::core::result::Result<#lt::FunctionTool, #lt::RegistryError> {
            #builder.handler(#handler)
        }
    })
}
