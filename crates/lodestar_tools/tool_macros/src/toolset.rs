//! Code generation for `#[toolset]` on impl blocks.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{ImplItem, ImplItemFn, ItemImpl};

use crate::common::{
    ToolArgs, closure_params, generate_builder, parse_params, strip_param_attrs,
    validate_tool_signature, validate_toolset_method, wrap_output,
};
use lodestar_macro_utils::{LodestarCrate, resolve_crate_path};

/// Generates a `Toolset` impl for an impl block with `#[tool]` methods.
///
/// Each tool's handler captures an `Arc<Self>` clone, so every tool of the
/// set shares the same instance.
pub(crate) fn generate_toolset(input: &ItemImpl) -> syn::Result<TokenStream> {
    let lt = resolve_crate_path(LodestarCrate::Tools);

    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[toolset] must be applied to an inherent impl block",
        ));
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _ty_generics, where_clause) = input.generics.split_for_impl();

    let mut cleaned = input.clone();
    let mut constructors = Vec::new();

    for item in &mut cleaned.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let Some(position) = method
            .attrs
            .iter()
            .position(|attr| attr.path().is_ident("tool"))
        else {
            continue;
        };

        let args = ToolArgs::from_attr(&method.attrs[position])?;
        method.attrs.remove(position);
        validate_tool_signature(&method.sig)?;
        validate_toolset_method(&method.sig)?;

        constructors.push(generate_tool(args, method, &lt)?);
        strip_param_attrs(&mut method.sig);
    }

    Ok(quote! {
        #cleaned

        impl #impl_generics #lt::Toolset for #self_ty #where_clause {
            fn tools(
                self: ::std::sync::Arc<Self>,
            ) -> ::core::result::Result<
                ::std::vec::Vec<::std::boxed::Box<dyn #lt::Tool>>,
                #lt::RegistryError,
            > {
                ::core::result::Result::Ok(::std::vec![
                    #(::std::boxed::Box::new(#constructors) as ::std::boxed::Box<dyn #lt::Tool>),*
                ])
            }
        }
    })
}

/// Generates the expression building one method's tool.
fn generate_tool(
    args: ToolArgs,
    method: &ImplItemFn,
    lt: &TokenStream,
) -> syn::Result<TokenStream> {
    let method_name = &method.sig.ident;
    let tool_name = args
        .name
        .map_or_else(|| method_name.to_string(), |name| name.value());

    let params = parse_params(&method.sig)?;
    let builder = generate_builder(&tool_name, &method.attrs, &params, lt);

    let (typed, idents) = closure_params(&params);
    let output = wrap_output(
        quote! { __this.#method_name(#(#idents),*).await },
        &method.sig.output,
    );

    Ok(quote! {{
        let __shared = ::std::sync::Arc::clone(&self);
        #builder.handler(move |#(#typed),*| {
            let __this = ::std::sync::Arc::clone(&__shared);
            async move { #output }
        })?
    }})
}
