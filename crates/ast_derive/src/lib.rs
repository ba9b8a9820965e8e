//! `#[derive(WalkAst)]` for the `goast_syntax` arena AST.
//!
//! The generated `Walk` impl visits every field in declaration order. Two
//! attributes tune the output:
//!
//! - `#[walk(skip)]` on a field (or variant field) leaves it out of the walk;
//! - `#[walk(hook = visit_block)]` on a type routes `Walk::walk` through the named
//!   `Visitor` method and emits an inherent `walk_children` holding the field walk,
//!   which the hook's default body calls.

use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Fields, Index};

#[proc_macro_derive(WalkAst, attributes(walk))]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let hook = match type_hook(&input.attrs) {
        Ok(hook) => hook,
        Err(err) => return err.into_compile_error().into(),
    };

    let walk_body = match generate_walk_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = match hook {
        None => quote_spanned! {span =>
            impl<'ast> crate::walk::Walk<'ast> for #name {
                #[inline(always)]
                fn walk<V: crate::walk::Visitor<'ast> + ?Sized>(
                    &self,
                    a: &'ast crate::ast::AstArena,
                    v: &mut V
                ) {
                    #walk_body
                }
            }
        },
        Some(hook) => quote_spanned! {span =>
            impl<'ast> crate::walk::Walk<'ast> for #name {
                #[inline(always)]
                fn walk<V: crate::walk::Visitor<'ast> + ?Sized>(
                    &self,
                    a: &'ast crate::ast::AstArena,
                    v: &mut V
                ) {
                    v.#hook(a, self);
                }
            }

            impl #name {
                /// Walks the children of this node without invoking its own hook.
                #[inline(always)]
                #[allow(unused_variables)]
                pub fn walk_children<'ast, V: crate::walk::Visitor<'ast> + ?Sized>(
                    &self,
                    a: &'ast crate::ast::AstArena,
                    v: &mut V
                ) {
                    #walk_body
                }
            }
        },
    };

    expanded.into()
}

fn type_hook(attrs: &[Attribute]) -> syn::Result<Option<syn::Ident>> {
    let mut hook = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("walk")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("hook") {
                hook = Some(meta.value()?.parse::<syn::Ident>()?);
                Ok(())
            } else {
                Err(meta.error("expected `hook = visit_method` on a type"))
            }
        })?;
    }
    Ok(hook)
}

fn is_skipped(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("walk")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip` on a field"))
            }
        })?;
    }
    Ok(skip)
}

fn generate_walk_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => generate_fields_walk(&data_struct.fields),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields))
                .collect::<syn::Result<Vec<_>>>()?;

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "WalkAst cannot be derived for unions",
        )),
    }
}

fn generate_fields_walk(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut walk_calls = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if is_skipped(&field.attrs)? {
            continue;
        }
        let field_access = match &field.ident {
            Some(ident) => quote! { &self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &self.#index }
            }
        };
        walk_calls.push(quote! { crate::walk::Walk::walk(#field_access, a, v); });
    }

    Ok(quote! { #(#walk_calls)* })
}

fn generate_variant_arm(
    variant_name: &syn::Ident,
    fields: &Fields,
) -> syn::Result<proc_macro2::TokenStream> {
    match fields {
        Fields::Unit => Ok(quote! { Self::#variant_name => {} }),
        Fields::Named(fields_named) => {
            let mut bindings = Vec::new();
            for f in &fields_named.named {
                if is_skipped(&f.attrs)? {
                    continue;
                }
                if let Some(ident) = &f.ident {
                    bindings.push(ident.clone());
                }
            }

            let walk_calls = bindings.iter().map(|name| {
                quote! { crate::walk::Walk::walk(#name, a, v); }
            });

            Ok(quote! {
                Self::#variant_name { #(#bindings,)* .. } => {
                    #(#walk_calls)*
                }
            })
        }
        Fields::Unnamed(fields_unnamed) => {
            let mut patterns = Vec::new();
            let mut walk_calls = Vec::new();
            for (i, f) in fields_unnamed.unnamed.iter().enumerate() {
                if is_skipped(&f.attrs)? {
                    patterns.push(quote! { _ });
                    continue;
                }
                let var = format_ident!("f{}", i);
                walk_calls.push(quote! { crate::walk::Walk::walk(#var, a, v); });
                patterns.push(quote! { #var });
            }

            Ok(quote! {
                Self::#variant_name(#(#patterns),*) => {
                    #(#walk_calls)*
                }
            })
        }
    }
}
