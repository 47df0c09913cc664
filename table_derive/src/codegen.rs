//! Code generation for `#[model]`
//!
//! Generated code refers to `model_object::...`; user crates bring that path
//! into scope through `rowhaus::prelude::*`.

use crate::parsing::{FieldInfo, TableInfo};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Expr, ExprLit, Ident, Lit};

/// `Model` impl: the wrapper struct is a thin typed view over one `Record`
pub fn generate_model_impl(name: &Ident) -> TokenStream {
    quote! {
        impl model_object::Model for #name {
            fn from_record(record: model_object::Record) -> Self {
                Self { record }
            }

            fn record(&self) -> &model_object::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut model_object::Record {
                &mut self.record
            }
        }
    }
}

/// `DeclaredModel` impl listing the fields in declaration order
pub fn generate_declared_model_impl(
    name: &Ident,
    table_info: &TableInfo,
    fields: &[FieldInfo],
) -> TokenStream {
    let table_name = &table_info.name;

    let field_specs = fields.iter().map(|field| {
        let column = &field.name;
        let ty = &field.ty;
        let nullable = field.nullable;
        let indexed = field.indexed;
        let unique = field.unique;
        let primary_key = field.primary_key;

        // String literals may stand in for owned strings; anything else must
        // already have the field's type
        let default = match &field.default {
            Some(expr @ Expr::Lit(ExprLit { lit: Lit::Str(_), .. })) if field.optional => {
                quote! {{ let value: #ty = ::core::option::Option::Some(::core::convert::Into::into(#expr)); value }}
            }
            Some(expr @ Expr::Lit(ExprLit { lit: Lit::Str(_), .. })) => {
                quote! {{ let value: #ty = ::core::convert::Into::into(#expr); value }}
            }
            Some(expr) => quote! {{ let value: #ty = #expr; value }},
            None => quote! { <#ty as ::core::default::Default>::default() },
        };
        let default_of = if field.optional {
            quote! { default_of }
        } else {
            quote! { required_default_of }
        };

        quote! {
            .field(
                model_object::FieldSpec::new(#column)
                    .#default_of::<#ty>(#default)
                    .nullable(#nullable)
                    .indexed(#indexed)
                    .unique(#unique)
                    .primary_key(#primary_key)
            )
        }
    });

    let options = table_info.options.iter().map(|(key, value)| {
        quote! { .option(#key, #value) }
    });

    quote! {
        impl model_object::DeclaredModel for #name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn declare(builder: model_object::SchemaBuilder) -> model_object::SchemaBuilder {
                builder
                    #(#field_specs)*
                    #(#options)*
            }
        }
    }
}

/// Typed getter and setter per field
pub fn generate_accessors(name: &Ident, fields: &[FieldInfo]) -> TokenStream {
    let accessors = fields.iter().map(|field| {
        let getter = &field.ident;
        let setter = format_ident!("set_{}", field.name);
        let column = &field.name;
        let vis = &field.vis;
        let ty = &field.ty;

        let getter_doc = format!("Current value of `{}`", column);
        let setter_doc = format!(
            "Write `{}` and mark it dirty; fails if the value cannot be stored",
            column
        );
        let stored = if field.optional {
            quote! { model_object::to_field_value(value)? }
        } else {
            quote! { model_object::to_required_field_value(#column, value)? }
        };

        quote! {
            #[doc = #getter_doc]
            #vis fn #getter(&self) -> ::core::result::Result<#ty, model_object::OrmError> {
                self.record.get_as::<#ty>(#column)
            }

            #[doc = #setter_doc]
            #vis fn #setter(
                &mut self,
                value: #ty,
            ) -> ::core::result::Result<&mut Self, model_object::OrmError> {
                let stored = #stored;
                self.record.state_mut().set(#column, stored);
                ::core::result::Result::Ok(self)
            }
        }
    });

    quote! {
        impl #name {
            #(#accessors)*
        }
    }
}
