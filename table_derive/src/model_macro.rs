use crate::codegen::{generate_accessors, generate_declared_model_impl, generate_model_impl};
use crate::parsing::{parse_field_attributes, parse_table_attributes};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Error};

/// Expand `#[model]` into a record-backed wrapper struct.
///
/// The declared fields become the model's schema; the struct itself keeps
/// only a `model_object::Record`, so every read and write goes through the
/// record's state and dirty tracking.
pub fn model_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    match expand(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "model structs cannot be generic",
        ));
    }

    // Parse table attributes - handle errors properly
    let table_info = parse_table_attributes(&input.attrs, name)?;

    // Parse field attributes - handle errors properly
    let fields = parse_field_attributes(&input.data)?;

    // Keep doc comments and other attributes, drop the ones consumed here
    let attrs = input
        .attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("table"));

    let model_impl = generate_model_impl(name);
    let declared_model_impl = generate_declared_model_impl(name, &table_info, &fields);
    let accessors = generate_accessors(name, &fields);

    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #name {
            record: model_object::Record,
        }

        #model_impl
        #declared_model_impl
        #accessors
    })
}
