// Procedural macros for requiring

use proc_macro::TokenStream;
use proc_macro2::Literal;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Field, Index, Member};

/// Derive macro for the `Record` trait
///
/// Lists every field with its offset and type, and relocates fields by
/// index path. Fields marked `#[record(flatten)]` must be records themselves;
/// their fields are promoted into this record.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Record)]
/// pub struct Customer {
///     pub name: String,
///     #[record(flatten)]
///     pub address: Address,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_record(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Record cannot be derived for structs with lifetime parameters",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record can only be derived for structs",
            ))
        }
    };

    // Record requires Default + Any, so type parameters must be 'static and
    // the struct itself Default; flattened fields must be records.
    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    {
        let where_clause = generics.make_where_clause();
        for param in &type_params {
            where_clause.predicates.push(parse_quote!(#param: 'static));
        }
        where_clause
            .predicates
            .push(parse_quote!(Self: ::core::default::Default));
        for field in fields.iter() {
            if is_flattened(field)? {
                let ty = &field.ty;
                where_clause
                    .predicates
                    .push(parse_quote!(#ty: ::requiring::Record));
            }
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut descriptors = Vec::new();
    let mut arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let member = field_member(field, index);
        let label = field_label(field, index);
        let position = Literal::usize_unsuffixed(index);
        let ty = &field.ty;

        descriptors.push(quote! {
            fields.push(::requiring::FieldDescriptor::of::<#ty>(
                #label,
                #position,
                ::core::mem::offset_of!(#name #ty_generics, #member),
            ));
        });
        arms.push(quote! {
            [#position] => ::core::option::Option::Some(&self.#member as &dyn ::core::any::Any),
        });

        if is_flattened(field)? {
            descriptors.push(quote! {
                fields.extend(
                    <#ty as ::requiring::Record>::visible_fields()
                        .into_iter()
                        .map(|inner| inner.promoted(
                            #label,
                            #position,
                            ::core::mem::offset_of!(#name #ty_generics, #member),
                        )),
                );
            });
            arms.push(quote! {
                [#position, rest @ ..] => ::requiring::Record::field_at(&self.#member, rest),
            });
        }
    }

    let expanded = quote! {
        impl #impl_generics ::requiring::Record for #name #ty_generics #where_clause {
            #[allow(unused_mut)]
            fn visible_fields() -> ::std::vec::Vec<::requiring::FieldDescriptor> {
                let mut fields = ::std::vec::Vec::new();
                #(#descriptors)*
                fields
            }

            fn field_at(&self, path: &[usize]) -> ::core::option::Option<&dyn ::core::any::Any> {
                match path {
                    [] => ::core::option::Option::Some(self as &dyn ::core::any::Any),
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// `self.name` for named fields, `self.0` for tuple fields
fn field_member(field: &Field, index: usize) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    }
}

fn field_label(field: &Field, index: usize) -> String {
    match &field.ident {
        Some(ident) => ident.unraw().to_string(),
        None => index.to_string(),
    }
}

/// Check for #[record(flatten)]
fn is_flattened(field: &Field) -> syn::Result<bool> {
    let mut flatten = false;
    for attr in &field.attrs {
        if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("flatten") {
                    flatten = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported record attribute, expected `flatten`"))
                }
            })?;
        }
    }
    Ok(flatten)
}
