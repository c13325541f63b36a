extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Fields, Item, ItemStruct, Visibility};

/// Name of the injected storage member. A user-declared field with this name
/// is always skipped by extraction so the rewritten struct ends up with
/// exactly one storage member.
const STORAGE_MEMBER: &str = "_storage";

/// Rewrites a struct so that every declared field is backed by a single
/// shared `StorageMap` member instead of its own slot.
///
/// For each field the macro synthesizes a getter/setter pair redirecting to
/// the map, a `new` constructor whose parameters mirror the fields in
/// declaration order, and an implementation of `dictbacked::DictBacked`
/// providing the `to_json` dump.
#[proc_macro_attribute]
pub fn dict_backed(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as Item);

    match expand(item) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// One extracted stored field, in declaration order.
struct FieldSpec {
    ident: syn::Ident,
    vis: Visibility,
    ty: syn::Type,
}

/// Enumerate the stored fields that syntactically occur in this declaration.
///
/// This pass is best-effort on field shape: the reserved storage member name
/// is silently skipped rather than reported. A declaration of the wrong kind
/// (tuple struct) is a hard error instead.
fn stored_fields(item: &ItemStruct) -> syn::Result<Vec<FieldSpec>> {
    let named = match &item.fields {
        Fields::Named(named) => &named.named,
        // A unit struct simply has zero stored fields.
        Fields::Unit => return Ok(Vec::new()),
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "#[dict_backed] requires named fields; tuple structs are not supported",
            ))
        }
    };

    Ok(named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.clone()?;
            if ident == STORAGE_MEMBER {
                return None;
            }
            Some(FieldSpec {
                ident,
                vis: field.vis.clone(),
                ty: field.ty.clone(),
            })
        })
        .collect())
}

/// Pure expansion from the annotated item to the rewritten declaration.
fn expand(item: Item) -> syn::Result<TokenStream2> {
    let item = match item {
        Item::Struct(item) => item,
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "#[dict_backed] may only be used on structs",
            ))
        }
    };

    if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[dict_backed] does not support generic structs",
        ));
    }

    let fields = stored_fields(&item)?;

    let attrs = &item.attrs;
    let vis = &item.vis;
    let name = &item.ident;

    let accessors = fields.iter().map(|field| {
        let FieldSpec { ident, vis, ty } = field;
        let key = ident.to_string();
        let setter = format_ident!("set_{}", ident);
        quote! {
            #vis fn #ident(&self) -> #ty {
                let value = self._storage.get(#key).unwrap_or_else(|| {
                    panic!("dictionary-backed field `{}` missing from storage", #key)
                });
                ::dictbacked::FromValue::from_value(value).unwrap_or_else(|error| {
                    panic!("dictionary-backed field `{}`: {}", #key, error)
                })
            }

            #vis fn #setter(&mut self, value: #ty) {
                self._storage
                    .insert(#key.to_string(), ::dictbacked::ToValue::to_value(&value));
            }
        }
    });

    let params = fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        quote!(#ident: #ty)
    });

    let inserts = fields.iter().map(|field| {
        let ident = &field.ident;
        let key = ident.to_string();
        quote! {
            _storage.insert(#key.to_string(), ::dictbacked::ToValue::to_value(&#ident));
        }
    });

    Ok(quote! {
        #(#attrs)*
        #vis struct #name {
            _storage: ::dictbacked::StorageMap,
        }

        impl #name {
            #vis fn new(#(#params),*) -> Self {
                #[allow(unused_mut)]
                let mut _storage = ::dictbacked::StorageMap::new();
                #(#inserts)*
                Self { _storage }
            }

            #(#accessors)*
        }

        impl ::dictbacked::DictBacked for #name {
            fn storage(&self) -> &::dictbacked::StorageMap {
                &self._storage
            }
        }
    })
}

#[cfg(test)]
fn expand_ok(item: Item) -> syn::File {
    let tokens = expand(item).unwrap();
    syn::parse2(tokens).unwrap()
}

#[test]
fn test_stored_fields_in_declaration_order() {
    let item: ItemStruct = syn::parse_quote! {
        struct MyStruct {
            x: i64,
            y: bool,
            z: String,
        }
    };

    let fields = stored_fields(&item).unwrap();

    let names: Vec<String> = fields.iter().map(|f| f.ident.to_string()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);

    let types: Vec<String> = fields
        .iter()
        .map(|f| {
            let ty = &f.ty;
            quote!(#ty).to_string()
        })
        .collect();
    assert_eq!(types, vec!["i64", "bool", "String"]);
}

#[test]
fn test_stored_fields_skips_reserved_storage_member() {
    let item: ItemStruct = syn::parse_quote! {
        struct MyStruct {
            a: i64,
            _storage: ::dictbacked::StorageMap,
            b: String,
        }
    };

    let fields = stored_fields(&item).unwrap();
    let names: Vec<String> = fields.iter().map(|f| f.ident.to_string()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_stored_fields_unit_struct_is_empty() {
    let item: ItemStruct = syn::parse_quote! {
        struct Nothing;
    };
    assert!(stored_fields(&item).unwrap().is_empty());
}

#[test]
fn test_expand_emits_struct_inherent_impl_and_conformance() {
    let file = expand_ok(syn::parse_quote! {
        struct MyStruct {
            x: i64,
            y: bool,
        }
    });

    assert_eq!(file.items.len(), 3);

    let rewritten = match &file.items[0] {
        Item::Struct(s) => s,
        _ => panic!("expected rewritten struct first"),
    };
    let member_names: Vec<String> = rewritten
        .fields
        .iter()
        .filter_map(|f| f.ident.as_ref().map(|i| i.to_string()))
        .collect();
    assert_eq!(member_names, vec!["_storage"]);

    let inherent = match &file.items[1] {
        Item::Impl(i) => i,
        _ => panic!("expected inherent impl second"),
    };
    let method_names: Vec<String> = inherent
        .items
        .iter()
        .filter_map(|item| match item {
            syn::ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(method_names, vec!["new", "x", "set_x", "y", "set_y"]);

    let conformance = match &file.items[2] {
        Item::Impl(i) => i,
        _ => panic!("expected trait impl third"),
    };
    let (_, trait_path, _) = conformance.trait_.as_ref().unwrap();
    assert_eq!(
        quote!(#trait_path).to_string(),
        ":: dictbacked :: DictBacked"
    );
}

#[test]
fn test_expand_constructor_parameters_mirror_fields() {
    let file = expand_ok(syn::parse_quote! {
        pub struct Point {
            pub x: i64,
            pub y: i64,
        }
    });

    let inherent = match &file.items[1] {
        Item::Impl(i) => i,
        _ => panic!("expected inherent impl"),
    };
    let new = inherent
        .items
        .iter()
        .find_map(|item| match item {
            syn::ImplItem::Fn(f) if f.sig.ident == "new" => Some(f),
            _ => None,
        })
        .unwrap();

    let rendered: Vec<String> = new
        .sig
        .inputs
        .iter()
        .map(|arg| quote!(#arg).to_string())
        .collect();
    assert_eq!(rendered, vec!["x : i64", "y : i64"]);
}

#[test]
fn test_expand_empty_struct_yields_zero_parameter_constructor() {
    let file = expand_ok(syn::parse_quote! {
        struct Nothing {}
    });

    let inherent = match &file.items[1] {
        Item::Impl(i) => i,
        _ => panic!("expected inherent impl"),
    };
    let new = inherent
        .items
        .iter()
        .find_map(|item| match item {
            syn::ImplItem::Fn(f) if f.sig.ident == "new" => Some(f),
            _ => None,
        })
        .unwrap();
    assert!(new.sig.inputs.is_empty());
}

#[test]
fn test_expand_rejects_non_struct_declarations() {
    let error = expand(syn::parse_quote! {
        enum NotAStruct {
            A,
            B,
        }
    })
    .unwrap_err();
    assert_eq!(
        error.to_string(),
        "#[dict_backed] may only be used on structs"
    );
}

#[test]
fn test_expand_rejects_tuple_structs() {
    let error = expand(syn::parse_quote! {
        struct Pair(i64, i64);
    })
    .unwrap_err();
    assert!(error.to_string().contains("tuple structs are not supported"));
}

#[test]
fn test_expand_rejects_generic_structs() {
    let error = expand(syn::parse_quote! {
        struct Wrapper<T> {
            inner: T,
        }
    })
    .unwrap_err();
    assert_eq!(
        error.to_string(),
        "#[dict_backed] does not support generic structs"
    );
}
