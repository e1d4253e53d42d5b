use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, Ident, ItemEnum, Type};

pub fn ext_repr(input: TokenStream, source_item: TokenStream) -> TokenStream {
    let source_item_ts2 = TokenStream2::from(source_item.clone());
    let item = parse_macro_input!(source_item as ItemEnum);
    let enum_name = item.ident;
    let target_type = parse_macro_input!(input as Type);

    // Variant values are taken from casts, so discriminants can be any constant expression
    let value_ident = |variant: &Ident| {
        Ident::new(
            &format!("{}_VALUE", variant.to_string().to_uppercase()),
            Span::call_site(),
        )
    };

    let try_from_t = {
        let const_decls = item.variants.iter().map(|variant| {
            let const_name = value_ident(&variant.ident);
            let name = &variant.ident;
            quote! {
                const #const_name: #target_type = #enum_name::#name as #target_type;
            }
        });

        let match_arms = item.variants.iter().map(|variant| {
            let const_name = value_ident(&variant.ident);
            let name = &variant.ident;
            quote! {
                #const_name => Ok(#enum_name::#name),
            }
        });

        quote! {
            impl TryFrom<#target_type> for #enum_name {
                type Error = ::cctools_utils::EnumParseError;

                #[allow(non_upper_case_globals)]
                fn try_from(value: #target_type) -> Result<Self, ::cctools_utils::EnumParseError> {
                    #(#const_decls)*
                    match value {
                        #(#match_arms)*
                        _ => Err(::cctools_utils::EnumParseError),
                    }
                }
            }
        }
    };

    let into_t = quote! {
        impl From<#enum_name> for #target_type {
            fn from(value: #enum_name) -> #target_type {
                value as #target_type
            }
        }
    };

    let try_from_str = {
        let conditionals = item.variants.iter().map(|variant| {
            let ident = &variant.ident;
            quote! {
                if value.eq_ignore_ascii_case(stringify!(#ident)) {
                    return Ok(Self::#ident);
                }
            }
        });

        quote! {
            impl<'a> TryFrom<&'a str> for #enum_name {
                type Error = ::cctools_utils::EnumParseError;

                fn try_from(value: &'a str) -> Result<Self, ::cctools_utils::EnumParseError> {
                    #(#conditionals)*
                    Err(::cctools_utils::EnumParseError)
                }
            }
        }
    };

    let into_str = {
        let match_arms = item.variants.iter().map(|variant| {
            let ident = &variant.ident;
            quote! {
                #enum_name::#ident => stringify!(#ident),
            }
        });

        quote! {
            impl From<#enum_name> for &'static str {
                fn from(value: #enum_name) -> &'static str {
                    match value {
                        #(#match_arms)*
                    }
                }
            }
        }
    };

    quote! {
        #[repr(#target_type)]
        #source_item_ts2

        #try_from_t
        #into_t

        #try_from_str
        #into_str
    }
    .into()
}
