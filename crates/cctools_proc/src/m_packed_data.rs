use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

pub fn packed_data_derive(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as DeriveInput);
    let name = parsed.ident;

    let fields = match parsed.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => panic!("PackedData can only be derived for structs with named fields"),
        },
        _ => panic!("PackedData can only be derived for structs"),
    };

    let mut initializers = TokenStream2::new();
    let mut writers = TokenStream2::new();
    let mut size = quote! { 0 };

    for field in fields {
        let field_name = field.ident.expect("expected valid field name");
        let field_ty = field.ty;

        initializers.extend(quote! {
            #field_name: <#field_ty as ::cctools_utils::packed::PackedData>::read_packed(r)?,
        });

        writers.extend(quote! {
            ::cctools_utils::packed::PackedData::write_packed(&self.#field_name, w)?;
        });

        size.extend(quote! {
            + <#field_ty as ::cctools_utils::packed::PackedData>::PACKED_SIZE
        });
    }

    quote! {
        impl ::cctools_utils::packed::PackedData for #name {
            const PACKED_SIZE: usize = #size;

            fn read_packed<R: ::std::io::Read>(
                r: &mut R,
            ) -> ::cctools_utils::AnyResult<Self> {
                Ok(Self {
                    #initializers
                })
            }

            fn write_packed<W: ::std::io::Write>(
                &self,
                w: &mut W,
            ) -> ::cctools_utils::AnyResult {
                #writers
                Ok(())
            }
        }
    }
    .into()
}
