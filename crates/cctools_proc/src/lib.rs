use proc_macro::TokenStream;

mod m_ext_repr;
mod m_packed_data;

/// Implements the [`cctools_utils::packed::PackedData`] trait on a struct.
///
/// All fields must implement `PackedData`. The generated implementation reads and writes struct
/// fields in order of definition, and its `PACKED_SIZE` is the sum of the field sizes.
///
/// *(Note, tuple structs and enums are not supported)*
#[proc_macro_derive(PackedData)]
pub fn packed_data_derive(input: TokenStream) -> TokenStream {
    m_packed_data::packed_data_derive(input)
}

/// Extended `#[repr(T)]` macro. Aside from invoking normal `#[repr(T)]`, it creates the following
/// trait implementations:
///  * [`From<Self>`] for `T`, converting into the wire value
///  * [`TryFrom<T>`] for converting from the wire value to self
///  * [`From<Self>`] for `&'static str`, converting into the variant's name
///  * [`TryFrom<&str>`] for converting from the variant's name, ignoring ASCII case
///
/// **Note:** The macro assumes that `cctools_utils` is present and usable.
///
/// ## Example
/// ```
/// use cctools_proc::ext_repr;
///
/// #[ext_repr(u32)]
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Ruleset {
///     Ms = 0x0002AAAC,
///     Lynx = 0x0102AAAC,
/// }
///
/// assert_eq!(Ruleset::try_from(0x0102AAACu32), Ok(Ruleset::Lynx));
/// assert!(Ruleset::try_from(0x12345678u32).is_err());
/// let numeric: u32 = Ruleset::Ms.into();
/// assert_eq!(numeric, 0x0002AAAC);
///
/// assert_eq!(Ruleset::try_from("lynx"), Ok(Ruleset::Lynx));
/// let name: &'static str = Ruleset::Ms.into();
/// assert_eq!(name, "Ms");
/// ```
#[proc_macro_attribute]
pub fn ext_repr(input: TokenStream, source_item: TokenStream) -> TokenStream {
    m_ext_repr::ext_repr(input, source_item)
}
