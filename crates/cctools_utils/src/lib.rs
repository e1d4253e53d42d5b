//! Various utilities shared by the CCTools crates

pub mod latin1;
pub mod packed;

mod ascii_display;
pub use ascii_display::*;

mod result_ext;
pub use result_ext::AnyhowResultExt;

mod sized_writer;
pub use sized_writer::SizedWriter;

pub type AnyResult<T = (), E = anyhow::Error> = anyhow::Result<T, E>;

/// Shorthand for `Ok(())`, cause it looks ugly
pub const fn ok<E>() -> Result<(), E> {
    Ok(())
}

/// Used by the [`cctools_proc::ext_repr`] proc macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid enum value")]
pub struct EnumParseError;
