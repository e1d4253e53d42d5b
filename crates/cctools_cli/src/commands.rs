pub mod build;
pub mod check;
pub mod dac;
pub mod info;
pub mod maps;
pub mod merge;
pub mod renumber;
pub mod script;
