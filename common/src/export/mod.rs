//! Export core modules shared by the CLI wrappers.

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
