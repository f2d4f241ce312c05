//! Backend-facing seams: capability validation and the emission contract.

pub mod emit;
pub mod validate;

pub use weft_plugin::Backend;
