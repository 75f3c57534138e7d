//! FFI bridge crate exposing the pet tracker core to the mobile UI.

pub mod api;
