//! Foundational types shared across the Volt HDL toolchain: the session
//! name table and its interned identifier handles.

#![warn(missing_docs)]

pub mod ident;

pub use ident::{Ident, NameTable};
