//! The compiled netlist data model: module descriptors, connections, the
//! insertion-ordered module registry, and the static capacity limits.
//!
//! A [`ModuleDesc`] is the post-compilation representation of one module: its
//! parts, one flat connection list per part (one entry per input bit), the
//! producer of every module output bit, and the precomputed sink counts used
//! to pre-size simulator arenas.

#![warn(missing_docs)]

pub mod descriptor;
pub mod ids;
pub mod limits;
pub mod registry;

pub use descriptor::{Connection, ModuleDesc, OutputSource, Part, Primitive};
pub use ids::DescId;
pub use registry::ModuleRegistry;
