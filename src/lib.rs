//! beamfile: a decoder for compiled BEAM bytecode modules.
//!
//! The crate provides:
//! - The container decoder (`beam`)
//! - File-oriented helpers, including gzip-compressed modules (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! let bytes = std::fs::read("hello.beam").unwrap();
//! let module = beamfile::beam::decode(&bytes).unwrap();
//! println!("{:?} has {} functions", module.module_name(), module.function_count);
//! ```

pub mod beam;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;
