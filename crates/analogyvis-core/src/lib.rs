// crates/analogyvis-core/src/lib.rs
pub mod batch;
pub mod columns;
pub mod config;
pub mod error;
pub mod reconstructor;
pub mod records;
pub mod sketches;
pub mod timing;
pub mod vark;

pub use analogyvis_parser as parser;
