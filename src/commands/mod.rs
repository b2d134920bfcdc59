//! Command implementations
//!
//! The uploader has a single command; the binary in `main.rs` is a thin
//! wrapper around [`upload::run`].

pub mod upload;

pub use upload::run as upload_run;
