//! cdoc: documentation tooling for a C extension module.
//!
//! Two pipelines share this library:
//!
//! - **extract**: scan `/** ... */` comments in C sources and write
//!   reStructuredText (`cdoc-extract src/connection.c doc/connection.rst`)
//! - **compile**: read that reStructuredText back and emit `#define` docstring
//!   constants for the extension to compile in
//!   (`cdoc-docstrings src/docstrings.h doc/*.rst`)

pub mod catalog;
pub mod compile;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
