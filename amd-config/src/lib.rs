//! Static discovery of AMD module-loader configuration.
//!
//! Finds the `baseUrl`/`baseDir`, `paths`, and `packages` settings that
//! govern how unqualified module references in a JavaScript or HTML file
//! resolve, without executing any code: candidate HTML files are searched
//! from the file's directory upward, their script tags are analyzed under a
//! set of well-known loader idioms, and configuration object literals are
//! recovered through restricted static evaluation.

pub mod ast;
pub mod config;
pub mod discover;
pub mod eval;
pub mod fs;
pub mod html;
pub mod locate;
pub mod matcher;
pub mod path;

pub use config::AmdConfig;
pub use config::ConfigMap;
pub use config::ConfigValue;
pub use discover::discover_config;
pub use discover::ConfigFinder;
pub use fs::FileSystem;
pub use fs::LocalFs;
