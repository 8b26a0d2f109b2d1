//! Generate the `tsconfig.json` that a SvelteKit project's own tsconfig
//! extends, and check that it actually does.
//!
//! The generated file lives in the build output directory (`outDir`,
//! `.svelte-kit` by default) and carries everything derived from the project
//! configuration:
//!
//! - `compilerOptions.paths` for `$lib` and every configured alias whose
//!   target directory exists
//! - `include` globs for `.js`, `.ts` and `.svelte` sources next to the
//!   routes and lib directories
//! - the compiler options the framework cannot work without
//!
//! The file is only rewritten when its contents change, so running the
//! generator on every build does not invalidate watchers or caches.
//!
//! Validation of the user's `tsconfig.json` (or `jsconfig.json`) is
//! best-effort. These files are hand-written and usually contain comments,
//! so they are read as [JSON5]. Two mistakes are reported as [`Warning`]s:
//!
//! - the file does not `extends` the generated configuration
//! - the file overrides `compilerOptions.paths` and loses the `$lib` aliases
//!   in the process
//!
//! [JSON5]: https://json5.org

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod tsconfig;
pub mod validate;

pub use config::{KitConfig, ValidatedConfig};
pub use error::Error;
pub use tsconfig::{write_tsconfig, Outcome};
pub use validate::Warning;
