//! Clua Loader: builds a [`clua_core::Session`] from the compiler data
//! directory and a project directory

pub mod settings;
pub mod loader;

#[cfg(test)]
mod tests;

pub use settings::{LoaderSettings, SettingsError, COMPILER_DIR_ENV, bundled_data_dir};
pub use loader::{Loader, LoadError, EXIT_LOAD_FAILURE};
