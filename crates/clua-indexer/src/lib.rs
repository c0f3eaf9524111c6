//! Filesystem discovery and structured document loading
//!
//! [`paths`] walks directories and filters path collections; [`config`]
//! turns the YAML files it finds into [`clua_core::Document`]s.

pub mod paths;
pub mod config;


pub use paths::{
    is_valid_file, is_valid_dir, enumerate, find_by_name, find_by_extension,
    find_by_extensions, find_by_name_anywhere, organize_source_paths,
};
pub use config::yaml::{load_document, parse_document, load_many_by_name, load_unique_from_tree};
