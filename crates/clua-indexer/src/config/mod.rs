//! Structured document loaders

pub mod yaml;
