//! Startup loading of compiler data and project data
//!
//! The compiler phase scans the compiler data directory for whitelisted
//! documents and loads the canonical data files. The project phase walks the
//! project directory, orders its source files and collects per-directory
//! configuration. Both must succeed for a [`Session`] to exist.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clua_core::{
    CompilerCache, Document, LoadOutcome, ProjectCache, Session, TOKEN_TABLE, insert_once,
};
use clua_indexer::{
    enumerate, find_by_extensions, is_valid_dir, load_many_by_name, load_unique_from_tree,
    organize_source_paths,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::settings::LoaderSettings;

/// Process exit status used when loading fails.
pub const EXIT_LOAD_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("compiler data directory is not a directory: {}", .0.display())]
    InvalidCompilerDir(PathBuf),

    #[error("no compiler data documents found under {}", .0.display())]
    EmptyCompilerTree(PathBuf),

    #[error("compiler data file missing or invalid: {0}")]
    MissingCompilerData(String),

    #[error("project directory is not a directory: {}", .0.display())]
    InvalidProjectDir(PathBuf),

    #[error("project directory is empty: {}", .0.display())]
    EmptyProject(PathBuf),
}

pub struct Loader {
    settings: LoaderSettings,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(LoaderSettings::default())
    }
}

impl Loader {
    pub fn new(settings: LoaderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Run both load phases and assemble a session.
    ///
    /// Both phases always run. When both fail the project error is logged
    /// and the compiler error is returned.
    pub fn initialize(&self, project_dir: &Path) -> Result<Session, LoadError> {
        info!("Initializing session for project {}", project_dir.display());

        let compiler = self.load_compiler();
        let project = self.load_project(project_dir);

        match (compiler, project) {
            (Ok(compiler), Ok(project)) => {
                info!(
                    "Session ready: {} compiler documents, {} project entries, {} source files",
                    compiler.database().len(),
                    project.tree().len(),
                    project.source_trace().len()
                );
                Ok(Session::new(compiler, project))
            }
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(compiler_err), Err(project_err)) => {
                error!("Project phase failed as well: {}", project_err);
                Err(compiler_err)
            }
        }
    }

    /// Like [`Loader::initialize`], but terminates the process with
    /// [`EXIT_LOAD_FAILURE`] instead of returning an error.
    pub fn initialize_or_exit(&self, project_dir: &Path) -> Session {
        match self.initialize(project_dir) {
            Ok(session) => session,
            Err(e) => {
                error!("Loading failed: {}", e);
                std::process::exit(EXIT_LOAD_FAILURE);
            }
        }
    }

    /// Compiler phase: data tree and data documents.
    pub fn load_compiler(&self) -> Result<CompilerCache, LoadError> {
        let dir = &self.settings.compiler_dir;
        if !is_valid_dir(dir) {
            return Err(LoadError::InvalidCompilerDir(dir.clone()));
        }

        let tree = find_by_extensions(dir, self.settings.data_extensions.as_slice(), true)
            .ok_or_else(|| LoadError::EmptyCompilerTree(dir.clone()))?;
        debug!("Compiler tree holds {} documents", tree.len());

        let mut database = BTreeMap::new();
        for filename in &self.settings.data_files {
            match load_unique_from_tree(&tree, filename, self.settings.pick, false) {
                LoadOutcome::Found(doc) => {
                    insert_once(&mut database, filename.clone(), doc);
                }
                LoadOutcome::NotFound => {
                    warn!("Compiler data file {} not found", filename);
                    if self.settings.strict_data {
                        return Err(LoadError::MissingCompilerData(filename.clone()));
                    }
                }
                LoadOutcome::Invalid(reason) => {
                    warn!("Compiler data file {} is invalid: {}", filename, reason);
                    if self.settings.strict_data {
                        return Err(LoadError::MissingCompilerData(filename.clone()));
                    }
                }
            }
        }

        let tokens = database.get(TOKEN_TABLE).map(token_names).unwrap_or_default();

        info!("Loaded {} compiler documents from {}", database.len(), dir.display());
        Ok(CompilerCache::new(tree, database, tokens))
    }

    /// Project phase: project tree, source trace and config map.
    pub fn load_project(&self, project_dir: &Path) -> Result<ProjectCache, LoadError> {
        if !is_valid_dir(project_dir) {
            return Err(LoadError::InvalidProjectDir(project_dir.to_path_buf()));
        }

        let tree = enumerate(project_dir, true);
        if tree.is_empty() {
            return Err(LoadError::EmptyProject(project_dir.to_path_buf()));
        }

        let root = project_dir
            .canonicalize()
            .unwrap_or_else(|_| project_dir.to_path_buf());

        let source_trace = organize_source_paths(
            &tree,
            &self.settings.source_extension,
            self.settings.trace_order,
        )
        .unwrap_or_default();
        if source_trace.is_empty() {
            warn!("No {} files in {}", self.settings.source_extension, root.display());
        }

        let mut config_map = BTreeMap::new();
        if let Some(configs) = load_many_by_name(&tree, &self.settings.config_filename, true) {
            for (path, doc) in configs {
                let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                insert_once(&mut config_map, dir, doc);
            }
        }

        info!(
            "Loaded project {}: {} entries, {} source files, {} config files",
            root.display(),
            tree.len(),
            source_trace.len(),
            config_map.len()
        );
        Ok(ProjectCache::new(root, tree, source_trace, config_map))
    }
}

/// Top-level string keys of the token table, sorted
fn token_names(table: &Document) -> Vec<String> {
    let mut names: Vec<String> = table
        .keys()
        .filter_map(|key| key.as_str().map(str::to_string))
        .collect();
    names.sort();
    names
}
