//! Unit tests for clua-loader

use crate::*;
use clua_core::{DIAGNOSTIC_MESSAGES, DEFAULT_CONFIG, Pick, TOKEN_TABLE, TraceOrder};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("clua_loader=debug,clua_indexer=info")
        .with_test_writer()
        .try_init();
}

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Compiler data directory with all three canonical documents
fn create_compiler_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[
        ("data/diagnostic_messages.yaml", "DPC101:\n  level: Critical\n  message: missing\n"),
        ("data/clua.config.yaml", "compiler:\n  strict: false\n"),
        ("data/tokens.yaml", "PLUS: '+'\nEND: end\nLOCAL: local\n"),
        ("data/notes.txt", "not a document\n"),
    ]);
    temp_dir
}

/// Small project with nested sources and two config files
fn create_project_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[
        ("main.clua", "local x = 1\n"),
        ("lib/util.clua", "return {}\n"),
        ("lib/deep/helper.clua", "return 1\n"),
        ("clua.config.yaml", "strict: true\n"),
        ("lib/clua.config.yaml", ""),
        ("README.md", "# demo\n"),
    ]);
    temp_dir
}

fn settings_for(compiler_dir: &Path) -> LoaderSettings {
    LoaderSettings::default().with_compiler_dir(compiler_dir)
}

#[test]
fn test_initialize_builds_session() {
    init_tracing();
    let compiler_dir = create_compiler_dir();
    let project_dir = create_project_dir();
    let loader = Loader::new(settings_for(compiler_dir.path()));

    let session = loader.initialize(project_dir.path()).expect("both phases should succeed");

    let compiler = session.compiler();
    assert_eq!(compiler.tree().len(), 3);
    assert!(compiler.tree().iter().all(|e| e.has_extension(".yaml")));
    assert_eq!(compiler.database().len(), 3);
    assert!(compiler.diagnostics().is_some());
    assert!(compiler.default_config().is_some());
    assert_eq!(compiler.tokens(), ["END", "LOCAL", "PLUS"].map(String::from));

    let project = session.project();
    let root = project_dir.path().canonicalize().unwrap();
    assert_eq!(project.root(), root.as_path());
    let trace: Vec<_> = project.source_trace().iter().filter_map(|e| e.name()).collect();
    assert_eq!(trace, ["main.clua", "util.clua", "helper.clua"]);

    assert_eq!(project.config_map().len(), 2);
    assert!(project.config_for(&root).is_some());
    assert!(project.config_for(&root.join("lib")).unwrap().is_empty());
    assert!(project.config_for(&root.join("lib/deep")).is_none());
}

#[test]
fn test_bundled_data_dir_loads() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[("main.clua", "")]);
    let loader = Loader::new(settings_for(&bundled_data_dir()).with_strict_data(true));

    let session = loader.initialize(temp_dir.path()).unwrap();

    for name in [DIAGNOSTIC_MESSAGES, DEFAULT_CONFIG, TOKEN_TABLE] {
        assert!(session.compiler().document(name).is_some(), "{} should be bundled", name);
    }
    assert!(session.compiler().tokens().contains(&"FUNCTION".to_string()));
}

#[test]
fn test_trace_order_follows_settings() {
    let compiler_dir = create_compiler_dir();
    let project_dir = create_project_dir();
    let loader = Loader::new(
        settings_for(compiler_dir.path()).with_trace_order(TraceOrder::DepthDescending),
    );

    let project = loader.load_project(project_dir.path()).unwrap();

    let trace: Vec<_> = project.source_trace().iter().filter_map(|e| e.name()).collect();
    assert_eq!(trace, ["helper.clua", "util.clua", "main.clua"]);
}

#[test]
fn test_invalid_compiler_dir_fails() {
    let project_dir = create_project_dir();
    let missing = project_dir.path().join("no-compiler-here");
    let loader = Loader::new(settings_for(&missing));

    let err = loader.initialize(project_dir.path()).unwrap_err();

    assert!(matches!(err, LoadError::InvalidCompilerDir(path) if path == missing));
}

#[test]
fn test_compiler_dir_without_documents_fails() {
    let compiler_dir = TempDir::new().unwrap();
    write_files(compiler_dir.path(), &[("readme.txt", "")]);
    let loader = Loader::new(settings_for(compiler_dir.path()));

    assert!(matches!(loader.load_compiler(), Err(LoadError::EmptyCompilerTree(_))));
}

#[test]
fn test_missing_data_file_is_tolerated_unless_strict() {
    let compiler_dir = TempDir::new().unwrap();
    write_files(compiler_dir.path(), &[
        ("tokens.yaml", "PLUS: '+'\n"),
        ("diagnostic_messages.yaml", "- not\n- a mapping\n"),
    ]);

    let lenient = Loader::new(settings_for(compiler_dir.path()));
    let compiler = lenient.load_compiler().unwrap();
    assert_eq!(compiler.database().len(), 1);
    assert!(compiler.token_table().is_some());
    assert!(compiler.diagnostics().is_none());

    let strict = Loader::new(settings_for(compiler_dir.path()).with_strict_data(true));
    assert!(matches!(
        strict.load_compiler(),
        Err(LoadError::MissingCompilerData(name)) if name == DIAGNOSTIC_MESSAGES
    ));
}

#[test]
fn test_duplicate_data_file_uses_pick() {
    let compiler_dir = TempDir::new().unwrap();
    write_files(compiler_dir.path(), &[
        ("a/tokens.yaml", "FIRST: '1'\n"),
        ("b/tokens.yaml", "SECOND: '2'\n"),
    ]);

    let last = Loader::new(settings_for(compiler_dir.path())).load_compiler().unwrap();
    assert_eq!(last.tokens(), ["SECOND".to_string()]);

    let first = Loader::new(settings_for(compiler_dir.path()).with_pick(Pick::First))
        .load_compiler()
        .unwrap();
    assert_eq!(first.tokens(), ["FIRST".to_string()]);
}

#[test]
fn test_empty_project_fails() {
    let compiler_dir = create_compiler_dir();
    let project_dir = TempDir::new().unwrap();
    let loader = Loader::new(settings_for(compiler_dir.path()));

    assert!(matches!(loader.initialize(project_dir.path()), Err(LoadError::EmptyProject(_))));
}

#[test]
fn test_missing_project_fails() {
    let compiler_dir = create_compiler_dir();
    let missing = compiler_dir.path().join("no-project");
    let loader = Loader::new(settings_for(compiler_dir.path()));

    assert!(matches!(loader.initialize(&missing), Err(LoadError::InvalidProjectDir(_))));
}

#[test]
fn test_both_phases_failing_reports_compiler_error() {
    let temp_dir = TempDir::new().unwrap();
    let loader = Loader::new(settings_for(&temp_dir.path().join("no-compiler")));

    let err = loader.initialize(&temp_dir.path().join("no-project")).unwrap_err();

    assert!(matches!(err, LoadError::InvalidCompilerDir(_)));
    assert!(err.to_string().starts_with("compiler data directory is not a directory"));
}

#[test]
fn test_project_without_sources_has_empty_trace() {
    let compiler_dir = create_compiler_dir();
    let project_dir = TempDir::new().unwrap();
    write_files(project_dir.path(), &[("docs/readme.md", "")]);
    let loader = Loader::new(settings_for(compiler_dir.path()));

    let project = loader.load_project(project_dir.path()).unwrap();

    assert!(project.source_trace().is_empty());
    assert!(project.config_map().is_empty());
    assert_eq!(project.tree().len(), 2);
}

#[test]
fn test_settings_from_yaml_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_files(temp_dir.path(), &[(
        "loader.yaml",
        "compiler_dir: compiler/data\ntrace_order: depth_descending\nstrict_data: true\n",
    )]);

    let settings = LoaderSettings::from_yaml_file(&temp_dir.path().join("loader.yaml"))?;

    assert_eq!(settings.compiler_dir, temp_dir.path().join("compiler/data"));
    assert_eq!(settings.trace_order, TraceOrder::DepthDescending);
    assert!(settings.strict_data);
    assert_eq!(settings.source_extension, ".clua");
    assert_eq!(settings.data_files.len(), 3);
    Ok(())
}

#[test]
fn test_settings_file_errors() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_files(temp_dir.path(), &[
        ("empty.yaml", ""),
        ("unknown.yaml", "colour: blue\n"),
    ]);

    let empty = LoaderSettings::from_yaml_file(&temp_dir.path().join("empty.yaml"))?;
    assert_eq!(empty.data_extensions, vec![".yaml".to_string()]);

    assert!(matches!(
        LoaderSettings::from_yaml_file(&temp_dir.path().join("unknown.yaml")),
        Err(SettingsError::Parse { .. })
    ));
    assert!(matches!(
        LoaderSettings::from_yaml_file(&temp_dir.path().join("missing.yaml")),
        Err(SettingsError::Read { .. })
    ));
    Ok(())
}
