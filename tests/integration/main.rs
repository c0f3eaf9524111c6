//! Integration tests for Clua
//!
//! These tests drive the loader, the session and the source cursor together.

use clua::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const EXIT_CHILD_ENV: &str = "CLUA_EXIT_CHILD_DIR";

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn bundled_loader() -> Loader {
    Loader::new(LoaderSettings::default().with_compiler_dir(bundled_data_dir()))
}

/// Loading a project and scanning one of its sources
#[test]
fn test_load_then_scan() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let project = TempDir::new()?;
    write_files(project.path(), &[
        ("main.clua", "local x = 1\nreturn x\n"),
        ("pkg/lib.clua", "return {}\n"),
        ("pkg/clua.config.yaml", "strict: true\n"),
    ]);

    let session = bundled_loader().initialize(project.path())?;
    assert!(session.compiler().diagnostics().is_some());
    assert_eq!(session.project().source_trace().len(), 2);

    let mut cursor = open_traced_source(&session, "main.clua")?;
    let mut lines = Vec::new();
    loop {
        let line = cursor.read_line()?;
        if SourceCursor::is_eof(&line) {
            break;
        }
        lines.push(line);
    }

    assert_eq!(lines, ["local x = 1\n", "return x\n"]);
    assert_eq!(cursor.position(), cursor.line_offset(2).unwrap());

    cursor.rewind_to_line(1)?;
    assert_eq!(cursor.read_line()?, "return x\n");
    cursor.close()?;
    Ok(())
}

#[test]
fn test_untraced_source_is_rejected() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_files(project.path(), &[("main.clua", ""), ("notes.txt", "")]);
    let session = bundled_loader().initialize(project.path())?;

    assert!(matches!(
        open_traced_source(&session, "notes.txt"),
        Err(CursorError::InvalidSource { .. })
    ));
    assert!(open_traced_source(&session, "main.clua").is_ok());
    Ok(())
}

#[test]
fn test_custom_source_extension_opens() -> anyhow::Result<()> {
    let project = TempDir::new()?;
    write_files(project.path(), &[("main.lua", "print(1)\n"), ("skip.clua", "")]);
    let mut settings = LoaderSettings::default().with_compiler_dir(bundled_data_dir());
    settings.source_extension = ".lua".to_string();

    let session = Loader::new(settings).initialize(project.path())?;
    assert_eq!(session.project().source_trace().len(), 1);

    let mut cursor = open_traced_source(&session, "main.lua")?;
    assert_eq!(cursor.read_line()?, "print(1)\n");
    assert!(matches!(
        open_traced_source(&session, "skip.clua"),
        Err(CursorError::InvalidSource { .. })
    ));
    Ok(())
}

#[test]
fn test_independent_sessions() -> anyhow::Result<()> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    write_files(first.path(), &[("a.clua", "")]);
    write_files(second.path(), &[("b.clua", ""), ("c.clua", "")]);
    let loader = bundled_loader();

    let one = loader.initialize(first.path())?;
    let two = loader.initialize(second.path())?;

    assert_eq!(one.project().source_trace().len(), 1);
    assert_eq!(two.project().source_trace().len(), 2);
    Ok(())
}

/// A project directory without files must terminate the process.
///
/// The test re-executes its own binary; the child takes the exiting path.
#[test]
fn test_initialize_or_exit_on_empty_project() {
    if let Some(dir) = std::env::var_os(EXIT_CHILD_ENV) {
        bundled_loader().initialize_or_exit(Path::new(&dir));
        return;
    }

    let project = TempDir::new().unwrap();
    let status = Command::new(std::env::current_exe().unwrap())
        .args(["--exact", "test_initialize_or_exit_on_empty_project", "--test-threads=1"])
        .env(EXIT_CHILD_ENV, project.path())
        .status()
        .expect("Failed to re-run test binary");

    assert!(!status.success());
    assert_eq!(status.code(), Some(EXIT_LOAD_FAILURE));
}
