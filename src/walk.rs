//! Directory traversal and candidate-file selection.
//!
//! Recursive walk that skips `vendor` subtrees entirely and filters the
//! remaining files down to annotatable Go sources: test files and generated
//! files are excluded. A file counts as generated when its name contains
//! "generated" or its first line contains "generated" or "GENERATED".

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Collect the Go source files under `root` that are candidates for
/// annotation, sorted for a deterministic processing order.
pub fn go_sources(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed reading directory {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed reading directory {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed inspecting {}", entry.path().display()))?;
        let path = entry.path();
        if file_type.is_dir() {
            if entry.file_name() == "vendor" {
                continue;
            }
            collect(&path, files)?;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".go") || name.ends_with("_test.go") || name.contains("generated") {
            continue;
        }
        if first_line_marks_generated(&path)? {
            continue;
        }
        files.push(path);
    }
    Ok(())
}

fn first_line_marks_generated(path: &Path) -> Result<bool> {
    let file =
        fs::File::open(path).with_context(|| format!("failed opening {}", path.display()))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .with_context(|| format!("failed reading first line of {}", path.display()))?;
    Ok(line.contains("generated") || line.contains("GENERATED"))
}
