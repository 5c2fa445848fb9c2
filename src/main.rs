//! gostub — insert placeholder godoc stubs above exported Go declarations.
//!
//! Walks a tree of Go source files and, for every exported top-level
//! declaration without a leading comment referencing its name, inserts
//! `// <Name> missing godoc.` directly above it, rewriting the file in
//! place. Every other byte — comments, blank lines, formatting — is
//! preserved, and running the tool twice is a no-op.
//!
//! Per file the pipeline is strictly linear: parse into a comment-preserving
//! tree → visit declarations and insert stubs → render. The rendered text is
//! buffered fully in memory and swapped in via temp-file-plus-rename, so a
//! failure at any stage leaves the original file untouched.

mod annotate;
mod parse;
mod tree;
mod walk;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "gostub",
    about = "Insert placeholder godoc stubs above exported Go declarations"
)]
struct Cli {
    /// Root directory to process recursively
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Report files that would change without rewriting them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    eprintln!(
        "Adding missing godoc stubs to exported declarations under {}",
        cli.root.display()
    );

    // Fail-fast: the first file that cannot be processed aborts the run.
    for path in walk::go_sources(&cli.root)? {
        process_file(&path, cli.dry_run)?;
    }
    Ok(())
}

/// Run the parse → annotate → render pipeline for one file and rewrite it
/// in place when stubs were inserted. Returns the number of insertions.
fn process_file(path: &Path, dry_run: bool) -> Result<usize> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let mut tree = parse::parse(&source)
        .with_context(|| format!("failed parsing {}", path.display()))?;
    let inserted = annotate::annotate(&mut tree);
    if inserted == 0 {
        return Ok(0);
    }
    if dry_run {
        eprintln!("{}: {} missing godoc stub(s)", path.display(), inserted);
        return Ok(inserted);
    }
    write_atomic(path, &tree.render())
        .with_context(|| format!("failed writing {}", path.display()))?;
    Ok(inserted)
}

/// Replace `path` with `contents` via write-to-temp-then-rename, keeping the
/// original permissions. An interrupted run never leaves a truncated file.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path)?;
    fs::set_permissions(path, permissions)?;
    Ok(())
}
