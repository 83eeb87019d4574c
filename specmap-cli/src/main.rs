//! Specmap CLI - command-line interface for function and specification extraction

// Global invariants enforced:
// - Deterministic output ordering (files are visited in sorted order)
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use specmap_core::config::{self, ResolvedConfig};
use specmap_core::language;
use specmap_core::{analyze, render_json, render_text, SourceInput};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "specmap")]
#[command(about = "Extract functions and documented specifications from JavaScript and TypeScript")]
struct Cli {
    /// Log per-file progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze source files and documentation
    Analyze {
        /// Files or directories to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Documentation file to read specifications from (repeatable)
        #[arg(long = "docs")]
        docs: Vec<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: discovered from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Parse source files in parallel
        #[arg(long)]
        parallel: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            paths,
            docs,
            format,
            config,
            parallel,
        } => {
            let project_root = std::env::current_dir()?;
            let resolved = config::load_and_resolve(&project_root, config.as_deref())?;
            if let Some(path) = &resolved.config_path {
                debug!(config = %path.display(), "loaded configuration");
            }

            let inputs = gather_inputs(&paths, &docs, &resolved)?;
            let mut options = resolved.analysis_options();
            options.parallel |= parallel;

            let output = analyze(&inputs, &options);

            match format {
                OutputFormat::Text => print!("{}", render_text(&output)),
                OutputFormat::Json => println!("{}", render_json(&output)),
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read every analyzed path, then the explicit documentation files
///
/// A `--docs` file the walk already read as documentation is not read twice.
fn gather_inputs(
    paths: &[PathBuf],
    docs: &[PathBuf],
    config: &ResolvedConfig,
) -> anyhow::Result<Vec<SourceInput>> {
    let mut inputs = Vec::new();
    let mut documentation_seen = HashSet::new();

    for path in paths {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
        for file in collect_files(path, config)? {
            if let Some(input) = read_input(&file, false, config)? {
                if input.is_documentation {
                    documentation_seen.insert(identity(&file));
                }
                inputs.push(input);
            }
        }
    }

    for doc in docs {
        if !documentation_seen.insert(identity(doc)) {
            debug!(file = %doc.display(), "documentation already collected");
            continue;
        }
        if let Some(input) = read_input(doc, true, config)? {
            inputs.push(input);
        }
    }

    Ok(inputs)
}

/// Canonical form of a path for duplicate detection
fn identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Read one file into an analysis input
///
/// Explicit documentation files are always read as documentation. Files that
/// are not valid UTF-8 are skipped with a warning.
fn read_input(
    path: &Path,
    force_documentation: bool,
    config: &ResolvedConfig,
) -> anyhow::Result<Option<SourceInput>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => {
            warn!(file = %path.display(), "skipping file that is not valid UTF-8");
            return Ok(None);
        }
    };

    let file_name = path.to_string_lossy().to_string();
    let input = if force_documentation {
        SourceInput::documentation(file_name, content)
    } else {
        SourceInput::classify(file_name, content, &config.documentation_extensions)
    };
    Ok(Some(input))
}

/// Check if a file is analyzable source or documentation
fn is_supported_file(filename: &str, config: &ResolvedConfig) -> bool {
    language::is_source_file(filename)
        || language::is_documentation_file(filename, &config.documentation_extensions)
}

/// Collect supported files from a path (file or directory), sorted
///
/// An explicitly named file is always kept; directory contents are filtered by
/// extension and by the configured include/exclude patterns.
fn collect_files(path: &Path, config: &ResolvedConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        collect_files_recursive(path, config, &mut files)?;
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

/// Returns true for directory names that should not be traversed
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules" || name == "coverage" || name == "target"
}

fn collect_files_recursive(
    dir: &Path,
    config: &ResolvedConfig,
    files: &mut Vec<PathBuf>,
) -> anyhow::Result<()> {
    for entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;

        if metadata.is_symlink() {
            continue;
        }

        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            continue;
        };

        if metadata.is_dir() {
            if !is_skipped_dir(name) {
                collect_files_recursive(&path, config, files)?;
            }
        } else if metadata.is_file()
            && is_supported_file(name, config)
            && config.should_include(&path)
        {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/b.ts"), "export function b() {}").unwrap();
        fs::write(root.join("src/nested/a.js"), "function a() {}").unwrap();
        fs::write(root.join("src/types.d.ts"), "declare function t(): void;").unwrap();
        fs::write(root.join("src/app.min.js"), "function m(){}").unwrap();
        fs::write(root.join("README.md"), "# Title").unwrap();
        fs::write(root.join("logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "function x() {}").unwrap();

        let config = ResolvedConfig::defaults().unwrap();
        let files = collect_files(root, &config).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(names, vec!["README.md", "src/b.ts", "src/nested/a.js"]);
    }

    #[test]
    fn test_read_input_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let config = ResolvedConfig::defaults().unwrap();

        let doc_path = dir.path().join("notes.txt");
        fs::write(&doc_path, "- **f**: does f").unwrap();
        let doc = read_input(&doc_path, false, &config).unwrap().unwrap();
        assert!(doc.is_documentation);

        let src_path = dir.path().join("f.js");
        fs::write(&src_path, "function f() {}").unwrap();
        let src = read_input(&src_path, false, &config).unwrap().unwrap();
        assert!(!src.is_documentation);

        let forced = read_input(&src_path, true, &config).unwrap().unwrap();
        assert!(forced.is_documentation);
    }

    #[test]
    fn test_docs_flag_does_not_repeat_walked_documentation() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("README.md"), "- **f**: does f").unwrap();
        fs::write(root.join("f.js"), "function f() {}").unwrap();
        fs::write(root.join("extra.txt"), "- **g**: does g").unwrap();
        let config = ResolvedConfig::defaults().unwrap();

        // Same README named two ways, plus a file outside the walk
        let sub = root.join("lib");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("g.js"), "function g() {}").unwrap();
        let docs = vec![
            root.join("README.md"),
            sub.join("../README.md"),
            root.join("extra.txt"),
        ];
        let inputs = gather_inputs(&[sub.clone()], &docs, &config).unwrap();
        let docs_read = inputs.iter().filter(|i| i.is_documentation).count();
        assert_eq!(docs_read, 2);

        let inputs = gather_inputs(&[root.to_path_buf()], &docs, &config).unwrap();
        let readmes = inputs
            .iter()
            .filter(|i| i.file_name.ends_with("README.md"))
            .count();
        assert_eq!(readmes, 1);
        assert_eq!(inputs.iter().filter(|i| i.is_documentation).count(), 2);
        assert_eq!(inputs.iter().filter(|i| !i.is_documentation).count(), 2);
    }

    #[test]
    fn test_read_input_skips_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.js");
        fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();
        let config = ResolvedConfig::defaults().unwrap();
        assert!(read_input(&path, false, &config).unwrap().is_none());
    }
}
