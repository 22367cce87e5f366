//! `lingo extract`: one full extraction pass over a project.
//!
//! Files are read, transformed and written in parallel; all of them feed one
//! [`ExtractionStore`], which is emitted once the last file is done.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::super::args::ExtractCommand;
use crate::{
    config::{Config, load_config},
    core::{
        ExtractionStore, TransformOptions, TransformOutput,
        file_scanner::{ScanOptions, scan_files},
        intern::PoolStats,
        rewrite::source_map::SourceMapV3,
        transform::{PreparedFile, prepare},
    },
    emit::{catalog, json::{self, JsonOptions}},
};

/// What happened to one source file.
#[derive(Debug)]
pub enum FileOutcome {
    Transformed { messages: usize, exempted: usize },
    Unchanged { exempted: usize },
    Failed { file: String, error: String },
}

#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    pub files_transformed: usize,
    pub message_count: usize,
    pub unique_messages: usize,
    pub exempted_count: usize,
    /// `(file, error)` for every file that could not be read or written.
    pub failures: Vec<(String, String)>,
    pub written: Vec<PathBuf>,
    pub pool: PoolStats,
}

pub fn extract(cmd: ExtractCommand) -> Result<ExtractSummary> {
    let verbose = cmd.common.verbose;
    let root_dir = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let config_result = load_config(&root_dir)?;
    if verbose && config_result.path.is_none() {
        eprintln!("Note: No .lingorc.json found, using default configuration");
    }

    // CLI > config file > defaults
    let mut config = config_result.config;
    apply_overrides(&mut config, &cmd);
    config.validate()?;

    let files: Vec<PathBuf> = scan_files(
        &root_dir,
        &ScanOptions {
            includes: &config.includes,
            ignores: &config.ignores,
            ignore_test_files: config.ignore_test_files,
        },
    )
    .into_iter()
    .collect();

    let store = ExtractionStore::new();
    let out_dir = config.out_dir.as_deref().map(|dir| resolve(&root_dir, dir));
    let outcomes = run_pass(
        &store,
        &files,
        &root_dir,
        &config.transform_options(),
        out_dir.as_deref(),
    )?;

    let mut summary = ExtractSummary {
        files_scanned: files.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            FileOutcome::Transformed { messages, exempted } => {
                summary.files_transformed += 1;
                summary.message_count += messages;
                summary.exempted_count += exempted;
            }
            FileOutcome::Unchanged { exempted } => summary.exempted_count += exempted,
            FileOutcome::Failed { file, error } => summary.failures.push((file, error)),
        }
    }

    let json_path = resolve(&root_dir, &config.json.output);
    json::write(
        &store,
        &JsonOptions {
            top_level_key: config.json.top_level_key.clone(),
            indent: config.json.indent,
        },
        &json_path,
    )?;
    summary.written.push(json_path);

    if let Some(pot) = &config.catalog.output {
        let pot_path = resolve(&root_dir, pot);
        catalog::write(&store, &pot_path)?;
        summary.written.push(pot_path);
    }

    summary.unique_messages = store.len();
    summary.pool = store.pool_stats();
    Ok(summary)
}

fn apply_overrides(config: &mut Config, cmd: &ExtractCommand) {
    if let Some(out_dir) = &cmd.out_dir {
        config.out_dir = Some(out_dir.to_string_lossy().into_owned());
    }
    if let Some(json) = &cmd.json {
        config.json.output = json.to_string_lossy().into_owned();
    }
    if let Some(pot) = &cmd.pot {
        config.catalog.output = Some(pot.to_string_lossy().into_owned());
    }
    if let Some(arg_mode) = cmd.arg_mode {
        config.arg_mode = arg_mode;
    }
    if let Some(hash_length) = cmd.hash_length {
        config.hash_length = hash_length;
    }
    config.set_default_value |= cmd.default_value;
    config.debug |= cmd.debug;
}

/// Transform every file into `store`, starting from an empty store.
///
/// Invalid options abort before any file is touched. Everything that goes
/// wrong with a single file (I/O, exhausted id space) becomes
/// [`FileOutcome::Failed`] and the other files still run.
pub fn run_pass(
    store: &ExtractionStore,
    files: &[PathBuf],
    root_dir: &Path,
    options: &TransformOptions,
    out_dir: Option<&Path>,
) -> Result<Vec<FileOutcome>> {
    options.validate()?;
    store.clear();
    Ok(transform_files(store, files, root_dir, options, out_dir))
}

/// Read and parse in parallel, assign ids in `files` order, then write in
/// parallel. Ids depend only on the file list, never on thread scheduling.
fn transform_files(
    store: &ExtractionStore,
    files: &[PathBuf],
    root_dir: &Path,
    options: &TransformOptions,
    out_dir: Option<&Path>,
) -> Vec<FileOutcome> {
    let prepared: Vec<Result<(PathBuf, String, PreparedFile), FileOutcome>> = files
        .par_iter()
        .map(|path| {
            let relative = relative_path(root_dir, path);
            let file = relative.to_string_lossy().replace('\\', "/");
            match fs::read_to_string(path) {
                Ok(source) => {
                    let prepared = prepare(&source, &file, options);
                    Ok((relative, source, prepared))
                }
                Err(e) => Err(FileOutcome::Failed {
                    file,
                    error: format!("Failed to read file: {}", e),
                }),
            }
        })
        .collect();

    let applied: Vec<Result<(PathBuf, TransformOutput), FileOutcome>> = prepared
        .into_iter()
        .map(|result| {
            let (relative, source, prepared) = result?;
            prepared
                .apply(&source, options, store)
                .map(|output| (relative, output))
                .map_err(|e| FileOutcome::Failed {
                    file: prepared.filename.clone(),
                    error: e.to_string(),
                })
        })
        .collect();

    applied
        .into_par_iter()
        .map(|result| {
            let (relative, output) = match result {
                Ok(applied) => applied,
                Err(failed) => return failed,
            };

            if output.did_transform
                && let Some(out_dir) = out_dir
                && let Err(e) = write_output(out_dir, &relative, &output.code, output.map.as_ref())
            {
                return FileOutcome::Failed {
                    file: output.filename,
                    error: format!("{:#}", e),
                };
            }

            if output.did_transform {
                FileOutcome::Transformed {
                    messages: output.message_count,
                    exempted: output.exempted_count,
                }
            } else {
                FileOutcome::Unchanged {
                    exempted: output.exempted_count,
                }
            }
        })
        .collect()
}

/// Write `<out_dir>/<relative>` and its `.map` next to it.
fn write_output(
    out_dir: &Path,
    relative: &Path,
    code: &str,
    map: Option<&SourceMapV3>,
) -> Result<()> {
    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let Some(map) = map else {
        fs::write(&target, code)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;
        return Ok(());
    };

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let map_path = target.with_file_name(format!("{}.map", file_name));

    let mut content = code.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&format!("//# sourceMappingURL={}.map\n", file_name));

    fs::write(&target, content)
        .with_context(|| format!("Failed to write file: {}", target.display()))?;
    fs::write(&map_path, map.to_json().context("Failed to serialize source map")?)
        .with_context(|| format!("Failed to write file: {}", map_path.display()))?;

    Ok(())
}

fn relative_path(root_dir: &Path, path: &Path) -> PathBuf {
    let relative = path.strip_prefix(root_dir).unwrap_or(path);
    relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Config paths are relative to the project root unless absolute.
fn resolve(root_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}
