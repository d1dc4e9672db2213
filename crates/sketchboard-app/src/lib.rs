//! Sketchboard Application
//!
//! Command line shell around the editor: converts saved scenes to SVG,
//! rewrites them in canonical form and lists the keyboard shortcuts.

use clap::{Parser, Subcommand};
use sketchboard_core::{
    ApproximateMeasure, ConfigError, Editor, EditorConfig, ImportError, ImportMode,
    ShortcutRegistry,
};
use sketchboard_render::{EXPORT_BACKGROUND, ExportError, export_svg};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid editor config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to import scene: {0}")]
    Import(#[from] ImportError),
    #[error("Failed to export: {0}")]
    Export(#[from] ExportError),
    #[error("Failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sketchboard", about = "Sketchboard scene conversion and export")]
pub struct Cli {
    /// Editor settings as JSON; missing keys take their defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Render a scene file to SVG.
    Export {
        input: PathBuf,
        output: PathBuf,
        /// Drop objects that cannot be imported instead of failing.
        #[arg(long)]
        lenient: bool,
        /// Leave the page background transparent.
        #[arg(long)]
        transparent: bool,
    },
    /// Re-save a scene file in canonical form.
    Normalize {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        lenient: bool,
    },
    /// List the keyboard shortcuts.
    Shortcuts,
}

fn read(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn import_mode(lenient: bool) -> ImportMode {
    if lenient {
        ImportMode::Lenient
    } else {
        ImportMode::Strict
    }
}

/// Read editor settings, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, AppError> {
    match path {
        Some(path) => {
            let config = EditorConfig::from_json(&read(path)?)?;
            log::info!("Loaded editor config from {path:?}");
            Ok(config)
        }
        None => Ok(EditorConfig::default()),
    }
}

/// Load a scene file into a fresh editor.
pub fn load_editor(path: &Path, config: EditorConfig, mode: ImportMode) -> Result<Editor, AppError> {
    let json = read(path)?;
    let mut editor = Editor::with_measure(config, Box::new(ApproximateMeasure));
    let count = editor.import_json(&json, mode)?;
    log::info!("Loaded {count} shapes from {path:?}");
    Ok(editor)
}

/// Render the scene in `input` as an SVG file at `output`.
pub fn export_file(
    input: &Path,
    output: &Path,
    config: EditorConfig,
    mode: ImportMode,
    transparent: bool,
) -> Result<(), AppError> {
    let editor = load_editor(input, config, mode)?;
    let background = (!transparent).then_some(EXPORT_BACKGROUND);
    let svg = export_svg(editor.scene(), editor.measure(), background)?;
    write(output, &svg)?;
    log::info!("Exported SVG to: {output:?}");
    Ok(())
}

/// Rewrite the scene in `input` to `output` in canonical form.
pub fn normalize_file(
    input: &Path,
    output: &Path,
    config: EditorConfig,
    mode: ImportMode,
) -> Result<(), AppError> {
    let editor = load_editor(input, config, mode)?;
    let json = editor.export_json()?;
    write(output, &json)?;
    log::info!("Saved document to: {output:?}");
    Ok(())
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Export {
            input,
            output,
            lenient,
            transparent,
        } => export_file(&input, &output, config, import_mode(lenient), transparent),
        Command::Normalize {
            input,
            output,
            lenient,
        } => normalize_file(&input, &output, config, import_mode(lenient)),
        Command::Shortcuts => {
            ShortcutRegistry::print_all();
            Ok(())
        }
    }
}
