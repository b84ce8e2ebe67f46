//! # Planboard CLI
//!
//! Works with board snapshot files outside the browser: create, inspect,
//! normalize, and make small edits.
//!
//! ## Usage
//!
//! ```bash
//! planboard new board.json
//! planboard place board.json task 40 40
//! planboard link board.json <source-id> <target-id>
//! planboard inspect board.json
//! ```
//!
//! Canvas extent and limits come from `--config <file>` (or
//! `PLANBOARD_CONFIG`), with `--width`/`--height` overriding the canvas.
//! Coordinates given on the command line are canvas-local.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;

pub use commands::run;

use std::path::PathBuf;

use anyhow::Context;
use board_core::{BoardConfig, ElementType, Size2};
use clap::{Parser, Subcommand};

/// Command-line arguments for planboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "planboard")]
#[command(about = "Inspect and edit Planboard snapshot files")]
#[command(version)]
pub struct CliArgs {
    /// Board configuration file (JSON)
    #[arg(long, global = true, env = "PLANBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, global = true)]
    pub width: Option<i32>,

    /// Canvas height in pixels
    #[arg(long, global = true)]
    pub height: Option<i32>,

    /// Action to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Snapshot file operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write an empty board
    New {
        /// Snapshot file to create
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print a summary of a board
    Inspect {
        /// Snapshot file
        path: PathBuf,
        /// Print the import report as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Re-import and re-export a board, clamping sizes and dropping dangling links
    Normalize {
        /// Snapshot file
        path: PathBuf,
        /// Write here instead of in place
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Drop a new element onto the board
    Place {
        /// Snapshot file
        path: PathBuf,
        /// Element type (text, list, task, image, audio, video, date)
        element_type: ElementType,
        /// Canvas-local x
        x: f64,
        /// Canvas-local y
        y: f64,
    },
    /// Link two elements
    Link {
        /// Snapshot file
        path: PathBuf,
        /// Source element id
        source: String,
        /// Target element id
        target: String,
    },
    /// Remove the link between two elements
    Unlink {
        /// Snapshot file
        path: PathBuf,
        /// One element id
        a: String,
        /// The other element id
        b: String,
    },
    /// Delete an element and its links
    Delete {
        /// Snapshot file
        path: PathBuf,
        /// Element id
        id: String,
    },
    /// Set the text of a Text element, the label of a Task, or the note of a Date
    EditText {
        /// Snapshot file
        path: PathBuf,
        /// Element id
        id: String,
        /// New text
        text: String,
    },
}

/// Resolve the board configuration from the file and overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the result is
/// invalid.
pub fn board_config(args: &CliArgs) -> anyhow::Result<BoardConfig> {
    let mut config = match &args.config {
        Some(path) => BoardConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BoardConfig::default(),
    };
    config.canvas = Size2::new(
        args.width.unwrap_or(config.canvas.x),
        args.height.unwrap_or(config.canvas.y),
    );
    config.validate().context("Invalid board configuration")?;
    Ok(config)
}
