//! Command implementations.

use std::path::Path;

use anyhow::{bail, Context};
use board_core::{
    BoardConfig, BoardState, ContentEdit, DropEvent, ElementId, ElementKind, ElementType,
    ImportReport, Snapshot,
};

use crate::{board_config, CliArgs, Command};

/// Execute a parsed command and return what should be printed.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, the snapshot is
/// malformed, or the command refers to an unknown element.
pub fn run(args: &CliArgs) -> anyhow::Result<String> {
    let config = board_config(args)?;
    match &args.command {
        Command::New { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save(&mut BoardState::new(config), path)?;
            Ok(format!("Created empty board {}", path.display()))
        }
        Command::Inspect { path, json } => {
            let (board, report) = load(path, config)?;
            if *json {
                return serde_json::to_string_pretty(&report).context("Failed to encode report");
            }
            Ok(summary(&board, &report))
        }
        Command::Normalize { path, output } => {
            let (mut board, report) = load(path, config)?;
            let target = output.as_deref().unwrap_or(path);
            save(&mut board, target)?;
            Ok(format!(
                "Wrote {} element(s) to {} ({} dangling connection(s) dropped)",
                report.elements,
                target.display(),
                report.connections_dropped
            ))
        }
        Command::Place {
            path,
            element_type,
            x,
            y,
        } => {
            let (mut board, _) = load(path, config)?;
            let Some(id) = board.drop_element(&DropEvent::new(*element_type, *x, *y)) else {
                bail!("{element_type} does not fit at ({x}, {y})");
            };
            save(&mut board, path)?;
            Ok(id.to_string())
        }
        Command::Link {
            path,
            source,
            target,
        } => {
            let (mut board, _) = load(path, config)?;
            let (source, target) = (ElementId::from(source.as_str()), ElementId::from(target.as_str()));
            require(&board, &source)?;
            require(&board, &target)?;
            if !board.connect(&source, &target) {
                bail!("Cannot link {source} to {target}: same element or already linked");
            }
            save(&mut board, path)?;
            Ok(format!("Linked {source} -> {target}"))
        }
        Command::Unlink { path, a, b } => {
            let (mut board, _) = load(path, config)?;
            let (a, b) = (ElementId::from(a.as_str()), ElementId::from(b.as_str()));
            if !board.disconnect(&a, &b) {
                bail!("{a} and {b} are not linked");
            }
            save(&mut board, path)?;
            Ok(format!("Unlinked {a} and {b}"))
        }
        Command::Delete { path, id } => {
            let (mut board, _) = load(path, config)?;
            let id = ElementId::from(id.as_str());
            if !board.delete(&id).changed {
                bail!("No element {id}");
            }
            save(&mut board, path)?;
            Ok(format!("Deleted {id}"))
        }
        Command::EditText { path, id, text } => {
            let (mut board, _) = load(path, config)?;
            let id = ElementId::from(id.as_str());
            let element_type = require(&board, &id)?;
            let edit = match element_type {
                ElementType::Task => ContentEdit::SetTaskText { text: text.clone() },
                ElementType::Date => ContentEdit::SetDateNote { note: text.clone() },
                _ => ContentEdit::SetText { text: text.clone() },
            };
            let changed = board.edit(&id, edit)?;
            save(&mut board, path)?;
            Ok(if changed {
                format!("Updated {id}")
            } else {
                format!("{id} unchanged")
            })
        }
    }
}

fn load(path: &Path, config: BoardConfig) -> anyhow::Result<(BoardState, ImportReport)> {
    let snapshot = Snapshot::read_from_path(path)
        .with_context(|| format!("Failed to read board {}", path.display()))?;
    let mut board = BoardState::new(config);
    let report = board.import(&snapshot)?;
    if report.connections_dropped > 0 {
        tracing::warn!(
            "{}: dropped {} dangling connection(s)",
            path.display(),
            report.connections_dropped
        );
    }
    Ok((board, report))
}

fn save(board: &mut BoardState, path: &Path) -> anyhow::Result<()> {
    board
        .export()?
        .write_to_path(path)
        .with_context(|| format!("Failed to write board {}", path.display()))
}

fn require(board: &BoardState, id: &ElementId) -> anyhow::Result<ElementType> {
    board
        .store()
        .find(id)
        .map(board_core::CanvasElement::element_type)
        .with_context(|| format!("No element {id}"))
}

fn summary(board: &BoardState, report: &ImportReport) -> String {
    let mut out = format!(
        "{} element(s), {} connection(s)\n",
        report.elements, report.connections_restored
    );
    for element in board.store().elements() {
        let position = element.position;
        out.push_str(&format!(
            "{:<38} {:<6} ({}, {}, z={}) {}x{}  {}",
            element.id(),
            element.element_type(),
            position.x,
            position.y,
            position.z,
            element.size.x,
            element.size.y,
            preview(&element.kind)
        ));
        for edge in element.connections() {
            out.push_str(" -> ");
            out.push_str(edge.target.as_str());
        }
        out.push('\n');
    }
    out
}

fn preview(kind: &ElementKind) -> String {
    match kind {
        ElementKind::Text(text) => format!("{text:?}"),
        ElementKind::List(items) => format!("{} item(s)", items.len()),
        ElementKind::Task(task) => format!("[{}] {:?}", if task.checked { "x" } else { " " }, task.text),
        ElementKind::Image(media) | ElementKind::Audio(media) => {
            match media.source.mime() {
                Some(mime) => format!("inline {mime}"),
                None if media.source.is_empty() => "empty".to_string(),
                None => String::from(media.source.clone()),
            }
        }
        ElementKind::Video(video) => video.url.clone(),
        ElementKind::Date(date) => format!("{} {:?}", date.target_date, date.note),
    }
}
