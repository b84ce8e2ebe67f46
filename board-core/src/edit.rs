//! Content edits forwarded by the presentation layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::element::{ElementId, ElementKind, MediaSource};
use crate::error::{BoardError, BoardResult};
use crate::scene::SceneStore;

/// A change to an element's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "camelCase")]
pub enum ContentEdit {
    /// Replace a Text element's content.
    SetText {
        /// New text.
        text: String,
    },
    /// Append an empty item to a List, unless it is full.
    AddListItem,
    /// Drop the last item of a List.
    RemoveListItem,
    /// Replace one List item.
    SetListItem {
        /// Zero-based item index.
        index: usize,
        /// New item text.
        text: String,
    },
    /// Replace a Task's label.
    SetTaskText {
        /// New label.
        text: String,
    },
    /// Tick or untick a Task.
    SetTaskChecked {
        /// New state.
        checked: bool,
    },
    /// Change a Date's target day.
    SetDateTarget {
        /// New target.
        date: NaiveDate,
    },
    /// Change a Date's note.
    SetDateNote {
        /// New note.
        note: String,
    },
    /// Point a Video at a URL.
    SetVideoUrl {
        /// Raw URL as typed.
        url: String,
    },
    /// Point an Image or Audio element at a remote URL.
    SetMediaUrl {
        /// Raw URL as typed.
        url: String,
    },
    /// Embed a dropped or picked file in an Image or Audio element.
    AttachFile {
        /// MIME type reported by the host.
        mime: String,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl ContentEdit {
    /// Short name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetText { .. } => "setText",
            Self::AddListItem => "addListItem",
            Self::RemoveListItem => "removeListItem",
            Self::SetListItem { .. } => "setListItem",
            Self::SetTaskText { .. } => "setTaskText",
            Self::SetTaskChecked { .. } => "setTaskChecked",
            Self::SetDateTarget { .. } => "setDateTarget",
            Self::SetDateNote { .. } => "setDateNote",
            Self::SetVideoUrl { .. } => "setVideoUrl",
            Self::SetMediaUrl { .. } => "setMediaUrl",
            Self::AttachFile { .. } => "attachFile",
        }
    }
}

/// Whether `value` parses as an http or https URL.
#[must_use]
pub fn is_web_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Turn `YouTube` watch and short links into embeddable URLs.
///
/// Input that does not start with `http` yields an empty string. Other
/// URLs, including ones that fail to parse, pass through unchanged.
#[must_use]
pub fn normalize_video_url(raw: &str) -> String {
    let raw = raw.trim();
    if !raw.starts_with("http") {
        return String::new();
    }
    let Ok(url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let host = url.host_str().unwrap_or_default();
    if host.contains("youtube.com") {
        if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
            if !id.is_empty() {
                return format!("https://www.youtube.com/embed/{id}");
            }
        }
    }
    if host == "youtu.be" {
        let id = url.path().trim_start_matches('/');
        return format!("https://www.youtube.com/embed/{id}");
    }
    raw.to_string()
}

/// Apply `edit` to element `id`.
///
/// Returns whether the payload changed. Edits that are valid for the
/// element but have nothing to do (a full list, a file of the wrong media
/// family) leave it unchanged and return `false`.
///
/// # Errors
///
/// Returns [`BoardError::ElementNotFound`] for an unknown id and
/// [`BoardError::KindMismatch`] when the edit does not apply to the
/// element's type.
pub fn apply_edit(
    store: &mut SceneStore,
    id: &ElementId,
    edit: ContentEdit,
    max_list_items: usize,
) -> BoardResult<bool> {
    let element = store
        .find_mut(id)
        .ok_or_else(|| BoardError::ElementNotFound(id.to_string()))?;
    let name = edit.name();
    let element_type = element.element_type();

    let changed = match (&mut element.kind, edit) {
        (ElementKind::Text(text), ContentEdit::SetText { text: new }) => replace(text, new),
        (ElementKind::List(items), ContentEdit::AddListItem) => {
            if items.len() >= max_list_items {
                tracing::debug!("List {id} is full ({max_list_items} items)");
                false
            } else {
                items.push(String::new());
                true
            }
        }
        (ElementKind::List(items), ContentEdit::RemoveListItem) => items.pop().is_some(),
        (ElementKind::List(items), ContentEdit::SetListItem { index, text }) => {
            match items.get_mut(index) {
                Some(item) => replace(item, text),
                None => false,
            }
        }
        (ElementKind::Task(task), ContentEdit::SetTaskText { text }) => replace(&mut task.text, text),
        (ElementKind::Task(task), ContentEdit::SetTaskChecked { checked }) => {
            replace(&mut task.checked, checked)
        }
        (ElementKind::Date(date), ContentEdit::SetDateTarget { date: target }) => {
            replace(&mut date.target_date, target)
        }
        (ElementKind::Date(date), ContentEdit::SetDateNote { note }) => replace(&mut date.note, note),
        (ElementKind::Video(video), ContentEdit::SetVideoUrl { url }) => {
            replace(&mut video.url, normalize_video_url(&url))
        }
        (ElementKind::Image(media) | ElementKind::Audio(media), ContentEdit::SetMediaUrl { url }) => {
            let source = if is_web_url(url.trim()) {
                MediaSource::Reference(url.trim().to_string())
            } else {
                MediaSource::Empty
            };
            replace(&mut media.source, source)
        }
        (ElementKind::Image(media), ContentEdit::AttachFile { mime, bytes }) => {
            attach(&mut media.source, "image/", &mime, &bytes)
        }
        (ElementKind::Audio(media), ContentEdit::AttachFile { mime, bytes }) => {
            attach(&mut media.source, "audio/", &mime, &bytes)
        }
        _ => {
            return Err(BoardError::KindMismatch {
                id: id.to_string(),
                element_type: element_type.as_str(),
                edit: name,
            });
        }
    };

    if changed {
        tracing::debug!("Applied {name} to {element_type} {id}");
    }
    Ok(changed)
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn attach(source: &mut MediaSource, family: &str, mime: &str, bytes: &[u8]) -> bool {
    if !mime.starts_with(family) {
        tracing::debug!("Ignoring {mime} file, expected {family}*");
        return false;
    }
    replace(source, MediaSource::inline(mime, bytes))
}
