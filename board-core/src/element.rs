//! Board elements - the content blocks placed on the canvas.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Position3, Rect, Size2};

/// Unique identifier for an element.
///
/// Ids are opaque strings. Fresh ids are random UUIDs, but callers may
/// supply their own (imports, deterministic tests), so no format is
/// assumed when reading one back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The closed set of element type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Free text.
    Text,
    /// Bulleted list.
    List,
    /// Single checkbox item.
    Task,
    /// Picture.
    Image,
    /// Sound clip.
    Audio,
    /// Embedded video.
    Video,
    /// Countdown to a calendar date.
    Date,
}

impl ElementType {
    /// The wire tag for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::List => "List",
            Self::Task => "Task",
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Date => "Date",
        }
    }

    /// All variants in palette order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Text,
            Self::List,
            Self::Task,
            Self::Image,
            Self::Audio,
            Self::Video,
            Self::Date,
        ]
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown element type: {s}"))
    }
}

/// Where a media payload lives.
///
/// Both inline uploads and remote references travel as a single string on
/// the wire: inline media is a base64 `data:` URL, anything else is kept
/// verbatim as a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaSource {
    /// Nothing attached yet.
    #[default]
    Empty,
    /// Bytes embedded in the document.
    Inline {
        /// MIME type, e.g. `image/png`.
        mime: String,
        /// Base64-encoded bytes.
        base64: String,
    },
    /// An external reference (normally an http(s) URL).
    Reference(String),
}

impl MediaSource {
    /// Encode raw bytes as inline media.
    #[must_use]
    pub fn inline(mime: &str, bytes: &[u8]) -> Self {
        Self::Inline {
            mime: mime.to_string(),
            base64: BASE64.encode(bytes),
        }
    }

    /// Parse the wire representation.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((mime, data)) = rest.split_once(";base64,") {
                return Self::Inline {
                    mime: mime.to_string(),
                    base64: data.to_string(),
                };
            }
        }
        Self::Reference(raw.to_string())
    }

    /// Whether anything is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// MIME type of inline media.
    #[must_use]
    pub fn mime(&self) -> Option<&str> {
        match self {
            Self::Inline { mime, .. } => Some(mime),
            Self::Empty | Self::Reference(_) => None,
        }
    }

    /// Decode inline bytes. `None` for references or corrupt base64.
    #[must_use]
    pub fn decode(&self) -> Option<Vec<u8>> {
        match self {
            Self::Inline { base64, .. } => BASE64.decode(base64).ok(),
            Self::Empty | Self::Reference(_) => None,
        }
    }
}

impl From<String> for MediaSource {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<MediaSource> for String {
    fn from(source: MediaSource) -> Self {
        match source {
            MediaSource::Empty => Self::new(),
            MediaSource::Inline { mime, base64 } => format!("data:{mime};base64,{base64}"),
            MediaSource::Reference(url) => url,
        }
    }
}

/// Payload of a Task element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    /// Task label.
    #[serde(alias = "data")]
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub checked: bool,
}

/// Payload of Image and Audio elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaData {
    /// Inline bytes or a reference.
    #[serde(rename = "base64OrUrl", alias = "base64File", default)]
    pub source: MediaSource,
}

/// Payload of a Video element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoData {
    /// Embeddable URL; empty when unset.
    #[serde(default)]
    pub url: String,
}

/// Payload of a Date element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateData {
    /// The day being counted down to.
    #[serde(rename = "targetDate", alias = "date")]
    pub target_date: NaiveDate,
    /// Free-form note shown under the countdown.
    #[serde(default, alias = "data")]
    pub note: String,
}

impl DateData {
    /// Whole days from `today` until the target; negative once it has passed.
    #[must_use]
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }
}

/// The type-specific content an element carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// Free text.
    Text(String),
    /// Ordered bullet items.
    List(Vec<String>),
    /// A checkbox item.
    Task(TaskData),
    /// A picture.
    Image(MediaData),
    /// A sound clip.
    Audio(MediaData),
    /// An embedded video.
    Video(VideoData),
    /// A countdown target.
    Date(DateData),
}

impl ElementKind {
    /// The empty payload a freshly dropped element of `element_type` starts with.
    ///
    /// Date elements default to the day after `today`.
    #[must_use]
    pub fn default_for(element_type: ElementType, today: NaiveDate) -> Self {
        match element_type {
            ElementType::Text => Self::Text(String::new()),
            ElementType::List => Self::List(Vec::new()),
            ElementType::Task => Self::Task(TaskData::default()),
            ElementType::Image => Self::Image(MediaData::default()),
            ElementType::Audio => Self::Audio(MediaData::default()),
            ElementType::Video => Self::Video(VideoData::default()),
            ElementType::Date => Self::Date(DateData {
                target_date: today.succ_opt().unwrap_or(today),
                note: String::new(),
            }),
        }
    }

    /// The type tag of this payload.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::List(_) => ElementType::List,
            Self::Task(_) => ElementType::Task,
            Self::Image(_) => ElementType::Image,
            Self::Audio(_) => ElementType::Audio,
            Self::Video(_) => ElementType::Video,
            Self::Date(_) => ElementType::Date,
        }
    }
}

/// A directed link from one element to another.
///
/// Stored on the source element; `source` always equals the owner's id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Element the edge starts at.
    #[serde(rename = "self")]
    pub source: ElementId,
    /// Element the edge points to.
    pub target: ElementId,
}

impl Connection {
    /// Create an edge.
    #[must_use]
    pub fn new(source: ElementId, target: ElementId) -> Self {
        Self { source, target }
    }

    /// Whether either endpoint is `id`.
    #[must_use]
    pub fn touches(&self, id: &ElementId) -> bool {
        self.source == *id || self.target == *id
    }

    /// Whether this edge joins `a` and `b`, in either direction.
    #[must_use]
    pub fn joins(&self, a: &ElementId, b: &ElementId) -> bool {
        (self.source == *a && self.target == *b) || (self.source == *b && self.target == *a)
    }
}

/// A board element with content and geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasElement {
    /// Unique identifier, fixed at creation.
    pub(crate) id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Top-left corner and stacking order.
    pub position: Position3,
    /// Width and height.
    pub size: Size2,
    /// Outgoing edges.
    pub(crate) connections: Vec<Connection>,
}

impl CanvasElement {
    /// Create a detached element. Only the scene store hands these out.
    pub(crate) fn new(id: ElementId, kind: ElementKind, position: Position3, size: Size2) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            connections: Vec::new(),
        }
    }

    /// The element id.
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// The element's type tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Edges whose source is this element.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Committed bounding box.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }
}
