//! # Planboard Core
//!
//! Element model and interaction engine for a freeform planning board.
//! Compiles to WASM for the browser host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              board-core.wasm                │
//! ├─────────────────────────────────────────────┤
//! │  BoardState                                 │
//! │  - Pointer routing  - One active session    │
//! ├──────────────────────┬──────────────────────┤
//! │  Placement           │  Interaction         │
//! │  - Drop rules        │  - Move / Resize     │
//! │  - Default payloads  │  - Link / Delete     │
//! ├──────────────────────┴──────────────────────┤
//! │  SceneStore          │  Connection graph    │
//! │  - Elements          │  - Edges on owners   │
//! │  - Cascade delete    │  - Link segments     │
//! ├─────────────────────────────────────────────┤
//! │  Snapshot codec  ⇄  JSON                    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use board_core::{BoardConfig, BoardState, DropEvent, ElementType, PointerEvent};
//!
//! let mut board = BoardState::new(BoardConfig::default());
//! let id = board
//!     .drop_element(&DropEvent::new(ElementType::Text, 50.0, 50.0))
//!     .expect("drop fits on the canvas");
//!
//! board.handle_pointer(&PointerEvent::press(id.clone(), 60.0, 60.0));
//! let frame = board.handle_pointer(&PointerEvent::release(160.0, 60.0));
//! assert!(frame.changed);
//! assert_eq!(board.store().find(&id).map(|e| e.position.x), Some(150));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod edit;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod placement;
pub mod scene;
pub mod snapshot;
pub mod state;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AnchorMode, BoardConfig, SizeLimits, Viewport};
pub use edit::{apply_edit, normalize_video_url, ContentEdit};
pub use element::{
    CanvasElement, Connection, DateData, ElementId, ElementKind, ElementType, MediaData,
    MediaSource, TaskData, VideoData,
};
pub use error::{BoardError, BoardResult};
pub use event::{DropEvent, Handle, PointerEvent, PointerPhase};
pub use geometry::{Point, Position3, Rect, Size2};
pub use graph::{link_segments, ConnectionSide, LayoutSource, LinkSegment, LiveLayout};
pub use interaction::{LinkSession, MoveSession, ResizeSession, Session};
pub use placement::{place, resolve_drop, DropRejection};
pub use scene::SceneStore;
pub use snapshot::{ElementSnapshot, ImportReport, Snapshot};
pub use state::{BoardState, Frame, LinkPreview, LiveRect};

/// Board core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
