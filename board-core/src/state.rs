//! Board state and pointer routing.

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::config::{BoardConfig, Viewport};
use crate::edit::{apply_edit, ContentEdit};
use crate::element::ElementId;
use crate::error::BoardResult;
use crate::event::{DropEvent, Handle, PointerEvent, PointerPhase};
use crate::geometry::{Point, Rect};
use crate::graph::{link_segments, LinkSegment, LiveLayout};
use crate::interaction::{LinkSession, MoveSession, ResizeSession, Session};
use crate::placement::place;
use crate::scene::SceneStore;
use crate::snapshot::{ImportReport, Snapshot};

/// Live geometry of the element under manipulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveRect {
    /// Element being dragged or resized.
    pub id: ElementId,
    /// Uncommitted bounding box.
    pub rect: Rect,
}

/// Preview line of a link being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkPreview {
    /// Anchor on the source element.
    pub from: Point,
    /// Current pointer position.
    pub to: Point,
}

/// What the host should redraw after an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Whether the store was mutated.
    pub changed: bool,
    /// Element being moved or resized, if any.
    pub live: Option<LiveRect>,
    /// Link being dragged, if any.
    pub link_preview: Option<LinkPreview>,
    /// Every connection, following live geometry.
    pub segments: Vec<LinkSegment>,
}

/// The complete board state.
///
/// Owns the scene store and routes host events to at most one active
/// manipulation session.
#[derive(Debug, Clone)]
pub struct BoardState<C: Clock = SystemClock> {
    store: SceneStore,
    config: BoardConfig,
    viewport: Viewport,
    clock: C,
    session: Option<Session>,
    /// Whether there are changes since the last export or import.
    pub has_local_changes: bool,
}

impl BoardState {
    /// Create an empty board using the wall clock.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl<C: Clock> BoardState<C> {
    /// Create an empty board with a specific clock.
    #[must_use]
    pub fn with_clock(config: BoardConfig, clock: C) -> Self {
        Self {
            store: SceneStore::new(),
            viewport: Viewport::from(&config),
            config,
            clock,
            session: None,
            has_local_changes: false,
        }
    }

    /// The scene store.
    #[must_use]
    pub const fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Board configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Update the canvas origin and extent (window resize, scroll).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The session in flight, if any.
    #[must_use]
    pub const fn active_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Place a palette item. Returns the new element's id, or `None` if
    /// the drop was rejected.
    pub fn drop_element(&mut self, event: &DropEvent) -> Option<ElementId> {
        let today = self.clock.today();
        let id = place(
            &mut self.store,
            &self.config,
            &self.viewport,
            event.element_type,
            event.point(),
            today,
        )
        .map(|element| element.id().clone())?;
        self.has_local_changes = true;
        Some(id)
    }

    /// Process a pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Frame {
        let local = self.viewport.to_local(event.point());
        let changed = match event.phase {
            PointerPhase::Press => self.press(event, local),
            PointerPhase::Move => {
                self.track(local);
                false
            }
            PointerPhase::Release => self.release(local),
            PointerPhase::Cancel => {
                if let Some(session) = self.session.take() {
                    tracing::debug!("Cancelled session on {}", session.element_id());
                }
                false
            }
        };
        if changed {
            self.has_local_changes = true;
        }
        self.frame(changed)
    }

    fn press(&mut self, event: &PointerEvent, local: Point) -> bool {
        if let Some(stale) = self.session.take() {
            tracing::warn!("Press while a session on {} was active; discarding it", stale.element_id());
        }
        let Some(target) = &event.target else {
            return false;
        };
        let Some(element) = self.store.find(target) else {
            tracing::debug!("Press on unknown element {target}");
            return false;
        };

        match event.handle {
            Some(Handle::Delete) => return self.store.remove(target).is_some(),
            Some(Handle::Resize) => {
                self.session = Some(Session::Resize(ResizeSession::begin(element, local)));
            }
            Some(Handle::Link) => {
                self.session = Some(Session::Link(LinkSession::begin(target.clone(), local)));
            }
            None => {
                self.session = Some(Session::Move(MoveSession::begin(element, local)));
            }
        }
        false
    }

    fn track(&mut self, local: Point) {
        let canvas = self.viewport.size;
        match &mut self.session {
            Some(Session::Move(session)) => {
                session.update(local, canvas, self.config.reserved_strip.as_ref());
            }
            Some(Session::Resize(session)) => {
                session.update(local, canvas, &self.config.limits);
            }
            Some(Session::Link(session)) => session.update(local),
            None => {}
        }
    }

    fn release(&mut self, local: Point) -> bool {
        self.track(local);
        let canvas = self.viewport.size;
        match self.session.take() {
            Some(Session::Move(session)) => session.commit(&mut self.store),
            Some(Session::Resize(session)) => {
                let default_size = self.config.default_size_for(session.element_type());
                session.commit(&mut self.store, canvas, &self.config.limits, default_size)
            }
            Some(Session::Link(session)) => session.finish(&mut self.store, local).is_some(),
            None => false,
        }
    }

    /// Delete an element and every connection touching it.
    pub fn delete(&mut self, id: &ElementId) -> Frame {
        if let Some(session) = &self.session {
            if session.element_id() == id {
                self.session = None;
            }
        }
        let changed = self.store.remove(id).is_some();
        if changed {
            self.has_local_changes = true;
        }
        self.frame(changed)
    }

    /// Link two elements directly, bypassing the pointer protocol.
    pub fn connect(&mut self, source: &ElementId, target: &ElementId) -> bool {
        let added = self.store.add_edge(source, target);
        self.has_local_changes |= added;
        added
    }

    /// Remove the link between two elements.
    pub fn disconnect(&mut self, a: &ElementId, b: &ElementId) -> bool {
        let removed = self.store.disconnect(a, b) > 0;
        self.has_local_changes |= removed;
        removed
    }

    /// Apply a content edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing or the edit does not
    /// apply to its type.
    pub fn edit(&mut self, id: &ElementId, edit: ContentEdit) -> BoardResult<bool> {
        let changed = apply_edit(&mut self.store, id, edit, self.config.max_list_items)?;
        self.has_local_changes |= changed;
        Ok(changed)
    }

    /// Snapshot the board.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized.
    pub fn export(&mut self) -> BoardResult<Snapshot> {
        let snapshot = Snapshot::capture(&self.store, &self.clock)?;
        self.has_local_changes = false;
        Ok(snapshot)
    }

    /// Replace the board with `snapshot`, abandoning any session.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is malformed; the board is then
    /// unchanged.
    pub fn import(&mut self, snapshot: &Snapshot) -> BoardResult<ImportReport> {
        let report = snapshot.restore_into(&mut self.store, &self.config)?;
        self.session = None;
        self.has_local_changes = false;
        Ok(report)
    }

    /// Connection segments, following any live drag.
    #[must_use]
    pub fn segments(&self) -> Vec<LinkSegment> {
        let live = self.live_rect();
        let layout = LiveLayout::new(&self.store, live.as_ref().map(|l| (&l.id, l.rect)));
        link_segments(&self.store, &layout, self.config.anchor_mode)
    }

    fn live_rect(&self) -> Option<LiveRect> {
        match &self.session {
            Some(Session::Move(session)) => Some(LiveRect {
                id: session.element_id().clone(),
                rect: session.live_rect(),
            }),
            Some(Session::Resize(session)) => Some(LiveRect {
                id: session.element_id().clone(),
                rect: session.live_rect(),
            }),
            Some(Session::Link(_)) | None => None,
        }
    }

    fn frame(&self, changed: bool) -> Frame {
        let link_preview = match &self.session {
            Some(Session::Link(session)) => session
                .preview(&self.store, self.config.anchor_mode)
                .map(|(from, to)| LinkPreview { from, to }),
            _ => None,
        };
        Frame {
            changed,
            live: self.live_rect(),
            link_preview,
            segments: self.segments(),
        }
    }
}
