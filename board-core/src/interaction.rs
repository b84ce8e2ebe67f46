//! Direct-manipulation sessions.
//!
//! A session is created on press, fed pointer moves, and consumed on
//! release. Until release the store is untouched: the session carries the
//! live geometry, and the host draws from that. Dropping a session without
//! calling `commit`/`finish` is a cancel.
//!
//! All pointer coordinates here are canvas-local.

use crate::config::{AnchorMode, SizeLimits};
use crate::element::{CanvasElement, ElementId, ElementType};
use crate::geometry::{round_px, Point, Position3, Rect, Size2};
use crate::graph::anchor_point;
use crate::scene::SceneStore;

/// Clamp a top-left corner so a box of `size` stays inside `canvas`.
///
/// A box larger than the canvas is pinned to the origin.
#[must_use]
pub fn clamp_to_canvas(x: i32, y: i32, size: Size2, canvas: Size2) -> (i32, i32) {
    (
        x.clamp(0, (canvas.x - size.x).max(0)),
        y.clamp(0, (canvas.y - size.y).max(0)),
    )
}

/// Move `rect` out of `strip` by the shortest displacement that keeps it
/// on the canvas. Leaves it alone if no such displacement exists.
fn push_out_of(rect: Rect, strip: &Rect, canvas: Size2) -> Rect {
    if !rect.intersects(strip) {
        return rect;
    }
    let candidates = [
        (rect.x, strip.y - rect.height),
        (rect.x, strip.bottom()),
        (strip.x - rect.width, rect.y),
        (strip.right(), rect.y),
    ];
    candidates
        .into_iter()
        .filter(|&(x, y)| {
            x >= 0 && y >= 0 && x + rect.width <= canvas.x && y + rect.height <= canvas.y
        })
        .min_by_key(|&(x, y)| (x - rect.x).abs() + (y - rect.y).abs())
        .map_or(rect, |(x, y)| Rect::new(x, y, rect.width, rect.height))
}

/// Dragging an element by its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSession {
    element_id: ElementId,
    start_pointer: (i32, i32),
    start_position: Position3,
    size: Size2,
    current: Position3,
}

impl MoveSession {
    /// Start moving `element` from `pointer`.
    #[must_use]
    pub fn begin(element: &CanvasElement, pointer: Point) -> Self {
        Self {
            element_id: element.id().clone(),
            start_pointer: (round_px(pointer.x), round_px(pointer.y)),
            start_position: element.position,
            size: element.size,
            current: element.position,
        }
    }

    /// Element being moved.
    #[must_use]
    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    /// Follow the pointer and return the live position.
    pub fn update(&mut self, pointer: Point, canvas: Size2, reserved: Option<&Rect>) -> Position3 {
        let dx = round_px(pointer.x).saturating_sub(self.start_pointer.0);
        let dy = round_px(pointer.y).saturating_sub(self.start_pointer.1);
        let (x, y) = clamp_to_canvas(
            self.start_position.x.saturating_add(dx),
            self.start_position.y.saturating_add(dy),
            self.size,
            canvas,
        );
        let mut rect = Rect::new(x, y, self.size.x, self.size.y);
        if let Some(strip) = reserved {
            rect = push_out_of(rect, strip, canvas);
        }
        self.current = self.start_position.with_xy(rect.x, rect.y);
        self.current
    }

    /// Live bounding box.
    #[must_use]
    pub const fn live_rect(&self) -> Rect {
        Rect::from_parts(self.current, self.size)
    }

    /// Write the live position into the store. Returns `false` if the
    /// element disappeared mid-drag.
    pub fn commit(self, store: &mut SceneStore) -> bool {
        let Some(element) = store.find_mut(&self.element_id) else {
            return false;
        };
        element.position = element.position.with_xy(self.current.x, self.current.y);
        tracing::debug!(
            "Moved {} to ({}, {})",
            self.element_id,
            self.current.x,
            self.current.y
        );
        true
    }
}

/// Dragging an element's resize grip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    element_id: ElementId,
    element_type: ElementType,
    start_pointer: (i32, i32),
    start_size: Size2,
    position: Position3,
    current: Size2,
}

impl ResizeSession {
    /// Start resizing `element` from `pointer`.
    #[must_use]
    pub fn begin(element: &CanvasElement, pointer: Point) -> Self {
        Self {
            element_id: element.id().clone(),
            element_type: element.element_type(),
            start_pointer: (round_px(pointer.x), round_px(pointer.y)),
            start_size: element.size,
            position: element.position,
            current: element.size,
        }
    }

    /// Element being resized.
    #[must_use]
    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    /// Type of the element being resized.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Follow the pointer and return the live size.
    ///
    /// Each dimension is held to `limits` and to the room left between the
    /// element's corner and the canvas edge; the minimum wins when the two
    /// conflict.
    pub fn update(&mut self, pointer: Point, canvas: Size2, limits: &SizeLimits) -> Size2 {
        let dx = round_px(pointer.x).saturating_sub(self.start_pointer.0);
        let dy = round_px(pointer.y).saturating_sub(self.start_pointer.1);
        let max_w = limits.max.x.min(canvas.x.saturating_sub(self.position.x));
        let max_h = limits.max.y.min(canvas.y.saturating_sub(self.position.y));
        self.current = Size2::new(
            limits.min.x.max(max_w.min(self.start_size.x.saturating_add(dx))),
            limits.min.y.max(max_h.min(self.start_size.y.saturating_add(dy))),
        );
        self.current
    }

    /// Live bounding box.
    #[must_use]
    pub const fn live_rect(&self) -> Rect {
        Rect::from_parts(self.position, self.current)
    }

    /// Write the live size into the store.
    ///
    /// A dimension that ended up outside `limits` falls back to the type's
    /// default, and the position is pulled back inside the canvas if the
    /// new size would overhang it. Returns `false` if the element
    /// disappeared mid-drag.
    pub fn commit(
        self,
        store: &mut SceneStore,
        canvas: Size2,
        limits: &SizeLimits,
        default_size: Size2,
    ) -> bool {
        let Some(element) = store.find_mut(&self.element_id) else {
            return false;
        };
        let mut size = self.current;
        if size.x < limits.min.x || size.x > limits.max.x {
            size.x = default_size.x;
        }
        if size.y < limits.min.y || size.y > limits.max.y {
            size.y = default_size.y;
        }
        let (x, y) = clamp_to_canvas(element.position.x, element.position.y, size, canvas);
        element.position = element.position.with_xy(x, y);
        element.size = size;
        tracing::debug!(
            "Resized {} {} to {}x{}",
            self.element_type,
            self.element_id,
            size.x,
            size.y
        );
        true
    }
}

/// Dragging a link out of an element's connector.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSession {
    source: ElementId,
    pointer: Point,
}

impl LinkSession {
    /// Start a link from `source` at `pointer`.
    #[must_use]
    pub const fn begin(source: ElementId, pointer: Point) -> Self {
        Self { source, pointer }
    }

    /// Element the link starts at.
    #[must_use]
    pub fn source(&self) -> &ElementId {
        &self.source
    }

    /// Track the pointer.
    pub fn update(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    /// Preview line from the source anchor to the pointer.
    #[must_use]
    pub fn preview(&self, store: &SceneStore, mode: AnchorMode) -> Option<(Point, Point)> {
        let rect = store.find(&self.source)?.bounds();
        Some((anchor_point(&rect, self.pointer, mode), self.pointer))
    }

    /// Resolve the element under `pointer` and link to it.
    ///
    /// Returns the target when an edge was added. Releasing over empty
    /// canvas, the source itself, or an already-linked element adds nothing.
    pub fn finish(self, store: &mut SceneStore, pointer: Point) -> Option<ElementId> {
        let Some(target) = store.element_at(pointer).map(|e| e.id().clone()) else {
            tracing::debug!("Link from {} released over empty canvas", self.source);
            return None;
        };
        store.add_edge(&self.source, &target).then_some(target)
    }
}

/// The one session a board can have in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    /// Body drag.
    Move(MoveSession),
    /// Grip drag.
    Resize(ResizeSession),
    /// Connector drag.
    Link(LinkSession),
}

impl Session {
    /// Element the session acts on.
    #[must_use]
    pub fn element_id(&self) -> &ElementId {
        match self {
            Self::Move(session) => session.element_id(),
            Self::Resize(session) => session.element_id(),
            Self::Link(session) => session.source(),
        }
    }
}
