//! Input events delivered by the host.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementType};
use crate::geometry::Point;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button or finger down.
    Press,
    /// Pointer moved while pressed.
    Move,
    /// Button or finger up.
    Release,
    /// Gesture aborted by the host (pointer capture lost, escape key).
    Cancel,
}

/// Control on an element that starts a specific protocol when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Bottom-right resize grip.
    Resize,
    /// Connector dot that starts a link.
    Link,
    /// Remove button.
    Delete,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in screen coordinates.
    pub x: f64,
    /// Y position in screen coordinates.
    pub y: f64,
    /// Element under the pointer at press time, if any.
    #[serde(default)]
    pub target: Option<ElementId>,
    /// Handle that was pressed, if any.
    #[serde(default)]
    pub handle: Option<Handle>,
}

impl PointerEvent {
    /// A pointer event with no target.
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            x,
            y,
            target: None,
            handle: None,
        }
    }

    /// Press on the body of `target`.
    #[must_use]
    pub fn press(target: ElementId, x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Press, x, y).on(target)
    }

    /// Pointer moved.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Pointer released.
    #[must_use]
    pub const fn release(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Release, x, y)
    }

    /// Gesture cancelled.
    #[must_use]
    pub const fn cancel() -> Self {
        Self::new(PointerPhase::Cancel, 0.0, 0.0)
    }

    /// Set the target element.
    #[must_use]
    pub fn on(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Mark the press as landing on `handle`.
    #[must_use]
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Screen position.
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A palette item dropped onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropEvent {
    /// Type of element to create.
    pub element_type: ElementType,
    /// X position in screen coordinates.
    pub x: f64,
    /// Y position in screen coordinates.
    pub y: f64,
}

impl DropEvent {
    /// Create a drop event.
    #[must_use]
    pub const fn new(element_type: ElementType, x: f64, y: f64) -> Self {
        Self { element_type, x, y }
    }

    /// Screen position.
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_event_builders() {
        let press = PointerEvent::press(ElementId::from("a"), 10.0, 20.0).with_handle(Handle::Resize);
        assert_eq!(press.phase, PointerPhase::Press);
        assert_eq!(press.target, Some(ElementId::from("a")));
        assert_eq!(press.handle, Some(Handle::Resize));
        assert_eq!(press.point(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_pointer_event_json() {
        let event: PointerEvent = serde_json::from_str(
            r#"{"phase": "press", "x": 5.5, "y": 6, "target": "a", "handle": "link"}"#,
        )
        .expect("parse");
        assert_eq!(event.handle, Some(Handle::Link));

        let moved: PointerEvent =
            serde_json::from_str(r#"{"phase": "move", "x": 1, "y": 2}"#).expect("parse");
        assert_eq!(moved, PointerEvent::moved(1.0, 2.0));
    }
}
