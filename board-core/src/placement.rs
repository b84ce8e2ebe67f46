//! Placement of newly dropped elements.

use std::fmt;

use chrono::NaiveDate;

use crate::config::{BoardConfig, Viewport};
use crate::element::{CanvasElement, ElementKind, ElementType};
use crate::geometry::{round_px, Point, Position3, Size2};
use crate::scene::SceneStore;

/// Why a drop did not produce an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    /// The pointer was outside the canvas.
    OutsideCanvas,
    /// The pointer was over an exclusion zone.
    ExclusionZone,
    /// The default-sized element would not fit before the right/bottom edge.
    NoRoom,
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutsideCanvas => "outside the canvas",
            Self::ExclusionZone => "inside an exclusion zone",
            Self::NoRoom => "not enough room before the canvas edge",
        })
    }
}

/// Resolve where a drop at `screen` would put an element of `element_type`.
///
/// Returns the canvas-local top-left corner (z left at zero) and the size
/// the element would get.
///
/// # Errors
///
/// Returns the [`DropRejection`] explaining why nothing would be placed.
pub fn resolve_drop(
    config: &BoardConfig,
    viewport: &Viewport,
    element_type: ElementType,
    screen: Point,
) -> Result<(Position3, Size2), DropRejection> {
    let local = viewport.to_local(screen);
    let (x, y) = (round_px(local.x), round_px(local.y));
    let canvas = viewport.size;

    if !viewport.bounds().contains(Point::new(f64::from(x), f64::from(y))) {
        return Err(DropRejection::OutsideCanvas);
    }
    if config
        .exclusion_zones
        .iter()
        .any(|zone| zone.contains(Point::new(f64::from(x), f64::from(y))))
    {
        return Err(DropRejection::ExclusionZone);
    }

    let size = config.default_size_for(element_type);
    if x > canvas.x - size.x - config.edge_padding || y > canvas.y - size.y - config.edge_padding {
        return Err(DropRejection::NoRoom);
    }
    Ok((Position3::new(x, y, 0), size))
}

/// Create an element of `element_type` where it was dropped.
///
/// Returns `None` when the drop is rejected; the store is then unchanged.
pub fn place<'a>(
    store: &'a mut SceneStore,
    config: &BoardConfig,
    viewport: &Viewport,
    element_type: ElementType,
    screen: Point,
    today: NaiveDate,
) -> Option<&'a CanvasElement> {
    let (position, size) = match resolve_drop(config, viewport, element_type, screen) {
        Ok(resolved) => resolved,
        Err(reason) => {
            tracing::debug!(
                "Ignoring {element_type} drop at ({}, {}): {reason}",
                screen.x,
                screen.y
            );
            return None;
        }
    };

    let position = Position3::new(position.x, position.y, store.next_z());
    let kind = ElementKind::default_for(element_type, today);
    match store.create(kind, position, size, Vec::new(), None) {
        Ok(element) => Some(element),
        Err(err) => {
            tracing::warn!("Failed to create dropped {element_type}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    fn viewport() -> Viewport {
        Viewport::new(Point::default(), Size2::new(1000, 800))
    }

    #[test]
    fn test_text_drop_gets_default_geometry() {
        let mut store = SceneStore::new();
        let config = BoardConfig::default();
        let element = place(
            &mut store,
            &config,
            &viewport(),
            ElementType::Text,
            Point::new(50.0, 50.0),
            today(),
        )
        .expect("placed");
        assert_eq!(element.position, Position3::new(50, 50, 1));
        assert_eq!(element.size, Size2::new(260, 160));
        assert_eq!(element.kind, ElementKind::Text(String::new()));
        assert!(element.connections().is_empty());
    }

    #[test]
    fn test_task_uses_smaller_default() {
        let mut store = SceneStore::new();
        let element = place(
            &mut store,
            &BoardConfig::default(),
            &viewport(),
            ElementType::Task,
            Point::new(0.0, 0.0),
            today(),
        )
        .expect("placed");
        assert_eq!(element.size, Size2::new(220, 60));
    }

    #[test]
    fn test_drop_is_translated_by_viewport_origin() {
        let mut store = SceneStore::new();
        let viewport = Viewport::new(Point::new(300.0, 120.0), Size2::new(1000, 800));
        let element = place(
            &mut store,
            &BoardConfig::default(),
            &viewport,
            ElementType::Image,
            Point::new(350.4, 169.6),
            today(),
        )
        .expect("placed");
        assert_eq!((element.position.x, element.position.y), (50, 50));
    }

    #[test]
    fn test_edge_threshold() {
        let config = BoardConfig::default();
        // 1000 - 260 - 10
        let limit = 730.0;
        assert!(resolve_drop(&config, &viewport(), ElementType::Text, Point::new(limit, 0.0)).is_ok());
        assert_eq!(
            resolve_drop(&config, &viewport(), ElementType::Text, Point::new(limit + 1.0, 0.0)),
            Err(DropRejection::NoRoom)
        );
        // 800 - 60 - 10 for the shorter Task
        assert!(resolve_drop(&config, &viewport(), ElementType::Task, Point::new(0.0, 730.0)).is_ok());
    }

    #[test]
    fn test_outside_canvas_uses_viewport_bounds() {
        let config = BoardConfig::default();
        let viewport = Viewport::new(Point::new(100.0, 100.0), Size2::new(1000, 800));
        assert!(resolve_drop(&config, &viewport, ElementType::Task, Point::new(100.0, 100.0)).is_ok());
        for screen in [Point::new(99.0, 150.0), Point::new(150.0, 99.0), Point::new(1101.0, 150.0)] {
            assert_eq!(
                resolve_drop(&config, &viewport, ElementType::Task, screen),
                Err(DropRejection::OutsideCanvas)
            );
        }
    }

    #[test]
    fn test_rejections_leave_store_unchanged() {
        let mut store = SceneStore::new();
        let config = BoardConfig {
            exclusion_zones: vec![Rect::new(0, 0, 1000, 40)],
            ..BoardConfig::default()
        };
        for point in [
            Point::new(-5.0, 100.0),
            Point::new(100.0, 900.0),
            Point::new(100.0, 20.0),
            Point::new(900.0, 100.0),
        ] {
            assert!(place(&mut store, &config, &viewport(), ElementType::List, point, today()).is_none());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_z_increases_per_drop() {
        let mut store = SceneStore::new();
        let config = BoardConfig::default();
        for expected in 1..=3 {
            let z = place(&mut store, &config, &viewport(), ElementType::Date, Point::new(10.0, 10.0), today())
                .expect("placed")
                .position
                .z;
            assert_eq!(z, expected);
        }
    }
}
