//! Connection graph.
//!
//! Edges live inline on their source element, so the graph is a view over
//! the [`SceneStore`] rather than a separate structure. Rendering is
//! pull-based: the host supplies element rectangles through a
//! [`LayoutSource`] and receives plain line segments back.

use serde::{Deserialize, Serialize};

use crate::config::AnchorMode;
use crate::element::{Connection, ElementId};
use crate::geometry::{Point, Rect};
use crate::scene::SceneStore;

impl SceneStore {
    /// Whether an edge joins `a` and `b` in either direction.
    #[must_use]
    pub fn exists(&self, a: &ElementId, b: &ElementId) -> bool {
        self.elements()
            .iter()
            .filter(|e| e.id() == a || e.id() == b)
            .flat_map(|e| e.connections())
            .any(|c| c.joins(a, b))
    }

    /// Add the edge `source -> target`.
    ///
    /// Self-links, unknown endpoints and pairs that are already joined (in
    /// either direction) are ignored. Returns whether an edge was added.
    pub fn add_edge(&mut self, source: &ElementId, target: &ElementId) -> bool {
        if source == target {
            tracing::debug!("Ignoring self-link on {source}");
            return false;
        }
        if self.find(source).is_none() || self.find(target).is_none() {
            tracing::debug!("Ignoring link {source} -> {target}: endpoint missing");
            return false;
        }
        if self.exists(source, target) {
            tracing::debug!("Ignoring link {source} -> {target}: already connected");
            return false;
        }
        self.push_connection(source, Connection::new(source.clone(), target.clone()))
    }

    /// Remove any edge joining `a` and `b`, whichever direction it runs.
    /// Returns the number of edges removed.
    pub fn disconnect(&mut self, a: &ElementId, b: &ElementId) -> usize {
        let removed = self.retain_connections(|c| !c.joins(a, b));
        tracing::debug!("Disconnected {a} and {b} ({removed} edge(s))");
        removed
    }

    /// Every edge in the store, grouped by source in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.elements().iter().flat_map(|e| e.connections())
    }
}

/// Supplies the on-screen rectangle of an element.
pub trait LayoutSource {
    /// Rectangle of `id`, or `None` if it is not laid out.
    fn rect_of(&self, id: &ElementId) -> Option<Rect>;
}

impl LayoutSource for SceneStore {
    fn rect_of(&self, id: &ElementId) -> Option<Rect> {
        self.find(id).map(crate::element::CanvasElement::bounds)
    }
}

/// Committed layout with one element's rectangle replaced.
///
/// Used while a move or resize is in progress, so links follow the
/// element before it is committed.
#[derive(Debug, Clone, Copy)]
pub struct LiveLayout<'a> {
    base: &'a SceneStore,
    live: Option<(&'a ElementId, Rect)>,
}

impl<'a> LiveLayout<'a> {
    /// Layout of `base` with `live` overriding one element.
    #[must_use]
    pub const fn new(base: &'a SceneStore, live: Option<(&'a ElementId, Rect)>) -> Self {
        Self { base, live }
    }
}

impl LayoutSource for LiveLayout<'_> {
    fn rect_of(&self, id: &ElementId) -> Option<Rect> {
        match self.live {
            Some((live_id, rect)) if live_id == id => Some(rect),
            _ => self.base.rect_of(id),
        }
    }
}

/// A side of an element rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionSide {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl ConnectionSide {
    /// Midpoint of this side of `rect`.
    #[must_use]
    pub fn anchor(self, rect: &Rect) -> Point {
        let center = rect.center();
        match self {
            Self::Top => Point::new(center.x, f64::from(rect.y)),
            Self::Right => Point::new(f64::from(rect.right()), center.y),
            Self::Bottom => Point::new(center.x, f64::from(rect.bottom())),
            Self::Left => Point::new(f64::from(rect.x), center.y),
        }
    }

    /// The side of `rect` that faces `toward`.
    #[must_use]
    pub fn facing(rect: &Rect, toward: Point) -> Self {
        let delta = toward.offset_from(rect.center());
        if delta.x.abs() >= delta.y.abs() {
            if delta.x >= 0.0 {
                Self::Right
            } else {
                Self::Left
            }
        } else if delta.y >= 0.0 {
            Self::Bottom
        } else {
            Self::Top
        }
    }
}

/// Where a link leaves `rect` when heading to `toward`.
#[must_use]
pub fn anchor_point(rect: &Rect, toward: Point, mode: AnchorMode) -> Point {
    match mode {
        AnchorMode::Center => rect.center(),
        AnchorMode::Sides => ConnectionSide::facing(rect, toward).anchor(rect),
    }
}

/// A rendered edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSegment {
    /// Source element.
    pub source: ElementId,
    /// Target element.
    pub target: ElementId,
    /// Start point, on or in the source rectangle.
    pub from: Point,
    /// End point, on or in the target rectangle.
    pub to: Point,
}

/// Compute a line segment for every edge whose endpoints are laid out.
#[must_use]
pub fn link_segments(
    store: &SceneStore,
    layout: &impl LayoutSource,
    mode: AnchorMode,
) -> Vec<LinkSegment> {
    store
        .connections()
        .filter_map(|c| {
            let from_rect = layout.rect_of(&c.source)?;
            let to_rect = layout.rect_of(&c.target)?;
            Some(LinkSegment {
                source: c.source.clone(),
                target: c.target.clone(),
                from: anchor_point(&from_rect, to_rect.center(), mode),
                to: anchor_point(&to_rect, from_rect.center(), mode),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::geometry::{Position3, Size2};

    fn board() -> (SceneStore, ElementId, ElementId, ElementId) {
        let mut store = SceneStore::new();
        let mut make = |id: &str, x: i32| {
            store
                .create(
                    ElementKind::Text(String::new()),
                    Position3::new(x, 0, 1),
                    Size2::new(100, 100),
                    Vec::new(),
                    Some(ElementId::from(id)),
                )
                .expect("create")
                .id()
                .clone()
        };
        let a = make("a", 0);
        let b = make("b", 300);
        let c = make("c", 600);
        (store, a, b, c)
    }

    #[test]
    fn test_add_edge_and_exists() {
        let (mut store, a, b, _) = board();
        assert!(!store.exists(&a, &b));
        assert!(store.add_edge(&a, &b));
        assert!(store.exists(&a, &b));
        assert!(store.exists(&b, &a));
    }

    #[test]
    fn test_add_edge_rejects_self_reverse_and_duplicate() {
        let (mut store, a, b, _) = board();
        assert!(!store.add_edge(&a, &a));
        assert!(store.add_edge(&a, &b));
        assert!(!store.add_edge(&a, &b));
        assert!(!store.add_edge(&b, &a));
        assert_eq!(store.connections().count(), 1);
        assert!(store.find(&b).expect("b").connections().is_empty());
    }

    #[test]
    fn test_add_edge_rejects_unknown_endpoint() {
        let (mut store, a, _, _) = board();
        assert!(!store.add_edge(&a, &ElementId::from("ghost")));
        assert!(!store.add_edge(&ElementId::from("ghost"), &a));
        assert_eq!(store.connections().count(), 0);
    }

    #[test]
    fn test_disconnect_either_direction() {
        let (mut store, a, b, c) = board();
        store.add_edge(&a, &b);
        store.add_edge(&c, &a);
        assert_eq!(store.disconnect(&b, &a), 1);
        assert!(!store.exists(&a, &b));
        assert!(store.exists(&a, &c));
        assert_eq!(store.disconnect(&b, &a), 0);
    }

    #[test]
    fn test_center_segments() {
        let (mut store, a, b, _) = board();
        store.add_edge(&a, &b);
        let segments = link_segments(&store, &store, AnchorMode::Center);
        assert_eq!(
            segments,
            vec![LinkSegment {
                source: a,
                target: b,
                from: Point::new(50.0, 50.0),
                to: Point::new(350.0, 50.0),
            }]
        );
    }

    #[test]
    fn test_side_segments_face_each_other() {
        let (mut store, a, b, _) = board();
        store.add_edge(&b, &a);
        let segments = link_segments(&store, &store, AnchorMode::Sides);
        assert_eq!(segments[0].from, Point::new(300.0, 50.0));
        assert_eq!(segments[0].to, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_live_layout_overrides_one_rect() {
        let (mut store, a, b, _) = board();
        store.add_edge(&a, &b);
        let dragged = Rect::new(0, 400, 100, 100);
        let layout = LiveLayout::new(&store, Some((&a, dragged)));
        let segments = link_segments(&store, &layout, AnchorMode::Center);
        assert_eq!(segments[0].from, Point::new(50.0, 450.0));
        assert_eq!(segments[0].to, Point::new(350.0, 50.0));
    }

    #[test]
    fn test_facing_sides() {
        let rect = Rect::new(0, 0, 100, 100);
        assert_eq!(ConnectionSide::facing(&rect, Point::new(50.0, -200.0)), ConnectionSide::Top);
        assert_eq!(ConnectionSide::facing(&rect, Point::new(50.0, 300.0)), ConnectionSide::Bottom);
        assert_eq!(ConnectionSide::facing(&rect, Point::new(-90.0, 60.0)), ConnectionSide::Left);
        assert_eq!(ConnectionSide::Bottom.anchor(&rect), Point::new(50.0, 100.0));
    }
}
