//! Scene store: the live, ordered collection of board elements.

use crate::element::{CanvasElement, Connection, ElementId, ElementKind};
use crate::error::{BoardError, BoardResult};
use crate::geometry::{Point, Position3, Size2};

/// All elements on the board, in insertion order.
///
/// This is the single source of truth for element state. Sessions, the
/// connection graph and the snapshot codec all read and write through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStore {
    elements: Vec<CanvasElement>,
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new element and return it.
    ///
    /// A fresh id is generated unless `id` is supplied. Connections whose
    /// source is not the new element are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateId`] if `id` is already in use.
    pub fn create(
        &mut self,
        kind: ElementKind,
        position: Position3,
        size: Size2,
        connections: Vec<Connection>,
        id: Option<ElementId>,
    ) -> BoardResult<&CanvasElement> {
        let id = id.unwrap_or_default();
        if self.find(&id).is_some() {
            return Err(BoardError::DuplicateId(id.to_string()));
        }

        let mut element = CanvasElement::new(id, kind, position, size);
        let supplied = connections.len();
        element.connections = connections
            .into_iter()
            .filter(|c| c.source == element.id && c.target != element.id)
            .collect();
        if element.connections.len() != supplied {
            tracing::warn!(
                "Discarded {} connection(s) not owned by new element {}",
                supplied - element.connections.len(),
                element.id
            );
        }

        tracing::debug!(
            "Created {} element {} at ({}, {}, z={})",
            element.element_type(),
            element.id,
            position.x,
            position.y,
            position.z
        );
        self.elements.push(element);
        let index = self.elements.len() - 1;
        Ok(&self.elements[index])
    }

    /// Get an element by ID.
    #[must_use]
    pub fn find(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn find_mut(&mut self, id: &ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// Remove an element and every connection that references it.
    ///
    /// Returns the removed element, or `None` if the id was unknown (in
    /// which case nothing changes).
    pub fn remove(&mut self, id: &ElementId) -> Option<CanvasElement> {
        let index = self.elements.iter().position(|e| e.id == *id)?;
        let removed = self.elements.remove(index);

        let mut pruned = 0;
        for element in &mut self.elements {
            let before = element.connections.len();
            element.connections.retain(|c| !c.touches(id));
            pruned += before - element.connections.len();
        }
        tracing::debug!("Removed element {id} and {pruned} incoming connection(s)");
        Some(removed)
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Get the number of elements in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Topmost element containing `point` (canvas-local).
    ///
    /// Highest z wins; among equal z the most recently created wins.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<&CanvasElement> {
        self.elements
            .iter()
            .filter(|e| e.contains_point(point))
            .max_by_key(|e| e.position.z)
    }

    /// Stacking index for the next created element.
    #[must_use]
    pub fn next_z(&self) -> i32 {
        self.elements
            .iter()
            .map(|e| e.position.z)
            .max()
            .map_or(1, |z| z.saturating_add(1))
    }

    pub(crate) fn push_connection(&mut self, source: &ElementId, connection: Connection) -> bool {
        match self.find_mut(source) {
            Some(element) => {
                element.connections.push(connection);
                true
            }
            None => false,
        }
    }

    pub(crate) fn retain_connections(&mut self, mut keep: impl FnMut(&Connection) -> bool) -> usize {
        let mut removed = 0;
        for element in &mut self.elements {
            let before = element.connections.len();
            element.connections.retain(&mut keep);
            removed += before - element.connections.len();
        }
        removed
    }
}
