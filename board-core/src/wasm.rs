//! WebAssembly bindings for board-core.
//!
//! Structured values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::config::{BoardConfig, Viewport};
use crate::edit::ContentEdit;
use crate::element::{ElementId, ElementType};
use crate::event::{DropEvent, PointerEvent};
use crate::geometry::{Point, Size2};
use crate::snapshot::Snapshot;
use crate::state::{BoardState, Frame};

/// Initialize the board WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Board instance for WASM.
#[wasm_bindgen]
pub struct WasmBoard {
    state: BoardState,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create an empty board for a canvas of the given size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let config = BoardConfig {
            canvas: Size2::new(width, height),
            ..BoardConfig::default()
        };
        Self {
            state: BoardState::new(config),
        }
    }

    /// Update the canvas' screen origin and size.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, origin_x: f64, origin_y: f64, width: i32, height: i32) {
        self.state.set_viewport(Viewport::new(
            Point::new(origin_x, origin_y),
            Size2::new(width, height),
        ));
    }

    /// Drop a palette item. Returns the new element id, or `undefined` if
    /// the drop was rejected.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown element type.
    #[wasm_bindgen(js_name = dropElement)]
    pub fn drop_element(&mut self, element_type: &str, x: f64, y: f64) -> Result<Option<String>, String> {
        let element_type: ElementType = element_type.parse()?;
        Ok(self
            .state
            .drop_element(&DropEvent::new(element_type, x, y))
            .map(|id| id.to_string()))
    }

    /// Feed a pointer event (JSON) and get the resulting frame (JSON).
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be parsed.
    #[wasm_bindgen(js_name = handlePointer)]
    pub fn handle_pointer(&mut self, event_json: &str) -> Result<String, String> {
        let event: PointerEvent = serde_json::from_str(event_json).map_err(|e| e.to_string())?;
        frame_json(&self.state.handle_pointer(&event))
    }

    /// Delete an element. Returns the resulting frame (JSON).
    ///
    /// # Errors
    ///
    /// Returns an error string if the frame cannot be serialized.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, id: &str) -> Result<String, String> {
        frame_json(&self.state.delete(&ElementId::from(id)))
    }

    /// Apply a content edit (JSON). Returns whether the payload changed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the edit cannot be parsed or does not
    /// apply to the element.
    #[wasm_bindgen(js_name = editElement)]
    pub fn edit_element(&mut self, id: &str, edit_json: &str) -> Result<bool, String> {
        let edit: ContentEdit = serde_json::from_str(edit_json).map_err(|e| e.to_string())?;
        self.state
            .edit(&ElementId::from(id), edit)
            .map_err(|e| e.to_string())
    }

    /// Current connection segments (JSON array).
    #[wasm_bindgen(js_name = segmentsJson)]
    #[must_use]
    pub fn segments_json(&self) -> String {
        serde_json::to_string(&self.state.segments()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Export the board as a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&mut self) -> Result<String, String> {
        let snapshot = self.state.export().map_err(|e| e.to_string())?;
        snapshot.to_json_pretty().map_err(|e| e.to_string())
    }

    /// Replace the board with a snapshot document. Returns the import
    /// report (JSON).
    ///
    /// # Errors
    ///
    /// Returns an error string if the document is malformed; the board is
    /// then unchanged.
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, json: &str) -> Result<String, String> {
        let snapshot = Snapshot::from_json(json).map_err(|e| e.to_string())?;
        let report = self.state.import(&snapshot).map_err(|e| e.to_string())?;
        serde_json::to_string(&report).map_err(|e| e.to_string())
    }

    /// Whether there are changes since the last export or import.
    #[wasm_bindgen(js_name = isDirty)]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.has_local_changes
    }

    /// Number of elements on the board.
    #[wasm_bindgen(js_name = elementCount)]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.state.store().len()
    }
}

impl Default for WasmBoard {
    fn default() -> Self {
        let canvas = BoardConfig::default().canvas;
        Self::new(canvas.x, canvas.y)
    }
}

fn frame_json(frame: &Frame) -> Result<String, String> {
    serde_json::to_string(frame).map_err(|e| e.to_string())
}
