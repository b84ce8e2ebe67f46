//! Board configuration.
//!
//! Every field has a default, so a partial JSON file only needs to list
//! what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::element::ElementType;
use crate::error::{BoardError, BoardResult};
use crate::geometry::{Point, Rect, Size2};

/// Smallest size an element may take.
pub const MIN_SIZE: Size2 = Size2::new(60, 40);
/// Largest size an element may take.
pub const MAX_SIZE: Size2 = Size2::new(800, 600);
/// Default size for new elements.
pub const DEFAULT_SIZE: Size2 = Size2::new(260, 160);
/// Default size for new Task elements.
pub const TASK_SIZE: Size2 = Size2::new(220, 60);
/// Gap kept between a dropped element and the canvas' right/bottom edges.
pub const EDGE_PADDING: i32 = 10;
/// Maximum number of items in a List element.
pub const MAX_LIST_ITEMS: usize = 10;

/// Inclusive size range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    /// Lower bound per dimension.
    pub min: Size2,
    /// Upper bound per dimension.
    pub max: Size2,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: MIN_SIZE,
            max: MAX_SIZE,
        }
    }
}

impl SizeLimits {
    /// Whether both dimensions are within range.
    #[must_use]
    pub const fn contains(&self, size: Size2) -> bool {
        size.x >= self.min.x && size.x <= self.max.x && size.y >= self.min.y && size.y <= self.max.y
    }

    /// Clamp each dimension into range.
    #[must_use]
    pub fn clamp(&self, size: Size2) -> Size2 {
        Size2::new(
            size.x.clamp(self.min.x, self.max.x),
            size.y.clamp(self.min.y, self.max.y),
        )
    }
}

/// How link endpoints attach to element rectangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    /// Both ends at the element centers.
    #[default]
    Center,
    /// Midpoint of the facing sides.
    Sides,
}

/// Tunables for placement, sizing and link rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Initial canvas extent; hosts update it through the viewport.
    pub canvas: Size2,
    /// Size range every element is held to.
    pub limits: SizeLimits,
    /// Size of new elements.
    pub default_size: Size2,
    /// Size of new Task elements.
    pub task_size: Size2,
    /// Right/bottom margin a drop must leave.
    pub edge_padding: i32,
    /// List length cap.
    pub max_list_items: usize,
    /// Canvas-local regions where drops are refused (toolbars, palettes).
    pub exclusion_zones: Vec<Rect>,
    /// Canvas-local strip that moved elements are pushed out of.
    pub reserved_strip: Option<Rect>,
    /// Link endpoint placement.
    pub anchor_mode: AnchorMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas: Size2::new(1600, 900),
            limits: SizeLimits::default(),
            default_size: DEFAULT_SIZE,
            task_size: TASK_SIZE,
            edge_padding: EDGE_PADDING,
            max_list_items: MAX_LIST_ITEMS,
            exclusion_zones: Vec::new(),
            reserved_strip: None,
            anchor_mode: AnchorMode::Center,
        }
    }
}

impl BoardConfig {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`BoardConfig::validate`].
    pub fn from_json_file(path: &Path) -> BoardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] naming the first violated constraint.
    pub fn validate(&self) -> BoardResult<()> {
        let SizeLimits { min, max } = self.limits;
        if min.x <= 0 || min.y <= 0 {
            return Err(BoardError::Config(format!(
                "minimum size must be positive, got {}x{}",
                min.x, min.y
            )));
        }
        if min.x > max.x || min.y > max.y {
            return Err(BoardError::Config(format!(
                "minimum size {}x{} exceeds maximum {}x{}",
                min.x, min.y, max.x, max.y
            )));
        }
        for (name, size) in [("defaultSize", self.default_size), ("taskSize", self.task_size)] {
            if !self.limits.contains(size) {
                return Err(BoardError::Config(format!(
                    "{name} {}x{} is outside the size limits",
                    size.x, size.y
                )));
            }
        }
        if self.canvas.x <= 0 || self.canvas.y <= 0 {
            return Err(BoardError::Config("canvas extent must be positive".to_string()));
        }
        if self.edge_padding < 0 {
            return Err(BoardError::Config("edgePadding must not be negative".to_string()));
        }
        if self.max_list_items == 0 {
            return Err(BoardError::Config("maxListItems must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Size a freshly placed element of `element_type` starts with.
    #[must_use]
    pub const fn default_size_for(&self, element_type: ElementType) -> Size2 {
        match element_type {
            ElementType::Task => self.task_size,
            ElementType::Text
            | ElementType::List
            | ElementType::Image
            | ElementType::Audio
            | ElementType::Video
            | ElementType::Date => self.default_size,
        }
    }
}

/// Where the canvas sits on screen and how big it currently is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen coordinates of the canvas' top-left corner.
    pub origin: Point,
    /// Current canvas extent.
    pub size: Size2,
}

impl Viewport {
    /// A viewport at `origin` with extent `size`.
    #[must_use]
    pub const fn new(origin: Point, size: Size2) -> Self {
        Self { origin, size }
    }

    /// Convert a screen point to canvas-local coordinates.
    #[must_use]
    pub fn to_local(&self, screen: Point) -> Point {
        screen.offset_from(self.origin)
    }

    /// The canvas as a local rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.size.x, self.size.y)
    }
}

impl From<&BoardConfig> for Viewport {
    fn from(config: &BoardConfig) -> Self {
        Self::new(Point::default(), config.canvas)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = BoardConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.default_size_for(ElementType::Task), Size2::new(220, 60));
        assert_eq!(config.default_size_for(ElementType::Text), Size2::new(260, 160));
    }

    #[test]
    fn test_size_limits_clamp() {
        let limits = SizeLimits::default();
        assert_eq!(limits.clamp(Size2::new(10, 1000)), Size2::new(60, 600));
        assert!(limits.contains(Size2::new(60, 40)));
        assert!(!limits.contains(Size2::new(801, 100)));
    }

    #[test]
    fn test_validate_rejects_inverted_limits() {
        let config = BoardConfig {
            limits: SizeLimits {
                min: Size2::new(500, 40),
                max: Size2::new(400, 600),
            },
            ..BoardConfig::default()
        };
        assert!(matches!(config.validate(), Err(BoardError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_default_outside_limits() {
        let config = BoardConfig {
            task_size: Size2::new(20, 20),
            ..BoardConfig::default()
        };
        let err = config.validate().expect_err("task size too small");
        assert!(err.to_string().contains("taskSize"));
    }

    #[test]
    fn test_partial_json_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"canvas": {{"x": 1024, "y": 768}}, "anchorMode": "sides",
                "reservedStrip": {{"x": 0, "y": 0, "width": 1024, "height": 48}}}}"#
        )
        .expect("write config");

        let config = BoardConfig::from_json_file(file.path()).expect("load config");
        assert_eq!(config.canvas, Size2::new(1024, 768));
        assert_eq!(config.anchor_mode, AnchorMode::Sides);
        assert_eq!(config.reserved_strip, Some(Rect::new(0, 0, 1024, 48)));
        assert_eq!(config.edge_padding, EDGE_PADDING);
        assert_eq!(config.max_list_items, MAX_LIST_ITEMS);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"edgePadding": -1}}"#).expect("write config");
        assert!(matches!(
            BoardConfig::from_json_file(file.path()),
            Err(BoardError::Config(_))
        ));
    }

    #[test]
    fn test_viewport_to_local() {
        let viewport = Viewport::new(Point::new(200.0, 80.0), Size2::new(800, 600));
        assert_eq!(viewport.to_local(Point::new(250.0, 130.0)), Point::new(50.0, 50.0));
        assert_eq!(viewport.bounds(), Rect::new(0, 0, 800, 600));
    }
}
