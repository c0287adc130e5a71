//! SlideDeck Core Library
//!
//! Undo/redo history and the move/resize constraint engine of the SlideDeck
//! presentation editor.

pub mod config;
pub mod constraints;
pub mod document;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod id;
pub mod snap;

pub use config::{ConfigError, ConfigResult, EditorConfig};
pub use constraints::{ConstraintResult, Constraints, ResizeMode, solve_constraint};
pub use document::{Document, DocumentError, DocumentResult, ParagraphStyle, Slide, SlideStyle, Transition};
pub use editor::Presentation;
pub use element::{Element, ElementContent, ElementId, ElementKind, ElementStyle};
pub use geometry::Frame;
pub use gesture::{Gesture, NudgeDirection, nudge};
pub use history::{HistoryStore, Snapshot};
pub use id::Id;
pub use snap::{Orientation, SNAP_TOLERANCE, SnapLine, compute_reference_lines};
