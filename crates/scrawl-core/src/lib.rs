//! Scrawl Core Library
//!
//! Platform-agnostic model and interaction logic for the Scrawl
//! freehand-annotation canvas: pointer gestures become strokes, strokes
//! become a replayable document, and the document round-trips through a
//! byte codec. Rendering, UI chrome, and file naming live in the host.

pub mod action;
pub mod codec;
pub mod document;
pub mod eraser;
pub mod session;
pub mod storage;
pub mod stroke;
pub mod style;

pub use action::PathAction;
pub use codec::{CodecError, decode, encode};
pub use document::Document;
pub use eraser::{ERASER_SIZE, erase_at, probe_rect};
pub use session::{PointerEvent, PointerKind, Repaint, Session, ToolMode};
pub use storage::{FileStorage, MemoryStorage, SaveCoordinator, Storage, StorageError};
pub use stroke::{DrawError, Stroke};
pub use style::{DEFAULT_STROKE_WIDTH, ResolvedStyle, StrokeStyle, StyleError};
