//! Component registry for gitcanvas.
//!
//! Assistant messages can carry a rendered widget; this crate turns those
//! into stable, human-readable, de-duplicated display labels and tracks
//! which one the canvas panel is showing.

mod canvas;
mod infer;
mod registry;

pub use canvas::CanvasState;
pub use infer::{infer_widget_kind, WidgetKind};
pub use registry::{collect_components, ComponentRecord, ComponentRegistry};
