// Handout layout: font metrics, font resolution, style classification and the
// paginated layout engine, drawn against a `Canvas`.
// Layout passes are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod engine;
pub mod font_metrics;
pub mod fonts;
pub mod handlers;
pub mod style;

// Re-export the public API consumed by other modules (handout, handlers).
pub use canvas::{Canvas, DrawScript, RecordingCanvas, Rgb};
pub use engine::{layout_lines, LayoutConfig, LayoutOutcome, PageSize};
pub use font_metrics::FontFamily;
pub use fonts::{resolve_fonts, FontTable};
