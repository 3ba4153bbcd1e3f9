//! Static chart rendering.
//!
//! - `layout`: pure geometry (inverted log-log frame, grid, ticks, offsets)
//! - `fonts`: font discovery for the `ab_glyph` text engine
//! - `chart`: Plotters drawing and PNG output

pub mod chart;
pub mod fonts;
pub mod layout;

pub use chart::{Scene, draw_scene, render_chart};
pub use fonts::{FontSource, install_bundled, install_fonts};
pub use layout::LogLogFrame;
