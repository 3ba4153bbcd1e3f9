//! PNG rendering with Plotters.
//!
//! Layers, bottom to top:
//!
//! 1. grid (major decades, minor 2..9 multiples)
//! 2. axes, tick labels, axis titles
//! 3. fitted curve (dashed)
//! 4. observed points (red, black edge)
//! 5. point annotations with connector lines
//! 6. formula callout and legend
//!
//! All sizes are specified in typographic points and scaled by the dpi, so
//! the same figure reads the same at any resolution.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::app::pipeline::AnalysisOutput;
use crate::domain::ChartConfig;
use crate::error::AppError;
use crate::render::fonts::{FONT_FAMILY, FontSource};
use crate::render::layout::{
    FORMULA_ANCHOR, LogLogFrame, annotation_offset_pt, format_x_tick, format_y_tick,
    offset_to_pixels,
};
use crate::report::format_fit_legend;

pub const TITLE: &str = "The Joule Standard: The Thermodynamic Law of Money (10,000 BC - 2024 AD)";
pub const X_DESC: &str =
    "Real Cost of Energy (E)\n[Hours of Human Labor to purchase 1 Gigajoule] (Log Scale)";
pub const Y_DESC: &str =
    "Monetary Granularity (G)\n[Purchasing Power of Smallest Unit in 2024 USD] (Log Scale)";
pub const FORMULA: &str = "G · E = k";
pub const POINTS_LEGEND: &str = "Historical Epochs";

/// Smallest canvas edge we agree to draw on.
const MIN_CANVAS_PX: u32 = 200;

/// Largest canvas edge; also keeps the RGB buffer length within `u32`.
const MAX_CANVAS_PX: u32 = 20_000;

/// Marker area of 150 pt² expressed as a radius.
const MARKER_RADIUS_PT: f64 = 6.9;

const X_LABEL_AREA_PT: f64 = 64.0;
const Y_LABEL_AREA_PT: f64 = 100.0;

const CONNECTOR_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Everything needed to draw, precomputed in chart space.
#[derive(Debug, Clone)]
pub struct Scene {
    pub frame: LogLogFrame,
    pub points: Vec<(f64, f64)>,
    pub curve: Vec<(f64, f64)>,
    pub labels: Vec<String>,
    /// Annotation text offsets in pixels (screen orientation).
    pub offsets_px: Vec<(i32, i32)>,
    pub legend: String,
    pub size: (u32, u32),
    px_per_pt: f64,
}

impl Scene {
    pub fn new(output: &AnalysisOutput, config: &ChartConfig) -> Result<Self, AppError> {
        let size = config.pixel_size();
        check_canvas(size)?;

        let frame = LogLogFrame::from_data(&output.series, &output.curve)
            .ok_or_else(|| AppError::usage("Nothing to plot: no finite positive values."))?;

        let px_per_pt = config.points_to_px(1.0);
        let points = output.series.points().map(|p| frame.to_chart(p)).collect();
        let curve = output
            .curve
            .points()
            .filter(|&(x, y)| x > 0.0 && y > 0.0 && y.is_finite())
            .map(|p| frame.to_chart(p))
            .collect();
        let offsets_px = (0..output.series.len())
            .map(|i| offset_to_pixels(annotation_offset_pt(i), px_per_pt))
            .collect();

        Ok(Self {
            frame,
            points,
            curve,
            labels: output.series.labels.clone(),
            offsets_px,
            legend: format_fit_legend(&output.fit),
            size,
            px_per_pt,
        })
    }

    /// Points to pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.px_per_pt
    }

    /// Points to a whole, non-zero pixel width.
    fn px(&self, points: f64) -> u32 {
        (self.pt(points).round() as u32).max(1)
    }

    /// Points to a signed pixel offset.
    fn offset(&self, points: f64) -> i32 {
        self.pt(points).round() as i32
    }
}

fn check_canvas((w, h): (u32, u32)) -> Result<(), AppError> {
    if w < MIN_CANVAS_PX || h < MIN_CANVAS_PX {
        return Err(AppError::usage(format!(
            "Figure too small: {w}x{h} px (need at least {MIN_CANVAS_PX} px per side)."
        )));
    }
    let buffer_len = u64::from(w) * u64::from(h) * 3;
    if w > MAX_CANVAS_PX || h > MAX_CANVAS_PX || buffer_len > u64::from(u32::MAX) {
        return Err(AppError::usage(format!(
            "Figure too large: {w}x{h} px (at most {MAX_CANVAS_PX} px per side)."
        )));
    }
    Ok(())
}

/// Render the chart to `config.output` as PNG, overwriting any existing file.
///
/// Fonts must already be registered (see [`crate::render::install_fonts`]).
pub fn render_chart(output: &AnalysisOutput, config: &ChartConfig, font: &FontSource) -> Result<(), AppError> {
    let scene = Scene::new(output, config)?;
    let path = config.output();

    let root = BitMapBackend::new(path, scene.size).into_drawing_area();
    draw_scene(&root, &scene)
        .map_err(|e| AppError::render(format!("Failed to render chart '{}': {e}", path.display())))?;
    root.present()
        .map_err(|e| AppError::usage(format!("Failed to write chart '{}': {e}", path.display())))?;

    info!(
        path = %path.display(),
        width = scene.size.0,
        height = scene.size.1,
        dpi = config.dpi,
        font = %font,
        "wrote chart"
    );
    Ok(())
}

/// Draw the scene onto any Plotters backend.
///
/// Returns the pixel ranges `(x, y)` of the data area.
pub fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
) -> Result<(Range<i32>, Range<i32>), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let x_range = scene.frame.x_range();
    let y_range = scene.frame.y_range();
    let mut chart = ChartBuilder::on(root)
        .margin(scene.px(14.0))
        .caption(
            TITLE,
            (FONT_FAMILY, scene.pt(16.0)).into_font().style(FontStyle::Bold),
        )
        .x_label_area_size(scene.px(X_LABEL_AREA_PT))
        .y_label_area_size(scene.px(Y_LABEL_AREA_PT))
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    // 1) Grid.
    let major = BLACK.mix(0.2).stroke_width(scene.px(0.8));
    let minor = BLACK.mix(0.08).stroke_width(scene.px(0.5));
    chart.draw_series(scene.frame.x_grid().into_iter().map(|g| {
        PathElement::new(
            vec![(g.at, y_range.start), (g.at, y_range.end)],
            if g.major { major } else { minor },
        )
    }))?;
    chart.draw_series(scene.frame.y_grid().into_iter().map(|g| {
        PathElement::new(
            vec![(x_range.start, g.at), (x_range.end, g.at)],
            if g.major { major } else { minor },
        )
    }))?;

    // 2) Axes. The grid above replaces Plotters' linear mesh lines.
    let x_fmt = |u: &f64| format_x_tick(*u);
    let y_fmt = |v: &f64| format_y_tick(*v);
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(BLACK.stroke_width(scene.px(0.8)))
        .x_labels(10)
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FONT_FAMILY, scene.pt(10.0)).into_font())
        .draw()?;

    // Axis titles keep their line breaks, so they are drawn here rather than
    // through the mesh (which only lays out one line).
    let (px_x, px_y) = chart.plotting_area().get_pixel_range();
    let desc_style = (FONT_FAMILY, scene.pt(12.0)).into_font().color(&BLACK);
    let desc_line = scene.offset(14.0);

    let x_desc_style = desc_style.pos(Pos::new(HPos::Center, VPos::Top));
    let x_mid = (px_x.start + px_x.end) / 2;
    let x_top = px_y.end + scene.offset(18.0);
    for (j, line) in X_DESC.lines().enumerate() {
        root.draw(&Text::new(line, (x_mid, x_top + j as i32 * desc_line), x_desc_style.clone()))?;
    }

    let y_desc_style = desc_style
        .transform(FontTransform::Rotate270)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let y_mid = (px_y.start + px_y.end) / 2;
    let y_left = px_x.start - scene.offset(Y_LABEL_AREA_PT);
    for (j, line) in Y_DESC.lines().enumerate() {
        root.draw(&Text::new(line, (y_left + j as i32 * desc_line, y_mid), y_desc_style.clone()))?;
    }

    // 3) Fitted curve. Extra legend lines are label-only entries.
    let curve_style = BLUE.mix(0.7).stroke_width(scene.px(2.0));
    let legend_len = scene.offset(24.0);
    let mut legend_lines = scene.legend.lines();
    let curve = chart.draw_series(DashedLineSeries::new(
        scene.curve.iter().copied(),
        scene.px(6.0),
        scene.px(3.0),
        curve_style,
    ))?;
    curve
        .label(legend_lines.next().unwrap_or_default())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], curve_style));
    for line in legend_lines {
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(line);
    }

    // 4) Observed points.
    let radius = scene.offset(MARKER_RADIUS_PT);
    let legend_radius = scene.offset(4.0);
    chart
        .draw_series(
            scene
                .points
                .iter()
                .map(|&c| Circle::new(c, radius, RED.filled())),
        )?
        .label(POINTS_LEGEND)
        .legend(move |(x, y)| Circle::new((x + legend_len / 2, y), legend_radius, RED.filled()));
    chart.draw_series(
        scene
            .points
            .iter()
            .map(|&c| Circle::new(c, radius, BLACK.stroke_width(scene.px(1.0)))),
    )?;

    // 5) Annotations, on the root area so labels near the frame are not clipped.
    let connector = CONNECTOR_COLOR.stroke_width(scene.px(0.8));
    let label_style = (FONT_FAMILY, scene.pt(10.0))
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK);
    let line_height = scene.offset(12.0);
    for ((at, label), &(dx, dy)) in scene.points.iter().zip(&scene.labels).zip(&scene.offsets_px) {
        let anchor = chart.backend_coord(at);
        root.draw(&(EmptyElement::at(anchor) + PathElement::new(vec![(0, 0), (dx, dy)], connector)))?;

        // The offset marks the bottom-left corner of the label block.
        let lines: Vec<&str> = label.lines().collect();
        let top = dy - line_height * lines.len() as i32;
        for (j, line) in lines.iter().enumerate() {
            root.draw(&(EmptyElement::at(anchor)
                + Text::new(line.to_string(), (dx, top + j as i32 * line_height), label_style.clone())))?;
        }
    }

    // 6) Formula callout, placed in axes fractions.
    let (cx, cy) = chart.backend_coord(&scene.frame.axes_fraction(FORMULA_ANCHOR));
    let formula_style = (FONT_FAMILY, scene.pt(20.0)).into_font().color(&BLACK);
    let (tw, th) = root.estimate_text_size(FORMULA, &formula_style)?;
    let pad = scene.offset(10.0);
    let (half_w, th) = ((tw / 2) as i32, th as i32);
    let corners = [(cx - half_w - pad, cy - th - pad), (cx + half_w + pad, cy + pad)];
    root.draw(&Rectangle::new(corners, WHITE.mix(0.8).filled()))?;
    root.draw(&Rectangle::new(corners, BLACK.stroke_width(scene.px(1.0))))?;
    root.draw(&Text::new(
        FORMULA,
        (cx, cy),
        formula_style.pos(Pos::new(HPos::Center, VPos::Bottom)),
    ))?;

    // Legend.
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .margin(scene.px(10.0))
        .legend_area_size(scene.px(30.0))
        .label_font((FONT_FAMILY, scene.pt(11.0)).into_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok((px_x, px_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_analysis;
    use crate::data::EPOCHS;
    use crate::render::fonts::{install_bundled, install_fonts};

    fn small_config() -> ChartConfig {
        ChartConfig {
            dpi: 50,
            ..ChartConfig::default()
        }
    }

    fn is_dark(px: &[u8]) -> bool {
        px.iter().all(|&c| c < 100)
    }

    /// Draw into an RGB buffer with the bundled font; returns the buffer and
    /// the data area.
    fn draw_to_buffer(scene: &Scene) -> (Vec<u8>, Range<i32>, Range<i32>) {
        install_bundled().unwrap();
        let (w, h) = scene.size;
        let mut buf = vec![0u8; (w * h * 3) as usize];
        let (px_x, px_y) = {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            let area = draw_scene(&root, scene).unwrap();
            root.present().unwrap();
            area
        };
        (buf, px_x, px_y)
    }

    #[test]
    fn scene_maps_every_record() {
        let output = run_analysis(&EPOCHS).unwrap();
        let scene = Scene::new(&output, &ChartConfig::default()).unwrap();
        assert_eq!(scene.size, (3600, 2400));
        assert_eq!(scene.points.len(), 6);
        assert_eq!(scene.curve.len(), 100);
        assert_eq!(scene.offsets_px[0], (42, -21));
        assert_eq!(scene.offsets_px[1], (42, 83));
        let legend: Vec<&str> = scene.legend.lines().collect();
        assert_eq!(legend, vec!["Thermodynamic Constraint", "Slope = 1.140 | R² = 0.993"]);

        let x = scene.frame.x_range();
        assert!(scene.points.iter().all(|&(u, _)| u > x.start && u < x.end));
    }

    #[test]
    fn axis_titles_keep_two_lines() {
        assert_eq!(X_DESC.lines().count(), 2);
        assert_eq!(Y_DESC.lines().count(), 2);
        assert!(X_DESC.starts_with("Real Cost of Energy (E)\n"));
        assert!(Y_DESC.starts_with("Monetary Granularity (G)\n"));
    }

    #[test]
    fn tiny_figures_are_rejected() {
        let output = run_analysis(&EPOCHS).unwrap();
        let config = ChartConfig {
            dpi: 10,
            ..ChartConfig::default()
        };
        assert_eq!(Scene::new(&output, &config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn oversized_figures_are_rejected() {
        let output = run_analysis(&EPOCHS).unwrap();
        for config in [
            ChartConfig {
                dpi: 100_000,
                ..ChartConfig::default()
            },
            ChartConfig {
                width_in: 1e9,
                ..ChartConfig::default()
            },
        ] {
            let err = Scene::new(&output, &config).unwrap_err();
            assert_eq!(err.exit_code(), 2);
            assert!(err.message().contains("too large"));
        }
        assert!(check_canvas((MAX_CANVAS_PX, MAX_CANVAS_PX)).is_ok());
        assert!(check_canvas((MAX_CANVAS_PX + 1, 1000)).is_err());
    }

    #[test]
    fn markers_are_drawn_in_red() {
        let output = run_analysis(&EPOCHS).unwrap();
        let scene = Scene::new(&output, &small_config()).unwrap();
        let (buf, _, _) = draw_to_buffer(&scene);
        let red = buf.chunks(3).filter(|px| *px == [255, 0, 0]).count();
        assert!(red > 50, "expected red marker pixels, found {red}");
        assert!(buf.chunks(3).any(|px| px == [255, 255, 255]));
    }

    #[test]
    fn bundled_font_draws_the_title() {
        let output = run_analysis(&EPOCHS).unwrap();
        let scene = Scene::new(&output, &ChartConfig::default()).unwrap();
        let (buf, _, px_y) = draw_to_buffer(&scene);

        // Everything above the data area is margin and caption.
        let w = scene.size.0 as usize;
        let band = &buf[..px_y.start as usize * w * 3];
        let dark = band.chunks(3).filter(|px| is_dark(px)).count();
        assert!(dark > 1000, "expected title pixels, found {dark}");
    }

    #[test]
    fn annotations_are_not_clipped_to_the_data_area() {
        let output = run_analysis(&EPOCHS).unwrap();
        let mut scene = Scene::new(&output, &ChartConfig::default()).unwrap();

        // Push the last label just past the right edge of the data area.
        let (u, _) = scene.points[5];
        let x = scene.frame.x_range();
        let w = scene.size.0 as usize;
        let (_, px_x, _) = draw_to_buffer(&scene);
        let ax = px_x.start as f64 + (u - x.start) / (x.end - x.start) * f64::from(px_x.end - px_x.start);
        scene.offsets_px[5] = (px_x.end - ax.round() as i32 + 8, 0);
        let (buf, px_x, _) = draw_to_buffer(&scene);

        let dark = buf
            .chunks(3)
            .enumerate()
            .filter(|(i, px)| (i % w) as i32 > px_x.end + 2 && is_dark(px))
            .count();
        assert!(dark > 20, "expected label pixels right of the data area, found {dark}");
    }

    #[test]
    fn writes_png_with_figure_dimensions() {
        let output = run_analysis(&EPOCHS).unwrap();
        let path = std::env::temp_dir().join(format!("thermo-money-chart-{}.png", std::process::id()));
        let config = ChartConfig {
            output: path.clone(),
            show: false,
            ..ChartConfig::default()
        };
        let font = install_fonts(None).unwrap();
        render_chart(&output, &config, &font).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 33);
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        assert_eq!((width, height), (3600, 2400));

        // Overwrites silently.
        render_chart(&output, &config, &font).unwrap();
        let _ = std::fs::remove_file(&path);
    }
}
