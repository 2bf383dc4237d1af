//! Revenue Chart
//!
//! Line chart with a gradient area fill. [`ChartLayout::compute`] does all of
//! the geometry; [`render_chart`] only replays it onto a [`DrawingSurface`].

use serde::Serialize;

use super::series::RevenueSeries;
use super::surface::{DrawingSurface, LinearGradient, Paint, Point, Rgba, StrokeStyle, TextStyle};

/// Fixed drawing height
pub const CHART_HEIGHT: f64 = 160.0;
/// Inset on every edge, leaves room for the axes and month labels
pub const CHART_PADDING: f64 = 30.0;
/// Lower bound of the y-axis maximum
pub const Y_SCALE_FLOOR: f64 = 100.0;

const AXIS_STYLE: StrokeStyle = StrokeStyle {
    color: Rgba::rgb(0x22, 0x22, 0x33),
    width: 1.0,
};

const LINE_STYLE: StrokeStyle = StrokeStyle {
    color: Rgba::rgb(0x6e, 0xe7, 0xb7),
    width: 2.0,
};

const LABEL_STYLE: TextStyle = TextStyle {
    color: Rgba::rgb(0x9f, 0xb8, 0xff),
    font_size: 10.0,
    font_family: "sans-serif",
};

const AREA_TOP: Rgba = Rgba::rgba(16, 185, 129, 0.35);
const AREA_BOTTOM: Rgba = Rgba::rgba(16, 185, 129, 0.0);

/// Label offsets relative to the plotted point
const LABEL_DX: f64 = -14.0;
const LABEL_BOTTOM_INSET: f64 = 10.0;

/// A straight line between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Month label anchored beneath a plotted point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Computed chart geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// `max(greatest monthly total, 100)`
    pub y_max: f64,
    /// Horizontal axis along the bottom of the plot area
    pub baseline: Segment,
    /// Vertical axis on the left edge
    pub y_axis: Segment,
    /// Data points in label order
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<ChartLabel>,
}

impl ChartLayout {
    /// Lay out `series` on a surface `width` units wide.
    ///
    /// Widths below twice the padding are raised to it so the plot area never
    /// inverts.
    pub fn compute(series: &RevenueSeries, width: f64) -> Self {
        let h = CHART_HEIGHT;
        let pad = CHART_PADDING;
        let w = if width.is_finite() { width.max(2.0 * pad) } else { 2.0 * pad };

        let y_max = series.max_value().unwrap_or(0.0).max(Y_SCALE_FLOOR);
        let plot_width = w - 2.0 * pad;
        let plot_height = h - 2.0 * pad;
        let step_count = series.len().saturating_sub(1).max(1) as f64;

        let x_at = |i: usize| pad + (i as f64 * plot_width) / step_count;

        let points = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (x_at(i), h - pad - (v / y_max) * plot_height))
            .collect();

        let labels = series
            .labels
            .iter()
            .enumerate()
            .map(|(i, text)| ChartLabel {
                text: text.clone(),
                x: x_at(i) + LABEL_DX,
                y: h - LABEL_BOTTOM_INSET,
            })
            .collect();

        Self {
            width: w,
            height: h,
            padding: pad,
            y_max,
            baseline: Segment {
                from: (pad, h - pad),
                to: (w - pad, h - pad),
            },
            y_axis: Segment {
                from: (pad, h - pad),
                to: (pad, pad / 2.0),
            },
            points,
            labels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed outline of the filled area: the data line, then down to the
    /// right end of the baseline and back along it to the left edge.
    /// Empty when there is nothing plotted.
    pub fn area(&self) -> Vec<(f64, f64)> {
        if self.points.is_empty() {
            return Vec::new();
        }

        let mut outline = self.points.clone();
        outline.push(self.baseline.to);
        outline.push(self.baseline.from);
        outline
    }

    fn gradient(&self) -> LinearGradient {
        LinearGradient {
            start: Point::new(0.0, self.padding),
            end: Point::new(0.0, self.height - self.padding),
            stops: vec![(0.0, AREA_TOP), (1.0, AREA_BOTTOM)],
        }
    }
}

/// Draw `layout` onto `surface`.
///
/// The surface is resized and cleared first, so repeated calls with the same
/// layout leave identical output. An empty layout draws the two axes only.
pub fn render_chart<S: DrawingSurface + ?Sized>(surface: &mut S, layout: &ChartLayout) {
    surface.resize(layout.width, layout.height);
    surface.clear();

    for axis in [&layout.baseline, &layout.y_axis] {
        surface.begin_path();
        surface.move_to(axis.from.0, axis.from.1);
        surface.line_to(axis.to.0, axis.to.1);
        surface.stroke(&AXIS_STYLE);
    }

    let Some((&(x0, y0), rest)) = layout.points.split_first() else {
        return;
    };

    surface.begin_path();
    surface.move_to(x0, y0);
    for &(x, y) in rest {
        surface.line_to(x, y);
    }
    surface.stroke(&LINE_STYLE);

    surface.line_to(layout.baseline.to.0, layout.baseline.to.1);
    surface.line_to(layout.baseline.from.0, layout.baseline.from.1);
    surface.close_path();
    surface.fill(&Paint::Linear(layout.gradient()));

    for label in &layout.labels {
        surface.fill_text(&label.text, label.x, label.y, &LABEL_STYLE);
    }
}
