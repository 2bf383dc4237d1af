//! Drawing surfaces
//!
//! A canvas-style 2D drawing interface and an SVG implementation of it.

use std::fmt::Write as _;

/// A point in drawing units, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// RGBA color, alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, alpha dropped
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    pub font_size: f64,
    pub font_family: &'static str,
}

/// Linear gradient between two points with color stops at offsets `0..=1`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<(f64, Rgba)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

/// Canvas-style drawing target.
///
/// Paths follow canvas semantics: `begin_path` starts a new path, and
/// `stroke`/`fill` paint the current path without resetting it.
pub trait DrawingSurface {
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self, style: &StrokeStyle);
    fn fill(&mut self, paint: &Paint);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
}

/// Renders drawing calls into an SVG document
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    defs: Vec<String>,
    elements: Vec<String>,
    path: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize everything drawn since the last clear
    pub fn finish(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height)
        );

        if !self.defs.is_empty() {
            out.push_str("  <defs>\n");
            for def in &self.defs {
                let _ = writeln!(out, "    {}", def);
            }
            out.push_str("  </defs>\n");
        }

        for element in &self.elements {
            let _ = writeln!(out, "  {}", element);
        }

        out.push_str("</svg>\n");
        out
    }

    fn paint_attr(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => color_attrs("fill", color),
            Paint::Linear(gradient) => {
                let id = format!("gradient-{}", self.defs.len());
                let mut def = format!(
                    r#"<linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                    id,
                    num(gradient.start.x),
                    num(gradient.start.y),
                    num(gradient.end.x),
                    num(gradient.end.y)
                );
                for (offset, color) in &gradient.stops {
                    let _ = write!(
                        def,
                        r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                        num(*offset),
                        color.hex(),
                        num(color.a)
                    );
                }
                def.push_str("</linearGradient>");
                self.defs.push(def);
                format!(r#"fill="url(#{})""#, id)
            }
        }
    }
}

impl DrawingSurface for SvgSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.defs.clear();
        self.elements.clear();
        self.path.clear();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "M{} {} ", num(x), num(y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "L{} {} ", num(x), num(y));
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<path d="{}" fill="none" {} stroke-width="{}"/>"#,
            self.path.trim_end(),
            color_attrs("stroke", &style.color),
            num(style.width)
        ));
    }

    fn fill(&mut self, paint: &Paint) {
        if self.path.is_empty() {
            return;
        }
        let fill = self.paint_attr(paint);
        self.elements.push(format!(
            r#"<path d="{}" {} stroke="none"/>"#,
            self.path.trim_end(),
            fill
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.elements.push(format!(
            r#"<text x="{}" y="{}" {} font-size="{}" font-family="{}">{}</text>"#,
            num(x),
            num(y),
            color_attrs("fill", &style.color),
            num(style.font_size),
            style.font_family,
            escape(text)
        ));
    }
}

fn color_attrs(attr: &str, color: &Rgba) -> String {
    if color.a >= 1.0 {
        format!(r#"{}="{}""#, attr, color.hex())
    } else {
        format!(r#"{}="{}" {}-opacity="{}""#, attr, color.hex(), attr, num(color.a))
    }
}

/// Two decimals, trailing zeros trimmed
fn num(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
