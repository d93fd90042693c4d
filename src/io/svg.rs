//! SVG output for assembled drawings.
//!
//! Geometry is written in document units inside a `scale(1,-1)` group so
//! that north (or up) points to the top of the page. Text is flipped back
//! locally.

use std::io::Write;

use crate::drawing::{DrawPrimitive, Label, LabelKind, LegStyle, Marker, MarkerShape, Polyline, ScaleBar};
use crate::error::Result;
use crate::types::{BoundingBox2D, Vector2};

/// Empty border around the drawing, in document units.
const PAGE_MARGIN: f64 = 10.0;
/// Marker radius / half-size, in document units.
const MARKER_SIZE: f64 = 1.0;
const FONT_SIZE: f64 = 3.0;
const SCALE_BAR_HEIGHT: f64 = 2.0;

/// Writes a primitive list as a standalone SVG document.
#[derive(Debug)]
pub struct SvgWriter<W: Write> {
    writer: W,
}

impl<W: Write> SvgWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write the whole document.
    pub fn write(&mut self, primitives: &[DrawPrimitive]) -> Result<()> {
        let bounds = drawing_bounds(primitives)
            .unwrap_or_else(|| BoundingBox2D::from_point(Vector2::ZERO));
        self.begin(&bounds)?;

        let mut group: Option<&str> = None;
        for primitive in primitives {
            let name = primitive.group();
            if group != Some(name) {
                if group.is_some() {
                    writeln!(self.writer, "</g>")?;
                }
                writeln!(self.writer, r#"<g id="{}">"#, group_id(name))?;
                group = Some(name);
            }
            match primitive {
                DrawPrimitive::Polyline(line) => self.draw_polyline(line)?,
                DrawPrimitive::Marker(marker) => self.draw_marker(marker)?,
                DrawPrimitive::Label(label) => self.draw_label(label)?,
                DrawPrimitive::ScaleBar(bar) => self.draw_scale_bar(bar)?,
            }
        }
        if group.is_some() {
            writeln!(self.writer, "</g>")?;
        }

        self.end()
    }

    fn begin(&mut self, bounds: &BoundingBox2D) -> Result<()> {
        let width = bounds.width() + 2.0 * PAGE_MARGIN;
        let height = bounds.height() + 2.0 * PAGE_MARGIN;
        writeln!(
            self.writer,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(width),
            h = fmt_num(height),
        )?;
        writeln!(
            self.writer,
            r#"<g transform="translate({},{}) scale(1,-1)">"#,
            fmt_num(PAGE_MARGIN - bounds.min.x),
            fmt_num(PAGE_MARGIN + bounds.max.y),
        )?;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        writeln!(self.writer, "</g>")?;
        writeln!(self.writer, "</svg>")?;
        self.writer.flush()?;
        Ok(())
    }

    fn draw_polyline(&mut self, line: &Polyline) -> Result<()> {
        let points: Vec<String> = line
            .points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect();
        let (stroke, width, dashing) = match line.style {
            LegStyle::Underground => ("black", "0.35", "none"),
            LegStyle::Surface => ("green", "0.25", "2,1"),
            LegStyle::Duplicate => ("black", "0.25", "1,1"),
            LegStyle::Splay => ("grey", "0.1", "none"),
        };
        writeln!(
            self.writer,
            r#"<polyline fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="{}" points="{}"/>"#,
            stroke,
            width,
            dashing,
            points.join(" ")
        )?;
        Ok(())
    }

    fn draw_marker(&mut self, marker: &Marker) -> Result<()> {
        let Vector2 { x, y } = marker.position;
        match marker.shape {
            MarkerShape::Circle => writeln!(
                self.writer,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="black" stroke-width="0.1"/>"#,
                fmt_num(x),
                fmt_num(y),
                fmt_num(MARKER_SIZE)
            )?,
            MarkerShape::Triangle | MarkerShape::Symbol => {
                let fill = if marker.shape == MarkerShape::Symbol { "black" } else { "none" };
                writeln!(
                    self.writer,
                    r#"<polygon fill="{}" stroke="black" stroke-width="0.1" points="{},{} {},{} {},{}"/>"#,
                    fill,
                    fmt_num(x - MARKER_SIZE),
                    fmt_num(y - MARKER_SIZE),
                    fmt_num(x + MARKER_SIZE),
                    fmt_num(y - MARKER_SIZE),
                    fmt_num(x),
                    fmt_num(y + MARKER_SIZE)
                )?
            }
        }
        Ok(())
    }

    fn draw_label(&mut self, label: &Label) -> Result<()> {
        let class = match label.kind {
            LabelKind::StationName => "station-name",
            LabelKind::Annotation => "annotation",
        };
        self.draw_text(
            label.position + Vector2::new(MARKER_SIZE, MARKER_SIZE),
            class,
            &label.text,
        )
    }

    fn draw_text(&mut self, at: Vector2, class: &str, text: &str) -> Result<()> {
        writeln!(
            self.writer,
            r#"<text class="{}" transform="scale(1,-1)" x="{}" y="{}" font-size="{}">{}</text>"#,
            class,
            fmt_num(at.x),
            fmt_num(-at.y),
            fmt_num(FONT_SIZE),
            escape(text)
        )?;
        Ok(())
    }

    fn draw_scale_bar(&mut self, bar: &ScaleBar) -> Result<()> {
        let Vector2 { x, y } = bar.origin;
        for i in 0..bar.segments {
            let fill = if i % 2 == 0 { "black" } else { "white" };
            writeln!(
                self.writer,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black" stroke-width="0.1"/>"#,
                fmt_num(x + i as f64 * bar.segment_length),
                fmt_num(y - SCALE_BAR_HEIGHT),
                fmt_num(bar.segment_length),
                fmt_num(SCALE_BAR_HEIGHT),
                fill
            )?;
        }
        for (i, tick) in bar.ticks.iter().enumerate() {
            let at = Vector2::new(x + i as f64 * bar.segment_length, y + 1.0);
            self.draw_text(at, "scale-tick", tick)?;
        }
        let caption_at = Vector2::new(x, y - SCALE_BAR_HEIGHT - FONT_SIZE - 1.0);
        self.draw_text(caption_at, "scale-caption", &bar.caption)
    }
}

/// Bounding box of everything drawn, scale bar included.
fn drawing_bounds(primitives: &[DrawPrimitive]) -> Option<BoundingBox2D> {
    let points = primitives.iter().flat_map(|p| match p {
        DrawPrimitive::Polyline(line) => line.points.clone(),
        DrawPrimitive::Marker(marker) => vec![marker.position],
        DrawPrimitive::Label(label) => vec![label.position],
        DrawPrimitive::ScaleBar(bar) => vec![
            Vector2::new(bar.origin.x, bar.origin.y - SCALE_BAR_HEIGHT - FONT_SIZE - 1.0),
            Vector2::new(bar.origin.x + bar.length(), bar.origin.y + FONT_SIZE),
        ],
    });
    BoundingBox2D::from_points(points)
}

fn group_id(survey: &str) -> String {
    if survey.is_empty() {
        "root".to_string()
    } else {
        format!("survey-{}", escape(survey))
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn fmt_num(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
