// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG output for `plotwise_demo`.

use std::fmt::Write as _;

use kurbo::{Point, Rect};
use peniko::Brush;
use plotwise_graph::{Anchoring, Drawable, Primitive, StrokeStyle, arrow_head};
use plotwise_text::{FontStyle, TextStyle};

/// Renders `drawables` (sorted by layer, stable within a layer) into an SVG document covering
/// `view_box`.
pub(crate) fn render(drawables: &[Drawable], view_box: Rect) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view_box.x0,
        view_box.y0,
        view_box.width(),
        view_box.height(),
        view_box.width(),
        view_box.height()
    );
    let _ = writeln!(
        out,
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff"/>"##,
        view_box.x0,
        view_box.y0,
        view_box.width(),
        view_box.height()
    );

    let mut order: Vec<&Drawable> = drawables.iter().collect();
    order.sort_by_key(|d| (d.layer, d.id));

    for drawable in order {
        match &drawable.primitive {
            Primitive::Lines { segments, stroke } => {
                if segments.is_empty() {
                    continue;
                }
                let mut d = String::new();
                for s in segments {
                    let _ = write!(d, "M{} {}L{} {}", s.p0.x, s.p0.y, s.p1.x, s.p1.y);
                }
                let _ = write!(out, r#"<path d="{d}" fill="none""#);
                write_stroke(&mut out, stroke);
                out.push_str("/>\n");
            }
            Primitive::Polygon {
                points,
                fill,
                stroke,
            } => {
                let _ = write!(out, r#"<polygon points="{}""#, points_attr(points));
                write_paint_attr(&mut out, "fill", fill);
                if let Some(stroke) = stroke {
                    write_stroke(&mut out, stroke);
                }
                out.push_str("/>\n");
            }
            Primitive::Path { path, fill, stroke } => {
                let _ = write!(out, r#"<path d="{}""#, path.to_svg());
                match fill {
                    Some(fill) => write_paint_attr(&mut out, "fill", fill),
                    None => out.push_str(r#" fill="none""#),
                }
                if let Some(stroke) = stroke {
                    write_stroke(&mut out, stroke);
                }
                out.push_str("/>\n");
            }
            Primitive::Arrow {
                line,
                stroke,
                head_length,
            } => {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                    line.p0.x, line.p0.y, line.p1.x, line.p1.y
                );
                write_stroke(&mut out, stroke);
                out.push_str("/>\n");
                let head = arrow_head(*line, *head_length);
                let _ = write!(out, r#"<polygon points="{}""#, points_attr(&head));
                write_paint_attr(&mut out, "fill", &stroke.brush);
                out.push_str("/>\n");
            }
            Primitive::Text {
                text,
                origin,
                anchoring,
                style,
                fill,
                angle,
                line_spacing,
                bounds,
            } => write_text(
                &mut out,
                text,
                *origin,
                *anchoring,
                style,
                fill,
                *angle,
                *line_spacing,
                *bounds,
            ),
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_text(
    out: &mut String,
    text: &str,
    origin: Point,
    anchoring: Anchoring,
    style: &TextStyle,
    fill: &Brush,
    angle: f64,
    line_spacing: f64,
    bounds: Rect,
) {
    if angle != 0.0 {
        // Rotated text is centered on its origin, lines stacked before turning.
        let _ = writeln!(
            out,
            r#"<g transform="rotate({} {} {})">"#,
            -angle, origin.x, origin.y
        );
        let lines = text.split('\n').count() as f64;
        let height = lines * style.font_size + (lines - 1.0) * line_spacing;
        let mut y = origin.y - 0.5 * height;
        for line in text.split('\n') {
            let _ = write!(
                out,
                r#"<text x="{}" y="{y}" text-anchor="middle" dominant-baseline="hanging""#,
                origin.x
            );
            write_font(out, style);
            write_paint_attr(out, "fill", fill);
            out.push('>');
            out.push_str(&escape_xml(line));
            out.push_str("</text>\n");
            y += style.font_size + line_spacing;
        }
        out.push_str("</g>\n");
        return;
    }

    let (anchor, x) = match anchoring {
        Anchoring::TopLeftCorner | Anchoring::BottomLeftCorner => ("start", bounds.x0),
        Anchoring::Center => ("middle", bounds.center().x),
        Anchoring::TopRightCorner | Anchoring::BottomRightCorner => ("end", bounds.x1),
    };
    // Lines are laid out from the top of the measured bounds; the heuristic line height is
    // one font size.
    let mut y = bounds.y0;
    for line in text.split('\n') {
        let _ = write!(
            out,
            r#"<text x="{x}" y="{y}" text-anchor="{anchor}" dominant-baseline="hanging""#
        );
        write_font(out, style);
        write_paint_attr(out, "fill", fill);
        out.push('>');
        out.push_str(&escape_xml(line));
        out.push_str("</text>\n");
        y += style.font_size + line_spacing;
    }
}

fn write_font(out: &mut String, style: &TextStyle) {
    let _ = write!(
        out,
        r#" font-family="{}" font-size="{}" font-weight="{}""#,
        style.font_family.as_css_family(),
        style.font_size,
        style.font_weight.0
    );
    match style.font_style {
        FontStyle::Normal => {}
        FontStyle::Italic => out.push_str(r#" font-style="italic""#),
        FontStyle::Oblique => out.push_str(r#" font-style="oblique""#),
    }
}

fn points_attr(points: &[Point]) -> String {
    let mut s = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{},{}", p.x, p.y);
    }
    s
}

fn write_stroke(out: &mut String, stroke: &StrokeStyle) {
    write_paint_attr(out, "stroke", &stroke.brush);
    let _ = write!(out, r#" stroke-width="{}""#, stroke.stroke_width);
    if stroke.is_dashed() {
        let dash: Vec<String> = stroke.dash.iter().map(f64::to_string).collect();
        let _ = write!(out, r#" stroke-dasharray="{}""#, dash.join(" "));
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use plotwise_graph::{DrawableRole, IdAllocator};

    use super::*;

    #[test]
    fn rotated_text_keeps_its_lines() {
        let mut ids = IdAllocator::default();
        let label = Drawable::new(
            ids.next_id(),
            DrawableRole::Annotation,
            0,
            Primitive::Text {
                text: "High\nSchool".into(),
                origin: Point::new(50.0, 40.0),
                anchoring: Anchoring::Center,
                style: TextStyle::new(10.0),
                fill: Brush::Solid(peniko::color::palette::css::BLACK),
                angle: 90.0,
                line_spacing: 1.0,
                bounds: Rect::new(39.5, 10.0, 60.5, 70.0),
            },
        );
        let svg = render(&[label], Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(
            svg.contains(r#"<g transform="rotate(-90 50 40)">"#),
            "{svg}"
        );
        assert_eq!(svg.matches("<text").count(), 2, "{svg}");
        // Two 10px lines and a 1px gap, centered on the origin.
        assert!(svg.contains(r#"y="29.5""#), "{svg}");
        assert!(svg.contains(r#"y="40.5""#), "{svg}");
    }
}
