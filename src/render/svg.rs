//! Vector surface: SVG markup with paints and clip paths in `<defs>`.
//!
//! Each region becomes a `<clipPath>` holding its shapes plus one painted `<rect>` clipped by it.
//! Rotations are written as `rotate(deg cx cy)` transforms on the untouched primitives.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use kurbo::PathEl;

use crate::assets::OverlayImage;
use crate::assets::decode::png_data_uri;
use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::error::QrStyleResult;
use crate::paint::color::Color;
use crate::paint::gradient::{ColorStop, ResolvedPaint};
use crate::render::backend::{Backend, Region};
use crate::shapes::{FillRule, Primitive};

/// A finished SVG document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgDocument {
    /// Document width in pixels.
    pub width: u32,
    /// Document height in pixels.
    pub height: u32,
    markup: String,
}

impl SvgDocument {
    /// The serialized markup.
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    /// Take the serialized markup.
    pub fn into_string(self) -> String {
        self.markup
    }
}

impl std::fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.markup)
    }
}

struct OpenRegion {
    fill: Option<String>,
    bounds: Rect,
    clip_id: String,
}

struct OpenShape {
    attrs: String,
}

/// Builds an [`SvgDocument`].
pub struct SvgBackend {
    width: u32,
    height: u32,
    defs: String,
    body: String,
    paints: HashMap<String, ResolvedPaint>,
    region: Option<OpenRegion>,
    shape: Option<OpenShape>,
    overlay_href: Option<(Arc<Vec<u8>>, String)>,
}

impl std::fmt::Debug for SvgBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgBackend")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("paints", &self.paints.len())
            .finish()
    }
}

impl SvgBackend {
    /// Empty document of `width`×`height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            defs: String::new(),
            body: String::new(),
            paints: HashMap::new(),
            region: None,
            shape: None,
            overlay_href: None,
        }
    }

    fn fill_attrs(&self, name: &str) -> Option<String> {
        let paint = self.paints.get(name)?;
        Some(match paint {
            ResolvedPaint::Solid(color) => solid_fill(*color),
            ResolvedPaint::Linear { .. } | ResolvedPaint::Radial { .. } => {
                format!(" fill=\"url(#{})\"", escape_attr(name))
            }
        })
    }
}

impl Backend for SvgBackend {
    type Surface = SvgDocument;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn has_paint(&self, name: &str) -> bool {
        self.paints.contains_key(name)
    }

    fn define_paint(&mut self, name: &str, paint: &ResolvedPaint) {
        if self.paints.contains_key(name) {
            return;
        }
        let id = escape_attr(name);
        match paint {
            ResolvedPaint::Solid(_) => {}
            ResolvedPaint::Linear { start, end, stops } => {
                let _ = write!(
                    self.defs,
                    "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
                    fmt_num(start.x),
                    fmt_num(start.y),
                    fmt_num(end.x),
                    fmt_num(end.y)
                );
                write_stops(&mut self.defs, stops);
                self.defs.push_str("</linearGradient>");
            }
            ResolvedPaint::Radial {
                center,
                radius,
                stops,
            } => {
                let (cx, cy, r) = (fmt_num(center.x), fmt_num(center.y), fmt_num(*radius));
                let _ = write!(
                    self.defs,
                    "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" fx=\"{cx}\" fy=\"{cy}\" cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\">"
                );
                write_stops(&mut self.defs, stops);
                self.defs.push_str("</radialGradient>");
            }
        }
        self.paints.insert(name.to_owned(), paint.clone());
    }

    fn begin_region(&mut self, region: &Region<'_>) {
        let clip_id = escape_attr(&format!("clip-path-{}", region.name));
        let _ = write!(
            self.defs,
            "<clipPath id=\"{clip_id}\" clipPathUnits=\"userSpaceOnUse\">"
        );
        self.region = Some(OpenRegion {
            fill: region.paint.and_then(|name| self.fill_attrs(name)),
            bounds: region.bounds,
            clip_id,
        });
    }

    fn begin_shape(&mut self, center: Point, rotation: f64, fill_rule: FillRule) {
        let mut attrs = String::new();
        if rotation != 0.0 {
            let _ = write!(
                attrs,
                " transform=\"rotate({} {} {})\"",
                fmt_num(rotation.to_degrees()),
                fmt_num(center.x),
                fmt_num(center.y)
            );
        }
        if fill_rule == FillRule::EvenOdd {
            attrs.push_str(" clip-rule=\"evenodd\"");
        }
        self.shape = Some(OpenShape { attrs });
    }

    fn emit(&mut self, primitive: &Primitive) {
        let Some(shape) = &self.shape else {
            return;
        };
        let attrs = &shape.attrs;
        let _ = match primitive {
            Primitive::Rect(r) => write!(
                self.defs,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs}/>",
                fmt_num(r.x0),
                fmt_num(r.y0),
                fmt_num(r.width()),
                fmt_num(r.height())
            ),
            Primitive::Circle(c) => write!(
                self.defs,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{attrs}/>",
                fmt_num(c.center.x),
                fmt_num(c.center.y),
                fmt_num(c.radius)
            ),
            Primitive::Path(p) => write!(self.defs, "<path d=\"{}\"{attrs}/>", path_data(p)),
        };
    }

    fn end_shape(&mut self) {
        self.shape = None;
    }

    fn end_region(&mut self) {
        let Some(region) = self.region.take() else {
            return;
        };
        self.defs.push_str("</clipPath>");
        if let Some(fill) = region.fill {
            let b = region.bounds;
            let _ = write!(
                self.body,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" clip-path=\"url(#{})\"{fill}/>",
                fmt_num(b.x0),
                fmt_num(b.y0),
                fmt_num(b.width()),
                fmt_num(b.height()),
                region.clip_id
            );
        }
    }

    fn prepare_image(&mut self, image: &OverlayImage, dst: Rect) -> QrStyleResult<()> {
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }
        let href = image_href(image)?;
        self.overlay_href = Some((image.rgba8_premul.clone(), href));
        Ok(())
    }

    fn draw_image(&mut self, image: &OverlayImage, dst: Rect) -> QrStyleResult<()> {
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }
        let href = match self.overlay_href.take() {
            Some((source, href)) if Arc::ptr_eq(&source, &image.rgba8_premul) => href,
            _ => image_href(image)?,
        };
        let _ = write!(
            self.body,
            "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\"/>",
            escape_attr(&href),
            fmt_num(dst.x0),
            fmt_num(dst.y0),
            fmt_num(dst.width()),
            fmt_num(dst.height())
        );
        Ok(())
    }

    fn finish(self) -> QrStyleResult<SvgDocument> {
        let (width, height) = (self.width, self.height);
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        Ok(SvgDocument {
            width,
            height,
            markup: svg,
        })
    }
}

fn solid_fill(color: Color) -> String {
    if color.a == 255 {
        format!(" fill=\"{}\"", color.to_hex_rgb())
    } else {
        format!(
            " fill=\"{}\" fill-opacity=\"{}\"",
            color.to_hex_rgb(),
            fmt_num(color.opacity())
        )
    }
}

fn write_stops(out: &mut String, stops: &[ColorStop]) {
    for stop in stops {
        let _ = write!(
            out,
            "<stop offset=\"{}%\" stop-color=\"{}\"",
            fmt_num(stop.offset * 100.0),
            stop.color.to_hex_rgb()
        );
        if stop.color.a != 255 {
            let _ = write!(out, " stop-opacity=\"{}\"", fmt_num(stop.color.opacity()));
        }
        out.push_str("/>");
    }
}

fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        let _ = match *el {
            PathEl::MoveTo(p) => write!(d, "M{} {}", fmt_num(p.x), fmt_num(p.y)),
            PathEl::LineTo(p) => write!(d, "L{} {}", fmt_num(p.x), fmt_num(p.y)),
            PathEl::QuadTo(p1, p2) => write!(
                d,
                "Q{} {} {} {}",
                fmt_num(p1.x),
                fmt_num(p1.y),
                fmt_num(p2.x),
                fmt_num(p2.y)
            ),
            PathEl::CurveTo(p1, p2, p3) => write!(
                d,
                "C{} {} {} {} {} {}",
                fmt_num(p1.x),
                fmt_num(p1.y),
                fmt_num(p2.x),
                fmt_num(p2.y),
                fmt_num(p3.x),
                fmt_num(p3.y)
            ),
            PathEl::ClosePath => {
                d.push('Z');
                Ok(())
            }
        };
    }
    d
}

/// Integers print bare; everything else with up to four decimals.
fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let rounded = v.round();
    if (rounded - v).abs() < 1e-6 {
        // Avoid "-0".
        return format!("{}", rounded as i64);
    }
    let mut s = format!("{v:.4}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn image_href(image: &OverlayImage) -> QrStyleResult<String> {
    match &image.href {
        Some(href) => Ok(href.clone()),
        None => png_data_uri(image),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
