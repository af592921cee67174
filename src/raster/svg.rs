use std::{
    fmt::Write as _,
    sync::{Arc, OnceLock},
};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::Canvas,
    foundation::error::{GifCanvasError, GifCanvasResult},
    overlay::composite::unpremultiply,
};

/// Drawing defaults applied when a primitive's style leaves an attribute unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushStyle {
    /// Stroke colour for shapes and fill colour for text.
    pub colour: String,
    pub font_name: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// `normal`, `bold`, `bolder`, `lighter` or a numeric weight.
    pub font_weight: String,
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            colour: "#000000".to_string(),
            font_name: "sans".to_string(),
            font_size: 20.0,
            font_weight: "normal".to_string(),
        }
    }
}

impl BrushStyle {
    /// Shape attributes: brush-coloured 4px stroke, no fill.
    pub fn shape_defaults(&self) -> SvgStyle {
        SvgStyle::new()
            .with("stroke", &self.colour)
            .with("fill", "none")
            .with("strokeWidth", "4px")
    }

    /// Text attributes: brush font, filled with the brush colour.
    pub fn text_defaults(&self) -> SvgStyle {
        SvgStyle::new()
            .with("fontFamily", &self.font_name)
            .with("fontWeight", &self.font_weight)
            .with("fontSize", format!("{}px", self.font_size))
            .with("fill", &self.colour)
    }
}

/// Outline drawn around an image or embedded sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    /// Defaults to the brush colour.
    pub colour: Option<String>,
    /// Stroke width in pixels, default 4.
    pub thickness: Option<f32>,
}

impl Border {
    pub const DEFAULT_THICKNESS: f32 = 4.0;

    /// Markup for a border around the `width` x `height` box at `(x, y)`.
    ///
    /// Round borders trace the circle of radius `width / 2` centred on the box; square ones
    /// trace the box grown by half the thickness on every side.
    #[allow(clippy::too_many_arguments)]
    pub fn markup(
        &self,
        canvas: Canvas,
        brush: &BrushStyle,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        round: bool,
    ) -> String {
        let t = self.thickness.unwrap_or(Self::DEFAULT_THICKNESS);
        let pen = BrushStyle {
            colour: self.colour.clone().unwrap_or_else(|| brush.colour.clone()),
            ..brush.clone()
        };
        let style = pen
            .shape_defaults()
            .merged(&SvgStyle::new().with("strokeWidth", format!("{t}px")));
        if round {
            circle_markup(canvas, x + width / 2.0, y + height / 2.0, width / 2.0, &style)
        } else {
            rect_markup(canvas, x - t / 2.0, y - t / 2.0, width + t, height + t, &style)
        }
    }
}

/// Ordered SVG presentation attributes.
///
/// Names may be given in camelCase (`strokeWidth`) and are stored in their SVG kebab-case
/// form (`stroke-width`). Setting a name twice replaces the value but keeps its position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgStyle {
    attrs: Vec<(String, String)>,
}

impl SvgStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = kebab_case(name);
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = kebab_case(name);
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// `self` with every attribute of `overrides` applied on top.
    pub fn merged(mut self, overrides: &SvgStyle) -> Self {
        for (k, v) in &overrides.attrs {
            self.set(k, v.clone());
        }
        self
    }

    /// Render as ` name="value"` pairs, values escaped.
    pub fn to_attributes(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.attrs {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{k}=\"{}\"", escape_xml(v));
        }
        out
    }
}

/// `fontFamily` -> `font-family`. Names already in kebab-case pass through.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn document(width: u32, height: u32, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">{body}</svg>"#
    )
}

pub fn text_markup(canvas: Canvas, text: &str, x: f32, y: f32, style: &SvgStyle) -> String {
    document(
        canvas.width,
        canvas.height,
        &format!(
            r#"<text x="{x}px" y="{y}px" {}>{}</text>"#,
            style.to_attributes(),
            escape_xml(text)
        ),
    )
}

pub fn rect_markup(
    canvas: Canvas,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    style: &SvgStyle,
) -> String {
    document(
        canvas.width,
        canvas.height,
        &format!(
            r#"<rect width="{width}px" height="{height}px" x="{x}px" y="{y}px" {} />"#,
            style.to_attributes()
        ),
    )
}

pub fn circle_markup(canvas: Canvas, cx: f32, cy: f32, r: f32, style: &SvgStyle) -> String {
    document(
        canvas.width,
        canvas.height,
        &format!(
            r#"<circle cx="{cx}px" cy="{cy}px" r="{r}px" {} />"#,
            style.to_attributes()
        ),
    )
}

/// Opaque ellipse inscribed in a `width` x `height` box, used as a dest-in mask.
pub fn ellipse_mask_markup(width: u32, height: u32) -> String {
    document(
        width,
        height,
        &format!(r#"<rect x="0" y="0" width="{width}" height="{height}" rx="{width}" ry="{height}" />"#),
    )
}

/// Rasterize SVG markup onto a transparent `width` x `height` plane (straight alpha).
#[tracing::instrument(skip(markup), fields(len = markup.len()))]
pub fn rasterize(markup: &str, width: u32, height: u32) -> GifCanvasResult<RgbaImage> {
    let opts = usvg::Options {
        fontdb: svg_fontdb(),
        font_resolver: make_svg_font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(markup, &opts)
        .map_err(|e| GifCanvasError::raster(format!("parse svg markup: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        GifCanvasError::raster(format!("failed to allocate {width}x{height} svg pixmap"))
    })?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let mut data = pixmap.take();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
    }
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| GifCanvasError::raster("svg pixmap does not match requested size"))
}

fn svg_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

fn make_svg_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    // "sans" is the brush default and not a CSS generic
                    usvg::FontFamily::Named(s) if s.eq_ignore_ascii_case("sans") => {
                        usvg::fontdb::Family::SansSerif
                    }
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/svg.rs"]
mod tests;
