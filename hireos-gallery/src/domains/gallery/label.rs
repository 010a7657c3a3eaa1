//! Caption label rasterization
//!
//! Renders a card's title and caption into an RGBA bitmap with `fontdue`.
//! The title uses the configured font and colour; the caption sits below it
//! at 60% size, sheared into an oblique face, in translucent white.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fontdue::{Font, FontSettings};

use super::config::{FontSpec, Rgba};
use crate::infra::constants::label as cfg;

/// Largest bitmap edge we are willing to allocate and upload.
pub const MAX_SURFACE_EDGE: u32 = 8192;

/// Bundled face used when no installed font matches (DejaVu Sans Bold).
const EMBEDDED_FONT: &[u8] =
    include_bytes!("../../../assets/fonts/DejaVuSans-Bold.ttf");

static NEXT_LABEL_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("font could not be parsed: {0}")]
    FontParse(String),
    #[error("cannot allocate a {width}x{height} label surface")]
    EmptySurface { width: u32, height: u32 },
}

/// Straight-alpha RGBA8 label image.
#[derive(Debug, Clone)]
pub struct LabelBitmap {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl LabelBitmap {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Bitmap size for a title/caption pair: widest line plus horizontal
/// padding, by two stacked lines plus vertical padding.
pub fn label_dimensions(
    title_width: f32,
    caption_width: f32,
    font_size: f32,
) -> (u32, u32) {
    let width = title_width.max(caption_width).max(0.0).ceil() as u32
        + cfg::PADDING_X;
    let height = (font_size * cfg::HEIGHT_FACTOR).ceil().max(0.0) as u32
        + cfg::PADDING_Y;
    (width, height)
}

pub struct TextureLabelRenderer {
    font: Font,
    size_px: f32,
    color: Rgba,
}

impl std::fmt::Debug for TextureLabelRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureLabelRenderer")
            .field("font", &self.font.name())
            .field("size_px", &self.size_px)
            .field("color", &self.color)
            .finish()
    }
}

impl TextureLabelRenderer {
    pub fn new(font: Font, size_px: f32, color: Rgba) -> Self {
        Self {
            font,
            size_px,
            color,
        }
    }

    /// Locate and parse the font `spec` describes. Only a font that fails
    /// to parse is an error; a missing family uses the bundled face.
    pub fn from_spec(spec: &FontSpec, color: Rgba) -> Result<Self, LabelError> {
        let font = parse_font(load_font_bytes(spec), spec.size_px)?;
        Ok(Self::new(font, spec.size_px, color))
    }

    /// Renderer using the bundled face.
    pub fn embedded(size_px: f32, color: Rgba) -> Result<Self, LabelError> {
        let font = parse_font(Cow::Borrowed(EMBEDDED_FONT), size_px)?;
        Ok(Self::new(font, size_px, color))
    }

    /// Width of `text` in pixels at `size`, kerning included.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            if let Some(prev) = previous {
                width +=
                    self.font.horizontal_kern(prev, ch, size).unwrap_or(0.0);
            }
            width += self.font.metrics(ch, size).advance_width;
            previous = Some(ch);
        }
        width
    }

    pub fn render(
        &self,
        text: &str,
        caption: &str,
    ) -> Result<LabelBitmap, LabelError> {
        let title_size = self.size_px;
        let caption_size = self.size_px * cfg::CAPTION_SCALE;
        let title_width = self.measure(text, title_size);
        let caption_width = self.measure(caption, caption_size);
        let (width, height) =
            label_dimensions(title_width, caption_width, title_size);

        if width == 0
            || height == 0
            || width > MAX_SURFACE_EDGE
            || height > MAX_SURFACE_EDGE
        {
            return Err(LabelError::EmptySurface { width, height });
        }

        let mut canvas = Canvas::new(width, height);
        let middle = height as f32 / 2.0;

        // Title: bottom of the em box sits LINE_OFFSET above the middle.
        let title_baseline = match self.font.horizontal_line_metrics(title_size)
        {
            Some(line) => middle - cfg::LINE_OFFSET + line.descent,
            None => middle - cfg::LINE_OFFSET,
        };
        self.draw_line(
            &mut canvas,
            text,
            title_size,
            (width as f32 - title_width) / 2.0,
            title_baseline,
            0.0,
            self.color,
        );

        // Caption: top of the em box sits LINE_OFFSET below the middle.
        let caption_baseline =
            match self.font.horizontal_line_metrics(caption_size) {
                Some(line) => middle + cfg::LINE_OFFSET + line.ascent,
                None => middle + cfg::LINE_OFFSET + caption_size,
            };
        let [r, g, b, a] = cfg::CAPTION_RGBA;
        self.draw_line(
            &mut canvas,
            caption,
            caption_size,
            (width as f32 - caption_width) / 2.0,
            caption_baseline,
            cfg::CAPTION_SHEAR,
            Rgba { r, g, b, a },
        );

        Ok(LabelBitmap {
            id: NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            pixels: canvas.into_rgba8(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        canvas: &mut Canvas,
        text: &str,
        size: f32,
        start_x: f32,
        baseline: f32,
        shear: f32,
        color: Rgba,
    ) {
        let mut pen = start_x;
        let mut previous = None;
        for ch in text.chars() {
            if let Some(prev) = previous {
                pen += self.font.horizontal_kern(prev, ch, size).unwrap_or(0.0);
            }
            let (metrics, coverage) = self.font.rasterize(ch, size);
            let left = pen + metrics.xmin as f32;
            let top = baseline - (metrics.height as i32 + metrics.ymin) as f32;

            for gy in 0..metrics.height {
                let y = top + gy as f32;
                // Rows above the baseline lean right.
                let lean = shear * (baseline - y);
                for gx in 0..metrics.width {
                    let value = coverage[gy * metrics.width + gx];
                    if value == 0 {
                        continue;
                    }
                    canvas.splat(
                        left + gx as f32 + lean,
                        y,
                        value as f32 / 255.0,
                        color,
                    );
                }
            }

            pen += metrics.advance_width;
            previous = Some(ch);
        }
    }
}

/// Straight-alpha float canvas with source-over compositing.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; (width * height) as usize],
        }
    }

    /// Deposit `coverage` at a fractional x, split between the two
    /// neighbouring columns.
    fn splat(&mut self, x: f32, y: f32, coverage: f32, color: Rgba) {
        let row = y.round();
        if row < 0.0 || row >= self.height as f32 {
            return;
        }
        let column = x.floor();
        let fraction = x - column;
        self.blend(column, row, coverage * (1.0 - fraction), color);
        self.blend(column + 1.0, row, coverage * fraction, color);
    }

    fn blend(&mut self, x: f32, y: f32, coverage: f32, color: Rgba) {
        if x < 0.0 || x >= self.width as f32 || coverage <= 0.0 {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        if let Some(dst) = self.pixels.get_mut(index) {
            *dst = blend_over(*dst, color, coverage);
        }
    }

    fn into_rgba8(self) -> Vec<u8> {
        self.pixels
            .into_iter()
            .flat_map(|px| {
                px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
            })
            .collect()
    }
}

/// Composite `color` at `coverage` over a straight-alpha pixel.
pub fn blend_over(dst: [f32; 4], color: Rgba, coverage: f32) -> [f32; 4] {
    let src_a = color.a * coverage.clamp(0.0, 1.0);
    let dst_a = dst[3];
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= f32::EPSILON {
        return [0.0; 4];
    }
    let mix = |s: f32, d: f32| (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
    [
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        out_a,
    ]
}

fn parse_font(
    bytes: Cow<'static, [u8]>,
    size_px: f32,
) -> Result<Font, LabelError> {
    Font::from_bytes(
        bytes,
        FontSettings {
            scale: size_px,
            ..FontSettings::default()
        },
    )
    .map_err(|e| LabelError::FontParse(e.to_string()))
}

/// Read the pinned file, then the best system match, then the bundled face.
fn load_font_bytes(spec: &FontSpec) -> Cow<'static, [u8]> {
    if let Some(path) = &spec.path {
        match std::fs::read(path) {
            Ok(bytes) => {
                log::debug!("Label font pinned to {}", path.display());
                return Cow::Owned(bytes);
            }
            Err(e) => log::warn!(
                "Label font {} unreadable ({e}); looking up `{}`",
                path.display(),
                spec.family
            ),
        }
    }

    if let Some(path) = find_system_font(&spec.family, spec.bold) {
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::debug!(
                    "Label font for `{}`: {}",
                    spec.shorthand(),
                    path.display()
                );
                return Cow::Owned(bytes);
            }
            Err(e) => {
                log::warn!("Label font {} unreadable: {e}", path.display())
            }
        }
    }

    log::debug!("Label font for `{}`: bundled face", spec.shorthand());
    Cow::Borrowed(EMBEDDED_FONT)
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        dirs.push(dir);
    }
    if let Some(dir) = dirs::data_local_dir() {
        dirs.push(dir.join("fonts"));
    }
    for fixed in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/System/Library/Fonts",
        "/Library/Fonts",
        "C:\\Windows\\Fonts",
    ] {
        dirs.push(PathBuf::from(fixed));
    }
    dirs
}

const SANS_SERIF: &[&str] = &[
    "dejavusans",
    "liberationsans",
    "notosans",
    "arial",
    "helvetica",
    "roboto",
    "opensans",
];
const SERIF: &[&str] =
    &["dejavuserif", "liberationserif", "notoserif", "times"];
const MONOSPACE: &[&str] = &[
    "dejavusansmono",
    "liberationmono",
    "notosansmono",
    "couriernew",
    "menlo",
];

/// File-name prefixes to try for a CSS family, most preferred first. A named
/// family that is not installed falls through to the sans-serif faces.
fn family_candidates(family: &str) -> Vec<String> {
    let generic = match family.to_ascii_lowercase().as_str() {
        "sans-serif" | "system-ui" => SANS_SERIF,
        "serif" => SERIF,
        "monospace" => MONOSPACE,
        _ => {
            return std::iter::once(normalize_name(family))
                .chain(SANS_SERIF.iter().map(|s| s.to_string()))
                .collect();
        }
    };
    generic.iter().map(|s| s.to_string()).collect()
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn collect_font_files(root: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth > 0 {
                collect_font_files(&path, depth - 1, out);
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf")
            })
        {
            out.push(path);
        }
    }
}

/// Choose the best file among `files` for `family`/`bold`.
pub fn pick_font(
    files: &[PathBuf],
    family: &str,
    bold: bool,
) -> Option<PathBuf> {
    for candidate in family_candidates(family) {
        let mut best: Option<(i32, &PathBuf)> = None;
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let stem = normalize_name(stem);
            let Some(rest) = stem.strip_prefix(&candidate) else {
                continue;
            };
            let mut score = 0;
            if rest.contains("bold") == bold {
                score += 4;
            }
            if rest.contains("italic") || rest.contains("oblique") {
                score -= 3;
            }
            // Prefer plain faces over condensed/extra-light variants.
            score -= rest.len() as i32 / 6;
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, path));
            }
        }
        if let Some((_, path)) = best {
            return Some(path.clone());
        }
    }
    None
}

fn find_system_font(family: &str, bold: bool) -> Option<PathBuf> {
    let mut files = Vec::new();
    for dir in font_dirs() {
        collect_font_files(&dir, 4, &mut files);
    }
    files.sort();
    pick_font(&files, family, bold)
}
