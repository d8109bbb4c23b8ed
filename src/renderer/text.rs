//! Font loading and glyph caching
//!
//! Each (font, character, pixel size) rasterizes once through fontdue; the
//! coverage bitmap uploads as its own texture and the cached glyph carries
//! the metrics needed to advance the pen. Glyph quads flow through the
//! sprite batch like any other texture.

use glam::Vec2;
use rustc_hash::FxHashMap;
use std::path::Path;

use super::batch::SpriteBatch;

/// A loaded font face
pub struct Font {
    /// Registry name of the font
    pub name: String,
    inner: fontdue::Font,
}

impl Font {
    /// Parse a font face from raw bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the face cannot be parsed
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, FontError> {
        let inner = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontError::Face(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            inner,
        })
    }

    /// Load a font face from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|e| FontError::Io(e.to_string()))?;
        Self::from_bytes(name, &bytes)
    }

    /// Rasterize one character at a pixel size
    #[must_use]
    pub fn rasterize(&self, ch: char, size: f32) -> (fontdue::Metrics, Vec<u8>) {
        self.inner.rasterize(ch, size)
    }

    /// Advance width of a character without rasterizing
    #[must_use]
    pub fn advance(&self, ch: char, size: f32) -> f32 {
        self.inner.metrics(ch, size).advance_width
    }

    /// Line height at a pixel size
    #[must_use]
    pub fn line_height(&self, size: f32) -> f32 {
        self.inner
            .horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size)
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("name", &self.name).finish()
    }
}

/// Errors from font loading
#[derive(Debug, Clone)]
pub enum FontError {
    /// IO error reading the file
    Io(String),
    /// The face could not be parsed
    Face(String),
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Face(e) => write!(f, "Font face error: {e}"),
        }
    }
}

impl std::error::Error for FontError {}

/// A cached, uploaded glyph
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Texture id of the uploaded coverage bitmap; zero for empty glyphs
    pub texture: u64,
    pub width: f32,
    pub height: f32,
    /// Horizontal bearing from the pen position
    pub xmin: f32,
    /// Vertical bearing from the baseline
    pub ymin: f32,
    /// Pen advance after this glyph
    pub advance: f32,
}

/// Per-character glyph texture cache
#[derive(Debug, Default)]
pub struct GlyphCache {
    glyphs: FxHashMap<(String, char, u32), Glyph>,
}

impl GlyphCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached glyphs
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Fetch a glyph, rasterizing and uploading through `upload` on the
    /// first request. `upload` receives the coverage bitmap and its
    /// dimensions and returns the texture id it registered.
    pub fn glyph(
        &mut self,
        font: &Font,
        ch: char,
        size: f32,
        upload: &mut dyn FnMut(&[u8], (u32, u32)) -> u64,
    ) -> Glyph {
        let key = (font.name.clone(), ch, size.round() as u32);
        if let Some(glyph) = self.glyphs.get(&key) {
            return *glyph;
        }

        let (metrics, coverage) = font.rasterize(ch, size);
        let texture = if metrics.width == 0 || metrics.height == 0 {
            0
        } else {
            upload(&coverage, (metrics.width as u32, metrics.height as u32))
        };
        let glyph = Glyph {
            texture,
            width: metrics.width as f32,
            height: metrics.height as f32,
            xmin: metrics.xmin as f32,
            ymin: metrics.ymin as f32,
            advance: metrics.advance_width,
        };
        self.glyphs.insert(key, glyph);
        glyph
    }
}

/// Push a run of glyph quads at `origin` (baseline-left), advancing the pen
/// by glyph metrics. Returns the final pen offset.
#[allow(clippy::too_many_arguments)]
pub fn queue_text(
    batch: &mut SpriteBatch,
    cache: &mut GlyphCache,
    font: &Font,
    text: &str,
    origin: Vec2,
    size: f32,
    color: [f32; 4],
    upload: &mut dyn FnMut(&[u8], (u32, u32)) -> u64,
) -> f32 {
    let mut pen = 0.0;
    for ch in text.chars() {
        let glyph = cache.glyph(font, ch, size, upload);
        if glyph.texture != 0 {
            let center = origin
                + Vec2::new(
                    pen + glyph.xmin + glyph.width * 0.5,
                    glyph.ymin + glyph.height * 0.5,
                );
            batch.quad(
                glyph.texture,
                center,
                Vec2::new(glyph.width, glyph.height),
                0.0,
                [0.0, 0.0],
                [1.0, 1.0],
                color,
            );
        }
        pen += glyph.advance;
    }
    pen
}

/// Width of a text run without queueing it
#[must_use]
pub fn measure(font: &Font, text: &str, size: f32) -> f32 {
    text.chars().map(|ch| font.advance(ch, size)).sum()
}
