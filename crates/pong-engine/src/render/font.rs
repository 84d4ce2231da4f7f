use std::fmt;

use crate::coords::Vec2;

use super::batch::UvRegion;

/// Atlas side length in pixels. One single-channel page holds every baked
/// glyph; at game font sizes the packing never comes close to filling it.
pub const ATLAS_SIZE: u32 = 1024;

/// First baked character code (space).
const FIRST_CHAR: u32 = 32;
/// Number of baked characters: printable ASCII 32..127.
const GLYPH_COUNT: u32 = 95;

/// Pixels left empty between glyphs in the atlas, against sampler bleed.
const GLYPH_PADDING: u32 = 1;

/// Error returned by [`FontAtlas::bake`].
#[derive(Debug, Clone)]
pub struct FontError(pub String);

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font error: {}", self.0)
    }
}

impl std::error::Error for FontError {}

/// Horizontal alignment of a whole text run around its anchor.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Layout data for one baked glyph.
///
/// The atlas box is in atlas pixel coordinates; `offset` is the pen-relative
/// draw position of the box's top-left corner (Y down from the baseline).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub advance: f32,
    pub offset: Vec2,
}

impl GlyphMetrics {
    #[inline]
    fn width(&self) -> f32 {
        (self.x1 - self.x0) as f32
    }

    #[inline]
    fn height(&self) -> f32 {
        (self.y1 - self.y0) as f32
    }

    #[inline]
    fn uv(&self) -> UvRegion {
        let s = ATLAS_SIZE as f32;
        UvRegion::new(
            self.x0 as f32 / s,
            self.y0 as f32 / s,
            self.x1 as f32 / s,
            self.y1 as f32 / s,
        )
    }
}

/// One glyph's placement produced by [`FontAtlas::layout`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub position: Vec2,
    pub size: Vec2,
    pub uv: UvRegion,
}

/// Baked bitmap font: a single atlas page plus per-character metrics.
///
/// Baked once at load time from TTF/OTF bytes; read-only afterwards. At most
/// one font is resident per renderer; loading another replaces the whole
/// atlas/metrics pair.
pub struct FontAtlas {
    pixels: Vec<u8>,
    glyphs: Vec<GlyphMetrics>,
    px_size: f32,
}

impl FontAtlas {
    /// Rasterizes printable ASCII (codes 32..127) at `px_size` into a fresh
    /// atlas page.
    ///
    /// Glyphs are shelf-packed left to right, wrapping to a new row when the
    /// current one is exhausted.
    pub fn bake(bytes: &[u8], px_size: f32) -> Result<Self, FontError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontError(e.to_string()))?;

        let mut pixels = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
        let mut glyphs = Vec::with_capacity(GLYPH_COUNT as usize);

        let mut cursor_x = GLYPH_PADDING;
        let mut cursor_y = GLYPH_PADDING;
        let mut row_height = 0u32;

        for code in FIRST_CHAR..FIRST_CHAR + GLYPH_COUNT {
            let ch = char::from_u32(code).expect("printable ASCII is valid char");
            let (metrics, bitmap) = font.rasterize(ch, px_size);
            let (w, h) = (metrics.width as u32, metrics.height as u32);

            if cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
                cursor_y += row_height + GLYPH_PADDING;
                cursor_x = GLYPH_PADDING;
                row_height = 0;
            }
            if cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
                return Err(FontError(format!(
                    "glyph atlas overflow at {px_size}px (char {ch:?})"
                )));
            }

            for row in 0..h {
                let src = (row * w) as usize;
                let dst = ((cursor_y + row) * ATLAS_SIZE + cursor_x) as usize;
                pixels[dst..dst + w as usize]
                    .copy_from_slice(&bitmap[src..src + w as usize]);
            }

            glyphs.push(GlyphMetrics {
                x0: cursor_x,
                y0: cursor_y,
                x1: cursor_x + w,
                y1: cursor_y + h,
                advance: metrics.advance_width,
                // fontdue reports the box bottom relative to the baseline,
                // Y up; convert to a Y-down top-left pen offset.
                offset: Vec2::new(
                    metrics.xmin as f32,
                    -(metrics.height as f32 + metrics.ymin as f32),
                ),
            });

            cursor_x += w + GLYPH_PADDING;
            row_height = row_height.max(h);
        }

        Ok(Self { pixels, glyphs, px_size })
    }

    /// The atlas page as tightly packed 8-bit coverage rows.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel size the atlas was baked at.
    #[inline]
    pub fn px_size(&self) -> f32 {
        self.px_size
    }

    /// Metrics for one character.
    ///
    /// Panics for characters outside the baked range. There is no fallback
    /// glyph, and reaching this with arbitrary text is a caller bug.
    fn glyph(&self, ch: char) -> &GlyphMetrics {
        let index = (ch as u32)
            .checked_sub(FIRST_CHAR)
            .filter(|i| *i < GLYPH_COUNT)
            .unwrap_or_else(|| panic!("character {ch:?} is outside the baked glyph range"));
        &self.glyphs[index as usize]
    }

    /// Total advance width of `text` in pixels.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.glyph(ch).advance).sum()
    }

    /// Lays out `text` around the pixel-snapped `anchor`.
    ///
    /// The alignment correction is measured once for the whole run and
    /// applied uniformly; the per-glyph cursor then walks advances left to
    /// right. Glyphs with an empty atlas box (space) advance the cursor but
    /// yield no quad.
    pub fn layout<'s>(
        &'s self,
        anchor: Vec2,
        text: &'s str,
        align: TextAlign,
    ) -> impl Iterator<Item = GlyphQuad> + 's {
        let anchor = anchor.round();
        let shift = match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => self.measure(text) / 2.0,
            TextAlign::Right => self.measure(text),
        };

        let mut cursor = 0.0f32;
        text.chars().filter_map(move |ch| {
            let glyph = self.glyph(ch);
            let position = Vec2::new(
                anchor.x - shift + cursor + glyph.offset.x,
                anchor.y + glyph.offset.y,
            );
            cursor += glyph.advance;

            if glyph.x1 == glyph.x0 || glyph.y1 == glyph.y0 {
                return None;
            }
            Some(GlyphQuad {
                position,
                size: Vec2::new(glyph.width(), glyph.height()),
                uv: glyph.uv(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic atlas: glyph for code 32+i has advance `10 + i`, a 4x6 box
    /// at column `i * 8`, and a fixed (1, -6) pen offset. No rasterizer
    /// involved, so layout math is exact.
    fn test_atlas() -> FontAtlas {
        let glyphs = (0..GLYPH_COUNT)
            .map(|i| {
                let x0 = i * 8;
                GlyphMetrics {
                    x0,
                    y0: 0,
                    x1: x0 + 4,
                    y1: 6,
                    advance: (10 + i) as f32,
                    offset: Vec2::new(1.0, -6.0),
                }
            })
            .collect();
        FontAtlas {
            pixels: vec![0; (ATLAS_SIZE * ATLAS_SIZE) as usize],
            glyphs,
            px_size: 16.0,
        }
    }

    fn advance_of(atlas: &FontAtlas, ch: char) -> f32 {
        atlas.glyph(ch).advance
    }

    // ── measurement ───────────────────────────────────────────────────────

    #[test]
    fn measure_empty_is_zero() {
        assert_eq!(test_atlas().measure(""), 0.0);
    }

    #[test]
    fn measure_is_additive() {
        let atlas = test_atlas();
        let ab = atlas.measure("AB");
        assert_eq!(ab, advance_of(&atlas, 'A') + advance_of(&atlas, 'B'));
    }

    #[test]
    #[should_panic(expected = "outside the baked glyph range")]
    fn measure_rejects_unbaked_characters() {
        test_atlas().measure("ok\u{00e9}");
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn layout_snaps_anchor_to_pixels() {
        let atlas = test_atlas();
        let q: Vec<_> = atlas
            .layout(Vec2::new(10.4, 20.6), "A", TextAlign::Left)
            .collect();
        // anchor rounds to (10, 21); glyph offset is (1, -6).
        assert_eq!(q[0].position, Vec2::new(11.0, 15.0));
    }

    #[test]
    fn layout_walks_cursor_by_advances() {
        let atlas = test_atlas();
        let q: Vec<_> = atlas
            .layout(Vec2::ZERO, "AB", TextAlign::Left)
            .collect();
        let step = q[1].position.x - q[0].position.x;
        assert_eq!(step, advance_of(&atlas, 'A'));
    }

    #[test]
    fn center_equals_left_shifted_by_half_measure() {
        let atlas = test_atlas();
        let text = "X";
        let half = atlas.measure(text) / 2.0;

        let centered: Vec<_> = atlas
            .layout(Vec2::new(100.0, 50.0), text, TextAlign::Center)
            .collect();
        let left: Vec<_> = atlas
            .layout(Vec2::new(100.0 - half, 50.0), text, TextAlign::Left)
            .collect();

        assert_eq!(centered, left);
    }

    #[test]
    fn right_alignment_shifts_by_full_measure() {
        let atlas = test_atlas();
        let text = "AB";
        let w = atlas.measure(text);

        let right: Vec<_> = atlas
            .layout(Vec2::new(200.0, 0.0), text, TextAlign::Right)
            .collect();
        let left: Vec<_> = atlas
            .layout(Vec2::new(200.0 - w, 0.0), text, TextAlign::Left)
            .collect();

        assert_eq!(right, left);
    }

    #[test]
    fn alignment_shift_is_uniform_across_the_run() {
        let atlas = test_atlas();
        let left: Vec<_> = atlas.layout(Vec2::ZERO, "ABC", TextAlign::Left).collect();
        let centered: Vec<_> = atlas
            .layout(Vec2::ZERO, "ABC", TextAlign::Center)
            .collect();
        let shift = atlas.measure("ABC") / 2.0;

        for (l, c) in left.iter().zip(&centered) {
            assert_eq!(c.position.x, l.position.x - shift);
            assert_eq!(c.position.y, l.position.y);
        }
    }

    #[test]
    fn space_advances_without_emitting() {
        let mut atlas = test_atlas();
        // Give the space glyph an empty box, as a real bake does.
        atlas.glyphs[0].x1 = atlas.glyphs[0].x0;
        atlas.glyphs[0].y1 = atlas.glyphs[0].y0;

        let quads: Vec<_> = atlas.layout(Vec2::ZERO, "A B", TextAlign::Left).collect();
        assert_eq!(quads.len(), 2);

        let expected = advance_of(&atlas, 'A') + advance_of(&atlas, ' ');
        assert_eq!(quads[1].position.x - quads[0].position.x, expected);
    }

    #[test]
    fn uv_region_matches_atlas_box() {
        let atlas = test_atlas();
        let q: Vec<_> = atlas.layout(Vec2::ZERO, "!", TextAlign::Left).collect();
        let g = atlas.glyph('!');
        let s = ATLAS_SIZE as f32;
        assert_eq!(q[0].uv, UvRegion::new(
            g.x0 as f32 / s,
            g.y0 as f32 / s,
            g.x1 as f32 / s,
            g.y1 as f32 / s,
        ));
    }
}
