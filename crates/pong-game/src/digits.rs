//! Score digits drawn as 3x5 blocks of rectangles.
//!
//! No font involved: the scoreboard stays visible even when no TTF could be
//! loaded, and the chunky look fits the field.

use pong_engine::coords::{ColorRgba, Vec2};
use pong_engine::render::Renderer;

const DIGIT_WIDTH: usize = 3;
const DIGIT_HEIGHT: usize = 5;

/// Row-major 3x5 bitmaps, top row first.
const DIGITS: [[u8; DIGIT_WIDTH * DIGIT_HEIGHT]; 10] = [
    // 0
    [
        1, 1, 1, //
        1, 0, 1, //
        1, 0, 1, //
        1, 0, 1, //
        1, 1, 1,
    ],
    // 1
    [
        0, 1, 1, //
        0, 0, 1, //
        0, 0, 1, //
        0, 0, 1, //
        0, 0, 1,
    ],
    // 2
    [
        1, 1, 1, //
        0, 0, 1, //
        1, 1, 1, //
        1, 0, 0, //
        1, 1, 1,
    ],
    // 3
    [
        1, 1, 1, //
        0, 0, 1, //
        1, 1, 1, //
        0, 0, 1, //
        1, 1, 1,
    ],
    // 4
    [
        1, 0, 1, //
        1, 0, 1, //
        1, 1, 1, //
        0, 0, 1, //
        0, 0, 1,
    ],
    // 5
    [
        1, 1, 1, //
        1, 0, 0, //
        1, 1, 1, //
        0, 0, 1, //
        1, 1, 1,
    ],
    // 6
    [
        1, 1, 1, //
        1, 0, 0, //
        1, 1, 1, //
        1, 0, 1, //
        1, 1, 1,
    ],
    // 7
    [
        1, 1, 1, //
        0, 0, 1, //
        0, 1, 0, //
        0, 1, 0, //
        0, 1, 0,
    ],
    // 8
    [
        1, 1, 1, //
        1, 0, 1, //
        1, 1, 1, //
        1, 0, 1, //
        1, 1, 1,
    ],
    // 9
    [
        1, 1, 1, //
        1, 0, 1, //
        1, 1, 1, //
        0, 0, 1, //
        0, 0, 1,
    ],
];

/// Lit-cell rectangles for one digit, as `(position, size)` pairs in world
/// space. `position` is the digit's min corner; rows stack upward from it
/// since world +Y is up while the bitmaps read top-down.
fn cell_rects(digit: u32, position: Vec2, size: Vec2) -> impl Iterator<Item = (Vec2, Vec2)> {
    assert!(digit < 10, "not a single digit: {digit}");

    let cell_w = size.x / DIGIT_WIDTH as f32;
    let cell_h = size.y / DIGIT_HEIGHT as f32;
    let bitmap = DIGITS[digit as usize];

    (0..DIGIT_HEIGHT).flat_map(move |y| {
        (0..DIGIT_WIDTH).filter_map(move |x| {
            if bitmap[y * DIGIT_WIDTH + x] == 0 {
                return None;
            }
            let cell = position
                + Vec2::new(cell_w * x as f32, size.y - cell_h * (y + 1) as f32);
            Some((cell, Vec2::new(cell_w, cell_h)))
        })
    })
}

/// Draws `digit` as filled cells in the current coordinate space.
pub fn draw_digit(
    renderer: &mut Renderer,
    digit: u32,
    position: Vec2,
    size: Vec2,
    color: ColorRgba,
) {
    for (cell_pos, cell_size) in cell_rects(digit, position, size) {
        renderer.draw_rectangle(cell_pos, cell_size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_count(digit: u32) -> usize {
        cell_rects(digit, Vec2::ZERO, Vec2::new(24.0, 40.0)).count()
    }

    #[test]
    fn every_digit_has_a_plausible_cell_count() {
        let expected = [12, 6, 11, 11, 9, 11, 12, 7, 13, 10];
        for (digit, want) in expected.iter().enumerate() {
            assert_eq!(lit_count(digit as u32), *want, "digit {digit}");
        }
    }

    #[test]
    fn top_row_of_seven_sits_at_the_top() {
        // Bitmap row 0 must land at the highest Y band (world is +Y up).
        let cells: Vec<_> = cell_rects(7, Vec2::ZERO, Vec2::new(24.0, 40.0)).collect();
        let max_y = cells.iter().map(|(p, _)| p.y).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 40.0 - 8.0);

        // Seven's top row is fully lit: three cells share that band.
        let top_cells = cells.iter().filter(|(p, _)| p.y == max_y).count();
        assert_eq!(top_cells, 3);
    }

    #[test]
    #[should_panic(expected = "not a single digit")]
    fn rejects_multi_digit_values() {
        let _ = cell_rects(10, Vec2::ZERO, Vec2::splat(1.0)).count();
    }

    #[test]
    fn cells_tile_the_digit_box() {
        for (pos, size) in cell_rects(8, Vec2::new(10.0, 20.0), Vec2::new(24.0, 40.0)) {
            assert_eq!(size, Vec2::new(8.0, 8.0));
            assert!(pos.x >= 10.0 && pos.x + size.x <= 10.0 + 24.0);
            assert!(pos.y >= 20.0 && pos.y + size.y <= 20.0 + 40.0);
        }
    }
}
