// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! The screen is a 64x32 monochrome raster, packed 8 pixels to a byte,
//! most significant bit leftmost. Coordinates wrap in both directions.

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;
/// Width of one row of the screen, in bytes
pub const ROW_BYTES: usize = WIDTH / 8;

/// A bit-packed monochrome framebuffer
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Screen {
    vram: [u8; ROW_BYTES * HEIGHT],
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Screen {
            vram: [0; ROW_BYTES * HEIGHT],
        }
    }

    /// Gets the byte index and bit mask of pixel (x, y), after wrapping
    #[inline(always)]
    fn locate(x: usize, y: usize) -> (usize, u8) {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        (x / 8 + y * ROW_BYTES, 0x80 >> (x % 8))
    }

    /// Gets the value of the pixel at (x, y), wrapping both coordinates.
    /// # Examples
    /// ```rust
    /// # use vip8::screen::Screen;
    /// let mut screen = Screen::new();
    /// screen.draw_row(62, 31, 0b1110_0000);
    /// assert_eq!(screen.get_pixel(62, 31), 1);
    /// assert_eq!(screen.get_pixel(63, 31), 1);
    /// // the third pixel wrapped around to the left edge
    /// assert_eq!(screen.get_pixel(0, 31), 1);
    /// assert_eq!(screen.get_pixel(64, 63), 1);
    /// ```
    pub fn get_pixel(&self, x: usize, y: usize) -> u8 {
        let (index, mask) = Self::locate(x, y);
        (self.vram[index] & mask != 0).into()
    }

    /// XORs one 8-pixel sprite row onto the screen, with its leftmost pixel at (x, y).
    ///
    /// The row is split across two bytes when `x` is not byte-aligned; the right
    /// half wraps to the start of the same line.
    ///
    /// Returns true if any set pixel was turned off.
    pub fn draw_row(&mut self, x: usize, y: usize, sprite: u8) -> bool {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        let line = y * ROW_BYTES;
        let shift = x % 8;
        let left = line + x / 8;
        let right = line + (x / 8 + 1) % ROW_BYTES;

        let mut collided = self.vram[left] & (sprite >> shift) != 0;
        self.vram[left] ^= sprite >> shift;
        if shift != 0 {
            let spill = sprite << (8 - shift);
            collided |= self.vram[right] & spill != 0;
            self.vram[right] ^= spill;
        }
        collided
    }

    /// Draws each byte of `sprite` as a row, starting at (x, y) and moving down.
    ///
    /// Returns true if any row collided.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        sprite
            .iter()
            .enumerate()
            .fold(false, |collided, (line, &row)| {
                self.draw_row(x, y + line, row) | collided
            })
    }

    /// Clears the screen to all 0s
    pub fn clear(&mut self) {
        self.vram.fill(0);
    }

    /// Gets the packed screen memory, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.vram
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Screen")
            .field("lit", &self.vram.iter().map(|b| b.count_ones()).sum::<u32>())
            .finish()
    }
}

impl Display for Screen {
    /// Draws the screen with half-height block characters, two pixel rows per line
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for y in (0..HEIGHT).step_by(2) {
            for x in 0..WIDTH {
                let glyph = match (self.get_pixel(x, y), self.get_pixel(x, y + 1)) {
                    (0, 0) => ' ',
                    (1, 0) => '▀',
                    (0, _) => '▄',
                    _ => '█',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
