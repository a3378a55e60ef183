use std::io;

use crate::display::Display;

pub const WIDTH: usize = 64; // pixels
pub const HEIGHT: usize = 32; // pixels

/// sprites are one byte wide
const SPRITE_WIDTH: usize = 8;

/// The 64x32 monochrome pixel grid, one byte (0 or 1) per pixel, row-major.
pub struct Graphics {
    pixels: [u8; WIDTH * HEIGHT],
}

impl Graphics {
    pub fn new() -> Self {
        Graphics {
            pixels: [0; WIDTH * HEIGHT],
        }
    }

    /// XOR `sprite` (one row per byte, msb leftmost) onto the grid with its top
    /// left corner at (`x`, `y`). Coordinates are first reduced onto the grid,
    /// then each pixel that runs off an edge wraps around once.
    ///
    /// Returns true if any pixel inside the sprite's 8-wide box was already set.
    pub fn write_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let x0 = x as usize % WIDTH;
        let y0 = y as usize % HEIGHT;
        let mut collision = false;

        for (yl, row) in sprite.iter().enumerate() {
            let mut yp = y0 + yl;
            if yp >= HEIGHT {
                yp -= HEIGHT;
            }

            for xl in 0..SPRITE_WIDTH {
                let on = row & (0x80 >> xl) != 0;

                let mut xp = x0 + xl;
                if xp >= WIDTH {
                    xp -= WIDTH;
                }

                if self.set(xp, yp, on) {
                    collision = true;
                }
            }
        }

        collision
    }

    /// XOR a single pixel. Reports a collision whenever the pixel was set
    /// beforehand, whatever `on` is.
    pub fn set(&mut self, x: usize, y: usize, on: bool) -> bool {
        let a = y * WIDTH + x;
        let collision = self.pixels[a] == 0x01;
        self.pixels[a] ^= on as u8;
        collision
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y * WIDTH + x] == 0x01
    }

    pub fn clear(&mut self) {
        self.each_pixel(|pixel| *pixel = 0);
    }

    /// hand the current grid to `display`
    pub fn render(&self, display: &mut dyn Display) -> Result<(), io::Error> {
        display.draw(&self.pixels)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// visits every one of the `WIDTH * HEIGHT` cells
    fn each_pixel(&mut self, mut f: impl FnMut(&mut u8)) {
        for row in self.pixels.chunks_exact_mut(WIDTH) {
            row.iter_mut().for_each(&mut f);
        }
    }
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}
