use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::graphics::{HEIGHT, WIDTH};

/// Display is used by the interpreter to put the pixel grid on a screen. It
/// should abstract the implementation details, so a variety of kinds of screen
/// would work.
pub trait Display {
    /// draw one byte per pixel (0 or 1), row-major, `WIDTH * HEIGHT` long
    fn draw(&mut self, pixels: &[u8]) -> Result<(), io::Error>;
}

/// any `FnMut(&[u8])` can act as a display
impl<F> Display for F
where
    F: FnMut(&[u8]) -> Result<(), io::Error>,
{
    fn draw(&mut self, pixels: &[u8]) -> Result<(), io::Error> {
        self(pixels)
    }
}

// store useful metadata about the terminal
#[derive(Clone, Copy)]
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel whose value is `value`; y grows
    /// downward on the machine but upward on the canvas
    fn points_with_value<'a>(
        &self,
        data: &'a [u8],
        value: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                if data[count] == value {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(WIDTH, HEIGHT),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, pixels: &[u8]) -> Result<(), io::Error> {
        if pixels.len() != self.resolution.pixel_count() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "MonoTermDisplay needs {} pixels to draw, got {}",
                    self.resolution.pixel_count(),
                    pixels.len()
                ),
            ));
        }
        let resolution = self.resolution;

        // one terminal cell per pixel, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &resolution.points_with_value(pixels, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for headless runs and for testing non-display routines
pub struct NullDisplay;

impl Display for NullDisplay {
    fn draw(&mut self, _pixels: &[u8]) -> Result<(), io::Error> {
        Ok(())
    }
}
