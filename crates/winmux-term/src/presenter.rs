#![forbid(unsafe_code)]

//! Half-block blitter.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use winmux_backend::Presenter;
use winmux_core::geometry::Rect;
use winmux_render::{PixelBuffer, Rgba};

const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Writes pixels to a terminal as upper-half-block cells.
///
/// Keeps a shadow copy of the whole frame: a blitted region may start or end
/// on an odd row, and the other half of each boundary cell has to come from
/// somewhere.
#[derive(Debug)]
pub struct TermPresenter<W: Write> {
    out: W,
    shadow: PixelBuffer,
    background: Rgba,
}

impl<W: Write> TermPresenter<W> {
    /// Create a presenter writing to `out` over a black background.
    pub fn new(out: W) -> Self {
        Self {
            out,
            shadow: PixelBuffer::new(Rect::EMPTY),
            background: Rgba::BLACK,
        }
    }

    /// Color that translucent pixels are composited onto.
    #[must_use]
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    /// What the terminal currently shows, in pixels.
    pub fn shadow(&self) -> &PixelBuffer {
        &self.shadow
    }

    /// Consume the presenter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let c = self
            .shadow
            .get(x, y)
            .unwrap_or(self.background)
            .flatten_onto(self.background);
        Color::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }

    fn draw_cells(&mut self, damage: Rect, frame: Rect) -> io::Result<()> {
        let first_row = (damage.top() - frame.top()) / 2;
        let last_row = (damage.bottom() - 1 - frame.top()) / 2;
        let column = to_cell(damage.left() - frame.left());

        let mut colors: Option<(Color, Color)> = None;
        for row in first_row..=last_row {
            crossterm::queue!(self.out, MoveTo(column, to_cell(row)))?;
            let upper_y = frame.top() + row * 2;
            for x in damage.left()..damage.right() {
                let pair = (self.pixel(x, upper_y), self.pixel(x, upper_y + 1));
                if colors != Some(pair) {
                    crossterm::queue!(
                        self.out,
                        SetForegroundColor(pair.0),
                        SetBackgroundColor(pair.1)
                    )?;
                    colors = Some(pair);
                }
                crossterm::queue!(self.out, Print(UPPER_HALF_BLOCK))?;
            }
        }
        crossterm::queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

fn to_cell(n: u32) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

impl<W: Write + Send> Presenter for TermPresenter<W> {
    type Error = io::Error;

    fn present(&mut self, region: &PixelBuffer, frame: Rect) -> Result<(), Self::Error> {
        if self.shadow.bounds() != frame {
            self.shadow = self.shadow.resized(frame);
        }
        let damage = self.shadow.paste(region);
        if damage.is_empty() {
            return Ok(());
        }
        self.draw_cells(damage, frame)
    }
}
