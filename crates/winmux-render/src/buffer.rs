#![forbid(unsafe_code)]

//! Backing pixel buffer.
//!
//! A [`PixelBuffer`] is a row-major grid of [`Rgba`] pixels covering an
//! arbitrary [`Rect`]. Coordinates are absolute: a buffer whose bounds start
//! at `(100, 50)` is addressed starting at `(100, 50)`, not at the origin.
//! This lets a cropped region keep the coordinates it had in its source.
//!
//! All writes are clipped to the bounds. Out-of-range reads return `None`.

use winmux_core::geometry::Rect;

use crate::color::Rgba;

/// An RGBA pixel grid over `bounds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    bounds: Rect,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a transparent buffer covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            pixels: vec![Rgba::TRANSPARENT; Self::len_for(bounds)],
        }
    }

    fn len_for(bounds: Rect) -> usize {
        bounds.width as usize * bounds.height as usize
    }

    /// The rectangle this buffer covers.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.bounds.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.bounds.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let col = (x - self.bounds.x) as usize;
        let row = (y - self.bounds.y) as usize;
        Some(row * self.bounds.width as usize + col)
    }

    /// Pixel at `(x, y)`, or `None` outside the bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at `(x, y)`. Returns `false` (and writes nothing)
    /// outside the bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// One row of pixels, left to right.
    pub fn row(&self, y: u32) -> Option<&[Rgba]> {
        let start = self.index(self.bounds.x, y)?;
        Some(&self.pixels[start..start + self.bounds.width as usize])
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Fill `rect` with `color`, clipped to the bounds.
    ///
    /// Returns the rectangle actually written, which is empty if `rect` lies
    /// outside the buffer. The result is what a paint command reports as its
    /// damage.
    pub fn fill(&mut self, rect: Rect, color: Rgba) -> Rect {
        self.fill_with(rect, |_, _| color)
    }

    /// Fill `rect` with colors computed per pixel, clipped to the bounds.
    ///
    /// Returns the rectangle actually written.
    pub fn fill_with(&mut self, rect: Rect, mut color: impl FnMut(u32, u32) -> Rgba) -> Rect {
        let Some(clip) = self.bounds.intersection_opt(&rect) else {
            return Rect::EMPTY;
        };
        for y in clip.top()..clip.bottom() {
            for x in clip.left()..clip.right() {
                if let Some(i) = self.index(x, y) {
                    self.pixels[i] = color(x, y);
                }
            }
        }
        clip
    }

    /// A new buffer covering `bounds`, carrying over every pixel in the
    /// overlap of the old and new bounds at the same coordinates. Pixels
    /// outside the overlap start transparent.
    pub fn resized(&self, bounds: Rect) -> PixelBuffer {
        let mut next = PixelBuffer::new(bounds);
        next.paste(self);
        next
    }

    /// A scratch copy of `region`, clipped to the bounds.
    ///
    /// The copy keeps absolute coordinates: its bounds are the clipped region.
    pub fn crop(&self, region: Rect) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.bounds.intersection(&region));
        out.paste(self);
        out
    }

    /// Copy every pixel of `src` that falls inside this buffer, at the same
    /// coordinates. Returns the rectangle written.
    pub fn paste(&mut self, src: &PixelBuffer) -> Rect {
        let Some(overlap) = self.bounds.intersection_opt(&src.bounds) else {
            return Rect::EMPTY;
        };
        let w = overlap.width as usize;
        for y in overlap.top()..overlap.bottom() {
            let (Some(from), Some(to)) = (src.index(overlap.x, y), self.index(overlap.x, y)) else {
                continue;
            };
            self.pixels[to..to + w].copy_from_slice(&src.pixels[from..from + w]);
        }
        overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_transparent() {
        let buf = PixelBuffer::new(Rect::from_size(4, 3));
        assert_eq!(buf.pixels().len(), 12);
        assert!(buf.pixels().iter().all(|&p| p == Rgba::TRANSPARENT));
    }

    #[test]
    fn get_set_respect_bounds() {
        let mut buf = PixelBuffer::new(Rect::new(10, 20, 5, 5));
        assert!(buf.set(10, 20, Rgba::RED));
        assert!(buf.set(14, 24, Rgba::BLUE));
        assert!(!buf.set(15, 20, Rgba::GREEN));
        assert!(!buf.set(0, 0, Rgba::GREEN));

        assert_eq!(buf.get(10, 20), Some(Rgba::RED));
        assert_eq!(buf.get(14, 24), Some(Rgba::BLUE));
        assert_eq!(buf.get(9, 20), None);
    }

    #[test]
    fn fill_returns_clipped_rect() {
        let mut buf = PixelBuffer::new(Rect::from_size(20, 20));
        let touched = buf.fill(Rect::new(15, 15, 10, 10), Rgba::WHITE);
        assert_eq!(touched, Rect::new(15, 15, 5, 5));
        assert_eq!(buf.get(19, 19), Some(Rgba::WHITE));
        assert_eq!(buf.get(14, 14), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn fill_outside_is_empty() {
        let mut buf = PixelBuffer::new(Rect::from_size(20, 20));
        let touched = buf.fill(Rect::new(40, 40, 5, 5), Rgba::WHITE);
        assert!(touched.is_empty());
    }

    #[test]
    fn fill_with_sees_absolute_coordinates() {
        let mut buf = PixelBuffer::new(Rect::new(2, 3, 2, 2));
        buf.fill_with(buf.bounds(), |x, y| Rgba::rgb(x as u8, y as u8, 0));
        assert_eq!(buf.get(2, 3), Some(Rgba::rgb(2, 3, 0)));
        assert_eq!(buf.get(3, 4), Some(Rgba::rgb(3, 4, 0)));
    }

    #[test]
    fn resized_preserves_overlap() {
        let mut buf = PixelBuffer::new(Rect::from_size(10, 10));
        buf.set(2, 2, Rgba::RED);
        buf.set(9, 9, Rgba::BLUE);

        let grown = buf.resized(Rect::from_size(20, 20));
        assert_eq!(grown.get(2, 2), Some(Rgba::RED));
        assert_eq!(grown.get(9, 9), Some(Rgba::BLUE));
        assert_eq!(grown.get(15, 15), Some(Rgba::TRANSPARENT));

        let shrunk = buf.resized(Rect::from_size(5, 5));
        assert_eq!(shrunk.get(2, 2), Some(Rgba::RED));
        assert_eq!(shrunk.get(9, 9), None);
    }

    #[test]
    fn crop_keeps_coordinates() {
        let mut buf = PixelBuffer::new(Rect::from_size(30, 30));
        buf.fill(Rect::new(10, 10, 10, 10), Rgba::GREEN);

        let region = buf.crop(Rect::new(10, 10, 10, 10));
        assert_eq!(region.bounds(), Rect::new(10, 10, 10, 10));
        assert_eq!(region.get(10, 10), Some(Rgba::GREEN));
        assert_eq!(region.get(19, 19), Some(Rgba::GREEN));
        assert_eq!(region.get(0, 0), None);
    }

    #[test]
    fn crop_clips_to_bounds() {
        let buf = PixelBuffer::new(Rect::from_size(8, 8));
        assert_eq!(buf.crop(Rect::new(6, 6, 10, 10)).bounds(), Rect::new(6, 6, 2, 2));
        assert!(buf.crop(Rect::new(20, 20, 1, 1)).bounds().is_empty());
    }

    #[test]
    fn paste_writes_overlap_only() {
        let mut dst = PixelBuffer::new(Rect::from_size(10, 10));
        let mut src = PixelBuffer::new(Rect::new(8, 8, 4, 4));
        src.fill(src.bounds(), Rgba::BLUE);

        assert_eq!(dst.paste(&src), Rect::new(8, 8, 2, 2));
        assert_eq!(dst.get(9, 9), Some(Rgba::BLUE));
        assert_eq!(dst.get(7, 7), Some(Rgba::TRANSPARENT));
        assert!(dst.paste(&PixelBuffer::new(Rect::new(50, 50, 1, 1))).is_empty());
    }

    #[test]
    fn row_slices() {
        let mut buf = PixelBuffer::new(Rect::new(0, 5, 3, 2));
        buf.set(1, 6, Rgba::RED);
        assert_eq!(
            buf.row(6),
            Some(&[Rgba::TRANSPARENT, Rgba::RED, Rgba::TRANSPARENT][..])
        );
        assert_eq!(buf.row(4), None);
    }
}
