#![forbid(unsafe_code)]

//! Terminal surface.
//!
//! One terminal cell shows two vertically stacked pixels: the upper pixel as
//! the foreground of an upper-half block (`▀`) and the lower pixel as its
//! background. A terminal of `cols x rows` cells is therefore a framebuffer of
//! `cols x rows*2` pixels.
//!
//! The terminal cannot be resized to a requested size. On the first wait the
//! surface queues a [`NativeEvent::FramebufferResized`] for its real
//! framebuffer, so consumers learn the actual size from the resize that
//! follows the initial one. Terminal cells have no HiDPI scale: the size
//! reported at open time never exceeds the requested one, which keeps the
//! window's scale ratio at 1.
//!
//! `Ctrl+C` arrives as a key in raw mode; it is reported as
//! [`NativeEvent::CloseRequested`].

mod input;
mod presenter;
mod session;

use core::time::Duration;
use std::io;

use winmux_backend::{Backend, NativeEvent, Surface, SurfaceConfig};

pub use input::map_event;
pub use presenter::TermPresenter;
pub use session::TermSession;

/// Current terminal framebuffer size in pixels (`cols`, `rows * 2`).
pub fn framebuffer_size() -> io::Result<(u32, u32)> {
    let (cols, rows) = crossterm::terminal::size()?;
    Ok(cell_grid_to_pixels(cols, rows))
}

pub(crate) fn cell_grid_to_pixels(cols: u16, rows: u16) -> (u32, u32) {
    (u32::from(cols), u32::from(rows) * 2)
}

/// Clamp a terminal framebuffer to the requested size.
///
/// A zero request reports zero, like any other surface asked for nothing;
/// the real size still arrives as the first resize.
pub(crate) fn unscaled(framebuffer: (u32, u32), requested: (u32, u32)) -> (u32, u32) {
    (framebuffer.0.min(requested.0), framebuffer.1.min(requested.1))
}

/// Opens the controlling terminal as a surface.
#[derive(Debug, Default)]
pub struct TermBackend {
    _private: (),
}

impl TermBackend {
    /// Create a terminal backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for TermBackend {
    type Error = io::Error;
    type Surface = TermSurface;

    fn open(&mut self, config: &SurfaceConfig) -> Result<Self::Surface, Self::Error> {
        let session = TermSession::enter(&config.title)?;
        let framebuffer = framebuffer_size()?;
        Ok(TermSurface {
            session,
            requested: (config.width, config.height),
            framebuffer,
            announced: false,
        })
    }
}

/// The terminal, in raw mode on the alternate screen.
///
/// Dropping it restores the terminal.
#[derive(Debug)]
pub struct TermSurface {
    session: TermSession,
    requested: (u32, u32),
    framebuffer: (u32, u32),
    announced: bool,
}

impl TermSurface {
    /// The session guard holding the terminal modes.
    pub fn session(&self) -> &TermSession {
        &self.session
    }
}

impl Surface for TermSurface {
    type Error = io::Error;
    type Presenter = TermPresenter<io::Stdout>;

    fn framebuffer_size(&self) -> (u32, u32) {
        unscaled(self.framebuffer, self.requested)
    }

    fn presenter(&mut self) -> Result<Self::Presenter, Self::Error> {
        Ok(TermPresenter::new(io::stdout()))
    }

    fn wait_events(
        &mut self,
        timeout: Duration,
        handler: &mut dyn FnMut(NativeEvent),
    ) -> Result<(), Self::Error> {
        if !self.announced {
            self.announced = true;
            let (width, height) = self.framebuffer;
            handler(NativeEvent::FramebufferResized { width, height });
        }

        if !crossterm::event::poll(timeout)? {
            return Ok(());
        }
        // Drain whatever else is already buffered without waiting again.
        loop {
            let raw = crossterm::event::read()?;
            for event in map_event(raw) {
                if let NativeEvent::FramebufferResized { width, height } = event {
                    self.framebuffer = (width, height);
                }
                handler(event);
            }
            if !crossterm::event::poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }
}
