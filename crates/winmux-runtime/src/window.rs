#![forbid(unsafe_code)]

//! The root environment: a native surface with its input and render loops.
//!
//! # Threads
//!
//! ```text
//!  surface ──► input loop ──► event queue ──► Window::events()
//!                  │ resize (rendezvous)
//!                  ▼
//!  Window::draw ──► render loop ──► presenter
//!                  │ finish (dropped on exit)
//!                  └──────────────► input loop exits, stream ends
//! ```
//!
//! The input loop owns the surface. The render loop owns the backing buffer
//! and the presenter. Closing the window ends the render loop, which ends
//! the input loop, which ends the event stream and releases the surface.
//!
//! # Scale ratio
//!
//! On HiDPI displays the framebuffer is larger than the requested logical
//! size. The ratio `framebuffer width / requested width` (at least 1) is
//! computed once; when it is not 1 the surface is reopened at the requested
//! size divided by the ratio, and the backing buffer covers the reopened
//! logical size times the ratio. Pointer positions are reported in buffer
//! pixels (multiplied by the ratio).

use std::thread;

use winmux_backend::{Backend, Surface};
use winmux_core::event::Event;
use winmux_core::geometry::Rect;
use winmux_core::queue;
use winmux_render::PixelBuffer;

use crate::env::{DrawCommand, DrawSink, Env, Events};
use crate::error::OpenError;
use crate::input::{InputLoop, Translator};
use crate::options::WindowOptions;
use crate::render::RenderLoop;

/// An [`Env`] backed by a native surface.
///
/// Dropping the window closes it.
#[derive(Debug)]
pub struct Window {
    events: Events,
    sink: DrawSink,
    ratio: u32,
    initial_bounds: Rect,
}

impl Window {
    /// Open a surface and start the window's loops.
    ///
    /// The first event on the stream is always a resize covering the initial
    /// backing buffer.
    ///
    /// # Errors
    ///
    /// [`OpenError::Backend`] if the backend cannot open the surface (either
    /// time, when the scale ratio forces a reopen) or create its presenter;
    /// [`OpenError::Spawn`] if a loop thread cannot be started. Nothing is
    /// left running on error.
    pub fn open<B: Backend>(backend: &mut B, options: WindowOptions) -> Result<Self, OpenError> {
        let mut config = options.surface_config();
        let mut surface = backend.open(&config).map_err(OpenError::backend)?;

        let (framebuffer_width, _) = surface.framebuffer_size();
        let ratio = (framebuffer_width / config.width.max(1)).max(1);
        if ratio != 1 {
            config.width /= ratio;
            config.height /= ratio;
            tracing::debug!(ratio, width = config.width, height = config.height, "reopening scaled surface");
            drop(surface);
            surface = backend.open(&config).map_err(OpenError::backend)?;
        }

        let initial_bounds = Rect::from_size(
            config.width.saturating_mul(ratio),
            config.height.saturating_mul(ratio),
        );
        let presenter = surface.presenter().map_err(OpenError::backend)?;

        let (event_tx, event_rx) = queue::channel::<Event>();
        let (draw_tx, draw_rx) = crossbeam_channel::bounded::<DrawCommand>(0);
        let (resize_tx, resize_rx) = crossbeam_channel::bounded::<Rect>(0);
        let (finish_tx, finish_rx) = crossbeam_channel::bounded::<()>(0);

        let render = RenderLoop {
            buffer: PixelBuffer::new(initial_bounds),
            presenter,
            draws: draw_rx,
            resizes: resize_rx,
            flush_interval: options.flush_interval,
            finish: finish_tx,
        };
        thread::Builder::new()
            .name("winmux-render".into())
            .spawn(move || render.run())?;

        let input = InputLoop {
            surface,
            translator: Translator::new(ratio),
            initial: initial_bounds,
            events: event_tx,
            resizes: resize_tx,
            finish: finish_rx,
        };
        // On failure the draw sender is dropped here, which stops the
        // render loop that was already started.
        thread::Builder::new()
            .name("winmux-input".into())
            .spawn(move || input.run())?;

        tracing::debug!(title = %options.title, ratio, bounds = ?initial_bounds, "window opened");
        Ok(Self {
            events: Events::new(event_rx),
            sink: DrawSink::new(draw_tx),
            ratio,
            initial_bounds,
        })
    }

    /// Framebuffer pixels per logical pixel.
    #[must_use]
    pub const fn ratio(&self) -> u32 {
        self.ratio
    }

    /// The backing buffer's bounds at open time.
    #[must_use]
    pub const fn initial_bounds(&self) -> Rect {
        self.initial_bounds
    }
}

impl Env for Window {
    fn events(&self) -> &Events {
        &self.events
    }

    fn draw(&self, command: DrawCommand) {
        self.sink.send(command);
    }

    fn close(&self) {
        tracing::debug!("window closing");
        self.sink.close();
    }
}
