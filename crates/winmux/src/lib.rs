#![forbid(unsafe_code)]

//! winmux public facade crate.
//!
//! A minimal windowing abstraction: open a surface, read a typed event
//! stream, submit paint commands, and share one surface between many
//! independent consumers through a [`Mux`].
//!
//! ```no_run
//! use winmux::prelude::*;
//!
//! fn main() -> Result<(), OpenError> {
//!     let mut backend = HeadlessBackend::new();
//!     let window = Window::open(&mut backend, WindowOptions::default().title("hello"))?;
//!     for event in window.events() {
//!         match event {
//!             Event::Resize(r) => window.paint(move |buf| buf.fill(r, Rgba::WHITE)),
//!             Event::Close => window.close(),
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// --- Core re-exports -------------------------------------------------------

pub use winmux_core::event::{Event, MouseButton, names};
pub use winmux_core::geometry::{Point, Rect};
pub use winmux_core::queue;

// --- Render re-exports -----------------------------------------------------

pub use winmux_render::{PixelBuffer, Rgba};

// --- Backend re-exports ----------------------------------------------------

pub use winmux_backend::headless::{HeadlessBackend, HeadlessHost};
pub use winmux_backend::{
    Backend, NativeAction, NativeButton, NativeEvent, NativeKey, Presenter, Surface, SurfaceConfig,
};

#[cfg(feature = "term")]
pub use winmux_term::{TermBackend, TermPresenter, TermSurface};

// --- Runtime re-exports ----------------------------------------------------

pub use winmux_runtime::{
    ChildId, ChildRole, DrawCommand, DrawSink, Env, Events, Mux, MuxEnv, OpenError, Window,
    WindowOptions,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Env, Event, HeadlessBackend, Mux, MouseButton, OpenError, PixelBuffer, Point, Rect, Rgba,
        Window, WindowOptions,
    };

    #[cfg(feature = "term")]
    pub use crate::TermBackend;
}
