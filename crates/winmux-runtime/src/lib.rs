#![forbid(unsafe_code)]

//! Runtime: environments, the window event/render loops, and the mux.
//!
//! Everything composes through [`Env`]: an event stream, a paint-command
//! sink, and a close operation. A [`Window`] is the root environment backed
//! by a native surface; a [`Mux`] splits one environment into many.

pub mod env;
pub mod error;
mod input;
pub mod keymap;
pub mod mux;
pub mod options;
mod render;
pub mod window;

pub use env::{DrawCommand, DrawSink, Env, Events};
pub use error::OpenError;
pub use mux::{ChildId, ChildRole, Mux, MuxEnv};
pub use options::WindowOptions;
pub use window::Window;
