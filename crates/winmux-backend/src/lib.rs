#![forbid(unsafe_code)]

//! Native surface contract.
//!
//! A window needs three things from the platform layer:
//!
//! - a [`Backend`] that can open a [`Surface`] for a [`SurfaceConfig`],
//! - a [`Surface`] that reports its framebuffer size and delivers raw input
//!   as [`NativeEvent`] values during a bounded wait,
//! - a [`Presenter`] that blits a rectangle of pixels to the front surface.
//!
//! The surface stays on the input thread; its presenter is split off and
//! moved to the render thread, so the two never contend for the same handle.
//!
//! [`headless`] is a host-driven implementation for tests and embedding.

pub mod headless;

use core::time::Duration;

use winmux_core::geometry::Rect;
use winmux_render::PixelBuffer;

/// Parameters for opening a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Title shown in the window chrome, if any.
    pub title: String,
    /// Requested logical width.
    pub width: u32,
    /// Requested logical height.
    pub height: u32,
    /// Whether the user may resize the surface.
    pub resizable: bool,
    /// Whether the surface has window decorations.
    pub decorated: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 640,
            height: 480,
            resizable: false,
            decorated: true,
        }
    }
}

/// State transition reported with keys and mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeAction {
    /// Went down.
    Press,
    /// Went up.
    Release,
    /// Held down; auto-repeat fired.
    Repeat,
}

/// Platform mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeButton {
    Left,
    Right,
    Middle,
    /// Any extra button, by platform index.
    Other(u16),
}

/// Platform key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKey {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    Backspace,
    Delete,
    Enter,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    Insert,
    /// Function key `F1`..`F24`.
    F(u8),
    /// A printable key, by its unshifted character.
    Char(char),
    /// Anything else, by platform scan code.
    Other(u32),
}

/// Raw input as reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    /// Pointer moved, in logical (window) coordinates.
    CursorMoved { x: f64, y: f64 },
    /// A mouse button changed state at the current cursor position.
    MouseButton {
        button: NativeButton,
        action: NativeAction,
    },
    /// Scroll wheel offsets.
    Scroll { dx: f64, dy: f64 },
    /// Text input.
    Char(char),
    /// A key changed state.
    Key { key: NativeKey, action: NativeAction },
    /// The framebuffer now has this size in pixels.
    FramebufferResized { width: u32, height: u32 },
    /// The user asked to close the surface.
    CloseRequested,
}

/// Opens native surfaces.
pub trait Backend {
    /// Error type for open failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The surface type this backend produces.
    type Surface: Surface + Send + 'static;

    /// Open a surface. Called again (after dropping the first surface) when
    /// the framebuffer turns out to be scaled relative to the request.
    fn open(&mut self, config: &SurfaceConfig) -> Result<Self::Surface, Self::Error>;
}

/// An open native surface. Dropping it releases the surface.
pub trait Surface {
    /// Error type for polling and presenter creation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The blitter type split off for the render thread.
    type Presenter: Presenter + Send + 'static;

    /// Current framebuffer size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Create the presenter for this surface.
    fn presenter(&mut self) -> Result<Self::Presenter, Self::Error>;

    /// Wait up to `timeout` for input and hand every raw event to `handler`.
    ///
    /// Returning `Ok` with no events delivered is a normal timeout.
    fn wait_events(
        &mut self,
        timeout: Duration,
        handler: &mut dyn FnMut(NativeEvent),
    ) -> Result<(), Self::Error>;
}

/// Blits pixels to the front surface.
pub trait Presenter {
    /// Error type for presentation failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Blit exactly `region.bounds()` of the backing buffer.
    ///
    /// `frame` is the full extent of the backing buffer, for presenters that
    /// need to map buffer coordinates onto the display.
    fn present(&mut self, region: &PixelBuffer, frame: Rect) -> Result<(), Self::Error>;
}
