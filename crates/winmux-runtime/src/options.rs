#![forbid(unsafe_code)]

//! Window configuration.

use core::time::Duration;

use winmux_backend::SurfaceConfig;

/// Default period of the render loop's flush timer: 1/960 s.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 960);

/// Options for [`Window::open`](crate::Window::open).
///
/// ```
/// use winmux_runtime::WindowOptions;
///
/// let opts = WindowOptions::default().title("demo").size(320, 200).resizable(true);
/// assert_eq!(opts.width, 320);
/// assert!(opts.decorated);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub decorated: bool,
    /// Upper bound on how often damage is flushed to the display.
    pub flush_interval: Duration,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 640,
            height: 480,
            resizable: false,
            decorated: true,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl WindowOptions {
    /// Set the window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the logical size.
    #[must_use]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Allow or forbid user resizing.
    #[must_use]
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Show or hide window decorations.
    #[must_use]
    pub fn decorated(mut self, decorated: bool) -> Self {
        self.decorated = decorated;
        self
    }

    /// Set the flush timer period.
    #[must_use]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// The backend-facing part of these options.
    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            resizable: self.resizable,
            decorated: self.decorated,
        }
    }
}
