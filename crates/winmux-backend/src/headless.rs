#![forbid(unsafe_code)]

//! Host-driven headless backend.
//!
//! Nothing here touches a display. The host (a test, or an embedding that
//! owns its own event loop) holds a [`HeadlessHost`] handle and:
//!
//! - pushes [`NativeEvent`]s that the surface delivers on its next wait,
//! - sets a framebuffer scale to simulate HiDPI displays,
//! - injects open, poll, and present failures,
//! - inspects what the window did: surface configs opened, blits presented,
//!   surfaces released.
//!
//! The handle is `Clone + Send + Sync`; every method is safe to call from any
//! thread while the window's loops are running.

use core::time::Duration;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use winmux_core::geometry::Rect;
use winmux_render::PixelBuffer;

use crate::{Backend, NativeEvent, Presenter, Surface, SurfaceConfig};

/// Headless backend error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessError {
    /// The host refused to open a surface.
    OpenRefused(String),
    /// The host made event polling fail.
    PollFailed,
    /// The host made presentation fail.
    PresentFailed,
}

impl core::fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OpenRefused(reason) => write!(f, "surface open refused: {reason}"),
            Self::PollFailed => f.write_str("event polling failed"),
            Self::PresentFailed => f.write_str("present failed"),
        }
    }
}

impl std::error::Error for HeadlessError {}

/// One recorded presenter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blit {
    /// The pixels blitted; `region.bounds()` is the flushed rectangle.
    pub region: PixelBuffer,
    /// The full backing-buffer extent passed alongside.
    pub frame: Rect,
}

impl Blit {
    /// The flushed rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.region.bounds()
    }
}

#[derive(Debug)]
struct HostState {
    scale: u32,
    pending: VecDeque<NativeEvent>,
    framebuffer: Option<(u32, u32)>,
    fail_open: Option<String>,
    fail_poll: bool,
    fail_present: bool,
    configs: Vec<SurfaceConfig>,
    blits: Vec<Blit>,
    live_surfaces: usize,
    released: usize,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<HostState>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the lock and wake every waiter.
    fn update<R>(&self, f: impl FnOnce(&mut HostState) -> R) -> R {
        let out = f(&mut self.lock());
        self.changed.notify_all();
        out
    }

    /// Block until `ready` holds or `timeout` elapses. Returns whether it held.
    fn wait_until(&self, timeout: Duration, ready: impl Fn(&HostState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if ready(&state) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// Control handle for a [`HeadlessBackend`].
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    shared: Arc<Shared>,
}

impl HeadlessHost {
    /// Queue a raw event for the next wait on the current surface.
    pub fn push(&self, event: NativeEvent) {
        self.shared.update(|s| s.pending.push_back(event));
    }

    /// Simulate a user resize: update the framebuffer and queue the event.
    pub fn resize_framebuffer(&self, width: u32, height: u32) {
        self.shared.update(|s| {
            s.framebuffer = Some((width, height));
            s.pending
                .push_back(NativeEvent::FramebufferResized { width, height });
        });
    }

    /// Framebuffer pixels per logical pixel for surfaces opened from now on.
    pub fn set_scale(&self, scale: u32) {
        self.shared.update(|s| s.scale = scale.max(1));
    }

    /// Make the next `open` fail with `reason`.
    pub fn fail_next_open(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.shared.update(|s| s.fail_open = Some(reason));
    }

    /// Make every subsequent wait fail.
    pub fn fail_polling(&self) {
        self.shared.update(|s| s.fail_poll = true);
    }

    /// Make every subsequent present fail.
    pub fn fail_presenting(&self) {
        self.shared.update(|s| s.fail_present = true);
    }

    /// Configs passed to every successful `open`, in order.
    pub fn opened_configs(&self) -> Vec<SurfaceConfig> {
        self.shared.lock().configs.clone()
    }

    /// All blits presented so far.
    pub fn blits(&self) -> Vec<Blit> {
        self.shared.lock().blits.clone()
    }

    /// Remove and return all blits presented so far.
    pub fn take_blits(&self) -> Vec<Blit> {
        std::mem::take(&mut self.shared.lock().blits)
    }

    /// Wait until at least `count` blits have been recorded.
    pub fn wait_for_blits(&self, count: usize, timeout: Duration) -> bool {
        self.shared.wait_until(timeout, |s| s.blits.len() >= count)
    }

    /// Number of surfaces currently open.
    pub fn live_surfaces(&self) -> usize {
        self.shared.lock().live_surfaces
    }

    /// Number of surfaces released (dropped) so far.
    pub fn released(&self) -> usize {
        self.shared.lock().released
    }

    /// Wait until every opened surface has been released.
    pub fn wait_all_released(&self, timeout: Duration) -> bool {
        self.shared
            .wait_until(timeout, |s| s.live_surfaces == 0 && s.released > 0)
    }

    /// Events pushed but not yet delivered.
    pub fn pending_events(&self) -> usize {
        self.shared.lock().pending.len()
    }
}

/// A backend whose surfaces are driven by a [`HeadlessHost`].
#[derive(Debug)]
pub struct HeadlessBackend {
    host: HeadlessHost,
}

impl HeadlessBackend {
    /// Create a backend with scale 1 and no pending events.
    #[must_use]
    pub fn new() -> Self {
        let state = HostState {
            scale: 1,
            pending: VecDeque::new(),
            framebuffer: None,
            fail_open: None,
            fail_poll: false,
            fail_present: false,
            configs: Vec::new(),
            blits: Vec::new(),
            live_surfaces: 0,
            released: 0,
        };
        Self {
            host: HeadlessHost {
                shared: Arc::new(Shared {
                    state: Mutex::new(state),
                    changed: Condvar::new(),
                }),
            },
        }
    }

    /// A control handle sharing this backend's state.
    #[must_use]
    pub fn host(&self) -> HeadlessHost {
        self.host.clone()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HeadlessBackend {
    type Error = HeadlessError;
    type Surface = HeadlessSurface;

    fn open(&mut self, config: &SurfaceConfig) -> Result<Self::Surface, Self::Error> {
        self.host.shared.update(|s| {
            if let Some(reason) = s.fail_open.take() {
                return Err(HeadlessError::OpenRefused(reason));
            }
            s.framebuffer = Some((
                config.width.saturating_mul(s.scale),
                config.height.saturating_mul(s.scale),
            ));
            s.configs.push(config.clone());
            s.live_surfaces += 1;
            Ok(HeadlessSurface {
                shared: Arc::clone(&self.host.shared),
            })
        })
    }
}

/// A surface opened by [`HeadlessBackend`].
#[derive(Debug)]
pub struct HeadlessSurface {
    shared: Arc<Shared>,
}

impl Surface for HeadlessSurface {
    type Error = HeadlessError;
    type Presenter = HeadlessPresenter;

    fn framebuffer_size(&self) -> (u32, u32) {
        self.shared.lock().framebuffer.unwrap_or((0, 0))
    }

    fn presenter(&mut self) -> Result<Self::Presenter, Self::Error> {
        Ok(HeadlessPresenter {
            shared: Arc::clone(&self.shared),
        })
    }

    fn wait_events(
        &mut self,
        timeout: Duration,
        handler: &mut dyn FnMut(NativeEvent),
    ) -> Result<(), Self::Error> {
        self.shared
            .wait_until(timeout, |s| s.fail_poll || !s.pending.is_empty());

        // Take the batch under the lock, deliver outside it.
        let batch: Vec<_> = {
            let mut state = self.shared.lock();
            if state.fail_poll {
                return Err(HeadlessError::PollFailed);
            }
            state.pending.drain(..).collect()
        };
        for event in batch {
            handler(event);
        }
        Ok(())
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        self.shared.update(|s| {
            s.live_surfaces = s.live_surfaces.saturating_sub(1);
            s.released += 1;
        });
    }
}

/// Records every blit into the host state.
#[derive(Debug)]
pub struct HeadlessPresenter {
    shared: Arc<Shared>,
}

impl Presenter for HeadlessPresenter {
    type Error = HeadlessError;

    fn present(&mut self, region: &PixelBuffer, frame: Rect) -> Result<(), Self::Error> {
        self.shared.update(|s| {
            if s.fail_present {
                return Err(HeadlessError::PresentFailed);
            }
            s.blits.push(Blit {
                region: region.clone(),
                frame,
            });
            Ok(())
        })
    }
}
