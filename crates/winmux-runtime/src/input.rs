#![forbid(unsafe_code)]

//! Input loop: native events in, canonical events out.

use core::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use winmux_backend::{NativeAction, NativeEvent, Surface};
use winmux_core::event::Event;
use winmux_core::geometry::{Point, Rect};

use crate::keymap;

/// Bound on each native wait, so the finish signal is noticed promptly.
pub(crate) const POLL_TIMEOUT: Duration = Duration::from_nanos(1_000_000_000 / 30);

/// Turns native events into canonical ones.
///
/// Tracks the cursor, since button events carry no position of their own.
#[derive(Debug)]
pub(crate) struct Translator {
    ratio: i32,
    cursor: Point,
}

impl Translator {
    pub(crate) fn new(ratio: u32) -> Self {
        Self {
            ratio: i32::try_from(ratio).unwrap_or(i32::MAX),
            cursor: Point::ZERO,
        }
    }

    /// The canonical event for `native`, if it has one.
    ///
    /// Framebuffer resizes are not handled here; they need the render loop
    /// to hear about them first.
    pub(crate) fn translate(&mut self, native: NativeEvent) -> Option<Event> {
        match native {
            NativeEvent::CursorMoved { x, y } => {
                self.cursor = Point::new(x as i32, y as i32);
                Some(Event::MouseMove(self.cursor.scale(self.ratio)))
            }
            NativeEvent::MouseButton { button, action } => {
                let button = keymap::mouse_button(button)?;
                let pos = self.cursor.scale(self.ratio);
                match action {
                    NativeAction::Press => Some(Event::MouseDown(button, pos)),
                    NativeAction::Release => Some(Event::MouseUp(button, pos)),
                    NativeAction::Repeat => None,
                }
            }
            NativeEvent::Scroll { dx, dy } => Some(Event::MouseScroll(Point::new(dx as i32, dy as i32))),
            NativeEvent::Char(c) => Some(Event::KeyboardChar(c)),
            NativeEvent::Key { key, action } => {
                let name = keymap::key_name(key)?;
                Some(match action {
                    NativeAction::Press => Event::KeyboardDown(name),
                    NativeAction::Release => Event::KeyboardUp(name),
                    NativeAction::Repeat => Event::KeyboardRepeat(name),
                })
            }
            NativeEvent::FramebufferResized { width, height } => {
                Some(Event::Resize(Rect::from_size(width, height)))
            }
            NativeEvent::CloseRequested => Some(Event::Close),
        }
    }
}

/// Owns the surface for the lifetime of the window.
pub(crate) struct InputLoop<S> {
    pub(crate) surface: S,
    pub(crate) translator: Translator,
    pub(crate) initial: Rect,
    pub(crate) events: Sender<Event>,
    pub(crate) resizes: Sender<Rect>,
    pub(crate) finish: Receiver<()>,
}

impl<S: Surface> InputLoop<S> {
    pub(crate) fn run(self) {
        let Self {
            mut surface,
            mut translator,
            initial,
            events,
            resizes,
            finish,
        } = self;

        tracing::debug!(?initial, "input loop started");
        // Consumers always see a size before anything else.
        let _ = events.send(Event::Resize(initial));

        let mut handler = |native: NativeEvent| {
            let Some(event) = translator.translate(native) else {
                return;
            };
            if let Event::Resize(rect) = event {
                // The render loop must resize before anyone reacts to the event.
                let _ = resizes.send(rect);
            }
            if events.send(event).is_err() {
                tracing::trace!(%event, "event dropped; consumer gone");
            }
        };

        loop {
            if let Err(TryRecvError::Disconnected) = finish.try_recv() {
                tracing::debug!("input loop finished");
                break;
            }
            if let Err(err) = surface.wait_events(POLL_TIMEOUT, &mut handler) {
                tracing::error!(error = %err, "event polling failed; closing event stream");
                break;
            }
        }

        // Ends the event stream, then releases the surface.
        drop(handler);
        drop(events);
        drop(surface);
    }
}
