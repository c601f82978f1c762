#![forbid(unsafe_code)]

//! The environment capability.
//!
//! An [`Env`] is an event stream plus a paint-command sink. Closing the sink
//! is the one shutdown signal: it ends whatever loop backs the environment,
//! and that loop in turn ends the event stream. Consumers should keep
//! draining [`Env::events`] until it reports end-of-stream.
//!
//! ```no_run
//! use winmux_core::geometry::Rect;
//! use winmux_render::Rgba;
//! use winmux_runtime::Env;
//!
//! fn run(env: &impl Env) {
//!     while let Some(event) = env.events().recv() {
//!         if let winmux_core::event::Event::Resize(r) = event {
//!             env.paint(move |buf| buf.fill(r, Rgba::WHITE));
//!         }
//!         if event.name() == "close" {
//!             env.close();
//!         }
//!     }
//! }
//! ```

use core::time::Duration;
use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use winmux_core::event::Event;
use winmux_core::geometry::Rect;
use winmux_render::PixelBuffer;

/// A paint command: mutate the buffer, return the rectangle touched.
pub type DrawCommand = Box<dyn FnOnce(&mut PixelBuffer) -> Rect + Send>;

/// An interactive graphical environment.
pub trait Env: Send + Sync {
    /// The event stream. Ends after the environment is closed.
    fn events(&self) -> &Events;

    /// Submit a paint command. Ignored after [`Env::close`].
    fn draw(&self, command: DrawCommand);

    /// Close the paint-command sink. Idempotent.
    fn close(&self);

    /// Submit a closure as a paint command.
    fn paint<F>(&self, f: F)
    where
        F: FnOnce(&mut PixelBuffer) -> Rect + Send + 'static,
        Self: Sized,
    {
        self.draw(Box::new(f));
    }
}

impl<E: Env + ?Sized> Env for Arc<E> {
    fn events(&self) -> &Events {
        (**self).events()
    }

    fn draw(&self, command: DrawCommand) {
        (**self).draw(command);
    }

    fn close(&self) {
        (**self).close();
    }
}

impl<E: Env + ?Sized> Env for Box<E> {
    fn events(&self) -> &Events {
        (**self).events()
    }

    fn draw(&self, command: DrawCommand) {
        (**self).draw(command);
    }

    fn close(&self) {
        (**self).close();
    }
}

/// Consumer end of an event stream.
#[derive(Debug)]
pub struct Events {
    rx: Receiver<Event>,
}

impl Events {
    /// Wrap the receiving end of an event channel.
    pub fn new(rx: Receiver<Event>) -> Self {
        Self { rx }
    }

    /// Block for the next event. `None` means the stream ended cleanly.
    pub fn recv(&self) -> Option<Event> {
        self.rx.recv().ok()
    }

    /// Block for at most `timeout`.
    ///
    /// [`RecvTimeoutError::Timeout`] means the stream is still open;
    /// [`RecvTimeoutError::Disconnected`] means it ended.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Take the next event if one is ready.
    pub fn try_recv(&self) -> Result<Event, TryRecvError> {
        self.rx.try_recv()
    }

    /// Blocking iterator that ends with the stream.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.rx.iter()
    }

    /// The underlying receiver, for use with `crossbeam_channel::select!`.
    pub fn receiver(&self) -> &Receiver<Event> {
        &self.rx
    }
}

impl<'a> IntoIterator for &'a Events {
    type Item = Event;
    type IntoIter = crossbeam_channel::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.rx.iter()
    }
}

/// Producer end of a paint-command stream, safe against use after close.
///
/// Sending never panics: after [`DrawSink::close`], or once the consumer has
/// gone away, commands are dropped.
#[derive(Debug)]
pub struct DrawSink {
    tx: Mutex<Option<Sender<DrawCommand>>>,
}

impl DrawSink {
    /// Wrap the sending end of a paint-command channel.
    pub fn new(tx: Sender<DrawCommand>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Forward `command`, blocking until the consumer takes it.
    ///
    /// Returns `false` if the command was discarded.
    pub fn send(&self, command: DrawCommand) -> bool {
        // Clone under the lock, send outside it: a blocked send must not
        // hold up close().
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match tx {
            Some(tx) => tx.send(command).is_ok(),
            None => {
                tracing::trace!("draw after close discarded");
                false
            }
        }
    }

    /// Drop the sender. Later calls are no-ops.
    pub fn close(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Whether [`DrawSink::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> DrawCommand {
        Box::new(|_| Rect::EMPTY)
    }

    #[test]
    fn sink_delivers_until_closed() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = DrawSink::new(tx);

        assert!(sink.send(noop()));
        assert_eq!(rx.len(), 1);

        sink.close();
        assert!(sink.is_closed());
        assert!(!sink.send(noop()));
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn close_is_idempotent_and_ends_consumer() {
        let (tx, rx) = crossbeam_channel::unbounded::<DrawCommand>();
        let sink = DrawSink::new(tx);
        sink.close();
        sink.close();
        assert!(rx.recv().is_err());
    }

    #[test]
    fn send_to_gone_consumer_is_discarded() {
        let (tx, rx) = crossbeam_channel::bounded(0);
        let sink = DrawSink::new(tx);
        drop(rx);
        assert!(!sink.send(noop()));
    }

    #[test]
    fn events_distinguish_end_from_idle() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let events = Events::new(rx);

        assert_eq!(
            events.recv_timeout(Duration::from_millis(5)),
            Err(RecvTimeoutError::Timeout)
        );
        tx.send(Event::Close).unwrap();
        assert_eq!(events.try_recv(), Ok(Event::Close));

        drop(tx);
        assert_eq!(events.recv(), None);
        assert_eq!(
            events.recv_timeout(Duration::from_millis(5)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn events_iterate_to_end() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let events = Events::new(rx);
        tx.send(Event::KeyboardChar('a')).unwrap();
        tx.send(Event::KeyboardChar('b')).unwrap();
        drop(tx);

        let got: Vec<_> = (&events).into_iter().collect();
        assert_eq!(got, vec![Event::KeyboardChar('a'), Event::KeyboardChar('b')]);
    }
}
