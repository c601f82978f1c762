#![forbid(unsafe_code)]

//! Environment multiplexer.
//!
//! A [`Mux`] shares one root [`Env`] between any number of child
//! environments:
//!
//! - **Fan-out**: every root event is broadcast to every registered child,
//!   in registration order. The latest resize is cached and replayed to
//!   children that join later, so each child learns the current size first.
//! - **Fan-in**: every child's paint commands are forwarded to the root.
//!
//! # Teardown
//!
//! [`Mux::new`] returns one [`ChildRole::Master`] child. Closing it tears the
//! whole mux down: every child's event stream ends, and the root is closed.
//! Closing an [`ChildRole::Ordinary`] child only removes that child.
//!
//! If the root's event stream ends first, every child's stream ends, but the
//! root stays open: child draws still reach it until the master closes.
//!
//! Once the streams have ended, new children start out ended. After the
//! master closes, their draws are discarded as well.
//!
//! # Locking
//!
//! The registry is the only shared mutable state. Join, leave, broadcast and
//! teardown all happen under its lock. Forwarding only clones the root sink
//! under the lock and sends outside it, so a slow root never blocks a join.
//!
//! A child that never drains its stream does not stall the others: each
//! child's stream is an unbounded queue.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use winmux_core::event::Event;
use winmux_core::queue;

use crate::env::{DrawCommand, DrawSink, Env, Events};

/// How a child's closing affects the mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildRole {
    /// Closing tears down the whole mux and closes the root.
    Master,
    /// Closing removes only this child.
    Ordinary,
}

/// Identity of a child within its mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildId(u64);

impl ChildId {
    /// Raw numeric id, unique per mux.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Registry {
    children: Vec<(ChildId, Sender<Event>)>,
    last_resize: Option<Event>,
    /// `None` once the master has closed; forwarders then discard.
    root_sink: Option<Sender<DrawCommand>>,
    next_id: u64,
    /// Set once no child will receive further events.
    closed: bool,
}

impl Registry {
    fn broadcast(&self, event: Event) {
        for (id, tx) in &self.children {
            if tx.send(event).is_err() {
                tracing::trace!(child = id.0, %event, "child stream gone");
            }
        }
    }

    /// Ends every child stream. The root sink stays connected.
    fn end_streams(&mut self) {
        self.children.clear();
        self.closed = true;
    }

    /// Ends every child stream and disconnects the root sink.
    fn tear_down(&mut self) {
        self.end_streams();
        self.root_sink = None;
    }
}

#[derive(Debug)]
struct Shared {
    registry: Mutex<Registry>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Splits one root environment into many.
///
/// Cloning is cheap; all clones refer to the same mux.
#[derive(Debug, Clone)]
pub struct Mux {
    shared: Arc<Shared>,
}

impl Mux {
    /// Start multiplexing `root`. Returns the mux and its master child.
    pub fn new<E: Env + 'static>(root: E) -> (Mux, MuxEnv) {
        let (root_tx, root_rx) = crossbeam_channel::bounded::<DrawCommand>(0);
        let mux = Mux {
            shared: Arc::new(Shared {
                registry: Mutex::new(Registry {
                    children: Vec::new(),
                    last_resize: None,
                    root_sink: Some(root_tx),
                    next_id: 0,
                    closed: false,
                }),
            }),
        };
        let master = mux.make_child(ChildRole::Master);

        let root = Arc::new(root);
        {
            let root = Arc::clone(&root);
            thread::spawn(move || fan_in(root_rx, root));
        }
        {
            let shared = Arc::clone(&mux.shared);
            thread::spawn(move || fan_out(shared, root));
        }

        (mux, master)
    }

    /// Create an ordinary child.
    pub fn make_env(&self) -> MuxEnv {
        self.make_child(ChildRole::Ordinary)
    }

    /// Number of children currently receiving events.
    pub fn child_count(&self) -> usize {
        self.shared.lock().children.len()
    }

    /// Whether the child event streams have ended, either because the master
    /// closed or because the root's stream ended.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    fn make_child(&self, role: ChildRole) -> MuxEnv {
        let (event_tx, event_rx) = queue::channel::<Event>();
        let (draw_tx, draw_rx) = crossbeam_channel::bounded::<DrawCommand>(0);

        let id = {
            let mut registry = self.shared.lock();
            let id = ChildId(registry.next_id);
            registry.next_id += 1;

            if registry.closed {
                // Dropping the only sender ends the stream right away.
                tracing::debug!(child = id.0, "child created after streams ended");
                drop(event_tx);
            } else {
                if let Some(resize) = registry.last_resize
                    && event_tx.send(resize).is_err()
                {
                    tracing::trace!(child = id.0, "resize replay dropped; child stream gone");
                }
                registry.children.push((id, event_tx));
                tracing::debug!(child = id.0, ?role, children = registry.children.len(), "child joined");
            }
            id
        };

        let shared = Arc::clone(&self.shared);
        thread::spawn(move || forward(shared, id, role, draw_rx));

        MuxEnv {
            id,
            role,
            events: Events::new(event_rx),
            sink: DrawSink::new(draw_tx),
        }
    }
}

/// Root-facing end: apply every forwarded command, then close the root.
fn fan_in<E: Env>(commands: Receiver<DrawCommand>, root: Arc<E>) {
    for command in commands {
        root.draw(command);
    }
    tracing::debug!("mux root sink closed; closing root");
    root.close();
}

/// Broadcast root events until the root stream ends, then end every child.
fn fan_out<E: Env>(shared: Arc<Shared>, root: Arc<E>) {
    for event in root.events() {
        let mut registry = shared.lock();
        if event.is_resize() {
            registry.last_resize = Some(event);
        }
        registry.broadcast(event);
    }

    tracing::debug!("mux root stream ended; ending child streams");
    shared.lock().end_streams();
}

/// Child-facing end: move one child's commands to the root sink.
fn forward(shared: Arc<Shared>, id: ChildId, role: ChildRole, commands: Receiver<DrawCommand>) {
    for command in commands {
        let sink = shared.lock().root_sink.clone();
        match sink {
            Some(sink) => {
                if sink.send(command).is_err() {
                    tracing::trace!(child = id.0, "root gone; draw discarded");
                }
            }
            None => tracing::trace!(child = id.0, "mux torn down; draw discarded"),
        }
    }

    let mut registry = shared.lock();
    match role {
        ChildRole::Master => {
            tracing::debug!(child = id.0, "master closed; tearing down mux");
            registry.tear_down();
        }
        ChildRole::Ordinary => {
            registry.children.retain(|(child, _)| *child != id);
            tracing::debug!(child = id.0, children = registry.children.len(), "child left");
        }
    }
}

/// A virtual environment handed out by a [`Mux`].
///
/// Dropping it closes it.
#[derive(Debug)]
pub struct MuxEnv {
    id: ChildId,
    role: ChildRole,
    events: Events,
    sink: DrawSink,
}

impl MuxEnv {
    /// This child's identity.
    #[must_use]
    pub const fn id(&self) -> ChildId {
        self.id
    }

    /// This child's role.
    #[must_use]
    pub const fn role(&self) -> ChildRole {
        self.role
    }
}

impl Env for MuxEnv {
    fn events(&self) -> &Events {
        &self.events
    }

    fn draw(&self, command: DrawCommand) {
        self.sink.send(command);
    }

    fn close(&self) {
        self.sink.close();
    }
}
