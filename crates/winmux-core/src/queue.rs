#![forbid(unsafe_code)]

//! Unbounded, order-preserving event queue.
//!
//! [`channel`] connects a producer to a consumer through a pump thread that
//! owns an internal FIFO buffer. Both channel ends handed out are
//! rendezvous channels; the buffering lives in the pump, so:
//!
//! - a burst of sends is absorbed while a delivery is pending,
//! - the consumer is only ever offered the oldest outstanding item,
//! - a slow consumer never blocks the producer (beyond memory limits).
//!
//! # Shutdown
//!
//! Dropping every [`Sender`] closes the inbound side. Items already queued
//! are still delivered in order, and only then does the outbound side report
//! disconnection. If the consumer goes away first, the pump exits and later
//! sends fail immediately instead of blocking.
//!
//! ```
//! use winmux_core::queue;
//!
//! let (tx, rx) = queue::channel();
//! for i in 0..3 {
//!     tx.send(i).unwrap();
//! }
//! drop(tx);
//! assert_eq!(rx.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
//! ```

use std::collections::VecDeque;
use std::thread;

use crossbeam_channel::{Receiver, Select, Sender};

/// Create a queue and spawn its pump thread.
///
/// Returns the inbound sink and the outbound stream.
pub fn channel<T: Send + 'static>() -> (Sender<T>, Receiver<T>) {
    let (in_tx, in_rx) = crossbeam_channel::bounded(0);
    let (out_tx, out_rx) = crossbeam_channel::bounded(0);

    thread::spawn(move || pump(in_rx, out_tx));

    (in_tx, out_rx)
}

fn pump<T>(inbound: Receiver<T>, outbound: Sender<T>) {
    let mut pending = VecDeque::new();

    loop {
        let Some(head) = pending.pop_front() else {
            // Nothing buffered: only accepting is possible.
            match inbound.recv() {
                Ok(item) => pending.push_back(item),
                Err(_) => {
                    crate::trace!("event queue closed");
                    return;
                }
            }
            continue;
        };

        // Offer both directions at once so a burst of sends is absorbed
        // while the head is waiting for the consumer.
        let mut sel = Select::new();
        let accept = sel.recv(&inbound);
        sel.send(&outbound);
        let oper = sel.select();

        if oper.index() == accept {
            pending.push_front(head);
            match oper.recv(&inbound) {
                Ok(item) => pending.push_back(item),
                Err(_) => {
                    drain(pending, &outbound);
                    return;
                }
            }
        } else if oper.send(&outbound, head).is_err() {
            crate::trace!(
                dropped = pending.len() + 1,
                "event queue consumer went away"
            );
            return;
        }
    }
}

/// Deliver everything still buffered, then let `outbound` drop.
fn drain<T>(pending: VecDeque<T>, outbound: &Sender<T>) {
    crate::trace!(remaining = pending.len(), "event queue draining");
    for item in pending {
        if outbound.send(item).is_err() {
            return;
        }
    }
}
