#![forbid(unsafe_code)]

//! Render loop.
//!
//! The loop owns the backing buffer. It blocks until a resize or a draw
//! arrives, then keeps taking further resizes and draws, unioning the damage
//! each one reports, until the flush interval passes with nothing new. Only
//! then does it blit the accumulated damage, in one call. A burst of paint
//! commands therefore costs one blit, and blits happen at most once per
//! flush interval.
//!
//! The loop ends when the draw stream ends. Dropping `finish` on the way out
//! tells the input loop to stop.

use core::ops::ControlFlow;
use core::time::Duration;

use crossbeam_channel::{Receiver, Select, Sender};
use winmux_backend::Presenter;
use winmux_core::geometry::Rect;
use winmux_render::PixelBuffer;

use crate::env::DrawCommand;

enum Msg {
    Resize(Rect),
    Draw(DrawCommand),
    ResizesClosed,
    DrawsClosed,
    Idle,
}

pub(crate) struct RenderLoop<P> {
    pub(crate) buffer: PixelBuffer,
    pub(crate) presenter: P,
    pub(crate) draws: Receiver<DrawCommand>,
    pub(crate) resizes: Receiver<Rect>,
    pub(crate) flush_interval: Duration,
    pub(crate) finish: Sender<()>,
}

impl<P: Presenter> RenderLoop<P> {
    pub(crate) fn run(mut self) {
        tracing::debug!(bounds = ?self.buffer.bounds(), "render loop started");
        let _ = self.drive();
        tracing::debug!("render loop ended");
        drop(self.finish);
    }

    fn drive(&mut self) -> ControlFlow<()> {
        self.flush(self.buffer.bounds())?;

        loop {
            let mut damage = Rect::EMPTY;
            self.handle(self.next(None), &mut damage)?;

            // Coalesce until the timer fires with nothing pending.
            loop {
                match self.next(Some(self.flush_interval)) {
                    Msg::Idle => break,
                    msg => self.handle(msg, &mut damage)?,
                }
            }
            self.flush(damage)?;
        }
    }

    /// Wait for the next message, at most `timeout` if given.
    fn next(&self, timeout: Option<Duration>) -> Msg {
        let mut sel = Select::new();
        let resize = sel.recv(&self.resizes);
        let draw = sel.recv(&self.draws);

        let oper = match timeout {
            None => sel.select(),
            Some(timeout) => match sel.select_timeout(timeout) {
                Ok(oper) => oper,
                Err(_) => return Msg::Idle,
            },
        };

        if oper.index() == resize {
            oper.recv(&self.resizes).map_or(Msg::ResizesClosed, Msg::Resize)
        } else {
            debug_assert_eq!(oper.index(), draw);
            oper.recv(&self.draws).map_or(Msg::DrawsClosed, Msg::Draw)
        }
    }

    fn handle(&mut self, msg: Msg, damage: &mut Rect) -> ControlFlow<()> {
        match msg {
            Msg::Resize(rect) => {
                self.buffer = self.buffer.resized(rect);
                *damage = damage.union(&rect);
            }
            Msg::Draw(command) => {
                let touched = command(&mut self.buffer);
                *damage = damage.union(&touched);
            }
            Msg::ResizesClosed => {
                // The input loop is gone; stop selecting on its channel.
                self.resizes = crossbeam_channel::never();
            }
            Msg::DrawsClosed => return ControlFlow::Break(()),
            Msg::Idle => {}
        }
        ControlFlow::Continue(())
    }

    /// Blit `damage`, clipped to the buffer. An empty clip is a no-op.
    fn flush(&mut self, damage: Rect) -> ControlFlow<()> {
        let bounds = self.buffer.bounds();
        let region = damage.intersection(&bounds);
        if region.is_empty() {
            return ControlFlow::Continue(());
        }

        let scratch = self.buffer.crop(region);
        match self.presenter.present(&scratch, bounds) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                tracing::error!(error = %err, ?region, "present failed; closing window");
                ControlFlow::Break(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::RecvTimeoutError;
    use std::thread;
    use winmux_backend::headless::{HeadlessBackend, HeadlessHost};
    use winmux_backend::{Backend, Surface, SurfaceConfig};
    use winmux_render::Rgba;

    const WAIT: Duration = Duration::from_secs(5);

    struct Harness {
        host: HeadlessHost,
        draws: Sender<DrawCommand>,
        resizes: Sender<Rect>,
        finish: Receiver<()>,
        thread: thread::JoinHandle<()>,
    }

    /// Start a render loop over a headless presenter. Draws are unbounded so
    /// tests can queue several before the loop looks at any of them.
    fn start(bounds: Rect, prequeued: Vec<DrawCommand>) -> Harness {
        let mut backend = HeadlessBackend::new();
        let host = backend.host();
        let mut surface = backend
            .open(&SurfaceConfig::default())
            .expect("headless open");
        let presenter = surface.presenter().expect("headless presenter");

        let (draw_tx, draw_rx) = crossbeam_channel::unbounded();
        for command in prequeued {
            draw_tx.send(command).unwrap();
        }
        let (resize_tx, resize_rx) = crossbeam_channel::bounded(0);
        let (finish_tx, finish_rx) = crossbeam_channel::bounded(0);

        let render = RenderLoop {
            buffer: PixelBuffer::new(bounds),
            presenter,
            draws: draw_rx,
            resizes: resize_rx,
            flush_interval: Duration::from_millis(20),
            finish: finish_tx,
        };
        let thread = thread::spawn(move || render.run());
        drop(surface);

        Harness {
            host,
            draws: draw_tx,
            resizes: resize_tx,
            finish: finish_rx,
            thread,
        }
    }

    fn fill(rect: Rect, color: Rgba) -> DrawCommand {
        Box::new(move |buf: &mut PixelBuffer| buf.fill(rect, color))
    }

    #[test]
    fn initial_flush_covers_whole_buffer() {
        let h = start(Rect::from_size(8, 6), Vec::new());
        assert!(h.host.wait_for_blits(1, WAIT));
        assert_eq!(h.host.blits()[0].rect(), Rect::from_size(8, 6));
        assert_eq!(h.host.blits()[0].frame, Rect::from_size(8, 6));
        drop(h.draws);
        h.thread.join().unwrap();
    }

    #[test]
    fn burst_is_coalesced_into_one_flush() {
        let a = Rect::new(10, 10, 10, 10);
        let b = Rect::new(30, 5, 5, 5);
        let h = start(
            Rect::from_size(64, 64),
            vec![fill(a, Rgba::RED), fill(b, Rgba::BLUE)],
        );

        assert!(h.host.wait_for_blits(2, WAIT));
        // Give a (wrong) second flush time to show up.
        thread::sleep(Duration::from_millis(100));
        let blits = h.host.blits();
        assert_eq!(blits.len(), 2, "one initial flush, one coalesced flush");
        assert_eq!(blits[1].rect(), a.union(&b));
        assert_eq!(blits[1].region.get(10, 10), Some(Rgba::RED));
        assert_eq!(blits[1].region.get(34, 9), Some(Rgba::BLUE));

        drop(h.draws);
        h.thread.join().unwrap();
    }

    #[test]
    fn damage_outside_buffer_is_not_flushed() {
        let offscreen: DrawCommand = Box::new(|_: &mut PixelBuffer| Rect::new(100, 100, 5, 5));
        let h = start(Rect::from_size(16, 16), vec![offscreen]);
        assert!(h.host.wait_for_blits(1, WAIT));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(h.host.blits().len(), 1);

        drop(h.draws);
        h.thread.join().unwrap();
    }

    #[test]
    fn resize_preserves_pixels_and_flushes_new_area() {
        let h = start(
            Rect::from_size(10, 10),
            vec![fill(Rect::new(2, 2, 1, 1), Rgba::GREEN)],
        );
        assert!(h.host.wait_for_blits(2, WAIT));

        h.resizes.send(Rect::from_size(20, 15)).unwrap();
        assert!(h.host.wait_for_blits(3, WAIT));
        let blit = &h.host.blits()[2];
        assert_eq!(blit.rect(), Rect::from_size(20, 15));
        assert_eq!(blit.frame, Rect::from_size(20, 15));
        assert_eq!(blit.region.get(2, 2), Some(Rgba::GREEN));

        drop(h.draws);
        h.thread.join().unwrap();
    }

    #[test]
    fn closing_draws_raises_finish() {
        let h = start(Rect::from_size(4, 4), Vec::new());
        drop(h.draws);
        assert_eq!(h.finish.recv_timeout(WAIT), Err(RecvTimeoutError::Disconnected));
        h.thread.join().unwrap();
    }

    #[test]
    fn present_failure_ends_loop() {
        let h = start(Rect::from_size(4, 4), Vec::new());
        assert!(h.host.wait_for_blits(1, WAIT));
        h.host.fail_presenting();

        h.draws.send(fill(Rect::from_size(4, 4), Rgba::WHITE)).unwrap();
        assert_eq!(h.finish.recv_timeout(WAIT), Err(RecvTimeoutError::Disconnected));
        h.thread.join().unwrap();
        // Later draws go nowhere.
        assert!(h.draws.send(fill(Rect::from_size(1, 1), Rgba::WHITE)).is_err());
    }

    #[test]
    fn input_loop_exit_does_not_stop_rendering() {
        let h = start(Rect::from_size(4, 4), Vec::new());
        assert!(h.host.wait_for_blits(1, WAIT));
        drop(h.resizes);

        h.draws.send(fill(Rect::new(1, 1, 1, 1), Rgba::WHITE)).unwrap();
        assert!(h.host.wait_for_blits(2, WAIT));
        assert_eq!(h.host.blits()[1].rect(), Rect::new(1, 1, 1, 1));

        drop(h.draws);
        h.thread.join().unwrap();
    }
}
