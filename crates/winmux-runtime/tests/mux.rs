//! Mux fan-out, fan-in, and teardown.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use winmux_core::event::{Event, MouseButton};
use winmux_core::geometry::{Point, Rect};
use winmux_core::queue;
use winmux_render::{PixelBuffer, Rgba};
use winmux_runtime::{ChildRole, DrawCommand, DrawSink, Env, Events, Mux, MuxEnv};

const WAIT: Duration = Duration::from_secs(5);
const BRIEF: Duration = Duration::from_millis(50);

/// A root environment driven directly by the test.
struct ScriptedRoot {
    events: Events,
    sink: DrawSink,
}

impl Env for ScriptedRoot {
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

/// The test's side of a scripted root: feed events in, watch draws come out.
struct RootHandle {
    feed: Sender<Event>,
    draws: Receiver<DrawCommand>,
}

fn scripted_root() -> (ScriptedRoot, RootHandle) {
    let (feed, events) = queue::channel();
    let (draw_tx, draws) = crossbeam_channel::unbounded();
    (
        ScriptedRoot {
            events: Events::new(events),
            sink: DrawSink::new(draw_tx),
        },
        RootHandle { feed, draws },
    )
}

fn next(env: &MuxEnv) -> Event {
    env.events().recv_timeout(WAIT).expect("event within timeout")
}

fn assert_ended(env: &MuxEnv) {
    loop {
        match env.events().recv_timeout(WAIT) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => panic!("child {:?} stream did not end", env.id()),
        }
    }
}

fn assert_root_closed(draws: &Receiver<DrawCommand>) {
    loop {
        match draws.recv_timeout(WAIT) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => panic!("root was not closed"),
        }
    }
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + WAIT;
    while std::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn late_joiner_sees_last_resize_first() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    assert_eq!(master.role(), ChildRole::Master);

    let r1 = Event::Resize(Rect::from_size(640, 480));
    let r2 = Event::Resize(Rect::from_size(800, 600));
    handle.feed.send(r1).unwrap();
    handle.feed.send(Event::Close).unwrap();
    handle.feed.send(r2).unwrap();
    assert_eq!(next(&master), r1);
    assert_eq!(next(&master), Event::Close);
    assert_eq!(next(&master), r2);

    let late = mux.make_env();
    assert_eq!(late.role(), ChildRole::Ordinary);
    assert_eq!(next(&late), r2);
}

#[test]
fn no_replay_before_any_resize() {
    let (root, _handle) = scripted_root();
    let (mux, _master) = Mux::new(root);
    let child = mux.make_env();
    assert_eq!(
        child.events().recv_timeout(BRIEF),
        Err(RecvTimeoutError::Timeout)
    );
}

#[test]
fn every_child_sees_every_event_in_order() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let a = mux.make_env();
    let b = mux.make_env();
    assert!(wait_until(|| mux.child_count() == 3));

    let sent = vec![
        Event::MouseMove(Point::new(1, 2)),
        Event::MouseDown(MouseButton::Left, Point::new(1, 2)),
        Event::KeyboardChar('x'),
        Event::KeyboardDown("enter"),
        Event::Close,
    ];
    for &e in &sent {
        handle.feed.send(e).unwrap();
    }

    for child in [&master, &a, &b] {
        let got: Vec<_> = (0..sent.len()).map(|_| next(child)).collect();
        assert_eq!(got, sent, "child {:?}", child.id());
    }
}

#[test]
fn child_draws_reach_root() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let child = mux.make_env();

    let square = Rect::new(2, 2, 3, 3);
    child.paint(move |buf| buf.fill(square, Rgba::RED));
    master.paint(|buf| buf.fill(Rect::new(0, 0, 1, 1), Rgba::BLUE));

    let mut buf = PixelBuffer::new(Rect::from_size(8, 8));
    let mut damage = Rect::EMPTY;
    for _ in 0..2 {
        let command = handle.draws.recv_timeout(WAIT).expect("forwarded draw");
        damage = damage.union(&command(&mut buf));
    }
    assert_eq!(damage, Rect::new(0, 0, 1, 1).union(&square));
    assert_eq!(buf.get(3, 3), Some(Rgba::RED));
    assert_eq!(buf.get(0, 0), Some(Rgba::BLUE));
}

#[test]
fn closing_ordinary_child_affects_only_it() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let leaving = mux.make_env();
    let staying = mux.make_env();
    assert!(wait_until(|| mux.child_count() == 3));

    leaving.close();
    assert_ended(&leaving);
    assert!(wait_until(|| mux.child_count() == 2));
    assert!(!mux.is_closed());

    handle.feed.send(Event::KeyboardChar('k')).unwrap();
    assert_eq!(next(&staying), Event::KeyboardChar('k'));
    assert_eq!(next(&master), Event::KeyboardChar('k'));

    // The root is untouched: draws still flow.
    staying.paint(|buf| buf.fill(Rect::new(0, 0, 1, 1), Rgba::WHITE));
    assert!(handle.draws.recv_timeout(WAIT).is_ok());
}

#[test]
fn closing_master_tears_everything_down() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let a = mux.make_env();
    let b = mux.make_env();

    master.close();
    assert_ended(&a);
    assert_ended(&b);
    assert_ended(&master);
    assert_root_closed(&handle.draws);
    assert!(mux.is_closed());
    assert_eq!(mux.child_count(), 0);

    // Survivors may keep drawing; nothing breaks and nothing arrives.
    a.paint(|buf| buf.fill(Rect::new(0, 0, 1, 1), Rgba::WHITE));
    b.close();
}

#[test]
fn children_made_after_teardown_start_ended() {
    let (root, _handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    master.close();
    assert!(wait_until(|| mux.is_closed()));

    let late = mux.make_env();
    assert_ended(&late);
    late.paint(|buf| buf.fill(Rect::new(0, 0, 1, 1), Rgba::WHITE));
}

#[test]
fn root_stream_end_ends_all_children() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let child = mux.make_env();

    handle.feed.send(Event::Close).unwrap();
    drop(handle.feed);

    assert_eq!(next(&master), Event::Close);
    assert_eq!(next(&child), Event::Close);
    assert_ended(&master);
    assert_ended(&child);
    assert!(wait_until(|| mux.is_closed()));
    assert_eq!(mux.child_count(), 0);
    assert_eq!(
        handle.draws.recv_timeout(BRIEF).err(),
        Some(RecvTimeoutError::Timeout),
        "root stays open"
    );

    let late = mux.make_env();
    assert_ended(&late);
}

#[test]
fn draws_still_reach_root_after_root_stream_ends() {
    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let child = mux.make_env();

    drop(handle.feed);
    assert_ended(&child);
    assert_ended(&master);

    child.paint(|buf| buf.fill(Rect::new(1, 1, 2, 2), Rgba::GREEN));
    let command = handle.draws.recv_timeout(WAIT).expect("draw forwarded to root");
    let mut buf = PixelBuffer::new(Rect::from_size(4, 4));
    assert_eq!(command(&mut buf), Rect::new(1, 1, 2, 2));
    assert_eq!(buf.get(2, 2), Some(Rgba::GREEN));

    // Closing an ordinary child still leaves the root open.
    child.close();
    assert_eq!(
        handle.draws.recv_timeout(BRIEF).err(),
        Some(RecvTimeoutError::Timeout)
    );

    // Only the master closes the root.
    master.close();
    assert_root_closed(&handle.draws);
}

#[test]
fn dropping_ordinary_child_leaves() {
    let (root, _handle) = scripted_root();
    let (mux, _master) = Mux::new(root);
    let child = mux.make_env();
    assert!(wait_until(|| mux.child_count() == 2));
    drop(child);
    assert!(wait_until(|| mux.child_count() == 1));
}

#[test]
fn child_ids_are_unique() {
    let (root, _handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let a = mux.make_env();
    let b = mux.clone().make_env();
    assert_ne!(master.id(), a.id());
    assert_ne!(a.id(), b.id());
}

/// Event number `i` of a numbered stream; every 16th is a resize.
fn numbered(i: u32) -> Event {
    if i % 16 == 0 {
        Event::Resize(Rect::from_size(i + 1, 1))
    } else {
        Event::MouseMove(Point::new(i as i32, 0))
    }
}

fn number_of(event: Event) -> u32 {
    match event {
        Event::Resize(r) => r.width - 1,
        Event::MouseMove(p) => p.x as u32,
        other => panic!("unexpected event {other}"),
    }
}

/// Check what a child joining mid-stream saw: the replayed resize, then a
/// gap-free, duplicate-free run of the numbered stream that picks up right
/// after the replay (only non-resize events may fall in between).
/// `complete` requires the run to reach the end of the stream.
fn assert_contiguous_after_replay(got: &[Event], total: u32, complete: bool) {
    let (first, rest) = got.split_first().expect("replayed resize");
    assert!(first.is_resize(), "first event {first} is not a resize");
    let replayed = number_of(*first);

    let numbers: Vec<u32> = rest.iter().map(|e| number_of(*e)).collect();
    let start = numbers.first().copied().unwrap_or(total);
    assert!(start > replayed, "run starts at {start}, replay was {replayed}");
    assert!(
        (replayed + 1..start).all(|i| !numbered(i).is_resize()),
        "missed a resize between {replayed} and {start}"
    );

    let expected: Vec<u32> = (start..start + numbers.len() as u32).collect();
    assert_eq!(numbers, expected, "gap or duplicate after {start}");
    if complete && let Some(&last) = numbers.last() {
        assert_eq!(last, total - 1, "run stopped before the end");
    }
}

fn drain(env: &MuxEnv) -> Vec<Event> {
    let mut got = Vec::new();
    loop {
        match env.events().recv_timeout(WAIT) {
            Ok(e) => got.push(e),
            Err(RecvTimeoutError::Disconnected) => return got,
            Err(RecvTimeoutError::Timeout) => panic!("child {:?} stream did not end", env.id()),
        }
    }
}

#[test]
fn join_and_leave_race_with_broadcast() {
    const TOTAL: u32 = 3000;
    const JOINERS: usize = 40;

    let (root, handle) = scripted_root();
    let (mux, master) = Mux::new(root);
    let feed = handle.feed;

    // Make sure a resize is cached before anyone joins.
    feed.send(numbered(0)).unwrap();
    assert_eq!(next(&master), numbered(0));

    let feeder = thread::spawn(move || {
        for i in 1..TOTAL {
            feed.send(numbered(i)).unwrap();
            if i % 64 == 0 {
                thread::yield_now();
            }
        }
        feed
    });

    let joiner = {
        let mux = mux.clone();
        thread::spawn(move || {
            let mut kept = Vec::new();
            let mut left = Vec::new();
            for j in 0..JOINERS {
                let env = mux.make_env();
                if j % 2 == 1 {
                    let mut seen = Vec::new();
                    for _ in 0..3 {
                        if let Ok(e) = env.events().recv_timeout(BRIEF) {
                            seen.push(e);
                        }
                    }
                    env.close();
                    seen.extend(drain(&env));
                    left.push(seen);
                } else {
                    kept.push(env);
                }
                thread::sleep(Duration::from_micros(250));
            }
            (kept, left)
        })
    };

    let (kept, left) = joiner.join().unwrap();
    let feed = feeder.join().unwrap();
    drop(feed);

    let master_saw: Vec<u32> = drain(&master).into_iter().map(number_of).collect();
    assert_eq!(master_saw, (1..TOTAL).collect::<Vec<_>>());

    for env in &kept {
        assert_contiguous_after_replay(&drain(env), TOTAL, true);
    }
    for seen in &left {
        assert_contiguous_after_replay(seen, TOTAL, false);
    }
    assert_eq!(mux.child_count(), 0);
}
