#![forbid(unsafe_code)]

//! The demo scenes.

use std::thread;
use std::time::Duration;

use winmux_core::event::{Event, MouseButton};
use winmux_core::geometry::Rect;
use winmux_render::Rgba;
use winmux_runtime::{Env, Mux};

/// How long each half of a blink lasts.
pub const BLINK_PERIOD: Duration = Duration::from_millis(333);

/// Number of off/on cycles per click.
pub const BLINKS: usize = 3;

/// Available scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Minimal,
    Xor,
    Blinker,
}

impl Scene {
    pub const ALL: [Scene; 3] = [Scene::Minimal, Scene::Xor, Scene::Blinker];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scene| scene.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Xor => "xor",
            Self::Blinker => "blinker",
        }
    }

    /// Window title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Minimal => "winmux-minimal",
            Self::Xor => "winmux-xor",
            Self::Blinker => "winmux-blinker",
        }
    }

    /// Requested surface size when none is given.
    pub const fn default_size(self) -> (u32, u32) {
        match self {
            Self::Minimal => (640, 480),
            Self::Xor => (512, 512),
            Self::Blinker => (800, 600),
        }
    }
}

/// True for the events the interactive scenes quit on.
pub fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Close | Event::KeyboardDown("escape") | Event::KeyboardChar('q')
    )
}

/// Touch the whole surface on every resize; close on request.
pub fn minimal<E: Env>(env: &E) {
    for event in env.events() {
        match event {
            Event::Close => env.close(),
            Event::Resize(_) => env.paint(|buf| buf.bounds()),
            _ => {}
        }
    }
}

/// Colour of the XOR pattern at `(x, y)`.
pub fn xor_color(x: u32, y: u32) -> Rgba {
    let c = (x ^ y) as u8;
    Rgba::rgba(c, c % 192, c, 255)
}

/// Fill the surface with the XOR pattern on every resize.
pub fn xor<E: Env>(env: &E) {
    for event in env.events() {
        tracing::debug!(%event, "xor");
        if is_quit(&event) {
            env.close();
        } else if event.is_resize() {
            env.paint(|buf| {
                let bounds = buf.bounds();
                buf.fill_with(bounds, xor_color)
            });
        }
    }
}

/// The four blinker rectangles inside `bounds`.
///
/// At 800x600 these are the rectangles (100,100)-(350,250),
/// (450,100)-(700,250), (100,350)-(350,500) and (450,350)-(700,500).
pub fn quadrants(bounds: Rect) -> [Rect; 4] {
    let w = u64::from(bounds.width);
    let h = u64::from(bounds.height);
    let at = |len: u64, num: u64, den: u64| (len * num / den) as u32;

    let xs = [at(w, 1, 8), at(w, 7, 16), at(w, 9, 16), at(w, 7, 8)];
    let ys = [at(h, 1, 6), at(h, 5, 12), at(h, 7, 12), at(h, 5, 6)];
    let cell = |col: usize, row: usize| {
        Rect::from_corners(
            bounds.x + xs[col * 2],
            bounds.y + ys[row * 2],
            bounds.x + xs[col * 2 + 1],
            bounds.y + ys[row * 2 + 1],
        )
    };

    [cell(0, 0), cell(1, 0), cell(0, 1), cell(1, 1)]
}

/// One blinking rectangle, living in quadrant `index` of the surface.
///
/// Paints white on every resize and blinks [`BLINKS`] times when clicked.
/// Closes its environment once the event stream ends.
pub fn blinker<E: Env>(env: &E, index: usize, period: Duration) {
    let redraw = |rect: Rect, visible: bool| {
        let color = if visible { Rgba::WHITE } else { Rgba::BLACK };
        env.paint(move |buf| buf.fill(rect, color));
    };

    let mut rect = None;
    for event in env.events() {
        match event {
            Event::Resize(bounds) => {
                let r = quadrants(bounds)[index % 4];
                rect = Some(r);
                redraw(r, true);
            }
            Event::MouseDown(MouseButton::Left, p) => {
                let Some(r) = rect.filter(|r| p.is_in(*r)) else {
                    continue;
                };
                tracing::debug!(index, "blink");
                for _ in 0..BLINKS {
                    redraw(r, false);
                    thread::sleep(period);
                    redraw(r, true);
                    thread::sleep(period);
                }
            }
            _ => {}
        }
    }

    env.close();
}

/// Share `root` between four blinkers; the master quits on request.
pub fn blinkers<E: Env + 'static>(root: E, period: Duration) {
    let (mux, master) = Mux::new(root);

    let children: Vec<_> = (0..4)
        .map(|index| {
            let env = mux.make_env();
            thread::spawn(move || blinker(&env, index, period))
        })
        .collect();

    for event in master.events() {
        if is_quit(&event) {
            master.close();
        }
    }

    for child in children {
        if child.join().is_err() {
            tracing::warn!("blinker panicked");
        }
    }
}

/// Run `scene` on `env`.
pub fn run<E: Env + 'static>(scene: Scene, env: E) {
    tracing::info!(scene = scene.as_str(), "scene start");
    match scene {
        Scene::Minimal => minimal(&env),
        Scene::Xor => xor(&env),
        Scene::Blinker => blinkers(env, BLINK_PERIOD),
    }
    tracing::info!(scene = scene.as_str(), "scene end");
}
