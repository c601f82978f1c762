#![forbid(unsafe_code)]

//! winmux demo binary entry point.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use winmux_demo::cli;
use winmux_demo::scenes;
use winmux_runtime::{Window, WindowOptions};
use winmux_term::TermBackend;

fn main() {
    let opts = cli::Opts::parse();
    init_logging();

    // Without an explicit size, ask for the terminal as it is.
    let (width, height) = opts
        .size
        .or_else(|| winmux_term::framebuffer_size().ok())
        .unwrap_or_else(|| opts.scene.default_size());
    let options = WindowOptions::default()
        .title(opts.scene.title())
        .size(width, height)
        .resizable(true);

    let mut backend = TermBackend::new();
    match Window::open(&mut backend, options) {
        Ok(window) => scenes::run(opts.scene, window),
        Err(e) => {
            eprintln!("Failed to open window: {e}");
            std::process::exit(1);
        }
    }
}

/// Log to the file named by `WINMUX_LOG`; the terminal itself is the surface.
fn init_logging() {
    let Some(path) = std::env::var_os("WINMUX_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", path.to_string_lossy());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init();
}
