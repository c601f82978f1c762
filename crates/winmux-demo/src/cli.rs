#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `WINMUX_DEMO_*` prefix.

use std::env;
use std::process;

use crate::scenes::Scene;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
winmux demo: one surface, many consumers

USAGE:
    winmux-demo [OPTIONS]

OPTIONS:
    --scene=NAME     Scene to run (default: minimal)
    --size=WxH       Requested surface size in pixels
    --help, -h       Show this help message
    --version, -V    Show version

SCENES:
    minimal    Repaint on every resize, close on request
    xor        XOR pattern over the whole surface
    blinker    Four rectangles sharing one window through a mux

KEYBINDINGS:
    Escape / q / Ctrl+C    Quit (xor, blinker)
    Left click             Blink a rectangle (blinker)

ENVIRONMENT VARIABLES:
    WINMUX_DEMO_SCENE    Override --scene
    WINMUX_DEMO_SIZE     Override --size
    WINMUX_LOG           Write tracing output to this file
    RUST_LOG             Log filter for WINMUX_LOG (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Scene to run.
    pub scene: Scene,
    /// Requested surface size; `None` means the scene's default.
    pub size: Option<(u32, u32)>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            scene: Scene::Minimal,
            size: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or bad input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("winmux-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `var` as the environment lookup.
    ///
    /// Environment variables take precedence over defaults but are
    /// overridden by explicit command-line flags. Malformed environment
    /// values are ignored.
    pub fn parse_from<S, F>(args: &[S], var: F) -> Result<Command, String>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = var("WINMUX_DEMO_SCENE")
            && let Some(scene) = Scene::from_name(&val)
        {
            opts.scene = scene;
        }
        if let Some(val) = var("WINMUX_DEMO_SIZE")
            && let Some(size) = parse_size(&val)
        {
            opts.size = Some(size);
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--scene=") {
                        opts.scene = Scene::from_name(val)
                            .ok_or_else(|| format!("Invalid --scene value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--size=") {
                        opts.size = Some(
                            parse_size(val).ok_or_else(|| format!("Invalid --size value: {val}"))?,
                        );
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

/// Parse `WxH` with both sides non-zero.
fn parse_size(val: &str) -> Option<(u32, u32)> {
    let (w, h) = val.split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}
