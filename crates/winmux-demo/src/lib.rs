#![forbid(unsafe_code)]

//! Demo scenes for winmux.
//!
//! Each scene is a plain function over an [`winmux_runtime::Env`], so the
//! same code drives a terminal window in the binary and a headless window
//! in tests.

pub mod cli;
pub mod scenes;
