#![forbid(unsafe_code)]

//! Terminal mode guard.
//!
//! [`TermSession`] owns every terminal mode the surface switches on and
//! switches them off again, in reverse order, when dropped:
//!
//! | Mode | Enable | Disable |
//! |------|--------|---------|
//! | Raw mode | `enable_raw_mode` | `disable_raw_mode` |
//! | Alternate screen | `CSI ? 1049 h` | `CSI ? 1049 l` |
//! | Mouse (SGR) | `CSI ? 1000;1002;1003;1006 h` | `CSI ? 1000;1002;1003;1006 l` |
//! | Keyboard enhancement | `CSI > 3 u` | `CSI < 1 u` |
//! | Cursor | `CSI ? 25 l` | `CSI ? 25 h` |
//!
//! Keyboard enhancement (key release and repeat reporting) is only requested
//! when the terminal advertises it; elsewhere keys arrive as presses only.
//!
//! A panic hook restores the terminal on a best-effort basis before the
//! previous hook prints the panic message.

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::event::{KeyboardEnhancementFlags, PushKeyboardEnhancementFlags};

/// RAII guard over the terminal modes a surface needs.
#[derive(Debug)]
pub struct TermSession {
    raw_mode: bool,
    alternate_screen: bool,
    mouse: bool,
    keyboard_enhancement: bool,
    cursor_hidden: bool,
}

impl TermSession {
    /// Enter raw mode and the alternate screen, capture the mouse, hide the
    /// cursor, and set the window title if `title` is non-empty.
    ///
    /// # Errors
    ///
    /// Returns the first terminal error. Modes already enabled are restored
    /// before returning.
    pub fn enter(title: &str) -> io::Result<Self> {
        install_panic_hook();

        let mut session = Self {
            raw_mode: false,
            alternate_screen: false,
            mouse: false,
            keyboard_enhancement: false,
            cursor_hidden: false,
        };

        crossterm::terminal::enable_raw_mode()?;
        session.raw_mode = true;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        let mut stdout = io::stdout();

        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        session.alternate_screen = true;

        crossterm::execute!(stdout, crossterm::event::EnableMouseCapture)?;
        session.mouse = true;

        if crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false) {
            crossterm::execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            session.keyboard_enhancement = true;
            #[cfg(feature = "tracing")]
            tracing::info!("keyboard enhancement enabled");
        }

        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        session.cursor_hidden = true;

        if !title.is_empty() {
            crossterm::execute!(stdout, crossterm::terminal::SetTitle(title))?;
        }

        Ok(session)
    }

    /// Whether key release and repeat events will be reported.
    #[must_use]
    pub const fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhancement
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.cursor_hidden {
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            self.cursor_hidden = false;
        }

        if self.keyboard_enhancement {
            let _ = crossterm::execute!(stdout, crossterm::event::PopKeyboardEnhancementFlags);
            self.keyboard_enhancement = false;
        }

        if self.mouse {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
            self.mouse = false;
        }

        if self.alternate_screen {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen = false;
        }

        if self.raw_mode {
            let _ = crossterm::terminal::disable_raw_mode();
            self.raw_mode = false;
            #[cfg(feature = "tracing")]
            tracing::info!("terminal raw mode disabled");
        }

        let _ = stdout.flush();
    }
}

impl Drop for TermSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::event::PopKeyboardEnhancementFlags);
    let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

// Entering a session would take over the test runner's terminal; the mode
// bookkeeping is covered by the presenter and input tests instead.
