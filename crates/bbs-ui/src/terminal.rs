//! Terminal detection utilities.

use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

const AUTO: u8 = 0;
const ALWAYS: u8 = 1;
const NEVER: u8 = 2;

static COLOR_OVERRIDE: AtomicU8 = AtomicU8::new(AUTO);

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Forces colour on (`Some(true)`) or off (`Some(false)`) for the rest of the
/// process, or returns to detection (`None`).
pub fn set_color_override(force: Option<bool>) {
    let value = match force {
        None => AUTO,
        Some(true) => ALWAYS,
        Some(false) => NEVER,
    };
    COLOR_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Determines if ANSI colour codes should be used.
///
/// An explicit override wins. Otherwise `NO_COLOR` and `CLICOLOR=0`
/// disable colour, as does `TERM=dumb`; `CLICOLOR_FORCE` enables it even
/// off a TTY, and the fallback is TTY detection.
pub fn supports_color() -> bool {
    match COLOR_OVERRIDE.load(Ordering::Relaxed) {
        ALWAYS => return true,
        NEVER => return false,
        _ => {}
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }
    is_tty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_disables_color() {
        set_color_override(Some(false));
        assert!(!supports_color());
    }
}
