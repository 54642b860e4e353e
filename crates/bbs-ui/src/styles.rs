//! Colour palette and render helpers for CLI output.
//!
//! Only the resolution state gets strong colour; structure (tree lines,
//! step names) stays neutral or muted.

use bbs_tree::ResolveState;
use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// Ayu Dark palette
const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - blue

/// Defined on the step itself.
pub const ICON_DEFINED: &str = "\u{25CF}"; // ●
/// Inherited from an ancestor.
pub const ICON_INHERITED: &str = "\u{25D0}"; // ◐
/// Not defined anywhere in the chain.
pub const ICON_UNDEFINED: &str = "\u{25CB}"; // ○

pub const TREE_BRANCH: &str = "\u{251C}\u{2500} "; // ├─
pub const TREE_LAST: &str = "\u{2514}\u{2500} "; // └─
pub const TREE_PIPE: &str = "\u{2502}  "; // │
pub const TREE_SPACE: &str = "   ";

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Step names in headers.
pub fn render_step(name: &str) -> String {
    color_bold_str(name, ACCENT)
}

/// Colours `s` by resolution state.
pub fn render_state(state: ResolveState, s: &str) -> String {
    match state {
        ResolveState::Defined => render_pass(s),
        ResolveState::Inherited => render_warn(s),
        ResolveState::Undefined => render_fail(s),
    }
}

pub fn state_icon(state: ResolveState) -> &'static str {
    match state {
        ResolveState::Defined => ICON_DEFINED,
        ResolveState::Inherited => ICON_INHERITED,
        ResolveState::Undefined => ICON_UNDEFINED,
    }
}

/// Lower-case label used in plain and JSON output.
pub fn state_label(state: ResolveState) -> &'static str {
    match state {
        ResolveState::Defined => "defined",
        ResolveState::Inherited => "inherited",
        ResolveState::Undefined => "undefined",
    }
}

/// The coloured state icon.
pub fn render_state_icon(state: ResolveState) -> String {
    render_state(state, state_icon(state))
}

/// Line prefix for a tree node.
///
/// `open` holds, for every ancestor level below the roots, whether that
/// ancestor still has siblings after it; `last` tells whether the node is
/// the last of its siblings.
pub fn tree_prefix(open: &[bool], last: bool) -> String {
    let mut out = String::new();
    for &more in open {
        out.push_str(if more { TREE_PIPE } else { TREE_SPACE });
    }
    out.push_str(if last { TREE_LAST } else { TREE_BRANCH });
    render_muted(&out)
}
