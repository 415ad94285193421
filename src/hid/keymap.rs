//! Key name and character translation to HID usage IDs (US layout)

use super::{MODIFIER_LEFT_ALT, MODIFIER_LEFT_CTRL, MODIFIER_LEFT_GUI, MODIFIER_LEFT_SHIFT};

pub const KEY_A: u8 = 0x04;
pub const KEY_1: u8 = 0x1E;
pub const KEY_0: u8 = 0x27;
pub const KEY_ENTER: u8 = 0x28;
pub const KEY_ESCAPE: u8 = 0x29;
pub const KEY_BACKSPACE: u8 = 0x2A;
pub const KEY_TAB: u8 = 0x2B;
pub const KEY_SPACE: u8 = 0x2C;
pub const KEY_F1: u8 = 0x3A;
pub const KEY_INSERT: u8 = 0x49;
pub const KEY_HOME: u8 = 0x4A;
pub const KEY_PAGE_UP: u8 = 0x4B;
pub const KEY_DELETE: u8 = 0x4C;
pub const KEY_END: u8 = 0x4D;
pub const KEY_PAGE_DOWN: u8 = 0x4E;
pub const KEY_ARROW_RIGHT: u8 = 0x4F;
pub const KEY_ARROW_LEFT: u8 = 0x50;
pub const KEY_ARROW_DOWN: u8 = 0x51;
pub const KEY_ARROW_UP: u8 = 0x52;

/// Modifier bit for a key name, if it names a modifier
pub fn modifier_from_name(name: &str) -> Option<u8> {
    match name.to_ascii_uppercase().as_str() {
        "CTRL" | "CONTROL" => Some(MODIFIER_LEFT_CTRL),
        "ALT" => Some(MODIFIER_LEFT_ALT),
        "SHIFT" => Some(MODIFIER_LEFT_SHIFT),
        "GUI" | "WIN" | "CMD" | "META" => Some(MODIFIER_LEFT_GUI),
        _ => None,
    }
}

/// Usage ID for a primary key name
pub fn keycode_from_name(name: &str) -> Option<u8> {
    let upper = name.to_ascii_uppercase();
    let code = match upper.as_str() {
        "ENTER" | "RETURN" => KEY_ENTER,
        "ESC" | "ESCAPE" => KEY_ESCAPE,
        "UP" => KEY_ARROW_UP,
        "DOWN" => KEY_ARROW_DOWN,
        "LEFT" => KEY_ARROW_LEFT,
        "RIGHT" => KEY_ARROW_RIGHT,
        "TAB" => KEY_TAB,
        "SPACE" => KEY_SPACE,
        "BACKSPACE" => KEY_BACKSPACE,
        "DELETE" | "DEL" => KEY_DELETE,
        "INSERT" => KEY_INSERT,
        "HOME" => KEY_HOME,
        "END" => KEY_END,
        "PAGEUP" => KEY_PAGE_UP,
        "PAGEDOWN" => KEY_PAGE_DOWN,
        _ => return single_key(&upper).or_else(|| function_key(&upper)),
    };
    Some(code)
}

/// `A`-`Z` and `0`-`9` by name
fn single_key(upper: &str) -> Option<u8> {
    let mut chars = upper.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c {
        'A'..='Z' => Some(KEY_A + (c as u8 - b'A')),
        '1'..='9' => Some(KEY_1 + (c as u8 - b'1')),
        '0' => Some(KEY_0),
        _ => None,
    }
}

/// `F1`-`F12`
fn function_key(upper: &str) -> Option<u8> {
    let n: u8 = upper.strip_prefix('F')?.parse().ok()?;
    (1..=12).contains(&n).then(|| KEY_F1 + n - 1)
}

/// Modifier and usage ID needed to type `c`
pub fn char_to_key(c: char) -> Option<(u8, u8)> {
    if !c.is_ascii() {
        return None;
    }
    let b = c as u8;
    let plain = |usage| Some((0, usage));
    let shifted = |usage| Some((MODIFIER_LEFT_SHIFT, usage));

    match b {
        b'a'..=b'z' => plain(KEY_A + (b - b'a')),
        b'A'..=b'Z' => shifted(KEY_A + (b - b'A')),
        b'1'..=b'9' => plain(KEY_1 + (b - b'1')),
        b'0' => plain(KEY_0),
        b'\n' => plain(KEY_ENTER),
        b'\t' => plain(KEY_TAB),
        b' ' => plain(KEY_SPACE),
        b'-' => plain(0x2D),
        b'=' => plain(0x2E),
        b'[' => plain(0x2F),
        b']' => plain(0x30),
        b'\\' => plain(0x31),
        b';' => plain(0x33),
        b'\'' => plain(0x34),
        b'`' => plain(0x35),
        b',' => plain(0x36),
        b'.' => plain(0x37),
        b'/' => plain(0x38),
        b'!' => shifted(KEY_1),
        b'@' => shifted(KEY_1 + 1),
        b'#' => shifted(KEY_1 + 2),
        b'$' => shifted(KEY_1 + 3),
        b'%' => shifted(KEY_1 + 4),
        b'^' => shifted(KEY_1 + 5),
        b'&' => shifted(KEY_1 + 6),
        b'*' => shifted(KEY_1 + 7),
        b'(' => shifted(KEY_1 + 8),
        b')' => shifted(KEY_0),
        b'_' => shifted(0x2D),
        b'+' => shifted(0x2E),
        b'{' => shifted(0x2F),
        b'}' => shifted(0x30),
        b'|' => shifted(0x31),
        b':' => shifted(0x33),
        b'"' => shifted(0x34),
        b'~' => shifted(0x35),
        b'<' => shifted(0x36),
        b'>' => shifted(0x37),
        b'?' => shifted(0x38),
        _ => None,
    }
}
