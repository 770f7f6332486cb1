//! Physical keys to input symbols.
//!
//! Both layouts put the same fingers on the same squares: white reads the
//! home row left to right as a..h, black reads it right to left.

use crate::domain::Key;
use crate::error::ScriptError;
use crate::input::RawKey;

const HOME_ROW: [&str; 8] = ["a", "s", "d", "f", "j", "k", "l", ";"];
const TOP_ROW: [&str; 8] = ["q", "w", "e", "r", "u", "i", "o", "p"];
const BOTTOM_ROW: [&str; 8] = ["z", "x", "c", "v", "n", "m", ",", "."];

const COORDS: [Key; 8] = [
    Key::A1,
    Key::B2,
    Key::C3,
    Key::D4,
    Key::E5,
    Key::F6,
    Key::G7,
    Key::H8,
];

const PIECES: [Key; 8] = [
    Key::QueenRook,
    Key::QueenKnight,
    Key::QueenBishop,
    Key::Queen,
    Key::King,
    Key::KingBishop,
    Key::KingKnight,
    Key::KingRook,
];

const CAPTURES: [Key; 8] = [
    Key::TakeQueenRook,
    Key::TakeQueenKnight,
    Key::TakeQueenBishop,
    Key::TakeQueen,
    Key::TakeKing,
    Key::TakeKingBishop,
    Key::TakeKingKnight,
    Key::TakeKingRook,
];

const PAWNS: [Key; 8] = [
    Key::PawnA,
    Key::PawnB,
    Key::PawnC,
    Key::PawnD,
    Key::PawnE,
    Key::PawnF,
    Key::PawnG,
    Key::PawnH,
];

const PAWN_CAPTURES: [Key; 8] = [
    Key::TakePawnA,
    Key::TakePawnB,
    Key::TakePawnC,
    Key::TakePawnD,
    Key::TakePawnE,
    Key::TakePawnF,
    Key::TakePawnG,
    Key::TakePawnH,
];

/// Numeric pad on the right hand, used with ctrl or alt
const NUMPAD_KEYS: [(&str, Key); 8] = [
    ("u", Key::Num7),
    ("i", Key::Num8),
    ("o", Key::Num9),
    ("j", Key::Num4),
    ("l", Key::Num6),
    ("m", Key::Num1),
    (",", Key::Num2),
    (".", Key::Num3),
];

/// Translate one key press for the given side
pub fn translate(raw: &RawKey, is_white: bool) -> Key {
    match raw.key.as_str() {
        "escape" | "space" => return Key::Esc,
        "enter" => return Key::Enter,
        _ => {}
    }

    if raw.control || raw.alt {
        return translate_modified(raw);
    }

    match raw.key.as_str() {
        "h" => return Key::Highlight,
        "t" => return Key::Toggle,
        _ => {}
    }

    let column = |row: &[&str; 8]| {
        row.iter()
            .position(|k| *k == raw.key)
            .map(|i| if is_white { i } else { 7 - i })
    };

    if let Some(i) = column(&HOME_ROW) {
        COORDS[i]
    } else if let Some(i) = column(&TOP_ROW) {
        if raw.shift { CAPTURES[i] } else { PIECES[i] }
    } else if let Some(i) = column(&BOTTOM_ROW) {
        if raw.shift { PAWN_CAPTURES[i] } else { PAWNS[i] }
    } else {
        Key::Invalid
    }
}

fn translate_modified(raw: &RawKey) -> Key {
    match (raw.key.as_str(), raw.shift) {
        ("1", _) => Key::Menu1,
        ("2", _) => Key::Menu2,
        ("3", _) => Key::Menu3,
        ("4", _) => Key::Menu4,
        ("b", false) => Key::Previous,
        ("n", false) => Key::Next,
        ("b", true) => Key::First,
        ("n", true) => Key::Last,
        (name, _) => NUMPAD_KEYS
            .iter()
            .find(|(k, _)| *k == name)
            .map_or(Key::Invalid, |(_, key)| *key),
    }
}

/// Parse a key script such as `"qjf<enter><C-i>"`.
///
/// Printable characters stand for themselves; uppercase letters and `<`/`>`
/// imply shift. Angle brackets name special keys (`<esc>`, `<enter>`,
/// `<space>`, `<lt>`) and modifier chords (`<C-x>`, `<A-x>`, `<S-x>`,
/// combinable as `<C-S-b>`).
pub fn parse_script(script: &str) -> Result<Vec<RawKey>, ScriptError> {
    let mut keys = Vec::new();
    let mut rest = script.char_indices().peekable();

    while let Some((start, c)) = rest.next() {
        if c != '<' {
            if !c.is_whitespace() || c == ' ' {
                keys.push(RawKey::from_char(c));
            }
            continue;
        }

        // A trailing `<` is the key itself
        let close = script[start + 1..].find('>');
        let Some(len) = close else {
            if script[start + 1..].is_empty() {
                keys.push(RawKey::from_char('<'));
                continue;
            }
            return Err(ScriptError::Unterminated(start));
        };
        let name = &script[start + 1..start + 1 + len];
        if name.is_empty() {
            return Err(ScriptError::UnknownKey(String::new()));
        }
        keys.push(parse_named(name)?);
        let end = start + 1 + len;
        while rest.next_if(|(i, _)| *i <= end).is_some() {}
    }
    Ok(keys)
}

fn parse_named(name: &str) -> Result<RawKey, ScriptError> {
    let unknown = || ScriptError::UnknownKey(name.to_string());
    let mut parts: Vec<&str> = name.split('-').collect();
    // `<C-->` style chords would split into empty parts; not supported
    let base = parts.pop().filter(|p| !p.is_empty()).ok_or_else(unknown)?;

    let mut key = match base.to_ascii_lowercase().as_str() {
        "esc" | "escape" => RawKey::named("escape"),
        "enter" | "cr" | "return" => RawKey::named("enter"),
        "space" => RawKey::named("space"),
        "lt" => RawKey::from_char('<'),
        "gt" => RawKey::from_char('>'),
        _ => {
            let mut chars = base.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => RawKey::from_char(c),
                _ => return Err(unknown()),
            }
        }
    };

    for modifier in parts {
        match modifier {
            "C" | "c" => key.control = true,
            "A" | "a" | "M" | "m" => key.alt = true,
            "S" | "s" => key.shift = true,
            _ => return Err(unknown()),
        }
    }
    Ok(key)
}
