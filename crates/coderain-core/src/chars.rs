//! Stock alphabets for the effects.

/// Katakana and digits, the classic rain look.
pub const KATAKANA_RAIN: &str = "アイウエオカキクケコサシスセソタチツテト0123456789";

/// Upper-case latin, digits and punctuation for scrambled text.
pub const LATIN_SCRAMBLE: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$+-*/=%\"'#&_(),.;:?!\\|{}<>[]^~";
