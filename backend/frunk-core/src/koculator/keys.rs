//! Keyboard shortcuts for the calculator view.

/// What a key press does to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcKey {
    Input(char),
    Backspace,
    Clear,
    Equals,
}

impl CalcKey {
    /// Map a key name (`"7"`, `"Backspace"`, `"Enter"`, ...) to an action.
    ///
    /// Unmapped keys return `None` and are ignored.
    pub fn from_key(key: &str) -> Option<CalcKey> {
        match key {
            "Backspace" => return Some(CalcKey::Backspace),
            "Escape" => return Some(CalcKey::Clear),
            "Enter" | "=" => return Some(CalcKey::Equals),
            _ => {}
        }

        let mut chars = key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        match c {
            '0'..='9' | '.' | '+' | '-' | '*' | '/' | '(' | ')' => Some(CalcKey::Input(c)),
            _ => None,
        }
    }

    /// Keys typed as a run of characters, e.g. `"12+3="`.
    pub fn from_typed(text: &str) -> Vec<CalcKey> {
        text.chars()
            .filter_map(|c| {
                let mut buf = [0u8; 4];
                CalcKey::from_key(c.encode_utf8(&mut buf))
            })
            .collect()
    }
}
