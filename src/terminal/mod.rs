use std::ops::{BitOr, BitOrAssign};

/// Key codes the widgets care about. Hosts forward whatever event stream
/// they own; a `crossterm` conversion is provided for terminal hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Backspace,
    Enter,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    BackTab,
    Delete,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    bits: u8,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers { bits: 0 };
    pub const SHIFT: KeyModifiers = KeyModifiers { bits: 1 << 0 };
    pub const CONTROL: KeyModifiers = KeyModifiers { bits: 1 << 1 };
    pub const ALT: KeyModifiers = KeyModifiers { bits: 1 << 2 };

    pub fn contains(self, other: KeyModifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }
}

impl BitOr for KeyModifiers {
    type Output = KeyModifiers;

    fn bitor(self, rhs: KeyModifiers) -> KeyModifiers {
        KeyModifiers {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for KeyModifiers {
    fn bitor_assign(&mut self, rhs: KeyModifiers) {
        self.bits |= rhs.bits;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }
}

/// Cursor position within a widget's rendered content, in columns/rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CursorPos {
    pub col: u16,
    pub row: u16,
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode as Ct;

        let code = match event.code {
            Ct::Char(ch) => KeyCode::Char(ch),
            Ct::Backspace => KeyCode::Backspace,
            Ct::Enter => KeyCode::Enter,
            Ct::Esc => KeyCode::Esc,
            Ct::Left => KeyCode::Left,
            Ct::Right => KeyCode::Right,
            Ct::Up => KeyCode::Up,
            Ct::Down => KeyCode::Down,
            Ct::Home => KeyCode::Home,
            Ct::End => KeyCode::End,
            Ct::Tab => KeyCode::Tab,
            Ct::BackTab => KeyCode::BackTab,
            Ct::Delete => KeyCode::Delete,
            _ => KeyCode::Other,
        };

        let mut modifiers = KeyModifiers::NONE;
        if event
            .modifiers
            .contains(crossterm::event::KeyModifiers::SHIFT)
        {
            modifiers |= KeyModifiers::SHIFT;
        }
        if event
            .modifiers
            .contains(crossterm::event::KeyModifiers::CONTROL)
        {
            modifiers |= KeyModifiers::CONTROL;
        }
        if event
            .modifiers
            .contains(crossterm::event::KeyModifiers::ALT)
        {
            modifiers |= KeyModifiers::ALT;
        }

        KeyEvent { code, modifiers }
    }
}
