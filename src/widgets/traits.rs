use crate::terminal::{CursorPos, KeyEvent};

// ---------------------------------------------------------------------------
// Focus & validation modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Node does not participate in focus cycling.
    None,
    /// A single focusable leaf.
    Leaf,
    /// A component that manages focus internally among its children.
    Group,
}

/// Controls how strictly a widget validates its current value.
///
/// - `Live`: called on every keystroke; partial / in-progress input is
///   acceptable.
/// - `Submit`: called on blur or form submission; the value must be
///   complete and valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Live,
    Submit,
}

// ---------------------------------------------------------------------------
// Events & interaction results
// ---------------------------------------------------------------------------

/// Outbound notifications a widget hands to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// A value was committed. The payload is the canonical output string;
    /// empty means the field was cleared.
    Changed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub events: Vec<FieldEvent>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            events: Vec::new(),
        }
    }

    pub fn with_event(event: FieldEvent) -> Self {
        Self {
            handled: true,
            request_render: true,
            events: vec![event],
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.request_render |= other.request_render;
        self.events.extend(other.events);
    }
}

// ---------------------------------------------------------------------------
// InputWidget: the host-facing widget contract
// ---------------------------------------------------------------------------

/// An interactive input field. The host owns rendering and the event loop;
/// the widget owns its value, buffer, and validation state.
pub trait InputWidget: Send {
    fn id(&self) -> &str;

    fn label(&self) -> &str {
        ""
    }

    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    /// Bulk text input (paste). Default: ignored.
    fn on_paste(&mut self, _text: &str) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn focus(&mut self) {}

    /// Leaving the field; commits any in-progress input.
    fn blur(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }

    /// The committed canonical value, if any.
    fn value(&self) -> Option<String> {
        None
    }

    fn set_value(&mut self, _value: &str) {}

    /// What the host should show for this widget right now.
    fn display_text(&self) -> String;

    fn validate(&self, _mode: ValidationMode) -> Result<(), String> {
        Ok(())
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }
}
