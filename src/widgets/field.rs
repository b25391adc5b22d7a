use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::datetime::calendar::{now_time, today, DateTime, MonthGrid, Time};
use crate::datetime::constraints::{validate, Constraints, InvalidReason};
use crate::datetime::display::{to_canonical_output, to_display, DateOrder, DisplayOptions};
use crate::datetime::mask::{auto_format, placeholder_mask};
use crate::datetime::parse::{parse, Parsed};
use crate::datetime::template::{mask_template, SegmentRole, Template};
use crate::datetime::value::{CanonicalValue, Mode};
use crate::terminal::{CursorPos, KeyCode, KeyEvent};
use crate::widgets::picker::{DaySelection, Picker, PickerState};
use crate::widgets::traits::{
    FieldEvent, FocusMode, InputWidget, InteractionResult, ValidationMode,
};
use crate::widgets::validators::{run_validators, Validator};

/// Per-field configuration, fixed for the widget's lifetime. Loadable from
/// JSON/YAML form definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub mode: Mode,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub use_12_hour: bool,
    #[serde(default)]
    pub include_seconds: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub date_order: DateOrder,
}

impl FieldConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            constraints: Constraints::default(),
            use_12_hour: false,
            include_seconds: false,
            required: false,
            date_order: DateOrder::default(),
        }
    }

    fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            use_12_hour: self.use_12_hour,
            include_seconds: self.include_seconds,
            date_order: self.date_order,
        }
    }
}

/// What the user is actively typing. The buffer is provisional: it exists
/// while the field is focused and is promoted into the committed value only
/// by a successful parse on commit. While unfocused, display text is always
/// derived fresh from the committed value.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub raw_buffer: String,
    pub cursor_hint: usize,
    pub focused: bool,
}

/// The date / time / date-time input field.
///
/// Keystrokes mutate only the raw buffer; the committed value changes on
/// blur/Enter (parse), on a picker selection, or on an explicit clear,
/// never mid-keystroke. Every committed change surfaces as a single
/// [`FieldEvent::Changed`] carrying the canonical output string.
pub struct DateTimeField {
    id: String,
    label: String,
    config: FieldConfig,
    template: Template,
    value: CanonicalValue,
    display: DisplayState,
    picker: Picker,
    error: Option<String>,
    last_emitted: Option<String>,
    extra_validators: Vec<Validator>,
}

impl DateTimeField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, config: FieldConfig) -> Self {
        let template = mask_template(config.mode, config.use_12_hour, config.include_seconds);
        let picker = Picker::new(config.mode);
        Self {
            id: id.into(),
            label: label.into(),
            config,
            template,
            value: CanonicalValue::EMPTY,
            display: DisplayState::default(),
            picker,
            error: None,
            last_emitted: Some(String::new()),
            extra_validators: Vec::new(),
        }
    }

    /// Seeds the committed value from a prop string, parsed once at mount.
    /// Unparseable or constraint-violating input leaves the field empty.
    /// No change event is emitted.
    pub fn with_initial(mut self, text: &str) -> Self {
        if let Ok(Parsed::Value(parsed)) = parse(text, self.config.mode) {
            let candidate = self.candidate_from(parsed);
            if validate(candidate, self.config.mode, &self.config.constraints, false).is_ok() {
                self.value = candidate;
                self.last_emitted = Some(self.canonical_value());
            }
        }
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.extra_validators.push(validator);
        self
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The canonical output string for the committed value ("" when empty).
    pub fn canonical_value(&self) -> String {
        to_canonical_output(self.value, self.config.mode, self.config.include_seconds)
    }

    pub fn committed(&self) -> CanonicalValue {
        self.value
    }

    pub fn display_state(&self) -> &DisplayState {
        &self.display
    }

    // --- picker surface -----------------------------------------------------

    pub fn picker_state(&self) -> PickerState {
        self.picker.state()
    }

    pub fn grid(&self) -> MonthGrid {
        self.picker.grid()
    }

    pub fn page_month(&mut self, delta: i32) -> InteractionResult {
        if self.picker.state() != PickerState::OpenCalendar {
            return InteractionResult::ignored();
        }
        self.picker.page_month(delta);
        InteractionResult::handled()
    }

    pub fn open_picker(&mut self) -> InteractionResult {
        if self.picker.is_open() {
            return InteractionResult::ignored();
        }
        self.picker.open(self.value.date().filter(|_| self.config.mode.has_date()));
        InteractionResult::handled()
    }

    /// Escape or an outside interaction: closes without committing pending
    /// grid selections.
    pub fn dismiss_picker(&mut self) -> InteractionResult {
        if !self.picker.is_open() {
            return InteractionResult::ignored();
        }
        self.picker.dismiss();
        InteractionResult::handled()
    }

    /// A click on a day cell of the visible month.
    pub fn select_day(&mut self, day: u8) -> InteractionResult {
        match self.picker.select_day(day) {
            None => InteractionResult::ignored(),
            Some(DaySelection::Committed(date)) => {
                self.commit_candidate(CanonicalValue::from_date(date))
            }
            Some(DaySelection::AwaitingTime(_)) => InteractionResult::handled(),
        }
    }

    /// A time-grid selection; commits and closes the picker.
    pub fn select_time(&mut self, time: Time) -> InteractionResult {
        match self.config.mode {
            Mode::Date => InteractionResult::ignored(),
            Mode::Time => {
                self.picker.close();
                self.commit_candidate(CanonicalValue::from_time(time))
            }
            Mode::DateTime => {
                let date = self
                    .picker
                    .pending_date()
                    .or_else(|| self.value.date())
                    .unwrap_or_else(today);
                self.picker.close();
                self.commit_candidate(CanonicalValue::from_datetime(DateTime::new(date, time)))
            }
        }
    }

    /// Explicit "Today" / "Now" action.
    pub fn today_now(&mut self) -> InteractionResult {
        let mut time = now_time();
        if !self.config.include_seconds {
            time.second = 0;
        }
        let candidate = match self.config.mode {
            Mode::Date => CanonicalValue::from_date(today()),
            Mode::Time => CanonicalValue::from_time(time),
            Mode::DateTime => CanonicalValue::from_datetime(DateTime::new(today(), time)),
        };
        self.picker.close();
        self.commit_candidate(candidate)
    }

    /// Explicit clear action.
    pub fn clear(&mut self) -> InteractionResult {
        self.picker.close();
        self.commit_candidate(CanonicalValue::EMPTY)
    }

    // --- commit path --------------------------------------------------------

    /// Parses the (normalized) typed buffer and promotes it into the
    /// committed value. Called on blur and Enter, never mid-keystroke.
    pub fn commit(&mut self) -> InteractionResult {
        let normalized = auto_format(&self.display.raw_buffer, &self.template).formatted;
        match parse(&normalized, self.config.mode) {
            Ok(Parsed::Cleared) => self.commit_candidate(CanonicalValue::EMPTY),
            Ok(Parsed::Value(parsed)) => {
                let candidate = self.candidate_from(parsed);
                self.commit_candidate(candidate)
            }
            Err(err) => {
                debug!(input = %normalized, error = %err, "parse failed on commit");
                self.error = Some(err.to_string());
                InteractionResult::handled()
            }
        }
    }

    fn candidate_from(&self, parsed: DateTime) -> CanonicalValue {
        match self.config.mode {
            Mode::Date => CanonicalValue::from_date(parsed.date),
            Mode::Time => CanonicalValue::from_time(parsed.time),
            Mode::DateTime => CanonicalValue::from_datetime(parsed),
        }
    }

    /// Validator → formatter path shared by text commits, picker selections,
    /// Today/Now and Clear. On failure the previous value is retained and no
    /// event fires; the error string is replaced either way.
    fn commit_candidate(&mut self, candidate: CanonicalValue) -> InteractionResult {
        if candidate.is_empty() {
            self.value = CanonicalValue::EMPTY;
            self.display.raw_buffer.clear();
            self.display.cursor_hint = 0;
            // The clear still flows outward so the consumer can react, with
            // the required error alongside it.
            self.error = self
                .config
                .required
                .then(|| InvalidReason::Required.to_string());
            return self.emit_if_changed(String::new());
        }

        if let Err(reason) = validate(
            candidate,
            self.config.mode,
            &self.config.constraints,
            self.config.required,
        ) {
            debug!(%reason, "commit rejected");
            self.error = Some(reason.to_string());
            return InteractionResult::handled();
        }

        let canonical = to_canonical_output(candidate, self.config.mode, self.config.include_seconds);
        if let Err(message) = run_validators(&self.extra_validators, &canonical) {
            self.error = Some(message);
            return InteractionResult::handled();
        }

        self.value = candidate;
        self.error = None;
        if self.display.focused {
            self.seed_buffer();
        }
        self.emit_if_changed(canonical)
    }

    fn emit_if_changed(&mut self, canonical: String) -> InteractionResult {
        if self.last_emitted.as_deref() == Some(canonical.as_str()) {
            return InteractionResult::handled();
        }
        debug!(id = %self.id, value = %canonical, "value committed");
        self.last_emitted = Some(canonical.clone());
        InteractionResult::with_event(FieldEvent::Changed(canonical))
    }

    // --- buffer editing -----------------------------------------------------

    /// Re-seeds the typing buffer from the committed value so buffer and
    /// value agree once input settles.
    fn seed_buffer(&mut self) {
        self.display.raw_buffer = self.raw_digits_of_value();
        self.display.cursor_hint =
            auto_format(&self.display.raw_buffer, &self.template).cursor;
    }

    fn raw_digits_of_value(&self) -> String {
        let Some(inner) = self.value.get() else {
            return String::new();
        };
        let mut out = String::new();
        for role in &self.template.segments {
            match role {
                SegmentRole::Year => out.push_str(&format!("{:04}", inner.date.year)),
                SegmentRole::Month => out.push_str(&format!("{:02}", inner.date.month)),
                SegmentRole::Day => out.push_str(&format!("{:02}", inner.date.day)),
                SegmentRole::Hour => out.push_str(&format!("{:02}", inner.time.hour)),
                SegmentRole::Hour12 => {
                    let hour12 = match inner.time.hour {
                        0 => 12,
                        hour if hour > 12 => hour - 12,
                        hour => hour,
                    };
                    out.push_str(&format!("{hour12:02}"));
                }
                SegmentRole::Minute => out.push_str(&format!("{:02}", inner.time.minute)),
                SegmentRole::Second => out.push_str(&format!("{:02}", inner.time.second)),
                SegmentRole::Meridiem => {
                    out.push(if inner.time.hour >= 12 { 'P' } else { 'A' })
                }
            }
        }
        out
    }

    fn insert_char(&mut self, ch: char) -> bool {
        let mut candidate = self.display.raw_buffer.clone();
        candidate.push(ch);
        let before = auto_format(&self.display.raw_buffer, &self.template);
        let after = auto_format(&candidate, &self.template);
        if after == before {
            return false;
        }
        self.display.raw_buffer = candidate;
        self.display.cursor_hint = after.cursor;
        true
    }

    fn delete_prev(&mut self) -> bool {
        if self.display.raw_buffer.is_empty() {
            return false;
        }
        let before = auto_format(&self.display.raw_buffer, &self.template).formatted;
        // Inert characters (swallowed separators) don't change the mask;
        // keep popping until something visible disappears.
        while self.display.raw_buffer.pop().is_some() {
            if auto_format(&self.display.raw_buffer, &self.template).formatted != before {
                break;
            }
        }
        self.display.cursor_hint = auto_format(&self.display.raw_buffer, &self.template).cursor;
        true
    }
}

impl InputWidget for DateTimeField {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Char(ch) => {
                if self.insert_char(ch) {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
            KeyCode::Backspace => {
                if self.delete_prev() {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
            KeyCode::Delete => {
                if self.display.raw_buffer.is_empty() {
                    return InteractionResult::ignored();
                }
                self.display.raw_buffer.clear();
                self.display.cursor_hint = 0;
                InteractionResult::handled()
            }
            KeyCode::Enter => {
                let mut result = self.commit();
                self.picker.close();
                result.merge(InteractionResult::handled());
                result
            }
            KeyCode::Esc => {
                if self.picker.is_open() {
                    return self.dismiss_picker();
                }
                // Revert in-progress typing to the committed value.
                self.seed_buffer();
                self.error = None;
                InteractionResult::handled()
            }
            KeyCode::Down => self.open_picker(),
            KeyCode::Tab if self.picker.is_open() && self.config.mode == Mode::DateTime => {
                match self.picker.state() {
                    PickerState::OpenCalendar => self.picker.show_time(),
                    PickerState::OpenTime => self.picker.show_calendar(),
                    PickerState::Closed => {}
                }
                InteractionResult::handled()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_paste(&mut self, text: &str) -> InteractionResult {
        // Paste goes through the same full-buffer re-derive as keystrokes.
        self.display.raw_buffer.push_str(text);
        self.display.cursor_hint = auto_format(&self.display.raw_buffer, &self.template).cursor;
        InteractionResult::handled()
    }

    fn focus(&mut self) {
        self.display.focused = true;
        self.seed_buffer();
    }

    fn blur(&mut self) -> InteractionResult {
        let result = self.commit();
        self.picker.dismiss();
        self.display.focused = false;
        self.display.raw_buffer.clear();
        self.display.cursor_hint = 0;
        result
    }

    fn value(&self) -> Option<String> {
        if self.value.is_empty() {
            None
        } else {
            Some(self.canonical_value())
        }
    }

    fn set_value(&mut self, value: &str) {
        match parse(value, self.config.mode) {
            Ok(Parsed::Cleared) => {
                self.value = CanonicalValue::EMPTY;
                self.last_emitted = Some(String::new());
            }
            Ok(Parsed::Value(parsed)) => {
                self.value = self.candidate_from(parsed);
                self.last_emitted = Some(self.canonical_value());
            }
            Err(_) => {}
        }
        if self.display.focused {
            self.seed_buffer();
        }
    }

    fn display_text(&self) -> String {
        if self.display.focused {
            placeholder_mask(&self.display.raw_buffer, &self.template)
        } else {
            to_display(self.value, self.config.mode, &self.config.display_options())
        }
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        // Partial input is never validated mid-keystroke.
        if mode == ValidationMode::Live {
            return Ok(());
        }
        validate(
            self.value,
            self.config.mode,
            &self.config.constraints,
            self.config.required,
        )
        .map_err(|reason| reason.to_string())?;
        run_validators(&self.extra_validators, &self.canonical_value())
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        if !self.display.focused {
            return None;
        }
        Some(CursorPos {
            col: self.display.cursor_hint as u16,
            row: 0,
        })
    }
}
