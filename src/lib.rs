//! Date and time input widgets for interactive forms.
//!
//! The crate splits into an engine and a widget layer:
//!
//! - [`datetime`] holds the pure pieces: calendar arithmetic, layout
//!   templates, the tolerant text parser, the masked-input formatter,
//!   display/canonical formatting, and constraint validation. Nothing in it
//!   touches a terminal.
//! - [`widgets`] composes those into [`widgets::DateTimeField`], a focusable
//!   field with a typing buffer, a commit lifecycle, and a calendar/time
//!   picker popover.
//!
//! Values cross the API boundary as canonical strings (`yyyy-MM-dd`,
//! `HH:mm[:ss]`, `yyyy-MM-ddTHH:mm:ss`); the empty string means "no value".

pub mod datetime;
pub mod terminal;
pub mod widgets;

pub use datetime::calendar::{Date, DateTime, MonthGrid, Time, Weekday};
pub use datetime::constraints::{validate, Constraints, InvalidReason};
pub use datetime::display::{to_canonical_output, to_display, DateOrder, DisplayOptions};
pub use datetime::mask::{auto_format, placeholder_mask, MaskResult};
pub use datetime::parse::{parse, Parsed, ParseError};
pub use datetime::template::{mask_template, parse_templates, SegmentRole, Template};
pub use datetime::value::{CanonicalValue, Mode};
pub use terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers};
pub use widgets::{
    DateTimeField, DaySelection, FieldConfig, FieldEvent, FocusMode, InputWidget,
    InteractionResult, Picker, PickerState, ValidationMode, Validator,
};
