pub mod field;
pub mod picker;
pub mod traits;
pub mod validators;

pub use field::{DateTimeField, DisplayState, FieldConfig};
pub use picker::{DaySelection, Picker, PickerState};
pub use traits::{
    FieldEvent, FocusMode, InputWidget, InteractionResult, ValidationMode,
};
pub use validators::{run_validators, ValidationError, Validator};
