pub mod calendar;
pub mod constraints;
pub mod display;
pub mod mask;
pub mod parse;
pub mod template;
pub mod value;
