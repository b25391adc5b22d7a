use tracing::debug;

use crate::datetime::calendar::{today, Date, MonthGrid};
use crate::datetime::value::Mode;

/// Which popover view is showing, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Closed,
    OpenCalendar,
    OpenTime,
}

/// What a calendar-day click means for the owning field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelection {
    /// Terminal commit: the picker closed and the date is final.
    Committed(Date),
    /// `DateTime` mode: the date is held pending until a time is applied.
    AwaitingTime(Date),
}

/// The popover state machine. It never panics: transitions that are
/// unreachable for the field's mode are no-ops.
///
/// The picker holds only view state (which month is shown, an uncommitted
/// pending date); the owning field commits values and runs validation.
#[derive(Debug, Clone)]
pub struct Picker {
    mode: Mode,
    state: PickerState,
    visible_year: i32,
    visible_month: u8,
    pending_date: Option<Date>,
}

impl Picker {
    pub fn new(mode: Mode) -> Self {
        let anchor = today();
        Self {
            mode,
            state: PickerState::Closed,
            visible_year: anchor.year,
            visible_month: anchor.month,
            pending_date: None,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PickerState::Closed
    }

    pub fn pending_date(&self) -> Option<Date> {
        self.pending_date
    }

    /// Opens the mode's initial view, anchoring the calendar on `anchor`
    /// (the committed value's date, usually) or today.
    pub fn open(&mut self, anchor: Option<Date>) {
        let at = anchor.unwrap_or_else(today);
        self.visible_year = at.year;
        self.visible_month = at.month;
        match self.mode {
            Mode::Time => self.state = PickerState::OpenTime,
            Mode::Date | Mode::DateTime => self.state = PickerState::OpenCalendar,
        }
        debug!(state = ?self.state, "picker opened");
    }

    /// Switches to the calendar sub-view. No-op unless the picker is open
    /// and the mode has a date component.
    pub fn show_calendar(&mut self) {
        if self.is_open() && self.mode.has_date() {
            self.state = PickerState::OpenCalendar;
        }
    }

    /// Switches to the time sub-view. No-op unless the picker is open and
    /// the mode has a time component.
    pub fn show_time(&mut self) {
        if self.is_open() && self.mode.has_time() {
            self.state = PickerState::OpenTime;
        }
    }

    /// The day matrix for the currently visible month.
    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.visible_year, self.visible_month)
    }

    pub fn visible_month(&self) -> (i32, u8) {
        (self.visible_year, self.visible_month)
    }

    /// Pages the visible calendar month without touching any value.
    pub fn page_month(&mut self, delta: i32) {
        let paged = Date {
            year: self.visible_year,
            month: self.visible_month,
            day: 1,
        }
        .add_months(delta);
        self.visible_year = paged.year;
        self.visible_month = paged.month;
    }

    /// Handles a click on day cell `day` of the visible month.
    ///
    /// Returns `None` when the calendar view is not active or the day does
    /// not exist in the visible month.
    pub fn select_day(&mut self, day: u8) -> Option<DaySelection> {
        if self.state != PickerState::OpenCalendar {
            return None;
        }
        let date = Date::from_parts(self.visible_year, self.visible_month, day).ok()?;

        match self.mode {
            Mode::Date => {
                self.state = PickerState::Closed;
                self.pending_date = None;
                debug!(%date, "day selected, committing");
                Some(DaySelection::Committed(date))
            }
            Mode::DateTime => {
                // Date must be confirmed by a time choice before anything is
                // emitted, to avoid half-complete values.
                self.pending_date = Some(date);
                self.state = PickerState::OpenTime;
                debug!(%date, "day selected, awaiting time");
                Some(DaySelection::AwaitingTime(date))
            }
            Mode::Time => None,
        }
    }

    /// Closes after a commit action (time applied, Today/Now, Clear).
    pub fn close(&mut self) {
        self.state = PickerState::Closed;
        self.pending_date = None;
    }

    /// Escape / outside interaction: closes and discards any pending
    /// selection without committing.
    pub fn dismiss(&mut self) {
        if self.is_open() {
            debug!(pending = ?self.pending_date, "picker dismissed");
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> Date {
        text.parse().unwrap()
    }

    #[test]
    fn opens_on_the_mode_appropriate_view() {
        let mut calendar = Picker::new(Mode::Date);
        calendar.open(None);
        assert_eq!(calendar.state(), PickerState::OpenCalendar);

        let mut clock = Picker::new(Mode::Time);
        clock.open(None);
        assert_eq!(clock.state(), PickerState::OpenTime);
    }

    #[test]
    fn time_view_is_unreachable_in_date_mode() {
        let mut picker = Picker::new(Mode::Date);
        picker.open(None);
        picker.show_time();
        assert_eq!(picker.state(), PickerState::OpenCalendar);
    }

    #[test]
    fn datetime_mode_switches_between_sub_views() {
        let mut picker = Picker::new(Mode::DateTime);
        picker.open(Some(date("2024-06-15")));
        assert_eq!(picker.state(), PickerState::OpenCalendar);
        picker.show_time();
        assert_eq!(picker.state(), PickerState::OpenTime);
        picker.show_calendar();
        assert_eq!(picker.state(), PickerState::OpenCalendar);
    }

    #[test]
    fn day_click_in_date_mode_is_a_terminal_commit() {
        let mut picker = Picker::new(Mode::Date);
        picker.open(Some(date("2024-02-01")));
        let selection = picker.select_day(29);
        assert_eq!(selection, Some(DaySelection::Committed(date("2024-02-29"))));
        assert_eq!(picker.state(), PickerState::Closed);
    }

    #[test]
    fn day_click_in_datetime_mode_moves_to_time_view() {
        let mut picker = Picker::new(Mode::DateTime);
        picker.open(Some(date("2024-06-01")));
        let selection = picker.select_day(15);
        assert_eq!(selection, Some(DaySelection::AwaitingTime(date("2024-06-15"))));
        assert_eq!(picker.state(), PickerState::OpenTime);
        assert_eq!(picker.pending_date(), Some(date("2024-06-15")));
    }

    #[test]
    fn dismiss_discards_the_pending_date() {
        let mut picker = Picker::new(Mode::DateTime);
        picker.open(Some(date("2024-06-01")));
        picker.select_day(15);
        picker.dismiss();
        assert_eq!(picker.state(), PickerState::Closed);
        assert_eq!(picker.pending_date(), None);
    }

    #[test]
    fn selecting_a_nonexistent_day_is_a_no_op() {
        let mut picker = Picker::new(Mode::Date);
        picker.open(Some(date("2023-02-01")));
        assert_eq!(picker.select_day(29), None);
        assert_eq!(picker.state(), PickerState::OpenCalendar);
    }

    #[test]
    fn day_click_while_closed_is_a_no_op() {
        let mut picker = Picker::new(Mode::Date);
        assert_eq!(picker.select_day(10), None);
        assert_eq!(picker.state(), PickerState::Closed);
    }

    #[test]
    fn paging_crosses_year_boundaries() {
        let mut picker = Picker::new(Mode::Date);
        picker.open(Some(date("2024-01-15")));
        picker.page_month(-1);
        assert_eq!(picker.visible_month(), (2023, 12));
        picker.page_month(2);
        assert_eq!(picker.visible_month(), (2024, 2));
        assert_eq!(picker.grid().day_count(), 29);
    }
}
