use std::sync::LazyLock;

use crate::datetime::value::Mode;

/// One typed position in a layout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Year,
    Month,
    Day,
    /// 24-hour hour (0-23).
    Hour,
    /// 12-hour clock hour (1-12), always paired with a [`SegmentRole::Meridiem`].
    Hour12,
    Minute,
    Second,
    /// "AM" / "PM".
    Meridiem,
}

impl SegmentRole {
    /// Fixed display width of the segment.
    pub fn len(self) -> usize {
        match self {
            SegmentRole::Year => 4,
            _ => 2,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, SegmentRole::Meridiem)
    }

    /// Largest value a numeric segment can hold; `None` for non-numeric ones.
    pub fn max_value(self) -> Option<u32> {
        match self {
            SegmentRole::Year => Some(9999),
            SegmentRole::Month => Some(12),
            SegmentRole::Day => Some(31),
            SegmentRole::Hour => Some(23),
            SegmentRole::Hour12 => Some(12),
            SegmentRole::Minute | SegmentRole::Second => Some(59),
            SegmentRole::Meridiem => None,
        }
    }

    pub fn min_value(self) -> u32 {
        match self {
            SegmentRole::Month | SegmentRole::Day | SegmentRole::Hour12 => 1,
            _ => 0,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "yyyy" => Some(SegmentRole::Year),
            "MM" => Some(SegmentRole::Month),
            "dd" => Some(SegmentRole::Day),
            "HH" => Some(SegmentRole::Hour),
            "hh" => Some(SegmentRole::Hour12),
            "mm" => Some(SegmentRole::Minute),
            "ss" => Some(SegmentRole::Second),
            "a" => Some(SegmentRole::Meridiem),
            _ => None,
        }
    }
}

/// A compiled layout: the segment sequence plus the literal separators around
/// them. `separators[i]` precedes `segments[i]`; one trailing entry follows
/// the last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub spec: &'static str,
    pub segments: Vec<SegmentRole>,
    pub separators: Vec<String>,
}

impl Template {
    /// Compiles a `yyyy-MM-dd HH:mm`-style spec string. Unknown letter runs
    /// and punctuation become literal separators.
    pub fn compile(spec: &'static str) -> Self {
        let mut segments = Vec::new();
        let mut separators = Vec::new();
        let mut current_sep = String::new();
        let mut chars = spec.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch.is_ascii_alphabetic() {
                let mut token = String::from(ch);
                while let Some(&next) = chars.peek() {
                    if next == ch {
                        token.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(role) = SegmentRole::from_token(&token) {
                    separators.push(std::mem::take(&mut current_sep));
                    segments.push(role);
                } else {
                    current_sep.push_str(&token);
                }
            } else {
                current_sep.push(ch);
            }
        }
        separators.push(current_sep);

        Template {
            spec,
            segments,
            separators,
        }
    }

    pub fn has_date(&self) -> bool {
        self.segments.contains(&SegmentRole::Day)
    }

    pub fn has_time(&self) -> bool {
        self.segments
            .iter()
            .any(|role| matches!(role, SegmentRole::Hour | SegmentRole::Hour12))
    }

    pub fn is_12_hour(&self) -> bool {
        self.segments.contains(&SegmentRole::Meridiem)
    }

    /// Full display width with every segment filled.
    pub fn total_len(&self) -> usize {
        let seg: usize = self.segments.iter().map(|role| role.len()).sum();
        let sep: usize = self.separators.iter().map(|s| s.chars().count()).sum();
        seg + sep
    }
}

/// Parse templates tried in order; position in the list is the tie-break for
/// ambiguous input (`MM/dd` outranks `dd/MM`), not goodness of fit.
pub fn parse_templates(mode: Mode) -> &'static [Template] {
    static DATE: LazyLock<Vec<Template>> = LazyLock::new(|| {
        compile_all(&["yyyy-MM-dd", "yyyy/MM/dd", "MM/dd/yyyy", "dd/MM/yyyy", "dd.MM.yyyy"])
    });
    static TIME: LazyLock<Vec<Template>> = LazyLock::new(|| {
        compile_all(&["HH:mm:ss", "HH:mm", "hh:mm:ss a", "hh:mm a"])
    });
    static DATE_TIME: LazyLock<Vec<Template>> = LazyLock::new(|| {
        compile_all(&[
            "yyyy-MM-dd HH:mm:ss",
            "yyyy-MM-ddTHH:mm:ss",
            "yyyy-MM-dd HH:mm",
            "yyyy-MM-ddTHH:mm",
            "yyyy-MM-dd hh:mm:ss a",
            "yyyy-MM-dd hh:mm a",
            "MM/dd/yyyy HH:mm:ss",
            "MM/dd/yyyy HH:mm",
            "MM/dd/yyyy hh:mm a",
            "dd/MM/yyyy HH:mm",
            "dd/MM/yyyy hh:mm a",
        ])
    });

    match mode {
        Mode::Date => &DATE,
        Mode::Time => &TIME,
        Mode::DateTime => &DATE_TIME,
    }
}

/// The single template driving the masked editor for a field configuration.
pub fn mask_template(mode: Mode, use_12_hour: bool, include_seconds: bool) -> Template {
    let spec = match (mode, use_12_hour, include_seconds) {
        (Mode::Date, ..) => "yyyy-MM-dd",
        (Mode::Time, false, false) => "HH:mm",
        (Mode::Time, false, true) => "HH:mm:ss",
        (Mode::Time, true, false) => "hh:mm a",
        (Mode::Time, true, true) => "hh:mm:ss a",
        (Mode::DateTime, false, false) => "yyyy-MM-dd HH:mm",
        (Mode::DateTime, false, true) => "yyyy-MM-dd HH:mm:ss",
        (Mode::DateTime, true, false) => "yyyy-MM-dd hh:mm a",
        (Mode::DateTime, true, true) => "yyyy-MM-dd hh:mm:ss a",
    };
    Template::compile(spec)
}

fn compile_all(specs: &[&'static str]) -> Vec<Template> {
    specs.iter().map(|spec| Template::compile(spec)).collect()
}
