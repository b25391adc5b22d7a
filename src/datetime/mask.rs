use unicode_width::UnicodeWidthStr;

use crate::datetime::template::{SegmentRole, Template};

/// Result of re-deriving the masked display from the raw typed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskResult {
    pub formatted: String,
    /// Cursor column after the rewrite (display width, end of typed content).
    pub cursor: usize,
}

/// Groups the typed buffer into the template's segments and re-inserts the
/// template's own separators.
///
/// The whole mask is always re-derived from the full raw buffer; keystroke
/// and paste input go through the same path. Digits are never reordered and
/// the output never exceeds the template's fixed length; digits beyond a
/// full segment spill into the next one.
pub fn auto_format(raw: &str, template: &Template) -> MaskResult {
    let buffers = fill_segments(raw, template);
    let mut out = String::new();

    for (idx, buffer) in buffers.iter().enumerate() {
        if buffer.is_empty() {
            // Show the upcoming separator once the previous segment is
            // complete, as the auto-advance cue.
            if idx > 0 && segment_full(&buffers[idx - 1], template.segments[idx - 1]) {
                out.push_str(&template.separators[idx]);
            }
            break;
        }
        out.push_str(&template.separators[idx]);
        out.push_str(buffer);
    }

    if buffers
        .iter()
        .zip(&template.segments)
        .all(|(buffer, role)| segment_full(buffer, *role))
    {
        out.push_str(template.separators.last().map(String::as_str).unwrap_or(""));
    }

    let cursor = out.width();
    MaskResult {
        formatted: out,
        cursor,
    }
}

/// Underscore-filled preview of the whole template with the typed digits
/// substituted in (`202` → `202_-__-__`). Display-only; never parsed.
pub fn placeholder_mask(typed: &str, template: &Template) -> String {
    let buffers = fill_segments(typed, template);
    let mut out = String::new();

    for (idx, (buffer, role)) in buffers.iter().zip(&template.segments).enumerate() {
        out.push_str(&template.separators[idx]);
        out.push_str(buffer);
        for _ in buffer.chars().count()..role.len() {
            out.push('_');
        }
    }
    out.push_str(template.separators.last().map(String::as_str).unwrap_or(""));
    out
}

fn segment_full(buffer: &str, role: SegmentRole) -> bool {
    buffer.chars().count() >= role.len()
}

/// Distributes raw typed characters into per-segment buffers.
///
/// Digits fill the current segment and auto-advance when it is full. Any
/// typed punctuation acts as an explicit advance: the current segment is
/// zero-padded to its width and input moves to the next segment. `a`/`p`
/// resolve the meridiem segment when the template has one. Everything else
/// is dropped.
fn fill_segments(raw: &str, template: &Template) -> Vec<String> {
    let count = template.segments.len();
    let mut buffers = vec![String::new(); count];
    let mut current = 0usize;

    for ch in raw.chars() {
        if current >= count {
            break;
        }
        let role = template.segments[current];

        match role {
            SegmentRole::Meridiem => match ch.to_ascii_uppercase() {
                'A' => {
                    buffers[current] = "AM".to_string();
                    current += 1;
                }
                'P' => {
                    buffers[current] = "PM".to_string();
                    current += 1;
                }
                _ => {}
            },
            _ if ch.is_ascii_digit() => {
                buffers[current].push(ch);
                if segment_full(&buffers[current], role) {
                    current += 1;
                }
            }
            _ if is_separator_press(ch) => {
                if !buffers[current].is_empty() {
                    pad_segment(&mut buffers[current], role);
                    current += 1;
                }
            }
            _ if matches!(ch.to_ascii_uppercase(), 'A' | 'P') => {
                // Meridiem letter while a numeric segment is open: close the
                // numbers and jump to the meridiem segment, if any.
                if let Some(meridiem) =
                    template.segments.iter().position(|r| *r == SegmentRole::Meridiem)
                {
                    if meridiem > current && !buffers[current].is_empty() {
                        pad_segment(&mut buffers[current], role);
                        buffers[meridiem] =
                            if ch.to_ascii_uppercase() == 'A' { "AM" } else { "PM" }.to_string();
                        current = meridiem + 1;
                    }
                }
            }
            _ => {}
        }
    }

    buffers
}

/// Any typed punctuation or whitespace counts as a separator press and is
/// normalized away.
fn is_separator_press(ch: char) -> bool {
    ch.is_whitespace() || ch.is_ascii_punctuation() || ch == 'T' || ch == 't'
}

fn pad_segment(buffer: &mut String, role: SegmentRole) {
    let typed = std::mem::take(buffer);
    let width = role.len();
    *buffer = format!("{typed:0>width$}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::template::mask_template;
    use crate::datetime::value::Mode;

    fn date_template() -> Template {
        mask_template(Mode::Date, false, false)
    }

    #[test]
    fn digits_group_with_auto_inserted_separators() {
        let template = date_template();
        assert_eq!(auto_format("2024", &template).formatted, "2024-");
        assert_eq!(auto_format("202402", &template).formatted, "2024-02-");
        assert_eq!(auto_format("20240229", &template).formatted, "2024-02-29");
    }

    #[test]
    fn typed_separators_are_normalized_and_zero_pad() {
        let template = date_template();
        assert_eq!(auto_format("2024/2/9", &template).formatted, "2024-02-9");
        assert_eq!(auto_format("2024.02.29", &template).formatted, "2024-02-29");
    }

    #[test]
    fn separator_press_on_empty_segment_is_ignored() {
        let template = date_template();
        assert_eq!(auto_format("--2024", &template).formatted, "2024-");
    }

    #[test]
    fn overflow_digits_spill_into_next_segment() {
        let template = mask_template(Mode::Time, false, false);
        assert_eq!(auto_format("0930", &template).formatted, "09:30");
        // Digits beyond the template are dropped, never reordered.
        assert_eq!(auto_format("093059", &template).formatted, "09:30");
    }

    #[test]
    fn output_never_exceeds_template_length() {
        let template = mask_template(Mode::DateTime, false, true);
        let result = auto_format("202402291345599999999", &template);
        assert!(result.formatted.chars().count() <= template.total_len());
        assert_eq!(result.formatted, "2024-02-29 13:45:59");
    }

    #[test]
    fn cursor_sits_after_last_typed_column() {
        let template = date_template();
        let result = auto_format("20240", &template);
        assert_eq!(result.formatted, "2024-0");
        assert_eq!(result.cursor, 6);
    }

    #[test]
    fn meridiem_letters_fill_the_trailing_segment() {
        let template = mask_template(Mode::Time, true, false);
        assert_eq!(auto_format("0115p", &template).formatted, "01:15 PM");
        assert_eq!(auto_format("0115 am", &template).formatted, "01:15 AM");
    }

    #[test]
    fn meridiem_letter_pads_the_open_segment() {
        // Grouping is strictly fixed-width: "115" fills [11][5], and the
        // meridiem press zero-pads the open minute segment.
        let template = mask_template(Mode::Time, true, false);
        assert_eq!(auto_format("115p", &template).formatted, "11:05 PM");
    }

    #[test]
    fn placeholder_shows_unfilled_positions() {
        let template = mask_template(Mode::DateTime, false, false);
        assert_eq!(placeholder_mask("", &template), "____-__-__ __:__");
        assert_eq!(placeholder_mask("202", &template), "202_-__-__ __:__");
        assert_eq!(placeholder_mask("20240229", &template), "2024-02-29 __:__");
    }

    #[test]
    fn placeholder_covers_meridiem() {
        let template = mask_template(Mode::Time, true, false);
        assert_eq!(placeholder_mask("", &template), "__:__ __");
        assert_eq!(placeholder_mask("0115p", &template), "01:15 PM");
    }
}
