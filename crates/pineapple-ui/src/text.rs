//! Text layout helpers that only need a width measurement.

/// Word-wrap `text` so that no line is wider than `max_width`.
///
/// Explicit newlines start new lines. A single word wider than `max_width`
/// is placed on its own line rather than split. An empty input yields one
/// empty line so blank paragraphs keep their vertical space.
pub fn wrap_lines(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut any_word = false;
        for word in paragraph.split_whitespace() {
            any_word = true;
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            } else {
                current = candidate;
            }
        }
        if any_word {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }
    lines
}

/// Format seconds as `mm:ss`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eight_px(s: &str) -> u32 {
        s.chars().count() as u32 * 8
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_lines("Hello world", 200, eight_px), vec!["Hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_lines("one two three four", 80, eight_px);
        assert_eq!(lines, vec!["one two", "three four"]);
        assert!(lines.iter().all(|l| eight_px(l) <= 80));
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_lines("a supercalifragilistic b", 40, eight_px);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn blank_text_keeps_a_line() {
        assert_eq!(wrap_lines("", 100, eight_px), vec![String::new()]);
    }

    #[test]
    fn newlines_split_paragraphs() {
        assert_eq!(wrap_lines("a\nb", 100, eight_px), vec!["a", "b"]);
    }

    #[test]
    fn format_time_minutes_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(61.0), "01:01");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn format_time_negative_is_zero() {
        assert_eq!(format_time(-5.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrapped_lines_fit_unless_single_word(
                words in proptest::collection::vec("[a-z]{1,12}", 0..30),
                max in 40u32..300,
            ) {
                let text = words.join(" ");
                let measure = |s: &str| s.chars().count() as u32 * 8;
                for line in wrap_lines(&text, max, measure) {
                    prop_assert!(measure(&line) <= max || !line.contains(' '));
                }
            }

            #[test]
            fn wrapping_preserves_words(words in proptest::collection::vec("[a-z]{1,12}", 1..30)) {
                let text = words.join(" ");
                let measure = |s: &str| s.chars().count() as u32 * 8;
                let rejoined = wrap_lines(&text, 64, measure).join(" ");
                prop_assert_eq!(rejoined, text);
            }
        }
    }
}
