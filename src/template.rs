//! Date variables in the custom-text screen.
//!
//! | variable | expands to          |
//! |----------|---------------------|
//! | `{Y}`    | `2025年`            |
//! | `{y}`    | `2025`              |
//! | `{M}`    | `5月`               |
//! | `{m}`    | `05`                |
//! | `{D}`    | `29日`              |
//! | `{d}`    | `29`                |
//! | `{W}`    | `星期四`            |
//! | `{w}`    | `4` (Monday is `1`) |

use crate::datetime::SolarDateTime;

fn variable(name: char, now: &SolarDateTime) -> Option<String> {
    let date = now.date();
    let value = match name {
        'Y' => format!("{}年", date.year()),
        'y' => date.year().to_string(),
        'M' => format!("{}月", date.month()),
        'm' => format!("{:02}", date.month()),
        'D' => format!("{}日", date.day()),
        'd' => format!("{:02}", date.day()),
        'W' => now.weekday().chinese_name(),
        'w' => now.weekday().number_from_monday().to_string(),
        _ => return None,
    };
    Some(value)
}

/// Replaces the date variables in `text` with values for `now`.
///
/// A variable is a single letter after `{`; the closing `}` is optional.
/// Unknown letters expand to nothing.
pub fn expand_template(text: &str, now: &SolarDateTime) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let Some(name) = chars.next() else {
            break;
        };
        if let Some(value) = variable(name, now) {
            out.push_str(&value);
        }
        let rest = chars.as_str();
        if let Some(after) = rest.strip_prefix('}') {
            chars = after.chars();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::datetime;

    #[test]
    fn test_expand_template() {
        struct TestCase {
            text:     &'static str,
            expected: &'static str,
        }

        let cases = [
            TestCase {
                text:     "{Y}{M}{D}",
                expected: "2025年5月9日",
            },
            TestCase {
                text:     "{y}-{m}-{d}",
                expected: "2025-05-09",
            },
            TestCase {
                text:     "今天{W}",
                expected: "今天星期五",
            },
            TestCase {
                text:     "第{w}天",
                expected: "第5天",
            },
            TestCase {
                text:     "no variables",
                expected: "no variables",
            },
            // Unknown variables vanish
            TestCase {
                text:     "a{Q}b",
                expected: "ab",
            },
            // Closing brace is optional
            TestCase {
                text:     "{Y年",
                expected: "2025年年",
            },
            TestCase {
                text:     "trailing {",
                expected: "trailing ",
            },
            TestCase {
                text:     "{d}}",
                expected: "09}",
            },
        ];

        // A Friday
        let now = datetime(2025, 5, 9, 8, 0, 0);
        for case in &cases {
            assert_eq!(expand_template(case.text, &now), case.expected, "{}", case.text);
        }
    }

    #[test]
    fn test_sunday_is_seven() {
        let now = datetime(2025, 6, 1, 0, 0, 0);
        assert_eq!(expand_template("{W} {w}", &now), "星期日 7");
    }
}
