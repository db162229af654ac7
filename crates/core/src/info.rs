//! Fence info-string grammar.
//!
//! ```text
//! python:line-numbers=5 [main.py] {1,3-4}
//! ^^^^^^ language        ^^^^^^^ name
//!       ^^^^^^^^^^^^^^^ enable flag + start   ^^^^^^ highlighted lines
//! ```
//!
//! Flags may appear anywhere; unrecognized text is ignored.

const LINE_NUMBERS_FLAG: &str = ":line-numbers";
const NO_LINE_NUMBERS_FLAG: &str = ":no-line-numbers";

/// Highest line a `{...}` range may reach. Larger values are dropped.
pub const MAX_RANGE_LINE: u32 = 10_000;

/// Everything the grammar extracts from one info string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// Lowercased language, `""` when absent.
    pub language: String,
    /// True when the language token carried a `:` modifier suffix.
    pub has_modifier: bool,
    /// Verbatim content of the first non-empty `[...]`.
    pub bracket_name: Option<String>,
    /// `:line-numbers` seen.
    pub enable_line_numbers: bool,
    /// `:no-line-numbers` seen.
    pub disable_line_numbers: bool,
    /// Start taken from `:line-numbers=N`.
    pub line_start: Option<u32>,
    /// Lines listed in `{...}` ranges.
    pub highlight_lines: Option<Vec<u32>>,
}

impl FenceInfo {
    /// Parse a fence info string. Never fails; missing parts stay empty.
    pub fn parse(info: &str) -> Self {
        let info = info.trim();
        let first = info.split_whitespace().next().unwrap_or("");
        let language_end = first.find([':', '{', '[']).unwrap_or(first.len());
        let (enable, start) = scan_enable_flag(info);

        FenceInfo {
            language: first[..language_end].to_lowercase(),
            has_modifier: first.contains(':'),
            bracket_name: bracket_name(info),
            enable_line_numbers: enable,
            disable_line_numbers: flag_positions(info, NO_LINE_NUMBERS_FLAG)
                .any(|rest| at_boundary(rest)),
            line_start: start,
            highlight_lines: highlight_ranges(info),
        }
    }

    /// Display name: bracket, then a bare language, then `"code"`.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.bracket_name {
            return name.clone();
        }
        if !self.language.is_empty() && !self.has_modifier {
            return self.language.clone();
        }
        "code".to_string()
    }

    /// Resolve gutters against the global default; disable beats enable.
    pub fn resolve_line_numbers(&self, global_default: bool) -> bool {
        if self.disable_line_numbers {
            false
        } else if self.enable_line_numbers {
            true
        } else {
            global_default
        }
    }
}

fn bracket_name(info: &str) -> Option<String> {
    let open = info.find('[')?;
    let close = info[open + 1..].find(']')? + open + 1;
    let name = &info[open + 1..close];
    (!name.is_empty()).then(|| name.to_string())
}

/// Yields the text following each occurrence of `flag`.
fn flag_positions<'a>(info: &'a str, flag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    info.match_indices(flag)
        .map(move |(idx, _)| &info[idx + flag.len()..])
}

fn at_boundary(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_none_or(|c| c.is_whitespace() || matches!(c, ':' | '[' | '{'))
}

/// Returns whether `:line-numbers` is present and the last `=N` start.
fn scan_enable_flag(info: &str) -> (bool, Option<u32>) {
    let mut enabled = false;
    let mut start = None;
    for rest in flag_positions(info, LINE_NUMBERS_FLAG) {
        if let Some(value) = rest.strip_prefix('=') {
            enabled = true;
            let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
            if let Ok(parsed) = digits.parse::<u32>() {
                start = Some(parsed.max(1));
            }
        } else if at_boundary(rest) {
            enabled = true;
        }
    }
    (enabled, start)
}

fn highlight_ranges(info: &str) -> Option<Vec<u32>> {
    let open = info.find('{')?;
    let close = info[open + 1..].find('}')? + open + 1;
    Some(parse_line_ranges(&info[open + 1..close]))
}

/// Expand `1,3-5` into sorted, deduplicated line numbers.
/// Parts that are not numbers or ascending ranges are skipped, and ranges
/// stop at [`MAX_RANGE_LINE`].
pub fn parse_line_ranges(spec: &str) -> Vec<u32> {
    let mut lines = std::collections::BTreeSet::new();
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((from, to)) => {
                if let (Ok(from), Ok(to)) = (from.trim().parse::<u32>(), to.trim().parse::<u32>())
                    && from >= 1
                    && from <= to
                    && from <= MAX_RANGE_LINE
                {
                    lines.extend(from..=to.min(MAX_RANGE_LINE));
                }
            }
            None => {
                if let Ok(line) = part.parse::<u32>()
                    && (1..=MAX_RANGE_LINE).contains(&line)
                {
                    lines.insert(line);
                }
            }
        }
    }
    lines.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_first_token_lowercased() {
        assert_eq!(FenceInfo::parse("TS").language, "ts");
        assert_eq!(FenceInfo::parse("python:line-numbers=5").language, "python");
        assert_eq!(FenceInfo::parse("ts{1,2}").language, "ts");
        assert_eq!(FenceInfo::parse("ts[index.ts]").language, "ts");
        assert_eq!(FenceInfo::parse("").language, "");
        assert_eq!(FenceInfo::parse("[main.go]").language, "");
    }

    #[test]
    fn name_fallback_chain() {
        assert_eq!(FenceInfo::parse("ts [index.ts]").display_name(), "index.ts");
        assert_eq!(FenceInfo::parse("ts").display_name(), "ts");
        assert_eq!(FenceInfo::parse("").display_name(), "code");
        assert_eq!(FenceInfo::parse("python:line-numbers=5").display_name(), "code");
        assert_eq!(FenceInfo::parse("go [My File.go]").display_name(), "My File.go");
        assert_eq!(FenceInfo::parse("rs []").display_name(), "rs");
    }

    #[test]
    fn line_number_flags() {
        let info = FenceInfo::parse("ts :line-numbers");
        assert!(info.enable_line_numbers);
        assert!(!info.disable_line_numbers);
        assert_eq!(info.line_start, None);

        let info = FenceInfo::parse("ts:no-line-numbers");
        assert!(!info.enable_line_numbers);
        assert!(info.disable_line_numbers);

        let info = FenceInfo::parse("python:line-numbers=5");
        assert!(info.enable_line_numbers);
        assert_eq!(info.line_start, Some(5));
    }

    #[test]
    fn flags_need_a_boundary() {
        let info = FenceInfo::parse("ts :line-numbersx :no-line-numbers-please");
        assert!(!info.enable_line_numbers);
        assert!(!info.disable_line_numbers);
    }

    #[test]
    fn zero_start_clamps_to_one() {
        assert_eq!(FenceInfo::parse("ts:line-numbers=0").line_start, Some(1));
    }

    #[test]
    fn empty_start_still_enables() {
        let info = FenceInfo::parse("ts:line-numbers=");
        assert!(info.enable_line_numbers);
        assert_eq!(info.line_start, None);
    }

    #[test]
    fn line_number_precedence() {
        let both = FenceInfo {
            enable_line_numbers: false,
            disable_line_numbers: true,
            ..Default::default()
        };
        assert!(!both.resolve_line_numbers(true));

        let enabled = FenceInfo {
            enable_line_numbers: true,
            ..Default::default()
        };
        assert!(enabled.resolve_line_numbers(false));

        let conflicting = FenceInfo::parse("ts:line-numbers :no-line-numbers");
        assert!(!conflicting.resolve_line_numbers(true));

        assert!(FenceInfo::parse("ts").resolve_line_numbers(true));
        assert!(!FenceInfo::parse("ts").resolve_line_numbers(false));
    }

    #[test]
    fn highlight_ranges_expand() {
        let info = FenceInfo::parse("ts {4,1-2,2}");
        assert_eq!(info.highlight_lines, Some(vec![1, 2, 4]));
        assert_eq!(FenceInfo::parse("ts").highlight_lines, None);
    }

    #[test]
    fn malformed_ranges_are_skipped() {
        assert_eq!(parse_line_ranges("a, 3-1, 0, 2-3"), vec![2, 3]);
        assert_eq!(parse_line_ranges(""), Vec::<u32>::new());
    }

    #[test]
    fn huge_ranges_are_capped() {
        let lines = parse_line_ranges("1-4294967295");
        assert_eq!(lines.len(), MAX_RANGE_LINE as usize);
        assert_eq!(lines.last(), Some(&MAX_RANGE_LINE));

        assert_eq!(parse_line_ranges("20000-30000, 99999999, 2"), vec![2]);
    }
}
