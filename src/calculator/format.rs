//! Result and display formatting.
//!
//! [`format_result`] renders an evaluated number into its canonical string.
//! [`apply_grouping`] and [`strip_grouping`] add and remove the cosmetic
//! thousands separators used when showing input, results and history.

/// Character inserted between groups of three integer digits.
pub const GROUP_SEPARATOR: char = ',';

/// Maximum number of fractional digits kept in a formatted result.
const MAX_FRACTION_DIGITS: usize = 8;

/// Format an evaluated number for display and storage.
///
/// Integral values print without a decimal point. Everything else is rounded
/// to eight fractional digits with trailing zeros removed.
pub fn format_result(value: f64) -> String {
    // Covers -0 as well, which would otherwise print as "-0".
    if value == 0.0 {
        return "0".to_string();
    }

    if value.fract() == 0.0 {
        return format!("{}", value);
    }

    let formatted = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Insert thousands separators into every integer digit run of four or more
/// digits found anywhere in `text`.
///
/// Operators, letters and decimal points are left untouched, and fractional
/// digits (a run directly after `.`) are never grouped. Existing separators
/// are dropped first, so applying grouping twice yields the same string.
pub fn apply_grouping(text: &str) -> String {
    let cleaned = strip_grouping(text);
    let chars: Vec<char> = cleaned.chars().collect();
    let mut result = String::with_capacity(cleaned.len() + cleaned.len() / 3);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !c.is_ascii_digit() {
            result.push(c);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let run = &chars[start..i];
        let is_fraction = start > 0 && chars[start - 1] == '.';

        if is_fraction || run.len() < 4 {
            result.extend(run);
        } else {
            push_grouped(&mut result, run);
        }
    }

    result
}

/// Remove every thousands separator from `text`.
pub fn strip_grouping(text: &str) -> String {
    text.chars().filter(|&c| c != GROUP_SEPARATOR).collect()
}

/// Append a digit run with a separator every three digits from the right.
fn push_grouped(out: &mut String, digits: &[char]) {
    let lead = digits.len() % 3;
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(*d);
    }
}
