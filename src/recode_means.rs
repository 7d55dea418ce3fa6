use crate::error::{Result, SyntaxError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RANGE_PATTERN: Regex =
        Regex::new(r"(\d+(?:,\d+)*(?:\.\d+)?)\s*-\s*(\d+(?:,\d+)*(?:\.\d+)?)")
            .expect("static pattern compiles");
    static ref NUMBER_PATTERN: Regex =
        Regex::new(r"(\d+(?:,\d+)*(?:\.\d+)?)").expect("static pattern compiles");
}

/// Input for the recode-by-mean tool
///
/// `ranges`, `means` and `codes` describe the same buckets position by position.
/// The range text is informational here; only its count is checked.
#[derive(Clone, Debug, Default)]
pub struct RecodeMeansInput {
    pub ranges: Vec<String>,
    pub variables: Vec<String>,
    pub means: Vec<String>,
    pub codes: Vec<String>,
}

/// Generate one `recode ... into <var>_means` block per variable
pub fn generate(input: &RecodeMeansInput) -> Result<String> {
    let buckets = input.ranges.len();
    if input.means.len() != buckets || input.codes.len() != buckets {
        return Err(SyntaxError::mismatch(format!(
            "ranges, means and codes must have the same number of entries (got {}, {} and {})",
            buckets,
            input.means.len(),
            input.codes.len()
        )));
    }

    let mut syntax = String::new();
    for variable in &input.variables {
        syntax.push_str(&format!("recode {}", variable));
        for (code, mean) in input.codes.iter().zip(&input.means) {
            syntax.push_str(&format!(" ({} = {})", code, mean));
        }
        syntax.push_str(&format!(" into {}_means.\n", variable));
        syntax.push_str(&format!("var lab {}_means \"{}. Mean\".\n\n", variable, variable));
    }

    Ok(syntax)
}

fn parse_number(text: &str) -> f64 {
    text.replace(',', "").parse().unwrap_or(0.0)
}

/// Midpoint of a free-text range such as `1,000 - 2,000`
///
/// Without a dash the first number found is used; text without any number yields 0.
pub fn range_mean(range: &str) -> f64 {
    if let Some(caps) = RANGE_PATTERN.captures(range) {
        let low = parse_number(&caps[1]);
        let high = parse_number(&caps[2]);
        return (low + high) / 2.0;
    }

    NUMBER_PATTERN
        .captures(range)
        .map(|caps| parse_number(&caps[1]))
        .unwrap_or(0.0)
}

/// Render a mean without a trailing `.0` for whole numbers
pub fn format_mean(mean: f64) -> String {
    format!("{}", mean)
}

/// Compute and format the mean of every range
pub fn means_for_ranges(ranges: &[String]) -> Vec<String> {
    ranges.iter().map(|r| format_mean(range_mean(r))).collect()
}
