use crate::error::{Result, check_count};

/// Generate the rank-reshape syntax for `base`
///
/// For every rank and every option an `IF` line assigns the option number to the
/// rank variable, followed by variable labels and one merged value-label block.
///
/// # Arguments
/// * `base` - Name of the source question; options are read from `base_<o>`
/// * `rank_count` - Number of ranks, each producing a `base_Rank<r>` variable
/// * `options` - Option labels in code order
///
/// # Returns
/// * `Result<String>` - The syntax block, or `StructuralMismatch` when
///   `rank_count` exceeds [`MAX_COUNT`](crate::error::MAX_COUNT)
///
/// # Examples
/// ```
/// use survey_syntax::rerank::generate;
///
/// let syntax = generate("Q2", 1, &["Price".to_string()]).unwrap();
/// assert!(syntax.starts_with("IF Q2_1=1 Q2_Rank1=1.\n"));
/// ```
pub fn generate(base: &str, rank_count: u32, options: &[String]) -> Result<String> {
    let rank_count = check_count("rank count", rank_count)?;
    let mut syntax = String::new();

    for rank in 1..=rank_count {
        for option in 1..=options.len() {
            syntax.push_str(&format!(
                "IF {}_{}={} {}_Rank{}={}.\n",
                base, option, rank, base, rank, option
            ));
        }
        syntax.push('\n');
    }

    let rank_vars: Vec<String> = (1..=rank_count)
        .map(|rank| format!("{}_Rank{}", base, rank))
        .collect();

    syntax.push_str("* Variable Labels.\n");
    for (rank_var, rank) in rank_vars.iter().zip(1..) {
        syntax.push_str(&format!("var lab {} \"{}. Rank {}\".\n", rank_var, base, rank));
    }
    syntax.push('\n');

    syntax.push_str("* Value Labels.\n");
    match rank_vars.as_slice() {
        [] => {}
        [only] => syntax.push_str(&format!("val lab {}\n", only)),
        [first, .., last] => syntax.push_str(&format!("val lab {} to {}\n", first, last)),
    }
    for (i, label) in options.iter().enumerate() {
        syntax.push_str(&format!("    {}\"{}\"\n", i + 1, label));
    }
    syntax.push_str(".\n");

    Ok(syntax)
}
