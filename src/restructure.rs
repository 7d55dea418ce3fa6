use crate::error::{Result, SyntaxError};
use crate::tokens::{split, Delimiter};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBERED_SUFFIX: Regex =
        Regex::new(r"^(.*?)(?:_\d+)(_O)?$").expect("static pattern compiles");
}

/// Input for the wide-to-long restructure
#[derive(Clone, Debug, Default)]
pub struct RestructureInput {
    pub variables: Vec<String>,
    /// Brands per group, as received; must be a positive integer
    pub brands_per_group: i64,
    pub brand_names: Vec<String>,
    pub output_names: Vec<String>,
    /// Raw comma separated keep list
    pub keep: String,
}

/// One `/MAKE` group of consecutive source variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MakeGroup {
    pub output: String,
    pub sources: Vec<String>,
}

/// Derive the long-format name from the first wide variable of a group
///
/// `Q1_3` becomes `Q1`, `Q1_3_O` becomes `Q1_O`; names without a numbered
/// suffix are returned unchanged.
pub fn derive_output_name(source: &str) -> String {
    match NUMBERED_SUFFIX.captures(source) {
        Some(caps) => {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let other = caps.get(2).map_or("", |m| m.as_str());
            format!("{}{}", prefix, other)
        }
        None => source.to_string(),
    }
}

/// Partition the sources into `/MAKE` groups of `size`
pub fn make_groups(input: &RestructureInput, size: usize) -> Vec<MakeGroup> {
    input
        .variables
        .chunks(size)
        .enumerate()
        .map(|(g, sources)| MakeGroup {
            output: input
                .output_names
                .get(g)
                .cloned()
                .unwrap_or_else(|| derive_output_name(&sources[0])),
            sources: sources.to_vec(),
        })
        .collect()
}

fn group_size(brands_per_group: i64) -> Result<usize> {
    usize::try_from(brands_per_group)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| {
            SyntaxError::mismatch(format!(
                "number of brands must be a positive integer, got {}",
                brands_per_group
            ))
        })
}

/// Generate the `VARSTOCASES` block
pub fn generate(input: &RestructureInput) -> Result<String> {
    let size = group_size(input.brands_per_group)?;
    let groups = make_groups(input, size);

    let mut syntax = String::from("VARSTOCASES /ID = ID1\n");
    for group in &groups {
        syntax.push_str(&format!(
            " /MAKE {} FROM {}\n",
            group.output,
            group.sources.join(" ")
        ));
    }
    syntax.push_str(&format!(" /INDEX = BRAND({})\n", size));

    let keep = split(&input.keep, Delimiter::Comma);
    if !keep.is_empty() {
        syntax.push_str(&format!(" /KEEP = {}\n", keep.join(" ")));
    }
    syntax.push_str(" /NULL = KEEP.\n");

    if !input.brand_names.is_empty() {
        syntax.push_str("\nval lab brand\n");
        for (i, brand) in input.brand_names.iter().enumerate() {
            syntax.push_str(&format!("{}\"{}\"\n", i + 1, brand));
        }
        syntax.push_str(".\n\n");
    }

    for group in &groups {
        syntax.push_str(&format!(
            "var lab {o}\"{o}. [Enter a description for {o}]\".\n",
            o = group.output
        ));
    }

    Ok(syntax)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn output_name_derivation() {
        assert_eq!(derive_output_name("Q1_1"), "Q1");
        assert_eq!(derive_output_name("Q1_12_O"), "Q1_O");
        assert_eq!(derive_output_name("Q1_2_3"), "Q1_2");
        assert_eq!(derive_output_name("Brand"), "Brand");
        assert_eq!(derive_output_name("Q1_O"), "Q1_O");
    }

    #[test]
    fn five_variables_in_groups_of_two() {
        let input = RestructureInput {
            variables: names(&["A_1", "A_2", "B_1", "B_2", "C_1"]),
            brands_per_group: 2,
            ..Default::default()
        };
        let groups = make_groups(&input, 2);
        let sizes: Vec<usize> = groups.iter().map(|g| g.sources.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let syntax = generate(&input).unwrap();
        assert_eq!(
            syntax,
            "VARSTOCASES /ID = ID1\n\
             \x20/MAKE A FROM A_1 A_2\n\
             \x20/MAKE B FROM B_1 B_2\n\
             \x20/MAKE C FROM C_1\n\
             \x20/INDEX = BRAND(2)\n\
             \x20/NULL = KEEP.\n\
             var lab A\"A. [Enter a description for A]\".\n\
             var lab B\"B. [Enter a description for B]\".\n\
             var lab C\"C. [Enter a description for C]\".\n"
        );
    }

    #[test]
    fn explicit_names_keep_list_and_brand_labels() {
        let input = RestructureInput {
            variables: names(&["Q1_1", "Q1_2", "Q2_1", "Q2_2"]),
            brands_per_group: 2,
            brand_names: names(&["Coke", "Pepsi"]),
            output_names: names(&["Awareness"]),
            keep: "ID, Region ,".into(),
        };

        let syntax = generate(&input).unwrap();
        assert!(syntax.contains(" /MAKE Awareness FROM Q1_1 Q1_2\n /MAKE Q2 FROM Q2_1 Q2_2\n"));
        assert!(syntax.contains(" /KEEP = ID Region\n /NULL = KEEP.\n"));
        assert!(syntax.contains("\nval lab brand\n1\"Coke\"\n2\"Pepsi\"\n.\n\n"));
    }

    #[test]
    fn non_positive_group_size_is_rejected() {
        for size in [0, -1] {
            let input = RestructureInput {
                variables: names(&["A_1"]),
                brands_per_group: size,
                ..Default::default()
            };
            assert!(matches!(
                generate(&input),
                Err(SyntaxError::StructuralMismatch(_))
            ));
        }
    }
}
