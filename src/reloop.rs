use crate::error::{Result, check_count};
use crate::tokens::nth_or_empty;

/// Input for the brand/attribute reloop
#[derive(Clone, Debug, Default)]
pub struct ReloopInput {
    pub question: String,
    pub attribute_count: u32,
    pub brand_count: u32,
    pub rebase_question: String,
    pub brand_names: Vec<String>,
    pub attribute_texts: Vec<String>,
}

/// Generate the reloop syntax
///
/// Each brand gets one reshuffle line per attribute and one rebase line. The
/// rebase fires only when every attribute cell of that brand is missing.
///
/// # Arguments
/// * `input` - Question names, attribute and brand counts, and the label texts
///
/// # Returns
/// * `Result<String>` - The reshuffle, variable-label and value-label sections,
///   or `StructuralMismatch` when either count exceeds
///   [`MAX_COUNT`](crate::error::MAX_COUNT)
pub fn generate(input: &ReloopInput) -> Result<String> {
    let question = input.question.as_str();
    let rebase = input.rebase_question.as_str();
    let attributes = check_count("attribute count", input.attribute_count)?;
    let brands = check_count("brand count", input.brand_count)?;
    let rebase_code = attributes + 1;
    let mut syntax = format!("/* Reloop {} */\n\n", question);

    for brand in 1..=brands {
        for attribute in 1..=attributes {
            syntax.push_str(&format!(
                "if {q}_{a}R{b} = {b} re_{q}_{b}R{a} = {a}.\n",
                q = question,
                a = attribute,
                b = brand
            ));
        }

        let missing = (1..=attributes)
            .map(|attribute| format!("mis({}_{}R{})", question, attribute, brand))
            .collect::<Vec<_>>()
            .join(" and\n   ");
        syntax.push_str(&format!(
            "if {rb}R{b} = {b} and\n   {missing} re_{q}_{b}R{c} = {c}.\n\n",
            rb = rebase,
            b = brand,
            missing = missing,
            q = question,
            c = rebase_code
        ));
    }

    syntax.push_str("/* ===== 1. Variable Labels ===== */\n");
    for brand in 1..=brands {
        let brand_name = nth_or_empty(&input.brand_names, brand as usize - 1);
        for attribute in 1..=attributes {
            let text = nth_or_empty(&input.attribute_texts, attribute as usize - 1);
            syntax.push_str(&format!(
                "var lab re_{}_{}R{} \"{}-{}. {}\".\n",
                question, brand, attribute, question, brand_name, text
            ));
        }
        syntax.push_str(&format!(
            "var lab re_{}_{}R{} \"{}-{}. Rebase {}\".\n\n",
            question, brand, rebase_code, question, brand_name, rebase
        ));
    }

    syntax.push_str("/* ===== 2. Value Labels ===== */\n");
    syntax.push_str(&format!(
        "val lab re_{q}_1R1 to re_{q}_{b}R{c}\n",
        q = question,
        b = brands,
        c = rebase_code
    ));
    for attribute in 1..=attributes {
        let text = nth_or_empty(&input.attribute_texts, attribute as usize - 1);
        syntax.push_str(&format!("    {}\"{}\"\n", attribute, text));
    }
    syntax.push_str(&format!("    {}\"Rebase {}\".\n", rebase_code, rebase));

    Ok(syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MAX_COUNT, SyntaxError};

    fn sample() -> ReloopInput {
        ReloopInput {
            question: "Q5".into(),
            attribute_count: 2,
            brand_count: 2,
            rebase_question: "S3".into(),
            brand_names: vec!["Alpha".into(), "Beta".into()],
            attribute_texts: vec!["Tasty".into(), "Cheap".into()],
        }
    }

    #[test]
    fn reshuffle_and_rebase_lines_per_brand() {
        let syntax = generate(&sample()).unwrap();

        assert!(syntax.starts_with("/* Reloop Q5 */\n\nif Q5_1R1 = 1 re_Q5_1R1 = 1.\n"));
        assert!(syntax.contains("if Q5_2R2 = 2 re_Q5_2R2 = 2.\n"));
        // rebase requires every attribute of the brand to be missing
        assert!(syntax.contains(
            "if S3R2 = 2 and\n   mis(Q5_1R2) and\n   mis(Q5_2R2) re_Q5_2R3 = 3.\n\n"
        ));
    }

    #[test]
    fn labels_span_first_to_rebase_variable() {
        let syntax = generate(&sample()).unwrap();

        assert!(syntax.contains("var lab re_Q5_1R2 \"Q5-Alpha. Cheap\".\n"));
        assert!(syntax.contains("var lab re_Q5_2R3 \"Q5-Beta. Rebase S3\".\n\n"));
        assert!(syntax.ends_with(
            "/* ===== 2. Value Labels ===== */\n\
             val lab re_Q5_1R1 to re_Q5_2R3\n    1\"Tasty\"\n    2\"Cheap\"\n    3\"Rebase S3\".\n"
        ));
    }

    #[test]
    fn short_name_lists_default_to_empty() {
        let input = ReloopInput {
            brand_names: vec![],
            attribute_texts: vec!["Tasty".into()],
            ..sample()
        };
        let syntax = generate(&input).unwrap();
        assert!(syntax.contains("var lab re_Q5_2R2 \"Q5-. \".\n"));
        assert!(syntax.contains("    2\"\"\n"));
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let attributes = ReloopInput {
            attribute_count: u32::MAX,
            brand_count: 0,
            ..sample()
        };
        assert!(matches!(
            generate(&attributes),
            Err(SyntaxError::StructuralMismatch(_))
        ));

        let brands = ReloopInput {
            brand_count: MAX_COUNT + 1,
            ..sample()
        };
        let err = generate(&brands).unwrap_err();
        assert!(err.to_string().starts_with("brand count must be at most"));
    }
}
