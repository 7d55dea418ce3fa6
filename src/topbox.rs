use crate::tokens::nth_or_empty;

/// Separator comment written after each variable that produced a recode
pub const SEPARATOR_LINE: &str = "*=============================================.";

/// Input for the topbox/bottombox recode
///
/// `labels` is parallel to `variables`; a missing label renders as an empty string.
/// An empty code list switches the corresponding box type off.
#[derive(Clone, Debug, Default)]
pub struct TopboxInput {
    pub variables: Vec<String>,
    pub labels: Vec<String>,
    pub top_codes: Vec<String>,
    pub non_top_codes: Vec<String>,
    pub bottom_codes: Vec<String>,
    pub non_bottom_codes: Vec<String>,
}

#[derive(Clone, Copy)]
enum BoxKind {
    Top,
    Bottom,
}

impl BoxKind {
    fn letter(self) -> char {
        match self {
            BoxKind::Top => 'T',
            BoxKind::Bottom => 'B',
        }
    }
}

/// Generate topbox and bottombox recodes for every variable
///
/// # Examples
/// ```
/// use survey_syntax::topbox::{generate, TopboxInput};
///
/// let input = TopboxInput {
///     variables: vec!["Q1".into()],
///     labels: vec!["Satisfaction".into()],
///     top_codes: vec!["4".into(), "5".into()],
///     non_top_codes: vec!["1".into(), "2".into(), "3".into()],
///     ..Default::default()
/// };
/// let syntax = generate(&input);
/// assert!(syntax.starts_with("recode Q1 (4,5=1) (1,2,3=2) into Q1_T2B.\n"));
/// ```
pub fn generate(input: &TopboxInput) -> String {
    let mut syntax = String::new();
    let has_top = !input.top_codes.is_empty();
    let has_bottom = !input.bottom_codes.is_empty();

    for (i, variable) in input.variables.iter().enumerate() {
        let label = nth_or_empty(&input.labels, i);

        if has_top {
            push_box(
                &mut syntax,
                variable,
                label,
                BoxKind::Top,
                &input.top_codes,
                &input.non_top_codes,
            );
        }
        if has_bottom {
            push_box(
                &mut syntax,
                variable,
                label,
                BoxKind::Bottom,
                &input.bottom_codes,
                &input.non_bottom_codes,
            );
        }
        if has_top || has_bottom {
            syntax.push_str(SEPARATOR_LINE);
            syntax.push_str("\n\n");
        }
    }

    syntax
}

fn push_box(
    syntax: &mut String,
    variable: &str,
    label: &str,
    kind: BoxKind,
    box_codes: &[String],
    other_codes: &[String],
) {
    let box_label = format!("{}{}B", kind.letter(), box_codes.len());
    let target = format!("{}_{}", variable, box_label);

    syntax.push_str(&format!(
        "recode {} ({}=1) ({}=2) into {}.\n",
        variable,
        box_codes.join(","),
        other_codes.join(","),
        target
    ));
    syntax.push_str(&format!(
        "var lab {} \"{}. {} - {}\".\n",
        target, variable, label, box_label
    ));
    syntax.push_str(&format!(
        "val lab {}\n    1\"{}\"\n    2\"DEL (R)\".\n",
        target, box_label
    ));
}
