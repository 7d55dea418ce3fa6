use crate::error::{Result, SyntaxError};

/// Marker that turns a label into a NET header
pub const NET_MARKER: &str = "[NET]";

/// A NET code together with the codes it aggregates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetCodeGroup {
    pub net_code: String,
    pub net_label: String,
    pub related_codes: Vec<String>,
}

fn is_net(label: &str) -> bool {
    label.contains(NET_MARKER)
}

fn is_others(label: &str) -> bool {
    label.to_lowercase().contains("others")
}

fn strip_marker(label: &str) -> String {
    let spaced = format!(" {}", NET_MARKER);
    if label.contains(&spaced) {
        label.replacen(&spaced, "", 1)
    } else {
        label.replacen(NET_MARKER, "", 1).trim().to_string()
    }
}

/// Group codes under the NET headers that precede them
///
/// A NET label opens a group and closes the previous one. While a group is
/// open, an "others" label closes it without joining; every other code joins.
/// Codes seen with no open group belong to no group.
pub fn group_codes(codes: &[String], labels: &[String]) -> Vec<NetCodeGroup> {
    let (mut closed, open) = codes.iter().zip(labels).fold(
        (Vec::new(), None::<NetCodeGroup>),
        |(mut closed, open), (code, label)| {
            if is_net(label) {
                closed.extend(open);
                let group = NetCodeGroup {
                    net_code: code.clone(),
                    net_label: strip_marker(label),
                    related_codes: Vec::new(),
                };
                return (closed, Some(group));
            }

            match open {
                Some(group) if is_others(label) => {
                    closed.push(group);
                    (closed, None)
                }
                Some(mut group) => {
                    group.related_codes.push(code.clone());
                    (closed, Some(group))
                }
                None => (closed, None),
            }
        },
    );

    closed.extend(open);
    closed
}

/// Generate NET-code syntax for `question`
///
/// Emits one `IF` line per group with related codes, a `Var lab` line per NET
/// code, and one value-label block listing regular codes before NET codes.
///
/// # Arguments
/// * `question` - Question name used as the `<question>R<code>` prefix
/// * `codes` - Codes in codelist order
/// * `labels` - Labels parallel to `codes`; `[NET]` marks a group header
///
/// # Returns
/// * `Result<String>` - The syntax block, or `StructuralMismatch` when `codes`
///   and `labels` differ in length
pub fn generate(question: &str, codes: &[String], labels: &[String]) -> Result<String> {
    if codes.len() != labels.len() {
        return Err(SyntaxError::mismatch(format!(
            "codes and labels must have the same number of entries (got {} and {})",
            codes.len(),
            labels.len()
        )));
    }

    let groups = group_codes(codes, labels);
    let mut syntax = format!("/* {}-Netcode [{}] */\n\n", question, codes.join(","));

    for group in groups.iter().filter(|g| !g.related_codes.is_empty()) {
        let conditions = group
            .related_codes
            .iter()
            .map(|code| format!("{}R{}={}", question, code, code))
            .collect::<Vec<_>>()
            .join(" OR ");
        syntax.push_str(&format!(
            "IF {} {}R{}={}.\n",
            conditions, question, group.net_code, group.net_code
        ));
    }
    syntax.push('\n');

    for group in &groups {
        syntax.push_str(&format!(
            "Var lab {}R{}\"{}. {}\".\n",
            question, group.net_code, question, group.net_label
        ));
    }
    syntax.push('\n');

    let regular: Vec<(&String, &String)> = codes
        .iter()
        .zip(labels)
        .filter(|(_, label)| !is_net(label))
        .collect();

    let value_vars = regular
        .iter()
        .map(|(code, _)| *code)
        .chain(groups.iter().map(|g| &g.net_code))
        .map(|code| format!("{}R{}", question, code))
        .collect::<Vec<_>>()
        .join(" ");
    syntax.push_str(&format!("val lab {}\n", value_vars));

    for (code, label) in &regular {
        syntax.push_str(&format!("{}\"{}\"\n", code, label));
    }
    for group in &groups {
        syntax.push_str(&format!(
            "{}\"{} {}\"\n",
            group.net_code, group.net_label, NET_MARKER
        ));
    }
    syntax.push_str(".\n");

    Ok(syntax)
}
