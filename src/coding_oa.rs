use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESPONSE_COLUMN: Regex = Regex::new(r"^R(\d+)$").expect("static pattern compiles");
    static ref CODELIST_LINE: Regex =
        Regex::new(r#"^(\d+)["']?(.+?)["']?$"#).expect("static pattern compiles");
}

/// Header names accepted for the respondent identifier, in lookup order
pub const ID_COLUMNS: [&str; 3] = ["Vrid", "VRID", "vrid"];

/// Uploaded response data: a header row plus data rows of cell text
///
/// Blank cells are empty strings. Rows shorter than the header are treated as
/// blank in the missing columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResponseTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        ResponseTable { headers, rows }
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn cell<'a>(row: &'a [String], column: Option<usize>) -> Option<&'a str> {
        column
            .and_then(|c| row.get(c))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Response columns (`R1`, `R2`, ...) sorted by their number
    pub fn response_columns(&self) -> Vec<(usize, &str)> {
        let mut columns: Vec<(u64, usize, &str)> = self
            .headers
            .iter()
            .enumerate()
            .filter_map(|(i, header)| {
                let caps = RESPONSE_COLUMN.captures(header)?;
                let number = caps[1].parse().ok()?;
                Some((number, i, header.as_str()))
            })
            .collect();
        columns.sort_by_key(|(number, _, _)| *number);
        columns.into_iter().map(|(_, i, name)| (i, name)).collect()
    }

    /// Identifier of a row: the first non-blank identifier column
    pub fn row_id<'a>(&self, row: &'a [String]) -> Option<&'a str> {
        ID_COLUMNS
            .iter()
            .find_map(|name| Self::cell(row, self.column(name)))
    }
}

/// One `code "label"` pair from a codelist
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodelistEntry {
    pub code: String,
    pub label: String,
}

/// Parse a codelist such as `1"Good taste"` / `2 'Too sweet'`
///
/// Lines that do not start with a code are skipped.
pub fn parse_codelist(content: &str) -> Vec<CodelistEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let caps = CODELIST_LINE.captures(line)?;
            let label = caps[2]
                .trim()
                .trim_start_matches(['"', '\''])
                .trim_end_matches(['"', '\''])
                .trim()
                .to_string();
            Some(CodelistEntry {
                code: caps[1].to_string(),
                label,
            })
        })
        .collect()
}

/// Generate coding syntax for open-answer responses
///
/// Response column `R<k>` (k-th in numeric order) becomes `<variable>_code<k>`.
/// Rows without an identifier and blank cells produce nothing.
///
/// # Arguments
/// * `table` - Uploaded responses with an identifier column and `R<n>` columns
/// * `codelist` - Codelist text, one `code "label"` entry per line
/// * `variable` - Prefix of the generated `_code<k>` variables
///
/// # Returns
/// * `String` - `IF` assignments grouped by column, then one value-label block;
///   empty when the table has no response columns
pub fn generate(table: &ResponseTable, codelist: &str, variable: &str) -> String {
    let columns = table.response_columns();
    let mut syntax = String::new();

    for (k, (column, _)) in columns.iter().enumerate() {
        let target = format!("{}_code{}", variable, k + 1);
        for row in &table.rows {
            let Some(id) = table.row_id(row) else {
                continue;
            };
            if let Some(value) = ResponseTable::cell(row, Some(*column)) {
                syntax.push_str(&format!("IF Vrid = {} {} = {}.\n", id, target, value));
            }
        }
        syntax.push('\n');
    }

    if columns.is_empty() {
        return syntax;
    }

    if columns.len() == 1 {
        syntax.push_str(&format!("val lab {}_code1\n", variable));
    } else {
        syntax.push_str(&format!(
            "val lab {}_code1 to {}_code{}\n",
            variable,
            variable,
            columns.len()
        ));
    }
    for entry in parse_codelist(codelist) {
        syntax.push_str(&format!("    {} \"{}\"\n", entry.code, entry.label));
    }
    syntax.push_str(".\n");

    syntax
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn codelist_quotes_and_garbage() {
        let entries = parse_codelist("1\"Good taste\"\r\n\n2 'Too sweet'\nnot a code\n 3 Price \n");
        assert_eq!(
            entries,
            vec![
                CodelistEntry { code: "1".into(), label: "Good taste".into() },
                CodelistEntry { code: "2".into(), label: "Too sweet".into() },
                CodelistEntry { code: "3".into(), label: "Price".into() },
            ]
        );
    }

    #[test]
    fn response_columns_sort_numerically() {
        let table = ResponseTable::new(row(&["R10", "Vrid", "R2", "Rx", "R1"]), vec![]);
        let names: Vec<&str> = table.response_columns().into_iter().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["R1", "R2", "R10"]);
    }

    #[test]
    fn identifier_falls_back_across_spellings() {
        let table = ResponseTable::new(row(&["Vrid", "VRID", "R1"]), vec![]);
        assert_eq!(table.row_id(&row(&["", "77", "1"])), Some("77"));
        assert_eq!(table.row_id(&row(&[" ", ""])), None);
    }

    #[test]
    fn generates_if_lines_and_value_labels() {
        let table = ResponseTable::new(
            row(&["Vrid", "R1", "R2"]),
            vec![
                row(&["1001", "3", ""]),
                row(&["", "4", "5"]),
                row(&["1002", "1", "2"]),
            ],
        );

        let syntax = generate(&table, "1\"Good\"\n2\"Bad\"", "Q5");
        assert_eq!(
            syntax,
            "IF Vrid = 1001 Q5_code1 = 3.\n\
             IF Vrid = 1002 Q5_code1 = 1.\n\
             \n\
             IF Vrid = 1002 Q5_code2 = 2.\n\
             \n\
             val lab Q5_code1 to Q5_code2\n    1 \"Good\"\n    2 \"Bad\"\n.\n"
        );
    }

    #[test]
    fn no_response_columns_means_no_output() {
        let table = ResponseTable::new(row(&["Vrid", "Comment"]), vec![row(&["1", "x"])]);
        assert_eq!(generate(&table, "1 A", "Q5"), "");
    }
}
