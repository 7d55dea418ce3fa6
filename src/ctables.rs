//! Table-formula builder
//!
//! Two input flows feed the same [`TablePlan`]:
//!
//! - **guided**: the caller lists every variable and the by/banner variables,
//!   then picks formulas per column variable (see [`column_variables`] and
//!   [`guided_plan`]);
//! - **formula-first**: the caller picks formulas first and gives one variable
//!   list per formula (see [`formula_first_plan`]).
//!
//! [`render`] turns either plan into the final `CTABLES` command.

use crate::error::{Result, SyntaxError};
use serde::Serialize;
use std::collections::HashSet;

/// A catalog entry: the syntax suffix appended to a variable and its display text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Formula {
    pub value: &'static str,
    pub text: &'static str,
}

/// The fixed formula catalog, in display order
pub const FORMULAS: [Formula; 8] = [
    Formula {
        value: "[c][count f40.0, totals[count f40.0]]",
        text: "count, totals",
    },
    Formula {
        value: "[c][colpct.count f40.0, totals[count f40.0]]",
        text: "colpct.count, totals",
    },
    Formula {
        value: "[s][validn f40.0, mean f40.2]",
        text: "validn, mean",
    },
    Formula {
        value: "[s][validn f40.0, stddev f40.2]",
        text: "validn stddev",
    },
    Formula {
        value: "[c][colpct pct40.0, totals[count f40.0]]",
        text: "colpct, totals",
    },
    Formula {
        value: "[c][layercolpct.totaln pct40.1, totals[count f40.0]]",
        text: "layercolpct.totaln, totals",
    },
    Formula {
        value: "[s][validn f40.0, maximum, minimum, median]",
        text: "validn maximum, minimum, median",
    },
    Formula {
        value: "[count f40.0, colpct.count pct40.1]",
        text: "count, colpct.count",
    },
];

const SLAB_LINE: &str = "/slab pos=row";
const CATEGORY_ATTRIBUTES: &str = "order=a key=value empty=include";

pub fn formula_by_value(value: &str) -> Option<&'static Formula> {
    FORMULAS.iter().find(|f| f.value == value)
}

pub fn formula_by_text(text: &str) -> Option<&'static Formula> {
    FORMULAS.iter().find(|f| f.text == text)
}

/// Resolve a formula given either its syntax value or its display text
pub fn resolve_formula(key: &str) -> Result<&'static Formula> {
    let key = key.trim();
    formula_by_value(key)
        .or_else(|| formula_by_text(key))
        .ok_or_else(|| SyntaxError::selection(format!("unknown formula: {}", key)))
}

/// Formulas chosen for one column variable (guided flow)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSelection {
    pub variable: String,
    pub formulas: Vec<&'static Formula>,
}

/// One selected formula and the variables it applies to (formula-first flow)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormulaAssignment {
    pub formula: &'static Formula,
    pub variables: Vec<String>,
}

/// Common shape of both flows, consumed by [`render`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablePlan {
    /// `(variable, formula)` cells in emission order
    pub cells: Vec<(String, &'static Formula)>,
    pub by_variables: Vec<String>,
    pub category_variables: Vec<String>,
}

/// Column variables of the guided flow: every variable that is not a by variable
pub fn column_variables(all: &[String], by: &[String]) -> Vec<String> {
    let by: HashSet<&str> = by.iter().map(String::as_str).collect();
    all.iter()
        .filter(|v| !by.contains(v.as_str()))
        .cloned()
        .collect()
}

/// Build the plan for the guided flow
///
/// Cells follow column-variable order, then the order formulas were chosen for
/// that variable. Selections for variables that are not column variables are
/// ignored.
pub fn guided_plan(
    all: &[String],
    by: &[String],
    selections: &[ColumnSelection],
) -> Result<TablePlan> {
    if all.is_empty() {
        return Err(SyntaxError::selection("enter at least one variable"));
    }

    let mut cells = Vec::new();
    for variable in column_variables(all, by) {
        let chosen = selections
            .iter()
            .filter(|s| s.variable == variable)
            .flat_map(|s| s.formulas.iter().copied());
        cells.extend(chosen.map(|formula| (variable.clone(), formula)));
    }

    if cells.is_empty() {
        return Err(SyntaxError::selection("select at least one formula"));
    }

    Ok(TablePlan {
        cells,
        by_variables: by.to_vec(),
        category_variables: all.to_vec(),
    })
}

/// Build the plan for the formula-first flow
///
/// Variable order is the first formula's list, then variables first seen in
/// later lists. Cells are variable-major; a variable gets a cell for a formula
/// only when it appears in that formula's list.
pub fn formula_first_plan(by: &[String], assignments: &[FormulaAssignment]) -> Result<TablePlan> {
    if assignments.is_empty() {
        return Err(SyntaxError::selection("select at least one formula"));
    }

    let mut seen = HashSet::new();
    let ordered: Vec<&String> = assignments
        .iter()
        .flat_map(|a| a.variables.iter())
        .filter(|v| seen.insert(v.as_str()))
        .collect();

    let cells: Vec<(String, &'static Formula)> = ordered
        .iter()
        .flat_map(|variable| {
            assignments
                .iter()
                .filter(move |a| a.variables.contains(variable))
                .map(move |a| ((*variable).clone(), a.formula))
        })
        .collect();

    if cells.is_empty() {
        return Err(SyntaxError::selection(
            "enter at least one variable for the selected formulas",
        ));
    }

    let mut category_variables: Vec<String> = ordered.into_iter().cloned().collect();
    for variable in by {
        if !category_variables.contains(variable) {
            category_variables.push(variable.clone());
        }
    }

    Ok(TablePlan {
        cells,
        by_variables: by.to_vec(),
        category_variables,
    })
}

/// Render a plan as one `CTABLES` command
pub fn render(plan: &TablePlan) -> Result<String> {
    if plan.cells.is_empty() {
        return Err(SyntaxError::selection("select at least one formula"));
    }

    let mut lines = vec!["CTABLES /tab".to_string()];
    for (i, (variable, formula)) in plan.cells.iter().enumerate() {
        let prefix = if i == 0 { "" } else { "+" };
        lines.push(format!("{}{}{}", prefix, variable, formula.value));
    }

    if !plan.by_variables.is_empty() {
        lines.push(format!("BY ({}) [c]", plan.by_variables.join(" + ")));
    }
    lines.push(SLAB_LINE.to_string());
    if !plan.by_variables.is_empty() {
        lines.push(format!(
            "/cat var={} {}",
            plan.by_variables.join(" "),
            CATEGORY_ATTRIBUTES
        ));
    }
    lines.push(format!(
        "/cat var=\n{}\n{} total=yes position=before.",
        plan.category_variables.join("\n"),
        CATEGORY_ATTRIBUTES
    ));

    Ok(lines.join("\n"))
}
