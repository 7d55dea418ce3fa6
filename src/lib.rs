/*!
# Survey Syntax Generator

A small web utility that turns survey form input (variable names, labels,
codes, ranges) into SPSS-style command blocks.

## Overview

Every tool is an independent, pure text transformer: it receives already-split
field values and returns one block of syntax, or a structural error. Nothing is
persisted and no state is shared between requests.

## Architecture

### Core
- **tokens**: splitting of raw text fields (newline, comma, `|||`)
- **loader**: reads uploaded CSV and workbook files into response tables
- **Generators**: topbox/bottombox recode, rerank, reloop, restructure,
  recode-by-mean, net-code grouping, open-answer coding
- **ctables**: the table-formula builder with its guided and formula-first flows

### Boundary (feature `web`)
- **app**: axum routes, one JSON endpoint per tool plus the upload endpoint
- **config**: server options from the command line or environment

## REST API Endpoints

- `/api/topbox`, `/api/rerank`, `/api/reloop`, `/api/netcode`
- `/api/restruct` (also `/generate-restruct`), `/api/recode-means`, `/api/range-mean`
- `/api/ctables/guided`, `/api/ctables/formula-first`, `/api/formulas`
- `/api/coding-oa` - multipart upload of the response sheet and codelist
*/

pub mod coding_oa;
pub mod ctables;
pub mod error;
pub mod loader;
pub mod netcode;
pub mod recode_means;
pub mod reloop;
pub mod rerank;
pub mod restructure;
pub mod tokens;
pub mod topbox;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;

/// Re-export the types most callers need
pub use coding_oa::ResponseTable;
pub use ctables::{ColumnSelection, FORMULAS, Formula, FormulaAssignment, TablePlan};
pub use error::{Result, SyntaxError};
pub use netcode::NetCodeGroup;
pub use recode_means::RecodeMeansInput;
pub use reloop::ReloopInput;
pub use restructure::RestructureInput;
pub use tokens::Delimiter;
pub use topbox::TopboxInput;
