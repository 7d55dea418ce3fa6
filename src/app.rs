use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::coding_oa;
use crate::config::ServerConfig;
use crate::ctables::{self, ColumnSelection, Formula, FormulaAssignment, FORMULAS};
use crate::error::SyntaxError;
use crate::loader::{self, LoadError};
use crate::netcode;
use crate::recode_means::{self, RecodeMeansInput};
use crate::reloop::{self, ReloopInput};
use crate::rerank;
use crate::restructure::{self, RestructureInput};
use crate::tokens::{Delimiter, split, split_labels};
use crate::topbox::{self, TopboxInput};

/// Errors surfaced to API clients as `400 {"success": false, "error": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("missing form field: {0}")]
    MissingField(&'static str),
}

#[derive(Serialize)]
struct SyntaxResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    syntax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("rejected request: {}", self);
        let body = SyntaxResponse {
            success: false,
            syntax: None,
            error: Some(self.to_string()),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

type ApiResult = Result<Json<SyntaxResponse>, ApiError>;

fn generated(tool: &str, syntax: String) -> ApiResult {
    log::debug!("{} generated {} bytes", tool, syntax.len());
    Ok(Json(SyntaxResponse {
        success: true,
        syntax: Some(syntax),
        error: None,
    }))
}

/// A numeric form field: HTML forms send strings, scripted clients send numbers
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    fn as_integer(&self) -> Option<i64> {
        match self {
            NumberField::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            NumberField::Number(_) => None,
            NumberField::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Non-numeric and negative counts read as 0; counts too large for `u32`
/// saturate so the generator rejects them
fn count(field: &Option<NumberField>) -> u32 {
    field
        .as_ref()
        .and_then(NumberField::as_integer)
        .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct TopboxRequest {
    var_names: String,
    var_labels: String,
    t2b: String,
    non_t2b: String,
    b2b: String,
    non_b2b: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RerankRequest {
    base_var: String,
    num_ranks: Option<NumberField>,
    labels: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ReloopRequest {
    question_name: String,
    num_attributes: Option<NumberField>,
    num_brands: Option<NumberField>,
    rebase_question: String,
    brand_names: String,
    attribute_texts: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RestructRequest {
    variables: String,
    num_brands: Option<NumberField>,
    brand_names: String,
    output_vars: String,
    keep_vars: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RecodeMeansRequest {
    ranges: String,
    variables: String,
    means: String,
    codes: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct NetcodeRequest {
    question_name: String,
    codes: String,
    labels: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct GuidedTableRequest {
    all_vars: String,
    by_vars: String,
    /// Column variable -> formula values (or display texts)
    selections: HashMap<String, Vec<String>>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct FormulaFirstRequest {
    by_vars: String,
    assignments: Vec<AssignmentRequest>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AssignmentRequest {
    formula: String,
    variables: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RangeMeanRequest {
    ranges: String,
}

#[derive(Serialize)]
struct RangeMeanResponse {
    means: Vec<String>,
}

/// Build the application router
pub fn router(config: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/formulas", get(list_formulas))
        .route("/api/topbox", post(generate_topbox))
        .route("/api/rerank", post(generate_rerank))
        .route("/api/reloop", post(generate_reloop))
        .route("/api/restruct", post(generate_restruct))
        .route("/generate-restruct", post(generate_restruct))
        .route("/api/recode-means", post(generate_recode_means))
        .route("/api/range-mean", post(compute_range_means))
        .route("/api/netcode", post(generate_netcode))
        .route("/api/ctables/guided", post(generate_guided_table))
        .route("/api/ctables/formula-first", post(generate_formula_first_table))
        .route("/api/coding-oa", post(generate_coding_oa))
        .layer(DefaultBodyLimit::max(config.upload_limit_bytes()));

    match &config.public_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

/// Bind the configured address and serve until the process exits
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(&config);

    let listener = TcpListener::bind(config.address()).await?;
    log::info!("Listening on http://{}", config.address());
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn list_formulas() -> Json<Vec<Formula>> {
    Json(FORMULAS.to_vec())
}

async fn generate_topbox(Json(req): Json<TopboxRequest>) -> ApiResult {
    let input = TopboxInput {
        variables: split(&req.var_names, Delimiter::Comma),
        labels: split_labels(&req.var_labels),
        top_codes: split(&req.t2b, Delimiter::Comma),
        non_top_codes: split(&req.non_t2b, Delimiter::Comma),
        bottom_codes: split(&req.b2b, Delimiter::Comma),
        non_bottom_codes: split(&req.non_b2b, Delimiter::Comma),
    };
    generated("topbox", topbox::generate(&input))
}

async fn generate_rerank(Json(req): Json<RerankRequest>) -> ApiResult {
    let labels = split_labels(&req.labels);
    let syntax = rerank::generate(req.base_var.trim(), count(&req.num_ranks), &labels)?;
    generated("rerank", syntax)
}

async fn generate_reloop(Json(req): Json<ReloopRequest>) -> ApiResult {
    let input = ReloopInput {
        question: req.question_name.trim().to_string(),
        attribute_count: count(&req.num_attributes),
        brand_count: count(&req.num_brands),
        rebase_question: req.rebase_question.trim().to_string(),
        brand_names: split_labels(&req.brand_names),
        attribute_texts: split_labels(&req.attribute_texts),
    };
    generated("reloop", reloop::generate(&input)?)
}

async fn generate_restruct(Json(req): Json<RestructRequest>) -> ApiResult {
    let brands_per_group = req
        .num_brands
        .as_ref()
        .and_then(NumberField::as_integer)
        .ok_or_else(|| SyntaxError::mismatch("number of brands must be a positive integer"))?;

    let input = RestructureInput {
        variables: split(&req.variables, Delimiter::Newline),
        brands_per_group,
        brand_names: split(&req.brand_names, Delimiter::Newline),
        output_names: split(&req.output_vars, Delimiter::Newline),
        keep: req.keep_vars,
    };
    generated("restruct", restructure::generate(&input)?)
}

async fn generate_recode_means(Json(req): Json<RecodeMeansRequest>) -> ApiResult {
    let input = RecodeMeansInput {
        ranges: split(&req.ranges, Delimiter::Newline),
        variables: split(&req.variables, Delimiter::Newline),
        means: split(&req.means, Delimiter::Newline),
        codes: split(&req.codes, Delimiter::Newline),
    };
    generated("recode-means", recode_means::generate(&input)?)
}

async fn compute_range_means(Json(req): Json<RangeMeanRequest>) -> Json<RangeMeanResponse> {
    let ranges = split(&req.ranges, Delimiter::Newline);
    Json(RangeMeanResponse {
        means: recode_means::means_for_ranges(&ranges),
    })
}

async fn generate_netcode(Json(req): Json<NetcodeRequest>) -> ApiResult {
    let codes = split(&req.codes, Delimiter::Newline);
    let labels = split(&req.labels, Delimiter::Newline);
    let syntax = netcode::generate(req.question_name.trim(), &codes, &labels)?;
    generated("netcode", syntax)
}

async fn generate_guided_table(Json(req): Json<GuidedTableRequest>) -> ApiResult {
    let all = split(&req.all_vars, Delimiter::Newline);
    let by = split(&req.by_vars, Delimiter::Newline);

    let selections = req
        .selections
        .iter()
        .map(|(variable, keys)| -> Result<ColumnSelection, SyntaxError> {
            let formulas = keys
                .iter()
                .map(|key| ctables::resolve_formula(key))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ColumnSelection {
                variable: variable.trim().to_string(),
                formulas,
            })
        })
        .collect::<Result<Vec<_>, SyntaxError>>()?;

    let plan = ctables::guided_plan(&all, &by, &selections)?;
    generated("ctables", ctables::render(&plan)?)
}

async fn generate_formula_first_table(Json(req): Json<FormulaFirstRequest>) -> ApiResult {
    let by = split(&req.by_vars, Delimiter::Newline);

    let assignments = req
        .assignments
        .iter()
        .map(|a| -> Result<FormulaAssignment, SyntaxError> {
            Ok(FormulaAssignment {
                formula: ctables::resolve_formula(&a.formula)?,
                variables: split(&a.variables, Delimiter::Newline),
            })
        })
        .collect::<Result<Vec<_>, SyntaxError>>()?;

    let plan = ctables::formula_first_plan(&by, &assignments)?;
    generated("ctables", ctables::render(&plan)?)
}

async fn generate_coding_oa(mut multipart: Multipart) -> ApiResult {
    let mut responses = None;
    let mut codelist = None;
    let mut variable = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "excelFile" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                responses = Some(loader::load_table(&file_name, bytes.to_vec())?);
            }
            "codelistFile" => {
                let bytes = field.bytes().await?;
                codelist = Some(String::from_utf8(bytes.to_vec()).map_err(LoadError::from)?);
            }
            "variableName" => variable = Some(field.text().await?.trim().to_string()),
            _ => log::debug!("ignoring upload field {}", name),
        }
    }

    let responses = responses.ok_or(ApiError::MissingField("excelFile"))?;
    let codelist = codelist.ok_or(ApiError::MissingField("codelistFile"))?;
    let variable = variable
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingField("variableName"))?;

    generated(
        "coding-oa",
        coding_oa::generate(&responses, &codelist, &variable),
    )
}
