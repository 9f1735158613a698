//! Axum route handlers for the connection-analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::{CompletionOptions, Usage};
use crate::network::insights::{extract_suggestions, insight_lines, DashboardStats};
use crate::network::pipeline::{build_visualization, Degradation, NetworkVisualization};
use crate::network::prompts::{
    multi_export_messages, network_insights_messages, single_export_messages, FileSummary,
    VisualizationFocus,
};
use crate::network::records::{parse_csv, ConnectionTable, CsvError, Record};
use crate::state::AppState;
use crate::uploads::{UploadForm, UploadedFile};

/// Rows echoed back to the client for the data table.
const RESPONSE_PREVIEW_ROWS: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeConnectionsResponse {
    pub content: String,
    pub total_connections: usize,
    pub headers: Vec<String>,
    pub data_preview: Vec<Record>,
    pub visualization: NetworkVisualization,
    pub dashboard: DashboardStats,
    pub cleanup_suggestions: Vec<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_name: String,
    pub total_rows: usize,
    pub headers: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeMultipleResponse {
    pub content: String,
    pub total_files: usize,
    pub total_connections: usize,
    pub files_data: Vec<FileData>,
    pub visualization: NetworkVisualization,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysisResponse {
    #[serde(flatten)]
    pub visualization: NetworkVisualization,
    pub insights: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-connections
///
/// One connections export: LLM commentary plus locally computed chart series.
pub async fn handle_analyze_connections(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeConnectionsResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let api_key = form.api_key()?;
    let file = form
        .file("csvFile")
        .ok_or_else(|| AppError::Validation("CSV file is required".to_string()))?;

    let table = load_table(file)?;
    require_records(&table)?;
    let visualization = analyze_table(&table);

    let messages = single_export_messages(&file.file_name, table.len(), &table.headers, &table.records);
    let completion = state
        .llm
        .complete(&api_key, &messages, CompletionOptions::default())
        .await?;

    let total_connections = table.len();
    let cleanup_suggestions = extract_suggestions(&completion.content);
    let ConnectionTable { headers, mut records } = table;
    records.truncate(RESPONSE_PREVIEW_ROWS);

    Ok(Json(AnalyzeConnectionsResponse {
        content: completion.content,
        total_connections,
        headers,
        data_preview: records,
        visualization,
        dashboard: DashboardStats::from_connection_count(total_connections),
        cleanup_suggestions,
        usage: completion.usage,
    }))
}

/// POST /api/analyze-multiple-csv
///
/// Several exports analysed together; charts are computed over the merged rows.
pub async fn handle_analyze_multiple(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeMultipleResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let api_key = form.api_key()?;
    let focus = VisualizationFocus::parse(form.text("visualizationType"));

    let files: Vec<&UploadedFile> = form.files("csvFiles").collect();
    if files.is_empty() {
        return Err(AppError::Validation(
            "At least one CSV file is required".to_string(),
        ));
    }

    let tables = files
        .iter()
        .map(|file| load_table_or_empty(file))
        .collect::<Result<Vec<_>, _>>()?;

    let total_connections: usize = tables.iter().map(ConnectionTable::len).sum();
    info!(files = files.len(), total_connections, ?focus, "Analyzing multiple exports");

    let messages = {
        let summaries: Vec<FileSummary<'_>> = files
            .iter()
            .zip(&tables)
            .map(|(file, table)| FileSummary {
                file_name: &file.file_name,
                headers: &table.headers,
                total_rows: table.len(),
                first_row: table.records.first(),
            })
            .collect();
        multi_export_messages(&summaries, total_connections, focus)
    };

    let files_data = files
        .iter()
        .zip(&tables)
        .map(|(file, table)| FileData {
            file_name: file.file_name.clone(),
            total_rows: table.len(),
            headers: table.headers.clone(),
        })
        .collect();

    let merged = ConnectionTable::merge(tables);
    require_records(&merged)?;
    let visualization = analyze_table(&merged);

    let completion = state
        .llm
        .complete(&api_key, &messages, CompletionOptions::default())
        .await?;

    Ok(Json(AnalyzeMultipleResponse {
        content: completion.content,
        total_files: files.len(),
        total_connections,
        files_data,
        visualization,
        usage: completion.usage,
    }))
}

/// POST /api/analyze/network
///
/// Chart series flattened at the top level plus a list of short insights.
pub async fn handle_network_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<NetworkAnalysisResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let api_key = form.api_key()?;
    let file = form
        .file("file")
        .ok_or_else(|| AppError::Validation("Connections file is required".to_string()))?;

    let table = load_table(file)?;
    require_records(&table)?;
    let visualization = analyze_table(&table);

    let messages = network_insights_messages(&table.records);
    let completion = state
        .llm
        .complete(&api_key, &messages, CompletionOptions::default())
        .await?;

    Ok(Json(NetworkAnalysisResponse {
        visualization,
        insights: insight_lines(&completion.content),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn load_table(file: &UploadedFile) -> Result<ConnectionTable, AppError> {
    parse_csv(&file.text_lossy()).map_err(|e| parse_failure(file, e))
}

/// A zero-byte or header-less file counts as an export with no rows; only
/// the merged table has to be non-empty.
fn load_table_or_empty(file: &UploadedFile) -> Result<ConnectionTable, AppError> {
    match parse_csv(&file.text_lossy()) {
        Err(CsvError::MissingHeader) => {
            debug!(file = %file.file_name, "Empty CSV treated as zero rows");
            Ok(ConnectionTable::default())
        }
        result => result.map_err(|e| parse_failure(file, e)),
    }
}

fn parse_failure(file: &UploadedFile, e: CsvError) -> AppError {
    warn!(file = %file.file_name, "CSV parse failed: {e}");
    AppError::UnprocessableEntity(format!("Could not parse {}: {e}", file.file_name))
}

/// Charts are never rendered for an upload with no rows at all.
fn require_records(table: &ConnectionTable) -> Result<(), AppError> {
    if table.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No data available to process".to_string(),
        ));
    }
    Ok(())
}

fn analyze_table(table: &ConnectionTable) -> NetworkVisualization {
    let (visualization, degradations) = build_visualization(table);
    for degradation in &degradations {
        match degradation {
            Degradation::MissingValues { category, records } => {
                info!(?category, records, "Cells without a value counted as Unknown")
            }
            other => info!(?other, "Using synthetic series"),
        }
    }
    visualization
}
