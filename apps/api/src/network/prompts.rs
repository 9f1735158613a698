// Connection-analysis prompt templates.
// All prompts for the network module are defined here.

use crate::llm_client::prompts::CONNECTION_ANALYST_SYSTEM;
use crate::llm_client::ChatMessage;

use super::records::Record;

/// Rows shown to the model as a sample of the export.
pub const PROMPT_PREVIEW_ROWS: usize = 5;

pub const SINGLE_EXPORT_SYSTEM_SUFFIX: &str = " You'll receive CSV data from a LinkedIn connections export. \
Analyze this data and provide insights and recommendations.";

pub const NETWORK_INSIGHTS_PROMPT: &str = "Analyze this LinkedIn network data and provide 3-5 key insights about:
  1. Network composition
  2. Growth patterns
  3. Industry distribution
  4. Potential opportunities for networking

  Data summary:
  {records}
  ...and {remaining} more connections";

/// Which aspect of the network a multi-file analysis should focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationFocus {
    General,
    Countries,
    Roles,
    Industries,
    Growth,
}

impl VisualizationFocus {
    /// Unrecognised values mean "general", as the dashboard sends free text.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("countries") => Self::Countries,
            Some("roles") => Self::Roles,
            Some("industries") => Self::Industries,
            Some("growth") => Self::Growth,
            _ => Self::General,
        }
    }

    fn system_focus(self) -> Option<&'static str> {
        match self {
            Self::General => None,
            Self::Countries => Some("Focus on geographical distribution of connections."),
            Self::Roles => Some("Focus on the professional roles and positions of connections."),
            Self::Industries => Some("Focus on the industry distribution of connections."),
            Self::Growth => Some("Focus on the growth of connections over time."),
        }
    }

    fn user_focus(self) -> Option<&'static str> {
        match self {
            Self::General => None,
            Self::Countries => Some("Focus on the geographical distribution of my connections."),
            Self::Roles => Some("Focus on the professional roles and positions of my connections."),
            Self::Industries => Some("Focus on the industry distribution of my connections."),
            Self::Growth => Some("Focus on how my network has grown over time."),
        }
    }
}

/// Per-file facts included in a multi-file prompt.
pub struct FileSummary<'a> {
    pub file_name: &'a str,
    pub headers: &'a [String],
    pub total_rows: usize,
    pub first_row: Option<&'a Record>,
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_default()
}

/// Messages for analysing a single connections export.
pub fn single_export_messages(
    file_name: &str,
    total: usize,
    headers: &[String],
    records: &[Record],
) -> Vec<ChatMessage> {
    let preview = &records[..records.len().min(PROMPT_PREVIEW_ROWS)];
    let description = format!(
        "\n  CSV File: {file_name}\n  Total connections: {total}\n  Column headers: {}\n\n  \
         Here's a preview of the first few rows:\n  {}\n",
        headers.join(", "),
        to_json(preview, true),
    );

    vec![
        ChatMessage::system(format!("{CONNECTION_ANALYST_SYSTEM}{SINGLE_EXPORT_SYSTEM_SUFFIX}")),
        ChatMessage::user(format!(
            "Please analyze my LinkedIn connections data and provide insights. {description}"
        )),
    ]
}

/// Messages for analysing several exports together, optionally focused.
pub fn multi_export_messages(
    files: &[FileSummary<'_>],
    total: usize,
    focus: VisualizationFocus,
) -> Vec<ChatMessage> {
    let mut system = format!(
        "{CONNECTION_ANALYST_SYSTEM} You'll receive data from multiple LinkedIn connections exports."
    );
    let mut user = format!(
        "Please analyze my LinkedIn connections data from {} files and provide insights.",
        files.len()
    );
    if let (Some(sys), Some(usr)) = (focus.system_focus(), focus.user_focus()) {
        system.push(' ');
        system.push_str(sys);
        user.push(' ');
        user.push_str(usr);
    }

    let details = files
        .iter()
        .map(|f| {
            format!(
                "File: {}\n   Headers: {}\n   Total rows: {}\n   Preview: {}",
                f.file_name,
                f.headers.join(", "),
                f.total_rows,
                f.first_row.map(|r| to_json(r, false)).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let summary = format!(
        "Total files: {}\nTotal connections across all files: {total}\n\nFile details:\n{details}",
        files.len()
    );

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!("{user}\n\n{summary}")),
    ]
}

/// Single system message asking for short bullet insights over a sample.
pub fn network_insights_messages(records: &[Record]) -> Vec<ChatMessage> {
    let sample = &records[..records.len().min(10)];
    let prompt = NETWORK_INSIGHTS_PROMPT
        .replace("{records}", &to_json(sample, false))
        .replace("{remaining}", &records.len().saturating_sub(10).to_string());
    vec![ChatMessage::system(prompt)]
}
