//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    CoverSheet, FormatBlueprint, FormatStatus, GenerationSetting, Question, SectionBlueprint,
};
use crate::review::{DuplicateRef, ReviewReport};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListFormats,
    OpenWorkspace {
        #[serde(rename = "formatId")]
        format_id: String,
    },
    EditPrompt {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        prompt: String,
    },
    ToggleLock {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
    },
    ShuffleUnlocked {
        #[serde(rename = "formatId")]
        format_id: String,
    },
    ResetOrder {
        #[serde(rename = "formatId")]
        format_id: String,
    },
    SaveLineup {
        #[serde(rename = "formatId")]
        format_id: String,
    },
    SetCorrectOption {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "optionIndex")]
        option_index: usize,
    },
    EditOptionLabel {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "optionIndex")]
        option_index: usize,
        label: String,
    },
    EditKeyword {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "keywordIndex")]
        keyword_index: usize,
        value: String,
    },
    AddKeyword {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        value: String,
    },
    RemoveKeyword {
        #[serde(rename = "formatId")]
        format_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "keywordIndex")]
        keyword_index: usize,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Formats {
        formats: Vec<FormatBlueprint>,
    },
    Workspace {
        workspace: WorkspaceOut,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for workspace delivery: the lineup with
/// inlined review findings plus the cluster summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceOut {
    pub format: FormatBlueprint,
    pub expected_total: u32,
    pub total_questions: usize,
    pub questions: Vec<QuestionOut>,
    pub clusters: Vec<ClusterOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    #[serde(flatten)]
    pub question: Question,
    pub grammar: Vec<String>,
    pub duplicates: Vec<DuplicateRef>,
    pub cluster_id: Option<String>,
}

/// Cluster summary: members sorted by lineup position, the lead first.
/// Non-lead members render a "jump to lead" link against `lead_id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOut {
    pub id: String,
    pub lead_id: String,
    pub members: Vec<ClusterMemberOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMemberOut {
    pub id: String,
    pub order: usize,
    pub section: String,
}

/// Assemble the public workspace DTO from the lineup and a review pass.
pub fn to_workspace_out(
    format: FormatBlueprint,
    questions: &[Question],
    report: &ReviewReport,
) -> WorkspaceOut {
    let question_outs = questions
        .iter()
        .map(|q| {
            let diagnostic = report.diagnostics.get(&q.id).cloned().unwrap_or_default();
            QuestionOut {
                question: q.clone(),
                grammar: diagnostic.grammar,
                duplicates: diagnostic.duplicates,
                cluster_id: diagnostic.cluster_id,
            }
        })
        .collect();

    let clusters = report
        .clusters_in_order()
        .into_iter()
        .map(|cluster| ClusterOut {
            id: cluster.id.clone(),
            lead_id: cluster.lead().map(|q| q.id.clone()).unwrap_or_default(),
            members: cluster
                .questions
                .iter()
                .map(|q| ClusterMemberOut {
                    id: q.id.clone(),
                    order: q.order,
                    section: q.section.clone(),
                })
                .collect(),
        })
        .collect();

    WorkspaceOut {
        expected_total: format.expected_total(),
        total_questions: questions.len(),
        format,
        questions: question_outs,
        clusters,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    #[serde(rename = "formatId")]
    pub format_id: String,
}

/// Format payload accepted by save: a blueprint whose id may be omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatIn {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: FormatStatus,
    #[serde(default)]
    pub layout: CoverSheet,
    #[serde(default)]
    pub sections: Vec<SectionBlueprint>,
    #[serde(default)]
    pub generation_settings: Vec<GenerationSetting>,
}

/// Convert a save payload into a stored blueprint, minting an id if needed.
pub fn format_from_in(body: FormatIn) -> FormatBlueprint {
    FormatBlueprint {
        id: body.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: body.name,
        description: body.description,
        saved_at: "Just now".to_string(),
        status: body.status,
        layout: body.layout,
        sections: body.sections,
        generation_settings: body.generation_settings,
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteFormatIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
}

#[derive(Serialize)]
pub struct DeleteFormatOut {
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct PromptIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct LockIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
}

/// Shared body for lineup-wide operations (shuffle, reset, save).
#[derive(Debug, Deserialize)]
pub struct LineupIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionLabelIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "optionIndex")]
    pub option_index: usize,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct CorrectOptionIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "optionIndex")]
    pub option_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct KeywordEditIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "keywordIndex")]
    pub keyword_index: usize,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordAddIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordRemoveIn {
    #[serde(rename = "formatId")]
    pub format_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "keywordIndex")]
    pub keyword_index: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
