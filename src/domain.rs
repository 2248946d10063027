//! Domain models used by the backend: format blueprints, cover-sheet layout, and questions.

use serde::{Deserialize, Serialize};

/// Lifecycle badge of a saved format in the library.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormatStatus {
  Active,
  Draft,
  Template,
}
impl Default for FormatStatus {
  fn default() -> Self { FormatStatus::Draft }
}
impl FormatStatus {
  pub fn label(&self) -> &'static str {
    match self {
      FormatStatus::Active => "Active",
      FormatStatus::Draft => "Draft",
      FormatStatus::Template => "Template",
    }
  }
}

/// Rendering emphasis of one candidate instruction line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
  Normal,
  Bold,
  Underline,
}
impl Default for Emphasis {
  fn default() -> Self { Emphasis::Normal }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstructionItem {
  pub text: String,
  #[serde(default)] pub emphasis: Emphasis,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataRow {
  pub label: String,
  pub value: String,
}

/// Cover-sheet ("first page") layout carried by every format.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverSheet {
  #[serde(default)] pub header_lines: Vec<String>,
  #[serde(default)] pub metadata: Vec<MetadataRow>,
  #[serde(default)] pub instruction_intro: String,
  #[serde(default)] pub instructions: Vec<InstructionItem>,
  #[serde(default)] pub candidate_fields: Vec<String>,
  #[serde(default)] pub footer_notes: Vec<String>,
}

/// One section row of the blueprint. `questions` is the planned count for
/// generation, not the number currently sitting in the workspace.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBlueprint {
  pub name: String,
  pub question_type: String,
  pub questions: u32,
  pub difficulty: String,
  pub category: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationSetting {
  pub label: String,
  pub value: String,
}

/// Structural definition of an exam: cover sheet, sections, generation knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatBlueprint {
  pub id: String,
  pub name: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub saved_at: String,
  #[serde(default)] pub status: FormatStatus,
  #[serde(default)] pub layout: CoverSheet,
  #[serde(default)] pub sections: Vec<SectionBlueprint>,
  #[serde(default)] pub generation_settings: Vec<GenerationSetting>,
}

impl FormatBlueprint {
  /// Planned question total across all sections.
  pub fn expected_total(&self) -> u32 {
    self.sections.iter().map(|s| s.questions).sum()
  }
}

/// Labelled answer choice with a correctness flag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionOption {
  pub label: String,
  #[serde(default)] pub correct: bool,
}

/// Candidate exam question as it lives in the generation workspace.
///
/// `order` is the zero-based lineup position; display numbering is `order + 1`.
/// Orders are kept a permutation of `0..n` by the workspace after every
/// reordering operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: String,
  pub section: String,
  pub prompt: String,
  #[serde(rename = "type")]
  pub question_type: String,
  pub difficulty: String,
  #[serde(default)] pub locked: bool,
  #[serde(default)] pub order: usize,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<QuestionOption>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub answer: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub keywords: Option<Vec<String>>,
}
