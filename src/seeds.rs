//! Seed data: built-in format blueprints and their question presets.
//!
//! These keep the app useful without external config: three formats (an
//! active genetics template, a draft econometrics final, and a blank starter)
//! plus a per-format question preset for the generation workspace. The
//! genetics preset carries unpolished prompts and overlapping crossing-over
//! questions, so the lineup review has something to flag out of the box.

use std::collections::HashMap;

use crate::domain::{
  CoverSheet, Emphasis, FormatBlueprint, FormatStatus, GenerationSetting, InstructionItem,
  MetadataRow, Question, QuestionOption, SectionBlueprint,
};

fn row(label: &str, value: &str) -> MetadataRow {
  MetadataRow { label: label.into(), value: value.into() }
}

fn instruction(text: &str, emphasis: Emphasis) -> InstructionItem {
  InstructionItem { text: text.into(), emphasis }
}

fn section(
  name: &str,
  question_type: &str,
  questions: u32,
  difficulty: &str,
  category: &str,
) -> SectionBlueprint {
  SectionBlueprint {
    name: name.into(),
    question_type: question_type.into(),
    questions,
    difficulty: difficulty.into(),
    category: category.into(),
  }
}

fn setting(label: &str, value: &str) -> GenerationSetting {
  GenerationSetting { label: label.into(), value: value.into() }
}

fn choice(label: &str, correct: bool) -> QuestionOption {
  QuestionOption { label: label.into(), correct }
}

fn question(id: &str, section: &str, prompt: &str, question_type: &str, difficulty: &str) -> Question {
  Question {
    id: id.into(),
    section: section.into(),
    prompt: prompt.into(),
    question_type: question_type.into(),
    difficulty: difficulty.into(),
    locked: false,
    order: 0,
    options: None,
    answer: None,
    keywords: None,
  }
}

fn with_options(mut q: Question, options: Vec<QuestionOption>) -> Question {
  q.answer = options.iter().find(|o| o.correct).map(|o| o.label.clone());
  q.options = Some(options);
  q
}

fn with_keywords(mut q: Question, keywords: &[&str]) -> Question {
  q.keywords = Some(keywords.iter().map(|s| (*s).to_string()).collect());
  q
}

/// Built-in format library served before any config or user-saved formats.
pub fn seed_formats() -> Vec<FormatBlueprint> {
  vec![
    FormatBlueprint {
      id: "format-prototype".into(),
      name: "Genetics Midterm Template".into(),
      description: "Full cover sheet with structured sections ready for automated generation.".into(),
      saved_at: "2 days ago".into(),
      status: FormatStatus::Active,
      layout: CoverSheet {
        header_lines: vec![
          "XYZ University".into(),
          "School of Magic".into(),
          "Department of Magical Food".into(),
          "Final Written Examination (1/2025)".into(),
          "Undergraduate Program".into(),
        ],
        metadata: vec![
          row("Course title", "ABC1234"),
          row("Lecturer", "Harry Potter"),
          row("Date", "10 June 2025"),
          row("Time", "09:00 AM - 12:00 PM"),
        ],
        instruction_intro: "This 6-page examination paper (including this page) consists of 2 parts:".into(),
        instructions: vec![
          instruction(
            "Answer the questions in the computerized answer sheet using '2B' pencil only.",
            Emphasis::Normal,
          ),
          instruction(
            "Write your ID, name, and section number on the computerized answer sheet.",
            Emphasis::Underline,
          ),
          instruction(
            "Do not forget to blacken your ID, subject code, and your section number on the answer sheet.",
            Emphasis::Bold,
          ),
          instruction(
            "Avoid academic cheating by not taking any part of the exam paper out of the examination room.",
            Emphasis::Normal,
          ),
        ],
        candidate_fields: vec![
          "Name: _________________________________".into(),
          "ID: _____________________".into(),
          "Section: ______________".into(),
        ],
        footer_notes: vec!["Total 18 marks equivalent to 100%".into()],
      },
      sections: vec![
        section("Section A: Multiple Choice", "Multiple Choice", 30, "Foundational", "Foundations"),
        section("Section B: Short Answers", "Short Answer", 15, "Core", "Processes"),
        section("Section C: Essay", "Long Form", 3, "Applied", "Synthesis"),
      ],
      generation_settings: vec![
        setting("Questions to generate", "15"),
        setting("Difficulty mix", "40% Easy · 40% Medium · 20% Hard"),
        setting("Bloom levels", "Remember · Apply · Analyze"),
        setting("Language", "English (US)"),
      ],
    },
    FormatBlueprint {
      id: "format-drafting".into(),
      name: "Econometrics Final v1".into(),
      description: "Draft pulled from last semester. Needs instruction rewrite before export.".into(),
      saved_at: "5 days ago".into(),
      status: FormatStatus::Draft,
      layout: CoverSheet {
        header_lines: vec![
          "Evergreen University".into(),
          "Faculty of Economics".into(),
          "Econometrics Final Examination".into(),
          "Semester 1 / 2025".into(),
          "Undergraduate Program".into(),
        ],
        metadata: vec![
          row("Course title", "ECON3421"),
          row("Lecturer", "Prof. Linh Tran"),
          row("Date", "24 May 2025"),
          row("Location", "Hall B"),
        ],
        instruction_intro: "This assessment includes both structured response and analytical essays:".into(),
        instructions: vec![
          instruction("Show full working for each quantitative answer.", Emphasis::Bold),
          instruction(
            "Round numerical responses to two decimal places unless specified.",
            Emphasis::Normal,
          ),
          instruction(
            "Submit all rough work with your script before leaving the room.",
            Emphasis::Underline,
          ),
        ],
        candidate_fields: vec![
          "Candidate name: _________________________________".into(),
          "Student ID: _____________________".into(),
          "Program: ______________".into(),
        ],
        footer_notes: vec!["Calculator policy: Non-programmable only.".into()],
      },
      sections: vec![
        section("Part I: Multiple Choice", "Multiple Choice", 25, "Core", "Micro foundations"),
        section("Part II: Short Problems", "Short Answer", 10, "Core", "Regression diagnostics"),
        section("Part III: Essays", "Long Form", 2, "Applied", "Policy analysis"),
        section("Appendix: Data Interpretation", "Short Answer", 5, "Foundational", "Descriptive statistics"),
      ],
      generation_settings: vec![
        setting("Questions to generate", "18"),
        setting("Difficulty mix", "30% Easy · 50% Medium · 20% Hard"),
        setting("Focus topics", "Instrumental variables · Time series"),
        setting("Language", "English (UK)"),
      ],
    },
    FormatBlueprint {
      id: "format-template".into(),
      name: "Blank University Cover Sheet".into(),
      description: "Starter format with placeholder headings and empty sections.".into(),
      saved_at: "1 week ago".into(),
      status: FormatStatus::Template,
      layout: CoverSheet {
        header_lines: vec![
          "[Institution Name]".into(),
          "[Faculty or Department]".into(),
          "[Assessment Title]".into(),
          "[Term / Academic Year]".into(),
        ],
        metadata: vec![
          row("Course title", "[Course code]"),
          row("Lecturer", "[Instructor name]"),
          row("Date", "[DD Month YYYY]"),
          row("Duration", "[Exam duration]"),
        ],
        instruction_intro: "Use this template to define your institution-specific instructions:".into(),
        instructions: vec![
          instruction(
            "Replace placeholder text with institution-approved instructions.",
            Emphasis::Normal,
          ),
          instruction(
            "List the materials candidates may bring into the exam room.",
            Emphasis::Normal,
          ),
        ],
        candidate_fields: vec![
          "Name: _________________________________".into(),
          "ID: _____________________".into(),
        ],
        footer_notes: vec![],
      },
      sections: vec![
        section("Section placeholder", "Multiple Choice", 10, "Foundational", "[Topic]"),
        section("Section placeholder", "Short Answer", 5, "Core", "[Topic]"),
      ],
      generation_settings: vec![
        setting("Questions to generate", "Custom"),
        setting("Difficulty mix", "Define per section"),
        setting("Bloom levels", "Define per section"),
        setting("Language", "Configure in builder"),
      ],
    },
  ]
}

/// Question presets keyed by format id. Orders are assigned by the workspace
/// on first open, so seeds only need list position.
pub fn seed_question_presets() -> HashMap<String, Vec<Question>> {
  let mut presets = HashMap::new();

  presets.insert(
    "format-prototype".to_string(),
    vec![
      with_options(
        question(
          "q-proto-1",
          "Section A: Multiple Choice",
          "Which process best explains independent assortment during meiosis?",
          "Multiple Choice",
          "Foundational",
        ),
        vec![
          choice("Crossing over between non-sister chromatids in prophase I", false),
          choice("Random alignment of homologous chromosome pairs in metaphase I", true),
          choice("Separation of sister chromatids in anaphase II", false),
          choice("Cytokinesis at the end of meiosis II", false),
        ],
      ),
      with_options(
        question(
          "q-proto-2",
          "Section A: Multiple Choice",
          "Identify the stage where homologous chromosomes separate.",
          "Multiple Choice",
          "Core",
        ),
        vec![
          choice("Prophase I", false),
          choice("Metaphase I", false),
          choice("Anaphase I", true),
          choice("Anaphase II", false),
        ],
      ),
      with_keywords(
        question(
          "q-proto-3",
          "Section B: Short Answers",
          "Explain how crossing over increases genetic variation.",
          "Short Answer",
          "Core",
        ),
        &["Exchange of chromatid segments", "New allele combinations", "Prophase I"],
      ),
      with_keywords(
        question(
          "q-proto-4",
          "Section B: Short Answers",
          "Describe one consequence of nondisjunction.",
          "Short Answer",
          "Applied",
        ),
        &["Aneuploidy", "Trisomy or monosomy", "Improper chromosome separation"],
      ),
      with_keywords(
        question(
          "q-proto-5",
          "Section C: Essay",
          "Compare and contrast meiosis I and meiosis II in terms of chromosome behavior.",
          "Long Form",
          "Applied",
        ),
        &[
          "Homologous vs sister chromatids",
          "Reductional vs equational division",
          "Genetic variation mechanisms",
        ],
      ),
      // Unpolished on purpose: lowercase start, doubled space, no ending
      // punctuation.
      with_options(
        question(
          "q-proto-6",
          "Section A: Multiple Choice",
          "identify one benefit of genetic recombination  during meiosis",
          "Multiple Choice",
          "Foundational",
        ),
        vec![
          choice("It reduces the chromosome number to haploid", false),
          choice("It produces identical daughter cells", false),
          choice("It increases allele variety among gametes", true),
          choice("It prevents all mutations", false),
        ],
      ),
      with_keywords(
        question(
          "q-proto-7",
          "Section B: Short Answers",
          "Explain how crossing-over increases genetic variation in gametes.",
          "Short Answer",
          "Core",
        ),
        &["Exchange of chromatid segments", "New allele combinations", "Prophase I"],
      ),
      with_keywords(
        question(
          "q-proto-8",
          "Section B: Short Answers",
          "Explain how crossing over increases genetic variation",
          "Short Answer",
          "Core",
        ),
        &["Exchange of chromatid segments", "New allele combinations", "Prophase I"],
      ),
    ],
  );

  presets.insert(
    "format-drafting".to_string(),
    vec![
      question(
        "q-draft-1",
        "Part I: Multiple Choice",
        "Which estimator is unbiased for the population mean given iid samples?",
        "Multiple Choice",
        "Foundational",
      ),
      question(
        "q-draft-2",
        "Part II: Short Problems",
        "Compute the R-squared value for the provided regression output.",
        "Short Answer",
        "Core",
      ),
      question(
        "q-draft-3",
        "Part III: Essays",
        "Evaluate the policy implications of simultaneous equations bias.",
        "Long Form",
        "Applied",
      ),
      question(
        "q-draft-4",
        "Appendix: Data Interpretation",
        "Given the dataset, identify evidence of heteroskedasticity.",
        "Short Answer",
        "Core",
      ),
    ],
  );

  presets.insert(
    "format-template".to_string(),
    vec![
      question(
        "q-template-1",
        "Section placeholder",
        "Replace this placeholder with a question from your bank.",
        "Multiple Choice",
        "Foundational",
      ),
      question(
        "q-template-2",
        "Section placeholder",
        "Add another placeholder question here.",
        "Short Answer",
        "Core",
      ),
    ],
  );

  presets
}
