//! Lineup review: grammar hints, near-duplicate detection, and grouping of
//! mutually similar questions.
//!
//! Flow:
//! 1) Every raw prompt gets grammar hints from a small set of static checks.
//! 2) Questions whose normalized prompts are identical are verbatim duplicates.
//! 3) Remaining pairs are scored by token overlap against the smaller token
//!    set; pairs at or above the threshold are near-duplicates.
//! 4) Duplicate relations form an undirected graph over question ids.
//!    Connected components of two or more questions become numbered clusters;
//!    the member with the lowest lineup position leads each cluster.
//!
//! The whole pass is a pure function of the question list. It is rerun in
//! full after every workspace mutation and must stay deterministic: bucket
//! processing follows first-seen scan order so hash-map iteration never
//! leaks into reference ordering.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::Question;

pub const SIMILARITY_THRESHOLD: f64 = 0.8;
pub const MIN_PROMPT_TOKENS: usize = 3;

/// Tuning knobs for the near-duplicate scorer.
/// Defaults match the shipped behavior; tests override them to probe the
/// threshold boundary.
#[derive(Clone, Copy, Debug)]
pub struct ReviewConfig {
  pub similarity_threshold: f64,
  pub min_prompt_tokens: usize,
}

impl Default for ReviewConfig {
  fn default() -> Self {
    Self {
      similarity_threshold: SIMILARITY_THRESHOLD,
      min_prompt_tokens: MIN_PROMPT_TOKENS,
    }
  }
}

/// Reference to another question this one closely matches.
/// `order` is 1-based, ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateRef {
  pub order: usize,
  pub section: String,
}

/// Per-question findings. Fully recomputed on every pass, never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  pub grammar: Vec<String>,
  pub duplicates: Vec<DuplicateRef>,
  pub cluster_id: Option<String>,
}

/// A maximal group of mutually or transitively similar questions.
/// Members are sorted by lineup position; the first member is the lead.
#[derive(Clone, Debug, Serialize)]
pub struct DuplicateCluster {
  pub id: String,
  pub questions: Vec<Question>,
}

impl DuplicateCluster {
  pub fn lead(&self) -> Option<&Question> {
    self.questions.first()
  }
}

/// Everything one review pass produces, keyed by question and cluster id.
#[derive(Clone, Debug, Default)]
pub struct ReviewReport {
  pub diagnostics: HashMap<String, Diagnostic>,
  pub clusters: HashMap<String, DuplicateCluster>,
}

impl ReviewReport {
  /// Clusters in discovery order (equivalently: by their lead's position).
  pub fn clusters_in_order(&self) -> Vec<&DuplicateCluster> {
    let mut out: Vec<&DuplicateCluster> = self.clusters.values().collect();
    out.sort_by_key(|c| c.lead().map_or(usize::MAX, |q| q.order));
    out
  }
}

/// Canonical form used for verbatim-duplicate bucketing: trimmed, lowercased,
/// inner whitespace runs collapsed to a single space.
pub fn normalize(text: &str) -> String {
  text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word tokens for overlap scoring. Anything that is not an ASCII letter or
/// digit acts as a separator, so "crossing-over" and "crossing over" tokenize
/// identically.
pub fn tokenize(text: &str) -> Vec<String> {
  text
    .to_lowercase()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
    .collect::<String>()
    .split_whitespace()
    .map(str::to_string)
    .collect()
}

/// Static grammar hints for one raw prompt. Checks run in a fixed order and
/// apply independently, except that an empty prompt short-circuits the rest.
pub fn lint_prompt(prompt: &str) -> Vec<String> {
  let trimmed = prompt.trim();
  if trimmed.is_empty() {
    return vec!["Prompt is empty.".to_string()];
  }

  let mut issues = Vec::new();
  if !trimmed.ends_with(['.', '!', '?']) {
    issues.push("Add ending punctuation.".to_string());
  }
  // Repeated spaces are checked on the raw text: trimming would hide
  // offending runs at the edges.
  if prompt.contains("  ") {
    issues.push("Contains repeated spaces.".to_string());
  }
  if trimmed.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
    issues.push("Start with a capital letter.".to_string());
  }
  issues
}

/// Run the full review pass over the current lineup with default tuning.
///
/// Callers must have assigned `order` values consistent with list position
/// (`0..n`, no gaps) before calling.
pub fn compute_diagnostics(questions: &[Question]) -> ReviewReport {
  compute_diagnostics_with(questions, &ReviewConfig::default())
}

pub fn compute_diagnostics_with(questions: &[Question], cfg: &ReviewConfig) -> ReviewReport {
  let mut diagnostics: HashMap<String, Diagnostic> = HashMap::new();
  let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
  let mut bucket_order: Vec<String> = Vec::new();
  let mut adjacency: HashMap<String, HashSet<String>> = HashMap::new();

  let normalized: Vec<String> = questions.iter().map(|q| normalize(&q.prompt)).collect();
  let tokens: Vec<Vec<String>> = questions.iter().map(|q| tokenize(&q.prompt)).collect();

  for (idx, question) in questions.iter().enumerate() {
    diagnostics.insert(
      question.id.clone(),
      Diagnostic {
        grammar: lint_prompt(&question.prompt),
        duplicates: Vec::new(),
        cluster_id: None,
      },
    );
    let bucket = buckets.entry(normalized[idx].clone()).or_default();
    if bucket.is_empty() {
      bucket_order.push(normalized[idx].clone());
    }
    bucket.push(idx);
  }

  // Verbatim duplicates: every member of a shared bucket references every
  // other member and is connected to it in the graph.
  for key in &bucket_order {
    let members = &buckets[key];
    if members.len() <= 1 {
      continue;
    }
    for &a in members {
      for &b in members {
        if a == b {
          continue;
        }
        add_duplicate_ref(&mut diagnostics, &questions[a], &questions[b]);
        add_edge(&mut adjacency, &questions[a].id, &questions[b].id);
      }
    }
  }

  // Near duplicates: overlap of the two token sets against the smaller set.
  // The min denominator is a containment measure, not true Jaccard; the
  // threshold is calibrated to it. Verbatim-identical pairs were already
  // handled above and are skipped here.
  let token_sets: Vec<HashSet<&str>> = tokens
    .iter()
    .map(|t| t.iter().map(String::as_str).collect())
    .collect();
  for i in 0..questions.len() {
    if tokens[i].len() < cfg.min_prompt_tokens {
      continue;
    }
    for j in (i + 1)..questions.len() {
      if tokens[j].len() < cfg.min_prompt_tokens {
        continue;
      }
      if normalized[i] == normalized[j] {
        continue;
      }
      let denom = token_sets[i].len().min(token_sets[j].len());
      if denom == 0 {
        continue;
      }
      let overlap = token_sets[i].intersection(&token_sets[j]).count();
      let similarity = overlap as f64 / denom as f64;
      if similarity >= cfg.similarity_threshold {
        add_duplicate_ref(&mut diagnostics, &questions[i], &questions[j]);
        add_duplicate_ref(&mut diagnostics, &questions[j], &questions[i]);
        add_edge(&mut adjacency, &questions[i].id, &questions[j].id);
      }
    }
  }

  // Cluster extraction: scan in list order, flood each unvisited question
  // with neighbors, number components as they are discovered. Scan order
  // guarantees cluster-1 is led by the earliest duplicate in the lineup.
  let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();
  let mut clusters: HashMap<String, DuplicateCluster> = HashMap::new();
  let mut visited: HashSet<String> = HashSet::new();
  let mut cluster_index = 1usize;

  for question in questions {
    if visited.contains(&question.id) {
      continue;
    }
    if adjacency.get(&question.id).map_or(true, |n| n.is_empty()) {
      visited.insert(question.id.clone());
      continue;
    }
    let members = collect_component(&adjacency, &mut visited, &question.id);
    if members.len() <= 1 {
      continue;
    }
    let cluster_id = format!("cluster-{cluster_index}");
    cluster_index += 1;
    let mut member_questions: Vec<Question> = members
      .iter()
      .filter_map(|id| by_id.get(id.as_str()).map(|q| (*q).clone()))
      .collect();
    member_questions.sort_by_key(|q| q.order);
    for member in &member_questions {
      if let Some(entry) = diagnostics.get_mut(&member.id) {
        entry.cluster_id = Some(cluster_id.clone());
      }
    }
    clusters.insert(
      cluster_id.clone(),
      DuplicateCluster { id: cluster_id, questions: member_questions },
    );
  }

  ReviewReport { diagnostics, clusters }
}

fn add_duplicate_ref(
  diagnostics: &mut HashMap<String, Diagnostic>,
  from: &Question,
  to: &Question,
) {
  let Some(entry) = diagnostics.get_mut(&from.id) else { return };
  let reference = DuplicateRef { order: to.order + 1, section: to.section.clone() };
  if !entry.duplicates.contains(&reference) {
    entry.duplicates.push(reference);
  }
}

fn add_edge(adjacency: &mut HashMap<String, HashSet<String>>, a: &str, b: &str) {
  if a == b {
    return;
  }
  adjacency.entry(a.to_string()).or_default().insert(b.to_string());
  adjacency.entry(b.to_string()).or_default().insert(a.to_string());
}

fn collect_component(
  adjacency: &HashMap<String, HashSet<String>>,
  visited: &mut HashSet<String>,
  start: &str,
) -> Vec<String> {
  let mut stack = vec![start.to_string()];
  let mut members = Vec::new();
  while let Some(current) = stack.pop() {
    if !visited.insert(current.clone()) {
      continue;
    }
    if let Some(neighbors) = adjacency.get(&current) {
      for neighbor in neighbors {
        if !visited.contains(neighbor) {
          stack.push(neighbor.clone());
        }
      }
    }
    members.push(current);
  }
  members
}

#[cfg(test)]
mod tests {
  use super::*;

  fn question(id: &str, order: usize, section: &str, prompt: &str) -> Question {
    Question {
      id: id.to_string(),
      section: section.to_string(),
      prompt: prompt.to_string(),
      question_type: "Short Answer".to_string(),
      difficulty: "Core".to_string(),
      locked: false,
      order,
      options: None,
      answer: None,
      keywords: None,
    }
  }

  #[test]
  fn tokenize_strips_punctuation_and_case() {
    assert_eq!(
      tokenize("Explain crossing-over, NOW!"),
      vec!["explain", "crossing", "over", "now"]
    );
    assert!(tokenize("").is_empty());
    assert!(tokenize("—…—").is_empty());
  }

  #[test]
  fn normalize_collapses_whitespace() {
    assert_eq!(normalize("  The   Cell\tDivides "), "the cell divides");
    assert_eq!(normalize("   "), "");
  }

  #[test]
  fn grammar_issue_order_for_lowercase_unpunctuated_prompt() {
    assert_eq!(
      lint_prompt("the cell divides"),
      vec!["Add ending punctuation.", "Start with a capital letter."]
    );
  }

  #[test]
  fn empty_prompt_short_circuits_other_checks() {
    assert_eq!(lint_prompt(""), vec!["Prompt is empty."]);
    assert_eq!(lint_prompt("   "), vec!["Prompt is empty."]);
  }

  #[test]
  fn repeated_spaces_flagged_on_raw_text() {
    assert_eq!(
      lint_prompt("Compare  meiosis and mitosis."),
      vec!["Contains repeated spaces."]
    );
    // Runs outside the trimmed span still count.
    assert_eq!(lint_prompt("Compare meiosis.  "), vec!["Contains repeated spaces."]);
  }

  #[test]
  fn empty_list_yields_empty_report() {
    let report = compute_diagnostics(&[]);
    assert!(report.diagnostics.is_empty());
    assert!(report.clusters.is_empty());
  }

  #[test]
  fn crossing_over_scenario_clusters_the_near_duplicates() {
    let questions = vec![
      question("q1", 0, "Section B", "Explain how crossing over increases genetic variation."),
      question("q2", 1, "Section B", "Explain how crossing-over increases genetic variation in gametes."),
      question("q3", 2, "Section A", "What is the capital of France?"),
    ];
    let report = compute_diagnostics(&questions);

    assert_eq!(report.clusters.len(), 1);
    let cluster = &report.clusters["cluster-1"];
    let member_ids: Vec<&str> = cluster.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(member_ids, vec!["q1", "q2"]);
    assert_eq!(cluster.lead().map(|q| q.id.as_str()), Some("q1"));

    assert_eq!(report.diagnostics["q1"].cluster_id.as_deref(), Some("cluster-1"));
    assert_eq!(report.diagnostics["q2"].cluster_id.as_deref(), Some("cluster-1"));
    assert_eq!(report.diagnostics["q3"].cluster_id, None);
    assert!(report.diagnostics["q3"].duplicates.is_empty());

    assert_eq!(
      report.diagnostics["q1"].duplicates,
      vec![DuplicateRef { order: 2, section: "Section B".to_string() }]
    );
    assert_eq!(
      report.diagnostics["q2"].duplicates,
      vec![DuplicateRef { order: 1, section: "Section B".to_string() }]
    );
  }

  #[test]
  fn exact_match_groups_even_short_prompts() {
    // Both prompts tokenize to a single word, below the similarity minimum,
    // but identical normalized text still makes them a verbatim pair.
    let questions = vec![
      question("a", 0, "Section A", "Paris?"),
      question("b", 1, "Section B", "  paris? "),
    ];
    let report = compute_diagnostics(&questions);
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.diagnostics["a"].cluster_id.as_deref(), Some("cluster-1"));
    assert_eq!(report.diagnostics["b"].cluster_id.as_deref(), Some("cluster-1"));
  }

  #[test]
  fn empty_prompts_bucket_together() {
    let questions = vec![
      question("a", 0, "Section A", ""),
      question("b", 1, "Section A", "   "),
      question("c", 2, "Section A", "Define osmosis."),
    ];
    let report = compute_diagnostics(&questions);
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.diagnostics["a"].cluster_id.as_deref(), Some("cluster-1"));
    assert_eq!(report.diagnostics["b"].cluster_id.as_deref(), Some("cluster-1"));
    assert_eq!(report.diagnostics["c"].cluster_id, None);
  }

  #[test]
  fn short_prompts_are_exempt_from_similarity_scoring() {
    // Two tokens each, near-identical, but under the three-token minimum
    // and not verbatim-identical.
    let questions = vec![
      question("a", 0, "Section A", "Red fox."),
      question("b", 1, "Section A", "Red fox"),
    ];
    let report = compute_diagnostics(&questions);
    assert!(report.clusters.is_empty());
    assert!(report.diagnostics["a"].duplicates.is_empty());
    assert!(report.diagnostics["b"].duplicates.is_empty());
  }

  #[test]
  fn pair_at_threshold_is_clustered() {
    // 8 shared tokens, both sets of size 10: 8/10 = 0.80 exactly.
    let questions = vec![
      question("a", 0, "S", "alpha beta gamma delta epsilon zeta eta theta iota kappa"),
      question("b", 1, "S", "alpha beta gamma delta epsilon zeta eta theta north south"),
    ];
    let report = compute_diagnostics(&questions);
    assert_eq!(report.clusters.len(), 1);
  }

  #[test]
  fn pair_below_threshold_is_not_clustered() {
    // 11 shared tokens, both sets of size 14: ~0.786, just under 0.80.
    let questions = vec![
      question(
        "a", 0, "S",
        "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi",
      ),
      question(
        "b", 1, "S",
        "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda omicron pi rho",
      ),
    ];
    let report = compute_diagnostics(&questions);
    assert!(report.clusters.is_empty());
    assert!(report.diagnostics["a"].duplicates.is_empty());
  }

  #[test]
  fn tuning_overrides_apply() {
    let questions = vec![
      question("a", 0, "S", "alpha beta gamma delta epsilon zeta eta theta iota kappa"),
      question("b", 1, "S", "alpha beta gamma delta epsilon zeta eta east north south"),
    ];
    // 7 of 10 shared: 0.70 passes a lowered threshold but not the default.
    let relaxed = ReviewConfig { similarity_threshold: 0.5, ..ReviewConfig::default() };
    assert_eq!(compute_diagnostics_with(&questions, &relaxed).clusters.len(), 1);

    // A raised token minimum exempts pairs the default would cluster.
    let strict = ReviewConfig { min_prompt_tokens: 11, ..ReviewConfig::default() };
    let report = compute_diagnostics_with(
      &[
        questions[0].clone(),
        question("c", 1, "S", "alpha beta gamma delta epsilon zeta eta theta iota kappa mu"),
      ],
      &strict,
    );
    assert!(report.clusters.is_empty());
  }

  #[test]
  fn duplicate_references_are_symmetric() {
    let questions = vec![
      question("a", 0, "S1", "Explain the role of mitochondria in cellular respiration."),
      question("b", 1, "S2", "Explain the role of mitochondria in cellular respiration today."),
      question("c", 2, "S1", "Name the powerhouse of the cell."),
      question("d", 3, "S2", "Name the powerhouse of the cell."),
    ];
    let report = compute_diagnostics(&questions);
    for q in &questions {
      for reference in &report.diagnostics[&q.id].duplicates {
        let other = questions.iter().find(|o| o.order + 1 == reference.order).unwrap();
        assert!(
          report.diagnostics[&other.id]
            .duplicates
            .iter()
            .any(|back| back.order == q.order + 1),
          "{} references {} but not vice versa",
          q.id,
          other.id
        );
      }
    }
  }

  #[test]
  fn cluster_membership_is_consistent() {
    let questions = vec![
      question("a", 0, "S", "Describe the process of osmosis in plant cells."),
      question("b", 1, "S", "Describe the process of osmosis in animal cells."),
      question("c", 2, "S", "What is photosynthesis?"),
      question("d", 3, "S", "What is photosynthesis?"),
      question("e", 4, "S", "Unrelated bonus question about volcanoes."),
    ];
    let report = compute_diagnostics(&questions);

    for cluster in report.clusters.values() {
      assert!(cluster.questions.len() >= 2);
      // Lead holds the minimum order and comes first.
      let min_order = cluster.questions.iter().map(|q| q.order).min().unwrap();
      assert_eq!(cluster.lead().unwrap().order, min_order);
      for member in &cluster.questions {
        assert_eq!(
          report.diagnostics[&member.id].cluster_id.as_deref(),
          Some(cluster.id.as_str())
        );
      }
      // No outsider carries this cluster id.
      let member_ids: HashSet<&str> = cluster.questions.iter().map(|q| q.id.as_str()).collect();
      for q in &questions {
        if !member_ids.contains(q.id.as_str()) {
          assert_ne!(
            report.diagnostics[&q.id].cluster_id.as_deref(),
            Some(cluster.id.as_str())
          );
        }
      }
    }
  }

  #[test]
  fn clusters_numbered_by_scan_order() {
    let questions = vec![
      question("a", 0, "S", "What is photosynthesis?"),
      question("b", 1, "S", "Describe the process of osmosis in plant cells."),
      question("c", 2, "S", "What is photosynthesis?"),
      question("d", 3, "S", "Describe the process of osmosis in animal cells."),
    ];
    let report = compute_diagnostics(&questions);
    let ordered = report.clusters_in_order();
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered[0].id, "cluster-1");
    assert_eq!(ordered[0].lead().map(|q| q.id.as_str()), Some("a"));
    assert_eq!(ordered[1].id, "cluster-2");
    assert_eq!(ordered[1].lead().map(|q| q.id.as_str()), Some("b"));
  }

  #[test]
  fn recomputation_is_deterministic() {
    let questions = vec![
      question("a", 0, "S1", "Explain how crossing over increases genetic variation."),
      question("b", 1, "S1", "Explain how crossing-over increases genetic variation in gametes."),
      question("c", 2, "S2", "What is photosynthesis?"),
      question("d", 3, "S2", "What is photosynthesis?"),
      question("e", 4, "S2", "the cell divides"),
    ];
    let first = compute_diagnostics(&questions);
    let second = compute_diagnostics(&questions);

    assert_eq!(first.diagnostics.len(), second.diagnostics.len());
    for (id, diagnostic) in &first.diagnostics {
      assert_eq!(diagnostic, &second.diagnostics[id], "diagnostic drift for {id}");
    }
    assert_eq!(first.clusters.len(), second.clusters.len());
    for (id, cluster) in &first.clusters {
      let other = &second.clusters[id];
      let ids: Vec<&str> = cluster.questions.iter().map(|q| q.id.as_str()).collect();
      let other_ids: Vec<&str> = other.questions.iter().map(|q| q.id.as_str()).collect();
      assert_eq!(ids, other_ids, "membership drift for {id}");
    }
  }

  #[test]
  fn every_question_gets_a_diagnostic() {
    let questions = vec![
      question("a", 0, "S", "Fine prompt with punctuation."),
      question("b", 1, "S", "another fine prompt"),
    ];
    let report = compute_diagnostics(&questions);
    assert_eq!(report.diagnostics.len(), questions.len());
    assert!(report.diagnostics["a"].grammar.is_empty());
    assert_eq!(
      report.diagnostics["b"].grammar,
      vec!["Add ending punctuation.", "Start with a capital letter."]
    );
  }
}
