//! Application state: in-memory format library, per-format workspaces, and review tuning.
//!
//! This module owns:
//!   - the format store (by id), seeded from config and built-in seeds
//!   - question presets (by format id) used to open workspaces
//!   - live workspaces (lineup + saved baseline) per format
//!   - the review tuning applied on every diagnostics pass
//!
//! Everything is mock state behind RwLocks; there is no persistence. A
//! workspace is created lazily from the format's preset on first access and
//! keeps its lineup (orders, locks, edits) until the format is deleted.

use std::{collections::HashMap, sync::Arc};

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::load_workbench_config_from_env;
use crate::domain::{FormatBlueprint, Question};
use crate::error::{AppError, AppResult};
use crate::review::ReviewConfig;
use crate::seeds::{seed_formats, seed_question_presets};

/// Live lineup state for one format's generation workspace.
#[derive(Clone, Debug)]
pub struct Workspace {
    pub questions: Vec<Question>,
    pub baseline: Vec<Question>,
}

impl Workspace {
    fn from_preset(preset: Vec<Question>) -> Self {
        let mut questions = preset;
        for (idx, q) in questions.iter_mut().enumerate() {
            q.order = idx;
        }
        Self { baseline: questions.clone(), questions }
    }

    pub fn renumber(&mut self) {
        for (idx, q) in self.questions.iter_mut().enumerate() {
            q.order = idx;
        }
    }

    pub fn question_mut(&mut self, question_id: &str) -> AppResult<&mut Question> {
        self.questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| AppError::UnknownQuestion(question_id.to_string()))
    }

    /// Shuffle the unlocked questions among the unlocked slots; locked
    /// questions keep their exact positions.
    pub fn shuffle_unlocked(&mut self) {
        let mut rng = rand::thread_rng();
        let mut pool: Vec<Question> =
            self.questions.iter().filter(|q| !q.locked).cloned().collect();
        pool.shuffle(&mut rng);
        let mut pool = pool.into_iter();
        self.questions = self
            .questions
            .iter()
            .map(|slot| {
                if slot.locked {
                    slot.clone()
                } else {
                    pool.next().unwrap_or_else(|| slot.clone())
                }
            })
            .collect();
        self.renumber();
    }

    /// Restore the saved baseline lineup. Locks are cleared, matching the
    /// baseline's meaning as "the lineup before any manual adjustment".
    pub fn reset_order(&mut self) {
        self.questions = self.baseline.clone();
        for q in self.questions.iter_mut() {
            q.locked = false;
        }
        self.renumber();
    }

    /// Save the current lineup as the new baseline for future resets.
    pub fn save_lineup(&mut self) {
        self.renumber();
        self.baseline = self.questions.clone();
    }
}

#[derive(Clone)]
pub struct AppState {
    pub formats: Arc<RwLock<HashMap<String, FormatBlueprint>>>,
    pub presets: Arc<RwLock<HashMap<String, Vec<Question>>>>,
    pub workspaces: Arc<RwLock<HashMap<String, Workspace>>>,
    pub review: ReviewConfig,
}

impl AppState {
    /// Build state from env: load config, seed the format library, build
    /// question presets, resolve review tuning.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_workbench_config_from_env().unwrap_or_default();

        let mut formats = HashMap::<String, FormatBlueprint>::new();
        let mut presets = seed_question_presets();

        // Insert config-based formats (if any) first so they win over seeds
        // with the same id.
        for entry in &cfg.formats {
            if entry.name.trim().is_empty() {
                error!(target: "format", "Skipping config format: missing name.");
                continue;
            }
            let id = entry.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
            let format = FormatBlueprint {
                id: id.clone(),
                name: entry.name.clone(),
                description: entry.description.clone(),
                saved_at: "Loaded from config".to_string(),
                status: entry.status.clone(),
                layout: entry.layout.clone(),
                sections: entry.sections.clone(),
                generation_settings: entry.generation_settings.clone(),
            };
            if !entry.questions.is_empty() {
                presets.insert(id.clone(), entry.questions.clone());
            }
            formats.insert(id, format);
        }

        // Always insert built-in seeds, but don't overwrite existing ids.
        for format in seed_formats() {
            formats.entry(format.id.clone()).or_insert(format);
        }

        // Inventory summary by status.
        let mut count_by_status: HashMap<&'static str, usize> = HashMap::new();
        for format in formats.values() {
            *count_by_status.entry(format.status.label()).or_insert(0) += 1;
        }
        for (status, count) in count_by_status {
            info!(target: "format", %status, count, "Startup format inventory");
        }

        let review = ReviewConfig {
            similarity_threshold: cfg.review.similarity_threshold,
            min_prompt_tokens: cfg.review.min_prompt_tokens,
        };
        info!(
            target: "examforge_backend",
            similarity_threshold = review.similarity_threshold,
            min_prompt_tokens = review.min_prompt_tokens,
            "Review tuning active"
        );

        Self {
            formats: Arc::new(RwLock::new(formats)),
            presets: Arc::new(RwLock::new(presets)),
            workspaces: Arc::new(RwLock::new(HashMap::new())),
            review,
        }
    }

    /// All saved formats, sorted by name for stable listings.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_formats(&self) -> Vec<FormatBlueprint> {
        let formats = self.formats.read().await;
        let mut out: Vec<FormatBlueprint> = formats.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Read-only access to a format by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_format(&self, id: &str) -> Option<FormatBlueprint> {
        let formats = self.formats.read().await;
        formats.get(id).cloned()
    }

    /// Insert or replace a format. Live workspace state attached to the id is
    /// left untouched.
    #[instrument(level = "info", skip(self, format), fields(id = %format.id, name = %format.name))]
    pub async fn save_format(&self, format: FormatBlueprint) -> FormatBlueprint {
        let mut formats = self.formats.write().await;
        let replaced = formats.insert(format.id.clone(), format.clone()).is_some();
        info!(target: "format", id = %format.id, replaced, "Format saved");
        format
    }

    /// Remove a format together with its preset and any open workspace.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn delete_format(&self, id: &str) -> bool {
        let removed = self.formats.write().await.remove(id).is_some();
        if removed {
            self.presets.write().await.remove(id);
            self.workspaces.write().await.remove(id);
            info!(target: "format", %id, "Format deleted");
        }
        removed
    }

    /// Current lineup of the format's workspace, creating it from the preset
    /// on first access.
    #[instrument(level = "debug", skip(self), fields(%format_id))]
    pub async fn open_workspace(&self, format_id: &str) -> AppResult<Vec<Question>> {
        self.ensure_workspace(format_id).await?;
        let workspaces = self.workspaces.read().await;
        Ok(workspaces.get(format_id).map(|w| w.questions.clone()).unwrap_or_default())
    }

    /// Apply a mutation to the format's workspace and return the refreshed
    /// lineup. Orders are renumbered after every mutation.
    pub async fn update_workspace<F>(&self, format_id: &str, mutate: F) -> AppResult<Vec<Question>>
    where
        F: FnOnce(&mut Workspace) -> AppResult<()>,
    {
        self.ensure_workspace(format_id).await?;
        let mut workspaces = self.workspaces.write().await;
        let workspace = workspaces
            .get_mut(format_id)
            .ok_or_else(|| AppError::UnknownFormat(format_id.to_string()))?;
        mutate(workspace)?;
        workspace.renumber();
        Ok(workspace.questions.clone())
    }

    async fn ensure_workspace(&self, format_id: &str) -> AppResult<()> {
        let exists = { self.workspaces.read().await.contains_key(format_id) };
        if exists {
            return Ok(());
        }
        if !self.formats.read().await.contains_key(format_id) {
            return Err(AppError::UnknownFormat(format_id.to_string()));
        }
        let preset = {
            self.presets.read().await.get(format_id).cloned().unwrap_or_default()
        };
        let workspace = Workspace::from_preset(preset);
        info!(
            target: "workspace",
            %format_id,
            questions = workspace.questions.len(),
            "Workspace opened from preset"
        );
        self.workspaces.write().await.insert(format_id.to_string(), workspace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, prompt: &str) -> Question {
        Question {
            id: id.to_string(),
            section: "Section A".to_string(),
            prompt: prompt.to_string(),
            question_type: "Short Answer".to_string(),
            difficulty: "Core".to_string(),
            locked: false,
            order: 0,
            options: None,
            answer: None,
            keywords: None,
        }
    }

    fn workspace() -> Workspace {
        Workspace::from_preset(vec![
            sample("a", "First prompt."),
            sample("b", "Second prompt."),
            sample("c", "Third prompt."),
            sample("d", "Fourth prompt."),
        ])
    }

    #[test]
    fn from_preset_assigns_orders_and_baseline() {
        let ws = workspace();
        let orders: Vec<usize> = ws.questions.iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(ws.baseline.len(), 4);
    }

    #[test]
    fn shuffle_keeps_locked_questions_in_place() {
        for _ in 0..20 {
            let mut ws = workspace();
            ws.questions[1].locked = true;
            ws.shuffle_unlocked();

            assert_eq!(ws.questions[1].id, "b");
            assert!(ws.questions[1].locked);

            let mut ids: Vec<&str> = ws.questions.iter().map(|q| q.id.as_str()).collect();
            ids.sort();
            assert_eq!(ids, vec!["a", "b", "c", "d"]);

            let orders: Vec<usize> = ws.questions.iter().map(|q| q.order).collect();
            assert_eq!(orders, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn reset_restores_baseline_and_clears_locks() {
        let mut ws = workspace();
        ws.questions[0].locked = true;
        ws.questions.swap(0, 3);
        ws.renumber();
        ws.reset_order();

        let ids: Vec<&str> = ws.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert!(ws.questions.iter().all(|q| !q.locked));
        let orders: Vec<usize> = ws.questions.iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn save_lineup_becomes_the_new_baseline() {
        let mut ws = workspace();
        ws.questions.swap(0, 2);
        ws.save_lineup();
        ws.reset_order();

        let ids: Vec<&str> = ws.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn question_mut_reports_unknown_ids() {
        let mut ws = workspace();
        assert!(ws.question_mut("a").is_ok());
        assert!(matches!(ws.question_mut("zz"), Err(AppError::UnknownQuestion(_))));
    }
}
