use std::path::PathBuf;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::ai::config::AiConfig;
use crate::ai::ingest::ParsedKeyword;
use crate::ai::refine::{offline_fallback, refine};
use crate::assembler::{assemble, pick};
use crate::github::GithubSync;
use crate::queue::TaskQueue;
use crate::selection::{ActivePool, SelectionSet};
use crate::warehouse::{Warehouse, ASSEMBLY_ORDER};

/// Outcome of one draft in a generation batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    /// Nothing was picked and no core idea was given. Surfaced to the
    /// user as a distinct state; nothing is queued for it.
    Empty,
    /// A finished prompt, already appended to the task queue.
    Ready { skeleton: String, prompt: String },
}

/// All mutable state of one user session, held explicitly instead of in
/// ambient globals: the warehouse cache, the selection flags, the locked
/// scope snapshot and the task queue. Constructed at session start and
/// dropped at session end.
pub struct Session {
    pub warehouse: Warehouse,
    pub selection: SelectionSet,
    pub queue: TaskQueue,
    scope: Option<ActivePool>,
}

impl Session {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            warehouse: Warehouse::open(data_root),
            selection: SelectionSet::new(),
            queue: TaskQueue::new(),
            scope: None,
        }
    }

    /// Seed selection flags for every keyword currently in the warehouse.
    /// Safe to call again: flags already set this session are kept.
    pub fn init_selection(&mut self) -> Result<()> {
        self.selection.init(&mut self.warehouse)
    }

    /// Snapshot the current selection as the sampling scope. From here on
    /// the assembler draws only from this pool; a category the user
    /// emptied stays empty instead of falling back to the warehouse.
    pub fn lock_scope(&mut self) -> Result<()> {
        let pool = self.selection.project(&mut self.warehouse)?;
        let empty: Vec<&str> = pool
            .iter()
            .filter(|(_, words)| words.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !empty.is_empty() {
            debug!(?empty, "Scope locked with empty categories");
        }
        self.scope = Some(pool);
        info!("Keyword scope locked");
        Ok(())
    }

    /// True once the user has locked a scope this session.
    pub fn has_scope(&self) -> bool {
        self.scope.is_some()
    }

    /// Sampling source for one category: the locked scope when one
    /// exists (strict, even when empty), the full warehouse otherwise.
    pub fn pool(&mut self, category: &str) -> Result<Vec<String>> {
        if let Some(scope) = &self.scope {
            return Ok(scope.get(category).cloned().unwrap_or_default());
        }
        Ok(self.warehouse.load(category)?.to_vec())
    }

    /// Draw one keyword per category in assembly order and join the
    /// non-empty picks into a skeleton. `None` when the skeleton would
    /// have zero fragments.
    pub fn build_skeleton<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        core_idea: &str,
    ) -> Result<Option<String>> {
        let mut picks = Vec::with_capacity(ASSEMBLY_ORDER.len());
        for category in ASSEMBLY_ORDER {
            let source = self.pool(category)?;
            picks.push(pick(rng, &source, 1));
        }
        Ok(assemble(core_idea, &picks))
    }

    /// Produce `qty` drafts. Each non-empty skeleton is refined (or
    /// falls back when no AI is configured; a failed call falls back with
    /// an error marker) and the resulting prompt is queued exactly once.
    pub async fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        core_idea: &str,
        qty: usize,
        ai: Option<&AiConfig>,
    ) -> Result<Vec<Draft>> {
        let mut drafts = Vec::with_capacity(qty);
        for index in 1..=qty {
            let Some(skeleton) = self.build_skeleton(rng, core_idea)? else {
                debug!(index, "Draft skeleton is empty");
                drafts.push(Draft::Empty);
                continue;
            };
            let prompt = match ai {
                Some(config) => refine(config, index, &skeleton).await,
                None => offline_fallback(index, &skeleton),
            };
            self.queue.enqueue([prompt.clone()]);
            drafts.push(Draft::Ready { skeleton, prompt });
        }
        info!(
            qty,
            queued = drafts.iter().filter(|d| matches!(d, Draft::Ready { .. })).count(),
            "Generation batch finished"
        );
        Ok(drafts)
    }

    /// Import ingest results into the warehouse, persisting each changed
    /// category locally. Returns the categories that actually changed so
    /// the caller can sync them remotely.
    pub fn import_keywords(&mut self, parsed: &[ParsedKeyword]) -> Result<Vec<&'static str>> {
        let mut changed = Vec::new();
        for item in parsed {
            if self.warehouse.add(item.category, &item.keyword)? {
                // New keywords join the pool immediately.
                self.selection.set(item.category, &item.keyword, true);
                if !changed.contains(&item.category) {
                    changed.push(item.category);
                }
            }
        }
        Ok(changed)
    }

    /// Push one category's word list to the remote store. A failure is
    /// reported back as a warning string, never as an error: the local
    /// write already happened and stays the source of truth.
    pub async fn sync_remote(&mut self, sync: &GithubSync, category: &str) -> Option<String> {
        let words = match self.warehouse.load(category) {
            Ok(words) => words.to_vec(),
            Err(err) => return Some(format!("could not read {category} for sync: {err}")),
        };
        match sync.save_category(category, &words).await {
            Ok(path) => {
                info!(category, path = %path, "Remote sync succeeded");
                None
            }
            Err(err) => {
                warn!(category, error = %err, "Remote sync failed, local save kept");
                Some(format!("remote sync for {category} failed: {err}"))
            }
        }
    }
}
