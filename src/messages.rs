//! Shared user-facing strings.
//!
//! Keep them in one place so wording stays consistent between the CLI
//! and the library's warning states.

pub const EMPTY_SKELETON: &str =
    "Draft skipped: no keyword selected and no core idea given. Select at least one keyword or pass a core idea.";

pub const NO_SCOPE_HINT: &str =
    "No keyword scope locked; sampling from the full warehouse.";

pub const SCOPE_LOCKED: &str = "Keyword scope locked.";

pub const QUEUE_EMPTY: &str = "The task queue is empty.";

pub const AI_OFFLINE_HINT: &str =
    "No DEEPSEEK_API_KEY configured; drafts keep their raw skeletons with an offline marker.";

pub const KEYWORD_ADDED: &str = "Keyword added.";
pub const KEYWORD_EXISTS: &str = "Keyword already present; nothing to do.";
pub const KEYWORD_REMOVED: &str = "Keyword removed.";
pub const KEYWORD_MISSING: &str = "Keyword not found; nothing removed.";

pub const REMOTE_SYNC_SKIPPED: &str =
    "Remote sync skipped: GITHUB_TOKEN / GITHUB_REPO not configured. The list was saved locally.";

pub const WORD_BANK_EMPTY: &str =
    "The word bank is empty and no custom text was given.";

pub const NOTHING_INGESTED: &str = "No usable keywords found in the text.";

pub fn empty_categories_notice(categories: &[&str]) -> String {
    format!(
        "Scope locked. These categories have nothing selected and will be skipped: {}.",
        categories.join(", ")
    )
}

pub fn remote_sync_warning(detail: &str) -> String {
    format!("Warning: {detail}. The list was saved locally and stays authoritative.")
}
