//! Dynamic shell completions backed by the configured vault.
//!
//! Enabled with `source <(COMPLETE=bash mdexp)`; the static scripts from
//! `mdexp completions <shell>` cover flags and subcommands only.

use clap_complete::engine::CompletionCandidate;
use mdexport_core::FsVault;
use mdexport_core::config::loader::ConfigLoader;
use std::ffi::OsStr;

const MAX_CANDIDATES: usize = 100;

/// Complete note paths relative to the vault root.
pub fn complete_notes(current: &OsStr) -> Vec<CompletionCandidate> {
    let current_str = current.to_str().unwrap_or("");

    let Ok(cfg) = ConfigLoader::load(None, None) else {
        return Vec::new();
    };
    let Ok(vault) = FsVault::open(&cfg.vault_root) else {
        return Vec::new();
    };

    note_candidates(vault.documents().map(|d| d.path().to_string()), current_str)
}

fn note_candidates(
    paths: impl Iterator<Item = String>,
    prefix: &str,
) -> Vec<CompletionCandidate> {
    paths
        .filter(|p| p.ends_with(".md") && p.starts_with(prefix))
        .take(MAX_CANDIDATES)
        .map(CompletionCandidate::new)
        .collect()
}
