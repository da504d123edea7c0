//! The `export` command.

use crate::ExportArgs;
use crate::cmd::output;
use mdexport_core::config::ConfigLoader;
use mdexport_core::vault::Corpus;
use mdexport_core::{CancelFlag, Document, ExportReport, Exporter, FsVault, ReadErrorPolicy};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ExportArgs) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let Some(note) = args.note.as_deref() else {
        println!("No active note to export.");
        println!("Pass a note path or link name, e.g. `mdexp export Index.md`.");
        return;
    };

    let vault = match FsVault::open(&rc.vault_root) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Failed to open vault {}: {e}", rc.vault_root.display());
            std::process::exit(1);
        }
    };

    let Some(root) = find_root(&vault, note) else {
        println!("Note '{note}' was not found in {}; nothing exported.", vault.root().display());
        return;
    };
    debug!(root = root.path(), "resolved export root");

    let mut exclusions = rc.exclusions.clone();
    exclusions.extend(args.extra_exclusions());

    let read_policy =
        if args.skip_unreadable { ReadErrorPolicy::Skip } else { rc.on_read_error };

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.cancel()) {
        warn!(error = %e, "could not install interrupt handler");
    }

    let exporter = Exporter::new(&vault, &exclusions)
        .with_read_policy(read_policy)
        .with_cancel_flag(cancel);

    if args.dry_run {
        match exporter.collect(&root) {
            Ok(collected) => {
                let report = ExportReport::from_collected(&root, &collected);
                print_report(&report, args.json, true);
            }
            Err(e) => {
                eprintln!("Export failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let dest = destination(args.output.as_deref(), rc.output_dir.as_deref(), &root);
    match exporter.export_to(&root, &dest) {
        Ok(report) => print_report(&report, args.json, false),
        Err(e) => {
            eprintln!("Export failed: {e}");
            std::process::exit(1);
        }
    }
}

fn print_report(report: &ExportReport, json: bool, detailed: bool) {
    if json {
        output::print_report_json(report);
    } else if detailed {
        output::print_report_table(report);
    } else {
        output::print_summary(report);
    }
}

/// Locate the root document for `note`.
///
/// A path to an existing file inside the vault wins; otherwise `note` is
/// tried as a vault-relative path and then as a link target.
fn find_root(vault: &FsVault, note: &str) -> Option<Document> {
    let on_disk = Path::new(note)
        .canonicalize()
        .ok()
        .and_then(|abs| abs.strip_prefix(vault.root()).ok().map(relative_key));

    on_disk
        .and_then(|rel| vault.lookup(&rel))
        .or_else(|| vault.lookup(note))
        .or_else(|| vault.resolve_link_target(note))
}

fn relative_key(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn destination(explicit: Option<&Path>, output_dir: Option<&Path>, root: &Document) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => output_dir.unwrap_or(Path::new(".")).join(format!("{}.zip", root.stem())),
    }
}
