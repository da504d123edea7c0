use mdexport_core::vault::Corpus;
use mdexport_core::export::{ArchiveWriter, ZipArchiveWriter};
use mdexport_core::{ExclusionConfig, ExportError, Exporter, FsVault};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::{TempDir, tempdir};
use zip::ZipArchive;

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A small vault:
///
/// Index -> Projects/Roadmap -> Index (cycle)
/// Index -> Templates/Weekly (excluded folder)
/// Roadmap -> Meeting (private) -> Minutes
/// Roadmap -> assets/chart.png, whose bytes mention [[Minutes]]
/// Index has a "Scratch" section linking to Ideas
fn sample_vault() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(
        root,
        "Index.md",
        b"# Index\nSee [[Roadmap|the roadmap]] and [[Weekly]].\n## Scratch\n[[Ideas]]\n## Links\n[[Missing note]]\n",
    );
    write_file(
        root,
        "Projects/Roadmap.md",
        b"---\nstatus: active\n---\n# Roadmap\n[[Index]] [[Meeting]]\n![[chart.png]]\n",
    );
    write_file(root, "Templates/Weekly.md", b"# Weekly\n[[Ideas]]\n");
    write_file(root, "Meeting.md", b"---\nprivate: \"true\"\n---\n[[Minutes]]\n");
    write_file(root, "Minutes.md", b"# Minutes\n");
    write_file(root, "Ideas.md", b"# Ideas\n");
    write_file(root, "assets/chart.png", b"\x89PNG\r\n[[Minutes]]");
    write_file(root, ".obsidian/workspace.json", b"{}");
    dir
}

fn rules() -> ExclusionConfig {
    ExclusionConfig {
        frontmatter_keys: vec!["private".into()],
        headers: vec!["scratch".into()],
        folders: vec!["Templates".into()],
        files: Vec::new(),
    }
}

fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(fs::read(path).unwrap())).unwrap();
    (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect()
}

#[test]
fn exports_linked_notes_with_exclusions() {
    let vault = sample_vault();
    let corpus = FsVault::open(vault.path()).unwrap();
    let config = rules();
    let out = tempdir().unwrap();
    let dest = out.path().join("index.zip");

    let root = corpus.lookup("Index.md").unwrap();
    let report = Exporter::new(&corpus, &config).export_to(&root, &dest).unwrap();

    assert_eq!(report.included, vec!["Index.md", "Projects/Roadmap.md", "assets/chart.png"]);

    let excluded: Vec<_> = report.excluded.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(excluded, vec!["Meeting.md", "Templates/Weekly.md"]);

    assert_eq!(entry_names(&dest), report.included);
}

#[test]
fn archive_content_matches_vault() {
    let vault = sample_vault();
    let corpus = FsVault::open(vault.path()).unwrap();
    let config = ExclusionConfig::default();
    let out = tempdir().unwrap();
    let dest = out.path().join("roadmap.zip");

    let root = corpus.resolve_link_target("Roadmap").unwrap();
    Exporter::new(&corpus, &config).export_to(&root, &dest).unwrap();

    let mut archive = ZipArchive::new(Cursor::new(fs::read(&dest).unwrap())).unwrap();
    let mut chart = Vec::new();
    archive.by_name("assets/chart.png").unwrap().read_to_end(&mut chart).unwrap();
    assert_eq!(chart, fs::read(vault.path().join("assets/chart.png")).unwrap());

    let mut minutes = String::new();
    archive.by_name("Minutes.md").unwrap().read_to_string(&mut minutes).unwrap();
    assert_eq!(minutes, "# Minutes\n");
}

#[test]
fn without_rules_everything_reachable_is_exported() {
    let vault = sample_vault();
    let corpus = FsVault::open(vault.path()).unwrap();
    let config = ExclusionConfig::default();

    let root = corpus.lookup("Index.md").unwrap();
    let collected = Exporter::new(&corpus, &config).collect(&root).unwrap();
    let paths: Vec<_> = collected.visited.iter().map(|d| d.path()).collect();

    assert_eq!(
        paths,
        vec![
            "Index.md",
            "Projects/Roadmap.md",
            "Meeting.md",
            "Minutes.md",
            "assets/chart.png",
            "Templates/Weekly.md",
            "Ideas.md",
        ]
    );
}

#[test]
fn deleted_file_aborts_without_output() {
    let vault = sample_vault();
    let corpus = FsVault::open(vault.path()).unwrap();
    fs::remove_file(vault.path().join("Minutes.md")).unwrap();

    let config = ExclusionConfig::default();
    let out = tempdir().unwrap();
    let dest = out.path().join("index.zip");

    let root = corpus.lookup("Index.md").unwrap();
    let err = Exporter::new(&corpus, &config).export_to(&root, &dest).unwrap_err();

    assert!(matches!(err, ExportError::Read(_)), "got {err:?}");
    assert!(!dest.exists());
}

#[test]
fn non_utf8_text_is_archived_byte_for_byte() {
    let dir = tempdir().unwrap();
    let latin1: &[u8] = b"caf\xe9 na\xefve";
    write_file(dir.path(), "Root.md", b"[[notes.txt]]\n");
    write_file(dir.path(), "notes.txt", latin1);

    let corpus = FsVault::open(dir.path()).unwrap();
    let config = ExclusionConfig::default();
    let out = tempdir().unwrap();
    let dest = out.path().join("root.zip");

    let root = corpus.lookup("Root.md").unwrap();
    let report = Exporter::new(&corpus, &config).export_to(&root, &dest).unwrap();
    assert_eq!(report.included, vec!["Root.md", "notes.txt"]);

    let mut archive = ZipArchive::new(Cursor::new(fs::read(&dest).unwrap())).unwrap();
    let mut notes = Vec::new();
    archive.by_name("notes.txt").unwrap().read_to_end(&mut notes).unwrap();
    assert_eq!(notes, latin1);
}

#[test]
fn archive_holds_the_content_that_was_scanned() {
    let vault = sample_vault();
    let corpus = FsVault::open(vault.path()).unwrap();
    let config = rules();

    let root = corpus.lookup("Index.md").unwrap();
    let exporter = Exporter::new(&corpus, &config);
    let collected = exporter.collect(&root).unwrap();

    // Edited between the walk and the write
    let original = fs::read(vault.path().join("Index.md")).unwrap();
    fs::write(vault.path().join("Index.md"), "# Index\n[[Ideas]]\n").unwrap();

    let mut writer = ZipArchiveWriter::new();
    let skipped = exporter.write_entries(&mut writer, &collected).unwrap();
    assert!(skipped.is_empty());

    let mut archive = ZipArchive::new(Cursor::new(writer.finish().unwrap())).unwrap();
    let mut index = Vec::new();
    archive.by_name("Index.md").unwrap().read_to_end(&mut index).unwrap();
    assert_eq!(index, original);
}
