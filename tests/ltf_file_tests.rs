// SPDX-License-Identifier: PMPL-1.0-or-later

//! Integration tests for mapped LTF files in table and index mode

use ltf_engine::i18n::{Language, LanguageTag};
use ltf_engine::ltf::{ByteRange, DocumentKind, LtfFile};
use ltf_engine::LtfError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sample_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sample.ltf")
}

fn write(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("test.ltf");
    fs::write(&path, body).unwrap();
    path
}

fn tag(raw: &str) -> LanguageTag {
    raw.parse().expect("valid tag")
}

#[test]
fn test_sample_file_table_mode() {
    let mut file = LtfFile::prepare(&sample_path()).expect("sample should open");
    file.create_map_all().expect("sample should parse");

    assert_eq!(file.count_entries(), 3);
    assert_eq!(file.get("menu_start", &tag("en")).unwrap(), "Start game");
    assert_eq!(file.get("menu_start", &tag("en.formal")).unwrap(), "Commence the game");
    assert_eq!(file.get("menu_start", &tag("ja")).unwrap(), "ゲームを始める");
    assert_eq!(file.get("menu_quit", &tag("de")).unwrap(), "Beenden");
    assert_eq!(
        file.get("intro-text", &tag("en")).unwrap(),
        "Long ago, in a distant land,\na story began."
    );

    let langs: Vec<String> = file
        .languages_present("menu_start")
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(langs.len(), 4);
    assert!(langs.contains(&"en.formal".to_string()));
}

#[test]
fn test_sample_file_index_mode_matches_table() {
    let mut table = LtfFile::prepare(&sample_path()).unwrap();
    table.create_map_all().unwrap();
    let mut index = LtfFile::prepare(&sample_path()).unwrap();
    index.create_index_all().unwrap();

    assert_eq!(index.document().kind(), Some(DocumentKind::Index));
    assert_eq!(index.count_entries(), table.count_entries());

    let entries = table.document().as_table().unwrap();
    for (id, langs) in entries.iter() {
        for (lang, text) in langs {
            let range = index.get_range(id, lang).unwrap();
            assert_eq!(index.slice_from_source(range).unwrap(), text.as_str());
            assert_eq!(index.text(id, lang).unwrap(), text.as_str());
        }
    }
}

#[test]
fn test_index_ranges_point_into_source() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[greet]\n[en] Hello\n[ru] Привет\n");
    let mut file = LtfFile::prepare(&path).unwrap();
    file.create_index_all().unwrap();

    let range = file.get_range("greet", &tag("en")).unwrap();
    assert_eq!(range, ByteRange::new(13, 18));
    let content = file.content().unwrap();
    assert_eq!(&content[range.begin..range.end], b"Hello");

    let ru = file.get_range("greet", &tag("ru")).unwrap();
    assert!(ru.end <= content.len());
    assert_eq!(file.slice_from_source(ru).unwrap(), "Привет");
}

#[test]
fn test_filtered_map_hides_other_languages() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[greet]\n[en] Hello\n[ru] Привет\n");
    let mut file = LtfFile::prepare(&path).unwrap();
    file.create_map(Language::Russian).unwrap();

    assert_eq!(file.get("greet", &tag("ru")).unwrap(), "Привет");
    let err = file.get("greet", &tag("en")).unwrap_err();
    assert!(err.is_lookup());
}

#[test]
fn test_filtered_index_hides_other_languages() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[greet]\n[en] Hello\n[ru] Привет\n");
    let mut file = LtfFile::prepare(&path).unwrap();
    file.create_index(Language::English).unwrap();

    assert_eq!(file.text("greet", &tag("en")).unwrap(), "Hello");
    assert!(file.get_range("greet", &tag("ru")).unwrap_err().is_lookup());
}

#[test]
fn test_recreating_a_document_discards_the_previous_one() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[greet]\n[en] Hello\n[ru] Привет\n");
    let mut file = LtfFile::prepare(&path).unwrap();

    file.create_map_all().unwrap();
    assert_eq!(file.languages_present("greet").unwrap().len(), 2);

    file.create_map(Language::English).unwrap();
    assert_eq!(file.languages_present("greet").unwrap().len(), 1);

    file.create_index_all().unwrap();
    assert_eq!(file.document().kind(), Some(DocumentKind::Index));
    assert!(file.get("greet", &tag("en")).unwrap_err().is_lookup());
    assert_eq!(file.text("greet", &tag("en")).unwrap(), "Hello");
}

#[test]
fn test_parsing_twice_is_idempotent() {
    let mut file = LtfFile::prepare(&sample_path()).unwrap();
    file.create_map_all().unwrap();
    let first = file.document().clone();
    file.create_map_all().unwrap();
    assert_eq!(&first, file.document());
}

#[test]
fn test_format_error_keeps_partial_results_and_releases_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[a]\n[en] one\n[b]\n[en] two\n[c]\n[en] three\n/* unterminated");
    let mut file = LtfFile::prepare(&path).unwrap();
    let err = file.create_map_all().unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("unterminated comment"));

    // Entries before the last id boundary were committed.
    assert!(file.document().contains("a"));
    assert!(file.document().contains("b"));

    file.close().unwrap();
    file.close().unwrap();
}

#[test]
fn test_invalid_id_reports_position() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[123bad]\n[en] x\n");
    let mut file = LtfFile::prepare(&path).unwrap();
    let err = file.create_map_all().unwrap_err();
    assert_eq!(err.position(), Some(1));
    assert_eq!(file.count_entries(), 0);
}

#[test]
fn test_close_drops_index_but_keeps_table() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "[greet]\n[en] Hello\n");

    let mut index = LtfFile::prepare(&path).unwrap();
    index.create_index_all().unwrap();
    index.close().unwrap();
    assert_eq!(index.count_entries(), 0);
    assert!(index.text("greet", &tag("en")).unwrap_err().is_lookup());

    let mut table = LtfFile::prepare(&path).unwrap();
    table.create_map_all().unwrap();
    table.close().unwrap();
    assert_eq!(table.get("greet", &tag("en")).unwrap(), "Hello");
    assert!(table.create_map_all().unwrap_err().is_io());
}

#[test]
fn test_prepare_fails_for_missing_and_empty_files() {
    let dir = TempDir::new().unwrap();
    assert!(LtfFile::prepare(&dir.path().join("nope.ltf")).unwrap_err().is_io());
    let empty = write(&dir, "");
    assert!(LtfFile::prepare(&empty).unwrap_err().is_io());
}

#[test]
fn test_create_without_prepare_is_io_error() {
    let mut file = LtfFile::new();
    assert!(file.create_map_all().unwrap_err().is_io());
    assert!(file.create_index(Language::English).unwrap_err().is_io());
}

#[test]
fn test_utf8_bom_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.ltf");
    fs::write(&path, b"\xEF\xBB\xBF[greet]\n[en] Hello\n").unwrap();
    let mut file = LtfFile::prepare(&path).unwrap();
    file.create_map_all().unwrap();
    assert_eq!(file.get("greet", &tag("en")).unwrap(), "Hello");
}

#[test]
fn test_invalid_utf8_text_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.ltf");
    fs::write(&path, b"[greet]\n[fr] caf\xE9\n").unwrap();
    let mut file = LtfFile::prepare(&path).unwrap();
    let err = file.create_map_all().unwrap_err();
    assert!(err.is_format());
    assert_eq!(err.position(), Some(16));
}

#[test]
fn test_invalid_utf8_after_continuation_points_at_the_byte() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("continued.ltf");
    fs::write(&path, b"[a]\n[en] x\\\n\xE9\n").unwrap();
    let mut file = LtfFile::prepare(&path).unwrap();
    let err = file.create_map_all().unwrap_err();
    match err {
        LtfError::Format {
            position, line, found, ..
        } => {
            assert_eq!(position, 12);
            assert_eq!(line, 3);
            assert_eq!(found, "'\\xe9'");
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_fails_the_same_in_both_modes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.ltf");
    fs::write(&path, b"[a]\n[en] ok\n[b]\n[en] caf\xE9\n").unwrap();
    let mut file = LtfFile::prepare(&path).unwrap();

    let table_err = file.create_map_all().unwrap_err();
    let index_err = file.create_index_all().unwrap_err();
    assert_eq!(table_err, index_err);
    match index_err {
        LtfError::Format { position, line, .. } => {
            assert_eq!(position, 24);
            assert_eq!(line, 4);
        }
        other => panic!("expected a format error, got {other:?}"),
    }
    // Entries before the bad one are kept.
    assert!(file.document().contains("a"));
    assert!(!file.document().contains("b"));
}

#[test]
fn test_slice_errors_are_positioned_in_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("comment.ltf");
    fs::write(&path, b"[a]\n[en] x\n// \xE9\n").unwrap();
    let mut file = LtfFile::prepare(&path).unwrap();
    file.create_index_all().unwrap();

    let err = file.slice_from_source(ByteRange::new(11, 15)).unwrap_err();
    match err {
        LtfError::Format { position, line, .. } => {
            assert_eq!(position, 14);
            assert_eq!(line, 3);
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}
