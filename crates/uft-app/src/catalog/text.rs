// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text operations.

use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result, UftError};
use uft_document::PdfWriter;
use uft_document::text::{self, Case};
use uft_security::{HashAlgorithm, hash_file, open_hex, seal_hex};

const FIND_REPLACE: &[ParameterSpec] = &[
    ParameterSpec::text("find", "Text to find").non_empty(),
    ParameterSpec::text("replace", "Replace with"),
];
const CONVERT_CASE: &[ParameterSpec] =
    &[ParameterSpec::choice("mode", Case::OPTIONS, "Target case")];
const APPEND: &[ParameterSpec] = &[ParameterSpec::text("text", "Text to append")];
const HASH: &[ParameterSpec] = &[ParameterSpec::choice(
    "algorithm",
    HashAlgorithm::OPTIONS,
    "Hash algorithm",
)
.or_default("SHA256")];
const AES_DECRYPT: &[ParameterSpec] =
    &[ParameterSpec::text("key", "Key printed by aesEncrypt (64 hex characters)").non_empty()];
const SPLIT: &[ParameterSpec] =
    &[ParameterSpec::int("linesPerFile", "Lines per part").range(1.0, 1.0e9)];
const MERGE_FILES: &[ParameterSpec] =
    &[ParameterSpec::path_list("paths", "Text files to merge, in order")];
const EXTRACT: &[ParameterSpec] =
    &[ParameterSpec::text("keyword", "Keep lines containing").non_empty()];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Text, "countWords", "Count words", &[], count_words),
    Operation::new(Category::Text, "countLines", "Count lines", &[], count_lines),
    Operation::new(Category::Text, "findReplace", "Find and replace", FIND_REPLACE, find_replace),
    Operation::new(Category::Text, "convertCase", "Convert case", CONVERT_CASE, convert_case),
    Operation::new(Category::Text, "append", "Append text", APPEND, append),
    Operation::new(Category::Text, "toPdf", "Convert to PDF", &[], to_pdf),
    Operation::new(Category::Text, "hash", "Calculate hash", HASH, hash),
    Operation::new(Category::Text, "aesEncrypt", "Encrypt with AES", &[], aes_encrypt),
    Operation::new(Category::Text, "aesDecrypt", "Decrypt with AES", AES_DECRYPT, aes_decrypt),
    Operation::new(Category::Text, "split", "Split into parts", SPLIT, split),
    Operation::new(Category::Text, "sortLines", "Sort lines", &[], sort_lines),
    Operation::new(Category::Text, "reverseContent", "Reverse line order", &[], reverse_content),
    Operation::new(Category::Text, "mergeFiles", "Merge files", MERGE_FILES, merge_files),
    Operation::new(
        Category::Text,
        "removeDuplicateLines",
        "Remove duplicate lines",
        &[],
        remove_duplicate_lines,
    ),
    Operation::new(
        Category::Text,
        "extractByKeyword",
        "Extract lines by keyword",
        EXTRACT,
        extract_by_keyword,
    ),
];

// -- Handlers -----------------------------------------------------------------

/// Read the target, transform its text and write the result back.
fn rewrite(
    inv: &Invocation<'_>,
    summary: &str,
    transform: impl FnOnce(&str) -> String,
) -> Result<Outcome> {
    let content = text::read(inv.path())?;
    let output = inv.in_place_output();
    text::write(&output, &transform(&content))?;
    Ok(Outcome::written(output, summary))
}

fn count_words(inv: &Invocation<'_>) -> Result<Outcome> {
    let count = text::word_count(&text::read(inv.path())?);
    Ok(Outcome::report(format!("Word count: {count}")))
}

fn count_lines(inv: &Invocation<'_>) -> Result<Outcome> {
    let count = text::line_count(&text::read(inv.path())?);
    Ok(Outcome::report(format!("Line count: {count}")))
}

fn find_replace(inv: &Invocation<'_>) -> Result<Outcome> {
    let find = inv.args.text("find")?;
    let replace = inv.args.text("replace")?;
    let content = text::read(inv.path())?;
    let occurrences = content.matches(find).count();
    let output = inv.in_place_output();
    text::write(&output, &content.replace(find, replace))?;
    Ok(Outcome::written(output, format!("Replaced {occurrences} occurrences")))
}

fn convert_case(inv: &Invocation<'_>) -> Result<Outcome> {
    let mode = inv.args.choice("mode")?;
    let case = Case::from_name(mode)
        .ok_or_else(|| UftError::Other(format!("unknown case mode {mode}")))?;
    rewrite(inv, &format!("Converted to {}case", mode.to_lowercase()), |t| {
        text::convert_case(t, case)
    })
}

fn append(inv: &Invocation<'_>) -> Result<Outcome> {
    let addition = inv.args.text("text")?;
    let output = inv.prepare_append()?;
    text::append(&output, addition)?;
    Ok(Outcome::written(output, "Text appended"))
}

fn to_pdf(inv: &Invocation<'_>) -> Result<Outcome> {
    let content = text::read(inv.path())?;
    let output = paths::derived(inv.path(), "", "pdf");
    let title = inv
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    PdfWriter::default()
        .with_title(title)
        .write_text_to_file(&content, &output)?;
    Ok(Outcome::written(output, "Text converted to PDF"))
}

fn hash(inv: &Invocation<'_>) -> Result<Outcome> {
    let name = inv.args.choice("algorithm")?;
    let algorithm = HashAlgorithm::from_name(name)
        .ok_or_else(|| UftError::Other(format!("unknown hash algorithm {name}")))?;
    let digest = hash_file(algorithm, inv.path())?;
    Ok(Outcome::report(format!("{algorithm} hash: {digest}")))
}

/// The key is shown once and never stored; without it the output cannot be
/// decrypted.
fn aes_encrypt(inv: &Invocation<'_>) -> Result<Outcome> {
    let plaintext = std::fs::read(inv.path()).map_err(|e| UftError::io_at(inv.path(), e))?;
    let (sealed, key) = seal_hex(&plaintext)?;
    let output = paths::derived(inv.path(), "_encrypted", "txt");
    text::write(&output, &sealed)?;
    Ok(Outcome::written(output, "File encrypted")
        .detail(format!("key: {}", key.to_hex()))
        .detail("store this key safely: without it the file cannot be decrypted"))
}

fn aes_decrypt(inv: &Invocation<'_>) -> Result<Outcome> {
    let key = inv.args.text("key")?;
    let sealed = text::read(inv.path())?;
    let plaintext = open_hex(&sealed, key)?;
    let output = paths::derived(inv.path(), "_decrypted", "txt");
    std::fs::write(&output, plaintext).map_err(|e| UftError::io_at(&output, e))?;
    Ok(Outcome::written(output, "File decrypted"))
}

fn split(inv: &Invocation<'_>) -> Result<Outcome> {
    let per_file = usize::try_from(inv.args.int("linesPerFile")?).unwrap_or(1);
    let parts = text::split_lines(&text::read(inv.path())?, per_file);
    let mut outputs = Vec::with_capacity(parts.len());
    for (index, part) in parts.iter().enumerate() {
        let output = paths::derived(inv.path(), &format!("_part_{}", index + 1), "txt");
        text::write(&output, part)?;
        outputs.push(output);
    }
    let summary = format!("Split into {} parts", outputs.len());
    Ok(Outcome::written_many(outputs, summary))
}

fn sort_lines(inv: &Invocation<'_>) -> Result<Outcome> {
    rewrite(inv, "Lines sorted", text::sort_lines)
}

fn reverse_content(inv: &Invocation<'_>) -> Result<Outcome> {
    rewrite(inv, "Line order reversed", text::reverse_lines)
}

fn remove_duplicate_lines(inv: &Invocation<'_>) -> Result<Outcome> {
    rewrite(inv, "Duplicate lines removed", text::dedupe_lines)
}

fn merge_files(inv: &Invocation<'_>) -> Result<Outcome> {
    let sources = inv.args.path_list("paths")?;
    let contents = sources
        .iter()
        .map(|p| text::read(p))
        .collect::<Result<Vec<_>>>()?;
    let output = paths::sibling(inv.path(), "merged_file.txt");
    text::write(&output, &text::merge(&contents))?;
    Ok(Outcome::written(output, format!("Merged {} files", sources.len())))
}

fn extract_by_keyword(inv: &Invocation<'_>) -> Result<Outcome> {
    let keyword = inv.args.text("keyword")?;
    let extracted = text::lines_containing(&text::read(inv.path())?, keyword);
    let output = paths::derived(inv.path(), "_extracted", "txt");
    text::write(&output, &extracted)?;
    Ok(Outcome::written(
        output,
        format!("Extracted {} lines", text::line_count(&extracted)),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::tests::{fixture_dir, run, run_with};
    use uft_core::error::FailureCause;
    use uft_core::{Category, ErrorKind, MapSource, ToolConfig, WriteMode};

    fn write(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn sort_lines_then_read() {
        let dir = fixture_dir();
        let path = write(dir.path(), "list.txt", "b\na\nc\n");
        let report = run(Category::Text, "sortLines", &path, MapSource::new());
        assert!(report.success, "{report:?}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn count_words_is_repeatable() {
        let dir = fixture_dir();
        let path = write(dir.path(), "words.txt", "the quick brown\nfox\n");
        let first = run(Category::Text, "countWords", &path, MapSource::new());
        let second = run(Category::Text, "countWords", &path, MapSource::new());
        assert_eq!(first.message, "Word count: 4");
        assert_eq!(first, second);
        assert!(first.outputs.is_empty());
    }

    #[test]
    fn aes_round_trip_with_printed_key() {
        let dir = fixture_dir();
        let original = "secret notes\nline two\n";
        let path = write(dir.path(), "notes.txt", original);

        let encrypted = run(Category::Text, "aesEncrypt", &path, MapSource::new());
        assert!(encrypted.success, "{encrypted:?}");
        let key = encrypted.details[0].strip_prefix("key: ").unwrap().to_string();
        let sealed = dir.path().join("notes_encrypted.txt");
        assert_eq!(encrypted.outputs, vec![sealed.clone()]);

        let decrypted = run(
            Category::Text,
            "aesDecrypt",
            &sealed,
            MapSource::new().with("key", key),
        );
        assert!(decrypted.success, "{decrypted:?}");
        let restored = std::fs::read(dir.path().join("notes_encrypted_decrypted.txt")).unwrap();
        assert_eq!(restored, original.as_bytes());

        let wrong_key = "00".repeat(32);
        let failed = run(
            Category::Text,
            "aesDecrypt",
            &sealed,
            MapSource::new().with("key", wrong_key),
        );
        assert_eq!(
            failed.error_kind,
            Some(ErrorKind::HandlerFailure(FailureCause::DecryptionFailed))
        );
    }

    #[test]
    fn merge_files_appends_newline_per_source() {
        let dir = fixture_dir();
        let a = write(dir.path(), "a.txt", "A");
        let b = write(dir.path(), "b.txt", "B");
        let report = run(
            Category::Text,
            "mergeFiles",
            &a,
            MapSource::new().with("paths", format!("{},{}", a.display(), b.display())),
        );
        assert!(report.success, "{report:?}");
        let merged = dir.path().join("merged_file.txt");
        assert_eq!(report.outputs, vec![merged.clone()]);
        assert_eq!(std::fs::read_to_string(merged).unwrap(), "A\nB\n");
    }

    #[test]
    fn find_replace_accepts_empty_replacement() {
        let dir = fixture_dir();
        let path = write(dir.path(), "t.txt", "a-b-c");
        let report = run(
            Category::Text,
            "findReplace",
            &path,
            MapSource::new().with("find", "-").with("replace", ""),
        );
        assert!(report.success, "{report:?}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");
    }

    #[test]
    fn split_names_parts() {
        let dir = fixture_dir();
        let path = write(dir.path(), "log.txt", "1\n2\n3\n");
        let report = run(
            Category::Text,
            "split",
            &path,
            MapSource::new().with("linesPerFile", "2"),
        );
        assert_eq!(
            report.outputs,
            vec![dir.path().join("log_part_1.txt"), dir.path().join("log_part_2.txt")]
        );
    }

    #[test]
    fn hash_defaults_to_sha256() {
        let dir = fixture_dir();
        let path = write(dir.path(), "h.txt", "hello");
        let report = run(Category::Text, "hash", &path, MapSource::new());
        assert_eq!(
            report.message,
            "SHA-256 hash: 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn non_destructive_mode_keeps_original() {
        let dir = fixture_dir();
        let path = write(dir.path(), "keep.txt", "b\na\n");
        let config = ToolConfig {
            write_mode: WriteMode::Derived,
            ..ToolConfig::default()
        };
        let report = run_with(config, Category::Text, "sortLines", &path, MapSource::new());
        let derived = dir.path().join("keep_modified.txt");
        assert_eq!(report.outputs, vec![derived.clone()]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b\na\n");
        assert_eq!(std::fs::read_to_string(derived).unwrap(), "a\nb\n");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = fixture_dir();
        let path = dir.path().join("absent.txt");
        let report = run(Category::Text, "countLines", &path, MapSource::new());
        assert_eq!(report.error_kind, Some(ErrorKind::NotFound));
    }
}
