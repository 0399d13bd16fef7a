//! Document Extractor (C10): pull plain text out of a `.docx` file.
//!
//! `.docx` is a zip archive containing `word/document.xml`, a WordprocessingML
//! document where visible text lives in `<w:t>` runs. Extraction is
//! deliberately lenient — it does not parse the full OOXML schema, only
//! regex-matches text runs, mirroring the reference implementation's
//! light-touch approach. Anything that fails to open as a zip, or is missing
//! `word/document.xml`, is a document-parse-failure (recoverable by the
//! caller, not this function).

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use dedup_core::CoreError;

fn text_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<w:t[^>]*>(.*?)</w:t>").expect("static regex is valid"))
}

/// Extract the concatenated visible text of a `.docx` file at `path`.
pub fn extract_text(path: &Path) -> Result<String, CoreError> {
    let file = File::open(path)
        .map_err(|e| CoreError::DocumentParseFailure(format!("{}: {e}", path.display())))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| CoreError::DocumentParseFailure(format!("{}: {e}", path.display())))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| CoreError::DocumentParseFailure(format!("{}: {e}", path.display())))?
        .read_to_string(&mut xml)
        .map_err(|e| CoreError::DocumentParseFailure(format!("{}: {e}", path.display())))?;

    Ok(extract_runs(&xml))
}

fn extract_runs(xml: &str) -> String {
    let mut out = String::new();
    for cap in text_run_re().captures_iter(xml) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&collapse_whitespace_run(&decode_xml_entities(&cap[1])));
    }
    out
}

fn decode_xml_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

/// Collapse internal whitespace runs within a single captured text run to a
/// single space, matching the reference extractor's per-run `\s+` collapse.
fn collapse_whitespace_run(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn make_docx(document_xml: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        zip.start_file("word/document.xml", FileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
        file
    }

    #[test]
    fn extracts_text_runs_joined_with_spaces() {
        let xml = r#"<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>"#;
        assert_eq!(extract_runs(xml), "Hello world");
    }

    #[test]
    fn decodes_xml_entities() {
        let xml = r#"<w:t>Tom &amp; Jerry</w:t>"#;
        assert_eq!(extract_runs(xml), "Tom & Jerry");
    }

    #[test]
    fn ignores_markup_outside_text_runs() {
        let xml = r#"<w:p><w:pPr/><w:r><w:t>Kept</w:t></w:r></w:p>"#;
        assert_eq!(extract_runs(xml), "Kept");
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(extract_runs(""), "");
    }

    #[test]
    fn collapses_internal_whitespace_within_a_run() {
        let xml = "<w:t>Hello   world\twith\t\ttabs</w:t>";
        assert_eq!(extract_runs(xml), "Hello world with tabs");
    }

    #[test]
    fn extracts_text_from_a_real_docx_archive() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Real archive text.</w:t></w:r></w:p></w:body></w:document>"#;
        let docx = make_docx(xml);
        let text = extract_text(docx.path()).unwrap();
        assert_eq!(text, "Real archive text.");
    }

    #[test]
    fn non_zip_file_is_a_parse_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not a zip").unwrap();
        let err = extract_text(file.path()).unwrap_err();
        assert!(matches!(err, CoreError::DocumentParseFailure(_)));
    }

    #[test]
    fn zip_missing_document_xml_is_a_parse_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        zip.start_file("readme.txt", FileOptions::default())
            .unwrap();
        zip.write_all(b"no document here").unwrap();
        zip.finish().unwrap();

        let err = extract_text(file.path()).unwrap_err();
        assert!(matches!(err, CoreError::DocumentParseFailure(_)));
    }
}
