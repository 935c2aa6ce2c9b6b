// DOCX merge-field engine
// Fills `{field}` placeholders in the text parts of a Word document

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rentdesk_common::{RentalError, Result};
use zip::{DateTime, ZipArchive, ZipWriter, result::ZipError, write::SimpleFileOptions};

use crate::fields::MergeFields;

/// Main document part every DOCX must contain
const DOCUMENT_PART: &str = "word/document.xml";

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:p[ >].*?</w:p>").expect("Invalid regex pattern"));

static TEXT_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(<w:t(?:\s[^>]*)?>)([^<]*)</w:t>").expect("Invalid regex pattern")
});

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([A-Za-z0-9_.]+)\s*\}").expect("Invalid regex pattern")
});

fn template_error(e: ZipError) -> RentalError {
    match e {
        ZipError::Io(io) => RentalError::IoError(io.to_string()),
        other => RentalError::TemplateError(format!("invalid DOCX container: {}", other)),
    }
}

/// Parts whose text may carry placeholders
fn is_text_part(name: &str) -> bool {
    name == DOCUMENT_PART
        || name == "word/footnotes.xml"
        || name == "word/endnotes.xml"
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

/// One `<w:t>` element inside a paragraph
struct TextNode<'a> {
    span: Range<usize>,
    open_tag: &'a str,
    text: &'a str,
}

/// A placeholder found in a paragraph's joined text
struct Placeholder<'a> {
    span: Range<usize>,
    name: &'a str,
}

fn text_nodes(paragraph: &str) -> Vec<TextNode<'_>> {
    TEXT_NODE
        .captures_iter(paragraph)
        .filter_map(|c| {
            Some(TextNode {
                span: c.get(0)?.range(),
                open_tag: c.get(1)?.as_str(),
                text: c.get(2)?.as_str(),
            })
        })
        .collect()
}

fn placeholders_in(joined: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER
        .captures_iter(joined)
        .filter_map(|c| {
            Some(Placeholder {
                span: c.get(0)?.range(),
                name: c.get(1)?.as_str(),
            })
        })
        .collect()
}

fn joined_text(nodes: &[TextNode<'_>]) -> String {
    nodes.iter().map(|n| n.text).collect()
}

/// Collect placeholder names from one XML part
fn scan_part(xml: &str, names: &mut BTreeSet<String>) {
    for paragraph in PARAGRAPH.find_iter(xml) {
        let joined = joined_text(&text_nodes(paragraph.as_str()));
        for placeholder in placeholders_in(&joined) {
            names.insert(placeholder.name.to_string());
        }
    }
}

fn preserving_open_tag(open_tag: &str) -> Cow<'_, str> {
    if open_tag.contains("xml:space") {
        Cow::Borrowed(open_tag)
    } else {
        Cow::Owned(format!("<w:t xml:space=\"preserve\"{}", &open_tag[4..]))
    }
}

/// Replace placeholders in one paragraph
///
/// Word may split `{tenant_name}` over several runs. Each value is written
/// into the run holding the opening brace and the rest of the placeholder is
/// removed from the runs that follow, so run formatting is kept.
fn render_paragraph<'a>(paragraph: &'a str, fields: &MergeFields) -> Cow<'a, str> {
    let nodes = text_nodes(paragraph);
    if nodes.is_empty() {
        return Cow::Borrowed(paragraph);
    }

    let joined = joined_text(&nodes);
    let placeholders: Vec<Placeholder<'_>> = placeholders_in(&joined)
        .into_iter()
        .filter(|p| fields.contains(p.name))
        .collect();
    if placeholders.is_empty() {
        return Cow::Borrowed(paragraph);
    }

    // Byte range of each node's text within the joined string
    let mut bounds = Vec::with_capacity(nodes.len());
    let mut offset = 0;
    for node in &nodes {
        bounds.push(offset..offset + node.text.len());
        offset += node.text.len();
    }

    let mut outputs = vec![String::new(); nodes.len()];
    let emit_raw = |range: Range<usize>, outputs: &mut Vec<String>| {
        for (i, bound) in bounds.iter().enumerate() {
            let start = range.start.max(bound.start);
            let end = range.end.min(bound.end);
            if start < end {
                outputs[i].push_str(&joined[start..end]);
            }
        }
    };

    let mut cursor = 0;
    for placeholder in &placeholders {
        emit_raw(cursor..placeholder.span.start, &mut outputs);
        let owner = bounds
            .iter()
            .position(|b| b.contains(&placeholder.span.start))
            .unwrap_or(0);
        let value = fields.get(placeholder.name).unwrap_or_default();
        outputs[owner].push_str(&htmlescape::encode_minimal(value));
        cursor = placeholder.span.end;
    }
    emit_raw(cursor..joined.len(), &mut outputs);

    let mut rendered = String::with_capacity(paragraph.len());
    let mut last = 0;
    for (node, output) in nodes.iter().zip(&outputs) {
        rendered.push_str(&paragraph[last..node.span.start]);
        if output == node.text {
            rendered.push_str(node.open_tag);
        } else {
            rendered.push_str(&preserving_open_tag(node.open_tag));
        }
        rendered.push_str(output);
        rendered.push_str("</w:t>");
        last = node.span.end;
    }
    rendered.push_str(&paragraph[last..]);
    Cow::Owned(rendered)
}

fn render_part(xml: &str, fields: &MergeFields) -> String {
    PARAGRAPH
        .replace_all(xml, |caps: &regex::Captures<'_>| {
            render_paragraph(&caps[0], fields).into_owned()
        })
        .into_owned()
}

enum Entry {
    Directory(String),
    File { name: String, bytes: Vec<u8> },
}

/// A loaded DOCX template
pub struct DocxTemplate {
    entries: Vec<Entry>,
}

impl DocxTemplate {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(template_error)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(template_error)?;
            let name = file.name().to_string();
            if file.is_dir() {
                entries.push(Entry::Directory(name));
                continue;
            }
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            entries.push(Entry::File { name, bytes });
        }

        let has_document = entries
            .iter()
            .any(|e| matches!(e, Entry::File { name, .. } if name == DOCUMENT_PART));
        if !has_document {
            return Err(RentalError::TemplateError(format!(
                "template has no {}",
                DOCUMENT_PART
            )));
        }

        Ok(Self { entries })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    fn text_parts(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().filter_map(|e| match e {
            Entry::File { name, bytes } if is_text_part(name) => {
                Some((name.as_str(), bytes.as_slice()))
            }
            _ => None,
        })
    }

    fn part_text<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str> {
        std::str::from_utf8(bytes)
            .map_err(|e| RentalError::TemplateError(format!("{} is not UTF-8: {}", name, e)))
    }

    /// Every placeholder name referenced by the template
    pub fn placeholders(&self) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for (name, bytes) in self.text_parts() {
            scan_part(Self::part_text(name, bytes)?, &mut names);
        }
        Ok(names)
    }

    /// Referenced names with no value in `fields`, sorted
    pub fn missing_fields(&self, fields: &MergeFields) -> Result<Vec<String>> {
        Ok(self
            .placeholders()?
            .into_iter()
            .filter(|name| !fields.contains(name))
            .collect())
    }

    /// Render the document
    ///
    /// Fails before producing any output when a referenced field is unmapped.
    /// Entries are rewritten with a fixed timestamp so identical inputs give
    /// identical bytes.
    pub fn render(&self, fields: &MergeFields) -> Result<Vec<u8>> {
        let missing = self.missing_fields(fields)?;
        if !missing.is_empty() {
            return Err(RentalError::TemplateError(format!(
                "unknown merge fields: {}",
                missing.join(", ")
            )));
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for entry in &self.entries {
            match entry {
                Entry::Directory(name) => {
                    zip.add_directory(name.as_str(), options)
                        .map_err(template_error)?;
                }
                Entry::File { name, bytes } => {
                    zip.start_file(name.as_str(), options)
                        .map_err(template_error)?;
                    if is_text_part(name) {
                        let rendered = render_part(Self::part_text(name, bytes)?, fields);
                        zip.write_all(rendered.as_bytes())?;
                    } else {
                        zip.write_all(bytes)?;
                    }
                }
            }
        }

        Ok(zip.finish().map_err(template_error)?.into_inner())
    }
}
