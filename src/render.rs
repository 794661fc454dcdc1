// src/render.rs
//
// Hand-off to the gallery front end: card and detail view models plus the
// JSON document the front end loads.

use crate::pipeline::Catalog;
use crate::process::project::PublishedRecord;
use crate::schema::columns::{BIRTH, COLOR, IDENTIFIER, IMAGE_URL, PEDIGREE_ORG, SEX, SPECIES};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};
use tracing::info;

const UNFILLED: &str = "（未記入）";
const CARD_NO_SPECIES: &str = "（種類未入力）";
const DETAIL_NO_SPECIES: &str = "(種類未記入)";

/// `label: value`, or the unfilled marker for an empty value.
fn text_line(label: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{}: {}", label, UNFILLED)
    } else {
        format!("{}: {}", label, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub badge: String,
    pub title: String,
    pub thumbnail: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub heading: String,
    /// (label, value) pairs; empty values are left out.
    pub rows: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
pub struct GalleryEntry<'a> {
    pub card: CardView,
    pub detail: DetailView,
    pub record: &'a PublishedRecord,
}

#[derive(Debug, Serialize)]
pub struct GalleryDocument<'a> {
    pub generated_at: String,
    /// Source header as parsed, in column order.
    pub header: &'a [String],
    pub total_rows: usize,
    pub skipped: usize,
    pub entries: Vec<GalleryEntry<'a>>,
}

/// Builds gallery view models. Owns its display settings instead of reading
/// them from global state.
pub struct GalleryRenderer {
    placeholder: String,
}

impl GalleryRenderer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn card(&self, p: &PublishedRecord) -> CardView {
        let r = &p.record;
        let title = if r.species.is_empty() {
            CARD_NO_SPECIES.to_string()
        } else {
            r.species.clone()
        };
        CardView {
            badge: p.label.clone(),
            title,
            thumbnail: r.image.clone().unwrap_or_else(|| self.placeholder.clone()),
            lines: vec![
                text_line(COLOR, &r.color),
                text_line(SEX, &r.sex),
                text_line(BIRTH, &r.birth),
                text_line(PEDIGREE_ORG, &r.pedigree_org),
                text_line(IDENTIFIER, &r.identifier),
            ],
        }
    }

    pub fn detail(&self, p: &PublishedRecord) -> DetailView {
        let r = &p.record;
        let species = if r.species.is_empty() {
            DETAIL_NO_SPECIES
        } else {
            r.species.as_str()
        };
        let image = r.image.as_deref().unwrap_or("");
        let fixed = [
            (SPECIES, r.species.as_str()),
            (COLOR, r.color.as_str()),
            (SEX, r.sex.as_str()),
            (BIRTH, r.birth.as_str()),
            (PEDIGREE_ORG, r.pedigree_org.as_str()),
            (IMAGE_URL, image),
        ];
        let rows = fixed
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .chain(r.traits.iter().map(|t| (t.name.clone(), t.value.clone())))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        DetailView {
            heading: format!("{} — {}", species, p.label),
            rows,
        }
    }

    pub fn render<'a>(&self, catalog: &'a Catalog) -> GalleryDocument<'a> {
        GalleryDocument {
            generated_at: catalog.generated_at.to_rfc3339(),
            header: &catalog.header,
            total_rows: catalog.total_rows,
            skipped: catalog.skipped,
            entries: catalog
                .records
                .iter()
                .map(|p| GalleryEntry {
                    card: self.card(p),
                    detail: self.detail(p),
                    record: p,
                })
                .collect(),
        }
    }
}

/// Write the document as pretty JSON to `output`, or stdout when `None`.
pub fn write_document(doc: &GalleryDocument<'_>, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output directory {:?}", parent))?;
            }
            let file =
                File::create(path).with_context(|| format!("creating output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, doc).context("serializing gallery")?;
            writer.flush().context("flushing gallery output")?;
            info!(path = %path.display(), entries = doc.entries.len(), "wrote gallery");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, doc).context("serializing gallery")?;
            writeln!(lock).context("writing to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::project::{number_label, Record, TraitValue};
    use chrono::Utc;
    use tempfile::tempdir;

    fn published(no: usize, record: Record) -> PublishedRecord {
        PublishedRecord {
            no,
            label: number_label(no),
            record,
        }
    }

    fn poodle() -> Record {
        Record {
            species: "トイプードル".to_string(),
            color: "レッド".to_string(),
            sex: "オス".to_string(),
            birth: String::new(),
            pedigree_org: "JKC".to_string(),
            identifier: "0012-3".to_string(),
            key: "0012-3".to_string(),
            traits: vec![TraitValue {
                name: "膝蓋骨脱臼".to_string(),
                value: "グレード1".to_string(),
            }],
            image: Some("images/0012-3.jpg".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_card_marks_unfilled_values() {
        let renderer = GalleryRenderer::new("images/no-photo.png");
        let card = renderer.card(&published(7, poodle()));
        assert_eq!(card.badge, "No.007");
        assert_eq!(card.title, "トイプードル");
        assert_eq!(card.thumbnail, "images/0012-3.jpg");
        assert_eq!(
            card.lines,
            vec![
                "毛色: レッド",
                "性別: オス",
                "生年月日: （未記入）",
                "血統書団体名: JKC",
                "仕切書No: 0012-3",
            ]
        );
    }

    #[test]
    fn test_card_fallbacks() {
        let renderer = GalleryRenderer::new("images/no-photo.png");
        let card = renderer.card(&published(1, Record::default()));
        assert_eq!(card.title, "（種類未入力）");
        assert_eq!(card.thumbnail, "images/no-photo.png");
    }

    #[test]
    fn test_detail_skips_empty_rows() {
        let renderer = GalleryRenderer::new("images/no-photo.png");
        let detail = renderer.detail(&published(2, poodle()));
        assert_eq!(detail.heading, "トイプードル — No.002");
        let labels: Vec<_> = detail.rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            labels,
            vec!["種類", "毛色", "性別", "血統書団体名", "画像URL", "膝蓋骨脱臼"]
        );

        let empty = renderer.detail(&published(3, Record::default()));
        assert_eq!(empty.heading, "(種類未記入) — No.003");
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn test_write_document_to_file() -> Result<()> {
        let catalog = Catalog {
            generated_at: Utc::now(),
            header: vec!["種類".to_string(), "仕切書No".to_string()],
            total_rows: 2,
            skipped: 1,
            records: vec![published(1, poodle())],
        };
        let renderer = GalleryRenderer::new("images/no-photo.png");
        let doc = renderer.render(&catalog);

        let dir = tempdir()?;
        let path = dir.path().join("out").join("gallery.json");
        write_document(&doc, Some(&path))?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["header"], serde_json::json!(["種類", "仕切書No"]));
        assert_eq!(value["entries"][0]["card"]["badge"], "No.001");
        assert_eq!(value["entries"][0]["record"]["label"], "No.001");
        assert_eq!(value["entries"][0]["record"]["key"], "0012-3");
        Ok(())
    }
}
