// src/process/project.rs

use crate::config::ImagePrecedence;
use crate::process::key::normalize_key;
use crate::process::table::Table;
use crate::schema::columns::{
    BIRTH, COLOR, IDENTIFIER, IMAGE_URL, PEDIGREE_ORG, SEX, SPECIES, TRAITS,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitValue {
    pub name: String,
    pub value: String,
}

/// One animal row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub species: String,
    pub color: String,
    pub sex: String,
    pub birth: String,
    pub pedigree_org: String,
    /// 仕切書No as written in the sheet.
    pub identifier: String,
    /// Normalized form of `identifier`, used to find the image.
    pub key: String,
    /// 画像URL cell; empty when the column is absent or blank.
    pub explicit_image: String,
    /// Non-blank trait cells only, in trait-list order.
    pub traits: Vec<TraitValue>,
    pub image: Option<String>,
}

impl Record {
    pub fn with_image(self, image: Option<String>) -> Self {
        Self { image, ..self }
    }
}

/// Column positions resolved once per header.
struct ColumnIndex {
    species: Option<usize>,
    color: Option<usize>,
    sex: Option<usize>,
    birth: Option<usize>,
    pedigree_org: Option<usize>,
    identifier: Option<usize>,
    image_url: Option<usize>,
    traits: Vec<(&'static str, usize)>,
}

impl ColumnIndex {
    fn new(table: &Table) -> Self {
        Self {
            species: table.column(SPECIES),
            color: table.column(COLOR),
            sex: table.column(SEX),
            birth: table.column(BIRTH),
            pedigree_org: table.column(PEDIGREE_ORG),
            identifier: table.column(IDENTIFIER),
            image_url: table.column(IMAGE_URL),
            traits: TRAITS
                .iter()
                .filter_map(|name| table.column(name).map(|i| (*name, i)))
                .collect(),
        }
    }
}

/// Cell at `idx`, or empty when the column or the cell is missing.
fn cell(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Build one `Record` per data row, without images.
pub fn project_rows(table: &Table) -> Vec<Record> {
    let idx = ColumnIndex::new(table);
    table
        .rows
        .iter()
        .map(|row| {
            let identifier = cell(row, idx.identifier);
            let traits = idx
                .traits
                .iter()
                .filter_map(|(name, i)| {
                    let value = cell(row, Some(*i));
                    (!value.is_empty()).then(|| TraitValue {
                        name: name.to_string(),
                        value,
                    })
                })
                .collect();
            Record {
                species: cell(row, idx.species),
                color: cell(row, idx.color),
                sex: cell(row, idx.sex),
                birth: cell(row, idx.birth),
                pedigree_org: cell(row, idx.pedigree_org),
                key: normalize_key(&identifier),
                identifier,
                explicit_image: cell(row, idx.image_url),
                traits,
                image: None,
            }
        })
        .collect()
}

/// Merge per-record resolution results; `resolved[i]` belongs to `records[i]`.
pub fn attach_images(
    records: Vec<Record>,
    resolved: Vec<Option<String>>,
    precedence: ImagePrecedence,
) -> Vec<Record> {
    debug_assert_eq!(records.len(), resolved.len());
    records
        .into_iter()
        .zip(resolved)
        .map(|(record, found)| {
            let image = precedence.choose(found, &record.explicit_image);
            record.with_image(image)
        })
        .collect()
}

/// `No.001` style label.
pub fn number_label(n: usize) -> String {
    format!("No.{:03}", n)
}

/// A record that made it into the catalog, numbered by its published position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedRecord {
    pub no: usize,
    pub label: String,
    #[serde(flatten)]
    pub record: Record,
}

/// Apply the publication gate and number the survivors from 1.
pub fn publish(records: Vec<Record>, require_image: bool) -> Vec<PublishedRecord> {
    records
        .into_iter()
        .filter(|r| !require_image || r.image.is_some())
        .enumerate()
        .map(|(i, record)| PublishedRecord {
            no: i + 1,
            label: number_label(i + 1),
            record,
        })
        .collect()
}
