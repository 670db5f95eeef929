use crate::codec::{self, Document};
use crate::error::{PrintedError, Result};
use crate::format::{
    format_iso_duration, format_timestamp, now, parse_duration, parse_iso_duration,
    parse_timestamp,
};
use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SETTINGS_FILE: &str = "project.toml";
pub const MESH_EXTENSIONS: &[&str] = &["stl", "3mf", "obj"];

/// One print project, persisted as `<root>/<name>/project.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub name: String,
    pub title: String,
    pub reference_cost: f64,
    pub duration: TimeDelta,
    pub created_at: DateTime<FixedOffset>,
    pub source_links: Vec<Link>,
    pub reference_links: Vec<Link>,
    pub materials: Vec<PrintMaterial>,
    pub history: Vec<PrintHistory>,
    /// Directory holding the settings file and mesh files. Not persisted.
    pub path: PathBuf,
}

impl Print {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            reference_cost: 0.0,
            duration: TimeDelta::zero(),
            created_at: now(),
            source_links: Vec::new(),
            reference_links: Vec::new(),
            materials: Vec::new(),
            history: Vec::new(),
            path: PathBuf::new(),
        }
    }

    /// Reads `<root>/<name>/project.toml`.
    pub fn collect(root: &Path, name: &str) -> Result<Self> {
        codec::load(&root.join(name).join(SETTINGS_FILE), None)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path.join(SETTINGS_FILE)
    }

    pub fn write(&self) -> Result<()> {
        debug!(print = %self.name, path = %self.settings_path().display(), "writing print");
        codec::save(&self.settings_path(), self)
    }

    /// Removal is not destructive: nothing is deleted in memory or on disk.
    pub fn delete(&self) {
        debug!(print = %self.name, "delete requested, leaving print in place");
    }

    pub fn count(&self) -> usize {
        self.history.len()
    }

    pub fn weight(&self) -> f64 {
        self.materials.iter().map(|m| m.unit_count).sum()
    }

    pub fn cost(&self) -> f64 {
        self.materials.iter().map(PrintMaterial::price).sum()
    }

    pub fn total_printed_weight(&self) -> f64 {
        self.weight() * self.count() as f64
    }

    pub fn total_printed_cost(&self) -> f64 {
        self.cost() * self.count() as f64
    }

    pub fn total_reference_cost(&self) -> f64 {
        self.reference_cost * self.count() as f64
    }

    pub fn total_saved(&self) -> f64 {
        self.total_reference_cost() - self.total_printed_cost()
    }

    /// Mesh files found in the print directory, by file name.
    pub fn files(&self) -> Result<Vec<PrintFile>> {
        if !self.path.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_file() && PrintFile::is_mesh(&path) {
                files.push(PrintFile { path });
            }
        }
        files.sort_by(|a, b| a.filename().cmp(&b.filename()));
        Ok(files)
    }

    /// Overwrites the editable fields. Source links are replaced, not merged.
    pub fn update(
        &mut self,
        reference_cost: f64,
        duration: &str,
        source_links: Vec<(String, String)>,
    ) -> Result<()> {
        let duration = parse_duration(duration).map_err(PrintedError::InvalidInput)?;
        self.reference_cost = reference_cost;
        self.duration = duration;
        self.source_links = source_links
            .into_iter()
            .map(|(url, title)| Link::new(url, Some(title)))
            .collect();
        Ok(())
    }

    /// Records a successful attempt now.
    pub fn append_history(&mut self) {
        self.append_history_entry(PrintHistory::new(now(), PrintStatus::Success));
    }

    pub fn append_history_entry(&mut self, entry: PrintHistory) {
        self.history.insert(0, entry);
        self.history.sort_by(|a, b| b.printed_on.cmp(&a.printed_on));
    }

    /// Removes the `number`th (1-based) entry of the most-recent-first history.
    pub fn delete_history(&mut self, number: usize) -> Result<PrintHistory> {
        remove_position(&mut self.history, number, "history entry")
    }

    /// Adds a blank link to be filled in by an edit form.
    pub fn append_source_link(&mut self) {
        self.source_links.insert(0, Link::new("", None));
        self.source_links.sort_by(|a, b| a.title.cmp(&b.title));
    }

    pub fn delete_source_link(&mut self, number: usize) -> Result<Link> {
        remove_position(&mut self.source_links, number, "source link")
    }
}

fn remove_position<T>(items: &mut Vec<T>, number: usize, kind: &'static str) -> Result<T> {
    if number == 0 || number > items.len() {
        return Err(PrintedError::IndexOutOfRange {
            kind,
            index: number,
            len: items.len(),
        });
    }
    Ok(items.remove(number - 1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
}

impl Link {
    /// A blank or missing title falls back to the URL's host.
    pub fn new(url: impl Into<String>, title: Option<String>) -> Self {
        let url = url.into();
        let title = match title {
            Some(title) if !title.is_empty() => title,
            _ => url_host(&url).to_string(),
        };
        Self { url, title }
    }
}

/// Network location of a URL (`https://example.com/x` -> `example.com`).
/// Scheme-less input has no host.
pub fn url_host(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => match url.strip_prefix("//") {
            Some(rest) => rest,
            None => return "",
        },
    };
    rest.split(['/', '?', '#']).next().unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    #[default]
    Success,
    Failed,
}

impl fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintStatus::Success => write!(f, "success"),
            PrintStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One physical print attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintHistory {
    pub printed_on: DateTime<FixedOffset>,
    pub status: PrintStatus,
}

impl PrintHistory {
    pub fn new(printed_on: DateTime<FixedOffset>, status: PrintStatus) -> Self {
        Self { printed_on, status }
    }
}

/// Material consumed by a print, priced at the time the print was added.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintMaterial {
    pub material: String,
    pub unit_count: f64,
    pub price_per_unit: f64,
}

impl PrintMaterial {
    pub fn price(&self) -> f64 {
        self.unit_count * self.price_per_unit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintFile {
    pub path: PathBuf,
}

impl PrintFile {
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn is_mesh(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| MESH_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

// --- On-disk records ---

#[derive(Debug, Serialize, Deserialize)]
pub struct PrintRecord {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub reference_cost: f64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub source_links: Vec<LinkRecord>,
    #[serde(default)]
    pub reference_links: Vec<LinkRecord>,
    #[serde(default)]
    pub materials: Vec<PrintMaterialRecord>,
    #[serde(default)]
    pub history: Vec<PrintHistoryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrintMaterialRecord {
    pub material: String,
    pub unit_count: f64,
    pub price_per_unit: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrintHistoryRecord {
    #[serde(default)]
    pub printed_on: Option<String>,
    #[serde(default)]
    pub status: PrintStatus,
}

impl Document for Print {
    type Record = PrintRecord;

    fn decode(record: PrintRecord, path: &Path) -> std::result::Result<Self, String> {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) {
            if dir_name != record.name {
                return Err(format!(
                    "name '{}' does not match its directory '{}'",
                    record.name, dir_name
                ));
            }
        }

        let duration = match record.duration.as_deref() {
            Some(text) => parse_iso_duration(text)?,
            None => TimeDelta::zero(),
        };
        let created_at = match record.created_at.as_deref() {
            Some(text) => parse_timestamp(text)?,
            None => now(),
        };
        let history = record
            .history
            .into_iter()
            .map(|h| {
                let printed_on = match h.printed_on.as_deref() {
                    Some(text) => parse_timestamp(text)?,
                    None => now(),
                };
                Ok(PrintHistory::new(printed_on, h.status))
            })
            .collect::<std::result::Result<Vec<_>, String>>()?;

        Ok(Print {
            name: record.name,
            title: record.title,
            reference_cost: record.reference_cost,
            duration,
            created_at,
            source_links: decode_links(record.source_links),
            reference_links: decode_links(record.reference_links),
            materials: record
                .materials
                .into_iter()
                .map(|m| PrintMaterial {
                    material: m.material,
                    unit_count: m.unit_count,
                    price_per_unit: m.price_per_unit,
                })
                .collect(),
            history,
            path: dir,
        })
    }

    fn encode(&self) -> PrintRecord {
        PrintRecord {
            name: self.name.clone(),
            title: self.title.clone(),
            reference_cost: self.reference_cost,
            duration: Some(format_iso_duration(&self.duration)),
            created_at: Some(format_timestamp(&self.created_at)),
            source_links: encode_links(&self.source_links),
            reference_links: encode_links(&self.reference_links),
            materials: self
                .materials
                .iter()
                .map(|m| PrintMaterialRecord {
                    material: m.material.clone(),
                    unit_count: m.unit_count,
                    price_per_unit: m.price_per_unit,
                })
                .collect(),
            history: self
                .history
                .iter()
                .map(|h| PrintHistoryRecord {
                    printed_on: Some(format_timestamp(&h.printed_on)),
                    status: h.status,
                })
                .collect(),
        }
    }
}

fn decode_links(records: Vec<LinkRecord>) -> Vec<Link> {
    records
        .into_iter()
        .map(|r| Link::new(r.url, Some(r.title)))
        .collect()
}

fn encode_links(links: &[Link]) -> Vec<LinkRecord> {
    links
        .iter()
        .map(|l| LinkRecord {
            url: l.url.clone(),
            title: l.title.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parse_timestamp;
    use tempfile::TempDir;

    fn at(text: &str) -> DateTime<FixedOffset> {
        parse_timestamp(text).unwrap()
    }

    fn priced(reference_cost: f64, material_cost: f64, attempts: usize) -> Print {
        let mut print = Print::new("cube", "Cube");
        print.reference_cost = reference_cost;
        print.materials.push(PrintMaterial {
            material: "PLA".into(),
            unit_count: material_cost / 0.02,
            price_per_unit: 0.02,
        });
        for _ in 0..attempts {
            print.append_history();
        }
        print
    }

    #[test]
    fn link_title_defaults_to_host() {
        let link = Link::new("https://www.printables.com/model/1", None);
        assert_eq!(link.title, "www.printables.com");

        let blank = Link::new("https://example.com:8080/x?y", Some(String::new()));
        assert_eq!(blank.title, "example.com:8080");

        let titled = Link::new("https://example.com", Some("Example".into()));
        assert_eq!(titled.title, "Example");
    }

    #[test]
    fn scheme_less_urls_have_no_host() {
        assert_eq!(url_host("example.com/model"), "");
        assert_eq!(url_host("//cdn.example.com/a"), "cdn.example.com");
        assert_eq!(url_host(""), "");
    }

    #[test]
    fn derived_costs() {
        let print = priced(10.0, 2.0, 1);
        assert_eq!(print.count(), 1);
        assert!((print.cost() - 2.0).abs() < 1e-9);
        assert!((print.total_saved() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn unprinted_saves_nothing() {
        let print = priced(10.0, 2.0, 0);
        assert_eq!(print.total_saved(), 0.0);
        assert_eq!(print.total_printed_cost(), 0.0);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut print = Print::new("cube", "Cube");
        print.append_history_entry(PrintHistory::new(
            at("2020-01-02T00:00:00+00:00"),
            PrintStatus::Success,
        ));
        print.append_history_entry(PrintHistory::new(
            at("2020-01-01T00:00:00+00:00"),
            PrintStatus::Failed,
        ));
        print.append_history_entry(PrintHistory::new(
            at("2020-01-03T00:00:00+00:00"),
            PrintStatus::Success,
        ));

        let days: Vec<_> = print
            .history
            .iter()
            .map(|h| format_timestamp(&h.printed_on))
            .collect();
        assert_eq!(
            days,
            vec![
                "2020-01-03T00:00:00+00:00",
                "2020-01-02T00:00:00+00:00",
                "2020-01-01T00:00:00+00:00",
            ]
        );
    }

    #[test]
    fn delete_history_is_one_based() {
        let mut print = Print::new("cube", "Cube");
        print.append_history_entry(PrintHistory::new(
            at("2020-01-01T00:00:00+00:00"),
            PrintStatus::Success,
        ));
        print.append_history_entry(PrintHistory::new(
            at("2020-01-02T00:00:00+00:00"),
            PrintStatus::Failed,
        ));

        let removed = print.delete_history(1).unwrap();
        assert_eq!(removed.status, PrintStatus::Failed);
        assert_eq!(print.count(), 1);
    }

    #[test]
    fn delete_history_out_of_range_is_reported() {
        let mut print = Print::new("cube", "Cube");
        print.append_history();

        for number in [0, 2] {
            let err = print.delete_history(number).unwrap_err();
            assert!(matches!(
                err,
                PrintedError::IndexOutOfRange { index, len: 1, .. } if index == number
            ));
        }
        assert_eq!(print.count(), 1);
    }

    #[test]
    fn source_links_append_and_delete() {
        let mut print = Print::new("cube", "Cube");
        print.source_links.push(Link::new("https://b.example", None));
        print.append_source_link();

        assert_eq!(print.source_links.len(), 2);
        assert_eq!(print.source_links[0].url, "");

        let removed = print.delete_source_link(2).unwrap();
        assert_eq!(removed.url, "https://b.example");
        assert!(print.delete_source_link(2).is_err());
    }

    #[test]
    fn update_replaces_links() {
        let mut print = Print::new("cube", "Cube");
        print.source_links.push(Link::new("https://old.example", None));

        print
            .update(
                12.5,
                "1h30m",
                vec![("https://new.example/x".into(), String::new())],
            )
            .unwrap();

        assert_eq!(print.reference_cost, 12.5);
        assert_eq!(print.duration, TimeDelta::minutes(90));
        assert_eq!(print.source_links.len(), 1);
        assert_eq!(print.source_links[0].title, "new.example");
    }

    #[test]
    fn update_with_bad_duration_changes_nothing() {
        let mut print = Print::new("cube", "Cube");
        let err = print.update(3.0, "soon", vec![]).unwrap_err();
        assert!(matches!(err, PrintedError::InvalidInput(_)));
        assert_eq!(print.reference_cost, 0.0);
    }

    #[test]
    fn write_and_collect_round_trip() {
        let root = TempDir::new().unwrap();
        let mut print = Print::new("cube", "Cube");
        print.path = root.path().join("cube");
        print.reference_cost = 10.0;
        print.duration = TimeDelta::minutes(95) + TimeDelta::milliseconds(250);
        print.source_links.push(Link::new("https://example.com/cube", None));
        print
            .reference_links
            .push(Link::new("https://shop.example/cube", Some("Shop".into())));
        print.materials.push(PrintMaterial {
            material: "PLA".into(),
            unit_count: 100.0,
            price_per_unit: 0.02,
        });
        print.append_history_entry(PrintHistory::new(
            at("2021-06-01T12:00:00.5+02:00"),
            PrintStatus::Failed,
        ));
        print.append_history();

        print.write().unwrap();
        let loaded = Print::collect(root.path(), "cube").unwrap();
        assert_eq!(loaded, print);
    }

    #[test]
    fn collect_rejects_mismatched_name() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("cube");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_FILE), "name = \"sphere\"\ntitle = \"Sphere\"\n").unwrap();

        let err = Print::collect(root.path(), "cube").unwrap_err();
        assert!(matches!(err, PrintedError::SchemaValidation { .. }));
    }

    #[test]
    fn collect_rejects_unknown_status() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("cube");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(SETTINGS_FILE),
            "name = \"cube\"\ntitle = \"Cube\"\n\n[[history]]\nprinted_on = \"2020-01-01T00:00:00+00:00\"\nstatus = \"maybe\"\n",
        )
        .unwrap();

        let err = Print::collect(root.path(), "cube").unwrap_err();
        assert!(matches!(err, PrintedError::SchemaValidation { .. }));
    }

    #[test]
    fn files_lists_meshes_only() {
        let root = TempDir::new().unwrap();
        let mut print = Print::new("cube", "Cube");
        print.path = root.path().join("cube");
        assert!(print.files().unwrap().is_empty());

        fs::create_dir_all(&print.path).unwrap();
        for name in ["b.STL", "a.3mf", "notes.txt", "c.obj"] {
            fs::write(print.path.join(name), "").unwrap();
        }

        let names: Vec<_> = print.files().unwrap().iter().map(|f| f.filename()).collect();
        assert_eq!(names, vec!["a.3mf", "b.STL", "c.obj"]);
    }
}
