use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::LinkOptions;
use crate::domain::{new_entry_id, CatalogueEntry, LinkStats, MatchStatus, SourceFile};
use crate::geocode::{Gazetteer, Geocoder};
use crate::naming;
use crate::preview::{FilePreviewer, PreviewGenerator};
use crate::sheet::fields::{resolve, FieldAliases};
use crate::sheet::Row;

/// Metadata rows keyed by their lowercased, trimmed identifier.
///
/// Rows without an identifier are not indexed. When several rows share an
/// identifier, the last one wins.
pub struct RowIndex<'a> {
    rows: HashMap<String, &'a Row>,
}

impl<'a> RowIndex<'a> {
    pub fn build<S: AsRef<str>>(rows: &'a [Row], id_aliases: &[S]) -> Self {
        let mut index = HashMap::new();
        for row in rows {
            let id = resolve(row, id_aliases);
            if id.is_empty() {
                continue;
            }
            let key = id.trim().to_lowercase();
            if index.insert(key.clone(), row).is_some() {
                warn!(code = %key, "duplicate code in metadata, later row replaces earlier one");
            }
        }
        Self { rows: index }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&'a Row> {
        self.rows.get(&key.trim().to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The descriptive columns read from a matched row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub description: String,
    pub kind: String,
    pub location: String,
    pub date: String,
    pub quantity: String,
    pub note: String,
}

impl RowFields {
    pub fn extract(row: &Row, aliases: &FieldAliases) -> Self {
        Self {
            description: resolve(row, &aliases.description),
            kind: resolve(row, &aliases.kind),
            location: resolve(row, &aliases.location),
            date: resolve(row, &aliases.date),
            quantity: resolve(row, &aliases.quantity),
            note: resolve(row, &aliases.note),
        }
    }

    /// Type, location and date, in that order, skipping empty ones.
    pub fn tags(&self) -> Vec<String> {
        [&self.kind, &self.location, &self.date]
            .into_iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect()
    }
}

/// Result of processing one input path.
#[derive(Debug)]
pub enum ItemOutcome {
    Linked(Box<CatalogueEntry>),
    Rejected { path: PathBuf, reason: String },
}

/// Everything a linking pass produced, in input order.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub entries: Vec<CatalogueEntry>,
    pub stats: LinkStats,
    pub rejected: Vec<(PathBuf, String)>,
}

impl LinkReport {
    fn from_outcomes(outcomes: Vec<ItemOutcome>) -> Self {
        let mut report = LinkReport::default();
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Linked(entry) => report.entries.push(*entry),
                ItemOutcome::Rejected { path, reason } => report.rejected.push((path, reason)),
            }
        }
        report.stats = LinkStats::tally(&report.entries);
        report
    }
}

/// Joins image files against metadata rows.
pub struct Linker<G, P> {
    options: LinkOptions,
    geocoder: G,
    previewer: P,
}

impl Linker<&'static Gazetteer, FilePreviewer> {
    /// Built-in gazetteer and on-disk previews, as configured by `options`.
    pub fn with_options(options: LinkOptions) -> Self {
        let previewer = FilePreviewer::from_options(&options);
        Self::new(options, Gazetteer::builtin(), previewer)
    }
}

impl<G: Geocoder, P: PreviewGenerator> Linker<G, P> {
    pub fn new(options: LinkOptions, geocoder: G, previewer: P) -> Self {
        Self {
            options,
            geocoder,
            previewer,
        }
    }

    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Link every path against `rows`, one file at a time in input order.
    ///
    /// Paths that are not regular files are reported in `rejected` and produce
    /// no entry. A failed preview leaves that entry's preview empty and never
    /// affects other files.
    pub async fn link(&self, files: &[PathBuf], rows: &[Row]) -> LinkReport {
        let index = RowIndex::build(rows, &self.options.aliases.id);
        debug!(rows = rows.len(), indexed = index.len(), "metadata indexed");

        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            outcomes.push(self.link_one(path, &index).await);
        }

        let report = LinkReport::from_outcomes(outcomes);
        info!(
            total = report.stats.total,
            matched = report.stats.matched,
            unmatched = report.stats.unmatched,
            rejected = report.rejected.len(),
            "linking complete"
        );
        report
    }

    async fn link_one(&self, path: &Path, index: &RowIndex<'_>) -> ItemOutcome {
        let file = match SourceFile::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), "skipping input: {e}");
                return ItemOutcome::Rejected {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                };
            }
        };

        let id = new_entry_id();
        let preview = match self.previewer.preview(&file, &id).await {
            Ok(url) => url,
            Err(e) => {
                warn!(file = %file.name, "preview failed: {e}");
                String::new()
            }
        };

        let entry = build_entry(id, file, index, preview, &self.options, &self.geocoder);
        debug!(file = %entry.original_name, status = %entry.status, "linked");
        ItemOutcome::Linked(Box::new(entry))
    }
}

/// Assemble the catalogue entry for one file.
pub fn build_entry<G: Geocoder>(
    id: String,
    file: SourceFile,
    index: &RowIndex<'_>,
    preview: String,
    options: &LinkOptions,
    geocoder: &G,
) -> CatalogueEntry {
    let key = naming::normalize(&file.name);
    let row = index.get(&key);

    let fields = row
        .map(|r| RowFields::extract(r, &options.aliases))
        .unwrap_or_default();
    let tags = fields.tags();
    let coordinates = if fields.location.is_empty() {
        None
    } else {
        geocoder.locate(&fields.location)
    };

    let (status, matched_id, match_reason, description) = match row {
        Some(_) => {
            let description = if fields.description.is_empty() {
                options.untitled_placeholder.clone()
            } else {
                fields.description
            };
            (MatchStatus::Matched, Some(key), "OK".to_string(), description)
        }
        None => {
            let reason = format!("no metadata row with code \"{key}\"");
            (MatchStatus::Unmatched, None, reason, String::new())
        }
    };

    CatalogueEntry {
        id,
        preview,
        original_name: file.name.clone(),
        file_size: file.size,
        source: file,
        matched_id,
        description,
        kind: fields.kind,
        location: fields.location,
        date: fields.date,
        quantity: fields.quantity,
        note: fields.note,
        coordinates,
        tags,
        status,
        match_reason,
    }
}

/// Link with the built-in gazetteer and default options.
pub async fn link(files: &[PathBuf], rows: &[Row]) -> LinkReport {
    Linker::with_options(LinkOptions::default())
        .link(files, rows)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::error::{Error, Result};
    use crate::sheet;
    use std::cell::RefCell;

    /// Previewer that fails for names in `fail_on` and records call order.
    struct StubPreviewer {
        fail_on: Vec<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl StubPreviewer {
        fn new(fail_on: Vec<&'static str>) -> Self {
            Self {
                fail_on,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PreviewGenerator for StubPreviewer {
        async fn preview(&self, file: &SourceFile, _entry_id: &str) -> Result<String> {
            self.calls.borrow_mut().push(file.name.clone());
            if self.fail_on.contains(&file.name.as_str()) {
                return Err(Error::PreviewFailed {
                    path: file.path.clone(),
                    message: "stub failure".to_string(),
                });
            }
            Ok(format!("preview://{}", file.name))
        }
    }

    fn linker(previewer: StubPreviewer) -> Linker<&'static Gazetteer, StubPreviewer> {
        Linker::new(LinkOptions::default(), Gazetteer::builtin(), previewer)
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"image bytes").unwrap();
        path
    }

    fn sample_rows() -> Vec<Row> {
        sheet::parse(
            "Код,Наименование,Тип,Локация,Дата,Количество,Примечание\n\
             almaty_01,Чаша,Керамика,г. Алматы,1975,2,Скол на крае\n\
             B-2,,Текстиль,,,,\n",
        )
    }

    #[test]
    fn test_row_index_case_insensitive_and_last_wins() {
        let rows = sheet::parse("code,name\nA1,first\n  a1 ,second\n,no code\n");
        let index = RowIndex::build(&rows, &["код", "code", "id"]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("A1").unwrap().get("name"), Some("second"));
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_row_index_uses_alias_priority() {
        let rows = sheet::parse("id,code\nby-id,by-code\n");
        let index = RowIndex::build(&rows, &["код", "code", "id"]);
        assert!(index.get("by-code").is_some());
        assert!(index.get("by-id").is_none());
    }

    #[test]
    fn test_row_fields_tags_skip_empty() {
        let fields = RowFields {
            kind: "Керамика".to_string(),
            date: "1975".to_string(),
            ..Default::default()
        };
        assert_eq!(fields.tags(), vec!["Керамика", "1975"]);
    }

    #[test]
    fn test_tags_not_deduplicated() {
        let fields = RowFields {
            kind: "x".to_string(),
            location: "x".to_string(),
            date: "x".to_string(),
            ..Default::default()
        };
        assert_eq!(fields.tags(), vec!["x", "x", "x"]);
    }

    #[tokio::test]
    async fn test_link_matched_entry_fully_enriched() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![touch(tmp.path(), "Almaty_01 (1).jpg")];
        let rows = sample_rows();

        let report = linker(StubPreviewer::new(vec![])).link(&files, &rows).await;
        assert_eq!(report.entries.len(), 1);

        let e = &report.entries[0];
        assert_eq!(e.status, MatchStatus::Matched);
        assert_eq!(e.matched_id.as_deref(), Some("Almaty_01"));
        assert_eq!(e.match_reason, "OK");
        assert_eq!(e.original_name, "Almaty_01 (1).jpg");
        assert_eq!(e.file_size, 11);
        assert_eq!(e.description, "Чаша");
        assert_eq!(e.kind, "Керамика");
        assert_eq!(e.location, "г. Алматы");
        assert_eq!(e.date, "1975");
        assert_eq!(e.quantity, "2");
        assert_eq!(e.note, "Скол на крае");
        assert_eq!(e.tags, vec!["Керамика", "г. Алматы", "1975"]);
        assert_eq!(e.coordinates, crate::geocode::lookup("алматы"));
        assert!(e.coordinates.is_some());
        assert_eq!(e.preview, "preview://Almaty_01 (1).jpg");
    }

    #[tokio::test]
    async fn test_link_matched_without_description_gets_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![touch(tmp.path(), "b-2.png")];

        let report = linker(StubPreviewer::new(vec![]))
            .link(&files, &sample_rows())
            .await;
        let e = &report.entries[0];
        assert_eq!(e.status, MatchStatus::Matched);
        assert_eq!(e.matched_id.as_deref(), Some("b-2"));
        assert_eq!(e.description, "no-title");
        assert_eq!(e.tags, vec!["Текстиль"]);
        assert_eq!(e.coordinates, None);
    }

    #[tokio::test]
    async fn test_link_unmatched_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![touch(tmp.path(), "Unknown_77 (3).jpeg")];

        let report = linker(StubPreviewer::new(vec![]))
            .link(&files, &sample_rows())
            .await;
        let e = &report.entries[0];
        assert_eq!(e.status, MatchStatus::Unmatched);
        assert_eq!(e.matched_id, None);
        assert!(e.match_reason.contains("Unknown_77"));
        assert_eq!(e.description, "");
        assert_eq!(e.location, "");
        assert!(e.tags.is_empty());
        assert_eq!(e.coordinates, None);
    }

    #[tokio::test]
    async fn test_link_rejects_non_files_and_keeps_order() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("subdir");
        std::fs::create_dir_all(&sub).unwrap();
        let files = vec![
            touch(tmp.path(), "z.jpg"),
            sub.clone(),
            tmp.path().join("missing.jpg"),
            touch(tmp.path(), "almaty_01.jpg"),
            touch(tmp.path(), "a.jpg"),
        ];

        let report = linker(StubPreviewer::new(vec![]))
            .link(&files, &sample_rows())
            .await;
        let names: Vec<&str> = report.entries.iter().map(|e| e.original_name.as_str()).collect();
        assert_eq!(names, vec!["z.jpg", "almaty_01.jpg", "a.jpg"]);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].0, sub);
        assert_eq!(report.stats, LinkStats { total: 3, matched: 1, unmatched: 2 });
    }

    #[tokio::test]
    async fn test_link_preview_failure_isolated() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![
            touch(tmp.path(), "one.jpg"),
            touch(tmp.path(), "almaty_01.jpg"),
            touch(tmp.path(), "three.jpg"),
        ];
        let previewer = StubPreviewer::new(vec!["almaty_01.jpg"]);

        let l = linker(previewer);
        let report = l.link(&files, &sample_rows()).await;
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[0].preview, "preview://one.jpg");
        assert_eq!(report.entries[1].preview, "");
        assert_eq!(report.entries[1].status, MatchStatus::Matched);
        assert_eq!(report.entries[2].preview, "preview://three.jpg");
        assert_eq!(
            *l.previewer.calls.borrow(),
            vec!["one.jpg", "almaty_01.jpg", "three.jpg"]
        );
    }

    #[tokio::test]
    async fn test_link_stats_invariant() {
        let tmp = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = ["almaty_01.jpg", "B-2.jpg", "x.jpg", "y.jpg"]
            .iter()
            .map(|n| touch(tmp.path(), n))
            .collect();

        let report = linker(StubPreviewer::new(vec![]))
            .link(&files, &sample_rows())
            .await;
        let s = report.stats;
        assert_eq!(s.total, 4);
        assert_eq!(s.matched + s.unmatched, s.total);
        assert_eq!(s.matched, 2);
        for e in &report.entries {
            assert_eq!(e.is_matched(), e.matched_id.is_some());
        }
    }

    #[tokio::test]
    async fn test_link_empty_inputs() {
        let report = linker(StubPreviewer::new(vec![])).link(&[], &[]).await;
        assert!(report.entries.is_empty());
        assert_eq!(report.stats, LinkStats::default());
    }

    #[tokio::test]
    async fn test_link_uses_custom_geocoder() {
        struct Everywhere;
        impl Geocoder for Everywhere {
            fn locate(&self, _location: &str) -> Option<Coordinates> {
                Some(Coordinates { lat: 1.0, lng: 2.0 })
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let files = vec![touch(tmp.path(), "almaty_01.jpg"), touch(tmp.path(), "B-2.jpg")];
        let l = Linker::new(LinkOptions::default(), Everywhere, StubPreviewer::new(vec![]));
        let report = l.link(&files, &sample_rows()).await;

        assert_eq!(report.entries[0].coordinates, Some(Coordinates { lat: 1.0, lng: 2.0 }));
        // Empty location is never geocoded
        assert_eq!(report.entries[1].coordinates, None);
    }

    #[tokio::test]
    async fn test_link_respects_custom_aliases() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![touch(tmp.path(), "INV-9.jpg")];
        let rows = sheet::parse("inventory,title\ninv-9,Ковёр\n");

        let mut options = LinkOptions::default();
        options.aliases.id = vec!["inventory".to_string()];
        options.aliases.description = vec!["title".to_string()];
        let l = Linker::new(options, Gazetteer::builtin(), StubPreviewer::new(vec![]));

        let report = l.link(&files, &rows).await;
        assert_eq!(report.entries[0].description, "Ковёр");
        assert_eq!(report.entries[0].matched_id.as_deref(), Some("INV-9"));
    }
}
