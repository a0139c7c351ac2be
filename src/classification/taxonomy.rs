use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
};

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::{Error, Res, info, success, utils::normalize_genre, warning};

/// Key and label of the bucket created when a genre is added to a class that
/// has no bucket yet.
pub const DEFAULT_BUCKET_KEY: &str = "1.0";
pub const DEFAULT_BUCKET_LABEL: &str = "Other";

/// On-disk shape of one taxonomy class.
///
/// Fields this tool does not know about are kept in `extra` and written back
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDocument {
    pub class_code: String,
    pub class_label: String,
    #[serde(default)]
    pub buckets: BTreeMap<String, String>,
    #[serde(default)]
    pub genres_by_bucket: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { bucket_key: String },
    AlreadyPresent { bucket_key: String },
}

/// A taxonomy class together with the document it was read from.
#[derive(Debug, Clone)]
pub struct GenreClass {
    document: ClassDocument,
    source: PathBuf,
    all_genres: BTreeSet<String>,
}

impl GenreClass {
    pub fn new(document: ClassDocument, source: PathBuf) -> Self {
        let mut class = Self {
            document,
            source,
            all_genres: BTreeSet::new(),
        };
        class.recompute();
        class
    }

    /// Reads and parses one class document.
    pub async fn read(path: &Path) -> Res<Self> {
        let content = async_fs::read_to_string(path).await?;
        let document: ClassDocument = serde_json::from_str(&content)?;
        Ok(Self::new(document, path.to_path_buf()))
    }

    pub fn code(&self) -> &str {
        &self.document.class_code
    }

    pub fn label(&self) -> &str {
        &self.document.class_label
    }

    pub fn buckets(&self) -> &BTreeMap<String, String> {
        &self.document.buckets
    }

    pub fn bucket_genres(&self, bucket_key: &str) -> &[String] {
        self.document
            .genres_by_bucket
            .get(bucket_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Normalized union of every bucket's genres.
    pub fn all_genres(&self) -> &BTreeSet<String> {
        &self.all_genres
    }

    /// Every genre of the class in bucket order then document order, each
    /// normalized tag once. Candidate sets are built in this order.
    pub fn genres_in_order(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.document
            .genres_by_bucket
            .values()
            .flatten()
            .map(|g| normalize_genre(g))
            .filter(|g| seen.insert(g.clone()))
            .collect()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn recompute(&mut self) {
        self.all_genres = self
            .document
            .genres_by_bucket
            .values()
            .flatten()
            .map(|g| normalize_genre(g))
            .collect();
    }

    /// Bucket used when the caller asked for automatic selection.
    fn auto_bucket(&mut self) -> String {
        if let Some(key) = self.document.genres_by_bucket.keys().next() {
            return key.clone();
        }
        if let Some(key) = self.document.buckets.keys().next() {
            return key.clone();
        }
        self.document
            .buckets
            .insert(DEFAULT_BUCKET_KEY.to_string(), DEFAULT_BUCKET_LABEL.to_string());
        DEFAULT_BUCKET_KEY.to_string()
    }

    /// Appends `genre` to a bucket in memory. Returns the outcome; the caller
    /// persists on [`AddOutcome::Added`].
    fn insert_genre(&mut self, genre: &str, bucket_key: Option<&str>) -> AddOutcome {
        let bucket_key = match bucket_key {
            Some(key) => key.to_string(),
            None => self.auto_bucket(),
        };

        let normalized = normalize_genre(genre);
        let bucket = self
            .document
            .genres_by_bucket
            .entry(bucket_key.clone())
            .or_default();

        if bucket.iter().any(|g| normalize_genre(g) == normalized) {
            return AddOutcome::AlreadyPresent { bucket_key };
        }

        bucket.push(genre.trim().to_string());
        self.recompute();
        AddOutcome::Added { bucket_key }
    }

    /// Rewrites the whole document at its source path.
    pub async fn save(&self) -> Res<()> {
        let json = serde_json::to_string_pretty(&self.document)?;
        async_fs::write(&self.source, json).await.map_err(|e| {
            Error::Taxonomy(format!("cannot write {}: {e}", self.source.display()))
        })
    }
}

/// Ordered collection of classes, keyed by label.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    classes: Vec<GenreClass>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` document of `dir`, in file name order.
    ///
    /// Documents that cannot be read or parsed are skipped with a warning.
    /// When two documents share a label the later one replaces the earlier
    /// one, and a warning names both files.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `dir` does not exist or cannot be listed.
    pub async fn load(dir: &Path) -> Res<Self> {
        let mut entries = async_fs::read_dir(dir).await.map_err(|e| {
            Error::Config(format!("cannot read taxonomy directory {}: {e}", dir.display()))
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next().await {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if async_fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                paths.push(path);
            }
        }
        paths.sort();

        info!("Loading genre classes from {}", dir.display());
        let mut taxonomy = Self::new();
        for path in paths {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match GenreClass::read(&path).await {
                Ok(class) => {
                    info!(
                        "  [{}] {} ({} genres, {} bucket(s)) <- {}",
                        class.code(),
                        class.label(),
                        class.all_genres().len(),
                        class.buckets().len(),
                        file_name
                    );
                    let label = class.label().to_string();
                    if let Some(replaced) = taxonomy.insert(class) {
                        warning!(
                            "Class label '{}' defined in {} is overridden by {}",
                            label,
                            replaced.display(),
                            file_name
                        );
                    }
                }
                Err(e) => warning!("Skipping {}: {}", file_name, e),
            }
        }

        info!("{} class(es) loaded", taxonomy.len());
        Ok(taxonomy)
    }

    /// Adds a class. A class with the same label is replaced in place; the
    /// replaced document's path is returned.
    pub fn insert(&mut self, class: GenreClass) -> Option<PathBuf> {
        match self.classes.iter_mut().find(|c| c.label() == class.label()) {
            Some(existing) => {
                let replaced = existing.source.clone();
                *existing = class;
                Some(replaced)
            }
            None => {
                self.classes.push(class);
                None
            }
        }
    }

    pub fn classes(&self) -> &[GenreClass] {
        &self.classes
    }

    pub fn get(&self, label: &str) -> Option<&GenreClass> {
        self.classes.iter().find(|c| c.label() == label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Normalized union of the genres of every class.
    pub fn known_genres(&self) -> HashSet<String> {
        self.classes
            .iter()
            .flat_map(|c| c.all_genres().iter().cloned())
            .collect()
    }

    /// Adds `genre` to a bucket of the class labelled `label` and rewrites
    /// that class's document.
    ///
    /// With `bucket_key = None` the first bucket holding genres is used, then
    /// the first declared bucket, and if the class has none a default
    /// `"1.0"` / `"Other"` bucket is created. Adding a genre the bucket
    /// already holds changes nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown label, [`Error::Taxonomy`] if the
    /// document cannot be rewritten.
    pub async fn add_genre(
        &mut self,
        label: &str,
        genre: &str,
        bucket_key: Option<&str>,
    ) -> Res<AddOutcome> {
        let class = self
            .classes
            .iter_mut()
            .find(|c| c.label() == label)
            .ok_or_else(|| Error::NotFound(format!("class '{label}'")))?;

        let before = class.document.clone();
        let outcome = class.insert_genre(genre, bucket_key);
        match &outcome {
            AddOutcome::Added { bucket_key } => {
                // memory and disk must not diverge
                if let Err(e) = class.save().await {
                    class.document = before;
                    class.recompute();
                    return Err(e);
                }
                success!(
                    "Genre '{}' added to class '{}' (bucket {}), saved to {}",
                    genre,
                    label,
                    bucket_key,
                    class.source().display()
                );
            }
            AddOutcome::AlreadyPresent { bucket_key } => {
                info!(
                    "Genre '{}' already present in class '{}' (bucket {})",
                    genre, label, bucket_key
                );
            }
        }
        Ok(outcome)
    }
}
