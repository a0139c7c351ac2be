use dialoguer::Input;

use super::{AddOutcome, GenreIndex, Taxonomy, taxonomy::GenreClass};
use crate::{info, success, warning};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGenre {
    pub genre: String,
    pub track_count: usize,
}

/// Genres of `index` that no class of `taxonomy` lists, sorted by tag.
pub fn unknown_genres(index: &GenreIndex, taxonomy: &Taxonomy) -> Vec<UnknownGenre> {
    let known = taxonomy.known_genres();
    index
        .iter()
        .filter(|(genre, _)| !known.contains(*genre))
        .map(|(genre, uris)| UnknownGenre {
            genre: genre.to_string(),
            track_count: uris.len(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketChoice {
    /// First bucket of the class, created if the class has none.
    Auto,
    Key(String),
}

/// What to do with one unknown genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip,
    /// Leave this and every remaining genre unassigned.
    Stop,
    Assign {
        class_label: String,
        bucket: BucketChoice,
    },
    /// The answer could not be understood; the genre stays unassigned.
    Invalid(String),
}

/// Source of triage decisions: a person at a terminal, a script, a policy.
pub trait DecisionProvider {
    /// Whether to triage at all, given the full list of unknown genres.
    fn confirm(&mut self, _unknown: &[UnknownGenre], _classes: &[GenreClass]) -> bool {
        true
    }

    fn resolve(&mut self, genre: &UnknownGenre, classes: &[GenreClass]) -> Decision;
}

/// Leaves every unknown genre unassigned.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipUnknown;

impl DecisionProvider for SkipUnknown {
    fn confirm(&mut self, unknown: &[UnknownGenre], _classes: &[GenreClass]) -> bool {
        info!(
            "{} unknown genre(s) left unclassified (non-interactive run)",
            unknown.len()
        );
        false
    }

    fn resolve(&mut self, _genre: &UnknownGenre, _classes: &[GenreClass]) -> Decision {
        Decision::Skip
    }
}

/// Asks on the terminal.
///
/// Classes and buckets are picked by their 1-based number in the printed
/// list; `s` skips a genre, `q` stops, `a` picks the bucket automatically.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDecisions;

impl ConsoleDecisions {
    fn ask(prompt: &str) -> Option<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .ok()
            .map(|answer| answer.trim().to_lowercase())
    }
}

impl DecisionProvider for ConsoleDecisions {
    fn confirm(&mut self, unknown: &[UnknownGenre], classes: &[GenreClass]) -> bool {
        warning!(
            "{} genre(s) found in your liked tracks match no known class:",
            unknown.len()
        );
        for (idx, u) in unknown.iter().enumerate() {
            println!("  {:3}. {} ({} track(s))", idx + 1, u.genre, u.track_count);
        }
        info!("Available classes:");
        for (idx, class) in classes.iter().enumerate() {
            println!("  {:3}. [{}] {}", idx + 1, class.code(), class.label());
        }

        match Self::ask("Classify these genres now? (y = yes, n = no, q = quit)").as_deref() {
            Some("y") | Some("yes") => true,
            Some("q") => {
                info!("Triage cancelled.");
                false
            }
            _ => {
                info!("Unknown genres ignored. Their tracks will not be classified.");
                false
            }
        }
    }

    fn resolve(&mut self, genre: &UnknownGenre, classes: &[GenreClass]) -> Decision {
        info!("Genre: {} ({} track(s))", genre.genre, genre.track_count);
        let Some(answer) = Self::ask("Class number, 's' to skip, 'q' to stop") else {
            return Decision::Invalid("no answer".to_string());
        };

        match answer.as_str() {
            "s" => return Decision::Skip,
            "q" => return Decision::Stop,
            _ => {}
        }

        let Some(class) = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| classes.get(idx))
        else {
            return Decision::Invalid(format!("'{answer}' is not a class number"));
        };

        if class.buckets().is_empty() {
            return Decision::Assign {
                class_label: class.label().to_string(),
                bucket: BucketChoice::Auto,
            };
        }

        info!("Buckets of [{}] {}:", class.code(), class.label());
        let keys: Vec<&String> = class.buckets().keys().collect();
        for (idx, key) in keys.iter().enumerate() {
            println!("  {:3}. [{}] {}", idx + 1, key, class.buckets()[*key]);
        }

        let Some(answer) = Self::ask("Bucket number, 'a' for automatic") else {
            return Decision::Invalid("no answer".to_string());
        };
        let bucket = if answer == "a" {
            BucketChoice::Auto
        } else {
            match answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| keys.get(idx))
            {
                Some(key) => BucketChoice::Key((*key).clone()),
                None => return Decision::Invalid(format!("'{answer}' is not a bucket number")),
            }
        };

        Decision::Assign {
            class_label: class.label().to_string(),
            bucket,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageReport {
    pub unknown: usize,
    /// (genre, class label, bucket key)
    pub assigned: Vec<(String, String, String)>,
    pub already_present: Vec<String>,
    pub skipped: Vec<String>,
    pub discarded: Vec<String>,
}

/// Resolves the unknown genres of `index` against `taxonomy`.
///
/// Genres are handled in sorted order. Each assignment is written to the
/// class document before the next genre is considered, so an interrupted
/// triage keeps what was decided so far. A decision that names an unknown
/// class or bucket, an unparseable answer and a failed write each discard
/// only that genre.
pub async fn triage<P: DecisionProvider + ?Sized>(
    index: &GenreIndex,
    taxonomy: &mut Taxonomy,
    provider: &mut P,
) -> TriageReport {
    let unknown = unknown_genres(index, taxonomy);
    let mut report = TriageReport {
        unknown: unknown.len(),
        ..TriageReport::default()
    };
    if unknown.is_empty() {
        return report;
    }

    if !provider.confirm(&unknown, taxonomy.classes()) {
        report.skipped = unknown.into_iter().map(|u| u.genre).collect();
        return report;
    }

    let mut pending = unknown.into_iter();
    while let Some(genre) = pending.next() {
        match provider.resolve(&genre, taxonomy.classes()) {
            Decision::Skip => {
                info!("Genre '{}' skipped.", genre.genre);
                report.skipped.push(genre.genre);
            }
            Decision::Stop => {
                report.skipped.push(genre.genre);
                report.skipped.extend(pending.by_ref().map(|u| u.genre));
                break;
            }
            Decision::Invalid(reason) => {
                warning!("Invalid answer ({}). Genre '{}' ignored.", reason, genre.genre);
                report.discarded.push(genre.genre);
            }
            Decision::Assign { class_label, bucket } => {
                let Some(class) = taxonomy.get(&class_label) else {
                    warning!("Unknown class '{}'. Genre '{}' ignored.", class_label, genre.genre);
                    report.discarded.push(genre.genre);
                    continue;
                };

                let bucket_key = match bucket {
                    BucketChoice::Auto => None,
                    BucketChoice::Key(key) if class.buckets().contains_key(&key) => Some(key),
                    BucketChoice::Key(key) => {
                        warning!(
                            "Class '{}' has no bucket '{}'. Genre '{}' ignored.",
                            class_label,
                            key,
                            genre.genre
                        );
                        report.discarded.push(genre.genre);
                        continue;
                    }
                };

                match taxonomy
                    .add_genre(&class_label, &genre.genre, bucket_key.as_deref())
                    .await
                {
                    Ok(AddOutcome::Added { bucket_key }) => {
                        report.assigned.push((genre.genre, class_label, bucket_key))
                    }
                    Ok(AddOutcome::AlreadyPresent { .. }) => report.already_present.push(genre.genre),
                    Err(e) => {
                        warning!("Could not assign '{}': {}", genre.genre, e);
                        report.discarded.push(genre.genre);
                    }
                }
            }
        }
    }

    success!(
        "Triage done: {} assigned, {} skipped, {} ignored",
        report.assigned.len(),
        report.skipped.len(),
        report.discarded.len()
    );
    report
}
