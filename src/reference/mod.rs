//! Reference documentation lookup.
//!
//! A free-text topic is scored against [`SECTION_INDEX`]; the best matching
//! sections are cut out of the bundled markdown documents and returned with a
//! source label. Lookups never fail: missing documents or headings simply drop
//! the candidate, and a query that yields nothing falls back to the topic
//! catalog.

mod index;
mod section;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Error, Result};

pub use index::{Category, DocKey, SectionEntry, SECTION_INDEX};
pub use section::{extract_section, heading_level};

/// Number of sections returned for a query.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Separator placed between returned sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Per-keyword score contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Keyword phrase appears verbatim in the query.
    pub exact_phrase: u32,
    /// A query word appears inside the keyword phrase.
    pub query_word_in_phrase: u32,
    /// A word of the keyword phrase appears inside the query.
    pub phrase_word_in_query: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_phrase: 10,
            query_word_in_phrase: 3,
            phrase_word_in_query: 1,
        }
    }
}

/// An entry that scored above zero for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate {
    /// Relevance score.
    pub score: u32,
    /// Position of the entry in the index table.
    pub position: usize,
    /// The entry itself.
    pub entry: SectionEntry,
}

#[derive(Debug)]
struct CompiledEntry {
    entry: SectionEntry,
    heading: Regex,
}

/// Keyword index over the bundled reference documents.
#[derive(Debug)]
pub struct ReferenceIndex {
    docs_dir: PathBuf,
    entries: Vec<CompiledEntry>,
    weights: ScoringWeights,
    max_results: usize,
}

impl ReferenceIndex {
    /// Index over the built-in table.
    pub fn new(docs_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_entries(docs_dir, SECTION_INDEX)
    }

    /// Index over a custom table.
    pub fn with_entries(docs_dir: impl Into<PathBuf>, entries: &[SectionEntry]) -> Result<Self> {
        let entries = entries
            .iter()
            .map(|entry| {
                Regex::new(entry.heading)
                    .map(|heading| CompiledEntry {
                        entry: *entry,
                        heading,
                    })
                    .map_err(|source| Error::InvalidPattern {
                        pattern: entry.heading.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            docs_dir: docs_dir.into(),
            entries,
            weights: ScoringWeights::default(),
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    /// Override the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Override how many sections a query returns.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Directory the documents are read from.
    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Answer a lookup. No topic (or a blank one) returns the catalog.
    pub fn lookup(&self, topic: Option<&str>) -> String {
        let topic = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => topic,
            None => return self.catalog(),
        };

        let sections = self.search(topic);
        tracing::debug!(topic, found = sections.len(), "reference lookup");

        if sections.is_empty() {
            return format!(
                "No documentation found for '{}'.\n\n{}",
                topic,
                self.catalog()
            );
        }

        sections
            .iter()
            .map(|(doc, section)| format!("**Source: {}**\n\n{}", doc.label(), section))
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }

    /// Best matching sections for `query`, in score order.
    pub fn search(&self, query: &str) -> Vec<(DocKey, String)> {
        self.rank(query)
            .into_iter()
            .take(self.max_results)
            .filter_map(|candidate| {
                let compiled = &self.entries[candidate.position];
                let content = self.load(compiled.entry.doc)?;
                let section = extract_section(&content, &compiled.heading);
                if section.is_empty() {
                    tracing::debug!(
                        doc = %compiled.entry.doc,
                        heading = compiled.entry.heading,
                        "heading not found"
                    );
                    None
                } else {
                    Some((compiled.entry.doc, section))
                }
            })
            .collect()
    }

    /// Score every entry, drop zeros, sort by score (stable), and keep the
    /// first candidate for each distinct document/heading pair.
    pub fn rank(&self, query: &str) -> Vec<ScoredCandidate> {
        let query = query.to_lowercase();
        let words: HashSet<&str> = query.split_whitespace().collect();

        let mut scored: Vec<ScoredCandidate> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(position, compiled)| {
                let score = self.score(&compiled.entry, &query, &words);
                (score > 0).then_some(ScoredCandidate {
                    score,
                    position,
                    entry: compiled.entry,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));

        let mut seen = HashSet::new();
        scored.retain(|c| seen.insert((c.entry.doc, c.entry.heading)));
        scored
    }

    fn score(&self, entry: &SectionEntry, query: &str, words: &HashSet<&str>) -> u32 {
        entry
            .keywords
            .iter()
            .map(|keyword| {
                if query.contains(keyword) {
                    self.weights.exact_phrase
                } else if words.iter().any(|w| keyword.contains(w)) {
                    self.weights.query_word_in_phrase
                } else if keyword.split_whitespace().any(|w| query.contains(w)) {
                    self.weights.phrase_word_in_query
                } else {
                    0
                }
            })
            .sum()
    }

    fn load(&self, doc: DocKey) -> Option<String> {
        let path = self.docs_dir.join(doc.file_name());
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!("skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Topic catalog, derived from the index table and grouped by category.
    pub fn catalog(&self) -> String {
        let mut out = String::from(
            "## Available BTT Reference Topics\n\nQuery any of these topics for detailed documentation:",
        );

        for category in Category::ALL {
            let lines: Vec<String> = self
                .entries
                .iter()
                .map(|c| &c.entry)
                .filter(|e| e.category == category)
                .map(|e| {
                    let topics = e
                        .topics
                        .iter()
                        .map(|t| format!("\"{}\"", t))
                        .collect::<Vec<_>>()
                        .join(" / ");
                    format!("- {} - {}", topics, e.summary)
                })
                .collect();

            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("\n\n**{}:**\n{}", category.title(), lines.join("\n")));
        }

        out
    }
}

/// Locate the bundled `docs/btt` directory: next to the executable when
/// installed, otherwise the crate's own copy.
pub fn default_docs_dir() -> PathBuf {
    let installed = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("docs").join("btt")))
        .filter(|dir| dir.is_dir());

    installed.unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("docs").join("btt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TRIGGERS: &str = "\
# Trigger Reference
intro
## Alpha
alpha body
## Beta
beta body
## Gamma
gamma body
## Delta
delta body
## Omega
omega body
";

    static ENTRIES: &[SectionEntry] = &[
        SectionEntry {
            keywords: &["alpha"],
            doc: DocKey::Triggers,
            heading: r"^## Alpha",
            category: Category::TriggerCreation,
            topics: &["alpha"],
            summary: "Alpha section",
        },
        SectionEntry {
            keywords: &["beta", "shared"],
            doc: DocKey::Triggers,
            heading: r"^## Beta",
            category: Category::TriggerCreation,
            topics: &["beta"],
            summary: "Beta section",
        },
        SectionEntry {
            keywords: &["gamma", "shared"],
            doc: DocKey::Triggers,
            heading: r"^## Gamma",
            category: Category::CliActions,
            topics: &["gamma"],
            summary: "Gamma section",
        },
        SectionEntry {
            keywords: &["delta", "shared"],
            doc: DocKey::Triggers,
            heading: r"^## Delta",
            category: Category::CliActions,
            topics: &["delta"],
            summary: "Delta section",
        },
        SectionEntry {
            keywords: &["beta again"],
            doc: DocKey::Triggers,
            heading: r"^## Beta",
            category: Category::Variables,
            topics: &["beta again"],
            summary: "Same section as beta",
        },
        SectionEntry {
            keywords: &["ghost"],
            doc: DocKey::Variables,
            heading: r"^## Ghost",
            category: Category::Variables,
            topics: &["ghost"],
            summary: "Lives in a missing document",
        },
        SectionEntry {
            keywords: &["phantom"],
            doc: DocKey::Triggers,
            heading: r"^## Phantom",
            category: Category::Variables,
            topics: &["phantom"],
            summary: "Heading that does not exist",
        },
        SectionEntry {
            keywords: &["omega point"],
            doc: DocKey::Triggers,
            heading: r"^## Omega",
            category: Category::Variables,
            topics: &["omega point"],
            summary: "Omega section",
        },
    ];

    fn fixture() -> (TempDir, ReferenceIndex) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DocKey::Triggers.file_name()), TRIGGERS).unwrap();
        let index = ReferenceIndex::with_entries(dir.path(), ENTRIES).unwrap();
        (dir, index)
    }

    #[test]
    fn test_default_table_compiles() {
        let index = ReferenceIndex::new("/nonexistent").unwrap();
        assert_eq!(index.entries.len(), SECTION_INDEX.len());
    }

    #[test]
    fn test_bundled_docs_cover_every_entry() {
        let index = ReferenceIndex::new(default_docs_dir()).unwrap();
        for doc in DocKey::ALL {
            assert!(
                index.docs_dir().join(doc.file_name()).is_file(),
                "{} is not bundled",
                doc.file_name()
            );
        }

        for compiled in &index.entries {
            let content = index.load(compiled.entry.doc).unwrap();
            let headings = content
                .split('\n')
                .filter(|line| {
                    compiled
                        .heading
                        .find(line.trim())
                        .is_some_and(|m| m.start() == 0)
                })
                .count();
            assert_eq!(headings, 1, "{} in {}", compiled.entry.heading, compiled.entry.doc);
            assert!(
                !extract_section(&content, &compiled.heading).is_empty(),
                "{} yields no section",
                compiled.entry.heading
            );
        }
    }

    #[test]
    fn test_every_topic_resolves_in_bundled_docs() {
        let index = ReferenceIndex::new(default_docs_dir()).unwrap();
        for entry in SECTION_INDEX {
            for topic in entry.topics {
                let output = index.lookup(Some(topic));
                assert!(
                    output.starts_with("**Source: "),
                    "topic {topic:?} found nothing"
                );
            }
        }
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        static BAD: &[SectionEntry] = &[SectionEntry {
            keywords: &["x"],
            doc: DocKey::Cli,
            heading: r"^## (",
            category: Category::CliActions,
            topics: &["x"],
            summary: "broken",
        }];
        let err = ReferenceIndex::with_entries("/tmp", BAD).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_exact_phrase_scores_ten() {
        let (_dir, index) = fixture();
        let ranked = index.rank("Alpha");
        assert_eq!(ranked[0].score, 10);
        assert_eq!(ranked[0].entry.heading, r"^## Alpha");
    }

    #[test]
    fn test_partial_word_scores() {
        let (_dir, index) = fixture();
        // "alp" is a query word inside the keyword "alpha".
        let ranked = index.rank("alp");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 3);

        // "beta again" only earns the one-point partial score and sits
        // behind the exact "beta" hit on the same section.
        let ranked = index.rank("betamax");
        let beta_again = ranked.iter().find(|c| c.position == 4);
        assert!(beta_again.is_none(), "deduplicated behind ## Beta");
        let beta = ranked.iter().find(|c| c.position == 1).unwrap();
        assert_eq!(beta.score, 10);
    }

    #[test]
    fn test_phrase_word_in_query_scores_one() {
        let (_dir, index) = fixture();
        // Only "point" from "omega point" occurs inside the query word.
        let ranked = index.rank("pointless");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].position, 7);
        assert_eq!(ranked[0].score, 1);
    }

    #[test]
    fn test_query_word_rule_takes_precedence() {
        let (_dir, index) = fixture();
        // "point" sits inside the phrase (3) and "omega" inside "omegas" (1);
        // a keyword earns a single contribution, the higher-priority one.
        let ranked = index.rank("point omegas");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].position, 7);
        assert_eq!(ranked[0].score, 3);

        let ranked = index.rank("omega point");
        assert_eq!(ranked[0].score, 10);
    }

    #[test]
    fn test_scores_accumulate_across_keywords() {
        let (_dir, index) = fixture();
        let ranked = index.rank("beta shared");
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[0].score, 20);
    }

    #[test]
    fn test_ties_keep_table_order() {
        let (_dir, index) = fixture();
        let positions: Vec<usize> = index.rank("shared").iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_deduplicates_same_section() {
        let (_dir, index) = fixture();
        let ranked = index.rank("beta again");
        let betas = ranked.iter().filter(|c| c.entry.heading == r"^## Beta").count();
        assert_eq!(betas, 1);
        // Both entries score 10; the earlier one wins the tie.
        assert_eq!(ranked[0].position, 1);

        let output = index.lookup(Some("beta again"));
        assert_eq!(output.matches("beta body").count(), 1);
    }

    #[test]
    fn test_top_three_cap() {
        let (_dir, index) = fixture();
        let results = index.search("alpha shared");
        assert_eq!(results.len(), 3);
        assert!(results[0].1.starts_with("## Alpha"));
        assert!(results[1].1.starts_with("## Beta"));
        assert!(results[2].1.starts_with("## Gamma"));
    }

    #[test]
    fn test_lookup_output_layout() {
        let (_dir, index) = fixture();
        let output = index.lookup(Some("alpha"));
        assert_eq!(output, "**Source: Trigger JSON Reference**\n\n## Alpha\nalpha body");

        let output = index.lookup(Some("alpha beta"));
        assert_eq!(
            output,
            "**Source: Trigger JSON Reference**\n\n## Alpha\nalpha body\
             \n\n---\n\n\
             **Source: Trigger JSON Reference**\n\n## Beta\nbeta body"
        );
    }

    #[test]
    fn test_missing_document_degrades_to_catalog() {
        let (_dir, index) = fixture();
        let output = index.lookup(Some("ghost"));
        assert!(output.starts_with("No documentation found for 'ghost'."));
        assert!(output.ends_with(&index.catalog()));
    }

    #[test]
    fn test_missing_heading_degrades_to_catalog() {
        let (_dir, index) = fixture();
        let output = index.lookup(Some("phantom"));
        assert!(output.starts_with("No documentation found for 'phantom'."));
    }

    #[test]
    fn test_no_match_lists_categories() {
        let (_dir, index) = fixture();
        let output = index.lookup(Some("zzznomatch"));
        assert!(output.contains("No documentation found"));
        for category in Category::ALL {
            assert!(output.contains(&format!("**{}:**", category.title())));
        }
    }

    #[test]
    fn test_no_topic_returns_catalog() {
        let (_dir, index) = fixture();
        assert_eq!(index.lookup(None), index.catalog());
        assert_eq!(index.lookup(Some("   ")), index.catalog());
    }

    #[test]
    fn test_catalog_layout() {
        let (_dir, index) = fixture();
        let catalog = index.catalog();
        assert!(catalog.starts_with("## Available BTT Reference Topics\n\n"));
        assert!(catalog.contains("**Trigger Creation:**\n- \"alpha\" - Alpha section\n- \"beta\" - Beta section"));
        assert!(catalog.contains("**CLI & Actions:**\n- \"gamma\" - Gamma section"));
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let (_dir, index) = fixture();
        let first = index.lookup(Some("shared delta"));
        for _ in 0..5 {
            assert_eq!(index.lookup(Some("shared delta")), first);
        }
    }

    #[test]
    fn test_custom_weights_and_cap() {
        let (_dir, index) = fixture();
        let index = index
            .with_weights(ScoringWeights {
                exact_phrase: 1,
                query_word_in_phrase: 0,
                phrase_word_in_query: 0,
            })
            .with_max_results(1);
        assert_eq!(index.rank("alpha")[0].score, 1);
        assert_eq!(index.search("shared").len(), 1);
    }
}
