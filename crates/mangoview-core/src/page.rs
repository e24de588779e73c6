//! Page geometry model.
//!
//! A page is loaded wholesale from the metadata written by the OCR pipeline
//! and is immutable for as long as it is displayed. Raw metadata
//! ([`PageData`]) is validated once into a [`Page`], which also carries the
//! precomputed paragraph to cluster mapping used by double-click selection.

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::geometry::Aabb;

/// A single OCR symbol (one character) with its hit box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(rename = "aabb", alias = "box")]
    pub bounds: Aabb,
    #[serde(default)]
    pub text: String,
}

impl Symbol {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            text: String::new(),
        }
    }
}

/// One reading (kanji or kana form) of a dictionary entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    pub text: String,
    pub primary: bool,
    pub score: i32,
    pub info: Vec<String>,
}

/// Dictionary entry attached to a hint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HintResult {
    pub query: String,
    pub kanji: Vec<Reading>,
    pub kana: Vec<Reading>,
    pub gloss: Vec<String>,
    pub score: i32,
    pub conjugation: String,
}

impl HintResult {
    /// Headline for the entry: `漢字【かな】`, or whichever form exists.
    pub fn title_text(&self) -> String {
        let kanji = self.kanji.first().map(|r| r.text.as_str());
        let kana = self.kana.first().map(|r| r.text.as_str());
        match (kanji, kana) {
            (Some(k), Some(r)) => format!("{}【{}】", k, r),
            (Some(k), None) => k.to_string(),
            (None, Some(r)) => r.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Comma separated glosses.
    ///
    /// Unless `expand` is set, glosses stop being appended once the text
    /// would reach `max_len` characters.
    pub fn gloss_text(&self, max_len: usize, expand: bool) -> String {
        let mut text = String::new();
        for gloss in &self.gloss {
            if !expand && text.chars().count() + gloss.chars().count() >= max_len {
                break;
            }
            if !text.is_empty() {
                text.push_str(", ");
            }
            text.push_str(gloss);
        }
        text
    }
}

/// A dictionary span `[begin, end)` over a paragraph's symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub begin: usize,
    pub end: usize,
    #[serde(default)]
    pub results: Vec<HintResult>,
}

impl Hint {
    pub fn new(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end,
            results: Vec::new(),
        }
    }

    /// Returns true when the symbol index falls inside the span.
    pub fn covers(&self, symbol: usize) -> bool {
        symbol >= self.begin && symbol < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A run of symbols recognised as one paragraph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub text: String,
    pub symbols: Vec<Symbol>,
    /// Primary spans, offered on plain click.
    #[serde(default)]
    pub hints: Vec<Hint>,
    /// Spans reachable only by drag selection, matched by exact range.
    #[serde(default, alias = "altHints")]
    pub alt_hints: Vec<Hint>,
}

impl Paragraph {
    /// First primary hint covering `symbol`.
    pub fn hint_at(&self, symbol: usize) -> Option<usize> {
        self.hints.iter().position(|h| h.covers(symbol))
    }

    /// Alternative hint whose span is exactly `[begin, end)`.
    pub fn alt_hint_for(&self, begin: usize, end: usize) -> Option<usize> {
        self.alt_hints
            .iter()
            .position(|h| h.begin == begin && h.end == end)
    }

    /// Boxes of the symbols in `[begin, end)`, clipped to the paragraph.
    pub fn span_boxes(&self, begin: usize, end: usize) -> Vec<Aabb> {
        let end = end.min(self.symbols.len());
        let begin = begin.min(end);
        self.symbols[begin..end].iter().map(|s| s.bounds).collect()
    }
}

/// Group of paragraphs sharing one translation (typically a speech bubble).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub paragraphs: Vec<usize>,
    #[serde(rename = "aabb", alias = "box")]
    pub bounds: Aabb,
    #[serde(default)]
    pub translation: String,
}

/// Unvalidated page metadata as written by the pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageData {
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    /// Image resolution `[width, height]` in pixels.
    #[serde(default)]
    pub resolution: Option<[f64; 2]>,
}

/// Validated, immutable page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PageData", into = "PageData")]
pub struct Page {
    data: PageData,
    cluster_of: Vec<usize>,
}

impl Page {
    /// Validates raw metadata and builds the paragraph to cluster mapping.
    pub fn from_data(data: PageData) -> Result<Self, PageError> {
        for (pi, para) in data.paragraphs.iter().enumerate() {
            if let Some(si) = para.symbols.iter().position(|s| !s.bounds.is_valid()) {
                return Err(PageError::InvalidSymbolBox {
                    paragraph: pi,
                    symbol: si,
                });
            }
            let len = para.symbols.len();
            for hint in para.hints.iter().chain(para.alt_hints.iter()) {
                if hint.begin >= hint.end || hint.end > len {
                    return Err(PageError::InvalidHintRange {
                        paragraph: pi,
                        begin: hint.begin,
                        end: hint.end,
                        len,
                    });
                }
            }
        }

        let mut owner: Vec<Option<usize>> = vec![None; data.paragraphs.len()];
        for (ci, cluster) in data.clusters.iter().enumerate() {
            if !cluster.bounds.is_valid() {
                return Err(PageError::InvalidClusterBox { cluster: ci });
            }
            for &pi in &cluster.paragraphs {
                let slot = owner.get_mut(pi).ok_or(PageError::UnknownParagraph {
                    cluster: ci,
                    paragraph: pi,
                })?;
                match *slot {
                    // A cluster listing the same paragraph twice is harmless
                    Some(first) if first == ci => {}
                    Some(first) => {
                        return Err(PageError::AmbiguousCluster {
                            paragraph: pi,
                            first,
                            second: ci,
                        })
                    }
                    None => *slot = Some(ci),
                }
            }
        }

        let cluster_of = owner
            .into_iter()
            .enumerate()
            .map(|(pi, c)| c.ok_or(PageError::UnclusteredParagraph { paragraph: pi }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { data, cluster_of })
    }

    /// Parses and validates page metadata JSON.
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let page = serde_json::from_str::<PageData>(json)
            .map_err(|e| PageError::Malformed {
                reason: e.to_string(),
            })
            .and_then(Self::from_data);
        if let Err(e) = &page {
            tracing::warn!("Rejected page metadata: {}", e);
        }
        page
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.data.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.data.paragraphs.get(index)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.data.clusters
    }

    pub fn cluster(&self, index: usize) -> Option<&Cluster> {
        self.data.clusters.get(index)
    }

    /// Cluster owning the paragraph.
    pub fn cluster_of(&self, paragraph: usize) -> Option<usize> {
        self.cluster_of.get(paragraph).copied()
    }

    /// Total number of symbols on the page.
    pub fn symbol_count(&self) -> usize {
        self.data.paragraphs.iter().map(|p| p.symbols.len()).sum()
    }

    /// Width of the page image.
    ///
    /// Uses the recorded resolution, falling back to the right-most symbol
    /// edge for metadata written without one.
    pub fn image_width(&self) -> f64 {
        match self.data.resolution {
            Some([w, _]) if w > 0.0 => w,
            _ => self
                .data
                .paragraphs
                .iter()
                .flat_map(|p| p.symbols.iter())
                .map(|s| s.bounds.max.x)
                .fold(0.0, f64::max),
        }
    }

    /// Boxes of every symbol in every paragraph of the cluster.
    pub fn cluster_symbol_boxes(&self, cluster: usize) -> Vec<Aabb> {
        let Some(cluster) = self.cluster(cluster) else {
            return Vec::new();
        };
        cluster
            .paragraphs
            .iter()
            .filter_map(|&pi| self.paragraph(pi))
            .flat_map(|p| p.symbols.iter().map(|s| s.bounds))
            .collect()
    }
}

impl TryFrom<PageData> for Page {
    type Error = PageError;

    fn try_from(data: PageData) -> Result<Self, Self::Error> {
        Self::from_data(data)
    }
}

impl From<Page> for PageData {
    fn from(page: Page) -> Self {
        page.data
    }
}
