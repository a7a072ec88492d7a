//! Recursive character splitting.
//!
//! Text is split on the coarsest separator present; pieces still larger than
//! the chunk size are split again with the finer separators. Neighbouring
//! pieces are then merged back up to the chunk size, carrying up to
//! `chunk_overlap` characters of trailing context into the next chunk.
//! Sizes are measured in characters.

use super::DocumentChunk;
use crate::config::ChunkingSettings;
use crate::error::{PdfChatError, Result};
use crate::pdf::Page;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Recursive character text splitter.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter. The overlap must be smaller than the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize, separators: Vec<String>) -> Result<Self> {
        if chunk_size == 0 {
            return Err(PdfChatError::Config("chunk_size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(PdfChatError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators,
        })
    }

    /// Create a splitter from configuration.
    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(
            settings.chunk_size,
            settings.chunk_overlap,
            settings.separators.clone(),
        )
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split every page separately; chunks never span pages.
    pub fn split_pages(&self, pages: &[Page]) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();

        for page in pages {
            for content in self.split_text(&page.text) {
                let order = chunks.len() as i32;
                chunks.push(DocumentChunk::new(
                    content,
                    page.source.clone(),
                    page.number,
                    order,
                ));
            }
        }

        debug!("Split {} pages into {} chunks", pages.len(), chunks.len());
        chunks
    }

    /// Split a text into chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];

        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, self.chunk_size
                    );
                }

                if !window.is_empty() {
                    if let Some(chunk) = join(&window) {
                        merged.push(chunk);
                    }

                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match window.pop_front() {
                            Some(first) => total -= char_len(first),
                            None => break,
                        }
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        if let Some(chunk) = join(&window) {
            merged.push(chunk);
        }

        merged
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join(window: &VecDeque<&str>) -> Option<String> {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split on `separator`, keeping each separator at the start of the piece it precedes.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(|c| c.to_string()).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(text[start..idx].to_string());
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(text[start..].to_string());
    }

    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize, separators: &[&str]) -> RecursiveCharacterSplitter {
        RecursiveCharacterSplitter::new(
            size,
            overlap,
            separators.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    fn default_separators() -> Vec<&'static str> {
        vec!["\n\n", "\n", ".", " ", ""]
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let s = splitter(100, 10, &default_separators());
        assert_eq!(s.split_text("  Korte tekst.  "), vec!["Korte tekst."]);
    }

    #[test]
    fn test_overlap_carries_trailing_words() {
        let s = splitter(10, 4, &[" ", ""]);
        let chunks = s.split_text("one two three four five");
        assert_eq!(chunks, vec!["one two", "two three", "four five"]);
    }

    #[test]
    fn test_prefers_paragraph_separator() {
        let s = splitter(12, 0, &default_separators());
        let chunks = s.split_text("para one\n\npara two");
        assert_eq!(chunks, vec!["para one", "para two"]);
    }

    #[test]
    fn test_recurses_into_oversized_pieces() {
        let s = splitter(6, 0, &default_separators());
        let chunks = s.split_text("aaaa bbbb\n\ncc");
        assert_eq!(chunks, vec!["aaaa", "bbbb", "cc"]);
    }

    #[test]
    fn test_falls_back_to_characters() {
        let s = splitter(4, 0, &default_separators());
        let chunks = s.split_text("abcdefghij");
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunks_respect_size_on_long_text() {
        let s = splitter(50, 10, &default_separators());
        let text = "De inschrijver levert een plan van aanpak. ".repeat(40);
        let chunks = s.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let s = splitter(5, 0, &[""]);
        let chunks = s.split_text("ëëëëëëë");
        assert_eq!(chunks, vec!["ëëëëë", "ëë"]);
    }

    #[test]
    fn test_split_pages_keeps_page_metadata() {
        let s = splitter(100, 0, &default_separators());
        let pages = vec![
            Page {
                source: "bestek.pdf".to_string(),
                number: 1,
                text: "Inleiding".to_string(),
            },
            Page {
                source: "bestek.pdf".to_string(),
                number: 2,
                text: "   ".to_string(),
            },
            Page {
                source: "bestek.pdf".to_string(),
                number: 3,
                text: "Eisen".to_string(),
            },
        ];

        let chunks = s.split_pages(&pages);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page, 1);
        assert_eq!(chunks[1].page, 3);
        assert_eq!(chunks[1].order, 1);
        assert_eq!(chunks[1].source, "bestek.pdf");
    }

    #[test]
    fn test_from_settings_uses_configured_sizes() {
        let s = RecursiveCharacterSplitter::from_settings(&ChunkingSettings::default()).unwrap();
        assert_eq!(s.chunk_size(), 16000);
        assert_eq!(s.chunk_overlap(), 3200);
    }

    #[test]
    fn test_rejects_overlap_not_below_size() {
        assert!(RecursiveCharacterSplitter::new(10, 10, vec![]).is_err());
        assert!(RecursiveCharacterSplitter::new(0, 0, vec![]).is_err());
    }
}
