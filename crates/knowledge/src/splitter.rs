//! Sentence-aware text splitting.
//!
//! Text is cut into sentences (CJK and Latin terminators, plus line
//! breaks), then sentences are packed greedily into chunks of at most
//! `chunk_size` characters. Each new chunk starts with the trailing
//! sentences of the previous one, up to `chunk_overlap` characters, so a
//! rule that straddles a boundary is still retrievable from either side.

use serde::{Deserialize, Serialize};

use crate::loader::Document;

/// A contiguous piece of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub document_id: String,
    /// Zero-based position within the document
    pub index: usize,
    pub content: String,
}

const TERMINATORS: &[char] = &['。', '！', '？', '；', '!', '?', ';', '.', '\n'];

/// Splits documents into overlapping, sentence-aligned chunks.
#[derive(Debug, Clone, Copy)]
pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceSplitter {
    /// Sizes are in characters. Overlap is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chunk {
                document_id: document.id.clone(),
                index,
                content,
            })
            .collect()
    }

    /// Split raw text into chunk strings.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0;

        for piece in self.pieces(text) {
            let len = piece.chars().count();

            if current_len + len > self.chunk_size && !current.is_empty() {
                push_chunk(&mut chunks, &current);

                let (carried, carried_len) = self.overlap_tail(&current);
                if carried_len + len > self.chunk_size {
                    current = Vec::new();
                    current_len = 0;
                } else {
                    current = carried;
                    current_len = carried_len;
                }
            }

            current.push(piece);
            current_len += len;
        }

        if !current.is_empty() {
            push_chunk(&mut chunks, &current);
        }
        chunks
    }

    /// Trailing pieces whose combined length fits in the overlap budget.
    fn overlap_tail(&self, pieces: &[String]) -> (Vec<String>, usize) {
        let mut carried = Vec::new();
        let mut carried_len = 0;
        for piece in pieces.iter().rev() {
            let len = piece.chars().count();
            if carried_len + len > self.chunk_overlap {
                break;
            }
            carried_len += len;
            carried.push(piece.clone());
        }
        carried.reverse();
        (carried, carried_len)
    }

    /// Sentences, with any sentence longer than `chunk_size` hard-cut.
    fn pieces(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        for sentence in sentences(text) {
            let chars: Vec<char> = sentence.chars().collect();
            if chars.len() <= self.chunk_size {
                pieces.push(sentence.to_string());
            } else {
                pieces.extend(chars.chunks(self.chunk_size).map(|w| w.iter().collect::<String>()));
            }
        }
        pieces
    }
}

fn push_chunk(chunks: &mut Vec<String>, pieces: &[String]) {
    let content = pieces.concat().trim().to_string();
    if !content.is_empty() {
        chunks.push(content);
    }
}

/// Cut text after each terminator, dropping whitespace-only fragments.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if TERMINATORS.contains(&c) {
            let end = i + c.len_utf8();
            let sentence = &text[start..end];
            if !sentence.trim().is_empty() {
                out.push(sentence);
            }
            start = end;
        }
    }
    let rest = &text[start..];
    if !rest.trim().is_empty() {
        out.push(rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let splitter = SentenceSplitter::new(500, 50);
        let doc = Document::new("leave_policy", "特休依年資計算。事假每年十四天。");
        let chunks = splitter.split(&doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].document_id, "leave_policy");
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].content, "特休依年資計算。事假每年十四天。");
    }

    #[test]
    fn chunks_respect_size_limit() {
        let splitter = SentenceSplitter::new(20, 5);
        let text = "第一條規定內容。第二條規定內容。第三條規定內容。第四條規定內容。";
        let chunks = splitter.split_text(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20, "chunk too long: {chunk}");
        }
    }

    #[test]
    fn overlap_carries_trailing_sentence() {
        // Each sentence is 6 chars; budget fits two, overlap fits one
        let splitter = SentenceSplitter::new(12, 6);
        let chunks = splitter.split_text("甲甲甲甲甲。乙乙乙乙乙。丙丙丙丙丙。");
        assert_eq!(chunks, vec!["甲甲甲甲甲。乙乙乙乙乙。", "乙乙乙乙乙。丙丙丙丙丙。"]);
    }

    #[test]
    fn long_sentence_is_hard_split() {
        let splitter = SentenceSplitter::new(10, 0);
        let text = "一".repeat(25);
        let chunks = splitter.split_text(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].chars().count(), 5);
    }

    #[test]
    fn newlines_are_boundaries_and_blank_lines_dropped() {
        let parts = sentences("第一行\n\n第二行");
        assert_eq!(parts, vec!["第一行\n", "第二行"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        let splitter = SentenceSplitter::new(500, 50);
        assert!(splitter.split_text("   \n ").is_empty());
    }

    #[test]
    fn overlap_is_clamped_below_chunk_size() {
        let splitter = SentenceSplitter::new(10, 50);
        let chunks = splitter.split_text("一二三四五六七八。一二三四五六七八。");
        assert_eq!(chunks, vec!["一二三四五六七八。", "一二三四五六七八。"]);
    }
}
