//! Recursive, boundary-aware text splitter with character overlap.
//!
//! Splits normalized document text into chunks no longer than `max_size`
//! characters (Unicode scalar values), cutting at the most structurally
//! significant boundary available.
//!
//! # Algorithm
//!
//! 1. Text that already fits in `max_size` is returned as a single chunk.
//! 2. Otherwise the text is split on the first separator, in priority
//!    order, that occurs in it: paragraph break (`\n\n`), line break
//!    (`\n`), sentence end (`". "`, `"! "`, `"? "`), space, and finally
//!    any character boundary.
//! 3. Pieces that fit in the piece limit (`max_size - overlap`) are kept;
//!    larger pieces are split again with the lower-priority separators.
//! 4. Pieces are merged greedily, in order, into chunks of at most
//!    `max_size` characters. Every chunk after the first starts with the
//!    last `overlap` characters of the chunk before it.
//!
//! Separators stay attached to the end of the piece they terminate, so the
//! pieces concatenate back to the input exactly. Stripping each chunk's
//! overlap prefix and concatenating the rest reproduces the input.
//!
//! # Example
//!
//! ```rust
//! use docindex_core::chunk::TextSplitter;
//!
//! let splitter = TextSplitter::new(40, 10).unwrap();
//! let text = "First paragraph is here.\n\nSecond paragraph follows it.";
//! let chunks = splitter.split(text);
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0], "First paragraph is here.\n\n");
//! assert!(chunks.iter().all(|c| c.chars().count() <= 40));
//! ```

use crate::error::{Error, Result};

pub const DEFAULT_MAX_SIZE: usize = 500;
pub const DEFAULT_OVERLAP: usize = 100;

const SENTENCE_ENDS: [&str; 3] = [". ", "! ", "? "];

/// Split boundaries from most to least structurally significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Paragraph,
    Line,
    Sentence,
    Word,
    Char,
}

const SEPARATORS: [Separator; 5] = [
    Separator::Paragraph,
    Separator::Line,
    Separator::Sentence,
    Separator::Word,
    Separator::Char,
];

impl Separator {
    fn patterns(self) -> &'static [&'static str] {
        match self {
            Separator::Paragraph => &["\n\n"],
            Separator::Line => &["\n"],
            Separator::Sentence => &SENTENCE_ENDS,
            Separator::Word => &[" "],
            Separator::Char => &[],
        }
    }

    fn occurs_in(self, text: &str) -> bool {
        match self {
            Separator::Char => !text.is_empty(),
            _ => self.patterns().iter().any(|p| text.contains(p)),
        }
    }

    fn split(self, text: &str, limit: usize) -> Vec<&str> {
        match self {
            Separator::Char => split_every(text, limit),
            _ => split_after_any(text, self.patterns()),
        }
    }
}

/// Size-bounded splitter. Cheap to copy; holds only its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    max_size: usize,
    overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl TextSplitter {
    /// Create a splitter. Requires `max_size > 0` and `overlap < max_size`.
    pub fn new(max_size: usize, overlap: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(Error::InvalidInput("max_size must be > 0".to_string()));
        }
        if overlap >= max_size {
            return Err(Error::InvalidInput(format!(
                "overlap ({}) must be smaller than max_size ({})",
                overlap, max_size
            )));
        }
        Ok(Self { max_size, overlap })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into ordered, overlapping chunks.
    ///
    /// Empty text yields no chunks. Text of at most `max_size` characters
    /// yields exactly one chunk equal to the input.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.max_size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        split_recursive(text, 0, self.max_size - self.overlap, &mut pieces);
        self.merge(&pieces)
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut prefix = String::new();
        let mut prefix_len = 0usize;
        let mut content = String::new();
        let mut content_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(piece);
            if content_len > 0 && prefix_len + content_len + piece_len > self.max_size {
                let chunk = format!("{}{}", prefix, content);
                prefix = tail(&chunk, self.overlap).to_string();
                prefix_len = char_len(&prefix);
                chunks.push(chunk);
                content.clear();
                content_len = 0;
            }
            content.push_str(piece);
            content_len += piece_len;
        }

        if content_len > 0 {
            chunks.push(format!("{}{}", prefix, content));
        }

        chunks
    }
}

/// Split with an explicit size and overlap, validating both.
pub fn split_text(text: &str, max_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(TextSplitter::new(max_size, overlap)?.split(text))
}

fn split_recursive<'a>(text: &'a str, level: usize, limit: usize, out: &mut Vec<&'a str>) {
    if char_len(text) <= limit {
        out.push(text);
        return;
    }

    for (i, separator) in SEPARATORS.iter().enumerate().skip(level) {
        if !separator.occurs_in(text) {
            continue;
        }
        for piece in separator.split(text, limit) {
            if char_len(piece) <= limit {
                out.push(piece);
            } else {
                split_recursive(piece, i + 1, limit, out);
            }
        }
        return;
    }
}

/// Split after every occurrence of any pattern, keeping the pattern on the
/// left-hand piece. Patterns are ASCII.
fn split_after_any<'a>(text: &'a str, patterns: &[&str]) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match patterns.iter().find(|p| bytes[i..].starts_with(p.as_bytes())) {
            Some(p) => {
                i += p.len();
                pieces.push(&text[start..i]);
                start = i;
            }
            None => i += 1,
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Hard split into windows of `limit` characters.
fn split_every(text: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == limit {
            pieces.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The last `n` characters of `s` (all of `s` if it is shorter).
fn tail(s: &str, n: usize) -> &str {
    let len = char_len(s);
    if len <= n {
        return s;
    }
    match s.char_indices().nth(len - n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Undo the overlap: drop each chunk's copy of its predecessor's tail.
    fn reconstruct(chunks: &[String], overlap: usize) -> String {
        let mut out = String::new();
        let mut prev: Option<&str> = None;
        for chunk in chunks {
            match prev {
                None => out.push_str(chunk),
                Some(p) => {
                    let dup = tail(p, overlap);
                    assert!(
                        chunk.starts_with(dup),
                        "chunk {:?} does not start with {:?}",
                        chunk,
                        dup
                    );
                    out.push_str(&chunk[dup.len()..]);
                }
            }
            prev = Some(chunk);
        }
        out
    }

    fn paragraphs(count: usize) -> String {
        (0..count)
            .map(|i| {
                format!(
                    "Paragraph {} talks about ingestion. It has two sentences that pad it out to a realistic length for a chunking test, more or less.",
                    i
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_empty_text() {
        assert!(split_text("", 500, 100).unwrap().is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("Hello, world!", 500, 100).unwrap();
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_exactly_max_size_single_chunk() {
        let text = "x".repeat(500);
        let chunks = TextSplitter::default().split(&text);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_whitespace_only_short_text_is_kept() {
        assert_eq!(TextSplitter::default().split("  "), vec!["  ".to_string()]);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            TextSplitter::new(100, 100),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            TextSplitter::new(100, 150),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(TextSplitter::new(0, 0), Err(Error::InvalidInput(_))));
        assert!(TextSplitter::new(1, 0).is_ok());
    }

    #[test]
    fn test_defaults() {
        let splitter = TextSplitter::default();
        assert_eq!(splitter.max_size(), 500);
        assert_eq!(splitter.overlap(), 100);
    }

    #[test]
    fn test_chunks_respect_max_size() {
        let text = paragraphs(40);
        for (max, overlap) in [(500, 100), (200, 50), (64, 16), (30, 0), (10, 9)] {
            let chunks = split_text(&text, max, overlap).unwrap();
            assert!(chunks.len() > 1);
            for c in &chunks {
                assert!(
                    char_len(c) <= max,
                    "chunk of {} chars exceeds {}",
                    char_len(c),
                    max
                );
            }
        }
    }

    #[test]
    fn test_overlap_removal_reconstructs_text() {
        let text = paragraphs(25);
        for (max, overlap) in [(500, 100), (120, 30), (50, 0), (17, 5)] {
            let chunks = split_text(&text, max, overlap).unwrap();
            assert_eq!(reconstruct(&chunks, overlap), text);
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = paragraphs(10);
        let chunks = split_text(&text, 500, 100).unwrap();
        assert!(chunks[0].ends_with("\n\n"));
        assert!(chunks[0].starts_with("Paragraph 0"));
        // Overlap is taken from the tail of the previous chunk.
        assert!(chunks[1].starts_with(tail(&chunks[0], 100)));
    }

    #[test]
    fn test_falls_back_to_sentences_then_words() {
        let sentence = "Short words only here. ";
        let text = sentence.repeat(12);
        let chunks = split_text(&text, 60, 10).unwrap();
        assert!(chunks.len() > 1);
        // Without any newline the first chunk ends at a sentence boundary.
        assert!(chunks[0].ends_with(". "));
        assert_eq!(reconstruct(&chunks, 10), text);
    }

    #[test]
    fn test_unbroken_run_is_hard_split() {
        let text = "a".repeat(1234);
        let chunks = split_text(&text, 100, 20).unwrap();
        assert!(chunks.iter().all(|c| char_len(c) <= 100));
        assert_eq!(reconstruct(&chunks, 20), text);
    }

    #[test]
    fn test_multibyte_characters_counted_as_chars() {
        let text = "日本語のテキストé ".repeat(80);
        let chunks = split_text(&text, 50, 10).unwrap();
        for c in &chunks {
            assert!(char_len(c) <= 50);
        }
        assert_eq!(reconstruct(&chunks, 10), text);
    }

    #[test]
    fn test_zero_overlap_concatenates() {
        let text = paragraphs(12);
        let chunks = split_text(&text, 300, 0).unwrap();
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_deterministic() {
        let text = paragraphs(15);
        let a = split_text(&text, 150, 30).unwrap();
        let b = split_text(&text, 150, 30).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_after_any_keeps_separators() {
        let pieces = split_after_any("One. Two! Three? Four", &SENTENCE_ENDS);
        assert_eq!(pieces, vec!["One. ", "Two! ", "Three? ", "Four"]);
        assert_eq!(split_after_any("a\n\nb\n\n", &["\n\n"]), vec!["a\n\n", "b\n\n"]);
    }

    #[test]
    fn test_split_every() {
        assert_eq!(split_every("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(split_every("ééé", 2), vec!["éé", "é"]);
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("hello", 3), "llo");
        assert_eq!(tail("hi", 3), "hi");
        assert_eq!(tail("日本語", 1), "語");
        assert_eq!(tail("abc", 0), "");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Text built from the fragments extracted documents are made of:
        /// words, whitespace runs, control and zero-width characters,
        /// combining marks, and multibyte scripts.
        fn messy_text() -> impl Strategy<Value = String> {
            let fragment = prop_oneof![
                "[a-zA-Z]{1,8}",
                prop::sample::select(vec![
                    " ", "  ", "\n", "\n\n\n", "\t", "\r\n", ". ", "? ", "\u{0}", "\u{7}",
                    "\u{200b}", "\u{200d}", "\u{feff}", "e\u{301}", "\u{301}", "\u{308}",
                    "日本語", "🦀",
                ])
                .prop_map(str::to_string),
            ];
            prop::collection::vec(fragment, 0..120).prop_map(|parts| parts.concat())
        }

        /// `(max_size, overlap)` with `overlap < max_size`.
        fn sizes() -> impl Strategy<Value = (usize, usize)> {
            (1usize..60).prop_flat_map(|max| (Just(max), 0..max))
        }

        fn check_chunks(
            text: &str,
            max: usize,
            overlap: usize,
        ) -> std::result::Result<(), TestCaseError> {
            let chunks = TextSplitter::new(max, overlap).unwrap().split(text);
            prop_assert_eq!(chunks.is_empty(), text.is_empty());

            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                prop_assert!(
                    char_len(chunk) <= max,
                    "{} chars in {:?}, max {}",
                    char_len(chunk),
                    chunk,
                    max
                );
            }
            for pair in chunks.windows(2) {
                prop_assert!(pair[1].starts_with(tail(&pair[0], overlap)));
            }

            prop_assert_eq!(reconstruct(&chunks, overlap), text);
            Ok(())
        }

        proptest! {
            #[test]
            fn chunks_respect_bounds_and_rebuild_input(
                text in messy_text(),
                (max, overlap) in sizes(),
            ) {
                check_chunks(&text, max, overlap)?;
            }

            #[test]
            fn chunks_of_any_string(text in any::<String>(), (max, overlap) in sizes()) {
                check_chunks(&text, max, overlap)?;
            }

            #[test]
            fn chunks_of_normalized_text(text in messy_text(), (max, overlap) in sizes()) {
                check_chunks(&crate::normalize(&text), max, overlap)?;
            }

            #[test]
            fn splitting_is_deterministic(text in messy_text(), (max, overlap) in sizes()) {
                let splitter = TextSplitter::new(max, overlap).unwrap();
                prop_assert_eq!(splitter.split(&text), splitter.split(&text));
            }
        }
    }
}
