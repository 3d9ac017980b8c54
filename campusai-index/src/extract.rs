//! HTML text extraction and chunking
//!
//! Build-time helpers: pull readable text out of fetched pages and split it
//! into fixed-size overlapping chunks for embedding.

use scraper::{Html, Selector};

/// Content-bearing block tags collected from a page. Script, style and other
/// non-content tags are never selected, so their text stays out of the index.
const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "td", "blockquote",
];

/// Extract readable text from an HTML document. Block elements are collected
/// in document order with collapsed whitespace.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").expect("body selector");

    let root = match document.select(&body_selector).next() {
        Some(body) => body,
        None => document.root_element(),
    };

    let mut blocks: Vec<String> = Vec::new();
    for element in root.descendent_elements() {
        if !BLOCK_TAGS.contains(&element.value().name()) {
            continue;
        }
        // Skip containers that hold other block tags so nested text is not
        // collected twice.
        let nests_blocks = element.descendent_elements().any(|child| {
            child.id() != element.id() && BLOCK_TAGS.contains(&child.value().name())
        });
        if nests_blocks {
            continue;
        }
        let text = collapse_whitespace(&element.text().collect::<String>());
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    blocks.join("\n")
}

/// Split text into chunks of at most `size` characters, consecutive chunks
/// sharing `overlap` characters. Both are build-time constants; `overlap`
/// must be smaller than `size`. Operates on char boundaries so multi-byte
/// text never splits mid-character.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    assert!(size > 0, "chunk size must be > 0");
    assert!(overlap < size, "overlap must be smaller than chunk size");

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

fn collapse_whitespace(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    while buf.ends_with(' ') {
        buf.pop();
    }
    buf
}
