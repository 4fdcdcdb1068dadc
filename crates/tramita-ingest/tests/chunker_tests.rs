use tramita_ingest::TextSplitter;

/// 300 distinct 4-char words joined by single spaces, the shape normalized
/// text actually has.
fn word_soup() -> String {
    (0..300)
        .map(|i| format!("w{i:03}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Longest suffix of `a` that is a prefix of `b`, in characters.
fn shared_overlap(a: &str, b: &str) -> usize {
    let max = a.chars().count().min(b.chars().count());
    (1..=max)
        .rev()
        .find(|&n| {
            let suffix: String = a.chars().skip(a.chars().count() - n).collect();
            b.starts_with(&suffix)
        })
        .unwrap_or(0)
}

#[test]
fn empty_input_yields_no_chunks() {
    let splitter = TextSplitter::new(100, 20);
    assert!(splitter.split("").is_empty());
}

#[test]
fn every_chunk_respects_the_size_bound() {
    let splitter = TextSplitter::new(100, 20);
    let text = word_soup();
    let chunks = splitter.split(&text);
    assert!(chunks.len() > 1, "expected the text to be split");
    for chunk in &chunks {
        assert!(
            chunk.chars().count() <= 100,
            "chunk exceeds bound: {} chars",
            chunk.chars().count()
        );
    }
}

#[test]
fn consecutive_chunks_share_trailing_context() {
    let splitter = TextSplitter::new(100, 20);
    let text = word_soup();
    let chunks = splitter.split(&text);
    assert!(chunks.len() > 2);
    for pair in chunks.windows(2) {
        let overlap = shared_overlap(&pair[0], &pair[1]);
        assert!(overlap > 0, "no overlap between consecutive chunks");
        assert!(overlap <= 20, "overlap {overlap} exceeds the configured budget");
    }
}

#[test]
fn chunks_cover_the_input_without_gaps() {
    let splitter = TextSplitter::new(100, 20);
    let text = word_soup();
    let chunks = splitter.split(&text);

    // Each chunk must be a contiguous substring; spans must start at the
    // beginning, overlap or touch their predecessor, and reach the end.
    let mut search_from = 0usize;
    let mut prev_end = 0usize;
    for (i, chunk) in chunks.iter().enumerate() {
        let start = text[search_from..]
            .find(chunk.as_str())
            .map(|p| p + search_from)
            .unwrap_or_else(|| panic!("chunk {i} is not a substring of the input"));
        if i == 0 {
            assert_eq!(start, 0, "first chunk must start the text");
        } else {
            assert!(
                start <= prev_end + 1,
                "gap before chunk {i}: starts at {start}, previous ended at {prev_end}"
            );
        }
        prev_end = start + chunk.len();
        search_from = start + 1;
    }
    assert_eq!(prev_end, text.len(), "last chunk must reach the end of the text");
}

#[test]
fn paragraph_breaks_take_priority_over_spaces() {
    let splitter = TextSplitter::new(20, 0);
    let chunks = splitter.split("Parrafo uno.\n\nParrafo dos.");
    assert_eq!(chunks, vec!["Parrafo uno.", "Parrafo dos."]);
}

#[test]
fn small_paragraphs_merge_with_their_separator() {
    let splitter = TextSplitter::new(30, 0);
    let chunks = splitter.split("Parrafo uno.\n\nParrafo dos.");
    assert_eq!(chunks, vec!["Parrafo uno.\n\nParrafo dos."]);
}

#[test]
fn oversized_token_is_emitted_as_is_without_last_resort_separator() {
    let splitter = TextSplitter::with_separators(10, 0, vec![" ".to_string()]);
    let chunks = splitter.split("supercalifragilistico breve");
    assert_eq!(chunks, vec!["supercalifragilistico", "breve"]);
}

#[test]
fn last_resort_separator_splits_inside_long_tokens() {
    let splitter = TextSplitter::new(10, 0);
    let token: String = "x".repeat(25);
    let chunks = splitter.split(&token);
    assert!(chunks.len() >= 3);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 10);
    }
    assert_eq!(chunks.concat(), token);
}

#[test]
fn multibyte_text_counts_characters_not_bytes() {
    let word = "año"; // 3 chars, 4 bytes
    let text = vec![word; 50].join(" ");
    let splitter = TextSplitter::new(20, 4);
    for chunk in splitter.split(&text) {
        assert!(chunk.chars().count() <= 20);
    }
}

#[test]
fn fragments_carry_source_and_sequential_ids() {
    let splitter = TextSplitter::new(100, 20);
    let text = word_soup();
    let fragments = splitter.fragment(&text, "guia_ayudas");
    assert!(fragments.len() > 1);
    for (i, fragment) in fragments.iter().enumerate() {
        assert_eq!(fragment.metadata.source, "guia_ayudas");
        assert_eq!(fragment.metadata.chunk_id, i);
        assert!(!fragment.text.is_empty());
    }
}
