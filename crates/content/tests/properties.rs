use std::collections::HashSet;

use folio_content::reading_time::minutes_for_words;
use folio_content::{ContentProcessor, RenderPath, reading_time_minutes};
use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};

fn runner(cases: u32) -> TestRunner {
    TestRunner::new(Config {
        cases,
        failure_persistence: None,
        ..Config::default()
    })
}

fn headings_strategy() -> impl Strategy<Value = Vec<(u8, String)>> {
    proptest::collection::vec((2u8..=3, "[A-Za-z0-9 ?&]{1,20}"), 1..8)
}

fn document(headings: &[(u8, String)]) -> String {
    headings
        .iter()
        .map(|(level, text)| {
            format!(
                "<h{level}>{}</h{level}><p>Some body text.</p>",
                text.replace('&', "&amp;")
            )
        })
        .collect()
}

#[test]
fn heading_id_injection_is_idempotent() {
    let processor = ContentProcessor::new().unwrap();

    runner(32)
        .run(&headings_strategy(), |headings| {
            let html = document(&headings);
            let once = processor.inject_heading_ids(&html);
            let twice = processor.inject_heading_ids(&once);
            prop_assert_eq!(once, twice);
            Ok(())
        })
        .unwrap();
}

#[test]
fn injected_ids_are_unique() {
    let processor = ContentProcessor::new().unwrap();

    runner(32)
        .run(&headings_strategy(), |headings| {
            let html = processor.inject_heading_ids(&document(&headings));
            let toc = processor.table_of_contents(&html);

            let ids: HashSet<&str> = toc.iter().map(|e| e.id.as_str()).collect();
            prop_assert_eq!(ids.len(), toc.len());
            Ok(())
        })
        .unwrap();
}

#[test]
fn toc_follows_document_order() {
    let processor = ContentProcessor::new().unwrap();

    runner(32)
        .run(&headings_strategy(), |headings| {
            let expected: Vec<(u8, String)> = headings
                .iter()
                .filter_map(|(level, text)| {
                    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    (!text.is_empty()).then_some((*level, text))
                })
                .collect();

            let out = processor.process(None, &document(&headings));
            let actual: Vec<(u8, String)> =
                out.toc.iter().map(|e| (e.level, e.text.clone())).collect();

            prop_assert_eq!(actual, expected);
            Ok(())
        })
        .unwrap();
}

#[test]
fn reading_time_is_monotonic_in_word_count() {
    runner(64)
        .run(&(0usize..20_000, 0usize..2_000), |(words, extra)| {
            prop_assert!(minutes_for_words(words) <= minutes_for_words(words + extra));
            Ok(())
        })
        .unwrap();
}

#[test]
fn reading_time_matches_formula_on_html() {
    runner(32)
        .run(&(0usize..1_500), |words| {
            let html = format!("<article><p>{}</p></article>", "lorem ".repeat(words));
            let expected = words.div_ceil(200) as u32;
            prop_assert_eq!(reading_time_minutes(&html), expected);
            Ok(())
        })
        .unwrap();
}

#[test]
fn broken_block_markup_always_falls_back() {
    let processor = ContentProcessor::new().unwrap();

    runner(32)
        .run(&"[a-z]{1,12}", |name| {
            let broken = format!("<!-- wp:{name} --><p>never closed</p>");
            let out = processor.process(Some(&broken), "<h2>Rendered</h2>");
            prop_assert_eq!(out.path, RenderPath::Fallback);
            prop_assert_eq!(out.toc.len(), 1);
            Ok(())
        })
        .unwrap();
}
