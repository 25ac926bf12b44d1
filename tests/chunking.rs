//! Property tests: decoding does not depend on how the stream is chunked

use std::convert::Infallible;

use lpt_spool::{LineAssembler, PageState};
use proptest::prelude::*;

fn line() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::sample::select(vec![b' ', b'1', b'0', b'C', b'+', b'X']),
        prop::collection::vec(b'a'..=b'z', 0..20),
    )
        .prop_map(|(control, text)| {
            let mut line = vec![control];
            line.extend(text);
            line.push(b'\n');
            line
        })
}

fn listing() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(line(), 0..40).prop_map(|lines| lines.concat())
}

/// Decode `input` split at `cuts`, returning the lines seen and the output
fn decode(input: &[u8], cuts: &[usize]) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut points: Vec<usize> = cuts.iter().map(|&c| c % (input.len() + 1)).collect();
    points.push(0);
    points.push(input.len());
    points.sort_unstable();
    points.dedup();

    let mut assembler = LineAssembler::new();
    let mut page = PageState::new();
    let mut lines = Vec::new();
    let mut out = Vec::new();

    for window in points.windows(2) {
        assembler
            .feed::<_, Infallible>(&input[window[0]..window[1]], |line| {
                lines.push(line.to_vec());
                if let Some(text) = page.decode(line, 60) {
                    out.extend_from_slice(&text);
                }
                Ok(true)
            })
            .unwrap();
    }
    (lines, out)
}

proptest! {
    #[test]
    fn prop_chunking_transparent(input in listing(), cuts in prop::collection::vec(any::<usize>(), 0..16)) {
        prop_assert_eq!(decode(&input, &cuts), decode(&input, &[]));
    }

    #[test]
    fn prop_advance_never_overshoots(lines in 0u32..120, lines_per_page in 40u32..=80) {
        let mut page = PageState::new();
        for _ in 0..lines {
            page.decode(b" x", lines_per_page);
        }
        let text = page.decode(b"C", lines_per_page).unwrap();
        prop_assert_eq!(text.len() as u32, lines_per_page.saturating_sub(lines));
        prop_assert_eq!(page.line_count, lines_per_page);
    }
}
