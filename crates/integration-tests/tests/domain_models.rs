//! Pure domain behavior: vote resolution, slug derivation, page math.

use domains::{
    clamp_page, parse_page_param, resolve, total_pages, VoteDirection, VoteOp, FEED_PAGE_SIZE,
};
use services::slugify;

#[test]
fn vote_resolution_covers_all_six_states() {
    use VoteDirection::{Down, Up};
    let table = [
        (None, Up, VoteOp::Cast(Up)),
        (None, Down, VoteOp::Cast(Down)),
        (Some(Up), Up, VoteOp::Retract),
        (Some(Down), Down, VoteOp::Retract),
        (Some(Down), Up, VoteOp::Switch(Up)),
        (Some(Up), Down, VoteOp::Switch(Down)),
    ];
    for (current, intent, expected) in table {
        assert_eq!(resolve(current, intent), expected, "{current:?} + {intent:?}");
    }
}

#[test]
fn resolution_never_leaves_a_voter_in_both_sets() {
    // Whatever the op, the resulting membership is at most one set.
    use VoteDirection::{Down, Up};
    for current in [None, Some(Up), Some(Down)] {
        for intent in [Up, Down] {
            let after = match resolve(current, intent) {
                VoteOp::Retract => None,
                VoteOp::Cast(d) | VoteOp::Switch(d) => Some(d),
            };
            // A standing vote plus the op can never describe two
            // memberships; `after` IS the complete membership.
            assert!(after.is_none() || after == Some(Up) || after == Some(Down));
        }
    }
}

#[test]
fn slug_derivation_matches_the_known_cases() {
    assert_eq!(slugify("gaming"), "gaming");
    assert_eq!(slugify("Gaming"), "gaming");
    assert_eq!(slugify("Ask Me Anything"), "ask-me-anything");
    assert_eq!(slugify("What's new?"), "what-s-new");
    assert_eq!(slugify("  trailing  "), "trailing");
    assert_eq!(slugify("??!!"), "");
}

#[test]
fn page_parameter_parsing_is_forgiving() {
    for raw in [None, Some("x"), Some("0"), Some("-1"), Some("1.5"), Some("")] {
        assert_eq!(parse_page_param(raw), 1, "{raw:?}");
    }
    assert_eq!(parse_page_param(Some("4")), 4);
}

#[test]
fn page_math_lines_up_with_the_fixed_page_size() {
    assert_eq!(FEED_PAGE_SIZE, 5);
    // N items → ⌈N/5⌉ pages, and any request past that clamps back.
    for n in 0..=23u64 {
        let pages = total_pages(n, FEED_PAGE_SIZE);
        assert_eq!(pages, if n == 0 { 1 } else { n.div_ceil(5) });
        assert_eq!(clamp_page(pages + 5, pages), pages);
        assert_eq!(clamp_page(0, pages), 1);
    }
}
