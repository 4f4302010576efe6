//! Property-based tests over random interaction sequences.
//!
//! Properties Under Test:
//! - In paneled mode, once everything settles exactly one panel is visible and
//!   it is the active section.
//! - The active indicator always names the active section.
//! - Scroll progress stays within [0, 100].

use crate::test_harness::PageHarness;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Scroll(f64),
    Click(usize),
    Hash(usize),
    Advance(u64),
}

fn arb_action(sections: usize) -> impl Strategy<Value = Action> {
    prop_oneof![
        (0f64..=1.0).prop_map(Action::Scroll),
        (0..sections).prop_map(Action::Click),
        (0..sections).prop_map(Action::Hash),
        (0u64..3000).prop_map(Action::Advance),
    ]
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u32>, Vec<Action>)> {
    prop::collection::vec(200u32..1500, 2..6).prop_flat_map(|heights| {
        let count = heights.len();
        (Just(heights), prop::collection::vec(arb_action(count), 0..30))
    })
}

fn build(heights: &[u32]) -> (PageHarness, Vec<String>, f64) {
    let ids: Vec<String> = (0..heights.len()).map(|i| format!("s{i}")).collect();
    let sections: Vec<(&str, u32)> = ids
        .iter()
        .map(String::as_str)
        .zip(heights.iter().copied())
        .collect();
    let mut harness = PageHarness::new();
    harness.register("page", &sections);
    harness.open_page("page");
    let total: u32 = heights.iter().sum();
    (harness, ids, f64::from(total))
}

fn run(harness: &mut PageHarness, ids: &[String], total: f64, actions: &[Action]) {
    for action in actions {
        match action {
            Action::Scroll(fraction) => harness.scroll_to(fraction * total),
            Action::Click(i) => {
                harness.click(&ids[*i]);
            }
            Action::Hash(i) => {
                harness.hash_navigate(&ids[*i]);
            }
            Action::Advance(ms) => harness.advance(*ms),
        }
    }
}

proptest! {
    #[test]
    fn settled_paneled_layout_shows_only_active_section(
        (heights, actions) in arb_scenario()
    ) {
        let (mut harness, ids, total) = build(&heights);

        run(&mut harness, &ids, total, &actions);
        harness.settle();

        let current = harness.current_section();
        prop_assert!(current.is_some());
        prop_assert_eq!(harness.visible_sections(), current.iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn active_indicator_matches_current_section(
        (heights, actions) in arb_scenario()
    ) {
        let (mut harness, ids, total) = build(&heights);

        for action in &actions {
            run(&mut harness, &ids, total, std::slice::from_ref(action));
            prop_assert_eq!(harness.active_indicator(), harness.current_section());
        }
    }

    #[test]
    fn progress_stays_in_bounds(
        (heights, actions) in arb_scenario()
    ) {
        let (mut harness, ids, total) = build(&heights);

        for action in &actions {
            run(&mut harness, &ids, total, std::slice::from_ref(action));
            let progress = harness.controller().progress();
            prop_assert!((0.0..=100.0).contains(&progress), "progress {}", progress);
        }
    }
}
