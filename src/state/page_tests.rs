//! Tests for the page controller.

use super::*;
use crate::view_state::scroll::VirtualContainer;
use std::cell::RefCell;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn page(s: &str) -> PageId {
    PageId::new(s).expect("valid page id")
}

fn sid(s: &str) -> SectionId {
    SectionId::new(s).expect("valid section id")
}

fn three_sections() -> SectionList {
    SectionList::from_heights([(sid("home"), 800), (sid("about"), 800), (sid("work"), 800)])
        .expect("valid list")
}

/// Controller on page "home" with a 1600px scrollable container.
fn controller_with(config: CoreConfig) -> (PageController, Rc<VirtualContainer>) {
    let mut controller = PageController::new(config);
    controller.registry_mut().register(page("home"), three_sections());
    let container = Rc::new(VirtualContainer::new(1600.0));
    controller.on_resize(Viewport::new(1280, 800.0), ms(0));
    controller.attach_container(&container, ms(0));
    controller.on_navigation_complete(page("home"), NavigationKind::Push, ms(0));
    (controller, container)
}

fn controller() -> (PageController, Rc<VirtualContainer>) {
    controller_with(CoreConfig::default())
}

fn current(controller: &PageController) -> Option<&str> {
    controller.current_section().map(|s| s.as_str())
}

#[test]
fn starts_on_first_section_at_top() {
    let (controller, _container) = controller();
    assert_eq!(current(&controller), Some("home"));
    assert_eq!(controller.scroll_state().offset, 0.0);
    assert_eq!(controller.progress(), 0.0);
    assert_eq!(controller.tier(), Some(DisplayTier::Full));
    assert_eq!(controller.layout_mode(), LayoutMode::Paneled);
}

#[test]
fn scroll_event_updates_section_and_starts_transition() {
    let (mut controller, container) = controller();

    container.scroll_to(900.0);
    controller.on_scroll(ms(10));

    assert_eq!(current(&controller), Some("about"));
    assert!(matches!(
        controller.phase(),
        TransitionPhase::AnimatingOut { target, .. } if target.as_str() == "about"
    ));
    assert_eq!(
        controller.indicators().iter().filter(|i| i.active).count(),
        1
    );
}

#[test]
fn scroll_within_section_does_not_transition() {
    let (mut controller, container) = controller();

    container.scroll_to(300.0);
    controller.on_scroll(ms(10));

    assert_eq!(controller.phase(), &TransitionPhase::Idle);
}

#[test]
fn progress_tracks_offset() {
    let (mut controller, container) = controller();
    container.scroll_to(800.0);
    controller.on_scroll(ms(0));
    assert_eq!(controller.progress(), 50.0);
}

#[test]
fn navigation_start_freezes_scroll_handling() {
    let (mut controller, container) = controller();

    controller.on_navigation_start(ms(0));
    container.scroll_to(1600.0);
    controller.on_scroll(ms(5));

    assert!(controller.is_frozen());
    assert_eq!(current(&controller), Some("home"));
    assert_eq!(controller.phase(), &TransitionPhase::Idle);
}

#[test]
fn navigation_complete_resets_to_top() {
    let (mut controller, container) = controller();
    container.scroll_to(1600.0);
    controller.on_scroll(ms(0));

    controller.on_navigation_start(ms(100));
    controller.on_navigation_complete(page("home"), NavigationKind::Push, ms(100));

    assert_eq!(container.scroll_offset(), 0.0);
    assert_eq!(current(&controller), Some("home"));
    assert!(!controller.is_frozen());
    assert_eq!(controller.phase(), &TransitionPhase::Idle);
    assert_eq!(controller.stage().shown_sections().len(), 1);
}

#[test]
fn restore_navigation_returns_to_saved_offset() {
    let (mut controller, container) = controller();
    container.scroll_to(1200.0);
    controller.on_scroll(ms(0));

    controller.on_navigation_start(ms(10));
    controller.on_navigation_complete(page("blog"), NavigationKind::Push, ms(10));
    controller.on_navigation_start(ms(20));
    controller.on_navigation_complete(page("home"), NavigationKind::Restore, ms(20));

    assert_eq!(container.scroll_offset(), 1200.0);
    assert_eq!(current(&controller), Some("about"));
}

#[test]
fn restore_disabled_by_config_starts_at_top() {
    let config = CoreConfig {
        restore_scroll: false,
        ..CoreConfig::default()
    };
    let (mut controller, container) = controller_with(config);
    container.scroll_to(1200.0);
    controller.on_scroll(ms(0));

    controller.on_navigation_start(ms(10));
    controller.on_navigation_complete(page("home"), NavigationKind::Restore, ms(10));

    assert_eq!(container.scroll_offset(), 0.0);
}

#[test]
fn unregistered_page_has_no_sections() {
    let (mut controller, _container) = controller();

    controller.on_navigation_start(ms(0));
    controller.on_navigation_complete(page("blog"), NavigationKind::Push, ms(0));

    assert_eq!(controller.current_index(), None);
    assert!(controller.indicators().is_empty());
    assert!(controller.stage().panels().is_empty());
    assert_eq!(controller.page().map(|p| p.as_str()), Some("blog"));
}

#[test]
fn section_subscribers_see_changes() {
    let (mut controller, container) = controller();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let _sub = controller.subscribe_section(move |i| s.borrow_mut().push(i.map(|i| i.get())));

    container.scroll_to(1600.0);
    controller.on_scroll(ms(0));
    container.scroll_to(1650.0);
    controller.on_scroll(ms(1));

    assert_eq!(*seen.borrow(), vec![Some(2)]);
}

#[test]
fn tier_subscribers_see_changes() {
    let (mut controller, _container) = controller();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let _sub = controller.subscribe_tier(move |t| s.borrow_mut().push(*t));

    controller.on_resize(Viewport::new(1250, 800.0), ms(0));
    controller.on_resize(Viewport::new(700, 800.0), ms(0));

    assert_eq!(*seen.borrow(), vec![Some(DisplayTier::Compact)]);
}

#[test]
fn overlay_defers_click_and_requests_close() {
    let (mut controller, container) = controller();
    controller.overlay_opened();

    let outcome = controller.click_indicator(&sid("work"), ms(0));

    assert_eq!(outcome, NavOutcome::Deferred { close_overlay: true });
    assert_eq!(controller.drain_commands(), vec![HostCommand::CloseOverlay]);
    assert!(controller.drain_commands().is_empty());
    assert_eq!(container.scroll_offset(), 0.0);

    controller.overlay_closed(ms(50));

    assert_eq!(container.scroll_offset(), 1600.0);
    assert_eq!(current(&controller), Some("work"));
}

#[test]
fn teardown_is_idempotent() {
    let (mut controller, container) = controller();
    container.scroll_to(900.0);
    controller.on_scroll(ms(0));
    let seen = Rc::new(RefCell::new(0));
    let s = Rc::clone(&seen);
    let _sub = controller.subscribe_section(move |_| *s.borrow_mut() += 1);

    controller.teardown();
    controller.teardown();

    assert_eq!(controller.phase(), &TransitionPhase::Idle);
    assert!(!controller.stage().is_animating());

    // Detached: later events are inert and nobody is notified.
    container.scroll_to(1600.0);
    controller.on_scroll(ms(10));
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn dropped_container_suspends_without_error() {
    let (mut controller, container) = controller();
    container.scroll_to(900.0);
    controller.on_scroll(ms(0));

    drop(container);
    controller.on_scroll(ms(10));

    assert_eq!(current(&controller), Some("about"));
    assert_eq!(controller.scroll_state().offset, 900.0);
    assert_eq!(controller.recalculate(ms(20)).map(|i| i.get()), Some(1));
}

/// Page whose last section is shorter than the viewport: the container can
/// only scroll to 1200, short of contact's start at 1600.
fn short_tail() -> (PageController, Rc<VirtualContainer>) {
    let mut controller = PageController::default();
    let list = SectionList::from_heights([
        (sid("home"), 800),
        (sid("about"), 800),
        (sid("contact"), 400),
    ])
    .expect("valid list");
    controller.registry_mut().register(page("home"), list);
    let container = Rc::new(VirtualContainer::new(1200.0));
    controller.on_resize(Viewport::new(1280, 800.0), ms(0));
    controller.attach_container(&container, ms(0));
    controller.on_navigation_complete(page("home"), NavigationKind::Push, ms(0));
    (controller, container)
}

#[test]
fn click_on_short_last_section_lands_there() {
    let (mut controller, container) = short_tail();

    let outcome = controller.click_indicator(&sid("contact"), ms(10));

    assert!(matches!(outcome, NavOutcome::Navigate(_)));
    assert_eq!(container.scroll_offset(), 1200.0);
    assert_eq!(current(&controller), Some("contact"));
    assert_eq!(controller.nav.active_section().map(|s| s.as_str()), Some("contact"));
    assert!(matches!(
        controller.phase(),
        TransitionPhase::AnimatingOut { target, .. } if target.as_str() == "contact"
    ));

    controller.tick(ms(10_000));
    let shown: Vec<&str> = controller
        .stage()
        .shown_sections()
        .into_iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(shown, vec!["contact"]);
}

#[test]
fn scroll_at_capped_offset_keeps_clicked_section() {
    let (mut controller, container) = short_tail();
    controller.click_indicator(&sid("contact"), ms(10));

    controller.on_scroll(ms(20));
    controller.on_resize(Viewport::new(1260, 800.0), ms(30));
    assert_eq!(controller.recalculate(ms(40)).map(|i| i.get()), Some(2));
    assert_eq!(current(&controller), Some("contact"));

    // Leaving the capped offset hands control back to the scroll position.
    container.scroll_to(1000.0);
    controller.on_scroll(ms(50));
    assert_eq!(current(&controller), Some("about"));
}

#[test]
fn hash_navigation_overrides_clicked_section() {
    let (mut controller, container) = short_tail();
    controller.click_indicator(&sid("contact"), ms(10));

    // #about lands on 800; the browser has already moved the container.
    container.scroll_to(800.0);
    controller.on_hash_navigation(ms(20));

    assert_eq!(current(&controller), Some("about"));
}

#[test]
fn scroll_behind_open_overlay_is_deferred() {
    let (mut controller, container) = controller();
    controller.overlay_opened();

    container.scroll_to(900.0);
    controller.on_scroll(ms(10));
    container.scroll_to(1000.0);
    controller.on_scroll(ms(20));

    assert_eq!(controller.phase(), &TransitionPhase::Idle);
    assert_eq!(current(&controller), Some("home"));
    assert_eq!(controller.drain_commands(), vec![HostCommand::CloseOverlay]);

    controller.overlay_closed(ms(30));

    assert_eq!(current(&controller), Some("about"));
    assert!(matches!(
        controller.phase(),
        TransitionPhase::AnimatingOut { target, .. } if target.as_str() == "about"
    ));
}

#[test]
fn scroll_within_section_behind_overlay_asks_nothing() {
    let (mut controller, container) = controller();
    controller.overlay_opened();

    container.scroll_to(300.0);
    controller.on_scroll(ms(10));

    assert!(controller.drain_commands().is_empty());
    assert_eq!(controller.nav.overlay(), OverlayState::Open);
}

#[test]
fn resize_behind_open_overlay_defers_section_change() {
    let (mut controller, container) = controller();
    controller.overlay_opened();

    container.scroll_to(1600.0);
    controller.on_resize(Viewport::new(1260, 800.0), ms(10));

    assert_eq!(current(&controller), Some("home"));
    assert_eq!(controller.drain_commands(), vec![HostCommand::CloseOverlay]);

    controller.overlay_closed(ms(20));
    assert_eq!(current(&controller), Some("work"));
}

#[test]
fn click_during_navigation_is_ignored() {
    let (mut controller, container) = controller();
    controller.on_navigation_start(ms(0));

    let outcome = controller.click_indicator(&sid("work"), ms(5));

    assert_eq!(outcome, NavOutcome::Ignored);
    assert_eq!(container.scroll_offset(), 0.0);
    assert_eq!(current(&controller), Some("home"));
    assert_eq!(controller.phase(), &TransitionPhase::Idle);
    assert!(controller.drain_commands().is_empty());
}
