use sportx_terminal::model::Category;
use sportx_terminal::state::{
    FocusRing, ListSelection, Nav, PanelState, SelectionChange, Status, is_fresh,
};

#[test]
fn results_before_loading_are_ignored() {
    let mut state: PanelState<u32> = PanelState::new();
    assert!(!state.apply_success("", 1));
    assert!(!state.apply_failure("", "boom"));
    assert_eq!(state.status(), Status::Initial);
}

#[test]
fn loading_is_always_visited_first() {
    let mut state = PanelState::new();
    state.start_loading("m1");
    assert_eq!(state.status(), Status::Loading);
    assert!(state.apply_success("m1", vec![1, 2]));
    assert_eq!(state.status(), Status::Success);
    assert_eq!(state.payload(), Some(&vec![1, 2]));
}

#[test]
fn failure_hides_payload_but_keeps_it_for_navigation() {
    let mut state = PanelState::new();
    state.start_loading("m1");
    state.apply_success("m1", 7);
    assert!(state.apply_failure("m1", "timeout"));
    assert_eq!(state.payload(), None);
    assert_eq!(state.last_payload(), Some(&7));
    assert_eq!(state.error(), Some("timeout"));

    state.apply_success("m1", 8);
    assert_eq!(state.error(), None);
    assert_eq!(state.payload(), Some(&8));
}

#[test]
fn only_the_final_subject_is_applied() {
    let mut state = PanelState::new();
    let subjects = ["a", "b", "c", "d"];
    for s in subjects {
        state.start_loading(s);
    }
    // Responses arrive in an arbitrary order.
    for s in ["c", "a", "d", "b"] {
        let applied = state.apply_success(s, s.to_string());
        assert_eq!(applied, s == "d");
    }
    assert_eq!(state.payload().map(String::as_str), Some("d"));
    assert!(is_fresh("d", "d"));
    assert!(!is_fresh("d", "a"));
}

#[test]
fn reset_returns_to_initial() {
    let mut state = PanelState::new();
    state.start_loading("m1");
    state.apply_success("m1", 1);
    state.reset();
    assert_eq!(state.status(), Status::Initial);
    assert_eq!(state.subject_id(), "");
    assert!(!state.apply_success("", 2));
}

#[test]
fn focus_cycles_back_after_len_steps() {
    let mut ring = FocusRing::new(vec!['a', 'b', 'c']);
    let start = ring.index();
    for _ in 0..ring.len() {
        ring.next();
    }
    assert_eq!(ring.index(), start);
}

#[test]
fn focus_next_and_prev_are_inverse() {
    let mut ring = FocusRing::new(vec![1, 2, 3]);
    for _ in 0..5 {
        let before = ring.index();
        ring.next();
        ring.prev();
        assert_eq!(ring.index(), before);
        ring.prev();
        ring.next();
        assert_eq!(ring.index(), before);
        ring.next();
    }
    assert_eq!(ring.prev(), 2);
    assert_eq!(ring.prev(), 1);
    assert!(ring.is_focused(1));
}

fn categories(ids: &[&str]) -> Vec<Category> {
    ids.iter().map(|id| Category::standard(*id, id.to_uppercase())).collect()
}

#[test]
fn first_load_selects_first_item() {
    let mut list = ListSelection::new();
    list.start_loading("categories");
    let change = list.apply_success("categories", categories(&["a", "b"]));
    match change {
        Some(Some(SelectionChange::Selected(c))) => assert_eq!(c.id, "a"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn refresh_keeps_highlight_on_same_key() {
    let mut list = ListSelection::new();
    list.start_loading("s");
    list.apply_success("s", categories(&["a", "b", "c"]));
    list.navigate(Nav::End);
    assert_eq!(list.selected_item().map(|c| c.id.as_str()), Some("c"));

    let change = list.apply_success("s", categories(&["x", "c", "a"]));
    assert_eq!(change, Some(None));
    assert_eq!(list.selected_index(), 1);
}

#[test]
fn navigation_emits_only_real_moves() {
    let mut list = ListSelection::new();
    list.set_page_size(2);
    list.start_loading("s");
    list.apply_success("s", categories(&["a", "b", "c", "d", "e"]));

    assert_eq!(list.navigate(Nav::Up), None);
    assert!(matches!(
        list.navigate(Nav::PageDown),
        Some(SelectionChange::Selected(ref c)) if c.id == "c"
    ));
    list.navigate(Nav::End);
    assert_eq!(list.navigate(Nav::Down), None);
    assert_eq!(list.selected_index(), 4);
    list.navigate(Nav::Home);
    assert_eq!(list.selected_index(), 0);
}

#[test]
fn emptied_list_reports_cleared() {
    let mut list = ListSelection::new();
    list.start_loading("s");
    list.apply_success("s", categories(&["a"]));
    assert_eq!(list.apply_success("s", Vec::new()), Some(Some(SelectionChange::Cleared)));
    assert_eq!(list.selected_item(), None);
}

#[test]
fn stale_list_result_is_rejected() {
    let mut list: ListSelection<Category> = ListSelection::new();
    list.start_loading("hot");
    list.start_loading("football");
    assert_eq!(list.apply_success("hot", categories(&["a"])), None);
    assert_eq!(list.status(), Status::Loading);
}
