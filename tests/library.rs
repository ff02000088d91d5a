//! Tests for the flow dashboard: listing, creating and publishing flows.
mod common;
use common::*;
use ftue::library::slugify;
use ftue::prelude::*;

fn ids(flows: &[&Flow]) -> Vec<String> {
    flows.iter().map(|f| f.id.clone()).collect()
}

#[test]
fn test_list_sorts_by_priority_then_name() {
    let library = create_sample_library();
    let all = library.list(StatusFilter::All, "");
    assert_eq!(
        ids(&all),
        vec![
            "onboarding_core_loop",
            "second_scapes_task",
            "first_chapter_complete",
            "flowers_intro",
            "recipes_intro",
            "mode_2_unlock",
        ]
    );
}

#[test]
fn test_list_ties_ignore_name_case() {
    let library = FlowLibrary::from_flows(vec![
        summary_flow("beta", "Beta Quest", 1, 3, FlowStatus::Active, 50),
        summary_flow("alpha", "alpha quest", 2, 3, FlowStatus::Active, 50),
        summary_flow("gamma", "Gamma Quest", 3, 3, FlowStatus::Active, 50),
    ]);
    assert_eq!(
        ids(&library.list(StatusFilter::All, "")),
        vec!["alpha", "beta", "gamma"]
    );
}

#[test]
fn test_list_filters_by_status_and_query() {
    let library = create_sample_library();

    assert_eq!(library.list(StatusFilter::Only(FlowStatus::Active), "").len(), 4);
    assert_eq!(
        ids(&library.list(StatusFilter::Only(FlowStatus::Draft), "")),
        vec!["recipes_intro"]
    );

    // Matches "Core Loop Introduction" by name and the two "_intro" ids.
    let found = library.list(StatusFilter::All, "INTRO");
    assert_eq!(
        ids(&found),
        vec!["onboarding_core_loop", "flowers_intro", "recipes_intro"]
    );

    assert!(library
        .list(StatusFilter::Only(FlowStatus::Inactive), "flowers")
        .is_empty());
}

#[test]
fn test_create_flow() {
    let mut library = create_sample_library();

    let flow = library.create("Daily Quests").unwrap();
    assert_eq!(flow.id, "daily_quests");
    assert_eq!(flow.legacy, 15);
    assert_eq!(flow.status, FlowStatus::Draft);
    assert_eq!(flow.priority, 50);
    assert_eq!(flow.step_count(), 0);

    let again = library.create("Daily Quests").unwrap();
    assert_eq!(again.id, "daily_quests_2");
    assert_eq!(again.legacy, 16);

    assert!(matches!(library.create("   "), Err(EditError::EmptyName)));
    assert_eq!(library.len(), 8);
}

#[test]
fn test_create_in_empty_library() {
    let mut library = FlowLibrary::new();
    let flow = library.create("First").unwrap();
    assert_eq!(flow.legacy, 1);
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Core Loop: Part 2!"), "core_loop_part_2");
    assert_eq!(slugify("  Flowers   Intro "), "flowers_intro");
    assert_eq!(slugify("!!!"), "flow");
}

#[test]
fn test_duplicate_flow() {
    let mut library = create_sample_library();

    let copy = library.duplicate("flowers_intro").unwrap();
    assert_eq!(copy.id, "flowers_intro_copy");
    assert_eq!(copy.name, "Flowers Feature Intro (Copy)");
    assert_eq!(copy.status, FlowStatus::Draft);
    assert_eq!(copy.legacy, 15);
    assert_eq!(copy.step_count(), 4);
    assert_eq!(copy.modified, "Just now");

    let second = library.duplicate("flowers_intro").unwrap();
    assert_eq!(second.id, "flowers_intro_copy_2");

    // The source is untouched.
    let source = library.get("flowers_intro").unwrap();
    assert_eq!(source.status, FlowStatus::Active);
    assert_eq!(source.modified, "1 day ago");
}

#[test]
fn test_duplicate_copies_steps() {
    let mut library = FlowLibrary::from_flows(vec![create_simple_flow()]);
    let copy = library.duplicate("first_steps").unwrap();
    assert_eq!(copy.steps.len(), 3);
    assert_eq!(copy.step_count, 3);
}

#[test]
fn test_toggle_status() {
    let mut library = create_sample_library();

    assert_eq!(library.toggle_status("mode_2_unlock").unwrap(), FlowStatus::Active);
    assert_eq!(library.toggle_status("mode_2_unlock").unwrap(), FlowStatus::Inactive);

    let err = library.toggle_status("recipes_intro").unwrap_err();
    assert!(matches!(err, EditError::InvalidStatusTransition { .. }));
    assert_eq!(library.get("recipes_intro").unwrap().status, FlowStatus::Draft);

    assert!(matches!(
        library.toggle_status("ghost"),
        Err(EditError::FlowNotFound(_))
    ));
}

#[test]
fn test_publish_requires_a_valid_flow() {
    let mut library = create_sample_library();

    let err = library.publish("recipes_intro").unwrap_err();
    let EditError::ValidationFailed { flow_id, report } = err else {
        panic!("expected a validation failure");
    };
    assert_eq!(flow_id, "recipes_intro");
    assert_eq!(report.errors().next().unwrap().message, "Flow has no steps");
    assert_eq!(library.get("recipes_intro").unwrap().status, FlowStatus::Draft);
}

#[test]
fn test_publish_activates_and_compiles() {
    let mut library = FlowLibrary::from_flows(vec![create_simple_flow()]);

    let bundle = library.publish("first_steps").unwrap();
    assert_eq!(bundle.id, "first_steps");
    assert_eq!(bundle.steps.len(), 3);
    assert!(bundle.steps[2].completion.is_always_true());
    assert_eq!(library.get("first_steps").unwrap().status, FlowStatus::Active);
}

#[test]
fn test_remove_flow() {
    let mut library = create_sample_library();
    let removed = library.remove("mode_2_unlock").unwrap();
    assert_eq!(removed.name, "Mode 2 Unlock");
    assert_eq!(library.len(), 5);
    assert!(library.get("mode_2_unlock").is_err());
}

#[test]
fn test_legacy_ids_at_the_top_of_the_range() {
    let mut library = FlowLibrary::from_flows(vec![summary_flow(
        "last",
        "Last",
        u32::MAX,
        1,
        FlowStatus::Active,
        50,
    )]);

    let err = library.create("Another").unwrap_err();
    assert!(matches!(err, EditError::LegacyNumberExhausted(u32::MAX)));
    assert!(matches!(
        library.duplicate("last"),
        Err(EditError::LegacyNumberExhausted(_))
    ));
    assert_eq!(library.len(), 1);
}
