use formkit_core::{ElementPosition, ElementType, FormBuilderState};
use formkit_designer::commands::FormCommand;
use formkit_designer::manager::{CommandManager, ManagerConfig};
use uuid::Uuid;

fn manager_with(max_history: usize, batching: bool) -> CommandManager {
    let config = ManagerConfig {
        max_history,
        batching,
        ..ManagerConfig::default()
    };
    CommandManager::with_config(FormBuilderState::new(Uuid::new_v4()), config)
}

fn add(mgr: &mut CommandManager, x: f64, y: f64, order: u32) -> Uuid {
    let result = mgr.execute_command(FormCommand::add_element(
        ElementType::Text,
        ElementPosition::new(x, y, order),
    ));
    assert!(result.success);
    mgr.state().selected_id.unwrap()
}

#[test]
fn test_inverse_law_for_command_sequences() {
    let mut mgr = manager_with(100, false);
    let original = mgr.state().clone();

    let a = add(&mut mgr, 20.0, 20.0, 0);
    let _b = add(&mut mgr, 20.0, 140.0, 1);
    mgr.execute_command(FormCommand::move_element(
        a,
        ElementPosition::new(300.0, 40.0, 0),
    ));
    mgr.execute_command(FormCommand::update_form_properties(
        Some("Registration".to_string()),
        None,
    ));
    let mut props = serde_json::Map::new();
    props.insert("helper_text".to_string(), serde_json::json!("hi"));
    mgr.execute_command(FormCommand::update_element_properties(a, props));

    let n = mgr.undo_count();
    for _ in 0..n {
        assert!(mgr.undo().success);
    }
    assert!(mgr.state().content_eq(&original));
}

#[test]
fn test_merge_restores_state_before_first_command() {
    // Three successive moves of the same element: after merge + undo the
    // position is the origin, not an intermediate waypoint.
    let mut mgr = manager_with(100, false);
    let id = add(&mut mgr, 0.0, 0.0, 0);

    for (x, y) in [(10.0, 10.0), (25.0, 5.0), (60.0, 90.0)] {
        mgr.execute_command(FormCommand::move_element(
            id,
            ElementPosition::new(x, y, 0),
        ));
    }
    // Add + one merged move
    assert_eq!(mgr.undo_count(), 2);

    assert!(mgr.undo().success);
    let el = mgr.state().element(id).unwrap();
    assert_eq!((el.position.x, el.position.y), (0.0, 0.0));
}

#[test]
fn test_history_bound_keeps_k_most_recent() {
    let max = 5;
    let extra = 3;
    let mut mgr = manager_with(max, false);

    let mut ids = Vec::new();
    for i in 0..(max + extra) {
        ids.push(add(&mut mgr, 0.0, i as f64 * 100.0, i as u32));
    }
    assert_eq!(mgr.undo_count(), max);

    // Undoing everything leaves exactly the `extra` oldest elements
    while mgr.undo().success {}
    assert_eq!(mgr.state().element_count(), extra);
    for id in &ids[..extra] {
        assert!(mgr.state().element(*id).is_some());
    }
}

#[test]
fn test_redo_invalidation_after_new_command() {
    let mut mgr = manager_with(100, false);
    add(&mut mgr, 0.0, 0.0, 0);
    add(&mut mgr, 0.0, 100.0, 1);

    assert!(mgr.undo().success);
    assert!(mgr.can_redo());

    add(&mut mgr, 0.0, 200.0, 2);
    assert!(!mgr.can_redo());
    let result = mgr.redo();
    assert!(!result.success);
}

#[test]
fn test_stats_are_projections_of_stacks() {
    let mut mgr = manager_with(100, false);
    assert_eq!((mgr.undo_count(), mgr.redo_count()), (0, 0));

    add(&mut mgr, 0.0, 0.0, 0);
    add(&mut mgr, 0.0, 100.0, 1);
    assert_eq!((mgr.undo_count(), mgr.redo_count()), (2, 0));

    mgr.undo();
    assert_eq!((mgr.undo_count(), mgr.redo_count()), (1, 1));

    mgr.redo();
    assert_eq!((mgr.undo_count(), mgr.redo_count()), (2, 0));
}

#[test]
fn test_batched_interleaved_targets_fold_per_run() {
    let mut mgr = manager_with(100, true);
    let a = add(&mut mgr, 0.0, 0.0, 0);
    let b = add(&mut mgr, 0.0, 100.0, 1);
    let baseline = {
        mgr.flush_batch();
        mgr.undo_count()
    };

    // Run of a-moves, then a b-move: two entries, not three
    mgr.execute_command(FormCommand::move_element(a, ElementPosition::new(10.0, 0.0, 0)));
    mgr.execute_command(FormCommand::move_element(a, ElementPosition::new(20.0, 0.0, 0)));
    mgr.execute_command(FormCommand::move_element(b, ElementPosition::new(0.0, 150.0, 1)));
    mgr.flush_batch();

    assert_eq!(mgr.undo_count(), baseline + 2);
}

#[test]
fn test_error_callback_sees_undo_contract_violation() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let mut mgr = manager_with(100, false);
    let errors = Arc::new(AtomicUsize::new(0));
    let seen = errors.clone();
    mgr.set_error_callback(move |e| {
        assert!(e.is_command_error() || !e.to_string().is_empty());
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let missing = Uuid::new_v4();
    let result = mgr.execute_command(FormCommand::move_element(
        missing,
        ElementPosition::new(1.0, 1.0, 0),
    ));
    assert!(!result.success);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}
