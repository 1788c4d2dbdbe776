use formkit_core::{
    ElementPosition, ElementType, EventCategory, EventFilter, FormBuilderState,
};
use formkit_designer::editor::{EditorConfig, FormEditor, Modifiers};
use formkit_designer::manager::ManagerConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

fn editor() -> FormEditor {
    let config = EditorConfig {
        manager: ManagerConfig {
            batching: false,
            ..ManagerConfig::default()
        },
        ..EditorConfig::default()
    };
    FormEditor::with_config(FormBuilderState::new(Uuid::new_v4()), config)
}

#[test]
fn test_add_move_undo_undo_scenario() {
    let mut ed = editor();
    assert_eq!(ed.state().element_count(), 0);

    let result = ed.add_element(ElementType::Text, ElementPosition::new(20.0, 20.0, 0));
    assert!(result.success);
    assert_eq!(ed.state().element_count(), 1);
    let id = ed.state().selected_id.expect("new element selected");

    let result = ed.move_element(id, ElementPosition::new(40.0, 60.0, 0));
    assert!(result.success);
    let el = ed.state().element(id).unwrap();
    assert_eq!((el.position.x, el.position.y), (40.0, 60.0));

    assert!(ed.undo().success);
    let el = ed.state().element(id).unwrap();
    assert_eq!((el.position.x, el.position.y), (20.0, 20.0));

    assert!(ed.undo().success);
    assert_eq!(ed.state().element_count(), 0);
}

#[test]
fn test_flags_track_history() {
    let mut ed = editor();
    assert!(!ed.can_undo());
    assert!(!ed.can_redo());

    ed.add_element(ElementType::Date, ElementPosition::new(0.0, 0.0, 0));
    assert!(ed.can_undo());
    assert!(!ed.can_redo());

    ed.undo();
    assert!(!ed.can_undo());
    assert!(ed.can_redo());
}

#[test]
fn test_event_driven_flag_updates() {
    // The shell listens for history events instead of polling
    let mut ed = editor();
    let notified = Arc::new(AtomicBool::new(false));
    let flag = notified.clone();
    ed.subscribe(
        EventFilter::Categories(vec![EventCategory::History]),
        move |_| {
            flag.store(true, Ordering::SeqCst);
        },
    );

    ed.add_element(ElementType::Checkbox, ElementPosition::new(0.0, 0.0, 0));
    assert!(notified.load(Ordering::SeqCst));
}

#[test]
fn test_keyboard_surface_defaults() {
    let mut ed = editor();
    ed.add_element(ElementType::Number, ElementPosition::new(0.0, 0.0, 0));

    // Ctrl+Shift+Z redoes after Ctrl+Z undoes
    let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };
    let ctrl_shift = Modifiers { ctrl: true, shift: true, ..Modifiers::default() };

    assert!(ed.handle_key("z", ctrl).unwrap().success);
    assert_eq!(ed.state().element_count(), 0);
    assert!(ed.handle_key("z", ctrl_shift).unwrap().success);
    assert_eq!(ed.state().element_count(), 1);

    // Undo on empty history is a graceful failure, not a panic
    assert!(ed.handle_key("z", ctrl).unwrap().success);
    let result = ed.handle_key("z", ctrl).unwrap();
    assert!(!result.success);
}

#[test]
fn test_update_element_properties_through_facade() {
    let mut ed = editor();
    ed.add_element(ElementType::Dropdown, ElementPosition::new(0.0, 0.0, 0));
    let id = ed.state().selected_id.unwrap();

    let mut props = serde_json::Map::new();
    props.insert("options".to_string(), serde_json::json!(["A", "B"]));
    let result = ed.update_element_properties(id, props);
    assert!(result.success);
    assert_eq!(
        ed.state().element(id).unwrap().properties["options"],
        serde_json::json!(["A", "B"])
    );
}

#[test]
fn test_rollback_present_on_executions_only() {
    let mut ed = editor();
    let result = ed.add_element(ElementType::Text, ElementPosition::new(0.0, 0.0, 0));
    assert!(result.rollback.is_some());

    let undo_result = ed.undo();
    assert!(undo_result.rollback.is_none());
}
