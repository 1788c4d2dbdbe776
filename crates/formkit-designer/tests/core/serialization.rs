use formkit_core::{ElementPosition, ElementType, FormBuilderState};
use formkit_designer::editor::FormEditor;
use formkit_designer::serialization::{
    commands_from_records, load_history, load_state, save_history, save_state,
};
use uuid::Uuid;

#[test]
fn test_session_state_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut ed = FormEditor::new(FormBuilderState::new(Uuid::new_v4()));
    ed.update_form_properties(Some("Contact".to_string()), Some("Reach us".to_string()));
    ed.add_element(ElementType::Text, ElementPosition::new(20.0, 20.0, 0));
    ed.add_element(ElementType::Email, ElementPosition::new(20.0, 140.0, 1));

    save_state(&path, ed.state()).unwrap();
    let loaded = load_state(&path).unwrap();
    assert_eq!(&loaded, ed.state());
}

#[test]
fn test_history_survives_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut ed = FormEditor::new(FormBuilderState::new(Uuid::new_v4()));
    ed.add_element(ElementType::Text, ElementPosition::new(20.0, 20.0, 0));
    let id = ed.state().selected_id.unwrap();
    ed.move_element(id, ElementPosition::new(90.0, 10.0, 0));
    ed.manager_mut().flush_batch();

    let records = ed.manager().history_records().unwrap();
    save_history(&path, &records).unwrap();

    // A later session unwinds the loaded history against the saved state
    let mut state = ed.state().clone();
    let loaded = load_history(&path).unwrap();
    let mut commands = commands_from_records(&loaded).unwrap();
    for cmd in commands.iter_mut().rev() {
        cmd.undo(&mut state).unwrap();
    }
    assert_eq!(state.element_count(), 0);
}

#[test]
fn test_history_records_order_is_oldest_first() {
    let mut ed = FormEditor::new(FormBuilderState::new(Uuid::new_v4()));
    ed.add_element(ElementType::Text, ElementPosition::new(0.0, 0.0, 0));
    let id = ed.state().selected_id.unwrap();
    ed.update_form_properties(Some("Renamed".to_string()), None);
    ed.remove_element(id);
    ed.manager_mut().flush_batch();

    let records = ed.manager().history_records().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records[0].timestamp <= records[2].timestamp);
    assert_eq!(records[0].kind, formkit_designer::commands::CommandKind::AddElement);
    assert_eq!(records[2].kind, formkit_designer::commands::CommandKind::RemoveElement);
}
