use formkit_core::{
    ElementPosition, ElementType, FormBuilderState, ValidationRule,
};
use formkit_designer::commands::{CommandKind, FormCommand};
use serde_json::{json, Map};
use uuid::Uuid;

#[test]
fn test_remove_undo_restores_full_identity() {
    let mut state = FormBuilderState::new(Uuid::new_v4());

    let mut add = FormCommand::add_element(
        ElementType::Email,
        ElementPosition::new(10.0, 30.0, 0),
    );
    add.apply(&mut state).unwrap();
    let id = state.selected_id.unwrap();

    // Decorate the element well past its defaults
    {
        let el = state.element_mut(id).unwrap();
        el.required = true;
        el.validation.push(ValidationRule::with_value("max_length", json!(120)));
        el.styling.background_color = Some("#f8f8f8".to_string());
        el.styling.padding = Some(12.0);
        el.properties.insert("helper_text".to_string(), json!("Work email preferred"));
    }
    let snapshot = state.element(id).unwrap().clone();

    let mut remove = FormCommand::remove_element(id);
    remove.apply(&mut state).unwrap();
    assert!(state.element(id).is_none());

    remove.undo(&mut state).unwrap();
    let restored = state.element(id).unwrap();
    // Deep equality, nested validation and styling records included
    assert_eq!(*restored, snapshot);
    assert_eq!(state.selected_id, Some(id));
}

#[test]
fn test_merge_chain_of_three_moves_undoes_to_origin() {
    let mut state = FormBuilderState::new(Uuid::new_v4());
    let mut add = FormCommand::add_element(
        ElementType::Text,
        ElementPosition::new(0.0, 0.0, 0),
    );
    add.apply(&mut state).unwrap();
    let id = state.selected_id.unwrap();

    // Drag from (0,0) to (10,10) to (25,5)
    let mut merged = FormCommand::move_element(id, ElementPosition::new(10.0, 10.0, 0));
    merged.apply(&mut state).unwrap();

    let mut second = FormCommand::move_element(id, ElementPosition::new(25.0, 5.0, 0));
    second.apply(&mut state).unwrap();
    merged.merge_from(second).unwrap();

    let el = state.element(id).unwrap();
    assert_eq!((el.position.x, el.position.y), (25.0, 5.0));

    merged.undo(&mut state).unwrap();
    let el = state.element(id).unwrap();
    // The original pre-drag position, not the intermediate one
    assert_eq!((el.position.x, el.position.y), (0.0, 0.0));
}

#[test]
fn test_merged_command_replays_from_pre_merge_state() {
    // Applying the merged command from the original state must match
    // executing both commands in sequence.
    let mut state = FormBuilderState::new(Uuid::new_v4());
    let mut add = FormCommand::add_element(
        ElementType::Text,
        ElementPosition::new(0.0, 0.0, 0),
    );
    add.apply(&mut state).unwrap();
    let id = state.selected_id.unwrap();
    let original = state.clone();

    let mut merged = FormCommand::move_element(id, ElementPosition::new(10.0, 10.0, 0));
    merged.apply(&mut state).unwrap();
    let mut second = FormCommand::move_element(id, ElementPosition::new(25.0, 5.0, 0));
    second.apply(&mut state).unwrap();
    merged.merge_from(second).unwrap();
    let sequential_result = state.clone();

    let mut replay_state = original;
    let mut replayed = merged.clone();
    replayed.apply(&mut replay_state).unwrap();
    assert!(replay_state.content_eq(&sequential_result));
}

#[test]
fn test_serialized_record_has_wire_shape() {
    let mut state = FormBuilderState::new(Uuid::new_v4());
    let mut add = FormCommand::add_element(
        ElementType::Dropdown,
        ElementPosition::new(5.0, 5.0, 0),
    );
    add.apply(&mut state).unwrap();

    let record = add.to_record().unwrap();
    assert_eq!(record.kind, CommandKind::AddElement);
    assert!(record.timestamp > 0);
    assert!(!record.description.is_empty());

    let json = serde_json::to_value(&record).unwrap();
    // The generated element id is explicit in the payload, not closure state
    assert!(json["data"]["id"].is_string());
}

#[test]
fn test_update_properties_roundtrip_through_record() {
    let mut state = FormBuilderState::new(Uuid::new_v4());
    let mut add = FormCommand::add_element(
        ElementType::Radio,
        ElementPosition::new(0.0, 0.0, 0),
    );
    add.apply(&mut state).unwrap();
    let id = state.selected_id.unwrap();
    let before = state.element(id).unwrap().properties.clone();

    let mut props = Map::new();
    props.insert("options".to_string(), json!(["Yes", "No"]));
    let mut update = FormCommand::update_element_properties(id, props);
    update.apply(&mut state).unwrap();

    // Round trip after apply: the captured previous record travels along
    let record = update.to_record().unwrap();
    let mut restored = FormCommand::from_record(&record).unwrap();
    restored.undo(&mut state).unwrap();
    assert_eq!(state.element(id).unwrap().properties, before);
}

#[test]
fn test_command_ids_and_timestamps_assigned() {
    let a = FormCommand::remove_element(Uuid::new_v4());
    let b = FormCommand::remove_element(Uuid::new_v4());
    assert_ne!(a.id, b.id);
    assert!(a.timestamp > 0);
}

#[test]
fn test_move_missing_element_is_loud() {
    let mut state = FormBuilderState::new(Uuid::new_v4());
    let mut mv = FormCommand::move_element(
        Uuid::new_v4(),
        ElementPosition::new(1.0, 1.0, 0),
    );
    assert!(mv.apply(&mut state).is_err());
    // Failed apply never captured anything
    let err = mv.undo(&mut state).unwrap_err();
    assert!(matches!(
        err,
        formkit_core::Error::Command(formkit_core::CommandError::NotYetApplied { .. })
    ));
}

#[test]
fn test_description_values() {
    let add = FormCommand::add_element(ElementType::Heading, ElementPosition::default());
    assert_eq!(add.description(), "Add heading");

    let mv = FormCommand::move_element(Uuid::new_v4(), ElementPosition::new(40.0, 60.0, 0));
    assert_eq!(mv.description(), "Move element to (40, 60)");

    let rename = FormCommand::update_form_properties(Some("T".into()), None);
    assert_eq!(rename.description(), "Rename form");
}
