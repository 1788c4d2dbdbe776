use formkit_core::{ElementPosition, ElementType, FormElement, Size};
use formkit_designer::canvas::{Alignment, DistributeDirection};
use formkit_designer::positioning::{
    align_elements, calculate_bounding_box, calculate_insertion_point, constrain_to_canvas,
    distribute_elements, snap_to_grid, Rect,
};
use uuid::Uuid;

fn element_at(x: f64, y: f64, order: u32) -> FormElement {
    FormElement::with_defaults(
        Uuid::new_v4(),
        ElementType::Text,
        ElementPosition::new(x, y, order),
    )
}

#[test]
fn test_snap_idempotence_across_grids() {
    for &grid in &[2.0, 5.0, 8.0, 10.0, 25.0] {
        for &(x, y) in &[(0.0, 0.0), (13.0, 17.0), (-31.0, 99.5), (1004.2, 3.3)] {
            let once = snap_to_grid(ElementPosition::new(x, y, 0), grid);
            assert_eq!(snap_to_grid(once, grid), once, "grid {}", grid);
        }
    }
}

#[test]
fn test_snap_is_deterministic() {
    let a = snap_to_grid(ElementPosition::new(15.0, 25.0, 0), 10.0);
    let b = snap_to_grid(ElementPosition::new(15.0, 25.0, 0), 10.0);
    assert_eq!(a, b);
}

#[test]
fn test_alignment_boundary_single_element() {
    let one = vec![element_at(42.0, 7.0, 0)];
    assert!(align_elements(&one, Alignment::Left).is_empty());
}

#[test]
fn test_alignment_two_elements_left_takes_minimum() {
    let elements = vec![element_at(42.0, 7.0, 0), element_at(12.0, 90.0, 1)];
    let updates = align_elements(&elements, Alignment::Left);

    let min_x = 12.0;
    for el in &elements {
        let x = updates.get(&el.id).map(|p| p.x).unwrap_or(el.position.x);
        assert_eq!(x, min_x);
    }
}

#[test]
fn test_alignment_bottom_takes_maximum() {
    let elements = vec![element_at(0.0, 10.0, 0), element_at(0.0, 250.0, 1)];
    let updates = align_elements(&elements, Alignment::Bottom);
    assert_eq!(updates[&elements[0].id].y, 250.0);
    assert!(!updates.contains_key(&elements[1].id));
}

#[test]
fn test_distribute_keeps_endpoints_fixed() {
    let elements = vec![
        element_at(0.0, 40.0, 0),
        element_at(0.0, 55.0, 1),
        element_at(0.0, 70.0, 2),
        element_at(0.0, 400.0, 3),
    ];
    let updates = distribute_elements(&elements, DistributeDirection::Vertical);

    assert!(!updates.contains_key(&elements[0].id));
    assert!(!updates.contains_key(&elements[3].id));
    assert_eq!(updates[&elements[1].id].y, 160.0);
    assert_eq!(updates[&elements[2].id].y, 280.0);
}

#[test]
fn test_bounding_box_is_position_only() {
    let elements = vec![element_at(100.0, 200.0, 0)];
    let bbox = calculate_bounding_box(&elements).unwrap();
    // A single position spans a degenerate box
    assert_eq!(bbox.width(), 0.0);
    assert_eq!(bbox.height(), 0.0);
}

#[test]
fn test_constrain_bound_never_negative() {
    let pos = constrain_to_canvas(
        ElementPosition::new(500.0, 500.0, 0),
        Size::new(100.0, 100.0),
        Size::new(250.0, 250.0),
    );
    assert_eq!((pos.x, pos.y), (0.0, 0.0));
}

#[test]
fn test_insertion_point_trails_last_by_spacing() {
    let elements = vec![element_at(0.0, 60.0, 0), element_at(0.0, 180.0, 1)];
    let container = Rect::from_xywh(0.0, 0.0, 800.0, 1200.0);

    let point = calculate_insertion_point(500.0, &elements, &container);
    assert_eq!(point.index, 2);
    assert_eq!(point.y, 260.0);
}
