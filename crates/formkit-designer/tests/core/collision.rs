use formkit_core::ElementType;
use formkit_designer::collision::{
    CollisionConfig, CollisionStrategy, DragContext, DropTargetResolver, DropZone, DropZoneKind,
};
use formkit_designer::positioning::{Point, Rect};
use uuid::Uuid;

fn drag(rect: Rect) -> DragContext {
    DragContext {
        dragged_id: Uuid::new_v4(),
        dragged_type: ElementType::Text,
        pointer: Some(rect.center()),
        rect: Some(rect),
    }
}

/// Canvas root containing section A containing section B, all overlapping.
fn nested_resolver() -> (DropTargetResolver, Uuid, Uuid, Uuid) {
    let mut resolver = DropTargetResolver::new();
    let root = Uuid::new_v4();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    resolver.register(DropZone::new(
        root,
        DropZoneKind::Canvas,
        Rect::from_xywh(0.0, 0.0, 800.0, 1200.0),
    ));
    resolver.register(
        DropZone::new(
            a,
            DropZoneKind::Container,
            Rect::from_xywh(100.0, 100.0, 500.0, 500.0),
        )
        .with_parent(root),
    );
    resolver.register(
        DropZone::new(
            b,
            DropZoneKind::Container,
            Rect::from_xywh(200.0, 200.0, 200.0, 200.0),
        )
        .with_parent(a),
    );
    (resolver, root, a, b)
}

#[test]
fn test_deeper_container_wins_in_overlap() {
    let (resolver, _root, _a, b) = nested_resolver();

    let candidates = resolver.resolve(&drag(Rect::from_xywh(250.0, 250.0, 80.0, 40.0)));
    assert!(!candidates.is_empty());
    assert_eq!(candidates[0].zone_id, b);
}

#[test]
fn test_container_cannot_drop_into_own_descendant() {
    let (resolver, root, a, b) = nested_resolver();

    let mut ctx = drag(Rect::from_xywh(250.0, 250.0, 80.0, 40.0));
    ctx.dragged_id = a;
    ctx.dragged_type = ElementType::Section;

    let candidates = resolver.resolve(&ctx);
    assert!(candidates.iter().all(|c| c.zone_id != b));
    assert!(candidates.iter().all(|c| c.zone_id != a));
    assert!(candidates.iter().any(|c| c.zone_id == root));
}

#[test]
fn test_no_active_drag_yields_no_targets() {
    let (resolver, ..) = nested_resolver();
    let ctx = DragContext {
        dragged_id: Uuid::new_v4(),
        dragged_type: ElementType::Text,
        rect: None,
        pointer: None,
    };
    assert!(resolver.resolve(&ctx).is_empty());
}

#[test]
fn test_zero_zones_yields_no_targets() {
    let resolver = DropTargetResolver::new();
    assert!(resolver
        .resolve(&drag(Rect::from_xywh(0.0, 0.0, 50.0, 50.0)))
        .is_empty());
}

#[test]
fn test_missing_accepts_means_accept_all_everywhere() {
    // Root and nested container both registered without allow-lists:
    // both accept any element type.
    let (resolver, ..) = nested_resolver();
    let mut ctx = drag(Rect::from_xywh(250.0, 250.0, 80.0, 40.0));
    ctx.dragged_type = ElementType::File;
    assert_eq!(resolver.resolve(&ctx).len(), 3);
}

#[test]
fn test_reregistration_moves_zone() {
    let mut resolver = DropTargetResolver::new();
    let id = Uuid::new_v4();
    resolver.register(DropZone::new(
        id,
        DropZoneKind::Container,
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
    ));
    // The zone scrolled; its registration is refreshed with a new rect
    resolver.register(DropZone::new(
        id,
        DropZoneKind::Container,
        Rect::from_xywh(1000.0, 1000.0, 100.0, 100.0),
    ));
    assert_eq!(resolver.zone_count(), 1);

    let config = CollisionConfig {
        strategy: CollisionStrategy::RectIntersection,
        ..CollisionConfig::default()
    };
    resolver.set_config(config);
    assert!(resolver
        .resolve(&drag(Rect::from_xywh(10.0, 10.0, 50.0, 50.0)))
        .is_empty());
    assert_eq!(
        resolver
            .resolve(&drag(Rect::from_xywh(1010.0, 1010.0, 50.0, 50.0)))
            .len(),
        1
    );
}

#[test]
fn test_pointer_within_strategy_end_to_end() {
    let (mut resolver, _root, a, _b) = nested_resolver();
    resolver.set_config(CollisionConfig {
        strategy: CollisionStrategy::PointerWithin,
        ..CollisionConfig::default()
    });

    // Pointer inside A but outside B
    let rect = Rect::from_xywh(120.0, 120.0, 60.0, 30.0);
    let ctx = DragContext {
        dragged_id: Uuid::new_v4(),
        dragged_type: ElementType::Text,
        pointer: Some(Point::new(150.0, 135.0)),
        rect: Some(rect),
    };
    let candidates = resolver.resolve(&ctx);
    assert_eq!(candidates[0].zone_id, a);
    assert_eq!(candidates.len(), 2);
}
