//! Drop-target resolution for in-progress drags.
//!
//! Given the set of registered drop zones and the rectangle of the item
//! being dragged, [`DropTargetResolver::resolve`] produces the ordered list
//! of zones that could accept the drop right now. Dragging is a continuous,
//! frequently-invalid-mid-gesture operation: every edge case resolves to an
//! empty candidate list, never an error.

use std::collections::HashMap;

use formkit_core::ElementType;
use smallvec::SmallVec;
use tracing::trace;
use uuid::Uuid;

use crate::positioning::{self, Point, Rect};

/// What kind of region a drop zone covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropZoneKind {
    /// The canvas root, accepting top-level drops.
    Canvas,
    /// A nested container element (e.g. a section).
    Container,
    /// An individual element, for insert-relative-to drops.
    Element,
}

/// Which element types a zone accepts.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AcceptPolicy {
    /// Accept every element type. This is the default for zones registered
    /// without an explicit allow-list, at the canvas root and in nested
    /// containers alike.
    #[default]
    All,
    /// Accept only the listed element types.
    Types(Vec<ElementType>),
}

impl AcceptPolicy {
    /// Check whether the policy admits the given element type.
    pub fn allows(&self, element_type: ElementType) -> bool {
        match self {
            AcceptPolicy::All => true,
            AcceptPolicy::Types(types) => types.contains(&element_type),
        }
    }
}

/// A registered region that can accept a dragged element.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DropZone {
    pub id: Uuid,
    pub kind: DropZoneKind,
    pub accepts: AcceptPolicy,
    /// The zone's current rectangle in canvas coordinates.
    pub rect: Rect,
    /// Explicit tie-break priority; higher wins. Zones registered without
    /// a preference use 0.
    pub priority: i32,
    /// Enclosing zone, for nesting checks. `None` at the canvas root.
    pub parent: Option<Uuid>,
}

impl DropZone {
    /// Creates a zone accepting everything, priority 0, no parent.
    pub fn new(id: Uuid, kind: DropZoneKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            accepts: AcceptPolicy::All,
            rect,
            priority: 0,
            parent: None,
        }
    }

    /// Sets the accepted element types.
    pub fn with_accepts(mut self, types: Vec<ElementType>) -> Self {
        self.accepts = AcceptPolicy::Types(types);
        self
    }

    /// Sets the enclosing zone.
    pub fn with_parent(mut self, parent: Uuid) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the explicit tie-break priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Geometric strategy producing the raw candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionStrategy {
    /// Rank all zones by center-to-center distance.
    #[default]
    ClosestCenter,
    /// Rank all zones by summed corner-to-corner distance.
    ClosestCorners,
    /// Only zones containing the pointer qualify.
    PointerWithin,
    /// Only zones overlapping the drag rectangle qualify, ranked by
    /// overlap ratio.
    RectIntersection,
}

/// Resolver configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CollisionConfig {
    pub strategy: CollisionStrategy,
    /// Discard candidates whose center is further than this from the drag
    /// rectangle's center, in canvas units.
    pub distance_tolerance: Option<f64>,
    /// Snap each candidate's effective drop position to this grid.
    pub snap_grid: Option<f64>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            strategy: CollisionStrategy::ClosestCenter,
            distance_tolerance: None,
            snap_grid: Some(formkit_core::constants::DEFAULT_GRID_SIZE),
        }
    }
}

/// The in-progress drag being resolved.
#[derive(Debug, Clone)]
pub struct DragContext {
    /// Id of the dragged element, or of the zone it corresponds to.
    pub dragged_id: Uuid,
    pub dragged_type: ElementType,
    /// Current translated rectangle of the dragged item. `None` while the
    /// gesture has no geometry yet.
    pub rect: Option<Rect>,
    /// Pointer position, required by the pointer-within strategy.
    pub pointer: Option<Point>,
}

/// One qualifying drop target, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct DropCandidate {
    pub zone_id: Uuid,
    pub kind: DropZoneKind,
    /// Strategy distance; smaller is closer.
    pub distance: f64,
    /// Effective drop position (drag rectangle origin, snapped when the
    /// resolver is configured with a grid).
    pub drop_position: Point,
    /// Nesting depth of the zone (0 at the canvas root).
    pub depth: usize,
}

/// Registry of drop zones plus the resolution pipeline.
#[derive(Debug, Default)]
pub struct DropTargetResolver {
    zones: HashMap<Uuid, DropZone>,
    config: CollisionConfig,
}

impl DropTargetResolver {
    /// Creates a resolver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a custom configuration.
    pub fn with_config(config: CollisionConfig) -> Self {
        Self { zones: HashMap::new(), config }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: CollisionConfig) {
        self.config = config;
    }

    /// Registers a zone, replacing any previous registration with the same
    /// id (zones re-register whenever their on-screen rectangle moves).
    pub fn register(&mut self, zone: DropZone) {
        self.zones.insert(zone.id, zone);
    }

    /// Removes a zone. Unknown ids are ignored.
    pub fn unregister(&mut self, id: Uuid) {
        self.zones.remove(&id);
    }

    /// Removes every zone.
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Number of registered zones.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Walks the parent chain from `zone_id` and reports whether
    /// `ancestor` appears in it.
    fn is_descendant_of(&self, zone_id: Uuid, ancestor: Uuid) -> bool {
        let mut current = self.zones.get(&zone_id).and_then(|z| z.parent);
        // Hop count caps the walk in case a registration cycle slips in
        let mut hops = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.zones.len() {
                return false;
            }
            current = self.zones.get(&id).and_then(|z| z.parent);
        }
        false
    }

    /// Nesting depth of each zone, computed once per resolution.
    fn depth_map(&self) -> HashMap<Uuid, usize> {
        let mut depths = HashMap::with_capacity(self.zones.len());
        for &id in self.zones.keys() {
            let mut depth = 0;
            let mut current = self.zones.get(&id).and_then(|z| z.parent);
            while let Some(pid) = current {
                depth += 1;
                if depth > self.zones.len() {
                    break;
                }
                current = self.zones.get(&pid).and_then(|z| z.parent);
            }
            depths.insert(id, depth);
        }
        depths
    }

    /// Strategy score for one zone; `None` disqualifies it.
    fn score(&self, drag_rect: &Rect, pointer: Option<&Point>, zone: &DropZone) -> Option<f64> {
        match self.config.strategy {
            CollisionStrategy::ClosestCenter => {
                Some(drag_rect.center().distance_to(&zone.rect.center()))
            }
            CollisionStrategy::ClosestCorners => {
                let drag_corners = drag_rect.corners();
                let zone_corners = zone.rect.corners();
                let total: f64 = drag_corners
                    .iter()
                    .zip(zone_corners.iter())
                    .map(|(a, b)| a.distance_to(b))
                    .sum();
                Some(total / 4.0)
            }
            CollisionStrategy::PointerWithin => {
                let p = pointer?;
                zone.rect
                    .contains_point(p)
                    .then(|| p.distance_to(&zone.rect.center()))
            }
            CollisionStrategy::RectIntersection => {
                let overlap = drag_rect.intersection_area(&zone.rect);
                if overlap <= 0.0 {
                    return None;
                }
                let ratio = overlap / drag_rect.area().max(f64::EPSILON);
                // Invert so that smaller still means closer
                Some(1.0 - ratio.min(1.0))
            }
        }
    }

    /// Resolves the ordered list of valid drop targets for a drag.
    ///
    /// Filtering removes the dragged item itself, any zone nested inside
    /// the dragged item, and zones whose accept policy rejects the dragged
    /// type. Survivors are ordered by explicit priority, then by the
    /// flat/nested scenario rules: element zones above containers with
    /// distance ties for flat layouts, deeper-then-smaller for nested ones.
    pub fn resolve(&self, drag: &DragContext) -> Vec<DropCandidate> {
        let Some(drag_rect) = drag.rect else {
            trace!(dragged = %drag.dragged_id, "no drag rectangle, skipping resolution");
            return Vec::new();
        };

        let depths = self.depth_map();
        let mut candidates: SmallVec<[DropCandidate; 8]> = SmallVec::new();

        for zone in self.zones.values() {
            if zone.id == drag.dragged_id {
                continue;
            }
            if self.is_descendant_of(zone.id, drag.dragged_id) {
                continue;
            }
            if !zone.accepts.allows(drag.dragged_type) {
                continue;
            }

            let Some(score) = self.score(&drag_rect, drag.pointer.as_ref(), zone) else {
                continue;
            };

            if let Some(tolerance) = self.config.distance_tolerance {
                let center_gap = drag_rect.center().distance_to(&zone.rect.center());
                if center_gap > tolerance {
                    continue;
                }
            }

            let mut drop_position = Point::new(drag_rect.min_x, drag_rect.min_y);
            if let Some(grid) = self.config.snap_grid {
                drop_position = positioning::snap_point(drop_position, grid);
            }

            candidates.push(DropCandidate {
                zone_id: zone.id,
                kind: zone.kind,
                distance: score,
                drop_position,
                depth: depths.get(&zone.id).copied().unwrap_or(0),
            });
        }

        let nested = candidates.iter().any(|c| c.depth > 0);
        candidates.sort_by(|a, b| {
            let pa = self.zones[&a.zone_id].priority;
            let pb = self.zones[&b.zone_id].priority;
            pb.cmp(&pa).then_with(|| {
                if nested {
                    b.depth.cmp(&a.depth).then_with(|| {
                        let area_a = self.zones[&a.zone_id].rect.area();
                        let area_b = self.zones[&b.zone_id].rect.area();
                        area_a
                            .partial_cmp(&area_b)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then_with(|| {
                                a.distance
                                    .partial_cmp(&b.distance)
                                    .unwrap_or(std::cmp::Ordering::Equal)
                            })
                    })
                } else {
                    kind_rank(a.kind).cmp(&kind_rank(b.kind)).then_with(|| {
                        a.distance
                            .partial_cmp(&b.distance)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                }
            })
        });

        trace!(
            dragged = %drag.dragged_id,
            candidates = candidates.len(),
            "resolved drop targets"
        );
        candidates.into_vec()
    }

    /// Convenience: the single best target, if any.
    pub fn best_target(&self, drag: &DragContext) -> Option<DropCandidate> {
        self.resolve(drag).into_iter().next()
    }
}

/// Flat-scenario ranking: element zones beat containers, containers beat
/// the canvas root.
fn kind_rank(kind: DropZoneKind) -> u8 {
    match kind {
        DropZoneKind::Element => 0,
        DropZoneKind::Container => 1,
        DropZoneKind::Canvas => 2,
    }
}
