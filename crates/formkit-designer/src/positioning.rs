//! Pure geometry utilities for canvas positioning.
//!
//! Everything in this module is a stateless function over plain coordinate
//! values. The element model here is position-only: bounding boxes and
//! alignment reason about element positions, not rendered extents.

use std::collections::HashMap;

use formkit_core::constants::INSERTION_SPACING;
use formkit_core::{ElementPosition, FormElement, Size};
use uuid::Uuid;

use crate::canvas::{Alignment, DistributeDirection};

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Creates a rectangle from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Creates a rectangle from origin and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// The four corners, top-left first, clockwise.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Overlap area with another rectangle, zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let h = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        w * h
    }
}

/// A computed index + coordinate where a dragged element would land if
/// released now. Ephemeral; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionPoint {
    /// Index in sequence order at which the element would be inserted.
    pub index: usize,
    /// Suggested y coordinate for drop feedback.
    pub y: f64,
}

fn snap_value(v: f64, grid_size: f64) -> f64 {
    (v / grid_size).round() * grid_size
}

/// Snaps a position's x and y independently to the nearest grid multiple.
///
/// Idempotent: snapping an already-snapped position is a no-op. A
/// non-positive grid size leaves the position unchanged.
pub fn snap_to_grid(position: ElementPosition, grid_size: f64) -> ElementPosition {
    if grid_size <= 0.0 {
        return position;
    }
    ElementPosition {
        x: snap_value(position.x, grid_size),
        y: snap_value(position.y, grid_size),
        order: position.order,
    }
}

/// Snaps a free point to the grid. Same contract as [`snap_to_grid`].
pub fn snap_point(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Clamps a position so an element of `element_size` stays inside the
/// canvas. When the element is larger than the canvas the upper clamp bound
/// collapses to zero rather than going negative.
pub fn constrain_to_canvas(
    position: ElementPosition,
    canvas_size: Size,
    element_size: Size,
) -> ElementPosition {
    let max_x = (canvas_size.width - element_size.width).max(0.0);
    let max_y = (canvas_size.height - element_size.height).max(0.0);
    ElementPosition {
        x: position.x.clamp(0.0, max_x),
        y: position.y.clamp(0.0, max_y),
        order: position.order,
    }
}

/// Euclidean distance between two element positions.
pub fn distance(a: &ElementPosition, b: &ElementPosition) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Returns the rectangle spanning all element positions, or `None` for an
/// empty collection. Position-only: element extents are not considered.
pub fn calculate_bounding_box(elements: &[FormElement]) -> Option<Rect> {
    let first = elements.first()?;
    let mut rect = Rect::new(
        first.position.x,
        first.position.y,
        first.position.x,
        first.position.y,
    );
    for el in &elements[1..] {
        rect.min_x = rect.min_x.min(el.position.x);
        rect.min_y = rect.min_y.min(el.position.y);
        rect.max_x = rect.max_x.max(el.position.x);
        rect.max_y = rect.max_y.max(el.position.y);
    }
    Some(rect)
}

/// Computes new positions aligning all elements along an edge or center.
///
/// Returns a map from element id to new position, containing only elements
/// that actually move. Fewer than two elements is a no-op. Input is never
/// mutated.
pub fn align_elements(
    elements: &[FormElement],
    alignment: Alignment,
) -> HashMap<Uuid, ElementPosition> {
    let mut updates = HashMap::new();
    if elements.len() < 2 {
        return updates;
    }

    let xs = elements.iter().map(|e| e.position.x);
    let ys = elements.iter().map(|e| e.position.y);
    let count = elements.len() as f64;

    let target = match alignment {
        Alignment::Left => xs.fold(f64::INFINITY, f64::min),
        Alignment::Right => xs.fold(f64::NEG_INFINITY, f64::max),
        Alignment::Center => xs.sum::<f64>() / count,
        Alignment::Top => ys.fold(f64::INFINITY, f64::min),
        Alignment::Bottom => ys.fold(f64::NEG_INFINITY, f64::max),
        Alignment::Middle => ys.sum::<f64>() / count,
    };

    for el in elements {
        let mut pos = el.position;
        match alignment {
            Alignment::Left | Alignment::Center | Alignment::Right => pos.x = target,
            Alignment::Top | Alignment::Middle | Alignment::Bottom => pos.y = target,
        }
        if (pos.x - el.position.x).abs() > f64::EPSILON
            || (pos.y - el.position.y).abs() > f64::EPSILON
        {
            updates.insert(el.id, pos);
        }
    }

    updates
}

/// Distributes elements at equal spacing along an axis.
///
/// The outermost two elements stay fixed; interior elements are linearly
/// interpolated between them. Fewer than three elements is a no-op.
pub fn distribute_elements(
    elements: &[FormElement],
    direction: DistributeDirection,
) -> HashMap<Uuid, ElementPosition> {
    let mut updates = HashMap::new();
    if elements.len() < 3 {
        return updates;
    }

    let mut sorted: Vec<&FormElement> = elements.iter().collect();
    match direction {
        DistributeDirection::Horizontal => {
            sorted.sort_by(|a, b| {
                a.position
                    .x
                    .partial_cmp(&b.position.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        DistributeDirection::Vertical => {
            sorted.sort_by(|a, b| {
                a.position
                    .y
                    .partial_cmp(&b.position.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    let n = sorted.len();
    let (first, last) = (sorted[0], sorted[n - 1]);
    let (start, end) = match direction {
        DistributeDirection::Horizontal => (first.position.x, last.position.x),
        DistributeDirection::Vertical => (first.position.y, last.position.y),
    };
    let step = (end - start) / (n - 1) as f64;

    for (i, el) in sorted.iter().enumerate().take(n - 1).skip(1) {
        let mut pos = el.position;
        let value = start + step * i as f64;
        match direction {
            DistributeDirection::Horizontal => pos.x = value,
            DistributeDirection::Vertical => pos.y = value,
        }
        if (pos.x - el.position.x).abs() > f64::EPSILON
            || (pos.y - el.position.y).abs() > f64::EPSILON
        {
            updates.insert(el.id, pos);
        }
    }

    updates
}

/// Finds where a dragged element would be inserted for a given pointer
/// height.
///
/// Elements are scanned in sequence order; the first one sitting below the
/// pointer yields an insert-before point at its index. A pointer below every
/// element yields an end-of-list point trailing the last element by
/// [`INSERTION_SPACING`]. An empty container inserts at its top.
pub fn calculate_insertion_point(
    pointer_y: f64,
    elements: &[FormElement],
    container: &Rect,
) -> InsertionPoint {
    if elements.is_empty() {
        return InsertionPoint { index: 0, y: container.min_y };
    }

    let mut sorted: Vec<&FormElement> = elements.iter().collect();
    sorted.sort_by(|a, b| a.position.sequence_cmp(&b.position));

    for (i, el) in sorted.iter().enumerate() {
        if el.position.y > pointer_y {
            return InsertionPoint { index: i, y: el.position.y };
        }
    }

    let last = sorted[sorted.len() - 1];
    InsertionPoint {
        index: sorted.len(),
        y: last.position.y + INSERTION_SPACING,
    }
}
