//! Object store: the engine's exclusively owned set of drawables.

use crate::shapes::{Drawable, ShapeId};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Drawables keyed by id, plus their insertion order.
///
/// Insertion order doubles as paint order (back to front). Hit-testing walks
/// it in reverse so the most recently inserted object under the pointer wins.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: HashMap<ShapeId, Drawable>,
    order: Vec<ShapeId>,
}

impl ObjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable. Re-inserting an existing id replaces it in place.
    pub fn insert(&mut self, drawable: Drawable) -> ShapeId {
        let id = drawable.id();
        if self.objects.insert(id, drawable).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Get a drawable by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Drawable> {
        self.objects.get(&id)
    }

    /// Get a mutable reference to a drawable by ID.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Drawable> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Drawables in paint order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Ids in paint order.
    pub fn ids(&self) -> &[ShapeId] {
        &self.order
    }

    /// Topmost drawable containing the point (in world coordinates).
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.objects.get(id).is_some_and(|d| d.hit_test(point)))
    }

    /// Get the bounding box of all drawables.
    pub fn bounds(&self) -> Option<Rect> {
        self.iter()
            .map(Drawable::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
