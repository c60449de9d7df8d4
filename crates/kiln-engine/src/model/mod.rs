//! Named polygon models.

use std::collections::HashMap;

use crate::coords::{Rect, Vec2};
use crate::error::ModelError;

/// Closed polygon in model space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    vertices: Vec<Vec2>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: impl IntoIterator<Item = Vec2>) -> Self {
        Self { vertices: vertices.into_iter().collect() }
    }

    /// Appends a vertex.
    #[must_use]
    pub fn vertex(mut self, x: f32, y: f32) -> Self {
        self.vertices.push(Vec2::new(x, y));
        self
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(&self.vertices)
    }
}

/// Registry of models by name.
#[derive(Debug, Default)]
pub struct ModelStore {
    models: HashMap<String, Model>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, model: Model) -> Result<(), ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.models.contains_key(name) {
            return Err(ModelError::Duplicate(name.to_string()));
        }
        self.models.insert(name.to_string(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Model, ModelError> {
        self.models.get(name).ok_or_else(|| ModelError::Missing(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Option<Model> {
        self.models.remove(name)
    }

    pub fn clear(&mut self) {
        self.models.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
