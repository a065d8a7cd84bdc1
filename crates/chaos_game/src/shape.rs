//! Shapes and shape sets edited by the collaborator before a run.
//!
//! A [`Shape`] is an ordered stack of [`Vertex`] values plus a relative weight.
//! A [`ShapeSet`] is a stack of shapes whose last entry is the "current" shape
//! receiving new vertices. Both are plain containers; readiness is exposed as
//! pure queries ([`Shape::is_eligible`], [`ShapeSet::is_ready`],
//! [`ShapeSet::can_add_shape`]) so callers decide how to reflect it.
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A 2D point in screen coordinates.
pub type Vertex = glam::DVec2;

/// Vertices closer than this (on both axes) to an existing vertex of the same
/// shape are rejected.
pub const MIN_VERTEX_DISTANCE: f64 = 16.0;

/// Weight assigned to newly created shapes.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Minimum vertex count for a shape to take part in generation.
pub const MIN_ELIGIBLE_VERTICES: usize = 2;

/// A polygon (vertex stack) acting as one attractor, with a relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    vertices: Vec<Vertex>,
    weight: f64,
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}

impl Shape {
    /// Creates an empty shape with [`DEFAULT_WEIGHT`].
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Creates a shape from the given vertices, applying the same near-duplicate
    /// filtering as [`Shape::add_vertex`].
    pub fn from_vertices<I, V>(vertices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vertex>,
    {
        let mut shape = Self::new();
        for v in vertices {
            shape.add_vertex(v);
        }
        shape
    }

    /// Sets the weight and returns the shape.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Pushes `p` unless it lies within [`MIN_VERTEX_DISTANCE`] of an existing vertex.
    ///
    /// Returns `true` when the vertex was added.
    pub fn add_vertex(&mut self, p: impl Into<Vertex>) -> bool {
        let p = p.into();
        if self.is_near_existing(p) {
            info!(
                "Unable to select vertex ({}, {}): too close to a neighboring vertex",
                p.x, p.y
            );
            return false;
        }
        self.vertices.push(p);
        debug!("Current shape vertices: {:?}", self.vertices);
        true
    }

    /// Pops the most recently added vertex.
    pub fn remove_last_vertex(&mut self) -> Option<Vertex> {
        let removed = self.vertices.pop();
        if removed.is_none() {
            info!("Unable to remove vertex: shape has no vertices");
        }
        removed
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Sets the relative weight. Validity is checked when a run starts.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// True when the shape holds enough vertices to take part in generation.
    pub fn is_eligible(&self) -> bool {
        self.vertices.len() >= MIN_ELIGIBLE_VERTICES
    }

    fn is_near_existing(&self, p: Vertex) -> bool {
        self.vertices.iter().any(|v| {
            (p.x - v.x).abs() < MIN_VERTEX_DISTANCE && (p.y - v.y).abs() < MIN_VERTEX_DISTANCE
        })
    }
}

/// Outcome of [`ShapeSet::undo`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Undo {
    /// The current shape's last vertex was removed.
    Vertex(Vertex),
    /// The current shape was empty and got removed.
    Shape,
    /// Nothing to undo: a single empty shape remains.
    Nothing,
}

/// A non-empty stack of shapes; the last one is current.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSet {
    shapes: Vec<Shape>,
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSet {
    /// Creates a set holding a single empty shape.
    pub fn new() -> Self {
        Self {
            shapes: vec![Shape::new()],
        }
    }

    /// Creates a set from existing shapes. An empty input yields [`ShapeSet::new`].
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        if shapes.is_empty() {
            return Self::new();
        }
        Self { shapes }
    }

    /// Pushes a new empty shape and makes it current.
    pub fn add_shape(&mut self) -> &mut Shape {
        self.shapes.push(Shape::new());
        info!("Selecting vertices for shape {}", self.shapes.len());
        self.current_mut()
    }

    /// Pops the current shape. Refused when it is the only one left.
    pub fn remove_shape(&mut self) -> Result<Shape> {
        if self.shapes.len() <= 1 {
            info!("Unable to remove shape: at least one shape must remain");
            return Err(Error::LastShape);
        }
        let removed = self.shapes.pop().ok_or(Error::LastShape)?;
        info!("Shape removed, {} remaining", self.shapes.len());
        Ok(removed)
    }

    /// Removes the current shape's last vertex, or the (empty) current shape itself
    /// when more than one shape exists.
    pub fn undo(&mut self) -> Undo {
        if let Some(v) = self.current_mut().vertices.pop() {
            return Undo::Vertex(v);
        }
        match self.remove_shape() {
            Ok(_) => Undo::Shape,
            Err(_) => Undo::Nothing,
        }
    }

    /// Clears back to a single empty shape.
    pub fn reset(&mut self) {
        self.shapes.clear();
        self.shapes.push(Shape::new());
        debug!("Shape set reset");
    }

    /// True iff every shape holds at least two vertices.
    pub fn is_ready(&self) -> bool {
        self.shapes.iter().all(Shape::is_eligible)
    }

    /// Index and vertex count of the first shape blocking readiness.
    pub fn first_unready(&self) -> Option<(usize, usize)> {
        self.shapes
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_eligible())
            .map(|(i, s)| (i, s.len()))
    }

    /// A new shape should only be started once the current one is eligible.
    pub fn can_add_shape(&self) -> bool {
        self.current().is_eligible()
    }

    pub fn current(&self) -> &Shape {
        // Never empty: constructors and `remove_shape` keep at least one shape.
        &self.shapes[self.shapes.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Shape {
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always `false`; provided for API symmetry with [`ShapeSet::len`].
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    /// Owned copy of all shapes, handed to a session at start.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.clone()
    }
}

impl<'a> IntoIterator for &'a ShapeSet {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Shape {
        Shape::from_vertices([(0.0, 0.0), (100.0, 0.0), (50.0, 100.0)])
    }

    #[test]
    fn add_vertex_rejects_near_duplicates() {
        let mut shape = Shape::new();
        assert!(shape.add_vertex((100.0, 100.0)));
        assert!(!shape.add_vertex((110.0, 95.0)));
        assert!(!shape.add_vertex((100.0, 100.0)));
        assert_eq!(shape.vertices(), &[Vertex::new(100.0, 100.0)]);
    }

    #[test]
    fn add_vertex_accepts_points_far_on_one_axis() {
        let mut shape = Shape::new();
        assert!(shape.add_vertex((0.0, 0.0)));
        // Close on x, but exactly the minimum distance away on y.
        assert!(shape.add_vertex((5.0, 16.0)));
        assert!(shape.add_vertex((40.0, 3.0)));
        assert_eq!(shape.len(), 3);
    }

    #[test]
    fn remove_last_vertex_is_lifo() {
        let mut shape = triangle();
        assert_eq!(shape.remove_last_vertex(), Some(Vertex::new(50.0, 100.0)));
        assert_eq!(shape.remove_last_vertex(), Some(Vertex::new(100.0, 0.0)));
        assert_eq!(shape.remove_last_vertex(), Some(Vertex::new(0.0, 0.0)));
        assert_eq!(shape.remove_last_vertex(), None);
        assert!(shape.is_empty());
    }

    #[test]
    fn eligibility_requires_two_vertices() {
        let mut shape = Shape::new();
        assert!(!shape.is_eligible());
        shape.add_vertex((0.0, 0.0));
        assert!(!shape.is_eligible());
        shape.add_vertex((50.0, 50.0));
        assert!(shape.is_eligible());
    }

    #[test]
    fn new_set_has_one_empty_shape_and_is_not_ready() {
        let set = ShapeSet::new();
        assert_eq!(set.len(), 1);
        assert!(set.current().is_empty());
        assert!(!set.is_ready());
        assert_eq!(set.first_unready(), Some((0, 0)));
    }

    #[test]
    fn readiness_tracks_every_shape() {
        let mut set = ShapeSet::from_shapes(vec![triangle()]);
        assert!(set.is_ready());

        set.add_shape().add_vertex((300.0, 300.0));
        assert!(!set.is_ready());
        assert_eq!(set.first_unready(), Some((1, 1)));

        set.current_mut().add_vertex((400.0, 300.0));
        assert!(set.is_ready());
        assert_eq!(set.first_unready(), None);
    }

    #[test]
    fn remove_shape_never_empties_the_set() {
        let mut set = ShapeSet::new();
        assert!(matches!(set.remove_shape(), Err(Error::LastShape)));
        assert_eq!(set.len(), 1);

        set.add_shape();
        assert_eq!(set.len(), 2);
        assert!(set.remove_shape().is_ok());
        assert!(matches!(set.remove_shape(), Err(Error::LastShape)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn add_shape_makes_new_shape_current() {
        let mut set = ShapeSet::from_shapes(vec![triangle()]);
        assert!(set.can_add_shape());
        set.add_shape();
        assert!(set.current().is_empty());
        assert!(!set.can_add_shape());
        assert_eq!(set.get(0), Some(&triangle()));
    }

    #[test]
    fn undo_pops_vertices_then_shapes() {
        let mut set = ShapeSet::from_shapes(vec![triangle()]);
        set.add_shape().add_vertex((500.0, 500.0));

        assert_eq!(set.undo(), Undo::Vertex(Vertex::new(500.0, 500.0)));
        assert_eq!(set.undo(), Undo::Shape);
        assert_eq!(set.len(), 1);
        assert_eq!(set.undo(), Undo::Vertex(Vertex::new(50.0, 100.0)));
        assert_eq!(set.undo(), Undo::Vertex(Vertex::new(100.0, 0.0)));
        assert_eq!(set.undo(), Undo::Vertex(Vertex::new(0.0, 0.0)));
        assert_eq!(set.undo(), Undo::Nothing);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn reset_restores_single_empty_shape() {
        let mut set = ShapeSet::from_shapes(vec![triangle(), triangle().with_weight(3.0)]);
        set.reset();
        assert_eq!(set, ShapeSet::new());
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut set = ShapeSet::from_shapes(vec![triangle()]);
        let snapshot = set.snapshot();
        set.current_mut().set_weight(9.0);
        set.current_mut().remove_last_vertex();
        assert_eq!(snapshot[0], triangle());
    }
}
