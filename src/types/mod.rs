//! Geometric value types shared by the decoder, projection and drawing layers

pub mod bounds;
pub mod vector;

pub use bounds::{BoundingBox2D, BoundingBox3D};
pub use vector::{Vector2, Vector3};
