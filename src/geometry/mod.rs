pub mod bounds;
pub mod hull;

pub use bounds::Bounds;
pub use hull::{ConvexHullFilter, Membership};
