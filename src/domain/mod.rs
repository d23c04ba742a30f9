pub mod object;
pub mod record;

pub use object::{GeometryKind, MapObject, ObjectCollection};
pub use record::AttributedRecord;
