//! Domain layer: value objects, the generator service, the product draft
//! aggregate and the events it raises.

pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;
