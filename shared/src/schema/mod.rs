mod component;
mod error;
mod object;

pub use component::{CommandRequest, CommandResponse, ComponentData, ComponentUpdate};
pub use error::SchemaError;
pub use object::{SchemaObject, SchemaValue};
