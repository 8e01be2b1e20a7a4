pub mod entities;
pub mod error;
pub mod ports;
pub mod simulation;
pub mod value_objects;

pub use error::SimulationError;
