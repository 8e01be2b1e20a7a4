pub mod rng_source;
pub mod scripted;

pub use rng_source::RngSource;
pub use scripted::ScriptedRandom;
