pub mod clock;
pub mod random;

pub use clock::Clock;
pub use random::RandomSource;
