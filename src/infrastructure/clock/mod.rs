pub mod manual;
pub mod system;

pub use manual::ManualClock;
pub use system::SystemClock;
