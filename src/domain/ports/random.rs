/// Source of uniform draws consumed by walkers and the event-log generator.
///
/// Implementations must return values in `[0, 1)`. The pipeline owns one
/// source for its whole lifetime, so draw order is the stepping order.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}
