//! Wall-clock timing around library calls

use std::time::{Duration, Instant};

/// A value together with how long it took to produce
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn execution_time(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

impl<T, E> Timed<Result<T, E>> {
    /// Lift a fallible call's error out so it can be propagated with `?`
    pub fn transpose(self) -> Result<Timed<T>, E> {
        let elapsed = self.elapsed;
        self.value.map(|value| Timed { value, elapsed })
    }
}

pub fn timed<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    Timed {
        value,
        elapsed: start.elapsed(),
    }
}

/// Milliseconds with two decimals, e.g. `"0.42ms"`
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_micros(1234)), "1.23ms");
        assert_eq!(format_elapsed(Duration::ZERO), "0.00ms");
        assert_eq!(format_elapsed(Duration::from_secs(2)), "2000.00ms");
    }

    #[test]
    fn test_timed_returns_value() {
        let t = timed(|| 21 * 2);
        assert_eq!(t.value, 42);
        assert!(t.execution_time().ends_with("ms"));
    }
}
