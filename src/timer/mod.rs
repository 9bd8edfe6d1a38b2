//! Stopwatch over the monotonic clock
//!
//! Mirrors the usual benchmark-harness timer: `start`/`stop` take timestamps,
//! `measure` stores `end - start` as the elapsed time, `lap` adds it to the
//! elapsed total, and `reset` zeroes the total. Elapsed time is a
//! [`Duration`], i.e. a seconds + nanoseconds pair.

use anyhow::{Result, bail};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    start: Option<Instant>,
    end: Option<Instant>,
    elapsed: Option<Duration>,
    measure_on_stop: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stopwatch whose `stop` also measures
    pub fn measuring_on_stop() -> Self {
        Self {
            measure_on_stop: true,
            ..Self::default()
        }
    }

    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.end = Some(Instant::now());
        if self.measure_on_stop {
            // A stop without a start leaves the elapsed time untouched
            let _ = self.measure();
        }
    }

    /// Zero the elapsed total; required before the first `lap`
    pub fn reset(&mut self) {
        self.elapsed = Some(Duration::ZERO);
    }

    /// Store `end - start` as the elapsed time and return it
    pub fn measure(&mut self) -> Result<Duration> {
        let interval = self.interval()?;
        self.elapsed = Some(interval);
        Ok(interval)
    }

    /// Add `end - start` to the elapsed total and return the new total
    pub fn lap(&mut self) -> Result<Duration> {
        let Some(total) = self.elapsed else {
            bail!("Stopwatch must be reset before accumulating laps");
        };
        let total = total + self.interval()?;
        self.elapsed = Some(total);
        Ok(total)
    }

    /// Last measured or accumulated time, if any
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Format the elapsed time as `Time(<label>) = S.NNNNNNNNN sec`
    ///
    /// The `(<label>)` part is left out when `label` is empty. An unmeasured
    /// stopwatch reports zero.
    pub fn report(&self, label: &str) -> String {
        let elapsed = self.elapsed.unwrap_or_default();
        let prefix = if label.is_empty() {
            "Time".to_string()
        } else {
            format!("Time({label})")
        };
        format!(
            "{prefix} = {}.{:09} sec",
            elapsed.as_secs(),
            elapsed.subsec_nanos()
        )
    }

    fn interval(&self) -> Result<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => Ok(end - start),
            (Some(_), Some(_)) => bail!("Stopwatch was stopped before it was last started"),
            (None, _) => bail!("Stopwatch was never started"),
            (Some(_), None) => bail!("Stopwatch was never stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_measure_after_start_stop() {
        let mut watch = Stopwatch::new();
        watch.start();
        thread::sleep(Duration::from_millis(5));
        watch.stop();
        assert!(watch.elapsed().is_none());

        let elapsed = watch.measure().unwrap();
        assert!(elapsed >= Duration::from_millis(5));
        assert_eq!(watch.elapsed(), Some(elapsed));

        // Measuring again gives the same answer
        assert_eq!(watch.measure().unwrap(), elapsed);
    }

    #[test]
    fn test_measure_on_stop() {
        let mut watch = Stopwatch::measuring_on_stop();
        watch.start();
        watch.stop();
        assert!(watch.elapsed().is_some());
    }

    #[test]
    fn test_measure_requires_start_and_stop() {
        let mut watch = Stopwatch::new();
        assert!(watch.measure().is_err());
        watch.start();
        assert!(watch.measure().is_err());
    }

    #[test]
    fn test_lap_requires_reset() {
        let mut watch = Stopwatch::new();
        watch.start();
        watch.stop();
        assert!(watch.lap().is_err());

        watch.reset();
        assert!(watch.lap().is_ok());
    }

    #[test]
    fn test_lap_accumulates() {
        let mut watch = Stopwatch::new();
        watch.reset();
        let mut laps = Duration::ZERO;
        for _ in 0..3 {
            watch.start();
            thread::sleep(Duration::from_millis(2));
            watch.stop();
            let before = watch.elapsed().unwrap();
            let total = watch.lap().unwrap();
            assert!(total >= before);
            laps = total;
        }
        assert!(laps >= Duration::from_millis(6));
    }

    #[test]
    fn test_reset_zeroes() {
        let mut watch = Stopwatch::new();
        watch.start();
        watch.stop();
        watch.measure().unwrap();
        watch.reset();
        assert_eq!(watch.elapsed(), Some(Duration::ZERO));
    }

    #[test]
    fn test_report_format() {
        let mut watch = Stopwatch::new();
        watch.elapsed = Some(Duration::new(3, 1_500));
        assert_eq!(watch.report("fib"), "Time(fib) = 3.000001500 sec");
        assert_eq!(watch.report(""), "Time = 3.000001500 sec");
    }

    #[test]
    fn test_report_unmeasured() {
        let watch = Stopwatch::new();
        assert_eq!(watch.report("x"), "Time(x) = 0.000000000 sec");
    }
}
