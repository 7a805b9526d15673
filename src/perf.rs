//! Timing instrumentation for the render hot path.
//!
//! Compiled out unless the `perf` feature is on. Spans emit a single
//! `tracing::info!` with target="perf" when dropped.

#[cfg(feature = "perf")]
pub struct PerfSpan {
    name: &'static str,
    start: std::time::Instant,
}

#[cfg(feature = "perf")]
impl PerfSpan {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "perf")]
impl Drop for PerfSpan {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(target: "perf", phase = self.name, ms);
    }
}

#[cfg(not(feature = "perf"))]
pub struct PerfSpan;

#[cfg(not(feature = "perf"))]
impl PerfSpan {
    #[inline]
    pub fn new(_name: &'static str) -> Self {
        PerfSpan
    }
}

#[macro_export]
macro_rules! perf_scope {
    ($name:expr) => {
        $crate::perf::PerfSpan::new($name)
    };
}
