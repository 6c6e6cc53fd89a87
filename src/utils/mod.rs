use std::time::{Duration, Instant};
use tracing::info;

/// Logs how long a CLI stage took once it goes out of scope.
pub struct StageTimer {
    stage: &'static str,
    target: String,
    start: Instant,
}

impl StageTimer {
    pub fn start(stage: &'static str, target: impl ToString) -> Self {
        let target = target.to_string();
        info!("{} {}", stage, target);
        Self {
            stage,
            target,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        info!("{} {} finished in {:.2?}", self.stage, self.target, self.elapsed());
    }
}
