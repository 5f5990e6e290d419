use crate::facts::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;

type ProgressCallback = Box<dyn Fn() -> (u64, u64, String) + Send + Sync>;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len} {msg}";

/// Progress bar on stderr that stays hidden for short runs.
///
/// The bar only becomes visible once the run outlives the delay given at construction; a
/// background task polls the current callback and redraws at a fixed rate.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    visible_after: Instant,
    visible: Arc<AtomicBool>,
    callback: Arc<Mutex<ProgressCallback>>,
    refresh_task: Arc<JoinHandle<()>>,
    use_colors: bool,
}

impl ProgressReporter {
    /// Create a reporter. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        let visible_after = Instant::now() + delay;
        let visible = Arc::new(AtomicBool::new(false));
        let callback = Arc::new(Mutex::new(Box::new(|| (0u64, 0u64, String::new())) as ProgressCallback));

        let refresh_task = tokio::spawn(refresh(bar.clone(), visible_after, Arc::clone(&visible), Arc::clone(&callback)));

        Self {
            bar,
            visible_after,
            visible,
            callback,
            refresh_task: Arc::new(refresh_task),
            use_colors,
        }
    }

    fn style(&self) -> ProgressStyle {
        let template = if self.use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    fn set_determinate(&self, callback: Box<dyn Fn() -> (u64, u64, String) + Send + Sync + 'static>) {
        *self.callback.lock().unwrap_or_else(PoisonError::into_inner) = callback;
        self.bar.set_length(0);
        self.bar.set_position(0);
        self.bar.set_style(self.style());
    }

    fn done(&self) {
        self.refresh_task.abort();
        if self.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .field("use_colors", &self.use_colors)
            .finish_non_exhaustive()
    }
}

async fn refresh(bar: ProgressBar, visible_after: Instant, visible: Arc<AtomicBool>, callback: Arc<Mutex<ProgressCallback>>) {
    let mut interval = tokio::time::interval(REFRESH_INTERVAL);
    #[expect(clippy::infinite_loop, reason = "task runs until aborted")]
    loop {
        let _ = interval.tick().await;

        if !visible.load(Ordering::Relaxed) {
            if Instant::now() < visible_after {
                continue;
            }
            visible.store(true, Ordering::Relaxed);
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }

        let (total, done, message) = {
            let current = callback.lock().unwrap_or_else(PoisonError::into_inner);
            current()
        };

        if total > 0 {
            bar.set_length(total);
            bar.set_position(done);
        }
        bar.set_message(message);
    }
}
