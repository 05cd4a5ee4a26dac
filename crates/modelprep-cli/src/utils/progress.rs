use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use modelprep::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;
const PHASE_DONE: &str = "✓ Done";

/// Renders core [`Progress`] events on a single stderr progress bar.
///
/// Phases show a spinner; counted tasks (one step per input file) switch the
/// bar to a determinate style until the task finishes.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new(hidden: bool) -> Self {
        let target = if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(phase_style());
        bar.finish_and_clear();

        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |event: Progress| match bar.lock() {
            Ok(guard) => apply(&guard, event),
            Err(_) => warn!("Progress bar lock was poisoned; dropping progress event."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new(false)
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(phase_style());
            bar.set_message(name);
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message(PHASE_DONE);
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_style(task_style());
            bar.set_length(total_steps);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.finish();
        }
        Progress::Message(text) if bar.is_finished() => bar.set_message(text),
        Progress::Message(text) => bar.println(format!("  {}", text)),
    }
}

fn phase_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn task_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("=>-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden_bar() -> ProgressBar {
        ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden())
    }

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::new(true);
        let bar = handler.bar.lock().unwrap();
        assert_eq!(bar.length(), Some(0));
        assert!(bar.is_finished());
    }

    #[test]
    fn counted_task_runs_to_its_length() {
        let bar = hidden_bar();

        apply(&bar, Progress::PhaseStart { name: "Analyzing Coverage" });
        assert_eq!(bar.message(), "Analyzing Coverage");
        assert!(!bar.is_finished());

        apply(&bar, Progress::TaskStart { total_steps: 3 });
        apply(&bar, Progress::TaskIncrement);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 1);

        apply(&bar, Progress::TaskFinish);
        assert!(bar.is_finished());
        assert_eq!(bar.position(), 3);

        apply(&bar, Progress::PhaseFinish);
        assert_eq!(bar.message(), PHASE_DONE);
    }

    #[test]
    fn message_on_a_finished_bar_becomes_its_message() {
        let bar = hidden_bar();
        bar.finish();
        apply(&bar, Progress::Message("2 SSBOND record(s) added".to_string()));
        assert_eq!(bar.message(), "2 SSBOND record(s) added");
    }

    #[test]
    fn callback_can_be_driven_from_another_thread() {
        let handler = CliProgressHandler::new(true);
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Resolving Bonds",
            });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let bar = handler.bar.lock().unwrap();
        assert!(bar.is_finished());
        assert_eq!(bar.message(), PHASE_DONE);
    }
}
