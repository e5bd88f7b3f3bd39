use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Shared flag raised when the user wants the recording to end
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag once a line starting with `q` is read from `input`.
    /// Returns when the flag is raised or `input` is exhausted.
    pub fn watch_lines<R: BufRead>(&self, input: R) {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("q") {
                tracing::info!("Stop requested");
                self.request();
                return;
            }
        }
    }

    /// Watch stdin on a background thread so `q` + Enter ends the recording
    pub fn spawn_stdin_listener(&self) {
        let flag = self.clone();
        thread::spawn(move || flag.watch_lines(io::stdin().lock()));
    }
}
