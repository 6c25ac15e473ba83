use std::io::{self, Write};

/// Progress of a single transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    pub name: String,
    pub done: u64,
    pub total: u64,
}

impl TransferProgress {
    pub fn new(name: impl Into<String>, done: u64, total: u64) -> Self {
        Self {
            name: name.into(),
            done,
            total,
        }
    }

    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.done as f64 / self.total as f64) * 100.0) as u32
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// Observer for transfer progress, called in the order the transport reports it.
pub type ProgressCallback<'a> = dyn Fn(&TransferProgress) + Send + Sync + 'a;

/// A minimal progress reporter that prints percentage updates to stdout.
pub struct ConsoleProgressReporter {
    label: String,
    step_bytes: u64,
}

impl ConsoleProgressReporter {
    pub fn new(label: impl Into<String>, step_bytes: u64) -> Self {
        Self {
            label: label.into(),
            step_bytes: step_bytes.max(1),
        }
    }

    /// Print progress if a reporting threshold has been reached.
    pub fn maybe_report(&self, progress: &TransferProgress) {
        if progress.is_complete() || progress.done.is_multiple_of(self.step_bytes) {
            print!(
                "\r {} {}: {}%",
                self.label,
                progress.name,
                progress.percent()
            );
            if progress.is_complete() {
                println!();
            }
            let _ = io::stdout().flush();
        }
    }
}
