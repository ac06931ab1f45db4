//! Progress display for chunk exports.

use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Single-line progress bar on stderr
pub struct ProgressBar {
    total: u64,
    current: u64,
    start_time: Instant,
    last_update: Instant,
    message: String,
}

impl ProgressBar {
    pub fn new(total: u64, message: String) -> Self {
        let now = Instant::now();
        Self {
            total,
            current: 0,
            start_time: now,
            last_update: now,
            message,
        }
    }

    /// Update progress, redrawing at most every 100ms
    pub fn update(&mut self, current: u64, total: u64) {
        self.current = current;
        self.total = total;
        let now = Instant::now();

        if current == total || now.duration_since(self.last_update) > Duration::from_millis(100) {
            self.display();
            self.last_update = now;
        }
    }

    pub fn finish(&self) {
        self.display();
        eprintln!();
    }

    fn percentage(&self) -> u64 {
        if self.total > 0 {
            (self.current * 100) / self.total
        } else {
            100
        }
    }

    fn display(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            (self.current as f64 / elapsed) as u64
        } else {
            0
        };

        let mut stderr = io::stderr();
        let _ = write!(
            stderr,
            "\r{} [{}/{}] {}% ({} chunks/s)",
            self.message,
            self.current,
            self.total,
            self.percentage(),
            rate
        );
        let _ = stderr.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut bar = ProgressBar::new(8, "Exporting".to_string());
        assert_eq!(bar.percentage(), 0);
        bar.update(2, 8);
        assert_eq!(bar.percentage(), 25);
        bar.update(8, 8);
        assert_eq!(bar.percentage(), 100);

        let empty = ProgressBar::new(0, "Exporting".to_string());
        assert_eq!(empty.percentage(), 100);
    }
}
