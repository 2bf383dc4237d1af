//! User notifications
//!
//! One-line notices printed to stderr, the console counterpart of toasts.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    fn icon(&self) -> &'static str {
        match self.level {
            Level::Info => "ℹ",
            Level::Success => "✓",
            Level::Error => "✕",
        }
    }

    /// Print to stderr. The log copy stays at debug so a failure is shown once.
    pub fn emit(&self) {
        tracing::debug!(level = ?self.level, message = %self.message, "Notice");
        eprintln!("{}", self);
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_display() {
        assert_eq!(Notice::success("Estate created").to_string(), "✓ Estate created");
        assert_eq!(Notice::error("HTTP 500: boom").to_string(), "✕ HTTP 500: boom");
        assert_eq!(Notice::info("hi").level, Level::Info);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_error_not_logged_at_warn() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            Notice::error("HTTP 500: boom").emit();
        });

        assert!(captured.0.lock().unwrap().is_empty());
    }
}
