//! Runtime settings resolved from the environment.

use crate::models::OutputFormat;
use tracing::warn;

/// Process-level export settings. Absent or malformed environment values
/// fall back to the defaults with a warning rather than failing startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Worker count for pooled reads. `None` lets the pool size itself.
    pub export_threads: Option<usize>,
    /// Format preference order handed to formatters, most preferred first.
    pub preferred_formats: Vec<OutputFormat>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_threads: None,
            preferred_formats: vec![OutputFormat::Machine],
        }
    }
}

impl Settings {
    /// Reads `EXPORT_THREADS` and `EXPORT_PREFERRED_FORMATS` (a
    /// comma-separated list of format names) from the environment.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(raw) = std::env::var("EXPORT_THREADS") {
            match raw.trim().parse::<usize>() {
                Ok(threads) if threads > 0 => settings.export_threads = Some(threads),
                _ => warn!("Ignoring invalid EXPORT_THREADS value: '{raw}'"),
            }
        }

        if let Ok(raw) = std::env::var("EXPORT_PREFERRED_FORMATS") {
            let mut formats = Vec::new();
            for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match name.parse::<OutputFormat>() {
                    Ok(format) => formats.push(format),
                    Err(_) => warn!("Ignoring unknown output format: '{name}'"),
                }
            }
            if !formats.is_empty() {
                settings.preferred_formats = formats;
            }
        }

        settings
    }
}
