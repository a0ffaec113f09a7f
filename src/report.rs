use std::io::Write;

/// Sink for the human-readable status messages a run produces.
///
/// The pipeline never writes to stdout/stderr directly; the binary decides
/// where these go.
pub trait Reporter {
    fn status(&mut self, message: &str);

    fn error(&mut self, message: &str);

    /// Called after each map-phase request has been dispatched (1-based).
    fn progress(&mut self, current: usize, total: usize) {
        self.status(&format!("summarizing chunk {current}/{total}"));
    }
}

/// Writes to a terminal stream. Progress and errors always show; other
/// status lines only when `verbose` is set.
pub struct Console<W> {
    out: W,
    verbose: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Console { out, verbose }
    }
}

impl<W: Write> Reporter for Console<W> {
    fn status(&mut self, message: &str) {
        if self.verbose {
            let _ = writeln!(self.out, "{message}");
        }
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.out, "\x1b[31merror:\x1b[0m {message}");
    }

    fn progress(&mut self, current: usize, total: usize) {
        let _ = writeln!(self.out, "⏳ summarizing chunk {current}/{total}");
    }
}

/// Keeps every message in order
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub statuses: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
impl Reporter for Recorder {
    fn status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_progress_message() {
        let mut rec = Recorder::default();
        rec.progress(2, 5);
        assert_eq!(rec.statuses, vec!["summarizing chunk 2/5"]);
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn test_console_shows_progress_without_verbose() {
        let mut out = Vec::new();
        let mut console = Console::new(&mut out, false);
        console.status("API key source: env (AIza...xyz1)");
        console.progress(1, 3);
        console.error("boom");

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("API key source"));
        assert!(text.contains("summarizing chunk 1/3"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_console_verbose_shows_status() {
        let mut out = Vec::new();
        Console::new(&mut out, true).status("video: abc");
        assert_eq!(String::from_utf8(out).unwrap(), "video: abc\n");
    }
}
