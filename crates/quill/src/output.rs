//! Colored terminal output for the CLI.

use std::path::Path;

use console::{Style, Term};

/// Writes CLI messages to stderr.
pub(crate) struct Output {
    term: Term,
    label: Style,
    ok: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().cyan().bold(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a headline (cyan bold).
    pub(crate) fn heading(&self, msg: &str) {
        self.line(&self.label.apply_to(msg).to_string());
    }

    /// Print a labelled site directory, e.g. `  pages    /srv/blog/pages`.
    pub(crate) fn root(&self, label: &str, path: &Path) {
        self.line(&format!(
            "  {:<8} {}",
            self.label.apply_to(label),
            path.display()
        ));
    }

    /// Print a successful result (green).
    pub(crate) fn resolved(&self, msg: &str) {
        self.line(&self.ok.apply_to(msg).to_string());
    }

    /// Print a warning (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn.apply_to(msg).to_string());
    }

    /// Print an error (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.fail.apply_to(msg).to_string());
    }
}
