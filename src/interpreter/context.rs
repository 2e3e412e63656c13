use super::SystemContext;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Writes output to stdout and diagnostics to stderr, and reads input from stdin.
pub struct StdioContext;

impl SystemContext for StdioContext {
    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }

    fn read_line(&mut self, prompt: &str) -> String {
        if !prompt.is_empty() {
            print!("{prompt}");
            let _ = io::stdout().flush();
        }
        let mut line = String::new();
        if let Err(error) = io::stdin().lock().read_line(&mut line) {
            tracing::warn!(%error, "failed to read a line from stdin");
            line.clear();
        }
        line.truncate(line.trim_end_matches(['\r', '\n']).len());
        line
    }

    fn report(&mut self, diagnostic: &str) {
        eprintln!("{diagnostic}");
    }
}

/// Collects output and diagnostics in memory and serves input from a script.
#[derive(Debug, Default)]
pub struct BufferedContext {
    buffer: String,
    diagnostics: String,
    input: VecDeque<String>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines handed out, in order, by `read_line`. Once exhausted it yields empty strings.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn output(&self) -> &str {
        &self.buffer
    }

    pub fn diagnostics(&self) -> &str {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (String, String) {
        (self.buffer, self.diagnostics)
    }
}

impl SystemContext for BufferedContext {
    fn writeln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn read_line(&mut self, prompt: &str) -> String {
        self.buffer.push_str(prompt);
        self.input.pop_front().unwrap_or_default()
    }

    fn report(&mut self, diagnostic: &str) {
        self.diagnostics.push_str(diagnostic);
        self.diagnostics.push('\n');
    }
}
