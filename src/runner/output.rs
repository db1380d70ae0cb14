//! Captured output accumulation.

/// Accumulator for the merged stdout+stderr stream of a subprocess.
///
/// Lines are appended in arrival order and joined with `\n`. The joined
/// text carries no leading and no trailing newline; an empty first line
/// still counts toward the separator placement.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    text: String,
    lines: usize,
}

impl CapturedOutput {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of output.
    pub fn push_line(&mut self, line: &str) {
        if self.lines > 0 {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.lines += 1;
    }

    /// Number of lines captured so far.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Whether any line has been captured.
    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// The joined text so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the accumulator, yielding the joined text.
    pub fn into_string(self) -> String {
        self.text
    }
}
