//! Command representation.

use std::time::Duration;

/// An external command to be executed: the program followed by its
/// arguments, in argv order.
///
/// Immutable once handed to the runner. An optional per-command timeout
/// overrides the runner's configured default.
#[derive(Debug, Clone)]
pub struct Command {
    argv: Vec<String>,
    timeout: Option<Duration>,
}

impl Command {
    /// Create a new command from an argv sequence.
    ///
    /// The first element is the program to run; the rest are its
    /// arguments. An empty sequence is representable but is rejected by
    /// the runner at execution time.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }

    /// Set the execution timeout for this command.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// The program to execute, if the argv is non-empty.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// The arguments following the program.
    pub fn args(&self) -> &[String] {
        if self.argv.is_empty() {
            &[]
        } else {
            &self.argv[1..]
        }
    }

    /// The full argv sequence.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The per-command timeout override, if any.
    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether the argv sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }

    /// Render the command line as a single space-joined string, used in
    /// diagnostics and error payloads.
    pub fn display_line(&self) -> String {
        self.argv.join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for Command {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_new() {
        let cmd = Command::new(["ls", "-la"]);
        assert_eq!(cmd.program(), Some("ls"));
        assert_eq!(cmd.args(), &["-la".to_string()]);
        assert!(cmd.timeout_override().is_none());
        assert!(!cmd.is_empty());
    }

    #[test]
    fn test_command_timeout() {
        let cmd = Command::new(["cargo", "build"]).timeout(Duration::from_secs(60));
        assert_eq!(cmd.timeout_override(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_command_empty() {
        let cmd = Command::new(Vec::<String>::new());
        assert!(cmd.is_empty());
        assert!(cmd.program().is_none());
        assert!(cmd.args().is_empty());
    }

    #[test]
    fn test_display_line() {
        let cmd = Command::new(["git", "log", "--oneline"]);
        assert_eq!(cmd.display_line(), "git log --oneline");
    }

    #[test]
    fn test_from_iterator() {
        let cmd: Command = ["echo", "hello"].into_iter().collect();
        assert_eq!(cmd.display_line(), "echo hello");
    }
}
