// Output capture for console.log

use crate::parser::ast::SourceLocation;

/// Destination for captured `console.log` output.
///
/// The interpreter receives the sink as an explicit parameter for the duration of
/// one run; nothing global is swapped out, so nothing has to be restored.
pub trait OutputSink {
    /// Append one already-formatted line (without its trailing newline)
    fn write_line(&mut self, line: &str, location: SourceLocation);
}

/// In-memory transcript of one run
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    text: String,
    lines: Vec<TranscriptLine>,
}

/// A captured line with the source location of the call that printed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub text: String,
    pub location: SourceLocation,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated text: every captured line followed by `\n`
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Append raw text that is not a console line (the run's result value)
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

impl OutputSink for Transcript {
    fn write_line(&mut self, line: &str, location: SourceLocation) {
        self.text.push_str(line);
        self.text.push('\n');
        self.lines.push(TranscriptLine {
            text: line.to_string(),
            location,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_end_with_newline() {
        let mut transcript = Transcript::new();
        transcript.write_line("hi", SourceLocation::new(1, 1));
        transcript.write_line("", SourceLocation::new(2, 1));

        assert_eq!(transcript.as_str(), "hi\n\n");
        assert_eq!(transcript.lines().len(), 2);
        assert_eq!(transcript.lines()[1].location.line, 2);
    }

    #[test]
    fn test_push_str_is_not_a_line() {
        let mut transcript = Transcript::new();
        transcript.write_line("a", SourceLocation::new(1, 1));
        transcript.push_str("42");

        assert_eq!(transcript.into_string(), "a\n42");
    }
}
