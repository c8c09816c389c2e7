// The problem shown beside the editor

/// A fixed problem statement with one worked example
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub heading: &'static str,
    pub statement: &'static str,
    pub example_input: &'static str,
    pub example_output: &'static str,
}

pub const REVERSE_STRING: Problem = Problem {
    heading: "Problem Statement",
    statement: "Given a string, the task is to reverse the order of the letters in the given string.",
    example_input: "s = \"shreyas\"",
    example_output: "sayerhs",
};

impl Problem {
    /// Lines of the problem pane, in display order
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.statement.to_string(),
            String::new(),
            "Example:".to_string(),
            format!("Input {}", self.example_input),
            format!("Output: {}", self.example_output),
        ]
    }
}
