use crate::input::{validate_field, FieldSelection, InputRecord};
use std::io::{BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("failed to write prompt: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to read answer: {0}")]
    Read(#[source] std::io::Error),
    #[error("input closed while waiting for {0}")]
    Closed(String),
}

/// Line-oriented question and answer over any reader and writer.
pub struct Prompter<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Prompter<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{line}").map_err(PromptError::Write)
    }

    /// Asks once and returns the trimmed answer. End of input is an error.
    pub fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question}").map_err(PromptError::Write)?;
        self.output.flush().map_err(PromptError::Write)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(PromptError::Read)?;
        if read == 0 {
            return Err(PromptError::Closed(question.trim().to_string()));
        }
        Ok(line.trim().to_string())
    }

    /// Re-asks until the answer names a field of the first record.
    pub fn select_field(
        &mut self,
        records: &[InputRecord],
        question: &str,
    ) -> Result<String, PromptError> {
        loop {
            let answer = self.ask(question)?;
            match validate_field(records, &answer) {
                FieldSelection::Present(field) => return Ok(field),
                FieldSelection::Missing { .. } => self.say("Invalid field name")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FieldValue;
    use std::io::Cursor;

    fn records() -> Vec<InputRecord> {
        vec![InputRecord::new(vec![
            ("team".to_string(), FieldValue::Delimited("eng".to_string())),
            ("people".to_string(), FieldValue::Delimited("Alice".to_string())),
        ])]
    }

    #[test]
    fn select_field_repeats_until_valid() {
        let mut input = Cursor::new("teams\n  team \n");
        let mut output = Vec::new();
        let field = Prompter::new(&mut input, &mut output)
            .select_field(&records(), "channel field: ")
            .expect("field");
        assert_eq!(field, "team");
        let printed = String::from_utf8(output).expect("utf8");
        assert_eq!(printed.matches("channel field: ").count(), 2);
        assert!(printed.contains("Invalid field name"));
    }

    #[test]
    fn closed_input_stops_the_loop() {
        let mut input = Cursor::new("nope\n");
        let mut output = Vec::new();
        let err = Prompter::new(&mut input, &mut output)
            .select_field(&records(), "member field: ")
            .expect_err("closed");
        assert!(matches!(err, PromptError::Closed(ref what) if what == "member field:"));
    }
}
