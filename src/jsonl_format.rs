use crate::sample::TrainingExample;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// One dataset line. The whole example is a single text field, the format
/// the downstream tuning tool consumes.
#[derive(Serialize, Deserialize)]
struct Record {
    text: String,
}

/// Append-only writer producing one JSON object per line.
pub struct JsonlWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> JsonlWriter<W> {
        JsonlWriter { writer }
    }

    pub fn write_example(&mut self, example: &TrainingExample) -> io::Result<()> {
        let record = Record {
            text: example.text(),
        };

        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
