//! Plain text writer: one tab-separated line per position

use super::Writer;
use crate::timeline::Assignment;
use crate::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl TextWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Writer for TextWriter {
    type Output = String;

    fn write(&self, assignment: &Assignment) -> Result<String> {
        self.validate(assignment)?;

        let mut lines = Vec::with_capacity(assignment.len());
        for slot in assignment {
            let color = slot
                .color()
                .map(|c| c.to_hex())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "{}\t{}\t{}\t{}\t{}",
                slot.position,
                slot.kind(),
                color,
                slot.target(),
                slot.path().unwrap_or("-"),
            ));
        }

        let unfilled = assignment.unfilled_positions();
        if !unfilled.is_empty() {
            let positions: Vec<String> = unfilled.iter().map(|p| p.to_string()).collect();
            lines.push(format!("# unfilled: {}", positions.join(", ")));
        }

        Ok(lines.join("\n"))
    }
}
