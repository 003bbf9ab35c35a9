//! JSON writer
//!
//! One object per timeline position, with its grid placement, so a renderer
//! can draw the mosaic without knowing anything about the interpolation.

use serde_json::{json, Value};

use super::Writer;
use crate::layout::GridLayout;
use crate::timeline::{Assignment, Slot};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    layout: GridLayout,
    compact: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Single-line output instead of pretty-printed
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Build the JSON document without serializing it
    pub fn to_value(&self, assignment: &Assignment) -> Result<Value> {
        self.validate(assignment)?;

        let slots: Vec<Value> = assignment.iter().map(|s| self.slot_value(s)).collect();
        let last = assignment.last_position().unwrap_or_default();
        let (width, height) = self.layout.dimensions(self.layout.rows_for(last));

        Ok(json!({
            "first": assignment.first_position(),
            "last": assignment.last_position(),
            "complete": assignment.is_complete(),
            "unfilled": assignment.unfilled_positions(),
            "grid": {
                "columns": self.layout.columns(),
                "cell_size": self.layout.scale(),
                "width": width,
                "height": height,
            },
            "slots": slots,
        }))
    }

    fn slot_value(&self, slot: &Slot) -> Value {
        let (column, row) = self.layout.cell(slot.position);
        let rect = self.layout.rect(slot.position);

        json!({
            "position": slot.position,
            "kind": slot.kind(),
            "path": slot.path(),
            "color": slot.color().map(|c| c.to_hex()),
            "target": slot.target().to_hex(),
            "column": column,
            "row": row,
            "x": rect.x,
            "y": rect.y,
        })
    }
}

impl Writer for JsonWriter {
    type Output = String;

    fn write(&self, assignment: &Assignment) -> Result<String> {
        let value = self.to_value(assignment)?;
        let rendered = if self.compact {
            serde_json::to_string(&value)?
        } else {
            serde_json::to_string_pretty(&value)?
        };
        Ok(rendered)
    }
}
