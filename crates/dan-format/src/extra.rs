//! Named extras attached to a world.
//!
//! Extras are opaque byte payloads keyed by name. Two payload layouts are
//! produced by the tooling:
//! - position: `f64 x, f64 y, f64 z, f32 yaw, f32 pitch`, relative to the
//!   selection minimum (32 bytes)
//! - text: `i32 length` followed by UTF-8 bytes

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use dan_core::error::DanError;
use dan_core::types::Selection;
use serde::Serialize;
use std::io::Cursor;

use crate::FormatResult;

const POSITION_LEN: usize = 32;

/// Raw extra payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extra {
    pub data: Vec<u8>,
}

/// A position inside the exported region, with view angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

/// Best-effort interpretation of an extra payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtraValue {
    Position(Position),
    Text { value: String },
    Raw { bytes: Vec<u8> },
}

impl Extra {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Encode an absolute position relative to the selection minimum
    pub fn position(
        selection: &Selection,
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
    ) -> FormatResult<Self> {
        if !selection.contains(x, y, z) {
            return Err(DanError::OutOfSelection { x, y, z });
        }

        let relative = [
            x - selection.min.x as f64,
            y - selection.min.y as f64,
            z - selection.min.z as f64,
        ];

        let mut data = Vec::with_capacity(POSITION_LEN);
        for coord in relative {
            data.write_f64::<BigEndian>(coord)
                .map_err(|e| DanError::io("Failed to encode position extra", e))?;
        }
        for angle in [yaw, pitch] {
            data.write_f32::<BigEndian>(angle)
                .map_err(|e| DanError::io("Failed to encode position extra", e))?;
        }

        Ok(Self { data })
    }

    /// Encode a text payload
    pub fn text(value: &str) -> Self {
        let bytes = value.as_bytes();
        let mut data = Vec::with_capacity(4 + bytes.len());
        data.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
        data.extend_from_slice(bytes);
        Self { data }
    }

    /// Decode a position payload (coordinates relative to the selection minimum)
    pub fn as_position(&self) -> Option<Position> {
        if self.data.len() != POSITION_LEN {
            return None;
        }

        let mut c = Cursor::new(&self.data);
        Some(Position {
            x: c.read_f64::<BigEndian>().ok()?,
            y: c.read_f64::<BigEndian>().ok()?,
            z: c.read_f64::<BigEndian>().ok()?,
            yaw: c.read_f32::<BigEndian>().ok()?,
            pitch: c.read_f32::<BigEndian>().ok()?,
        })
    }

    /// Decode a text payload whose length prefix matches the payload size
    pub fn as_text(&self) -> Option<String> {
        let mut c = Cursor::new(&self.data);
        let len = c.read_i32::<BigEndian>().ok()?;
        if len < 0 || len as usize != self.data.len() - 4 {
            return None;
        }
        String::from_utf8(self.data[4..].to_vec()).ok()
    }

    /// Interpret the payload, preferring text, then position
    pub fn value(&self) -> ExtraValue {
        if let Some(value) = self.as_text() {
            ExtraValue::Text { value }
        } else if let Some(pos) = self.as_position() {
            ExtraValue::Position(pos)
        } else {
            ExtraValue::Raw {
                bytes: self.data.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection::from_strings("world", "100:60:-20", "131:90:11").unwrap()
    }

    #[test]
    fn test_position_is_relative_to_min() {
        let extra = Extra::position(&selection(), 104.5, 64.0, -15.5, 90.0, -10.0).unwrap();
        assert_eq!(extra.data.len(), 32);

        let pos = extra.as_position().unwrap();
        assert_eq!(pos.x, 4.5);
        assert_eq!(pos.y, 4.0);
        assert_eq!(pos.z, 4.5);
        assert_eq!(pos.yaw, 90.0);
        assert_eq!(pos.pitch, -10.0);
        assert!(matches!(extra.value(), ExtraValue::Position(_)));
    }

    #[test]
    fn test_position_outside_selection() {
        let err = Extra::position(&selection(), 0.0, 64.0, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, DanError::OutOfSelection { .. }));
    }

    #[test]
    fn test_text_layout() {
        let extra = Extra::text("Welcome");
        assert_eq!(&extra.data[..4], &[0, 0, 0, 7]);
        assert_eq!(extra.as_text().as_deref(), Some("Welcome"));
        assert!(extra.as_position().is_none());
        assert_eq!(
            extra.value(),
            ExtraValue::Text {
                value: "Welcome".to_string()
            }
        );
    }

    #[test]
    fn test_empty_text() {
        let extra = Extra::text("");
        assert_eq!(extra.data, vec![0, 0, 0, 0]);
        assert_eq!(extra.as_text().as_deref(), Some(""));
    }

    #[test]
    fn test_raw_payload() {
        let extra = Extra::new(vec![1, 2, 3]);
        assert!(extra.as_text().is_none());
        assert!(extra.as_position().is_none());
        assert_eq!(extra.value(), ExtraValue::Raw { bytes: vec![1, 2, 3] });
    }
}
