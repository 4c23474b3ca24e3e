//! Opaque connection cursors.
//!
//! A cursor is the base64 (standard alphabet, unpadded) encoding of the
//! decimal 1-based position of an edge in its connection: position 1 is `MQ`,
//! 2 is `Mg`. Cursors are stable for as long as the underlying list is.

use async_graphql::connection::CursorType;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use crate::errors::SubmissionError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct PositionCursor(pub usize);

impl PositionCursor {
    pub fn encode(position: usize) -> String {
        STANDARD_NO_PAD.encode(position.to_string())
    }

    /// Padded cursors (`MQ==`) are accepted as well.
    pub fn decode(cursor: &str) -> Result<usize, SubmissionError> {
        let invalid = || SubmissionError::InvalidCursor(cursor.to_string());

        let bytes = STANDARD_NO_PAD
            .decode(cursor.trim_end_matches('='))
            .map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;

        text.parse::<usize>()
            .ok()
            .filter(|position| *position >= 1)
            .ok_or_else(invalid)
    }
}

impl CursorType for PositionCursor {
    type Error = SubmissionError;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        Self::decode(s).map(PositionCursor)
    }

    fn encode_cursor(&self) -> String {
        Self::encode(self.0)
    }
}
