//! A single submitted move.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{PieceKind, Square};

/// Source `(x, y)`, destination `(xnew, ynew)` and an optional promotion piece.
///
/// Coordinates are signed because clients submit them raw; the validator
/// rejects anything off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub x: i32,
    pub y: i32,
    pub xnew: i32,
    pub ynew: i32,
    #[serde(rename = "new_piece", default, with = "promotion_letter")]
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            x: from.x as i32,
            y: from.y as i32,
            xnew: to.x as i32,
            ynew: to.y as i32,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    pub fn from_square(&self) -> Option<Square> {
        Square::new(self.x, self.y)
    }

    pub fn to_square(&self) -> Option<Square> {
        Square::new(self.xnew, self.ynew)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from_square(), self.to_square()) {
            (Some(from), Some(to)) => write!(f, "{from}{to}")?,
            _ => write!(f, "({},{})->({},{})", self.x, self.y, self.xnew, self.ynew)?,
        }
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

/// Promotion travels as a piece letter; clients send `""` for "none".
mod promotion_letter {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::board::PieceKind;

    pub fn serialize<S: Serializer>(value: &Option<PieceKind>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(kind) => s.serialize_str(&kind.letter().to_ascii_uppercase().to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PieceKind>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        let raw = raw.unwrap_or_default();
        let mut chars = raw.trim().chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(None),
            (Some(c), None) => PieceKind::from_letter(c)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid promotion piece {c:?}"))),
            _ => Err(D::Error::custom(format!("invalid promotion piece {raw:?}"))),
        }
    }
}
