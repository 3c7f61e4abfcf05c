//! Relation Ordering Types
//!
//! Rows of a relation "bucket" (one owning entity, one relation field) and the
//! instructions used to connect rows into it.
//!
//! ## Example Connect Payload
//!
//! ```json
//! [
//!   { "id": 5, "position": { "before": 1 } },
//!   { "id": 1, "position": { "after": 3 } },
//!   { "id": 7, "position": { "start": true } },
//!   { "id": 9 }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a related entity
pub type RelationId = i64;

/// One member of an ordered relation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationRow {
    pub id: RelationId,
    pub order: f64,
}

impl RelationRow {
    pub fn new(id: RelationId, order: f64) -> Self {
        Self { id, order }
    }
}

/// Where a connected row is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub enum Position {
    Before(RelationId),
    After(RelationId),
    Start,
    End,
}

impl Position {
    /// The row this position is relative to, if any
    pub fn adjacent(&self) -> Option<RelationId> {
        match self {
            Position::Before(id) | Position::After(id) => Some(*id),
            Position::Start | Position::End => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Before(id) => write!(f, "{{\"before\":{}}}", id),
            Position::After(id) => write!(f, "{{\"after\":{}}}", id),
            Position::Start => f.write_str("{\"start\":true}"),
            Position::End => f.write_str("{\"end\":true}"),
        }
    }
}

/// Wire shape of a position: an object with exactly one anchor key
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    before: Option<RelationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after: Option<RelationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<bool>,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        let start = raw.start.unwrap_or(false);
        let end = raw.end.unwrap_or(false);
        match (raw.before, raw.after, start, end) {
            (Some(id), None, false, false) => Ok(Position::Before(id)),
            (None, Some(id), false, false) => Ok(Position::After(id)),
            (None, None, true, false) => Ok(Position::Start),
            // An empty position object means "append"
            (None, None, false, _) => Ok(Position::End),
            _ => Err(
                "a position must contain exactly one of before, after, start or end".to_string(),
            ),
        }
    }
}

impl From<Position> for RawPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Before(id) => RawPosition {
                before: Some(id),
                ..Default::default()
            },
            Position::After(id) => RawPosition {
                after: Some(id),
                ..Default::default()
            },
            Position::Start => RawPosition {
                start: Some(true),
                ..Default::default()
            },
            Position::End => RawPosition {
                end: Some(true),
                ..Default::default()
            },
        }
    }
}

/// Request to connect a row into the relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectInstruction {
    pub id: RelationId,

    /// Missing position means "append at the end"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl ConnectInstruction {
    pub fn new(id: RelationId, position: Option<Position>) -> Self {
        Self { id, position }
    }

    pub fn before(id: RelationId, anchor: RelationId) -> Self {
        Self::new(id, Some(Position::Before(anchor)))
    }

    pub fn after(id: RelationId, anchor: RelationId) -> Self {
        Self::new(id, Some(Position::After(anchor)))
    }

    pub fn start(id: RelationId) -> Self {
        Self::new(id, Some(Position::Start))
    }

    pub fn end(id: RelationId) -> Self {
        Self::new(id, Some(Position::End))
    }

    /// Id referenced by a `before`/`after` position
    pub fn adjacent(&self) -> Option<RelationId> {
        self.position.and_then(|p| p.adjacent())
    }

    pub(crate) fn describe_position(&self) -> String {
        match self.position {
            Some(position) => position.to_string(),
            None => "{}".to_string(),
        }
    }
}

/// Request to remove a row from the relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectInstruction {
    pub id: RelationId,
}

impl From<RelationId> for DisconnectInstruction {
    fn from(id: RelationId) -> Self {
        Self { id }
    }
}
