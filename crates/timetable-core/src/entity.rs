//! Reference entities — the four lookup tables a schedule entry points at.
//!
//! Groups, subjects, teachers and rooms are structurally identical: one
//! display string each. They are modelled as a single [`RefEntity`] struct
//! discriminated by [`RefKind`] rather than four copies of the same type.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which of the four reference tables an entity belongs to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefKind {
  /// Student group, identified by name.
  Group,
  /// Taught discipline ("object" in the wire API).
  Subject,
  /// Faculty member ("prep"), identified by full name.
  Teacher,
  /// Physical room ("aud"), identified by a number string.
  Room,
}

impl RefKind {
  /// Wire name of the display field for this kind (`name`, `fio`, `number`).
  pub fn display_field(self) -> &'static str {
    match self {
      RefKind::Group | RefKind::Subject => "name",
      RefKind::Teacher => "fio",
      RefKind::Room => "number",
    }
  }
}

/// One row of a reference table.
///
/// `name` holds whatever the kind's display string is: a group or subject
/// name, a teacher's full name, or a room number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefEntity {
  pub id:   crate::EntityId,
  pub name: String,
}
