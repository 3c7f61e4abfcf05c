//! Relations Orderer
//!
//! Computes the new order of a relation bucket after a batch of
//! connect/disconnect instructions, using fractional order values so rows
//! that are not moved keep their stored `order` untouched.
//!
//! ## Placement rules
//!
//! `max_order` is the greatest stored order when the orderer is built.
//!
//! | position     | new order                                   | array slot        |
//! |--------------|---------------------------------------------|-------------------|
//! | `before: X`  | `X.order - 0.5` (stored X) / `X.order`      | just before X     |
//! | `after: X`   | `X.order + 0.5` (stored X) / `X.order`      | just after X      |
//! | `start`      | `0.5`                                       | first             |
//! | `end`, none  | `max_order + 0.5`                           | last              |
//!
//! Rows placed relative to a row that was itself connected by this orderer
//! share its order value. Those ties are resolved by [`RelationsOrderer::get_order_map`].
//!
//! ## Example
//!
//! ```
//! use cmsdb_core::models::{ConnectInstruction, RelationRow};
//! use cmsdb_core::relations::RelationsOrderer;
//!
//! # fn main() -> Result<(), cmsdb_core::db::DatabaseError> {
//! let orderer = RelationsOrderer::new(vec![RelationRow::new(2, 4.0), RelationRow::new(3, 10.0)])
//!     .connect(&[ConnectInstruction::end(4), ConnectInstruction::end(5)])?;
//!
//! let order_map = orderer.get_order_map();
//! assert_eq!(order_map[&2], 4.0);
//! assert!(order_map[&3] < order_map[&4]);
//! assert!(order_map[&4] < order_map[&5]);
//! # Ok(())
//! # }
//! ```

use super::sort::sort_connect_instructions;
use crate::db::DatabaseError;
use crate::models::{ConnectInstruction, Position, RelationId, RelationRow};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedRelation {
    id: RelationId,
    order: f64,
    /// Row was part of the set the orderer was built from
    init: bool,
}

/// Ordered relation snapshot
///
/// `connect` and `disconnect` never mutate the snapshot they are called on;
/// each returns a new one. A failed `connect` therefore leaves the caller's
/// snapshot exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationsOrderer {
    relations: Vec<OrderedRelation>,
    max_order: f64,
    strict: bool,
}

impl RelationsOrderer {
    /// Build a strict orderer from the stored rows of a relation bucket
    pub fn new(rows: impl IntoIterator<Item = RelationRow>) -> Self {
        Self::with_strict(rows, true)
    }

    /// Build an orderer choosing how unresolvable anchors are handled
    ///
    /// In non-strict mode an instruction whose anchor is neither stored nor
    /// connected by the batch is appended at the end instead of failing.
    pub fn with_strict(rows: impl IntoIterator<Item = RelationRow>, strict: bool) -> Self {
        let relations: Vec<OrderedRelation> = rows
            .into_iter()
            .map(|row| OrderedRelation {
                id: row.id,
                order: normalize_order(row.order),
                init: true,
            })
            .collect();

        let max_order = relations
            .iter()
            .map(|r| r.order)
            .reduce(f64::max)
            .unwrap_or(0.0);

        Self {
            relations,
            max_order,
            strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Remove rows from the relation
    ///
    /// Ids that are not connected are ignored.
    pub fn disconnect(&self, ids: &[RelationId]) -> Self {
        let mut next = self.clone();
        for id in ids {
            remove_relation(&mut next.relations, *id);
        }
        next
    }

    /// Connect a batch of rows, moving rows that are already connected
    ///
    /// The batch is resorted first (see [`sort_connect_instructions`]); any
    /// error is reported before a single row is placed.
    ///
    /// # Errors
    ///
    /// `DatabaseError::InvalidRelation` for duplicate ids, circular
    /// references, missing anchors (strict mode) or anchors that were
    /// disconnected from this snapshot.
    pub fn connect(&self, instructions: &[ConnectInstruction]) -> Result<Self, DatabaseError> {
        let existing: Vec<RelationId> = self.relations.iter().map(|r| r.id).collect();
        let sorted = sort_connect_instructions(instructions, &existing, self.strict)?;

        let mut next = self.clone();
        for instruction in &sorted {
            remove_relation(&mut next.relations, instruction.id);
            next.insert_relation(instruction)?;
        }

        tracing::debug!(
            "Connected {} relations, bucket now holds {} rows",
            sorted.len(),
            next.relations.len()
        );

        Ok(next)
    }

    /// Rows in their current order
    pub fn get(&self) -> Vec<RelationRow> {
        self.relations
            .iter()
            .map(|r| RelationRow::new(r.id, r.order))
            .collect()
    }

    /// Final id → order map, with every order distinct
    ///
    /// Rows sharing an order value are spread evenly inside the slot that
    /// value owns (halfway to the neighbouring values), keeping their
    /// relative array order. Rows from the initial set are never renumbered:
    /// the first one in a tied group keeps its stored order, and tied
    /// connected rows are placed below or above it according to which side
    /// of it they sit in the array. Any other initial row tied with it is
    /// left out of the map so no two ids share an order.
    pub fn get_order_map(&self) -> HashMap<RelationId, f64> {
        // Group rows by order value, preserving array order inside each group
        let mut groups: Vec<(f64, Vec<OrderedRelation>)> = Vec::new();
        let mut group_index: HashMap<u64, usize> = HashMap::new();
        for relation in &self.relations {
            let idx = *group_index
                .entry(relation.order.to_bits())
                .or_insert_with(|| {
                    groups.push((relation.order, Vec::new()));
                    groups.len() - 1
                });
            groups[idx].1.push(*relation);
        }
        groups.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut order_map = HashMap::with_capacity(self.relations.len());
        for (i, (order, members)) in groups.iter().enumerate() {
            let order = *order;
            if members.len() == 1 {
                order_map.insert(members[0].id, order);
                continue;
            }

            let low = match i {
                0 => order - 0.5,
                _ => (groups[i - 1].0 + order) / 2.0,
            };
            let high = match groups.get(i + 1) {
                Some((next, _)) => (order + next) / 2.0,
                None => order + 0.5,
            };

            match members.iter().position(|m| m.init) {
                None => spread(&mut order_map, members.iter(), low, high),
                Some(pivot) => {
                    spread(&mut order_map, members[..pivot].iter(), low, order);
                    // Further initial rows on the same value (normalized NULL
                    // orders) are not renumbered and stay out of the map
                    order_map.insert(members[pivot].id, order);
                    spread(
                        &mut order_map,
                        members[pivot..].iter().filter(|m| !m.init),
                        order,
                        high,
                    );
                }
            }
        }

        order_map
    }

    fn insert_relation(&mut self, instruction: &ConnectInstruction) -> Result<(), DatabaseError> {
        let position = instruction.position.unwrap_or(Position::End);

        let (idx, order) = match position {
            Position::Before(anchor) => {
                let (idx, relation) = self.find_anchor(instruction, anchor)?;
                let order = if relation.init {
                    relation.order - 0.5
                } else {
                    relation.order
                };
                (idx, order)
            }
            Position::After(anchor) => {
                let (idx, relation) = self.find_anchor(instruction, anchor)?;
                let order = if relation.init {
                    relation.order + 0.5
                } else {
                    relation.order
                };
                (idx + 1, order)
            }
            Position::Start => (0, 0.5),
            Position::End => (self.relations.len(), self.max_order + 0.5),
        };

        self.relations.insert(
            idx,
            OrderedRelation {
                id: instruction.id,
                order,
                init: false,
            },
        );
        Ok(())
    }

    fn find_anchor(
        &self,
        instruction: &ConnectInstruction,
        anchor: RelationId,
    ) -> Result<(usize, OrderedRelation), DatabaseError> {
        self.relations
            .iter()
            .position(|r| r.id == anchor)
            .map(|idx| (idx, self.relations[idx]))
            .ok_or_else(|| {
                DatabaseError::invalid_relation(format!(
                    "There was a problem connecting relation with id {} at position {}. The list of connect relations is not valid",
                    instruction.id,
                    instruction.describe_position()
                ))
            })
    }
}

/// Stored orders of 0 or NaN come from NULL order columns
fn normalize_order(order: f64) -> f64 {
    if order.is_finite() && order != 0.0 {
        order
    } else {
        1.0
    }
}

fn remove_relation(relations: &mut Vec<OrderedRelation>, id: RelationId) {
    if let Some(idx) = relations.iter().position(|r| r.id == id) {
        relations.remove(idx);
    }
}

/// Place members at evenly spaced values strictly inside `(low, high)`
fn spread<'a>(
    order_map: &mut HashMap<RelationId, f64>,
    members: impl Iterator<Item = &'a OrderedRelation> + Clone,
    low: f64,
    high: f64,
) {
    let count = members.clone().count();
    let step = (high - low) / (count as f64 + 1.0);
    for (k, member) in members.enumerate() {
        order_map.insert(member.id, low + step * (k as f64 + 1.0));
    }
}
