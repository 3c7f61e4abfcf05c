//! Connect batch pre-sort
//!
//! `before`/`after` positions may point at a row that is only connected later
//! in the same batch. Applying such a batch in input order would look up an
//! anchor that does not exist yet, so the batch is first resorted so that
//! every anchor is placed before the instructions that reference it.

use crate::db::DatabaseError;
use crate::models::{ConnectInstruction, Position, RelationId};
use std::collections::{HashMap, HashSet};

/// Resort a connect batch so every anchor is resolved before it is used
///
/// # Arguments
///
/// * `connect` - Instructions in the order the caller sent them
/// * `existing` - Ids already present in the relation
/// * `strict` - Whether an anchor missing from both `existing` and the batch
///   is an error (`true`) or demotes the instruction to an `end` placement
///
/// # Errors
///
/// `DatabaseError::InvalidRelation` when the batch connects the same id
/// twice, contains a circular `before`/`after` chain, or (strict mode)
/// references an anchor that is neither connected nor part of the batch.
///
/// # Example
///
/// ```
/// use cmsdb_core::models::ConnectInstruction;
/// use cmsdb_core::relations::sort_connect_instructions;
///
/// let batch = vec![
///     ConnectInstruction::before(5, 1),
///     ConnectInstruction::before(1, 2),
///     ConnectInstruction::end(2),
/// ];
/// let sorted = sort_connect_instructions(&batch, &[], true).unwrap();
/// let ids: Vec<i64> = sorted.iter().map(|c| c.id).collect();
/// assert_eq!(ids, vec![2, 1, 5]);
/// ```
pub fn sort_connect_instructions(
    connect: &[ConnectInstruction],
    existing: &[RelationId],
    strict: bool,
) -> Result<Vec<ConnectInstruction>, DatabaseError> {
    let existing: HashSet<RelationId> = existing.iter().copied().collect();

    let mut by_id: HashMap<RelationId, ConnectInstruction> = HashMap::with_capacity(connect.len());
    let mut needs_sorting = false;

    for instruction in connect {
        if let Some(adjacent) = instruction.adjacent() {
            // Anchors must be either stored already or connected earlier in the batch
            if !existing.contains(&adjacent) && !by_id.contains_key(&adjacent) {
                needs_sorting = true;
            }
        }

        if by_id.insert(instruction.id, *instruction).is_some() {
            return Err(DatabaseError::invalid_relation(format!(
                "The relation with id {} is already connected. You cannot connect the same relation twice.",
                instruction.id
            )));
        }
    }

    if !needs_sorting {
        return Ok(connect.to_vec());
    }

    tracing::debug!(
        "Connect batch of {} instructions has forward references, resorting",
        connect.len()
    );

    let mut sorter = ConnectSorter {
        by_id: &by_id,
        existing: &existing,
        strict,
        computed: HashSet::with_capacity(connect.len()),
        branch: HashSet::new(),
        sorted: Vec::with_capacity(connect.len()),
    };

    for instruction in connect {
        sorter.compute(instruction)?;
    }

    Ok(sorter.sorted)
}

/// Depth-first resolution state
struct ConnectSorter<'a> {
    by_id: &'a HashMap<RelationId, ConnectInstruction>,
    existing: &'a HashSet<RelationId>,
    strict: bool,
    computed: HashSet<RelationId>,
    /// Ids on the current dependency path
    branch: HashSet<RelationId>,
    sorted: Vec<ConnectInstruction>,
}

impl ConnectSorter<'_> {
    fn compute(&mut self, instruction: &ConnectInstruction) -> Result<(), DatabaseError> {
        let adjacent = instruction.adjacent();

        if let Some(adjacent) = adjacent {
            if self.branch.contains(&adjacent) {
                return Err(DatabaseError::invalid_relation(
                    "A circular reference was found in the connect array. One relation is trying to connect before/after another one that is trying to connect before/after it",
                ));
            }
        }

        if self.computed.contains(&instruction.id) {
            return Ok(());
        }

        let adjacent = match adjacent {
            // start/end placements depend on nothing
            None => {
                self.emit(*instruction);
                return Ok(());
            }
            Some(adjacent) => adjacent,
        };

        match self.by_id.get(&adjacent) {
            Some(anchor) => {
                self.branch.insert(instruction.id);
                let resolved = self.compute(anchor);
                self.branch.remove(&instruction.id);
                resolved?;
            }
            None if self.existing.contains(&adjacent) => {}
            None if self.strict => {
                return Err(DatabaseError::invalid_relation(format!(
                    "There was a problem connecting relation with id {} at position {}. The relation with id {} needs to be connected first.",
                    instruction.id,
                    instruction.describe_position(),
                    adjacent
                )));
            }
            None => {
                tracing::debug!(
                    "Anchor {} of relation {} is not connected, appending relation at the end",
                    adjacent,
                    instruction.id
                );
                self.emit(ConnectInstruction::new(instruction.id, Some(Position::End)));
                return Ok(());
            }
        }

        self.emit(*instruction);
        Ok(())
    }

    fn emit(&mut self, instruction: ConnectInstruction) {
        self.computed.insert(instruction.id);
        self.sorted.push(instruction);
    }
}
