//! The timetable: sparse (class, period) -> assignment store.
//!
//! Two-level ordered index (class -> period -> record), so cell lookups
//! are map lookups and iteration order is stable across runs.
//!
//! Mutation is crate-private. Commands and the generator validate first
//! and then call [`Timetable::insert_block`] / [`Timetable::remove_block`],
//! which keep the per-cell uniqueness and block-sharing invariants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Assignment, Booking, ClassId, PeriodId};

/// A weekly timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timetable {
    cells: BTreeMap<ClassId, BTreeMap<PeriodId, Assignment>>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// The record at a cell.
    pub fn get(&self, class_id: &str, period_id: &str) -> Option<&Assignment> {
        self.cells.get(class_id)?.get(period_id)
    }

    /// Whether a cell is occupied.
    #[inline]
    pub fn is_occupied(&self, class_id: &str, period_id: &str) -> bool {
        self.get(class_id, period_id).is_some()
    }

    /// All records for a class, ordered by period id.
    pub fn class_records(&self, class_id: &str) -> impl Iterator<Item = &Assignment> {
        self.cells.get(class_id).into_iter().flat_map(|row| row.values())
    }

    /// All records, ordered by class then period id.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.cells.values().flat_map(|row| row.values())
    }

    /// All records with the (class, period) key they are stored under.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &Assignment)> {
        self.cells.iter().flat_map(|(class_id, row)| {
            row.iter()
                .map(move |(period_id, record)| (class_id.as_str(), period_id.as_str(), record))
        })
    }

    /// First-slot records only: one per logical booking.
    pub fn blocks(&self) -> impl Iterator<Item = &Assignment> {
        self.iter().filter(|a| a.is_first_slot_of_block)
    }

    /// Every record of the booking occupying a cell, in block order.
    pub fn block_at(&self, class_id: &str, period_id: &str) -> Vec<&Assignment> {
        let Some(anchor) = self.get(class_id, period_id) else {
            return Vec::new();
        };
        anchor
            .block_slot_ids
            .iter()
            .filter_map(|slot| self.get(class_id, slot))
            .filter(|record| record.same_block(anchor))
            .collect()
    }

    /// First-slot records for a specialist.
    pub fn blocks_for_specialist<'a>(
        &'a self,
        specialist_id: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.blocks()
            .filter(move |a| a.specialist_id() == Some(specialist_id))
    }

    /// Whether the class already holds a booking of this specialist.
    pub fn has_booking(&self, class_id: &str, booking: &Booking) -> bool {
        self.class_records(class_id).any(|a| &a.booking == booking)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(BTreeMap::is_empty)
    }

    /// Number of logical bookings.
    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Writes one block, replacing whatever occupies its slots.
    ///
    /// Any booking overlapping a target slot is removed in full first,
    /// so no orphaned half-blocks remain. Returns the written records.
    pub(crate) fn insert_block(
        &mut self,
        class_id: &str,
        booking: &Booking,
        slots: &[PeriodId],
    ) -> Vec<Assignment> {
        for slot in slots {
            self.remove_block(class_id, slot);
        }
        let records = Assignment::block(class_id, booking, slots);
        let row = self.cells.entry(class_id.to_string()).or_default();
        for record in &records {
            row.insert(record.period_id.clone(), record.clone());
        }
        records
    }

    /// Removes the booking occupying a cell, cascading to its whole block.
    ///
    /// Only records sharing the anchor's `block_slot_ids` are removed.
    /// Returns the removed records in block order; empty if the cell was free.
    pub(crate) fn remove_block(&mut self, class_id: &str, period_id: &str) -> Vec<Assignment> {
        let Some(row) = self.cells.get_mut(class_id) else {
            return Vec::new();
        };
        let Some(anchor) = row.get(period_id).cloned() else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(anchor.block_len());
        for slot in &anchor.block_slot_ids {
            if row.get(slot).is_some_and(|record| record.same_block(&anchor)) {
                if let Some(record) = row.remove(slot) {
                    removed.push(record);
                }
            }
        }
        // A record whose own block list omits its cell is still removed.
        if let Some(record) = row.remove(period_id) {
            removed.push(record);
        }
        if row.is_empty() {
            self.cells.remove(class_id);
        }
        removed
    }

    /// Empties the timetable. Returns the number of removed records.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.len();
        self.cells.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(ids: &[&str]) -> Vec<PeriodId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Timetable {
        let mut t = Timetable::new();
        t.insert_block("3A", &Booking::from("pe"), &slots(&["p1", "p2"]));
        t.insert_block("3A", &Booking::Nct, &slots(&["p4"]));
        t.insert_block("4B", &Booking::from("art"), &slots(&["p1"]));
        t
    }

    #[test]
    fn test_lookup_and_counts() {
        let t = sample();
        assert_eq!(t.len(), 4);
        assert_eq!(t.block_count(), 3);
        assert!(t.is_occupied("3A", "p2"));
        assert!(!t.is_occupied("3A", "p3"));
        assert_eq!(t.get("4B", "p1").unwrap().specialist_id(), Some("art"));
        assert!(t.has_booking("3A", &Booking::Nct));
        assert!(!t.has_booking("4B", &Booking::Nct));
        assert_eq!(t.blocks_for_specialist("pe").count(), 1);
    }

    #[test]
    fn test_block_at_any_slot() {
        let t = sample();
        let from_first = t.block_at("3A", "p1");
        let from_second = t.block_at("3A", "p2");
        assert_eq!(from_first.len(), 2);
        assert_eq!(from_first, from_second);
        assert!(t.block_at("3A", "p9").is_empty());
    }

    #[test]
    fn test_remove_block_cascades() {
        let mut t = sample();
        let removed = t.remove_block("3A", "p2");
        assert_eq!(removed.len(), 2);
        assert!(!t.is_occupied("3A", "p1"));
        assert!(!t.is_occupied("3A", "p2"));
        // Other bookings untouched
        assert!(t.is_occupied("3A", "p4"));
        assert!(t.is_occupied("4B", "p1"));
    }

    #[test]
    fn test_remove_empty_cell() {
        let mut t = sample();
        assert!(t.remove_block("3A", "p3").is_empty());
        assert!(t.remove_block("9Z", "p1").is_empty());
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_insert_replaces_overlapping_block() {
        let mut t = sample();
        // Overlaps p2 of the PE block: whole PE block goes.
        t.insert_block("3A", &Booking::from("music"), &slots(&["p2", "p3"]));
        assert!(!t.is_occupied("3A", "p1"));
        assert_eq!(t.get("3A", "p2").unwrap().specialist_id(), Some("music"));
        assert_eq!(t.len(), 4);
        assert_eq!(t.block_at("3A", "p3").len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut t = sample();
        assert_eq!(t.clear(), 4);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_serialization_is_ordered() {
        let mut a = Timetable::new();
        a.insert_block("4B", &Booking::from("art"), &slots(&["p1"]));
        a.insert_block("3A", &Booking::from("pe"), &slots(&["p1", "p2"]));

        let mut b = Timetable::new();
        b.insert_block("3A", &Booking::from("pe"), &slots(&["p1", "p2"]));
        b.insert_block("4B", &Booking::from("art"), &slots(&["p1"]));

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
