//! Booking records.
//!
//! One [`Assignment`] exists per occupied (class, period) cell. Records
//! sharing a `block_slot_ids` list form one logical booking; exactly one
//! of them carries `is_first_slot_of_block`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ClassId, PeriodId, SpecialistId};

/// Reserved booking id for non-contact time.
pub const NCT: &str = "NCT";

/// What occupies a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Booking {
    /// A specialist session.
    Specialist(SpecialistId),
    /// Non-contact time placeholder: one period, no specialist.
    Nct,
}

impl Booking {
    /// Parses a booking id; `"NCT"` maps to [`Booking::Nct`].
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == NCT {
            Booking::Nct
        } else {
            Booking::Specialist(id)
        }
    }

    /// The specialist id, if this is a specialist session.
    pub fn specialist_id(&self) -> Option<&str> {
        match self {
            Booking::Specialist(id) => Some(id),
            Booking::Nct => None,
        }
    }

    /// The raw booking id (`"NCT"` for placeholders).
    pub fn as_str(&self) -> &str {
        match self {
            Booking::Specialist(id) => id,
            Booking::Nct => NCT,
        }
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Booking {
    fn from(id: String) -> Self {
        Booking::from_id(id)
    }
}

impl From<&str> for Booking {
    fn from(id: &str) -> Self {
        Booking::from_id(id)
    }
}

impl From<Booking> for String {
    fn from(booking: Booking) -> Self {
        match booking {
            Booking::Specialist(id) => id,
            Booking::Nct => NCT.to_string(),
        }
    }
}

/// One occupied (class, period) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Booked class.
    pub class_id: ClassId,
    /// Occupied period.
    pub period_id: PeriodId,
    /// Specialist id or `"NCT"`.
    #[serde(rename = "specialistId")]
    pub booking: Booking,
    /// Set on the first period of the block only.
    pub is_first_slot_of_block: bool,
    /// Every period of the block, in day order.
    pub block_slot_ids: Vec<PeriodId>,
}

impl Assignment {
    /// Builds the records for one block, one per slot.
    pub fn block(class_id: &str, booking: &Booking, slots: &[PeriodId]) -> Vec<Assignment> {
        slots
            .iter()
            .enumerate()
            .map(|(i, period_id)| Assignment {
                class_id: class_id.to_string(),
                period_id: period_id.clone(),
                booking: booking.clone(),
                is_first_slot_of_block: i == 0,
                block_slot_ids: slots.to_vec(),
            })
            .collect()
    }

    /// The specialist id, if not NCT.
    #[inline]
    pub fn specialist_id(&self) -> Option<&str> {
        self.booking.specialist_id()
    }

    /// Whether this is a non-contact time placeholder.
    #[inline]
    pub fn is_nct(&self) -> bool {
        self.booking == Booking::Nct
    }

    /// Number of periods in the block.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.block_slot_ids.len()
    }

    /// Whether another record belongs to the same logical booking.
    pub fn same_block(&self, other: &Assignment) -> bool {
        self.class_id == other.class_id && self.block_slot_ids == other.block_slot_ids
    }
}
