//! Timetable quality summary.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Booked periods | Occupied (class, period) cells |
//! | Blocks | Logical bookings (first-slot records) |
//! | Placement rate | Placed / eligible (specialist, class) pairs |
//! | Soft-window blocks | Specialist blocks touching a minimize window |

use std::collections::BTreeMap;

use crate::context::SchedulingContext;
use crate::evaluator::block_penalty;
use crate::models::{Booking, SpecialistId, TimePeriod, Timetable};

/// Timetable indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableSummary {
    /// Occupied cells.
    pub booked_periods: usize,
    /// Logical bookings, NCT included.
    pub total_blocks: usize,
    /// NCT placeholders.
    pub nct_blocks: usize,
    /// Specialist blocks per specialist id.
    pub blocks_by_specialist: BTreeMap<SpecialistId, usize>,
    /// (specialist, eligible class) pairs in the configuration.
    pub eligible_pairs: usize,
    /// Eligible pairs holding a booking.
    pub placed_pairs: usize,
    /// `placed_pairs / eligible_pairs` (1.0 when nothing is eligible).
    pub placement_rate: f64,
    /// Specialist blocks with at least one period in a minimize window.
    pub soft_window_blocks: usize,
}

impl TimetableSummary {
    /// Computes the summary of a timetable against its configuration.
    pub fn calculate(ctx: &SchedulingContext<'_>, timetable: &Timetable) -> Self {
        let config = ctx.config();
        let mut blocks_by_specialist: BTreeMap<SpecialistId, usize> = BTreeMap::new();
        let mut nct_blocks = 0;
        let mut soft_window_blocks = 0;

        for block in timetable.blocks() {
            match &block.booking {
                Booking::Nct => nct_blocks += 1,
                Booking::Specialist(id) => {
                    *blocks_by_specialist.entry(id.clone()).or_insert(0) += 1;

                    let Some(class) = ctx.class(&block.class_id) else {
                        continue;
                    };
                    let periods: Vec<&TimePeriod> = block
                        .block_slot_ids
                        .iter()
                        .filter_map(|slot| ctx.period(slot))
                        .collect();
                    if block_penalty(&class.year_level(), &periods, &config.constraints) > 0 {
                        soft_window_blocks += 1;
                    }
                }
            }
        }

        let mut eligible_pairs = 0;
        let mut placed_pairs = 0;
        for specialist in &config.specialists {
            let booking = Booking::Specialist(specialist.id.clone());
            for class in &config.classes {
                if !specialist.is_eligible(&class.year_level()) {
                    continue;
                }
                eligible_pairs += 1;
                if timetable.has_booking(&class.id, &booking) {
                    placed_pairs += 1;
                }
            }
        }

        let placement_rate = if eligible_pairs > 0 {
            placed_pairs as f64 / eligible_pairs as f64
        } else {
            1.0
        };

        Self {
            booked_periods: timetable.len(),
            total_blocks: timetable.block_count(),
            nct_blocks,
            blocks_by_specialist,
            eligible_pairs,
            placed_pairs,
            placement_rate,
            soft_window_blocks,
        }
    }
}
