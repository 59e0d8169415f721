//! Randomized greedy timetable generator.
//!
//! # Algorithm
//!
//! 1. Order specialists by descending duration (stable: ties keep input
//!    order). Long blocks go first, before the grid fragments.
//! 2. For each specialist, collect the eligible classes and shuffle them.
//! 3. For each class, shuffle the full period list and take the first
//!    start period whose block is available and clear of avoid windows.
//!    With `soft_minimize`, a block touching a minimize window is only
//!    taken when no penalty-free block exists for that class.
//! 4. A pair with no suitable start is skipped and reported. The run
//!    never fails and never backtracks.
//!
//! All shuffles draw from one `ChaCha8Rng` seeded from
//! [`GeneratorOptions::seed`], so a seed fully determines the result.
//!
//! # Complexity
//! O(s * c * p * b) for s specialists, c classes, p periods, block size b.

use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::availability::{check_availability, slot_ids, ReplacePolicy};
use crate::context::SchedulingContext;
use crate::error::{SchedulingError, SchedulingResult};
use crate::evaluator::{block_penalty, block_violation};
use crate::models::{
    Booking, ClassGroup, ClassId, SchedulingConfig, Specialist, SpecialistId, TimePeriod,
    Timetable, YearLevel,
};
use crate::validation::validate_config;

/// Generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// RNG seed. `None` draws a fresh seed, reported back in the
    /// [`GenerationReport`] so the run can be replayed.
    pub seed: Option<u64>,
    /// Prefer blocks outside minimize windows.
    pub soft_minimize: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            seed: None,
            soft_minimize: true,
        }
    }
}

impl GeneratorOptions {
    /// Default options with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::default().with_seed(seed)
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables the minimize-window preference.
    pub fn with_soft_minimize(mut self, enabled: bool) -> Self {
        self.soft_minimize = enabled;
        self
    }
}

/// A (specialist, class) pair the generator could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedPair {
    pub specialist_id: SpecialistId,
    pub class_id: ClassId,
    /// Block size that could not be fitted.
    pub blocks_needed: usize,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Seed actually used.
    pub seed: u64,
    /// Eligible (specialist, class) pairs considered.
    pub attempted: usize,
    /// Pairs placed by this run.
    pub placed: usize,
    /// Pairs skipped because the class already held that specialist.
    pub already_booked: usize,
    /// Placed pairs whose block touches a minimize window.
    pub soft_placements: usize,
    /// Pairs left unscheduled, in attempt order.
    pub unplaced: Vec<UnplacedPair>,
}

impl GenerationReport {
    fn new(seed: u64) -> Self {
        Self {
            seed,
            attempted: 0,
            placed: 0,
            already_booked: 0,
            soft_placements: 0,
            unplaced: Vec::new(),
        }
    }

    /// Whether every eligible pair ended up booked.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

struct Placement<'a> {
    periods: Vec<&'a TimePeriod>,
    penalty: u32,
}

/// Randomized greedy generator.
///
/// # Example
///
/// ```
/// use specialist_timetable::models::{ClassGroup, SchedulingConfig, Specialist, WeekTemplate};
/// use specialist_timetable::scheduler::{generate_timetable, GeneratorOptions};
///
/// let config = SchedulingConfig::from_template(&WeekTemplate::standard())
///     .with_specialist(Specialist::new("pe", "PE", 60))
///     .with_class(ClassGroup::new("3A", "Year 3A"));
///
/// let (timetable, report) = generate_timetable(&config, GeneratorOptions::seeded(7)).unwrap();
/// assert!(report.is_complete());
/// assert_eq!(timetable.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    /// Creates a generator.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// The generator settings.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates a timetable from scratch.
    pub fn generate(&self, ctx: &SchedulingContext<'_>) -> (Timetable, GenerationReport) {
        let mut timetable = Timetable::new();
        let report = self.fill(ctx, &mut timetable);
        (timetable, report)
    }

    /// Places every missing (specialist, eligible class) pair into an
    /// existing timetable, leaving current bookings in place.
    pub fn fill(&self, ctx: &SchedulingContext<'_>, timetable: &mut Timetable) -> GenerationReport {
        let seed = self.options.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut report = GenerationReport::new(seed);
        let started = Instant::now();
        let config = ctx.config();

        info!(
            "Generating timetable: {} specialists, {} classes, {} periods (seed {})",
            config.specialists.len(),
            config.classes.len(),
            config.periods.len(),
            seed
        );

        for specialist in specialist_order(&config.specialists) {
            let booking = Booking::Specialist(specialist.id.clone());
            let blocks = ctx.blocks_needed(specialist);

            let mut classes: Vec<(&ClassGroup, YearLevel)> = config
                .classes
                .iter()
                .map(|class| (class, class.year_level()))
                .filter(|(_, level)| specialist.is_eligible(level))
                .collect();
            classes.shuffle(&mut rng);

            for (class, level) in classes {
                report.attempted += 1;

                // Shuffle even when skipping so the RNG stream does not
                // depend on pre-existing bookings.
                let mut candidates: Vec<&TimePeriod> = config.periods.iter().collect();
                candidates.shuffle(&mut rng);

                if timetable.has_booking(&class.id, &booking) {
                    report.already_booked += 1;
                    continue;
                }

                match self.find_slot(ctx, timetable, class, &level, blocks, &candidates) {
                    Some(placement) => {
                        let slots = slot_ids(&placement.periods);
                        debug!(
                            "Placed {} for class {} at {:?} (penalty {})",
                            specialist.id, class.id, slots, placement.penalty
                        );
                        timetable.insert_block(&class.id, &booking, &slots);
                        report.placed += 1;
                        if placement.penalty > 0 {
                            report.soft_placements += 1;
                        }
                    }
                    None => {
                        warn!(
                            "No slot for {} ({} period block) in class {}",
                            specialist.id, blocks, class.id
                        );
                        report.unplaced.push(UnplacedPair {
                            specialist_id: specialist.id.clone(),
                            class_id: class.id.clone(),
                            blocks_needed: blocks,
                        });
                    }
                }
            }
        }

        info!(
            "Generation finished in {:.2?}: {} placed, {} already booked, {} unplaced",
            started.elapsed(),
            report.placed,
            report.already_booked,
            report.unplaced.len()
        );
        report
    }

    /// First acceptable start in candidate order.
    ///
    /// Returns the first penalty-free block; failing that, the first
    /// block that only touches minimize windows.
    fn find_slot<'a>(
        &self,
        ctx: &SchedulingContext<'a>,
        timetable: &Timetable,
        class: &ClassGroup,
        level: &YearLevel,
        blocks: usize,
        candidates: &[&'a TimePeriod],
    ) -> Option<Placement<'a>> {
        let constraints = &ctx.config().constraints;
        let mut fallback: Option<Placement<'a>> = None;

        for start in candidates {
            let periods = match check_availability(
                ctx,
                &class.id,
                &start.id,
                blocks,
                timetable,
                ReplacePolicy::Never,
            ) {
                Ok(periods) => periods,
                Err(err) => {
                    trace!("Skip {} for class {}: {}", start.id, class.id, err);
                    continue;
                }
            };

            if let Some((period, constraint)) = block_violation(level, &periods, constraints) {
                trace!(
                    "Skip {} for class {}: {} inside avoid window {}",
                    start.id,
                    class.id,
                    period.id,
                    constraint.id
                );
                continue;
            }

            let penalty = block_penalty(level, &periods, constraints);
            if penalty == 0 || !self.options.soft_minimize {
                return Some(Placement { periods, penalty });
            }
            if fallback.is_none() {
                fallback = Some(Placement { periods, penalty });
            }
        }

        fallback
    }
}

/// Specialists by descending duration; ties keep configuration order.
fn specialist_order(specialists: &[Specialist]) -> Vec<&Specialist> {
    let mut order: Vec<&Specialist> = specialists.iter().collect();
    order.sort_by(|a, b| b.duration_minutes.cmp(&a.duration_minutes));
    order
}

/// Validates a configuration and generates a fresh timetable.
pub fn generate_timetable(
    config: &SchedulingConfig,
    options: GeneratorOptions,
) -> SchedulingResult<(Timetable, GenerationReport)> {
    validate_config(config).map_err(SchedulingError::InvalidConfig)?;
    let ctx = SchedulingContext::new(config);
    Ok(Generator::new(options).generate(&ctx))
}
