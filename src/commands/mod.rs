//! Timetable commands.
//!
//! A command is scheduling intent as data. Each one validates against
//! the current timetable and only then commits, so a rejected command
//! leaves the timetable exactly as it was.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `Assign` | Book one block starting at a cell |
//! | `Unassign` | Remove the block covering a cell |
//! | `Generate` | Fill every missing eligible pair |
//! | `Clear` | Empty the timetable |

mod assign;
mod unassign;

pub use assign::{AssignCommand, AssignOptions, AssignPlan};
pub use unassign::UnassignCommand;

use crate::context::SchedulingContext;
use crate::error::SchedulingResult;
use crate::models::{Assignment, Timetable};
use crate::scheduler::{GenerationReport, Generator, GeneratorOptions};

/// A timetable mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place one booking.
    Assign(AssignCommand),
    /// Remove the booking at a cell, cascading to its block.
    Unassign(UnassignCommand),
    /// Run the greedy generator over the current timetable.
    Generate(GeneratorOptions),
    /// Remove every booking.
    Clear,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Records written.
    Assigned(Vec<Assignment>),
    /// Records removed.
    Unassigned(Vec<Assignment>),
    /// Generation summary.
    Generated(GenerationReport),
    /// Number of records removed.
    Cleared(usize),
}

impl Command {
    /// Validates and applies the command.
    pub fn execute(
        &self,
        ctx: &SchedulingContext<'_>,
        timetable: &mut Timetable,
    ) -> SchedulingResult<CommandOutcome> {
        match self {
            Command::Assign(cmd) => cmd.execute(ctx, timetable).map(CommandOutcome::Assigned),
            Command::Unassign(cmd) => cmd.execute(timetable).map(CommandOutcome::Unassigned),
            Command::Generate(options) => Ok(CommandOutcome::Generated(
                Generator::new(*options).fill(ctx, timetable),
            )),
            Command::Clear => Ok(CommandOutcome::Cleared(timetable.clear())),
        }
    }
}

impl From<AssignCommand> for Command {
    fn from(cmd: AssignCommand) -> Self {
        Command::Assign(cmd)
    }
}

impl From<UnassignCommand> for Command {
    fn from(cmd: UnassignCommand) -> Self {
        Command::Unassign(cmd)
    }
}
