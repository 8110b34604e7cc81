mod convert;
mod verify;

use convert::{run_geometry, run_labels};
use verify::run_verify;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Geometry(args) => run_geometry(args, ctx),
        Command::Labels(args) => run_labels(args, ctx),
        Command::Verify(args) => run_verify(args, ctx),
    }
}
