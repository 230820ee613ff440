//! A Version-3 Z-machine interpreter core.
//!
//! This crate loads a story file, decodes its instruction stream, and
//! executes it to completion, cooperating with a surrounding host for
//! every effect that crosses the machine's boundary: input, output,
//! save/restore, and the optional status-line/split-screen services.
//! The core never performs I/O itself — [`Interpreter::step`] runs until
//! a [`Callout`] is needed and [`Interpreter::resume`] delivers the
//! host's answer, so a host can drive it from a blocking loop, an event
//! handler, or across an async boundary without the core knowing which.

mod config;
mod dictionary;
mod error;
mod header;
mod host;
mod instruction;
mod interpreter;
mod memory;
mod object;
mod opcode_tables;
mod opcodes_io;
mod opcodes_math;
mod opcodes_memory;
mod opcodes_object;
mod opcodes_text;
mod quetzal;
mod text;
mod vm;
mod zrand;

pub use config::{Capabilities, InterpreterVersion, StoryProperties};
pub use error::{ZError, ZResult};
pub use host::{Callout, CalloutResult, StepOutcome};
pub use interpreter::Interpreter;

impl Interpreter {
    /// Read-only properties a host typically surfaces to a player.
    pub fn story_properties(&self) -> StoryProperties {
        StoryProperties {
            serial: self.header.serial,
            zorkid: self.header.zorkid,
            checksum: self.header.checksum,
            status_type: self.capabilities.status_type,
            is_tandy: self.capabilities.is_tandy,
            version: InterpreterVersion::CURRENT,
        }
    }
}
