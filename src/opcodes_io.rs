//! Host-callout opcodes: SAVE/RESTORE/RESTART, status/split/screen, READ,
//! and VERIFY's default checksum.
//!
//! Grounded on the teacher's `opcodes_io.rs`, rewired from direct host
//! method calls to queuing `Callout`/`Continuation` pairs per the
//! specification's cooperative `step()`/`resume()` contract (§9).

use crate::error::ZResult;
use crate::header;
use crate::host::{Callout, Continuation};
use crate::instruction::Instruction;
use crate::interpreter::Interpreter;

impl Interpreter {
    pub(crate) fn execute_save(&mut self, inst: &Instruction) -> ZResult<()> {
        let blob = crate::quetzal::serialize(&self.memory, &self.vm, self.header.purbot);
        let branch = inst.branch.expect("SAVE always carries a branch specifier");
        self.queue
            .push_back((Callout::Save { blob }, Continuation::Branch(branch)));
        Ok(())
    }

    pub(crate) fn execute_restore(&mut self, inst: &Instruction) -> ZResult<()> {
        let branch = inst.branch.expect("RESTORE always carries a branch specifier");
        let mode_flags_before = self.memory.read_byte(header::FLAGS1_OFFSET);
        self.queue.push_back((
            Callout::Restore,
            Continuation::Restore {
                branch,
                mode_flags_before,
            },
        ));
        Ok(())
    }

    /// Installs a deserialized blob's memory prefix and continuation.
    /// Called from `resume()` once the host hands back a restore blob.
    pub(crate) fn do_restore(&mut self, blob: &[u8]) -> ZResult<()> {
        let (prefix, pc, stack, frames) =
            crate::quetzal::deserialize(blob, self.header.purbot, self.header.zorkid)?;
        self.memory.overwrite_prefix(&prefix);
        self.vm.pc = pc;
        self.vm.stack = stack;
        self.vm.frames = frames;
        Ok(())
    }

    pub(crate) fn execute_restart(&mut self, _inst: &Instruction, _ops: &[i16]) -> ZResult<()> {
        let preserved = self.memory.read_word(header::MODE_FLAGS_SHADOW_OFFSET);
        self.init();
        self.memory
            .write_word(header::MODE_FLAGS_SHADOW_OFFSET, preserved);
        self.memory.write_byte(header::FLAGS1_OFFSET, preserved as u8);
        self.queue.push_back((Callout::Restarted, Continuation::Ack));
        Ok(())
    }

    pub(crate) fn execute_rstack(&mut self, _inst: &Instruction) -> ZResult<()> {
        let v = self.vm.pop()?;
        self.do_return(v)
    }

    pub(crate) fn execute_usl(&mut self, _inst: &Instruction) -> ZResult<()> {
        let obj = self.vm.xfetch(&self.memory, 16)? as u16;
        let text = if obj != 0 {
            let base = self.object_base();
            let addr = crate::object::short_name_addr(&self.memory, base, obj);
            crate::text::decode_text(&self.memory, addr, self.header.abbrev_table).0
        } else {
            String::new()
        };
        let v18 = self.vm.xfetch(&self.memory, 18)?;
        let v17 = self.vm.xfetch(&self.memory, 17)?;
        self.queue
            .push_back((Callout::Status { text, v18, v17 }, Continuation::Ack));
        Ok(())
    }

    pub(crate) fn execute_verify(&mut self, inst: &Instruction) -> ZResult<()> {
        let end = (self.header.packed_length as usize) * 2;
        let bytes = self.memory.initial_bytes();
        let start = 64.min(bytes.len());
        let end = end.min(bytes.len()).max(start);
        let sum: u32 = bytes[start..end].iter().map(|b| *b as u32).sum();
        let computed = (sum & 0xFFFF) as u16;
        let result = self.header.checksum.wrapping_sub(computed);
        self.take_branch(inst.branch, result == 0)
    }

    /// Flushes pending output, offers an optional status-line refresh, then
    /// suspends for a line of input; the result is tokenized into the
    /// caller's buffers once `resume()` delivers it.
    pub(crate) fn execute_read(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let text_buffer = ops[0] as u16;
        let parse_buffer = ops[1] as u16;
        let max_len = self.memory.read_byte(text_buffer as u32);
        let scripting = self.memory.read_byte(header::FLAGS1_OFFSET) & 1 != 0;
        self.queue.push_back((
            Callout::Print {
                text: String::new(),
                scripting,
            },
            Continuation::Ack,
        ));
        self.execute_usl(inst)?;
        self.queue.push_back((
            Callout::Read { max_len },
            Continuation::FinishRead {
                text_buffer,
                parse_buffer,
            },
        ));
        Ok(())
    }

    pub(crate) fn execute_split(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        self.queue.push_back((
            Callout::Split {
                height: ops[0] as u16,
            },
            Continuation::Ack,
        ));
        Ok(())
    }

    pub(crate) fn execute_screen(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        self.queue.push_back((
            Callout::Screen {
                window: ops[0] as u16,
            },
            Continuation::Ack,
        ));
        Ok(())
    }
}
