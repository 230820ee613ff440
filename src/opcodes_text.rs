//! Text-output opcodes and the one pure control-flow opcode (JUMP) that
//! shares their operand shape.
//!
//! Grounded on the teacher's `opcodes_display.rs`/text-printing split,
//! rewired so that every printed string is queued as a `Callout::Print`
//! through `enqueue_print` rather than written to a terminal directly.

use crate::instruction::Instruction;
use crate::interpreter::Interpreter;
use crate::error::ZResult;

impl Interpreter {
    /// `PRINTB` takes the operand as a byte address, unlike `PRINT`'s
    /// packed (word) address — the two must not be conflated (§9).
    pub(crate) fn execute_printb(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let (text, _) = crate::text::decode_text(&self.memory, ops[0] as u16 as u32, self.header.abbrev_table);
        self.enqueue_print(text);
        Ok(())
    }

    pub(crate) fn execute_jump(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        self.vm.pc = (self.vm.pc as i64 + ops[0] as i64 - 2) as u32;
        Ok(())
    }

    pub(crate) fn execute_print_packed(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let addr = (ops[0] as u16 as u32) * 2;
        let text = self.decode_packed_string(addr);
        self.enqueue_print(text);
        Ok(())
    }

    /// Inline string immediately following the opcode byte; PC advances
    /// past it so the next decode starts at the following instruction.
    pub(crate) fn execute_printi(&mut self, _inst: &Instruction) -> ZResult<()> {
        let text = self.decode_packed_string(self.vm.pc);
        self.vm.pc = self.text_end_pointer();
        self.enqueue_print(text);
        Ok(())
    }

    pub(crate) fn execute_printr(&mut self, _inst: &Instruction) -> ZResult<()> {
        let mut text = self.decode_packed_string(self.vm.pc);
        self.vm.pc = self.text_end_pointer();
        text.push('\n');
        self.enqueue_print(text);
        self.do_return(1)
    }

    pub(crate) fn execute_printc(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let byte = ops[0] as u16 as u8;
        let text = match byte {
            13 => "\n".to_string(),
            0 => return Ok(()),
            _ => (byte as char).to_string(),
        };
        self.enqueue_print(text);
        Ok(())
    }

    pub(crate) fn execute_printn(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        self.enqueue_print(ops[0].to_string());
        Ok(())
    }
}
