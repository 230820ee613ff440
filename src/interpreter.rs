//! The host driver loop: decode-dispatch-suspend, tying every other
//! component together.
//!
//! Grounded on the teacher's `interpreter.rs` (an `Interpreter` owning the
//! `VM` and dispatching decoded instructions to per-category handler
//! modules), but restructured around the specification's cooperative
//! `step()`/`resume()` contract instead of calling host methods directly:
//! opcodes that need the host enqueue a [`Callout`] and the driver yields
//! it to the caller rather than blocking on I/O.

use crate::config::Capabilities;
use crate::dictionary::Dictionary;
use crate::error::{ZError, ZResult};
use crate::header::{self, Header};
use crate::host::{Callout, CalloutResult, Continuation, StepOutcome};
use crate::instruction::{Branch, BranchTarget, Instruction, OperandCount};
use crate::memory::MemoryImage;
use crate::vm::Vm;
use crate::zrand::ZRand;
use log::{debug, warn};
use std::collections::VecDeque;

pub struct Interpreter {
    pub memory: MemoryImage,
    pub header: Header,
    pub vm: Vm,
    pub dictionary: Dictionary,
    pub capabilities: Capabilities,
    pub zrand: ZRand,
    pub(crate) queue: VecDeque<(Callout, Continuation)>,
    pending: Option<Continuation>,
    fixed_pitch: bool,
    highlighted_fixed_pitch: bool,
    quit: bool,
    text_end_pointer: u32,
}

impl Interpreter {
    pub fn new(image: Vec<u8>, capabilities: Capabilities) -> ZResult<Interpreter> {
        if image.is_empty() || image[0] != 3 {
            return Err(ZError::UnsupportedVersion(image.first().copied().unwrap_or(0)));
        }
        let memory = MemoryImage::new(image, capabilities.byte_swap);
        let header = Header::parse(&memory);
        let dictionary = Dictionary::parse(&memory, header.dictionary, header.abbrev_table);
        let vm = Vm::new(header.initial_pc, header.globals_base());

        let mut interp = Interpreter {
            memory,
            header,
            vm,
            dictionary,
            capabilities,
            zrand: ZRand::new_uniform(),
            queue: VecDeque::new(),
            pending: None,
            fixed_pitch: false,
            highlighted_fixed_pitch: false,
            quit: false,
            text_end_pointer: 0,
        };
        interp.init();
        interp.queue.push_back((Callout::Restarted, Continuation::Ack));
        interp.queue.push_back((
            Callout::Highlight {
                fixed_pitch: interp.fixed_pitch,
            },
            Continuation::Ack,
        ));
        interp.highlighted_fixed_pitch = interp.fixed_pitch;
        Ok(interp)
    }

    /// (Re)establish the working image from the initial bytes, advertise
    /// host capabilities in header byte 1, and shadow those flags at
    /// offset 16 for restore to preserve later.
    pub(crate) fn init(&mut self) {
        self.memory.reset();
        let flags1 = header::compute_flags1(
            self.capabilities.byte_swap,
            self.capabilities.status_type,
            self.capabilities.is_tandy,
        );
        self.memory.write_byte(header::FLAGS1_OFFSET, flags1);
        self.memory
            .write_word(header::MODE_FLAGS_SHADOW_OFFSET, flags1 as u16);
        self.vm.reset(self.header.initial_pc, self.header.globals_base());
    }

    /// Sets the font the host is asked to use for subsequent text; queued
    /// as a highlight callout the next time a print happens, per §5's
    /// "highlight fires before print whenever it has changed" rule.
    pub fn set_fixed_pitch(&mut self, fixed_pitch: bool) {
        self.fixed_pitch = fixed_pitch;
    }

    pub(crate) fn enqueue_print(&mut self, text: String) {
        if self.fixed_pitch != self.highlighted_fixed_pitch {
            self.highlighted_fixed_pitch = self.fixed_pitch;
            self.queue.push_back((
                Callout::Highlight {
                    fixed_pitch: self.fixed_pitch,
                },
                Continuation::Ack,
            ));
        }
        let scripting = self.memory.read_byte(header::FLAGS1_OFFSET) & 1 != 0;
        self.queue
            .push_back((Callout::Print { text, scripting }, Continuation::Ack));
    }

    /// Run until a host callout is needed or the machine quits.
    pub fn step(&mut self) -> ZResult<StepOutcome> {
        if self.pending.is_some() {
            return Err(ZError::AwaitingResume);
        }
        loop {
            if self.quit {
                return Ok(StepOutcome::Quit);
            }
            if let Some((callout, cont)) = self.queue.pop_front() {
                self.pending = Some(cont);
                return Ok(StepOutcome::Callout(callout));
            }
            self.execute_one_instruction()?;
        }
    }

    /// Deliver the result of the callout most recently returned by
    /// `step()`.
    pub fn resume(&mut self, result: CalloutResult) -> ZResult<()> {
        let cont = self.pending.take().ok_or(ZError::NotAwaiting)?;
        match (cont, result) {
            (Continuation::Ack, CalloutResult::Ack) => Ok(()),
            (Continuation::Branch(branch), CalloutResult::SaveOk(ok)) => {
                self.take_branch(Some(branch), ok)
            }
            (
                Continuation::Restore {
                    branch,
                    mode_flags_before,
                },
                CalloutResult::RestoreBlob(blob),
            ) => {
                let ok = match blob {
                    Some(bytes) => match self.do_restore(&bytes) {
                        Ok(()) => {
                            self.memory
                                .write_word(header::MODE_FLAGS_SHADOW_OFFSET, mode_flags_before as u16);
                            self.memory
                                .write_byte(header::FLAGS1_OFFSET, mode_flags_before);
                            true
                        }
                        Err(e) => {
                            warn!("restore failed: {e}");
                            false
                        }
                    },
                    None => false,
                };
                self.take_branch(Some(branch), ok)
            }
            (Continuation::FinishRead { text_buffer, parse_buffer }, CalloutResult::Line(line)) => {
                self.dictionary.handle_input(
                    &mut self.memory,
                    text_buffer as u32,
                    parse_buffer as u32,
                    &line,
                );
                Ok(())
            }
            _ => Err(ZError::MismatchedCalloutResult),
        }
    }

    fn execute_one_instruction(&mut self) -> ZResult<()> {
        let pc = self.vm.pc;
        let inst = Instruction::decode(&self.memory, pc).map_err(|_| ZError::InvalidOpcode {
            form: "decode",
            opcode: self.memory.read_byte(pc),
        })?;
        self.vm.pc = pc + inst.size;

        let operands = self.resolve_operands(&inst)?;
        self.dispatch(&inst, &operands)
    }

    fn resolve_operands(&mut self, inst: &Instruction) -> ZResult<Vec<i16>> {
        use crate::instruction::Operand;
        inst.operands
            .iter()
            .map(|op| match op {
                Operand::LargeConstant(v) => Ok(*v as i16),
                Operand::SmallConstant(v) => Ok(*v as i16),
                Operand::Variable(idx) => self.vm.fetch(&self.memory, *idx),
            })
            .collect()
    }

    fn dispatch(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        match inst.operand_count {
            OperandCount::Op2 => self.execute_2op(inst, ops),
            OperandCount::Op1 => self.execute_1op(inst, ops),
            OperandCount::Op0 => self.execute_0op(inst, ops),
            OperandCount::Var => self.execute_var(inst, ops),
        }
    }

    fn invalid_opcode(&self, form: &'static str, inst: &Instruction) -> ZError {
        debug!("{form}:{:02x} ({}) hit an invalid table slot", inst.opcode, inst.name());
        ZError::InvalidOpcode {
            form,
            opcode: inst.opcode,
        }
    }

    pub(crate) fn store_result(&mut self, inst: &Instruction, value: i16) -> ZResult<()> {
        if let Some(v) = inst.store {
            self.vm.store(&mut self.memory, v, value)?;
        }
        Ok(())
    }

    pub(crate) fn take_branch(&mut self, branch: Option<Branch>, predicate: bool) -> ZResult<()> {
        let Some(branch) = branch else { return Ok(()) };
        if predicate != branch.on_true {
            return Ok(());
        }
        match branch.target {
            BranchTarget::Return(v) => self.do_return(if v { 1 } else { 0 }),
            BranchTarget::Jump(offset) => {
                self.vm.pc = (self.vm.pc as i64 + offset as i64 - 2) as u32;
                Ok(())
            }
        }
    }

    pub(crate) fn do_return(&mut self, value: i16) -> ZResult<()> {
        let (_, store) = self.vm.pop_frame().ok_or(ZError::ReturnFromOutermost)?;
        if let Some(v) = store {
            self.vm.store(&mut self.memory, v, value)?;
        }
        Ok(())
    }

    pub(crate) fn object_base(&self) -> u16 {
        self.header.object_base()
    }

    pub(crate) fn defprop_base(&self) -> u16 {
        self.header.defprop_base()
    }

    pub(crate) fn decode_packed_string(&mut self, packed_addr: u32) -> String {
        let (text, end) = crate::text::decode_text(&self.memory, packed_addr, self.header.abbrev_table);
        self.text_end_pointer = end;
        text
    }

    pub(crate) fn text_end_pointer(&self) -> u32 {
        self.text_end_pointer
    }

    fn execute_2op(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        match inst.opcode {
            0x01..=0x07 | 0x0A => self.execute_2op_predicate(inst, ops),
            0x08 | 0x09 => self.execute_2op_bitwise(inst, ops),
            0x0B | 0x0C => self.execute_2op_attr_set(inst, ops),
            0x0D => self.execute_set(inst, ops),
            0x0E => self.execute_move(inst, ops),
            0x0F | 0x10 => self.execute_loadw_loadb(inst, ops),
            0x11..=0x13 => self.execute_property_2op(inst, ops),
            0x14..=0x18 => self.execute_arithmetic(inst, ops),
            _ => Err(self.invalid_opcode("2OP", inst)),
        }
    }

    fn execute_1op(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        match inst.opcode {
            0x00..=0x04 => self.execute_1op_object(inst, ops),
            0x05 | 0x06 => self.execute_inc_dec(inst, ops),
            0x07 => self.execute_printb(inst, ops),
            0x09 => self.execute_remove(inst, ops),
            0x0A => self.execute_printd(inst, ops),
            0x0B => self.do_return(ops[0]),
            0x0C => self.execute_jump(inst, ops),
            0x0D => self.execute_print_packed(inst, ops),
            0x0E => self.execute_value(inst, ops),
            0x0F => self.execute_bcom(inst, ops),
            _ => Err(self.invalid_opcode("1OP", inst)),
        }
    }

    fn execute_0op(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        match inst.opcode {
            0x00 => self.do_return(1),
            0x01 => self.do_return(0),
            0x02 => self.execute_printi(inst),
            0x03 => self.execute_printr(inst),
            0x04 => Ok(()),
            0x05 => self.execute_save(inst),
            0x06 => self.execute_restore(inst),
            0x07 => self.execute_restart(inst, ops),
            0x08 => self.execute_rstack(inst),
            0x09 => {
                self.vm.pop()?;
                Ok(())
            }
            0x0A => {
                self.quit = true;
                Ok(())
            }
            0x0B => {
                self.enqueue_print("\n".to_string());
                Ok(())
            }
            0x0C => self.execute_usl(inst),
            0x0D => self.execute_verify(inst),
            _ => Err(self.invalid_opcode("0OP", inst)),
        }
    }

    fn execute_var(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        match inst.opcode {
            0x00 => self.execute_call(inst, ops),
            0x01 | 0x02 => self.execute_putw_putb(inst, ops),
            0x03 => self.execute_putp(inst, ops),
            0x04 => self.execute_read(inst, ops),
            0x05 => self.execute_printc(inst, ops),
            0x06 => self.execute_printn(inst, ops),
            0x07 => self.execute_random(inst, ops),
            0x08 => {
                self.vm.push(ops[0]);
                Ok(())
            }
            0x09 => self.execute_pop_var(inst, ops),
            0x0A => self.execute_split(inst, ops),
            0x0B => self.execute_screen(inst, ops),
            _ => Err(self.invalid_opcode("VAR", inst)),
        }
    }
}
