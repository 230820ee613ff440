//! Object-tree opcodes: attributes, tree mutation, and property access.
//!
//! Grounded on the teacher's `opcodes_object.rs` split, rewired onto this
//! crate's free-function `object` module instead of the teacher's
//! struct-overlay `Zobject`.

use crate::instruction::Instruction;
use crate::interpreter::Interpreter;
use crate::error::ZResult;
use crate::object;

impl Interpreter {
    pub(crate) fn execute_2op_attr_set(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let obj = ops[0] as u16;
        let attr = ops[1] as u8;
        let base = self.object_base();
        match inst.opcode {
            0x0B => object::set_attr(&mut self.memory, base, obj, attr),
            0x0C => object::clear_attr(&mut self.memory, base, obj, attr),
            _ => unreachable!(),
        }
        Ok(())
    }

    pub(crate) fn execute_move(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let base = self.object_base();
        object::move_object(&mut self.memory, base, ops[0] as u16, ops[1] as u16);
        Ok(())
    }

    pub(crate) fn execute_remove(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let base = self.object_base();
        object::move_object(&mut self.memory, base, ops[0] as u16, 0);
        Ok(())
    }

    pub(crate) fn execute_property_2op(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let base = self.object_base();
        let obj = ops[0] as u16;
        let prop = ops[1] as u8;
        let result = match inst.opcode {
            0x11 => object::get_property(&self.memory, base, self.defprop_base(), obj, prop),
            0x12 => object::get_property_addr(&self.memory, base, obj, prop),
            0x13 => object::next_property(&self.memory, base, obj, prop) as u16,
            _ => unreachable!(),
        };
        self.store_result(inst, result as i16)
    }

    pub(crate) fn execute_1op_object(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let base = self.object_base();
        let obj = ops[0] as u16;
        match inst.opcode {
            0x00 => self.take_branch(inst.branch, ops[0] == 0),
            0x01 => {
                let v = object::sibling(&self.memory, base, obj);
                self.store_result(inst, v as i16)?;
                self.take_branch(inst.branch, v != 0)
            }
            0x02 => {
                let v = object::child(&self.memory, base, obj);
                self.store_result(inst, v as i16)?;
                self.take_branch(inst.branch, v != 0)
            }
            0x03 => {
                let v = object::parent(&self.memory, base, obj);
                self.store_result(inst, v as i16)
            }
            0x04 => {
                // ops[0] is a property data address; the size/number byte
                // immediately precedes it.
                let addr = (ops[0] as u16).wrapping_sub(1);
                let size_byte = self.memory.read_byte(addr as u32);
                let len = (size_byte >> 5) + 1;
                self.store_result(inst, len as i16)
            }
            _ => unreachable!(),
        }
    }

    pub(crate) fn execute_printd(&mut self, _inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let base = self.object_base();
        let addr = object::short_name_addr(&self.memory, base, ops[0] as u16);
        let (text, _) = crate::text::decode_text(&self.memory, addr, self.header.abbrev_table);
        self.enqueue_print(text);
        Ok(())
    }
}
