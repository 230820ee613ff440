//! Arithmetic, bitwise, and comparison opcodes.
//!
//! Grounded on the teacher's `opcodes_math.rs` split (one `impl Interpreter`
//! block per opcode family), restricted to the V3 opcode set and wired to
//! this crate's `Instruction`/`Vm` types instead of the teacher's.

use crate::instruction::Instruction;
use crate::interpreter::Interpreter;
use crate::error::ZResult;

impl Interpreter {
    pub(crate) fn execute_2op_predicate(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let predicate = match inst.opcode {
            0x01 => ops[1..].iter().any(|v| *v == ops[0]),
            0x02 => ops[0] < ops[1],
            0x03 => ops[0] > ops[1],
            0x04 => {
                let var = ops[0] as u8;
                let v = self.vm.xfetch(&self.memory, var)?.wrapping_sub(1);
                self.vm.xstore(&mut self.memory, var, v)?;
                v < ops[1]
            }
            0x05 => {
                let var = ops[0] as u8;
                let v = self.vm.xfetch(&self.memory, var)?.wrapping_add(1);
                self.vm.xstore(&mut self.memory, var, v)?;
                v > ops[1]
            }
            0x06 => {
                let obj = ops[0] as u16;
                crate::object::parent(&self.memory, self.object_base(), obj) == ops[1] as u16
            }
            0x07 => (ops[0] as u16 & ops[1] as u16) == ops[1] as u16,
            0x0A => {
                let base = self.object_base();
                crate::object::get_attr(&self.memory, base, ops[0] as u16, ops[1] as u8)
            }
            _ => unreachable!("execute_2op_predicate only handles branching 2OP opcodes"),
        };
        self.take_branch(inst.branch, predicate)
    }

    pub(crate) fn execute_2op_bitwise(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let result = match inst.opcode {
            0x08 => ops[0] as u16 | ops[1] as u16,
            0x09 => ops[0] as u16 & ops[1] as u16,
            _ => unreachable!(),
        };
        self.store_result(inst, result as i16)
    }

    pub(crate) fn execute_arithmetic(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let (a, b) = (ops[0], ops.get(1).copied().unwrap_or(0));
        let result = match inst.opcode {
            0x14 => a.wrapping_add(b),
            0x15 => a.wrapping_sub(b),
            0x16 => a.wrapping_mul(b),
            0x17 => {
                if b == 0 {
                    0
                } else {
                    a.wrapping_div(b)
                }
            }
            0x18 => {
                if b == 0 {
                    0
                } else {
                    a.wrapping_rem(b)
                }
            }
            _ => unreachable!(),
        };
        self.store_result(inst, result)
    }

    pub(crate) fn execute_bcom(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        self.store_result(inst, !ops[0])
    }

    pub(crate) fn execute_random(&mut self, inst: &Instruction, ops: &[i16]) -> ZResult<()> {
        let n = ops[0];
        let result = if n <= 0 {
            if n == 0 {
                self.zrand.reseed_entropy();
            } else {
                self.zrand.reseed((-(n as i32)) as u32);
            }
            0
        } else {
            self.zrand.next_in_range(n as u16) as i16
        };
        self.store_result(inst, result)
    }
}
