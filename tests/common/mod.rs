//! Shared fixture-building helpers for the end-to-end scenario tests.
//!
//! Every scenario builds its own tiny V3 story image by hand rather than
//! shipping a real game file, the same way the teacher's own integration
//! tests construct minimal fixture images instead of depending on a
//! licensed story.

#![allow(dead_code)]

use zcore3::{Callout, CalloutResult, Interpreter, StepOutcome};

pub const VERSION_OFFSET: usize = 0x00;
pub const INITIAL_PC_OFFSET: usize = 0x06;
pub const DICTIONARY_OFFSET: usize = 0x08;
pub const OBJECT_TABLE_OFFSET: usize = 0x0A;
pub const GLOBALS_OFFSET: usize = 0x0C;
pub const PURBOT_OFFSET: usize = 0x0E;

/// Reserve a header-sized prefix (0x20 bytes is plenty for every field this
/// crate's `Header::parse` reads) and fill in the handful of pointers the
/// scenarios below need. Everything else defaults to zero.
pub fn new_image(total_len: usize) -> Vec<u8> {
    vec![0u8; total_len]
}

pub fn set_word(bytes: &mut [u8], addr: usize, value: u16) {
    bytes[addr] = (value >> 8) as u8;
    bytes[addr + 1] = (value & 0xFF) as u8;
}

pub fn set_header(bytes: &mut [u8], initial_pc: u16, globals: u16, purbot: u16) {
    bytes[VERSION_OFFSET] = 3;
    set_word(bytes, INITIAL_PC_OFFSET, initial_pc);
    set_word(bytes, GLOBALS_OFFSET, globals);
    set_word(bytes, PURBOT_OFFSET, purbot);
    // No dictionary, no object table needed unless a scenario sets one.
    set_word(bytes, DICTIONARY_OFFSET, 0);
    set_word(bytes, OBJECT_TABLE_OFFSET, 0);
}

/// Drive the interpreter to completion, acking every callout except `Print`
/// (whose text is collected) and panicking on anything a scenario didn't
/// expect to see. Good enough for scenarios with no SAVE/RESTORE/READ.
pub fn drain_prints(interp: &mut Interpreter) -> Vec<String> {
    let mut out = Vec::new();
    loop {
        match interp.step().expect("step() must not error in these fixtures") {
            StepOutcome::Quit => break,
            StepOutcome::Callout(Callout::Restarted) => {
                interp.resume(CalloutResult::Ack).unwrap();
            }
            StepOutcome::Callout(Callout::Print { text, .. }) => {
                if !text.is_empty() {
                    out.push(text);
                }
                interp.resume(CalloutResult::Ack).unwrap();
            }
            StepOutcome::Callout(other) => panic!("unexpected callout: {other:?}"),
        }
    }
    out
}

/// CALL a zero-argument routine (VAR:call, one large-constant operand,
/// store byte) that stores its result at `store_var`.
pub fn enc_call0(routine_packed: u16, store_var: u8) -> Vec<u8> {
    vec![
        0xE0, // variable form, var-table, opcode 0x00 (call)
        0x3F, // types: operand0 large constant, rest omitted
        (routine_packed >> 8) as u8,
        (routine_packed & 0xFF) as u8,
        store_var,
    ]
}

/// CALL a routine with two arguments, the first a small constant in
/// `0..=255`, the second an arbitrary signed word (always encoded as a
/// large constant so negative values survive).
pub fn enc_call2(routine_packed: u16, arg_a: u8, arg_b: i16, store_var: u8) -> Vec<u8> {
    vec![
        0xE0,
        0b00_01_00_11, // op0 large, op1 small, op2 large, op3 omitted
        (routine_packed >> 8) as u8,
        (routine_packed & 0xFF) as u8,
        arg_a,
        (arg_b as u16 >> 8) as u8,
        (arg_b as u16 & 0xFF) as u8,
        store_var,
    ]
}

/// CALL a routine with one small-constant argument.
pub fn enc_call1(routine_packed: u16, arg_a: u8, store_var: u8) -> Vec<u8> {
    vec![
        0xE0,
        0b01_11_11_11, // op0 small constant, rest omitted
        arg_a,
        store_var,
    ]
}

/// VAR:print_num on a variable operand (global or local).
pub fn enc_print_num_var(var: u8) -> Vec<u8> {
    vec![0xE6, 0b10_11_11_11, var]
}

/// VAR:print_char with a small-constant ZSCII byte operand.
pub fn enc_print_char(ch: u8) -> Vec<u8> {
    vec![0xE5, 0x7F, ch]
}

/// VAR:sread with large-constant text-buffer/parse-buffer operands.
pub fn enc_read(text_buffer: u16, parse_buffer: u16) -> Vec<u8> {
    vec![
        0xE4,
        0x0F,
        (text_buffer >> 8) as u8,
        (text_buffer & 0xFF) as u8,
        (parse_buffer >> 8) as u8,
        (parse_buffer & 0xFF) as u8,
    ]
}

/// 2OP:loadw, variable form so the array operand can be a large constant:
/// `store_var = word-at(array + 2*index)`.
pub fn enc_loadw(array: u16, index: u8, store_var: u8) -> Vec<u8> {
    vec![
        0xCF,
        0b00_01_11_11,
        (array >> 8) as u8,
        (array & 0xFF) as u8,
        index,
        store_var,
    ]
}

/// 2OP:loadb, variable form: `store_var = byte-at(array + index)`.
pub fn enc_loadb(array: u16, index: u8, store_var: u8) -> Vec<u8> {
    vec![
        0xD0,
        0b00_01_11_11,
        (array >> 8) as u8,
        (array & 0xFF) as u8,
        index,
        store_var,
    ]
}

/// 1OP:jz (ZERO?) with a small-constant operand and a 14-bit branch
/// specifier carrying the raw (pre-sign-extension) 14-bit value verbatim,
/// so callers can exercise the sign-extension boundary directly.
pub fn enc_jz_branch14(value: u8, on_true: bool, raw14: u16) -> Vec<u8> {
    let hi = ((raw14 >> 8) & 0x3F) as u8;
    let lo = (raw14 & 0xFF) as u8;
    let mut b0 = hi;
    if on_true {
        b0 |= 0x80;
    }
    vec![0x80 | (0b01 << 4) | 0x00, value, b0, lo]
}

/// 0OP:new_line.
pub fn enc_newline() -> Vec<u8> {
    vec![0xBB]
}

/// 0OP:quit.
pub fn enc_quit() -> Vec<u8> {
    vec![0xBA]
}

/// 1OP:print_paddr with a large-constant packed-address operand.
pub fn enc_print_paddr(packed: u16) -> Vec<u8> {
    vec![0x8D, (packed >> 8) as u8, (packed & 0xFF) as u8]
}

/// A long-form 2OP operand: either a small constant or a variable
/// reference (local slot 1-15, or a global/xfetch-style index 16+).
pub enum Arg {
    Small(u8),
    Var(u8),
}

/// Any long-form 2OP arithmetic/bitwise opcode (ADD/SUB/MUL/DIV/MOD/OR/AND),
/// which all store a result and never branch.
pub fn enc_2op_store(opcode: u8, a: Arg, b: Arg, store_var: u8) -> Vec<u8> {
    let (a_bit, a_val) = match a {
        Arg::Small(v) => (0u8, v),
        Arg::Var(v) => (1u8, v),
    };
    let (b_bit, b_val) = match b {
        Arg::Small(v) => (0u8, v),
        Arg::Var(v) => (1u8, v),
    };
    vec![opcode | (a_bit << 6) | (b_bit << 5), a_val, b_val, store_var]
}

/// 1OP:ret with a variable operand (returns the named local/global).
pub fn enc_ret_var(var: u8) -> Vec<u8> {
    vec![0x80 | (0b10 << 4) | 0x0B, var]
}

/// 2OP:insert_obj (MOVE) with two small-constant object-number operands.
pub fn enc_move(obj: u8, dest: u8) -> Vec<u8> {
    vec![0x0E, obj, dest]
}

/// 1OP:remove_obj with a small-constant object-number operand.
pub fn enc_remove(obj: u8) -> Vec<u8> {
    vec![0x80 | (0b01 << 4) | 0x09, obj]
}

/// 1OP:get_child/get_sibling always store and always carry a branch
/// specifier, even when the caller only wants the stored value. Using a
/// branch offset of 2 makes "taken" and "not taken" land on the exact same
/// following address, so the branch is a no-op regardless of whether the
/// object turns out to have a child/sibling.
pub fn enc_get_child(obj: u8, store_var: u8) -> Vec<u8> {
    enc_1op_small_store_branch(0x02, obj, store_var, true, 2)
}

pub fn enc_get_sibling(obj: u8, store_var: u8) -> Vec<u8> {
    enc_1op_small_store_branch(0x01, obj, store_var, true, 2)
}

pub fn enc_get_parent(obj: u8, store_var: u8) -> Vec<u8> {
    vec![0x80 | (0b01 << 4) | 0x03, obj, store_var]
}

fn enc_1op_small_store_branch(opcode: u8, operand: u8, store_var: u8, on_true: bool, offset6: u8) -> Vec<u8> {
    let mut b0 = 0x40 | (offset6 & 0x3F);
    if on_true {
        b0 |= 0x80;
    }
    vec![0x80 | (0b01 << 4) | opcode, operand, store_var, b0]
}

/// A zero-local routine header followed by `body`.
pub fn routine(body: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8];
    out.extend_from_slice(body);
    out
}

/// Encode one abbreviation-free Z-string for `text` using the alphabet and
/// escape rules this crate's decoder implements, so the text-decode
/// scenario can round-trip through a hand-built packed string without
/// depending on the decoder's own internals.
pub fn encode_zstring(text: &str) -> Vec<u16> {
    const ALPHABET2: &[u8] = b"*\n0123456789.,!?_#'\"/\\-:()";
    let mut zchars = Vec::new();
    for ch in text.chars() {
        match ch {
            'a'..='z' => zchars.push((ch as u8 - b'a') + 6),
            'A'..='Z' => {
                zchars.push(4);
                zchars.push((ch as u8 - b'A') + 6);
            }
            ' ' => zchars.push(0),
            '!' => {
                // Force the raw-ASCII escape path even though '!' also
                // appears in alphabet 2, to exercise that escape.
                zchars.push(5);
                zchars.push(6);
                let byte = ch as u8;
                zchars.push(byte >> 5);
                zchars.push(byte & 0x1F);
            }
            other => {
                let idx = ALPHABET2
                    .iter()
                    .position(|&b| b == other as u8)
                    .unwrap_or_else(|| panic!("unsupported fixture character {other:?}"));
                zchars.push(5);
                zchars.push(idx as u8 + 6);
            }
        }
    }
    while zchars.len() % 3 != 0 {
        zchars.push(5); // padding shift-code, emits nothing if left dangling
    }
    let mut words = Vec::new();
    for triplet in zchars.chunks(3) {
        let w = ((triplet[0] as u16) << 10) | ((triplet[1] as u16) << 5) | (triplet[2] as u16);
        words.push(w);
    }
    if let Some(last) = words.last_mut() {
        *last |= 0x8000;
    }
    words
}
