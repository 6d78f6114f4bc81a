use thiserror::Error;

use super::types::{DecodedInstruction, Immediate, Instruction, MethodBody};

/// Why a code array could not be decoded.
///
/// Backward walks need every position of the body, so unlike attribute
/// payloads a partial decode is an error rather than a shorter result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("code truncated inside the instruction at offset {at}")]
    Truncated { at: usize },
    #[error("unknown opcode 0x{opcode:02x} at offset {at}")]
    UnknownOpcode { opcode: u8, at: usize },
}

/// Decode a full code array into a [`MethodBody`].
pub fn decode_code(code: &[u8]) -> Result<MethodBody, DecodeError> {
    let mut instructions = Vec::new();
    let mut pos = 0usize;
    while pos < code.len() {
        let (op, next) = decode_instruction(code, pos)?;
        instructions.push(DecodedInstruction {
            address: pos as u32,
            op,
        });
        pos = next;
    }
    Ok(MethodBody::from_decoded(instructions))
}

fn read_u8(code: &[u8], at: usize) -> Result<u8, DecodeError> {
    code.get(at).copied().ok_or(DecodeError::Truncated { at })
}

fn read_u16(code: &[u8], at: usize) -> Result<u16, DecodeError> {
    match code.get(at..at + 2) {
        Some(b) => Ok(u16::from_be_bytes([b[0], b[1]])),
        None => Err(DecodeError::Truncated { at }),
    }
}

fn read_i32(code: &[u8], at: usize) -> Result<i32, DecodeError> {
    match code.get(at..at + 4) {
        Some(b) => Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(DecodeError::Truncated { at }),
    }
}

/// Ensure the instruction starting at `pos` fits within the code array.
fn bounded(code: &[u8], pos: usize, len: usize) -> Result<usize, DecodeError> {
    let next = pos + len;
    if next > code.len() {
        return Err(DecodeError::Truncated { at: pos });
    }
    Ok(next)
}

/// Decode one instruction at `pos`, returning it and the next offset.
pub fn decode_instruction(code: &[u8], pos: usize) -> Result<(Instruction, usize), DecodeError> {
    use Instruction::*;

    let opcode = read_u8(code, pos)?;
    let (op, len) = match opcode {
        0x01 => (PushImmediate(Immediate::Null), 1),
        // iconst_m1 .. iconst_5
        0x02..=0x08 => (PushImmediate(Immediate::Int(opcode as i32 - 0x03)), 1),
        0x09 | 0x0a => (PushImmediate(Immediate::Long((opcode - 0x09) as i64)), 1),
        0x0b..=0x0d => (PushImmediate(Immediate::Float((opcode - 0x0b) as f32)), 1),
        0x0e | 0x0f => (PushImmediate(Immediate::Double((opcode - 0x0e) as f64)), 1),
        0x10 => (
            PushImmediate(Immediate::Int(read_u8(code, pos + 1)? as i8 as i32)),
            2,
        ),
        0x11 => (
            PushImmediate(Immediate::Int(read_u16(code, pos + 1)? as i16 as i32)),
            3,
        ),
        0x12 => (LoadConst(read_u8(code, pos + 1)? as u16), 2),
        0x13 | 0x14 => (LoadConst(read_u16(code, pos + 1)?), 3),
        // iload / lload / fload / dload / aload
        0x15..=0x19 => (LoadLocal(read_u8(code, pos + 1)? as u16), 2),
        // typed _0.._3 load forms
        0x1a..=0x2d => (LoadLocal(((opcode - 0x1a) & 3) as u16), 1),
        // istore / lstore / fstore / dstore / astore
        0x36..=0x3a => (StoreLocal(read_u8(code, pos + 1)? as u16), 2),
        // typed _0.._3 store forms
        0x3b..=0x4e => (StoreLocal(((opcode - 0x3b) & 3) as u16), 1),
        0x57 => (Pop, 1),
        0x59 => (Dup, 1),
        0xac..=0xb1 => (Return, 1),
        0xb2 => (GetStatic(read_u16(code, pos + 1)?), 3),
        0xb4 => (GetField(read_u16(code, pos + 1)?), 3),
        0xb6 => (InvokeVirtual(read_u16(code, pos + 1)?), 3),
        0xb7 => (InvokeSpecial(read_u16(code, pos + 1)?), 3),
        0xb8 => (InvokeStatic(read_u16(code, pos + 1)?), 3),
        0xb9 => (
            InvokeInterface {
                index: read_u16(code, pos + 1)?,
                count: read_u8(code, pos + 3)?,
            },
            5,
        ),
        0xba => (
            InvokeDynamic {
                index: read_u16(code, pos + 1)?,
            },
            5,
        ),
        0xbb => (New(read_u16(code, pos + 1)?), 3),
        0xc0 => (CheckCast(read_u16(code, pos + 1)?), 3),
        0xc4 => return decode_wide(code, pos),
        0xaa => return skip_tableswitch(code, pos),
        0xab => return skip_lookupswitch(code, pos),
        _ => (Other { opcode }, other_length(opcode, code, pos)?),
    };
    Ok((op, bounded(code, pos, len)?))
}

/// Byte length of opcodes decoded as `Other`.
fn other_length(opcode: u8, code: &[u8], pos: usize) -> Result<usize, DecodeError> {
    let len = match opcode {
        // nop, array loads/stores, stack ops, arithmetic, conversions,
        // comparisons, arraylength, athrow, monitors
        0x00 | 0x2e..=0x35 | 0x4f..=0x56 | 0x58 | 0x5a..=0x83 | 0x85..=0x98 | 0xbe | 0xbf
        | 0xc2 | 0xc3 => 1,
        // ret, newarray
        0xa9 | 0xbc => 2,
        // iinc, branches, jsr, putstatic/putfield, anewarray, instanceof,
        // ifnull/ifnonnull
        0x84 | 0x99..=0xa8 | 0xb3 | 0xb5 | 0xbd | 0xc1 | 0xc6 | 0xc7 => 3,
        // multianewarray
        0xc5 => 4,
        // goto_w, jsr_w
        0xc8 | 0xc9 => 5,
        _ => {
            return Err(DecodeError::UnknownOpcode {
                opcode,
                at: pos,
            })
        }
    };
    // the operands must be present even though they are not kept
    let _ = bounded(code, pos, len)?;
    Ok(len)
}

/// `wide`-prefixed load/store forms fold into the normal slot variants;
/// `wide iinc` stays opaque.
fn decode_wide(code: &[u8], pos: usize) -> Result<(Instruction, usize), DecodeError> {
    let sub = read_u8(code, pos + 1)?;
    match sub {
        0x15..=0x19 => Ok((
            Instruction::LoadLocal(read_u16(code, pos + 2)?),
            bounded(code, pos, 4)?,
        )),
        0x36..=0x3a => Ok((
            Instruction::StoreLocal(read_u16(code, pos + 2)?),
            bounded(code, pos, 4)?,
        )),
        // wide ret
        0xa9 => Ok((Instruction::Other { opcode: 0xc4 }, bounded(code, pos, 4)?)),
        // wide iinc
        0x84 => Ok((Instruction::Other { opcode: 0xc4 }, bounded(code, pos, 6)?)),
        _ => Err(DecodeError::UnknownOpcode {
            opcode: sub,
            at: pos + 1,
        }),
    }
}

/// Padding bytes between a switch opcode and its aligned operands.
fn switch_padding(pos: usize) -> usize {
    (4 - (pos + 1) % 4) % 4
}

fn skip_tableswitch(code: &[u8], pos: usize) -> Result<(Instruction, usize), DecodeError> {
    let operands = pos + 1 + switch_padding(pos);
    let low = read_i32(code, operands + 4)?;
    let high = read_i32(code, operands + 8)?;
    if high < low {
        return Err(DecodeError::Truncated { at: pos });
    }
    let targets = (high - low + 1) as usize;
    let next = bounded(code, operands, 12 + targets * 4)?;
    Ok((Instruction::Other { opcode: 0xaa }, next))
}

fn skip_lookupswitch(code: &[u8], pos: usize) -> Result<(Instruction, usize), DecodeError> {
    let operands = pos + 1 + switch_padding(pos);
    let npairs = read_i32(code, operands + 4)?;
    if npairs < 0 {
        return Err(DecodeError::Truncated { at: pos });
    }
    let next = bounded(code, operands, 8 + npairs as usize * 8)?;
    Ok((Instruction::Other { opcode: 0xab }, next))
}
