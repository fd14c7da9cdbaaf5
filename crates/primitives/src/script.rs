//! Minimal script construction for coinbase and output scripts.

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_CHECKSIG: u8 = 0xac;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.script.push(opcode);
        self
    }

    /// Pushes raw bytes with the smallest push opcode for their length.
    pub fn push_slice(mut self, data: &[u8]) -> Self {
        push_data(&mut self.script, data);
        self
    }

    /// Pushes an integer, using `OP_0`, `OP_1NEGATE` and `OP_1..OP_16` for small values.
    pub fn push_int(self, value: i64) -> Self {
        match value {
            0 => self.push_opcode(OP_0),
            -1 => self.push_opcode(OP_1NEGATE),
            1..=16 => self.push_opcode(OP_1 + (value as u8) - 1),
            _ => self.push_num(value),
        }
    }

    /// Pushes the minimal script-number encoding, never an opcode shortcut.
    pub fn push_num(self, value: i64) -> Self {
        self.push_slice(&script_num_to_vec(value))
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.script
    }
}

pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        0..=75 => script.push(data.len() as u8),
        76..=0xff => {
            script.push(OP_PUSHDATA1);
            script.push(data.len() as u8);
        }
        0x100..=0xffff => {
            script.push(OP_PUSHDATA2);
            script.extend_from_slice(&(data.len() as u16).to_le_bytes());
        }
        _ => {
            script.push(OP_PUSHDATA4);
            script.extend_from_slice(&(data.len() as u32).to_le_bytes());
        }
    }
    script.extend_from_slice(data);
}

/// Little-endian sign-magnitude encoding used for numbers inside scripts.
pub fn script_num_to_vec(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }
    let negative = value < 0;
    let mut abs = value.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    if let Some(last) = out.last_mut() {
        if *last & 0x80 != 0 {
            out.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            *last |= 0x80;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_numbers_are_minimal() {
        assert!(script_num_to_vec(0).is_empty());
        assert_eq!(script_num_to_vec(4), vec![0x04]);
        assert_eq!(script_num_to_vec(128), vec![0x80, 0x00]);
        assert_eq!(script_num_to_vec(-1), vec![0x81]);
        assert_eq!(script_num_to_vec(-128), vec![0x80, 0x80]);
        assert_eq!(script_num_to_vec(486_604_799), vec![0xff, 0xff, 0x00, 0x1d]);
    }

    #[test]
    fn small_ints_use_opcodes() {
        let script = ScriptBuilder::new()
            .push_int(0)
            .push_int(1)
            .push_int(16)
            .push_int(-1)
            .push_int(17)
            .into_bytes();
        assert_eq!(script, vec![OP_0, OP_1, 0x60, OP_1NEGATE, 0x01, 0x11]);

        let script = ScriptBuilder::new().push_num(4).into_bytes();
        assert_eq!(script, vec![0x01, 0x04]);
    }

    #[test]
    fn push_opcode_follows_length() {
        let mut script = Vec::new();
        push_data(&mut script, &[0u8; 75]);
        assert_eq!(script[0], 75);

        let mut script = Vec::new();
        push_data(&mut script, &[0u8; 76]);
        assert_eq!(&script[..2], &[OP_PUSHDATA1, 76]);

        let mut script = Vec::new();
        push_data(&mut script, &[0u8; 0x100]);
        assert_eq!(&script[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(script.len(), 3 + 0x100);
    }
}
