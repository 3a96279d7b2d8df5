//! 操作码枚举与指令解码
//!
//! 把取出的指令字按当前格式拆分为操作码与操作数。
//! 操作码是封闭枚举：解码阶段产出枚举值，执行阶段用一个
//! 穷尽 match 分发，未知操作码在解码时即被拒绝。

use thiserror::Error;

use crate::memory::Word;

use super::WordFormat;

/// BasicML 操作码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// READ: 把外部输入的字存入 memory[operand]
    Read,
    /// WRITE: 读出 memory[operand] 暴露给调用方（不修改内存）
    Write,
    /// LOAD: accumulator := memory[operand]
    Load,
    /// STORE: memory[operand] := accumulator
    Store,
    /// ADD: accumulator += memory[operand]
    Add,
    /// SUBTRACT: accumulator -= memory[operand]
    Subtract,
    /// DIVIDE: accumulator /= memory[operand]，除数为零报错
    Divide,
    /// MULTIPLY: accumulator *= memory[operand]
    Multiply,
    /// BRANCH: 无条件跳转到 operand
    Branch,
    /// BRANCHNEG: 累加器为负时跳转到 operand
    BranchNeg,
    /// BRANCHZERO: 累加器为零时跳转到 operand
    BranchZero,
    /// HALT: 停机，重新装载前不允许继续执行
    Halt,
}

impl Opcode {
    /// 从数字编码解析操作码，不在集合内返回 `None`
    pub fn from_code(code: Word) -> Option<Opcode> {
        match code {
            10 => Some(Opcode::Read),
            11 => Some(Opcode::Write),
            20 => Some(Opcode::Load),
            21 => Some(Opcode::Store),
            30 => Some(Opcode::Add),
            31 => Some(Opcode::Subtract),
            32 => Some(Opcode::Divide),
            33 => Some(Opcode::Multiply),
            40 => Some(Opcode::Branch),
            41 => Some(Opcode::BranchNeg),
            42 => Some(Opcode::BranchZero),
            43 => Some(Opcode::Halt),
            _ => None,
        }
    }

    /// 操作码的数字编码
    pub fn code(self) -> Word {
        match self {
            Opcode::Read => 10,
            Opcode::Write => 11,
            Opcode::Load => 20,
            Opcode::Store => 21,
            Opcode::Add => 30,
            Opcode::Subtract => 31,
            Opcode::Divide => 32,
            Opcode::Multiply => 33,
            Opcode::Branch => 40,
            Opcode::BranchNeg => 41,
            Opcode::BranchZero => 42,
            Opcode::Halt => 43,
        }
    }

    /// 助记符名称
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Add => "ADD",
            Opcode::Subtract => "SUBTRACT",
            Opcode::Divide => "DIVIDE",
            Opcode::Multiply => "MULTIPLY",
            Opcode::Branch => "BRANCH",
            Opcode::BranchNeg => "BRANCHNEG",
            Opcode::BranchZero => "BRANCHZERO",
            Opcode::Halt => "HALT",
        }
    }
}

/// 已解码的指令
///
/// 操作数对多数操作码是内存地址，对分支操作码是跳转目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instr {
    /// 原始指令字
    pub raw: Word,
    /// 操作码
    pub opcode: Opcode,
    /// 操作数（地址或跳转目标）
    pub operand: usize,
}

/// 解码错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// 操作码字段为 0：踩进了未编程的内存，按畸形程序处理
    #[error("empty instruction ({raw}) encountered")]
    EmptyInstruction { raw: Word },
    /// 操作码不在固定集合内
    #[error("unknown opcode: {code} (raw instruction {raw})")]
    UnknownOpcode { code: Word, raw: Word },
}

/// 按指定格式解码一个指令字
///
/// 按格式的操作数模拆分（窄格式除/模 100，宽格式除/模 1000）。
/// 6 位全宽的字把 2 位操作码左对齐到 3 位字段、第三位补零
/// （如 `100007` 是 READ 007，`430000` 是 HALT），此处一并接受；
/// 填充位非零的字段仍按未知操作码拒绝。
pub fn decode(raw: Word, format: WordFormat) -> Result<Instr, DecodeError> {
    let modulus = format.operand_modulus();
    let mut code = raw / modulus;
    let operand = raw % modulus;

    if format == WordFormat::Wide && code >= 100 && code % 10 == 0 {
        code /= 10;
    }

    if code == 0 {
        return Err(DecodeError::EmptyInstruction { raw });
    }

    let opcode = Opcode::from_code(code).ok_or(DecodeError::UnknownOpcode { code, raw })?;

    Ok(Instr {
        raw,
        opcode,
        operand: operand as usize,
    })
}
