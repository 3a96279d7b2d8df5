//! BasicML 指令格式抽象与解码
//!
//! 本模块提供指令字的格式层：
//! - `WordFormat`: 窄（4 位）/ 宽（6 位）两种编码格式
//! - `Opcode` / `Instr`: 操作码的封闭枚举与解码结果
//! - `decode`: 按当前格式把指令字拆分为操作码与操作数
//! - `detect_format`: 对已装载字序列的格式启发式探测

mod format;
mod instr;

pub use format::{WordFormat, convert_narrow_to_wide, detect_format};
pub use instr::{DecodeError, Instr, Opcode, decode};

#[cfg(test)]
mod tests;
