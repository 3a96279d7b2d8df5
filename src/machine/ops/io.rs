//! 输入输出操作组（READ / WRITE）

use crate::memory::{MemError, MemResult, UvMemory, Word};

/// READ：校验外部输入值后存入指定地址
///
/// 输入值必须在当前格式范围内；校验通过之前不写内存。
pub fn read(mem: &mut UvMemory, addr: usize, value: Word) -> MemResult<()> {
    if !mem.format().contains(value) {
        return Err(MemError::ValueRange {
            value,
            format: mem.format(),
        });
    }
    mem.set(addr, value)
}

/// WRITE：读出指定地址的字原样返回（只读探查，渲染交给表示层）
pub fn write(mem: &UvMemory, addr: usize) -> MemResult<Word> {
    mem.get(addr)
}
