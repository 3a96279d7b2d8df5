//! 装载/存储操作组（LOAD / STORE）

use crate::memory::{MemResult, UvMemory, Word};

/// LOAD：读出指定地址的字作为累加器新值
pub fn load(mem: &UvMemory, addr: usize) -> MemResult<Word> {
    mem.get(addr)
}

/// STORE：把累加器的值写入指定地址
///
/// 累加器可能因未钳位的算术结果越出格式范围，
/// 此时写入被拒绝并原样上抛，绝不静默忽略。
pub fn store(mem: &mut UvMemory, addr: usize, accumulator: Word) -> MemResult<()> {
    mem.set(addr, accumulator)
}
