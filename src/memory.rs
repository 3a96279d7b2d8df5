//! 内存抽象层
//!
//! 本模块定义了按字编址的定长内存 `UvMemory`：
//! 每个单元保存一个定宽有符号十进制字（指令或数据），
//! 所有读写都做边界检查，所有写入都做取值范围检查。

use thiserror::Error;

use crate::isa::WordFormat;

/// 一个内存字：有符号整数编码的指令或数据
///
/// 取值范围由当前格式决定（窄格式 ±9999，宽格式 ±999999），
/// 用 i64 承载以便累加器在算术运算中暂时越界而不丢失精度。
pub type Word = i64;

/// 窄格式（4 位指令）变体的内存容量
pub const NARROW_MEMORY_SIZE: usize = 100;

/// 宽格式兼容（6 位指令）变体的内存容量
pub const WIDE_MEMORY_SIZE: usize = 250;

/// 内存访问错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemError {
    /// 程序长度超过内存容量
    #[error("program size {len} exceeds available memory capacity {capacity}")]
    Capacity { len: usize, capacity: usize },
    /// 地址越界（不在 [0, capacity) 内）
    #[error("memory address {addr} out of range (capacity {capacity})")]
    OutOfRange { addr: usize, capacity: usize },
    /// 字的取值超出当前格式的合法范围
    #[error("value {value} outside the {format} word range")]
    ValueRange { value: Word, format: WordFormat },
}

pub type MemResult<T> = Result<T, MemError>;

/// 定长字内存
///
/// 使用 `Vec<Word>` 存储整个地址空间，创建时全部清零。
/// 容量与格式在构造时固定，不支持动态扩容。
pub struct UvMemory {
    /// 内存数据存储
    words: Vec<Word>,
    /// 当前指令格式，决定合法取值范围与打印宽度
    format: WordFormat,
}

impl UvMemory {
    /// 创建指定容量的内存，全部单元置零
    ///
    /// # 参数
    ///
    /// * `capacity` - 内存字数（窄变体 100，宽变体 250）
    /// * `format` - 当前指令格式
    ///
    /// # 示例
    ///
    /// ```
    /// use uvsim::isa::WordFormat;
    /// use uvsim::memory::{UvMemory, WIDE_MEMORY_SIZE};
    ///
    /// let mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
    /// assert_eq!(mem.capacity(), 250);
    /// ```
    pub fn new(capacity: usize, format: WordFormat) -> Self {
        UvMemory {
            words: vec![0; capacity],
            format,
        }
    }

    /// 获取内存容量（字数）
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// 获取当前指令格式
    pub fn format(&self) -> WordFormat {
        self.format
    }

    fn bounds_check(&self, addr: usize) -> MemResult<usize> {
        if addr < self.words.len() {
            Ok(addr)
        } else {
            Err(MemError::OutOfRange {
                addr,
                capacity: self.words.len(),
            })
        }
    }

    fn range_check(&self, value: Word) -> MemResult<Word> {
        if self.format.contains(value) {
            Ok(value)
        } else {
            Err(MemError::ValueRange {
                value,
                format: self.format,
            })
        }
    }

    /// 将程序按顺序装入内存前缀
    ///
    /// 只写入 `0..program.len()`，其余单元保持原值；
    /// 需要干净内存的调用方应构造新的 `UvMemory`。
    ///
    /// # 错误
    ///
    /// - 程序超长返回 `MemError::Capacity`
    /// - 任一字越出格式范围返回 `MemError::ValueRange`
    ///
    /// 两种错误都不会写入任何单元（不存在部分装载）。
    pub fn load(&mut self, program: &[Word]) -> MemResult<()> {
        if program.len() > self.words.len() {
            return Err(MemError::Capacity {
                len: program.len(),
                capacity: self.words.len(),
            });
        }
        for &word in program {
            self.range_check(word)?;
        }
        self.words[..program.len()].copy_from_slice(program);
        Ok(())
    }

    /// 读取指定地址的字
    pub fn get(&self, addr: usize) -> MemResult<Word> {
        let idx = self.bounds_check(addr)?;
        Ok(self.words[idx])
    }

    /// 写入指定地址的字
    ///
    /// 取值必须在当前格式范围内；越界值被拒绝，绝不截断。
    pub fn set(&mut self, addr: usize, value: Word) -> MemResult<()> {
        let idx = self.bounds_check(addr)?;
        let value = self.range_check(value)?;
        self.words[idx] = value;
        Ok(())
    }

    /// 打印指定范围的内存内容（用于调试）
    pub fn dump(&self, start: usize, end: usize) {
        if self.words.is_empty() {
            return;
        }
        let last = end.min(self.words.len() - 1);
        for addr in start..=last {
            println!(
                "memory[{:0aw$}] = {}",
                addr,
                self.format.format_word(self.words[addr]),
                aw = self.format.addr_width(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory_all_zero() {
        let mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        for addr in 0..WIDE_MEMORY_SIZE {
            assert_eq!(mem.get(addr).unwrap(), 0);
        }
    }

    #[test]
    fn test_load_then_get_roundtrip() {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        let program = [1007, 2107, 1107, 4300];
        mem.load(&program).unwrap();
        for (i, &word) in program.iter().enumerate() {
            assert_eq!(mem.get(i).unwrap(), word);
        }
        // 程序之外的单元保持原值
        assert_eq!(mem.get(program.len()).unwrap(), 0);
    }

    #[test]
    fn test_load_keeps_tail_untouched() {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        mem.set(10, 5678).unwrap();
        mem.load(&[1007, 2107]).unwrap();
        assert_eq!(mem.get(10).unwrap(), 5678);
    }

    #[test]
    fn test_load_full_capacity() {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        let mut program = vec![0; WIDE_MEMORY_SIZE];
        program[0] = 1007;
        program[WIDE_MEMORY_SIZE - 1] = 4300;
        mem.load(&program).unwrap();
        assert_eq!(mem.get(0).unwrap(), 1007);
        assert_eq!(mem.get(WIDE_MEMORY_SIZE - 1).unwrap(), 4300);
    }

    #[test]
    fn test_load_oversized_program_rejected() {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        mem.set(0, 1234).unwrap();
        let program = vec![7; WIDE_MEMORY_SIZE + 1];
        let err = mem.load(&program).unwrap_err();
        assert_eq!(
            err,
            MemError::Capacity {
                len: WIDE_MEMORY_SIZE + 1,
                capacity: WIDE_MEMORY_SIZE
            }
        );
        // 失败的装载不得改动内存
        assert_eq!(mem.get(0).unwrap(), 1234);
    }

    #[test]
    fn test_load_out_of_range_word_rejected() {
        let mut mem = UvMemory::new(NARROW_MEMORY_SIZE, WordFormat::Narrow);
        let err = mem.load(&[1007, 10000]).unwrap_err();
        assert!(matches!(err, MemError::ValueRange { value: 10000, .. }));
        assert_eq!(mem.get(0).unwrap(), 0);
    }

    #[test]
    fn test_get_out_of_range() {
        let mem = UvMemory::new(NARROW_MEMORY_SIZE, WordFormat::Narrow);
        let err = mem.get(NARROW_MEMORY_SIZE).unwrap_err();
        assert!(matches!(err, MemError::OutOfRange { addr: 100, .. }));

        let mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        let err = mem.get(WIDE_MEMORY_SIZE).unwrap_err();
        assert!(matches!(err, MemError::OutOfRange { addr: 250, .. }));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        let err = mem.set(WIDE_MEMORY_SIZE, 1).unwrap_err();
        assert!(matches!(err, MemError::OutOfRange { addr: 250, .. }));
    }

    #[test]
    fn test_set_value_range_narrow() {
        let mut mem = UvMemory::new(NARROW_MEMORY_SIZE, WordFormat::Narrow);
        mem.set(7, 9999).unwrap();
        assert_eq!(mem.get(7).unwrap(), 9999);
        mem.set(7, -9999).unwrap();
        assert_eq!(mem.get(7).unwrap(), -9999);

        let err = mem.set(7, 10000).unwrap_err();
        assert!(matches!(err, MemError::ValueRange { value: 10000, .. }));
        // 被拒绝的写入不生效
        assert_eq!(mem.get(7).unwrap(), -9999);
    }

    #[test]
    fn test_set_value_range_wide() {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        mem.set(7, 999999).unwrap();
        assert_eq!(mem.get(7).unwrap(), 999999);
        mem.set(7, -999999).unwrap();
        assert_eq!(mem.get(7).unwrap(), -999999);

        let err = mem.set(7, 1000000).unwrap_err();
        assert!(matches!(err, MemError::ValueRange { value: 1000000, .. }));
    }
}
