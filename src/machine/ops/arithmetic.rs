//! 算术操作组（ADD / SUBTRACT / MULTIPLY / DIVIDE）
//!
//! 算术结果不在这里做格式范围钳位：范围检查只发生在
//! 内存写入处，累加器允许暂时越出显示宽度。
//! 整数除法向零截断。

use super::super::ExecError;
use crate::memory::{MemResult, UvMemory, Word};

/// ADD：累加器加上指定地址的字
pub fn add(mem: &UvMemory, addr: usize, accumulator: Word) -> MemResult<Word> {
    let value = mem.get(addr)?;
    Ok(accumulator.wrapping_add(value))
}

/// SUBTRACT：累加器减去指定地址的字
pub fn subtract(mem: &UvMemory, addr: usize, accumulator: Word) -> MemResult<Word> {
    let value = mem.get(addr)?;
    Ok(accumulator.wrapping_sub(value))
}

/// MULTIPLY：累加器乘以指定地址的字
pub fn multiply(mem: &UvMemory, addr: usize, accumulator: Word) -> MemResult<Word> {
    let value = mem.get(addr)?;
    Ok(accumulator.wrapping_mul(value))
}

/// DIVIDE：累加器除以指定地址的字（整数商，向零截断）
///
/// 除数为零返回 `ExecError::DivideByZero`，累加器不受影响。
pub fn divide(mem: &UvMemory, addr: usize, accumulator: Word) -> Result<Word, ExecError> {
    let value = mem.get(addr)?;
    if value == 0 {
        return Err(ExecError::DivideByZero);
    }
    Ok(accumulator / value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::WordFormat;
    use crate::memory::WIDE_MEMORY_SIZE;

    fn mem_with(addr: usize, value: Word) -> UvMemory {
        let mut mem = UvMemory::new(WIDE_MEMORY_SIZE, WordFormat::Wide);
        mem.set(addr, value).unwrap();
        mem
    }

    #[test]
    fn test_add() {
        let mem = mem_with(7, 1000);
        assert_eq!(add(&mem, 7, 500).unwrap(), 1500);
    }

    #[test]
    fn test_subtract() {
        let mem = mem_with(7, 1000);
        assert_eq!(subtract(&mem, 7, 500).unwrap(), -500);
    }

    #[test]
    fn test_multiply() {
        let mem = mem_with(7, 10);
        assert_eq!(multiply(&mem, 7, 5).unwrap(), 50);
    }

    #[test]
    fn test_multiply_unclamped() {
        // 999999 * 999999 越出宽格式范围，但算术组不钳位
        let mem = mem_with(7, 999999);
        assert_eq!(multiply(&mem, 7, 999999).unwrap(), 999_998_000_001);
    }

    #[test]
    fn test_divide() {
        let mem = mem_with(7, 2);
        assert_eq!(divide(&mem, 7, 10).unwrap(), 5);
    }

    #[test]
    fn test_divide_truncates_toward_zero() {
        let mem = mem_with(7, 2);
        assert_eq!(divide(&mem, 7, -7).unwrap(), -3);
        let mem = mem_with(7, -2);
        assert_eq!(divide(&mem, 7, 7).unwrap(), -3);
    }

    #[test]
    fn test_divide_by_zero() {
        let mem = mem_with(7, 0);
        let err = divide(&mem, 7, 10).unwrap_err();
        assert_eq!(err, ExecError::DivideByZero);
    }
}
