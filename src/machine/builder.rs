//! 虚拟机配置器
//!
//! 统一配置内存容量与指令格式后构建 `UvSim`。
//!
//! # 示例
//!
//! ```
//! use uvsim::machine::MachineBuilder;
//! use uvsim::isa::WordFormat;
//!
//! let vm = MachineBuilder::new()
//!     .with_format(WordFormat::Wide)
//!     .build();
//! assert_eq!(vm.memory().capacity(), 250);
//! ```

use super::UvSim;
use crate::isa::WordFormat;
use crate::memory::{NARROW_MEMORY_SIZE, WIDE_MEMORY_SIZE};

/// 虚拟机构建器
///
/// 默认构建格式灵活的宽变体（250 字、6 位格式）；
/// `narrow_legacy` 一步切到传统窄变体（100 字、4 位格式）。
pub struct MachineBuilder {
    capacity: usize,
    format: WordFormat,
}

impl MachineBuilder {
    /// 创建新的构建器，默认宽变体
    pub fn new() -> Self {
        Self {
            capacity: WIDE_MEMORY_SIZE,
            format: WordFormat::Wide,
        }
    }

    /// 设置内存容量（字数）
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// 设置指令格式
    pub fn with_format(mut self, format: WordFormat) -> Self {
        self.format = format;
        self
    }

    /// 切换到传统窄变体（100 字内存 + 4 位格式）
    pub fn narrow_legacy(mut self) -> Self {
        self.capacity = NARROW_MEMORY_SIZE;
        self.format = WordFormat::Narrow;
        self
    }

    /// 构建虚拟机
    pub fn build(self) -> UvSim {
        UvSim::new(self.capacity, self.format)
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let vm = MachineBuilder::new().build();
        assert_eq!(vm.memory().capacity(), WIDE_MEMORY_SIZE);
        assert_eq!(vm.format(), WordFormat::Wide);
    }

    #[test]
    fn test_builder_narrow_legacy() {
        let vm = MachineBuilder::new().narrow_legacy().build();
        assert_eq!(vm.memory().capacity(), NARROW_MEMORY_SIZE);
        assert_eq!(vm.format(), WordFormat::Narrow);
    }

    #[test]
    fn test_builder_custom() {
        let vm = MachineBuilder::new()
            .with_capacity(64)
            .with_format(WordFormat::Narrow)
            .build();
        assert_eq!(vm.memory().capacity(), 64);
        assert_eq!(vm.format(), WordFormat::Narrow);
    }
}
