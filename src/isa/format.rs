//! 指令编码格式
//!
//! BasicML 的指令字有两种定宽十进制编码：
//! 传统的 4 位格式（2 位操作码 + 2 位操作数）
//! 与扩展的 6 位格式（操作码 + 3 位操作数）。
//! 格式属于单个机器实例，在装载时确定，执行期间不再变化。

use std::fmt;

use crate::memory::Word;

use super::Opcode;

/// 指令编码格式
///
/// 格式同时决定：
/// - 字的合法取值范围（±9999 / ±999999）
/// - 取指后操作码与操作数的拆分方式（除/模 100 或 1000）
/// - 渲染字时的文本打印宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordFormat {
    /// 传统 4 位格式，操作数占低 2 位
    Narrow,
    /// 扩展 6 位格式，操作数占低 3 位（默认）
    #[default]
    Wide,
}

impl WordFormat {
    /// 当前格式下字的最大绝对值
    pub const fn max_word(self) -> Word {
        match self {
            WordFormat::Narrow => 9999,
            WordFormat::Wide => 999_999,
        }
    }

    /// 操作数字段的模（窄格式 100，宽格式 1000）
    pub const fn operand_modulus(self) -> Word {
        match self {
            WordFormat::Narrow => 100,
            WordFormat::Wide => 1000,
        }
    }

    /// 渲染字时的打印宽度（含符号位）
    pub const fn value_width(self) -> usize {
        match self {
            WordFormat::Narrow => 5,
            WordFormat::Wide => 7,
        }
    }

    /// 渲染地址时的打印宽度
    pub const fn addr_width(self) -> usize {
        match self {
            WordFormat::Narrow => 2,
            WordFormat::Wide => 3,
        }
    }

    /// 判断取值是否在当前格式的合法范围内
    pub fn contains(self, value: Word) -> bool {
        value.abs() <= self.max_word()
    }

    /// 按当前格式的定宽文本渲染一个字（如 `+001234`）
    pub fn format_word(self, value: Word) -> String {
        format!("{:+0width$}", value, width = self.value_width())
    }
}

impl fmt::Display for WordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordFormat::Narrow => write!(f, "4-digit"),
            WordFormat::Wide => write!(f, "6-digit"),
        }
    }
}

/// 对字序列做格式启发式探测
///
/// 规则：
/// - 空序列无法分类，返回 `None`
/// - 所有字都在窄格式范围内、且没有任何字按宽格式拆分
///   （`word / 1000`）得到合法操作码时，判为窄格式
/// - 其余情况判为宽格式
///
/// 这是尽力而为的启发式：窄格式程序的位模式若恰好与
/// 宽格式操作码前缀重合会被误判为宽格式。这是既有的已知
/// 局限，需要确定性时应由调用方显式指定格式。
pub fn detect_format(words: &[Word]) -> Option<WordFormat> {
    if words.is_empty() {
        return None;
    }

    let all_narrow = words.iter().all(|&w| WordFormat::Narrow.contains(w));
    let has_wide_opcode = words
        .iter()
        .any(|&w| Opcode::from_code(w / 1000).is_some());

    if all_narrow && !has_wide_opcode {
        Some(WordFormat::Narrow)
    } else {
        Some(WordFormat::Wide)
    }
}

/// 把窄格式字按结构重编码为宽格式
///
/// 按窄格式拆出操作码/操作数（`word / 100`、`word % 100`），
/// 再按宽格式拼回（`opcode * 1000 + operand`）。
/// 这是无损的结构重编码，不是数值缩放；负的数据字保持数字结构不变。
pub fn convert_narrow_to_wide(word: Word) -> Word {
    let opcode = word / 100;
    let operand = word % 100;
    opcode * 1000 + operand
}
