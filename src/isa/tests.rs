//! ISA 模块测试

use super::*;

#[test]
fn test_decode_narrow_read() {
    let instr = decode(1007, WordFormat::Narrow).unwrap();
    assert_eq!(
        instr,
        Instr {
            raw: 1007,
            opcode: Opcode::Read,
            operand: 7
        }
    );
}

#[test]
fn test_decode_narrow_halt() {
    let instr = decode(4300, WordFormat::Narrow).unwrap();
    assert_eq!(instr.opcode, Opcode::Halt);
    assert_eq!(instr.operand, 0);
}

#[test]
fn test_decode_wide_compact_encoding() {
    // 窄转宽得到的 5 位编码：opcode * 1000 + operand
    let instr = decode(10007, WordFormat::Wide).unwrap();
    assert_eq!(instr.opcode, Opcode::Read);
    assert_eq!(instr.operand, 7);

    let instr = decode(21105, WordFormat::Wide).unwrap();
    assert_eq!(instr.opcode, Opcode::Store);
    assert_eq!(instr.operand, 105);
}

#[test]
fn test_decode_wide_padded_encoding() {
    // 6 位全宽编码：操作码左对齐，填充位为零
    let instr = decode(100007, WordFormat::Wide).unwrap();
    assert_eq!(instr.opcode, Opcode::Read);
    assert_eq!(instr.operand, 7);

    let instr = decode(430000, WordFormat::Wide).unwrap();
    assert_eq!(instr.opcode, Opcode::Halt);
    assert_eq!(instr.operand, 0);
}

#[test]
fn test_decode_wide_padded_nonzero_filler_rejected() {
    // 填充位非零不是合法的左对齐编码
    let err = decode(105007, WordFormat::Wide).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnknownOpcode {
            code: 105,
            raw: 105007
        }
    );
}

#[test]
fn test_decode_empty_instruction() {
    let err = decode(0, WordFormat::Wide).unwrap_err();
    assert_eq!(err, DecodeError::EmptyInstruction { raw: 0 });

    // 操作码字段为 0 的非零字同样按空指令处理
    let err = decode(7, WordFormat::Wide).unwrap_err();
    assert_eq!(err, DecodeError::EmptyInstruction { raw: 7 });
}

#[test]
fn test_decode_unknown_opcode() {
    // 9999 按宽格式拆出操作码 9，不在集合内
    let err = decode(9999, WordFormat::Wide).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnknownOpcode {
            code: 9,
            raw: 9999
        }
    );

    // 同一个字按窄格式拆出操作码 99，同样未知
    let err = decode(9999, WordFormat::Narrow).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnknownOpcode {
            code: 99,
            raw: 9999
        }
    );
}

#[test]
fn test_decode_negative_word_rejected() {
    // 负的数据字不是合法指令
    let err = decode(-10007, WordFormat::Wide).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownOpcode { code: -10, .. }));

    let err = decode(-7, WordFormat::Wide).unwrap_err();
    assert!(matches!(err, DecodeError::EmptyInstruction { raw: -7 }));
}

#[test]
fn test_opcode_roundtrip() {
    for code in [10, 11, 20, 21, 30, 31, 32, 33, 40, 41, 42, 43] {
        let opcode = Opcode::from_code(code).unwrap();
        assert_eq!(opcode.code(), code);
    }
    assert_eq!(Opcode::from_code(12), None);
    assert_eq!(Opcode::from_code(44), None);
    assert_eq!(Opcode::from_code(0), None);
}

#[test]
fn test_detect_format_narrow() {
    assert_eq!(
        detect_format(&[1007, 2107, 1107, 4300]),
        Some(WordFormat::Narrow)
    );
}

#[test]
fn test_detect_format_wide() {
    assert_eq!(
        detect_format(&[100007, 210007, 110007, 430000]),
        Some(WordFormat::Wide)
    );
}

#[test]
fn test_detect_format_wide_compact() {
    // 5 位编码的操作码前缀（10007 / 1000 = 10）触发宽格式判定
    assert_eq!(
        detect_format(&[10007, 21007, 11007, 43000]),
        Some(WordFormat::Wide)
    );
}

#[test]
fn test_detect_format_empty() {
    assert_eq!(detect_format(&[]), None);
}

#[test]
fn test_detect_format_narrow_data_only() {
    // 纯数据程序（没有宽操作码前缀）判为窄格式
    assert_eq!(detect_format(&[0, 5, -42]), Some(WordFormat::Narrow));
}

#[test]
fn test_convert_narrow_to_wide() {
    assert_eq!(convert_narrow_to_wide(1007), 10007);
    assert_eq!(convert_narrow_to_wide(2107), 21007);
    assert_eq!(convert_narrow_to_wide(4300), 43000);
    // 数据字保持数字结构，符号不变
    assert_eq!(convert_narrow_to_wide(42), 42);
    assert_eq!(convert_narrow_to_wide(-2107), -21007);
}

#[test]
fn test_format_ranges() {
    assert!(WordFormat::Narrow.contains(9999));
    assert!(WordFormat::Narrow.contains(-9999));
    assert!(!WordFormat::Narrow.contains(10000));
    assert!(WordFormat::Wide.contains(999999));
    assert!(!WordFormat::Wide.contains(1000000));
}

#[test]
fn test_format_word_width() {
    assert_eq!(WordFormat::Narrow.format_word(7), "+0007");
    assert_eq!(WordFormat::Narrow.format_word(-42), "-0042");
    assert_eq!(WordFormat::Wide.format_word(1234), "+001234");
    assert_eq!(WordFormat::Wide.format_word(-999999), "-999999");
}
