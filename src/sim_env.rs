//! 仿真环境模块
//!
//! 本模块负责：
//! - 读取并解析程序文本（每行一个有符号十进制字）
//! - 确定指令格式（显式指定或启发式探测）
//! - 初始化虚拟机并装载程序
//! - 在指令数上限下驱动运行，管理 READ 输入队列与 WRITE 输出
//!
//! # 示例
//!
//! ```
//! use uvsim::sim_env::{SimConfig, SimEnv};
//!
//! let config = SimConfig::new().with_max_instructions(1000);
//! let mut env = SimEnv::with_program(&[10007, 11007, 43000], config).unwrap();
//! env.push_input(1234);
//! env.run_to_halt().unwrap();
//! assert_eq!(env.outputs(), &[1234]);
//! ```

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::isa::{WordFormat, detect_format};
use crate::machine::{ExecError, MachineBuilder, MachineState, StepResult, UvSim};
use crate::memory::{MemError, UvMemory, WIDE_MEMORY_SIZE, Word};

/// 仿真环境错误
#[derive(Debug, Error)]
pub enum SimError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// 程序文本中存在无法解析的行
    #[error("line {line}: cannot parse '{text}' as an integer")]
    Parse { line: usize, text: String },
    /// 程序文本中的值越出格式范围（整个装载被拒绝）
    #[error("line {line}: value {value} outside the {format} word range")]
    ValueRange {
        line: usize,
        value: Word,
        format: WordFormat,
    },
    /// 内存错误
    #[error(transparent)]
    Mem(#[from] MemError),
    /// 执行错误
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// 仿真配置
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// 程序文本文件路径（可选，也可以直接提供字序列）
    pub program_path: Option<String>,
    /// 指令格式；`None` 表示装载时自动探测
    pub format: Option<WordFormat>,
    /// 内存容量（字数）
    pub capacity: usize,
    /// 最大执行指令数（0 表示无限制）
    pub max_instructions: u64,
    /// 是否打印每步执行说明
    pub verbose: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            program_path: None,
            format: None,
            capacity: WIDE_MEMORY_SIZE,
            max_instructions: 1000,
            verbose: false,
        }
    }
}

impl SimConfig {
    /// 创建新配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置程序文件路径
    pub fn with_program_path(mut self, path: impl Into<String>) -> Self {
        self.program_path = Some(path.into());
        self
    }

    /// 显式指定指令格式（跳过自动探测）
    pub fn with_format(mut self, format: WordFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// 设置内存容量
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// 设置最大执行指令数
    pub fn with_max_instructions(mut self, max: u64) -> Self {
        self.max_instructions = max;
        self
    }

    /// 启用详细输出
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// 解析程序文本
///
/// 每行一个有符号十进制整数；`#` 开头的行是注释，
/// 注释与空行一律忽略。全部解析成功后确定格式
/// （优先显式指定，否则启发式探测，空程序回退默认宽格式），
/// 再逐值校验范围；任何一行失败都拒绝整个程序（不存在部分装载）。
pub fn parse_program(
    text: &str,
    format_override: Option<WordFormat>,
) -> Result<(Vec<Word>, WordFormat), SimError> {
    let mut entries = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value: Word = line.parse().map_err(|_| SimError::Parse {
            line: idx + 1,
            text: line.to_string(),
        })?;
        entries.push((idx + 1, value));
    }

    let words: Vec<Word> = entries.iter().map(|&(_, value)| value).collect();
    let format = format_override
        .or_else(|| detect_format(&words))
        .unwrap_or_default();

    for &(line, value) in &entries {
        if !format.contains(value) {
            return Err(SimError::ValueRange {
                line,
                value,
                format,
            });
        }
    }

    Ok((words, format))
}

/// 从文件读取并解析程序文本
pub fn load_program_file<P: AsRef<Path>>(
    path: P,
    format_override: Option<WordFormat>,
) -> Result<(Vec<Word>, WordFormat), SimError> {
    let text = fs::read_to_string(path)?;
    parse_program(&text, format_override)
}

/// 把内存内容保存为程序文本文件
///
/// 文件头是两行注释，其后每行一个非零字，
/// 按当前格式的定宽文本渲染。返回写出的字数。
pub fn save_program_file<P: AsRef<Path>>(path: P, memory: &UvMemory) -> Result<usize, SimError> {
    let mut out = String::from("# UVSim Instructions File\n# Generated from memory contents\n\n");
    let mut written = 0;

    for addr in 0..memory.capacity() {
        let value = memory.get(addr)?;
        if value != 0 {
            out.push_str(&memory.format().format_word(value));
            out.push('\n');
            written += 1;
        }
    }

    fs::write(path, out)?;
    Ok(written)
}

/// 仿真环境
///
/// 封装虚拟机、配置、输入队列与输出记录，提供统一的运行接口。
/// READ 指令的输入从队列里取；队列空了就报 MissingInput，
/// 等待用户的交互留给表示层。
pub struct SimEnv {
    /// 虚拟机
    pub machine: UvSim,
    /// 配置
    pub config: SimConfig,
    /// 已执行的指令数
    pub instructions_executed: u64,
    /// 装载的程序副本（reset 时重新装入）
    program: Vec<Word>,
    /// READ 输入队列
    inputs: VecDeque<Word>,
    /// WRITE 输出记录
    outputs: Vec<Word>,
}

impl SimEnv {
    /// 从配置创建仿真环境
    ///
    /// 配置了 `program_path` 时读取并装载该文件，否则从空程序开始。
    pub fn from_config(config: SimConfig) -> Result<Self, SimError> {
        let (program, format) = match &config.program_path {
            Some(path) => load_program_file(path, config.format)?,
            None => (Vec::new(), config.format.unwrap_or_default()),
        };
        Self::build(program, format, config)
    }

    /// 直接从字序列创建仿真环境（便捷方法）
    pub fn with_program(program: &[Word], config: SimConfig) -> Result<Self, SimError> {
        let format = config
            .format
            .or_else(|| detect_format(program))
            .unwrap_or_default();
        Self::build(program.to_vec(), format, config)
    }

    fn build(program: Vec<Word>, format: WordFormat, config: SimConfig) -> Result<Self, SimError> {
        let mut machine = MachineBuilder::new()
            .with_capacity(config.capacity)
            .with_format(format)
            .build();
        machine.load_program(&program)?;

        if config.verbose {
            println!(
                "Program loaded in {} format ({} words)",
                format,
                program.len()
            );
        }

        Ok(SimEnv {
            machine,
            config,
            instructions_executed: 0,
            program,
            inputs: VecDeque::new(),
            outputs: Vec::new(),
        })
    }

    /// 追加一个 READ 输入值
    pub fn push_input(&mut self, value: Word) {
        self.inputs.push_back(value);
    }

    /// 批量追加 READ 输入值
    pub fn queue_inputs(&mut self, values: &[Word]) {
        self.inputs.extend(values.iter().copied());
    }

    /// WRITE 指令暴露的输出序列
    pub fn outputs(&self) -> &[Word] {
        &self.outputs
    }

    /// 执行单步
    ///
    /// 下一条指令是 READ 时从输入队列取值。
    pub fn step(&mut self) -> Result<StepResult, SimError> {
        let input = if self.machine.needs_input() {
            self.inputs.pop_front()
        } else {
            None
        };

        let result = self.machine.step(input)?;
        self.instructions_executed += 1;

        if let Some(value) = result.output {
            self.outputs.push(value);
        }
        if self.config.verbose {
            println!("{}", result.message);
        }

        Ok(result)
    }

    /// 运行直到停机、出错或达到指令数上限
    ///
    /// # 返回
    ///
    /// 本次调用执行的指令数与最终机器状态；
    /// 达到上限时状态仍为 `Running`，由调用方决定是否继续。
    pub fn run_to_halt(&mut self) -> Result<(u64, MachineState), SimError> {
        let max = if self.config.max_instructions > 0 {
            self.config.max_instructions
        } else {
            u64::MAX
        };

        let mut executed = 0;
        for _ in 0..max {
            if self.machine.state() != MachineState::Running {
                break;
            }
            let result = self.step()?;
            executed += 1;
            if !result.continue_flag {
                break;
            }
        }

        Ok((executed, self.machine.state()))
    }

    /// 重置仿真环境
    ///
    /// 重建虚拟机（寄存器清零、状态回到运行中）并重新装载程序，
    /// 清空计数器、输入队列与输出记录。
    pub fn reset(&mut self) -> Result<(), SimError> {
        let format = self.machine.format();
        let mut machine = MachineBuilder::new()
            .with_capacity(self.config.capacity)
            .with_format(format)
            .build();
        machine.load_program(&self.program)?;

        self.machine = machine;
        self.instructions_executed = 0;
        self.inputs.clear();
        self.outputs.clear();
        Ok(())
    }

    /// 打印仿真状态（用于调试）
    pub fn dump(&self) {
        println!("=== SimEnv Status ===");
        println!("Instructions executed: {}", self.instructions_executed);
        self.machine.dump();
    }
}
