//! 虚拟机核心与执行引擎
//!
//! 本模块定义 BasicML 单线程虚拟机 `UvSim`，
//! 包含寄存器组（累加器、程序计数器、指令寄存器与已解码字段）
//! 以及取指-解码-执行引擎。

use thiserror::Error;

use crate::isa::{self, DecodeError, Instr, Opcode, WordFormat};
use crate::memory::{MemError, UvMemory, WIDE_MEMORY_SIZE, Word};

mod builder;
pub mod ops;

pub use builder::MachineBuilder;
use ops::control::BranchOutcome;

/// 机器执行状态
///
/// `Halted` 对本次运行是终态：重新装载并复位之前不再执行任何指令。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// 正常运行中
    Running,
    /// 已停机
    Halted,
}

/// 单步执行错误
///
/// 机器内部不做任何恢复：错误中止当前步骤并原样上抛，
/// 由调用方（表示层）决定提示、终止还是重试。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// 内存访问或取值范围错误
    #[error(transparent)]
    Mem(#[from] MemError),
    /// 空指令或未知操作码
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// 除数为零
    #[error("attempt to divide by zero")]
    DivideByZero,
    /// READ 指令执行时没有提供输入值
    #[error("no input provided for READ instruction")]
    MissingInput,
}

/// 单步执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// 面向用户的执行说明
    pub message: String,
    /// WRITE 指令暴露给调用方的字（其余指令为 `None`）
    pub output: Option<Word>,
    /// 是否允许继续执行（HALT 或停机哨兵返回 `false`）
    pub continue_flag: bool,
}

/// BasicML 虚拟机
///
/// 拥有一块 `UvMemory` 与一组寄存器。设计约定：
/// - 格式在装载时固定，属于机器实例而非全局状态，
///   多台机器可并存运行不同格式
/// - 每条指令是完整的不可中断单元，没有内部并行
/// - READ 需要的输入由调用方作为参数传入，机器不在内部等待
pub struct UvSim {
    /// 主内存（格式随内存一起固定）
    memory: UvMemory,
    /// 累加器
    accumulator: Word,
    /// 程序计数器；等于容量时是「已停机」哨兵
    program_counter: usize,
    /// 最近一次取出的指令字
    instruction_register: Word,
    /// 最近一次解码出的操作码编码
    opcode: Word,
    /// 最近一次解码出的操作数
    operand: usize,
    /// 当前执行状态
    state: MachineState,
}

impl UvSim {
    /// 创建指定容量与格式的虚拟机，寄存器全部清零
    pub fn new(capacity: usize, format: WordFormat) -> Self {
        UvSim {
            memory: UvMemory::new(capacity, format),
            accumulator: 0,
            program_counter: 0,
            instruction_register: 0,
            opcode: 0,
            operand: 0,
            state: MachineState::Running,
        }
    }

    /// 将程序装入内存（寄存器保持不变）
    pub fn load_program(&mut self, program: &[Word]) -> Result<(), MemError> {
        self.memory.load(program)
    }

    /// 当前指令格式
    pub fn format(&self) -> WordFormat {
        self.memory.format()
    }

    /// 累加器当前值
    pub fn accumulator(&self) -> Word {
        self.accumulator
    }

    /// 程序计数器当前值
    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// 设置程序计数器
    ///
    /// 设为容量（越过内存末尾）即停机哨兵，表示层的 Halt
    /// 动作用它强制结束一次运行。
    pub fn set_program_counter(&mut self, pc: usize) {
        self.program_counter = pc;
    }

    /// 最近一次取出的指令字
    pub fn instruction_register(&self) -> Word {
        self.instruction_register
    }

    /// 最近一次解码出的操作码编码
    pub fn opcode(&self) -> Word {
        self.opcode
    }

    /// 最近一次解码出的操作数
    pub fn operand(&self) -> usize {
        self.operand
    }

    /// 当前执行状态
    pub fn state(&self) -> MachineState {
        self.state
    }

    /// 获取内存引用
    pub fn memory(&self) -> &UvMemory {
        &self.memory
    }

    /// 获取内存可变引用
    pub fn memory_mut(&mut self) -> &mut UvMemory {
        &mut self.memory
    }

    /// 下一条待执行指令是否需要外部输入（READ）
    ///
    /// 表示层用它决定是否先向用户取值再调用 [`UvSim::step`]。
    /// 取指或解码失败时返回 `false`，错误留给 `step` 上报。
    pub fn needs_input(&self) -> bool {
        self.memory
            .get(self.program_counter)
            .ok()
            .and_then(|raw| isa::decode(raw, self.format()).ok())
            .is_some_and(|instr| instr.opcode == Opcode::Read)
    }

    /// 执行单条指令
    ///
    /// # 参数
    ///
    /// * `input` - READ 指令需要的外部输入值；其余指令忽略
    ///
    /// # 流程
    ///
    /// 1. 从程序计数器处取指
    /// 2. 按当前格式解码（成功后才提交指令寄存器与解码字段，
    ///    失败的步骤不在寄存器上留痕）
    /// 3. 分发到对应操作组执行
    /// 4. 非分支指令程序计数器 +1；命中的分支改写程序计数器；
    ///    HALT 保持程序计数器不变并进入停机态
    ///
    /// 已停机（或程序计数器落在停机哨兵上）时不执行任何操作，
    /// 返回 `continue_flag = false`。
    pub fn step(&mut self, input: Option<Word>) -> Result<StepResult, ExecError> {
        if self.state == MachineState::Halted || self.program_counter >= self.memory.capacity() {
            self.state = MachineState::Halted;
            return Ok(StepResult {
                message: "Machine is halted; load a new program to run again.".to_string(),
                output: None,
                continue_flag: false,
            });
        }

        let raw = self.memory.get(self.program_counter)?;
        let instr = isa::decode(raw, self.format())?;

        self.instruction_register = raw;
        self.opcode = instr.opcode.code();
        self.operand = instr.operand;

        self.execute(instr, input)
    }

    fn execute(&mut self, instr: Instr, input: Option<Word>) -> Result<StepResult, ExecError> {
        let format = self.format();
        let operand = instr.operand;

        let (message, output) = match instr.opcode {
            Opcode::Read => {
                let value = input.ok_or(ExecError::MissingInput)?;
                ops::io::read(&mut self.memory, operand, value)?;
                self.program_counter += 1;
                (
                    format!(
                        "READ: Stored {} in memory[{}]",
                        format.format_word(value),
                        operand
                    ),
                    None,
                )
            }
            Opcode::Write => {
                let value = ops::io::write(&self.memory, operand)?;
                self.program_counter += 1;
                (
                    format!(
                        "WRITE: Memory[{}] = {}",
                        operand,
                        format.format_word(value)
                    ),
                    Some(value),
                )
            }
            Opcode::Load => {
                self.accumulator = ops::load_store::load(&self.memory, operand)?;
                self.program_counter += 1;
                (
                    format!(
                        "LOAD: Accumulator set to {}",
                        format.format_word(self.accumulator)
                    ),
                    None,
                )
            }
            Opcode::Store => {
                ops::load_store::store(&mut self.memory, operand, self.accumulator)?;
                self.program_counter += 1;
                (
                    format!(
                        "STORE: Memory[{}] set to {}",
                        operand,
                        format.format_word(self.accumulator)
                    ),
                    None,
                )
            }
            Opcode::Add => {
                self.accumulator = ops::arithmetic::add(&self.memory, operand, self.accumulator)?;
                self.program_counter += 1;
                (
                    format!(
                        "ADD: Accumulator updated to {}",
                        format.format_word(self.accumulator)
                    ),
                    None,
                )
            }
            Opcode::Subtract => {
                self.accumulator =
                    ops::arithmetic::subtract(&self.memory, operand, self.accumulator)?;
                self.program_counter += 1;
                (
                    format!(
                        "SUBTRACT: Accumulator updated to {}",
                        format.format_word(self.accumulator)
                    ),
                    None,
                )
            }
            Opcode::Divide => {
                self.accumulator =
                    ops::arithmetic::divide(&self.memory, operand, self.accumulator)?;
                self.program_counter += 1;
                (
                    format!(
                        "DIVIDE: Accumulator updated to {}",
                        format.format_word(self.accumulator)
                    ),
                    None,
                )
            }
            Opcode::Multiply => {
                self.accumulator =
                    ops::arithmetic::multiply(&self.memory, operand, self.accumulator)?;
                self.program_counter += 1;
                (
                    format!(
                        "MULTIPLY: Accumulator updated to {}",
                        format.format_word(self.accumulator)
                    ),
                    None,
                )
            }
            Opcode::Branch => {
                self.program_counter = ops::control::branch(operand);
                (
                    format!(
                        "BRANCH: Jumping to address {:0aw$}",
                        operand,
                        aw = format.addr_width()
                    ),
                    None,
                )
            }
            Opcode::BranchNeg => {
                match ops::control::branch_if_negative(operand, self.accumulator) {
                    BranchOutcome::Branch(target) => {
                        self.program_counter = target;
                        (
                            format!(
                                "BRANCHNEG: Accumulator negative, jumping to address {:0aw$}",
                                target,
                                aw = format.addr_width()
                            ),
                            None,
                        )
                    }
                    BranchOutcome::NoBranch => {
                        self.program_counter += 1;
                        (
                            "BRANCHNEG: Accumulator not negative, no branch.".to_string(),
                            None,
                        )
                    }
                }
            }
            Opcode::BranchZero => match ops::control::branch_if_zero(operand, self.accumulator) {
                BranchOutcome::Branch(target) => {
                    self.program_counter = target;
                    (
                        format!(
                            "BRANCHZERO: Accumulator zero, jumping to address {:0aw$}",
                            target,
                            aw = format.addr_width()
                        ),
                        None,
                    )
                }
                BranchOutcome::NoBranch => {
                    self.program_counter += 1;
                    (
                        "BRANCHZERO: Accumulator not zero, no branch.".to_string(),
                        None,
                    )
                }
            },
            Opcode::Halt => {
                ops::control::halt();
                self.state = MachineState::Halted;
                return Ok(StepResult {
                    message: "HALT: Program execution halted.".to_string(),
                    output: None,
                    continue_flag: false,
                });
            }
        };

        Ok(StepResult {
            message,
            output,
            continue_flag: true,
        })
    }

    /// 连续执行多条指令
    ///
    /// # 参数
    ///
    /// * `inputs` - 依次喂给 READ 指令的输入值
    /// * `max_instructions` - 指令数上限，防止未终止的程序跑飞
    ///
    /// # 返回
    ///
    /// 实际执行的指令数与最终机器状态；达到上限时状态仍为
    /// `Running`，由调用方决定是否继续。
    pub fn run(
        &mut self,
        inputs: &[Word],
        max_instructions: u64,
    ) -> Result<(u64, MachineState), ExecError> {
        let mut inputs = inputs.iter().copied();
        let mut executed = 0;
        for _ in 0..max_instructions {
            if self.state != MachineState::Running {
                break;
            }
            let input = if self.needs_input() { inputs.next() } else { None };
            let result = self.step(input)?;
            executed += 1;
            if !result.continue_flag {
                break;
            }
        }
        Ok((executed, self.state))
    }

    /// 打印寄存器快照（用于调试）
    pub fn dump(&self) {
        let format = self.format();
        println!(
            "PC: {:0aw$}  Accumulator: {}  State: {:?}",
            self.program_counter,
            format.format_word(self.accumulator),
            self.state,
            aw = format.addr_width(),
        );
        println!(
            "IR: {}  Opcode: {}  Operand: {:0aw$}",
            format.format_word(self.instruction_register),
            self.opcode,
            self.operand,
            aw = format.addr_width(),
        );
    }
}

impl Default for UvSim {
    fn default() -> Self {
        Self::new(WIDE_MEMORY_SIZE, WordFormat::Wide)
    }
}
