//! uvsim: BasicML 单线程虚拟机仿真库
//!
//! 本库实现了一个功能正确、结构清晰的 UVSim 虚拟机，
//! 执行定宽有符号十进制编码的 BasicML 指令集，
//! 支持 4 位（窄）与 6 位（宽）两种指令编码格式。
//!
//! # 模块结构
//!
//! - `isa`: 指令格式、操作码解码与格式探测
//! - `machine`: 虚拟机核心与取指-解码-执行引擎
//! - `memory`: 按字编址的内存抽象层
//! - `sim_env`: 仿真环境（配置、程序文本装载、运行控制）

pub mod isa;
pub mod machine;
pub mod memory;
pub mod sim_env;
