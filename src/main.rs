//! uvsim CLI 入口
//!
//! 薄外壳：带文件参数时装载并运行该程序文本，
//! 无参数时进入交互式程序录入（哨兵值结束后开始执行）。
//! 所有提示、等待与错误展示都留在这里，库本身从不阻塞。

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use uvsim::machine::MachineState;
use uvsim::memory::Word;
use uvsim::sim_env::{SimConfig, SimEnv, SimError};

/// 交互录入的结束哨兵
const INPUT_SENTINEL: &str = "-999999";

fn main() {
    let args: Vec<String> = env::args().collect();

    let result = match args.get(1) {
        Some(path) => run_file(path),
        None => run_interactive(),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// 装载程序文本文件并运行
fn run_file(path: &str) -> Result<(), SimError> {
    let config = SimConfig::new().with_program_path(path);
    let mut env = SimEnv::from_config(config)?;

    println!(
        "Loaded {} in {} format",
        path,
        env.machine.format()
    );
    drive(&mut env)
}

/// 交互式录入程序后运行
fn run_interactive() -> Result<(), SimError> {
    println!("*** Welcome to UVSIM! ***");
    println!("*** Please enter your program one instruction ***");
    println!("*** ( or data word ) at a time into the input ***");
    println!("*** text field. I will display the location ***");
    println!("*** number and a question mark (?). You then ***");
    println!("*** type the word for that location. Enter ***");
    println!("*** {INPUT_SENTINEL} to stop entering the program. ***");

    let stdin = io::stdin();
    let mut program: Vec<Word> = Vec::new();

    loop {
        print!("{:03} ? ", program.len());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == INPUT_SENTINEL {
            println!("*** Program loading complete ***");
            println!("*** Program execution begins ***");
            break;
        }

        match line.parse::<Word>() {
            Ok(value) if value.abs() <= 999_999 => program.push(value),
            _ => {
                println!("*** Error: Please enter an integer from -999999 to +999999 ***");
            }
        }
    }

    let mut env = SimEnv::with_program(&program, SimConfig::new())?;
    drive(&mut env)
}

/// 驱动一次完整运行：逐步执行并打印每步说明，READ 时向用户取值
fn drive(env: &mut SimEnv) -> Result<(), SimError> {
    let max = env.config.max_instructions;
    let mut steps = 0u64;

    loop {
        if max > 0 && steps >= max {
            println!("Execution halted due to reaching execution limit.");
            break;
        }

        if env.machine.needs_input() {
            let value = prompt_input()?;
            env.push_input(value);
        }

        let result = env.step()?;
        println!("{}", result.message);
        steps += 1;

        if !result.continue_flag {
            break;
        }
    }

    if env.machine.state() == MachineState::Halted {
        println!("*** Simulator execution halted ***");
    }
    println!("Instructions executed: {}", env.instructions_executed);
    Ok(())
}

/// 向用户索取一个 READ 输入值，解析失败则重试
fn prompt_input() -> Result<Word, SimError> {
    let stdin = io::stdin();
    loop {
        print!("Enter an integer: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // 输入流结束：让 READ 以 MissingInput 失败，而不是在这里死循环
            return Err(SimError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed while READ was waiting for a value",
            )));
        }

        match line.trim().parse::<Word>() {
            Ok(value) => return Ok(value),
            Err(_) => println!("*** Error: Please enter an integer ***"),
        }
    }
}
