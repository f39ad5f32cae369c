//! RV32I pipeline simulator CLI.
//!
//! This binary is a thin driver over `archsim-core`. It performs:
//! 1. **Run:** Load a flat binary or ELF program, run it to completion, and report the
//!    register file and pipeline statistics.
//! 2. **Disassemble:** List the instructions of a program file.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use archsim_core::config::{Config, HazardDetection, PipelineMode};
use archsim_core::isa::disasm::disassemble;
use archsim_core::sim::loader;
use archsim_core::{SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "archsim",
    author,
    version,
    about = "Instructional RISC-V RV32I pipeline simulator",
    long_about = "Run RV32I programs on a five-stage pipeline (or a single-cycle machine) and report\nregisters and pipeline statistics.\n\nExamples:\n  archsim run program.bin\n  archsim run program.elf --forwarding --show-pipeline\n  archsim run program.bin --config sim.json --mode single-cycle\n  archsim disasm program.bin"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Command-line spelling of the pipeline mode.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// One instruction per cycle, no overlap.
    SingleCycle,
    /// Five-stage pipeline.
    FiveStage,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program to completion.
    Run {
        /// Program to execute (ELF or flat little-endian binary).
        program: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Execution model (overrides the configuration).
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Never stall on data hazards.
        #[arg(long)]
        no_hazard_detection: bool,

        /// Forward results from later pipeline registers into Execute.
        #[arg(long)]
        forwarding: bool,

        /// Cycle budget; 0 disables the limit.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Log every retired instruction.
        #[arg(long)]
        trace: bool,

        /// Print the pipeline contents after every cycle.
        #[arg(long)]
        show_pipeline: bool,

        /// Log filter (e.g. `debug`, `archsim_core=trace`); defaults to `RUST_LOG`.
        #[arg(long)]
        log: Option<String>,
    },

    /// Print the disassembly of a program.
    Disasm {
        /// Program to disassemble (ELF or flat little-endian binary).
        program: PathBuf,

        /// Load address for flat binaries.
        #[arg(long, default_value_t = 0)]
        base: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            program,
            config,
            mode,
            no_hazard_detection,
            forwarding,
            max_cycles,
            trace,
            show_pipeline,
            log,
        } => {
            init_logging(log.as_deref());
            let mut config = config.map_or_else(|| Ok(Config::default()), Config::from_file)
                .unwrap_or_else(|e| fail(&e));
            if let Some(mode) = mode {
                config.pipeline.mode = match mode {
                    ModeArg::SingleCycle => PipelineMode::SingleCycle,
                    ModeArg::FiveStage => PipelineMode::FiveStage,
                };
            }
            if no_hazard_detection {
                config.pipeline.hazard_detection = HazardDetection::Disabled;
            }
            config.pipeline.forwarding |= forwarding;
            config.general.trace |= trace;
            if let Some(limit) = max_cycles {
                config.general.max_cycles = limit;
            }
            cmd_run(&config, &program, show_pipeline);
        }
        Commands::Disasm { program, base } => cmd_disasm(&program, base),
    }
}

/// Installs the global `fmt` subscriber, preferring `--log` over `RUST_LOG`.
fn init_logging(filter: Option<&str>) {
    let filter = filter.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reports a fault and exits with status 1.
fn fail(err: &SimError) -> ! {
    eprintln!("\n[!] FATAL: {err}");
    process::exit(1);
}

/// Loads and runs `path`, then prints the registers and statistics.
///
/// On a fault the machine state at the fault is still printed before exiting with code 1.
fn cmd_run(config: &Config, path: &Path, show_pipeline: bool) {
    let program =
        loader::load_file(path, config.general.start_pc).unwrap_or_else(|e| fail(&e));
    let mut sim = Simulator::from_program(config, &program).unwrap_or_else(|e| fail(&e));

    println!("[*] Program: {}", path.display());
    println!(
        "    Mode: {:?}  Hazard detection: {:?}  Forwarding: {}  Entry: {:#x}  Instructions: {}",
        config.pipeline.mode,
        config.pipeline.hazard_detection,
        config.pipeline.forwarding,
        program.entry,
        program.instruction_count()
    );
    println!();

    let result = if show_pipeline {
        run_showing_pipeline(&mut sim, config.general.max_cycles)
    } else {
        sim.run()
    };

    println!("{}", sim.registers());
    println!("pc = {:#010x}", sim.pc());
    println!();
    sim.stats().print();

    if let Err(e) = result {
        fail(&e);
    }
}

/// Steps the simulator one cycle at a time, printing the pipeline after each cycle.
fn run_showing_pipeline(sim: &mut Simulator, max_cycles: u64) -> Result<(), SimError> {
    while !sim.is_done() {
        if max_cycles != 0 && sim.stats().cycles >= max_cycles {
            return Err(SimError::CycleLimit {
                cycles: sim.stats().cycles,
            });
        }
        sim.step()?;
        println!("--- cycle {} (pc {:#x}) ---", sim.stats().cycles, sim.pc());
        print!("{}", sim.pipeline);
    }
    println!();
    Ok(())
}

/// Prints one line per instruction word: address, encoding and disassembly.
fn cmd_disasm(path: &Path, base: u32) {
    let program = loader::load_file(path, base).unwrap_or_else(|e| fail(&e));
    for segment in &program.text {
        for (addr, &word) in (segment.address..).step_by(4).zip(&segment.words) {
            println!("{addr:08x}:  {word:08x}  {}", disassemble(word));
        }
    }
}
