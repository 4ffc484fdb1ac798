//! dectab 命令行入口
//!
//! 读取解码表，校验并生成 SystemVerilog 解码器与类型声明。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use dectab::compiler::Backend;
use dectab::config::{EmitOptions, GenConfig};
use dectab::table::{format_input_bits, load_table, parse_input_bits};

/// dectab - compile an instruction decode table into a SystemVerilog decoder
#[derive(Parser, Debug)]
#[command(name = "dectab", version, about)]
struct Args {
    /// Path to the decode table (JSON)
    table: PathBuf,

    /// Directory to write the generated files into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Logic compiler backend (native or espresso)
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = Backend::Native)]
    backend: Backend,

    /// Only validate and compile, do not write any files
    #[arg(long)]
    check: bool,

    /// Treat overlapping rules as errors
    #[arg(long)]
    strict: bool,

    /// Decode a concrete input (e.g. 0110) and print the field values; repeatable
    #[arg(long, value_name = "BITS")]
    eval: Vec<String>,

    /// Name of the decoder input port
    #[arg(long, default_value = "instr_i")]
    input_port: String,

    /// Name of the decoder output port
    #[arg(long, default_value = "decode_o")]
    output_port: String,

    /// Omit the generated-file header comment
    #[arg(long)]
    no_header: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn gen_config(&self) -> GenConfig {
        let emit = EmitOptions::default()
            .with_ports(&self.input_port, &self.output_port)
            .with_header(!self.no_header);
        GenConfig::new()
            .with_table_path(&self.table)
            .with_out_dir(&self.out_dir)
            .with_backend(self.backend)
            .with_emit_options(emit)
            .with_strict(self.strict)
            .with_check_only(self.check || !self.eval.is_empty())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 不经过日志，关闭日志时也要给出完整错误列表
            eprintln!("{}", error_report(&e));
            ExitCode::FAILURE
        }
    }
}

fn error_report(err: &anyhow::Error) -> String {
    format!("error: {:#}", err)
}

fn run(args: &Args) -> Result<()> {
    let config = args.gen_config();

    if args.eval.is_empty() {
        let written = dectab::run(&config)
            .with_context(|| format!("failed to compile {}", args.table.display()))?;
        if !written.is_empty() {
            info!("generated {} file(s) in {}", written.len(), args.out_dir.display());
        }
        return Ok(());
    }

    let table = load_table(&args.table)?;
    let compilation = dectab::compile_table(&table, &config)
        .with_context(|| format!("failed to compile {}", args.table.display()))?;
    let fields = table.output().fields();

    for text in &args.eval {
        let input = parse_input_bits(text)
            .with_context(|| format!("`{}` is not a binary input", text))?;
        anyhow::ensure!(
            input.len() == table.input_width(),
            "input `{}` has {} bits, the decoder takes {}",
            text,
            input.len(),
            table.input_width()
        );

        let rule = compilation
            .logic
            .first_match(&input)
            .map_or("<default>", |g| g.rule_name.as_str());
        let values = compilation.logic.evaluate(&input);
        let assignments: Vec<String> = fields
            .iter()
            .zip(&values)
            .map(|(f, v)| format!("{}={}", f, u8::from(*v)))
            .collect();
        println!(
            "{} [{}] {}",
            format_input_bits(&input),
            rule,
            assignments.join(" ")
        );
    }

    Ok(())
}
