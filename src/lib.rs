//! dectab: 指令解码表编译器
//!
//! 把声明式的解码表（位模式 → 输出字段）编译成可综合的 SystemVerilog
//! 组合逻辑解码器，以及它输出的打包结构体类型声明。
//!
//! # 模块结构
//!
//! - `table`: 解码表模型与 JSON 加载
//! - `validate`: 表校验，一次收集全部错误
//! - `compiler`: 编译后端（原生 / espresso）
//! - `emit`: SystemVerilog 代码生成
//! - `analysis`: 规则重叠分析
//! - `config`: 生成配置
//! - `output`: 产物写出
//!
//! # 示例
//!
//! ```
//! use dectab::config::GenConfig;
//! use dectab::table::parse_table;
//!
//! let table = parse_table(r#"{
//!     "module_name": "dec",
//!     "input": 4,
//!     "output": { "type_name": "ctrl_t", "fields": ["a", "b"] },
//!     "decodes": [ { "instr": "foo", "match": "01..", "decodes": ["a"] } ]
//! }"#).unwrap();
//!
//! let result = dectab::compile_table(&table, &GenConfig::default()).unwrap();
//! assert!(result.artifacts.decoder.contents.contains("4'b01??"));
//! ```

pub mod analysis;
pub mod compiler;
pub mod config;
pub mod emit;
pub mod error;
pub mod output;
pub mod table;
pub mod validate;

use std::path::PathBuf;

use log::{debug, info};

use analysis::OverlapInfo;
use compiler::CompiledLogic;
use config::{EmitOptions, GenConfig};
use emit::Artifacts;
use table::DecodeTable;

pub use error::{Error, Result};

/// 一次编译的结果
#[derive(Debug, Clone)]
pub struct Compilation {
    pub logic: CompiledLogic,
    pub artifacts: Artifacts,
    /// 非严格模式下只作为警告的规则重叠
    pub overlaps: Vec<OverlapInfo>,
}

/// 校验、编译并生成代码
///
/// 任一阶段失败都不会产生任何产物。
pub fn compile_table(table: &DecodeTable, config: &GenConfig) -> Result<Compilation> {
    check_emit_options(table, &config.emit)?;

    let validated = validate::validate(table)?;

    let overlaps = analysis::detect_overlaps(&validated);
    if !overlaps.is_empty() {
        if config.strict {
            return Err(Error::Overlap(overlaps));
        }
        analysis::report_overlaps(&overlaps);
    }

    let logic = config.backend.compile(&validated)?;
    let artifacts = emit::emit(&validated, &logic, &config.emit);
    debug!(
        "compiled `{}`: {} guard(s), {} overlap(s)",
        table.module_name(),
        logic.guards().len(),
        overlaps.len()
    );

    Ok(Compilation {
        logic,
        artifacts,
        overlaps,
    })
}

/// 按配置完整执行：加载、编译，再写出产物
///
/// 返回写出的文件；只检查时返回空列表。
pub fn run(config: &GenConfig) -> Result<Vec<PathBuf>> {
    let path = config
        .table_path
        .as_ref()
        .ok_or_else(|| Error::Config("no table path given".to_string()))?;
    let table = table::load_table(path)?;
    let compilation = compile_table(&table, config)?;

    if config.check_only {
        info!(
            "`{}` is valid: {} rule(s) compiled, nothing written",
            table.module_name(),
            compilation.logic.guards().len()
        );
        return Ok(Vec::new());
    }

    output::write_artifacts(&config.out_dir, &compilation.artifacts)
}

fn check_emit_options(table: &DecodeTable, options: &EmitOptions) -> Result<()> {
    let ports = [
        ("input port", &options.input_port),
        ("output port", &options.output_port),
    ];
    for (what, name) in ports {
        table::check_identifier(what, name).map_err(|e| Error::Config(e.to_string()))?;
    }
    if options.input_port == options.output_port {
        return Err(Error::Config(format!(
            "input and output ports share the name `{}`",
            options.input_port
        )));
    }
    let type_name = table.output().type_name();
    for (what, name) in ports {
        if name == type_name {
            return Err(Error::Config(format!(
                "{} `{}` collides with the output type name",
                what, name
            )));
        }
    }
    let suffix = &options.package_suffix;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Config(format!(
            "package suffix `{}` is not a legal identifier suffix",
            suffix
        )));
    }
    // 两个产物按名称落盘，不能同名
    let package = options.package_name(type_name);
    if package == table.module_name() {
        return Err(Error::Config(format!(
            "module name `{}` collides with the type package `{}`",
            table.module_name(),
            package
        )));
    }
    Ok(())
}
