//! 代码生成
//!
//! 把编译结果渲染成两份文本产物：
//! - 类型声明：输出结构体（打包结构，每个字段一位）
//! - 解码器模块：组合逻辑 casez，按表顺序逐条匹配
//!
//! 生成过程是纯函数，相同输入得到逐字节相同的输出；写文件由 `output` 负责。

mod sv;

use log::debug;

use crate::compiler::CompiledLogic;
use crate::config::EmitOptions;
use crate::validate::ValidatedTable;

/// 一份生成产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// 建议的文件名
    pub file_name: String,
    pub contents: String,
}

/// 一次生成的全部产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// 输出结构体所在的 package
    pub types: Artifact,
    /// 解码器模块
    pub decoder: Artifact,
}

impl Artifacts {
    /// 按写入顺序遍历：先类型，后模块
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        [&self.types, &self.decoder].into_iter()
    }
}

/// 生成类型声明和解码器模块
pub fn emit(table: &ValidatedTable<'_>, logic: &CompiledLogic, options: &EmitOptions) -> Artifacts {
    let package = options.package_name(table.output().type_name());

    let types = Artifact {
        file_name: format!("{}.sv", package),
        contents: sv::render_types(table, options),
    };
    let decoder = Artifact {
        file_name: format!("{}.sv", table.module_name()),
        contents: sv::render_decoder(table, logic, options),
    };

    debug!(
        "emitted {} ({} bytes) and {} ({} bytes)",
        types.file_name,
        types.contents.len(),
        decoder.file_name,
        decoder.contents.len()
    );

    Artifacts { types, decoder }
}
