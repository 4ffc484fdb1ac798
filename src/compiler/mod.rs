//! 逻辑编译器
//!
//! 把校验通过的解码表变成匹配逻辑（`CompiledLogic`）。
//! 编译策略是一个封闭的集合，由 `Backend` 选择：
//! - `Native`: 每条规则一个匹配条件，逐字保留
//! - `Espresso`: 逻辑最小化，尚未实现

mod espresso;
mod native;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use log::debug;
use thiserror::Error;

use crate::table::Pattern;
use crate::validate::ValidatedTable;

/// 编译错误
///
/// 校验通过的表在原生后端上不会产生用户错误；
/// `InternalInvariant` 表示本工具自身的缺陷。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("backend `{0}` is not implemented")]
    UnsupportedBackend(Backend),
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// 编译后端
///
/// 同时是命令行 `--backend` 的取值，`--help` 会列出全部名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Backend {
    /// 每条规则一个匹配条件
    #[default]
    Native,
    /// 基于 espresso 的逻辑最小化
    Espresso,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Native, Backend::Espresso];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Native => "native",
            Backend::Espresso => "espresso",
        }
    }

    /// 编译解码表
    pub fn compile(self, table: &ValidatedTable<'_>) -> Result<CompiledLogic, CompileError> {
        debug!("compiling `{}` with {} backend", table.module_name(), self);
        match self {
            Backend::Native => native::compile(table),
            Backend::Espresso => espresso::compile(table),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 未知后端名称
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend `{0}` (expected `native` or `espresso`)")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBackend(s.to_string()))
    }
}

/// 一个匹配条件：模式命中时置位 `asserted` 中的字段，其余字段清零
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    /// 来源规则在表中的位置
    pub source_order: usize,
    pub rule_name: String,
    pub pattern: Pattern,
    /// 输出字段下标，升序且无重复
    pub asserted: Vec<usize>,
}

impl Guard {
    pub fn asserts(&self, field: usize) -> bool {
        self.asserted.binary_search(&field).is_ok()
    }
}

/// 编译结果
///
/// 条件按优先级排列：靠前的条件先匹配。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLogic {
    backend: Backend,
    input_width: usize,
    field_count: usize,
    guards: Vec<Guard>,
}

impl CompiledLogic {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// 按字段查看：置位该字段的全部条件，保持优先级顺序
    pub fn guards_for(&self, field: usize) -> impl Iterator<Item = &Guard> {
        self.guards.iter().filter(move |g| g.asserts(field))
    }

    /// 第一个匹配输入的条件
    pub fn first_match(&self, input: &[bool]) -> Option<&Guard> {
        self.guards.iter().find(|g| g.pattern.matches(input))
    }

    /// 参考模型：计算生成的解码器对给定输入的输出
    ///
    /// 第一个匹配的条件决定全部字段；无匹配时全部为 0。
    pub fn evaluate(&self, input: &[bool]) -> Vec<bool> {
        let mut out = vec![false; self.field_count];
        if let Some(guard) = self.first_match(input) {
            for &idx in &guard.asserted {
                out[idx] = true;
            }
        }
        out
    }

    /// 检查结构不变量
    ///
    /// 失败说明校验器或后端有缺陷。
    fn check_invariants(&self) -> Result<(), CompileError> {
        let mut last_order = None;
        for guard in &self.guards {
            if guard.pattern.is_empty() {
                return Err(CompileError::InternalInvariant(format!(
                    "rule `{}` has an empty pattern",
                    guard.rule_name
                )));
            }
            if guard.pattern.width() != self.input_width {
                return Err(CompileError::InternalInvariant(format!(
                    "rule `{}` pattern is {} bits wide, input is {}",
                    guard.rule_name,
                    guard.pattern.width(),
                    self.input_width
                )));
            }
            if let Some(&idx) = guard.asserted.iter().find(|&&i| i >= self.field_count) {
                return Err(CompileError::InternalInvariant(format!(
                    "rule `{}` asserts field #{} of {}",
                    guard.rule_name, idx, self.field_count
                )));
            }
            if !guard.asserted.windows(2).all(|w| w[0] < w[1]) {
                return Err(CompileError::InternalInvariant(format!(
                    "rule `{}` asserted fields are not in schema order",
                    guard.rule_name
                )));
            }
            if last_order.is_some_and(|last| guard.source_order <= last) {
                return Err(CompileError::InternalInvariant(format!(
                    "rule `{}` is out of table order",
                    guard.rule_name
                )));
            }
            last_order = Some(guard.source_order);
        }
        Ok(())
    }
}
