//! 顶层错误类型

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::OverlapInfo;
use crate::compiler::CompileError;
use crate::table::MalformedTableError;
use crate::validate::ValidationErrors;

/// dectab 的错误
///
/// 任何一种错误都会阻止产物生成。
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    MalformedTable(#[from] MalformedTableError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// 严格模式下的规则重叠
    #[error("{}", overlap_listing(.0))]
    Overlap(Vec<OverlapInfo>),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn overlap_listing(overlaps: &[OverlapInfo]) -> String {
    let mut s = format!(
        "{} overlapping rule pair(s) rejected in strict mode:",
        overlaps.len()
    );
    for overlap in overlaps {
        s.push_str(&format!("\n  - {}", overlap));
    }
    s
}
