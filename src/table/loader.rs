//! 解码表文档加载
//!
//! 文档格式（JSON）：
//!
//! ```json
//! {
//!   "module_name": "rv_decoder",
//!   "input": 4,
//!   "output": { "type_name": "ctrl_t", "fields": ["a", "b"] },
//!   "decodes": [
//!     { "instr": "add", "match": "01..", "decodes": ["a"] }
//!   ]
//! }
//! ```
//!
//! 每条规则可选 `"enabled": false` 以在不删除的情况下停用。

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use super::{DecodeRule, DecodeTable, MalformedTableError, OutputSchema};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    module_name: String,
    input: i64,
    output: RawOutput,
    decodes: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    type_name: String,
    fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    instr: String,
    #[serde(rename = "match")]
    pattern: String,
    decodes: Vec<String>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RawTable {
    fn into_table(self) -> std::result::Result<DecodeTable, MalformedTableError> {
        let output = OutputSchema::new(self.output.type_name, self.output.fields);
        let rules = self
            .decodes
            .into_iter()
            .map(|r| DecodeRule::new(r.instr, r.pattern, r.decodes).with_enabled(r.enabled))
            .collect();
        DecodeTable::new(self.module_name, self.input, output, rules)
    }
}

/// 从文本解析解码表
pub fn parse_table(source: &str) -> std::result::Result<DecodeTable, MalformedTableError> {
    let raw: RawTable = serde_json::from_str(source)
        .map_err(|e| MalformedTableError::Syntax(e.to_string()))?;
    raw.into_table()
}

/// 从文件加载解码表
pub fn load_table(path: impl AsRef<Path>) -> Result<DecodeTable> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(&source)?;
    debug!(
        "loaded table `{}` from {}: {} rules, {} output fields",
        table.module_name(),
        path.display(),
        table.rules().len(),
        table.output().fields().len()
    );
    Ok(table)
}
