//! espresso 后端
//!
//! 预留给逻辑最小化实现，目前直接报告不支持。

use log::warn;

use super::{Backend, CompileError, CompiledLogic};
use crate::validate::ValidatedTable;

// TODO: 按字段导出 PLA，调用 espresso 最小化后再合并回条件列表
pub(super) fn compile(table: &ValidatedTable<'_>) -> Result<CompiledLogic, CompileError> {
    warn!(
        "espresso backend requested for `{}` but is not available",
        table.module_name()
    );
    Err(CompileError::UnsupportedBackend(Backend::Espresso))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DecodeRule, DecodeTable, OutputSchema};
    use crate::validate::validate;

    #[test]
    fn test_reports_unsupported() {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into()]);
        let table =
            DecodeTable::new("dec", 2, schema, vec![DecodeRule::new("r", "1.", vec!["a".into()])])
                .unwrap();
        let validated = validate(&table).unwrap();
        assert_eq!(
            Backend::Espresso.compile(&validated).unwrap_err(),
            CompileError::UnsupportedBackend(Backend::Espresso)
        );
    }
}
