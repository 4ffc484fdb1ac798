//! 原生后端
//!
//! 每条启用的规则生成一个匹配条件，不合并、不化简，
//! 生成代码中的每个分支都能对应回表中的一行。

use log::trace;

use super::{Backend, CompileError, CompiledLogic, Guard};
use crate::validate::ValidatedTable;

pub(super) fn compile(table: &ValidatedTable<'_>) -> Result<CompiledLogic, CompileError> {
    let guards: Vec<Guard> = table
        .enabled_rules()
        .map(|rule| {
            let mut asserted = rule.fields.clone();
            asserted.sort_unstable();
            asserted.dedup();
            trace!(
                "guard #{} `{}`: {} -> {:?}",
                rule.source_order,
                rule.name(),
                rule.pattern,
                asserted
            );
            Guard {
                source_order: rule.source_order,
                rule_name: rule.name().to_string(),
                pattern: rule.pattern.clone(),
                asserted,
            }
        })
        .collect();

    let logic = CompiledLogic {
        backend: Backend::Native,
        input_width: table.input_width(),
        field_count: table.output().fields().len(),
        guards,
    };
    logic.check_invariants()?;
    Ok(logic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DecodeRule, DecodeTable, OutputSchema};
    use crate::validate::validate;

    #[test]
    fn test_one_guard_per_enabled_rule() {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into(), "b".into()]);
        let table = DecodeTable::new(
            "dec",
            4,
            schema,
            vec![
                DecodeRule::new("r0", "1...", vec!["b".into(), "a".into(), "b".into()]),
                DecodeRule::new("r1", "1...", vec!["a".into()]),
                DecodeRule::new("r2", "0...", vec![]).with_enabled(false),
                DecodeRule::new("r3", "0..1", vec![]),
            ],
        )
        .unwrap();
        let validated = validate(&table).unwrap();
        let logic = compile(&validated).unwrap();

        assert_eq!(logic.backend(), Backend::Native);
        assert_eq!(logic.input_width(), 4);
        assert_eq!(logic.field_count(), 2);

        // 重复模式不合并，停用规则跳过，源顺序保留
        let orders: Vec<usize> = logic.guards().iter().map(|g| g.source_order).collect();
        assert_eq!(orders, [0, 1, 3]);
        assert_eq!(logic.guards()[0].asserted, [0, 1]);
        assert_eq!(logic.guards()[1].pattern, logic.guards()[0].pattern);
        assert!(logic.guards()[2].asserted.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into()]);
        let table = DecodeTable::new("dec", 8, schema, vec![]).unwrap();
        let validated = validate(&table).unwrap();
        let logic = compile(&validated).unwrap();
        assert!(logic.guards().is_empty());
        assert_eq!(logic.evaluate(&[true; 8]), [false]);
    }
}
