//! 解码表校验
//!
//! 检查每条规则的模式符号表以及置位字段是否都在输出结构中定义。
//! 一次遍历收集所有违例，保证用户可以在一次修改中全部修复。
//!
//! 校验通过后得到 `ValidatedTable`，这是编译器唯一接受的输入类型。

use std::fmt;

use log::debug;
use thiserror::Error;

use crate::table::{DecodeRule, DecodeTable, OutputSchema, Pattern};

/// 单条校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rule `{rule}`: invalid symbol `{symbol}` at position {position} (expected 0, 1 or .)")]
    MalformedPattern {
        rule: String,
        position: usize,
        symbol: char,
    },
    #[error("rule `{rule}`: field `{field}` is not defined in the output")]
    UndefinedField { rule: String, field: String },
}

impl ValidationError {
    /// 出错规则的名称
    pub fn rule(&self) -> &str {
        match self {
            ValidationError::MalformedPattern { rule, .. } => rule,
            ValidationError::UndefinedField { rule, .. } => rule,
        }
    }
}

/// 一批校验错误（非空，按规则顺序排列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table validation failed with {} error(s):", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// 校验通过的规则
#[derive(Debug, Clone)]
pub struct ValidatedRule<'a> {
    /// 在原表中的位置，即优先级
    pub source_order: usize,
    pub rule: &'a DecodeRule,
    pub pattern: Pattern,
    /// 置位字段在输出结构中的下标，保持源顺序
    pub fields: Vec<usize>,
}

impl ValidatedRule<'_> {
    pub fn name(&self) -> &str {
        self.rule.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.rule.is_enabled()
    }
}

/// 校验通过的解码表
///
/// 只能由 [`validate`] 构造。
#[derive(Debug, Clone)]
pub struct ValidatedTable<'a> {
    table: &'a DecodeTable,
    rules: Vec<ValidatedRule<'a>>,
}

impl<'a> ValidatedTable<'a> {
    pub fn table(&self) -> &'a DecodeTable {
        self.table
    }

    pub fn module_name(&self) -> &'a str {
        self.table.module_name()
    }

    pub fn input_width(&self) -> usize {
        self.table.input_width()
    }

    pub fn output(&self) -> &'a OutputSchema {
        self.table.output()
    }

    /// 全部规则（包括停用的）
    pub fn rules(&self) -> &[ValidatedRule<'a>] {
        &self.rules
    }

    /// 参与编译的规则，保持表顺序
    pub fn enabled_rules(&self) -> impl Iterator<Item = &ValidatedRule<'a>> {
        self.rules.iter().filter(|r| r.is_enabled())
    }
}

/// 校验解码表
///
/// 停用的规则同样要校验。
pub fn validate(table: &DecodeTable) -> Result<ValidatedTable<'_>, ValidationErrors> {
    let output = table.output();
    let mut errors = Vec::new();
    let mut rules = Vec::with_capacity(table.rules().len());

    for (source_order, rule) in table.rules().iter().enumerate() {
        let pattern = match Pattern::parse(rule.pattern()) {
            Ok(pattern) => Some(pattern),
            Err(bad) => {
                errors.extend(bad.into_iter().map(|b| ValidationError::MalformedPattern {
                    rule: rule.name().to_string(),
                    position: b.position,
                    symbol: b.symbol,
                }));
                None
            }
        };

        let mut fields = Vec::with_capacity(rule.asserted_fields().len());
        for field in rule.asserted_fields() {
            match output.field_index(field) {
                Some(idx) => fields.push(idx),
                None => errors.push(ValidationError::UndefinedField {
                    rule: rule.name().to_string(),
                    field: field.clone(),
                }),
            }
        }

        if let Some(pattern) = pattern {
            rules.push(ValidatedRule {
                source_order,
                rule,
                pattern,
                fields,
            });
        }
    }

    if !errors.is_empty() {
        debug!("table `{}`: {} validation error(s)", table.module_name(), errors.len());
        return Err(ValidationErrors(errors));
    }

    debug!("table `{}` validated: {} rules", table.module_name(), rules.len());
    Ok(ValidatedTable { table, rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DecodeRule, OutputSchema};

    fn table(fields: &[&str], rules: &[(&str, &str, &[&str])]) -> DecodeTable {
        let schema = OutputSchema::new("ctrl_t", fields.iter().map(|s| s.to_string()).collect());
        let rules = rules
            .iter()
            .map(|(name, pattern, asserted)| {
                DecodeRule::new(*name, *pattern, asserted.iter().map(|s| s.to_string()).collect())
            })
            .collect();
        DecodeTable::new("dec", 4, schema, rules).unwrap()
    }

    #[test]
    fn test_valid_table() {
        let t = table(&["a", "b"], &[("r0", "01..", &["a"]), ("r1", "1...", &["a", "b"])]);
        let validated = validate(&t).unwrap();
        assert_eq!(validated.rules().len(), 2);
        assert_eq!(validated.rules()[1].fields, vec![0, 1]);
        assert_eq!(validated.rules()[1].source_order, 1);
        assert_eq!(validated.rules()[0].pattern.to_string(), "01..");
    }

    #[test]
    fn test_undefined_field() {
        let t = table(&["a", "b"], &[("r0", "01..", &["c"])]);
        let errs = validate(&t).unwrap_err();
        assert_eq!(
            errs.errors(),
            [ValidationError::UndefinedField {
                rule: "r0".into(),
                field: "c".into(),
            }]
        );
    }

    #[test]
    fn test_collects_all_errors_across_rules() {
        let t = table(
            &["a", "b"],
            &[
                ("r0", "0x..", &["a", "c"]),
                ("r1", "11..", &["a"]),
                ("r2", "1?.z", &["d"]),
            ],
        );
        let errs = validate(&t).unwrap_err();
        assert_eq!(errs.len(), 5);

        let rules: Vec<&str> = errs.iter().map(|e| e.rule()).collect();
        assert_eq!(rules, ["r0", "r0", "r2", "r2", "r2"]);

        assert_eq!(
            errs.errors()[0],
            ValidationError::MalformedPattern {
                rule: "r0".into(),
                position: 1,
                symbol: 'x',
            }
        );
        assert!(matches!(
            &errs.errors()[4],
            ValidationError::UndefinedField { field, .. } if field == "d"
        ));
    }

    #[test]
    fn test_disabled_rules_still_validated() {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into()]);
        let rules = vec![DecodeRule::new("off", "01..", vec!["zz".into()]).with_enabled(false)];
        let t = DecodeTable::new("dec", 4, schema, rules).unwrap();
        assert!(validate(&t).is_err());
    }

    #[test]
    fn test_empty_asserted_fields_is_valid() {
        let t = table(&["a"], &[("nop", "0000", &[])]);
        let validated = validate(&t).unwrap();
        assert!(validated.rules()[0].fields.is_empty());
    }

    #[test]
    fn test_error_listing() {
        let t = table(&["a"], &[("r0", "01..", &["b"]), ("r1", "0...", &["c"])]);
        let listing = validate(&t).unwrap_err().to_string();
        assert!(listing.starts_with("table validation failed with 2 error(s):"));
        assert!(listing.contains("rule `r0`: field `b` is not defined"));
        assert!(listing.contains("rule `r1`: field `c` is not defined"));
    }
}
