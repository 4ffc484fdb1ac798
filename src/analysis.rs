//! 规则重叠分析
//!
//! 找出可能同时匹配同一输入的规则对。重叠本身不是错误：
//! 表顺序已经决定了优先级。但被前面规则完全覆盖的规则永远不会生效，
//! 通常意味着表写错了。

use std::fmt;

use log::warn;

use crate::table::format_input_bits;
use crate::validate::ValidatedTable;

/// 一对重叠的规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapInfo {
    /// 优先级较高（靠前）的规则
    pub earlier: String,
    pub earlier_order: usize,
    /// 优先级较低（靠后）的规则
    pub later: String,
    pub later_order: usize,
    /// 同时匹配两者的示例输入
    pub example: Vec<bool>,
    /// 后者是否被前者完全覆盖
    pub shadowed: bool,
}

impl fmt::Display for OverlapInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule `{}` (#{}) overlaps earlier rule `{}` (#{}), e.g. input {}",
            self.later,
            self.later_order,
            self.earlier,
            self.earlier_order,
            format_input_bits(&self.example)
        )?;
        if self.shadowed {
            write!(f, "; it is fully shadowed and can never match")?;
        }
        Ok(())
    }
}

/// 检测启用规则之间的重叠
///
/// 结果按（后者，前者）的表顺序排列。
pub fn detect_overlaps(table: &ValidatedTable<'_>) -> Vec<OverlapInfo> {
    let rules: Vec<_> = table.enabled_rules().collect();
    let mut overlaps = Vec::new();

    for (i, later) in rules.iter().enumerate() {
        for earlier in &rules[..i] {
            let Some(example) = earlier.pattern.example_common_input(&later.pattern) else {
                continue;
            };
            overlaps.push(OverlapInfo {
                earlier: earlier.name().to_string(),
                earlier_order: earlier.source_order,
                later: later.name().to_string(),
                later_order: later.source_order,
                example,
                shadowed: earlier.pattern.covers(&later.pattern),
            });
        }
    }

    overlaps
}

/// 被完全覆盖、永远不会生效的规则
pub fn shadowed_rules(overlaps: &[OverlapInfo]) -> Vec<&str> {
    let mut names: Vec<&str> = overlaps
        .iter()
        .filter(|o| o.shadowed)
        .map(|o| o.later.as_str())
        .collect();
    names.dedup();
    names
}

/// 以警告形式输出分析结果
pub fn report_overlaps(overlaps: &[OverlapInfo]) {
    for overlap in overlaps {
        warn!("{}", overlap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DecodeRule, DecodeTable, OutputSchema};
    use crate::validate::validate;

    fn table(rules: &[(&str, &str)]) -> DecodeTable {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into()]);
        let rules = rules
            .iter()
            .map(|(name, pattern)| DecodeRule::new(*name, *pattern, vec!["a".into()]))
            .collect();
        DecodeTable::new("dec", 4, schema, rules).unwrap()
    }

    #[test]
    fn test_disjoint_rules() {
        let t = table(&[("r0", "0..."), ("r1", "10.."), ("r2", "11..")]);
        let validated = validate(&t).unwrap();
        assert!(detect_overlaps(&validated).is_empty());
    }

    #[test]
    fn test_partial_overlap() {
        let t = table(&[("r0", "1..0"), ("r1", ".1..")]);
        let validated = validate(&t).unwrap();
        let overlaps = detect_overlaps(&validated);
        assert_eq!(overlaps.len(), 1);

        let o = &overlaps[0];
        assert_eq!((o.earlier.as_str(), o.later.as_str()), ("r0", "r1"));
        assert!(!o.shadowed);
        assert_eq!(format_input_bits(&o.example), "1100");
        assert!(shadowed_rules(&overlaps).is_empty());
    }

    #[test]
    fn test_shadowed_rule() {
        let t = table(&[("wide", "1..."), ("narrow", "11.."), ("dup", "1...")]);
        let validated = validate(&t).unwrap();
        let overlaps = detect_overlaps(&validated);

        // narrow 被 wide 覆盖；dup 被 wide 覆盖并与 narrow 重叠
        assert_eq!(overlaps.len(), 3);
        assert_eq!(shadowed_rules(&overlaps), ["narrow", "dup"]);
        assert!(overlaps[0].to_string().contains("fully shadowed"));
    }

    #[test]
    fn test_disabled_rules_ignored() {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into()]);
        let rules = vec![
            DecodeRule::new("off", "1...", vec![]).with_enabled(false),
            DecodeRule::new("on", "11..", vec![]),
        ];
        let t = DecodeTable::new("dec", 4, schema, rules).unwrap();
        let validated = validate(&t).unwrap();
        assert!(detect_overlaps(&validated).is_empty());
    }
}
