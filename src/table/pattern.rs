//! 位模式
//!
//! 解码表中每一行的匹配模式：`0`、`1` 或 `.`（无关位）组成的定长序列。
//! 下标 0 对应输入的最高位，与硬件二进制字面量的书写顺序一致。

use std::fmt;

/// 单个模式位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
    /// 无关位：0 和 1 都匹配
    DontCare,
}

impl Bit {
    /// 从源文本中的符号解析
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            '.' => Some(Bit::DontCare),
            _ => None,
        }
    }

    /// 源文本形式（`0` / `1` / `.`）
    pub fn symbol(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
            Bit::DontCare => '.',
        }
    }

    /// casez 字面量形式（无关位写作 `?`）
    pub fn casez_symbol(self) -> char {
        match self {
            Bit::DontCare => '?',
            other => other.symbol(),
        }
    }

    /// 检查单个输入位是否匹配
    #[inline]
    pub fn matches(self, bit: bool) -> bool {
        match self {
            Bit::Zero => !bit,
            Bit::One => bit,
            Bit::DontCare => true,
        }
    }
}

/// 模式中出现的非法符号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadSymbol {
    /// 从 0 开始、自最高位计数的位置
    pub position: usize,
    pub symbol: char,
}

/// 已解析的位模式
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bits: Vec<Bit>,
}

impl Pattern {
    /// 解析模式文本
    ///
    /// 收集全部非法符号而不是在第一个处停止。
    pub fn parse(text: &str) -> Result<Self, Vec<BadSymbol>> {
        let mut bits = Vec::with_capacity(text.len());
        let mut bad = Vec::new();
        for (position, symbol) in text.chars().enumerate() {
            match Bit::from_symbol(symbol) {
                Some(bit) => bits.push(bit),
                None => bad.push(BadSymbol { position, symbol }),
            }
        }
        if bad.is_empty() {
            Ok(Self { bits })
        } else {
            Err(bad)
        }
    }

    pub fn from_bits(bits: Vec<Bit>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// 非无关位的数量
    pub fn fixed_bits(&self) -> usize {
        self.bits.iter().filter(|b| **b != Bit::DontCare).count()
    }

    /// 检查输入是否匹配此模式
    ///
    /// 输入按最高位在前排列；宽度不同视为不匹配。
    pub fn matches(&self, input: &[bool]) -> bool {
        self.bits.len() == input.len()
            && self.bits.iter().zip(input).all(|(b, &v)| b.matches(v))
    }

    /// 检查两个模式是否重叠
    ///
    /// 重叠当且仅当存在某个输入同时匹配两者，即所有双方都固定的位取值相同。
    pub fn overlaps(&self, other: &Pattern) -> bool {
        self.width() == other.width()
            && self.bits.iter().zip(&other.bits).all(|(a, b)| match (a, b) {
                (Bit::DontCare, _) | (_, Bit::DontCare) => true,
                (a, b) => a == b,
            })
    }

    /// 检查此模式是否覆盖 `other`：凡匹配 `other` 的输入必然匹配 `self`
    pub fn covers(&self, other: &Pattern) -> bool {
        self.width() == other.width()
            && self.bits.iter().zip(&other.bits).all(|(a, b)| match (a, b) {
                (Bit::DontCare, _) => true,
                (a, b) => a == b,
            })
    }

    /// 构造一个同时匹配两个重叠模式的示例输入，无关位取 0
    pub fn example_common_input(&self, other: &Pattern) -> Option<Vec<bool>> {
        if !self.overlaps(other) {
            return None;
        }
        Some(
            self.bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| *a == Bit::One || *b == Bit::One)
                .collect(),
        )
    }

    /// casez 字面量的位串部分，如 `01??`
    pub fn to_casez(&self) -> String {
        self.bits.iter().map(|b| b.casez_symbol()).collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            write!(f, "{}", bit.symbol())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({})", self)
    }
}

/// 将 `0`/`1` 文本解析为输入位向量（最高位在前）
///
/// 允许 `_` 作为分隔符。
pub fn parse_input_bits(text: &str) -> Option<Vec<bool>> {
    text.chars()
        .filter(|c| *c != '_')
        .map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect()
}

/// 将输入位向量格式化为 `0`/`1` 文本
pub fn format_input_bits(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(s: &str) -> Pattern {
        Pattern::parse(s).unwrap()
    }

    fn input(s: &str) -> Vec<bool> {
        parse_input_bits(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let p = pat("01..");
        assert_eq!(p.width(), 4);
        assert_eq!(p.fixed_bits(), 2);
        assert_eq!(p.to_string(), "01..");
        assert_eq!(p.to_casez(), "01??");
    }

    #[test]
    fn test_parse_collects_all_bad_symbols() {
        let err = Pattern::parse("0x1?").unwrap_err();
        assert_eq!(
            err,
            vec![
                BadSymbol { position: 1, symbol: 'x' },
                BadSymbol { position: 3, symbol: '?' },
            ]
        );
    }

    #[test]
    fn test_matches() {
        let p = pat("01..");
        assert!(p.matches(&input("0100")));
        assert!(p.matches(&input("0111")));
        assert!(!p.matches(&input("1100")));
        // 宽度不同
        assert!(!p.matches(&input("010")));
    }

    #[test]
    fn test_overlap_and_cover() {
        let broad = pat("1...");
        let narrow = pat("11..");
        let other = pat("0...");

        assert!(broad.overlaps(&narrow));
        assert!(narrow.overlaps(&broad));
        assert!(!broad.overlaps(&other));

        assert!(broad.covers(&narrow));
        assert!(!narrow.covers(&broad));
        assert!(broad.covers(&broad));
    }

    #[test]
    fn test_example_common_input() {
        let a = pat("1..0");
        let b = pat(".1..");
        let example = a.example_common_input(&b).unwrap();
        assert_eq!(format_input_bits(&example), "1100");
        assert!(a.matches(&example) && b.matches(&example));

        assert!(pat("1...").example_common_input(&pat("0...")).is_none());
    }

    #[test]
    fn test_parse_input_bits() {
        assert_eq!(input("01_10"), vec![false, true, true, false]);
        assert!(parse_input_bits("01x0").is_none());
    }
}
