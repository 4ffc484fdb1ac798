//! 解码表模型
//!
//! 本模块定义解码规格在内存中的表示：
//! - `OutputSchema`: 输出结构体的类型名与有序字段
//! - `DecodeRule`: 一行解码规则（助记符、位模式、置位字段）
//! - `DecodeTable`: 完整的解码表，构造时做结构检查
//!
//! 构造之后表是只读的；模式符号表的检查由 `validate` 完成。

mod loader;
mod pattern;

use std::collections::HashSet;

use thiserror::Error;

pub use loader::{load_table, parse_table};
pub use pattern::{format_input_bits, parse_input_bits, BadSymbol, Bit, Pattern};

/// 表结构错误
///
/// 在任何校验和编译之前报告，属于致命错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTableError {
    /// 文档无法解析或缺少必需键
    #[error("malformed table document: {0}")]
    Syntax(String),
    #[error("input width must be positive, got {0}")]
    NonPositiveWidth(i64),
    #[error("{what} must not be empty")]
    EmptyName { what: &'static str },
    #[error("{what} `{name}` is not a legal identifier")]
    BadIdentifier { what: &'static str, name: String },
    #[error("output must declare at least one field")]
    NoFields,
    #[error("duplicate output field `{0}`")]
    DuplicateField(String),
    #[error("rule `{rule}`: pattern has {actual} symbols, expected {expected}")]
    PatternWidth {
        rule: String,
        expected: usize,
        actual: usize,
    },
}

/// 输出结构定义
///
/// `fields[0]` 是打包结构的最高位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    type_name: String,
    fields: Vec<String>,
}

impl OutputSchema {
    pub fn new(type_name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// 字段在结构中的下标
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }
}

/// 一行解码规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRule {
    /// 助记符，仅用于诊断和生成代码中的注释
    name: String,
    /// 模式原文，符号表由校验器检查
    pattern: String,
    asserted_fields: Vec<String>,
    enabled: bool,
}

impl DecodeRule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        asserted_fields: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            asserted_fields,
            enabled: true,
        }
    }

    /// 设置规则是否参与编译
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn asserted_fields(&self) -> &[String] {
        &self.asserted_fields
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// 解码表
///
/// 规则顺序即优先级：多条规则同时匹配时，排在前面的规则生效。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    module_name: String,
    input_width: usize,
    output: OutputSchema,
    rules: Vec<DecodeRule>,
}

impl DecodeTable {
    /// 创建解码表并做结构检查
    ///
    /// 宽度须为正，名称须为合法标识符，字段非空且不得重复，
    /// 每条规则的模式长度须等于输入宽度。
    pub fn new(
        module_name: impl Into<String>,
        input_width: i64,
        output: OutputSchema,
        rules: Vec<DecodeRule>,
    ) -> Result<Self, MalformedTableError> {
        let module_name = module_name.into();
        check_identifier("module name", &module_name)?;

        if input_width <= 0 {
            return Err(MalformedTableError::NonPositiveWidth(input_width));
        }
        let input_width = usize::try_from(input_width)
            .map_err(|_| MalformedTableError::NonPositiveWidth(input_width))?;

        check_identifier("output type name", &output.type_name)?;

        if output.fields.is_empty() {
            return Err(MalformedTableError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &output.fields {
            check_identifier("output field", field)?;
            if !seen.insert(field.as_str()) {
                return Err(MalformedTableError::DuplicateField(field.clone()));
            }
        }

        for rule in &rules {
            if rule.name.is_empty() {
                return Err(MalformedTableError::EmptyName { what: "rule name" });
            }
            let actual = rule.pattern.chars().count();
            if actual != input_width {
                return Err(MalformedTableError::PatternWidth {
                    rule: rule.name.clone(),
                    expected: input_width,
                    actual,
                });
            }
        }

        Ok(Self {
            module_name,
            input_width,
            output,
            rules,
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn output(&self) -> &OutputSchema {
        &self.output
    }

    pub fn rules(&self) -> &[DecodeRule] {
        &self.rules
    }
}

/// SystemVerilog 保留字（IEEE 1800-2017 附录 B，按字典序排列）
const RESERVED_WORDS: &[&str] = &[
    "accept_on", "alias", "always", "always_comb", "always_ff", "always_latch", "and", "assert",
    "assign", "assume", "automatic", "before", "begin", "bind", "bins", "binsof", "bit", "break",
    "buf", "bufif0", "bufif1", "byte", "case", "casex", "casez", "cell", "chandle", "checker",
    "class", "clocking", "cmos", "config", "const", "constraint", "context", "continue", "cover",
    "covergroup", "coverpoint", "cross", "deassign", "default", "defparam", "design", "disable",
    "dist", "do", "edge", "else", "end", "endcase", "endchecker", "endclass", "endclocking",
    "endconfig", "endfunction", "endgenerate", "endgroup", "endinterface", "endmodule",
    "endpackage", "endprimitive", "endprogram", "endproperty", "endsequence", "endspecify",
    "endtable", "endtask", "enum", "event", "eventually", "expect", "export", "extends", "extern",
    "final", "first_match", "for", "force", "foreach", "forever", "fork", "forkjoin", "function",
    "generate", "genvar", "global", "highz0", "highz1", "if", "iff", "ifnone", "ignore_bins",
    "illegal_bins", "implements", "implies", "import", "incdir", "include", "initial", "inout",
    "input", "inside", "instance", "int", "integer", "interconnect", "interface", "intersect",
    "join", "join_any", "join_none", "large", "let", "liblist", "library", "local", "localparam",
    "logic", "longint", "macromodule", "matches", "medium", "modport", "module", "nand", "negedge",
    "nettype", "new", "nexttime", "nmos", "nor", "noshowcancelled", "not", "notif0", "notif1",
    "null", "or", "output", "package", "packed", "parameter", "pmos", "posedge", "primitive",
    "priority", "program", "property", "protected", "pull0", "pull1", "pulldown", "pullup",
    "pulsestyle_ondetect", "pulsestyle_onevent", "pure", "rand", "randc", "randcase",
    "randsequence", "rcmos", "real", "realtime", "ref", "reg", "reject_on", "release", "repeat",
    "restrict", "return", "rnmos", "rpmos", "rtran", "rtranif0", "rtranif1", "s_always",
    "s_eventually", "s_nexttime", "s_until", "s_until_with", "scalared", "sequence", "shortint",
    "shortreal", "showcancelled", "signed", "small", "soft", "solve", "specify", "specparam",
    "static", "string", "strong", "strong0", "strong1", "struct", "super", "supply0", "supply1",
    "sync_accept_on", "sync_reject_on", "table", "tagged", "task", "this", "throughout", "time",
    "timeprecision", "timeunit", "tran", "tranif0", "tranif1", "tri", "tri0", "tri1", "triand",
    "trior", "trireg", "type", "typedef", "union", "unique", "unique0", "unsigned", "until",
    "until_with", "untyped", "use", "uwire", "var", "vectored", "virtual", "void", "wait",
    "wait_order", "wand", "weak", "weak0", "weak1", "while", "wildcard", "wire", "with", "within",
    "wor", "xnor", "xor",
];

/// 检查名称是否可直接作为硬件描述语言标识符
pub(crate) fn check_identifier(what: &'static str, name: &str) -> Result<(), MalformedTableError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(MalformedTableError::EmptyName { what });
    };
    let legal = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && RESERVED_WORDS.binary_search(&name).is_err();
    if legal {
        Ok(())
    } else {
        Err(MalformedTableError::BadIdentifier {
            what,
            name: name.to_string(),
        })
    }
}
