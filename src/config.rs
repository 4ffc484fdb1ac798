//! 生成配置
//!
//! `GenConfig` 汇总一次生成所需的全部选项，CLI 参数最终都映射到这里。
//!
//! # 示例
//!
//! ```
//! use dectab::config::GenConfig;
//! use dectab::compiler::Backend;
//!
//! let config = GenConfig::new()
//!     .with_table_path("decode.json")
//!     .with_out_dir("rtl/generated")
//!     .with_backend(Backend::Native)
//!     .with_strict(true);
//! assert_eq!(config.out_dir.to_str(), Some("rtl/generated"));
//! ```

use std::path::PathBuf;

use crate::compiler::Backend;

/// 生成代码的排版选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// 解码器输入端口名
    pub input_port: String,
    /// 解码器输出端口名
    pub output_port: String,
    /// 类型声明所在 package 名的后缀（package 名 = 类型名 + 后缀）
    pub package_suffix: String,
    /// 是否输出文件头注释
    pub header: bool,
    /// 缩进字符串
    pub indent: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            input_port: "instr_i".to_string(),
            output_port: "decode_o".to_string(),
            package_suffix: "_pkg".to_string(),
            header: true,
            indent: "  ".to_string(),
        }
    }
}

impl EmitOptions {
    pub fn with_ports(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_port = input.into();
        self.output_port = output.into();
        self
    }

    pub fn with_package_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.package_suffix = suffix.into();
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    /// 某个类型对应的 package 名
    pub fn package_name(&self, type_name: &str) -> String {
        format!("{}{}", type_name, self.package_suffix)
    }
}

/// 生成配置
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// 解码表路径
    pub table_path: Option<PathBuf>,
    /// 输出目录
    pub out_dir: PathBuf,
    /// 编译后端
    pub backend: Backend,
    /// 排版选项
    pub emit: EmitOptions,
    /// 重叠的规则视为错误
    pub strict: bool,
    /// 只检查，不写文件
    pub check_only: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            out_dir: PathBuf::from("."),
            backend: Backend::Native,
            emit: EmitOptions::default(),
            strict: false,
            check_only: false,
        }
    }
}

impl GenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_emit_options(mut self, emit: EmitOptions) -> Self {
        self.emit = emit;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }
}
