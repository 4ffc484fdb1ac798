//! SystemVerilog 渲染

use crate::compiler::{CompiledLogic, Guard};
use crate::config::EmitOptions;
use crate::validate::ValidatedTable;

/// 带缩进的行缓冲
struct SvWriter<'a> {
    out: String,
    indent: &'a str,
    level: usize,
}

impl<'a> SvWriter<'a> {
    fn new(indent: &'a str) -> Self {
        Self {
            out: String::new(),
            indent,
            level: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(self.indent);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn push(&mut self) {
        self.level += 1;
    }

    fn pop(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// 规则名可能含任意字符，写进单行注释前去掉换行
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn header(w: &mut SvWriter<'_>, table: &ValidatedTable<'_>, options: &EmitOptions) {
    if options.header {
        w.line(format!(
            "// Generated by dectab from decode table `{}`. Do not edit.",
            comment_text(table.module_name())
        ));
    }
}

pub(super) fn render_types(table: &ValidatedTable<'_>, options: &EmitOptions) -> String {
    let output = table.output();
    let package = options.package_name(output.type_name());
    let mut w = SvWriter::new(&options.indent);

    header(&mut w, table, options);
    if options.header {
        w.blank();
    }

    w.line(format!("package {};", package));
    w.blank();
    w.push();
    w.line("typedef struct packed {");
    w.push();
    for field in output.fields() {
        w.line(format!("logic {};", field));
    }
    w.pop();
    w.line(format!("}} {};", output.type_name()));
    w.pop();
    w.blank();
    w.line(format!("endpackage : {}", package));

    w.finish()
}

pub(super) fn render_decoder(
    table: &ValidatedTable<'_>,
    logic: &CompiledLogic,
    options: &EmitOptions,
) -> String {
    let output = table.output();
    let package = options.package_name(output.type_name());
    let width = table.input_width();
    let mut w = SvWriter::new(&options.indent);

    header(&mut w, table, options);
    if options.header {
        w.line(format!(
            "// Backend: {}, {} rule(s).",
            logic.backend(),
            logic.guards().len()
        ));
        w.blank();
    }

    w.line(format!("module {}", table.module_name()));
    w.push();
    w.line(format!("import {}::*;", package));
    w.pop();
    w.line("(");
    w.push();
    w.line(format!("input  logic [{}:0] {},", width - 1, options.input_port));
    w.line(format!("output {} {}", output.type_name(), options.output_port));
    w.pop();
    w.line(");");
    w.blank();

    w.push();
    w.line("always_comb begin");
    w.push();
    w.line(format!("casez ({})", options.input_port));
    w.push();
    for guard in logic.guards() {
        render_arm(&mut w, table, guard, options);
    }
    w.line("default: begin");
    w.push();
    w.line(format!("{} = '0;", options.output_port));
    w.pop();
    w.line("end");
    w.pop();
    w.line("endcase");
    w.pop();
    w.line("end");
    w.pop();
    w.blank();
    w.line(format!("endmodule : {}", table.module_name()));

    w.finish()
}

/// 一个 casez 分支：显式给每个字段赋值
fn render_arm(w: &mut SvWriter<'_>, table: &ValidatedTable<'_>, guard: &Guard, options: &EmitOptions) {
    let fields = table.output().fields();
    let name_width = fields.iter().map(|f| f.len()).max().unwrap_or(0);

    w.line(format!("// {}", comment_text(&guard.rule_name)));
    w.line(format!("{}'b{}: begin", guard.pattern.width(), guard.pattern.to_casez()));
    w.push();
    for (idx, field) in fields.iter().enumerate() {
        let value = if guard.asserts(idx) { "1'b1" } else { "1'b0" };
        w.line(format!(
            "{}.{:<name_width$} = {};",
            options.output_port, field, value
        ));
    }
    w.pop();
    w.line("end");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Backend;
    use crate::table::{DecodeRule, DecodeTable, OutputSchema};
    use crate::validate::validate;

    fn scenario_table() -> DecodeTable {
        let schema = OutputSchema::new("ctrl_t", vec!["a".into(), "b".into()]);
        DecodeTable::new(
            "dec",
            4,
            schema,
            vec![DecodeRule::new("foo", "01..", vec!["a".into()])],
        )
        .unwrap()
    }

    #[test]
    fn test_render_types() {
        let table = scenario_table();
        let validated = validate(&table).unwrap();
        let expected = "\
// Generated by dectab from decode table `dec`. Do not edit.

package ctrl_t_pkg;

  typedef struct packed {
    logic a;
    logic b;
  } ctrl_t;

endpackage : ctrl_t_pkg
";
        assert_eq!(render_types(&validated, &EmitOptions::default()), expected);
    }

    #[test]
    fn test_render_decoder() {
        let table = scenario_table();
        let validated = validate(&table).unwrap();
        let logic = Backend::Native.compile(&validated).unwrap();
        let expected = "\
// Generated by dectab from decode table `dec`. Do not edit.
// Backend: native, 1 rule(s).

module dec
  import ctrl_t_pkg::*;
(
  input  logic [3:0] instr_i,
  output ctrl_t decode_o
);

  always_comb begin
    casez (instr_i)
      // foo
      4'b01??: begin
        decode_o.a = 1'b1;
        decode_o.b = 1'b0;
      end
      default: begin
        decode_o = '0;
      end
    endcase
  end

endmodule : dec
";
        assert_eq!(render_decoder(&validated, &logic, &EmitOptions::default()), expected);
    }

    #[test]
    fn test_no_header_custom_ports() {
        let table = scenario_table();
        let validated = validate(&table).unwrap();
        let logic = Backend::Native.compile(&validated).unwrap();
        let options = EmitOptions::default()
            .with_header(false)
            .with_ports("insn", "ctrl")
            .with_indent(4);

        let text = render_decoder(&validated, &logic, &options);
        assert!(text.starts_with("module dec\n    import ctrl_t_pkg::*;\n"));
        assert!(text.contains("    input  logic [3:0] insn,\n"));
        assert!(text.contains("\n                ctrl.a = 1'b1;\n"));
        assert!(!text.contains("Generated"));

        let types = render_types(&validated, &options);
        assert!(types.starts_with("package ctrl_t_pkg;\n"));
    }

    #[test]
    fn test_field_names_are_aligned() {
        let schema = OutputSchema::new("ctrl_t", vec!["is_load".into(), "rd".into()]);
        let table = DecodeTable::new(
            "dec",
            2,
            schema,
            vec![DecodeRule::new("ld\nx", "1.", vec!["rd".into()])],
        )
        .unwrap();
        let validated = validate(&table).unwrap();
        let logic = Backend::Native.compile(&validated).unwrap();
        let text = render_decoder(&validated, &logic, &EmitOptions::default());

        assert!(text.contains("decode_o.is_load = 1'b0;"));
        assert!(text.contains("decode_o.rd      = 1'b1;"));
        // 规则名中的换行不会破坏注释
        assert!(text.contains("      // ld x\n"));
    }
}
