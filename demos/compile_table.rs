// 示例：编译 RV32I 子集的控制信号解码表，并用参考模型解码几条指令

use dectab::config::GenConfig;
use dectab::table::parse_table;

const TABLE: &str = include_str!("rv32i_subset.json");

fn main() {
    let table = match parse_table(TABLE) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let result = match dectab::compile_table(&table, &GenConfig::default()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("=== {} ===\n", result.artifacts.types.file_name);
    println!("{}", result.artifacts.types.contents);
    println!("=== {} ===\n", result.artifacts.decoder.file_name);
    println!("{}", result.artifacts.decoder.contents);

    let samples: &[(u32, &str)] = &[
        (0x02A00093, "addi x1, x0, 42"),
        (0x002081B3, "add x3, x1, x2"),
        (0x402081B3, "sub x3, x1, x2"),
        (0x00412083, "lw x1, 4(x2)"),
        (0x00208463, "beq x1, x2, 8"),
        (0x00000073, "ecall"),
        (0x00100073, "ebreak (disabled rule)"),
    ];

    println!("=== 解码结果 ===\n");
    for &(raw, desc) in samples {
        let input: Vec<bool> = (0..32).rev().map(|i| (raw >> i) & 1 == 1).collect();
        let rule = result
            .logic
            .first_match(&input)
            .map_or("<default>", |g| g.rule_name.as_str());
        let asserted: Vec<&str> = table
            .output()
            .fields()
            .iter()
            .zip(result.logic.evaluate(&input))
            .filter(|(_, v)| *v)
            .map(|(f, _)| f.as_str())
            .collect();
        println!("0x{:08X} {:<24} -> {:<8} {:?}", raw, desc, rule, asserted);
    }
}
