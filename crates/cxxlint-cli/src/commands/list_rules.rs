//! List rules command implementation.

use cxxlint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - CX001, CX002, CX003, CX004 (default)");
    println!("  strict       - All rules, routine-length 80, nesting-depth 4");
    println!("  minimal      - CX001 only (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cxxlint check --rules bracket-structure,routine-length");
    println!("  cxxlint check --rules CX001,CX005");
}
