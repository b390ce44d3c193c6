// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "## 🚀 Section\n\nParagraph with **bold**, *italic* and `code`.\n\n- Bullet point\n  - Nested item\n- [link](https://example.com)\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n> 💡 A tip\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\n";
    format!("# Title\n\n{}", base.repeat(size))
}

#[allow(dead_code)]
pub fn generate_task_lists(lists: usize, items: usize) -> String {
    let mut content = String::from("# Tasks\n\n");

    for list in 0..lists {
        for item in 0..items {
            let mark = if item % 2 == 0 { "x" } else { " " };
            content.push_str(&format!("- [{mark}] Task {list}.{item}\n"));
        }
        content.push_str("\nSeparator paragraph.\n\n");
    }

    content
}
