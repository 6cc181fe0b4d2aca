// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> String {
    let mut content = String::new();
    for section in 0..sections {
        content.push_str(&format!("# Section {section}\n\n"));
        content.push_str("Some paragraph content with multiple sentences. ");
        content.push_str("It gives the word diff something realistic to chew on.\n\n");
        for item in 0..3 {
            content.push_str(&format!("- Item {item} of section {section}\n"));
        }
        content.push_str("\n| Name | Role |\n|------|------|\n| Ann | Dev |\n\n");
    }
    content
}

/// A copy of `text` with every `nth` line reworded.
#[allow(dead_code)]
pub fn edit_every_nth_line(text: &str, nth: usize) -> String {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(i, line)| {
            if i % nth == 0 && !line.trim().is_empty() {
                line.replacen("content", "text", 1)
                    .replacen("Item", "Entry", 1)
                    .replacen("Dev", "Lead", 1)
            } else {
                line.to_string()
            }
        })
        .collect()
}
