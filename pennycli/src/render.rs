//! Terminal output helpers.
//!
use ansi_term::Colour;

pub fn ok(label: &str, rest: &str) {
    println!("{} {}", Colour::Green.paint(label), rest);
}

pub fn warn(msg: &str) {
    println!("{}", Colour::Yellow.paint(msg));
}

pub fn fail(label: &str, rest: &str) {
    eprintln!("{} {}", Colour::Red.paint(label), rest);
}

/// Print rows as fixed-width columns with a bold header.
pub fn table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }
    let line: Vec<String> = header
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    println!("{}", ansi_term::Style::new().bold().paint(line.join("  ")));
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        println!("{}", line.join("  "));
    }
}
