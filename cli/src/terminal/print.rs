use colored::*;

pub const TOTAL_WIDTH: usize = 64;

/// Report rendering goes straight to stdout; per-port progress goes through
/// `tracing` instead, so it can be filtered away.
pub fn line(msg: &str) {
    println!("{msg}");
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let rendered: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    line(&format!("{}", rendered));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    line(&format!("{}", sep));
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(width) / 2);
    line(&format!("{space}{msg}"));
}

/// One aligned `key ....: value` row of a report table.
pub fn aligned_line(key: &str, key_width: usize, value: &ColoredString) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.chars().count()));
    let prefix: ColoredString = ">".bright_black();
    line(&format!(
        "{} {}{}{} {}",
        prefix,
        key.cyan(),
        dots.bright_black(),
        ":".bright_black(),
        value
    ));
}

const NO_RESULTS: &str = r#"
     _   _  ___    ___  ____  _____ _   _
    | \ | |/ _ \  / _ \|  _ \| ____| \ | |
    |  \| | | | || | | | |_) |  _| |  \| |
    | |\  | |_| || |_| |  __/| |___| |\  |
    |_| \_|\___/  \___/|_|   |_____|_| \_|
              _____   ___  ____ _____ ____
             |  _  | / _ \|  _ \_   _/ ___|
             | |_| || | | | |_) || | \___ \
             |  ___|| |_| |  _ < | |  ___) |
             |_|    \___/|_| \_\|_| |____/
"#;

pub fn no_results() {
    line(&format!("{}", NO_RESULTS.red().bold()));
}
