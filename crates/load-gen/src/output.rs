//! Output formatting utilities

use colored::Colorize;

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a worker count with its noun
pub fn format_workers(count: usize) -> String {
    if count == 1 {
        "1 worker".to_string()
    } else {
        format!("{} workers", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_workers() {
        assert_eq!(format_workers(1), "1 worker");
        assert_eq!(format_workers(8), "8 workers");
    }
}
