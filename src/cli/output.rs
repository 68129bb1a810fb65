//! Terminal output for catree commands
//!
//! Listings and JSON go to stdout uncolored so they can be piped; status
//! lines are colored and `colored` honors NO_COLOR / CLICOLOR_FORCE.

use colored::Colorize;

/// `error: ...` on stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// `warning: ...` on stderr, e.g. an empty listing or a search without hits
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Accepted check or validation
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Indented line below a [`header`]
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Data line (listing rows, id sets, JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
