//! Operator-facing status lines.
//!
//! Step progress goes to stdout as plain one-liners; structured detail
//! (argv, timings, exit codes) goes to `tracing` on stderr instead.

pub fn info(message: &str) {
    println!("--> {message}");
}

pub fn success(message: &str) {
    println!("    ok: {message}");
}

pub fn warning(message: &str) {
    println!("    warning: {message}");
}

pub fn error(message: &str) {
    println!("    error: {message}");
}
