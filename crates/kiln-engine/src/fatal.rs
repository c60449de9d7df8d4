//! Process-level failure boundary.
//!
//! Errors that leave the run loop are unrecoverable: they are reported with
//! their full cause chain, teardown runs best-effort, and the process exits
//! with status 1.

use std::any::Any;

/// Exit status used for unrecoverable failures.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Renders `err` and its cause chain as the diagnostic block printed on crash.
pub fn report(err: &anyhow::Error) -> String {
    let mut out = format!("FATAL ERROR: {err}");
    for cause in err.chain().skip(1) {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
    }
    out
}

/// Converts a thread panic payload into an error.
pub fn panic_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    anyhow::anyhow!("run loop panicked: {msg}")
}

/// Logs `err`, runs `teardown`, and terminates the process.
pub fn crash(err: &anyhow::Error, teardown: impl FnOnce()) -> ! {
    let report = report(err);
    log::error!("{report}");
    eprintln!("{report}");

    teardown();

    std::process::exit(FATAL_EXIT_CODE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn report_includes_cause_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("disk on fire"));
        let err = err.context("render callback failed").unwrap_err();
        let text = report(&err);
        assert!(text.starts_with("FATAL ERROR: render callback failed"));
        assert!(text.contains("caused by: disk on fire"));
    }

    #[test]
    fn panic_payloads_become_errors() {
        let err = panic_error(Box::new("boom"));
        assert!(err.to_string().contains("boom"));
        let err = panic_error(Box::new(String::from("owned boom")));
        assert!(err.to_string().contains("owned boom"));
        let err = panic_error(Box::new(42_u8));
        assert!(err.to_string().contains("non-string"));
    }
}
