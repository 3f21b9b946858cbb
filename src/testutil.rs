//! # Assertion helpers independent of any test framework.
//!
//! The helpers only need the narrow [`TestReporter`] capability; [`StdReporter`]
//! backs it with Rust's own test harness (a failed reporter panics).
//!
//! ## Output of [`assert_elements_match`]
//! ```text
//! Unexpected elements
//!         [OK] a
//!    [MISSING] b
//! [UNEXPECTED] c
//! ```

use std::fmt::Display;

use crate::compare::diff_unordered;

/// Minimal reporting capability an assertion needs.
pub trait TestReporter {
    /// Name of the running test.
    fn name(&self) -> &str;

    /// Marks the test as failed and keeps going.
    fn fail(&mut self);

    /// Reports whether the test has failed.
    fn failed(&self) -> bool;

    /// Records a message.
    fn log(&mut self, msg: &str);

    /// Records a message and marks the test as failed.
    fn error(&mut self, msg: &str) {
        self.log(msg);
        self.fail();
    }

    /// Marks the test as failed and stops it.
    fn fail_now(&mut self) -> !;

    /// Records a message, then stops the test as failed.
    fn fatal(&mut self, msg: &str) -> ! {
        self.log(msg);
        self.fail_now()
    }
}

/// [`TestReporter`] for Rust's test harness.
///
/// Messages go to stderr (captured per test by the harness).
///
/// # Panics
/// - [`fail_now`](TestReporter::fail_now) panics with the recorded messages.
/// - Dropping a reporter that was marked failed (through
///   [`fail`](TestReporter::fail) or [`error`](TestReporter::error)) panics
///   with the recorded messages, so the enclosing test fails at the end of its
///   scope. No panic is raised while the thread is already unwinding.
///
/// # Example
/// ```
/// use sigvisor::testutil::{StdReporter, TestReporter, assert_elements_match};
///
/// let mut t = StdReporter::new("doc");
/// assert!(assert_elements_match(&mut t, "", [1, 2], [2, 1], |a, b| a == b));
/// assert!(!t.failed());
/// ```
#[derive(Debug)]
pub struct StdReporter {
    name: String,
    failed: bool,
    messages: Vec<String>,
}

impl StdReporter {
    /// Reporter for the test called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed: false,
            messages: Vec::new(),
        }
    }

    /// Reporter named after the current thread (the harness names test threads after tests).
    pub fn current() -> Self {
        Self::new(std::thread::current().name().unwrap_or("<unnamed>"))
    }

    /// Messages recorded so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn report(&self) -> String {
        format!("{} failed:\n{}", self.name, self.messages.join("\n"))
    }
}

impl TestReporter for StdReporter {
    fn name(&self) -> &str {
        &self.name
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn failed(&self) -> bool {
        self.failed
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{}: {msg}", self.name);
        self.messages.push(msg.to_string());
    }

    fn fail_now(&mut self) -> ! {
        self.failed = true;
        panic!("{}", self.report())
    }
}

impl Drop for StdReporter {
    fn drop(&mut self) {
        if self.failed && !std::thread::panicking() {
            panic!("{}", self.report());
        }
    }
}

/// Verifies that `expected` and `actual` hold the same elements, ignoring order.
///
/// Duplicates count individually. On mismatch, every element is listed as
/// `[OK]`, `[MISSING]` (expected only) or `[UNEXPECTED]` (actual only) and the
/// reporter gets one error; returns whether the elements matched.
pub fn assert_elements_match<T, E, A, F>(
    t: &mut dyn TestReporter,
    msg: &str,
    expected: E,
    actual: A,
    eq: F,
) -> bool
where
    T: Display,
    E: IntoIterator<Item = T>,
    A: IntoIterator<Item = T>,
    F: FnMut(&T, &T) -> bool,
{
    let diff = diff_unordered(expected, actual, eq);
    if diff.is_match() {
        return true;
    }

    let mut out = if msg.is_empty() {
        "Unexpected elements\n".to_string()
    } else {
        format!("{msg}\n")
    };
    for item in &diff.common {
        out.push_str(&format!("{:>12} {item}\n", "[OK]"));
    }
    for item in &diff.only_left {
        out.push_str(&format!("{:>12} {item}\n", "[MISSING]"));
    }
    for item in &diff.only_right {
        out.push_str(&format!("{:>12} {item}\n", "[UNEXPECTED]"));
    }
    t.error(&out);
    false
}

/// Verifies that `result` is an error whose message contains `contains`.
pub fn assert_error_contains<V, Err: Display>(
    t: &mut dyn TestReporter,
    result: &Result<V, Err>,
    contains: &str,
) -> bool {
    match result {
        Ok(_) => {
            t.error("expected an error but got Ok");
            false
        }
        Err(e) => {
            let text = e.to_string();
            if text.contains(contains) {
                true
            } else {
                t.error(&format!("{text:?} does not contain {contains:?}"));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::compare::{strings_equal, substring_of};

    #[derive(Default)]
    struct Recorder {
        failed: bool,
        logs: Vec<String>,
    }

    impl TestReporter for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn fail(&mut self) {
            self.failed = true;
        }

        fn failed(&self) -> bool {
            self.failed
        }

        fn log(&mut self, msg: &str) {
            self.logs.push(msg.to_string());
        }

        fn fail_now(&mut self) -> ! {
            panic!("fail_now")
        }
    }

    #[test]
    fn test_match_reports_nothing() {
        let mut t = Recorder::default();
        assert!(assert_elements_match(&mut t, "", ["a", "b"], ["b", "a"], strings_equal));
        assert!(!t.failed);
        assert!(t.logs.is_empty());
    }

    #[test]
    fn test_mismatch_output_is_aligned() {
        let mut t = Recorder::default();
        let ok = assert_elements_match(&mut t, "", ["a", "b"], ["a", "c"], strings_equal);

        assert!(!ok);
        assert!(t.failed);
        assert_eq!(
            t.logs,
            vec![
                "Unexpected elements\n        [OK] a\n   [MISSING] b\n[UNEXPECTED] c\n".to_string()
            ]
        );
    }

    #[test]
    fn test_custom_message_and_predicate() {
        let mut t = Recorder::default();
        let ok = assert_elements_match(
            &mut t,
            "log lines",
            ["started", "stopped"],
            ["worker started", "worker crashed"],
            substring_of,
        );

        assert!(!ok);
        assert!(t.logs[0].starts_with("log lines\n        [OK] started\n"));
        assert!(t.logs[0].contains("   [MISSING] stopped\n"));
        assert!(t.logs[0].contains("[UNEXPECTED] worker crashed\n"));
    }

    #[test]
    fn test_error_contains() {
        let mut t = Recorder::default();
        let res: Result<(), String> = Err("connection refused".to_string());
        assert!(assert_error_contains(&mut t, &res, "refused"));
        assert!(!t.failed);

        assert!(!assert_error_contains(&mut t, &res, "timeout"));
        assert!(t.failed);
    }

    #[test]
    fn test_error_contains_on_ok() {
        let mut t = Recorder::default();
        let res: Result<u8, String> = Ok(1);
        assert!(!assert_error_contains(&mut t, &res, "x"));
        assert_eq!(t.logs, vec!["expected an error but got Ok".to_string()]);
    }

    #[test]
    fn test_std_reporter_passes_silently() {
        let mut t = StdReporter::current();
        t.log("just a note");
        assert!(!t.failed());
        assert_eq!(t.messages(), ["just a note".to_string()]);
    }

    #[test]
    #[should_panic(expected = "MISSING")]
    fn test_std_reporter_panics_on_drop_after_failure() {
        let mut t = StdReporter::new("drop");
        assert_elements_match(&mut t, "", [1], [2], |a, b| a == b);
    }

    #[test]
    #[should_panic(expected = "drop-error failed:\nbad value")]
    fn test_std_reporter_error_panics_on_drop() {
        let mut t = StdReporter::new("drop-error");
        t.error("bad value");
    }

    #[test]
    #[should_panic(expected = "unwinding")]
    fn test_std_reporter_does_not_panic_while_unwinding() {
        let mut t = StdReporter::new("unwind");
        t.fail();
        panic!("unwinding");
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_std_reporter_fatal() {
        let mut t = StdReporter::new("fatal");
        t.fatal("boom");
    }
}
