use crate::prelude::*;
use std::any::Any;
use std::backtrace::BacktraceStatus;

pub mod size;

/// Logs what a panic payload carries, when it carries a message.
pub fn report_panic(payload: &dyn Any) {
    match panic_message(payload) {
        Some(message) => error!("ramhog panicked: {}", message),
        None => error!("ramhog panicked"),
    }
}

fn panic_message(payload: &dyn Any) -> Option<&str> {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&'static str>().copied())
}

/// Logs a fatal setup error along with everything that caused it.
pub fn report_failure(err: &anyhow::Error) {
    for line in failure_lines(err) {
        error!("{}", line);
    }
}

fn failure_lines(err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    lines.extend(err.chain().skip(1).map(|cause| format!("caused by: {cause}")));

    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        lines.push(backtrace.to_string());
    } else {
        lines.push("note: run with `RUST_BACKTRACE=1` to display a backtrace.".into());
    }
    lines
}
