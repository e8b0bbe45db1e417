use tracing::debug_span;

/// Runs a blocking UI action (file I/O, workbook encode) inline, inside a
/// span named after the action.
pub fn run_blocking<F, T>(action: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let _span = debug_span!("blocking", action).entered();
    f()
}
