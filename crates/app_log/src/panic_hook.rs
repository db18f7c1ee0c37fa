//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// Message of a panic payload
fn payload_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<unknown>")
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");
    let now = Local::now();

    let report = format!(
        "=== CRITICAL PANIC ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {:?}\n\
         Payload: {}\n\n\
         Stack Trace:\n{:?}",
        now.to_rfc3339(),
        thread_name,
        info.location(),
        payload_text(info.payload()),
        backtrace
    );

    eprintln!("{}", report);

    // May be lost if the writer thread is gone
    tracing::error!("{}", report);

    let dump_filename = format!("phalak_gallery_crash_{}.txt", now.format("%Y%m%d_%H%M%S"));
    let dump_path = std::env::temp_dir().join(&dump_filename);

    match std::fs::write(&dump_path, &report) {
        Ok(()) => eprintln!("Crash report written to {}", dump_path.display()),
        Err(e) => eprintln!("Failed to write crash dump: {}", e),
    }
}
