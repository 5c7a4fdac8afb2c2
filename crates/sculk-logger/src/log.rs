use crate::severity::LogSeverity;
use crate::systime;

/// Logs a message to the console
pub fn log(msg: String, log_severity: LogSeverity) {
    println!("[{}] {} {}", log_severity, systime::now(), msg);
}
