use std::sync::{Arc, Mutex};

pub trait Logger: Send {
    fn log(&mut self, file: &'static str, line: u32, tag: &'static str, msg: &str);
}

lazy_static! {
    static ref LOGGERS: Arc<Mutex<Vec<Box<dyn Logger>>>> = Arc::new(Mutex::new(vec![]));
}

/// Forwards a log line to every registered logger. If nobody registered a logger yet,
/// the line goes straight to stdout/stderr so early bootstrap messages are never lost.
#[inline]
pub fn emit_log_msg(file: &'static str, line: u32, tag: &'static str, msg: &str) {
    // A poisoned registry only means some logger panicked: keep logging anyway.
    let mut loggers = match LOGGERS.lock() {
        Ok(loggers) => loggers,
        Err(poisoned) => poisoned.into_inner(),
    };
    if loggers.is_empty() {
        Println_Logger.log(file, line, tag, msg);
    } else {
        loggers.iter_mut().for_each(|logger| logger.log(file, line, tag, msg));
    }
}

pub struct Println_Logger;

impl Logger for Println_Logger {
    fn log(&mut self, _file: &'static str, _line: u32, tag: &'static str, msg: &str) {
        if tag == "DEBUG" || tag == "VERBOSE" || tag == "ERROR" {
            eprintln!("[ {} ] {}", tag, msg);
        } else {
            println!("[ {} ] {}", tag, msg);
        }
    }
}

pub fn add_default_logger() {
    add_logger(Box::new(Println_Logger {}));
}

pub fn add_logger(logger: Box<dyn Logger>) {
    let mut loggers = match LOGGERS.lock() {
        Ok(loggers) => loggers,
        Err(poisoned) => poisoned.into_inner(),
    };
    loggers.push(logger);
}
