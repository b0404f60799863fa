pub mod logging;
pub mod platform;
pub mod spooler;

#[cfg(not(windows))]
pub mod unsupported;
#[cfg(windows)]
pub mod win32;
