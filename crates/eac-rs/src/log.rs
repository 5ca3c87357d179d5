// crates/eac-rs/src/log.rs
//! Thin namespacing layer over the `log` crate so call sites read
//! `crate::log::*!` instead of bare `log::*!`, matching the rest of the
//! module tree's `crate::<module>::Thing` style.

// ===== sm_trace! =====
macro_rules! sm_trace {
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::trace!(concat!("[sm] ", $fmt) $(, $($arg)+)?);
    }};
}

// ===== sm_warn! =====
macro_rules! sm_warn {
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::warn!(concat!("[sm] ", $fmt) $(, $($arg)+)?);
    }};
}

// ===== sm_error! =====
macro_rules! sm_error {
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        log::error!(concat!("[sm] ", $fmt) $(, $($arg)+)?);
    }};
}

pub(crate) use sm_error;
pub(crate) use sm_trace;
pub(crate) use sm_warn;
