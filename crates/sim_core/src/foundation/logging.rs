//! Logging backend setup
//!
//! The library itself only emits through the `log` facade; binaries call
//! [`init`] once at startup to get output on stderr.

/// Install the `env_logger` backend with an info-level default filter
///
/// `RUST_LOG` still overrides the filter. Repeated calls after the first
/// are no-ops, so tests and embedding binaries need not coordinate.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_twice() {
        init();
        init();
    }
}
