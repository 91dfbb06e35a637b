use tracing_subscriber::EnvFilter;

/// Where log lines end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Human-readable lines on stderr.
    Terminal,
    /// One JSON object per line, no ANSI and no timestamps (CloudWatch adds them).
    Lambda,
}

/// Directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "cost_report=debug,info"
    } else {
        "info"
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(target: LogTarget, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = match target {
        LogTarget::Terminal => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init(),
        LogTarget::Lambda => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .try_init(),
    };
    if let Err(e) = result {
        tracing::debug!("Logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug_for_this_crate() {
        assert!(default_directive(true).contains("cost_report=debug"));
        assert_eq!(default_directive(false), "info");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(LogTarget::Terminal, false);
        init(LogTarget::Lambda, true);
    }
}
