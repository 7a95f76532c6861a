//! Logging setup for the `weftpack` binary, built on the `tracing` ecosystem.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber from the CLI's verbosity flags.
///
/// Precedence: `--verbose` (debug), then `--quiet` (errors only), then
/// `RUST_LOG`, falling back to info level.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("weftpack=debug")
    } else if quiet {
        EnvFilter::new("weftpack=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weftpack=info"))
    };

    let fmt_layer = fmt::layer().with_target(false).with_level(true).with_ansi(!no_color).compact();

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Whether colored output should be used, honoring the `NO_COLOR`/`FORCE_COLOR`
/// conventions before falling back to terminal detection.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::Term::stdout().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_colors_respects_force_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_colors());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    fn should_use_colors_respects_no_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }
        assert!(!should_use_colors());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }
}
