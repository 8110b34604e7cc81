use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;
use crate::display::Context;

/// Installs the stdout subscriber. `RUST_LOG` takes precedence over flags.
///
/// With a spinner on the terminal only warnings are logged by default, so the
/// two do not fight over the screen.
pub fn init(verbosity: Verbosity, ctx: Context) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, ctx)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .try_init();
}

fn default_directive(verbosity: Verbosity, ctx: Context) -> &'static str {
    if verbosity.verbose {
        "poscar_forge=debug,pforge=debug"
    } else if verbosity.quiet || ctx.interactive {
        "warn"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbosity(quiet: bool, verbose: bool) -> Verbosity {
        Verbosity { quiet, verbose }
    }

    #[test]
    fn verbose_wins_over_everything() {
        let ctx = Context { interactive: true };
        assert!(default_directive(verbosity(false, true), ctx).contains("debug"));
    }

    #[test]
    fn scripted_runs_log_progress() {
        let ctx = Context { interactive: false };
        assert_eq!(default_directive(verbosity(false, false), ctx), "info");
        assert_eq!(default_directive(verbosity(true, false), ctx), "warn");
    }

    #[test]
    fn interactive_runs_leave_the_screen_to_the_spinner() {
        let ctx = Context { interactive: true };
        assert_eq!(default_directive(verbosity(false, false), ctx), "warn");
    }
}
