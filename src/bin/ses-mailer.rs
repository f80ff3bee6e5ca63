//! SES Mailer launcher binary

use ses_mailer_launcher::defaults::ENV_CLI;
use ses_mailer_launcher::exit_codes::{EXIT_IO_ERROR, EXIT_PANIC};
use ses_mailer_launcher::logger::JsonLogger;
use ses_mailer_launcher::utils::is_env_true;
use ses_mailer_launcher::{LaunchConfig, Launcher, cli};
use std::{env, io, panic, process};

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    // Wrap main logic in catch_unwind for extra safety
    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in launcher");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Initialize logging as early as possible for debugging
    JsonLogger::init();

    log::debug!("🚀 Launcher process started");

    let args: Vec<String> = env::args().collect();
    log::trace!("📋 Arguments: {:?}", args);

    // Configuration errors are reported before anything is printed to stdout
    let config = match LaunchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            return e.exit_code();
        }
    };
    log::debug!("🔧 Configuration: {:?}", config);

    // Arguments are only interpreted in CLI mode
    if is_env_true(ENV_CLI) {
        log::debug!("🧰 CLI mode enabled via {}", ENV_CLI);
        return cli::dispatch(&args, config);
    }

    if args.len() > 1 {
        log::warn!(
            "⚠️ Ignoring {} argument(s); the launcher takes none (set {}=1 for diagnostics)",
            args.len() - 1,
            ENV_CLI
        );
    }

    let launcher = match Launcher::new(config) {
        Ok(launcher) => launcher,
        Err(e) => {
            eprintln!("❌ Failed to read working directory: {}", e);
            return EXIT_IO_ERROR;
        }
    };

    let mut stdout = io::stdout();
    match launcher.run(&mut stdout) {
        Ok(code) => {
            log::debug!("✅ Framework exited with code {}", code);
            code
        }
        Err(e) => {
            log::error!("❌ Launch error: {}", e);
            eprintln!("❌ {}", e);
            e.exit_code()
        }
    }
}
