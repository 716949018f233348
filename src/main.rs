use std::process::ExitCode;

use clap::Parser;

use subdesk::{cli, commands, config};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = cli::Cli::parse();
    let (editor, action) = args.editor.split();

    let config = config::load_config(&action);
    tracing::info!(
        editor = editor.executable(),
        target_root = %config.target_root.display(),
        lock_name = %config.lock_name,
        "subdesk starting"
    );

    match commands::run(action, editor, &config) {
        Ok(code) => ExitCode::from(code.clamp(0, u8::MAX as i32) as u8),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
