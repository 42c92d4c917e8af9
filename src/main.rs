use std::io;
use std::process::ExitCode;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use glpipe::app::App;
use glpipe::config::Config;
use glpipe::gitlab::GitLabClient;
use glpipe::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Credentials and client come first; nothing is drawn if they fail.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(config.log_file.as_deref()) {
        eprintln!("Error setting up logging: {err}");
        return ExitCode::FAILURE;
    }

    let client = match GitLabClient::from_config(&config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error creating GitLab client: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(url = %config.gitlab_url, "connecting to instance");

    // Setup panic hook for clean terminal restore
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    match run(client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "terminal failure");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: GitLabClient) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client);
    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
