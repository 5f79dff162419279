use clap::Parser;

use chat_dock::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use chat_dock::log_buffer::{LogHandle, set_global_log};
use chat_dock::runner::{DockApp, run_dock_app};
use chat_dock::{ChatSession, DockCli, DockConfig, DockError, StaticDirectory, tracing_sub};

fn sample_directory() -> StaticDirectory {
    let mut directory = StaticDirectory::new();
    for (id, title, group) in [
        ("ada", "Ada Lovelace", false),
        ("grace", "Grace Hopper", false),
        ("ops", "Ops on-call", true),
        ("linus", "Linus", false),
        ("design", "Design crit", true),
        ("ken", "Ken Thompson", false),
        ("barbara", "Barbara Liskov", false),
        ("release", "Release train", true),
        ("margaret", "Margaret Hamilton", false),
        ("dennis", "Dennis Ritchie", false),
        ("infra", "Infra guild", true),
        ("edsger", "Edsger Dijkstra", false),
    ] {
        directory.insert(id, title, group);
    }
    directory
}

fn main() -> Result<(), DockError> {
    let cli = DockCli::parse();
    let config = DockConfig::try_from(&cli)?;

    let log = LogHandle::default();
    set_global_log(log.clone());
    tracing_sub::init_default(config.log_file.as_deref())?;

    let user = std::env::var("USER").unwrap_or_else(|_| "guest".to_string());
    let session = ChatSession::sign_in(user, config);
    let mut app = DockApp::new(session, sample_directory());

    let mut output = ConsoleOutputDriver::new()?;
    let result = run_dock_app(&mut output, ConsoleInputDriver::new(), &mut app);
    drop(output);

    app.into_session().sign_out();
    if result.is_err() {
        // The alternate screen is gone; leave the recent log where it can be read.
        for line in log.lines() {
            eprintln!("{line}");
        }
    }
    result.map_err(DockError::from)
}
