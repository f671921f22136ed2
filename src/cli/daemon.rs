//! Daemon command handler.

use anyhow::Result;

use klaunch::config::Config;
use klaunch::daemon::{
    check_status, desktop_probe, ensure_running, service_probe, DaemonEvent, DaemonOutcome,
    DaemonProbe, PollPolicy,
};
use klaunch::log_component;

/// Ensure the Docker daemon is up, or only report status with `check_only`.
pub(crate) async fn cmd_daemon(config: &Config, desktop: bool, check_only: bool) -> Result<()> {
    let probe: Box<dyn DaemonProbe> = if desktop {
        match desktop_probe(&config.daemon) {
            Some(probe) => probe,
            None => {
                println!("This program is designed to run on macOS. Nothing to do on this platform.");
                return Ok(());
            }
        }
    } else {
        Box::new(service_probe(&config.daemon))
    };
    let name = probe.name().to_string();

    if check_only {
        check_status(probe.as_ref()).await?;
        println!("{} is up and running.", name);
        return Ok(());
    }

    let policy = PollPolicy::for_probe(probe.as_ref(), &config.daemon);
    log_component!(debug, "daemon", "ensuring daemon", attempts = policy.attempts);

    let start_command = probe.start_command();
    let outcome = ensure_running(probe.as_ref(), policy, |event| match event {
        DaemonEvent::NotRunning => {
            println!("{} is not running. Attempting to start it ({})...", name, start_command);
        }
        DaemonEvent::StartIssued => {
            println!("Start command succeeded. Waiting for {} to become ready...", name);
        }
    })
    .await?;

    match outcome {
        DaemonOutcome::AlreadyRunning => println!("{} is up and running.", name),
        DaemonOutcome::Recovered { attempts } => {
            log_component!(info, "daemon", "daemon recovered", attempts = attempts);
            println!("{} is now up and running.", name);
        }
    }
    Ok(())
}
