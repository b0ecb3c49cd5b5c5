use std::io;

use async_trait::async_trait;
use strum::{Display, EnumString};
use tokio::process::Command;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HostAction {
    Shutdown,
    Reboot,
    /// Only stops the player.
    Quit,
}

impl HostAction {
    /// Program and arguments that carry out the action on this platform.
    pub fn command(&self) -> Option<(&'static str, &'static [&'static str])> {
        const WINDOWS_SHUTDOWN: &[&str] = &["/s", "/t", "1"];
        const WINDOWS_REBOOT: &[&str] = &["/r", "/t", "1"];
        const SHUTDOWN_NOW: &[&str] = &["now"];
        const NO_ARGS: &[&str] = &[];

        match self {
            HostAction::Shutdown if cfg!(windows) => Some(("shutdown", WINDOWS_SHUTDOWN)),
            HostAction::Reboot if cfg!(windows) => Some(("shutdown", WINDOWS_REBOOT)),
            HostAction::Shutdown => Some(("/usr/sbin/shutdown", SHUTDOWN_NOW)),
            HostAction::Reboot => Some(("/usr/sbin/reboot", NO_ARGS)),
            HostAction::Quit => None,
        }
    }
}

/// Power control of the machine the server runs on.
#[async_trait]
pub trait HostControl: Send + Sync {
    async fn run(&self, action: HostAction) -> io::Result<()>;
}

pub struct SystemHost;

#[async_trait]
impl HostControl for SystemHost {
    async fn run(&self, action: HostAction) -> io::Result<()> {
        let Some((program, args)) = action.command() else {
            return Ok(());
        };
        info!("Running {program} {args:?}");
        let status = Command::new(program).args(args).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{program} exited with {status}")))
        }
    }
}
