//! Process-group termination for cancelled jobs
//!
//! Children are spawned as leaders of their own process group, so a shell
//! line like `sleep 10 | cat` can be stopped as a whole. The direct child is
//! additionally killed when its handle is dropped.

use crate::error::Result;

/// Send `SIGTERM` to the process group led by `pid`
#[cfg(unix)]
pub fn terminate_group(pid: u32) -> Result<()> {
    use crate::error::Error;
    use nix::sys::signal::{killpg, Signal as NixSignal};
    use nix::unistd::Pid;

    killpg(Pid::from_raw(pid as i32), NixSignal::SIGTERM).map_err(|e| Error::SignalSendFailed {
        signal: "SIGTERM".to_string(),
        reason: e.to_string(),
    })
}

/// No process groups here; kill-on-drop handles the direct child
#[cfg(not(unix))]
pub fn terminate_group(_pid: u32) -> Result<()> {
    Ok(())
}
