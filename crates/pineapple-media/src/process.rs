//! External `ffplay` process control.
//!
//! The external player is launched detached and only ever observed through
//! a non-blocking liveness check. Termination asks politely first, waits a
//! bounded interval, then kills. [`ChildProcess`] runs that protocol again
//! on drop, so every exit path releases the process.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use pineapple_types::error::{PineappleError, Result};

/// Prefix of the external player's window title.
pub const WINDOW_TITLE_PREFIX: &str = "Perfect Pineapple Player";

/// How long a terminated process gets to exit before it is killed.
pub const TERMINATE_GRACE: Duration = Duration::from_millis(500);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Window title for a video file, e.g. "Perfect Pineapple Player - clip.mp4".
pub fn window_title(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{WINDOW_TITLE_PREFIX} - {name}")
}

/// A running external process that can only be polled and terminated.
pub trait ExternalProcess {
    /// OS process id.
    fn id(&self) -> u32;

    /// Non-blocking liveness check; true once the process has exited.
    fn has_exited(&mut self) -> bool;

    /// Request graceful exit, wait a bounded interval, then force-kill.
    /// Errors are logged and swallowed.
    fn terminate(&mut self);
}

/// Parameters for one launch of the external player.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub path: PathBuf,
    pub window_title: String,
    /// Seconds into the file to start at; 0 starts from the beginning.
    pub start_offset: f64,
}

impl LaunchRequest {
    pub fn new(path: &Path, start_offset: f64) -> Self {
        Self {
            path: path.to_path_buf(),
            window_title: window_title(path),
            start_offset: start_offset.max(0.0),
        }
    }
}

/// Starts external player processes.
pub trait Launcher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<Box<dyn ExternalProcess>>;
}

/// Launches `ffplay` from a validated tool directory.
#[derive(Debug, Clone)]
pub struct FfplayLauncher {
    exec: PathBuf,
    grace: Duration,
}

impl FfplayLauncher {
    pub fn new(exec: impl Into<PathBuf>) -> Self {
        Self {
            exec: exec.into(),
            grace: TERMINATE_GRACE,
        }
    }

    /// Command-line arguments for a launch, without the executable.
    pub fn args(request: &LaunchRequest) -> Vec<String> {
        let mut args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-autoexit".to_string(),
            "-window_title".to_string(),
            request.window_title.clone(),
        ];
        if request.start_offset > 0.0 {
            args.push("-ss".to_string());
            args.push(format!("{:.3}", request.start_offset));
        }
        args.push(request.path.to_string_lossy().into_owned());
        args
    }
}

impl Launcher for FfplayLauncher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<Box<dyn ExternalProcess>> {
        let mut cmd = Command::new(&self.exec);
        cmd.args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::null());
        detach(&mut cmd);
        let child = cmd.spawn().map_err(|e| {
            PineappleError::Process(format!("failed to launch {}: {e}", self.exec.display()))
        })?;
        log::info!(
            "Launched ffplay (pid {}) for {} at {:.1}s",
            child.id(),
            request.path.display(),
            request.start_offset
        );
        Ok(Box::new(ChildProcess::new(child, self.grace)))
    }
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(windows))]
fn detach(_cmd: &mut Command) {}

/// An OS child process with graceful-then-forced termination.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    grace: Duration,
    reaped: bool,
}

impl ChildProcess {
    pub fn new(child: Child, grace: Duration) -> Self {
        Self {
            child,
            grace,
            reaped: false,
        }
    }

    #[cfg(unix)]
    fn request_exit(&mut self) {
        let Ok(pid) = libc::pid_t::try_from(self.child.id()) else {
            return;
        };
        // SAFETY: kill(2) has no memory-safety preconditions. The pid belongs
        // to our unreaped child, so it cannot have been recycled.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        if rc != 0 {
            log::debug!(
                "SIGTERM to pid {pid} failed: {}",
                std::io::Error::last_os_error()
            );
        }
    }

    #[cfg(not(unix))]
    fn request_exit(&mut self) {
        let status = Command::new("taskkill")
            .args(["/PID", &self.child.id().to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = status {
            log::debug!("taskkill for pid {} failed: {e}", self.child.id());
        }
    }

    fn wait_for_exit(&mut self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            if self.has_exited() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }
    }
}

impl ExternalProcess for ChildProcess {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn has_exited(&mut self) -> bool {
        if self.reaped {
            return true;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("Process {} exited with {status}", self.child.id());
                self.reaped = true;
                true
            },
            Ok(None) => false,
            Err(e) => {
                log::warn!("Cannot poll process {}: {e}", self.child.id());
                self.reaped = true;
                true
            },
        }
    }

    fn terminate(&mut self) {
        if self.has_exited() {
            return;
        }
        log::info!("Stopping process {}", self.child.id());
        self.request_exit();
        if self.wait_for_exit(self.grace) {
            return;
        }
        log::warn!(
            "Process {} ignored termination request, killing",
            self.child.id()
        );
        if let Err(e) = self.child.kill() {
            log::warn!("Kill of process {} failed: {e}", self.child.id());
        }
        match self.child.wait() {
            Ok(_) => self.reaped = true,
            Err(e) => log::warn!("Wait on process {} failed: {e}", self.child.id()),
        }
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Brings an external process's window to the foreground.
pub trait WindowFocus {
    /// Best-effort and non-blocking. Failures are only logged.
    fn focus(&self, pid: u32, title: &str);
}

/// Dispatches the platform focus command on a short-lived background thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadedWindowFocus;

impl ThreadedWindowFocus {
    #[cfg(windows)]
    fn command(pid: u32, _title: &str) -> Command {
        let mut cmd = Command::new("powershell");
        cmd.args([
            "-NoProfile",
            "-Command",
            &format!("(New-Object -ComObject WScript.Shell).AppActivate({pid})"),
        ]);
        cmd
    }

    #[cfg(not(windows))]
    fn command(_pid: u32, title: &str) -> Command {
        let mut cmd = Command::new("xdotool");
        cmd.args(["search", "--name", &title_pattern(title), "windowactivate"]);
        cmd
    }
}

/// `xdotool --name` takes a regex; match `title` literally and whole.
pub fn title_pattern(title: &str) -> String {
    format!("^{}$", regex::escape(title))
}

impl WindowFocus for ThreadedWindowFocus {
    fn focus(&self, pid: u32, title: &str) {
        let mut cmd = Self::command(pid, title);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let spawned = thread::Builder::new()
            .name("focus-window".to_string())
            .spawn(move || match cmd.status() {
                Ok(status) if status.success() => {},
                Ok(status) => log::debug!("Window focus command exited with {status}"),
                Err(e) => log::debug!("Window focus unavailable: {e}"),
            });
        if let Err(e) = spawned {
            log::warn!("Cannot start window focus thread: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_uses_file_name() {
        assert_eq!(
            window_title(Path::new("/videos/holiday.mp4")),
            "Perfect Pineapple Player - holiday.mp4"
        );
    }

    #[test]
    fn title_pattern_matches_literally() {
        let title = window_title(Path::new("/videos/clip (1) [HD]+.mp4"));
        let pattern = regex::Regex::new(&title_pattern(&title)).unwrap();
        assert!(pattern.is_match(&title));
        assert!(!pattern.is_match("Perfect Pineapple Player - clip 1 HD.mp4"));
        assert!(!pattern.is_match(&format!("{title}.part")));
    }

    #[test]
    fn args_without_offset() {
        let req = LaunchRequest::new(Path::new("/v/a.mp4"), 0.0);
        assert_eq!(
            FfplayLauncher::args(&req),
            vec![
                "-v",
                "error",
                "-autoexit",
                "-window_title",
                "Perfect Pineapple Player - a.mp4",
                "/v/a.mp4",
            ]
        );
    }

    #[test]
    fn args_with_offset() {
        let req = LaunchRequest::new(Path::new("/v/a.mp4"), 12.5);
        let args = FfplayLauncher::args(&req);
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "12.500");
        assert_eq!(args.last().map(String::as_str), Some("/v/a.mp4"));
    }

    #[test]
    fn negative_offset_clamped() {
        assert_eq!(LaunchRequest::new(Path::new("a.mp4"), -4.0).start_offset, 0.0);
    }

    #[test]
    fn launch_missing_binary_fails() {
        let mut launcher = FfplayLauncher::new("/nonexistent/ffplay-binary");
        let req = LaunchRequest::new(Path::new("a.mp4"), 0.0);
        assert!(matches!(
            launcher.launch(&req),
            Err(PineappleError::Process(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn terminate_stops_running_child() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut proc = ChildProcess::new(child, TERMINATE_GRACE);
        assert!(!proc.has_exited());
        let started = Instant::now();
        proc.terminate();
        assert!(proc.has_exited());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn exited_child_detected_without_blocking() {
        let child = Command::new("true").spawn().unwrap();
        let mut proc = ChildProcess::new(child, TERMINATE_GRACE);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !proc.has_exited() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(proc.has_exited());
        proc.terminate();
    }
}
