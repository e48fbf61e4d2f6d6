use std::process::{Command, Stdio};
use std::time::Duration;

/// Host side of navigation: opening links in a new context or replacing the
/// current one. Both calls are fire-and-forget.
pub trait Navigator {
    fn open_deferred(&self, url: &str, delay: Duration);
    fn redirect(&self, url: &str);
}

/// Navigator that drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn open_deferred(&self, _url: &str, _delay: Duration) {}

    fn redirect(&self, _url: &str) {}
}

/// Opens URLs with the platform opener (`open` on macOS, `xdg-open` elsewhere).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNavigator {
    opener: String,
}

impl Default for SystemNavigator {
    fn default() -> Self {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Self::with_opener(opener)
    }
}

impl SystemNavigator {
    pub fn with_opener(opener: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
        }
    }

    fn spawn(&self, command: &mut Command, url: &str) {
        let spawned = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        if let Err(error) = spawned {
            tracing::warn!(opener = %self.opener, url, %error, "failed to launch browser");
        }
    }
}

impl Navigator for SystemNavigator {
    /// Detaches a `sleep` + opener shell so the open survives this process.
    fn open_deferred(&self, url: &str, delay: Duration) {
        let delay = format!("{:.3}", delay.as_secs_f64());
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(r#"sleep "$1" && exec "$2" "$3""#)
            .arg("sh")
            .arg(delay)
            .arg(&self.opener)
            .arg(url);
        self.spawn(&mut command, url);
    }

    fn redirect(&self, url: &str) {
        let mut command = Command::new(&self.opener);
        command.arg(url);
        self.spawn(&mut command, url);
    }
}
