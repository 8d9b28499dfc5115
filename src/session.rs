//! The operations behind each [`Command`](crate::command::Command).
//!
//! A [`Session`] bundles the window manager, the notifier and the loaded
//! configuration for a single invocation.  Each method runs one operation to
//! completion; nothing is retried and nothing outlives the call.

use crate::battery::{self, Battery, BatteryError};
use crate::config::{BatteryConfig, Config};
use crate::daemons::{self, DaemonError};
use crate::notify::Message;
use crate::scratchpad::{Outcome, ScratchpadError, ScratchpadManager};
use crate::traits::{Notifier, WindowManager};
use crate::xrdb::{self, Resources, XrdbError};
use chrono::{DateTime, TimeZone};
use log::{debug, info};
use std::process::ExitStatus;

/// How long the `clock` notification stays up (ms).
const CLOCK_TIMEOUT_MS: u32 = 2000;

/// Errors from any session operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    WindowManager(String),
    #[error(transparent)]
    Scratchpad(#[from] ScratchpadError),
    #[error(transparent)]
    Xrdb(#[from] XrdbError),
    #[error(transparent)]
    Battery(#[from] BatteryError),
    #[error(transparent)]
    Daemon(#[from] DaemonError),
    #[error("empty command")]
    EmptyCommand,
    #[error("{command}: {source}")]
    Run {
        command: String,
        source: std::io::Error,
    },
    #[error("{command}: exited with {status}")]
    Status { command: String, status: ExitStatus },
    #[error("notify: {0}")]
    Notify(String),
}

/// bspwm settings applied by `config`, in order.
///
/// Gap, border width and colors come from the X resources; everything else
/// is fixed.
pub fn wm_settings(resources: &Resources) -> Vec<(&'static str, String)> {
    let fixed = [
        ("focus_follows_pointer", "true"),
        ("pointer_follows_focus", "true"),
        ("pointer_follows_monitor", "true"),
        ("borderless_monocle", "true"),
        ("paddingless_monocle", "true"),
        ("gapless_monocle", "true"),
        ("single_monocle", "true"),
        ("pointer_modifier", "mod3"),
        ("remove_unplugged_monitors", "true"),
    ];
    let bspwm = &resources.bspwm;
    fixed
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .chain([
            ("window_gap", bspwm.window_gap.to_string()),
            ("border_width", bspwm.border_width.to_string()),
            ("normal_border_color", bspwm.normal_border_color.clone()),
            ("active_border_color", bspwm.active_border_color.clone()),
            ("focused_border_color", bspwm.focused_border_color.clone()),
        ])
        .collect()
}

/// One warning per battery below the configured threshold.
pub fn low_battery_messages(batteries: &[Battery], config: &BatteryConfig) -> Vec<Message> {
    batteries
        .iter()
        .filter(|b| b.charge() < config.low_threshold)
        .map(|b| {
            Message::new(
                format!("{} charge", b.name),
                b.percentage(),
                config.notify_timeout_ms,
            )
        })
        .collect()
}

/// A single notification listing every battery.
pub fn battery_summary(batteries: &[Battery], timeout_ms: u32) -> Message {
    let body = batteries
        .iter()
        .map(|b| format!("{} {}:\n{}\n", b.name, b.status, b.percentage()))
        .collect::<String>();
    Message::new("Battery", body, timeout_ms)
}

/// Date as the summary (`Mon Jan  2`), time as the body (`15:04:05 <UTC offset>`).
pub fn clock_message<Tz: TimeZone>(now: &DateTime<Tz>, timeout_ms: u32) -> Message
where
    Tz::Offset: std::fmt::Display,
{
    Message::new(
        now.format("%a %b %e").to_string(),
        now.format("%H:%M:%S %Z").to_string(),
        timeout_ms,
    )
}

/// Run `argv` in the foreground and require a zero exit status.
fn run_command(argv: &[String]) -> Result<(), SessionError> {
    let (program, args) = argv.split_first().ok_or(SessionError::EmptyCommand)?;
    let command = argv.join(" ");
    debug!("running {}", command);
    let status = std::process::Command::new(program)
        .args(args)
        .status()
        .map_err(|source| SessionError::Run {
            command: command.clone(),
            source,
        })?;
    if !status.success() {
        return Err(SessionError::Status { command, status });
    }
    Ok(())
}

/// Everything a single invocation needs.
pub struct Session<W: WindowManager, N: Notifier> {
    wm: W,
    notifier: N,
    config: Config,
}

impl<W: WindowManager, N: Notifier> Session<W, N> {
    pub fn new(wm: W, notifier: N, config: Config) -> Self {
        Self {
            wm,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn notify(&self, message: &Message) -> Result<(), SessionError> {
        self.notifier
            .send(message)
            .map_err(|e| SessionError::Notify(e.to_string()))
    }

    /// Push the bspwm settings derived from `resources`.
    pub fn apply_wm_settings(&self, resources: &Resources) -> Result<(), SessionError> {
        for (key, value) in wm_settings(resources) {
            debug!("bspc config {} {}", key, value);
            self.wm
                .set_config(key, &value)
                .map_err(|e| SessionError::WindowManager(e.to_string()))?;
        }
        Ok(())
    }

    /// `config`: configure bspwm, reload daemons, run setup commands.
    pub fn configure(&self) -> Result<(), SessionError> {
        info!("config");
        let resources = xrdb::query()?;
        self.apply_wm_settings(&resources)?;
        daemons::reload(&daemons::default_daemons(&resources))?;
        for command in &self.config.session.setup_commands {
            run_command(command)?;
        }
        self.notify(&Message::new(
            "bspwmrc",
            "desktop reloaded",
            self.config.session.reload_timeout_ms,
        ))
    }

    /// `toggle-scratchpad <key>`.
    pub fn toggle_scratchpad(&self, key: &str) -> Result<Outcome, SessionError> {
        let manager = ScratchpadManager::new(&self.wm, self.config.scratchpads.clone());
        Ok(manager.toggle(key)?)
    }

    /// `cron`: warn about low batteries.
    pub fn cron(&self) -> Result<(), SessionError> {
        info!("cron");
        let batteries = battery::load_all()?;
        for message in low_battery_messages(&batteries, &self.config.battery) {
            info!("{}: {}", message.summary, message.body);
            self.notify(&message)?;
        }
        Ok(())
    }

    /// `battery-charge`: show the charge of every battery.
    pub fn battery_charge(&self) -> Result<(), SessionError> {
        info!("battery-charge");
        let batteries = battery::load_all()?;
        self.notify(&battery_summary(
            &batteries,
            self.config.battery.notify_timeout_ms,
        ))
    }

    /// `clock`: show the local date and time.
    pub fn clock(&self) -> Result<(), SessionError> {
        info!("clock");
        self.notify(&clock_message(&chrono::Local::now(), CLOCK_TIMEOUT_MS))
    }

    /// `run`: open the application launcher and wait for it to exit.
    pub fn run_launcher(&self) -> Result<(), SessionError> {
        info!("run");
        run_command(&self.config.session.launcher)
    }

    /// `prev`: focus the previously focused window.
    pub fn focus_previous(&self) -> Result<(), SessionError> {
        info!("prev");
        self.wm
            .focus_previous_node()
            .map_err(|e| SessionError::WindowManager(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::snapshot;
    use crate::traits::tests::{MockNotifier, MockWm};
    use chrono::FixedOffset;

    fn session(wm: MockWm) -> Session<MockWm, MockNotifier> {
        Session::new(wm, MockNotifier::default(), Config::default())
    }

    fn battery(name: &str, now: u64, full: u64) -> Battery {
        Battery {
            name: name.into(),
            status: "Discharging".into(),
            now,
            full,
        }
    }

    #[test]
    fn settings_follow_resources() {
        let mut resources = Resources::default();
        resources.bspwm.window_gap = 12;
        resources.bspwm.border_width = 2;
        resources.bspwm.focused_border_color = "#81a2be".into();

        let settings = wm_settings(&resources);
        assert_eq!(settings.len(), 14);
        assert_eq!(settings[0], ("focus_follows_pointer", "true".to_string()));
        assert!(settings.contains(&("window_gap", "12".to_string())));
        assert!(settings.contains(&("border_width", "2".to_string())));
        assert_eq!(
            settings.last().unwrap(),
            &("focused_border_color", "#81a2be".to_string())
        );
    }

    #[test]
    fn negative_gap_is_passed_through() {
        let mut resources = Resources::default();
        resources.apply_line("bspwm.windowGap:\t-4").unwrap();
        let settings = wm_settings(&resources);
        assert!(settings.contains(&("window_gap", "-4".to_string())));
    }

    #[test]
    fn settings_are_sent_in_order() {
        let s = session(MockWm::default());
        s.apply_wm_settings(&Resources::default()).unwrap();
        let calls = s.wm.calls();
        assert_eq!(calls.len(), 14);
        assert_eq!(calls[0], "config focus_follows_pointer true");
        assert_eq!(calls[7], "config pointer_modifier mod3");
        assert_eq!(calls[9], "config window_gap 0");
    }

    #[test]
    fn settings_stop_at_first_failure() {
        let s = session(MockWm {
            fail: true,
            ..MockWm::default()
        });
        assert!(matches!(
            s.apply_wm_settings(&Resources::default()),
            Err(SessionError::WindowManager(_))
        ));
    }

    #[test]
    fn only_low_batteries_warn() {
        let batteries = vec![battery("BAT0", 5, 100), battery("BAT1", 50, 100)];
        let messages = low_battery_messages(&batteries, &BatteryConfig::default());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].summary, "BAT0 charge");
        assert_eq!(messages[0].body, "5.00%");
        assert_eq!(messages[0].timeout_ms, 2000);
    }

    #[test]
    fn threshold_is_exclusive() {
        let batteries = vec![battery("BAT0", 10, 100)];
        assert!(low_battery_messages(&batteries, &BatteryConfig::default()).is_empty());
    }

    #[test]
    fn summary_lists_every_battery() {
        let batteries = vec![battery("BAT0", 1, 4), battery("BAT1", 3, 4)];
        let message = battery_summary(&batteries, 2000);
        assert_eq!(message.summary, "Battery");
        assert_eq!(
            message.body,
            "BAT0 Discharging:\n25.00%\nBAT1 Discharging:\n75.00%\n"
        );
    }

    #[test]
    fn clock_formats_date_and_time() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let now = tz.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        let message = clock_message(&now, 2000);
        assert_eq!(message.summary, "Mon Jan  2");
        assert!(message.body.starts_with("15:04:05 "));
    }

    #[test]
    fn toggle_goes_through_the_configured_registry() {
        let s = session(MockWm::with_state(snapshot()));
        let outcome = s.toggle_scratchpad("t").unwrap();
        assert_eq!(outcome, Outcome::Shown { moved: true });
        assert_eq!(
            s.wm.calls(),
            vec!["move node 5 to desktop 10", "show+focus node 5"]
        );
    }

    #[test]
    fn unknown_scratchpad_is_an_error() {
        let s = session(MockWm::with_state(snapshot()));
        assert!(matches!(
            s.toggle_scratchpad("?"),
            Err(SessionError::Scratchpad(ScratchpadError::UnknownScratchpad(_)))
        ));
    }

    #[test]
    fn prev_focuses_previous_node() {
        let s = session(MockWm::default());
        s.focus_previous().unwrap();
        assert_eq!(s.wm.calls(), vec!["focus prev"]);
    }

    #[test]
    fn clock_sends_one_notification() {
        let s = session(MockWm::default());
        s.clock().unwrap();
        assert_eq!(s.notifier.sent.borrow().len(), 1);
    }

    #[test]
    fn run_command_checks_exit_status() {
        run_command(&["true".to_string()]).unwrap();
        assert!(matches!(
            run_command(&["false".to_string()]),
            Err(SessionError::Status { .. })
        ));
        assert!(matches!(run_command(&[]), Err(SessionError::EmptyCommand)));
    }
}
