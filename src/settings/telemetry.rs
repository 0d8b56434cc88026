use tracing::debug;

use super::LauncherSettings;

pub fn log_loaded(settings: &LauncherSettings) {
    debug!(
        target: "dotenv_launcher::settings",
        path = ?settings.path,
        override_existing = settings.override_existing,
        strict = settings.strict,
        debug = settings.debug,
        streams = settings.streams.as_str(),
        "Launcher settings loaded"
    );
}
