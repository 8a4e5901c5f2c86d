use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "remindme-dev",
            Profile::Prod => "remindme",
        }
    }
}

/// Get the configuration directory path
/// If profile is Dev, uses "remindme-dev" instead of "remindme"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "remindme", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Platform family, as far as keyboard modifiers are concerned.
///
/// Apple platforms use the Command key as the primary modifier; everything
/// else uses Ctrl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Apple,
    Other,
}

static DETECTED_PLATFORM: LazyLock<Platform> =
    LazyLock::new(|| Platform::from_os_name(std::env::consts::OS));

impl Platform {
    /// The platform this process runs on. Detected on first use and cached
    /// for the lifetime of the process.
    pub fn current() -> Platform {
        *DETECTED_PLATFORM
    }

    /// Classify an OS identifier (`std::env::consts::OS` style, or a
    /// user-agent-ish platform string).
    pub fn from_os_name(os: &str) -> Platform {
        let os = os.to_ascii_lowercase();
        if ["macos", "ios", "mac", "darwin", "ipados", "visionos", "tvos", "watchos"]
            .iter()
            .any(|name| os.contains(name))
        {
            Platform::Apple
        } else {
            Platform::Other
        }
    }

    pub fn is_apple(self) -> bool {
        self == Platform::Apple
    }

    /// Label of the primary modifier key on this platform
    pub fn primary_modifier_label(self) -> &'static str {
        match self {
            Platform::Apple => "Cmd",
            Platform::Other => "Ctrl",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Apple => write!(f, "apple"),
            Platform::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_os_names() {
        assert_eq!(Platform::from_os_name("macos"), Platform::Apple);
        assert_eq!(Platform::from_os_name("MacIntel"), Platform::Apple);
        assert_eq!(Platform::from_os_name("ios"), Platform::Apple);
        assert_eq!(Platform::from_os_name("linux"), Platform::Other);
        assert_eq!(Platform::from_os_name("windows"), Platform::Other);
    }

    #[test]
    fn current_platform_is_stable() {
        assert_eq!(Platform::current(), Platform::current());
        assert_eq!(
            Platform::current(),
            Platform::from_os_name(std::env::consts::OS)
        );
    }

    #[test]
    fn dev_profile_gets_its_own_config_dir() {
        let dirs = (get_config_dir(Profile::Dev), get_config_dir(Profile::Prod));
        if let (Some(dev), Some(prod)) = dirs {
            assert_ne!(dev, prod);
        }
    }

    #[test]
    fn expand_path_leaves_absolute_paths_alone() {
        assert_eq!(expand_path("/tmp/x.toml"), PathBuf::from("/tmp/x.toml"));
    }
}
