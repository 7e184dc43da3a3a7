use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lexilens_config::Config;
use serde::{Deserialize, Serialize};

fn profiles_dir(home: &Path) -> PathBuf {
    home.join("profiles")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Create the profiles folder and a main profile from defaults if missing
pub fn init_user_config(home: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(profiles_dir(home))?;

    let main_profile = profiles_dir(home).join("main.json");
    if !main_profile.exists() {
        let profile = Profile {
            name: "main".into(),
            value: Config::new(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile in {}", home.display());
    }

    Ok(())
}

pub fn load_profile_file(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("invalid profile {}", path.display()))?;
    tracing::info!("Loaded profile '{}'", profile.name);
    Ok(profile.value)
}

/// Load a user profile by name, defaulting to main if name not found
pub fn load_user_profile(home: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profiles_dir(home).join(format!("{name}.json"));
    if profile_file.exists() {
        return load_profile_file(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
    let main_file = profiles_dir(home).join("main.json");
    if main_file.exists() {
        load_profile_file(&main_file)
    } else {
        Ok(Config::new())
    }
}

/// `--config` wins, then the main profile under `--home`, then defaults
pub fn load_config(config: Option<&Path>, home: Option<&Path>) -> anyhow::Result<Config> {
    match (config, home) {
        (Some(path), _) => load_profile_file(path),
        (None, Some(home)) => {
            init_user_config(home)?;
            load_user_profile(home, "main")
        }
        (None, None) => Ok(Config::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_gets_main_profile() {
        let home = tempfile::tempdir().unwrap();
        let config = load_config(None, Some(home.path())).unwrap();

        assert!(home.path().join("profiles/main.json").exists());
        assert_eq!(config.capture.box_width, 150.0);
    }

    #[test]
    fn test_unknown_profile_falls_back_to_main() {
        let home = tempfile::tempdir().unwrap();
        fs::create_dir_all(profiles_dir(home.path())).unwrap();
        fs::write(
            profiles_dir(home.path()).join("main.json"),
            r#"{ "name": "main", "value": { "ocr": { "language": "fra" } } }"#,
        )
        .unwrap();

        let config = load_user_profile(home.path(), "travel").unwrap();
        assert_eq!(config.ocr.language, "fra");
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(
            &path,
            r#"{ "name": "custom", "value": { "capture": { "auto_detect": true } } }"#,
        )
        .unwrap();

        let config = load_config(Some(&path), None).unwrap();
        assert!(config.capture.auto_detect);
    }

    #[test]
    fn test_broken_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config(Some(&path), None).is_err());
    }
}
