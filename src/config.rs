use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Defaults that can be saved to a flags file and overridden on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_color: bool,
    pub no_high_ascii: bool,
    pub autosave: bool,
    /// Full name substituted for `<player_name>`
    pub player: Option<String>,
    pub server_name: Option<String>,
}

impl ConfigFlags {
    /// Merge two flag sets; switches accumulate and `other`'s values win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_color: self.no_color || other.no_color,
            no_high_ascii: self.no_high_ascii || other.no_high_ascii,
            autosave: self.autosave || other.autosave,
            player: other.player.clone().or_else(|| self.player.clone()),
            server_name: other
                .server_name
                .clone()
                .or_else(|| self.server_name.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("zonemap").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("zonemap")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("zonemap").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("zonemap")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".zonemaprc")
}

/// Read a flags file. A missing file yields the defaults.
///
/// Each non-comment line holds one flag, optionally followed by its value;
/// the value runs to the end of the line so names may contain spaces.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| match line.split_once(char::is_whitespace) {
            Some((flag, value)) => vec![flag.to_string(), value.trim().to_string()],
            None => vec![line.to_string()],
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# zonemap defaults (saved with --save)".to_string());
    if flags.no_color {
        lines.push("--no-color".to_string());
    }
    if flags.no_high_ascii {
        lines.push("--no-high-ascii".to_string());
    }
    if flags.autosave {
        lines.push("--autosave".to_string());
    }
    if let Some(player) = &flags.player {
        lines.push(format!("--player {player}"));
    }
    if let Some(server_name) = &flags.server_name {
        lines.push(format!("--server-name {server_name}"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of raw arguments; everything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--no-color" => flags.no_color = true,
            "--no-high-ascii" => flags.no_high_ascii = true,
            "--autosave" => flags.autosave = true,
            "--player" | "--server-name" => {
                if let Some(next) = tokens.get(i + 1) {
                    set_named(&mut flags, token, next);
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--player=") {
                    set_named(&mut flags, "--player", value);
                } else if let Some(value) = token.strip_prefix("--server-name=") {
                    set_named(&mut flags, "--server-name", value);
                }
            }
        }
        i += 1;
    }
    flags
}

fn set_named(flags: &mut ConfigFlags, flag: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    if flag == "--player" {
        flags.player = Some(value.to_string());
    } else {
        flags.server_name = Some(value.to_string());
    }
}
