//! AWS shared config file parser
//!
//! Reads `~/.aws/credentials` and `~/.aws/config` to load a named profile.
//! Static keys and `credential_process` are usable; SSO and AssumeRole
//! profiles are recognised only so they can be rejected with a clear error.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::{Result, SsmEnvError};

/// One profile, merged from both files
#[derive(Debug, Clone, Default)]
pub struct AwsProfile {
    pub name: String,

    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,

    pub region: Option<String>,

    pub credential_process: Option<String>,

    // Unsupported sources, kept for error reporting
    pub sso_start_url: Option<String>,
    pub sso_session: Option<String>,
    pub role_arn: Option<String>,
}

impl AwsProfile {
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }

    pub fn has_credential_process(&self) -> bool {
        self.credential_process.is_some()
    }

    pub fn is_sso_profile(&self) -> bool {
        self.sso_start_url.is_some() || self.sso_session.is_some()
    }

    pub fn is_assume_role_profile(&self) -> bool {
        self.role_arn.is_some()
    }

    /// Overlay fields from `other` that this profile does not set yet
    fn fill_from(&mut self, other: &AwsProfile) {
        fn fill(slot: &mut Option<String>, value: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }

        fill(&mut self.access_key_id, &other.access_key_id);
        fill(&mut self.secret_access_key, &other.secret_access_key);
        fill(&mut self.session_token, &other.session_token);
        fill(&mut self.region, &other.region);
        fill(&mut self.credential_process, &other.credential_process);
        fill(&mut self.sso_start_url, &other.sso_start_url);
        fill(&mut self.sso_session, &other.sso_session);
        fill(&mut self.role_arn, &other.role_arn);
    }
}

/// Load a profile by name, or `None` if neither file mentions it.
///
/// The credentials file wins over the config file for keys present in both.
pub fn load_profile(name: &str) -> Result<Option<AwsProfile>> {
    let credentials = read_ini(credentials_file_path(), false)?;
    let config = read_ini(config_file_path(), true)?;

    Ok(merge_profile(name, &credentials, &config))
}

fn merge_profile(
    name: &str,
    credentials: &HashMap<String, AwsProfile>,
    config: &HashMap<String, AwsProfile>,
) -> Option<AwsProfile> {
    let from_credentials = credentials.get(name);
    let from_config = config.get(name);

    if from_credentials.is_none() && from_config.is_none() {
        return None;
    }

    let mut profile = AwsProfile {
        name: name.to_string(),
        ..Default::default()
    };
    if let Some(creds) = from_credentials {
        profile.fill_from(creds);
    }
    if let Some(cfg) = from_config {
        profile.fill_from(cfg);
    }
    Some(profile)
}

/// Profile name from `AWS_PROFILE` / `AWS_DEFAULT_PROFILE`, else "default"
pub fn default_profile_name() -> String {
    std::env::var("AWS_PROFILE")
        .or_else(|_| std::env::var("AWS_DEFAULT_PROFILE"))
        .unwrap_or_else(|_| "default".to_string())
}

fn credentials_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|h| h.join(".aws").join("credentials"))
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|h| h.join(".aws").join("config"))
}

fn read_ini(path: Option<PathBuf>, is_config_file: bool) -> Result<HashMap<String, AwsProfile>> {
    let path = match path {
        Some(path) if path.exists() => path,
        _ => return Ok(HashMap::new()),
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        SsmEnvError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Ok(parse_ini_file(&content, is_config_file))
}

/// Parse an INI-format AWS file.
///
/// Config file sections are `[profile name]` (except `[default]`); the
/// credentials file uses bare `[name]`.
fn parse_ini_file(content: &str, is_config_file: bool) -> HashMap<String, AwsProfile> {
    let mut profiles: HashMap<String, AwsProfile> = HashMap::new();
    let mut current_profile: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let section = line[1..line.len() - 1].trim();

            let profile_name = if !is_config_file || section == "default" {
                section.to_string()
            } else if let Some(name) = section.strip_prefix("profile ") {
                name.trim().to_string()
            } else {
                // sso-session and other non-profile sections
                current_profile = None;
                continue;
            };

            current_profile = Some(profile_name.clone());
            profiles.entry(profile_name.clone()).or_insert_with(|| AwsProfile {
                name: profile_name,
                ..Default::default()
            });
            continue;
        }

        if let Some(profile_name) = &current_profile {
            if let Some((key, value)) = line.split_once('=') {
                if let Some(profile) = profiles.get_mut(profile_name) {
                    set_profile_field(profile, &key.trim().to_lowercase(), value.trim());
                }
            }
        }
    }

    profiles
}

fn set_profile_field(profile: &mut AwsProfile, key: &str, value: &str) {
    let value = Some(value.to_string());
    match key {
        "aws_access_key_id" => profile.access_key_id = value,
        "aws_secret_access_key" => profile.secret_access_key = value,
        "aws_session_token" => profile.session_token = value,
        "region" => profile.region = value,
        "credential_process" => profile.credential_process = value,
        "sso_start_url" => profile.sso_start_url = value,
        "sso_session" => profile.sso_session = value,
        "role_arn" => profile.role_arn = value,
        _ => {}
    }
}
