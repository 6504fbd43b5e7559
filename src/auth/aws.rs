//! AWS credentials and Signature Version 4 signing
//!
//! Every request to the parameter store is signed with SigV4 using
//! credentials from the environment or a shared-config profile.

use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use tracing::debug;

use super::aws_config::{self, AwsProfile};
use crate::errors::{FetchError, Result, SsmEnvError};

/// Region used when nothing else names one
pub const DEFAULT_REGION: &str = "us-west-2";

/// Credentials plus the scope they sign for
#[derive(Clone)]
pub struct AwsSigV4Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    /// AWS region (e.g., "us-east-1")
    pub region: String,
    /// AWS service name (e.g., "ssm")
    pub service: String,
}

impl std::fmt::Debug for AwsSigV4Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSigV4Config")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl AwsSigV4Config {
    /// Static credentials, mostly useful for tests and emulators
    pub fn new(access_key_id: &str, secret_access_key: &str, region: &str, service: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: None,
            region: region.to_string(),
            service: service.to_string(),
        }
    }

    /// Load from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
    ///
    /// Returns `None` when the key pair is not set.
    pub fn from_env(region: &str, service: &str) -> Option<Self> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID")
            .or_else(|_| std::env::var("AWS_ACCESS_KEY"))
            .ok()?;
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .or_else(|_| std::env::var("AWS_SECRET_KEY"))
            .ok()?;

        Some(Self {
            access_key_id: access_key,
            secret_access_key: secret_key,
            session_token: std::env::var("AWS_SESSION_TOKEN").ok(),
            region: region.to_string(),
            service: service.to_string(),
        })
    }

    /// Credentials from a loaded profile
    pub fn from_profile(profile: &AwsProfile, region: &str, service: &str) -> Result<Self> {
        if let (Some(access_key), Some(secret_key)) =
            (&profile.access_key_id, &profile.secret_access_key)
        {
            return Ok(Self {
                access_key_id: access_key.clone(),
                secret_access_key: secret_key.clone(),
                session_token: profile.session_token.clone(),
                region: region.to_string(),
                service: service.to_string(),
            });
        }

        if let Some(command) = &profile.credential_process {
            let output = run_credential_process(command)?;
            return Self::from_credential_output(&output, region, service);
        }

        if profile.is_sso_profile() || profile.is_assume_role_profile() {
            return Err(SsmEnvError::Auth(format!(
                "AWS profile '{}' uses SSO or AssumeRole, which is not supported; \
                 export temporary credentials instead",
                profile.name
            )));
        }

        Err(SsmEnvError::Auth(format!(
            "AWS profile '{}' has no valid credentials source",
            profile.name
        )))
    }

    /// Parse the JSON document printed by a `credential_process`
    fn from_credential_output(stdout: &[u8], region: &str, service: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_slice(stdout).map_err(|e| {
            SsmEnvError::Auth(format!("Failed to parse credential_process output: {}", e))
        })?;

        let field = |name: &str| {
            json[name].as_str().map(str::to_string).ok_or_else(|| {
                SsmEnvError::Auth(format!("credential_process output missing {}", name))
            })
        };

        Ok(Self {
            access_key_id: field("AccessKeyId")?,
            secret_access_key: field("SecretAccessKey")?,
            session_token: json["SessionToken"].as_str().map(str::to_string),
            region: region.to_string(),
            service: service.to_string(),
        })
    }
}

fn run_credential_process(command: &str) -> Result<Vec<u8>> {
    use std::process::Command;

    let output = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", command]).output()
    } else {
        Command::new("sh").args(["-c", command]).output()
    };

    let output = output
        .map_err(|e| SsmEnvError::Auth(format!("Failed to run credential_process: {}", e)))?;

    if !output.status.success() {
        return Err(SsmEnvError::Auth(format!(
            "credential_process failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output.stdout)
}

/// Pick the first region that is set.
///
/// Order: explicit (flag or `AWS_REGION`), `AWS_DEFAULT_REGION`, config file,
/// profile, then [`DEFAULT_REGION`].
pub fn pick_region(
    explicit: Option<&str>,
    default_env: Option<&str>,
    configured: Option<&str>,
    profile: Option<&str>,
) -> String {
    [explicit, default_env, configured, profile]
        .into_iter()
        .flatten()
        .find(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REGION)
        .to_string()
}

/// Resolve signing credentials and region.
///
/// A named profile is used when given. Otherwise environment credentials
/// are tried first, then the default profile.
pub fn resolve_credentials(
    profile_name: Option<&str>,
    explicit_region: Option<&str>,
    configured_region: Option<&str>,
    service: &str,
) -> Result<AwsSigV4Config> {
    let default_env_region = std::env::var("AWS_DEFAULT_REGION").ok();

    if let Some(name) = profile_name {
        let profile = aws_config::load_profile(name)?.ok_or_else(|| {
            SsmEnvError::Config(format!("AWS profile '{}' not found", name))
        })?;
        let region = pick_region(
            explicit_region,
            default_env_region.as_deref(),
            configured_region,
            profile.region.as_deref(),
        );
        debug!(profile = %name, region = %region, "Using credentials from profile");
        return AwsSigV4Config::from_profile(&profile, &region, service);
    }

    let fallback_name = aws_config::default_profile_name();
    let fallback = aws_config::load_profile(&fallback_name)?;
    let region = pick_region(
        explicit_region,
        default_env_region.as_deref(),
        configured_region,
        fallback.as_ref().and_then(|p| p.region.as_deref()),
    );

    if let Some(config) = AwsSigV4Config::from_env(&region, service) {
        debug!(region = %region, "Using credentials from environment");
        return Ok(config);
    }

    match fallback {
        Some(profile) => {
            debug!(profile = %fallback_name, region = %region, "Using credentials from profile");
            AwsSigV4Config::from_profile(&profile, &region, service)
        }
        None => Err(SsmEnvError::Auth(
            "No AWS credentials found: set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or configure a profile"
                .to_string(),
        )),
    }
}

/// Sign a request with SigV4 and return the headers to add.
///
/// The returned list always carries the `host` header that was signed.
pub fn sign_request(
    config: &AwsSigV4Config,
    method: &str,
    url: &url::Url,
    headers: &[(&str, &str)],
    body: &[u8],
) -> std::result::Result<Vec<(String, String)>, FetchError> {
    let uri = match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    };

    let identity = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        config.session_token.clone(),
        None,
        "ssm-env",
    )
    .into();

    let signing_params = v4::SigningParams::builder()
        .identity(&identity)
        .region(&config.region)
        .name(&config.service)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| FetchError::Signing(format!("Failed to build signing params: {}", e)))?;

    let host = host_header(url);
    let mut all_headers: Vec<(&str, &str)> = headers.to_vec();
    if !host.is_empty() && !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("host")) {
        all_headers.push(("host", &host));
    }

    let signable_body = if body.is_empty() {
        SignableBody::empty()
    } else {
        SignableBody::Bytes(body)
    };

    let signable_request = SignableRequest::new(method, &uri, all_headers.iter().copied(), signable_body)
        .map_err(|e| FetchError::Signing(format!("Failed to create signable request: {}", e)))?;

    let signing_output = sign(signable_request, &signing_params.into())
        .map_err(|e| FetchError::Signing(format!("Failed to sign request: {}", e)))?;

    let (instructions, _signature) = signing_output.into_parts();
    let mut signed: Vec<(String, String)> = instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    // reqwest must send the same Host that was signed
    if !host.is_empty() && !signed.iter().any(|(k, _)| k.eq_ignore_ascii_case("host")) {
        signed.push(("host".to_string(), host.clone()));
    }

    Ok(signed)
}

/// Host header value for a URL, with the port only when non-standard
fn host_header(url: &url::Url) -> String {
    let Some(host) = url.host_str() else {
        return String::new();
    };

    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
