//! Common test utilities for ssm-env integration tests
//!
//! - an isolated environment (config dir, AWS files, fake credentials)
//! - CLI invocation helpers
//! - wiremock helpers standing in for the SSM endpoint

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_KEY_ID: &str = "AKIDTESTEXAMPLE";

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CliResponse {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Environment the CLI runs in. Nothing from the developer's real AWS
/// setup leaks in.
pub struct MockEnvironment {
    pub config_dir: TempDir,
    pub env_vars: HashMap<String, String>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp config dir");
        let mut env = Self {
            config_dir,
            env_vars: HashMap::new(),
        };
        env.set_env("AWS_ACCESS_KEY_ID", ACCESS_KEY_ID)
            .set_env("AWS_SECRET_ACCESS_KEY", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY")
            .set_env("AWS_REGION", "us-east-1");
        env
    }

    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().to_path_buf()
    }

    /// Write `config.toml` into the config dir
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path().join("config.toml"), content)
            .expect("Failed to write config.toml");
    }
}

/// Run the CLI with the given arguments (excluding the program name)
pub fn ssm_env(args: &[&str]) -> CliResponse {
    ssm_env_with_env(args, &MockEnvironment::new())
}

pub fn ssm_env_with_env(args: &[&str], env: &MockEnvironment) -> CliResponse {
    let mut cmd = ssm_env_command(args, env);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    parse_output(cmd.output().expect("Failed to execute command"))
}

/// The CLI command, set up but not started
pub fn ssm_env_command(args: &[&str], env: &MockEnvironment) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ssm-env"));
    cmd.args(args);

    for var in [
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "AWS_ACCESS_KEY",
        "AWS_SECRET_KEY",
        "AWS_REGION",
        "AWS_PROFILE",
        "AWS_DEFAULT_PROFILE",
        "AWS_SESSION_TOKEN",
        "AWS_ENDPOINT",
        "AWS_DEFAULT_REGION",
        "SSM_ENV_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("SSM_ENV_CONFIG_DIR", env.config_path());
    cmd.env("AWS_CONFIG_FILE", env.config_path().join("aws-config"));
    cmd.env("AWS_SHARED_CREDENTIALS_FILE", env.config_path().join("aws-credentials"));
    for (key, value) in &env.env_vars {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd
}

pub fn parse_output(output: Output) -> CliResponse {
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(1),
    }
}

/// A parameter record the way SSM returns it
pub fn ssm_parameter(name: &str, value: &Value) -> Value {
    json!({
        "Name": name,
        "Type": "SecureString",
        "Value": value.to_string(),
        "Version": 1,
        "LastModifiedDate": 1.7e9,
        "ARN": format!("arn:aws:ssm:us-east-1:123456789012:parameter{}", name),
        "DataType": "text"
    })
}

/// Mount a GetParameters handler that answers with `body`
pub async fn mount_get_parameters(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", "AmazonSSM.GetParameters"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
