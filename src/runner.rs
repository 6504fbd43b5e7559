//! Running the command, or printing exports
//!
//! Execute mode gives the child exactly the entries it is handed: the
//! environment is cleared first, nothing is inherited implicitly.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::environment::EnvEntry;
use crate::errors::ExecError;

/// Launch `command[0]` with `command[1..]` and exactly `env`, wait for it.
///
/// Stdout and stderr are the parent's. A non-zero exit or a signal is an
/// error; so is an empty `command`.
pub fn execute(env: &[EnvEntry], command: &[String]) -> Result<(), ExecError> {
    let (program, args) = command.split_first().ok_or(ExecError::MissingCommand)?;

    let resolved = resolve_program(program, env);
    debug!(program = %program, resolved = ?resolved, args = ?args, vars = env.len(), "Launching command");

    let status = Command::new(&resolved)
        .args(args)
        .env_clear()
        .envs(env.iter().map(|e| (e.key.as_str(), e.value.as_str())))
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;

    debug!(status = %status, "Command finished");

    if status.success() {
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(ExecError::Exit {
            program: program.clone(),
            code,
        }),
        None => Err(ExecError::Signal {
            program: program.clone(),
        }),
    }
}

/// Write `export KEY=VALUE` for every entry, in order
pub fn print_exports<W: Write>(out: &mut W, env: &[EnvEntry]) -> std::io::Result<()> {
    for entry in env {
        writeln!(out, "export {}", entry)?;
    }
    out.flush()
}

/// Find a bare program name on the parent's `PATH`.
///
/// The child environment is cleared, so unless it carries its own `PATH`
/// the lookup would otherwise fall back to the platform default.
fn resolve_program(program: &str, env: &[EnvEntry]) -> OsString {
    let has_separator = program.contains('/') || program.contains(std::path::MAIN_SEPARATOR);
    if has_separator || env.iter().any(|e| e.key == "PATH") {
        return OsString::from(program);
    }

    std::env::var_os("PATH")
        .and_then(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(program))
                .find(|candidate| is_executable(candidate))
        })
        .map(PathBuf::into_os_string)
        .unwrap_or_else(|| OsString::from(program))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
