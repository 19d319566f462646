use std::io::Write;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;

mod cli;
mod listings;

/// Runs the compiler binary with `args`, feeding `stdin` to it.
///
/// The caller's `RUST_LOG` and `SPANTAB_*` variables are removed so that
/// only what the test sets is in effect.
pub fn spantab(args: &[&str], envs: &[(&str, &str)], stdin: &str) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_spantab"));
    command
        .args(["--output-format", "json"])
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    for (key, _) in std::env::vars() {
        if key.starts_with("SPANTAB_") {
            command.env_remove(key);
        }
    }
    command.envs(envs.iter().copied());

    let mut child = command.spawn().expect("failed to start spantab");
    let mut child_stdin = child.stdin.take().expect("stdin is piped");
    // The process may exit before reading everything.
    let _ = child_stdin.write_all(stdin.as_bytes());
    drop(child_stdin);

    child.wait_with_output().expect("failed to wait for spantab")
}

/// Standard output as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

/// Standard error as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
