//! Test executor
//!
//! Runs every test case against every target host, one child process
//! at a time, and folds the outcomes into a single pass/fail result.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use colored::Colorize;
use tokio::process::Command as TokioCommand;
use tracing::{debug, error, info};

use crate::common::{Error, Result};

use super::config::{TestCase, TestConfig};

/// Environment variable carrying the current host into each test
pub const TARGET_ENV: &str = "TARGET";

/// Shell used to interpret each test's command line
#[derive(Debug, Clone)]
pub struct Shell {
    /// Interpreter executable
    pub program: PathBuf,
    /// Arguments placed before the command line (must end with `-c`)
    pub args: Vec<OsString>,
}

impl Shell {
    /// `bash -l -c` when bash is on `PATH`, otherwise `sh -c`
    pub fn detect() -> Self {
        match which::which("bash") {
            Ok(program) => Self {
                program,
                args: vec!["-l".into(), "-c".into()],
            },
            Err(_) => Self::posix(),
        }
    }

    /// Plain `sh -c`
    pub fn posix() -> Self {
        Self {
            program: PathBuf::from("sh"),
            args: vec!["-c".into()],
        }
    }

    fn command(&self, line: &str) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args).arg(line);
        cmd
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::detect()
    }
}

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.total - self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Convert into the aggregate result the CLI exits on
    pub fn into_result(self) -> Result<()> {
        if self.all_passed() {
            Ok(())
        } else {
            Err(Error::TestsFailed {
                failed: self.failed,
                total: self.total,
            })
        }
    }
}

/// Sequential hosts × tests executor
#[derive(Debug, Clone)]
pub struct Executor {
    shell: Shell,
    base_path: PathBuf,
    verbose: bool,
}

impl Executor {
    /// Create an executor anchored at the current working directory
    pub fn new(verbose: bool) -> Result<Self> {
        Ok(Self {
            shell: Shell::detect(),
            base_path: std::env::current_dir()?,
            verbose,
        })
    }

    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Directory each child starts in: the parent of the base path, or
    /// the base path itself at the filesystem root.
    pub fn working_dir(&self) -> &Path {
        self.base_path.parent().unwrap_or(&self.base_path)
    }

    /// Run every test against every host in list order.
    ///
    /// A failing pair never stops the loop.
    pub async fn run(&self, hosts: &[String], config: &TestConfig) -> RunSummary {
        let mut summary = RunSummary::default();

        info!("Config file: {}", config.name);
        debug!(
            shell = %self.shell.program.display(),
            cwd = %self.working_dir().display(),
            "Executor ready"
        );

        for host in hosts {
            info!("Running tests for target: {}", host);
            for test in &config.tests {
                summary.total += 1;
                if !self.run_command(test, host).await {
                    summary.failed += 1;
                }
            }
        }

        info!("{}/{} tests passed", summary.passed(), summary.total);
        if summary.all_passed() {
            println!("{} {}", "✓".green().bold(), "All tests passed".green().bold());
        } else {
            println!(
                "{} {}",
                "✗".red().bold(),
                format!("{} of {} tests failed", summary.failed, summary.total)
                    .red()
                    .bold()
            );
        }

        summary
    }

    /// Run one test against one host, logging the outcome
    async fn run_command(&self, test: &TestCase, host: &str) -> bool {
        let output = self
            .shell
            .command(&test.exec_command)
            .current_dir(self.working_dir())
            .env(TARGET_ENV, host)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                info!("Test {} for target {} : passed.", test.name, host);
                if self.verbose {
                    info!("Output:\n{}\n\n", String::from_utf8_lossy(&output.stdout));
                }
                true
            }
            Ok(output) => {
                error!("Test {} for target {} : failed.", test.name, host);
                if self.verbose {
                    error!("Output:\n{}\n\n", String::from_utf8_lossy(&output.stderr));
                }
                false
            }
            Err(e) => {
                error!("Test {} for target {} : failed.", test.name, host);
                error!(
                    "Could not launch '{}': {}",
                    self.shell.program.display(),
                    e
                );
                false
            }
        }
    }
}

/// Run all tests against all hosts from the current directory
pub async fn run_tests(hosts: &[String], config: &TestConfig, verbose: bool) -> Result<()> {
    let executor = Executor::new(verbose)?;
    executor.run(hosts, config).await.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn case(name: &str, exec: &str) -> TestCase {
        TestCase {
            name: name.to_string(),
            use_os_env: false,
            exec_command: exec.to_string(),
        }
    }

    fn config(tests: Vec<TestCase>) -> TestConfig {
        TestConfig {
            name: "unit".to_string(),
            tests,
        }
    }

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn executor() -> Executor {
        Executor::new(false).unwrap().with_shell(Shell::posix())
    }

    #[test]
    fn test_working_dir_is_parent_of_base() {
        let exec = executor().with_base_path("/srv/checks/run");
        assert_eq!(exec.working_dir(), Path::new("/srv/checks"));

        let exec = executor().with_base_path("/");
        assert_eq!(exec.working_dir(), Path::new("/"));
    }

    #[test]
    fn test_summary_result() {
        let ok = RunSummary { total: 3, failed: 0 };
        assert!(ok.into_result().is_ok());

        let bad = RunSummary { total: 3, failed: 1 };
        assert_eq!(bad.passed(), 2);
        assert!(matches!(
            bad.into_result(),
            Err(Error::TestsFailed { failed: 1, total: 3 })
        ));
    }

    #[tokio::test]
    async fn test_all_passing() {
        let summary = executor()
            .run(&hosts(&["a", "b"]), &config(vec![case("ping", "true")]))
            .await;
        assert_eq!(summary, RunSummary { total: 2, failed: 0 });
    }

    #[tokio::test]
    async fn test_all_failing() {
        let summary = executor()
            .run(&hosts(&["a", "b"]), &config(vec![case("ping", "false")]))
            .await;
        assert_eq!(summary, RunSummary { total: 2, failed: 2 });
        assert!(summary.into_result().is_err());
    }

    #[tokio::test]
    async fn test_every_pair_runs_with_target() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let record = format!("echo \"$TARGET\" >> '{}'", log.display());

        let summary = executor()
            .run(
                &hosts(&["a", "b", ""]),
                &config(vec![case("first", &record), case("second", &record)]),
            )
            .await;

        assert_eq!(summary.total, 6);
        assert!(summary.all_passed());
        let calls = fs::read_to_string(&log).unwrap();
        assert_eq!(calls, "a\na\nb\nb\n\n\n");
    }

    #[tokio::test]
    async fn test_single_failure_fails_run_without_stopping() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let check = format!(
            "echo \"$TARGET\" >> '{}'; test \"$TARGET\" != b",
            log.display()
        );

        let summary = executor()
            .run(&hosts(&["a", "b", "c", "d"]), &config(vec![case("not-b", &check)]))
            .await;

        assert_eq!(summary, RunSummary { total: 4, failed: 1 });
        assert_eq!(fs::read_to_string(&log).unwrap(), "a\nb\nc\nd\n");
    }

    #[tokio::test]
    async fn test_child_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let out = root.join("pwd.txt");

        let summary = executor()
            .with_base_path(root.join("anchor"))
            .run(
                &hosts(&["h"]),
                &config(vec![case("pwd", &format!("pwd -P > '{}'", out.display()))]),
            )
            .await;

        assert!(summary.all_passed());
        let pwd = fs::read_to_string(&out).unwrap();
        assert_eq!(Path::new(pwd.trim_end()), root.as_path());
    }

    #[tokio::test]
    async fn test_parent_environment_inherited() {
        let summary = executor()
            .run(
                &hosts(&["h"]),
                &config(vec![case("path", "test -n \"$PATH\"")]),
            )
            .await;
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn test_launch_failure_counts_as_failure() {
        let shell = Shell {
            program: PathBuf::from("/nonexistent/shell/binary"),
            args: vec!["-c".into()],
        };
        let summary = executor()
            .with_shell(shell)
            .run(&hosts(&["a", "b"]), &config(vec![case("t", "true")]))
            .await;
        assert_eq!(summary, RunSummary { total: 2, failed: 2 });
    }

    #[tokio::test]
    async fn test_repeated_runs_agree() {
        let exec = executor();
        let hosts = hosts(&["x", "y"]);
        let cfg = config(vec![
            case("ok", "true"),
            case("only-x", "test \"$TARGET\" = x"),
        ]);

        let first = exec.run(&hosts, &cfg).await;
        let second = exec.run(&hosts, &cfg).await;
        assert_eq!(first, second);
        assert_eq!(first.failed, 1);
    }

    #[tokio::test]
    async fn test_no_tests_or_hosts_passes() {
        let summary = executor().run(&[], &config(vec![case("t", "false")])).await;
        assert_eq!(summary, RunSummary::default());

        let summary = executor().run(&hosts(&["a"]), &config(Vec::new())).await;
        assert!(summary.all_passed());
    }
}
