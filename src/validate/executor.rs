// src/validate/executor.rs

//! Gradle task execution
//!
//! Runs the Gradle wrapper of a converted recipe. On CI the run is isolated:
//! private Gradle and Android user homes, offline mode, and output captured
//! to files that are dumped when the build fails.

use crate::context::ConversionContext;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tempfile::TempDir;
use tracing::{debug, info};
use wait_timeout::ChildExt;

#[cfg(windows)]
const GRADLEW: &str = "gradlew.bat";
#[cfg(not(windows))]
const GRADLEW: &str = "gradlew";

/// Runs Gradle tasks in one project folder
pub struct GradleTasksExecutor<'a> {
    project_dir: PathBuf,
    ctx: &'a ConversionContext,
    temp_dir: TempDir,
}

impl<'a> GradleTasksExecutor<'a> {
    pub fn new(project_dir: &Path, ctx: &'a ConversionContext) -> Result<Self> {
        let temp_dir = TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            ctx,
            temp_dir,
        })
    }

    fn temp_subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.temp_dir.path().join(name);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        Ok(dir)
    }

    /// Command-line arguments passed to Gradle for `tasks`
    pub fn arguments(&self, tasks: &[String]) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(repo) = self.ctx.repo_location() {
            args.push(format!("-PinjectedMavenRepo={repo}"));
        }
        if let Some(java_home) = self.ctx.java_home() {
            args.push(format!(
                "-Porg.gradle.java.installations.paths={}",
                java_home.display()
            ));
        }
        if self.ctx.ci() {
            args.push("--info".to_string());
            args.push("--stacktrace".to_string());
            args.push("--offline".to_string());
            args.push(format!(
                "-Dmaven.repo.local={}",
                self.temp_dir.path().join("local_maven_repo").display()
            ));
        }

        args.extend(tasks.iter().cloned());
        args
    }

    /// Environment variables set on the Gradle process
    pub fn environment(&self) -> Vec<(&'static str, OsString)> {
        let mut env = Vec::new();

        if let Some(java_home) = self.ctx.java_home() {
            env.push(("JAVA_HOME", java_home.as_os_str().to_owned()));
        }
        if let Some(android_home) = self.ctx.android_home() {
            env.push(("ANDROID_HOME", android_home.as_os_str().to_owned()));
        }
        if self.ctx.ci() {
            env.push((
                "GRADLE_USER_HOME",
                self.temp_dir.path().join("gradle_user_home").into_os_string(),
            ));
            env.push((
                "ANDROID_USER_HOME",
                self.temp_dir.path().join("android_user_home").into_os_string(),
            ));
        }

        env
    }

    /// Run `tasks` and wait for Gradle to finish
    pub fn execute(&self, tasks: &[String]) -> Result<()> {
        if tasks.is_empty() {
            debug!("No tasks to run in {}", self.project_dir.display());
            return Ok(());
        }

        let gradlew = self.project_dir.join(GRADLEW);
        if !gradlew.is_file() {
            return Err(Error::MissingFile(gradlew));
        }

        info!("Executing tasks {:?} in {}", tasks, self.project_dir.display());

        let mut command = Command::new(&gradlew);
        command
            .current_dir(&self.project_dir)
            .args(self.arguments(tasks))
            .envs(self.environment())
            .stdin(Stdio::null());

        let captured = if self.ctx.ci() {
            self.temp_subdir("gradle_user_home")?;
            self.temp_subdir("android_user_home")?;
            self.temp_subdir("local_maven_repo")?;

            let stdout_path = self.temp_dir.path().join("stdout.txt");
            let stderr_path = self.temp_dir.path().join("stderr.txt");
            let stdout = File::create(&stdout_path).map_err(|e| Error::io(&stdout_path, e))?;
            let stderr = File::create(&stderr_path).map_err(|e| Error::io(&stderr_path, e))?;
            command.stdout(stdout).stderr(stderr);
            Some((stdout_path, stderr_path))
        } else {
            None
        };

        let status = self.run(&mut command)?;
        if status.success() {
            return Ok(());
        }

        if let Some((stdout_path, stderr_path)) = captured {
            let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
            let stdout = fs::read_to_string(&stdout_path).unwrap_or_default();
            eprintln!("=================== Stderr ===================");
            eprintln!("{stderr}");
            eprintln!("=================== Stdout ===================");
            eprintln!("{stdout}");
            eprintln!("=============== End last build ===============");
        }

        Err(Error::TaskExecution(format!(
            "{:?} failed in {} with exit code {}",
            tasks,
            self.project_dir.display(),
            status.code().unwrap_or(-1)
        )))
    }

    fn run(&self, command: &mut Command) -> Result<ExitStatus> {
        let mut child = command
            .spawn()
            .map_err(|e| Error::TaskExecution(format!("Failed to start Gradle: {e}")))?;

        let Some(timeout) = self.ctx.task_timeout() else {
            return child
                .wait()
                .map_err(|e| Error::TaskExecution(format!("Failed to wait for Gradle: {e}")));
        };

        match child
            .wait_timeout(timeout)
            .map_err(|e| Error::TaskExecution(format!("Failed to wait for Gradle: {e}")))?
        {
            Some(status) => Ok(status),
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(Error::TaskExecution(format!(
                    "Gradle timed out after {} seconds in {}",
                    timeout.as_secs(),
                    self.project_dir.display()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextConfig;
    use crate::version::VersionMapping;

    fn context(config: ContextConfig) -> ConversionContext {
        ConversionContext::from_parts(config, VersionMapping::default(), None)
    }

    fn tasks() -> Vec<String> {
        vec!["assembleDebug".to_string()]
    }

    #[test]
    fn test_plain_arguments() {
        let ctx = context(ContextConfig::default());
        let executor = GradleTasksExecutor::new(Path::new("."), &ctx).unwrap();
        assert_eq!(executor.arguments(&tasks()), vec!["assembleDebug"]);
        assert!(executor.environment().is_empty());
    }

    #[test]
    fn test_ci_arguments_and_environment() {
        let ctx = context(ContextConfig {
            ci: true,
            repo_location: Some("/repo".to_string()),
            java_home: Some(PathBuf::from("/jdk")),
            android_home: Some(PathBuf::from("/sdk")),
            ..ContextConfig::default()
        });
        let executor = GradleTasksExecutor::new(Path::new("."), &ctx).unwrap();

        let args = executor.arguments(&tasks());
        assert_eq!(args[0], "-PinjectedMavenRepo=/repo");
        assert_eq!(args[1], "-Porg.gradle.java.installations.paths=/jdk");
        assert!(args.contains(&"--offline".to_string()));
        assert!(args.iter().any(|a| a.starts_with("-Dmaven.repo.local=")));
        assert_eq!(args.last().unwrap(), "assembleDebug");

        let names: Vec<&str> = executor.environment().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec!["JAVA_HOME", "ANDROID_HOME", "GRADLE_USER_HOME", "ANDROID_USER_HOME"]
        );
    }

    #[test]
    fn test_missing_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(ContextConfig::default());
        let executor = GradleTasksExecutor::new(dir.path(), &ctx).unwrap();
        assert!(matches!(executor.execute(&tasks()), Err(Error::MissingFile(_))));
        assert!(executor.execute(&[]).is_ok());
    }
}
