//! Dispatcher runs backed by the on-disk runner tool cache.

use async_trait::async_trait;
use copilot_action_core::commands::{
    CommandInvocation, CommandRunner, Dispatcher, Operation, OperationParameters,
    OperationRequest, ProcessOutput,
};
use copilot_action_core::tools::{
    Arch, ArtifactDownloader, Os, Platform, ReleaseSource, ToolDescriptor, ToolStore,
};
use copilot_action_core::{Error, Result};
use copilot_action_github::RunnerToolCache;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

struct StaticRelease(&'static str);

#[async_trait]
impl ReleaseSource for StaticRelease {
    async fn latest_release_tag(&self, _owner: &str, _repo: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
struct CountingDownloader {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl ArtifactDownloader for CountingDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        tokio::fs::write(dest, b"#!/bin/sh\nexit 0\n").await?;
        Ok(())
    }
}

#[derive(Default)]
struct CapturingRunner {
    invocations: Mutex<Vec<CommandInvocation>>,
}

#[async_trait]
impl CommandRunner for CapturingRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<ProcessOutput> {
        self.invocations.lock().unwrap().push(invocation.clone());
        Ok(ProcessOutput {
            code: Some(0),
            stdout: "[]".into(),
            stderr: String::new(),
        })
    }
}

struct Setup {
    cache_root: tempfile::TempDir,
    staging: tempfile::TempDir,
    path_file: PathBuf,
    store: Arc<RunnerToolCache>,
    downloader: Arc<CountingDownloader>,
    runner: Arc<CapturingRunner>,
}

impl Setup {
    fn new() -> Self {
        let cache_root = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let path_file = staging.path().join("github_path");
        let store = Arc::new(
            RunnerToolCache::new(cache_root.path().to_path_buf(), Arch::X86_64)
                .with_path_file(Some(path_file.clone())),
        );
        Self {
            cache_root,
            staging,
            path_file,
            store,
            downloader: Arc::new(CountingDownloader::default()),
            runner: Arc::new(CapturingRunner::default()),
        }
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            Arc::new(StaticRelease("v1.34.0")),
            self.store.clone(),
            self.downloader.clone(),
            self.runner.clone(),
        )
        .with_platform(Platform::new(Os::Linux, Arch::X86_64))
        .with_temp_dir(self.staging.path().to_path_buf())
    }

    fn download_count(&self) -> usize {
        self.downloader.urls.lock().unwrap().len()
    }
}

fn request(operation: Operation, parameters: OperationParameters) -> OperationRequest {
    OperationRequest::new(operation, parameters)
}

#[tokio::test]
async fn test_install_twice_downloads_once() {
    let setup = Setup::new();
    let dispatcher = setup.dispatcher();
    let params = OperationParameters {
        version: Some("v1.34.0".into()),
        ..Default::default()
    };

    let first = dispatcher.install(&params).await.unwrap();
    let second = dispatcher.install(&params).await.unwrap();

    assert_eq!(first.installed_path, second.installed_path);
    assert_eq!(setup.download_count(), 1);
    assert_eq!(
        setup.downloader.urls.lock().unwrap()[0],
        "https://github.com/aws/copilot-cli/releases/download/v1.34.0/copilot-linux-v1.34.0"
    );
    assert_eq!(
        first.installed_path,
        setup
            .cache_root
            .path()
            .join("aws-copilot-cli/v1.34.0/x64")
    );
    assert!(first.installed_path.join("copilot").is_file());
}

#[tokio::test]
async fn test_latest_install_is_cached_under_resolved_tag() {
    let setup = Setup::new();

    setup
        .dispatcher()
        .dispatch(&request(Operation::Install, OperationParameters::default()))
        .await
        .unwrap();

    let descriptor = ToolDescriptor::new("aws-copilot-cli", "v1.34.0");
    assert!(setup.store.find(&descriptor).is_some());
}

#[tokio::test]
async fn test_deploy_acquires_then_runs_with_search_path() {
    let setup = Setup::new();
    let params = OperationParameters {
        app: Some("myapp".into()),
        env: Some("prod".into()),
        tag: Some("v1".into()),
        detach: true,
        ..Default::default()
    };

    setup
        .dispatcher()
        .dispatch(&request(Operation::Deploy, params))
        .await
        .unwrap();

    assert_eq!(setup.download_count(), 1);
    let invocations = setup.runner.invocations.lock().unwrap();
    assert_eq!(invocations.len(), 1);
    assert_eq!(
        invocations[0].args,
        vec!["deploy", "--app", "myapp", "--env", "prod", "--tag", "v1", "--detach"]
    );
    let tool_dir = setup.cache_root.path().join("aws-copilot-cli/v1.34.0/x64");
    assert_eq!(invocations[0].search_path, vec![tool_dir.clone()]);

    let github_path = std::fs::read_to_string(&setup.path_file).unwrap();
    assert_eq!(github_path, format!("{}\n", tool_dir.display()));
}

#[tokio::test]
async fn test_package_on_warm_cache_skips_download() {
    let setup = Setup::new();
    let params = OperationParameters {
        version: Some("v1.34.0".into()),
        app: Some("myapp".into()),
        ..Default::default()
    };
    setup.dispatcher().install(&params).await.unwrap();

    setup
        .dispatcher()
        .dispatch(&request(Operation::Package, params))
        .await
        .unwrap();

    assert_eq!(setup.download_count(), 1);
    let invocations = setup.runner.invocations.lock().unwrap();
    let programs: Vec<_> = invocations.iter().map(|i| i.args[0].as_str()).collect();
    assert_eq!(programs, vec!["svc", "job"]);
}

#[tokio::test]
async fn test_missing_env_fails_before_running_copilot() {
    let setup = Setup::new();
    let params = OperationParameters {
        app: Some("myapp".into()),
        ..Default::default()
    };

    let err = setup
        .dispatcher()
        .dispatch(&request(Operation::Deploy, params))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingParameter { name: "env", .. }));
    assert_eq!(err.to_string(), "Environment is required");
    assert!(setup.runner.invocations.lock().unwrap().is_empty());
}
