use bollard::container::{
    Config as ContainerConfig, CreateContainerOptions, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, WaitContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::CreateImageOptions;
use bollard::Docker;
use futures::StreamExt;
use tracing::{debug, warn};

use super::{ImageInfo, ImageRuntime};
use crate::error::ScanError;
use async_trait::async_trait;

/// Docker implementation of [`ImageRuntime`], backed by the local daemon.
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connects to the local Docker daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon is unreachable; the caller treats this
    /// as fatal before any scan work starts.
    pub fn connect() -> Result<Self, ScanError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    async fn run_to_exit(&self, container_id: &str) -> Result<String, ScanError> {
        self.docker
            .start_container(container_id, None::<StartContainerOptions<String>>)
            .await?;

        let mut wait = self.docker.wait_container(
            container_id,
            Some(WaitContainerOptions {
                condition: "not-running",
            }),
        );
        while let Some(status) = wait.next().await {
            match status {
                Ok(_) => {}
                // A non-zero exit code is not an execution failure here: the
                // inventory command exits non-zero when neither package
                // manager is present, and the contract is to emit nothing.
                Err(DockerError::DockerContainerWaitError { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let mut logs = self.docker.logs(
            container_id,
            Some(LogsOptions::<String> {
                stdout: true,
                stderr: true,
                ..Default::default()
            }),
        );
        let mut output = String::new();
        while let Some(chunk) = logs.next().await {
            output.push_str(&chunk?.to_string());
        }
        Ok(output)
    }
}

#[async_trait]
impl ImageRuntime for DockerRuntime {
    async fn pull_image(&self, image: &str) -> Result<(), ScanError> {
        let mut stream = self.docker.create_image(
            Some(CreateImageOptions {
                from_image: image,
                ..Default::default()
            }),
            None,
            None,
        );
        while let Some(progress) = stream.next().await {
            let info = progress?;
            if let Some(status) = info.status {
                debug!(image, status = %status, "pull progress");
            }
        }
        Ok(())
    }

    async fn inspect_image(&self, image: &str) -> Result<ImageInfo, ScanError> {
        let inspect = self.docker.inspect_image(image).await?;
        Ok(ImageInfo {
            id: inspect.id.unwrap_or_default(),
            created: inspect.created.unwrap_or_default(),
            size_bytes: inspect.size.unwrap_or(0),
        })
    }

    async fn run_command(&self, image: &str, command: &str) -> Result<String, ScanError> {
        let config = ContainerConfig {
            image: Some(image.to_string()),
            cmd: Some(vec![
                "/bin/sh".to_string(),
                "-c".to_string(),
                command.to_string(),
            ]),
            tty: Some(true),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container(None::<CreateContainerOptions<String>>, config)
            .await?;

        // The container is disposable and scoped to this call: run it, then
        // remove it regardless of how the run went.
        let result = self.run_to_exit(&created.id).await;

        if let Err(e) = self
            .docker
            .remove_container(
                &created.id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await
        {
            warn!(container = %created.id, error = %e, "failed to remove container");
        }

        result
    }
}
