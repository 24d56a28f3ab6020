//! Change composition: source context in, replacement environment file out.

use crate::adapter::{CodeGenerator, SourceRepository};
use permbot_core::WorkflowError;
use permbot_core::config::GithubConfig;
use std::sync::Arc;

/// Fixed instruction restricting what the generator may emit.
pub const SYSTEM_INSTRUCTION: &str = "You are an AWS IAM and Terraform assistant. \
You only add permissions for the S3 and SQS services. \
Reply with Terraform code only: no prose, no explanation, no markdown fences and no comments. \
Only change the environment file; never change the Terraform module. \
Return the complete environment file, keeping every existing entry and any custom IAM policy document exactly as is.";

/// Module files embedded in the prompt, in prompt order.
pub const MODULE_FILES: [&str; 3] = ["variables.tf", "data.tf", "main.tf"];

#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    /// Display name of the authorization group.
    pub group: &'a str,
    pub account: &'a str,
    /// Organizational unit containing the account, possibly empty.
    pub org_unit: &'a str,
    pub service: &'a str,
    pub resource: &'a str,
    pub permission: &'a str,
}

/// Generated environment file plus what the submitter needs to write it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedChange {
    pub environment_path: String,
    /// Blob hash of the environment file on the main line, read before branching.
    pub environment_sha: String,
    pub content: String,
}

struct SourceContext {
    environment: String,
    environment_sha: String,
    variables: String,
    data: String,
    main: String,
}

pub struct ChangeComposer {
    repository: Arc<dyn SourceRepository>,
    generator: Arc<dyn CodeGenerator>,
    github: GithubConfig,
}

impl ChangeComposer {
    pub fn new(
        repository: Arc<dyn SourceRepository>,
        generator: Arc<dyn CodeGenerator>,
        github: GithubConfig,
    ) -> Self {
        Self {
            repository,
            generator,
            github,
        }
    }

    /// Read the source fragments and ask the generator for the new environment file.
    ///
    /// The generator output is returned as is. Nothing is validated here.
    pub async fn compose(&self, input: ComposeInput<'_>) -> Result<ComposedChange, WorkflowError> {
        let environment_path = self.github.environment_file_path(input.group, input.account);
        let sources = self.read_sources(&environment_path).await?;

        let prompt = build_prompt(&input, &sources);
        let content = match self.generator.generate(SYSTEM_INSTRUCTION, &prompt).await {
            Ok(code) if !code.trim().is_empty() => code,
            Ok(_) => {
                tracing::error!(path = %environment_path, "generator returned empty output");
                return Err(WorkflowError::GenerationFailed);
            }
            Err(e) => {
                tracing::error!(path = %environment_path, error = %e, "code generation failed");
                return Err(WorkflowError::GenerationFailed);
            }
        };

        Ok(ComposedChange {
            environment_path,
            environment_sha: sources.environment_sha,
            content,
        })
    }

    async fn read_sources(&self, environment_path: &str) -> Result<SourceContext, WorkflowError> {
        let environment = self
            .read(&self.github.environment_repository, environment_path)
            .await
            .ok_or_else(|| WorkflowError::SourceFileMissing {
                path: environment_path.to_string(),
            })?;

        let [variables, data, main] = MODULE_FILES;
        Ok(SourceContext {
            environment: environment.content,
            environment_sha: environment.sha,
            variables: self.read_module(variables).await?,
            data: self.read_module(data).await?,
            main: self.read_module(main).await?,
        })
    }

    async fn read_module(&self, file: &str) -> Result<String, WorkflowError> {
        let path = self.github.module_file_path(file);
        match self.read(&self.github.module_repository, &path).await {
            Some(fragment) => Ok(fragment.content),
            None => Err(WorkflowError::ModuleFileMissing { path }),
        }
    }

    // Read failures and absent files are reported the same way.
    async fn read(&self, repo: &str, path: &str) -> Option<permbot_core::FileContent> {
        match self.repository.read_file(repo, path, None).await {
            Ok(Some(file)) => Some(file),
            Ok(None) => {
                tracing::warn!(repo, path, "source file not found");
                None
            }
            Err(e) => {
                tracing::error!(repo, path, error = %e, "source file read failed");
                None
            }
        }
    }
}

fn build_prompt(input: &ComposeInput<'_>, sources: &SourceContext) -> String {
    format!(
        "Add {} permission for the {} resource named \"{}\" in account \"{}\" located in \"{}\" organization path\n\
         Terraform module:\n{}\n{}\n{}\n\
         Terraform environment file:\n{}",
        input.permission,
        input.service,
        input.resource,
        input.account,
        input.org_unit,
        sources.variables,
        sources.data,
        sources.main,
        sources.environment,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_every_fragment_verbatim() {
        let input = ComposeInput {
            group: "platform",
            account: "acct1",
            org_unit: "engineering",
            service: "s3",
            resource: "b1",
            permission: "write",
        };
        let sources = SourceContext {
            environment: "module \"sso\" {}".to_string(),
            environment_sha: "abc".to_string(),
            variables: "variable \"x\" {}".to_string(),
            data: "data \"aws_caller_identity\" \"me\" {}".to_string(),
            main: "resource \"aws_iam_policy\" \"p\" {}".to_string(),
        };

        let prompt = build_prompt(&input, &sources);
        assert!(prompt.starts_with(
            "Add write permission for the s3 resource named \"b1\" in account \"acct1\" located in \"engineering\" organization path\n"
        ));
        for fragment in [
            &sources.variables,
            &sources.data,
            &sources.main,
            &sources.environment,
        ] {
            assert!(prompt.contains(fragment.as_str()));
        }
        assert!(prompt.ends_with("Terraform environment file:\nmodule \"sso\" {}"));
    }
}
