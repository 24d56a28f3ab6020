//! Resource listing inside member accounts through an assumed scanning role.

use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::config::Credentials;
use permbot_core::config::AwsConfig;
use permbot_runtime::ResourceLister;

const QUEUES_PAGE_SIZE: i32 = 1000;

pub struct AssumeRoleResourceLister {
    sdk_config: SdkConfig,
    sts: aws_sdk_sts::Client,
    settings: AwsConfig,
}

impl AssumeRoleResourceLister {
    pub fn new(sdk_config: &SdkConfig, settings: AwsConfig) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
            sts: aws_sdk_sts::Client::new(sdk_config),
            settings,
        }
    }

    /// Temporary credentials of the scanning role in `account_id`.
    async fn assume(&self, account_id: &str) -> anyhow::Result<Credentials> {
        let role_arn = self.settings.scanning_role_arn(account_id);
        let response = self
            .sts
            .assume_role()
            .role_arn(&role_arn)
            .role_session_name(&self.settings.session_name)
            .send()
            .await
            .with_context(|| format!("sts:AssumeRole failed for {}", role_arn))?;
        let creds = response
            .credentials()
            .with_context(|| format!("sts:AssumeRole returned no credentials for {}", role_arn))?;
        tracing::debug!(role_arn = %role_arn, "scanning role assumed");

        Ok(Credentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            Some(creds.session_token().to_string()),
            None,
            "permbot-scanning-role",
        ))
    }
}

#[async_trait]
impl ResourceLister for AssumeRoleResourceLister {
    async fn list_buckets(&self, account_id: &str) -> anyhow::Result<Vec<String>> {
        let credentials = self.assume(account_id).await?;
        let config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .credentials_provider(credentials)
            .build();
        let s3 = aws_sdk_s3::Client::from_conf(config);

        let response = s3
            .list_buckets()
            .send()
            .await
            .context("s3:ListBuckets failed")?;
        Ok(response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn list_queues(&self, account_id: &str) -> anyhow::Result<Vec<String>> {
        let credentials = self.assume(account_id).await?;
        let config = aws_sdk_sqs::config::Builder::from(&self.sdk_config)
            .credentials_provider(credentials)
            .build();
        let sqs = aws_sdk_sqs::Client::from_conf(config);

        let mut urls = Vec::new();
        let mut next_token = None;
        loop {
            let page = sqs
                .list_queues()
                .max_results(QUEUES_PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .context("sqs:ListQueues failed")?;
            urls.extend(page.queue_urls().iter().cloned());
            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => return Ok(urls),
            }
        }
    }
}
