//! AWS SDK collaborators.

pub mod bedrock;
pub mod dispatch;
pub mod organizations;
pub mod resources;
pub mod secrets;

pub use bedrock::BedrockGenerator;
pub use dispatch::LambdaDispatch;
pub use organizations::OrganizationsDirectory;
pub use resources::AssumeRoleResourceLister;
pub use secrets::SecretsManagerStore;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared SDK configuration from the default credential chain.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
