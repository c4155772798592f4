// Adapters layer: concrete implementations of the domain ports.

pub mod memory;

#[cfg(feature = "aws")]
pub mod cloudformation;
#[cfg(feature = "aws")]
pub mod ssm;

#[cfg(feature = "aws")]
pub async fn load_aws_config(region: Option<&str>) -> aws_config::SdkConfig {
    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    match region {
        Some(region) => {
            loader
                .region(aws_config::Region::new(region.to_string()))
                .load()
                .await
        }
        None => loader.load().await,
    }
}
