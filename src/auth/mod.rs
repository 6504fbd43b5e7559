//! AWS credentials resolution and request signing

pub mod aws;
pub mod aws_config;

pub use aws::{pick_region, resolve_credentials, sign_request, AwsSigV4Config, DEFAULT_REGION};
pub use aws_config::{load_profile, AwsProfile};
