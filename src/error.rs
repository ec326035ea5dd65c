//! Custom error types for ecs-scout.

use thiserror::Error;

/// Errors that can occur while inspecting or updating ECS resources.
///
/// Transport errors from the AWS SDK and resolution errors (a service name
/// that matches zero or several services) are kept distinct, but both are
/// fatal to the invocation: main prints the error and exits non-zero.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("No running service {service} in cluster {cluster}")]
    ServiceNotFound { service: String, cluster: String },

    #[error("Found more than 1 service named {service} in cluster {cluster}")]
    AmbiguousService { service: String, cluster: String },
}

impl ScoutError {
    /// Create an AWS SDK error from any error type.
    pub fn aws<E: std::fmt::Display>(err: E) -> Self {
        ScoutError::AwsSdk(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_service_not_found() {
        let err = ScoutError::ServiceNotFound {
            service: "web".to_string(),
            cluster: "prod".to_string(),
        };
        assert_eq!(err.to_string(), "No running service web in cluster prod");
    }

    #[test]
    fn test_error_display_ambiguous_service() {
        let err = ScoutError::AmbiguousService {
            service: "web".to_string(),
            cluster: "prod".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Found more than 1 service named web in cluster prod"
        );
    }

    #[test]
    fn test_error_aws_helper() {
        let err = ScoutError::aws("connection reset");
        assert_eq!(err.to_string(), "AWS SDK error: connection reset");
    }
}
