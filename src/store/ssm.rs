//! AWS Systems Manager Parameter Store client
//!
//! Speaks the AWS JSON 1.1 protocol directly: one signed `POST /` with an
//! `X-Amz-Target` header naming the operation.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{GetParametersOutput, ParameterStore};
use crate::auth::{sign_request, AwsSigV4Config};
use crate::errors::{FetchError, Result, SsmEnvError};

/// SigV4 service name for SSM
pub const SERVICE: &str = "ssm";

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const GET_PARAMETERS_TARGET: &str = "AmazonSSM.GetParameters";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetParametersRequest<'a> {
    names: &'a [String],
    with_decryption: bool,
}

/// Error document returned with a non-2xx status
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

pub struct SsmClient {
    http: reqwest::Client,
    endpoint: Url,
    credentials: AwsSigV4Config,
}

impl SsmClient {
    /// Build a client for the credentials' region, or for `endpoint` if given
    pub fn new(credentials: AwsSigV4Config, endpoint: Option<&str>) -> Result<Self> {
        let endpoint = match endpoint {
            Some(raw) => Url::parse(raw)
                .map_err(|e| SsmEnvError::Config(format!("Invalid endpoint '{}': {}", raw, e)))?,
            None => default_endpoint(&credentials.region)?,
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("ssm-env/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        &self.credentials.region
    }
}

fn default_endpoint(region: &str) -> Result<Url> {
    let raw = format!("https://ssm.{}.amazonaws.com/", region);
    Url::parse(&raw).map_err(|e| SsmEnvError::Config(format!("Invalid region '{}': {}", region, e)))
}

/// Turn an error response into a [`FetchError`]
fn decode_error(status: u16, body: &[u8]) -> FetchError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_type: Some(error_type),
            message,
        }) => FetchError::service(status, &error_type, message.unwrap_or_default()),
        _ => FetchError::service(
            status,
            "UnknownError",
            String::from_utf8_lossy(body).trim().to_string(),
        ),
    }
}

impl ParameterStore for SsmClient {
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> std::result::Result<GetParametersOutput, FetchError> {
        let body = serde_json::to_vec(&GetParametersRequest {
            names,
            with_decryption,
        })
        .map_err(|e| FetchError::Other(e.to_string()))?;

        let headers = [
            ("content-type", CONTENT_TYPE),
            ("x-amz-target", GET_PARAMETERS_TARGET),
        ];
        let signed = sign_request(&self.credentials, "POST", &self.endpoint, &headers, &body)?;

        let mut request = self.http.post(self.endpoint.clone());
        for (name, value) in headers {
            request = request.header(name, value);
        }
        for (name, value) in signed {
            request = request.header(name, value);
        }

        debug!(endpoint = %self.endpoint, "Sending GetParameters");
        let response = request.body(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let client = SsmClient::new(AwsSigV4Config::new("AKID", "S", "eu-west-1", SERVICE), None).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://ssm.eu-west-1.amazonaws.com/");
        assert_eq!(client.region(), "eu-west-1");
    }

    #[test]
    fn test_endpoint_override() {
        let client = SsmClient::new(
            AwsSigV4Config::new("AKID", "S", "us-east-1", SERVICE),
            Some("http://localhost:4566"),
        )
        .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:4566/");
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = SsmClient::new(AwsSigV4Config::new("AKID", "S", "us-east-1", SERVICE), Some("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, SsmEnvError::Config(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let names = vec!["/a".to_string(), "/b".to_string()];
        let body = serde_json::to_string(&GetParametersRequest {
            names: &names,
            with_decryption: true,
        })
        .unwrap();
        assert_eq!(body, r#"{"Names":["/a","/b"],"WithDecryption":true}"#);
    }

    #[test]
    fn test_decode_error_body() {
        let err = decode_error(
            400,
            br#"{"__type":"com.amazonaws.ssm#ValidationException","message":"Names must have length less than or equal to 10"}"#,
        );
        match err {
            FetchError::Service { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, "ValidationException");
                assert!(message.contains("less than or equal to 10"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_capitalised_message() {
        let err = decode_error(400, br#"{"__type":"AccessDeniedException","Message":"denied"}"#);
        assert_eq!(err.to_string(), "AccessDeniedException (HTTP 400): denied");
    }

    #[test]
    fn test_decode_error_non_json() {
        let err = decode_error(503, b"Service Unavailable");
        assert_eq!(err.to_string(), "UnknownError (HTTP 503): Service Unavailable");
    }

    #[test]
    fn test_response_shape() {
        let output: GetParametersOutput = serde_json::from_str(
            r#"{"InvalidParameters":["/missing"],"Parameters":[{"Name":"/a","Type":"String","Value":"1","Version":1}]}"#,
        )
        .unwrap();
        assert_eq!(output.parameters.len(), 1);
        assert_eq!(output.invalid_parameters, vec!["/missing".to_string()]);
    }
}
