use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use log::debug;

use crate::error::{Error, Result};

/// A credential-resolving session backed by the AWS default provider chain.
///
/// Loading a session performs the ambient credential discovery: environment
/// variables, shared config and credentials files, container credentials,
/// and the EC2 instance metadata service, in the order the chain defines.
/// The chain and any caching it performs belong to `aws-config`; this type
/// only hands out what the chain resolves.
///
/// A `Session` is cheap to clone and may be shared across calls:
///
/// ```no_run
/// # async fn example() -> awshttp::Result<()> {
/// use awshttp::{RequestOptions, Session};
///
/// let session = Session::load().await;
/// let options = RequestOptions::new().with_session(session);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: SdkConfig,
}

impl Session {
    /// Load a session from the ambient environment.
    pub async fn load() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self { config }
    }

    /// Wrap an already loaded [`SdkConfig`].
    ///
    /// Useful when the caller configures the provider chain itself, or pins
    /// static credentials in tests.
    pub fn from_config(config: SdkConfig) -> Self {
        Self { config }
    }

    /// The underlying [`SdkConfig`].
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Resolve credentials from this session's provider chain.
    pub async fn credentials(&self) -> Result<Credentials> {
        let provider = self
            .config
            .credentials_provider()
            .ok_or_else(|| Error::credential_invalid("session has no credentials provider"))?;

        let credentials = provider.provide_credentials().await?;
        debug!("credentials resolved from provider chain");
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::SharedCredentialsProvider;

    fn static_session(session_token: Option<&str>) -> Session {
        let credentials = Credentials::new(
            "access_key_id",
            "secret_access_key",
            session_token.map(str::to_string),
            None,
            "static",
        );
        Session::from_config(
            SdkConfig::builder()
                .credentials_provider(SharedCredentialsProvider::new(credentials))
                .build(),
        )
    }

    #[tokio::test]
    async fn test_credentials_from_static_provider() {
        let _ = env_logger::builder().is_test(true).try_init();

        let session = static_session(Some("session_token"));
        let credentials = session.credentials().await.expect("must resolve");
        assert_eq!(credentials.access_key_id(), "access_key_id");
        assert_eq!(credentials.secret_access_key(), "secret_access_key");
        assert_eq!(credentials.session_token(), Some("session_token"));
    }

    #[tokio::test]
    async fn test_credentials_without_provider() {
        let session = Session::from_config(SdkConfig::builder().build());
        let err = session.credentials().await.expect_err("must fail");
        assert!(err.is_credential_error());
    }
}
