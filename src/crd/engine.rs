//! # Secret Engine Backends
//!
//! Backend configuration types for the GCP, AWS, Azure and Database secret engines.

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Secret engine backend configuration
/// Exactly one backend is set.
/// Kubernetes sends data in format: {"gcp": {...}}
/// We use externally tagged format and ignore unknown keys during deserialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SecretEngineConfiguration {
    /// Google Cloud secrets engine
    #[serde(rename = "gcp")]
    Gcp(GcpConfiguration),
    /// AWS secrets engine
    #[serde(rename = "aws")]
    Aws(AwsConfiguration),
    /// Azure secrets engine
    #[serde(rename = "azure")]
    Azure(AzureConfiguration),
    /// Database secrets engine
    #[serde(rename = "database")]
    Database(DatabaseConfiguration),
}

impl SecretEngineConfiguration {
    /// Engine kind of the configured backend
    pub fn kind(&self) -> EngineKind {
        match self {
            SecretEngineConfiguration::Gcp(_) => EngineKind::Gcp,
            SecretEngineConfiguration::Aws(_) => EngineKind::Aws,
            SecretEngineConfiguration::Azure(_) => EngineKind::Azure,
            SecretEngineConfiguration::Database(_) => EngineKind::Database,
        }
    }
}

/// Visits a backend map; `None` when it names no supported backend
struct BackendVisitor;

impl<'de> serde::de::Visitor<'de> for BackendVisitor {
    type Value = Option<SecretEngineConfiguration>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a secret engine backend object with gcp, aws, azure, or database field")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: serde::de::MapAccess<'de>,
    {
        use serde::de::Error;

        let mut gcp: Option<GcpConfiguration> = None;
        let mut aws: Option<AwsConfiguration> = None;
        let mut azure: Option<AzureConfiguration> = None;
        let mut database: Option<DatabaseConfiguration> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "gcp" => {
                    if gcp.is_some() {
                        return Err(M::Error::duplicate_field("gcp"));
                    }
                    gcp = Some(map.next_value()?);
                }
                "aws" => {
                    if aws.is_some() {
                        return Err(M::Error::duplicate_field("aws"));
                    }
                    aws = Some(map.next_value()?);
                }
                "azure" => {
                    if azure.is_some() {
                        return Err(M::Error::duplicate_field("azure"));
                    }
                    azure = Some(map.next_value()?);
                }
                "database" => {
                    if database.is_some() {
                        return Err(M::Error::duplicate_field("database"));
                    }
                    database = Some(map.next_value()?);
                }
                _ => {
                    let _: serde::de::IgnoredAny = map.next_value()?;
                }
            }
        }

        match (gcp, aws, azure, database) {
            (Some(config), None, None, None) => Ok(Some(SecretEngineConfiguration::Gcp(config))),
            (None, Some(config), None, None) => Ok(Some(SecretEngineConfiguration::Aws(config))),
            (None, None, Some(config), None) => Ok(Some(SecretEngineConfiguration::Azure(config))),
            (None, None, None, Some(config)) => {
                Ok(Some(SecretEngineConfiguration::Database(config)))
            }
            (None, None, None, None) => Ok(None),
            _ => Err(M::Error::custom("multiple secret engine backends specified")),
        }
    }
}

impl<'de> serde::Deserialize<'de> for SecretEngineConfiguration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer
            .deserialize_map(BackendVisitor)?
            .ok_or_else(|| serde::de::Error::missing_field("gcp, aws, azure, or database"))
    }
}

/// Deserialize `spec.backend`
///
/// A missing, null, empty or unsupported-only backend becomes `None` so the
/// resource still parses and policy construction reports the problem. Two
/// supported backends are still rejected here.
pub(crate) fn deserialize_backend<'de, D>(
    deserializer: D,
) -> Result<Option<SecretEngineConfiguration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct OptionalBackend(Option<SecretEngineConfiguration>);

    impl<'de> serde::Deserialize<'de> for OptionalBackend {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_map(BackendVisitor).map(OptionalBackend)
        }
    }

    Ok(Option::<OptionalBackend>::deserialize(deserializer)?.and_then(|backend| backend.0))
}

impl JsonSchema for SecretEngineConfiguration {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("SecretEngineConfiguration")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        // Structural schema for Kubernetes CRD: one optional property per backend.
        // The one-of rule is enforced by the deserializer.
        let schema_value = serde_json::json!({
            "type": "object",
            "description": "Secret engine backend. Exactly one of gcp, aws, azure or database must be set.",
            "properties": {
                "gcp": generator.subschema_for::<GcpConfiguration>(),
                "aws": generator.subschema_for::<AwsConfiguration>(),
                "azure": generator.subschema_for::<AzureConfiguration>(),
                "database": generator.subschema_for::<DatabaseConfiguration>(),
            }
        });
        Schema::try_from(schema_value)
            .expect("Failed to create Schema for SecretEngineConfiguration")
    }
}

/// Kind of secret engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Gcp,
    Aws,
    Azure,
    Database,
}

impl EngineKind {
    pub const ALL: [EngineKind; 4] = [
        EngineKind::Gcp,
        EngineKind::Aws,
        EngineKind::Azure,
        EngineKind::Database,
    ];

    /// Canonical mount path used when the resource does not set one
    pub fn default_path(self) -> &'static str {
        match self {
            EngineKind::Gcp => "gcp",
            EngineKind::Aws => "aws",
            EngineKind::Azure => "azure",
            EngineKind::Database => "database",
        }
    }

    /// Get kind string for logs and metrics
    pub fn as_str(self) -> &'static str {
        self.default_path()
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcp" => Ok(EngineKind::Gcp),
            "aws" => Ok(EngineKind::Aws),
            "azure" => Ok(EngineKind::Azure),
            "database" | "db" => Ok(EngineKind::Database),
            other => Err(format!(
                "unsupported secret engine kind '{other}'. Expected: gcp, aws, azure, or database"
            )),
        }
    }
}

/// GCP secrets engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GcpConfiguration {
    /// Kubernetes secret holding the GCP service account key (`sa.json`)
    #[serde(default)]
    pub credential_secret: Option<String>,
    /// Default lease TTL for generated credentials (e.g. "1h")
    #[serde(default)]
    pub ttl: Option<String>,
    /// Maximum lease TTL for generated credentials
    #[serde(default, rename = "maxTTL")]
    pub max_ttl: Option<String>,
}

/// AWS secrets engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwsConfiguration {
    /// Kubernetes secret holding `access_key` and `secret_key`
    #[serde(default)]
    pub credential_secret: Option<String>,
    /// AWS region (e.g. "us-east-1")
    #[serde(default)]
    pub region: Option<String>,
    /// Custom IAM endpoint
    #[serde(default)]
    pub iam_endpoint: Option<String>,
    /// Custom STS endpoint
    #[serde(default)]
    pub sts_endpoint: Option<String>,
    /// Number of retries for AWS API calls
    #[serde(default)]
    pub max_retries: Option<i32>,
    /// Lease settings for generated credentials
    #[serde(default)]
    pub lease_config: Option<LeaseConfig>,
}

/// Lease configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaseConfig {
    /// Default lease (e.g. "1h")
    pub lease: String,
    /// Maximum lease
    pub lease_max: String,
}

/// Azure secrets engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AzureConfiguration {
    /// Kubernetes secret holding subscription, tenant and client credentials
    #[serde(default)]
    pub credential_secret: Option<String>,
    /// Azure environment (e.g. "AzurePublicCloud")
    #[serde(default)]
    pub environment: Option<String>,
}

/// Database secrets engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfiguration {
    /// Reference to the database the engine connects to
    #[serde(default)]
    pub database_ref: Option<DatabaseRef>,
    /// Vault database plugin (e.g. "postgresql-database-plugin")
    #[serde(default)]
    pub plugin_name: Option<String>,
    /// Roles allowed to use this connection
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

/// Database reference
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRef {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}
