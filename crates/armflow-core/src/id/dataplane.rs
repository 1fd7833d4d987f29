//! Data-plane identifiers for storage endpoints
//!
//! These are HTTPS URLs rather than ARM paths:
//! `https://{account}.{service}.{domainSuffix}/{name}`.

use crate::environment::Environment;
use crate::error::{IdError, Result};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::fmt;
use url::Url;

/// Characters escaped inside one path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataPlaneService {
    Blob,
    Dfs,
    File,
    Queue,
    Table,
}

impl DataPlaneService {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataPlaneService::Blob => "blob",
            DataPlaneService::Dfs => "dfs",
            DataPlaneService::File => "file",
            DataPlaneService::Queue => "queue",
            DataPlaneService::Table => "table",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            DataPlaneService::Blob => "Storage Container",
            DataPlaneService::Dfs => "Storage Data Lake Gen2 Filesystem",
            DataPlaneService::File => "Storage Share",
            DataPlaneService::Queue => "Storage Queue",
            DataPlaneService::Table => "Storage Table",
        }
    }
}

impl fmt::Display for DataPlaneService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The service endpoint of one storage account
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountEndpoint {
    pub account_name: String,
    pub service: DataPlaneService,
    pub domain_suffix: String,
}

impl AccountEndpoint {
    pub fn new(
        account_name: impl Into<String>,
        service: DataPlaneService,
        environment: &Environment,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            service,
            domain_suffix: environment.storage_suffix.to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!(
            "https://{}.{}.{}",
            self.account_name, self.service, self.domain_suffix
        )
    }

    /// Parse an endpoint URL; any path must be empty.
    pub fn parse(input: &str, service: DataPlaneService, environment: &Environment) -> Result<Self> {
        let (endpoint, path) = parse_url(input, service, environment)?;
        if !path.is_empty() {
            return Err(invalid(
                service,
                input,
                format!("expected no path but got {:?}", path.join("/")),
            ));
        }
        Ok(endpoint)
    }
}

/// A named resource directly under an endpoint: share, queue, table or container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPlaneId {
    pub endpoint: AccountEndpoint,
    pub name: String,
}

impl DataPlaneId {
    pub fn new(endpoint: AccountEndpoint, name: impl Into<String>) -> Self {
        Self {
            endpoint,
            name: name.into(),
        }
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.endpoint.url(), encode_segment(&self.name))
    }

    pub fn parse(input: &str, service: DataPlaneService, environment: &Environment) -> Result<Self> {
        let (endpoint, path) = parse_url(input, service, environment)?;
        match path.as_slice() {
            [name] => Ok(Self {
                endpoint,
                name: name.clone(),
            }),
            [] => Err(invalid(service, input, "missing the resource name".to_string())),
            _ => Err(invalid(
                service,
                input,
                format!("expected a single path segment but got {:?}", path.join("/")),
            )),
        }
    }
}

impl fmt::Display for DataPlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Account {:?} / Name {:?})",
            self.endpoint.service.description(),
            self.endpoint.account_name,
            self.name
        )
    }
}

/// A blob inside a container; the blob name may contain `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobId {
    pub endpoint: AccountEndpoint,
    pub container_name: String,
    pub blob_name: String,
}

impl BlobId {
    pub fn new(
        endpoint: AccountEndpoint,
        container_name: impl Into<String>,
        blob_name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            container_name: container_name.into(),
            blob_name: blob_name.into(),
        }
    }

    pub fn id(&self) -> String {
        let blob: Vec<String> = self.blob_name.split('/').map(encode_segment).collect();
        format!(
            "{}/{}/{}",
            self.endpoint.url(),
            encode_segment(&self.container_name),
            blob.join("/")
        )
    }

    pub fn parse(input: &str, environment: &Environment) -> Result<Self> {
        let service = DataPlaneService::Blob;
        let (endpoint, path) = parse_url(input, service, environment)?;
        match path.split_first() {
            Some((container, rest)) if !rest.is_empty() => Ok(Self {
                endpoint,
                container_name: container.clone(),
                blob_name: rest.join("/"),
            }),
            _ => Err(invalid(
                service,
                input,
                "expected a container and a blob name".to_string(),
            )),
        }
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Storage Blob (Account {:?} / Container {:?} / Name {:?})",
            self.endpoint.account_name, self.container_name, self.blob_name
        )
    }
}

fn invalid(service: DataPlaneService, input: &str, reason: String) -> IdError {
    IdError::InvalidUrl {
        description: service.description(),
        input: input.to_string(),
        reason,
    }
}

/// Validate scheme and host, returning the endpoint plus the decoded path segments.
///
/// A bare `/` path is no path at all; any other empty segment is an error.
fn parse_url(
    input: &str,
    service: DataPlaneService,
    environment: &Environment,
) -> Result<(AccountEndpoint, Vec<String>)> {
    let url = Url::parse(input).map_err(|e| invalid(service, input, e.to_string()))?;

    if url.scheme() != "https" {
        return Err(invalid(
            service,
            input,
            format!("expected scheme `https` but got `{}`", url.scheme()),
        ));
    }

    let host = url
        .host_str()
        .ok_or_else(|| invalid(service, input, "missing host".to_string()))?;

    let (account_name, rest) = host
        .split_once('.')
        .ok_or_else(|| invalid(service, input, format!("unexpected host {host:?}")))?;

    let suffix = match rest.split_once('.') {
        Some((found_service, suffix)) if found_service == service.as_str() => suffix,
        _ => {
            return Err(invalid(
                service,
                input,
                format!("expected host `<account>.{service}.<suffix>` but got {host:?}"),
            ));
        }
    };

    if suffix != environment.storage_suffix {
        return Err(IdError::DomainSuffixMismatch {
            input: input.to_string(),
            environment: environment.name.to_string(),
            expected: environment.storage_suffix.to_string(),
            found: suffix.to_string(),
        });
    }

    let mut path = Vec::new();
    if url.path() != "/" {
        for segment in url.path_segments().into_iter().flatten() {
            if segment.is_empty() {
                return Err(invalid(
                    service,
                    input,
                    format!("empty path segment in {:?}", url.path()),
                ));
            }
            let decoded = percent_decode_str(segment)
                .decode_utf8()
                .map_err(|e| invalid(service, input, format!("path segment {segment:?}: {e}")))?;
            path.push(decoded.into_owned());
        }
    }

    Ok((
        AccountEndpoint {
            account_name: account_name.to_string(),
            service,
            domain_suffix: suffix.to_string(),
        },
        path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url_round_trip() {
        let env = Environment::public();
        let id = DataPlaneId::new(AccountEndpoint::new("acct1", DataPlaneService::File, &env), "share1");
        assert_eq!(id.id(), "https://acct1.file.core.windows.net/share1");
        assert_eq!(DataPlaneId::parse(&id.id(), DataPlaneService::File, &env).unwrap(), id);
        assert_eq!(id.to_string(), r#"Storage Share (Account "acct1" / Name "share1")"#);
    }

    #[test]
    fn test_wrong_environment_suffix() {
        let err = DataPlaneId::parse(
            "https://acct1.queue.core.windows.net/queue1",
            DataPlaneService::Queue,
            &Environment::china(),
        )
        .unwrap_err();
        assert!(matches!(err, IdError::DomainSuffixMismatch { .. }));
    }

    #[test]
    fn test_wrong_service() {
        let err = DataPlaneId::parse(
            "https://acct1.blob.core.windows.net/queue1",
            DataPlaneService::Queue,
            &Environment::public(),
        )
        .unwrap_err();
        assert!(matches!(err, IdError::InvalidUrl { .. }));
    }

    #[test]
    fn test_requires_https_and_single_name() {
        let env = Environment::public();
        assert!(
            DataPlaneId::parse("http://acct1.table.core.windows.net/t1", DataPlaneService::Table, &env)
                .is_err()
        );
        assert!(
            DataPlaneId::parse("https://acct1.table.core.windows.net/", DataPlaneService::Table, &env)
                .is_err()
        );
        assert!(
            DataPlaneId::parse("https://acct1.table.core.windows.net/a/b", DataPlaneService::Table, &env)
                .is_err()
        );
    }

    #[test]
    fn test_blob_with_nested_path() {
        let env = Environment::us_government();
        let id = BlobId::parse(
            "https://acct1.blob.core.usgovcloudapi.net/container1/dir/file.txt",
            &env,
        )
        .unwrap();
        assert_eq!(id.container_name, "container1");
        assert_eq!(id.blob_name, "dir/file.txt");
        assert_eq!(
            id.id(),
            "https://acct1.blob.core.usgovcloudapi.net/container1/dir/file.txt"
        );
        assert!(BlobId::parse("https://acct1.blob.core.usgovcloudapi.net/container1", &env).is_err());
    }

    #[test]
    fn test_escaped_names_round_trip() {
        let env = Environment::public();
        let endpoint = AccountEndpoint::new("acct1", DataPlaneService::Blob, &env);

        let id = BlobId::new(endpoint.clone(), "c1", "reports/my file #1.txt");
        assert_eq!(
            id.id(),
            "https://acct1.blob.core.windows.net/c1/reports/my%20file%20%231.txt"
        );
        assert_eq!(BlobId::parse(&id.id(), &env).unwrap(), id);

        let parsed = BlobId::parse("https://acct1.blob.core.windows.net/c1/my file.txt", &env).unwrap();
        assert_eq!(parsed.blob_name, "my file.txt");

        let percent = BlobId::new(endpoint, "c1", "50%off");
        assert_eq!(BlobId::parse(&percent.id(), &env).unwrap(), percent);
    }

    #[test]
    fn test_empty_path_segments_are_rejected() {
        let env = Environment::public();
        assert!(matches!(
            BlobId::parse("https://acct1.blob.core.windows.net/c1//file.txt", &env),
            Err(IdError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BlobId::parse("https://acct1.blob.core.windows.net/c1/file.txt/", &env),
            Err(IdError::InvalidUrl { .. })
        ));
        assert!(
            AccountEndpoint::parse("https://acct1.blob.core.windows.net/", DataPlaneService::Blob, &env)
                .is_ok()
        );
    }

    #[test]
    fn test_account_endpoint() {
        let env = Environment::public();
        let endpoint =
            AccountEndpoint::parse("https://acct1.dfs.core.windows.net", DataPlaneService::Dfs, &env)
                .unwrap();
        assert_eq!(endpoint.account_name, "acct1");
        assert_eq!(endpoint.url(), "https://acct1.dfs.core.windows.net");
    }
}
