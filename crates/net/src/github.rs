//! GitHub REST adapter
//!
//! Translates provider responses into `ObjectLookup` and `FileLookup` so that
//! nothing above this layer sees status codes or JSON. Anything that prevents
//! a definitive answer is returned as a `NetworkError`.

use std::collections::BTreeSet;

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shaproof_errors::{ConfigError, Error, NetworkError};
use shaproof_types::{
    CommitDetails, FileLookup, Identifier, ObjectKind, ObjectLookup, RepositoryRef,
};
use url::Url;

use crate::NetClient;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Object kinds probed when a hash names something other than a commit
const OBJECT_PROBES: [(ObjectKind, &str); 3] = [
    (ObjectKind::Tree, "trees"),
    (ObjectKind::Blob, "blobs"),
    (ObjectKind::Tag, "tags"),
];

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    #[serde(default)]
    commit: Option<CommitBody>,
    #[serde(default)]
    files: Vec<CommitFile>,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommitFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    /// Directory listing
    Listing(Vec<serde_json::Value>),
    Entry(ContentEntry),
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
}

/// Client for the subset of the GitHub API used during verification
#[derive(Clone)]
pub struct GitHubClient {
    net: NetClient,
    api_base: Url,
    headers: HeaderMap,
}

impl GitHubClient {
    /// Create a client rooted at `api_url`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `api_url` is not an absolute
    /// http(s) URL.
    pub fn new(net: NetClient, api_url: &str) -> Result<Self, Error> {
        let api_base = Url::parse(api_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base() && matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "api_url".to_string(),
                value: api_url.to_string(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        Ok(Self {
            net,
            api_base,
            headers,
        })
    }

    /// Authenticate every request with a bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be sent as a header value.
    pub fn with_token(mut self, token: &str) -> Result<Self, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| NetworkError::RequestFailed("token contains invalid characters".into()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Resolve an identifier to the object it names
    ///
    /// Full hashes are looked up directly. Abbreviations are first resolved
    /// by the commits endpoint, which sees every branch; commit search is only
    /// consulted to count candidates when the provider refuses to pick one.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` when the provider cannot answer, including
    /// when the repository is private or missing.
    pub async fn lookup_object(
        &self,
        repo: &RepositoryRef,
        identifier: &Identifier,
    ) -> Result<ObjectLookup, Error> {
        if identifier.is_full_hash() {
            self.lookup_full_hash(repo, identifier.normalized()).await
        } else {
            self.resolve_abbreviation(repo, identifier.normalized())
                .await
        }
    }

    /// Fetch message and touched files of a commit
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` when the provider cannot answer or no longer
    /// knows the commit.
    pub async fn lookup_commit_details(
        &self,
        repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CommitDetails, Error> {
        let url = self.repo_endpoint(repo, &["commits", sha])?;
        let response = self.send(&url).await?;
        match response.status() {
            StatusCode::OK => {
                let commit: CommitResponse = decode(response, &url).await?;
                Ok(CommitDetails {
                    sha: commit.sha.to_ascii_lowercase(),
                    message: commit.commit.map(|c| c.message).unwrap_or_default(),
                    files: commit.files.into_iter().map(|f| f.filename).collect(),
                })
            }
            status => Err(unexpected_status(status, &url)),
        }
    }

    /// Look up a file at a reference, or at the default branch when `reference` is `None`
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` when the provider cannot answer.
    pub async fn lookup_file(
        &self,
        repo: &RepositoryRef,
        reference: Option<&str>,
        path: &str,
    ) -> Result<FileLookup, Error> {
        let mut segments = vec!["contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.repo_endpoint(repo, &segments)?;
        if let Some(reference) = reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }

        let response = self.send(&url).await?;
        match response.status() {
            StatusCode::OK => match decode::<ContentsResponse>(response, &url).await? {
                ContentsResponse::Listing(_) => Ok(FileLookup::Absent),
                ContentsResponse::Entry(entry) => Ok(file_from_entry(entry)),
            },
            StatusCode::NOT_FOUND => Ok(FileLookup::Absent),
            status => Err(unexpected_status(status, &url)),
        }
    }

    async fn lookup_full_hash(&self, repo: &RepositoryRef, sha: &str) -> Result<ObjectLookup, Error> {
        let url = self.repo_endpoint(repo, &["commits", sha])?;
        let response = self.send(&url).await?;

        match response.status() {
            StatusCode::OK => {
                let commit: CommitResponse = decode(response, &url).await?;
                Ok(ObjectLookup::Commit {
                    sha: commit.sha.to_ascii_lowercase(),
                })
            }
            // GitHub answers 422 for hashes that are not commits in this repository
            StatusCode::UNPROCESSABLE_ENTITY => self.probe_object_kind(repo, sha).await,
            StatusCode::NOT_FOUND => {
                self.ensure_repository(repo).await?;
                Ok(ObjectLookup::NotFound)
            }
            status => Err(unexpected_status(status, &url)),
        }
    }

    async fn probe_object_kind(&self, repo: &RepositoryRef, sha: &str) -> Result<ObjectLookup, Error> {
        for (kind, endpoint) in OBJECT_PROBES {
            let url = self.repo_endpoint(repo, &["git", endpoint, sha])?;
            let response = self.send(&url).await?;
            match response.status() {
                StatusCode::OK => {
                    tracing::debug!(%repo, sha, %kind, "hash names a non-commit object");
                    return Ok(ObjectLookup::OtherObject {
                        kind,
                        sha: sha.to_string(),
                    });
                }
                StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {}
                status => return Err(unexpected_status(status, &url)),
            }
        }
        Ok(ObjectLookup::NotFound)
    }

    async fn resolve_abbreviation(
        &self,
        repo: &RepositoryRef,
        prefix: &str,
    ) -> Result<ObjectLookup, Error> {
        let url = self.repo_endpoint(repo, &["commits", prefix])?;
        let response = self.send(&url).await?;

        match response.status() {
            StatusCode::OK => {
                let commit: CommitResponse = decode(response, &url).await?;
                let sha = commit.sha.to_ascii_lowercase();
                // A branch or tag named like the prefix resolves to an unrelated commit
                if sha.starts_with(prefix) {
                    Ok(ObjectLookup::Commit { sha })
                } else {
                    tracing::debug!(%repo, prefix, %sha, "prefix resolved as a ref name");
                    self.search_abbreviation(repo, prefix).await
                }
            }
            // No unique commit: either nothing matches or several do
            StatusCode::UNPROCESSABLE_ENTITY => self.search_abbreviation(repo, prefix).await,
            StatusCode::NOT_FOUND => {
                self.ensure_repository(repo).await?;
                Ok(ObjectLookup::NotFound)
            }
            status => Err(unexpected_status(status, &url)),
        }
    }

    /// Count commits whose hash begins with `prefix`
    ///
    /// Search only indexes the default branch, so an empty result is not
    /// proof of absence on its own; callers reach this after the commits
    /// endpoint already declined to resolve the prefix.
    async fn search_abbreviation(
        &self,
        repo: &RepositoryRef,
        prefix: &str,
    ) -> Result<ObjectLookup, Error> {
        let mut url = self.endpoint(&["search", "commits"])?;
        url.query_pairs_mut()
            .append_pair("q", &format!("repo:{repo} hash:{prefix}"))
            .append_pair("per_page", "100");

        let response = self.send(&url).await?;
        match response.status() {
            StatusCode::OK => {
                let search: SearchResponse = decode(response, &url).await?;
                let matches: BTreeSet<String> = search
                    .items
                    .into_iter()
                    .map(|item| item.sha.to_ascii_lowercase())
                    .filter(|sha| sha.starts_with(prefix))
                    .collect();

                let mut iter = matches.iter();
                match (iter.next(), matches.len()) {
                    (None, _) => Ok(ObjectLookup::NotFound),
                    (Some(sha), 1) => Ok(ObjectLookup::Commit { sha: sha.clone() }),
                    (Some(_), count) => Ok(ObjectLookup::Ambiguous { matches: count }),
                }
            }
            // The repository is readable but search cannot count candidates
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::NOT_FOUND => {
                tracing::debug!(%repo, prefix, "commit search unavailable for repository");
                Ok(ObjectLookup::NotFound)
            }
            status => Err(unexpected_status(status, &url)),
        }
    }

    /// Distinguish a missing commit from an unreadable repository
    async fn ensure_repository(&self, repo: &RepositoryRef) -> Result<(), Error> {
        let url = self.repo_endpoint(repo, &[])?;
        let response = self.send(&url).await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                Err(repository_unavailable(repo))
            }
            status => Err(unexpected_status(status, &url)),
        }
    }

    async fn send(&self, url: &Url) -> Result<Response, Error> {
        tracing::debug!(url = %url, "GET");
        self.net.get_with_headers(url.as_str(), &self.headers).await
    }

    fn repo_endpoint(&self, repo: &RepositoryRef, segments: &[&str]) -> Result<Url, Error> {
        let mut full = vec!["repos", repo.owner(), repo.name()];
        full.extend_from_slice(segments);
        self.endpoint(&full)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.api_base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| NetworkError::InvalidUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn file_from_entry(entry: ContentEntry) -> FileLookup {
    match entry.kind.as_str() {
        "file" => {
            let content = match (entry.encoding.as_deref(), entry.content) {
                (Some("base64"), Some(encoded)) => decode_base64_text(&encoded),
                (_, content) => content,
            };
            FileLookup::Present { content }
        }
        "symlink" | "submodule" => FileLookup::Present { content: None },
        _ => FileLookup::Absent,
    }
}

/// GitHub wraps base64 payloads at 60 columns
fn decode_base64_text(encoded: &str) -> Option<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .ok()?;
    String::from_utf8(bytes).ok()
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, Error> {
    response.json::<T>().await.map_err(|e| {
        NetworkError::UnexpectedResponse {
            url: url.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn repository_unavailable(repo: &RepositoryRef) -> Error {
    NetworkError::RepositoryUnavailable {
        repository: repo.to_string(),
    }
    .into()
}

fn unexpected_status(status: StatusCode, url: &Url) -> Error {
    tracing::debug!(url = %url, status = status.as_u16(), "unexpected status");
    NetworkError::HttpError {
        status: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    }
    .into()
}
