//! Remote lookup seam

use async_trait::async_trait;
use shaproof_errors::Error;
use shaproof_net::GitHubClient;
use shaproof_types::{CommitDetails, FileLookup, Identifier, ObjectLookup, RepositoryRef};

/// Read-only questions the verifier asks a hosting provider
///
/// Implementations decode provider responses into typed results. Any
/// failure to obtain an answer must be returned as `Error::Network` so the
/// run is reported inconclusive instead of failed.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    /// Resolve `identifier` in `repo`'s object database
    async fn resolve_object(
        &self,
        repo: &RepositoryRef,
        identifier: &Identifier,
    ) -> Result<ObjectLookup, Error>;

    /// Look up `path` at `reference`, or at the default branch when `None`
    async fn file_at(
        &self,
        repo: &RepositoryRef,
        reference: Option<&str>,
        path: &str,
    ) -> Result<FileLookup, Error>;

    /// Fetch the message and changed files of the commit `sha`
    async fn commit_details(
        &self,
        repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CommitDetails, Error>;
}

#[async_trait]
impl RemoteLookup for GitHubClient {
    async fn resolve_object(
        &self,
        repo: &RepositoryRef,
        identifier: &Identifier,
    ) -> Result<ObjectLookup, Error> {
        self.lookup_object(repo, identifier).await
    }

    async fn file_at(
        &self,
        repo: &RepositoryRef,
        reference: Option<&str>,
        path: &str,
    ) -> Result<FileLookup, Error> {
        self.lookup_file(repo, reference, path).await
    }

    async fn commit_details(
        &self,
        repo: &RepositoryRef,
        sha: &str,
    ) -> Result<CommitDetails, Error> {
        self.lookup_commit_details(repo, sha).await
    }
}
