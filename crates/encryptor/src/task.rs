//! Running encryptor operations from async code.
//!
//! PBKDF2 is CPU-bound and deliberately slow, so it must not run on an async
//! worker thread. [`OffloadedEncryptor`] moves each call onto Tokio's blocking
//! pool and optionally bounds how long the caller waits.
//!
//! A timeout only stops the *wait*: the blocking call itself runs to
//! completion in the background and its result is discarded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::{Embedding, EncryptorError};
use thiserror::Error;
use tokio::task::JoinError;
use zeroize::Zeroizing;

use crate::config::EncryptorConfig;
use crate::crypto::{EncryptionKey, EntropySource, OsEntropy};
use crate::encryptor::EmbeddingEncryptor;

/// Errors from an offloaded operation.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The operation itself failed.
    #[error(transparent)]
    Encryptor(#[from] EncryptorError),

    /// No result arrived within the configured limit.
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),

    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] JoinError),
}

/// Run `op` on the blocking pool, waiting at most `timeout` for it.
///
/// # Errors
///
/// Returns [`TaskError::TimedOut`] when the limit elapses first,
/// [`TaskError::Join`] if `op` panicked, or the operation's own error.
pub async fn run_blocking<T, F>(op: F, timeout: Option<Duration>) -> Result<T, TaskError>
where
    F: FnOnce() -> common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(op);
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, handle)
            .await
            .map_err(|_| TaskError::TimedOut(limit))?,
        None => handle.await,
    };
    Ok(joined??)
}

/// A shareable [`EmbeddingEncryptor`] whose operations run off the async
/// executor.
///
/// Cloning is cheap; clones share the same encryptor.
#[derive(Debug)]
pub struct OffloadedEncryptor<R = OsEntropy> {
    inner: Arc<EmbeddingEncryptor<R>>,
    timeout: Option<Duration>,
}

impl<R> Clone for OffloadedEncryptor<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: self.timeout,
        }
    }
}

impl OffloadedEncryptor<OsEntropy> {
    /// Build from configuration: iteration count and timeout.
    ///
    /// # Errors
    ///
    /// Propagates [`EmbeddingEncryptor::from_config`] errors.
    pub fn from_config(cfg: &EncryptorConfig) -> common::Result<Self> {
        Ok(Self::new(EmbeddingEncryptor::from_config(cfg)?, cfg.task_timeout()))
    }
}

impl<R: EntropySource + 'static> OffloadedEncryptor<R> {
    pub fn new(encryptor: EmbeddingEncryptor<R>, timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(encryptor),
            timeout,
        }
    }

    pub fn encryptor(&self) -> &EmbeddingEncryptor<R> {
        &self.inner
    }

    fn run<T, F>(&self, op: F) -> impl Future<Output = Result<T, TaskError>>
    where
        F: FnOnce(&EmbeddingEncryptor<R>) -> common::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        run_blocking(move || op(&*inner), self.timeout)
    }

    pub async fn encrypt_embedding(
        &self,
        embedding: Embedding,
        password: String,
    ) -> Result<String, TaskError> {
        let password = Zeroizing::new(password);
        self.run(move |enc| enc.encrypt_embedding(&embedding, &password))
            .await
    }

    pub async fn decrypt_embeddings(
        &self,
        envelope: String,
        password: String,
    ) -> Result<Embedding, TaskError> {
        let password = Zeroizing::new(password);
        self.run(move |enc| enc.decrypt_embeddings(&envelope, &password))
            .await
    }

    pub async fn change_password(
        &self,
        envelope: String,
        old_password: String,
        new_password: String,
    ) -> Result<String, TaskError> {
        let old_password = Zeroizing::new(old_password);
        let new_password = Zeroizing::new(new_password);
        self.run(move |enc| enc.change_password(&envelope, &old_password, &new_password))
            .await
    }

    /// [`EmbeddingEncryptor::verify_password`] off the executor.
    ///
    /// Only a timeout or a failed blocking task is an error; a wrong password
    /// or a malformed envelope yields `Ok(false)`.
    pub async fn verify_password(
        &self,
        envelope: String,
        password: String,
    ) -> Result<bool, TaskError> {
        let password = Zeroizing::new(password);
        self.run(move |enc| Ok(enc.verify_password(&envelope, &password)))
            .await
    }

    pub async fn encrypt_embedding_with_key(
        &self,
        embedding: Embedding,
        key: EncryptionKey,
    ) -> Result<String, TaskError> {
        self.run(move |enc| enc.encrypt_embedding_with_key(&embedding, &key))
            .await
    }

    pub async fn decrypt_embedding_with_key(
        &self,
        envelope: String,
        key: EncryptionKey,
    ) -> Result<Embedding, TaskError> {
        self.run(move |enc| enc.decrypt_embedding_with_key(&envelope, &key))
            .await
    }
}
