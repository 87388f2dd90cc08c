//! Dispatch to the backend
//!
//! The backend that actually provisions disks and service accounts lives
//! behind [`DiskApi`] and [`ServiceAccountApi`]. [`Client`] validates every
//! request first, then hands it over under a [`Context`] whose cancellation
//! and deadline bound how long the backend may take.
//!
//! # Example
//!
//! ```ignore
//! use cloudapi::rpc::{Client, Context};
//! use cloudapi::disk::DiskCreate;
//!
//! async fn example<B: cloudapi::rpc::DiskApi>(backend: B) -> cloudapi::Result<()> {
//!     let client = Client::new(backend);
//!     let ctx = Context::background().with_timeout(std::time::Duration::from_secs(10));
//!     let mut req = DiskCreate { location: "bkk".into(), project: "acme".into(), name: "data".into(), size: 10 };
//!     client.create_disk(&ctx, &mut req).await?;
//!     Ok(())
//! }
//! ```

use crate::disk::{
    DiskCreate, DiskDelete, DiskGet, DiskItem, DiskList, DiskListResult, DiskMetrics,
    DiskMetricsResult, DiskUpdate,
};
use crate::error::{Error, Result};
use crate::service_account::{
    ServiceAccountCreate, ServiceAccountCreateKey, ServiceAccountDelete, ServiceAccountDeleteKey,
    ServiceAccountGet, ServiceAccountGetResult, ServiceAccountList, ServiceAccountListResult,
    ServiceAccountUpdate,
};
use crate::types::Empty;
use crate::validator::Validate;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline for one call chain
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Child context, cancelled together with its parent or on its own
    pub fn with_cancel(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Child context whose deadline is the earlier of the parent's and `now + timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(d) if d < deadline => d,
            _ => deadline,
        };
        Self {
            cancel: self.cancel.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why this context is already done, if it is
    pub fn err(&self) -> Option<Error> {
        if self.is_cancelled() {
            return Some(Error::Canceled);
        }
        match self.deadline {
            Some(d) if d <= Instant::now() => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` until it completes or this context ends, whichever comes first
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let deadline = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!("dispatch canceled");
                Err(Error::Canceled)
            }
            _ = deadline => {
                tracing::warn!("dispatch deadline exceeded");
                Err(Error::DeadlineExceeded)
            }
            res = fut => res.map_err(Error::Backend),
        }
    }
}

/// Backend for disk operations
pub trait DiskApi {
    fn create(&self, ctx: &Context, m: &DiskCreate) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    fn get(&self, ctx: &Context, m: &DiskGet) -> impl Future<Output = anyhow::Result<DiskItem>> + Send;
    fn list(&self, ctx: &Context, m: &DiskList) -> impl Future<Output = anyhow::Result<DiskListResult>> + Send;
    fn update(&self, ctx: &Context, m: &DiskUpdate) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    fn delete(&self, ctx: &Context, m: &DiskDelete) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    fn metrics(
        &self,
        ctx: &Context,
        m: &DiskMetrics,
    ) -> impl Future<Output = anyhow::Result<DiskMetricsResult>> + Send;
}

/// Backend for service-account operations
pub trait ServiceAccountApi {
    fn create(
        &self,
        ctx: &Context,
        m: &ServiceAccountCreate,
    ) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    fn get(
        &self,
        ctx: &Context,
        m: &ServiceAccountGet,
    ) -> impl Future<Output = anyhow::Result<ServiceAccountGetResult>> + Send;
    fn list(
        &self,
        ctx: &Context,
        m: &ServiceAccountList,
    ) -> impl Future<Output = anyhow::Result<ServiceAccountListResult>> + Send;
    fn update(
        &self,
        ctx: &Context,
        m: &ServiceAccountUpdate,
    ) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    fn delete(
        &self,
        ctx: &Context,
        m: &ServiceAccountDelete,
    ) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    /// Issues a new key for the account
    fn create_key(
        &self,
        ctx: &Context,
        m: &ServiceAccountCreateKey,
    ) -> impl Future<Output = anyhow::Result<Empty>> + Send;
    fn delete_key(
        &self,
        ctx: &Context,
        m: &ServiceAccountDeleteKey,
    ) -> impl Future<Output = anyhow::Result<Empty>> + Send;
}

/// Validates requests before they reach the backend
#[derive(Debug, Clone)]
pub struct Client<B> {
    backend: B,
}

/// Run the request's own checks, logging the rejection
fn check<M: Validate>(method: &str, m: &mut M) -> Result<()> {
    tracing::debug!("invoke: method={}", method);
    if let Err(err) = m.validate() {
        tracing::debug!("rejected {}: {}", method, err);
        return Err(err);
    }
    Ok(())
}

impl<B> Client<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: DiskApi> Client<B> {
    pub async fn create_disk(&self, ctx: &Context, m: &mut DiskCreate) -> Result<Empty> {
        check("disk.create", m)?;
        ctx.run(DiskApi::create(&self.backend, ctx, m)).await
    }

    pub async fn get_disk(&self, ctx: &Context, m: &mut DiskGet) -> Result<DiskItem> {
        check("disk.get", m)?;
        ctx.run(DiskApi::get(&self.backend, ctx, m)).await
    }

    pub async fn list_disks(&self, ctx: &Context, m: &mut DiskList) -> Result<DiskListResult> {
        check("disk.list", m)?;
        ctx.run(DiskApi::list(&self.backend, ctx, m)).await
    }

    pub async fn update_disk(&self, ctx: &Context, m: &mut DiskUpdate) -> Result<Empty> {
        check("disk.update", m)?;
        ctx.run(DiskApi::update(&self.backend, ctx, m)).await
    }

    pub async fn delete_disk(&self, ctx: &Context, m: &mut DiskDelete) -> Result<Empty> {
        check("disk.delete", m)?;
        ctx.run(DiskApi::delete(&self.backend, ctx, m)).await
    }

    pub async fn disk_metrics(&self, ctx: &Context, m: &mut DiskMetrics) -> Result<DiskMetricsResult> {
        check("disk.metrics", m)?;
        ctx.run(DiskApi::metrics(&self.backend, ctx, m)).await
    }
}

impl<B: ServiceAccountApi> Client<B> {
    pub async fn create_service_account(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountCreate,
    ) -> Result<Empty> {
        check("serviceAccount.create", m)?;
        ctx.run(ServiceAccountApi::create(&self.backend, ctx, m)).await
    }

    pub async fn get_service_account(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountGet,
    ) -> Result<ServiceAccountGetResult> {
        check("serviceAccount.get", m)?;
        ctx.run(ServiceAccountApi::get(&self.backend, ctx, m)).await
    }

    pub async fn list_service_accounts(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountList,
    ) -> Result<ServiceAccountListResult> {
        check("serviceAccount.list", m)?;
        ctx.run(ServiceAccountApi::list(&self.backend, ctx, m)).await
    }

    pub async fn update_service_account(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountUpdate,
    ) -> Result<Empty> {
        check("serviceAccount.update", m)?;
        ctx.run(ServiceAccountApi::update(&self.backend, ctx, m)).await
    }

    pub async fn delete_service_account(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountDelete,
    ) -> Result<Empty> {
        check("serviceAccount.delete", m)?;
        ctx.run(ServiceAccountApi::delete(&self.backend, ctx, m)).await
    }

    pub async fn create_service_account_key(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountCreateKey,
    ) -> Result<Empty> {
        check("serviceAccount.createKey", m)?;
        ctx.run(ServiceAccountApi::create_key(&self.backend, ctx, m)).await
    }

    pub async fn delete_service_account_key(
        &self,
        ctx: &Context,
        m: &mut ServiceAccountDeleteKey,
    ) -> Result<Empty> {
        check("serviceAccount.deleteKey", m)?;
        ctx.run(ServiceAccountApi::delete_key(&self.backend, ctx, m)).await
    }
}
