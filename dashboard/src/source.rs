//! Data sources behind the view-models
//!
//! There is no backend. `MockDataSource` stands in for one with a fixed
//! latency and an explicit failure plan, so retry and error paths can be
//! exercised like they would be against a real service.

use async_trait::async_trait;
use crm_shared::Record;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R> {
    Create(R),
    Update(R),
    Delete(Uuid),
}

impl<R: Record> Mutation<R> {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Update(_) => "update",
            Mutation::Delete(_) => "delete",
        }
    }

    pub fn target(&self) -> Uuid {
        match self {
            Mutation::Create(record) | Mutation::Update(record) => record.id(),
            Mutation::Delete(id) => *id,
        }
    }
}

#[async_trait]
pub trait DataSource<R: Record>: Send + Sync {
    async fn fetch_all(&self) -> DashboardResult<Vec<R>>;

    async fn persist(&self, mutation: Mutation<R>) -> DashboardResult<()>;
}

pub type SharedSource<R> = Arc<dyn DataSource<R>>;

/// When a mock call fails
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailurePlan {
    Never,
    Always,
    /// Fail the next `n` calls, then succeed
    FailNext(u32),
    /// Fail each call with this probability
    Rate(f64),
}

impl FailurePlan {
    fn trip(&mut self) -> bool {
        match self {
            FailurePlan::Never => false,
            FailurePlan::Always => true,
            FailurePlan::FailNext(0) => false,
            FailurePlan::FailNext(remaining) => {
                *remaining -= 1;
                true
            }
            FailurePlan::Rate(rate) => rand::thread_rng().gen_bool(rate.clamp(0.0, 1.0)),
        }
    }
}

pub struct MockDataSource<R> {
    seed: Vec<R>,
    latency: Duration,
    failures: Mutex<FailurePlan>,
    calls: AtomicUsize,
}

impl<R: Record> MockDataSource<R> {
    pub fn new(seed: Vec<R>, latency: Duration) -> Self {
        Self {
            seed,
            latency,
            failures: Mutex::new(FailurePlan::Never),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failures(self, plan: FailurePlan) -> Self {
        self.set_failures(plan);
        self
    }

    pub fn set_failures(&self, plan: FailurePlan) {
        *self.failures.lock().unwrap_or_else(PoisonError::into_inner) = plan;
    }

    /// Number of calls made so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn into_shared(self) -> SharedSource<R> {
        Arc::new(self)
    }

    async fn simulate(&self, operation: &str) -> DashboardResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        let failed = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .trip();
        if failed {
            debug!(kind = %R::KIND, operation, "simulated failure");
            return Err(DashboardError::SimulatedFailure {
                operation: format!("{} {}", R::KIND, operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> DataSource<R> for MockDataSource<R> {
    async fn fetch_all(&self) -> DashboardResult<Vec<R>> {
        self.simulate("fetch").await?;
        Ok(self.seed.clone())
    }

    async fn persist(&self, mutation: Mutation<R>) -> DashboardResult<()> {
        self.simulate(mutation.label()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crm_shared::Lead;

    #[tokio::test(start_paused = true)]
    async fn test_fetch_returns_seed_after_latency() {
        let source = MockDataSource::new(seed::leads(), Duration::from_millis(300));
        let started = tokio::time::Instant::now();

        let leads: Vec<Lead> = source.fetch_all().await.unwrap();

        assert_eq!(leads.len(), seed::leads().len());
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_next_recovers() {
        let source = MockDataSource::<Lead>::new(Vec::new(), Duration::from_millis(10))
            .with_failures(FailurePlan::FailNext(1));

        assert!(source.persist(Mutation::Delete(Uuid::new_v4())).await.is_err());
        assert!(source.persist(Mutation::Delete(Uuid::new_v4())).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_extremes() {
        let always = MockDataSource::<Lead>::new(Vec::new(), Duration::ZERO)
            .with_failures(FailurePlan::Rate(1.0));
        assert!(always.fetch_all().await.is_err());

        let never = MockDataSource::<Lead>::new(Vec::new(), Duration::ZERO)
            .with_failures(FailurePlan::Rate(0.0));
        assert!(never.fetch_all().await.is_ok());
    }
}
