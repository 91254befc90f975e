use std::future::Future;

use recgen_record::Capability;
use tokio::task::JoinSet;

use crate::error::{GenerateError, Result};

/// Completion barrier over the capability producers of one request.
///
/// Every spawned producer runs to completion; [`Self::join_all`] only returns
/// once the set is empty, so it is safe to close the sinks afterwards.
#[derive(Debug)]
pub struct ProducerSet {
	record: String,
	inner: JoinSet<(Capability, Result<String>)>,
}

impl ProducerSet {
	pub fn new(record: impl Into<String>) -> Self {
		Self {
			record: record.into(),
			inner: JoinSet::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Spawns one producer on the current runtime.
	pub fn spawn<F>(&mut self, capability: Capability, fut: F)
	where
		F: Future<Output = Result<String>> + Send + 'static,
	{
		tracing::trace!(record = %self.record, capability = capability.as_str(), pending = self.inner.len(), "codegen.producers.spawn");
		self.inner.spawn(async move { (capability, fut.await) });
	}

	/// Waits for every producer and returns their outcomes in canonical capability order.
	///
	/// A producer that panicked is reported as an internal assembly error, but
	/// only after the remaining producers have finished.
	pub async fn join_all(mut self) -> Result<Vec<(Capability, Result<String>)>> {
		let mut outcomes = Vec::with_capacity(self.inner.len());
		let mut failure = None;

		while let Some(joined) = self.inner.join_next().await {
			match joined {
				Ok(outcome) => outcomes.push(outcome),
				Err(err) => {
					tracing::error!(record = %self.record, error = %err, "codegen.producers.join_failed");
					failure.get_or_insert(err);
				}
			}
		}

		if let Some(err) = failure {
			return Err(GenerateError::InternalAssembly(format!("capability producer for `{}` failed: {err}", self.record)));
		}

		outcomes.sort_by_key(|(capability, _)| *capability);
		Ok(outcomes)
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
	async fn outcomes_are_canonical_regardless_of_finish_order() {
		let mut set = ProducerSet::new("Author");
		set.spawn(Capability::Store, async {
			tokio::time::sleep(Duration::from_millis(20)).await;
			Ok("store".to_string())
		});
		set.spawn(Capability::Deleteable, async { Ok("delete".to_string()) });
		set.spawn(Capability::Queryable, async {
			tokio::task::yield_now().await;
			Ok("query".to_string())
		});
		assert_eq!(set.len(), 3);

		let order: Vec<_> = set.join_all().await.unwrap().into_iter().map(|(c, _)| c).collect();
		assert_eq!(order, vec![Capability::Store, Capability::Queryable, Capability::Deleteable]);
	}

	fn boom() -> Result<String> {
		panic!("boom")
	}

	#[tokio::test]
	async fn panic_is_reported_after_all_producers_finish() {
		let finished = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
		let flag = std::sync::Arc::clone(&finished);

		let mut set = ProducerSet::new("Author");
		set.spawn(Capability::Store, async { boom() });
		set.spawn(Capability::Deleteable, async move {
			tokio::task::yield_now().await;
			flag.store(true, std::sync::atomic::Ordering::SeqCst);
			Ok(String::new())
		});

		let err = set.join_all().await.unwrap_err();
		assert!(matches!(err, GenerateError::InternalAssembly(_)));
		assert!(finished.load(std::sync::atomic::Ordering::SeqCst));
	}
}
