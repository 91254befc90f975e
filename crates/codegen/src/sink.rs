//! Bounded multi-producer aggregation queues scoped to one generation request.
//!
//! A sink has three halves:
//! - [`SinkOwner`]: held by the coordinator, hands out senders and closes the sink.
//! - [`SinkSender`]: cloned into each producer.
//! - [`SinkReceiver`]: drained by exactly one aggregator task.
//!
//! The receiver yields `None` once the owner has closed the sink and every
//! producer's sender has been dropped. Closing consumes the owner, so a sink
//! is closed at most once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::method::MethodDeclaration;

/// A send was attempted after the owning coordinator closed the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("send into closed {0} sink")]
pub struct SinkClosed(pub &'static str);

/// Sink of import paths.
pub type ImportSink = SinkSender<String>;
/// Sink of generated method declarations.
pub type MethodSink = SinkSender<MethodDeclaration>;

/// Creates a sink with room for `capacity` queued items (at least one).
pub fn channel<T>(name: &'static str, capacity: usize) -> (SinkOwner<T>, SinkReceiver<T>) {
	let (tx, rx) = mpsc::channel(capacity.max(1));
	let closed = Arc::new(AtomicBool::new(false));
	(SinkOwner { name, tx, closed }, SinkReceiver { name, rx })
}

/// Coordinator-held half of a sink.
#[derive(Debug)]
pub struct SinkOwner<T> {
	name: &'static str,
	tx: mpsc::Sender<T>,
	closed: Arc<AtomicBool>,
}

impl<T> SinkOwner<T> {
	/// Returns a producer handle.
	pub fn sender(&self) -> SinkSender<T> {
		SinkSender {
			name: self.name,
			tx: self.tx.clone(),
			closed: Arc::clone(&self.closed),
		}
	}

	/// Closes the sink.
	///
	/// Only call once every producer holding a sender has terminated; the
	/// draining receiver finishes when the last sender is dropped.
	pub fn close(self) {
		self.closed.store(true, Ordering::Release);
		tracing::trace!(sink = self.name, "codegen.sink.close");
	}
}

/// Producer-held half of a sink.
#[derive(Debug)]
pub struct SinkSender<T> {
	name: &'static str,
	tx: mpsc::Sender<T>,
	closed: Arc<AtomicBool>,
}

impl<T> Clone for SinkSender<T> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			tx: self.tx.clone(),
			closed: Arc::clone(&self.closed),
		}
	}
}

impl<T> SinkSender<T> {
	/// Enqueues one item, waiting for capacity when the queue is full.
	pub async fn send(&self, item: T) -> Result<(), SinkClosed> {
		if self.closed.load(Ordering::Acquire) {
			return Err(SinkClosed(self.name));
		}
		self.tx.send(item).await.map_err(|_| SinkClosed(self.name))
	}
}

/// Aggregator-held half of a sink.
#[derive(Debug)]
pub struct SinkReceiver<T> {
	name: &'static str,
	rx: mpsc::Receiver<T>,
}

impl<T> SinkReceiver<T> {
	/// Next queued item; `None` once the sink is closed and drained.
	pub async fn recv(&mut self) -> Option<T> {
		self.rx.recv().await
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// The sender pair handed to one capability producer.
#[derive(Debug, Clone)]
pub struct ProducerSinks {
	pub imports: ImportSink,
	pub methods: MethodSink,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn drain_ends_after_close_with_no_producers() {
		let (owner, mut rx) = channel::<String>("imports", 4);
		let drain = tokio::spawn(async move {
			let mut seen = 0usize;
			while rx.recv().await.is_some() {
				seen += 1;
			}
			seen
		});

		owner.close();
		assert_eq!(drain.await.unwrap(), 0);
	}

	#[tokio::test]
	async fn drain_ends_once_owner_and_producers_are_gone() {
		let (owner, mut rx) = channel::<String>("imports", 1);
		let drain = tokio::spawn(async move {
			let mut seen = Vec::new();
			while let Some(item) = rx.recv().await {
				seen.push(item);
			}
			seen
		});

		let mut producers = Vec::new();
		for n in 0..3 {
			let tx = owner.sender();
			producers.push(tokio::spawn(async move {
				tx.send(format!("pkg/{n}")).await.unwrap();
			}));
		}
		for producer in producers {
			producer.await.unwrap();
		}
		owner.close();

		let mut seen = drain.await.unwrap();
		seen.sort();
		assert_eq!(seen, vec!["pkg/0", "pkg/1", "pkg/2"]);
	}

	#[tokio::test]
	async fn send_after_close_is_rejected() {
		let (owner, _rx) = channel::<String>("methods", 2);
		let tx = owner.sender();
		owner.close();
		assert_eq!(tx.send("late".to_string()).await, Err(SinkClosed("methods")));
	}
}
