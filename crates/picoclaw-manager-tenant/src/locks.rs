// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-tenant mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Arc<Mutex<HashMap<String, Slot>>>;

#[derive(Default)]
struct Slot {
	mutex: Arc<AsyncMutex<()>>,
	/// Holder plus pending waiters.
	users: usize,
}

/// Keyed lock table. Operations on different tenant IDs never contend;
/// an entry lives only while someone holds or waits for it.
#[derive(Clone, Default)]
pub struct TenantLocks {
	table: LockTable,
}

impl TenantLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wait for exclusive access to `id`.
	///
	/// Dropping the returned future before it resolves releases the
	/// caller's claim on the entry.
	pub async fn lock(&self, id: &str) -> TenantLockGuard {
		let (registration, mutex) = {
			let mut table = lock_table(&self.table);
			let slot = table.entry(id.to_string()).or_default();
			slot.users += 1;
			let registration = Registration {
				id: id.to_string(),
				table: self.table.clone(),
			};
			(registration, slot.mutex.clone())
		};

		let guard = mutex.lock_owned().await;

		TenantLockGuard {
			_guard: guard,
			_registration: registration,
		}
	}

	/// Number of tenant IDs currently held or awaited.
	pub fn active(&self) -> usize {
		lock_table(&self.table).len()
	}
}

fn lock_table(table: &LockTable) -> MutexGuard<'_, HashMap<String, Slot>> {
	table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One caller's claim on a table entry. The last claim removes the entry.
struct Registration {
	id: String,
	table: LockTable,
}

impl Drop for Registration {
	fn drop(&mut self) {
		let mut table = lock_table(&self.table);
		if let Some(slot) = table.get_mut(&self.id) {
			slot.users -= 1;
			if slot.users == 0 {
				table.remove(&self.id);
			}
		}
	}
}

/// Held lock on one tenant ID. Released on drop.
pub struct TenantLockGuard {
	_guard: OwnedMutexGuard<()>,
	_registration: Registration,
}
