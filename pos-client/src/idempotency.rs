//! Idempotency keys for `POST /orders/:id/send`
//!
//! Keys are `{order_id}-{millis}-{seq}` for an existing order and
//! `new-{table}-{millis}-{seq}` when the order does not exist yet. `seq` is a
//! process-wide monotonic counter, so two sends within the same millisecond
//! (or under a backwards clock step) still get distinct keys.

use std::sync::atomic::{AtomicU64, Ordering};

static SEND_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    SEND_SEQ.fetch_add(1, Ordering::Relaxed) + 1
}

/// Key for a send on an order the server already knows
pub fn key_for_order(order_id: &str) -> String {
    format!("{}-{}-{}", order_id, shared::util::now_millis(), next_seq())
}

/// Key for a send that will first create the order for `table_ref`
pub fn key_for_new_order(table_ref: &str) -> String {
    format!("new-{}-{}-{}", table_ref, shared::util::now_millis(), next_seq())
}

/// Per-send client identifier carried in the request body
pub fn client_send_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
