// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity-log sink.

use async_trait::async_trait;

use crate::error::SwitchboardError;
use crate::types::ActivityEntry;

/// Append-only activity log. Callers treat failures as non-fatal.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), SwitchboardError>;
}
