// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tempo integration tests.
//!
//! Provides mock adapters and event fixtures for fast, deterministic,
//! CI-runnable tests without a live Telegram connection or a database.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and capture
//! - [`MockStorage`] - In-memory storage adapter
//! - [`events`] - Builders for inbound event fixtures

pub mod events;
pub mod mock_channel;
pub mod mock_storage;

pub use mock_channel::MockChannel;
pub use mock_storage::MockStorage;
