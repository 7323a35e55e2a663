// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! [`PluginAdapter`] is the base trait all adapters implement;
//! [`ChannelAdapter`] and [`StorageAdapter`] extend it for the two adapter
//! families Tempo knows about.

pub mod adapter;
pub mod channel;
pub mod storage;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use storage::StorageAdapter;
