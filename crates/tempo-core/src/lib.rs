// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tempo time-tracking bot.
//!
//! This crate provides the foundational trait definitions, error types, the
//! session domain model, and the task-catalog tree used throughout the Tempo
//! workspace. All adapter crates implement traits defined here.

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::CatalogNode;
pub use error::TempoError;
pub use types::{
    AdapterType, Chat, ChatId, CompletedSession, HealthStatus, MessageId, Session, Username,
};

// Re-export the adapter traits at crate root.
pub use traits::{ChannelAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = TempoError::Config("test".into());
        let _storage = TempoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = TempoError::Channel {
            message: "test".into(),
            source: None,
        };
        let _catalog = TempoError::Catalog("test".into());
        let _miss = TempoError::SelectionNotFound { key: "test".into() };
        let _internal = TempoError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        let variants = [AdapterType::Channel, AdapterType::Storage];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies the adapter traits compile and are accessible through the
        // public API. If any module is missing this test won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }
}
