//! Domain layer health checks

use std::collections::HashMap;

use async_trait::async_trait;
use bp_tracker_data::database::{self, DatabaseError};

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Status of a single component with optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Component name to status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the reading store
    async fn check_storage_status(&self) -> HealthComponent;
}

/// Health service that inspects the global database pool
#[derive(Debug, Default, Clone)]
pub struct DefaultHealthService;

#[async_trait]
impl HealthServiceTrait for DefaultHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        get_system_health().await
    }

    async fn check_storage_status(&self) -> HealthComponent {
        check_storage_status().await
    }
}

/// Check where readings are kept and whether that store answers
///
/// Without an initialised pool readings live in memory, which is healthy.
pub async fn check_storage_status() -> HealthComponent {
    match database::get_db_pool() {
        Ok(_) => match database::get_connection_info() {
            Some(info) if info.contains("healthy") => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(info),
            },
            Some(info) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some(info),
            },
            None => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some("Database pool is not reachable".to_string()),
            },
        },
        Err(DatabaseError::PoolNotInitialized) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some("In-memory storage".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(format!("Database connection error: {}", e)),
        },
    }
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let storage = check_storage_status().await;

    let status = match storage.status {
        ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
        ComponentStatus::Degraded => SystemStatus::Degraded,
        ComponentStatus::Healthy => SystemStatus::Healthy,
    };

    SystemHealth {
        status,
        components: HashMap::from([("storage".to_string(), storage)]),
    }
}
