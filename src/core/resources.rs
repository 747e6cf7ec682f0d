//! Core domain: explicitly constructed service resources.

use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    AlreadyInstalled(&'static str),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::AlreadyInstalled(name) => {
                write!(f, "service {} is already installed, keeping the first", name)
            }
        }
    }
}

/// Insert a service resource, refusing to replace one that already exists.
pub fn install_service<R: Resource>(app: &mut App, service: R) -> Result<(), ServiceError> {
    if app.world().contains_resource::<R>() {
        return Err(ServiceError::AlreadyInstalled(std::any::type_name::<R>()));
    }
    app.insert_resource(service);
    Ok(())
}
