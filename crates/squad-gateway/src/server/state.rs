//! Gateway state

use crate::broadcast::EventDispatcher;
use crate::connection::ConnectionManager;
use squad_common::JwtService;
use squad_service::ServiceContext;
use std::sync::Arc;

/// Shared dependencies of the gateway server
#[derive(Clone)]
pub struct GatewayState {
    service_context: Arc<ServiceContext>,
    jwt_service: Arc<JwtService>,
    connection_manager: Arc<ConnectionManager>,
    event_dispatcher: Arc<EventDispatcher>,
}

impl GatewayState {
    pub fn new(
        service_context: ServiceContext,
        jwt_service: JwtService,
        connection_manager: Arc<ConnectionManager>,
        event_dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            jwt_service: Arc::new(jwt_service),
            connection_manager,
            event_dispatcher,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    pub fn event_dispatcher(&self) -> &EventDispatcher {
        &self.event_dispatcher
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .finish_non_exhaustive()
    }
}
