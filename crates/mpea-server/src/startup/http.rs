//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api, middleware::auth::Authentication, model::app_state::AppState};

/// Creates and binds the CMS HTTP server serving the admin and public APIs.
///
/// OS signals are left to [`super::listen_for_os_signals`]; the caller stops
/// the server through its handle.
pub fn main_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Authentication)
            .app_data(web::Data::from(app_state.clone()))
            .configure(api::configure)
    })
    .disable_signals()
    .bind((address, port))?
    .run())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mpea_persistence::MemoryPersistService;

    use super::*;
    use crate::model::config::Configuration;
    use crate::startup::{ShutdownReason, ShutdownSignal};

    #[actix_web::test]
    async fn test_server_stops_through_shutdown_signal() {
        let configuration =
            Configuration::with_overrides(&[("mpea.auth.jwt.secret", "secret")]).unwrap();
        let state = Arc::new(AppState::new(
            configuration,
            Arc::new(MemoryPersistService::new()),
        ));

        let server = main_server(state, "127.0.0.1".to_string(), 0).unwrap();
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        let signal = ShutdownSignal::new();
        let mut shutdown_rx = signal.subscribe();
        assert!(signal.trigger(ShutdownReason::Interrupt));

        let reason = shutdown_rx.recv().await.unwrap();
        assert_eq!(reason, ShutdownReason::Interrupt);
        handle.stop(true).await;

        let result = tokio::time::timeout(Duration::from_secs(5), running)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
