//! Grosir JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use grosir_app::context::AppContext;

use crate::{
    config::ServerConfig,
    identity::ACTOR_UUID_HEADER,
    payments::gateway::{CALLBACK_TOKEN_HEADER, CallbackTokenGuard},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod coupons;
mod extensions;
mod healthcheck;
mod identity;
mod observability;
mod orders;
mod payments;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Grosir JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "subscriber failed to install, nothing else can report it"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    let settings = match config.business.resolve() {
        Ok(settings) => settings,
        Err(settings_error) => {
            error!("invalid business settings: {settings_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!(
        %addr,
        tax_rate = %settings.tax_rate,
        payment_window_minutes = config.business.order_payment_ttl_minutes,
        "starting server"
    );

    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        config.database.max_connections,
        settings,
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("payments/callback")
                .hoop(CallbackTokenGuard::new(config.gateway.callback_token.clone()))
                .post(payments::handlers::callback::handler),
        )
        .push(
            Router::new()
                .hoop(identity::middleware::handler)
                .push(
                    Router::with_path("orders")
                        .post(orders::handlers::create::handler)
                        .push(
                            Router::with_path("{order}")
                                .get(orders::handlers::get::handler)
                                .delete(orders::handlers::delete::handler)
                                .push(
                                    Router::with_path("transitions")
                                        .post(orders::handlers::transition::handler),
                                )
                                .push(
                                    Router::with_path("cancel")
                                        .post(orders::handlers::cancel::handler),
                                )
                                .push(
                                    Router::with_path("history")
                                        .get(orders::handlers::history::handler),
                                )
                                .push(
                                    Router::with_path("payments")
                                        .get(payments::handlers::index::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("payments/{payment}/refund")
                        .post(payments::handlers::refund::handler),
                )
                .push(
                    Router::with_path("coupons")
                        .get(coupons::handlers::index::handler)
                        .post(coupons::handlers::create::handler)
                        .push(
                            Router::with_path("validate")
                                .post(coupons::handlers::validate::handler),
                        )
                        .push(
                            Router::with_path("{coupon}")
                                .get(coupons::handlers::get::handler)
                                .put(coupons::handlers::update::handler)
                                .delete(coupons::handlers::delete::handler)
                                .push(
                                    Router::with_path("usages")
                                        .get(coupons::handlers::usages::handler),
                                ),
                        ),
                ),
        );

    let doc = OpenApi::new("Grosir API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "actor",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ACTOR_UUID_HEADER))),
        )
        .add_security_scheme(
            "gateway",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(CALLBACK_TOKEN_HEADER))),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;
}
