use axum::Router;
use payflow_common::{enabled_features, log_error, logging, Context, PayflowError};
use payflow_config::{load_config, AppConfig};
#[cfg(feature = "payu")]
use payflow_payu::routes as payu_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

fn build_app(config: Arc<AppConfig>) -> Router {
    #[cfg(feature = "payu")]
    let payu_router = payu_routes(config.clone());

    let mut app = Router::new().nest("/api", {
        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut router = payflow_common::routes();
        #[cfg(feature = "payu")]
        {
            router = router.merge(payu_router);
        }
        router
    });

    // Swagger UI and JSON endpoint when built with openapi
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "payu")]
        use payflow_payu::doc::PayuApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Payflow API",
                version = "0.1.0",
                description = "Payment gateway integration service",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags((name = "Payflow", description = "Core service endpoints")),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "payu")]
        openapi_doc.merge(PayuApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    // The frontend (payment form, return page) is served for everything else
    if let Some(static_dir) = config.server.static_dir.as_deref() {
        info!("Serving static files from {}", static_dir);
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match load_config().context("failed to load config") {
        Ok(config) => config,
        Err(e) => {
            log_error(&e, "Startup aborted");
            return Err(e.into());
        }
    };
    // Refuse to start with missing credentials rather than fail on the first payment.
    if let Err(e) = config.validate().map_err(PayflowError::from) {
        log_error(&e, "Startup aborted");
        return Err(e.into());
    }
    info!("Enabled features: {:?}", enabled_features(&config));

    let config = Arc::new(config);
    let app = build_app(config.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
