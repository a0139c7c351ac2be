use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{Error, Res, api, config::Config, spotify::auth::SharedPkce};

/// Serves `/callback` and `/health` on the configured address until the
/// process exits.
pub async fn start_api_server(state: SharedPkce, config: Arc<Config>) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_address)
        .map_err(|e| Error::Config(format!("invalid SERVER_ADDRESS: {e}")))?;

    let app = Router::new().route("/health", get(api::health)).route(
        "/callback",
        get(api::callback)
            .layer::<_, std::convert::Infallible>(Extension(state))
            .layer(Extension(config)),
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
