use crate::{Res, config::Config, spotify};

pub async fn auth(config: &Config) -> Res<()> {
    spotify::auth::auth(config).await
}
