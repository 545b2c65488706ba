use axum::Router;
use label_injector::{
    config::{Config, SystemPrincipals},
    mutation::LabelAnnotationConfig,
    LabelInjector,
};
use std::{collections::BTreeMap, net::SocketAddr};

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        tls_config: None,
        metadata: LabelAnnotationConfig::new(
            BTreeMap::from([("tier".to_owned(), "edge".to_owned())]),
            BTreeMap::new(),
        ),
        system_principals: SystemPrincipals::default(),
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(config: Config) -> Router {
    let server = LabelInjector::new_from_config(config).await.unwrap();

    server.router()
}
