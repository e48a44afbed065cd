use crate::http_handler::HandlerDeps;
use http_handler::function_handler;
use lambda_http::{run, service_fn, tracing, Error};
use shared::adapters::S3RedirectStore;
use shared::configuration::Configuration;
use shared::observability::init_tracing;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let ssm_client = aws_sdk_ssm::Client::new(&aws_config);
    let config = Configuration::load(&ssm_client).await?;
    init_tracing(config.debug)?;
    tracing::info!("{}", config);

    let store = S3RedirectStore::new(config.bucket, aws_sdk_s3::Client::new(&aws_config));
    let deps = HandlerDeps {
        store,
        short_domain: config.short_domain,
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
