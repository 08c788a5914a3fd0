use azureml_endpoint::telemetry::{OutputFormat, SubscriberConfig, init_default, init_subscriber};

#[test]
fn repeated_init_is_tolerated() {
    assert!(init_default().is_ok());
    let json = SubscriberConfig::builder()
        .output_format(OutputFormat::Json)
        .build();
    assert!(init_subscriber(json).is_ok());
    tracing::info!("subscriber installed");
}
