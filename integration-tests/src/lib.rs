use aws_sdk_cloudformation::types::Output;
use std::env;

/// Reads one output of the deployed stack, named by `STACK_NAME`
/// (default `s3-link-shortener`).
pub async fn stack_output(output_key: &str) -> String {
    let config = aws_config::load_from_env().await;
    let cloudformation_client = aws_sdk_cloudformation::Client::new(&config);
    let stack_name = env::var("STACK_NAME").unwrap_or("s3-link-shortener".to_string());

    let get_stacks = cloudformation_client
        .describe_stacks()
        .set_stack_name(Some(stack_name))
        .send()
        .await
        .unwrap();

    let outputs = get_stacks.stacks.unwrap()[0].clone().outputs.unwrap();
    let matching: Vec<Output> = outputs
        .into_iter()
        .filter(|output| output.output_key.as_deref() == Some(output_key))
        .collect();

    matching[0].clone().output_value.unwrap()
}
