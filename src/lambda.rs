#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use send_consultation::utils::logger;
#[cfg(feature = "lambda")]
use send_consultation::{
    ApiEvent, ApiResponse, EnvConfig, InvocationContext, RequestHandler, SmtpMailer,
};
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
type Handler = RequestHandler<EnvConfig, SmtpMailer>;

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: Arc<Handler>,
    event: LambdaEvent<ApiEvent>,
) -> Result<ApiResponse, Error> {
    let context = InvocationContext::new(
        event.context.request_id.clone(),
        event.context.env_config.function_name.clone(),
    );

    // 錯誤都已轉成回應，不會讓 runtime 回報 invocation error
    Ok(handler.handle(&event.payload, &context).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    tracing::info!("Starting send-consultation Lambda function");

    // 設定在每次呼叫時才從環境變數讀取
    let handler = Arc::new(RequestHandler::new(EnvConfig::new(), SmtpMailer::new()));

    run(service_fn(move |event: LambdaEvent<ApiEvent>| {
        function_handler(handler.clone(), event)
    }))
    .await
}
