use anyhow::Context;
use clap::Parser;
use send_consultation::utils::logger;
use send_consultation::{
    ApiEvent, CliArgs, ConfigProvider, DryRunMailer, EnvConfig, InvocationContext, Mailer,
    MailSettings, RequestHandler, SmtpMailer, TomlConfig,
};
use std::io::Read;

fn load_event(args: &CliArgs) -> anyhow::Result<ApiEvent> {
    let mut event = if let Some(body) = &args.body {
        ApiEvent::post(body.clone())
    } else {
        let raw = match &args.event {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read event file {}", path.display()))?,
            None => {
                let mut raw = String::new();
                std::io::stdin()
                    .read_to_string(&mut raw)
                    .context("failed to read event from stdin")?;
                raw
            }
        };
        serde_json::from_str(&raw).context("event is not a valid API gateway event")?
    };

    if let Some(method) = &args.method {
        event.http_method = method.clone();
    }
    Ok(event)
}

fn config_provider(args: &CliArgs) -> anyhow::Result<Box<dyn ConfigProvider>> {
    match &args.config {
        Some(path) => {
            let settings: MailSettings = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?
                .into();
            tracing::debug!("Mail settings: {:?}", settings);
            Ok(Box::new(settings))
        }
        None => Ok(Box::new(EnvConfig::new())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let event = load_event(&args)?;
    let config = config_provider(&args)?;
    let mailer: Box<dyn Mailer> = if args.dry_run {
        tracing::info!("🧪 Dry run enabled, no email will be sent");
        Box::new(DryRunMailer)
    } else {
        Box::new(SmtpMailer::new())
    };

    let context = InvocationContext::new(args.request_id(), "send-consultation-cli");
    let handler = RequestHandler::new(config, mailer);
    let response = handler.handle(&event, &context).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
