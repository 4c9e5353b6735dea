use anyhow::bail;
use clap::Args;
use serde_json::json;

use crate::auth::generate_jwt;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(help = "User id to put in the token")]
    pub user_id: String,

    #[arg(long, help = "Validity in days (defaults to TOKEN_EXPIRY)")]
    pub days: Option<i64>,
}

pub fn handle(args: TokenArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if !config.environment.is_dev_or_test() {
        bail!("Tokens can only be issued with PK_ENV=development or PK_ENV=test");
    }

    let days = args.days.unwrap_or(config.security.token_expiry_days);
    let (token, expires_at) = generate_jwt(&args.user_id, &config.security.jwt_secret, days)?;

    match output_format {
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "expiresAt": expires_at, "userId": args.user_id })),
        ),
    }
}
