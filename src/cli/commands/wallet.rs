use anyhow::Context;
use clap::Subcommand;

use crate::auth::Credential;
use crate::cli::{
    utils::{output_item, output_rows},
    OutputFormat,
};
use crate::config::AppConfig;
use crate::payments::{PaymentsApi, PaymentsClient};

#[derive(Subcommand)]
pub enum WalletCommands {
    #[command(about = "Show wallet balance and KYC status")]
    Show {
        #[arg(long, help = "Session token")]
        token: String,
    },

    #[command(about = "List wallet transactions")]
    Transactions {
        #[arg(long, help = "Session token")]
        token: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
}

pub async fn handle(cmd: WalletCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = PaymentsClient::new(&config.payments);

    match cmd {
        WalletCommands::Show { token } => {
            let wallet = client
                .wallet(&Credential::new(token))
                .await
                .context("Failed to fetch wallet")?;
            output_item(&output_format, &serde_json::to_value(&wallet)?)
        }
        WalletCommands::Transactions { token, page, page_size } => {
            anyhow::ensure!(page >= 1 && page_size >= 1, "page and page-size must be at least 1");
            let result = client
                .transactions(&Credential::new(token), page, page_size)
                .await
                .context("Failed to fetch transactions")?;
            let rows = result
                .transactions
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?;
            output_rows(&output_format, "transactions", &rows)
        }
    }
}
