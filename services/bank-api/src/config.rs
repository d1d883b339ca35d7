use bank_core::{AccountId, BankId, BillerCatalog, TransferEngine};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub bank_name: String,
    pub port: u16,
    pub billers_file: PathBuf,
    pub accounts_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();

        let bank_name = env::var("BANK_NAME")
            .unwrap_or_else(|_| "bpi".to_string())
            .to_lowercase();

        let port = env::var("SERVICE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8001);

        let billers_file = env::var("BILLERS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                PathBuf::from(format!("data/billers/{}_billers.json", bank_name))
            });

        let accounts_file = env::var("ACCOUNTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                PathBuf::from(format!("data/accounts/{}_accounts.json", bank_name))
            });

        Ok(Config {
            bank_name,
            port,
            billers_file,
            accounts_file,
        })
    }
}

/// Seed account entry: the out-of-band provisioning step, supplied at startup
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccount {
    pub account_id: String,
    pub owner_name: String,
    pub balance: i64,
}

/// Build the bank's engine from config: biller catalog plus seeded accounts
///
/// A missing biller file means the bank supports no bill payments; a missing
/// account file means the bank starts empty.
pub fn build_engine(config: &Config) -> Result<TransferEngine, anyhow::Error> {
    let billers = if config.billers_file.exists() {
        let catalog = BillerCatalog::from_json_file(&config.billers_file)?;
        info!(
            bank = %config.bank_name,
            billers = catalog.all().len(),
            "loaded biller catalog"
        );
        catalog
    } else {
        warn!(
            bank = %config.bank_name,
            file = %config.billers_file.display(),
            "biller file missing, bank supports no bill payments"
        );
        BillerCatalog::empty()
    };

    let engine = TransferEngine::new(BankId::new(&config.bank_name), billers);

    if config.accounts_file.exists() {
        let contents = std::fs::read_to_string(&config.accounts_file)?;
        let seeds: Vec<SeedAccount> = serde_json::from_str(&contents)?;
        for seed in &seeds {
            engine.provision_account(
                AccountId::new(&seed.account_id),
                &seed.owner_name,
                seed.balance,
            );
        }
        info!(bank = %config.bank_name, accounts = seeds.len(), "seeded accounts");
    } else {
        warn!(
            bank = %config.bank_name,
            file = %config.accounts_file.display(),
            "account file missing, starting with an empty ledger"
        );
    }

    Ok(engine)
}
