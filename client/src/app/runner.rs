use std::error::Error;
use std::io;
use std::io::Write;

use chrono::Utc;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::app;
use crate::app::{Command, EnquiryCommand};
use crate::auth;
use crate::cfg;
use crate::core;
use crate::db;
use crate::enquiry;

/// Application-level error type
#[rustfmt::skip]
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigLoadingFailed(#[from] config::ConfigError),

    #[error("Startup error: {0}")]
    ContextInitFailed(#[from] core::ContextError),

    #[error("Credential store error: {0}")]
    StoreOperationFailed(#[from] db::StoreError),

    #[error("API error: {0}")]
    ApiCallFailed(#[from] api::ApiError),

    #[error("Enquiry error: {0}")]
    EnquiryOperationFailed(#[from] enquiry::EnquiryError),

    #[error("Password prompt failed: {0}")]
    PasswordPromptFailed(#[from] std::io::Error),

    #[error("Not logged in; run `gymadmin login` first")]
    NotLoggedIn,
}

pub async fn run() {
    if let Err(e) = run_app().await {
        eprintln!("❌ {e}\n");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("Caused by: {err}");
            source = err.source();
        }

        std::process::exit(1);
    }
}

async fn run_app() -> Result<(), AppError> {
    let cli = app::Cli::parse();
    let settings = cfg::AppSettings::new()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&settings.log_directives))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let context = core::Context::new(settings).await?;

    match cli.command {
        Command::Login { mobile_number } => {
            print!("Password: ");
            io::stdout().flush()?;
            let password = rpassword::read_password()?;

            let role = context.settings.api.role.clone();
            let data = auth::login(
                &context.api,
                &context.credentials,
                &role,
                &mobile_number,
                &password,
            )
            .await?;
            println!("Logged in as owner {} (gym {}).", data.owner_id, data.gym_id);
        }
        Command::Logout => {
            auth::logout(&context.credentials).await?;
            println!("Logged out.");
        }
        Command::Whoami => match context.credentials.get(db::keys::OWNER_ID).await? {
            Some(owner_id) => {
                let gym_id = context.credentials.get(db::keys::GYM_ID).await?.unwrap_or_default();
                println!("owner {owner_id}, gym {gym_id}");
            }
            None => println!("Not logged in."),
        },
        Command::Enquiry { command } => run_enquiry_command(&context, command).await?,
    }

    Ok(())
}

async fn run_enquiry_command(context: &core::Context, command: EnquiryCommand) -> Result<(), AppError> {
    let gym_id = context
        .credentials
        .get(db::keys::GYM_ID)
        .await?
        .ok_or(AppError::NotLoggedIn)?;
    let mut enquiries = enquiry::Enquiries::new(context.api.clone(), gym_id);

    match command {
        EnquiryCommand::List { completed, search, date, status } => {
            enquiries.fetch().await?;
            let filter = enquiry::EnquiryFilter {
                search,
                date: date.unwrap_or_default(),
                status: status.map_or(enquiry::StatusFilter::All, enquiry::StatusFilter::Only),
            };
            let partition = if completed { enquiries.completed() } else { enquiries.pending() };
            let rows = filter.apply(partition, Utc::now());

            if rows.is_empty() {
                println!("No enquiries.");
            }
            for e in rows {
                println!(
                    "{}  {}  {:<9}  {}  {}",
                    e.enquiry_id,
                    e.date.format("%Y-%m-%d"),
                    e.status,
                    e.name,
                    e.contact
                );
            }
        }
        EnquiryCommand::Add { name, contact, email, message } => {
            enquiries
                .create(enquiry::NewEnquiry { name, contact, email, message })
                .await?;
            println!("Enquiry recorded ({} pending).", enquiries.pending().len());
        }
        EnquiryCommand::SetStatus { enquiry_id, status, reason } => {
            enquiries.fetch().await?;
            enquiries.update_status(&enquiry_id, status, &reason).await?;
            println!("Enquiry {enquiry_id} moved to {status}.");
        }
        EnquiryCommand::Reasons { status } => {
            for reason in enquiry::EnquiryStatus::allowed_reasons(status) {
                println!("{reason}");
            }
        }
    }

    Ok(())
}
