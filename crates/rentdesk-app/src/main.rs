//! Main entry point for the RentDesk command line.
//!
//! Stands in for the desktop presentation layer: each subcommand runs one
//! operation against the application context and prints its result as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use rentdesk_app::{
    dialog::CommandLineDialog,
    handler,
    model::{AppContext, Cli, Command, Configuration, OperationResult},
    shell::DesktopShell,
    startup,
};
use rentdesk_backup::default_backup_name;
use rentdesk_common::AppError;
use serde::Serialize;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let configuration = Configuration::new(&cli)?;

    let logging_guard = startup::init_logging(&configuration.logging_config())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let ctx = AppContext::new(configuration, Arc::new(DesktopShell::new()))?;
    if !matches!(cli.command, Command::Sweep) {
        ctx.sweeper().run_startup_sweep();
    }

    let success = run(&ctx, cli.command);
    close(&ctx).await;

    if !success {
        drop(ctx);
        drop(logging_guard);
        std::process::exit(1);
    }
    Ok(())
}

fn print_result<T: Serialize>(result: &OperationResult<T>) -> bool {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to serialize result"),
    }
    result.success
}

fn run(ctx: &AppContext, command: Command) -> bool {
    match command {
        Command::Sweep => {
            let result = OperationResult::from_result(
                "sweep",
                ctx.sweeper().sweep(Local::now()).map(|report| {
                    let display = |p: &std::path::Path| p.display().to_string();
                    serde_json::json!({
                        "created": report.created.as_deref().map(display),
                        "pruned": report.pruned.iter().map(|p| display(p)).collect::<Vec<_>>(),
                    })
                }),
            );
            print_result(&result)
        }
        Command::Backup { output } => {
            let data = ctx.data_store().load();
            let output = output.unwrap_or_else(|| PathBuf::from(default_backup_name()));
            print_result(&handler::backup::backup(
                ctx,
                &data,
                &CommandLineDialog::new(Some(output)),
            ))
        }
        Command::Restore { archive } => {
            let restored = handler::backup::restore(ctx, &CommandLineDialog::new(Some(archive)));
            if let Some(data) = &restored.data {
                let saved = handler::data::save_data(ctx, data);
                if !saved.success {
                    return print_result(&saved);
                }
                info!(tenants = data.tenants.len(), "Restored data saved");
            }
            print_result(&restored)
        }
        Command::Upload { file } => print_result(&handler::document::upload_document(
            ctx,
            &CommandLineDialog::new(Some(file)),
        )),
        Command::Open { file_id } => print_result(&handler::document::open_document(ctx, &file_id)),
        Command::Designate {
            tenant_id,
            document_id,
        } => print_result(&handler::contract::designate_template(
            ctx,
            &tenant_id,
            &document_id,
        )),
        Command::Generate { tenant_id, output } => print_result(
            &handler::contract::generate_contract(ctx, &tenant_id, &CommandLineDialog::new(output)),
        ),
        Command::Notify => {
            let data = ctx.data_store().load();
            let settings = ctx.settings_store().load();
            print_result(&handler::system::check_notifications(
                ctx,
                &data.tenants,
                &settings,
                Local::now().date_naive(),
            ))
        }
        Command::Settings { set } if set.is_empty() => {
            print_result(&handler::settings::load_settings(ctx))
        }
        Command::Settings { set } => print_result(&handler::settings::update_settings(ctx, &set)),
        Command::Theme => print_result(&handler::system::system_theme(ctx)),
        Command::DataFolder => print_result(&handler::system::open_data_folder(ctx)),
    }
}

/// Run the close handshake before exiting
async fn close(ctx: &AppContext) {
    let (coordinator, mut listener) = ctx.close_coordinator();
    // Nothing is pending once the command has run
    let responder = tokio::spawn(async move {
        if let Some(request) = listener.recv().await {
            request.acknowledge();
        }
    });

    let outcome = coordinator.request_close().await;
    info!(outcome = ?outcome, "Closing");
    let _ = responder.await;
}
