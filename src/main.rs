use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use invoice_pro::config::{self, Config};
use invoice_pro::db::Database;
use invoice_pro::invoice_gen::InvoiceGenerator;
use invoice_pro::models::{Invoice, InvoiceDraft, InvoiceItem, ItemDraft};
use invoice_pro::render::{format_currency, format_date, format_quantity, Totals, TAX_LABEL};
use invoice_pro::{logging, reports};

/// Invoice bookkeeping and PDF generation
#[derive(Parser, Debug)]
#[command(name = "invoice_pro", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the demo invoices into an empty database
    Seed,
    /// Create an invoice issued today
    Create(CreateArgs),
    /// Change an invoice; items are replaced only when --item is given
    Edit(EditArgs),
    /// List invoices by issue date
    List,
    /// Show one invoice with its items and totals
    Show { id: i64 },
    /// Mark an invoice as paid
    MarkPaid { id: i64 },
    /// Delete an invoice and its items
    Delete { id: i64 },
    /// Write the invoice PDF and Markdown summary
    Pdf {
        id: i64,
        /// Defaults to OUTPUT_DIR
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Timestamp printed in the footer, e.g. 2024-05-06T09:30:00
        #[arg(long)]
        generated_at: Option<NaiveDateTime>,
    },
    /// Totals and the five latest invoices
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Paid revenue by month and the top clients
    Report {
        #[arg(long)]
        json: bool,
    },
    /// Paid and unpaid revenue per month of one year
    MonthlyStatus {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    email: Option<String>,
    /// Notes printed on the invoice
    #[arg(long)]
    description: Option<String>,
    /// Defaults to today
    #[arg(long)]
    issue_date: Option<NaiveDate>,
    /// Defaults to a week after the issue date
    #[arg(long)]
    due_date: Option<NaiveDate>,
    #[arg(long)]
    status: Option<String>,
    /// Line item as description:quantity:price[:tax]
    #[arg(long = "item")]
    items: Vec<ItemDraft>,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: i64,
    #[arg(long)]
    client: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    issue_date: Option<NaiveDate>,
    #[arg(long)]
    due_date: Option<NaiveDate>,
    #[arg(long)]
    status: Option<String>,
    /// Line item as description:quantity:price[:tax]
    #[arg(long = "item")]
    items: Vec<ItemDraft>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    // Load configuration
    let config = config::init()?;
    debug!(?config, "configuration loaded");

    // Initialize database connection
    let db = Database::new(&config).await?;

    run(cli.command, &config, &db).await
}

async fn run(command: Command, config: &Config, db: &Database) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Command::Seed => {
            let inserted = db.seed_demo_data(today).await?;
            println!("Inserted {inserted} demo invoices");
        }
        Command::Create(args) => {
            let mut draft = InvoiceDraft::new(args.client);
            draft.client_email = args.email;
            draft.description = args.description;
            draft.issue_date = args.issue_date;
            draft.due_date = args.due_date;
            if let Some(status) = args.status {
                draft.status = status;
            }
            draft.items = args.items;
            draft.apply_creation_defaults(today);

            let id = db.create_invoice(&draft).await?;
            println!("Created invoice {id} for {}", format_currency(draft.stored_amount()));
        }
        Command::Edit(args) => {
            let (invoice, items) = load(db, args.id).await?;
            let mut draft = InvoiceDraft::from_invoice(&invoice, &items);
            if let Some(client) = args.client {
                draft.client_name = client;
            }
            if args.email.is_some() {
                draft.client_email = args.email;
            }
            if args.description.is_some() {
                draft.description = args.description;
            }
            if args.issue_date.is_some() {
                draft.issue_date = args.issue_date;
            }
            if args.due_date.is_some() {
                draft.due_date = args.due_date;
            }
            if let Some(status) = args.status {
                draft.status = status;
            }
            if !args.items.is_empty() {
                draft.items = args.items;
            }

            db.update_invoice(args.id, &draft).await?;
            println!("Updated invoice {}", args.id);
        }
        Command::List => {
            let invoices = db.list_invoices().await?;
            if invoices.is_empty() {
                println!("No invoices");
            }
            for invoice in &invoices {
                print_summary(invoice);
            }
        }
        Command::Show { id } => {
            let (invoice, items) = load(db, id).await?;
            print_details(&invoice, &items);
        }
        Command::MarkPaid { id } => {
            if !db.mark_paid(id, today).await? {
                bail!("invoice {id} not found");
            }
            println!("Invoice {id} marked as paid");
        }
        Command::Delete { id } => {
            if !db.delete_invoice(id).await? {
                bail!("invoice {id} not found");
            }
            println!("Deleted invoice {id}");
        }
        Command::Pdf {
            id,
            out_dir,
            generated_at,
        } => {
            let (invoice, items) = load(db, id).await?;
            let style = config.document_style()?;
            let generator = InvoiceGenerator::new(out_dir.unwrap_or_else(|| config.output_dir.clone()))?;
            let generated_at = generated_at.unwrap_or_else(|| Local::now().naive_local());

            let (md_path, pdf_path) = generator.generate_invoice(&invoice, &items, &style, generated_at)?;
            println!("{}", pdf_path.display());
            println!("{}", md_path.display());
        }
        Command::Dashboard { json } => {
            let dashboard = reports::dashboard(&db.list_invoices().await?);
            if json {
                print_json(&dashboard)?;
            } else {
                println!("Invoices: {}", dashboard.total_invoices);
                println!("Paid:     {}", dashboard.paid_invoices);
                println!("Unpaid:   {}", dashboard.unpaid_invoices);
                println!("Revenue:  {}", format_currency(dashboard.total_revenue));
                println!();
                print_months(&dashboard.revenue_labels, &dashboard.revenue_values);
                println!();
                for invoice in &dashboard.recent {
                    print_summary(invoice);
                }
            }
        }
        Command::Report { json } => {
            let report = reports::revenue_report(&db.list_invoices().await?);
            if json {
                print_json(&report)?;
            } else {
                print_months(&reports::MONTH_LABELS, &report.monthly_revenue);
                println!();
                println!("Paid: {}  Unpaid: {}", report.paid_count, report.unpaid_count);
                println!();
                for client in &report.top_clients {
                    println!("{:<30} {:>12}", client.client, format_currency(client.revenue));
                }
            }
        }
        Command::MonthlyStatus { year, json } => {
            let year = year.unwrap_or_else(|| today.year());
            let status = reports::monthly_revenue_status(&db.list_invoices().await?, year);
            if json {
                print_json(&status)?;
            } else {
                println!("{year}");
                for (month, label) in status.labels.iter().enumerate() {
                    println!(
                        "{label}  paid {:>12}  unpaid {:>12}",
                        format_currency(status.paid[month]),
                        format_currency(status.unpaid[month])
                    );
                }
            }
        }
    }

    Ok(())
}

async fn load(db: &Database, id: i64) -> Result<(Invoice, Vec<InvoiceItem>)> {
    match db.get_invoice_with_items(id).await? {
        Some(found) => Ok(found),
        None => bail!("invoice {id} not found"),
    }
}

fn print_summary(invoice: &Invoice) {
    println!(
        "#{:<5} {:<10} {:<24} {:>12}  {}",
        invoice.id,
        format_date(invoice.issue_date),
        invoice.client_name,
        format_currency(invoice.amount),
        invoice.status
    );
}

fn print_details(invoice: &Invoice, items: &[InvoiceItem]) {
    println!("Invoice #{}", invoice.id);
    println!("Client:  {}", invoice.client_name);
    if let Some(email) = invoice.email() {
        println!("Email:   {email}");
    }
    println!("Issued:  {}", format_date(invoice.issue_date));
    println!("Due:     {}", format_date(invoice.due_date));
    println!("Status:  {}", invoice.status);
    println!("Stored:  {}", format_currency(invoice.amount));
    if let Some(notes) = invoice.notes() {
        println!("Notes:   {notes}");
    }
    println!();

    for item in items {
        println!(
            "{:<30} {:>6} x {:>10} = {:>10}  (tax {}%)",
            item.description,
            format_quantity(item.quantity),
            format_currency(item.price),
            format_currency(item.line_total()),
            format_quantity(item.tax)
        );
    }

    let totals = Totals::compute(invoice, items);
    println!();
    println!("Subtotal  {}", format_currency(totals.subtotal));
    println!("{TAX_LABEL} {}", format_currency(totals.tax));
    println!("Total     {}", format_currency(totals.total));
}

fn print_months(labels: &[&str; 12], values: &[f64; 12]) {
    for (label, value) in labels.iter().zip(values) {
        println!("{label}  {:>12}", format_currency(*value));
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
