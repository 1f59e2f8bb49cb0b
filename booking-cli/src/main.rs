//! Booking CLI
//!
//! Command-line interface for the booking gateway.

use anyhow::Result;
use clap::{Parser, Subcommand};

use booking_client::{BookingClient, ClientError};
use booking_types::BookingRequest;

#[derive(Parser)]
#[command(name = "booking")]
#[command(author, version, about = "Booking gateway CLI client", long_about = None)]
struct Cli {
    /// Base URL of the booking gateway
    #[arg(long, env = "BOOKING_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,
    /// Send a CORS preflight and print the allowed origin, methods and headers
    Preflight {
        #[arg(long, default_value = "http://localhost")]
        origin: String,
    },
    /// Submit a paid booking
    Book {
        /// Duration tier (e.g. 15min, 30min, 90min)
        #[arg(long)]
        duration: String,
        /// Service district
        #[arg(long)]
        district: String,
        /// Slot start (ISO-8601)
        #[arg(long)]
        start: String,
        /// Slot end (ISO-8601)
        #[arg(long)]
        end: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = BookingClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ Gateway is healthy");
            } else {
                println!("✗ Gateway is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Preflight { origin } => {
            let info = client.preflight(&origin).await?;
            println!(
                "Access-Control-Allow-Origin:  {}",
                info.allow_origin.as_deref().unwrap_or("(none)")
            );
            println!(
                "Access-Control-Allow-Methods: {}",
                info.allow_methods.as_deref().unwrap_or("(none)")
            );
            println!(
                "Access-Control-Allow-Headers: {}",
                info.allow_headers.as_deref().unwrap_or("(none)")
            );
        }

        Commands::Book {
            duration,
            district,
            start,
            end,
            name,
            email,
            phone,
            location,
        } => {
            let req = BookingRequest {
                duration,
                district,
                start_time: Some(start),
                end_time: Some(end),
                attendee_name: Some(name),
                attendee_email: Some(email),
                attendee_phone: phone,
                location,
            };

            match client.book(&req).await {
                Ok(confirmation) => {
                    println!("{}", serde_json::to_string_pretty(&confirmation)?);
                }
                Err(ClientError::Api {
                    status,
                    message,
                    details,
                }) => {
                    eprintln!("✗ {} ({})", message, status);
                    if let Some(details) = details {
                        eprintln!("  {}", details);
                    }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
