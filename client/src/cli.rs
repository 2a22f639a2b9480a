//! Command definitions and dispatch for the `pothole` binary.
//!
//! Each command plays the part of one screen: it waits for the session store
//! to finish loading, checks the screen group it belongs to, then talks to the
//! API.

use std::path::PathBuf;

use adapters::FileStore;
use clap::{Parser, Subcommand};
use pothole_client::api::alerts::AdminAlert;
use pothole_client::api::reports::NewReport;
use pothole_client::auth::{self, AdminArea, Registration, SignUpOutcome};
use pothole_client::navigation::{require, require_session};
use pothole_client::services::{
    map_link, newest_reports_first, recent_alerts, unread_first, AlertPoller, SessionAlertSource,
    Severity,
};
use pothole_client::{ApiClient, ClientConfig, Result, Role, ScreenGroup, Session, SessionStore};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pothole", version, about = "Report potholes and review area alerts")]
pub struct Cli {
    /// Configuration file (defaults to ./pothole.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account; admins must give the centre and radius of their area
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
        /// Radius in kilometres
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Forget the saved session
    Logout,
    /// Show who is logged in
    Status,
    /// List your reports, newest first
    Reports,
    /// Submit a geotagged photo report
    Submit {
        #[arg(long)]
        description: String,
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
        #[arg(long)]
        image: PathBuf,
    },
    /// Show alerts for your area (admin)
    Alerts {
        /// List every alert, unread first, instead of the most recent few
        #[arg(long)]
        all: bool,
        /// Keep polling and print each refresh
        #[arg(long)]
        watch: bool,
    },
    /// Mark an alert as read (admin)
    MarkRead { alert_id: i64 },
    /// Show your area and the alert markers inside it (admin)
    Map,
}

pub async fn run(command: Command, config: ClientConfig) -> Result<()> {
    let api = ApiClient::from_config(&config)?;
    let store = SessionStore::new(FileStore::new(&config.storage_dir));
    store.initialize().await;
    let state = store.wait_until_ready().await;
    info!(screen = %ScreenGroup::resolve(&state), "session restored");

    match command {
        Command::Login { email, password } => {
            let session = auth::sign_in(&api, &store, &email, &password).await?;
            println!("Logged in as {} ({})", session.user_id(), session.role());
            println!("Opening {}", ScreenGroup::resolve(&store.state()));
        }
        Command::Register {
            name,
            email,
            password,
            role,
            latitude,
            longitude,
            radius,
        } => {
            let area = match (latitude, longitude, radius) {
                (Some(latitude), Some(longitude), Some(radius_km)) => Some(AdminArea {
                    latitude,
                    longitude,
                    radius_km,
                }),
                _ => None,
            };
            let registration = Registration {
                name,
                email,
                password,
                role,
                area,
            };
            match auth::sign_up(&api, &store, &registration).await? {
                SignUpOutcome::SignedIn(session) => {
                    println!("Registered and logged in as {} ({})", session.user_id(), session.role());
                }
                SignUpOutcome::AccountCreated => {
                    println!("Account created successfully. Please log in.");
                }
            }
        }
        Command::Logout => {
            auth::sign_out(&store).await;
            println!("Logged out");
        }
        Command::Status => match require_session(&state) {
            Ok(session) => println!(
                "Logged in as {} ({}), {}",
                session.user_id(),
                session.role(),
                ScreenGroup::resolve(&state)
            ),
            Err(_) => println!("Not logged in"),
        },
        Command::Reports => {
            let session = require(&state, Role::User)?;
            let reports = newest_reports_first(api.my_reports(session).await?);
            if reports.is_empty() {
                println!("No reports yet");
            }
            for report in reports {
                println!(
                    "#{} [{}] {} {}",
                    report.id,
                    Severity::classify(&report.severity_level),
                    report.status,
                    report.created_at
                );
                println!("    {}", report.description);
                println!("    {}", map_link(report.latitude, report.longitude));
            }
        }
        Command::Submit {
            description,
            latitude,
            longitude,
            image,
        } => {
            let session = require(&state, Role::User)?;
            let report = NewReport {
                description,
                latitude,
                longitude,
                image,
            };
            api.submit_report(session, &report).await?;
            println!("Your report has been submitted successfully!");
        }
        Command::Alerts { all, watch } => {
            let session = require(&state, Role::Admin)?;
            if watch {
                watch_alerts(api.clone(), session.clone(), &config).await;
            } else {
                let alerts = api.admin_alerts(session).await?;
                let alerts = if all {
                    unread_first(alerts)
                } else {
                    recent_alerts(alerts, config.recent_alert_limit)
                };
                print_alerts(&alerts);
            }
        }
        Command::MarkRead { alert_id } => {
            let session = require(&state, Role::Admin)?;
            api.mark_alert_read(session, alert_id).await?;
            println!("Alert {alert_id} marked as read");
        }
        Command::Map => {
            let session = require(&state, Role::Admin)?;
            let area = api.user_location(session).await?;
            println!(
                "Area centre {}, radius {} km",
                map_link(area.latitude, area.longitude),
                area.radius
            );
            for marker in api.alert_locations(session).await? {
                println!(
                    "alert #{} [{}] {}",
                    marker.alert_id,
                    Severity::classify(&marker.severity_level),
                    map_link(marker.latitude, marker.longitude)
                );
            }
        }
    }

    Ok(())
}

fn print_alerts(alerts: &[AdminAlert]) {
    if alerts.is_empty() {
        println!("No alerts");
    }
    for alert in alerts {
        println!(
            "#{} report {} [{}] {} {}",
            alert.alert_id,
            alert.report_id,
            Severity::classify(&alert.severity_level),
            alert.alert_status,
            alert.alert_timestamp
        );
        if !alert.description.is_empty() {
            println!("    {}", alert.description);
        }
        println!("    {}", map_link(alert.latitude, alert.longitude));
    }
}

async fn watch_alerts(api: ApiClient, session: Session, config: &ClientConfig) {
    let (tx, mut rx) = mpsc::channel(1);
    let (stop, shutdown) = oneshot::channel();
    let poller = AlertPoller::new(SessionAlertSource::new(api, session), config.alert_poll_interval())
        .spawn(tx, shutdown);

    loop {
        tokio::select! {
            batch = rx.recv() => match batch {
                Some(alerts) => {
                    println!("--- {} alert(s)", alerts.len());
                    print_alerts(&alerts);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let _ = stop.send(());
    drop(rx);
    let _ = poller.await;
}
