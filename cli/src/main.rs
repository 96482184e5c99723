//! `booking` - terminal client for the Smart Appointment Booking service.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (signs you in) or sign in
//! booking register --name "Jane Doe" --email jane@example.com --password secret
//! booking login --email jane@example.com --password secret
//!
//! # Your appointments, optionally one tab only
//! booking dashboard --tab pending
//!
//! # Book, reschedule, cancel
//! booking book --provider 2 --service dentist --at 2030-03-04T10:30
//! booking edit 7 --at 2030-03-05T11:00
//! booking cancel 7
//!
//! # Any page by path
//! booking open /appointments/edit/7
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod error;
mod render;
mod shell;
mod transport;

use std::io;

use booking_core::views::admin::AdminFilter;
use booking_core::views::auth::RegisterForm;
use booking_core::views::dashboard::Tab;
use booking_core::{
    AppointmentId, AppointmentStatus, BookingApi, BookingClient, FileStore, Role, ServiceType,
    Session,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, GlobalArgs};
use crate::error::CliError;
use crate::shell::{AdminAction, App, FieldInput, StdinConfirm};
use crate::transport::UreqTransport;

#[derive(Parser)]
#[command(name = "booking")]
#[command(author, version, about = "Smart Appointment Booking client")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the page at a path, e.g. /dashboard or /appointments/edit/7
    Open { path: String },
    /// Show the home page
    Home,
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        phone: Option<String>,

        /// `customer` or `service-provider`
        #[arg(short, long, default_value = "customer")]
        role: Role,
    },
    /// Forget the signed-in user
    Logout,
    /// List your appointments
    Dashboard {
        /// upcoming, all, pending, confirmed, completed or cancelled
        #[arg(short, long, default_value = "upcoming")]
        tab: Tab,
    },
    /// Cancel one of your appointments
    Cancel {
        id: AppointmentId,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an appointment to another status
    Status {
        id: AppointmentId,
        status: AppointmentStatus,
    },
    /// Book a new appointment
    Book {
        /// Service provider id (see `booking providers`)
        #[arg(long)]
        provider: String,

        #[arg(long, default_value = "doctor")]
        service: ServiceType,

        /// Date and time, e.g. 2030-03-04T10:30
        #[arg(long)]
        at: String,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Show or change an existing appointment
    Edit {
        id: AppointmentId,

        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        service: Option<ServiceType>,

        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// List service providers
    Providers,
    /// Admin dashboard: every appointment, stats and users
    Admin {
        /// Only appointments with this status
        #[arg(long, conflicts_with = "search")]
        status: Option<AppointmentStatus>,

        /// Keyword search over names, service type and notes
        #[arg(long)]
        search: Option<String>,

        /// Delete this appointment first
        #[arg(long, value_name = "ID", conflicts_with = "set_status")]
        delete: Option<AppointmentId>,

        /// Change this appointment's status first (with --to)
        #[arg(long, value_name = "ID", requires = "to")]
        set_status: Option<AppointmentId>,

        #[arg(long, value_name = "STATUS", requires = "set_status")]
        to: Option<AppointmentStatus>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_args(cli.global)?;
    init_tracing(&config);
    tracing::debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "starting");

    let session = Session::rehydrate(FileStore::new(config.session_file.clone()));
    let api = BookingApi::new(
        BookingClient::new(&config.api_url),
        UreqTransport::new(config.timeout),
    );
    let mut app = App::new(session, api);

    let stdout = io::stdout();
    let out = &mut stdout.lock();

    match cli.command.unwrap_or(Commands::Home) {
        Commands::Open { path } => app.open(&path, out),
        Commands::Home => app.open("/", out),
        Commands::Login { email, password } => app.login(&email, &password, out),
        Commands::Register {
            name,
            email,
            password,
            phone,
            role,
        } => {
            let form = RegisterForm {
                name,
                email,
                password,
                phone: phone.unwrap_or_default(),
                role,
            };
            app.register(&form, out)
        }
        Commands::Logout => app.logout(out),
        Commands::Dashboard { tab } => app.dashboard(tab, out),
        Commands::Cancel { id, yes } => app.cancel(id, &mut StdinConfirm { assume_yes: yes }, out),
        Commands::Status { id, status } => app.set_status(id, status, out),
        Commands::Book {
            provider,
            service,
            at,
            notes,
        } => {
            let input = FieldInput {
                provider: Some(provider),
                service: Some(service),
                at: Some(at),
                notes,
            };
            app.book(input, out)
        }
        Commands::Edit {
            id,
            provider,
            service,
            at,
            notes,
        } => app.edit(
            id,
            FieldInput {
                provider,
                service,
                at,
                notes,
            },
            out,
        ),
        Commands::Providers => app.providers(out),
        Commands::Admin {
            status,
            search,
            delete,
            set_status,
            to,
            yes,
        } => {
            let filter = match (status, search) {
                (Some(status), _) => AdminFilter::Status(status),
                (None, Some(keyword)) => AdminFilter::Search(keyword),
                (None, None) => AdminFilter::All,
            };
            let action = match (delete, set_status.zip(to)) {
                (Some(id), _) => Some(AdminAction::Delete(id)),
                (None, Some((id, status))) => Some(AdminAction::SetStatus(id, status)),
                (None, None) => None,
            };
            app.admin(filter, action, &mut StdinConfirm { assume_yes: yes }, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn admin_status_filter_conflicts_with_search() {
        let parsed = Cli::try_parse_from(["booking", "admin", "--status", "pending", "--search", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn register_role_accepts_kebab_case() {
        let cli = Cli::try_parse_from([
            "booking", "register", "-n", "Lee", "-e", "lee@example.com", "-p", "pw", "--role",
            "service-provider",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Register { role, .. }) => assert_eq!(role, Role::ServiceProvider),
            _ => panic!("expected register"),
        }
    }
}
