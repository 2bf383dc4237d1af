//! Estate Console CLI
//!
//! Command-line client for a property-management backend:
//! - Sign in and out
//! - Browse estates, properties, units, tenants, leases, billing and tickets
//! - Create records, generate invoices and record payments
//! - Show the revenue dashboard and write its chart

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use estate_console::api::{ApiClient, ClientError, UnitFilter};
use estate_console::config::{generate_default_config, Config, LoggingConfig};
use estate_console::models::{
    LoginRequest, NewEstate, NewLease, NewPayment, NewProperty, NewTenant, NewTicket, NewUnit,
    RegisterRequest,
};
use estate_console::notify::Notice;
use estate_console::router::{RenderSettings, Router, View, ViewOptions};
use estate_console::session::{Session, SessionStore, UserIdentity, DEFAULT_ROLE};
use estate_console::views::OutputFormat;

#[derive(Parser)]
#[command(name = "estate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Property management console")]
#[command(long_about = "Estate Console is a client for a property-management backend.\nManage estates, units, tenants and billing, and track revenue.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/estate-console/config.toml, then ./estate.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an admin account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Check the backend
    Status,

    /// Show a view (default: the last one shown)
    Show {
        /// dashboard, estates, properties, units, tenants, leases, billing, maintenance, auth
        view: Option<String>,
        /// Properties of one estate
        #[arg(long)]
        estate: Option<i64>,
        /// Units of one property
        #[arg(long)]
        property: Option<i64>,
        /// Units by occupancy
        #[arg(long)]
        occupied: Option<bool>,
        /// Tenant search
        #[arg(short, long)]
        query: Option<String>,
        /// Invoice status (pending, paid, overdue)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show the revenue dashboard
    Dashboard {
        /// Chart width in pixels
        #[arg(long)]
        width: Option<f64>,
        /// Write the revenue chart to this SVG file
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// List invoices
    Invoices {
        /// Invoice status (pending, paid, overdue)
        #[arg(long)]
        status: Option<String>,
    },

    /// Create a record
    Create {
        #[command(subcommand)]
        record: CreateCommand,
    },

    /// Generate the invoices of a lease
    GenerateInvoices { lease_id: i64 },

    /// Record a payment against an invoice
    Pay {
        #[arg(long)]
        invoice: i64,
        /// Amount (default: the invoice amount)
        #[arg(long)]
        amount: Option<f64>,
        /// Transaction reference (default: generated)
        #[arg(long)]
        txn_ref: Option<String>,
    },

    /// Change a maintenance ticket
    TicketUpdate {
        id: i64,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CreateCommand {
    Estate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
    },
    Property {
        #[arg(long)]
        estate_id: i64,
        #[arg(long)]
        code: String,
        #[arg(long)]
        address: String,
    },
    Unit {
        #[arg(long)]
        property_id: i64,
        #[arg(long)]
        label: String,
        #[arg(long, default_value = "2")]
        bedrooms: i32,
    },
    Tenant {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    Lease {
        #[arg(long)]
        unit_id: i64,
        #[arg(long)]
        tenant_id: i64,
        /// YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        rent: f64,
        /// Months between invoices
        #[arg(long, default_value = "12")]
        frequency_months: i32,
    },
    Ticket {
        #[arg(long)]
        unit_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load_with_env(path) {
            Ok(config) => config,
            Err(e) => {
                Notice::error(e.to_string()).emit();
                std::process::exit(2);
            }
        },
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    if let Err(e) = run(cli, config).await {
        Notice::error(format!("{:#}", e)).emit();
        std::process::exit(1);
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("estate={0},estate_console={0}", config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

struct Console {
    store: SessionStore,
    client: ApiClient,
    session: Option<Session>,
    settings: RenderSettings,
}

impl Console {
    fn router(&self) -> Router {
        Router::new(
            self.client.clone(),
            self.session.clone(),
            self.store.clone(),
            self.settings.clone(),
        )
    }

    fn require_session(&self) -> anyhow::Result<&Session> {
        self.session.as_ref().ok_or_else(|| ClientError::NotAuthenticated.into())
    }

    /// Store a new session and show the dashboard with it
    async fn sign_in(&mut self, session: Session) -> anyhow::Result<()> {
        self.store.login(session.clone())?;
        Notice::success(format!("Signed in as {}", session.user)).emit();

        self.client = self.client.clone().with_session(&session);
        self.session = Some(session);
        let output = self.router().show(View::Dashboard, &ViewOptions::default()).await?;
        print!("{}", output);
        Ok(())
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                Notice::success(format!("Config written to {}", path.display())).emit();
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow!(e))?;
    let store = SessionStore::new(config.session.state_file.clone());
    let session = store.current()?;

    let base_url = cli.api_url.clone().unwrap_or_else(|| config.api.base_url.clone());
    let mut client = ApiClient::new(&base_url, config.api.timeout())?;
    if let Some(session) = &session {
        client = client.with_session(session);
    }

    let settings = RenderSettings {
        format,
        numbers: config.display.number_format(),
        chart_width: config.chart.width,
        chart_output: config.chart.output.clone(),
    };

    let mut ctx = Console {
        store,
        client,
        session,
        settings,
    };

    match cli.command {
        Commands::Register {
            email,
            full_name,
            password,
        } => {
            let request = RegisterRequest {
                email,
                full_name: full_name.clone(),
                password,
                role: DEFAULT_ROLE.to_string(),
            };
            let token = ctx.client.register(&request).await?;
            let session = Session::new(token.access_token, UserIdentity::registered(&full_name));
            ctx.sign_in(session).await?;
        }

        Commands::Login { email, password } => {
            let identity = UserIdentity::from_login_email(&email);
            let token = ctx.client.login(&LoginRequest { email, password }).await?;
            ctx.sign_in(Session::new(token.access_token, identity)).await?;
        }

        Commands::Logout => {
            if ctx.store.logout()? {
                Notice::success("Signed out").emit();
            } else {
                Notice::info("No active session").emit();
            }
        }

        Commands::Whoami => match &ctx.session {
            Some(session) => println!("{}", session.user),
            None => Notice::info("Not logged in").emit(),
        },

        Commands::Status => {
            let health = ctx.client.health().await?;
            println!("Backend: {} ({})", ctx.client.base_url(), health.status);
            println!("Service: {}", health.name);
            match &ctx.session {
                Some(session) => println!("Session: {}", session.user),
                None => println!("Session: none"),
            }
            println!("State:   {}", ctx.store.path().display());
        }

        Commands::Show {
            view,
            estate,
            property,
            occupied,
            query,
            status,
        } => {
            let router = ctx.router();
            let view = match view {
                Some(name) => name.parse::<View>().map_err(|e| anyhow!(e))?,
                None => router.start_view()?,
            };
            let options = ViewOptions {
                estate_id: estate,
                units: UnitFilter {
                    property_id: property,
                    occupied,
                },
                tenant_query: query,
                invoice_status: status,
            };
            print!("{}", router.show(view, &options).await?);
        }

        Commands::Dashboard { width, chart } => {
            if let Some(width) = width {
                ctx.settings.chart_width = width;
            }
            if chart.is_some() {
                ctx.settings.chart_output = chart;
            }
            let output = ctx.router().show(View::Dashboard, &ViewOptions::default()).await?;
            print!("{}", output);
            if let (Some(path), Some(_)) = (&ctx.settings.chart_output, &ctx.session) {
                Notice::info(format!("Revenue chart written to {}", path.display())).emit();
            }
        }

        Commands::Invoices { status } => {
            let options = ViewOptions {
                invoice_status: status,
                ..Default::default()
            };
            print!("{}", ctx.router().show(View::Billing, &options).await?);
        }

        Commands::Create { record } => {
            ctx.require_session()?;
            create(&ctx, record).await?;
        }

        Commands::GenerateInvoices { lease_id } => {
            ctx.require_session()?;
            let generated = ctx.client.generate_invoices(lease_id).await?;
            Notice::success(format!(
                "Generated {} invoices for lease {}",
                generated.created, lease_id
            ))
            .emit();
        }

        Commands::Pay {
            invoice,
            amount,
            txn_ref,
        } => {
            ctx.require_session()?;
            let amount = match amount {
                Some(amount) => amount,
                None => ctx.client.invoice_amount(invoice).await?,
            };
            let txn_ref = txn_ref.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let payment = ctx
                .client
                .record_payment(&NewPayment {
                    invoice_id: invoice,
                    amount,
                    txn_ref,
                })
                .await?;
            Notice::success(format!(
                "Payment {} recorded: {} on invoice {} ({})",
                payment.id,
                ctx.settings.numbers.amount(payment.amount),
                payment.invoice_id,
                payment.txn_ref
            ))
            .emit();
        }

        Commands::TicketUpdate {
            id,
            status,
            priority,
        } => {
            ctx.require_session()?;
            if status.is_none() && priority.is_none() {
                return Err(anyhow!("Nothing to update: pass --status and/or --priority"));
            }
            let ticket = ctx
                .client
                .update_ticket(id, status.as_deref(), priority.as_deref())
                .await?;
            Notice::success(format!(
                "Ticket {} is {} ({} priority)",
                ticket.id, ticket.status, ticket.priority
            ))
            .emit();
            ctx.store.cache_ticket(ticket)?;
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

async fn create(ctx: &Console, record: CreateCommand) -> anyhow::Result<()> {
    let client = &ctx.client;
    let message = match record {
        CreateCommand::Estate { name, location } => {
            let estate = client.create_estate(&NewEstate { name, location }).await?;
            format!("Estate {} created (id {})", estate.name, estate.id)
        }
        CreateCommand::Property {
            estate_id,
            code,
            address,
        } => {
            let property = client
                .create_property(&NewProperty {
                    code,
                    address,
                    estate_id,
                })
                .await?;
            format!("Property {} created (id {})", property.code, property.id)
        }
        CreateCommand::Unit {
            property_id,
            label,
            bedrooms,
        } => {
            let unit = client
                .create_unit(&NewUnit {
                    property_id,
                    label,
                    bedrooms,
                })
                .await?;
            format!("Unit {} created (id {})", unit.label, unit.id)
        }
        CreateCommand::Tenant {
            full_name,
            email,
            phone,
        } => {
            let tenant = client
                .create_tenant(&NewTenant {
                    full_name,
                    email,
                    phone,
                })
                .await?;
            format!("Tenant {} created (id {})", tenant.full_name, tenant.id)
        }
        CreateCommand::Lease {
            unit_id,
            tenant_id,
            start,
            end,
            rent,
            frequency_months,
        } => {
            if end < start {
                return Err(anyhow!("Lease end {} is before start {}", end, start));
            }
            let lease = client
                .create_lease(&NewLease {
                    unit_id,
                    tenant_id,
                    start_date: start,
                    end_date: end,
                    rent_amount: rent,
                    frequency_months,
                })
                .await?;
            format!("Lease {} created for unit {}", lease.id, lease.unit_id)
        }
        CreateCommand::Ticket {
            unit_id,
            title,
            description,
            priority,
        } => {
            let ticket = client
                .create_ticket(&NewTicket {
                    unit_id,
                    title,
                    description,
                    priority,
                })
                .await?;
            let message = format!("Ticket {} opened (id {})", ticket.title, ticket.id);
            ctx.store.cache_ticket(ticket)?;
            message
        }
    };

    Notice::success(message).emit();
    Ok(())
}
