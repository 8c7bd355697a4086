//! EcoPlot command line client
//!
//! Renders the EcoPlot views in a terminal: the admin device/user tables,
//! the dashboard, device CRUD, recommendations, maintenance actions and the
//! theme preference. Each subcommand wires configuration to the API client
//! and one view component.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ecoplot_client::admin::AdminPanel;
use ecoplot_client::dashboard::Dashboard;
use ecoplot_client::devices::{DeviceForm, DeviceManager};
use ecoplot_client::models::FilterState;
use ecoplot_client::recommendations;
use ecoplot_client::theme::{Theme, ThemeStore};
use ecoplot_client::{ApiClient, ClientConfig, MaintenanceAction, Period};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ecoplot")]
#[command(about = "Client for the EcoPlot energy-monitoring API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL (overrides ECOPLOT_API_URL)
    #[arg(long, global = true, env = "ECOPLOT_API_URL")]
    api_url: Option<url::Url>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the admin device and user tables
    Admin {
        /// Filter by device type id
        #[arg(long)]
        type_id: Option<String>,
        /// Filter by owning user id
        #[arg(long)]
        user_id: Option<String>,
        /// Filter by brand id
        #[arg(long)]
        brand_id: Option<String>,
    },
    /// Render the dashboard for a period
    Dashboard {
        /// Aggregation window: day, week or month
        #[arg(long, default_value = "day")]
        period: String,
    },
    /// Device CRUD operations
    #[command(subcommand)]
    Device(DeviceCommand),
    /// Render the recommendations page
    Recommendations,
    /// Read or change the persisted theme preference
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// Run an admin maintenance action
    Maintenance {
        /// One of: init-db, seed-devices, clear-devices, reset-db,
        /// create-test-users, create-test-devices
        action: String,
    },
    /// Download the admin data export
    Export {
        /// Output file, defaults to ecoplot-export.json
        #[arg(long, default_value = "ecoplot-export.json")]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum DeviceCommand {
    /// Show a device and its pre-populated edit form
    Show { id: String },
    /// Add a device
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        type_id: String,
        #[arg(long)]
        brand_id: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        watts: Option<f64>,
        #[arg(long)]
        standby_watts: Option<f64>,
        #[arg(long)]
        schedulable: bool,
        #[arg(long)]
        ev_charger: bool,
        #[arg(long)]
        smart: bool,
        #[arg(long)]
        api_controllable: bool,
    },
    /// Update a device from its current record plus overrides
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        watts: Option<f64>,
    },
    /// Delete a device
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    /// Print the effective theme
    Get {
        /// Treat the system preference as dark
        #[arg(long)]
        system_dark: bool,
    },
    /// Store a theme choice: light or dark
    Set { value: String },
    /// Flip the theme
    Toggle {
        /// Treat the system preference as dark
        #[arg(long)]
        system_dark: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env().context("loading configuration")?;
    if let Some(api_url) = cli.api_url {
        config = config.with_base_url(api_url);
    }
    let client = ApiClient::new(&config).context("building API client")?;

    match cli.command {
        Command::Admin {
            type_id,
            user_id,
            brand_id,
        } => {
            let mut panel = AdminPanel::load(&client).await;
            panel.set_filter(FilterState {
                device_type: type_id.unwrap_or_default(),
                user: user_id.unwrap_or_default(),
                brand: brand_id.unwrap_or_default(),
            });

            for banner in panel.banners() {
                eprintln!("warning: {banner}");
            }

            let stats = panel.stats();
            println!(
                "{} devices | {:.2} kW total | {} smart",
                stats.device_count, stats.total_consumption_kw, stats.smart_device_count
            );

            let table = panel.render_device_table();
            if table.empty_state_visible {
                println!("No devices match the current filters.");
            } else {
                println!("{}", table.body_html);
            }
            println!("{}", panel.render_user_table());
        }
        Command::Dashboard { period } => {
            let period = Period::parse(&period)?;
            let mut dashboard = Dashboard::load(&client).await;
            if period != dashboard.period() {
                dashboard.set_period(&client, period).await;
            }

            for banner in dashboard.banners() {
                eprintln!("warning: {banner}");
            }

            if let Some(cards) = dashboard.render_summary_cards() {
                println!("Energy used:     {} ({})", cards.energy_used, cards.energy_used_change);
                println!(
                    "Solar generated: {} ({})",
                    cards.solar_generated, cards.solar_generated_change
                );
                println!("Carbon saved:    {} ({})", cards.carbon_saved, cards.carbon_saved_change);
                println!("Cost savings:    {} ({})", cards.cost_savings, cards.cost_savings_change);
            }

            if let Some(timeline) = &dashboard.timeline {
                if timeline.estimated {
                    println!("(timeline shows estimated data; live fetch failed)");
                }
                println!("Timeline buckets: {}", timeline.labels.len());
            }
            println!("{}", dashboard.render_top_devices());
            println!("{}", dashboard.render_recommendations());
        }
        Command::Device(device_command) => {
            let manager = DeviceManager::new(&client);
            match device_command {
                DeviceCommand::Show { id } => {
                    let (device, form) = manager.edit_form_for(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&device)?);
                    println!("{}", serde_json::to_string_pretty(&form)?);
                }
                DeviceCommand::Add {
                    name,
                    type_id,
                    brand_id,
                    model,
                    watts,
                    standby_watts,
                    schedulable,
                    ev_charger,
                    smart,
                    api_controllable,
                } => {
                    let form = DeviceForm {
                        name,
                        model,
                        power_consumption_watts: watts,
                        standby_power_watts: standby_watts,
                        is_schedulable: schedulable,
                        is_ev_charger: ev_charger,
                        is_smart_device: smart,
                        api_controllable,
                        ..DeviceForm::for_add(type_id, brand_id)
                    };
                    let outcome = manager.add(&form).await?;
                    println!(
                        "{}",
                        outcome.message.unwrap_or_else(|| "Device added".to_string())
                    );
                }
                DeviceCommand::Update {
                    id,
                    name,
                    model,
                    watts,
                } => {
                    let (_, mut form) = manager.edit_form_for(&id).await?;
                    if let Some(name) = name {
                        form.name = name;
                    }
                    if let Some(model) = model {
                        form.model = Some(model);
                    }
                    if let Some(watts) = watts {
                        form.power_consumption_watts = Some(watts);
                    }
                    let outcome = manager.update(&id, &form).await?;
                    println!(
                        "{}",
                        outcome
                            .message
                            .unwrap_or_else(|| "Device updated".to_string())
                    );
                }
                DeviceCommand::Delete { id } => {
                    let outcome = manager.delete(&id).await?;
                    println!(
                        "{}",
                        outcome
                            .message
                            .unwrap_or_else(|| "Device deleted".to_string())
                    );
                }
            }
        }
        Command::Recommendations => {
            let view = recommendations::load(&client).await?;
            println!("Monthly savings:      {}", view.monthly_savings);
            println!("Carbon reduction:     {}", view.carbon_reduction);
            println!("Total energy savings: {}", view.total_energy_savings);
            println!("{}", view.overall_html);
            println!("{}", view.device_cards_html);
            println!("{}", view.schedule_html);
            println!("{}", view.tips_html);
        }
        Command::Theme(theme_command) => {
            let store = ThemeStore::new(&config);
            match theme_command {
                ThemeCommand::Get { system_dark } => {
                    println!("{}", store.initial(system_dark)?.as_str());
                }
                ThemeCommand::Set { value } => {
                    let theme = Theme::parse(&value)?;
                    store.set(theme)?;
                    println!("{}", theme.as_str());
                }
                ThemeCommand::Toggle { system_dark } => {
                    println!("{}", store.toggle(system_dark)?.as_str());
                }
            }
        }
        Command::Maintenance { action } => {
            let action = parse_maintenance(&action)?;
            let message = client.run_maintenance(action).await?;
            println!("{}", message.unwrap_or_else(|| "Done".to_string()));
        }
        Command::Export { output } => {
            let blob = client.export_data().await?;
            tokio::fs::write(&output, &blob)
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            info!(bytes = blob.len(), path = %output.display(), "export written");
            println!("Wrote {} bytes to {}", blob.len(), output.display());
        }
    }

    Ok(())
}

fn parse_maintenance(value: &str) -> anyhow::Result<MaintenanceAction> {
    Ok(match value {
        "init-db" => MaintenanceAction::InitDb,
        "seed-devices" => MaintenanceAction::SeedDevices,
        "clear-devices" => MaintenanceAction::ClearDevices,
        "reset-db" => MaintenanceAction::ResetDb,
        "create-test-users" => MaintenanceAction::CreateTestUsers,
        "create-test-devices" => MaintenanceAction::CreateTestDevices,
        other => anyhow::bail!("unknown maintenance action '{other}'"),
    })
}
