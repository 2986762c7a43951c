//! CLI argument definitions for the stationery desk.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use domain::models::{Role, Urgency};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "stationery",
    version,
    about = "Stationery Desk - requests, inventory and alerts",
    long_about = "Manage stationery requests and inventory.\n\n\
                  State is kept in a data directory of JSON snapshots, so a login\n\
                  persists between invocations until `logout`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding default.toml and local.toml.
    #[arg(long = "config-dir", value_name = "DIR", default_value = "config", global = true)]
    pub config_dir: PathBuf,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a user account.
    Register(RegisterArgs),

    /// Log in as a user or admin.
    Login(LoginArgs),

    /// End the current session.
    Logout,

    /// Show the current session.
    Whoami,

    /// Update the logged-in user's profile.
    Profile(ProfileArgs),

    /// Change the logged-in user's password.
    Password(PasswordArgs),

    /// Request a password reset notice.
    ForgotPassword {
        #[arg(value_name = "EMAIL")]
        email: String,
    },

    /// Submit, list and decide item requests.
    #[command(subcommand)]
    Request(RequestCommand),

    /// Inspect and adjust inventory.
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Work with the notification bell.
    #[command(subcommand)]
    Notifications(NotificationCommand),

    /// Change user settings.
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Print a summary report.
    #[command(subcommand)]
    Report(ReportCommand),

    /// Show the dashboard for the logged-in role.
    Dashboard,

    /// Check whether the current session may open a page.
    Access {
        /// Page name or path, e.g. `inventory` or `/app/catalog.html`.
        #[arg(value_name = "PAGE")]
        page: String,
    },

    /// Poll alert rules on the configured interval until Ctrl-C.
    Watch,
}

#[derive(Parser)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Parser)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long, value_enum, default_value = "user")]
    pub role: RoleArg,
}

#[derive(Parser)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Parser)]
pub struct PasswordArgs {
    #[arg(long)]
    pub current: String,

    #[arg(long)]
    pub new: String,
}

#[derive(Subcommand)]
pub enum RequestCommand {
    /// Submit a new request as the logged-in user.
    Submit {
        #[arg(long)]
        item: String,

        #[arg(long)]
        category: String,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        #[arg(long, value_enum, default_value = "medium")]
        urgency: UrgencyArg,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List requests (all, or only your own with --mine).
    List {
        #[arg(long)]
        mine: bool,
    },

    /// Approve requests by id. Unknown ids are ignored.
    Approve {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<Uuid>,
    },

    /// Reject requests by id. Unknown ids are ignored.
    Reject {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<Uuid>,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommand {
    /// List all items.
    List,

    /// List items at or below their reorder threshold.
    Low,

    /// Add an item, or replace the item with the same name.
    Save {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        stock: u32,

        #[arg(long = "min-stock")]
        min_stock: u32,

        #[arg(long)]
        price: f64,
    },

    /// Change an item's stock by a signed amount.
    Adjust {
        /// Item id or exact name.
        #[arg(value_name = "ITEM")]
        item: String,

        #[arg(long, allow_negative_numbers = true)]
        by: i64,
    },
}

#[derive(Subcommand)]
pub enum NotificationCommand {
    /// Show recent notifications (or every one with --all).
    List {
        #[arg(long)]
        all: bool,
    },

    /// Mark one notification read.
    Read {
        #[arg(value_name = "ID")]
        id: Uuid,
    },

    /// Mark every notification read.
    ReadAll,

    /// Delete every notification.
    Clear,

    /// Run the alert rules once.
    Check,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Turn email copies of notifications on or off.
    EmailNotifications {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Request counts within a date range (default: last 30 days).
    Requests {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },

    /// Inventory valuation.
    Inventory,

    /// User population and activity.
    Users,
}

/// CLI role choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

/// CLI urgency choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum UrgencyArg {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Low => Urgency::Low,
            UrgencyArg::Medium => Urgency::Medium,
            UrgencyArg::High => Urgency::High,
            UrgencyArg::Urgent => Urgency::Urgent,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}
