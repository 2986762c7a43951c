//! Command execution for the `stationery` binary.
//!
//! Each command maps onto one service call. Output is plain text unless
//! `--json` was given.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::Duration as ChronoDuration;
use domain::models::{
    InventoryItem, ItemRequest, NewRequest, Notification, ProfilePatch, RegisterUser, Session,
};
use domain::services::{format_relative_time, AccessDecision, Page};
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::app::AppContext;
use crate::cli::{
    Command, InventoryCommand, NotificationCommand, ReportCommand, RequestCommand,
    SettingsCommand, Toggle,
};
use crate::jobs::{JobScheduler, NotificationPollJob};
use crate::services::Dashboard;

/// Default span of the request report when no dates are given.
const DEFAULT_REPORT_DAYS: i64 = 30;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs one parsed command against the application context.
pub async fn run(ctx: &AppContext, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Register(args) => {
            let user = ctx
                .auth
                .register(RegisterUser {
                    name: args.name,
                    email: args.email,
                    password: args.password,
                    department: args.department,
                    phone: args.phone,
                })
                .await?;
            if json {
                print_json(&json!({
                    "id": user.id,
                    "name": user.name,
                    "email": user.email,
                    "role": user.role,
                }))?;
            } else {
                println!("Registered {} <{}> ({})", user.name, user.email, user.id);
            }
        }

        Command::Login(args) => {
            let session = ctx.auth.login(&args.email, &args.password, args.role.into()).await?;
            if json {
                print_json(&session)?;
            } else {
                println!("Logged in as {} ({})", session.name, session.role);
                println!("Home: {}", Page::home_for(session.role));
            }
        }

        Command::Logout => {
            ctx.auth.logout().await?;
            if !json {
                println!("Logged out");
            }
        }

        Command::Whoami => match ctx.auth.current_session().await? {
            Some(session) if json => print_json(&session)?,
            Some(session) => print_session(&session),
            None if json => print_json(&serde_json::Value::Null)?,
            None => println!("Not logged in"),
        },

        Command::Profile(args) => {
            let patch = ProfilePatch {
                name: args.name,
                email: args.email,
                department: args.department,
                phone: args.phone,
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one of --name, --email, --department, --phone");
            }
            let session = ctx.auth.update_profile(patch).await?;
            if json {
                print_json(&session)?;
            } else {
                println!("Profile updated");
                print_session(&session);
            }
        }

        Command::Password(args) => {
            ctx.auth.change_password(&args.current, &args.new).await?;
            if !json {
                println!("Password changed");
            }
        }

        Command::ForgotPassword { email } => {
            let ack = ctx.auth.reset_password(&email).await?;
            if json {
                print_json(&json!({ "email": ack.email }))?;
            } else {
                println!("Password reset instructions sent to {}", ack.email);
            }
        }

        Command::Request(command) => run_request(ctx, command, json).await?,
        Command::Inventory(command) => run_inventory(ctx, command, json).await?,
        Command::Notifications(command) => run_notifications(ctx, command, json).await?,
        Command::Settings(command) => run_settings(ctx, command, json).await?,
        Command::Report(command) => run_report(ctx, command, json).await?,

        Command::Dashboard => {
            let dashboard = ctx.reports.dashboard().await?;
            if json {
                print_json(&dashboard)?;
            } else {
                print_dashboard(&dashboard);
            }
        }

        Command::Access { page } => {
            let path = if page.contains('.') || page.is_empty() {
                page
            } else {
                format!("{page}.html")
            };
            let page = Page::from_path(&path);
            let decision = ctx.auth.check_access(&page).await?;
            match (decision, json) {
                (AccessDecision::Allow, true) => {
                    print_json(&json!({ "page": page.path(), "allowed": true }))?
                }
                (AccessDecision::Redirect(to), true) => print_json(
                    &json!({ "page": page.path(), "allowed": false, "redirect": to.path() }),
                )?,
                (AccessDecision::Allow, false) => println!("{page}: allowed"),
                (AccessDecision::Redirect(to), false) => println!("{page}: redirect to {to}"),
            }
        }

        Command::Watch => watch(ctx).await?,
    }

    Ok(())
}

async fn run_request(ctx: &AppContext, command: RequestCommand, json: bool) -> anyhow::Result<()> {
    match command {
        RequestCommand::Submit {
            item,
            category,
            quantity,
            urgency,
            description,
        } => {
            let request = ctx
                .requests
                .submit(NewRequest {
                    item_name: item,
                    category,
                    quantity,
                    urgency: urgency.into(),
                    description,
                })
                .await?;
            if json {
                print_json(&request)?;
            } else {
                println!("Submitted request {}", request.id);
            }
        }
        RequestCommand::List { mine } => {
            let requests = if mine {
                ctx.requests.my_requests().await?
            } else {
                ctx.requests.list().await?
            };
            if json {
                print_json(&requests)?;
            } else {
                print_requests(&requests);
            }
        }
        RequestCommand::Approve { ids } => {
            let changed = ctx.requests.bulk_approve(&ids).await?;
            print_changed(json, "approved", changed, ids.len())?;
        }
        RequestCommand::Reject { ids } => {
            let changed = ctx.requests.reject(&ids).await?;
            print_changed(json, "rejected", changed, ids.len())?;
        }
    }
    Ok(())
}

async fn run_inventory(ctx: &AppContext, command: InventoryCommand, json: bool) -> anyhow::Result<()> {
    match command {
        InventoryCommand::List => {
            let items = ctx.inventory.list().await?;
            if json {
                print_json(&items)?;
            } else {
                print_items(&items);
            }
        }
        InventoryCommand::Low => {
            let items = ctx.inventory.low_stock_items().await?;
            if json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("No items are low on stock");
            } else {
                print_items(&items);
            }
        }
        InventoryCommand::Save {
            name,
            category,
            stock,
            min_stock,
            price,
        } => {
            let id = match ctx.inventory.find_by_name(&name).await? {
                Some(existing) => existing.id,
                None => Uuid::new_v4(),
            };
            let saved = ctx
                .inventory
                .upsert_item(InventoryItem {
                    id,
                    name: name.trim().to_string(),
                    category,
                    stock,
                    min_stock,
                    price,
                })
                .await?;
            if json {
                print_json(&saved)?;
            } else {
                print_items(std::slice::from_ref(&saved));
            }
        }
        InventoryCommand::Adjust { item, by } => {
            let id = match item.parse::<Uuid>() {
                Ok(id) => ctx.inventory.find(id).await?.id,
                Err(_) => {
                    ctx.inventory
                        .find_by_name(&item)
                        .await?
                        .ok_or_else(|| anyhow!("no inventory item named '{item}'"))?
                        .id
                }
            };
            let updated = ctx.inventory.adjust_stock(id, by).await?;
            if json {
                print_json(&updated)?;
            } else {
                println!(
                    "{}: stock {} (min {}, {})",
                    updated.name,
                    updated.stock,
                    updated.min_stock,
                    updated.stock_level()
                );
            }
        }
    }
    Ok(())
}

async fn run_notifications(
    ctx: &AppContext,
    command: NotificationCommand,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        NotificationCommand::List { all } => {
            let notifications = if all {
                let mut all = ctx.notifications.list().await?;
                all.reverse();
                all
            } else {
                ctx.notifications.recent(None).await?
            };
            if json {
                print_json(&notifications)?;
            } else {
                let unread = ctx.notifications.unread_count().await?;
                println!("{unread} unread");
                for notification in &notifications {
                    print_notification(ctx, notification);
                }
            }
        }
        NotificationCommand::Read { id } => {
            let found = ctx.notifications.mark_read(id).await?;
            if !found {
                bail!("no notification with id {id}");
            }
            if !json {
                println!("Marked {id} read");
            }
        }
        NotificationCommand::ReadAll => {
            let changed = ctx.notifications.mark_all_read().await?;
            if json {
                print_json(&json!({ "marked": changed }))?;
            } else {
                println!("Marked {changed} notification(s) read");
            }
        }
        NotificationCommand::Clear => {
            ctx.notifications.clear_all().await?;
            if !json {
                println!("Notifications cleared");
            }
        }
        NotificationCommand::Check => {
            let outcome = ctx.notifications.poll().await?;
            let created: Vec<&Notification> = outcome
                .low_stock
                .iter()
                .chain(outcome.pending_requests.iter())
                .collect();
            if json {
                print_json(&created)?;
            } else if created.is_empty() {
                println!("No new alerts");
            } else {
                for notification in created {
                    print_notification(ctx, notification);
                }
            }
        }
    }
    Ok(())
}

async fn run_settings(ctx: &AppContext, command: SettingsCommand, json: bool) -> anyhow::Result<()> {
    match command {
        SettingsCommand::EmailNotifications { state } => {
            let settings = ctx
                .notifications
                .set_email_notifications(state == Toggle::On)
                .await?;
            if json {
                print_json(&settings)?;
            } else {
                let label = if settings.email_notifications { "on" } else { "off" };
                println!("Email notifications {label}");
            }
        }
    }
    Ok(())
}

async fn run_report(ctx: &AppContext, command: ReportCommand, json: bool) -> anyhow::Result<()> {
    match command {
        ReportCommand::Requests { from, to } => {
            let today = ctx.clock.now().date_naive();
            let to = to.unwrap_or(today);
            let from = from.unwrap_or(to - ChronoDuration::days(DEFAULT_REPORT_DAYS));
            let range = domain::models::DateRange::from_days(from, to)
                .with_context(|| format!("invalid date range {from}..{to}"))?;
            let report = ctx.reports.request_report(range).await?;
            if json {
                print_json(&report)?;
            } else {
                println!("Requests {from} to {to}");
                println!(
                    "  total {}  approved {}  pending {}  rejected {}",
                    report.total, report.approved, report.pending, report.rejected
                );
                print_counts("By category", &report.by_category);
                print_counts("By urgency", &report.by_urgency);
            }
        }
        ReportCommand::Inventory => {
            let report = ctx.reports.inventory_report().await?;
            if json {
                print_json(&report)?;
            } else {
                println!("Items: {}", report.total_items);
                println!("Total value: {:.2}", report.total_value);
                println!("Low stock: {}", report.low_stock_items);
                match report.average_price {
                    Some(avg) => println!("Average price: {avg:.2}"),
                    None => println!("Average price: n/a"),
                }
                print_counts("By category", &report.by_category);
            }
        }
        ReportCommand::Users => {
            let report = ctx.reports.user_report().await?;
            if json {
                print_json(&report)?;
            } else {
                println!("Users: {} ({} active)", report.total_users, report.active_users);
                print_counts("By department", &report.by_department);
                println!("Requests per user:");
                for (user_id, count) in &report.requests_per_user {
                    println!("  {user_id}  {count}");
                }
            }
        }
    }
    Ok(())
}

/// Polls on the configured interval and prints toasts until Ctrl-C.
async fn watch(ctx: &AppContext) -> anyhow::Result<()> {
    let mut toasts = ctx.notifications.subscribe_toasts();
    let mut changes = ctx.storage.subscribe();

    let mut scheduler = JobScheduler::new();
    scheduler.register(NotificationPollJob::new(
        ctx.notifications.clone(),
        ctx.config.notifications.poll_interval_secs,
    ));
    scheduler.start();

    println!(
        "Watching for alerts every {}s (Ctrl-C to stop)",
        ctx.config.notifications.poll_interval_secs.max(1)
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                break;
            }
            toast = toasts.recv() => match toast {
                Ok(notification) => print_notification(ctx, &notification),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Toast listener lagged");
                }
                Err(RecvError::Closed) => break,
            },
            change = changes.recv() => match change {
                Ok(change) => tracing::debug!(key = %change.key, kind = ?change.kind, "Store changed"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change listener lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    scheduler.shutdown();
    scheduler.wait_for_shutdown(SHUTDOWN_TIMEOUT).await;
    Ok(())
}

fn print_changed(json: bool, verb: &str, changed: usize, requested: usize) -> anyhow::Result<()> {
    if json {
        print_json(&json!({ "status": verb, "changed": changed, "requested": requested }))
    } else {
        println!("{changed} of {requested} request(s) {verb}");
        Ok(())
    }
}

fn print_session(session: &Session) {
    println!("{} <{}>", session.name, session.email);
    println!("  role: {}", session.role);
    if let Some(department) = &session.department {
        println!("  department: {department}");
    }
    if let Some(phone) = &session.phone {
        println!("  phone: {phone}");
    }
    println!("  since: {}", session.login_at.format("%Y-%m-%d %H:%M UTC"));
}

fn print_requests(requests: &[ItemRequest]) {
    if requests.is_empty() {
        println!("No requests");
        return;
    }
    for request in requests {
        println!(
            "{}  {:<8}  {:<6}  {} x{} ({}) by {} on {}",
            request.id,
            request.status,
            request.urgency.as_str(),
            request.item_name,
            request.quantity,
            request.category,
            request.user_name,
            request.request_date.format("%Y-%m-%d"),
        );
    }
}

fn print_items(items: &[InventoryItem]) {
    for item in items {
        println!(
            "{}  {:<24} {:<16} stock {:>4} / min {:>3}  {:>8.2}  {}",
            item.id,
            item.name,
            item.category,
            item.stock,
            item.min_stock,
            item.price,
            item.stock_level()
        );
    }
}

fn print_notification(ctx: &AppContext, notification: &Notification) {
    let marker = if notification.read { " " } else { "*" };
    println!(
        "{marker} [{}] {}: {} ({}) {}",
        notification.notification_type,
        notification.title,
        notification.message,
        format_relative_time(notification.timestamp, ctx.clock.now()),
        notification.id,
    );
}

fn print_counts(title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    println!("{title}:");
    for (name, count) in counts {
        println!("  {name:<20} {count}");
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    match dashboard {
        Dashboard::Admin(overview) => {
            let stats = &overview.stats;
            println!(
                "Users {}  Pending {}  Items {}  Low stock {}",
                stats.total_users, stats.pending_requests, stats.total_items, stats.low_stock
            );
            let dist = &overview.stock_distribution;
            println!("Stock: low {}  normal {}  high {}", dist.low, dist.normal, dist.high);
            println!("Requests per day:");
            for day in &overview.daily_requests {
                println!("  {}  {}", day.date, day.count);
            }
            println!("Monthly trend:");
            for month in &overview.monthly_trend {
                println!(
                    "  {}  approved {}  pending {}  rejected {}",
                    month.month, month.approved, month.pending, month.rejected
                );
            }
            print_counts("By category", &overview.requests_by_category);
            println!("Recent requests:");
            print_requests(&overview.recent_requests);
        }
        Dashboard::User(overview) => {
            let stats = &overview.stats;
            println!(
                "Requests {}  Pending {}  Approved {}  Rejected {}",
                stats.total_requests,
                stats.pending_requests,
                stats.approved_requests,
                stats.rejected_requests
            );
            println!("Recent requests:");
            print_requests(&overview.recent_requests);
        }
    }
}
