//! Plain-text rendering of view state.

use std::io::{self, Write};

use booking_core::views::admin::{AdminDashboard, AdminFilter};
use booking_core::views::dashboard::{card_actions, Dashboard, Tab};
use booking_core::views::form::{min_date_time, AppointmentForm, INPUT_FORMAT};
use booking_core::views::nav::NavItem;
use booking_core::{Appointment, Role, ServiceType, User};
use chrono::NaiveDateTime;

const DISPLAY_FORMAT: &str = "%a %b %e %Y, %H:%M";

pub fn nav(out: &mut impl Write, items: &[NavItem]) -> io::Result<()> {
    let labels: Vec<String> = items.iter().map(NavItem::label).collect();
    writeln!(out, "Smart Appointment Booking  |  {}", labels.join("  |  "))?;
    writeln!(out)
}

pub fn home(out: &mut impl Write, signed_in: bool) -> io::Result<()> {
    writeln!(out, "Book appointments with trusted professionals.")?;
    writeln!(out)?;
    writeln!(out, "Services:")?;
    for service in ServiceType::ALL {
        writeln!(out, "  - {}", service.label())?;
    }
    writeln!(out)?;
    if signed_in {
        writeln!(out, "Go to your dashboard: booking dashboard")
    } else {
        writeln!(out, "Get started: booking register  or  booking login")
    }
}

pub fn not_found(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "404 - Page Not Found")?;
    writeln!(out, "The page you are looking for does not exist.")
}

pub fn login_prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Login")?;
    writeln!(out, "  booking login --email <EMAIL> --password <PASSWORD>")
}

pub fn register_prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Create an account")?;
    writeln!(
        out,
        "  booking register --name <NAME> --email <EMAIL> --password <PASSWORD> [--phone <PHONE>] [--role customer|service-provider]"
    )
}

pub fn message(out: &mut impl Write, label: &str, text: &str) -> io::Result<()> {
    writeln!(out, "[{label}] {text}")
}

fn party(name: Option<&str>, email: Option<&str>, id: i64) -> String {
    match (name, email) {
        (Some(name), Some(email)) => format!("{name} ({email})"),
        (Some(name), None) => name.to_string(),
        _ => format!("user #{id}"),
    }
}

pub fn appointment_card(out: &mut impl Write, apt: &Appointment, provider_view: bool) -> io::Result<()> {
    writeln!(
        out,
        "#{:<4} {}  {}  [{}]",
        apt.id,
        apt.appointment_date_time.format(DISPLAY_FORMAT),
        apt.service_type.label(),
        apt.status
    )?;
    if provider_view {
        let customer = party(apt.customer_name.as_deref(), apt.customer_email.as_deref(), apt.customer_id);
        writeln!(out, "      customer: {customer}")?;
    } else {
        let provider = party(
            apt.service_provider_name.as_deref(),
            apt.service_provider_email.as_deref(),
            apt.service_provider_id,
        );
        writeln!(out, "      provider: {provider}")?;
    }
    if let Some(notes) = apt.notes.as_deref().filter(|n| !n.is_empty()) {
        writeln!(out, "      notes: {notes}")?;
    }
    let actions: Vec<&str> = card_actions(apt, provider_view).into_iter().map(|a| a.label()).collect();
    if !actions.is_empty() {
        writeln!(out, "      actions: {}", actions.join(", "))?;
    }
    Ok(())
}

pub fn dashboard(out: &mut impl Write, dash: &Dashboard) -> io::Result<()> {
    let heading = match dash.viewer().role {
        Role::ServiceProvider => "Provider Dashboard",
        Role::Customer | Role::Admin => "My Appointments",
    };
    writeln!(out, "{heading}")?;
    if let Some(info) = dash.info() {
        message(out, "info", info)?;
    }
    if let Some(error) = dash.error() {
        message(out, "error", error)?;
    }

    let stats = dash.stats();
    writeln!(
        out,
        "Total: {}   Upcoming: {}   Pending: {}   Completed: {}",
        stats.total, stats.upcoming, stats.pending, stats.completed
    )?;

    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|t| if *t == dash.tab() { format!("[{}]", t.label()) } else { t.label().to_string() })
        .collect();
    writeln!(out, "{}", tabs.join(" "))?;
    writeln!(out)?;

    let visible = dash.visible();
    if visible.is_empty() {
        writeln!(out, "No appointments found.")?;
    }
    for apt in visible {
        appointment_card(out, apt, dash.is_provider_view())?;
    }
    if !dash.is_provider_view() {
        writeln!(out)?;
        writeln!(out, "Book a new appointment: booking book")?;
    }
    Ok(())
}

pub fn admin(out: &mut impl Write, view: &AdminDashboard) -> io::Result<()> {
    writeln!(out, "Admin Dashboard")?;
    if let Some(info) = view.info() {
        message(out, "info", info)?;
    }
    if let Some(error) = view.error() {
        message(out, "error", error)?;
    }
    let s = view.stats();
    writeln!(
        out,
        "Total: {}   Pending: {}   Confirmed: {}   Completed: {}   Cancelled: {}",
        s.total, s.pending, s.confirmed, s.completed, s.cancelled
    )?;
    match view.filter() {
        AdminFilter::All => writeln!(out, "Showing all appointments")?,
        AdminFilter::Status(status) => writeln!(out, "Showing {status} appointments")?,
        AdminFilter::Search(keyword) => writeln!(out, "Search results for \"{keyword}\"")?,
    }
    writeln!(out)?;
    if view.appointments().is_empty() {
        writeln!(out, "No appointments found.")?;
    }
    for apt in view.appointments() {
        writeln!(
            out,
            "#{:<4} {}  {}  {} -> {}  [{}]",
            apt.id,
            apt.appointment_date_time.format(INPUT_FORMAT),
            apt.service_type,
            apt.customer_name.as_deref().unwrap_or("?"),
            apt.service_provider_name.as_deref().unwrap_or("?"),
            apt.status
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Users ({}):", view.users().len())?;
    for user in view.users() {
        writeln!(out, "  #{:<4} {:<24} {:<32} {}", user.id, user.name, user.email, user.role)?;
    }
    Ok(())
}

pub fn access_denied(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")
}

pub fn providers(out: &mut impl Write, providers: &[User]) -> io::Result<()> {
    if providers.is_empty() {
        return writeln!(out, "No service providers available.");
    }
    for p in providers {
        writeln!(out, "  {:<4} {} - {}", p.id, p.name, p.email)?;
    }
    Ok(())
}

pub fn form(out: &mut impl Write, form: &AppointmentForm, now: NaiveDateTime) -> io::Result<()> {
    let mode = form.mode();
    writeln!(out, "{}", mode.title())?;
    if let Some(error) = form.error() {
        message(out, "error", error)?;
    }
    writeln!(out, "Service providers:")?;
    for (id, label) in form.provider_options() {
        writeln!(out, "  {id:<4} {label}")?;
    }
    writeln!(out, "Service types:")?;
    for service in ServiceType::ALL {
        writeln!(out, "  {:<11} {}", service.as_str(), service.label())?;
    }
    writeln!(out, "Earliest date & time: {}", min_date_time(now).format(INPUT_FORMAT))?;
    if mode.is_edit() {
        let f = &form.fields;
        writeln!(out, "Current values:")?;
        writeln!(out, "  provider: {}", f.service_provider_id)?;
        writeln!(out, "  service:  {}", f.service_type)?;
        writeln!(out, "  when:     {}", f.appointment_date_time)?;
        writeln!(out, "  notes:    {}", f.notes)?;
    }
    Ok(())
}
