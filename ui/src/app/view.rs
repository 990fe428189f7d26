//! Human-readable rendering of command results.

use crate::utils::table::Table;
use colored::{ColoredString, Colorize};
use nimbus_client::model::{AdminUserRecord, ResourceRecord, ResourceTemplate, UserRecord};
use nimbus_client::resources::catalog::{ICONS, icon_label};
use nimbus_client::resources::{DashboardStats, ResourceStatus};
use nimbus_client::theme::style::StyleSnapshot;
use nimbus_client::theme::{PALETTES, Palette, ThemeConfig, ThemeMode, ThemePhase};
use nimbus_client::users::can_manage;
use serde::Serialize;

const NONE: &str = "-";

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NONE)
}

fn status_colored(status: &str) -> ColoredString {
    match ResourceStatus::classify(status) {
        ResourceStatus::Running => status.green(),
        ResourceStatus::Stopped => status.red(),
        ResourceStatus::Pending => status.yellow(),
        ResourceStatus::Unknown => status.normal(),
    }
}

pub fn user_summary(user: &UserRecord) -> String {
    let role = user.role.map(|r| r.as_str()).unwrap_or(NONE);
    [
        format!("{}", user.label().bold()),
        format!("  id:       {}", user.id),
        format!("  email:    {}", user.email),
        format!("  role:     {role}"),
        format!("  tagline:  {}", or_dash(user.tagline.as_deref())),
        format!("  bio:      {}", or_dash(user.bio.as_deref())),
        format!("  avatar:   {}", or_dash(user.avatar_url.as_deref())),
    ]
    .join("\n")
}

pub fn resources_table(resources: &[ResourceRecord]) -> String {
    if resources.is_empty() {
        return "No resources yet. Create one with `nimbus resources create` or import templates."
            .to_string();
    }

    let mut table = Table::new(&["ID", "TITLE", "NAME", "KIND", "STATUS", "REGION", "CREATED"]);
    for resource in resources {
        table.add_row(vec![
            resource.id.to_string(),
            resource.title.clone(),
            resource.resource_name.clone(),
            icon_label(&resource.icon).to_string(),
            resource.status.clone(),
            resource.region.clone(),
            resource.created_at.clone(),
        ]);
    }
    table.render()
}

pub fn resource_details(resource: &ResourceRecord) -> String {
    [
        format!("{} (#{})", resource.title.bold(), resource.id),
        format!("  name:        {}", resource.resource_name),
        format!(
            "  kind:        {} ({})",
            icon_label(&resource.icon),
            resource.icon
        ),
        format!("  status:      {}", status_colored(&resource.status)),
        format!("  region:      {}", resource.region),
        format!("  created:     {}", resource.created_at),
        format!("  description: {}", or_dash(Some(resource.description.as_str()))),
    ]
    .join("\n")
}

pub fn templates_table(templates: &[ResourceTemplate]) -> String {
    if templates.is_empty() {
        return "No templates available. An admin can create the defaults with `nimbus resources seed`."
            .to_string();
    }

    let mut table = Table::new(&["ID", "TITLE", "NAME", "KIND", "REGION", "DESCRIPTION"]);
    for template in templates {
        table.add_row(vec![
            template.id.to_string(),
            template.title.clone(),
            template.resource_name.clone(),
            icon_label(&template.icon).to_string(),
            template.region.clone(),
            template.description.clone(),
        ]);
    }
    table.render()
}

pub fn icons_table() -> String {
    let mut table = Table::new(&["ICON", "KIND"]);
    for (key, label) in ICONS.iter() {
        table.add_row(vec![key.to_string(), label.to_string()]);
    }
    table.render()
}

pub fn users_table(users: &[AdminUserRecord], actor: &UserRecord) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let mut table = Table::new(&["ID", "EMAIL", "NAME", "ROLE", "CREATED", "NOTE"]);
    for user in users {
        let note = if user.id == actor.id {
            "you"
        } else if user.is_protected {
            "protected"
        } else if !can_manage(actor, user) {
            "read-only"
        } else {
            ""
        };
        table.add_row(vec![
            user.id.clone(),
            user.email.clone(),
            or_dash(user.display_name.as_deref()).to_string(),
            user.role.to_string(),
            or_dash(Some(user.created_at.as_str())).to_string(),
            note.to_string(),
        ]);
    }
    table.render()
}

pub fn stats_summary(stats: &DashboardStats) -> String {
    [
        format!("{}", "Dashboard".bold()),
        format!("  active resources: {}", stats.active_resources),
        format!("  running:          {}", stats.running.to_string().green()),
        format!("  stopped:          {}", stats.stopped.to_string().red()),
        format!("  pending:          {}", stats.pending.to_string().yellow()),
    ]
    .join("\n")
}

/// Theme state as reported by `nimbus theme show`.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeView {
    pub user_id: Option<String>,
    pub loaded: bool,
    pub mode: ThemeMode,
    pub palette: &'static str,
    pub saved: Option<ThemeConfig>,
    pub styles: StyleSnapshot,
}

impl ThemeView {
    pub fn new(
        phase: &ThemePhase,
        mode: ThemeMode,
        palette: &'static Palette,
        saved: Option<ThemeConfig>,
        styles: StyleSnapshot,
    ) -> Self {
        Self {
            user_id: phase.user_id().map(str::to_string),
            loaded: phase.is_ready(),
            mode,
            palette: palette.id,
            saved,
            styles,
        }
    }
}

pub fn theme_summary(view: &ThemeView) -> String {
    let mut lines = vec![
        format!("{}", "Theme".bold()),
        format!("  mode:     {}", view.mode),
        format!("  palette:  {}", view.palette),
    ];

    match &view.saved {
        Some(saved) => {
            lines.push(format!(
                "  primary:  {}",
                or_dash(saved.primary_color())
            ));
            lines.push(format!("  accent:   {}", or_dash(saved.accent_color())));
        }
        None if view.loaded => lines.push("  (no saved theme, using defaults)".to_string()),
        None => lines.push("  (not signed in, using defaults)".to_string()),
    }

    for (slot, value) in &view.styles.properties {
        lines.push(format!("  {slot:<9} hsl({value})"));
    }

    lines.join("\n")
}

pub fn palettes_table(selected: &Palette) -> String {
    let mut table = Table::new(&["", "ID", "NAME", "PRIMARY", "ACCENT", "DESCRIPTION"]);
    for palette in PALETTES.iter() {
        let marker = if palette.id == selected.id { "*" } else { "" };
        table.add_row(vec![
            marker.to_string(),
            palette.id.to_string(),
            palette.name.to_string(),
            palette.primary.to_string(),
            palette.accent.to_string(),
            palette.description.to_string(),
        ]);
    }
    table.render()
}
