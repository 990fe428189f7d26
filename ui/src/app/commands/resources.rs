use crate::app::App;
use crate::app::cli::{NewResourceArgs, ResourceCommand, ResourceFields};
use crate::app::view;
use crate::error::{AppError, AppResult};
use crate::utils::prompt::confirm;
use chrono::NaiveDateTime;
use nimbus_client::model::{CREATED_AT_FORMAT, ResourceDraft};
use nimbus_client::resources::catalog::{ICONS, is_known_icon};

pub async fn run(app: &App, command: ResourceCommand) -> AppResult<()> {
    app.require_user().await?;
    let resources = &app.console().resources;
    let output = app.output();

    match command {
        ResourceCommand::List => {
            let list = resources.list().await?;
            output.emit(&list, |list| view::resources_table(list))
        }
        ResourceCommand::Show { id } => {
            let resource = resources.get(id).await?;
            output.emit(&resource, view::resource_details)
        }
        ResourceCommand::Create(args) => {
            let draft = new_draft(args)?;
            let created = resources.create(&draft).await?;
            output.emit(&created, |r| {
                format!("Created resource #{}.\n{}", r.id, view::resource_details(r))
            })
        }
        ResourceCommand::Update {
            id,
            title,
            resource_name,
            fields,
        } => {
            let current = resources.get(id).await?;
            let mut draft = ResourceDraft::from(&current);
            if let Some(title) = title {
                draft.title = required_text("title", title)?;
            }
            if let Some(name) = resource_name {
                draft.resource_name = required_text("name", name)?;
            }
            apply_fields(&mut draft, fields)?;

            let updated = resources.update(id, &draft).await?;
            output.emit(&updated, |r| {
                format!("Updated resource #{}.\n{}", r.id, view::resource_details(r))
            })
        }
        ResourceCommand::Delete { id, yes } => {
            let resource = resources.get(id).await?;
            let question = format!("Delete resource '{}' (#{id})?", resource.title);
            if !yes && !confirm(&question).map_err(read_error)? {
                return output.message("Cancelled.");
            }
            resources.delete(id).await?;
            output.message(&format!("Deleted resource #{id}."))
        }
        ResourceCommand::Templates => {
            let templates = resources.templates().await?;
            output.emit(&templates, |t| view::templates_table(t))
        }
        ResourceCommand::Import { ids } => {
            resources.import_templates(&ids).await?;
            output.message(&format!("Imported {} template(s).", ids.len()))
        }
        ResourceCommand::Seed => {
            resources.seed_templates().await?;
            output.message("Default templates created.")
        }
        ResourceCommand::Icons => {
            let icons: Vec<_> = ICONS
                .iter()
                .map(|(icon, label)| serde_json::json!({ "icon": icon, "kind": label }))
                .collect();
            output.emit(&icons, |_| view::icons_table())
        }
    }
}

pub async fn dashboard(app: &App) -> AppResult<()> {
    app.require_user().await?;
    let stats = app.console().resources.stats().await?;
    app.output().emit(&stats, view::stats_summary)
}

fn read_error(e: std::io::Error) -> AppError {
    AppError::Input(format!("Failed to read answer: {e}"))
}

fn required_text(field: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Input(format!("{field} cannot be empty")));
    }
    Ok(value)
}

/// Builds a creation request; unspecified fields take the dashboard defaults.
pub fn new_draft(args: NewResourceArgs) -> AppResult<ResourceDraft> {
    let mut draft = ResourceDraft {
        title: required_text("title", args.title)?,
        resource_name: required_text("name", args.resource_name)?,
        ..Default::default()
    };
    apply_fields(&mut draft, args.fields)?;
    Ok(draft)
}

/// Overlays the given fields on `draft`, validating icon and timestamp.
pub fn apply_fields(draft: &mut ResourceDraft, fields: ResourceFields) -> AppResult<()> {
    if let Some(description) = fields.description {
        draft.description = description.trim().to_string();
    }
    if let Some(icon) = fields.icon {
        let icon = icon.trim().to_lowercase();
        if !is_known_icon(&icon) {
            return Err(AppError::Input(format!(
                "Unknown icon '{icon}'. Run `nimbus resources icons` for the list."
            )));
        }
        draft.icon = icon;
    }
    if let Some(status) = fields.status {
        draft.status = required_text("status", status)?;
    }
    if let Some(region) = fields.region {
        draft.region = required_text("region", region)?;
    }
    if let Some(created_at) = fields.created_at {
        let created_at = created_at.trim();
        NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT).map_err(|_| {
            AppError::Input(format!(
                "Invalid creation time '{created_at}', expected YYYY-MM-DDTHH:MM"
            ))
        })?;
        draft.created_at = created_at.to_string();
    }
    Ok(())
}
