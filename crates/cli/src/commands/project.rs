//! Project-level settings: license tier, name and reset

use anyhow::Result;
use serde_json::json;
use sizer_lib::{LicenseTier, SizingSource, SizingStore, StructuredLogger};

use super::Session;
use crate::output::{print_info, print_json, print_success, OutputFormat};

/// Show the license tier
pub fn show_license(session: &Session) -> Result<()> {
    let license = session.store.license();
    match session.format {
        OutputFormat::Json => print_json(&json!({ "license": license }))?,
        OutputFormat::Table => println!("{}", license),
    }
    Ok(())
}

/// Change the license tier
pub fn set_license(session: &mut Session, license: LicenseTier) -> Result<()> {
    session.store.set_license(license)?;
    session
        .logger
        .log_setting_changed("license", license.name());

    match session.format {
        OutputFormat::Json => print_json(&json!({ "license": license }))?,
        OutputFormat::Table => print_success(&format!("License set to {}", license)),
    }
    Ok(())
}

/// Show the project name
pub fn show_name(session: &Session) -> Result<()> {
    let name = session.store.project_name();
    match session.format {
        OutputFormat::Json => print_json(&json!({ "name": name }))?,
        OutputFormat::Table => println!("{}", name),
    }
    Ok(())
}

/// Rename the project
pub fn set_name(session: &mut Session, name: &str) -> Result<()> {
    let name = session.store.set_project_name(name)?;
    session.logger.log_setting_changed("project_name", &name);
    session.logger = StructuredLogger::new(name.clone());

    match session.format {
        OutputFormat::Json => print_json(&json!({ "name": name }))?,
        OutputFormat::Table => print_success(&format!("Project renamed to \"{}\"", name)),
    }
    Ok(())
}

/// Discard every record and reseed the project
pub fn reset_project(session: &mut Session) -> Result<()> {
    if !session.confirm(
        "Do you want to reset the project? All workloads, hardware and growth rates will be lost!",
    )? {
        print_info("Cancelled");
        return Ok(());
    }

    session.store.reset(session.current_year)?;
    session.logger.log_reset();

    match session.format {
        OutputFormat::Json => print_json(session.store.project())?,
        OutputFormat::Table => print_success("Project has been reset"),
    }
    Ok(())
}
