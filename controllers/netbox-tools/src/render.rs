//! Output rendering
//!
//! Tables for people, JSON for scripts. Both are built from the same reports.

use crate::cli::OutputFormat;
use crate::error::ToolsError;
use crate::session::SerialView;
use crate::tools::prefix_checker::PrefixReport;
use crate::tools::prefix_validator::{label, labels, ValidationReport};
use crate::tools::vm_tool::VmAddressReport;
use crate::tools::VrfSummary;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct VrfRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "RD")]
    rd: String,
    #[tabled(rename = "PREFIXES")]
    prefixes: String,
}

#[derive(Tabled)]
struct PrefixRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "PREFIX")]
    prefix: String,
    #[tabled(rename = "VRF")]
    vrf: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TOTAL")]
    total: u128,
    #[tabled(rename = "AVAILABLE")]
    available: u128,
    #[tabled(rename = "NEXT")]
    next: String,
    #[tabled(rename = "URL")]
    url: String,
}

#[derive(Tabled)]
struct OverlapRow {
    #[tabled(rename = "PREFIX")]
    prefix: String,
    #[tabled(rename = "ACTIVE OVERLAPS")]
    active: String,
    #[tabled(rename = "RESERVED OVERLAPS")]
    reserved: String,
}

#[derive(Tabled)]
struct SerialRow {
    #[tabled(rename = "SERIAL")]
    serial: String,
    #[tabled(rename = "NAME")]
    name: String,
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, ToolsError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn join_or_dash(values: Vec<String>) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

/// VRF listing
pub fn render_vrfs(vrfs: &[VrfSummary], format: OutputFormat) -> Result<String, ToolsError> {
    if format == OutputFormat::Json {
        return json(vrfs);
    }
    if vrfs.is_empty() {
        return Ok("No VRFs found".to_string());
    }

    let rows = vrfs.iter().map(|vrf| VrfRow {
        id: vrf.id,
        name: vrf.name.clone(),
        rd: or_dash(vrf.rd.clone()),
        prefixes: or_dash(vrf.prefix_count.map(|c| c.to_string())),
    });
    Ok(Table::new(rows).to_string())
}

/// Prefix checker results
pub fn render_prefix_reports(reports: &[PrefixReport], format: OutputFormat) -> Result<String, ToolsError> {
    if format == OutputFormat::Json {
        return json(reports);
    }
    if reports.is_empty() {
        return Ok("No prefixes found".to_string());
    }

    let rows = reports.iter().map(|report| PrefixRow {
        id: report.id,
        prefix: report.allocation.prefix.to_string(),
        vrf: or_dash(report.vrf.clone()),
        status: report.status.clone(),
        total: report.allocation.total,
        available: report.allocation.available,
        next: report.allocation.next.to_string(),
        url: report.url.clone(),
    });
    Ok(Table::new(rows).to_string())
}

/// Prefix validator results
pub fn render_validation(report: &ValidationReport, format: OutputFormat) -> Result<String, ToolsError> {
    if format == OutputFormat::Json {
        return json(report);
    }

    let mut out = format!("Checking {} against {}", report.primary, report.secondary);
    if report.first_match {
        out.push_str(" (first match only)");
    }
    out.push('\n');

    if report.findings.is_empty() {
        out.push_str("No prefixes to compare");
        return Ok(out);
    }

    let rows = report.findings.iter().map(|finding| OverlapRow {
        prefix: label(&finding.prefix, &finding.status),
        active: join_or_dash(labels(&finding.active_overlaps)),
        reserved: join_or_dash(labels(&finding.reserved_overlaps)),
    });
    out.push_str(&Table::new(rows).to_string());
    Ok(out)
}

/// Serial checker results, one block per action
pub fn render_serial(views: &[SerialView], format: OutputFormat) -> Result<String, ToolsError> {
    if format == OutputFormat::Json {
        return json(views);
    }

    let mut out = String::new();
    for view in views {
        if !out.is_empty() {
            out.push('\n');
        }
        // Writing into a String cannot fail
        let _ = writeln!(out, "Next number:    {}", view.next_number);
        let _ = writeln!(out, "Preview:        {} (index {})", view.preview_number, view.index);
        let _ = writeln!(out, "Available:      {}", view.available_count);
        let _ = writeln!(out, "Taken:          {}", view.taken_count);
        let _ = writeln!(out, "Total:          {}", view.total_count);
        let _ = writeln!(out, "Lowest taken:   {}", view.lowest_taken);
        let _ = writeln!(out, "Highest taken:  {}", view.highest_taken);

        if let Some(list) = &view.list {
            let rows = list.iter().map(|row| SerialRow {
                serial: row.serial.to_string(),
                name: row.occupant.to_string(),
            });
            let _ = writeln!(out, "{}", Table::new(rows));
        }
    }
    Ok(out.trim_end().to_string())
}

/// VM address suggestion
pub fn render_vm_address(report: &VmAddressReport, format: OutputFormat) -> Result<String, ToolsError> {
    if format == OutputFormat::Json {
        return json(report);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Prefix:     {} (ID {})", report.allocation.prefix, report.prefix_id);
    let _ = writeln!(out, "VRF:        {}", report.vrf.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Skipped:    {}", report.skip_count);
    let _ = writeln!(out, "Available:  {} of {}", report.allocation.available, report.allocation.total);
    let _ = write!(out, "Next IP:    {}", report.allocation.next);
    if let Some(created) = &report.created {
        let _ = write!(out, "\nCreated:    {} ({})", created.address, created.url);
        let _ = write!(out, "\nAssigned:   {} on {} (primary)", created.vm, created.interface);
    }
    Ok(out)
}
