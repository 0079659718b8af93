//! `getmesh list`: the catalog as a table

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;

use crate::check::Outcome;
use crate::cli::Context;
use crate::distribution::DistributionId;
use crate::manifest::Catalog;

#[derive(Args, Debug, Default)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let catalog = ctx.catalog().await?;
        let config = ctx.load_config()?;
        write!(ctx.out, "{}", render_catalog(&catalog, config.distribution.as_ref()))?;
        Ok(Outcome::Clean)
    }
}

const HEADERS: [&str; 5] = [
    "ISTIO VERSION",
    "FLAVOR",
    "FLAVOR VERSION",
    "K8S VERSIONS",
    "END OF LIFE",
];

/// Render catalog entries in manifest order; the active one is starred.
pub fn render_catalog(catalog: &Catalog, active: Option<&DistributionId>) -> String {
    let rows: Vec<[String; 5]> = catalog
        .entries
        .iter()
        .map(|entry| {
            let marker = if active == Some(&entry.id) { "*" } else { "" };
            let eol = entry
                .end_of_life
                .or_else(|| entry.id.minor_version().ok().and_then(|m| catalog.minor_eol(&m)))
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            [
                format!("{}{}", marker, entry.id.version),
                entry.id.flavor.clone(),
                entry.id.flavor_version.to_string(),
                entry.supported_platform_versions.join(","),
                eol,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = String::new();
    push_row(&mut table, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut table, row, &widths);
    }
    table
}

fn push_row(table: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let _ = writeln!(table, "{}", line.join("  ").trim_end());
}
