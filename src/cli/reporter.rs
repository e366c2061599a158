// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::diff::ComparisonResult;
use crate::codec::ImportReport;
use crate::geometry::{GeometryStore, ParticleKind, Region, UNLIMITED};
use crate::units::format_value;
use colored::*;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the regions registered by an import
    pub fn report_import(file: &str, report: &ImportReport, store: &GeometryStore) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Imported:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        for name in &report.regions {
            if let Some(region) = store.find_region(name) {
                Self::print_region(store, region);
            }
        }

        if report.skipped > 0 {
            println!(
                "\n  {} {}",
                "Default regions skipped:".bright_black(),
                report.skipped
            );
        }
        for warning in &report.warnings {
            Self::report_warning(&warning.to_string());
        }

        println!("{}", "━".repeat(80).bright_black());
    }

    fn print_region(store: &GeometryStore, region: &Region) {
        println!("\n{} {}", "Region:".bold(), region.name().cyan());

        let volumes: Vec<&str> = region
            .root_volumes()
            .iter()
            .map(|id| store.volume_name(*id))
            .collect();
        println!(
            "  {} {}",
            "Root volumes:".bright_black(),
            if volumes.is_empty() {
                "none".yellow()
            } else {
                volumes.join(", ").normal()
            }
        );

        match region.production_cuts() {
            Some(cuts) => {
                let rendered: Vec<String> = ParticleKind::ALL
                    .iter()
                    .map(|k| format!("{}={} mm", k, format_value(cuts.get(*k))))
                    .collect();
                println!("  {} {}", "Cuts:".bright_black(), rendered.join(", "));
            }
            None => println!("  {} {}", "Cuts:".bright_black(), "default".bright_black()),
        }

        if let Some(limits) = region.step_limits() {
            println!(
                "  {} {} (step {}, track {}, time {}, ekin {}, range {})",
                "Limits:".bright_black(),
                limits.label.cyan(),
                Self::format_bound(limits.max_step, "mm"),
                Self::format_bound(limits.max_track, "mm"),
                Self::format_bound(limits.max_time, "ns"),
                Self::format_bound(limits.min_kinetic_energy, "MeV"),
                Self::format_bound(limits.min_range, "mm"),
            );
        }
    }

    /// Report a round trip comparison
    pub fn report_round_trip(file: &str, result: &ComparisonResult) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        if result.passed {
            println!("{} {}", "✅".green(), "Round trip preserved all regions".green().bold());
        } else {
            println!("{} {}", "❌".red(), "Round trip changed regions".red().bold());
            for mismatch in &result.mismatches {
                println!("  {} {}", "•".red(), mismatch);
            }
        }
        println!("  {}", result.summary().bright_black());
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    fn format_bound(value: f64, unit: &str) -> String {
        if value >= UNLIMITED {
            "unlimited".to_string()
        } else {
            format!("{} {}", format_value(value), unit)
        }
    }

    /// Print progress message
    pub fn progress(message: &str) {
        println!("{} {}...", "⏳".bright_blue(), message.bright_black());
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
