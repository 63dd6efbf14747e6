//! Plain-text rendering of page views.

use std::io::{self, Write};

use client_core::ListView;
use shared::domain::{Bus, Entity, EntityKind, Garage};

const NOT_AVAILABLE: &str = "N/A";

/// An entity that knows its table columns.
pub trait Tabular: Entity {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Tabular for Garage {
    const HEADERS: &'static [&'static str] = &["ID", "Garage Name", "Garage Code", "Coordinates"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            or_not_available(&self.garage_name),
            or_not_available(&self.garage_code),
            or_not_available(&self.coordinate),
        ]
    }
}

impl Tabular for Bus {
    const HEADERS: &'static [&'static str] = &[
        "Door No",
        "Operator",
        "Garage",
        "License Plate",
        "Speed",
        "Last Updated",
        "Nearest Garage",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            or_not_available(&self.door_no),
            or_not_available(&self.operator),
            or_not_available(&self.garage),
            or_not_available(&self.license_plate),
            speed_label(self.speed),
            self.time
                .map(|time| time.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            nearest_garage_label(self),
        ]
    }
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Zero and unknown speeds both read as `N/A`.
pub fn speed_label(speed: Option<f64>) -> String {
    match speed {
        Some(speed) if speed != 0.0 => format!("{speed} km/h"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn distance_label(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(distance) => format!("{distance:.2} km"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn nearest_garage_label(bus: &Bus) -> String {
    match bus.nearest_garage_name.as_deref() {
        Some(name) if !name.is_empty() => {
            format!("{name} ({})", distance_label(bus.distance_to_nearest_garage))
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn loading_message(kind: EntityKind) -> String {
    format!("Loading {}...", kind.plural())
}

pub fn render_view<E: Tabular>(view: &ListView<'_, E>, out: &mut impl Write) -> io::Result<()> {
    match view {
        ListView::Loading => writeln!(out, "{}", loading_message(E::KIND)),
        ListView::Error(message) => writeln!(out, "{message}"),
        ListView::Empty(message) => {
            writeln!(out, "No results found")?;
            writeln!(out, "{message}")
        }
        ListView::Table { items, footer } => {
            render_table(*items, out)?;
            if let Some(footer) = footer {
                writeln!(out)?;
                writeln!(out, "{footer}")?;
            }
            Ok(())
        }
    }
}

pub fn render_table<E: Tabular>(items: &[E], out: &mut impl Write) -> io::Result<()> {
    let rows: Vec<Vec<String>> = items.iter().map(Tabular::cells).collect();
    let mut widths: Vec<usize> = E::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, E::HEADERS.iter().copied(), &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, rule.iter().map(String::as_str), &widths)?;
    for row in &rows {
        write_row(out, row.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

fn write_row<'a>(
    out: &mut impl Write,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    let line = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "{}", line.trim_end())
}

pub fn render_home(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "IETT Bus Tracking System")?;
    writeln!(out)?;
    writeln!(
        out,
        "Explore the garages and buses operated by the Istanbul Electric Tramway and Tunnel"
    )?;
    writeln!(out, "Operations (IETT).")?;
    writeln!(out)?;
    writeln!(out, "  dashboard garages [--search TERM] [--interactive]")?;
    writeln!(out, "  dashboard buses   [--search TERM] [--interactive]")?;
    writeln!(out, "  dashboard refresh <garages|buses>")
}
