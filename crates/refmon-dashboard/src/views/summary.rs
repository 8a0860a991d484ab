//! Reflector overview: headline stats, modules, active and recent streams.

use std::cmp::Ordering;

use refmon_core::{ModuleStat, ReflectorSnapshot, StreamInfo, Timestamp};

use crate::activity::ActivityFrame;
use crate::format::{format_bytes, format_duration, format_time};
use crate::types::{Cell, RenderedView, Section, StatusTag, Table};
use crate::views::{name_order, View};

pub const MODULE_COLUMNS: [&str; 3] = ["Module", "Peers", "Status"];
pub const ACTIVE_STREAM_COLUMNS: [&str; 6] =
    ["Source", "Peer", "Destination", "Module", "Stream ID", "Duration"];
pub const RECENT_STREAM_COLUMNS: [&str; 5] = ["Source", "Peer", "Destination", "Module", "Ended"];

const MISSING: &str = "-";

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryView;

impl View for SummaryView {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn render(
        &self,
        snapshot: &ReflectorSnapshot,
        frame: &ActivityFrame,
        now: Timestamp,
    ) -> RenderedView {
        RenderedView {
            view: self.name(),
            title: format!("{} Dashboard", snapshot.reflector_name),
            stats: vec![
                ("Uptime", format_duration(snapshot.uptime_seconds)),
                ("Clients", snapshot.total_clients.to_string()),
                ("Streams", snapshot.total_streams.to_string()),
                ("Packets", snapshot.total_packets.to_string()),
                ("Traffic", format_bytes(snapshot.total_bytes)),
            ],
            sections: vec![
                Section {
                    heading: "Modules".to_string(),
                    status: None,
                    table: modules_table(&snapshot.modules, frame),
                },
                Section {
                    heading: "Active Streams".to_string(),
                    status: None,
                    table: active_streams_table(&snapshot.active_streams, now),
                },
                Section {
                    heading: "Recent Streams".to_string(),
                    status: None,
                    table: recent_streams_table(&snapshot.recent_streams),
                },
            ],
        }
    }
}

fn module_status(module: &ModuleStat, frame: &ActivityFrame) -> StatusTag {
    if frame.loading {
        StatusTag::Loading
    } else if module.has_active_streams() {
        StatusTag::Active
    } else {
        StatusTag::Inactive
    }
}

fn modules_table(modules: &[ModuleStat], frame: &ActivityFrame) -> Table {
    let mut sorted: Vec<&ModuleStat> = modules.iter().collect();
    sorted.sort_by(|a, b| name_order(&a.module, &b.module));

    let rows = sorted
        .into_iter()
        .map(|m| {
            vec![
                Cell::text(&m.module),
                Cell::text(m.clients.to_string()),
                Cell::Status(module_status(m, frame)),
            ]
        })
        .collect();
    Table::build("modules", &MODULE_COLUMNS, rows)
}

fn peer_cell(stream: &StreamInfo) -> Cell {
    Cell::text(stream.peer_callsign().unwrap_or(MISSING))
}

fn active_streams_table(streams: &[StreamInfo], now: Timestamp) -> Table {
    let rows = streams
        .iter()
        .map(|s| {
            let duration = s
                .started_at
                .map(|t| format_duration(t.elapsed_until(now)))
                .unwrap_or_else(|| MISSING.to_string());
            vec![
                Cell::text(&s.source),
                peer_cell(s),
                Cell::text(&s.destination),
                Cell::text(&s.module),
                Cell::text(s.stream_id.as_deref().unwrap_or(MISSING)),
                Cell::text(duration),
            ]
        })
        .collect();
    Table::build("active_streams", &ACTIVE_STREAM_COLUMNS, rows)
}

/// Most recently ended first; streams without an end time sink to the bottom.
fn by_end_time_desc(a: &StreamInfo, b: &StreamInfo) -> Ordering {
    match (a.ended_at, b.ended_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn recent_streams_table(streams: &[StreamInfo]) -> Table {
    let mut sorted: Vec<&StreamInfo> = streams.iter().collect();
    sorted.sort_by(|a, b| by_end_time_desc(a, b));

    let rows = sorted
        .into_iter()
        .map(|s| {
            vec![
                Cell::text(&s.source),
                peer_cell(s),
                Cell::text(&s.destination),
                Cell::text(&s.module),
                Cell::text(format_time(s.ended_at)),
            ]
        })
        .collect();
    Table::build("recent_streams", &RECENT_STREAM_COLUMNS, rows)
}
