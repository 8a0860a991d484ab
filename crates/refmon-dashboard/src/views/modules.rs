//! Per-module peer breakdown.

use refmon_core::{ModuleStat, PeerStat, ReflectorSnapshot, Timestamp};

use crate::activity::{ActivityFrame, PeerActivity};
use crate::format::{format_bytes, format_elapsed};
use crate::types::{Cell, RenderedView, Section, StatusTag, Table};
use crate::views::{name_order, View};

pub const PEER_COLUMNS: [&str; 4] = ["Peer", "Packets", "Bytes", "Status"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ModulesView;

impl View for ModulesView {
    fn name(&self) -> &'static str {
        "modules"
    }

    fn render(
        &self,
        snapshot: &ReflectorSnapshot,
        frame: &ActivityFrame,
        now: Timestamp,
    ) -> RenderedView {
        let mut modules: Vec<&ModuleStat> = snapshot.modules.iter().collect();
        modules.sort_by(|a, b| name_order(&a.module, &b.module));

        let mut sections: Vec<Section> = modules
            .into_iter()
            .map(|m| module_section(snapshot, m, frame, now))
            .collect();

        if sections.is_empty() {
            sections.push(Section {
                heading: "Modules".to_string(),
                status: None,
                table: Table::build("peers", &PEER_COLUMNS, vec![]),
            });
        }

        RenderedView {
            view: self.name(),
            title: format!("{} Dashboard", snapshot.reflector_name),
            stats: vec![
                ("Modules", snapshot.modules.len().to_string()),
                ("Clients", snapshot.total_clients.to_string()),
            ],
            sections,
        }
    }
}

fn module_section(
    snapshot: &ReflectorSnapshot,
    module: &ModuleStat,
    frame: &ActivityFrame,
    now: Timestamp,
) -> Section {
    let status = if frame.loading {
        StatusTag::Loading
    } else if module.has_active_streams() {
        StatusTag::Active
    } else {
        StatusTag::Idle
    };

    let mut peers: Vec<&PeerStat> = snapshot.peers_in(&module.module).collect();
    peers.sort_by(|a, b| name_order(a.key(), b.key()));

    let rows = peers
        .into_iter()
        .map(|p| {
            vec![
                Cell::text(&p.callsign),
                Cell::text(p.packets_in.to_string()),
                Cell::text(format_bytes(p.bytes_in)),
                Cell::Status(peer_status(p, frame, now)),
            ]
        })
        .collect();

    Section {
        heading: format!("Module {} (Peers: {})", module.module, module.clients),
        status: Some(status),
        table: Table::build("peers", &PEER_COLUMNS, rows),
    }
}

fn peer_status(peer: &PeerStat, frame: &ActivityFrame, now: Timestamp) -> StatusTag {
    match frame.peer_activity(peer.key()) {
        PeerActivity::Loading => StatusTag::Loading,
        PeerActivity::Streaming { source } => StatusTag::ActiveFrom(source.to_string()),
        PeerActivity::Packets => StatusTag::Active,
        PeerActivity::Quiet => StatusTag::Connected(format_elapsed(peer.connected_since, now)),
    }
}
