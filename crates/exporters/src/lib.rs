//! Build-order export: flattens the chart into the JSON document the
//! external tooling consumes. Row and entity order match the visual
//! left-to-right, top-to-bottom order.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use catalog::{EntityKind, Race};
use timeline::Timeline;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serialize build order: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOrder {
    pub metadata: Metadata,
    pub rows: Vec<ExportRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub export_date: String,
    pub time_scale: f32,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub row_index: usize,
    pub entities: Vec<ExportEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ExportStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub race: Race,
    pub start_time: f32,
    pub build_time: f32,
    pub minerals: u32,
    pub gas: u32,
    pub boosted: bool,
    pub boost_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub end_time: f32,
    pub total_minerals: u32,
    pub total_gas: u32,
}

pub fn build_export(tl: &Timeline) -> BuildOrder {
    build_export_at(tl, Utc::now())
}

pub fn build_export_at(tl: &Timeline, exported: DateTime<Utc>) -> BuildOrder {
    let time_scale = tl.time_scale();
    let mut rows = Vec::with_capacity(tl.row_count());
    for row_index in 0..tl.row_count() {
        let items = tl.row_items(row_index);
        let entities = items
            .iter()
            .map(|item| ExportEntity {
                name: item.entity.name.clone(),
                kind: item.entity.kind,
                race: item.entity.race,
                start_time: item.start_time(time_scale),
                build_time: item.effective_duration(),
                minerals: item.entity.minerals,
                gas: item.entity.gas,
                boosted: item.boosted(),
                boost_count: item.boost_count,
            })
            .collect();
        let stats = if items.is_empty() {
            None
        } else {
            let stats = tl.row_stats(row_index);
            Some(ExportStats {
                end_time: stats.end_time,
                total_minerals: stats.total_minerals,
                total_gas: stats.total_gas,
            })
        };
        rows.push(ExportRow {
            row_index,
            entities,
            stats,
        });
    }
    BuildOrder {
        metadata: Metadata {
            export_date: exported.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_scale,
            total_rows: tl.row_count(),
        },
        rows,
    }
}

pub fn to_json_string(order: &BuildOrder) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(order)?)
}

pub fn write_json(tl: &Timeline, path: &Path) -> Result<(), ExportError> {
    let text = to_json_string(&build_export(tl))?;
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}
