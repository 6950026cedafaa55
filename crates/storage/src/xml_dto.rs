//! Serializable mirrors of the core vortex/simplex records.
//!
//! `vortrac-core`'s types intentionally don't carry `serde` derives (they
//! are the in-memory model, not a wire format); these DTOs own the XML
//! element shape and the `From` conversions that populate them.

use serde::Serialize;
use vortrac_core::{SimplexPoint, SimplexRecord, SimplexStatus, VortexRecord};

#[derive(Debug, Serialize)]
#[serde(rename = "VortexRecord")]
pub struct VortexRecordXml {
    pub time: String,
    pub radar_name: String,
    pub centers: CentersXml,
    pub central_pressure_hpa: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CentersXml {
    #[serde(rename = "level")]
    pub levels: Vec<LevelCenterXml>,
}

#[derive(Debug, Serialize)]
pub struct LevelCenterXml {
    pub height_km: f64,
    pub x_km: f64,
    pub y_km: f64,
    pub vtc0_ms: f64,
    pub rmw_km: f64,
}

impl From<&VortexRecord> for VortexRecordXml {
    fn from(record: &VortexRecord) -> Self {
        let levels = record
            .heights_km
            .iter()
            .enumerate()
            .map(|(idx, &height_km)| LevelCenterXml {
                height_km,
                x_km: record.centers_km[idx].0,
                y_km: record.centers_km[idx].1,
                vtc0_ms: record.max_vtc0_ms.get(idx).copied().unwrap_or(0.0),
                rmw_km: record.rmw_km.get(idx).copied().unwrap_or(0.0),
            })
            .collect();
        Self {
            time: record.time.to_rfc3339(),
            radar_name: record.radar_name.clone(),
            centers: CentersXml { levels },
            central_pressure_hpa: record.central_pressure_hpa,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "SimplexRecord")]
pub struct SimplexRecordXml {
    pub height_km: f64,
    pub radius_km: f64,
    pub status: String,
    pub mean_x_km: Option<f64>,
    pub mean_y_km: Option<f64>,
    pub std_dev_km: Option<f64>,
    pub accepted: AcceptedXml,
}

#[derive(Debug, Serialize)]
pub struct AcceptedXml {
    #[serde(rename = "point")]
    pub points: Vec<SimplexPointXml>,
}

#[derive(Debug, Serialize)]
pub struct SimplexPointXml {
    pub x_km: f64,
    pub y_km: f64,
    pub vtc0: f64,
}

impl From<&SimplexPoint> for SimplexPointXml {
    fn from(p: &SimplexPoint) -> Self {
        Self {
            x_km: p.x_km,
            y_km: p.y_km,
            vtc0: p.vtc0,
        }
    }
}

fn status_label(status: SimplexStatus) -> &'static str {
    match status {
        SimplexStatus::Converged => "converged",
        SimplexStatus::InsufficientConvergence => "insufficient_convergence",
        SimplexStatus::OutOfCappi => "out_of_cappi",
        SimplexStatus::MaxIterReached => "max_iter_reached",
    }
}

impl From<&SimplexRecord> for SimplexRecordXml {
    fn from(record: &SimplexRecord) -> Self {
        Self {
            height_km: record.height_km,
            radius_km: record.radius_km,
            status: status_label(record.status).to_string(),
            mean_x_km: record.mean_x_km,
            mean_y_km: record.mean_y_km,
            std_dev_km: record.std_dev_km,
            accepted: AcceptedXml {
                points: record.accepted_centers.iter().map(SimplexPointXml::from).collect(),
            },
        }
    }
}
