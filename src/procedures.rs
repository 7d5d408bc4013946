//! Calls to the stored procedures installed in the database.
//!
//! The procedures' result shape is owned by the database, so every row is
//! fetched as a JSON object and decoded afterwards.

use diesel::{PgConnection, prelude::*, sql_query};
use diesel::sql_types::{Integer, Text};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::StoreResult;
use crate::models::ExternalId;

pub const MONITORINGS_BY_UNIT: &str = "public.sp_get_monitoramentos_por_unidade";
pub const INVENTORY_BY_PRODUCT_UNIT: &str = "public.sp_get_inventario_por_produto_unidade";

/// A row whose columns are not known in advance.
pub type ProcedureRow = Map<String, Value>;

#[derive(Debug, QueryableByName)]
struct JsonRow {
    #[sql_type = "Text"]
    body: String,
}

/// Row returned by the monitoring lookup. Only the flow reading is relied upon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitMonitoringRow {
    #[serde(default)]
    pub vazao: Option<String>,

    #[serde(flatten)]
    pub other: ProcedureRow,
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<JsonRow>) -> StoreResult<Vec<T>> {
    let mut decoded = Vec::with_capacity(rows.len());
    for row in rows {
        decoded.push(serde_json::from_str(&row.body)?);
    }
    Ok(decoded)
}

fn json_call(procedure: &str, arity: usize) -> String {
    let params = (1..=arity)
        .map(|x| format!("${}", x))
        .collect::<Vec<String>>()
        .join(", ");
    format!("SELECT row_to_json(t)::text AS body FROM {}({}) AS t", procedure, params)
}

/// Monitoring rows of a unit, as returned by the database-side lookup.
pub fn monitorings_by_unit(conn: &PgConnection, unit_id: ExternalId) -> StoreResult<Vec<UnitMonitoringRow>> {
    let rows = sql_query(json_call(MONITORINGS_BY_UNIT, 1))
        .bind::<Integer, _>(unit_id)
        .load::<JsonRow>(conn)?;

    debug!("{}({}) returned {} rows", MONITORINGS_BY_UNIT, unit_id, rows.len());
    decode_rows(rows)
}

pub fn inventory_by_product_unit(conn: &PgConnection, product_id: ExternalId, unit_id: ExternalId) -> StoreResult<Vec<ProcedureRow>> {
    let rows = sql_query(json_call(INVENTORY_BY_PRODUCT_UNIT, 2))
        .bind::<Integer, _>(product_id)
        .bind::<Integer, _>(unit_id)
        .load::<JsonRow>(conn)?;

    debug!("{}({}, {}) returned {} rows", INVENTORY_BY_PRODUCT_UNIT, product_id, unit_id, rows.len());
    decode_rows(rows)
}
