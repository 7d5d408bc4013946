//! Event tables (monitoring, dosing, stock movements, washes) and the
//! association rows linking units to collection types and users.
//!
//! Inserts return the stored row, so columns filled in by the database
//! (timestamps set by triggers or defaults) are visible to the caller.

use chrono::Utc;
use diesel::{PgConnection, prelude::*};
use log::debug;

use crate::errors::{StoreError, StoreResult};
use crate::models::*;

pub fn insert_monitoring(conn: &PgConnection, event: &NewMonitoringEvent) -> StoreResult<MonitoringEvent> {
    use crate::schema::monitoramentos::dsl;

    Ok(diesel::insert_into(dsl::monitoramentos)
        .values(event)
        .get_result(conn)?)
}

/// Persists the fields assigned on `event`, stamping `updated_at`.
pub fn save_monitoring(conn: &PgConnection, event: &mut MonitoringEvent) -> StoreResult<()> {
    event.updated_at = Some(Utc::now());
    let saved = (&*event).save_changes::<MonitoringEvent>(conn)?;
    *event = saved;
    Ok(())
}

/// Monitoring rows store the unit as text, so the filter takes the text form.
pub fn delete_monitoring_for_unit(conn: &PgConnection, qap_lot_id: &str) -> StoreResult<usize> {
    use crate::schema::monitoramentos::dsl;

    let count = diesel::delete(dsl::monitoramentos.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?;
    debug!("Deleted {} monitoring rows of unit {}", count, qap_lot_id);
    Ok(count)
}

pub fn monitoring_for_unit(conn: &PgConnection, qap_lot_id: &str) -> StoreResult<Vec<MonitoringEvent>> {
    use crate::schema::monitoramentos::dsl;

    Ok(dsl::monitoramentos
        .filter(dsl::qap_lot_id.eq(qap_lot_id))
        .filter(dsl::deleted.is_null().or(dsl::deleted.eq(false)))
        .order(dsl::created_at.desc())
        .load::<MonitoringEvent>(conn)?)
}

/// Flags the row as deleted without removing it.
pub fn soft_delete_monitoring(conn: &PgConnection, id: IdType) -> StoreResult<usize> {
    use crate::schema::monitoramentos::dsl;

    Ok(diesel::update(dsl::monitoramentos.find(id))
        .set((dsl::deleted.eq(true), dsl::updated_at.eq(Utc::now())))
        .execute(conn)?)
}

pub fn insert_application(conn: &PgConnection, application: &NewChemicalApplication) -> StoreResult<ChemicalApplication> {
    use crate::schema::aplicacaoprodutoquimico::dsl;

    Ok(diesel::insert_into(dsl::aplicacaoprodutoquimico)
        .values(application)
        .get_result(conn)?)
}

pub fn delete_applications_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::aplicacaoprodutoquimico::dsl;

    Ok(diesel::delete(dsl::aplicacaoprodutoquimico.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?)
}

pub fn insert_receipt(conn: &PgConnection, receipt: &NewStockReceipt) -> StoreResult<StockReceipt> {
    use crate::schema::estoquerecebimento::dsl;

    Ok(diesel::insert_into(dsl::estoquerecebimento)
        .values(receipt)
        .get_result(conn)?)
}

pub fn delete_receipts_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::estoquerecebimento::dsl;

    Ok(diesel::delete(dsl::estoquerecebimento.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?)
}

pub fn insert_inventory(conn: &PgConnection, inventory: &NewStockInventory) -> StoreResult<StockInventory> {
    use crate::schema::estoqueinventario::dsl;

    Ok(diesel::insert_into(dsl::estoqueinventario)
        .values(inventory)
        .get_result(conn)?)
}

pub fn delete_inventories_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::estoqueinventario::dsl;

    Ok(diesel::delete(dsl::estoqueinventario.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?)
}

pub fn insert_filter_wash(conn: &PgConnection, wash: &NewFilterWash) -> StoreResult<FilterWash> {
    use crate::schema::lavagemfiltro::dsl;

    Ok(diesel::insert_into(dsl::lavagemfiltro)
        .values(wash)
        .get_result(conn)?)
}

pub fn find_filter_wash(conn: &PgConnection, id: IdType) -> StoreResult<Option<FilterWash>> {
    use crate::schema::lavagemfiltro::dsl;

    Ok(dsl::lavagemfiltro.find(id).first::<FilterWash>(conn).optional()?)
}

pub fn delete_filter_washes_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::lavagemfiltro::dsl;

    let count = diesel::delete(dsl::lavagemfiltro.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?;
    debug!("Deleted {} filter washes of unit {}", count, qap_lot_id);
    Ok(count)
}

pub fn insert_decanter_wash(conn: &PgConnection, wash: &NewDecanterWash) -> StoreResult<DecanterWash> {
    use crate::schema::lavagemdecantador::dsl;

    Ok(diesel::insert_into(dsl::lavagemdecantador)
        .values(wash)
        .get_result(conn)?)
}

pub fn find_decanter_wash(conn: &PgConnection, id: IdType) -> StoreResult<Option<DecanterWash>> {
    use crate::schema::lavagemdecantador::dsl;

    Ok(dsl::lavagemdecantador.find(id).first::<DecanterWash>(conn).optional()?)
}

pub fn delete_decanter_washes_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::lavagemdecantador::dsl;

    let count = diesel::delete(dsl::lavagemdecantador.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?;
    debug!("Deleted {} decanter washes of unit {}", count, qap_lot_id);
    Ok(count)
}

pub fn link_collection_type(conn: &PgConnection, link: &NewUnitCollectionTypeLink) -> StoreResult<UnitCollectionTypeLink> {
    use crate::schema::unidadetipocoleta::dsl;

    Ok(diesel::insert_into(dsl::unidadetipocoleta)
        .values(link)
        .get_result(conn)?)
}

pub fn set_collection_type_active(conn: &PgConnection, link: &mut UnitCollectionTypeLink, active: bool) -> StoreResult<()> {
    link.ativo = Some(if active { 1 } else { 0 });
    let saved = (&*link).save_changes::<UnitCollectionTypeLink>(conn)?;
    *link = saved;
    Ok(())
}

pub fn unlink_collection_types_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::unidadetipocoleta::dsl;

    Ok(diesel::delete(dsl::unidadetipocoleta.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?)
}

pub fn link_user(conn: &PgConnection, link: &NewUserUnitLink) -> StoreResult<UserUnitLink> {
    use crate::schema::usuariounidades::dsl;

    Ok(diesel::insert_into(dsl::usuariounidades)
        .values(link)
        .get_result(conn)?)
}

pub fn unlink_users_for_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::usuariounidades::dsl;

    Ok(diesel::delete(dsl::usuariounidades.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?)
}

/// Deletes single rows by primary key, returning the number of rows removed.
macro_rules! delete_by_id {
    ($($name:ident => $table:ident),* $(,)?) => {
        $(
            pub fn $name(conn: &PgConnection, id: IdType) -> StoreResult<usize> {
                use crate::schema::$table::dsl;

                Ok(diesel::delete(dsl::$table.find(id)).execute(conn)?)
            }
        )*
    };
}

delete_by_id! {
    delete_monitoring => monitoramentos,
    delete_application => aplicacaoprodutoquimico,
    delete_receipt => estoquerecebimento,
    delete_inventory => estoqueinventario,
    delete_filter_wash => lavagemfiltro,
    delete_decanter_wash => lavagemdecantador,
    unlink_collection_type => unidadetipocoleta,
    unlink_user => usuariounidades,
}

/// Removes every event and association row of a unit, children first.
pub fn purge_unit_events(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    conn.transaction::<_, StoreError, _>(|| {
        let mut count = delete_monitoring_for_unit(conn, &qap_lot_id.to_string())?;
        count += delete_applications_for_unit(conn, qap_lot_id)?;
        count += delete_receipts_for_unit(conn, qap_lot_id)?;
        count += delete_inventories_for_unit(conn, qap_lot_id)?;
        count += delete_filter_washes_for_unit(conn, qap_lot_id)?;
        count += delete_decanter_washes_for_unit(conn, qap_lot_id)?;
        count += unlink_collection_types_for_unit(conn, qap_lot_id)?;
        count += unlink_users_for_unit(conn, qap_lot_id)?;
        Ok(count)
    })
}
