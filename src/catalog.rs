//! Catalog tables (units, products, schedules, occurrences, collection types)
//! and user identities.
//!
//! Catalog rows are identified by their external id: merging a row inserts it
//! when the external id is unknown and otherwise updates the attributes that
//! were provided, so merging the same row twice leaves a single row behind.

use diesel::{PgConnection, prelude::*};
use log::debug;

use crate::errors::{StoreError, StoreResult};
use crate::models::*;

pub fn merge_unit(conn: &PgConnection, unit: &NewOperationalUnit) -> StoreResult<OperationalUnit> {
    use crate::schema::unidadeoperacional::dsl;

    conn.transaction::<_, StoreError, _>(|| {
        let existing = match unit.qap_lot_id {
            Some(ext) => find_unit(conn, ext)?,
            None => None,
        };

        match existing {
            Some(row) => {
                let changes = unit.changes();
                if changes.is_empty() {
                    return Ok(row);
                }
                debug!("Updating unit {:?}", unit.qap_lot_id);
                Ok(diesel::update(&row).set(&changes).get_result(conn)?)
            },
            None => {
                debug!("Inserting unit {:?}", unit.qap_lot_id);
                Ok(diesel::insert_into(dsl::unidadeoperacional)
                    .values(unit)
                    .get_result(conn)?)
            },
        }
    })
}

pub fn find_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<Option<OperationalUnit>> {
    use crate::schema::unidadeoperacional::dsl;

    Ok(dsl::unidadeoperacional
        .filter(dsl::qap_lot_id.eq(qap_lot_id))
        .first::<OperationalUnit>(conn)
        .optional()?)
}

pub fn delete_unit(conn: &PgConnection, qap_lot_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::unidadeoperacional::dsl;

    Ok(diesel::delete(dsl::unidadeoperacional.filter(dsl::qap_lot_id.eq(qap_lot_id)))
        .execute(conn)?)
}

pub fn merge_product(conn: &PgConnection, product: &NewChemicalProduct) -> StoreResult<ChemicalProduct> {
    use crate::schema::produtoquimico::dsl;

    conn.transaction::<_, StoreError, _>(|| {
        match find_product(conn, product.qap_pro_id)? {
            Some(row) => {
                let changes = product.changes();
                if changes.is_empty() {
                    return Ok(row);
                }
                debug!("Updating product {}", product.qap_pro_id);
                Ok(diesel::update(&row).set(&changes).get_result(conn)?)
            },
            None => {
                debug!("Inserting product {}", product.qap_pro_id);
                Ok(diesel::insert_into(dsl::produtoquimico)
                    .values(product)
                    .get_result(conn)?)
            },
        }
    })
}

pub fn find_product(conn: &PgConnection, qap_pro_id: ExternalId) -> StoreResult<Option<ChemicalProduct>> {
    use crate::schema::produtoquimico::dsl;

    Ok(dsl::produtoquimico
        .filter(dsl::qap_pro_id.eq(qap_pro_id))
        .first::<ChemicalProduct>(conn)
        .optional()?)
}

pub fn delete_product(conn: &PgConnection, qap_pro_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::produtoquimico::dsl;

    Ok(diesel::delete(dsl::produtoquimico.filter(dsl::qap_pro_id.eq(qap_pro_id)))
        .execute(conn)?)
}

pub fn merge_schedule(conn: &PgConnection, schedule: &NewCollectionSchedule) -> StoreResult<CollectionSchedule> {
    use crate::schema::horarioscoleta::dsl;

    conn.transaction::<_, StoreError, _>(|| {
        match find_schedule(conn, schedule.id_iqap_horario)? {
            Some(ref row) if row.deschorario == schedule.deschorario => Ok(row.clone()),
            Some(row) => {
                Ok(diesel::update(&row)
                    .set(dsl::deschorario.eq(&schedule.deschorario))
                    .get_result(conn)?)
            },
            None => {
                debug!("Inserting schedule {}", schedule.id_iqap_horario);
                Ok(diesel::insert_into(dsl::horarioscoleta)
                    .values(schedule)
                    .get_result(conn)?)
            },
        }
    })
}

pub fn find_schedule(conn: &PgConnection, id_iqap_horario: ExternalId) -> StoreResult<Option<CollectionSchedule>> {
    use crate::schema::horarioscoleta::dsl;

    Ok(dsl::horarioscoleta
        .filter(dsl::id_iqap_horario.eq(id_iqap_horario))
        .first::<CollectionSchedule>(conn)
        .optional()?)
}

pub fn list_schedules(conn: &PgConnection) -> StoreResult<Vec<CollectionSchedule>> {
    use crate::schema::horarioscoleta::dsl;

    Ok(dsl::horarioscoleta
        .order(dsl::id_iqap_horario.asc())
        .load::<CollectionSchedule>(conn)?)
}

pub fn delete_schedule(conn: &PgConnection, id_iqap_horario: ExternalId) -> StoreResult<usize> {
    use crate::schema::horarioscoleta::dsl;

    Ok(diesel::delete(dsl::horarioscoleta.filter(dsl::id_iqap_horario.eq(id_iqap_horario)))
        .execute(conn)?)
}

pub fn merge_occurrence(conn: &PgConnection, occurrence: &NewOccurrence) -> StoreResult<Occurrence> {
    use crate::schema::ocorrencias::dsl;

    conn.transaction::<_, StoreError, _>(|| {
        match find_occurrence(conn, occurrence.id_iqap_oco)? {
            Some(ref row) if row.descricao == occurrence.descricao => Ok(row.clone()),
            Some(row) => {
                Ok(diesel::update(&row)
                    .set(dsl::descricao.eq(&occurrence.descricao))
                    .get_result(conn)?)
            },
            None => {
                Ok(diesel::insert_into(dsl::ocorrencias)
                    .values(occurrence)
                    .get_result(conn)?)
            },
        }
    })
}

pub fn find_occurrence(conn: &PgConnection, id_iqap_oco: ExternalId) -> StoreResult<Option<Occurrence>> {
    use crate::schema::ocorrencias::dsl;

    Ok(dsl::ocorrencias
        .filter(dsl::id_iqap_oco.eq(id_iqap_oco))
        .first::<Occurrence>(conn)
        .optional()?)
}

pub fn delete_occurrence(conn: &PgConnection, id_iqap_oco: ExternalId) -> StoreResult<usize> {
    use crate::schema::ocorrencias::dsl;

    Ok(diesel::delete(dsl::ocorrencias.filter(dsl::id_iqap_oco.eq(id_iqap_oco)))
        .execute(conn)?)
}

pub fn merge_collection_type(conn: &PgConnection, kind: &NewCollectionType) -> StoreResult<CollectionType> {
    use crate::schema::tipocoleta::dsl;

    conn.transaction::<_, StoreError, _>(|| {
        match find_collection_type(conn, kind.tpc_id)? {
            Some(row) => match kind.tpc_descri {
                Some(ref descri) if row.tpc_descri.as_ref() != Some(descri) => {
                    Ok(diesel::update(&row)
                        .set(dsl::tpc_descri.eq(descri))
                        .get_result(conn)?)
                },
                _ => Ok(row),
            },
            None => {
                Ok(diesel::insert_into(dsl::tipocoleta)
                    .values(kind)
                    .get_result(conn)?)
            },
        }
    })
}

pub fn find_collection_type(conn: &PgConnection, tpc_id: ExternalId) -> StoreResult<Option<CollectionType>> {
    use crate::schema::tipocoleta::dsl;

    Ok(dsl::tipocoleta
        .filter(dsl::tpc_id.eq(tpc_id))
        .first::<CollectionType>(conn)
        .optional()?)
}

pub fn delete_collection_type(conn: &PgConnection, tpc_id: ExternalId) -> StoreResult<usize> {
    use crate::schema::tipocoleta::dsl;

    Ok(diesel::delete(dsl::tipocoleta.filter(dsl::tpc_id.eq(tpc_id)))
        .execute(conn)?)
}

/// Users are merged by their id, which is assigned by the authentication provider.
pub fn merge_user(conn: &PgConnection, user: &UserIdentity) -> StoreResult<UserIdentity> {
    use crate::schema::users::dsl;

    conn.transaction::<_, StoreError, _>(|| {
        match find_user(conn, user.id)? {
            Some(ref row) if row == user => Ok(row.clone()),
            Some(_) => Ok(user.save_changes::<UserIdentity>(conn)?),
            None => {
                Ok(diesel::insert_into(dsl::users)
                    .values(user)
                    .get_result(conn)?)
            },
        }
    })
}

pub fn find_user(conn: &PgConnection, id: IdType) -> StoreResult<Option<UserIdentity>> {
    use crate::schema::users::dsl;

    Ok(dsl::users.find(id).first::<UserIdentity>(conn).optional()?)
}

pub fn delete_user(conn: &PgConnection, id: IdType) -> StoreResult<usize> {
    use crate::schema::users::dsl;

    Ok(diesel::delete(dsl::users.find(id)).execute(conn)?)
}
