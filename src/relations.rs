//! Traversal along the relationships between tables.
//!
//! Most foreign keys point at the external ids rather than the uuid primary
//! keys, so these are plain filtered queries instead of `joinable!` joins.
//! Many-to-many relationships go through their association rows.

use diesel::{PgConnection, prelude::*};

use crate::errors::StoreResult;
use crate::models::*;
use crate::catalog::{find_occurrence, find_product, find_schedule, find_unit, find_user, find_collection_type};

impl OperationalUnit {
    pub fn filter_washes(&self, conn: &PgConnection) -> StoreResult<Vec<FilterWash>> {
        use crate::schema::lavagemfiltro::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::lavagemfiltro
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<FilterWash>(conn)?)
    }

    pub fn decanter_washes(&self, conn: &PgConnection) -> StoreResult<Vec<DecanterWash>> {
        use crate::schema::lavagemdecantador::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::lavagemdecantador
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<DecanterWash>(conn)?)
    }

    pub fn applications(&self, conn: &PgConnection) -> StoreResult<Vec<ChemicalApplication>> {
        use crate::schema::aplicacaoprodutoquimico::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::aplicacaoprodutoquimico
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<ChemicalApplication>(conn)?)
    }

    pub fn receipts(&self, conn: &PgConnection) -> StoreResult<Vec<StockReceipt>> {
        use crate::schema::estoquerecebimento::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::estoquerecebimento
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<StockReceipt>(conn)?)
    }

    pub fn inventories(&self, conn: &PgConnection) -> StoreResult<Vec<StockInventory>> {
        use crate::schema::estoqueinventario::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::estoqueinventario
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<StockInventory>(conn)?)
    }

    /// Monitoring rows whose text unit reference spells this unit's id.
    pub fn monitorings(&self, conn: &PgConnection) -> StoreResult<Vec<MonitoringEvent>> {
        use crate::schema::monitoramentos::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::monitoramentos
            .filter(dsl::qap_lot_id.eq(ext.to_string()))
            .load::<MonitoringEvent>(conn)?)
    }

    pub fn collection_type_links(&self, conn: &PgConnection) -> StoreResult<Vec<UnitCollectionTypeLink>> {
        use crate::schema::unidadetipocoleta::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::unidadetipocoleta
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<UnitCollectionTypeLink>(conn)?)
    }

    pub fn collection_types(&self, conn: &PgConnection) -> StoreResult<Vec<CollectionType>> {
        use crate::schema::tipocoleta::dsl;

        let ids: Vec<ExternalId> = self.collection_type_links(conn)?
            .iter()
            .filter_map(|x| x.qap_tpc_id)
            .collect();

        Ok(dsl::tipocoleta
            .filter(dsl::tpc_id.eq_any(ids))
            .order(dsl::tpc_id.asc())
            .load::<CollectionType>(conn)?)
    }

    pub fn user_links(&self, conn: &PgConnection) -> StoreResult<Vec<UserUnitLink>> {
        use crate::schema::usuariounidades::dsl;

        let ext = match self.qap_lot_id {
            Some(x) => x,
            None => return Ok(Vec::new()),
        };

        Ok(dsl::usuariounidades
            .filter(dsl::qap_lot_id.eq(ext))
            .load::<UserUnitLink>(conn)?)
    }

    pub fn users(&self, conn: &PgConnection) -> StoreResult<Vec<UserIdentity>> {
        use crate::schema::users::dsl;

        let ids: Vec<IdType> = self.user_links(conn)?
            .iter()
            .filter_map(|x| x.id_supabase)
            .collect();

        Ok(dsl::users
            .filter(dsl::id.eq_any(ids))
            .load::<UserIdentity>(conn)?)
    }
}

impl ChemicalProduct {
    pub fn applications(&self, conn: &PgConnection) -> StoreResult<Vec<ChemicalApplication>> {
        use crate::schema::aplicacaoprodutoquimico::dsl;

        Ok(dsl::aplicacaoprodutoquimico
            .filter(dsl::qap_prod_id.eq(self.qap_pro_id))
            .load::<ChemicalApplication>(conn)?)
    }

    pub fn receipts(&self, conn: &PgConnection) -> StoreResult<Vec<StockReceipt>> {
        use crate::schema::estoquerecebimento::dsl;

        Ok(dsl::estoquerecebimento
            .filter(dsl::qap_prod_id.eq(self.qap_pro_id))
            .load::<StockReceipt>(conn)?)
    }

    pub fn inventories(&self, conn: &PgConnection) -> StoreResult<Vec<StockInventory>> {
        use crate::schema::estoqueinventario::dsl;

        Ok(dsl::estoqueinventario
            .filter(dsl::qap_prod_id.eq(self.qap_pro_id))
            .load::<StockInventory>(conn)?)
    }
}

impl Occurrence {
    pub fn monitorings(&self, conn: &PgConnection) -> StoreResult<Vec<MonitoringEvent>> {
        use crate::schema::monitoramentos::dsl;

        Ok(dsl::monitoramentos
            .filter(dsl::id_iqap_oco.eq(self.id_iqap_oco))
            .load::<MonitoringEvent>(conn)?)
    }
}

impl CollectionType {
    pub fn unit_links(&self, conn: &PgConnection) -> StoreResult<Vec<UnitCollectionTypeLink>> {
        use crate::schema::unidadetipocoleta::dsl;

        Ok(dsl::unidadetipocoleta
            .filter(dsl::qap_tpc_id.eq(self.tpc_id))
            .load::<UnitCollectionTypeLink>(conn)?)
    }

    pub fn units(&self, conn: &PgConnection) -> StoreResult<Vec<OperationalUnit>> {
        use crate::schema::unidadeoperacional::dsl;

        let ids: Vec<ExternalId> = self.unit_links(conn)?
            .iter()
            .filter_map(|x| x.qap_lot_id)
            .collect();

        Ok(dsl::unidadeoperacional
            .filter(dsl::qap_lot_id.eq_any(ids))
            .load::<OperationalUnit>(conn)?)
    }
}

impl UserIdentity {
    pub fn monitorings(&self, conn: &PgConnection) -> StoreResult<Vec<MonitoringEvent>> {
        use crate::schema::monitoramentos::dsl;

        Ok(dsl::monitoramentos
            .filter(dsl::usuario_id.eq(self.id))
            .load::<MonitoringEvent>(conn)?)
    }

    pub fn filter_washes(&self, conn: &PgConnection) -> StoreResult<Vec<FilterWash>> {
        use crate::schema::lavagemfiltro::dsl;

        Ok(dsl::lavagemfiltro
            .filter(dsl::usuario_id.eq(self.id))
            .load::<FilterWash>(conn)?)
    }

    pub fn decanter_washes(&self, conn: &PgConnection) -> StoreResult<Vec<DecanterWash>> {
        use crate::schema::lavagemdecantador::dsl;

        Ok(dsl::lavagemdecantador
            .filter(dsl::usuario_id.eq(self.id))
            .load::<DecanterWash>(conn)?)
    }

    pub fn applications(&self, conn: &PgConnection) -> StoreResult<Vec<ChemicalApplication>> {
        use crate::schema::aplicacaoprodutoquimico::dsl;

        Ok(dsl::aplicacaoprodutoquimico
            .filter(dsl::usuario_id.eq(self.id))
            .load::<ChemicalApplication>(conn)?)
    }

    pub fn receipts(&self, conn: &PgConnection) -> StoreResult<Vec<StockReceipt>> {
        use crate::schema::estoquerecebimento::dsl;

        Ok(dsl::estoquerecebimento
            .filter(dsl::usuario_id.eq(self.id))
            .load::<StockReceipt>(conn)?)
    }

    pub fn inventories(&self, conn: &PgConnection) -> StoreResult<Vec<StockInventory>> {
        use crate::schema::estoqueinventario::dsl;

        Ok(dsl::estoqueinventario
            .filter(dsl::usuario_id.eq(self.id))
            .load::<StockInventory>(conn)?)
    }

    pub fn unit_links(&self, conn: &PgConnection) -> StoreResult<Vec<UserUnitLink>> {
        use crate::schema::usuariounidades::dsl;

        Ok(dsl::usuariounidades
            .filter(dsl::id_supabase.eq(self.id))
            .load::<UserUnitLink>(conn)?)
    }

    pub fn units(&self, conn: &PgConnection) -> StoreResult<Vec<OperationalUnit>> {
        use crate::schema::unidadeoperacional::dsl;

        let ids: Vec<ExternalId> = self.unit_links(conn)?
            .iter()
            .map(|x| x.qap_lot_id)
            .collect();

        Ok(dsl::unidadeoperacional
            .filter(dsl::qap_lot_id.eq_any(ids))
            .load::<OperationalUnit>(conn)?)
    }
}

fn optional_user(conn: &PgConnection, id: Option<IdType>) -> StoreResult<Option<UserIdentity>> {
    match id {
        Some(id) => find_user(conn, id),
        None => Ok(None),
    }
}

impl MonitoringEvent {
    /// Resolves the text unit reference; unparsable references yield no unit.
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        match self.unit_external_id() {
            Some(ext) => find_unit(conn, ext),
            None => Ok(None),
        }
    }

    pub fn schedule(&self, conn: &PgConnection) -> StoreResult<Option<CollectionSchedule>> {
        find_schedule(conn, self.id_iqap_horario)
    }

    pub fn occurrence(&self, conn: &PgConnection) -> StoreResult<Option<Occurrence>> {
        match self.id_iqap_oco {
            Some(ext) => find_occurrence(conn, ext),
            None => Ok(None),
        }
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.usuario_id)
    }
}

impl ChemicalApplication {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        match self.qap_lot_id {
            Some(ext) => find_unit(conn, ext),
            None => Ok(None),
        }
    }

    pub fn schedule(&self, conn: &PgConnection) -> StoreResult<Option<CollectionSchedule>> {
        match self.id_iqap_horario {
            Some(ext) => find_schedule(conn, ext),
            None => Ok(None),
        }
    }

    pub fn product(&self, conn: &PgConnection) -> StoreResult<Option<ChemicalProduct>> {
        find_product(conn, self.qap_prod_id)
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.usuario_id)
    }
}

impl StockReceipt {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        find_unit(conn, self.qap_lot_id)
    }

    pub fn schedule(&self, conn: &PgConnection) -> StoreResult<Option<CollectionSchedule>> {
        find_schedule(conn, self.id_iqap_horario)
    }

    pub fn product(&self, conn: &PgConnection) -> StoreResult<Option<ChemicalProduct>> {
        find_product(conn, self.qap_prod_id)
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.usuario_id)
    }
}

impl StockInventory {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        find_unit(conn, self.qap_lot_id)
    }

    pub fn schedule(&self, conn: &PgConnection) -> StoreResult<Option<CollectionSchedule>> {
        find_schedule(conn, self.id_iqap_horario)
    }

    pub fn product(&self, conn: &PgConnection) -> StoreResult<Option<ChemicalProduct>> {
        find_product(conn, self.qap_prod_id)
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.usuario_id)
    }
}

impl FilterWash {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        find_unit(conn, self.qap_lot_id)
    }

    pub fn schedule(&self, conn: &PgConnection) -> StoreResult<Option<CollectionSchedule>> {
        find_schedule(conn, self.id_iqap_horario)
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.usuario_id)
    }
}

impl DecanterWash {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        find_unit(conn, self.qap_lot_id)
    }

    pub fn schedule(&self, conn: &PgConnection) -> StoreResult<Option<CollectionSchedule>> {
        find_schedule(conn, self.id_iqap_horario)
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.usuario_id)
    }
}

impl UnitCollectionTypeLink {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        match self.qap_lot_id {
            Some(ext) => find_unit(conn, ext),
            None => Ok(None),
        }
    }

    pub fn collection_type(&self, conn: &PgConnection) -> StoreResult<Option<CollectionType>> {
        match self.qap_tpc_id {
            Some(ext) => find_collection_type(conn, ext),
            None => Ok(None),
        }
    }
}

impl UserUnitLink {
    pub fn unit(&self, conn: &PgConnection) -> StoreResult<Option<OperationalUnit>> {
        find_unit(conn, self.qap_lot_id)
    }

    pub fn user(&self, conn: &PgConnection) -> StoreResult<Option<UserIdentity>> {
        optional_user(conn, self.id_supabase)
    }
}
