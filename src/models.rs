use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{PgConnection, r2d2::ConnectionManager};
use uuid::Uuid;

use super::schema::*;

// type alias to use in multiple places
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type IdType = Uuid;

/// Legacy numeric id shared with the plant's external system.
pub type ExternalId = i32;

/// Schedule assigned to monitoring rows that do not name one.
pub const DEFAULT_MONITORING_SCHEDULE: ExternalId = 13;

// ---- Catalog ----

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "unidadeoperacional"]
#[changeset_options(treat_none_as_null = "true")]
pub struct OperationalUnit {
    pub id: IdType,
    pub qap_lot_id: Option<ExternalId>,
    pub descri: Option<String>,
    pub sigla: Option<String>,
    pub codigolotacao: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "unidadeoperacional"]
pub struct NewOperationalUnit {
    pub id: IdType,
    pub qap_lot_id: Option<ExternalId>,
    pub descri: Option<String>,
    pub sigla: Option<String>,
    pub codigolotacao: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[table_name = "unidadeoperacional"]
pub struct OperationalUnitChanges {
    pub descri: Option<String>,
    pub sigla: Option<String>,
    pub codigolotacao: Option<String>,
}

impl NewOperationalUnit {
    pub fn new(qap_lot_id: ExternalId) -> Self {
        NewOperationalUnit {
            id: Uuid::new_v4(),
            qap_lot_id: Some(qap_lot_id),
            descri: None,
            sigla: None,
            codigolotacao: None,
        }
    }

    pub fn described<S: Into<String>>(mut self, descri: S) -> Self {
        self.descri = Some(descri.into());
        self
    }

    pub fn changes(&self) -> OperationalUnitChanges {
        OperationalUnitChanges {
            descri: self.descri.clone(),
            sigla: self.sigla.clone(),
            codigolotacao: self.codigolotacao.clone(),
        }
    }
}

impl OperationalUnitChanges {
    pub fn is_empty(&self) -> bool {
        self.descri.is_none() && self.sigla.is_none() && self.codigolotacao.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "produtoquimico"]
#[changeset_options(treat_none_as_null = "true")]
pub struct ChemicalProduct {
    pub id: IdType,
    pub id_unidade: Option<ExternalId>,
    pub qap_pro_id: ExternalId,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "produtoquimico"]
pub struct NewChemicalProduct {
    pub id: IdType,
    pub id_unidade: Option<ExternalId>,
    pub qap_pro_id: ExternalId,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[table_name = "produtoquimico"]
pub struct ChemicalProductChanges {
    pub id_unidade: Option<ExternalId>,
    pub descricao: Option<String>,
}

impl NewChemicalProduct {
    pub fn new(qap_pro_id: ExternalId) -> Self {
        NewChemicalProduct {
            id: Uuid::new_v4(),
            id_unidade: None,
            qap_pro_id,
            descricao: None,
        }
    }

    pub fn described<S: Into<String>>(mut self, descricao: S) -> Self {
        self.descricao = Some(descricao.into());
        self
    }

    pub fn changes(&self) -> ChemicalProductChanges {
        ChemicalProductChanges {
            id_unidade: self.id_unidade,
            descricao: self.descricao.clone(),
        }
    }
}

impl ChemicalProductChanges {
    pub fn is_empty(&self) -> bool {
        self.id_unidade.is_none() && self.descricao.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "horarioscoleta"]
pub struct CollectionSchedule {
    pub id: IdType,
    pub deschorario: String,
    pub id_iqap_horario: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "horarioscoleta"]
pub struct NewCollectionSchedule {
    pub id: IdType,
    pub deschorario: String,
    pub id_iqap_horario: ExternalId,
}

impl NewCollectionSchedule {
    pub fn new<S: Into<String>>(id_iqap_horario: ExternalId, deschorario: S) -> Self {
        NewCollectionSchedule {
            id: Uuid::new_v4(),
            deschorario: deschorario.into(),
            id_iqap_horario,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "ocorrencias"]
pub struct Occurrence {
    pub id: IdType,
    pub descricao: String,
    pub id_iqap_oco: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "ocorrencias"]
pub struct NewOccurrence {
    pub id: IdType,
    pub descricao: String,
    pub id_iqap_oco: ExternalId,
}

impl NewOccurrence {
    pub fn new<S: Into<String>>(id_iqap_oco: ExternalId, descricao: S) -> Self {
        NewOccurrence {
            id: Uuid::new_v4(),
            descricao: descricao.into(),
            id_iqap_oco,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "tipocoleta"]
#[changeset_options(treat_none_as_null = "true")]
pub struct CollectionType {
    pub id: IdType,
    pub tpc_id: ExternalId,
    pub tpc_descri: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "tipocoleta"]
pub struct NewCollectionType {
    pub id: IdType,
    pub tpc_id: ExternalId,
    pub tpc_descri: Option<String>,
}

impl NewCollectionType {
    pub fn new(tpc_id: ExternalId) -> Self {
        NewCollectionType {
            id: Uuid::new_v4(),
            tpc_id,
            tpc_descri: None,
        }
    }

    pub fn described<S: Into<String>>(mut self, tpc_descri: S) -> Self {
        self.tpc_descri = Some(tpc_descri.into());
        self
    }
}

/// Row of `auth.users`. The id comes from the authentication provider.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Insertable, AsChangeset)]
#[table_name = "users"]
#[changeset_options(treat_none_as_null = "true")]
pub struct UserIdentity {
    pub id: IdType,
    pub email: Option<String>,
}

// ---- Events ----

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "monitoramentos"]
#[changeset_options(treat_none_as_null = "true")]
pub struct MonitoringEvent {
    pub id: IdType,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted: Option<bool>,
    pub vazao: Option<String>,
    pub cor: Option<String>,
    pub turbidez: Option<String>,
    pub ph: Option<String>,
    pub cloro: Option<String>,
    pub imagem: Option<Vec<u8>>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub operador: Option<String>,
    pub laboratorista: Option<String>,
    pub email: Option<String>,
    pub ferro: Option<String>,
    pub manganes: Option<String>,
    pub aluminio: Option<String>,
    pub alcalinidade: Option<String>,
    pub fluor: Option<String>,
    pub ocorrencia_presente: bool,
    pub obs_ocorrencia: Option<String>,
    pub data_coleta: Option<String>,
    pub horario_manual: Option<String>,
    pub usuario_id: Option<IdType>,
    pub qap_lot_id: Option<String>,
    pub tpc_id: Option<String>,
    pub id_iqap_horario: ExternalId,
    pub id_iqap_oco: Option<ExternalId>,
}

impl MonitoringEvent {
    /// The unit reference is free text. Only the exact decimal form of a unit id
    /// (what `delete_monitoring_for_unit` and the unit side match on) points to a unit.
    pub fn unit_external_id(&self) -> Option<ExternalId> {
        self.qap_lot_id.as_ref()
            .and_then(|x| x.parse::<ExternalId>().ok().filter(|id| id.to_string() == *x))
    }
}

/// Monitoring row to insert. Timestamps are left to the database.
#[derive(Debug, Clone, Insertable)]
#[table_name = "monitoramentos"]
pub struct NewMonitoringEvent {
    pub id: IdType,
    pub deleted: Option<bool>,
    pub vazao: Option<String>,
    pub cor: Option<String>,
    pub turbidez: Option<String>,
    pub ph: Option<String>,
    pub cloro: Option<String>,
    pub imagem: Option<Vec<u8>>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub operador: Option<String>,
    pub laboratorista: Option<String>,
    pub email: Option<String>,
    pub ferro: Option<String>,
    pub manganes: Option<String>,
    pub aluminio: Option<String>,
    pub alcalinidade: Option<String>,
    pub fluor: Option<String>,
    pub ocorrencia_presente: bool,
    pub obs_ocorrencia: Option<String>,
    pub data_coleta: Option<String>,
    pub horario_manual: Option<String>,
    pub usuario_id: Option<IdType>,
    pub qap_lot_id: Option<String>,
    pub tpc_id: Option<String>,
    pub id_iqap_horario: ExternalId,
    pub id_iqap_oco: Option<ExternalId>,
}

impl Default for NewMonitoringEvent {
    fn default() -> Self {
        NewMonitoringEvent {
            id: Uuid::new_v4(),
            deleted: Some(false),
            vazao: None,
            cor: None,
            turbidez: None,
            ph: None,
            cloro: None,
            imagem: None,
            data: None,
            hora: None,
            operador: None,
            laboratorista: None,
            email: None,
            ferro: None,
            manganes: None,
            aluminio: None,
            alcalinidade: None,
            fluor: None,
            ocorrencia_presente: false,
            obs_ocorrencia: None,
            data_coleta: None,
            horario_manual: None,
            usuario_id: None,
            qap_lot_id: None,
            tpc_id: None,
            id_iqap_horario: DEFAULT_MONITORING_SCHEDULE,
            id_iqap_oco: None,
        }
    }
}

impl NewMonitoringEvent {
    pub fn for_unit<S: Into<String>>(qap_lot_id: S, id_iqap_horario: ExternalId) -> Self {
        NewMonitoringEvent {
            qap_lot_id: Some(qap_lot_id.into()),
            id_iqap_horario,
            ..Default::default()
        }
    }

    /// Flags the row as carrying an anomaly of the given catalogued type.
    pub fn with_occurrence<S: Into<String>>(mut self, id_iqap_oco: ExternalId, obs: S) -> Self {
        self.ocorrencia_presente = true;
        self.id_iqap_oco = Some(id_iqap_oco);
        self.obs_ocorrencia = Some(obs.into());
        self
    }

    pub fn by_user(mut self, user: &UserIdentity) -> Self {
        self.usuario_id = Some(user.id);
        self.email = user.email.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "aplicacaoprodutoquimico"]
#[changeset_options(treat_none_as_null = "true")]
pub struct ChemicalApplication {
    pub id: IdType,
    pub created_at: DateTime<Utc>,
    pub ponto_aplicacao: Option<String>,
    pub quantidade: Option<f64>,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: Option<ExternalId>,
    pub id_iqap_horario: Option<ExternalId>,
    pub qap_prod_id: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "aplicacaoprodutoquimico"]
pub struct NewChemicalApplication {
    pub id: IdType,
    pub ponto_aplicacao: Option<String>,
    pub quantidade: Option<f64>,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: Option<ExternalId>,
    pub id_iqap_horario: Option<ExternalId>,
    pub qap_prod_id: ExternalId,
}

impl NewChemicalApplication {
    pub fn new(qap_lot_id: ExternalId, id_iqap_horario: ExternalId, qap_prod_id: ExternalId, quantidade: f64) -> Self {
        NewChemicalApplication {
            id: Uuid::new_v4(),
            ponto_aplicacao: None,
            quantidade: Some(quantidade),
            usuario_id: None,
            email: None,
            data: None,
            hora: None,
            horario_manual: None,
            qap_lot_id: Some(qap_lot_id),
            id_iqap_horario: Some(id_iqap_horario),
            qap_prod_id,
        }
    }

    pub fn by_user(mut self, user: &UserIdentity) -> Self {
        self.usuario_id = Some(user.id);
        self.email = user.email.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "estoqueinventario"]
#[changeset_options(treat_none_as_null = "true")]
pub struct StockInventory {
    pub id: IdType,
    pub created_at: Option<DateTime<Utc>>,
    pub quantidade: BigDecimal,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
    pub qap_prod_id: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "estoqueinventario"]
pub struct NewStockInventory {
    pub id: IdType,
    pub quantidade: BigDecimal,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
    pub qap_prod_id: ExternalId,
}

impl NewStockInventory {
    pub fn new(qap_lot_id: ExternalId, id_iqap_horario: ExternalId, qap_prod_id: ExternalId, quantidade: BigDecimal) -> Self {
        NewStockInventory {
            id: Uuid::new_v4(),
            quantidade,
            usuario_id: None,
            email: None,
            data: None,
            hora: None,
            horario_manual: None,
            qap_lot_id,
            id_iqap_horario,
            qap_prod_id,
        }
    }

    pub fn by_user(mut self, user: &UserIdentity) -> Self {
        self.usuario_id = Some(user.id);
        self.email = user.email.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "estoquerecebimento"]
#[changeset_options(treat_none_as_null = "true")]
pub struct StockReceipt {
    pub id: IdType,
    pub created_at: Option<DateTime<Utc>>,
    pub quantidade: BigDecimal,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub nota_fiscal: String,
    pub lote: String,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
    pub qap_prod_id: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "estoquerecebimento"]
pub struct NewStockReceipt {
    pub id: IdType,
    pub quantidade: BigDecimal,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub nota_fiscal: String,
    pub lote: String,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
    pub qap_prod_id: ExternalId,
}

impl NewStockReceipt {
    pub fn new<S: Into<String>>(
        qap_lot_id: ExternalId,
        id_iqap_horario: ExternalId,
        qap_prod_id: ExternalId,
        quantidade: BigDecimal,
        nota_fiscal: S,
        lote: S,
    ) -> Self {
        NewStockReceipt {
            id: Uuid::new_v4(),
            quantidade,
            usuario_id: None,
            email: None,
            nota_fiscal: nota_fiscal.into(),
            lote: lote.into(),
            data: None,
            hora: None,
            horario_manual: None,
            qap_lot_id,
            id_iqap_horario,
            qap_prod_id,
        }
    }

    pub fn by_user(mut self, user: &UserIdentity) -> Self {
        self.usuario_id = Some(user.id);
        self.email = user.email.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "lavagemdecantador"]
#[changeset_options(treat_none_as_null = "true")]
pub struct DecanterWash {
    pub id: IdType,
    pub created_at: Option<DateTime<Utc>>,
    pub data: String,
    pub hora: String,
    pub numero_decantador: i32,
    pub tempo_lavagem: String,
    pub volume_utilizado: BigDecimal,
    pub obs: Option<String>,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub tipo: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "lavagemdecantador"]
pub struct NewDecanterWash {
    pub id: IdType,
    pub data: String,
    pub hora: String,
    pub numero_decantador: i32,
    pub tempo_lavagem: String,
    pub volume_utilizado: BigDecimal,
    pub obs: Option<String>,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub tipo: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
}

/// Fields every wash row requires, shared by filter and decanter washes.
#[derive(Debug, Clone)]
pub struct WashDetails {
    pub data: String,
    pub hora: String,
    pub tempo_lavagem: String,
    pub volume_utilizado: BigDecimal,
}

impl NewDecanterWash {
    pub fn new(qap_lot_id: ExternalId, id_iqap_horario: ExternalId, numero_decantador: i32, details: WashDetails) -> Self {
        NewDecanterWash {
            id: Uuid::new_v4(),
            data: details.data,
            hora: details.hora,
            numero_decantador,
            tempo_lavagem: details.tempo_lavagem,
            volume_utilizado: details.volume_utilizado,
            obs: None,
            usuario_id: None,
            email: None,
            tipo: None,
            horario_manual: None,
            qap_lot_id,
            id_iqap_horario,
        }
    }

    pub fn by_user(mut self, user: &UserIdentity) -> Self {
        self.usuario_id = Some(user.id);
        self.email = user.email.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "lavagemfiltro"]
#[changeset_options(treat_none_as_null = "true")]
pub struct FilterWash {
    pub id: IdType,
    pub created_at: Option<DateTime<Utc>>,
    pub data: String,
    pub hora: String,
    pub numero_filtro: i32,
    pub tempo_lavagem: String,
    pub volume_utilizado: BigDecimal,
    pub obs: Option<String>,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "lavagemfiltro"]
pub struct NewFilterWash {
    pub id: IdType,
    pub data: String,
    pub hora: String,
    pub numero_filtro: i32,
    pub tempo_lavagem: String,
    pub volume_utilizado: BigDecimal,
    pub obs: Option<String>,
    pub usuario_id: Option<IdType>,
    pub email: Option<String>,
    pub horario_manual: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_iqap_horario: ExternalId,
}

impl NewFilterWash {
    pub fn new(qap_lot_id: ExternalId, id_iqap_horario: ExternalId, numero_filtro: i32, details: WashDetails) -> Self {
        NewFilterWash {
            id: Uuid::new_v4(),
            data: details.data,
            hora: details.hora,
            numero_filtro,
            tempo_lavagem: details.tempo_lavagem,
            volume_utilizado: details.volume_utilizado,
            obs: None,
            usuario_id: None,
            email: None,
            horario_manual: None,
            qap_lot_id,
            id_iqap_horario,
        }
    }

    pub fn by_user(mut self, user: &UserIdentity) -> Self {
        self.usuario_id = Some(user.id);
        self.email = user.email.clone();
        self
    }
}

// ---- Associations ----

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "unidadetipocoleta"]
#[changeset_options(treat_none_as_null = "true")]
pub struct UnitCollectionTypeLink {
    pub id: IdType,
    pub created_at: DateTime<Utc>,
    pub ativo: Option<i16>,
    pub qap_lot_id: Option<ExternalId>,
    pub qap_tpc_id: Option<ExternalId>,
}

impl UnitCollectionTypeLink {
    pub fn is_active(&self) -> bool {
        self.ativo.map(|x| x != 0).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "unidadetipocoleta"]
pub struct NewUnitCollectionTypeLink {
    pub id: IdType,
    pub ativo: Option<i16>,
    pub qap_lot_id: Option<ExternalId>,
    pub qap_tpc_id: Option<ExternalId>,
}

impl NewUnitCollectionTypeLink {
    pub fn new(qap_lot_id: ExternalId, qap_tpc_id: ExternalId) -> Self {
        NewUnitCollectionTypeLink {
            id: Uuid::new_v4(),
            ativo: Some(1),
            qap_lot_id: Some(qap_lot_id),
            qap_tpc_id: Some(qap_tpc_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, AsChangeset)]
#[table_name = "usuariounidades"]
#[changeset_options(treat_none_as_null = "true")]
pub struct UserUnitLink {
    pub id: IdType,
    pub created_at: DateTime<Utc>,
    pub usr_codigo: i32,
    pub email: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_supabase: Option<IdType>,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "usuariounidades"]
pub struct NewUserUnitLink {
    pub id: IdType,
    pub usr_codigo: i32,
    pub email: Option<String>,
    pub qap_lot_id: ExternalId,
    pub id_supabase: Option<IdType>,
}

impl NewUserUnitLink {
    pub fn new(usr_codigo: i32, qap_lot_id: ExternalId, user: &UserIdentity) -> Self {
        NewUserUnitLink {
            id: Uuid::new_v4(),
            usr_codigo,
            email: user.email.clone(),
            qap_lot_id,
            id_supabase: Some(user.id),
        }
    }
}
