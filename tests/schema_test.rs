use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

#[macro_use]
extern crate lazy_static;

mod common;

use common::*;
use wtp_monitor::catalog::*;
use wtp_monitor::events::*;
use wtp_monitor::models::*;

struct Catalog {
    unit: OperationalUnit,
    product: ChemicalProduct,
    schedule: CollectionSchedule,
}

fn create_catalog(conn: &diesel::PgConnection) -> Catalog {
    let unit = merge_unit(conn, &NewOperationalUnit::new(random_external_id()).described("ETA Norte")).unwrap();
    let product = merge_product(conn, &NewChemicalProduct::new(random_external_id()).described("Sulfato de alumínio")).unwrap();
    let schedule = merge_schedule(conn, &NewCollectionSchedule::new(random_external_id(), "08:00")).unwrap();
    Catalog { unit, product, schedule }
}

fn drop_catalog(conn: &diesel::PgConnection, catalog: &Catalog) {
    let unit_id = catalog.unit.qap_lot_id.unwrap();
    purge_unit_events(conn, unit_id).unwrap();
    delete_unit(conn, unit_id).unwrap();
    delete_product(conn, catalog.product.qap_pro_id).unwrap();
    delete_schedule(conn, catalog.schedule.id_iqap_horario).unwrap();
}

fn wash_details() -> WashDetails {
    WashDetails {
        data: "2025-11-03".to_string(),
        hora: "09:00".to_string(),
        tempo_lavagem: "10 min".to_string(),
        volume_utilizado: BigDecimal::from_str("150.0").unwrap(),
    }
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_merge_is_idempotent() {
    let db = init_db();
    let conn = db.get_connection().unwrap();

    let ext = random_external_id();
    let first = merge_unit(&conn, &NewOperationalUnit::new(ext).described("Unidade Teste")).unwrap();
    let second = merge_unit(&conn, &NewOperationalUnit::new(ext).described("Unidade Teste")).unwrap();
    assert_eq!(first.id, second.id);

    // Attributes left out are not cleared
    let mut renamed = NewOperationalUnit::new(ext);
    renamed.sigla = Some("UT".to_string());
    let third = merge_unit(&conn, &renamed).unwrap();
    assert_eq!(third.id, first.id);
    assert_eq!(third.descri.as_deref(), Some("Unidade Teste"));
    assert_eq!(third.sigla.as_deref(), Some("UT"));

    let schedule_ext = random_external_id();
    let schedule = merge_schedule(&conn, &NewCollectionSchedule::new(schedule_ext, "Manhã")).unwrap();
    let relabeled = merge_schedule(&conn, &NewCollectionSchedule::new(schedule_ext, "Tarde")).unwrap();
    assert_eq!(schedule.id, relabeled.id);
    assert_eq!(relabeled.deschorario, "Tarde");

    let occurrence_ext = random_external_id();
    let occurrence = merge_occurrence(&conn, &NewOccurrence::new(occurrence_ext, "Água turva")).unwrap();
    assert_eq!(merge_occurrence(&conn, &NewOccurrence::new(occurrence_ext, "Água turva")).unwrap(), occurrence);

    let kind_ext = random_external_id();
    let kind = merge_collection_type(&conn, &NewCollectionType::new(kind_ext).described("Bruta")).unwrap();
    let same_kind = merge_collection_type(&conn, &NewCollectionType::new(kind_ext)).unwrap();
    assert_eq!(same_kind, kind);

    // Cleanup
    assert_eq!(delete_unit(&conn, ext).unwrap(), 1);
    assert_eq!(delete_schedule(&conn, schedule_ext).unwrap(), 1);
    assert_eq!(delete_occurrence(&conn, occurrence_ext).unwrap(), 1);
    assert_eq!(delete_collection_type(&conn, kind_ext).unwrap(), 1);
    assert!(find_unit(&conn, ext).unwrap().is_none());
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_relations() {
    let db = init_db();
    let conn = db.get_connection().unwrap();
    let catalog = create_catalog(&conn);
    let unit_id = catalog.unit.qap_lot_id.unwrap();
    let schedule_id = catalog.schedule.id_iqap_horario;
    let product_id = catalog.product.qap_pro_id;

    let user = merge_user(&conn, &UserIdentity {
        id: Uuid::new_v4(),
        email: Some("operador@eta.example".to_string()),
    }).unwrap();
    let occurrence = merge_occurrence(&conn, &NewOccurrence::new(random_external_id(), "Odor")).unwrap();
    let kind = merge_collection_type(&conn, &NewCollectionType::new(random_external_id()).described("Tratada")).unwrap();

    let filter_wash = insert_filter_wash(&conn, &NewFilterWash::new(unit_id, schedule_id, 3, wash_details()).by_user(&user)).unwrap();
    let decanter_wash = insert_decanter_wash(&conn, &NewDecanterWash::new(unit_id, schedule_id, 1, wash_details())).unwrap();
    let application = insert_application(&conn, &NewChemicalApplication::new(unit_id, schedule_id, product_id, 2.5).by_user(&user)).unwrap();
    let receipt = insert_receipt(&conn, &NewStockReceipt::new(
        unit_id, schedule_id, product_id, BigDecimal::from_str("40").unwrap(), "NF-1", "L-1",
    )).unwrap();
    let inventory = insert_inventory(&conn, &NewStockInventory::new(
        unit_id, schedule_id, product_id, BigDecimal::from_str("38.5").unwrap(),
    ).by_user(&user)).unwrap();
    let monitoring = insert_monitoring(&conn, &NewMonitoringEvent::for_unit(unit_id.to_string(), schedule_id)
        .with_occurrence(occurrence.id_iqap_oco, "Odor forte")
        .by_user(&user)).unwrap();
    let kind_link = link_collection_type(&conn, &NewUnitCollectionTypeLink::new(unit_id, kind.tpc_id)).unwrap();
    link_user(&conn, &NewUserUnitLink::new(42, unit_id, &user)).unwrap();

    // unit -> children
    let unit = &catalog.unit;
    assert_eq!(unit.filter_washes(&conn).unwrap(), vec![filter_wash.clone()]);
    assert_eq!(unit.decanter_washes(&conn).unwrap(), vec![decanter_wash.clone()]);
    assert_eq!(unit.applications(&conn).unwrap().len(), 1);
    assert_eq!(unit.receipts(&conn).unwrap(), vec![receipt.clone()]);
    assert_eq!(unit.inventories(&conn).unwrap(), vec![inventory.clone()]);
    assert_eq!(unit.monitorings(&conn).unwrap().len(), 1);
    assert_eq!(unit.collection_types(&conn).unwrap(), vec![kind.clone()]);
    assert_eq!(unit.users(&conn).unwrap(), vec![user.clone()]);

    // product and occurrence -> children
    assert_eq!(catalog.product.applications(&conn).unwrap(), vec![application.clone()]);
    assert_eq!(catalog.product.receipts(&conn).unwrap().len(), 1);
    assert_eq!(catalog.product.inventories(&conn).unwrap().len(), 1);
    assert_eq!(occurrence.monitorings(&conn).unwrap()[0].id, monitoring.id);

    // many-to-many, both directions
    assert_eq!(kind.units(&conn).unwrap(), vec![unit.clone()]);
    assert_eq!(user.units(&conn).unwrap(), vec![unit.clone()]);
    assert_eq!(kind_link.collection_type(&conn).unwrap(), Some(kind.clone()));

    // user -> events
    assert_eq!(user.filter_washes(&conn).unwrap().len(), 1);
    assert!(user.decanter_washes(&conn).unwrap().is_empty());
    assert_eq!(user.applications(&conn).unwrap().len(), 1);
    assert!(user.receipts(&conn).unwrap().is_empty());
    assert_eq!(user.inventories(&conn).unwrap().len(), 1);
    assert_eq!(user.monitorings(&conn).unwrap().len(), 1);

    // events -> parents
    assert_eq!(monitoring.unit(&conn).unwrap(), Some(unit.clone()));
    assert_eq!(monitoring.schedule(&conn).unwrap(), Some(catalog.schedule.clone()));
    assert_eq!(monitoring.occurrence(&conn).unwrap(), Some(occurrence.clone()));
    assert_eq!(monitoring.user(&conn).unwrap(), Some(user.clone()));
    assert_eq!(receipt.product(&conn).unwrap(), Some(catalog.product.clone()));
    assert_eq!(inventory.unit(&conn).unwrap(), Some(unit.clone()));
    assert_eq!(application.schedule(&conn).unwrap(), Some(catalog.schedule.clone()));
    assert_eq!(filter_wash.user(&conn).unwrap(), Some(user.clone()));
    assert_eq!(decanter_wash.user(&conn).unwrap(), None);

    // Cleanup
    assert_eq!(delete_filter_wash(&conn, filter_wash.id).unwrap(), 1);
    assert!(unit.filter_washes(&conn).unwrap().is_empty());
    assert_eq!(unlink_collection_type(&conn, kind_link.id).unwrap(), 1);
    assert!(kind.units(&conn).unwrap().is_empty());
    drop_catalog(&conn, &catalog);
    delete_occurrence(&conn, occurrence.id_iqap_oco).unwrap();
    delete_collection_type(&conn, kind.tpc_id).unwrap();
    delete_user(&conn, user.id).unwrap();
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_monitoring_updates() {
    let db = init_db();
    let conn = db.get_connection().unwrap();
    let catalog = create_catalog(&conn);
    let unit_text = catalog.unit.qap_lot_id.unwrap().to_string();

    let mut event = NewMonitoringEvent::for_unit(unit_text.clone(), catalog.schedule.id_iqap_horario);
    event.vazao = Some("80".to_string());
    event.imagem = Some(vec![0x89, 0x50, 0x4e, 0x47]);
    let mut stored = insert_monitoring(&conn, &event).unwrap();
    assert!(stored.created_at.is_some());
    assert_eq!(stored.deleted, Some(false));

    stored.vazao = Some("95".to_string());
    stored.ph = Some("7.1".to_string());
    save_monitoring(&conn, &mut stored).unwrap();

    let reloaded = monitoring_for_unit(&conn, &unit_text).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].vazao.as_deref(), Some("95"));
    assert_eq!(reloaded[0].ph.as_deref(), Some("7.1"));
    assert_eq!(reloaded[0].imagem, Some(vec![0x89, 0x50, 0x4e, 0x47]));
    assert!(reloaded[0].updated_at.is_some());

    // Soft deleted rows are hidden from the unit listing but kept in the table
    assert_eq!(soft_delete_monitoring(&conn, stored.id).unwrap(), 1);
    assert!(monitoring_for_unit(&conn, &unit_text).unwrap().is_empty());
    assert_eq!(catalog.unit.monitorings(&conn).unwrap().len(), 1);

    // Cleanup
    assert_eq!(delete_monitoring(&conn, stored.id).unwrap(), 1);
    assert!(catalog.unit.monitorings(&conn).unwrap().is_empty());
    drop_catalog(&conn, &catalog);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_loose_monitoring_unit_reference() {
    let db = init_db();
    let conn = db.get_connection().unwrap();
    let catalog = create_catalog(&conn);

    // The text column accepts values that name no unit
    let label = format!("ETA-{}", random_external_id());
    let stored = insert_monitoring(&conn, &NewMonitoringEvent::for_unit(label.clone(), catalog.schedule.id_iqap_horario)).unwrap();
    assert_eq!(stored.unit(&conn).unwrap(), None);

    assert_eq!(delete_monitoring_for_unit(&conn, &label).unwrap(), 1);
    drop_catalog(&conn, &catalog);
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_collection_type_link_toggle() {
    let db = init_db();
    let conn = db.get_connection().unwrap();
    let catalog = create_catalog(&conn);
    let unit_id = catalog.unit.qap_lot_id.unwrap();
    let kind = merge_collection_type(&conn, &NewCollectionType::new(random_external_id())).unwrap();

    let mut link = link_collection_type(&conn, &NewUnitCollectionTypeLink::new(unit_id, kind.tpc_id)).unwrap();
    assert!(link.is_active());
    set_collection_type_active(&conn, &mut link, false).unwrap();
    assert!(!catalog.unit.collection_type_links(&conn).unwrap()[0].is_active());
    assert_eq!(link.unit(&conn).unwrap(), Some(catalog.unit.clone()));

    // Cleanup
    drop_catalog(&conn, &catalog);
    delete_collection_type(&conn, kind.tpc_id).unwrap();
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_missing_parent_is_not_found() {
    let db = init_db();
    let conn = db.get_connection().unwrap();

    let orphan = NewFilterWash::new(random_external_id(), random_external_id(), 1, wash_details());
    match insert_filter_wash(&conn, &orphan) {
        Err(wtp_monitor::errors::StoreError::NotFound(_)) => {},
        x => panic!("Unexpected result {:?}", x),
    }
}

#[test]
#[ignore = "requires TEST_DATABASE_URL"]
fn test_padded_unit_reference_belongs_to_no_unit() {
    let db = init_db();
    let conn = db.get_connection().unwrap();
    let catalog = create_catalog(&conn);
    let unit_id = catalog.unit.qap_lot_id.unwrap();

    // Every path matches the exact text, so a padded reference is consistently foreign
    let padded = format!(" {} ", unit_id);
    let stored = insert_monitoring(&conn, &NewMonitoringEvent::for_unit(padded.clone(), catalog.schedule.id_iqap_horario)).unwrap();
    assert_eq!(stored.unit(&conn).unwrap(), None);
    assert!(catalog.unit.monitorings(&conn).unwrap().is_empty());
    assert_eq!(purge_unit_events(&conn, unit_id).unwrap(), 0);

    // The exact form is linked both ways and purged with the unit
    let exact = insert_monitoring(&conn, &NewMonitoringEvent::for_unit(unit_id.to_string(), catalog.schedule.id_iqap_horario)).unwrap();
    assert_eq!(exact.unit(&conn).unwrap(), Some(catalog.unit.clone()));
    assert_eq!(catalog.unit.monitorings(&conn).unwrap().len(), 1);
    assert_eq!(purge_unit_events(&conn, unit_id).unwrap(), 1);

    // Cleanup
    assert_eq!(delete_monitoring_for_unit(&conn, &padded).unwrap(), 1);
    drop_catalog(&conn, &catalog);
}
