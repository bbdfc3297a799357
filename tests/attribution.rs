//! Caller attribution: identity, session flags, home ownership and
//! synchronization direction

mod common;

use chrono::{Duration, Utc};
use common::{config_for, Fixture, SOURCE_A, SOURCE_B};
use lineage_integrator::{
    AssetProperties, EffectiveWindow, ElementStatus, FlowProperties, LineageError, Paging,
    PermittedSynchronization, PortProperties, ProcessProperties,
};
use std::sync::Arc;

#[test]
fn every_store_call_carries_the_caller() {
    let fx = Fixture::new();
    fx.ctx
        .create_asset(true, None, AssetProperties::new("postgres://dw/public.orders"))
        .unwrap();

    let calls = fx.store.recorded_calls();
    let call = calls.last().unwrap();
    assert_eq!(call.operation, "create_element");
    assert_eq!(call.attribution.user_id, "etl-npa");
    assert_eq!(call.attribution.external_source.guid, SOURCE_A.0);
    assert_eq!(call.attribution.external_source.qualified_name, SOURCE_A.1);
    assert!(!call.attribution.for_lineage);
    assert!(!call.attribution.for_duplicate_processing);
}

#[test]
fn flag_changes_apply_to_later_calls_only() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;

    ctx.find_assets(".*", Paging::default(), None).unwrap();
    ctx.set_for_lineage(true);
    ctx.set_for_duplicate_processing(true);
    ctx.find_assets(".*", Paging::default(), None).unwrap();
    ctx.set_for_lineage(false);
    ctx.find_assets(".*", Paging::default(), None).unwrap();

    let flags: Vec<(bool, bool)> = fx
        .store
        .recorded_calls()
        .iter()
        .map(|c| (c.attribution.for_lineage, c.attribution.for_duplicate_processing))
        .collect();
    assert_eq!(flags, vec![(false, false), (true, true), (false, true)]);
}

#[test]
fn flags_set_on_one_thread_are_seen_on_another() {
    let fx = Fixture::new();
    let ctx = Arc::new(fx.ctx);

    let setter = Arc::clone(&ctx);
    std::thread::spawn(move || setter.set_for_lineage(true))
        .join()
        .unwrap();
    assert!(ctx.for_lineage());

    let reader = Arc::clone(&ctx);
    let seen = std::thread::spawn(move || {
        reader.find_assets(".*", Paging::default(), None).unwrap();
        reader.for_lineage()
    })
    .join()
    .unwrap();
    assert!(seen);
    assert!(fx.store.recorded_calls()[0].attribution.for_lineage);
}

#[test]
fn home_elements_are_only_changed_by_their_source() {
    let fx = Fixture::new();
    let airflow = &fx.ctx;
    let dbt = fx.other_source(SOURCE_B);

    let owned = airflow
        .create_asset(true, None, AssetProperties::new("postgres://dw/public.orders"))
        .unwrap();
    let shared = airflow
        .create_asset(false, None, AssetProperties::new("s3://raw/orders.csv"))
        .unwrap();

    let err = dbt
        .update_asset(&owned, None, true, AssetProperties::default().with_description("x"), None)
        .unwrap_err();
    assert!(matches!(err, LineageError::UserNotAuthorized { .. }));
    let err = dbt.remove_asset(&owned, None, None).unwrap_err();
    assert!(matches!(err, LineageError::UserNotAuthorized { .. }));

    // Reads are fine from anywhere
    assert!(dbt.get_asset_by_guid(&owned, None).is_ok());

    dbt.update_asset(&shared, None, true, AssetProperties::default().with_description("raw"), None)
        .unwrap();
    assert_eq!(
        airflow.get_asset_by_guid(&shared, None).unwrap().properties.description(),
        Some("raw")
    );
}

#[test]
fn homed_relationships_are_only_cleared_by_their_source() {
    let fx = Fixture::new();
    let airflow = &fx.ctx;
    let dbt = fx.other_source(SOURCE_B);

    let process = airflow
        .create_process(false, ElementStatus::Active, None, ProcessProperties::new("etl.job"))
        .unwrap();
    let port = airflow
        .create_port(false, None, PortProperties::new("etl.job.in"))
        .unwrap();
    airflow
        .setup_process_port(true, &process, &port, EffectiveWindow::always(), None)
        .unwrap();

    let err = dbt.clear_process_port(&process, &port, None).unwrap_err();
    assert!(matches!(err, LineageError::UserNotAuthorized { .. }));
    airflow.clear_process_port(&process, &port, None).unwrap();
}

#[test]
fn merge_update_keeps_what_replace_drops() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let guid = ctx
        .create_process(
            true,
            ElementStatus::Active,
            None,
            ProcessProperties::new("etl.job")
                .with_display_name("Job")
                .with_description("nightly load"),
        )
        .unwrap();

    ctx.update_process(&guid, None, true, ProcessProperties::default().with_display_name("Nightly job"), None)
        .unwrap();
    let merged = ctx.get_process_by_guid(&guid, None).unwrap();
    assert_eq!(merged.qualified_name(), Some("etl.job"));
    assert_eq!(merged.properties.display_name(), Some("Nightly job"));
    assert_eq!(merged.properties.description(), Some("nightly load"));
    assert_eq!(merged.updated_by.as_deref(), Some("etl-npa"));

    ctx.update_process(&guid, None, false, ProcessProperties::new("etl.job"), None)
        .unwrap();
    let replaced = ctx.get_process_by_guid(&guid, None).unwrap();
    assert_eq!(replaced.properties.display_name(), None);
    assert_eq!(replaced.properties.description(), None);
    assert!(replaced.version > merged.version);
}

#[test]
fn to_third_party_connectors_cannot_write() {
    let config = config_for(SOURCE_A)
        .with_permitted_synchronization(PermittedSynchronization::ToThirdParty);
    let fx = Fixture::with_config(config);

    let err = fx
        .ctx
        .create_asset(true, None, AssetProperties::new("postgres://dw/public.orders"))
        .unwrap_err();
    assert!(matches!(err, LineageError::UserNotAuthorized { ref user_id, .. } if user_id == "etl-npa"));
    assert!(fx.store.recorded_calls().is_empty());

    // Nothing to clear still reports the refusal
    let err = fx
        .ctx
        .clear_related_asset(
            "DerivedFrom",
            &lineage_integrator::ElementId::from_string("a"),
            &lineage_integrator::ElementId::from_string("b"),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, LineageError::UserNotAuthorized { .. }));

    // Reads still go through
    assert!(fx.ctx.find_assets(".*", Paging::default(), None).unwrap().is_empty());
}

#[test]
fn archived_elements_are_visible_only_for_lineage() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let source = ctx
        .create_asset(true, None, AssetProperties::new("s3://raw/orders.csv"))
        .unwrap();
    let target = ctx
        .create_asset(true, None, AssetProperties::new("postgres://dw/public.orders"))
        .unwrap();
    ctx.setup_data_flow(true, &source, &target, FlowProperties::new(), None)
        .unwrap();

    ctx.archive_element(&source, Some("retention".into()), None).unwrap();

    let err = ctx.get_asset_by_guid(&source, None).unwrap_err();
    assert!(matches!(err, LineageError::InvalidParameter { .. }));
    assert!(ctx
        .get_data_flow_suppliers(&target, Paging::default(), None)
        .unwrap()
        .is_empty());

    ctx.set_for_lineage(true);
    let archived = ctx.get_asset_by_guid(&source, None).unwrap();
    assert!(archived.is_memento());
    assert_eq!(
        ctx.get_data_flow_suppliers(&target, Paging::default(), None)
            .unwrap()
            .len(),
        1
    );

    // Restoring does not need for_lineage
    ctx.set_for_lineage(false);
    ctx.restore_element(&source, None).unwrap();
    assert!(!ctx.get_asset_by_guid(&source, None).unwrap().is_memento());
}

#[test]
fn duplicate_processing_skips_duplicate_checks() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    ctx.create_asset(true, None, AssetProperties::new("orders")).unwrap();
    assert!(ctx
        .create_asset(true, None, AssetProperties::new("orders"))
        .is_err());

    ctx.set_for_duplicate_processing(true);
    let second = ctx
        .create_asset(true, None, AssetProperties::new("orders"))
        .unwrap();
    ctx.set_for_duplicate_processing(false);

    let all = ctx.get_assets_by_name("orders", Paging::default(), None).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].guid, second);
}

#[test]
fn effective_time_limits_what_is_seen() {
    let fx = Fixture::new();
    let ctx = &fx.ctx;
    let now = Utc::now();
    let mut props = AssetProperties::new("postgres://dw/public.orders_2023");
    props.effective = EffectiveWindow::between(now - Duration::days(30), now - Duration::days(1));
    let guid = ctx.create_asset(true, None, props).unwrap();

    assert!(ctx.get_asset_by_guid(&guid, None).is_ok());
    assert!(ctx
        .get_asset_by_guid(&guid, Some(now - Duration::days(10)))
        .is_ok());
    assert!(ctx.get_asset_by_guid(&guid, Some(now)).is_err());
    assert!(ctx
        .find_assets(".*orders.*", Paging::default(), Some(now))
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut config = config_for(SOURCE_A);
    config.external_source_guid = String::new();
    let store = Arc::new(lineage_integrator::InMemoryMetadataStore::new());
    let err = lineage_integrator::LineageIntegratorContext::new(config, store).unwrap_err();
    assert!(matches!(err, LineageError::InvalidParameter { ref parameter, .. } if parameter == "config"));
}
