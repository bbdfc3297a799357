//! Processes and their containment hierarchy

use super::require_guid;
use crate::context::LineageIntegratorContext;
use crate::error::LineageResult;
use crate::graph::{
    ElementId, ElementKind, ElementStatus, ExternalIdentifierProperties, LineageElement, Paging,
    ProcessContainmentProperties, ProcessProperties, RelatedElement, RelationshipEnd,
    RelationshipId, RelationshipKind, RelationshipProperties, TemplateProperties,
};
use crate::store::{NewElement, NewElementFromTemplate, NewRelationship};
use chrono::{DateTime, Utc};

impl LineageIntegratorContext {
    /// Create a process in the given lifecycle status. New processes
    /// start in the configured default zones.
    pub fn create_process(
        &self,
        asset_manager_is_home: bool,
        initial_status: ElementStatus,
        external_identifier: Option<ExternalIdentifierProperties>,
        properties: ProcessProperties,
    ) -> LineageResult<ElementId> {
        let element = NewElement::new(properties, asset_manager_is_home)
            .with_status(initial_status)
            .with_external_identifier(external_identifier);
        self.create_element_as("create_process", element, None)
    }

    pub fn create_process_from_template(
        &self,
        asset_manager_is_home: bool,
        template_guid: &ElementId,
        external_identifier: Option<ExternalIdentifierProperties>,
        template: TemplateProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        let request = NewElementFromTemplate {
            kind: ElementKind::Process,
            template_guid: template_guid.clone(),
            overrides: template,
            is_home: asset_manager_is_home,
            anchor: None,
            external_identifier,
            zone_membership: None,
        };
        self.create_from_template_as("create_process_from_template", request, effective_time)
    }

    pub fn update_process(
        &self,
        process_guid: &ElementId,
        external_identifier: Option<&str>,
        is_merge_update: bool,
        properties: ProcessProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_element_as(
            "update_process",
            process_guid,
            external_identifier,
            is_merge_update,
            properties.into(),
            effective_time,
        )
    }

    pub fn update_process_status(
        &self,
        process_guid: &ElementId,
        status: ElementStatus,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(process_guid, "process_guid")?;
        self.mutate("update_process_status", effective_time, |store, call| {
            store.update_element_status(call, ElementKind::Process, process_guid, status)
        })?;
        self.record_updated(process_guid.as_str());
        Ok(())
    }

    pub fn publish_process(
        &self,
        process_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let zones = self.config().publish_zones.clone();
        self.set_zones_as("publish_process", ElementKind::Process, process_guid, zones, effective_time)
    }

    pub fn withdraw_process(
        &self,
        process_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let zones = self.config().default_zones.clone();
        self.set_zones_as("withdraw_process", ElementKind::Process, process_guid, zones, effective_time)
    }

    pub fn remove_process(
        &self,
        process_guid: &ElementId,
        external_identifier: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.remove_element_as(
            "remove_process",
            ElementKind::Process,
            process_guid,
            external_identifier,
            effective_time,
        )
    }

    pub fn find_processes(
        &self,
        search_string: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.find_as(ElementKind::Process, search_string, paging, effective_time)
    }

    pub fn get_processes_by_name(
        &self,
        name: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.by_name_as(ElementKind::Process, name, paging, effective_time)
    }

    pub fn get_process_by_guid(
        &self,
        process_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<LineageElement> {
        self.by_guid_as(ElementKind::Process, process_guid, effective_time)
    }

    // === Hierarchy ===

    pub fn setup_process_parent(
        &self,
        asset_manager_is_home: bool,
        parent_process_guid: &ElementId,
        child_process_guid: &ElementId,
        properties: ProcessContainmentProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(parent_process_guid, "parent_process_guid")?;
        require_guid(child_process_guid, "child_process_guid")?;
        let relationship = NewRelationship::new(
            parent_process_guid,
            child_process_guid,
            RelationshipProperties::ProcessContainment(properties),
            asset_manager_is_home,
        );
        self.link("setup_process_parent", relationship, effective_time)
    }

    pub fn clear_process_parent(
        &self,
        parent_process_guid: &ElementId,
        child_process_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(parent_process_guid, "parent_process_guid")?;
        require_guid(child_process_guid, "child_process_guid")?;
        self.unlink(
            "clear_process_parent",
            RelationshipKind::ProcessContainment,
            parent_process_guid,
            child_process_guid,
            effective_time,
        )
    }

    pub fn get_process_parent(
        &self,
        process_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<RelatedElement>> {
        require_guid(process_guid, "process_guid")?;
        self.single_related(
            RelationshipKind::ProcessContainment,
            process_guid,
            RelationshipEnd::Two,
            effective_time,
        )
    }

    pub fn get_sub_processes(
        &self,
        process_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(process_guid, "process_guid")?;
        self.related(
            RelationshipKind::ProcessContainment,
            process_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }
}
