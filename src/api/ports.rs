//! Ports, their owning processes and port delegation

use super::require_guid;
use crate::context::LineageIntegratorContext;
use crate::error::LineageResult;
use crate::graph::{
    EffectiveWindow, ElementId, ElementKind, ExternalIdentifierProperties, LineageElement, Paging,
    PortProperties, RelatedElement, RelationshipEnd, RelationshipId, RelationshipKind,
    RelationshipProperties, TemplateProperties,
};
use crate::store::{NewElement, NewElementFromTemplate, NewRelationship};
use chrono::{DateTime, Utc};

impl LineageIntegratorContext {
    pub fn create_port(
        &self,
        asset_manager_is_home: bool,
        external_identifier: Option<ExternalIdentifierProperties>,
        properties: PortProperties,
    ) -> LineageResult<ElementId> {
        let element = NewElement::new(properties, asset_manager_is_home)
            .with_external_identifier(external_identifier);
        self.create_element_as("create_port", element, None)
    }

    pub fn create_port_from_template(
        &self,
        asset_manager_is_home: bool,
        template_guid: &ElementId,
        external_identifier: Option<ExternalIdentifierProperties>,
        template: TemplateProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        let request = NewElementFromTemplate {
            kind: ElementKind::Port,
            template_guid: template_guid.clone(),
            overrides: template,
            is_home: asset_manager_is_home,
            anchor: None,
            external_identifier,
            zone_membership: None,
        };
        self.create_from_template_as("create_port_from_template", request, effective_time)
    }

    pub fn update_port(
        &self,
        port_guid: &ElementId,
        external_identifier: Option<&str>,
        is_merge_update: bool,
        properties: PortProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_element_as(
            "update_port",
            port_guid,
            external_identifier,
            is_merge_update,
            properties.into(),
            effective_time,
        )
    }

    pub fn remove_port(
        &self,
        port_guid: &ElementId,
        external_identifier: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.remove_element_as(
            "remove_port",
            ElementKind::Port,
            port_guid,
            external_identifier,
            effective_time,
        )
    }

    pub fn find_ports(
        &self,
        search_string: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.find_as(ElementKind::Port, search_string, paging, effective_time)
    }

    pub fn get_ports_by_name(
        &self,
        name: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.by_name_as(ElementKind::Port, name, paging, effective_time)
    }

    pub fn get_port_by_guid(
        &self,
        port_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<LineageElement> {
        self.by_guid_as(ElementKind::Port, port_guid, effective_time)
    }

    // === Process ports ===

    pub fn setup_process_port(
        &self,
        asset_manager_is_home: bool,
        process_guid: &ElementId,
        port_guid: &ElementId,
        effective: EffectiveWindow,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(process_guid, "process_guid")?;
        require_guid(port_guid, "port_guid")?;
        let relationship = NewRelationship::new(
            process_guid,
            port_guid,
            RelationshipProperties::ProcessPort(effective),
            asset_manager_is_home,
        );
        self.link("setup_process_port", relationship, effective_time)
    }

    pub fn clear_process_port(
        &self,
        process_guid: &ElementId,
        port_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(process_guid, "process_guid")?;
        require_guid(port_guid, "port_guid")?;
        self.unlink(
            "clear_process_port",
            RelationshipKind::ProcessPort,
            process_guid,
            port_guid,
            effective_time,
        )
    }

    pub fn get_ports_for_process(
        &self,
        process_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(process_guid, "process_guid")?;
        self.related(
            RelationshipKind::ProcessPort,
            process_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }

    // === Delegation ===

    /// Record that `port_guid` delegates to `delegated_port_guid`, usually
    /// a port on a sub-process.
    pub fn setup_port_delegation(
        &self,
        asset_manager_is_home: bool,
        port_guid: &ElementId,
        delegated_port_guid: &ElementId,
        effective: EffectiveWindow,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(port_guid, "port_guid")?;
        require_guid(delegated_port_guid, "delegated_port_guid")?;
        let relationship = NewRelationship::new(
            port_guid,
            delegated_port_guid,
            RelationshipProperties::PortDelegation(effective),
            asset_manager_is_home,
        );
        self.link("setup_port_delegation", relationship, effective_time)
    }

    pub fn clear_port_delegation(
        &self,
        port_guid: &ElementId,
        delegated_port_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(port_guid, "port_guid")?;
        require_guid(delegated_port_guid, "delegated_port_guid")?;
        self.unlink(
            "clear_port_delegation",
            RelationshipKind::PortDelegation,
            port_guid,
            delegated_port_guid,
            effective_time,
        )
    }

    /// Ports this port delegates to
    pub fn get_port_delegates(
        &self,
        port_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(port_guid, "port_guid")?;
        self.related(
            RelationshipKind::PortDelegation,
            port_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }

    /// Ports that delegate to this port
    pub fn get_port_users(
        &self,
        port_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(port_guid, "port_guid")?;
        self.related(
            RelationshipKind::PortDelegation,
            port_guid,
            RelationshipEnd::Two,
            paging,
            effective_time,
        )
    }
}
