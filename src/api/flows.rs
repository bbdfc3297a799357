//! Lineage edges: data flow, control flow, process calls and lineage
//! mappings
//!
//! Data flows, control flows and process calls may link the same two
//! elements several times, told apart by qualified name. They are updated
//! and cleared by relationship guid.

use super::require_guid;
use crate::context::LineageIntegratorContext;
use crate::error::LineageResult;
use crate::graph::{
    ControlFlowProperties, ElementId, FlowProperties, LineageRelationship, Paging,
    RelatedElement, RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties,
};
use crate::store::NewRelationship;
use chrono::{DateTime, Utc};

impl LineageIntegratorContext {
    // === Data flow ===

    pub fn setup_data_flow(
        &self,
        asset_manager_is_home: bool,
        data_supplier_guid: &ElementId,
        data_consumer_guid: &ElementId,
        properties: FlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(data_supplier_guid, "data_supplier_guid")?;
        require_guid(data_consumer_guid, "data_consumer_guid")?;
        let relationship = NewRelationship::new(
            data_supplier_guid,
            data_consumer_guid,
            RelationshipProperties::DataFlow(properties),
            asset_manager_is_home,
        );
        self.link("setup_data_flow", relationship, effective_time)
    }

    /// The data flow between two elements with the given qualified name,
    /// or the first one when no name is given
    pub fn get_data_flow(
        &self,
        data_supplier_guid: &ElementId,
        data_consumer_guid: &ElementId,
        qualified_name: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<LineageRelationship>> {
        require_guid(data_supplier_guid, "data_supplier_guid")?;
        require_guid(data_consumer_guid, "data_consumer_guid")?;
        self.find_link(
            RelationshipKind::DataFlow,
            data_supplier_guid,
            data_consumer_guid,
            qualified_name,
            effective_time,
        )
    }

    pub fn update_data_flow(
        &self,
        data_flow_guid: &RelationshipId,
        is_merge_update: bool,
        properties: FlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_link(
            "update_data_flow",
            data_flow_guid,
            is_merge_update,
            RelationshipProperties::DataFlow(properties),
            effective_time,
        )
    }

    pub fn clear_data_flow(
        &self,
        data_flow_guid: &RelationshipId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.unlink_by_guid(
            "clear_data_flow",
            RelationshipKind::DataFlow,
            data_flow_guid,
            effective_time,
        )
    }

    /// Elements that receive data from this one
    pub fn get_data_flow_consumers(
        &self,
        data_supplier_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(data_supplier_guid, "data_supplier_guid")?;
        self.related(
            RelationshipKind::DataFlow,
            data_supplier_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }

    /// Elements that send data to this one
    pub fn get_data_flow_suppliers(
        &self,
        data_consumer_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(data_consumer_guid, "data_consumer_guid")?;
        self.related(
            RelationshipKind::DataFlow,
            data_consumer_guid,
            RelationshipEnd::Two,
            paging,
            effective_time,
        )
    }

    // === Control flow ===

    pub fn setup_control_flow(
        &self,
        asset_manager_is_home: bool,
        current_step_guid: &ElementId,
        next_step_guid: &ElementId,
        properties: ControlFlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(current_step_guid, "current_step_guid")?;
        require_guid(next_step_guid, "next_step_guid")?;
        let relationship = NewRelationship::new(
            current_step_guid,
            next_step_guid,
            RelationshipProperties::ControlFlow(properties),
            asset_manager_is_home,
        );
        self.link("setup_control_flow", relationship, effective_time)
    }

    pub fn get_control_flow(
        &self,
        current_step_guid: &ElementId,
        next_step_guid: &ElementId,
        qualified_name: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<LineageRelationship>> {
        require_guid(current_step_guid, "current_step_guid")?;
        require_guid(next_step_guid, "next_step_guid")?;
        self.find_link(
            RelationshipKind::ControlFlow,
            current_step_guid,
            next_step_guid,
            qualified_name,
            effective_time,
        )
    }

    pub fn update_control_flow(
        &self,
        control_flow_guid: &RelationshipId,
        is_merge_update: bool,
        properties: ControlFlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_link(
            "update_control_flow",
            control_flow_guid,
            is_merge_update,
            RelationshipProperties::ControlFlow(properties),
            effective_time,
        )
    }

    pub fn clear_control_flow(
        &self,
        control_flow_guid: &RelationshipId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.unlink_by_guid(
            "clear_control_flow",
            RelationshipKind::ControlFlow,
            control_flow_guid,
            effective_time,
        )
    }

    pub fn get_control_flow_next_steps(
        &self,
        current_step_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(current_step_guid, "current_step_guid")?;
        self.related(
            RelationshipKind::ControlFlow,
            current_step_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }

    pub fn get_control_flow_previous_steps(
        &self,
        current_step_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(current_step_guid, "current_step_guid")?;
        self.related(
            RelationshipKind::ControlFlow,
            current_step_guid,
            RelationshipEnd::Two,
            paging,
            effective_time,
        )
    }

    // === Process call ===

    pub fn setup_process_call(
        &self,
        asset_manager_is_home: bool,
        caller_guid: &ElementId,
        called_guid: &ElementId,
        properties: FlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(caller_guid, "caller_guid")?;
        require_guid(called_guid, "called_guid")?;
        let relationship = NewRelationship::new(
            caller_guid,
            called_guid,
            RelationshipProperties::ProcessCall(properties),
            asset_manager_is_home,
        );
        self.link("setup_process_call", relationship, effective_time)
    }

    pub fn get_process_call(
        &self,
        caller_guid: &ElementId,
        called_guid: &ElementId,
        qualified_name: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<LineageRelationship>> {
        require_guid(caller_guid, "caller_guid")?;
        require_guid(called_guid, "called_guid")?;
        self.find_link(
            RelationshipKind::ProcessCall,
            caller_guid,
            called_guid,
            qualified_name,
            effective_time,
        )
    }

    pub fn update_process_call(
        &self,
        process_call_guid: &RelationshipId,
        is_merge_update: bool,
        properties: FlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_link(
            "update_process_call",
            process_call_guid,
            is_merge_update,
            RelationshipProperties::ProcessCall(properties),
            effective_time,
        )
    }

    pub fn clear_process_call(
        &self,
        process_call_guid: &RelationshipId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.unlink_by_guid(
            "clear_process_call",
            RelationshipKind::ProcessCall,
            process_call_guid,
            effective_time,
        )
    }

    pub fn get_called_processes(
        &self,
        caller_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(caller_guid, "caller_guid")?;
        self.related(
            RelationshipKind::ProcessCall,
            caller_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }

    pub fn get_calling_processes(
        &self,
        called_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(called_guid, "called_guid")?;
        self.related(
            RelationshipKind::ProcessCall,
            called_guid,
            RelationshipEnd::Two,
            paging,
            effective_time,
        )
    }

    // === Lineage mapping ===

    /// Map a source element onto the destination element derived from it
    pub fn setup_lineage_mapping(
        &self,
        source_element_guid: &ElementId,
        destination_element_guid: &ElementId,
        properties: FlowProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(source_element_guid, "source_element_guid")?;
        require_guid(destination_element_guid, "destination_element_guid")?;
        let relationship = NewRelationship::new(
            source_element_guid,
            destination_element_guid,
            RelationshipProperties::LineageMapping(properties),
            false,
        );
        self.link("setup_lineage_mapping", relationship, effective_time)
    }

    pub fn clear_lineage_mapping(
        &self,
        source_element_guid: &ElementId,
        destination_element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(source_element_guid, "source_element_guid")?;
        require_guid(destination_element_guid, "destination_element_guid")?;
        self.unlink(
            "clear_lineage_mapping",
            RelationshipKind::LineageMapping,
            source_element_guid,
            destination_element_guid,
            effective_time,
        )
    }

    /// Elements mapped from this source
    pub fn get_destination_lineage_mappings(
        &self,
        source_element_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(source_element_guid, "source_element_guid")?;
        self.related(
            RelationshipKind::LineageMapping,
            source_element_guid,
            RelationshipEnd::One,
            paging,
            effective_time,
        )
    }

    /// Elements this destination is mapped from
    pub fn get_source_lineage_mappings(
        &self,
        destination_element_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(destination_element_guid, "destination_element_guid")?;
        self.related(
            RelationshipKind::LineageMapping,
            destination_element_guid,
            RelationshipEnd::Two,
            paging,
            effective_time,
        )
    }
}
