//! In-memory metadata store
//!
//! Reference implementation of [`MetadataStore`] used by the tests and the
//! CLI demo. One mutex guards all state, so each call is atomic on its own
//! and nothing groups calls together.

use super::traits::{
    MetadataStore, NewElement, NewElementFromTemplate, NewRelationship, RelationshipSetup,
    StoreError, StoreResult,
};
use crate::context::{CallAttribution, ExternalSourceIdentity};
use crate::graph::merge::{apply_patch, merge_properties};
use crate::graph::{
    Classification, ClassificationKind, ElementId, ElementKind, ElementProperties, ElementStatus,
    HasEffectiveWindow, HasQualifiedName, LineageElement, LineageRelationship, Paging, RelatedElement,
    RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties,
};
use chrono::Utc;
use regex_lite::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One store call as seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub attribution: CallAttribution,
}

#[derive(Debug)]
struct StoredElement {
    seq: u64,
    element: LineageElement,
}

#[derive(Debug)]
struct StoredRelationship {
    seq: u64,
    relationship: LineageRelationship,
}

#[derive(Debug, Default)]
struct StoreState {
    next_seq: u64,
    elements: HashMap<ElementId, StoredElement>,
    relationships: HashMap<RelationshipId, StoredRelationship>,
    /// (source guid, external identifier) -> element
    external_ids: HashMap<(String, String), ElementId>,
}

/// Thread-safe in-memory store with the same visibility, ownership and
/// duplicate rules a remote store applies.
#[derive(Debug)]
pub struct InMemoryMetadataStore {
    state: Mutex<StoreState>,
    calls: Mutex<Vec<RecordedCall>>,
    available: AtomicBool,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Every call received so far, oldest first
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Simulate the remote server going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn element_count(&self) -> usize {
        self.state().elements.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.state().relationships.len()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call, then fail if the store is unavailable.
    fn begin(&self, operation: &'static str, call: &CallAttribution) -> StoreResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                operation,
                attribution: call.clone(),
            });
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "{} failed: metadata server is not responding",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn is_visible(element: &LineageElement, call: &CallAttribution) -> bool {
    element.is_effective_at(call.effective_time) && (call.for_lineage || !element.is_memento())
}

fn check_home(
    call: &CallAttribution,
    home: Option<&ExternalSourceIdentity>,
    what: impl std::fmt::Display,
) -> StoreResult<()> {
    match home {
        Some(home) if home.guid != call.external_source.guid => Err(StoreError::NotAuthorized {
            user_id: call.user_id.clone(),
            reason: format!(
                "{} is homed in {} and cannot be changed by {}",
                what, home, call.external_source
            ),
        }),
        _ => Ok(()),
    }
}

fn required_qualified_name(properties: &ElementProperties) -> StoreResult<&str> {
    match properties.qualified_name() {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(StoreError::invalid("qualified_name", "must be supplied")),
    }
}

fn required_window(properties: &dyn HasEffectiveWindow) -> StoreResult<()> {
    if properties.effective_window().is_valid() {
        Ok(())
    } else {
        Err(StoreError::invalid("effective_to", "must be later than effective_from"))
    }
}

fn serde_failure(parameter: &'static str) -> impl FnOnce(serde_json::Error) -> StoreError {
    move |e| StoreError::invalid(parameter, e.to_string())
}

fn home_for(call: &CallAttribution, is_home: bool) -> Option<ExternalSourceIdentity> {
    is_home.then(|| call.external_source.clone())
}

fn touch(element: &mut LineageElement, call: &CallAttribution) {
    element.version += 1;
    element.updated_by = Some(call.user_id.clone());
    element.update_time = Some(Utc::now());
}

impl StoreState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// A visible element of any kind
    fn lookup(
        &self,
        guid: &ElementId,
        call: &CallAttribution,
        parameter: &str,
    ) -> StoreResult<&LineageElement> {
        self.elements
            .get(guid)
            .map(|stored| &stored.element)
            .filter(|element| is_visible(element, call))
            .ok_or_else(|| StoreError::not_found(parameter, guid))
    }

    /// A visible element that must be of `kind`
    fn typed(
        &self,
        kind: ElementKind,
        guid: &ElementId,
        call: &CallAttribution,
        parameter: &str,
    ) -> StoreResult<&LineageElement> {
        let element = self.lookup(guid, call, parameter)?;
        if element.kind() != kind {
            return Err(StoreError::invalid(
                parameter,
                format!("{} is a {}, not a {}", guid, element.kind(), kind),
            ));
        }
        Ok(element)
    }

    /// A visible element of `kind` that the caller may change
    fn writable(
        &self,
        kind: ElementKind,
        guid: &ElementId,
        call: &CallAttribution,
    ) -> StoreResult<&LineageElement> {
        let element = self.typed(kind, guid, call, kind.guid_parameter())?;
        check_home(call, element.home.as_ref(), format_args!("{} {}", kind, guid))?;
        Ok(element)
    }

    fn element_mut(&mut self, guid: &ElementId) -> StoreResult<&mut LineageElement> {
        self.elements
            .get_mut(guid)
            .map(|stored| &mut stored.element)
            .ok_or_else(|| StoreError::not_found("element_guid", guid))
    }

    fn check_unique_name(
        &self,
        kind: ElementKind,
        qualified_name: &str,
        except: Option<&ElementId>,
    ) -> StoreResult<()> {
        let clash = self.elements.values().find(|stored| {
            stored.element.kind() == kind
                && stored.element.qualified_name() == Some(qualified_name)
                && Some(&stored.element.guid) != except
        });
        match clash {
            Some(stored) => Err(StoreError::invalid(
                "qualified_name",
                format!(
                    "{} '{}' already exists as {}",
                    kind, qualified_name, stored.element.guid
                ),
            )),
            None => Ok(()),
        }
    }

    fn bind_external_identifier(
        &mut self,
        call: &CallAttribution,
        external_identifier: Option<&str>,
        guid: &ElementId,
    ) -> StoreResult<()> {
        let Some(identifier) = external_identifier else {
            return Ok(());
        };
        let key = (call.external_source.guid.clone(), identifier.to_string());
        if !call.for_duplicate_processing {
            if let Some(bound) = self.external_ids.get(&key) {
                if self.elements.contains_key(bound) {
                    return Err(StoreError::invalid(
                        "external_identifier",
                        format!("'{}' is already bound to {}", identifier, bound),
                    ));
                }
            }
        }
        self.external_ids.insert(key, guid.clone());
        Ok(())
    }

    fn insert_element(&mut self, element: LineageElement) -> ElementId {
        let seq = self.next_seq();
        let guid = element.guid.clone();
        self.elements
            .insert(guid.clone(), StoredElement { seq, element });
        guid
    }

    /// Visible elements matching `filter`, in creation order
    fn collect_elements<F>(&self, call: &CallAttribution, filter: F) -> Vec<LineageElement>
    where
        F: Fn(&LineageElement) -> bool,
    {
        let mut matches: Vec<&StoredElement> = self
            .elements
            .values()
            .filter(|stored| is_visible(&stored.element, call) && filter(&stored.element))
            .collect();
        matches.sort_by_key(|stored| stored.seq);
        matches.into_iter().map(|s| s.element.clone()).collect()
    }

    /// Relationships matching `filter` whose window and both ends are
    /// visible, in creation order
    fn collect_relationships<F>(&self, call: &CallAttribution, filter: F) -> Vec<&StoredRelationship>
    where
        F: Fn(&LineageRelationship) -> bool,
    {
        let mut matches: Vec<&StoredRelationship> = self
            .relationships
            .values()
            .filter(|stored| {
                let rel = &stored.relationship;
                filter(rel)
                    && rel.is_effective_at(call.effective_time)
                    && self.lookup(&rel.end_one, call, "end_one_guid").is_ok()
                    && self.lookup(&rel.end_two, call, "end_two_guid").is_ok()
            })
            .collect();
        matches.sort_by_key(|stored| stored.seq);
        matches
    }

    fn relationship(
        &self,
        kind: RelationshipKind,
        guid: &RelationshipId,
        call: &CallAttribution,
    ) -> StoreResult<&LineageRelationship> {
        let rel = self
            .relationships
            .get(guid)
            .map(|stored| &stored.relationship)
            .filter(|rel| rel.is_effective_at(call.effective_time))
            .ok_or_else(|| StoreError::not_found("relationship_guid", guid))?;
        if rel.kind() != kind {
            return Err(StoreError::invalid(
                "relationship_guid",
                format!("{} is a {}, not a {}", guid, rel.kind(), kind),
            ));
        }
        Ok(rel)
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn create_element(&self, call: &CallAttribution, element: NewElement) -> StoreResult<ElementId> {
        self.begin("create_element", call)?;
        let mut state = self.state();

        let kind = element.properties.kind();
        let qualified_name = required_qualified_name(&element.properties)?;
        required_window(&element.properties)?;
        if !call.for_duplicate_processing {
            state.check_unique_name(kind, qualified_name, None)?;
        }
        if let Some(anchor) = &element.anchor {
            state.lookup(anchor, call, "anchor_guid")?;
        }

        let guid = ElementId::new();
        let identifier = element
            .external_identifier
            .as_ref()
            .map(|e| e.external_identifier.as_str());
        state.bind_external_identifier(call, identifier, &guid)?;

        Ok(state.insert_element(LineageElement {
            guid,
            properties: element.properties,
            status: element.status,
            zone_membership: element.zone_membership,
            classifications: BTreeMap::new(),
            anchor: element.anchor,
            home: home_for(call, element.is_home),
            version: 1,
            created_by: call.user_id.clone(),
            create_time: Utc::now(),
            updated_by: None,
            update_time: None,
        }))
    }

    fn create_element_from_template(
        &self,
        call: &CallAttribution,
        request: NewElementFromTemplate,
    ) -> StoreResult<ElementId> {
        self.begin("create_element_from_template", call)?;
        let mut state = self.state();

        let template = state
            .typed(request.kind, &request.template_guid, call, "template_guid")?
            .clone();
        let overrides =
            serde_json::to_value(&request.overrides).map_err(serde_failure("template_properties"))?;
        let properties: ElementProperties =
            apply_patch(&template.properties, overrides).map_err(serde_failure("template_properties"))?;

        let qualified_name = required_qualified_name(&properties)?;
        if !call.for_duplicate_processing {
            state.check_unique_name(request.kind, qualified_name, None)?;
        }
        if let Some(anchor) = &request.anchor {
            state.lookup(anchor, call, "anchor_guid")?;
        }

        let guid = ElementId::new();
        let identifier = request
            .external_identifier
            .as_ref()
            .map(|e| e.external_identifier.as_str());
        state.bind_external_identifier(call, identifier, &guid)?;

        let mut classifications = template.classifications;
        classifications.remove(&ClassificationKind::Memento);

        Ok(state.insert_element(LineageElement {
            guid,
            properties,
            status: template.status,
            zone_membership: request.zone_membership.unwrap_or(template.zone_membership),
            classifications,
            anchor: request.anchor,
            home: home_for(call, request.is_home),
            version: 1,
            created_by: call.user_id.clone(),
            create_time: Utc::now(),
            updated_by: None,
            update_time: None,
        }))
    }

    fn update_element(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        is_merge_update: bool,
        properties: ElementProperties,
    ) -> StoreResult<()> {
        self.begin("update_element", call)?;
        let mut state = self.state();

        if properties.kind() != kind {
            return Err(StoreError::invalid(
                "properties",
                format!("{} properties supplied for a {}", properties.kind(), kind),
            ));
        }
        let current = state.writable(kind, guid, call)?;
        let updated = if is_merge_update {
            merge_properties(&current.properties, &properties).map_err(serde_failure("properties"))?
        } else {
            properties
        };
        let qualified_name = required_qualified_name(&updated)?;
        required_window(&updated)?;
        if !call.for_duplicate_processing && current.qualified_name() != Some(qualified_name) {
            state.check_unique_name(kind, qualified_name, Some(guid))?;
        }

        let element = state.element_mut(guid)?;
        element.properties = updated;
        touch(element, call);
        Ok(())
    }

    fn update_element_status(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        status: ElementStatus,
    ) -> StoreResult<()> {
        self.begin("update_element_status", call)?;
        let mut state = self.state();
        state.writable(kind, guid, call)?;

        let element = state.element_mut(guid)?;
        element.status = status;
        touch(element, call);
        Ok(())
    }

    fn set_zone_membership(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        zones: Vec<String>,
    ) -> StoreResult<()> {
        self.begin("set_zone_membership", call)?;
        if !kind.is_zoned() {
            return Err(StoreError::invalid(
                "zone_membership",
                format!("{} elements are not governed by zones", kind),
            ));
        }
        let mut state = self.state();
        state.writable(kind, guid, call)?;

        let element = state.element_mut(guid)?;
        element.zone_membership = zones;
        touch(element, call);
        Ok(())
    }

    fn remove_element(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
    ) -> StoreResult<Vec<ElementId>> {
        self.begin("remove_element", call)?;
        let mut state = self.state();
        state.writable(kind, guid, call)?;

        // Anchored elements go with their anchor, however deep.
        let mut removed = vec![guid.clone()];
        let mut doomed: HashSet<ElementId> = removed.iter().cloned().collect();
        let mut cursor = 0;
        while cursor < removed.len() {
            let parent = removed[cursor].clone();
            let mut children: Vec<&StoredElement> = state
                .elements
                .values()
                .filter(|s| s.element.anchor.as_ref() == Some(&parent))
                .filter(|s| !doomed.contains(&s.element.guid))
                .collect();
            children.sort_by_key(|s| s.seq);
            for child in children {
                doomed.insert(child.element.guid.clone());
                removed.push(child.element.guid.clone());
            }
            cursor += 1;
        }

        state.elements.retain(|id, _| !doomed.contains(id));
        state.relationships.retain(|_, stored| {
            !doomed.contains(&stored.relationship.end_one)
                && !doomed.contains(&stored.relationship.end_two)
        });
        state.external_ids.retain(|_, bound| !doomed.contains(bound));
        Ok(removed)
    }

    fn set_classification(
        &self,
        call: &CallAttribution,
        guid: &ElementId,
        classification: Classification,
    ) -> StoreResult<()> {
        self.begin("set_classification", call)?;
        let mut state = self.state();
        let element = state.lookup(guid, call, "element_guid")?;
        let kind = classification.kind();
        if !kind.applies_to(element.kind()) {
            return Err(StoreError::invalid(
                "classification",
                format!("{} cannot be attached to a {}", kind, element.kind()),
            ));
        }
        check_home(call, element.home.as_ref(), format_args!("{} {}", element.kind(), guid))?;

        let element = state.element_mut(guid)?;
        element.classifications.insert(kind, classification);
        touch(element, call);
        Ok(())
    }

    fn clear_classification(
        &self,
        call: &CallAttribution,
        guid: &ElementId,
        kind: ClassificationKind,
    ) -> StoreResult<()> {
        self.begin("clear_classification", call)?;
        // Restoring an archived element has to see it first.
        let view = CallAttribution {
            for_lineage: call.for_lineage || kind == ClassificationKind::Memento,
            ..call.clone()
        };
        let mut state = self.state();
        let element = state.lookup(guid, &view, "element_guid")?;
        check_home(call, element.home.as_ref(), format_args!("{} {}", element.kind(), guid))?;

        let element = state.element_mut(guid)?;
        if element.classifications.remove(&kind).is_some() {
            touch(element, call);
        }
        Ok(())
    }

    fn find_elements(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        search_regex: &str,
        paging: Paging,
    ) -> StoreResult<Vec<LineageElement>> {
        self.begin("find_elements", call)?;
        let invalid = |e: regex_lite::Error| StoreError::invalid("search_string", e.to_string());
        // Compiled alone first so unbalanced groups cannot escape the anchors
        Regex::new(search_regex).map_err(invalid)?;
        let regex = Regex::new(&format!("^(?:{})$", search_regex)).map_err(invalid)?;
        let state = self.state();
        let found = state.collect_elements(call, |element| {
            element.kind() == kind
                && element
                    .properties
                    .searchable_text()
                    .into_iter()
                    .any(|text| regex.is_match(text))
        });
        Ok(paging.apply(found))
    }

    fn get_elements_by_name(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        name: &str,
        paging: Paging,
    ) -> StoreResult<Vec<LineageElement>> {
        self.begin("get_elements_by_name", call)?;
        let state = self.state();
        let found = state.collect_elements(call, |element| {
            element.kind() == kind
                && (element.qualified_name() == Some(name)
                    || element.properties.display_name() == Some(name))
        });
        Ok(paging.apply(found))
    }

    fn get_element(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
    ) -> StoreResult<LineageElement> {
        self.begin("get_element", call)?;
        let state = self.state();
        state
            .typed(kind, guid, call, kind.guid_parameter())
            .cloned()
    }

    fn get_anchored_elements(
        &self,
        call: &CallAttribution,
        anchor: &ElementId,
        kind: ElementKind,
        paging: Paging,
    ) -> StoreResult<Vec<LineageElement>> {
        self.begin("get_anchored_elements", call)?;
        let state = self.state();
        state.lookup(anchor, call, "anchor_guid")?;
        let found = state.collect_elements(call, |element| {
            element.kind() == kind && element.anchor.as_ref() == Some(anchor)
        });
        Ok(paging.apply(found))
    }

    fn resolve_external_identifier(
        &self,
        call: &CallAttribution,
        kind: ElementKind,
        external_identifier: &str,
    ) -> StoreResult<Option<ElementId>> {
        self.begin("resolve_external_identifier", call)?;
        let state = self.state();
        let key = (
            call.external_source.guid.clone(),
            external_identifier.to_string(),
        );
        Ok(state
            .external_ids
            .get(&key)
            .and_then(|guid| state.typed(kind, guid, call, "external_identifier").ok())
            .map(|element| element.guid.clone()))
    }

    fn setup_relationship(
        &self,
        call: &CallAttribution,
        relationship: NewRelationship,
    ) -> StoreResult<RelationshipSetup> {
        self.begin("setup_relationship", call)?;
        required_window(&relationship.properties)?;
        let mut state = self.state();

        let kind = relationship.properties.kind();
        let one = state.lookup(&relationship.end_one, call, "end_one_guid")?.kind();
        let two = state.lookup(&relationship.end_two, call, "end_two_guid")?.kind();
        if !kind.accepts_ends(one, two) {
            return Err(StoreError::invalid(
                "relationship",
                format!("{} cannot link a {} to a {}", kind, one, two),
            ));
        }

        if !call.for_duplicate_processing {
            let qualifier = relationship.properties.qualifier();
            let existing = state
                .relationships
                .values()
                .map(|stored| &stored.relationship)
                .find(|rel| {
                    rel.kind() == kind
                        && rel.end_one == relationship.end_one
                        && rel.end_two == relationship.end_two
                        && rel.properties.qualifier() == qualifier
                })
                .map(|rel| (rel.guid.clone(), rel.home.clone()));
            if let Some((guid, home)) = existing {
                check_home(call, home.as_ref(), format_args!("{} {}", kind, guid))?;
                let stored = state
                    .relationships
                    .get_mut(&guid)
                    .ok_or_else(|| StoreError::not_found("relationship_guid", &guid))?;
                stored.relationship.properties = relationship.properties;
                stored.relationship.version += 1;
                return Ok(RelationshipSetup {
                    guid,
                    created: false,
                });
            }
        }

        let seq = state.next_seq();
        let guid = RelationshipId::new();
        state.relationships.insert(
            guid.clone(),
            StoredRelationship {
                seq,
                relationship: LineageRelationship {
                    guid: guid.clone(),
                    end_one: relationship.end_one,
                    end_two: relationship.end_two,
                    properties: relationship.properties,
                    home: home_for(call, relationship.is_home),
                    version: 1,
                    created_by: call.user_id.clone(),
                    create_time: Utc::now(),
                },
            },
        );
        Ok(RelationshipSetup {
            guid,
            created: true,
        })
    }

    fn update_relationship(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        guid: &RelationshipId,
        is_merge_update: bool,
        properties: RelationshipProperties,
    ) -> StoreResult<()> {
        self.begin("update_relationship", call)?;
        if properties.kind() != kind {
            return Err(StoreError::invalid(
                "properties",
                format!("{} properties supplied for a {}", properties.kind(), kind),
            ));
        }
        let mut state = self.state();
        let current = state.relationship(kind, guid, call)?;
        check_home(call, current.home.as_ref(), format_args!("{} {}", kind, guid))?;
        let updated = if is_merge_update {
            merge_properties(&current.properties, &properties).map_err(serde_failure("properties"))?
        } else {
            properties
        };
        required_window(&updated)?;

        let stored = state
            .relationships
            .get_mut(guid)
            .ok_or_else(|| StoreError::not_found("relationship_guid", guid))?;
        stored.relationship.properties = updated;
        stored.relationship.version += 1;
        Ok(())
    }

    fn clear_relationship(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        end_one: &ElementId,
        end_two: &ElementId,
    ) -> StoreResult<Vec<RelationshipId>> {
        self.begin("clear_relationship", call)?;
        let mut state = self.state();
        if !state.elements.contains_key(end_one) {
            return Err(StoreError::not_found("end_one_guid", end_one));
        }
        if !state.elements.contains_key(end_two) {
            return Err(StoreError::not_found("end_two_guid", end_two));
        }

        let mut doomed: Vec<&StoredRelationship> = state
            .relationships
            .values()
            .filter(|s| {
                s.relationship.kind() == kind
                    && &s.relationship.end_one == end_one
                    && &s.relationship.end_two == end_two
            })
            .collect();
        doomed.sort_by_key(|s| s.seq);
        for stored in &doomed {
            let rel = &stored.relationship;
            check_home(call, rel.home.as_ref(), format_args!("{} {}", kind, rel.guid))?;
        }
        let removed: Vec<RelationshipId> =
            doomed.iter().map(|s| s.relationship.guid.clone()).collect();
        for guid in &removed {
            state.relationships.remove(guid);
        }
        Ok(removed)
    }

    fn clear_relationship_by_guid(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        guid: &RelationshipId,
    ) -> StoreResult<()> {
        self.begin("clear_relationship_by_guid", call)?;
        let mut state = self.state();
        let rel = state.relationship(kind, guid, call)?;
        check_home(call, rel.home.as_ref(), format_args!("{} {}", kind, guid))?;
        state.relationships.remove(guid);
        Ok(())
    }

    fn get_relationships(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        end_one: &ElementId,
        end_two: &ElementId,
    ) -> StoreResult<Vec<LineageRelationship>> {
        self.begin("get_relationships", call)?;
        let state = self.state();
        state.lookup(end_one, call, "end_one_guid")?;
        state.lookup(end_two, call, "end_two_guid")?;
        Ok(state
            .collect_relationships(call, |rel| {
                rel.kind() == kind && &rel.end_one == end_one && &rel.end_two == end_two
            })
            .into_iter()
            .map(|stored| stored.relationship.clone())
            .collect())
    }

    fn get_related_elements(
        &self,
        call: &CallAttribution,
        kind: RelationshipKind,
        from: &ElementId,
        start: RelationshipEnd,
        paging: Paging,
    ) -> StoreResult<Vec<RelatedElement>> {
        self.begin("get_related_elements", call)?;
        let state = self.state();
        state.lookup(from, call, "element_guid")?;

        let related: Vec<RelatedElement> = state
            .collect_relationships(call, |rel| {
                let start_end = match start {
                    RelationshipEnd::One => &rel.end_one,
                    RelationshipEnd::Two => &rel.end_two,
                };
                rel.kind() == kind && start_end == from
            })
            .into_iter()
            .filter_map(|stored| {
                let rel = &stored.relationship;
                state
                    .elements
                    .get(rel.other_end(start))
                    .map(|other| RelatedElement {
                        relationship: rel.clone(),
                        element: other.element.clone(),
                    })
            })
            .collect();
        Ok(paging.apply(related))
    }
}
